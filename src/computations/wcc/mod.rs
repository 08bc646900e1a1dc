//! Reference labels computed with differential dataflow, used to cross-check the map/reduce
//! engine.

use crate::error::GSError;
use crate::util::timer::GsTimer;
use log::info;
use lp_api::{DiffCount, NodeId, Pair};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

mod differential_df;

pub use differential_df::propagate_min_labels;

/// Runs minimum-label propagation as a differential dataflow on `threads` timely workers and
/// returns the label of every node.
pub fn differential_labels(
    edges: &[Pair],
    threads: NonZeroUsize,
) -> Result<BTreeMap<NodeId, NodeId>, GSError> {
    let timer = GsTimer::now();
    let worker_results =
        differential_df::run(edges.to_vec(), threads).map_err(GSError::Timely)?;

    let mut counts: BTreeMap<Pair, DiffCount> = BTreeMap::new();
    for result in worker_results {
        for (pair, diff) in result.map_err(GSError::Timely)? {
            *counts.entry(pair).or_insert(0) += diff;
        }
    }

    let mut labels = BTreeMap::new();
    for ((node, label), count) in counts {
        if count <= 0 {
            continue;
        }
        let entry = labels.entry(node).or_insert(label);
        if label < *entry {
            *entry = label;
        }
    }
    info!(
        "Differential reference labeled {} nodes in {}",
        labels.len(),
        timer.elapsed().to_seconds_string()
    );
    Ok(labels)
}
