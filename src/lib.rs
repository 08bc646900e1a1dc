//! Labelprop computes the connected components of a graph given as a list of edges with an
//! iterative, map/reduce style minimum-label propagation. Every round regroups the current
//! `(node, label)` pairs by node, moves each node and its neighbors to the smallest label seen, and
//! removes duplicate pairs, until a round discovers no new pairs. The rounds run on a partitioned
//! in-process collection runtime whose partitions are processed by parallel workers.

// Enable warnings for all clippy lints. This automatically enables new lints shipped with new rust
// versions.
#![warn(
    clippy::correctness,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::cargo,
    clippy::restriction
)]
// Now selectively disable unneeded lints.
#![allow(
    clippy::indexing_slicing,               // Allow `vec[i]` indexing.
    clippy::module_name_repetitions,        // Allow.
    clippy::use_debug,                      // Allow.
    clippy::integer_arithmetic,             // Allow.
    clippy::integer_division,               // Allow.
    clippy::implicit_return,                // Allow.
    clippy::use_self,                       // Allow.
    clippy::shadow_same,                    // Allow.
    clippy::too_many_lines,                 // Allow.
    clippy::multiple_crate_versions,        // Disabled.
    clippy::missing_docs_in_private_items,  // Disabled.
    clippy::missing_errors_doc,             // Disabled.
    clippy::missing_inline_in_public_items, // Disabled.
    clippy::unknown_clippy_lints,           // To enable naming new lints added to nightly.
    clippy::result_expect_used,             // Should use `expect` rather than `unwrap`.
    clippy::option_expect_used,             // Should use `expect` rather than `unwrap`.
    clippy::panic,                          // Allow.
    clippy::must_use_candidate,             // Allow.
    clippy::as_conversions,                 // Allow but only when absolutely necessary.
    clippy::implicit_hasher                 // Default hasher is fine for now.
)]
// Do not allow print statements. Use `log::info!()` or equivalent instead.
#![deny(clippy::print_stdout)]

pub mod collection;
pub mod computations;
pub mod config;
pub mod error;
pub mod graph;
pub mod util;

#[macro_use]
extern crate derive_new;

use crate::computations::engine::ConnectedComponents;
use crate::computations::reference::traversal_labels;
use crate::computations::wcc::differential_labels;
use crate::computations::{compare_labels, Labels};
use crate::config::RunConfig;
use crate::error::GSError;
use crate::util::io::{serialize_object, GsWriter};
use crate::util::memory_usage::print_memory_usage;
use crate::util::timer::{GsDuration, GsTimer};
use log::info;
use lp_api::Pair;

const LARGEST_COMPONENTS_SHOWN: usize = 5;

/// Outcome of a complete run.
#[derive(new, Debug, Copy, Clone)]
pub struct RunSummary {
    pub rounds: usize,
    pub components: usize,
    pub nodes: usize,
    /// Time spent in the propagation rounds alone.
    pub round_time: GsDuration,
    pub elapsed: GsDuration,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} connected components over {} nodes after {} rounds ({} in rounds)",
            self.components,
            self.nodes,
            self.rounds,
            self.round_time.to_seconds_string()
        )
    }
}

/// Loads the edges described by `config`, runs the engine to convergence and hands the labels to
/// the configured sinks.
pub fn run(config: &RunConfig) -> Result<RunSummary, GSError> {
    let timer = GsTimer::now();
    let edges = graph::load_edges(&config.source)?;
    print_memory_usage(format_args!("loaded edges"));
    let reference_edges = if config.verify { Some(edges.clone()) } else { None };

    let mut engine = ConnectedComponents::from_edges(edges, config.engine);
    let rounds = engine.iterate_all(config.engine.dedup.use_distinct())?;
    let components = engine.number_of_connected_components()?;
    let labels = engine.labels()?;

    for (label, size) in engine.component_sizes()?.into_iter().take(LARGEST_COMPONENTS_SHOWN) {
        info!("Component {} has {} nodes", label, size);
    }
    if config.print_labels {
        for (node, label) in &labels {
            info!("{} -> {}", node, label);
        }
    }
    if let Some(output) = &config.output {
        write_labels(output, &labels)?;
    }

    if let Some(edges) = reference_edges {
        compare_labels("engine", &labels, "traversal", &traversal_labels(&edges))?;
        let differential = differential_labels(&edges, config.engine.threads)?;
        compare_labels("engine", &labels, "differential", &differential)?;
    }

    Ok(RunSummary::new(rounds, components, labels.len(), engine.round_time(), timer.elapsed()))
}

/// Writes one `node,label` line per node, or a bincode `Vec<(node, label)>` for `.bin` paths.
pub fn write_labels(file_path: &str, labels: &Labels) -> Result<(), GSError> {
    if file_path.ends_with(".bin") {
        let pairs = labels.iter().map(|(node, label)| (*node, *label)).collect::<Vec<Pair>>();
        return serialize_object(file_path, &pairs);
    }
    let mut writer = GsWriter::new(file_path.to_owned())?;
    writer.write_file_lines(labels.iter().map(|(node, label)| format!("{},{}", node, label)))?;
    writer.flush()?;
    info!("Wrote {} labels to '{}'", labels.len(), file_path);
    Ok(())
}
