use crate::error::GSError;
use lp_api::{NodeId, Pair};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates `edge_count` random edges between nodes `0..node_count`.
///
/// A `seed` makes the output reproducible. Self-loops are redrawn unless `self_loops` is set.
pub fn random_edges(
    node_count: NodeId,
    edge_count: usize,
    seed: Option<u64>,
    self_loops: bool,
) -> Result<Vec<Pair>, GSError> {
    if edge_count == 0 {
        return Ok(Vec::new());
    }
    if node_count == 0 || (node_count == 1 && !self_loops) {
        return Err(GSError::Config(format!(
            "Cannot generate {} edges over {} nodes{}",
            edge_count,
            node_count,
            if self_loops { "" } else { " without self-loops" }
        )));
    }
    let edges = if let Some(seed) = seed {
        generate(&mut StdRng::seed_from_u64(seed), node_count, edge_count, self_loops)
    } else {
        generate(&mut rand::thread_rng(), node_count, edge_count, self_loops)
    };
    Ok(edges)
}

fn generate<R: Rng>(
    rng: &mut R,
    node_count: NodeId,
    edge_count: usize,
    self_loops: bool,
) -> Vec<Pair> {
    let mut edges = Vec::with_capacity(edge_count);
    while edges.len() < edge_count {
        let src = rng.gen_range(0..node_count);
        let dst = rng.gen_range(0..node_count);
        if src != dst || self_loops {
            edges.push((src, dst));
        }
    }
    edges
}
