use crate::config::EdgeSource;
use crate::error::GSError;
use crate::util::io::deserialize_object;
use crate::util::timer::GsTimer;
use log::info;
use lp_api::Pair;

pub mod edge_list;
pub mod generator;

/// Materializes the edges of `source` in memory.
pub fn load_edges(source: &EdgeSource) -> Result<Vec<Pair>, GSError> {
    let timer = GsTimer::now();
    let edges = match source {
        EdgeSource::Pairs(pairs) => pairs.clone(),
        EdgeSource::EdgeList { path, separator } => {
            info!("Loading edges from file '{}'", path);
            edge_list::read_edge_list(path, *separator)?
        }
        EdgeSource::Binary { path } => deserialize_object(path)?,
        EdgeSource::Random { nodes, edges, seed, self_loops } => {
            info!("Generating {} random edges over {} nodes", edges, nodes);
            generator::random_edges(*nodes, *edges, *seed, *self_loops)?
        }
    };
    info!("{} edges ready in {}", edges.len(), timer.elapsed().to_seconds_string());
    Ok(edges)
}
