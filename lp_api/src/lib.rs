mod counter;

// Public exports from root of the crate.
pub use counter::ConvergenceCounter;

// Universally used types.
pub type NodeId = u64;
pub type Pair = (NodeId, NodeId);
pub type Group = (NodeId, Vec<NodeId>);
pub type DiffCount = isize;

/// The primary trait of the label propagation API, used to define one map/reduce job over a
/// collection of `(NodeId, NodeId)` pairs.
///
/// The runtime applies `map` to every pair, groups the mapped pairs by key, optionally sorts each
/// group's values in ascending order (see `sorts_values`) and then calls `reduce` once per group.
/// Both functions must be pure apart from increments of the `ConvergenceCounter`, since the runtime
/// is free to call them concurrently from several worker threads.
///
/// # Examples
/// ```
/// use lp_api::{ConvergenceCounter, MapReduceJob, NodeId, Pair};
///
/// struct Reverse;
///
/// impl MapReduceJob for Reverse {
///     fn name(&self) -> &'static str {
///         "Reverse"
///     }
///
///     fn map(&self, pair: Pair, output: &mut Vec<Pair>) {
///         output.push((pair.1, pair.0));
///     }
///
///     fn reduce(
///         &self,
///         key: NodeId,
///         values: &[NodeId],
///         _counter: &ConvergenceCounter,
///         output: &mut Vec<Pair>,
///     ) {
///         output.extend(values.iter().map(|&value| (key, value)));
///     }
/// }
///
/// let mut output = Vec::new();
/// Reverse.map((1, 2), &mut output);
/// assert_eq!(output, vec![(2, 1)]);
/// ```
pub trait MapReduceJob: Send + Sync {
    /// Name used in log messages.
    fn name(&self) -> &'static str;

    fn map(&self, pair: Pair, output: &mut Vec<Pair>);

    /// Whether the values of each group have to be sorted in ascending order before `reduce`.
    fn sorts_values(&self) -> bool {
        false
    }

    fn reduce(
        &self,
        key: NodeId,
        values: &[NodeId],
        counter: &ConvergenceCounter,
        output: &mut Vec<Pair>,
    );
}
