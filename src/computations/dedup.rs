use hashbrown::HashSet;
use lp_api::{ConvergenceCounter, MapReduceJob, NodeId, Pair};

/// Removes duplicate pairs: identity map, and a reduce that emits every distinct value of a group
/// once.
#[derive(Debug, Default, Copy, Clone)]
pub struct Dedup;

impl MapReduceJob for Dedup {
    fn name(&self) -> &'static str {
        "Dedup"
    }

    fn map(&self, pair: Pair, output: &mut Vec<Pair>) {
        output.push(pair);
    }

    fn reduce(
        &self,
        key: NodeId,
        values: &[NodeId],
        _counter: &ConvergenceCounter,
        output: &mut Vec<Pair>,
    ) {
        let mut seen = HashSet::with_capacity(values.len());
        for &value in values {
            if seen.insert(value) {
                output.push((key, value));
            }
        }
    }
}
