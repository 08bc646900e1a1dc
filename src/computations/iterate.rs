use lp_api::{ConvergenceCounter, MapReduceJob, NodeId, Pair};

/// One round of minimum-label propagation. Every group is scanned for its minimum.
#[derive(Debug, Default, Copy, Clone)]
pub struct Iterate;

/// Same propagation as `Iterate`, but the runtime hands over the values of every group in ascending
/// order so that the minimum is read from the front of the group.
#[derive(Debug, Default, Copy, Clone)]
pub struct IterateSecondarySorting;

/// Emits each edge in both directions.
#[inline]
fn emit_both_directions(pair: Pair, output: &mut Vec<Pair>) {
    output.push(pair);
    output.push((pair.1, pair.0));
}

/// Relabels `key` and all its neighbors to `min`, which has to be smaller than `key`. Every
/// re-pairing of a neighbor is a new pair and is counted.
#[inline]
fn propagate(
    key: NodeId,
    min: NodeId,
    values: &[NodeId],
    counter: &ConvergenceCounter,
    output: &mut Vec<Pair>,
) {
    output.push((key, min));
    for &value in values {
        if value != min {
            counter.increment();
            output.push((value, min));
        }
    }
}

/// A group made only of self-loops is a node without any other neighbor. It keeps itself as its
/// label so that it still counts as a component.
#[inline]
fn keep_isolated(key: NodeId, output: &mut Vec<Pair>) {
    output.push((key, key));
}

impl MapReduceJob for Iterate {
    fn name(&self) -> &'static str {
        "Iterate"
    }

    fn map(&self, pair: Pair, output: &mut Vec<Pair>) {
        emit_both_directions(pair, output);
    }

    fn reduce(
        &self,
        key: NodeId,
        values: &[NodeId],
        counter: &ConvergenceCounter,
        output: &mut Vec<Pair>,
    ) {
        let min = values.iter().copied().fold(key, std::cmp::min);
        if min < key {
            propagate(key, min, values, counter, output);
        } else if values.iter().all(|&value| value == key) {
            keep_isolated(key, output);
        }
    }
}

impl MapReduceJob for IterateSecondarySorting {
    fn name(&self) -> &'static str {
        "IterateSecondarySorting"
    }

    fn map(&self, pair: Pair, output: &mut Vec<Pair>) {
        emit_both_directions(pair, output);
    }

    fn sorts_values(&self) -> bool {
        true
    }

    fn reduce(
        &self,
        key: NodeId,
        values: &[NodeId],
        counter: &ConvergenceCounter,
        output: &mut Vec<Pair>,
    ) {
        debug_assert!(values.windows(2).all(|w| w[0] <= w[1]), "Group values are not sorted");
        match (values.first(), values.last()) {
            (Some(&first), _) if first < key => propagate(key, first, values, counter, output),
            (_, Some(&last)) if last == key => keep_isolated(key, output),
            _ => (),
        }
    }
}
