use crate::util::timer::GsTimer;
use differential_dataflow::input::Input;
use differential_dataflow::lattice::Lattice;
use differential_dataflow::operators::consolidate::Consolidate;
use differential_dataflow::operators::iterate::Iterate;
use differential_dataflow::operators::join::Join;
use differential_dataflow::operators::reduce::Reduce;
use differential_dataflow::Collection;
use log::debug;
use lp_api::{DiffCount, Pair};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::sync::Arc;
use timely::dataflow::operators::probe::Handle;
use timely::dataflow::Scope;
use timely::Configuration;

type WorkerResults = Vec<Result<Vec<(Pair, DiffCount)>, String>>;

/// Labels every node with the smallest node id reachable from it.
///
/// The operator pipeline and its comments are adapted from the connected components example of
/// [Differential Dataflow](https://github.com/TimelyDataflow/differential-dataflow/blob/master/examples/cc.rs),
/// with the edge type fixed to `(u64, u64)`. Labels enter the iteration in order of their bit
/// length, so small labels settle before large ones are introduced.
pub fn propagate_min_labels<G: Scope>(edges: &Collection<G, Pair>) -> Collection<G, Pair>
where
    G::Timestamp: Lattice + Ord,
{
    // Seed the smaller endpoint of every edge with its own id.
    let nodes = edges
        .map_in_place(|pair| {
            let min = std::cmp::min(pair.0, pair.1);
            *pair = (min, min);
        })
        .consolidate();

    // Labels travel both ways along an edge.
    let edges = edges.map_in_place(|x| std::mem::swap(&mut x.0, &mut x.1)).concat(edges);

    nodes.filter(|_| false).iterate(|inner| {
        let edges = edges.enter(&inner.scope());
        // Introduce small labels first.
        let nodes =
            nodes.enter_at(&inner.scope(), |r| 256 * (64 - u64::from(r.1.leading_zeros())));

        inner.join_map(&edges, |_k, l, d| (*d, *l)).concat(&nodes).reduce(|_, s, t| {
            t.push((*s[0].0, 1));
        })
    })
}

/// Feeds `edges` to `threads` timely workers, each loading an equal slice, and returns the
/// `(label pair, diff)` updates observed by every worker.
pub fn run(edges: Vec<Pair>, threads: NonZeroUsize) -> Result<WorkerResults, String> {
    let edges = Arc::new(edges);
    let guards = timely::execute(Configuration::Process(threads.get()), move |worker| {
        let worker_index = worker.index();
        let worker_count = worker.peers();
        let timer = GsTimer::now();

        let results = Rc::new(RefCell::new(Vec::new()));
        let mut probe = Handle::new();
        let mut input = worker.dataflow::<usize, _, _>(|scope| {
            let (input, edges) = scope.new_collection::<Pair, DiffCount>();
            let sink = Rc::clone(&results);
            propagate_min_labels(&edges)
                .inspect(move |(pair, _time, diff)| sink.borrow_mut().push((*pair, *diff)))
                .probe_with(&mut probe);
            input
        });

        let (left_index, right_index) = get_worker_indices(edges.len(), worker_index, worker_count);
        for edge in &edges[left_index..right_index] {
            input.insert(*edge);
        }
        input.close();

        while !probe.done() {
            worker.step();
        }
        debug!(
            "[worker {:>2}] labeled {} edges in {}",
            worker_index,
            right_index - left_index,
            timer.elapsed().to_seconds_string()
        );

        let output: Vec<(Pair, DiffCount)> = results.borrow_mut().drain(..).collect();
        output
    })?;
    Ok(guards.join())
}

#[inline]
fn get_worker_indices(
    total_len: usize,
    worker_index: usize,
    worker_count: usize,
) -> (usize, usize) {
    let data_per_worker = total_len / worker_count;
    let left_index = data_per_worker * worker_index;
    let right_index = if (worker_index + 1) == worker_count {
        // Handle extra elements.
        total_len
    } else {
        data_per_worker * (worker_index + 1)
    };
    (left_index, right_index)
}

#[cfg(test)]
mod tests {
    use super::get_worker_indices;

    #[test]
    fn worker_slices_cover_everything() {
        assert_eq!(get_worker_indices(10, 0, 3), (0, 3));
        assert_eq!(get_worker_indices(10, 1, 3), (3, 6));
        assert_eq!(get_worker_indices(10, 2, 3), (6, 10));
        assert_eq!(get_worker_indices(2, 0, 4), (0, 0));
        assert_eq!(get_worker_indices(2, 3, 4), (0, 2));
    }
}
