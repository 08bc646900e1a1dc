use crate::computations::engine::{ConnectedComponents, EngineState};
use crate::computations::reference::{count_components, traversal_labels};
use crate::computations::{compare_labels, Labels};
use crate::config::{DedupMode, EngineConfig, IterateStrategy};
use crate::error::GSError;
use crate::graph::generator::random_edges;
use hashbrown::HashSet;
use lp_api::{ConvergenceCounter, MapReduceJob, NodeId, Pair};

/// Every combination of strategy, dedup mode and parallelism the engine supports.
fn configs() -> Vec<EngineConfig> {
    let mut configs = Vec::new();
    for &strategy in &[IterateStrategy::Plain, IterateStrategy::SecondarySorting] {
        for &dedup in &[DedupMode::GroupReduce, DedupMode::Distinct] {
            for &(threads, partitions) in &[(1, 1), (1, 3), (4, 4), (3, 8)] {
                configs.push(
                    EngineConfig::default()
                        .with_strategy(strategy)
                        .with_dedup(dedup)
                        .with_threads(threads)
                        .and_then(|config| config.with_partitions(partitions))
                        .expect("Valid engine config"),
                );
            }
        }
    }
    configs
}

fn converged_labels(edges: &[Pair], config: EngineConfig) -> (Labels, usize, usize) {
    let mut engine = ConnectedComponents::from_edges(edges.to_vec(), config);
    let rounds = engine.iterate_all(config.dedup.use_distinct()).expect("Should converge");
    let components = engine.number_of_connected_components().expect("Should count");
    (engine.labels().expect("Engine is loaded"), components, rounds)
}

fn labels_of(pairs: &[(u64, u64)]) -> Labels {
    pairs.iter().copied().collect()
}

#[test]
fn single_edge() {
    for config in configs() {
        let mut engine = ConnectedComponents::from_edges(vec![(1, 2)], config);
        assert_eq!(engine.iterate(config.dedup.use_distinct()).expect("Round should run"), 0);
        assert_eq!(engine.collect().expect("Engine is loaded"), vec![(2, 1)]);

        let (labels, components, _) = converged_labels(&[(1, 2)], config);
        assert_eq!(labels, labels_of(&[(1, 1), (2, 1)]));
        assert_eq!(components, 1);
    }
}

#[test]
fn two_edges() {
    for config in configs() {
        let (labels, components, _) = converged_labels(&[(1, 2), (3, 4)], config);
        assert_eq!(labels, labels_of(&[(1, 1), (2, 1), (3, 3), (4, 3)]));
        assert_eq!(components, 2);
    }
}

#[test]
fn chain_needs_several_rounds() {
    for config in configs() {
        let (labels, components, rounds) = converged_labels(&[(1, 2), (2, 3), (3, 4)], config);
        assert_eq!(labels, labels_of(&[(1, 1), (2, 1), (3, 1), (4, 1)]));
        assert_eq!(components, 1);
        assert!(rounds > 1, "Chain converged in {} rounds", rounds);
    }
}

#[test]
fn triangle_and_isolated_edge() {
    for config in configs() {
        let edges = [(5, 6), (6, 7), (7, 5), (8, 9)];
        let (labels, components, _) = converged_labels(&edges, config);
        assert_eq!(labels, labels_of(&[(5, 5), (6, 5), (7, 5), (8, 8), (9, 8)]));
        assert_eq!(components, 2);
    }
}

#[test]
fn self_loops_define_components() {
    for config in configs() {
        let edges = [(7, 7), (1, 1), (1, 2), (4, 3), (3, 3)];
        let (labels, components, _) = converged_labels(&edges, config);
        assert_eq!(labels, labels_of(&[(1, 1), (2, 1), (3, 3), (4, 3), (7, 7)]));
        assert_eq!(components, 3);
    }
}

#[test]
fn converged_engine_is_a_fixed_point() {
    for config in configs() {
        let edges = random_edges(60, 70, Some(11), false).expect("Valid bounds");
        let mut engine = ConnectedComponents::from_edges(edges, config);
        let use_distinct = config.dedup.use_distinct();
        engine.iterate_all(use_distinct).expect("Should converge");
        assert_eq!(engine.state(), EngineState::Converged);

        let labels = engine.labels().expect("Engine is loaded");
        let label_set = labels.values().copied().collect::<HashSet<_>>();
        assert_eq!(engine.iterate(use_distinct).expect("Round should run"), 0);
        let after = engine.labels().expect("Engine is loaded");
        assert_eq!(after.values().copied().collect::<HashSet<_>>(), label_set);
        assert_eq!(after, labels);
        assert_eq!(engine.state(), EngineState::Converged);
    }
}

#[test]
fn rounds_produce_sets_and_labels_never_grow() {
    for config in configs() {
        let edges = random_edges(80, 90, Some(3), true).expect("Valid bounds");
        let mut engine = ConnectedComponents::from_edges(edges, config);
        let mut previous = engine.labels().expect("Engine is loaded");
        for _ in 0..100 {
            let new_pairs = engine.iterate(config.dedup.use_distinct()).expect("Round should run");

            let pairs = engine.collect().expect("Engine is loaded");
            let distinct = pairs.iter().collect::<HashSet<_>>();
            assert_eq!(distinct.len(), pairs.len(), "Duplicate pairs after a round");

            let labels = engine.labels().expect("Engine is loaded");
            assert_eq!(labels.len(), previous.len(), "Nodes appeared or disappeared");
            for (node, label) in &labels {
                assert!(label <= node);
                assert!(label <= &previous[node], "Label of {} went up", node);
            }
            previous = labels;
            if new_pairs == 0 {
                break;
            }
        }
        assert_eq!(engine.rounds().last().map(|round| round.new_pairs), Some(0));
    }
}

#[test]
fn random_graphs_match_traversal() {
    for seed in 0..20 {
        let nodes = 20 + seed * 15;
        let edges = random_edges(nodes, (nodes as usize) * 2 / 3, Some(seed), seed % 2 == 0)
            .expect("Valid bounds");
        let expected = traversal_labels(&edges);
        for config in configs() {
            let (labels, components, _) = converged_labels(&edges, config);
            compare_labels("engine", &labels, "traversal", &expected)
                .expect("Labels should match the traversal");
            assert_eq!(components, count_components(&expected));
        }
    }
}

#[test]
fn component_count_converges_first() {
    let config = EngineConfig::default();
    let mut engine =
        ConnectedComponents::from_edges(vec![(4, 3), (3, 2), (2, 1), (9, 10)], config);
    assert_eq!(engine.state(), EngineState::Loaded);
    assert_eq!(engine.number_of_connected_components().expect("Should count"), 2);
    assert!(engine.is_converged());
    assert_eq!(engine.component_sizes().expect("Engine is loaded"), vec![(1, 4), (9, 2)]);
}

#[test]
fn manual_rounds_report_progress() {
    let config = EngineConfig::default().with_strategy(IterateStrategy::SecondarySorting);
    let mut engine = ConnectedComponents::from_edges(vec![(1, 2), (2, 3), (3, 4)], config);
    assert_eq!(engine.iterate(false).expect("Round should run"), 2);
    assert_eq!(engine.state(), EngineState::Converging);
    assert_eq!(engine.rounds().len(), 1);
    assert_eq!(engine.rounds()[0].new_pairs, 2);
    assert_eq!(engine.rounds()[0].pairs, 5);
    assert_eq!(
        engine.collect().expect("Engine is loaded"),
        vec![(2, 1), (3, 1), (3, 2), (4, 2), (4, 3)]
    );
}

#[test]
fn empty_graph() {
    for config in configs() {
        let mut engine = ConnectedComponents::from_edges(Vec::new(), config);
        assert_eq!(engine.iterate(true).expect("Round should run"), 0);
        assert_eq!(engine.number_of_connected_components().expect("Should count"), 0);
        assert!(engine.labels().expect("Engine is loaded").is_empty());
        assert!(engine.rounds().is_empty());
    }
}

#[test]
fn not_loaded() {
    let mut engine = ConnectedComponents::new(EngineConfig::default());
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert!(matches!(engine.iterate(false), Err(GSError::NotLoaded)));
    assert!(matches!(engine.iterate_all(false), Err(GSError::NotLoaded)));
    assert!(matches!(engine.number_of_connected_components(), Err(GSError::NotLoaded)));
    assert!(matches!(engine.labels(), Err(GSError::NotLoaded)));
}

#[test]
fn round_limit_fails_loudly() {
    let config = EngineConfig::default().with_max_rounds(Some(1));
    let mut engine = ConnectedComponents::from_edges(vec![(1, 2), (2, 3), (3, 4)], config);
    match engine.iterate_all(false) {
        Err(GSError::NotConverged(rounds, new_pairs)) => {
            assert_eq!(rounds, 1);
            assert_eq!(new_pairs, 2);
        }
        other => panic!("Expected a convergence error, got {:?}", other),
    }
    assert!(!engine.is_converged());

    // The same chain converges in four rounds once the limit is lifted.
    let mut engine = ConnectedComponents::from_edges(
        vec![(1, 2), (2, 3), (3, 4)],
        EngineConfig::default().with_max_rounds(None),
    );
    assert_eq!(engine.iterate_all(false).expect("Should converge"), 4);
}

#[test]
fn reload_resets_state() {
    let mut engine = ConnectedComponents::from_edges(vec![(1, 2)], EngineConfig::default());
    assert_eq!(engine.number_of_connected_components().expect("Should count"), 1);
    engine.load(vec![(1, 2), (3, 4), (5, 6)]);
    assert_eq!(engine.state(), EngineState::Loaded);
    assert!(engine.rounds().is_empty());
    assert_eq!(engine.number_of_connected_components().expect("Should count"), 3);
}

/// Propagation job whose reduce panics on node 3.
struct PanickingJob;

impl MapReduceJob for PanickingJob {
    fn name(&self) -> &'static str {
        "Panicking"
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
        if key == 3 {
            panic!("Cannot reduce node {}", key);
        }
        output.extend(values.iter().map(|&value| (key, value)));
    }
}

#[test]
fn worker_fault_unloads_engine() {
    for config in configs() {
        let mut engine = ConnectedComponents::from_edges(vec![(1, 2), (3, 4)], config)
            .with_iterate_job(Box::new(PanickingJob));
        match engine.iterate(config.dedup.use_distinct()) {
            Err(GSError::Worker(message)) => assert!(message.contains("Cannot reduce node 3")),
            other => panic!("Expected a worker error, got {:?}", other),
        }
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(engine.rounds().is_empty());
        assert!(matches!(engine.collect(), Err(GSError::NotLoaded)));
        assert!(matches!(engine.iterate_all(false), Err(GSError::NotLoaded)));
    }
}

#[test]
fn round_time_sums_all_rounds() {
    let mut engine =
        ConnectedComponents::from_edges(vec![(1, 2), (2, 3), (3, 4)], EngineConfig::default());
    engine.iterate_all(false).expect("Should converge");
    let longest = engine.rounds().iter().map(|round| round.elapsed).max().expect("Rounds ran");
    assert!(engine.round_time() >= longest);
    engine.load(vec![(1, 2)]);
    assert_eq!(engine.round_time(), Default::default());
}
