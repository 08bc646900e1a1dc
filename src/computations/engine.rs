use crate::collection::KeyedCollection;
use crate::computations::dedup::Dedup;
use crate::computations::iterate::{Iterate, IterateSecondarySorting};
use crate::config::{EngineConfig, IterateStrategy};
use crate::error::GSError;
use crate::util::memory_usage::print_memory_usage;
use crate::util::timer::{GsDuration, GsTimer};
use hashbrown::HashMap;
use log::{debug, info, warn};
use lp_api::{ConvergenceCounter, MapReduceJob, NodeId, Pair};
use std::collections::BTreeMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EngineState {
    Uninitialized,
    Loaded,
    Converging,
    Converged,
}

/// Statistics of a single `iterate` round.
#[derive(new, Debug, Copy, Clone)]
pub struct RoundStats {
    pub round: usize,
    /// Value of the convergence counter at the end of the round.
    pub new_pairs: u64,
    /// Size of the working collection after deduplication.
    pub pairs: usize,
    pub elapsed: GsDuration,
}

/// Computes connected components by repeated minimum-label propagation rounds over a
/// `KeyedCollection`.
///
/// The working collection starts out as the raw edges. Every round consumes it and replaces it with
/// the round's deduplicated output. Once a round produces no new pairs, every node that is not the
/// minimum of its component is paired with exactly that minimum, and the minimums themselves no
/// longer appear as keys.
pub struct ConnectedComponents {
    config: EngineConfig,
    iterate_job: Box<dyn MapReduceJob>,
    dedup_job: Dedup,
    counter: ConvergenceCounter,
    working: Option<KeyedCollection>,
    state: EngineState,
    rounds: Vec<RoundStats>,
}

impl ConnectedComponents {
    pub fn new(config: EngineConfig) -> Self {
        let iterate_job: Box<dyn MapReduceJob> = match config.strategy {
            IterateStrategy::Plain => Box::new(Iterate),
            IterateStrategy::SecondarySorting => Box::new(IterateSecondarySorting),
        };
        Self {
            config,
            iterate_job,
            dedup_job: Dedup,
            counter: ConvergenceCounter::new(),
            working: None,
            state: EngineState::Uninitialized,
            rounds: Vec::new(),
        }
    }

    pub fn from_edges(edges: Vec<Pair>, config: EngineConfig) -> Self {
        let mut engine = Self::new(config);
        engine.load(edges);
        engine
    }

    /// Replaces the propagation job picked from `EngineConfig::strategy`.
    pub fn with_iterate_job(mut self, iterate_job: Box<dyn MapReduceJob>) -> Self {
        self.iterate_job = iterate_job;
        self
    }

    /// Replaces any previous state with a working collection built from `edges`.
    pub fn load(&mut self, edges: Vec<Pair>) {
        let edge_count = edges.len();
        let working =
            KeyedCollection::from_pairs(edges, self.config.partitions, self.config.threads);
        info!(
            "Loaded {} edges into {} partitions (job: {}, threads: {})",
            edge_count,
            self.config.partitions,
            self.iterate_job.name(),
            self.config.threads
        );
        self.working = Some(working);
        self.state = EngineState::Loaded;
        self.rounds.clear();
        self.counter.reset();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_converged(&self) -> bool {
        self.state == EngineState::Converged
    }

    pub fn rounds(&self) -> &[RoundStats] {
        &self.rounds
    }

    /// Time spent in all rounds since the last `load`.
    pub fn round_time(&self) -> GsDuration {
        self.rounds.iter().map(|round| round.elapsed).sum()
    }

    /// Runs exactly one round and returns the number of new pairs it produced.
    ///
    /// With `use_distinct` the round output is compacted with the runtime's `distinct()`, otherwise
    /// with a full map, group-by-key and reduce pass of the dedup job. If the round fails, the
    /// working collection is lost and the engine goes back to `Uninitialized`.
    pub fn iterate(&mut self, use_distinct: bool) -> Result<u64, GSError> {
        let working = self.working.take().ok_or(GSError::NotLoaded)?;
        if working.is_empty() {
            self.working = Some(working);
            return Ok(0);
        }
        if self.state == EngineState::Loaded {
            self.state = EngineState::Converging;
        }

        let timer = GsTimer::now();
        self.counter.reset();
        let next = match self.run_round(working, use_distinct) {
            Ok(next) => next,
            Err(e) => {
                self.state = EngineState::Uninitialized;
                return Err(e);
            }
        };
        let new_pairs = self.counter.value();

        let stats = RoundStats::new(self.rounds.len() + 1, new_pairs, next.len(), timer.elapsed());
        info!(
            "Round {:>3}: {} new pairs, {} pairs left in {}",
            stats.round,
            stats.new_pairs,
            stats.pairs,
            stats.elapsed.to_millis_string()
        );
        debug!("Round {:>3} partition sizes: {:?}", stats.round, next.partition_sizes());
        self.rounds.push(stats);
        self.working = Some(next);
        if new_pairs > 0 {
            self.state = EngineState::Converging;
        }
        Ok(new_pairs)
    }

    fn run_round(
        &self,
        working: KeyedCollection,
        use_distinct: bool,
    ) -> Result<KeyedCollection, GSError> {
        let iterate_job = &*self.iterate_job;
        let counter = &self.counter;

        let grouped =
            working.flat_map(|pair, output| iterate_job.map(pair, output))?.group_by_key()?;
        let grouped = if iterate_job.sorts_values() { grouped.sort_values()? } else { grouped };
        let propagated = grouped.reduce(|key, values, output| {
            iterate_job.reduce(key, values, counter, output);
        })?;

        if use_distinct {
            propagated.distinct()
        } else {
            let dedup_job = &self.dedup_job;
            propagated
                .flat_map(|pair, output| dedup_job.map(pair, output))?
                .group_by_key()?
                .reduce(|key, values, output| dedup_job.reduce(key, values, counter, output))
        }
    }

    /// Runs rounds until one of them produces no new pairs and returns the number of rounds run.
    ///
    /// Fails with `GSError::NotConverged` once the configured maximum number of rounds has been
    /// reached without convergence.
    pub fn iterate_all(&mut self, use_distinct: bool) -> Result<usize, GSError> {
        if self.working.is_none() {
            return Err(GSError::NotLoaded);
        }
        let timer = GsTimer::now();
        let mut rounds = 0;
        let mut last_new_pairs = 0;
        loop {
            if let Some(max_rounds) = self.config.max_rounds {
                if rounds >= max_rounds {
                    warn!("Giving up after {} rounds without convergence", rounds);
                    return Err(GSError::NotConverged(rounds, last_new_pairs));
                }
            }
            let new_pairs = self.iterate(use_distinct)?;
            rounds += 1;
            if new_pairs == 0 {
                break;
            }
            last_new_pairs = new_pairs;
        }
        self.state = EngineState::Converged;
        info!(
            "Converged after {} rounds in {} ({} per round)",
            rounds,
            timer.elapsed().to_seconds_string(),
            self.round_time().average(self.rounds.len()).to_millis_string()
        );
        print_memory_usage(format_args!("converged"));
        Ok(rounds)
    }

    /// Converges if needed, then counts the distinct labels of the working collection.
    pub fn number_of_connected_components(&mut self) -> Result<usize, GSError> {
        if !self.is_converged() {
            self.iterate_all(self.config.dedup.use_distinct())?;
        }
        let working = self.working.as_ref().ok_or(GSError::NotLoaded)?;
        let components =
            working.clone().map(|(node, label)| (label, node))?.group_by_key()?.len();
        info!("Found {} connected components", components);
        Ok(components)
    }

    /// The working collection as an ordered list of pairs.
    pub fn collect(&self) -> Result<Vec<Pair>, GSError> {
        Ok(self.working.as_ref().ok_or(GSError::NotLoaded)?.collect())
    }

    /// The best known label of every node seen so far.
    ///
    /// A node's label is the smallest of itself and the values it is paired with. Nodes that only
    /// appear as values, such as the minimums of converged components, are labeled with themselves.
    pub fn labels(&self) -> Result<BTreeMap<NodeId, NodeId>, GSError> {
        let pairs = self.collect()?;
        let mut labels = BTreeMap::new();
        for &(node, value) in &pairs {
            let label = labels.entry(node).or_insert(node);
            if value < *label {
                *label = value;
            }
        }
        for &(_, value) in &pairs {
            labels.entry(value).or_insert(value);
        }
        Ok(labels)
    }

    /// Number of nodes per component label, largest components first.
    pub fn component_sizes(&self) -> Result<Vec<(NodeId, usize)>, GSError> {
        let mut sizes: HashMap<NodeId, usize> = HashMap::new();
        for label in self.labels()?.values() {
            *sizes.entry(*label).or_insert(0) += 1;
        }
        let mut sizes = sizes.into_iter().collect::<Vec<_>>();
        sizes.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(sizes)
    }
}
