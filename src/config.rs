use crate::error::GSError;
use std::num::NonZeroUsize;

pub const DEFAULT_MAX_ROUNDS: usize = 10_000;

/// Which reduce variant propagates the labels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IterateStrategy {
    /// Scan every group for its minimum.
    Plain,
    /// Sort the values of each group first and read the minimum from the front.
    SecondarySorting,
}

/// How the output of an iterate round is compacted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DedupMode {
    /// The runtime's `distinct()` operator.
    Distinct,
    /// A full map, group-by-key and reduce pass of the dedup job.
    GroupReduce,
}

impl DedupMode {
    pub fn use_distinct(self) -> bool {
        self == DedupMode::Distinct
    }
}

#[derive(new, Debug, Copy, Clone)]
pub struct EngineConfig {
    pub strategy: IterateStrategy,
    pub dedup: DedupMode,
    /// `None` disables the round limit.
    pub max_rounds: Option<usize>,
    pub threads: NonZeroUsize,
    pub partitions: NonZeroUsize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let one = NonZeroUsize::new(1).expect("Unreachable");
        EngineConfig {
            strategy: IterateStrategy::Plain,
            dedup: DedupMode::GroupReduce,
            max_rounds: Some(DEFAULT_MAX_ROUNDS),
            threads: one,
            partitions: one,
        }
    }
}

impl EngineConfig {
    pub fn with_strategy(mut self, strategy: IterateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: Option<usize>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Sets the worker thread count. The partition count follows it unless it was set to a larger
    /// value before.
    pub fn with_threads(mut self, threads: usize) -> Result<Self, GSError> {
        self.threads = NonZeroUsize::new(threads)
            .ok_or_else(|| GSError::Config("Thread count should be at least 1".to_owned()))?;
        if self.partitions < self.threads {
            self.partitions = self.threads;
        }
        Ok(self)
    }

    pub fn with_partitions(mut self, partitions: usize) -> Result<Self, GSError> {
        self.partitions = NonZeroUsize::new(partitions)
            .ok_or_else(|| GSError::Config("Partition count should be at least 1".to_owned()))?;
        Ok(self)
    }
}

/// Where the edges of the input graph come from.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeSource {
    Pairs(Vec<(u64, u64)>),
    /// A delimited text file with `<node><separator><node>` per line.
    EdgeList { path: String, separator: u8 },
    /// A bincode-serialized `Vec<(u64, u64)>`.
    Binary { path: String },
    Random { nodes: u64, edges: usize, seed: Option<u64>, self_loops: bool },
}

/// Everything `crate::run` needs for a complete command line run.
#[derive(new, Debug, Clone)]
pub struct RunConfig {
    pub source: EdgeSource,
    pub engine: EngineConfig,
    /// Writes `node,label` lines, or bincode when the path ends in `.bin`.
    pub output: Option<String>,
    /// Logs every `(node, label)` pair.
    pub print_labels: bool,
    /// Cross-checks the labels against the reference implementations.
    pub verify: bool,
}
