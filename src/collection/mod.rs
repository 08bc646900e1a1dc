//! A small in-process runtime for keyed batch collections.
//!
//! Records live in a fixed number of partitions. Operators that depend on keys (`group_by_key`,
//! `distinct`) first shuffle every record to the partition owning its key, after which each
//! partition is processed independently on a pool of scoped worker threads. Every operator consumes
//! the collection by value and returns a new one.

use crate::error::GSError;
use hashbrown::HashMap;
use itertools::Itertools;
use log::trace;
use lp_api::{Group, NodeId, Pair};
use std::num::NonZeroUsize;

pub mod workers;

use workers::{partition_index, run_partitions};

#[derive(Debug, Clone)]
pub struct KeyedCollection {
    partitions: Vec<Vec<Pair>>,
    threads: NonZeroUsize,
}

/// The output of `KeyedCollection::group_by_key`: every key appears in exactly one group.
#[derive(Debug, Clone)]
pub struct GroupedCollection {
    partitions: Vec<Vec<Group>>,
    threads: NonZeroUsize,
}

impl KeyedCollection {
    /// Creates a collection from `pairs`, placing each pair in the partition owning its key.
    pub fn from_pairs(pairs: Vec<Pair>, partitions: NonZeroUsize, threads: NonZeroUsize) -> Self {
        let partition_count = partitions.get();
        let mut placed = (0..partition_count).map(|_| Vec::new()).collect_vec();
        for pair in pairs {
            placed[partition_index(pair.0, partition_count)].push(pair);
        }
        Self { partitions: placed, threads }
    }

    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    pub fn partition_sizes(&self) -> Vec<usize> {
        self.partitions.iter().map(Vec::len).collect()
    }

    pub fn flat_map<F>(self, logic: F) -> Result<Self, GSError>
    where
        F: Fn(Pair, &mut Vec<Pair>) + Sync,
    {
        let partitions = run_partitions(self.partitions, self.threads, |_, partition| {
            let mut output = Vec::with_capacity(partition.len());
            for pair in partition {
                logic(pair, &mut output);
            }
            output
        })?;
        Ok(Self { partitions, threads: self.threads })
    }

    pub fn map<F>(self, logic: F) -> Result<Self, GSError>
    where
        F: Fn(Pair) -> Pair + Sync,
    {
        let partitions = run_partitions(self.partitions, self.threads, |_, partition| {
            partition.into_iter().map(&logic).collect_vec()
        })?;
        Ok(Self { partitions, threads: self.threads })
    }

    pub fn group_by_key(self) -> Result<GroupedCollection, GSError> {
        let threads = self.threads;
        let partitions = run_partitions(self.shuffle()?, threads, |_, partition| {
            let mut groups: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
            for (key, value) in partition {
                groups.entry(key).or_insert_with(Vec::new).push(value);
            }
            groups.into_iter().collect_vec()
        })?;
        Ok(GroupedCollection { partitions, threads })
    }

    /// Sorts every partition by key, then by value.
    pub fn sort_by_key(self) -> Result<Self, GSError> {
        let partitions = run_partitions(self.partitions, self.threads, |_, mut partition| {
            partition.sort_unstable();
            partition
        })?;
        Ok(Self { partitions, threads: self.threads })
    }

    pub fn distinct(self) -> Result<Self, GSError> {
        let threads = self.threads;
        let partitions = run_partitions(self.shuffle()?, threads, |_, mut partition| {
            partition.sort_unstable();
            partition.dedup();
            partition
        })?;
        Ok(Self { partitions, threads })
    }

    /// Materializes all pairs into a single vector, ordered by key and then value.
    pub fn collect(&self) -> Vec<Pair> {
        let mut pairs = self.partitions.iter().flatten().copied().collect_vec();
        pairs.sort_unstable();
        pairs
    }

    /// Moves every pair to the partition owning its key. Identical pairs always end up in the same
    /// partition.
    fn shuffle(self) -> Result<Vec<Vec<Pair>>, GSError> {
        let partition_count = self.partitions.len();
        let buckets = run_partitions(self.partitions, self.threads, |_, partition| {
            let mut buckets = (0..partition_count).map(|_| Vec::new()).collect_vec();
            for pair in partition {
                buckets[partition_index(pair.0, partition_count)].push(pair);
            }
            buckets
        })?;

        let mut shuffled = (0..partition_count).map(|_| Vec::new()).collect_vec();
        for source_buckets in buckets {
            for (index, bucket) in source_buckets.into_iter().enumerate() {
                shuffled[index].extend(bucket);
            }
        }
        trace!(
            "Shuffled into partitions of sizes {:?}",
            shuffled.iter().map(Vec::len).collect_vec()
        );
        Ok(shuffled)
    }
}

impl GroupedCollection {
    /// Number of groups, i.e., distinct keys.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    /// Sorts the values of every group in ascending order.
    pub fn sort_values(self) -> Result<Self, GSError> {
        let partitions = run_partitions(self.partitions, self.threads, |_, mut partition| {
            for (_, values) in &mut partition {
                values.sort_unstable();
            }
            partition
        })?;
        Ok(Self { partitions, threads: self.threads })
    }

    pub fn reduce<F>(self, logic: F) -> Result<KeyedCollection, GSError>
    where
        F: Fn(NodeId, &[NodeId], &mut Vec<Pair>) + Sync,
    {
        let threads = self.threads;
        let partitions = run_partitions(self.partitions, threads, |_, partition| {
            let mut output = Vec::new();
            for (key, values) in partition {
                logic(key, &values, &mut output);
            }
            output
        })?;
        Ok(KeyedCollection { partitions, threads })
    }

    /// Materializes all groups ordered by key.
    #[cfg(test)]
    pub fn collect(&self) -> Vec<Group> {
        self.partitions.iter().flatten().cloned().sorted_by_key(|(key, _)| *key).collect()
    }
}
