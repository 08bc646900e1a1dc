use crate::error::GSError;
use crossbeam_utils::thread;
use differential_dataflow::hashable::Hashable;
use itertools::Itertools;
use lp_api::NodeId;
use std::any::Any;
use std::num::NonZeroUsize;

/// Returns the partition that owns `key` out of `partition_count` partitions.
#[inline]
pub fn partition_index(key: NodeId, partition_count: usize) -> usize {
    // The remainder is always smaller than `partition_count`, which came from a `usize`.
    #[allow(clippy::cast_possible_truncation)]
    let index = (key.hashed() % partition_count as u64) as usize;
    index
}

/// Applies `logic` to every partition, spreading the partitions over at most `threads` scoped
/// worker threads. Results are returned in partition order. A panicking worker is reported as
/// `GSError::Worker` after all other workers have finished.
pub fn run_partitions<T, U, F>(
    partitions: Vec<T>,
    threads: NonZeroUsize,
    logic: F,
) -> Result<Vec<U>, GSError>
where
    T: Send,
    U: Send,
    F: Fn(usize, T) -> U + Sync,
{
    if partitions.is_empty() {
        return Ok(Vec::new());
    }
    // Even a single partition runs on a scoped thread so that its panic can be caught.
    let thread_count = std::cmp::min(threads.get(), partitions.len());

    // Round-robin assignment keeps the per-thread load even when partitions are skewed by index.
    let mut chunks = (0..thread_count).map(|_| Vec::new()).collect_vec();
    for (index, partition) in partitions.into_iter().enumerate() {
        chunks[index % thread_count].push((index, partition));
    }

    let logic = &logic;
    let chunk_results = thread::scope(|s| {
        let handles = chunks
            .into_iter()
            .map(|chunk| {
                s.spawn(move |_| {
                    chunk
                        .into_iter()
                        .map(|(index, partition)| (index, logic(index, partition)))
                        .collect_vec()
                })
            })
            .collect_vec();
        handles
            .into_iter()
            .map(|handle| {
                handle.join().map_err(|e| {
                    GSError::Worker(format!("Partition worker panicked: {}", panic_message(&*e)))
                })
            })
            .collect::<Result<Vec<_>, _>>()
    })
    .map_err(|e| GSError::Worker(format!("Worker scope failed: {}", panic_message(&*e))))??;

    let mut results = chunk_results.into_iter().flatten().collect_vec();
    results.sort_unstable_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
