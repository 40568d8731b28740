//! Fixed-pool parallel map over a slice.
//!
//! Workers pull index ranges from a shared cursor, compute their chunk
//! locally and merge the results under one lock, so contention stays at
//! chunk granularity no matter how cheap the per-item work is.

use std::sync::Mutex;
use std::thread;

const WORKERS: usize = 5;
const CHUNK: usize = 500;

/// Applies `f` to every item on the default pool, preserving order.
pub fn parallel_map<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    parallel_map_with(items, WORKERS, CHUNK, f)
}

pub fn parallel_map_with<T, R, F>(items: &[T], workers: usize, chunk: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let workers = workers.max(1);
    let chunk = chunk.max(1);

    let cursor = Mutex::new(0usize);
    let results: Mutex<Vec<Option<R>>> = Mutex::new((0..items.len()).map(|_| None).collect());
    let f = &f;

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let start = {
                    let Ok(mut guard) = cursor.lock() else {
                        return;
                    };
                    let start = *guard;
                    *guard = (start + chunk).min(items.len());
                    start
                };
                if start >= items.len() {
                    return;
                }
                let end = (start + chunk).min(items.len());
                let batch: Vec<(usize, R)> = (start..end)
                    .map(|index| (index, f(&items[index])))
                    .collect();
                let Ok(mut guard) = results.lock() else {
                    return;
                };
                for (index, value) in batch {
                    guard[index] = Some(value);
                }
            });
        }
    });

    results
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .into_iter()
        .flatten()
        .collect()
}
