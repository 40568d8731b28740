//! Shared engine state.
//!
//! Everything the search needs beyond a board lives here: the Zobrist keys,
//! the lookup tables and the heuristic tables. Built once, then shared
//! read-mostly across every search worker; only the heuristic tables are
//! written after construction, through their own relaxed atomics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::board::zobrist::ZobristKeys;
use crate::movegen::ordering::Heuristics;
use crate::tables::lookup::LookupTables;

pub struct EngineContext {
    pub keys: ZobristKeys,
    pub tables: LookupTables,
    pub heuristics: Heuristics,
}

impl EngineContext {
    pub fn new() -> EngineContext {
        EngineContext {
            keys: ZobristKeys::new(),
            tables: LookupTables::new(),
            heuristics: Heuristics::new(),
        }
    }

    /// Starts table construction on a background thread. Table building
    /// takes a noticeable moment, this lets callers show signs of life
    /// meanwhile.
    pub fn build_in_background() -> PendingContext {
        let ready = Arc::new(AtomicBool::new(false));
        let slot: Arc<Mutex<Option<Arc<EngineContext>>>> = Arc::new(Mutex::new(None));
        {
            let ready = Arc::clone(&ready);
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                let context = Arc::new(EngineContext::new());
                if let Ok(mut guard) = slot.lock() {
                    *guard = Some(context);
                }
                ready.store(true, Ordering::Release);
            });
        }
        PendingContext { ready, slot }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        EngineContext::new()
    }
}

/// Handle to a context being built in the background.
pub struct PendingContext {
    ready: Arc<AtomicBool>,
    slot: Arc<Mutex<Option<Arc<EngineContext>>>>,
}

impl PendingContext {
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Polls until the builder thread publishes the context.
    pub fn wait(&self) -> Arc<EngineContext> {
        loop {
            if self.is_ready() {
                if let Ok(guard) = self.slot.lock() {
                    if let Some(context) = guard.as_ref() {
                        return Arc::clone(context);
                    }
                }
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_build_publishes_a_context() {
        let pending = EngineContext::build_in_background();
        let context = pending.wait();
        assert!(pending.is_ready());
        // tables are usable once published
        assert_eq!(context.tables.knight_masks[0].count_ones(), 2);
    }
}
