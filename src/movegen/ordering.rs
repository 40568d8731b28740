//! Shared move-ordering heuristics: history, countermove and refutation
//! tables.
//!
//! All three tables are written concurrently by the search workers without
//! synchronization beyond relaxed atomics. Entries may be lost or torn
//! between load and store under contention; that is acceptable, the tables
//! only bias move ordering and never affect legality.

use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

use crate::board::chess_types::Color;
use crate::movegen::moves::Move;

const HISTORY_MAX: i32 = 150;
const HISTORY_SIZE: usize = 2 * 64 * 64;
const COUNTER_SIZE: usize = 64 * 64;
pub const REFUTATION_SIZE: usize = (1 << 20) + 7;

const FILLED: u64 = 1 << 63;

pub struct Heuristics {
    history: Vec<AtomicI32>,
    counters: Vec<AtomicU64>,
    refutations: Vec<AtomicU64>,
}

impl Heuristics {
    pub fn new() -> Heuristics {
        Heuristics {
            history: (0..HISTORY_SIZE).map(|_| AtomicI32::new(0)).collect(),
            counters: (0..COUNTER_SIZE).map(|_| AtomicU64::new(0)).collect(),
            refutations: (0..REFUTATION_SIZE).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    #[inline]
    fn history_index(side: Color, mv: &Move) -> usize {
        side.index() * 4096 + mv.source as usize * 64 + mv.dest as usize
    }

    pub fn history_get(&self, side: Color, mv: &Move) -> i32 {
        self.history[Self::history_index(side, mv)].load(Ordering::Relaxed)
    }

    /// Gravity update: repeated rewards saturate at the history cap instead
    /// of growing without bound.
    pub fn history_update(&self, side: Color, mv: &Move, bonus: i32) {
        let slot = &self.history[Self::history_index(side, mv)];
        let clamped = bonus.clamp(-HISTORY_MAX, HISTORY_MAX);
        let current = slot.load(Ordering::Relaxed);
        slot.store(
            current + clamped - current * clamped.abs() / HISTORY_MAX,
            Ordering::Relaxed,
        );
    }

    #[inline]
    fn counter_index(previous: &Move) -> usize {
        previous.source as usize * 64 + previous.dest as usize
    }

    pub fn counter_set(&self, previous: Option<&Move>, counter: &Move, bonus: i32) {
        if let Some(previous) = previous {
            let packed = FILLED | (counter.pack() as u64) << 32 | bonus as u32 as u64;
            self.counters[Self::counter_index(previous)].store(packed, Ordering::Relaxed);
        }
    }

    pub fn counter_get(&self, previous: Option<&Move>, counter: &Move) -> i32 {
        let Some(previous) = previous else {
            return 0;
        };
        let packed = self.counters[Self::counter_index(previous)].load(Ordering::Relaxed);
        if packed & FILLED == 0 {
            return 0;
        }
        if (packed >> 32) as u32 & 0xF_FFFF != counter.pack() {
            return 0;
        }
        packed as u32 as i32
    }

    pub fn refutation_set(&self, zobrist: u32, mv: &Move, bonus: u8) {
        let packed = FILLED
            | (bonus as u64) << 52
            | (mv.pack() as u64) << 32
            | zobrist as u64;
        self.refutations[zobrist as usize % REFUTATION_SIZE].store(packed, Ordering::Relaxed);
    }

    /// The stored cutoff move and its bonus for this position, if any.
    pub fn refutation_get(&self, zobrist: u32) -> Option<(Move, i32)> {
        let packed =
            self.refutations[zobrist as usize % REFUTATION_SIZE].load(Ordering::Relaxed);
        if packed & FILLED == 0 || packed as u32 != zobrist {
            return None;
        }
        let mv = Move::unpack((packed >> 32) as u32 & 0xF_FFFF);
        Some((mv, ((packed >> 52) & 0xFF) as i32))
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Heuristics::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::square_at;

    #[test]
    fn history_rewards_saturate() {
        let heuristics = Heuristics::new();
        let mv = Move::quiet(square_at(6, 0), square_at(5, 2), 0);
        heuristics.history_update(Color::White, &mv, 49);
        assert_eq!(heuristics.history_get(Color::White, &mv), 49);
        for _ in 0..50 {
            heuristics.history_update(Color::White, &mv, 150);
        }
        assert_eq!(heuristics.history_get(Color::White, &mv), HISTORY_MAX);
        // the other side's table is independent
        assert_eq!(heuristics.history_get(Color::Black, &mv), 0);
    }

    #[test]
    fn counter_matches_exact_reply_only() {
        let heuristics = Heuristics::new();
        let previous = Move::pawn_double(square_at(4, 1), square_at(4, 3), 0);
        let reply = Move::quiet(square_at(1, 7), square_at(2, 5), 0);
        heuristics.counter_set(Some(&previous), &reply, 36);
        assert_eq!(heuristics.counter_get(Some(&previous), &reply), 36);
        let other = Move::quiet(square_at(6, 7), square_at(5, 5), 0);
        assert_eq!(heuristics.counter_get(Some(&previous), &other), 0);
        assert_eq!(heuristics.counter_get(None, &reply), 0);
    }

    #[test]
    fn refutation_checks_full_hash() {
        let heuristics = Heuristics::new();
        let mv = Move::strike(square_at(3, 3), square_at(3, 6), 0);
        heuristics.refutation_set(0xDEAD_BEEF, &mv, 100);
        let (found, bonus) = heuristics.refutation_get(0xDEAD_BEEF).unwrap();
        assert_eq!(found, mv);
        assert_eq!(bonus, 100);
        // a colliding slot with a different hash must not match
        assert!(heuristics
            .refutation_get(0xDEAD_BEEFu32.wrapping_add(REFUTATION_SIZE as u32))
            .is_none());
    }
}
