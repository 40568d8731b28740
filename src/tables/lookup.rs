//! Precomputed move and attack tables.
//!
//! Slider tables are magic-indexed: per square and relevant-occupancy subset
//! they hold a priority-sorted quiet move list, the full attack bitboard,
//! and a stop mask. Stops are the squares a ray ends on, first blockers
//! inside the relevance mask plus the untrimmed board-edge ray ends; the
//! generator resolves them against the real occupancy, so one table serves
//! quiet moves, captures and attack queries alike.

use chrono::Utc;

use crate::board::chess_types::Square;
use crate::movegen::moves::Move;
use crate::tables::eval_entries::EvalTables;
use crate::tables::geometry::{
    bishop_attacks_slow, bishop_mask, black_pawn_captures, index_to_occupancy, king_mask,
    knight_mask, path_between, rook_attacks_slow, rook_mask, white_pawn_captures,
};
use crate::tables::magics::{
    magic_index, BISHOP_BITS, BISHOP_MAGICS, BISHOP_TABLE_SIZE, ROOK_BITS, ROOK_MAGICS,
    ROOK_TABLE_SIZE,
};
use crate::tables::weights::{priority_weight, MOBILITY_MULTIPLIER};

// Squares that must be empty for each castle move. Long castling clears
// three squares (the knight square too) but the king only crosses two.
pub const WHITE_SHORT_CASTLE_MASK: u64 = 0x6000000000000000;
pub const WHITE_LONG_CASTLE_MASK: u64 = 0x0E00000000000000;
pub const BLACK_SHORT_CASTLE_MASK: u64 = 0x60;
pub const BLACK_LONG_CASTLE_MASK: u64 = 0xE;

// Squares the king crosses during long castling; these must be unattacked.
pub const WHITE_LONG_CASTLE_SAFE_MASK: u64 = 0x0C00000000000000;
pub const BLACK_LONG_CASTLE_SAFE_MASK: u64 = 0xC;

// King zones where the safety terms apply at all.
pub const KING_SAFETY_APPLIES_WHITE: u64 = 0xC7C7_0000_0000_0000;
pub const KING_SAFETY_APPLIES_BLACK: u64 = 0xC7C7;

pub struct SliderEntry {
    /// Moves to the empty in-mask squares, sorted by descending priority.
    pub quiets: Vec<Move>,
    /// Ray end squares still to be classified against real occupancy.
    pub stops: u64,
    pub attacks: u64,
    pub mobility: i32,
}

pub struct SliderTable {
    masks: [u64; 64],
    magics: &'static [u64; 64],
    bits: &'static [u32; 64],
    entries: Vec<Vec<SliderEntry>>,
}

impl SliderTable {
    fn build(
        mask_of: fn(Square) -> u64,
        attacks_of: fn(Square, u64) -> u64,
        magics: &'static [u64; 64],
        bits: &'static [u32; 64],
        table_size: usize,
    ) -> SliderTable {
        let mut masks = [0u64; 64];
        let mut entries = Vec::with_capacity(64);
        for sq in 0..64u8 {
            let mask = mask_of(sq);
            masks[sq as usize] = mask;

            let mut square_entries: Vec<SliderEntry> = (0..table_size)
                .map(|_| SliderEntry {
                    quiets: Vec::new(),
                    stops: 0,
                    attacks: 0,
                    mobility: 0,
                })
                .collect();

            for subset in 0..(1usize << mask.count_ones()) {
                let occupancy = index_to_occupancy(subset, mask);
                let attacks = attacks_of(sq, occupancy);
                let slot = magic_index(occupancy, magics[sq as usize], bits[sq as usize]);

                let mut quiets: Vec<Move> = Vec::new();
                let mut open = attacks & mask & !occupancy;
                while open != 0 {
                    let dest = open.trailing_zeros() as Square;
                    open &= open - 1;
                    quiets.push(Move::quiet(sq, dest, 5 + priority_weight(dest)));
                }
                quiets.sort_by(|a, b| b.priority.cmp(&a.priority));

                square_entries[slot] = SliderEntry {
                    quiets,
                    stops: (attacks & occupancy) | (attacks & !mask),
                    attacks,
                    mobility: attacks.count_ones() as i32 * MOBILITY_MULTIPLIER,
                };
            }
            entries.push(square_entries);
        }
        SliderTable {
            masks,
            magics,
            bits,
            entries,
        }
    }

    #[inline]
    pub fn entry(&self, sq: Square, occupancy: u64) -> &SliderEntry {
        let masked = occupancy & self.masks[sq as usize];
        let slot = magic_index(masked, self.magics[sq as usize], self.bits[sq as usize]);
        &self.entries[sq as usize][slot]
    }

    #[inline]
    pub fn attacks(&self, sq: Square, occupancy: u64) -> u64 {
        self.entry(sq, occupancy).attacks
    }
}

pub struct LookupTables {
    pub rook: SliderTable,
    pub bishop: SliderTable,
    pub knight_masks: [u64; 64],
    pub king_masks: [u64; 64],
    /// Squares a white pawn on the index square attacks.
    pub white_pawn_capture_masks: [u64; 64],
    pub black_pawn_capture_masks: [u64; 64],
    pub knight_mobility: [i32; 64],
    /// Attack line between two squares, both endpoints included.
    pub path: Box<[[u64; 64]; 64]>,
    pub eval: EvalTables,
}

impl LookupTables {
    pub fn new() -> LookupTables {
        let started = Utc::now().timestamp_millis();

        let rook = SliderTable::build(
            rook_mask,
            rook_attacks_slow,
            &ROOK_MAGICS,
            &ROOK_BITS,
            ROOK_TABLE_SIZE,
        );
        let bishop = SliderTable::build(
            bishop_mask,
            bishop_attacks_slow,
            &BISHOP_MAGICS,
            &BISHOP_BITS,
            BISHOP_TABLE_SIZE,
        );

        let mut knight_masks = [0u64; 64];
        let mut king_masks = [0u64; 64];
        let mut white_pawn_capture_masks = [0u64; 64];
        let mut black_pawn_capture_masks = [0u64; 64];
        let mut knight_mobility = [0i32; 64];
        for sq in 0..64u8 {
            knight_masks[sq as usize] = knight_mask(sq);
            king_masks[sq as usize] = king_mask(sq);
            white_pawn_capture_masks[sq as usize] = white_pawn_captures(sq);
            black_pawn_capture_masks[sq as usize] = black_pawn_captures(sq);
            // knights weigh mobility three times heavier than sliders
            knight_mobility[sq as usize] =
                knight_mask(sq).count_ones() as i32 * MOBILITY_MULTIPLIER * 3;
        }

        let mut path = Box::new([[0u64; 64]; 64]);
        for from in 0..64u8 {
            for to in 0..64u8 {
                path[from as usize][to as usize] = path_between(from, to);
            }
        }

        let eval = EvalTables::new();

        let tables = LookupTables {
            rook,
            bishop,
            knight_masks,
            king_masks,
            white_pawn_capture_masks,
            black_pawn_capture_masks,
            knight_mobility,
            path,
            eval,
        };
        log::info!(
            "lookup tables built in {} ms",
            Utc::now().timestamp_millis() - started
        );
        tables
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        LookupTables::new()
    }
}
