//! Precomputed evaluation entries.
//!
//! Sliding and minor pieces are scored through slice tables: the board is cut
//! into four rank pairs, and each 16-bit occupancy pattern of a piece type
//! within a slice maps to its summed material-plus-square value, one sum per
//! color. Pawns are scored through three file-band tables (a-c, d-e, f-h over
//! the six pawn ranks) with protection and isolation baked into the entries.
//! Passed-pawn and doubled-pawn terms need the opposing pawns or full files
//! and stay at query time.

use crate::board::chess_types::{file_of, Square};
use crate::tables::geometry::{black_pawn_captures, file_mask, neighbour_files, white_pawn_captures};
use crate::tables::weights::{
    mirror, ISOLATED_PAWN_PENALTY, PAWN_SQUARE, PAWN_SQUARE_END, PROTECTED_PAWN_BONUS,
};

pub const SLICE_COUNT: usize = 4;
pub const SLICE_SIZE: usize = 1 << 16;

#[derive(Clone, Copy, Default)]
pub struct SliceEval {
    pub white: i32,
    pub black: i32,
}

/// Per-piece-type slice table. Both phases share the same square weights for
/// these pieces, so one entry pair per pattern suffices.
pub struct SliceTable {
    slices: Vec<Vec<SliceEval>>,
}

impl SliceTable {
    pub fn build(square_table: &[i32; 64], material: i32) -> SliceTable {
        let mut slices = Vec::with_capacity(SLICE_COUNT);
        for slice in 0..SLICE_COUNT {
            let mut entries = vec![SliceEval::default(); SLICE_SIZE];
            for (pattern, entry) in entries.iter_mut().enumerate() {
                let mut bits = pattern;
                while bits != 0 {
                    let sq = (slice * 16 + bits.trailing_zeros() as usize) as Square;
                    bits &= bits - 1;
                    entry.white += material + square_table[sq as usize];
                    entry.black -= material + square_table[mirror(sq) as usize];
                }
            }
            slices.push(entries);
        }
        SliceTable { slices }
    }

    #[inline]
    pub fn white(&self, bitboard: u64) -> i32 {
        let mut total = 0;
        for slice in 0..SLICE_COUNT {
            let pattern = ((bitboard >> (slice * 16)) & 0xFFFF) as usize;
            total += self.slices[slice][pattern].white;
        }
        total
    }

    #[inline]
    pub fn black(&self, bitboard: u64) -> i32 {
        let mut total = 0;
        for slice in 0..SLICE_COUNT {
            let pattern = ((bitboard >> (slice * 16)) & 0xFFFF) as usize;
            total += self.slices[slice][pattern].black;
        }
        total
    }
}

#[derive(Clone, Copy, Default)]
pub struct PawnEval {
    pub white: i32,
    pub black: i32,
    pub white_end: i32,
    pub black_end: i32,
}

/// One file band of the pawn tables.
pub struct PawnSection {
    base_file: u8,
    width: u8,
    table: Vec<PawnEval>,
}

const PAWN_MATERIAL: i32 = 100;

impl PawnSection {
    pub fn build(base_file: u8, width: u8) -> PawnSection {
        let band: u64 = (0..width).fold(0, |acc, f| acc | file_mask(base_file + f));
        let bits = 6 * width as usize;
        let mut table = vec![PawnEval::default(); 1 << bits];

        for (pattern, entry) in table.iter_mut().enumerate() {
            let pawns = Self::pattern_to_bitboard(pattern, base_file, width);
            let mut cursor = pawns;
            while cursor != 0 {
                let sq = cursor.trailing_zeros() as Square;
                cursor &= cursor - 1;
                let file = file_of(sq);

                let mut white = PAWN_MATERIAL
                    + PAWN_SQUARE[sq as usize]
                    + PAWN_SQUARE_END[sq as usize];
                let mut white_end = PAWN_MATERIAL + PAWN_SQUARE_END[sq as usize];
                let flipped = mirror(sq) as usize;
                let mut black = -(PAWN_MATERIAL + PAWN_SQUARE[flipped] + PAWN_SQUARE_END[flipped]);
                let mut black_end = -(PAWN_MATERIAL + PAWN_SQUARE_END[flipped]);

                let protectors_w =
                    (pawns & white_pawn_captures(sq)).count_ones() as i32 * PROTECTED_PAWN_BONUS;
                let protectors_b =
                    (pawns & black_pawn_captures(sq)).count_ones() as i32 * PROTECTED_PAWN_BONUS;
                white += protectors_w;
                white_end += protectors_w;
                black -= protectors_b;
                black_end -= protectors_b;

                if pawns & neighbour_files(file) & band == 0 {
                    white -= ISOLATED_PAWN_PENALTY;
                    white_end -= ISOLATED_PAWN_PENALTY;
                    black += ISOLATED_PAWN_PENALTY;
                    black_end += ISOLATED_PAWN_PENALTY;
                }

                entry.white += white;
                entry.white_end += white_end;
                entry.black += black;
                entry.black_end += black_end;
            }
        }

        PawnSection {
            base_file,
            width,
            table,
        }
    }

    fn pattern_to_bitboard(pattern: usize, base_file: u8, width: u8) -> u64 {
        let mut bb = 0u64;
        for row in 1..7u8 {
            let row_bits = (pattern >> ((row - 1) * width)) & ((1 << width) - 1);
            bb |= (row_bits as u64) << (row * 8 + base_file);
        }
        bb
    }

    #[inline]
    fn index(&self, pawn_bitboard: u64) -> usize {
        let mut idx = 0usize;
        let lane = (1usize << self.width) - 1;
        for row in 1..7usize {
            let row_bits = (pawn_bitboard >> (row * 8 + self.base_file as usize)) as usize & lane;
            idx |= row_bits << ((row - 1) * self.width as usize);
        }
        idx
    }

    #[inline]
    pub fn white(&self, pawn_bitboard: u64, endgame: bool) -> i32 {
        let entry = &self.table[self.index(pawn_bitboard)];
        if endgame {
            entry.white_end
        } else {
            entry.white
        }
    }

    #[inline]
    pub fn black(&self, pawn_bitboard: u64, endgame: bool) -> i32 {
        let entry = &self.table[self.index(pawn_bitboard)];
        if endgame {
            entry.black_end
        } else {
            entry.black
        }
    }
}

pub struct EvalTables {
    pub rooks: SliceTable,
    pub knights: SliceTable,
    pub bishops: SliceTable,
    pub queens: SliceTable,
    pub pawn_sections: [PawnSection; 3],
}

impl EvalTables {
    pub fn new() -> EvalTables {
        use crate::tables::weights::{BISHOP_SQUARE, KNIGHT_SQUARE, QUEEN_SQUARE, ROOK_SQUARE};
        EvalTables {
            rooks: SliceTable::build(&ROOK_SQUARE, 500),
            knights: SliceTable::build(&KNIGHT_SQUARE, 300),
            bishops: SliceTable::build(&BISHOP_SQUARE, 300),
            queens: SliceTable::build(&QUEEN_SQUARE, 900),
            pawn_sections: [
                PawnSection::build(0, 3),
                PawnSection::build(3, 2),
                PawnSection::build(5, 3),
            ],
        }
    }

    /// Midgame pawn-structure score across all bands, white minus black.
    pub fn pawn_structure(&self, white_pawns: u64, black_pawns: u64, endgame: bool) -> i32 {
        let mut total = 0;
        for section in &self.pawn_sections {
            total += section.white(white_pawns, endgame);
            total += section.black(black_pawns, endgame);
        }
        total
    }
}

impl Default for EvalTables {
    fn default() -> Self {
        EvalTables::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::{bit, square_at};

    #[test]
    fn slice_values_are_color_symmetric() {
        let rooks = SliceTable::build(&crate::tables::weights::ROOK_SQUARE, 500);
        // a rook on d4 for white mirrors a rook on d5 for black
        let white = rooks.white(bit(square_at(3, 3)));
        let black = rooks.black(bit(square_at(3, 4)));
        assert_eq!(white, -black);
        assert_eq!(rooks.white(0), 0);
        assert_eq!(rooks.black(0), 0);
    }

    #[test]
    fn slice_sums_are_additive() {
        let knights = SliceTable::build(&crate::tables::weights::KNIGHT_SQUARE, 300);
        let a = bit(square_at(1, 0));
        let b = bit(square_at(6, 7));
        assert_eq!(
            knights.white(a | b),
            knights.white(a) + knights.white(b)
        );
    }

    #[test]
    fn protected_pawns_score_higher() {
        let section = PawnSection::build(3, 2);
        let lone = bit(square_at(3, 3));
        let chained = bit(square_at(3, 3)) | bit(square_at(4, 2));
        let lone_score = section.white(lone, false);
        let chained_score = section.white(chained, false);
        let solo_rear = section.white(bit(square_at(4, 2)), false);
        assert!(chained_score > lone_score + solo_rear);
    }

    #[test]
    fn isolated_pawn_is_penalized() {
        let section = PawnSection::build(0, 3);
        let isolated = section.white(bit(square_at(0, 3)), false);
        let supported = section.white(bit(square_at(0, 3)) | bit(square_at(1, 2)), false);
        let lone_b = section.white(bit(square_at(1, 2)), false);
        // together they lose both isolation penalties and gain protection
        assert!(supported > isolated + lone_b);
    }

    #[test]
    fn pawn_sections_mirror_between_colors() {
        let tables = EvalTables::new();
        let white = bit(square_at(2, 2)) | bit(square_at(3, 1));
        let black = bit(square_at(2, 5)) | bit(square_at(3, 6));
        let score = tables.pawn_structure(white, black, false);
        assert_eq!(score, 0);
        let end = tables.pawn_structure(white, black, true);
        assert_eq!(end, 0);
    }
}
