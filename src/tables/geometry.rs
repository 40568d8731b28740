//! Bitboard geometry: file/rank masks, jump patterns, slow ray walks used
//! for table construction, alignment paths and pawn-structure spans.
//!
//! Everything here works on raw bit rows (`row = sq / 8`); board rank 0 is
//! row 7. The slow ray walkers only run while tables are built, lookups go
//! through the magic tables afterwards.

use crate::board::chess_types::Square;

#[inline]
pub const fn file_mask(file: u8) -> u64 {
    0x0101_0101_0101_0101u64 << file
}

#[inline]
pub const fn row_mask(row: u8) -> u64 {
    0xFFu64 << (row * 8)
}

/// Relevant rook occupancy, board edges excluded.
pub fn rook_mask(sq: Square) -> u64 {
    let row = (sq / 8) as u32;
    let file = (sq % 8) as u32;
    let mut mask = 0u64;
    for r in (row + 1)..7 {
        mask |= 1u64 << (r * 8 + file);
    }
    for r in 1..row {
        mask |= 1u64 << (r * 8 + file);
    }
    for f in (file + 1)..7 {
        mask |= 1u64 << (row * 8 + f);
    }
    for f in 1..file {
        mask |= 1u64 << (row * 8 + f);
    }
    mask
}

/// Relevant bishop occupancy, board edges excluded.
pub fn bishop_mask(sq: Square) -> u64 {
    let mut mask = 0u64;
    for (df, dr) in DIAGONAL_DIRS {
        let mut f = (sq % 8) as i32 + df;
        let mut r = (sq / 8) as i32 + dr;
        while (1..7).contains(&f) && (1..7).contains(&r) {
            mask |= 1u64 << (r * 8 + f);
            f += df;
            r += dr;
        }
    }
    mask
}

pub const STRAIGHT_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const DIAGONAL_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn ray_attacks(sq: Square, occupancy: u64, dirs: [(i32, i32); 4]) -> u64 {
    let mut attacks = 0u64;
    for (df, dr) in dirs {
        let mut f = (sq % 8) as i32 + df;
        let mut r = (sq / 8) as i32 + dr;
        while (0..8).contains(&f) && (0..8).contains(&r) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            f += df;
            r += dr;
        }
    }
    attacks
}

pub fn rook_attacks_slow(sq: Square, occupancy: u64) -> u64 {
    ray_attacks(sq, occupancy, STRAIGHT_DIRS)
}

pub fn bishop_attacks_slow(sq: Square, occupancy: u64) -> u64 {
    ray_attacks(sq, occupancy, DIAGONAL_DIRS)
}

/// Expands an occupancy index over the set bits of `mask`.
pub fn index_to_occupancy(index: usize, mut mask: u64) -> u64 {
    let mut occupancy = 0u64;
    let mut bit_index = 0;
    while mask != 0 {
        let sq = mask.trailing_zeros();
        mask &= mask - 1;
        if index & (1 << bit_index) != 0 {
            occupancy |= 1u64 << sq;
        }
        bit_index += 1;
    }
    occupancy
}

fn offset_mask(sq: Square, offsets: &[(i32, i32)]) -> u64 {
    let file = (sq % 8) as i32;
    let row = (sq / 8) as i32;
    let mut mask = 0u64;
    for (df, dr) in offsets {
        let f = file + df;
        let r = row + dr;
        if (0..8).contains(&f) && (0..8).contains(&r) {
            mask |= 1u64 << (r * 8 + f);
        }
    }
    mask
}

pub fn knight_mask(sq: Square) -> u64 {
    offset_mask(
        sq,
        &[(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)],
    )
}

pub fn king_mask(sq: Square) -> u64 {
    offset_mask(
        sq,
        &[(1, 1), (1, 0), (1, -1), (0, 1), (0, -1), (-1, 1), (-1, 0), (-1, -1)],
    )
}

/// Squares a white pawn on `sq` attacks (one row up the board, lower bits).
pub fn white_pawn_captures(sq: Square) -> u64 {
    offset_mask(sq, &[(-1, -1), (1, -1)])
}

pub fn black_pawn_captures(sq: Square) -> u64 {
    offset_mask(sq, &[(-1, 1), (1, 1)])
}

/// Attack line between two squares when they share a rank, file, diagonal
/// or a knight relation: the squares strictly between plus both endpoints.
/// Unrelated squares yield 0.
pub fn path_between(from: Square, to: Square) -> u64 {
    if from == to {
        return 0;
    }
    let df = (to % 8) as i32 - (from % 8) as i32;
    let dr = (to / 8) as i32 - (from / 8) as i32;
    if (df.abs() == 1 && dr.abs() == 2) || (df.abs() == 2 && dr.abs() == 1) {
        return (1u64 << from) | (1u64 << to);
    }
    if df != 0 && dr != 0 && df.abs() != dr.abs() {
        return 0;
    }
    let step_f = df.signum();
    let step_r = dr.signum();
    let mut path = (1u64 << from) | (1u64 << to);
    let mut f = (from % 8) as i32 + step_f;
    let mut r = (from / 8) as i32 + step_r;
    while (f, r) != ((to % 8) as i32, (to / 8) as i32) {
        path |= 1u64 << (r * 8 + f);
        f += step_f;
        r += step_r;
    }
    path
}

/// Files adjacent to `file`, the file itself excluded.
#[inline]
pub const fn neighbour_files(file: u8) -> u64 {
    let mut mask = 0u64;
    if file > 0 {
        mask |= file_mask(file - 1);
    }
    if file < 7 {
        mask |= file_mask(file + 1);
    }
    mask
}

/// Squares a white pawn at (file, rank) must find free of enemy pawns to be
/// passed: its own and both neighbour files, every rank ahead.
pub fn white_passed_span(file: u8, rank: u8) -> u64 {
    let span = neighbour_files(file) | file_mask(file);
    let ahead = (1u64 << ((7 - rank) * 8)) - 1;
    span & ahead
}

pub fn black_passed_span(file: u8, rank: u8) -> u64 {
    let span = neighbour_files(file) | file_mask(file);
    let shift = (8 - rank as u32) * 8;
    if shift >= 64 {
        return 0;
    }
    span & !((1u64 << shift) - 1)
}

/// Files whose pawns shield a king on `file`, for the pawn-shelter term.
pub fn adjacent_files(file: u8) -> &'static [u8] {
    const TABLE: [&[u8]; 8] = [
        &[0, 1],
        &[0, 1, 2],
        &[1, 2, 3],
        &[2, 3, 4],
        &[3, 4, 5],
        &[4, 5, 6],
        &[5, 6, 7],
        &[6, 7],
    ];
    TABLE[file as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::{bit, square_at};

    #[test]
    fn rook_mask_excludes_edges() {
        // a rook in the corner still has 12 relevant squares
        assert_eq!(rook_mask(0).count_ones(), 12);
        assert_eq!(rook_mask(square_at(4, 3)).count_ones(), 10);
        assert_eq!(rook_mask(0) & bit(7), 0);
        assert_eq!(rook_mask(0) & bit(56), 0);
    }

    #[test]
    fn slow_rays_stop_at_blockers() {
        let sq = square_at(4, 3); // e4
        let blocker = bit(square_at(4, 6)); // e7
        let attacks = rook_attacks_slow(sq, blocker);
        assert_ne!(attacks & bit(square_at(4, 6)), 0);
        assert_eq!(attacks & bit(square_at(4, 7)), 0);
        assert_eq!(rook_attacks_slow(sq, 0).count_ones(), 14);
    }

    #[test]
    fn jump_masks() {
        assert_eq!(knight_mask(square_at(4, 3)).count_ones(), 8);
        assert_eq!(knight_mask(square_at(0, 0)).count_ones(), 2);
        assert_eq!(king_mask(square_at(0, 0)).count_ones(), 3);
        assert_eq!(king_mask(square_at(4, 4)).count_ones(), 8);
    }

    #[test]
    fn pawn_capture_masks_respect_edges() {
        let mask = white_pawn_captures(square_at(0, 1));
        assert_eq!(mask, bit(square_at(1, 2)));
        let mask = black_pawn_captures(square_at(7, 6));
        assert_eq!(mask, bit(square_at(6, 5)));
    }

    #[test]
    fn path_between_straight_and_diagonal() {
        let path = path_between(square_at(0, 0), square_at(0, 3));
        assert_eq!(path.count_ones(), 4);
        assert_ne!(path & bit(square_at(0, 1)), 0);
        let diag = path_between(square_at(2, 2), square_at(5, 5));
        assert_eq!(diag.count_ones(), 4);
        assert_eq!(path_between(square_at(0, 0), square_at(3, 1)), 0);
    }

    #[test]
    fn path_between_knight_relation() {
        let path = path_between(square_at(1, 0), square_at(2, 2));
        assert_eq!(path, bit(square_at(1, 0)) | bit(square_at(2, 2)));
    }

    #[test]
    fn passed_pawn_spans() {
        let span = white_passed_span(4, 4);
        assert_ne!(span & bit(square_at(3, 5)), 0);
        assert_ne!(span & bit(square_at(4, 6)), 0);
        assert_eq!(span & bit(square_at(4, 3)), 0);
        let span = black_passed_span(4, 3);
        assert_ne!(span & bit(square_at(5, 2)), 0);
        assert_eq!(span & bit(square_at(4, 4)), 0);
    }

    #[test]
    fn subset_expansion_covers_mask() {
        let mask = rook_mask(0);
        let full = index_to_occupancy((1 << mask.count_ones()) - 1, mask);
        assert_eq!(full, mask);
        assert_eq!(index_to_occupancy(0, mask), 0);
    }
}
