//! Hand-tuned evaluation and ordering weights.
//!
//! Square tables are laid out in bitboard order (a8 first), which reads as
//! white's far side at the top. White indexes them directly; black mirrors
//! the rank with `mirror`.

use crate::board::chess_types::Square;

#[inline]
pub const fn mirror(sq: Square) -> Square {
    sq ^ 56
}

#[rustfmt::skip]
pub const PAWN_SQUARE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
pub const PAWN_SQUARE_END: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    80, 80, 80, 80, 80, 80, 80, 80,
    50, 50, 50, 50, 50, 50, 50, 50,
    30, 30, 30, 30, 30, 30, 30, 30,
    15, 15, 15, 15, 15, 15, 15, 15,
     5,  5,  5,  5,  5,  5,  5,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
pub const KNIGHT_SQUARE: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
pub const BISHOP_SQUARE: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
pub const ROOK_SQUARE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
pub const QUEEN_SQUARE: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
     0,  0,  5,  5,  5,  5,  0, -5,
   -10,  5,  5,  5,  5,  5,  0,-10,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
pub const KING_SQUARE: [i32; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
pub const KING_SQUARE_END: [i32; 64] = [
   -50,-40,-30,-20,-20,-30,-40,-50,
   -30,-20,-10,  0,  0,-10,-20,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-30,  0,  0,  0,  0,-30,-30,
   -50,-30,-30,-30,-30,-30,-30,-50,
];

pub const CASTLED_BONUS: i32 = 60;
/// Charged per castling right still held by an uncastled side.
pub const RETAINED_RIGHT_PENALTY: i32 = 25;
pub const OPEN_FILE_ADVANTAGE: i32 = 25;
pub const SEMI_OPEN_FILE_ADVANTAGE: i32 = 12;
pub const PROTECTED_PAWN_BONUS: i32 = 8;
pub const ISOLATED_PAWN_PENALTY: i32 = 15;
/// Indexed by the number of own pawns on one file.
pub const DOUBLED_PAWN_PENALTIES: [i32; 9] = [0, 0, 25, 60, 100, 150, 150, 150, 150];
/// Indexed by rank of a white passed pawn; black mirrors the rank.
pub const PASSED_PAWN_BONUS: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];
pub const PASSED_PAWN_BONUS_END: [i32; 8] = [0, 10, 20, 40, 70, 120, 200, 0];
/// Indexed by the number of friendly pieces on the king ring.
pub const KING_SAFETY_BONUSES: [i32; 9] = [-35, -20, -5, 10, 20, 28, 34, 38, 40];
pub const KING_ADJACENT_ENEMY_PENALTY: i32 = 30;
pub const KING_OPEN_SHIELD_FILE_PENALTY: i32 = 30;
pub const MOBILITY_MULTIPLIER: i32 = 2;

pub const PRIORITY_WEIGHT_MULTIPLIER: i32 = 1;

/// Centrality pyramid indexed by (file, rank), feeding move priorities.
#[rustfmt::skip]
pub const PRIORITY_WEIGHTS: [[i32; 8]; 8] = [
    [0, 1, 2, 3, 3, 2, 1, 0],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [2, 3, 4, 5, 5, 4, 3, 2],
    [3, 4, 5, 6, 6, 5, 4, 3],
    [3, 4, 5, 6, 6, 5, 4, 3],
    [2, 3, 4, 5, 5, 4, 3, 2],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [0, 1, 2, 3, 3, 2, 1, 0],
];

#[inline]
pub fn priority_weight(sq: Square) -> i32 {
    use crate::board::chess_types::{file_of, rank_of};
    PRIORITY_WEIGHTS[file_of(sq) as usize][rank_of(sq) as usize] * PRIORITY_WEIGHT_MULTIPLIER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::square_at;

    #[test]
    fn mirror_flips_rank_only() {
        assert_eq!(mirror(square_at(4, 0)), square_at(4, 7));
        assert_eq!(mirror(square_at(0, 3)), square_at(0, 4));
        for sq in 0..64u8 {
            assert_eq!(mirror(mirror(sq)), sq);
        }
    }

    #[test]
    fn pawn_table_rewards_advancement() {
        // e7 is worth more to white than e2
        assert!(PAWN_SQUARE[square_at(4, 6) as usize] > PAWN_SQUARE[square_at(4, 1) as usize]);
        assert_eq!(PAWN_SQUARE[square_at(4, 0) as usize], 0);
    }

    #[test]
    fn priority_weights_peak_in_the_center() {
        assert_eq!(priority_weight(square_at(3, 3)), 6);
        assert_eq!(priority_weight(square_at(0, 0)), 0);
        assert_eq!(priority_weight(square_at(7, 7)), 0);
    }
}
