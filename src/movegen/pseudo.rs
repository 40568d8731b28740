//! Pseudolegal generation with make-and-test legality filtering.
//!
//! The slow path next to the strict generator: piece movement rules only,
//! then every candidate is played on a scratch board and dropped if it
//! leaves the mover's king attacked. Castling is fully validated here since
//! the filter cannot see the transit squares. Notation parsing and
//! disambiguation run on this path.

use crate::board::board::Board;
use crate::board::chess_types::{
    bit, Color, Square, BISHOP, BLACK_LONG, BLACK_SHORT, KING, KNIGHT, PAWN, QUEEN, ROOK,
    TYPE_MASK, WHITE_LONG, WHITE_SHORT,
};
use crate::board::zobrist::ZobristKeys;
use crate::movegen::generator::{attacked, emit_targets, pawn_captures, pawn_quiets, slider_moves};
use crate::movegen::moves::Move;
use crate::tables::lookup::{
    LookupTables, BLACK_LONG_CASTLE_MASK, BLACK_SHORT_CASTLE_MASK, WHITE_LONG_CASTLE_MASK,
    WHITE_SHORT_CASTLE_MASK,
};

pub fn pseudolegal_moves(board: &Board, tables: &LookupTables) -> Vec<Move> {
    let side = board.side;
    let all = board.all_pieces();
    let enemy = board.pieces(side.flip());

    let mut moves = Vec::with_capacity(64);
    let mut own = board.pieces(side);
    while own != 0 {
        let sq = (63 - own.leading_zeros()) as Square;
        own &= !bit(sq);
        match board.piece_at(sq) & TYPE_MASK {
            PAWN => {
                pawn_quiets(sq, side, all, &mut moves);
                pawn_captures(sq, side, enemy, &mut moves);
                if let Some(ep) = board.en_passant {
                    let capture_mask = match side {
                        Color::White => tables.white_pawn_capture_masks[sq as usize],
                        Color::Black => tables.black_pawn_capture_masks[sq as usize],
                    };
                    if capture_mask & bit(ep) != 0 {
                        moves.push(Move::en_passant(sq, ep));
                    }
                }
            }
            ROOK => slider_moves(&tables.rook, sq, all, enemy, 0, &mut moves),
            BISHOP => slider_moves(&tables.bishop, sq, all, enemy, 0, &mut moves),
            QUEEN => {
                slider_moves(&tables.rook, sq, all, enemy, 0, &mut moves);
                slider_moves(&tables.bishop, sq, all, enemy, 0, &mut moves);
            }
            KNIGHT => {
                let mask = tables.knight_masks[sq as usize];
                emit_targets(mask & !all, sq, 5, false, false, &mut moves);
                emit_targets(mask & enemy, sq, 50, false, true, &mut moves);
            }
            KING => {
                let mask = tables.king_masks[sq as usize];
                emit_targets(mask & !all, sq, 5, false, false, &mut moves);
                emit_targets(mask & enemy, sq, 3, false, true, &mut moves);
                castles(board, tables, sq, side, all, &mut moves);
            }
            _ => {}
        }
    }
    moves
}

fn castles(
    board: &Board,
    tables: &LookupTables,
    king: Square,
    side: Color,
    all: u64,
    out: &mut Vec<Move>,
) {
    let attacker = side.flip();
    let (short_right, long_right, short_mask, long_mask, transit) = match side {
        Color::White => (
            WHITE_SHORT,
            WHITE_LONG,
            WHITE_SHORT_CASTLE_MASK,
            WHITE_LONG_CASTLE_MASK,
            [61u8, 62, 59, 58], // f1 g1 d1 c1
        ),
        Color::Black => (
            BLACK_SHORT,
            BLACK_LONG,
            BLACK_SHORT_CASTLE_MASK,
            BLACK_LONG_CASTLE_MASK,
            [5u8, 6, 3, 2], // f8 g8 d8 c8
        ),
    };
    let mut king_safe = None;
    let mut safe = |board: &Board| {
        *king_safe.get_or_insert_with(|| !attacked(king, board, tables, attacker))
    };
    if board.castling & short_right != 0
        && all & short_mask == 0
        && safe(board)
        && !attacked(transit[0], board, tables, attacker)
        && !attacked(transit[1], board, tables, attacker)
    {
        out.push(Move::short_castle(side));
    }
    if board.castling & long_right != 0
        && all & long_mask == 0
        && safe(board)
        && !attacked(transit[2], board, tables, attacker)
        && !attacked(transit[3], board, tables, attacker)
    {
        out.push(Move::long_castle(side));
    }
}

/// Plays every move on a scratch board and keeps those that leave the
/// mover's king unattacked.
pub fn filter_checks(
    moves: Vec<Move>,
    board: &Board,
    keys: &ZobristKeys,
    tables: &LookupTables,
) -> Vec<Move> {
    moves
        .into_iter()
        .filter(|mv| {
            let mut next = board.clone();
            next.make_move(mv, keys);
            let mover = next.side.flip();
            !attacked(next.kings[mover.index()], &next, tables, next.side)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::square_at;
    use crate::movegen::generator::legal_moves;
    use std::sync::OnceLock;

    static TABLES: OnceLock<LookupTables> = OnceLock::new();

    fn tables() -> &'static LookupTables {
        TABLES.get_or_init(LookupTables::new)
    }

    fn move_set(moves: &[Move]) -> Vec<u32> {
        let mut packed: Vec<u32> = moves.iter().map(|mv| mv.pack()).collect();
        packed.sort_unstable();
        packed.dedup();
        packed
    }

    #[test]
    fn starting_position_needs_no_filtering() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        let pseudo = pseudolegal_moves(&board, tables());
        assert_eq!(pseudo.len(), 20);
        let filtered = filter_checks(pseudo, &board, &keys, tables());
        assert_eq!(filtered.len(), 20);
    }

    #[test]
    fn filtering_removes_pinned_piece_moves() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen("4k3/8/8/8/4r3/8/4N3/4K3 w - - 0 1", &keys).unwrap();
        let pseudo = pseudolegal_moves(&board, tables());
        assert!(pseudo.iter().any(|mv| mv.source == square_at(4, 1)));
        let filtered = filter_checks(pseudo, &board, &keys, tables());
        assert!(filtered.iter().all(|mv| mv.source != square_at(4, 1)));
        assert_eq!(move_set(&filtered), move_set(&legal_moves(&board, tables(), false)));
    }

    #[test]
    fn filtered_pseudolegal_agrees_with_the_strict_generator() {
        let keys = ZobristKeys::new();
        let positions = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
            "4k3/8/8/8/4r3/8/3R4/4K3 w - - 0 1",
        ];
        for fen in positions {
            let board = Board::from_fen(fen, &keys).unwrap();
            let pseudo = filter_checks(pseudolegal_moves(&board, tables()), &board, &keys, tables());
            let strict = legal_moves(&board, tables(), false);
            assert_eq!(move_set(&pseudo), move_set(&strict), "{fen}");
        }
    }

    #[test]
    fn castling_through_an_attacked_square_is_rejected() {
        let keys = ZobristKeys::new();
        // the black rook covers f1
        let board = Board::from_fen("4k3/8/8/8/8/5r2/8/4K2R w K - 0 1", &keys).unwrap();
        let pseudo = pseudolegal_moves(&board, tables());
        assert!(!pseudo.contains(&Move::short_castle(Color::White)));
    }
}
