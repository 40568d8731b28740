//! Static evaluation, positive favors white.
//!
//! Material and square weights come precomputed from the slice and pawn-band
//! tables; only the terms that need the whole board remain here: passed
//! pawns, doubled pawns, rook files, castling and king safety. A discrete
//! phase switch picks the midgame or endgame shape, no blending.
//!
//! Mobility is added with the same sign for both colors, and rooks read the
//! bishop mobility table. Both carry over from the tuned originals of these
//! weights; the numbers were fitted around them.

use crate::board::board::Board;
use crate::board::chess_types::{
    bit, file_of, rank_of, Color, Square, BLACK_BISHOP, BLACK_KNIGHT, BLACK_LONG, BLACK_PAWN,
    BLACK_QUEEN, BLACK_ROOK, BLACK_SHORT, WHITE_BISHOP, WHITE_KNIGHT, WHITE_LONG, WHITE_PAWN,
    WHITE_QUEEN, WHITE_ROOK, WHITE_SHORT,
};
use crate::tables::geometry::{adjacent_files, black_passed_span, file_mask, white_passed_span};
use crate::tables::lookup::{
    LookupTables, SliderTable, KING_SAFETY_APPLIES_BLACK, KING_SAFETY_APPLIES_WHITE,
};
use crate::tables::weights::{
    mirror, CASTLED_BONUS, DOUBLED_PAWN_PENALTIES, KING_ADJACENT_ENEMY_PENALTY,
    KING_OPEN_SHIELD_FILE_PENALTY, KING_SAFETY_BONUSES, KING_SQUARE, KING_SQUARE_END,
    PASSED_PAWN_BONUS, PASSED_PAWN_BONUS_END, RETAINED_RIGHT_PENALTY,
};

pub fn static_evaluate(board: &Board, tables: &LookupTables) -> i32 {
    if board.is_endgame() {
        endgame(board, tables)
    } else {
        midgame(board, tables)
    }
}

fn midgame(board: &Board, tables: &LookupTables) -> i32 {
    let all = board.all_pieces();
    let white_pawns = board.bitboards[WHITE_PAWN as usize];
    let black_pawns = board.bitboards[BLACK_PAWN as usize];

    let mut eval = tables.eval.pawn_structure(white_pawns, black_pawns, false);
    eval += passed_pawns(white_pawns, black_pawns, &PASSED_PAWN_BONUS);
    eval += doubled_pawns(white_pawns, black_pawns);

    let white_rooks = board.bitboards[WHITE_ROOK as usize];
    let black_rooks = board.bitboards[BLACK_ROOK as usize];
    eval += tables.eval.rooks.white(white_rooks) + tables.eval.rooks.black(black_rooks);
    eval += slider_mobility(&tables.bishop, white_rooks | black_rooks, all);
    eval += rook_files(white_rooks, white_pawns, black_pawns);
    eval -= rook_files(black_rooks, black_pawns, white_pawns);

    let queens = board.bitboards[WHITE_QUEEN as usize] | board.bitboards[BLACK_QUEEN as usize];
    eval += tables.eval.queens.white(board.bitboards[WHITE_QUEEN as usize]);
    eval += tables.eval.queens.black(board.bitboards[BLACK_QUEEN as usize]);
    eval += slider_mobility(&tables.rook, queens, all);
    eval += slider_mobility(&tables.bishop, queens, all);

    let knights = board.bitboards[WHITE_KNIGHT as usize] | board.bitboards[BLACK_KNIGHT as usize];
    eval += tables.eval.knights.white(board.bitboards[WHITE_KNIGHT as usize]);
    eval += tables.eval.knights.black(board.bitboards[BLACK_KNIGHT as usize]);
    eval += knight_mobility(tables, knights);

    let bishops = board.bitboards[WHITE_BISHOP as usize] | board.bitboards[BLACK_BISHOP as usize];
    eval += tables.eval.bishops.white(board.bitboards[WHITE_BISHOP as usize]);
    eval += tables.eval.bishops.black(board.bitboards[BLACK_BISHOP as usize]);
    eval += slider_mobility(&tables.bishop, bishops, all);

    eval += KING_SQUARE[board.kings[0] as usize];
    eval -= KING_SQUARE[mirror(board.kings[1]) as usize];

    eval += castling_terms(board);
    eval += king_safety(board, tables);

    eval
}

fn endgame(board: &Board, tables: &LookupTables) -> i32 {
    let all = board.all_pieces();
    let white_pawns = board.bitboards[WHITE_PAWN as usize];
    let black_pawns = board.bitboards[BLACK_PAWN as usize];

    let mut eval = tables.eval.pawn_structure(white_pawns, black_pawns, true);
    eval += passed_pawns(white_pawns, black_pawns, &PASSED_PAWN_BONUS_END);
    eval += doubled_pawns(white_pawns, black_pawns);

    let rooks = board.bitboards[WHITE_ROOK as usize] | board.bitboards[BLACK_ROOK as usize];
    eval += tables.eval.rooks.white(board.bitboards[WHITE_ROOK as usize]);
    eval += tables.eval.rooks.black(board.bitboards[BLACK_ROOK as usize]);
    eval += slider_mobility(&tables.bishop, rooks, all);

    let queens = board.bitboards[WHITE_QUEEN as usize] | board.bitboards[BLACK_QUEEN as usize];
    eval += tables.eval.queens.white(board.bitboards[WHITE_QUEEN as usize]);
    eval += tables.eval.queens.black(board.bitboards[BLACK_QUEEN as usize]);
    eval += slider_mobility(&tables.rook, queens, all);
    eval += slider_mobility(&tables.bishop, queens, all);

    let knights = board.bitboards[WHITE_KNIGHT as usize] | board.bitboards[BLACK_KNIGHT as usize];
    eval += tables.eval.knights.white(board.bitboards[WHITE_KNIGHT as usize]);
    eval += tables.eval.knights.black(board.bitboards[BLACK_KNIGHT as usize]);
    eval += knight_mobility(tables, knights);

    let bishops = board.bitboards[WHITE_BISHOP as usize] | board.bitboards[BLACK_BISHOP as usize];
    eval += tables.eval.bishops.white(board.bitboards[WHITE_BISHOP as usize]);
    eval += tables.eval.bishops.black(board.bitboards[BLACK_BISHOP as usize]);
    eval += slider_mobility(&tables.bishop, bishops, all);

    eval += KING_SQUARE_END[board.kings[0] as usize];
    eval -= KING_SQUARE_END[mirror(board.kings[1]) as usize];

    eval
}

fn slider_mobility(table: &SliderTable, mut pieces: u64, all: u64) -> i32 {
    let mut total = 0;
    while pieces != 0 {
        let sq = pieces.trailing_zeros() as Square;
        pieces &= pieces - 1;
        total += table.entry(sq, all).mobility;
    }
    total
}

fn knight_mobility(tables: &LookupTables, mut knights: u64) -> i32 {
    let mut total = 0;
    while knights != 0 {
        let sq = knights.trailing_zeros() as Square;
        knights &= knights - 1;
        total += tables.knight_mobility[sq as usize];
    }
    total
}

/// Open and semi-open file bonus for one side's rooks.
fn rook_files(mut rooks: u64, own_pawns: u64, enemy_pawns: u64) -> i32 {
    use crate::tables::weights::{OPEN_FILE_ADVANTAGE, SEMI_OPEN_FILE_ADVANTAGE};
    let mut total = 0;
    while rooks != 0 {
        let sq = rooks.trailing_zeros() as Square;
        rooks &= rooks - 1;
        let file = file_mask(file_of(sq));
        if file & own_pawns == 0 {
            total += if file & enemy_pawns == 0 {
                OPEN_FILE_ADVANTAGE
            } else {
                SEMI_OPEN_FILE_ADVANTAGE
            };
        }
    }
    total
}

fn passed_pawns(white: u64, black: u64, bonus: &[i32; 8]) -> i32 {
    let mut eval = 0;
    let mut cursor = white;
    while cursor != 0 {
        let sq = cursor.trailing_zeros() as Square;
        cursor &= cursor - 1;
        if white_passed_span(file_of(sq), rank_of(sq)) & black == 0 {
            eval += bonus[rank_of(sq) as usize];
        }
    }
    let mut cursor = black;
    while cursor != 0 {
        let sq = cursor.trailing_zeros() as Square;
        cursor &= cursor - 1;
        if black_passed_span(file_of(sq), rank_of(sq)) & white == 0 {
            eval -= bonus[7 - rank_of(sq) as usize];
        }
    }
    eval
}

fn doubled_pawns(white: u64, black: u64) -> i32 {
    let mut eval = 0;
    for file in 0..8 {
        let mask = file_mask(file);
        eval -= DOUBLED_PAWN_PENALTIES[(mask & white).count_ones() as usize];
        eval += DOUBLED_PAWN_PENALTIES[(mask & black).count_ones() as usize];
    }
    eval
}

/// Castled bonus, or the per-right penalty for a side that still holds
/// rights without having used them.
fn castling_terms(board: &Board) -> i32 {
    let mut eval = 0;
    if board.castled & 0b10 != 0 {
        eval += CASTLED_BONUS;
    } else {
        if board.castling & WHITE_SHORT != 0 {
            eval -= RETAINED_RIGHT_PENALTY;
        }
        if board.castling & WHITE_LONG != 0 {
            eval -= RETAINED_RIGHT_PENALTY;
        }
    }
    if board.castled & 0b01 != 0 {
        eval -= CASTLED_BONUS;
    } else {
        if board.castling & BLACK_SHORT != 0 {
            eval += RETAINED_RIGHT_PENALTY;
        }
        if board.castling & BLACK_LONG != 0 {
            eval += RETAINED_RIGHT_PENALTY;
        }
    }
    eval
}

/// King safety terms apply only once the king sits in a flank zone of the
/// first two ranks, which is where a castled king lives.
fn king_safety(board: &Board, tables: &LookupTables) -> i32 {
    let mut eval = 0;
    let white_king = board.kings[0];
    if KING_SAFETY_APPLIES_WHITE & bit(white_king) != 0 {
        let ring = tables.king_masks[white_king as usize];
        eval += KING_SAFETY_BONUSES[(ring & board.pieces(Color::White)).count_ones() as usize];
        if ring & board.pieces(Color::Black) != 0 {
            eval -= KING_ADJACENT_ENEMY_PENALTY;
        }
        let pawns = board.bitboards[WHITE_PAWN as usize];
        for &file in adjacent_files(file_of(white_king)) {
            if file_mask(file) & pawns == 0 {
                eval -= KING_OPEN_SHIELD_FILE_PENALTY;
            }
        }
    }

    let black_king = board.kings[1];
    if KING_SAFETY_APPLIES_BLACK & bit(black_king) != 0 {
        let ring = tables.king_masks[black_king as usize];
        eval -= KING_SAFETY_BONUSES[(ring & board.pieces(Color::Black)).count_ones() as usize];
        if ring & board.pieces(Color::White) != 0 {
            eval += KING_ADJACENT_ENEMY_PENALTY;
        }
        let pawns = board.bitboards[BLACK_PAWN as usize];
        for &file in adjacent_files(file_of(black_king)) {
            if file_mask(file) & pawns == 0 {
                eval += KING_OPEN_SHIELD_FILE_PENALTY;
            }
        }
    }

    eval
}
