//! Strict legal move generation.
//!
//! The generator never makes a move to test legality. Pins and check lines
//! are resolved up front: each piece gets a blocked-square mask, pinned
//! pieces are confined to their pin ray, the king to squares the enemy does
//! not attack, and in check only blocks, captures of the checker and king
//! retreats are emitted. Enemy attack maps are built with the king removed
//! from the occupancy so sliders see through it.

use std::collections::HashMap;

use crate::board::board::Board;
use crate::board::chess_types::{
    bit, file_of, rank_of, square_at, Color, Square, BISHOP, BLACK_LONG, BLACK_PAWN, BLACK_SHORT,
    KING, KNIGHT, NO_PROMOTION, PAWN, PIECE_VALUE, QUEEN, ROOK, TYPE_MASK, WHITE_LONG, WHITE_PAWN,
    WHITE_SHORT,
};
use crate::movegen::moves::{Move, MoveKind};
use crate::movegen::ordering::Heuristics;
use crate::tables::geometry::{DIAGONAL_DIRS, STRAIGHT_DIRS};
use crate::tables::lookup::{
    LookupTables, SliderTable, BLACK_LONG_CASTLE_MASK, BLACK_LONG_CASTLE_SAFE_MASK,
    BLACK_SHORT_CASTLE_MASK, WHITE_LONG_CASTLE_MASK, WHITE_LONG_CASTLE_SAFE_MASK,
    WHITE_SHORT_CASTLE_MASK,
};
use crate::tables::weights::{priority_weight, PRIORITY_WEIGHTS};

/// Every legal move for the side to move. With `ordered` the list is sorted
/// by the generation priorities alone; heuristic reordering lives in
/// [`ordered_moves`].
pub fn legal_moves(board: &Board, tables: &LookupTables, ordered: bool) -> Vec<Move> {
    let mut moves = generate(board, tables);
    if ordered {
        moves.sort_unstable_by(|a, b| b.priority.cmp(&a.priority));
    }
    moves
}

/// Legal moves sorted for the search: generation priority plus capture
/// value, refutation, history and countermove bonuses, and a bonus for
/// moves that attack the enemy king from their destination.
pub fn ordered_moves(
    board: &Board,
    tables: &LookupTables,
    heuristics: &Heuristics,
    previous: Option<&Move>,
) -> Vec<Move> {
    let mut moves = generate(board, tables);
    moves.sort_by_cached_key(|mv| {
        std::cmp::Reverse(reevaluate(board, tables, heuristics, mv, previous))
    });
    moves
}

pub fn reevaluate(
    board: &Board,
    tables: &LookupTables,
    heuristics: &Heuristics,
    mv: &Move,
    previous: Option<&Move>,
) -> i32 {
    let mut priority = mv.priority;
    priority += PIECE_VALUE[(board.piece_at(mv.dest) & TYPE_MASK) as usize];

    if let Some((stored, bonus)) = heuristics.refutation_get(board.hash_key) {
        if stored == *mv {
            priority += bonus;
        }
    }
    priority += heuristics.history_get(board.side, mv);
    priority += heuristics.counter_get(previous, mv);

    // reward moves that deliver check from their destination; sliders look
    // through everything but enemy pieces
    let enemy = board.side.flip();
    let enemy_king = bit(board.kings[enemy.index()]);
    let enemy_pieces = board.pieces(enemy);
    let dest = mv.dest as usize;
    let threat = match board.piece_at(mv.source) & TYPE_MASK {
        PAWN => match board.side {
            Color::White => tables.white_pawn_capture_masks[dest],
            Color::Black => tables.black_pawn_capture_masks[dest],
        },
        ROOK => tables.rook.attacks(mv.dest, enemy_pieces),
        KNIGHT => tables.knight_masks[dest],
        BISHOP => tables.bishop.attacks(mv.dest, enemy_pieces),
        QUEEN => {
            tables.rook.attacks(mv.dest, enemy_pieces)
                | tables.bishop.attacks(mv.dest, enemy_pieces)
        }
        _ => 0,
    };
    if threat & enemy_king != 0 {
        priority += 50;
    }
    priority
}

fn generate(board: &Board, tables: &LookupTables) -> Vec<Move> {
    let side = board.side;
    let king = board.kings[side.index()];
    let ep_available = board.en_passant.is_some();

    let (pinned, pin_paths) = pin_states(board, side);
    let ep_frozen = ep_frozen_pawns(board, side);
    let (in_check, double_check, block_path) = attack_lines(king, board, tables, side.flip());
    let enemy_attacked = attacked_bitboard(board, tables, side.flip(), king);

    let mut moves = Vec::with_capacity(64);
    if !in_check {
        let mut own = board.pieces(side);
        while own != 0 {
            let sq = (63 - own.leading_zeros()) as Square;
            own &= !bit(sq);
            let block_moves = if pinned & bit(sq) != 0 {
                !pin_paths.get(&bit(sq)).copied().unwrap_or(0)
            } else if sq == king {
                enemy_attacked
            } else {
                0
            };
            let ep_ok = ep_available && ep_frozen & bit(sq) == 0;
            piece_moves(board, tables, sq, side, block_moves, enemy_attacked, ep_ok, &mut moves);
        }
    } else if !double_check {
        let mut own = board.pieces(side);
        while own != 0 {
            let sq = (63 - own.leading_zeros()) as Square;
            own &= !bit(sq);
            piece_moves_check(
                board, tables, sq, side, block_path, ep_available, pinned, enemy_attacked, false,
                &mut moves,
            );
        }
    } else {
        piece_moves_check(
            board, tables, king, side, block_path, ep_available, pinned, enemy_attacked, true,
            &mut moves,
        );
    }
    moves
}

#[allow(clippy::too_many_arguments)]
fn piece_moves(
    board: &Board,
    tables: &LookupTables,
    sq: Square,
    side: Color,
    block_moves: u64,
    enemy_attacked: u64,
    ep_available: bool,
    out: &mut Vec<Move>,
) {
    let all = board.all_pieces();
    let enemy = board.pieces(side.flip());

    match board.piece_at(sq) & TYPE_MASK {
        PAWN => {
            pawn_quiets(sq, side, all | block_moves, out);
            pawn_captures(sq, side, enemy & !block_moves, out);
            if ep_available {
                if let Some(ep) = board.en_passant {
                    let capture_mask = match side {
                        Color::White => tables.white_pawn_capture_masks[sq as usize],
                        Color::Black => tables.black_pawn_capture_masks[sq as usize],
                    };
                    // a pinned pawn may only capture en passant along its pin ray
                    if capture_mask & bit(ep) != 0 && bit(ep) & block_moves == 0 {
                        out.push(Move::en_passant(sq, ep));
                    }
                }
            }
        }
        ROOK => slider_moves(&tables.rook, sq, all, enemy, block_moves, out),
        BISHOP => slider_moves(&tables.bishop, sq, all, enemy, block_moves, out),
        QUEEN => {
            slider_moves(&tables.rook, sq, all, enemy, block_moves, out);
            slider_moves(&tables.bishop, sq, all, enemy, block_moves, out);
        }
        KNIGHT => {
            let mask = tables.knight_masks[sq as usize];
            emit_targets(mask & !(all | block_moves), sq, 5, false, false, out);
            emit_targets(mask & enemy & !block_moves, sq, 50, false, true, out);
        }
        KING => {
            let mask = tables.king_masks[sq as usize];
            emit_targets(mask & !(all | block_moves), sq, 5, false, false, out);
            emit_targets(mask & enemy & !block_moves, sq, 3, false, true, out);

            let blocked = all | enemy_attacked;
            match side {
                Color::White => {
                    if board.castling & WHITE_SHORT != 0 && blocked & WHITE_SHORT_CASTLE_MASK == 0 {
                        out.push(Move::short_castle(side));
                    }
                    if board.castling & WHITE_LONG != 0
                        && all & WHITE_LONG_CASTLE_MASK == 0
                        && enemy_attacked & WHITE_LONG_CASTLE_SAFE_MASK == 0
                    {
                        out.push(Move::long_castle(side));
                    }
                }
                Color::Black => {
                    if board.castling & BLACK_SHORT != 0 && blocked & BLACK_SHORT_CASTLE_MASK == 0 {
                        out.push(Move::short_castle(side));
                    }
                    if board.castling & BLACK_LONG != 0
                        && all & BLACK_LONG_CASTLE_MASK == 0
                        && enemy_attacked & BLACK_LONG_CASTLE_SAFE_MASK == 0
                    {
                        out.push(Move::long_castle(side));
                    }
                }
            }
        }
        _ => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn piece_moves_check(
    board: &Board,
    tables: &LookupTables,
    sq: Square,
    side: Color,
    block_path: u64,
    ep_available: bool,
    pinned: u64,
    enemy_attacked: u64,
    double_check: bool,
    out: &mut Vec<Move>,
) {
    // a pinned piece can never resolve a check
    if pinned & bit(sq) != 0 {
        return;
    }

    let all = board.all_pieces();
    let enemy = board.pieces(side.flip());
    let kind = board.piece_at(sq) & TYPE_MASK;

    if double_check || kind == KING {
        let mask = tables.king_masks[sq as usize];
        emit_targets(mask & !(all | enemy_attacked), sq, 5, false, false, out);
        emit_targets(mask & enemy & !enemy_attacked, sq, 3, false, true, out);
        return;
    }

    if kind != PAWN {
        let reach = attack_targets(tables, kind, sq, side, all) & block_path;
        let capture = reach & enemy;
        if capture != 0 {
            let dest = (63 - capture.leading_zeros()) as Square;
            out.push(Move::strike(sq, dest, 25 + priority_weight(dest)));
        }
        emit_targets(reach & !capture, sq, 5, false, false, out);
        return;
    }

    let capture_mask = match side {
        Color::White => tables.white_pawn_capture_masks[sq as usize],
        Color::Black => tables.black_pawn_capture_masks[sq as usize],
    };
    let capture = capture_mask & block_path & enemy;

    // pushes respect the real occupancy before the check line filter, so a
    // blocked double push never jumps the intermediate square
    let mut pushes = 0u64;
    match side {
        Color::White => {
            if all & bit(sq - 8) == 0 {
                pushes |= bit(sq - 8);
                if rank_of(sq) == 1 && all & bit(sq - 16) == 0 {
                    pushes |= bit(sq - 16);
                }
            }
        }
        Color::Black => {
            if all & bit(sq + 8) == 0 {
                pushes |= bit(sq + 8);
                if rank_of(sq) == 6 && all & bit(sq + 16) == 0 {
                    pushes |= bit(sq + 16);
                }
            }
        }
    }
    emit_targets(pushes & block_path & !enemy, sq, 5, true, false, out);
    if capture != 0 {
        emit_targets(capture, sq, 25, true, true, out);
    }
    if ep_available {
        if let Some(ep) = board.en_passant {
            let victim_rank = match side {
                Color::White => 4,
                Color::Black => 3,
            };
            let victim = square_at(file_of(ep), victim_rank);
            // only capturing the checking pawn itself resolves the check
            if bit(victim) & block_path != 0 && capture_mask & bit(ep) != 0 {
                out.push(Move::en_passant(sq, ep));
            }
        }
    }
}

pub(crate) fn slider_moves(
    table: &SliderTable,
    sq: Square,
    all: u64,
    enemy: u64,
    block_moves: u64,
    out: &mut Vec<Move>,
) {
    let entry = table.entry(sq, all | block_moves);
    out.extend_from_slice(&entry.quiets);

    // edge stops the mask left unresolved: empty ones are quiet moves
    let mut open = entry.stops & !(all | block_moves);
    while open != 0 {
        let dest = (63 - open.leading_zeros()) as Square;
        open &= !bit(dest);
        out.push(Move::quiet(sq, dest, 5 + priority_weight(dest)));
    }
    let mut captures = entry.stops & enemy & !block_moves;
    while captures != 0 {
        let dest = (63 - captures.leading_zeros()) as Square;
        captures &= !bit(dest);
        out.push(Move::strike(sq, dest, 50 + priority_weight(dest)));
    }
}

/// Emits one move per set bit, highest square first. Pawn targets expand
/// promotions and get the pawn priority offset; a two-rank pawn step keeps
/// its double-push kind so en passant bookkeeping survives check evasions.
pub(crate) fn emit_targets(
    bitboard: u64,
    source: Square,
    base: i32,
    pawn: bool,
    capture: bool,
    out: &mut Vec<Move>,
) {
    let mut bits = bitboard;
    while bits != 0 {
        let dest = (63 - bits.leading_zeros()) as Square;
        bits &= !bit(dest);
        let weight = priority_weight(dest);
        if !pawn {
            out.push(Move::new(source, dest, NO_PROMOTION, MoveKind::Normal, base + weight, false, capture));
        } else if rank_of(dest) == 0 || rank_of(dest) == 7 {
            for (piece, extra) in [(QUEEN, 50), (ROOK, 5), (BISHOP, 0), (KNIGHT, 0)] {
                out.push(Move::new(source, dest, piece, MoveKind::Normal, base + weight + extra, true, capture));
            }
        } else {
            let kind = if rank_of(source).abs_diff(rank_of(dest)) == 2 {
                MoveKind::DoublePush
            } else {
                MoveKind::Normal
            };
            out.push(Move::new(source, dest, NO_PROMOTION, kind, base + weight + 20, true, capture));
        }
    }
}

pub(crate) fn pawn_quiets(sq: Square, side: Color, blocked: u64, out: &mut Vec<Move>) {
    let file = file_of(sq) as usize;
    let rank = rank_of(sq) as usize;
    match side {
        Color::White => {
            if rank == 6 {
                if blocked & bit(sq - 8) == 0 {
                    for (piece, priority) in [(QUEEN, 30), (ROOK, 2), (BISHOP, 2), (KNIGHT, 2)] {
                        out.push(Move::promotion_push(sq, sq - 8, piece, priority));
                    }
                }
            } else if blocked & bit(sq - 8) == 0 {
                let weight = PRIORITY_WEIGHTS[file][rank + 2];
                out.push(Move::pawn_push(sq, sq - 8, 5 + weight + rank as i32));
                if rank == 1 && blocked & bit(sq - 16) == 0 {
                    out.push(Move::pawn_double(sq, sq - 16, 6 + weight + rank as i32));
                }
            }
        }
        Color::Black => {
            if rank == 1 {
                if blocked & bit(sq + 8) == 0 {
                    for (piece, priority) in [(QUEEN, 30), (ROOK, 2), (BISHOP, 2), (KNIGHT, 2)] {
                        out.push(Move::promotion_push(sq, sq + 8, piece, priority));
                    }
                }
            } else if blocked & bit(sq + 8) == 0 {
                out.push(Move::pawn_push(
                    sq,
                    sq + 8,
                    12 + PRIORITY_WEIGHTS[file][rank - 1] - rank as i32,
                ));
                if rank == 6 && blocked & bit(sq + 16) == 0 {
                    out.push(Move::pawn_double(
                        sq,
                        sq + 16,
                        13 + PRIORITY_WEIGHTS[file][rank - 2] - rank as i32,
                    ));
                }
            }
        }
    }
}

pub(crate) fn pawn_captures(sq: Square, side: Color, targets: u64, out: &mut Vec<Move>) {
    let file = file_of(sq) as i32;
    let rank = rank_of(sq);
    let (dest_rank, promoting) = match side {
        Color::White => (rank + 1, rank == 6),
        Color::Black => (rank - 1, rank == 1),
    };
    for step in [1i32, -1] {
        let dest_file = file + step;
        if !(0..8).contains(&dest_file) {
            continue;
        }
        let dest = square_at(dest_file as u8, dest_rank);
        if targets & bit(dest) == 0 {
            continue;
        }
        if promoting {
            for (piece, priority) in [(QUEEN, 65), (ROOK, 2), (BISHOP, 2), (KNIGHT, 2)] {
                out.push(Move::promotion_strike(sq, dest, piece, priority));
            }
        } else {
            out.push(Move::pawn_strike(sq, dest, 60));
        }
    }
}

/// Whether `attacker` attacks the square under the real occupancy.
pub fn attacked(pos: Square, board: &Board, tables: &LookupTables, attacker: Color) -> bool {
    let all = board.all_pieces();
    let base = attacker.base() as usize;
    let straight = tables.rook.attacks(pos, all)
        & (board.bitboards[base | ROOK as usize] | board.bitboards[base | QUEEN as usize]);
    let diagonal = tables.bishop.attacks(pos, all)
        & (board.bitboards[base | BISHOP as usize] | board.bitboards[base | QUEEN as usize]);
    let knights = tables.knight_masks[pos as usize] & board.bitboards[base | KNIGHT as usize];
    // a square is attacked by pawns exactly when a pawn of the attacker
    // stands where a defending pawn on the square could capture
    let pawns = match attacker {
        Color::White => {
            tables.black_pawn_capture_masks[pos as usize]
                & board.bitboards[WHITE_PAWN as usize]
        }
        Color::Black => {
            tables.white_pawn_capture_masks[pos as usize]
                & board.bitboards[BLACK_PAWN as usize]
        }
    };
    let kings = tables.king_masks[pos as usize] & board.bitboards[base | KING as usize];
    (straight | diagonal | knights | pawns | kings) != 0
}

/// Check state of a square: whether it is attacked, whether by two pieces at
/// once, and the union of the attack rays without the square itself.
fn attack_lines(
    pos: Square,
    board: &Board,
    tables: &LookupTables,
    attacker: Color,
) -> (bool, bool, u64) {
    let all = board.all_pieces();
    let base = attacker.base() as usize;
    let straight = tables.rook.attacks(pos, all)
        & (board.bitboards[base | ROOK as usize] | board.bitboards[base | QUEEN as usize]);
    let diagonal = tables.bishop.attacks(pos, all)
        & (board.bitboards[base | BISHOP as usize] | board.bitboards[base | QUEEN as usize]);
    let knights = tables.knight_masks[pos as usize] & board.bitboards[base | KNIGHT as usize];
    let pawns = match attacker {
        Color::White => {
            tables.black_pawn_capture_masks[pos as usize]
                & board.bitboards[WHITE_PAWN as usize]
        }
        Color::Black => {
            tables.white_pawn_capture_masks[pos as usize]
                & board.bitboards[BLACK_PAWN as usize]
        }
    };
    let kings = tables.king_masks[pos as usize] & board.bitboards[base | KING as usize];

    let attackers = straight | diagonal | knights | pawns | kings;
    if attackers == 0 {
        return (false, false, 0);
    }

    let count = attackers.count_ones();
    let mut lines = 0u64;
    let mut bits = attackers;
    while bits != 0 {
        let from = (63 - bits.leading_zeros()) as Square;
        bits &= !bit(from);
        lines |= tables.path[from as usize][pos as usize] & !bit(pos);
    }
    (count > 0, count > 1, lines)
}

/// Every square `side` attacks, with `skip` removed from the occupancy so
/// sliders attack through the defending king.
fn attacked_bitboard(board: &Board, tables: &LookupTables, side: Color, skip: Square) -> u64 {
    let all = board.all_pieces() & !bit(skip);
    let mut attacked = 0u64;
    let mut pieces = board.pieces(side);
    while pieces != 0 {
        let sq = (63 - pieces.leading_zeros()) as Square;
        pieces &= !bit(sq);
        attacked |= attack_targets(tables, board.piece_at(sq) & TYPE_MASK, sq, side, all);
    }
    attacked
}

fn attack_targets(
    tables: &LookupTables,
    kind: u8,
    sq: Square,
    side: Color,
    occupancy: u64,
) -> u64 {
    match kind {
        PAWN => match side {
            Color::White => tables.white_pawn_capture_masks[sq as usize],
            Color::Black => tables.black_pawn_capture_masks[sq as usize],
        },
        ROOK => tables.rook.attacks(sq, occupancy),
        BISHOP => tables.bishop.attacks(sq, occupancy),
        QUEEN => tables.rook.attacks(sq, occupancy) | tables.bishop.attacks(sq, occupancy),
        KNIGHT => tables.knight_masks[sq as usize],
        KING => tables.king_masks[sq as usize],
        _ => 0,
    }
}

/// Absolute pins against the side's king. Returns the pinned-piece mask and
/// a pin ray per pinned piece, keyed by its square bit; the ray includes the
/// pinning piece, so capturing it stays legal.
fn pin_states(board: &Board, side: Color) -> (u64, HashMap<u64, u64>) {
    let king = board.kings[side.index()];
    let enemy_side = side.flip();
    let enemy = board.pieces(enemy_side);
    let base = enemy_side.base() as usize;
    let occupied = board.all_pieces();

    let mut pinned = 0u64;
    let mut paths = HashMap::new();
    let straight_pinners =
        board.bitboards[base | ROOK as usize] | board.bitboards[base | QUEEN as usize];
    let diagonal_pinners =
        board.bitboards[base | BISHOP as usize] | board.bitboards[base | QUEEN as usize];

    for (dirs, pinners) in [(STRAIGHT_DIRS, straight_pinners), (DIAGONAL_DIRS, diagonal_pinners)] {
        for (df, dr) in dirs {
            let mut file = (king % 8) as i32;
            let mut row = (king / 8) as i32;
            let mut found = 0;
            let mut path = 0u64;
            let mut pinned_sq = king;
            let mut pinning_sq = king;
            loop {
                file += df;
                row += dr;
                if !(0..8).contains(&file) || !(0..8).contains(&row) {
                    break;
                }
                let sq = (row * 8 + file) as Square;
                if occupied & bit(sq) != 0 {
                    found += 1;
                    match found {
                        1 => pinned_sq = sq,
                        2 => {
                            pinning_sq = sq;
                            path |= bit(sq);
                        }
                        _ => break,
                    }
                    // rays past the first enemy piece cannot carry a pin
                    if enemy & bit(sq) != 0 {
                        break;
                    }
                } else {
                    path |= bit(sq);
                }
            }
            if found == 2 && pinners & bit(pinning_sq) != 0 {
                paths.insert(bit(pinned_sq), path);
                pinned |= bit(pinned_sq);
            }
        }
    }
    (pinned, paths)
}

/// Pawns whose en passant capture would open the king's rank: capturing
/// removes both the capturer and the victim, so a rank slider behind them
/// would give check. Only the en passant capture is affected; the pawn's
/// other moves stay legal.
fn ep_frozen_pawns(board: &Board, side: Color) -> u64 {
    let Some(ep) = board.en_passant else {
        return 0;
    };
    let king = board.kings[side.index()];
    let victim_rank = match side {
        Color::White => rank_of(ep).wrapping_sub(1),
        Color::Black => rank_of(ep) + 1,
    };
    if victim_rank != rank_of(king) {
        return 0;
    }

    let victim = square_at(file_of(ep), victim_rank);
    let own_pawn = side.base() | PAWN;
    let base = side.flip().base() as usize;
    let rank_sliders =
        board.bitboards[base | ROOK as usize] | board.bitboards[base | QUEEN as usize];

    let mut frozen = 0u64;
    for df in [-1i32, 1] {
        let file = file_of(victim) as i32 + df;
        if !(0..8).contains(&file) {
            continue;
        }
        let capturer = square_at(file as u8, victim_rank);
        if board.piece_at(capturer) != own_pawn {
            continue;
        }
        let occupied = board.all_pieces() & !bit(victim) & !bit(capturer);
        let step = if file_of(capturer) > file_of(king) { 1 } else { -1 };
        let mut f = file_of(king) as i32;
        loop {
            f += step;
            if !(0..8).contains(&f) {
                break;
            }
            let sq = square_at(f as u8, victim_rank);
            if occupied & bit(sq) == 0 {
                continue;
            }
            if rank_sliders & bit(sq) != 0 {
                frozen |= bit(capturer);
            }
            break;
        }
    }
    frozen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::zobrist::ZobristKeys;
    use std::sync::OnceLock;

    static TABLES: OnceLock<LookupTables> = OnceLock::new();

    fn tables() -> &'static LookupTables {
        TABLES.get_or_init(LookupTables::new)
    }

    fn perft(board: &Board, keys: &ZobristKeys, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = legal_moves(board, tables(), false);
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .iter()
            .map(|mv| {
                let mut next = board.clone();
                next.make_move(mv, keys);
                perft(&next, keys, depth - 1)
            })
            .sum()
    }

    fn quiet_board(mut board: Board) -> Board {
        board.consider_repetition = false;
        board.repetitions.clear();
        board
    }

    #[test]
    fn perft_from_the_starting_position() {
        let keys = ZobristKeys::new();
        let board = quiet_board(Board::starting(&keys));
        assert_eq!(perft(&board, &keys, 1), 20);
        assert_eq!(perft(&board, &keys, 2), 400);
        assert_eq!(perft(&board, &keys, 3), 8_902);
        assert_eq!(perft(&board, &keys, 4), 197_281);
    }

    #[test]
    fn perft_with_castling_and_en_passant_tangles() {
        let keys = ZobristKeys::new();
        let board = quiet_board(
            Board::from_fen(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0",
                &keys,
            )
            .unwrap(),
        );
        let moves = legal_moves(&board, tables(), false);
        assert!(moves.contains(&Move::short_castle(Color::White)));
        assert!(moves.contains(&Move::long_castle(Color::White)));
        assert_eq!(moves.len(), 48);
        assert_eq!(perft(&board, &keys, 2), 2_039);
        assert_eq!(perft(&board, &keys, 3), 97_862);
    }

    #[test]
    fn en_passant_is_allowed_when_no_discovery_threatens() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", &keys).unwrap();
        let moves = legal_moves(&board, tables(), false);
        let ep = Move::en_passant(square_at(4, 4), square_at(3, 5));
        assert!(moves.contains(&ep));
        assert_eq!(moves.len(), 7);
    }

    #[test]
    fn en_passant_exposing_the_king_rank_is_rejected() {
        let keys = ZobristKeys::new();
        // capturing d3 en passant would remove both rank-four blockers
        let board = Board::from_fen("8/8/8/8/k2Pp2Q/8/8/4K3 b - d3 0 1", &keys).unwrap();
        let moves = legal_moves(&board, tables(), false);
        assert!(moves.iter().all(|mv| mv.kind != MoveKind::EnPassant));
        // only the en passant capture is barred; the pawn still pushes
        let push = Move::pawn_push(square_at(4, 3), square_at(4, 2), 0);
        assert!(moves.contains(&push));
        assert_eq!(moves.len(), 6);
    }

    #[test]
    fn long_castle_requires_an_empty_knight_square() {
        let keys = ZobristKeys::new();
        let crowded =
            Board::from_fen("rn2k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1", &keys).unwrap();
        let moves = legal_moves(&crowded, tables(), false);
        assert!(moves.contains(&Move::short_castle(Color::White)));
        assert!(!moves.contains(&Move::long_castle(Color::White)));

        let mut black_turn = crowded.clone();
        black_turn.side = Color::Black;
        let moves = legal_moves(&black_turn, tables(), false);
        assert!(!moves.contains(&Move::long_castle(Color::Black)));

        let clear = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &keys).unwrap();
        let moves = legal_moves(&clear, tables(), false);
        assert!(moves.contains(&Move::long_castle(Color::White)));
    }

    #[test]
    fn capturing_the_checker_is_flagged_as_a_capture() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen("4k3/8/8/4r3/8/8/1B6/4K3 w - - 0 1", &keys).unwrap();
        let moves = legal_moves(&board, tables(), false);
        let take = moves
            .iter()
            .find(|mv| mv.source == square_at(1, 1) && mv.dest == square_at(4, 4))
            .unwrap();
        assert!(take.capture);

        // the capture is irreversible, so the repetition history resets
        let mut next = board.clone();
        next.make_move(take, &keys);
        assert_eq!(next.repetitions.len(), 1);
    }

    #[test]
    fn pinned_knight_cannot_move() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen("4k3/8/8/8/4r3/8/4N3/4K3 w - - 0 1", &keys).unwrap();
        let moves = legal_moves(&board, tables(), false);
        assert!(moves.iter().all(|mv| mv.source != square_at(4, 1)));
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn pinned_rook_slides_only_along_the_pin_ray() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen("4k3/8/8/4r3/8/4R3/8/4K3 w - - 0 1", &keys).unwrap();
        let moves = legal_moves(&board, tables(), false);
        let rook = square_at(4, 2);
        let rook_moves: Vec<&Move> = moves.iter().filter(|mv| mv.source == rook).collect();
        assert!(!rook_moves.is_empty());
        assert!(rook_moves.iter().all(|mv| file_of(mv.dest) == 4));
        // capturing the pinning rook stays available
        assert!(rook_moves.iter().any(|mv| mv.dest == square_at(4, 4)));
    }

    #[test]
    fn single_check_allows_blocks_and_interpositions() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen("4k3/8/8/8/4r3/8/3R4/4K3 w - - 0 1", &keys).unwrap();
        let moves = legal_moves(&board, tables(), false);
        assert!(moves.contains(&Move::quiet(square_at(3, 1), square_at(4, 1), 0)));
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn double_check_forces_the_king_to_move() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen("4k3/8/8/8/4r3/2b5/8/4K3 w - - 0 1", &keys).unwrap();
        let moves = legal_moves(&board, tables(), false);
        assert!(moves.iter().all(|mv| mv.source == square_at(4, 0)));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn attacked_sees_every_piece_kind() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        // f3 and e3 are covered by white pawns, f6 by the black knight
        assert!(attacked(square_at(5, 2), &board, tables(), Color::White));
        assert!(attacked(square_at(5, 5), &board, tables(), Color::Black));
        assert!(!attacked(square_at(4, 3), &board, tables(), Color::White));
        assert!(!attacked(square_at(4, 4), &board, tables(), Color::Black));
    }

    #[test]
    fn refutation_bonus_moves_a_reply_to_the_front() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        let heuristics = Heuristics::new();
        let quiet_knight = Move::quiet(square_at(6, 0), square_at(7, 2), 0);
        heuristics.refutation_set(board.hash_key, &quiet_knight, 200);
        let moves = ordered_moves(&board, tables(), &heuristics, None);
        assert_eq!(moves[0], quiet_knight);
    }

    #[test]
    fn ordering_prefers_center_pushes_without_heuristics() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        let heuristics = Heuristics::new();
        let moves = ordered_moves(&board, tables(), &heuristics, None);
        assert_eq!(moves.len(), 20);
        // the double pushes toward the center outrank rim knight hops
        let first = moves[0];
        assert!(first.pawn);
        assert_eq!(first.kind, MoveKind::DoublePush);
        assert!(matches!(file_of(first.dest), 3 | 4));
    }
}
