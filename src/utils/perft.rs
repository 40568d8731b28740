//! Perft: exhaustive legal-move tree counts for generator validation.
//!
//! Counts run on a board with repetition bookkeeping switched off, both for
//! speed and because perft nodes are positions, not game states. The
//! differential walk cross-checks the strict generator against pseudolegal
//! generation plus make-and-test filtering at every node and reports the
//! first disagreement with the position it happened in.

use crate::board::board::Board;
use crate::board::zobrist::ZobristKeys;
use crate::movegen::generator::legal_moves;
use crate::movegen::moves::Move;
use crate::movegen::pseudo::{filter_checks, pseudolegal_moves};
use crate::tables::lookup::LookupTables;
use crate::utils::batch::parallel_map;
use crate::utils::long_algebraic::move_to_lan;

fn quiet_clone(board: &Board) -> Board {
    let mut root = board.clone();
    root.consider_repetition = false;
    root
}

pub fn perft(board: &Board, depth: u32, tables: &LookupTables, keys: &ZobristKeys) -> u64 {
    if depth == 0 {
        return 1;
    }
    count(&quiet_clone(board), depth, tables, keys)
}

fn count(board: &Board, depth: u32, tables: &LookupTables, keys: &ZobristKeys) -> u64 {
    let moves = legal_moves(board, tables, false);
    // leaf counting: at depth one the move count is the node count
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in &moves {
        let mut child = board.clone();
        child.make_move(mv, keys);
        nodes += count(&child, depth - 1, tables, keys);
    }
    nodes
}

/// Per-root-move node counts, the usual shape for chasing a bad total.
pub fn divide(
    board: &Board,
    depth: u32,
    tables: &LookupTables,
    keys: &ZobristKeys,
) -> Vec<(Move, u64)> {
    let root = quiet_clone(board);
    let moves = legal_moves(&root, tables, false);
    moves
        .into_iter()
        .map(|mv| {
            let mut child = root.clone();
            child.make_move(&mv, keys);
            let nodes = if depth <= 1 {
                1
            } else {
                count(&child, depth - 1, tables, keys)
            };
            (mv, nodes)
        })
        .collect()
}

/// Perft with the root moves fanned out over the worker pool.
pub fn perft_parallel(
    board: &Board,
    depth: u32,
    tables: &LookupTables,
    keys: &ZobristKeys,
) -> u64 {
    if depth == 0 {
        return 1;
    }
    let root = quiet_clone(board);
    let moves = legal_moves(&root, tables, false);
    if depth == 1 {
        return moves.len() as u64;
    }
    parallel_map(&moves, |mv| {
        let mut child = root.clone();
        child.make_move(mv, keys);
        count(&child, depth - 1, tables, keys)
    })
    .into_iter()
    .sum()
}

/// Walks the tree comparing the strict generator against filtered
/// pseudolegal generation at every node. Returns the node count, or a
/// description of the first position where the two disagree.
pub fn perft_differential(
    board: &Board,
    depth: u32,
    tables: &LookupTables,
    keys: &ZobristKeys,
) -> Result<u64, String> {
    if depth == 0 {
        return Ok(1);
    }
    differential(&quiet_clone(board), depth, tables, keys)
}

fn differential(
    board: &Board,
    depth: u32,
    tables: &LookupTables,
    keys: &ZobristKeys,
) -> Result<u64, String> {
    let strict = legal_moves(board, tables, false);
    let filtered = filter_checks(pseudolegal_moves(board, tables), board, keys, tables);
    if let Some(report) = disagreement(&strict, &filtered, board) {
        return Err(report);
    }
    if depth == 1 {
        return Ok(strict.len() as u64);
    }
    let mut nodes = 0;
    for mv in &strict {
        let mut child = board.clone();
        child.make_move(mv, keys);
        nodes += differential(&child, depth - 1, tables, keys)?;
    }
    Ok(nodes)
}

fn disagreement(strict: &[Move], filtered: &[Move], board: &Board) -> Option<String> {
    let missing: Vec<String> = filtered
        .iter()
        .filter(|mv| !strict.contains(mv))
        .map(|mv| move_to_lan(mv))
        .collect();
    let extra: Vec<String> = strict
        .iter()
        .filter(|mv| !filtered.contains(mv))
        .map(|mv| move_to_lan(mv))
        .collect();
    if missing.is_empty() && extra.is_empty() {
        return None;
    }
    Some(format!(
        "generator disagreement in\n{}fen {}\nmissing from strict: [{}]\nextra in strict: [{}]",
        board.render(),
        board.to_fen(),
        missing.join(", "),
        extra.join(", "),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const PINS_AND_EP: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    static TABLES: OnceLock<LookupTables> = OnceLock::new();

    fn tables() -> &'static LookupTables {
        TABLES.get_or_init(LookupTables::new)
    }

    #[test]
    fn starting_position_counts() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        assert_eq!(perft(&board, 1, tables(), &keys), 20);
        assert_eq!(perft(&board, 2, tables(), &keys), 400);
        assert_eq!(perft(&board, 3, tables(), &keys), 8_902);
    }

    #[test]
    fn parallel_counts_match_the_references() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        assert_eq!(perft_parallel(&board, 4, tables(), &keys), 197_281);
        let kiwipete = Board::from_fen(KIWIPETE, &keys).unwrap();
        assert_eq!(perft_parallel(&kiwipete, 3, tables(), &keys), 97_862);
    }

    #[test]
    fn kiwipete_counts() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen(KIWIPETE, &keys).unwrap();
        assert_eq!(perft(&board, 1, tables(), &keys), 48);
        assert_eq!(perft(&board, 2, tables(), &keys), 2_039);
    }

    #[test]
    fn deep_reference_counts() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        assert_eq!(perft_parallel(&board, 5, tables(), &keys), 4_865_609);
        let kiwipete = Board::from_fen(KIWIPETE, &keys).unwrap();
        assert_eq!(perft_parallel(&kiwipete, 4, tables(), &keys), 4_085_603);
    }

    #[test]
    fn pin_and_en_passant_counts() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen(PINS_AND_EP, &keys).unwrap();
        assert_eq!(perft(&board, 1, tables(), &keys), 14);
        assert_eq!(perft(&board, 2, tables(), &keys), 191);
        assert_eq!(perft(&board, 3, tables(), &keys), 2_812);
    }

    #[test]
    fn divide_totals_agree_with_perft() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        let slices = divide(&board, 3, tables(), &keys);
        assert_eq!(slices.len(), 20);
        let total: u64 = slices.iter().map(|(_, nodes)| nodes).sum();
        assert_eq!(total, 8_902);
    }

    #[test]
    fn differential_walk_finds_no_disagreement() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        assert_eq!(perft_differential(&board, 3, tables(), &keys), Ok(8_902));
        let kiwipete = Board::from_fen(KIWIPETE, &keys).unwrap();
        assert_eq!(perft_differential(&kiwipete, 2, tables(), &keys), Ok(2_039));
    }
}
