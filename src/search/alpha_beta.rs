//! Alpha-beta search with a parallel root fan-out.
//!
//! Every root move gets its own thread and its own cloned board; workers
//! share nothing but the read-only context, so there is no locking in the
//! tree. The heuristic tables are updated from all workers at once through
//! relaxed atomics; lost updates only cost ordering quality.

use std::thread;

use crate::board::board::Board;
use crate::board::chess_types::Color;
use crate::context::EngineContext;
use crate::eval::evaluate::static_evaluate;
use crate::movegen::generator::{attacked, ordered_moves};
use crate::movegen::moves::Move;
use crate::book::opening_book::OpeningBook;
use crate::utils::timer::Timer;

/// Mate scores sit this far inside the integer limits so depth biasing
/// never overflows.
const MATE_MARGIN: i32 = 100;

pub struct SearchResult {
    pub best: Move,
    pub eval: i32,
    pub book_move: bool,
    pub time_ms: i64,
}

/// Searches the position to `depth` plies and returns the best move for the
/// side to move. When a book is supplied and knows the position at `ply`,
/// the book answers instead of the search.
///
/// Panics if the position has no legal moves; callers check game-over state
/// first.
pub fn best_move(
    board: &Board,
    depth: i32,
    ctx: &EngineContext,
    book: Option<(&OpeningBook, usize)>,
) -> SearchResult {
    if let Some((book, ply)) = book {
        if let Some(mv) = book.probe(board, ply, &mut rand::rng()) {
            log::debug!("book hit at ply {ply}");
            return SearchResult {
                best: mv,
                eval: 1,
                book_move: true,
                time_ms: 0,
            };
        }
    }

    let timer = Timer::start();
    let moves = ordered_moves(board, &ctx.tables, &ctx.heuristics, None);
    assert!(!moves.is_empty(), "no legal moves to search");

    let mut evals = vec![0i32; moves.len()];
    thread::scope(|scope| {
        for (mv, slot) in moves.iter().zip(evals.iter_mut()) {
            scope.spawn(move || {
                let mut child = board.clone();
                child.make_move(mv, &ctx.keys);
                *slot = minimax(&child, depth - 1, i32::MIN, i32::MAX, Some(mv), ctx);
            });
        }
    });

    let mut best = 0;
    for i in 1..evals.len() {
        let better = match board.side {
            Color::White => evals[i] > evals[best],
            Color::Black => evals[i] < evals[best],
        };
        if better {
            best = i;
        }
    }
    let time_ms = timer.stop();
    log::debug!(
        "depth {depth} search over {} root moves done in {time_ms}ms, eval {}",
        moves.len(),
        evals[best]
    );
    SearchResult {
        best: moves[best],
        eval: evals[best],
        book_move: false,
        time_ms,
    }
}

/// Plain minimax with alpha-beta pruning. `previous` is the move that led
/// here, keyed into the countermove table on a cutoff.
pub fn minimax(
    board: &Board,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
    previous: Option<&Move>,
    ctx: &EngineContext,
) -> i32 {
    if board.is_draw() {
        return 0;
    }
    if depth == 0 {
        return static_evaluate(board, &ctx.tables);
    }

    let moves = ordered_moves(board, &ctx.tables, &ctx.heuristics, None);
    if moves.is_empty() {
        let king = board.kings[board.side.index()];
        if attacked(king, board, &ctx.tables, board.side.flip()) {
            // mate: deeper remaining depth means closer to the root and a
            // stronger score for the winner
            return match board.side {
                Color::White => i32::MIN + MATE_MARGIN - depth,
                Color::Black => i32::MAX - MATE_MARGIN + depth,
            };
        }
        return 0;
    }

    match board.side {
        Color::White => {
            let mut eval = i32::MIN;
            for mv in &moves {
                let mut child = board.clone();
                child.make_move(mv, &ctx.keys);
                eval = eval.max(minimax(&child, depth - 1, alpha, beta, Some(mv), ctx));
                alpha = alpha.max(eval);
                if eval >= beta {
                    store_cutoff(board, mv, previous, depth, ctx);
                    break;
                }
            }
            eval
        }
        Color::Black => {
            let mut eval = i32::MAX;
            for mv in &moves {
                let mut child = board.clone();
                child.make_move(mv, &ctx.keys);
                eval = eval.min(minimax(&child, depth - 1, alpha, beta, Some(mv), ctx));
                beta = beta.min(eval);
                if eval <= alpha {
                    store_cutoff(board, mv, previous, depth, ctx);
                    break;
                }
            }
            eval
        }
    }
}

fn store_cutoff(board: &Board, mv: &Move, previous: Option<&Move>, depth: i32, ctx: &EngineContext) {
    ctx.heuristics.refutation_set(board.hash_key, mv, 100);
    ctx.heuristics.counter_set(previous, mv, depth * depth);
    ctx.heuristics.history_update(board.side, mv, depth * depth);
}
