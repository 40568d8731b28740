//! Game session: a playable game with a dynamic search depth.
//!
//! The session owns the live board and the move record, feeds the engine
//! side through the opening book while it lasts, and retunes the search
//! depth after every engine move from how long the last search took.

use std::sync::Arc;

use crate::board::board::{Board, Outcome};
use crate::context::EngineContext;
use crate::movegen::generator::legal_moves;
use crate::movegen::moves::Move;
use crate::search::alpha_beta::{best_move, SearchResult};
use crate::book::opening_book::OpeningBook;
use crate::utils::algebraic::notate;

/// Per-depth timing thresholds, indexed by the session's base depth. The
/// first column is the search time under which depth grows, the other two
/// the time over which it shrinks, midgame and endgame.
const THRESHOLDS: [[i64; 3]; 9] = [
    [0, 0, 0],
    [0, 1000, 1000],
    [0, 1000, 1000],
    [0, 1000, 1000],
    [50, 1000, 1000],
    [100, 5000, 2000],
    [300, 9000, 6000],
    [1500, 30000, 20000],
    [20000, 300000, 150000],
];

const DEPTH_CEILING: i32 = 8;

/// One played move: the position it produced, the move itself and how long
/// the engine searched for it (zero for book and human moves).
pub struct GameRecord {
    pub board: Board,
    pub mv: Move,
    pub time_ms: i64,
}

pub struct GameSession {
    ctx: Arc<EngineContext>,
    book: OpeningBook,
    pub board: Board,
    pub game: Vec<GameRecord>,
    depth: i32,
    depth_floor: i32,
    in_book: bool,
    ply: usize,
}

impl GameSession {
    pub fn new(ctx: Arc<EngineContext>, depth: i32) -> GameSession {
        let depth = depth.clamp(1, DEPTH_CEILING);
        let board = Board::starting(&ctx.keys);
        let book = OpeningBook::standard(&ctx.keys, &ctx.tables);
        GameSession {
            ctx,
            book,
            board,
            game: Vec::new(),
            depth,
            depth_floor: depth,
            in_book: true,
            ply: 0,
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn outcome(&self) -> Outcome {
        self.board.outcome(&self.ctx.tables)
    }

    /// Plays the move if it is legal in the current position.
    pub fn try_make(&mut self, mv: &Move) -> bool {
        let legal = legal_moves(&self.board, &self.ctx.tables, false);
        let Some(found) = legal.iter().find(|candidate| *candidate == mv) else {
            return false;
        };
        let found = *found;
        self.board.make_move(&found, &self.ctx.keys);
        self.record(found, 0);
        true
    }

    /// Lets the engine pick and play a move at the current dynamic depth.
    ///
    /// Panics if the game is over; check [`GameSession::outcome`] first.
    pub fn bot_move(&mut self) -> SearchResult {
        let book = if self.in_book {
            Some((&self.book, self.ply))
        } else {
            None
        };
        let result = best_move(&self.board, self.depth, &self.ctx, book);
        self.in_book = result.book_move;
        if !result.book_move {
            self.update_depth(result.time_ms);
        }
        self.board.make_move(&result.best, &self.ctx.keys);
        self.record(result.best, result.time_ms);
        result
    }

    /// Retunes the depth from the last search time. Thresholds stay indexed
    /// by the base depth the session started with, so one slow search at a
    /// raised depth does not flip the tuning row.
    pub fn update_depth(&mut self, time_ms: i64) {
        let row = THRESHOLDS[self.depth_floor as usize];
        let decrease = if self.board.is_endgame() { row[2] } else { row[1] };
        if time_ms < row[0] {
            self.depth += 1;
        } else if time_ms > decrease {
            self.depth -= 1;
        }
        self.depth = self.depth.clamp(self.depth_floor, DEPTH_CEILING);
    }

    fn record(&mut self, mv: Move, time_ms: i64) {
        self.game.push(GameRecord {
            board: self.board.clone(),
            mv,
            time_ms,
        });
        self.ply += 1;
    }

    /// The last played move in standard algebraic notation. The move is
    /// notated against the position it was played from.
    pub fn notate_last_move(&self) -> Option<String> {
        let last = self.game.last()?;
        let before = match self.game.len() {
            1 => Board::starting(&self.ctx.keys),
            n => self.game[n - 2].board.clone(),
        };
        Some(notate(&last.mv, &before, &self.ctx.tables, &self.ctx.keys))
    }
}
