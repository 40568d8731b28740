//! Crate root module declarations for the Ember Chess engine.
//!
//! This file exposes all top-level subsystems (board representation, move
//! generation, lookup tables, evaluation, search, and utility helpers) so
//! binaries, tests, and external tooling can import stable module paths.

pub mod board {
    pub mod board;
    pub mod chess_types;
    pub mod fen;
    pub mod zobrist;
}

pub mod movegen {
    pub mod generator;
    pub mod moves;
    pub mod ordering;
    pub mod pseudo;
}

pub mod tables {
    pub mod eval_entries;
    pub mod geometry;
    pub mod lookup;
    pub mod magics;
    pub mod weights;
}

pub mod book {
    pub mod opening_book;
}

pub mod eval {
    pub mod evaluate;
}

pub mod search {
    pub mod alpha_beta;
    pub mod session;
}

pub mod utils {
    pub mod algebraic;
    pub mod batch;
    pub mod long_algebraic;
    pub mod perft;
    pub mod timer;
}

pub mod context;
pub mod errors;
