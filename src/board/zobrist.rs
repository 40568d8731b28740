//! 32-bit Zobrist hashing.
//!
//! Keys are drawn from a splitmix64 stream with a fixed seed so that hashes
//! are reproducible across runs and processes. The board maintains its hash
//! incrementally during move application; [`ZobristKeys::compute`] performs
//! the full recomputation and is the reference the incremental path must
//! agree with.

use crate::board::board::Board;
use crate::board::chess_types::{file_of, Color, EMPTY};

/// Key tables for every hashed component of a position.
///
/// Piece keys are indexed by packed piece code and square; the two unused
/// codes (0b0110, 0b0111) keep zeroed rows. Castling keys cover all sixteen
/// right combinations, en passant is hashed by file only.
pub struct ZobristKeys {
    pub pieces: [[u32; 64]; 14],
    pub castling: [u32; 16],
    pub en_passant_files: [u32; 8],
    pub black_to_move: u32,
}

const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl ZobristKeys {
    pub fn new() -> ZobristKeys {
        let mut state = SEED;
        let mut draw = || splitmix64(&mut state) as u32;

        let mut pieces = [[0u32; 64]; 14];
        for (code, row) in pieces.iter_mut().enumerate() {
            if code == 6 || code == 7 {
                continue;
            }
            for key in row.iter_mut() {
                *key = draw();
            }
        }
        let mut castling = [0u32; 16];
        for key in castling.iter_mut() {
            *key = draw();
        }
        let mut en_passant_files = [0u32; 8];
        for key in en_passant_files.iter_mut() {
            *key = draw();
        }
        ZobristKeys {
            pieces,
            castling,
            en_passant_files,
            black_to_move: draw(),
        }
    }

    /// Hashes a position from scratch.
    pub fn compute(&self, board: &Board) -> u32 {
        let mut hash = 0u32;
        for sq in 0..64u8 {
            let piece = board.piece_at(sq);
            if piece != EMPTY {
                hash ^= self.pieces[piece as usize][sq as usize];
            }
        }
        hash ^= self.castling[board.castling as usize];
        if let Some(ep) = board.en_passant {
            hash ^= self.en_passant_files[file_of(ep) as usize];
        }
        if board.side == Color::Black {
            hash ^= self.black_to_move;
        }
        hash
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        ZobristKeys::new()
    }
}
