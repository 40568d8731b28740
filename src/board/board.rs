//! The packed board.
//!
//! Piece placement lives in eight `u32` rows, one nibble per square, with
//! redundant caches kept in lockstep: one bitboard per packed piece code,
//! king squares, signed material totals, a pawn count and the 32-bit
//! repetition hash. `make_move` maintains every cache incrementally; there
//! is no unmake, callers clone the board before mutating.

use std::collections::HashMap;

use crate::board::chess_types::{
    bit, file_of, piece_to_char, rank_of, square_at, Color, Square, BLACK_PAWN, BLACK_ROOK,
    EMPTY, KING, NO_PROMOTION, PAWN, PIECE_VALUE, STARTING_ROWS, TYPE_MASK, WHITE_PAWN,
    WHITE_ROOK,
};
use crate::board::zobrist::ZobristKeys;
use crate::movegen::moves::{Move, MoveKind};
use crate::tables::lookup::LookupTables;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
}

#[derive(Clone, Debug)]
pub struct Board {
    /// Packed piece rows indexed by rank, file a in the low nibble.
    pub rows: [u32; 8],
    /// One bitboard per packed piece code; slots 6 and 7 stay empty.
    pub bitboards: [u64; 14],
    pub kings: [Square; 2],
    /// Signed material per side: white positive, black negative.
    pub values: [i32; 2],
    /// Pawns of both sides together.
    pub pawns: u8,
    pub side: Color,
    pub en_passant: Option<Square>,
    pub castling: u8,
    /// Which sides have actually castled: 0b10 white, 0b01 black.
    pub castled: u8,
    pub halfmove_clock: u16,
    pub hash_key: u32,
    /// When false, hash and repetition bookkeeping are skipped entirely.
    pub consider_repetition: bool,
    pub repetitions: HashMap<u32, u8>,
}

impl Board {
    pub fn starting(keys: &ZobristKeys) -> Board {
        Board::from_rows(STARTING_ROWS, keys)
    }

    /// Builds a board from packed rows with white to move and full castling
    /// rights.
    pub fn from_rows(rows: [u32; 8], keys: &ZobristKeys) -> Board {
        let mut board = Board {
            rows,
            bitboards: [0; 14],
            kings: [0; 2],
            values: [0; 2],
            pawns: 0,
            side: Color::White,
            en_passant: None,
            castling: 0b1111,
            castled: 0,
            halfmove_clock: 0,
            hash_key: 0,
            consider_repetition: true,
            repetitions: HashMap::new(),
        };
        board.refresh_caches();
        board.hash_key = keys.compute(&board);
        board.add_repetition();
        board
    }

    /// Rebuilds every derived cache from the packed rows.
    pub fn refresh_caches(&mut self) {
        self.bitboards = [0; 14];
        self.values = [0; 2];
        self.pawns = 0;
        for sq in 0..64u8 {
            let piece = self.piece_at(sq);
            if piece == EMPTY {
                continue;
            }
            self.bitboards[piece as usize] |= bit(sq);
            let side = (piece >> 3) as usize;
            self.values[side] += PIECE_VALUE[piece as usize];
            if piece & TYPE_MASK == PAWN {
                self.pawns += 1;
            }
            if piece & TYPE_MASK == KING {
                self.kings[side] = sq;
            }
        }
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> u8 {
        ((self.rows[rank_of(sq) as usize] >> (file_of(sq) * 4)) & 0xF) as u8
    }

    #[inline]
    pub fn set_piece(&mut self, sq: Square, piece: u8) {
        let rank = rank_of(sq) as usize;
        let shift = file_of(sq) * 4;
        self.rows[rank] = (self.rows[rank] & !(0xFu32 << shift)) | ((piece as u32) << shift);
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        let rank = rank_of(sq) as usize;
        let shift = file_of(sq) * 4;
        self.rows[rank] |= 0xFu32 << shift;
    }

    #[inline]
    pub fn pieces(&self, side: Color) -> u64 {
        let base = side.index() * 8;
        self.bitboards[base..base + 6].iter().fold(0, |acc, bb| acc | bb)
    }

    #[inline]
    pub fn all_pieces(&self) -> u64 {
        self.pieces(Color::White) | self.pieces(Color::Black)
    }

    fn add_repetition(&mut self) {
        if self.consider_repetition {
            *self.repetitions.entry(self.hash_key).or_insert(0) += 1;
        }
    }

    /// Applies a move for the side to move. The move must come from the
    /// legal generator; nothing is validated here.
    pub fn make_move(&mut self, mv: &Move, keys: &ZobristKeys) {
        let side = self.side.index();
        let opponent = 1 - side;
        let consider = self.consider_repetition;

        self.halfmove_clock += 1;
        // every move flips the side, so the side key toggles every time
        if consider {
            self.hash_key ^= keys.black_to_move;
        }

        let mover = self.piece_at(mv.source);
        self.bitboards[mover as usize] ^= bit(mv.source);

        let target = self.piece_at(mv.dest);
        if target != EMPTY {
            self.values[opponent] -= PIECE_VALUE[target as usize];
            self.bitboards[target as usize] ^= bit(mv.dest);
            self.halfmove_clock = 0;
            if target & TYPE_MASK == PAWN {
                self.pawns -= 1;
            }
            if consider {
                self.hash_key ^= keys.pieces[target as usize][mv.dest as usize];
            }
        }

        if mv.promotion == NO_PROMOTION {
            self.bitboards[mover as usize] ^= bit(mv.dest);
            self.set_piece(mv.dest, mover);
            if mover & TYPE_MASK == PAWN {
                self.halfmove_clock = 0;
            }
            if mover & TYPE_MASK == KING {
                self.kings[side] = mv.dest;
            }
        } else {
            let promoted = self.side.base() | mv.promotion;
            self.bitboards[promoted as usize] ^= bit(mv.dest);
            self.set_piece(mv.dest, promoted);
            self.halfmove_clock = 0;
            self.pawns -= 1;
            self.values[side] +=
                PIECE_VALUE[promoted as usize] - PIECE_VALUE[(self.side.base() | PAWN) as usize];
        }

        if consider {
            self.hash_key ^= keys.pieces[mover as usize][mv.source as usize];
            self.hash_key ^= keys.pieces[self.piece_at(mv.dest) as usize][mv.dest as usize];
            self.hash_key ^= keys.castling[self.castling as usize];
            if let Some(ep) = self.en_passant {
                self.hash_key ^= keys.en_passant_files[file_of(ep) as usize];
            }
        }

        self.clear(mv.source);
        self.en_passant = None;

        let saved_rights = self.castling;
        self.castling &= mv.castling_ban;
        if saved_rights != self.castling || mv.pawn || mv.capture {
            self.repetitions.clear();
        }
        if consider {
            self.hash_key ^= keys.castling[self.castling as usize];
        }

        match mv.kind {
            MoveKind::Normal => {}
            MoveKind::DoublePush => {
                let file = file_of(mv.dest);
                let ep_rank = if self.side == Color::White { 2 } else { 5 };
                self.en_passant = Some(square_at(file, ep_rank));
                if consider {
                    self.hash_key ^= keys.en_passant_files[file as usize];
                }
            }
            MoveKind::ShortCastle => {
                let (from, to, rook) = if self.side == Color::White {
                    (63, 61, WHITE_ROOK)
                } else {
                    (7, 5, BLACK_ROOK)
                };
                self.move_rook(from, to, rook, keys, consider);
                self.castled |= if self.side == Color::White { 0b10 } else { 0b01 };
            }
            MoveKind::LongCastle => {
                let (from, to, rook) = if self.side == Color::White {
                    (56, 59, WHITE_ROOK)
                } else {
                    (0, 3, BLACK_ROOK)
                };
                self.move_rook(from, to, rook, keys, consider);
                self.castled |= if self.side == Color::White { 0b10 } else { 0b01 };
            }
            MoveKind::EnPassant => {
                let (victim_rank, victim) = if self.side == Color::White {
                    (4, BLACK_PAWN)
                } else {
                    (3, WHITE_PAWN)
                };
                let victim_sq = square_at(file_of(mv.dest), victim_rank);
                self.bitboards[victim as usize] ^= bit(victim_sq);
                self.clear(victim_sq);
                self.values[opponent] -= PIECE_VALUE[victim as usize];
                if consider {
                    self.hash_key ^= keys.pieces[victim as usize][victim_sq as usize];
                }
            }
        }

        self.add_repetition();
        self.side = self.side.flip();
    }

    fn move_rook(&mut self, from: Square, to: Square, rook: u8, keys: &ZobristKeys, consider: bool) {
        self.bitboards[rook as usize] ^= bit(from) | bit(to);
        self.set_piece(to, rook);
        self.clear(from);
        if consider {
            self.hash_key ^= keys.pieces[rook as usize][from as usize];
            self.hash_key ^= keys.pieces[rook as usize][to as usize];
        }
    }

    /// Threefold repetition, exhausted halfmove clock, or bare-minor
    /// material on both sides.
    pub fn is_draw(&self) -> bool {
        self.repetitions.values().any(|&count| count == 3)
            || self.halfmove_clock > 100
            || (self.pawns == 0 && self.values[0] <= 1300 && self.values[1] >= -1300)
    }

    /// Total material on the board, kings included, below the endgame
    /// threshold.
    #[inline]
    pub fn is_endgame(&self) -> bool {
        self.values[0] + self.values[1].abs() < 5300
    }

    /// Material balance from white's point of view.
    #[inline]
    pub fn imbalance(&self) -> i32 {
        self.values[0] + self.values[1]
    }

    #[inline]
    pub fn all_material(&self) -> i32 {
        self.values[0] - self.values[1]
    }

    pub fn outcome(&self, tables: &LookupTables) -> Outcome {
        if self.is_draw() {
            return Outcome::Draw;
        }
        let moves = crate::movegen::generator::legal_moves(self, tables, false);
        if !moves.is_empty() {
            return Outcome::Ongoing;
        }
        let king = self.kings[self.side.index()];
        if crate::movegen::generator::attacked(king, self, tables, self.side.flip()) {
            match self.side {
                Color::White => Outcome::BlackWins,
                Color::Black => Outcome::WhiteWins,
            }
        } else {
            Outcome::Draw
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for rank in (0..8u8).rev() {
            out.push((b'1' + rank) as char);
            out.push(' ');
            for file in 0..8u8 {
                out.push(piece_to_char(self.piece_at(square_at(file, rank))));
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out
    }

    /// Reports the first structural difference to another board, comparing
    /// rows, caches and state fields. `None` when fully identical.
    pub fn diff_against(&self, other: &Board) -> Option<String> {
        for rank in 0..8 {
            if self.rows[rank] != other.rows[rank] {
                return Some(format!("rank {} rows differ", rank + 1));
            }
        }
        if self.side != other.side {
            return Some("side to move differs".into());
        }
        if self.en_passant != other.en_passant {
            return Some("en passant square differs".into());
        }
        if self.castling != other.castling {
            return Some("castling rights differ".into());
        }
        if self.castled != other.castled {
            return Some("castled flags differ".into());
        }
        if self.bitboards != other.bitboards {
            return Some("bitboards differ".into());
        }
        if self.kings != other.kings {
            return Some("king squares differ".into());
        }
        if self.values != other.values {
            return Some("material values differ".into());
        }
        if self.pawns != other.pawns {
            return Some("pawn counts differ".into());
        }
        if self.halfmove_clock != other.halfmove_clock {
            return Some("halfmove clocks differ".into());
        }
        None
    }
}

/// Position identity as the opening book sees it: placement, side to move,
/// en passant and castling rights. Clocks and history do not participate.
impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.rows == other.rows
            && self.side == other.side
            && self.en_passant == other.en_passant
            && self.castling == other.castling
    }
}

impl Eq for Board {}
