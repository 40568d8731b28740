//! Standard algebraic notation.
//!
//! Writing a move needs the position it is played from: disambiguation is
//! computed against the legal-move set and the check suffix against the
//! position after the move. Parsing resolves text the same way, against the
//! legal moves, so both directions agree on what a string means.

use crate::board::board::{Board, Outcome};
use crate::board::chess_types::{
    file_of, piece_to_char, rank_of, BISHOP, EMPTY, KING, KNIGHT, PAWN, QUEEN, ROOK, TYPE_MASK,
};
use crate::board::fen::{parse_square, square_name};
use crate::board::zobrist::ZobristKeys;
use crate::errors::EngineError;
use crate::movegen::generator::legal_moves;
use crate::movegen::moves::{Move, MoveKind};
use crate::tables::lookup::LookupTables;

fn file_char(sq: u8) -> char {
    (b'a' + file_of(sq)) as char
}

fn rank_char(sq: u8) -> char {
    (b'1' + rank_of(sq)) as char
}

/// True when the move takes a piece in this position, en passant included.
/// The stored capture flag is ordering metadata and is not trusted here.
fn takes(mv: &Move, board: &Board) -> bool {
    mv.kind == MoveKind::EnPassant || board.piece_at(mv.dest) != EMPTY
}

/// Writes the move in standard algebraic notation against the position it
/// is played from, check and mate suffixes included.
pub fn notate(
    mv: &Move,
    board: &Board,
    tables: &LookupTables,
    keys: &ZobristKeys,
) -> String {
    let mut out = match mv.kind {
        MoveKind::ShortCastle => "O-O".to_string(),
        MoveKind::LongCastle => "O-O-O".to_string(),
        _ if mv.pawn => {
            let mut text = String::new();
            if takes(mv, board) {
                text.push(file_char(mv.source));
                text.push('x');
            }
            text.push_str(&square_name(mv.dest));
            if mv.promotion & TYPE_MASK != TYPE_MASK {
                text.push('=');
                text.push(piece_to_char(mv.promotion & TYPE_MASK));
            }
            text
        }
        _ => {
            let piece = board.piece_at(mv.source);
            let mut text = String::new();
            text.push(piece_to_char(piece & TYPE_MASK));
            text.push_str(&disambiguation(mv, piece, board, tables));
            if takes(mv, board) {
                text.push('x');
            }
            text.push_str(&square_name(mv.dest));
            text
        }
    };

    let mut after = board.clone();
    after.make_move(mv, keys);
    match after.outcome(tables) {
        Outcome::WhiteWins | Outcome::BlackWins => out.push('#'),
        _ => {
            let king = after.kings[after.side.index()];
            if crate::movegen::generator::attacked(king, &after, tables, after.side.flip()) {
                out.push('+');
            }
        }
    }
    out
}

/// The shortest qualifier that separates this move from every other legal
/// move of the same piece type to the same square.
fn disambiguation(mv: &Move, piece: u8, board: &Board, tables: &LookupTables) -> String {
    let rivals: Vec<u8> = legal_moves(board, tables, false)
        .iter()
        .filter(|other| {
            other.dest == mv.dest
                && other.source != mv.source
                && board.piece_at(other.source) == piece
        })
        .map(|other| other.source)
        .collect();
    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|&sq| file_of(sq) != file_of(mv.source)) {
        return file_char(mv.source).to_string();
    }
    if rivals.iter().all(|&sq| rank_of(sq) != rank_of(mv.source)) {
        return rank_char(mv.source).to_string();
    }
    square_name(mv.source)
}

struct SanPattern {
    piece: u8,
    dest: u8,
    source_file: Option<u8>,
    source_rank: Option<u8>,
    promotion: Option<u8>,
}

fn split_suffix(text: &str) -> &str {
    text.trim_end_matches(['+', '#'])
}

fn parse_pattern(text: &str) -> Option<SanPattern> {
    let mut chars: Vec<char> = text.chars().collect();

    let promotion = if chars.len() >= 2 && chars[chars.len() - 2] == '=' {
        let piece = match chars[chars.len() - 1] {
            'Q' => QUEEN,
            'R' => ROOK,
            'B' => BISHOP,
            'N' => KNIGHT,
            _ => return None,
        };
        chars.truncate(chars.len() - 2);
        Some(piece)
    } else {
        None
    };

    let piece = match chars.first()? {
        'R' => ROOK,
        'N' => KNIGHT,
        'B' => BISHOP,
        'Q' => QUEEN,
        'K' => KING,
        'a'..='h' => PAWN,
        _ => return None,
    };
    if piece != PAWN {
        chars.remove(0);
    }

    if chars.len() < 2 {
        return None;
    }
    let dest_text: String = chars.split_off(chars.len() - 2).into_iter().collect();
    let dest = parse_square(&dest_text).ok()?;

    let mut source_file = None;
    let mut source_rank = None;
    for c in chars {
        match c {
            'x' => {}
            'a'..='h' => source_file = Some(c as u8 - b'a'),
            '1'..='8' => source_rank = Some(c as u8 - b'1'),
            _ => return None,
        }
    }
    Some(SanPattern {
        piece,
        dest,
        source_file,
        source_rank,
        promotion,
    })
}

/// Resolves standard algebraic text against the position's legal moves.
pub fn parse(text: &str, board: &Board, tables: &LookupTables) -> Result<Move, EngineError> {
    let bare = split_suffix(text);
    let moves = legal_moves(board, tables, false);

    if bare == "O-O" || bare == "0-0" {
        return moves
            .into_iter()
            .find(|mv| mv.kind == MoveKind::ShortCastle)
            .ok_or_else(|| EngineError::NoMatchingMove(text.into()));
    }
    if bare == "O-O-O" || bare == "0-0-0" {
        return moves
            .into_iter()
            .find(|mv| mv.kind == MoveKind::LongCastle)
            .ok_or_else(|| EngineError::NoMatchingMove(text.into()));
    }

    let pattern =
        parse_pattern(bare).ok_or_else(|| EngineError::UnknownNotation(text.into()))?;
    let side = board.side;
    let matches: Vec<Move> = moves
        .into_iter()
        .filter(|mv| {
            if mv.kind == MoveKind::ShortCastle || mv.kind == MoveKind::LongCastle {
                return false;
            }
            let piece = board.piece_at(mv.source);
            piece & TYPE_MASK == pattern.piece
                && piece >> 3 == side.index() as u8
                && mv.dest == pattern.dest
                && pattern.source_file.map_or(true, |f| file_of(mv.source) == f)
                && pattern.source_rank.map_or(true, |r| rank_of(mv.source) == r)
                && match pattern.promotion {
                    Some(piece) => mv.promotion & TYPE_MASK == piece,
                    None => mv.promotion & TYPE_MASK == TYPE_MASK,
                }
        })
        .collect();

    match matches.len() {
        0 => Err(EngineError::NoMatchingMove(text.into())),
        1 => Ok(matches[0]),
        _ => Err(EngineError::AmbiguousNotation(text.into())),
    }
}
