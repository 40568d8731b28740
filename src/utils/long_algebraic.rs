//! Long-form coordinate notation, source square + destination square +
//! optional promotion letter.
//!
//! Parsing resolves the text against the legal-move set, so the returned
//! move carries the right special-move kind and flags for `make_move`.

use crate::board::board::Board;
use crate::board::chess_types::{BISHOP, KNIGHT, NO_PROMOTION, QUEEN, ROOK, TYPE_MASK};
use crate::board::fen::{parse_square, square_name};
use crate::errors::EngineError;
use crate::movegen::generator::legal_moves;
use crate::movegen::moves::Move;
use crate::tables::lookup::LookupTables;

pub fn promotion_to_char(piece: u8) -> Option<char> {
    match piece & TYPE_MASK {
        QUEEN => Some('q'),
        ROOK => Some('r'),
        BISHOP => Some('b'),
        KNIGHT => Some('n'),
        _ => None,
    }
}

pub fn promotion_from_char(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        'q' => Some(QUEEN),
        'r' => Some(ROOK),
        'b' => Some(BISHOP),
        'n' => Some(KNIGHT),
        _ => None,
    }
}

pub fn move_to_lan(mv: &Move) -> String {
    let mut out = square_name(mv.source);
    out.push_str(&square_name(mv.dest));
    if let Some(c) = promotion_to_char(mv.promotion) {
        out.push(c);
    }
    out
}

pub fn move_from_lan(
    text: &str,
    board: &Board,
    tables: &LookupTables,
) -> Result<Move, EngineError> {
    if text.len() != 4 && text.len() != 5 {
        return Err(EngineError::UnknownNotation(text.into()));
    }
    let source = parse_square(&text[0..2])?;
    let dest = parse_square(&text[2..4])?;
    let promotion = match text.chars().nth(4) {
        Some(c) => {
            promotion_from_char(c).ok_or_else(|| EngineError::UnknownNotation(text.into()))?
        }
        None => NO_PROMOTION,
    };

    legal_moves(board, tables, false)
        .into_iter()
        .find(|mv| mv.source == source && mv.dest == dest && mv.promotion & TYPE_MASK == promotion)
        .ok_or_else(|| EngineError::NoMatchingMove(text.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::square_at;
    use crate::board::zobrist::ZobristKeys;
    use crate::movegen::moves::MoveKind;
    use std::sync::OnceLock;

    static TABLES: OnceLock<LookupTables> = OnceLock::new();

    fn tables() -> &'static LookupTables {
        TABLES.get_or_init(LookupTables::new)
    }

    #[test]
    fn lan_resolves_special_move_kinds() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        let double = move_from_lan("e2e4", &board, tables()).unwrap();
        assert_eq!(double.kind, MoveKind::DoublePush);
        assert!(double.pawn);

        let castle_board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1", &keys).unwrap();
        let castle = move_from_lan("e1g1", &castle_board, tables()).unwrap();
        assert_eq!(castle.kind, MoveKind::ShortCastle);

        let ep_board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", &keys).unwrap();
        let ep = move_from_lan("e5d6", &ep_board, tables()).unwrap();
        assert_eq!(ep.kind, MoveKind::EnPassant);
    }

    #[test]
    fn promotions_roundtrip_through_lan() {
        let keys = ZobristKeys::new();
        let board = Board::from_fen("4k3/6P1/8/8/8/8/8/4K3 w - - 0 1", &keys).unwrap();
        let mv = move_from_lan("g7g8n", &board, tables()).unwrap();
        assert_eq!(mv.promotion & TYPE_MASK, KNIGHT);
        assert_eq!(move_to_lan(&mv), "g7g8n");
        assert_eq!(
            move_to_lan(&Move::quiet(square_at(6, 0), square_at(5, 2), 0)),
            "g1f3"
        );
    }

    #[test]
    fn illegal_or_malformed_text_is_rejected() {
        let keys = ZobristKeys::new();
        let board = Board::starting(&keys);
        assert!(matches!(
            move_from_lan("e2e5", &board, tables()),
            Err(EngineError::NoMatchingMove(_))
        ));
        assert!(matches!(
            move_from_lan("e2", &board, tables()),
            Err(EngineError::UnknownNotation(_))
        ));
        assert!(matches!(
            move_from_lan("z9e4", &board, tables()),
            Err(EngineError::MalformedSquare(_))
        ));
    }
}
