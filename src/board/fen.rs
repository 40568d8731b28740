//! FEN input and output for [`Board`].

use crate::board::board::Board;
use crate::board::chess_types::{
    file_of, piece_from_char, piece_to_char, rank_of, square_at, Color, Square, BLACK_LONG,
    BLACK_SHORT, EMPTY, WHITE_LONG, WHITE_SHORT,
};
use crate::board::zobrist::ZobristKeys;
use crate::errors::EngineError;

pub fn parse_square(text: &str) -> Result<Square, EngineError> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(EngineError::MalformedSquare(text.into()));
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file > 7 || rank > 7 {
        return Err(EngineError::MalformedSquare(text.into()));
    }
    Ok(square_at(file, rank))
}

pub fn square_name(sq: Square) -> String {
    format!(
        "{}{}",
        (b'a' + file_of(sq)) as char,
        (b'1' + rank_of(sq)) as char
    )
}

impl Board {
    /// Parses a FEN string. The halfmove clock field may be omitted; the
    /// fullmove number is ignored.
    pub fn from_fen(fen: &str, keys: &ZobristKeys) -> Result<Board, EngineError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(EngineError::FenFieldCount(fields.len()));
        }

        let rank_fields: Vec<&str> = fields[0].split('/').collect();
        if rank_fields.len() != 8 {
            return Err(EngineError::FenRankCount(rank_fields.len()));
        }
        let mut rows = [u32::MAX; 8];
        for (i, rank_text) in rank_fields.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0u32;
            for c in rank_text.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run;
                } else {
                    let piece =
                        piece_from_char(c).ok_or(EngineError::UnknownPiece(c))? as u32;
                    if file > 7 {
                        return Err(EngineError::FenRankWidth(i + 1));
                    }
                    rows[rank] = (rows[rank] & !(0xFu32 << (file * 4))) | (piece << (file * 4));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(EngineError::FenRankWidth(i + 1));
            }
        }

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(EngineError::UnknownSide(other.into())),
        };

        let mut castling = 0u8;
        if fields[2] != "-" {
            for c in fields[2].chars() {
                castling |= match c {
                    'K' => WHITE_SHORT,
                    'Q' => WHITE_LONG,
                    'k' => BLACK_SHORT,
                    'q' => BLACK_LONG,
                    other => return Err(EngineError::UnknownCastling(other)),
                };
            }
        }

        let en_passant = if fields[3] == "-" {
            None
        } else {
            Some(parse_square(fields[3])?)
        };

        let halfmove_clock = match fields.get(4) {
            Some(text) => text
                .parse::<u16>()
                .map_err(|_| EngineError::MalformedClock(text.to_string()))?,
            None => 0,
        };

        let mut board = Board::from_rows(rows, keys);
        board.side = side;
        board.castling = castling;
        board.en_passant = en_passant;
        board.halfmove_clock = halfmove_clock;
        board.hash_key = keys.compute(&board);
        board.repetitions.clear();
        *board.repetitions.entry(board.hash_key).or_insert(0) += 1;
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8u8).rev() {
            let mut empty_run = 0;
            for file in 0..8u8 {
                let piece = self.piece_at(square_at(file, rank));
                if piece == EMPTY {
                    empty_run += 1;
                } else {
                    if empty_run > 0 {
                        placement.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    placement.push(piece_to_char(piece));
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side {
            Color::White => "w",
            Color::Black => "b",
        };
        let mut rights = String::new();
        for (mask, c) in [
            (WHITE_SHORT, 'K'),
            (WHITE_LONG, 'Q'),
            (BLACK_SHORT, 'k'),
            (BLACK_LONG, 'q'),
        ] {
            if self.castling & mask != 0 {
                rights.push(c);
            }
        }
        if rights.is_empty() {
            rights.push('-');
        }
        let ep = match self.en_passant {
            Some(sq) => square_name(sq),
            None => "-".into(),
        };
        format!(
            "{} {} {} {} {} 1",
            placement, side, rights, ep, self.halfmove_clock
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_types::{
        BLACK_KING, STARTING_ROWS, WHITE_BISHOP, WHITE_KING, WHITE_QUEEN,
    };

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0";

    fn keys() -> ZobristKeys {
        ZobristKeys::new()
    }

    #[test]
    fn starting_fen_matches_preset() {
        let keys = keys();
        let board = Board::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &keys,
        )
        .unwrap();
        assert_eq!(board.rows, STARTING_ROWS);
        assert_eq!(board.side, Color::White);
        assert_eq!(board.castling, 0b1111);
        assert_eq!(board.en_passant, None);
        assert_eq!(board.hash_key, keys.compute(&board));
    }

    #[test]
    fn parses_complex_middlegame() {
        let keys = keys();
        let board = Board::from_fen(KIWIPETE, &keys).unwrap();
        assert_eq!(board.piece_at(square_at(4, 0)), WHITE_KING);
        assert_eq!(board.piece_at(square_at(4, 7)), BLACK_KING);
        assert_eq!(board.piece_at(square_at(5, 2)), WHITE_QUEEN);
        assert_eq!(board.piece_at(square_at(3, 1)), WHITE_BISHOP);
        assert_eq!(board.castling, 0b1111);
        assert_eq!(board.kings, [square_at(4, 0), square_at(4, 7)]);
    }

    #[test]
    fn parses_en_passant_square() {
        let keys = keys();
        let board = Board::from_fen(
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            &keys,
        )
        .unwrap();
        assert_eq!(board.en_passant, Some(square_at(2, 5)));
    }

    #[test]
    fn rejects_malformed_input() {
        let keys = keys();
        assert_eq!(
            Board::from_fen("8/8/8 w - -", &keys),
            Err(EngineError::FenRankCount(3))
        );
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/7x w - - 0 1", &keys),
            Err(EngineError::UnknownPiece('x'))
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/8 w - zz 0 1", &keys),
            Err(EngineError::MalformedSquare(_))
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/8 w - - abc 1", &keys),
            Err(EngineError::MalformedClock(_))
        ));
    }

    #[test]
    fn fen_roundtrip() {
        let keys = keys();
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            KIWIPETE,
            "4k3/8/8/8/8/8/8/4K3 b - - 12 1",
        ] {
            let board = Board::from_fen(fen, &keys).unwrap();
            let out = board.to_fen();
            let reparsed = Board::from_fen(&out, &keys).unwrap();
            assert_eq!(board, reparsed);
            assert_eq!(board.halfmove_clock, reparsed.halfmove_clock);
        }
    }
}
