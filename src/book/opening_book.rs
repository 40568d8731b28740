//! Opening book: exact-position lookup into known opening lines.
//!
//! The book is a per-ply list of positions, each holding the moves seen from
//! it across every ingested line with a frequency weight. Lookup compares
//! whole positions, not hashes, so a transposition back into a book line is
//! still found. Lines are ingested in long algebraic notation and truncated
//! past the ingestion horizon.

use rand::Rng;

use crate::board::board::Board;
use crate::board::zobrist::ZobristKeys;
use crate::errors::EngineError;
use crate::movegen::moves::Move;
use crate::tables::lookup::LookupTables;
use crate::utils::long_algebraic::move_from_lan;

/// Number of ply slots kept for lookup.
const BOOK_PLIES: usize = 19;
/// Probes past this ply always miss; book lines are opening theory only.
const PROBE_HORIZON: usize = 17;
/// Plies of each line actually ingested.
const INGEST_PLIES: usize = 14;

struct BookMove {
    mv: Move,
    weight: u32,
}

struct BookEntry {
    position: Board,
    moves: Vec<BookMove>,
}

pub struct OpeningBook {
    slots: Vec<Vec<BookEntry>>,
}

impl OpeningBook {
    /// An empty book that knows only the starting position.
    pub fn new(keys: &ZobristKeys) -> OpeningBook {
        let mut slots: Vec<Vec<BookEntry>> = (0..BOOK_PLIES).map(|_| Vec::new()).collect();
        slots[0].push(BookEntry {
            position: Board::starting(keys),
            moves: Vec::new(),
        });
        OpeningBook { slots }
    }

    /// The built-in opening repertoire.
    pub fn standard(keys: &ZobristKeys, tables: &LookupTables) -> OpeningBook {
        let mut book = OpeningBook::new(keys);
        for line in STANDARD_LINES {
            if let Err(err) = book.ingest(line, keys, tables) {
                log::warn!("skipping unparseable book line '{line}': {err}");
            }
        }
        book
    }

    /// Replays one space-separated long-algebraic line from the starting
    /// position and records each position-move pair.
    pub fn ingest(
        &mut self,
        line: &str,
        keys: &ZobristKeys,
        tables: &LookupTables,
    ) -> Result<(), EngineError> {
        let mut board = Board::starting(keys);
        let mut nodes = Vec::new();
        for token in line.split_whitespace().take(INGEST_PLIES) {
            let mv = move_from_lan(token, &board, tables)?;
            board.make_move(&mv, keys);
            // the position after the move, paired with the move that led there
            nodes.push((board.clone(), mv));
        }
        self.add_line(&nodes);
        Ok(())
    }

    fn add_line(&mut self, nodes: &[(Board, Move)]) {
        let Some((first_board, first_move)) = nodes.first() else {
            return;
        };

        // the starting-position entry always exists at slot zero
        if Self::record(&mut self.slots[0][0], first_move) {
            self.slots[1].push(BookEntry {
                position: first_board.clone(),
                moves: Vec::new(),
            });
        }

        for (ply, (board_after, mv)) in nodes.iter().enumerate().skip(1) {
            let previous = &nodes[ply - 1].0;
            let Some(index) = self.slots[ply]
                .iter()
                .position(|entry| entry.position == *previous)
            else {
                continue;
            };
            let added = Self::record(&mut self.slots[ply][index], mv);
            if added && ply + 1 < INGEST_PLIES {
                self.slots[ply + 1].push(BookEntry {
                    position: board_after.clone(),
                    moves: Vec::new(),
                });
            }
        }
    }

    /// Adds the move to the entry or bumps its weight; true if it was new.
    fn record(entry: &mut BookEntry, mv: &Move) -> bool {
        for known in &mut entry.moves {
            if known.mv == *mv {
                known.weight += 1;
                return false;
            }
        }
        entry.moves.push(BookMove { mv: *mv, weight: 1 });
        true
    }

    /// A frequency-weighted random book move for the position, if the book
    /// knows it at this ply.
    pub fn probe<R: Rng + ?Sized>(&self, board: &Board, ply: usize, rng: &mut R) -> Option<Move> {
        if ply > PROBE_HORIZON {
            return None;
        }
        let entry = self.slots[ply]
            .iter()
            .find(|entry| entry.position == *board)?;
        match entry.moves.len() {
            0 => None,
            1 => Some(entry.moves[0].mv),
            _ => {
                let total: u64 = entry.moves.iter().map(|m| u64::from(m.weight)).sum();
                let mut pick = rng.random_range(0..total);
                for m in &entry.moves {
                    let weight = u64::from(m.weight);
                    if pick < weight {
                        return Some(m.mv);
                    }
                    pick -= weight;
                }
                Some(entry.moves[0].mv)
            }
        }
    }
}

/// Mainline theory in long algebraic notation, one line per opening.
const STANDARD_LINES: &[&str] = &[
    // Italian, giuoco pianissimo
    "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6 d2d3 f8c5 c2c3 d7d6 e1g1 e8g8 f1e1 a7a6",
    // Ruy Lopez, closed
    "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6 b5a4 g8f6 e1g1 f8e7 f1e1 b7b5 a4b3 d7d6",
    // Sicilian, Najdorf
    "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4 g8f6 b1c3 a7a6 c1e3 e7e5 d4b3 f8e7",
    // Sicilian, Sveshnikov
    "e2e4 c7c5 g1f3 b8c6 d2d4 c5d4 f3d4 g8f6 b1c3 e7e5 d4b5 d7d6 c1g5 a7a6",
    // French, classical
    "e2e4 e7e6 d2d4 d7d5 b1c3 g8f6 c1g5 f8e7 e4e5 f6d7 g5e7 d8e7 f2f4 a7a6",
    // Caro-Kann, classical
    "e2e4 c7c6 d2d4 d7d5 b1c3 d5e4 c3e4 c8f5 e4g3 f5g6 h2h4 h7h6 g1f3 b8d7",
    // Queen's Gambit Declined
    "d2d4 d7d5 c2c4 e7e6 b1c3 g8f6 c1g5 f8e7 e2e3 e8g8 g1f3 h7h6 g5h4 b7b6",
    // Queen's Gambit Accepted
    "d2d4 d7d5 c2c4 d5c4 g1f3 g8f6 e2e3 e7e6 f1c4 c7c5 e1g1 a7a6 d4c5 f8c5",
    // Slav
    "d2d4 d7d5 c2c4 c7c6 g1f3 g8f6 b1c3 d5c4 a2a4 c8f5 e2e3 e7e6 f1c4 f8b4",
    // King's Indian, classical
    "d2d4 g8f6 c2c4 g7g6 b1c3 f8g7 e2e4 d7d6 g1f3 e8g8 f1e2 e7e5 e1g1 b8c6",
    // Nimzo-Indian, Rubinstein
    "d2d4 g8f6 c2c4 e7e6 b1c3 f8b4 e2e3 e8g8 f1d3 d7d5 g1f3 c7c5 e1g1 b8c6",
    // English, four knights
    "c2c4 e7e5 b1c3 g8f6 g1f3 b8c6 g2g3 d7d5 c4d5 f6d5 f1g2 d5b6 e1g1 f8e7",
    // London
    "d2d4 d7d5 c1f4 g8f6 e2e3 c7c5 c2c3 b8c6 b1d2 e7e6 g1f3 f8d6 f4g3 e8g8",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::OnceLock;

    static TABLES: OnceLock<LookupTables> = OnceLock::new();

    fn tables() -> &'static LookupTables {
        TABLES.get_or_init(LookupTables::new)
    }

    #[test]
    fn starting_position_always_has_a_book_move() {
        let keys = ZobristKeys::new();
        let book = OpeningBook::standard(&keys, tables());
        let board = Board::starting(&keys);
        let mut rng = StdRng::seed_from_u64(11);
        let mv = book.probe(&board, 0, &mut rng).unwrap();
        // every standard line opens with a legal white move
        let legal = crate::movegen::generator::legal_moves(&board, tables(), false);
        assert!(legal.contains(&mv));
    }

    #[test]
    fn book_follows_a_known_line() {
        let keys = ZobristKeys::new();
        let mut book = OpeningBook::new(&keys);
        book.ingest("e2e4 e7e5 g1f3", &keys, tables()).unwrap();
        let mut board = Board::starting(&keys);
        let mut rng = StdRng::seed_from_u64(3);

        for (ply, expected) in ["e2e4", "e7e5", "g1f3"].into_iter().enumerate() {
            let mv = book.probe(&board, ply, &mut rng).unwrap();
            assert_eq!(crate::utils::long_algebraic::move_to_lan(&mv), expected);
            board.make_move(&mv, &keys);
        }
        // the line is exhausted
        assert!(book.probe(&board, 3, &mut rng).is_none());
    }

    #[test]
    fn repeated_lines_weight_the_shared_prefix() {
        let keys = ZobristKeys::new();
        let mut book = OpeningBook::new(&keys);
        book.ingest("e2e4 e7e5", &keys, tables()).unwrap();
        book.ingest("e2e4 c7c5", &keys, tables()).unwrap();
        book.ingest("d2d4 d7d5", &keys, tables()).unwrap();

        let entry = &book.slots[0][0];
        assert_eq!(entry.moves.len(), 2);
        let e4 = entry
            .moves
            .iter()
            .find(|m| m.mv.source == 52 && m.mv.dest == 36)
            .unwrap();
        assert_eq!(e4.weight, 2);
        // one continuation position per distinct first move
        assert_eq!(book.slots[1].len(), 2);
    }

    #[test]
    fn probe_rejects_unknown_positions_and_deep_plies() {
        let keys = ZobristKeys::new();
        let book = OpeningBook::standard(&keys, tables());
        let mut rng = StdRng::seed_from_u64(5);
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &keys).unwrap();
        assert!(book.probe(&board, 4, &mut rng).is_none());
        let start = Board::starting(&keys);
        assert!(book.probe(&start, 40, &mut rng).is_none());
    }
}
