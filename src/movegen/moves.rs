//! The move model.
//!
//! A [`Move`] carries everything `make_move` needs without re-deriving it:
//! the squares, an optional promotion piece type, the special-move kind, the
//! castling rights surviving the move, and the pawn/capture flags that drive
//! repetition bookkeeping. The ordering priority is advisory and never takes
//! part in equality.

use crate::board::chess_types::{Color, Square, NO_PROMOTION};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveKind {
    Normal,
    DoublePush,
    ShortCastle,
    LongCastle,
    EnPassant,
}

impl MoveKind {
    #[inline]
    pub const fn code(self) -> u32 {
        match self {
            MoveKind::Normal => 0,
            MoveKind::DoublePush => 1,
            MoveKind::ShortCastle => 2,
            MoveKind::LongCastle => 3,
            MoveKind::EnPassant => 4,
        }
    }

    #[inline]
    fn from_code(code: u32) -> MoveKind {
        match code {
            1 => MoveKind::DoublePush,
            2 => MoveKind::ShortCastle,
            3 => MoveKind::LongCastle,
            4 => MoveKind::EnPassant,
            _ => MoveKind::Normal,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub source: Square,
    pub dest: Square,
    /// Piece type code of the promotion target, [`NO_PROMOTION`] otherwise.
    pub promotion: u8,
    pub kind: MoveKind,
    pub priority: i32,
    /// Castling rights mask the move leaves intact.
    pub castling_ban: u8,
    pub pawn: bool,
    pub capture: bool,
}

// Rights survive unless the move touches a rook corner or moves the king.
const fn rights_after(source: Square, dest: Square) -> u8 {
    let mut ban = 0b1111u8;
    let mut i = 0;
    let ends = [source, dest];
    while i < 2 {
        match ends[i] {
            63 => ban &= 0b0111, // h1
            56 => ban &= 0b1011, // a1
            7 => ban &= 0b1101,  // h8
            0 => ban &= 0b1110,  // a8
            _ => {}
        }
        i += 1;
    }
    match source {
        60 => 0b0011, // e1
        4 => 0b1100,  // e8
        _ => ban,
    }
}

impl Move {
    pub const fn new(
        source: Square,
        dest: Square,
        promotion: u8,
        kind: MoveKind,
        priority: i32,
        pawn: bool,
        capture: bool,
    ) -> Move {
        Move {
            source,
            dest,
            promotion,
            kind,
            priority,
            castling_ban: rights_after(source, dest),
            pawn,
            capture,
        }
    }

    pub const fn quiet(source: Square, dest: Square, priority: i32) -> Move {
        Move::new(source, dest, NO_PROMOTION, MoveKind::Normal, priority, false, false)
    }

    pub const fn strike(source: Square, dest: Square, priority: i32) -> Move {
        Move::new(source, dest, NO_PROMOTION, MoveKind::Normal, priority, false, true)
    }

    pub const fn pawn_push(source: Square, dest: Square, priority: i32) -> Move {
        Move::new(source, dest, NO_PROMOTION, MoveKind::Normal, priority, true, false)
    }

    pub const fn pawn_double(source: Square, dest: Square, priority: i32) -> Move {
        Move::new(source, dest, NO_PROMOTION, MoveKind::DoublePush, priority, true, false)
    }

    pub const fn pawn_strike(source: Square, dest: Square, priority: i32) -> Move {
        Move::new(source, dest, NO_PROMOTION, MoveKind::Normal, priority, true, true)
    }

    pub const fn promotion_push(source: Square, dest: Square, piece: u8, priority: i32) -> Move {
        Move::new(source, dest, piece, MoveKind::Normal, priority, true, false)
    }

    pub const fn promotion_strike(source: Square, dest: Square, piece: u8, priority: i32) -> Move {
        Move::new(source, dest, piece, MoveKind::Normal, priority, true, true)
    }

    pub const fn en_passant(source: Square, dest: Square) -> Move {
        Move::new(source, dest, NO_PROMOTION, MoveKind::EnPassant, 3, true, false)
    }

    pub const fn short_castle(side: Color) -> Move {
        match side {
            Color::White => Move::new(60, 62, NO_PROMOTION, MoveKind::ShortCastle, 6, false, false),
            Color::Black => Move::new(4, 6, NO_PROMOTION, MoveKind::ShortCastle, 6, false, false),
        }
    }

    pub const fn long_castle(side: Color) -> Move {
        match side {
            Color::White => Move::new(60, 58, NO_PROMOTION, MoveKind::LongCastle, 3, false, false),
            Color::Black => Move::new(4, 2, NO_PROMOTION, MoveKind::LongCastle, 3, false, false),
        }
    }

    /// Identity-relevant fields packed into 19 bits, for the heuristic
    /// tables. Two moves compare equal exactly when their packs match.
    #[inline]
    pub fn pack(&self) -> u32 {
        (self.source as u32)
            | (self.dest as u32) << 6
            | (self.promotion as u32) << 12
            | self.kind.code() << 15
            | (self.pawn as u32) << 18
    }

    pub fn unpack(packed: u32) -> Move {
        Move {
            source: (packed & 0x3F) as Square,
            dest: ((packed >> 6) & 0x3F) as Square,
            promotion: ((packed >> 12) & 0x7) as u8,
            kind: MoveKind::from_code((packed >> 15) & 0x7),
            priority: 0,
            castling_ban: rights_after((packed & 0x3F) as Square, ((packed >> 6) & 0x3F) as Square),
            pawn: packed & (1 << 18) != 0,
            capture: false,
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.source == other.source
            && self.dest == other.dest
            && self.promotion == other.promotion
            && self.kind == other.kind
            && self.pawn == other.pawn
    }
}

impl Eq for Move {}
