//! Core board vocabulary: sides, squares, packed piece codes and the
//! starting-position preset.
//!
//! Squares are bitboard indices. Bit `sq` of a `u64` is square `sq`, with
//! a8 = 0, h8 = 7, a1 = 56 and h1 = 63, so the top rank occupies the low
//! byte. File and rank helpers translate between that index and the usual
//! (file, rank) pair where rank 0 is white's back rank.

/// Bitboard index of a square, 0..64.
pub type Square = u8;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// High bit of the packed piece code for this side.
    #[inline]
    pub const fn base(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => COLOR_MASK,
        }
    }

    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[inline]
pub const fn square_at(file: u8, rank: u8) -> Square {
    (7 - rank) * 8 + file
}

#[inline]
pub const fn file_of(sq: Square) -> u8 {
    sq % 8
}

#[inline]
pub const fn rank_of(sq: Square) -> u8 {
    7 - sq / 8
}

#[inline]
pub const fn bit(sq: Square) -> u64 {
    1u64 << sq
}

// Packed piece codes, four bits each: type in the low three bits, side in
// the high bit. 0b0110 and 0b0111 are unused, empty squares hold 0b1111.
pub const PAWN: u8 = 0b000;
pub const ROOK: u8 = 0b001;
pub const KNIGHT: u8 = 0b010;
pub const BISHOP: u8 = 0b011;
pub const QUEEN: u8 = 0b100;
pub const KING: u8 = 0b101;

pub const WHITE_PAWN: u8 = PAWN;
pub const WHITE_ROOK: u8 = ROOK;
pub const WHITE_KNIGHT: u8 = KNIGHT;
pub const WHITE_BISHOP: u8 = BISHOP;
pub const WHITE_QUEEN: u8 = QUEEN;
pub const WHITE_KING: u8 = KING;
pub const BLACK_PAWN: u8 = PAWN | COLOR_MASK;
pub const BLACK_ROOK: u8 = ROOK | COLOR_MASK;
pub const BLACK_KNIGHT: u8 = KNIGHT | COLOR_MASK;
pub const BLACK_BISHOP: u8 = BISHOP | COLOR_MASK;
pub const BLACK_QUEEN: u8 = QUEEN | COLOR_MASK;
pub const BLACK_KING: u8 = KING | COLOR_MASK;
pub const EMPTY: u8 = 0b1111;

pub const TYPE_MASK: u8 = 0b0111;
pub const COLOR_MASK: u8 = 0b1000;

/// Promotion field value for non-promoting moves.
pub const NO_PROMOTION: u8 = 0b111;

/// Centipawn value per packed piece code, negative for black.
pub const PIECE_VALUE: [i32; 16] = [
    100, 500, 300, 300, 900, 1000, 0, 0, -100, -500, -300, -300, -900, -1000, 0, 0,
];

// Castling availability bits.
pub const WHITE_SHORT: u8 = 0b1000;
pub const WHITE_LONG: u8 = 0b0100;
pub const BLACK_SHORT: u8 = 0b0010;
pub const BLACK_LONG: u8 = 0b0001;

/// Packed rows of the standard starting position, indexed by rank.
/// File a sits in the low nibble of each row.
pub const STARTING_ROWS: [u32; 8] = [
    0b0001_0010_0011_0101_0100_0011_0010_0001,
    0b0000_0000_0000_0000_0000_0000_0000_0000,
    u32::MAX,
    u32::MAX,
    u32::MAX,
    u32::MAX,
    0b1000_1000_1000_1000_1000_1000_1000_1000,
    0b1001_1010_1011_1101_1100_1011_1010_1001,
];

pub fn piece_from_char(c: char) -> Option<u8> {
    let kind = match c.to_ascii_uppercase() {
        'P' => PAWN,
        'R' => ROOK,
        'N' => KNIGHT,
        'B' => BISHOP,
        'Q' => QUEEN,
        'K' => KING,
        _ => return None,
    };
    Some(if c.is_ascii_lowercase() {
        kind | COLOR_MASK
    } else {
        kind
    })
}

pub fn piece_to_char(piece: u8) -> char {
    let c = match piece & TYPE_MASK {
        PAWN => 'P',
        ROOK => 'R',
        KNIGHT => 'N',
        BISHOP => 'B',
        QUEEN => 'Q',
        KING => 'K',
        _ => return '.',
    };
    if piece == EMPTY {
        '.'
    } else if piece & COLOR_MASK != 0 {
        c.to_ascii_lowercase()
    } else {
        c
    }
}
