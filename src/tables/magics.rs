//! Fixed magic factors for the sliding-piece perfect-hash tables.
//!
//! One 64-bit factor per square and piece; multiplying the masked occupancy
//! by the factor and keeping the top `bits` bits yields a collision-free
//! table index. The factors are the well-known Stockfish set and are never
//! regenerated at runtime.

pub const ROOK_MAGICS: [u64; 64] = [
    0x0080001020400080,
    0x0040001000200040,
    0x0080081000200080,
    0x0080040800100080,
    0x0080020400080080,
    0x0080010200040080,
    0x0080008001000200,
    0x0080002040800100,
    0x0000800020400080,
    0x0000400020005000,
    0x0000801000200080,
    0x0000800800100080,
    0x0000800400080080,
    0x0000800200040080,
    0x0000800100020080,
    0x0000800040800100,
    0x0000208000400080,
    0x0000404000201000,
    0x0000808010002000,
    0x0000808008001000,
    0x0000808004000800,
    0x0000808002000400,
    0x0000010100020004,
    0x0000020000408104,
    0x0000208080004000,
    0x0000200040005000,
    0x0000100080200080,
    0x0000080080100080,
    0x0000040080080080,
    0x0000020080040080,
    0x0000010080800200,
    0x0000800080004100,
    0x0000204000800080,
    0x0000200040401000,
    0x0000100080802000,
    0x0000080080801000,
    0x0000040080800800,
    0x0000020080800400,
    0x0000020001010004,
    0x0000800040800100,
    0x0000204000808000,
    0x0000200040008080,
    0x0000100020008080,
    0x0000080010008080,
    0x0000040008008080,
    0x0000020004008080,
    0x0000010002008080,
    0x0000004081020004,
    0x0000204000800080,
    0x0000200040008080,
    0x0000100020008080,
    0x0000080010008080,
    0x0000040008008080,
    0x0000020004008080,
    0x0000800100020080,
    0x0000800041000080,
    0x00FFFCDDFCED714A,
    0x007FFCDDFCED714A,
    0x003FFFCDFFD88096,
    0x0000040810002101,
    0x0001000204080011,
    0x0001000204000801,
    0x0001000082000401,
    0x0001FFFAABFAD1A2,
];

pub const BISHOP_MAGICS: [u64; 64] = [
    0x0002020202020200,
    0x0002020202020000,
    0x0004010202000000,
    0x0004040080000000,
    0x0001104000000000,
    0x0000821040000000,
    0x0000410410400000,
    0x0000104104104000,
    0x0000040404040400,
    0x0000020202020200,
    0x0000040102020000,
    0x0000040400800000,
    0x0000011040000000,
    0x0000008210400000,
    0x0000004104104000,
    0x0000002082082000,
    0x0004000808080800,
    0x0002000404040400,
    0x0001000202020200,
    0x0000800802004000,
    0x0000800400A00000,
    0x0000200100884000,
    0x0000400082082000,
    0x0000200041041000,
    0x0002080010101000,
    0x0001040008080800,
    0x0000208004010400,
    0x0000404004010200,
    0x0000840000802000,
    0x0000404002011000,
    0x0000808001041000,
    0x0000404000820800,
    0x0001041000202000,
    0x0000820800101000,
    0x0000104400080800,
    0x0000020080080080,
    0x0000404040040100,
    0x0000808100020100,
    0x0001010100020800,
    0x0000808080010400,
    0x0000820820004000,
    0x0000410410002000,
    0x0000082088001000,
    0x0000002011000800,
    0x0000080100400400,
    0x0001010101000200,
    0x0002020202000400,
    0x0001010101000200,
    0x0000410410400000,
    0x0000208208200000,
    0x0000002084100000,
    0x0000000020880000,
    0x0000001002020000,
    0x0000040408020000,
    0x0004040404040000,
    0x0002020202020000,
    0x0000104104104000,
    0x0000002082082000,
    0x0000000020841000,
    0x0000000000208800,
    0x0000000010020200,
    0x0000000404080200,
    0x0000040404040400,
    0x0002020202020200,
];

pub const ROOK_BITS: [u32; 64] = [
    12, 11, 11, 11, 11, 11, 11, 12, 11, 10, 10, 10, 10, 10, 10, 11, 11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11, 11, 10, 10, 10, 10, 10, 10, 11, 11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11, 12, 11, 11, 11, 11, 11, 11, 12,
];

pub const BISHOP_BITS: [u32; 64] = [
    6, 5, 5, 5, 5, 5, 5, 6, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 7, 7, 7, 7, 5, 5, 5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5, 5, 5, 7, 7, 7, 7, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 6, 5, 5, 5, 5, 5, 5, 6,
];

pub const ROOK_TABLE_SIZE: usize = 4096;
pub const BISHOP_TABLE_SIZE: usize = 512;

#[inline(always)]
pub fn magic_index(masked_occupancy: u64, magic: u64, bits: u32) -> usize {
    (masked_occupancy.wrapping_mul(magic) >> (64 - bits)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::geometry::{
        bishop_attacks_slow, bishop_mask, index_to_occupancy, rook_attacks_slow, rook_mask,
    };

    // collisions are only allowed between subsets with identical attack sets
    #[test]
    fn rook_magics_have_no_destructive_collisions() {
        for sq in [0u8, 7, 27, 36, 56, 63] {
            let mask = rook_mask(sq);
            let bits = ROOK_BITS[sq as usize];
            let mut table = vec![None::<u64>; 1 << bits];
            for i in 0..(1usize << mask.count_ones()) {
                let occ = index_to_occupancy(i, mask);
                let slot = magic_index(occ, ROOK_MAGICS[sq as usize], bits);
                let attacks = rook_attacks_slow(sq, occ);
                match table[slot] {
                    None => table[slot] = Some(attacks),
                    Some(existing) => assert_eq!(existing, attacks, "square {sq} slot {slot}"),
                }
            }
        }
    }

    #[test]
    fn bishop_magics_have_no_destructive_collisions() {
        for sq in [0u8, 9, 28, 35, 54, 63] {
            let mask = bishop_mask(sq);
            let bits = BISHOP_BITS[sq as usize];
            let mut table = vec![None::<u64>; 1 << bits];
            for i in 0..(1usize << mask.count_ones()) {
                let occ = index_to_occupancy(i, mask);
                let slot = magic_index(occ, BISHOP_MAGICS[sq as usize], bits);
                let attacks = bishop_attacks_slow(sq, occ);
                match table[slot] {
                    None => table[slot] = Some(attacks),
                    Some(existing) => assert_eq!(existing, attacks, "square {sq} slot {slot}"),
                }
            }
        }
    }

    #[test]
    fn bishop_index_stays_in_bounds() {
        for sq in 0..64u8 {
            let mask = bishop_mask(sq);
            let bits = BISHOP_BITS[sq as usize];
            assert!(1usize << bits <= BISHOP_TABLE_SIZE);
            let full = magic_index(mask, BISHOP_MAGICS[sq as usize], bits);
            assert!(full < 1 << bits);
        }
    }
}
