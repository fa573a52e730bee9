//! Magic bitboard tables for sliding pieces.
//!
//! Each square has a relevant-occupancy mask, a magic multiplier and a shift.
//! The table for a square is filled by walking every subset of its mask with
//! the Carry-Rippler trick and storing the slow ray attacks of that subset at
//! `(occ * magic) >> shift`.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Seed for the replacement search when a constant magic collides
const MAGIC_SEARCH_SEED: u64 = 0x6D61_6769_6373_2121;

#[rustfmt::skip]
const BISHOP_MAGICS: [u64; 64] = [
    0x0040_011a_0222_0020, 0x0410_1002_0141_c020, 0x0010_8080_9101_0110, 0x0009_0409_00a4_4040,
    0x0025_1040_1000_8100, 0x0800_8250_4104_0882, 0x080a_0809_0412_0000, 0x9000_4200_8420_0200,
    0x4001_9808_1000_8202, 0x0210_0450_4c00_4091, 0x0108_1000_a210_4400, 0x0004_0404_0080_8900,
    0x8048_1202_1080_3001, 0x5000_0501_2012_0a00, 0x0100_4200_902c_3040, 0x0202_2482_0812_0210,
    0x04c0_2092_0c58_0082, 0x1820_0002_0c04_0084, 0x0008_0090_0280_1011, 0x0008_2214_0400_1348,
    0x5804_008e_1022_0603, 0x0204_0826_0201_0400, 0x0401_8201_0801_1004, 0x0008_8405_0401_010f,
    0x0020_2000_080b_4420, 0x0028_0404_0210_0202, 0x0401_1000_8100_4202, 0x0081_1800_0900_4100,
    0x0448_1040_0804_4000, 0x4208_0080_0a41_6002, 0x0400_8600_21a2_3002, 0x0020_a4a3_2104_0201,
    0x4509_1822_4188_a000, 0x81a8_080c_0008_0988, 0x0007_1048_1004_0800, 0x1801_400a_0002_2200,
    0x1080_c404_0080_4100, 0x0002_0141_0002_0080, 0x0201_8802_00a1_0116, 0x2408_0841_4005_0103,
    0x0501_1002_1000_2288, 0x4241_8444_0202_2001, 0x0092_0020_2800_d420, 0x811c_1101_4104_0801,
    0x5000_6036_0080_0410, 0x1020_6000_4281_0441, 0x0018_1001_0200_40c0, 0x0030_0200_4319_0840,
    0x0045_0930_0220_0094, 0x4222_0210_8405_0425, 0x8020_0248_4c10_0100, 0x0000_1410_20a8_0900,
    0x2010_1040_0282_0410, 0x0404_4008_0101_0185, 0x00c0_500a_04d1_0002, 0x0125_2808_0108_2082,
    0x0005_0104_5004_8400, 0x1110_1200_8208_8202, 0x4212_1005_4404_0400, 0x4007_0100_1104_8800,
    0x0c20_9800_1420_8210, 0x0002_0049_0288_0200, 0x0004_1020_0104_0092, 0x5620_0202_0044_0988,
];

#[rustfmt::skip]
const ROOK_MAGICS: [u64; 64] = [
    0x0081_0020_0000_4868, 0x4041_1220_1408_1010, 0x8008_0910_0c20_0a04, 0x0804_1001_2820_8202,
    0x8104_0500_4882_0802, 0x0025_0082_220c_00c0, 0x8001_4201_0080_2010, 0x0022_c07a_0080_1100,
    0x4008_2002_1421_4000, 0x9082_0049_0182_00a0, 0x0001_8020_0810_0180, 0x0000_8008_0080_1000,
    0x0041_0010_6c48_0100, 0x0080_8064_002e_0080, 0x0801_0004_5300_0200, 0x4042_000b_0008_e001,
    0x0080_1a08_0002_0004, 0x9040_0100_4108_80a0, 0x812c_1200_2282_00c0, 0x0002_2200_4010_0a00,
    0x0042_0200_1004_0820, 0x8085_0100_4400_0802, 0x0000_2400_0801_1082, 0x80c4_0820_1000_8000,
    0x0000_0202_0800_01b0, 0x8040_0800_a000_7000, 0x4041_1000_8020_0082, 0x20c1_0021_0010_0008,
    0x0000_0801_0010_0500, 0x0a00_0400_8002_0080, 0x0201_0001_0084_0200, 0x0240_0212_0000_0420,
    0x1000_1000_0200_8010, 0x1041_0082_2500_4008, 0x1808_a001_0100_10c4, 0x04e2_0920_4200_1200,
    0x1880_8008_0080_0400, 0x8050_8200_8080_4400, 0x80f0_8003_0080_0200, 0x4000_0000_2204_1060,
    0x0402_5000_0022_0061, 0x0010_0040_2010_4000, 0x0926_c200_a082_0014, 0x0400_0800_1000_8080,
    0x0010_0800_0400_8080, 0x0882_0009_b002_0004, 0x0004_9008_0a0c_0005, 0x0018_0421_2082_0004,
    0x4004_2800_0495_0820, 0x9001_0184_402a_0600, 0x0908_4082_0450_2200, 0x0050_8800_8010_0080,
    0x0020_1400_8008_0180, 0x0010_8002_0014_0080, 0x0014_0210_8908_0400, 0x0008_0000_0021_0200,
    0x80c1_0000_0084_9000, 0x00c0_20d4_0210_0800, 0x0830_0120_1408_0601, 0x0414_0211_2810_1082,
    0x6001_081c_0040_8202, 0x0421_4409_0222_0881, 0x8090_801c_2041_0200, 0x8008_4080_0108_0090,
];

#[derive(Clone, Copy, Default)]
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u8,
    offset: usize,
}

pub(crate) struct MagicTable {
    entries: [MagicEntry; 64],
    attacks: Vec<u64>,
}

impl MagicTable {
    #[inline]
    pub(crate) fn attack(&self, square: usize, occupancy: u64) -> u64 {
        let entry = &self.entries[square];
        let index = ((occupancy & entry.mask).wrapping_mul(entry.magic) >> entry.shift) as usize;
        self.attacks[entry.offset + index]
    }
}

/// Relevant occupancy: every ray square except the last one before the edge.
pub(crate) fn relevant_mask(square: usize, directions: &[(i8, i8); 4]) -> u64 {
    let rank = (square / 8) as i8;
    let file = (square % 8) as i8;
    let mut mask = 0u64;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Slow ray walk, stopping on (and including) the first blocker.
pub(crate) fn slow_attacks(square: usize, occupancy: u64, directions: &[(i8, i8); 4]) -> u64 {
    let rank = (square / 8) as i8;
    let file = (square % 8) as i8;
    let mut attacks = 0u64;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

#[cfg(test)]
pub(crate) fn slow_bishop_attacks(square: usize, occupancy: u64) -> u64 {
    slow_attacks(square, occupancy, &BISHOP_DIRECTIONS)
}

#[cfg(test)]
pub(crate) fn slow_rook_attacks(square: usize, occupancy: u64) -> u64 {
    slow_attacks(square, occupancy, &ROOK_DIRECTIONS)
}

/// Every subset of `mask` with its attack set, via `occ = (occ - mask) & mask`.
fn enumerate_subsets(square: usize, mask: u64, directions: &[(i8, i8); 4]) -> Vec<(u64, u64)> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut occ = 0u64;
    loop {
        subsets.push((occ, slow_attacks(square, occ, directions)));
        occ = occ.wrapping_sub(mask) & mask;
        if occ == 0 {
            break;
        }
    }
    subsets
}

/// Fill a slot table for one magic; `None` on a destructive collision.
fn try_fill(subsets: &[(u64, u64)], magic: u64, shift: u8) -> Option<Vec<u64>> {
    let size = 1usize << (64 - shift);
    let mut slots: Vec<Option<u64>> = vec![None; size];
    for &(occ, attack) in subsets {
        let index = (occ.wrapping_mul(magic) >> shift) as usize;
        match slots[index] {
            None => slots[index] = Some(attack),
            Some(existing) if existing == attack => {}
            Some(_) => return None,
        }
    }
    Some(slots.into_iter().map(|s| s.unwrap_or(0)).collect())
}

fn find_magic(square: usize, mask: u64, subsets: &[(u64, u64)], shift: u8) -> (u64, Vec<u64>) {
    let mut rng = StdRng::seed_from_u64(MAGIC_SEARCH_SEED ^ square as u64);
    loop {
        let candidate = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(candidate) >> 56).count_ones() < 6 {
            continue;
        }
        if let Some(slots) = try_fill(subsets, candidate, shift) {
            return (candidate, slots);
        }
    }
}

fn build_table(magics: &[u64; 64], directions: &[(i8, i8); 4], kind: &str) -> MagicTable {
    let mut entries = [MagicEntry::default(); 64];
    let mut attacks = Vec::new();

    for (square, entry) in entries.iter_mut().enumerate() {
        let mask = relevant_mask(square, directions);
        let shift = 64 - mask.count_ones() as u8;
        let subsets = enumerate_subsets(square, mask, directions);

        let (magic, slots) = match try_fill(&subsets, magics[square], shift) {
            Some(slots) => (magics[square], slots),
            None => {
                log::debug!("{kind} magic for square {square} collides, searching a replacement");
                find_magic(square, mask, &subsets, shift)
            }
        };

        *entry = MagicEntry {
            mask,
            magic,
            shift,
            offset: attacks.len(),
        };
        attacks.extend_from_slice(&slots);
    }

    MagicTable { entries, attacks }
}

pub(crate) static BISHOP_TABLE: Lazy<MagicTable> =
    Lazy::new(|| build_table(&BISHOP_MAGICS, &BISHOP_DIRECTIONS, "bishop"));

pub(crate) static ROOK_TABLE: Lazy<MagicTable> =
    Lazy::new(|| build_table(&ROOK_MAGICS, &ROOK_DIRECTIONS, "rook"));
