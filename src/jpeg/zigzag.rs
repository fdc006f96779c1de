// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Zigzag scan order.
//!
//! Quantization tables are serialized in zigzag order and AC run-length
//! coding walks zigzag positions 1..=63; everything else stays in natural
//! (row * 8 + col) order.

/// Maps zigzag index (0–63) to natural row-major index (0–63).
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Maps natural row-major index (0–63) to zigzag index (0–63).
pub const NATURAL_TO_ZIGZAG: [usize; 64] = {
    let mut table = [0usize; 64];
    let mut i = 0;
    while i < 64 {
        table[ZIGZAG_TO_NATURAL[i]] = i;
        i += 1;
    }
    table
};

/// Natural index of zigzag position `i`.
#[inline]
pub fn zigzag(i: usize) -> usize {
    ZIGZAG_TO_NATURAL[i]
}

/// Zigzag position of natural index `i`.
#[inline]
pub fn zigzag_inverse(i: usize) -> usize {
    NATURAL_TO_ZIGZAG[i]
}

/// Reorder a natural-order block into zigzag order.
pub fn to_zigzag<T: Copy + Default>(natural: &[T; 64]) -> [T; 64] {
    let mut out = [T::default(); 64];
    for (zi, v) in out.iter_mut().enumerate() {
        *v = natural[ZIGZAG_TO_NATURAL[zi]];
    }
    out
}

/// Reorder a zigzag-order block back into natural order.
pub fn from_zigzag<T: Copy + Default>(zigzagged: &[T; 64]) -> [T; 64] {
    let mut out = [T::default(); 64];
    for (zi, &v) in zigzagged.iter().enumerate() {
        out[ZIGZAG_TO_NATURAL[zi]] = v;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for i in 0..64 {
            assert_eq!(zigzag_inverse(zigzag(i)), i);
            assert_eq!(zigzag(zigzag_inverse(i)), i);
        }
    }

    #[test]
    fn known_positions() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(1), 1);
        assert_eq!(zigzag(2), 8);
        assert_eq!(zigzag(3), 16);
        assert_eq!(zigzag(63), 63);
    }

    #[test]
    fn all_indices_covered() {
        let mut seen = [false; 64];
        for &idx in &ZIGZAG_TO_NATURAL {
            assert!(!seen[idx], "duplicate natural index {idx}");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn block_reorder_roundtrip() {
        let mut natural = [0i32; 64];
        for (i, v) in natural.iter_mut().enumerate() {
            *v = i as i32 * 3 - 90;
        }
        let zz = to_zigzag(&natural);
        assert_eq!(zz[2], natural[8]);
        assert_eq!(from_zigzag(&zz), natural);
    }

    #[test]
    fn diagonals_are_contiguous() {
        // Each zigzag step moves to the same or the next anti-diagonal.
        for i in 1..64 {
            let (a, b) = (zigzag(i - 1), zigzag(i));
            let da = a / 8 + a % 8;
            let db = b / 8 + b % 8;
            assert!(db == da || db == da + 1, "step {i}: {da} -> {db}");
        }
    }

    proptest::proptest! {
        #[test]
        fn reorder_is_a_permutation(values in proptest::collection::vec(proptest::num::i32::ANY, 64)) {
            let natural: [i32; 64] = values.try_into().unwrap();
            let zz = to_zigzag(&natural);
            proptest::prop_assert_eq!(from_zigzag(&zz), natural);
            let mut sorted_a = natural.to_vec();
            let mut sorted_b = zz.to_vec();
            sorted_a.sort_unstable();
            sorted_b.sort_unstable();
            proptest::prop_assert_eq!(sorted_a, sorted_b);
        }
    }
}
