//! Fixed-width bit vectors backed by `u64` limbs.
//!
//! A [`BitVect`] represents an unsigned integer of exactly `bw` bits as a
//! little-endian vector of limbs. All bits at positions `>= bw` are kept zero
//! ("no overflow"); every arithmetic operation truncates its result back to
//! `bw` bits, so the arithmetic is modulo `2^bw`.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use num_bigint::BigUint;

use crate::mpn;

/// An unsigned integer of a fixed bit-width.
#[derive(Clone, Hash)]
pub struct BitVect {
    /// Bit-width (number of significant bits).
    bw: usize,
    /// Storage: each u64 holds 64 bits, least significant limb first.
    words: Vec<u64>,
}

impl BitVect {
    /// Number of bits per limb.
    pub const BITS_PER_WORD: usize = 64;

    /// Creates a zero vector of the given width.
    ///
    /// # Panics
    ///
    /// Panics if `bw == 0`.
    pub fn new(bw: usize) -> Self {
        assert!(bw > 0, "Bit-width must be positive");
        let nw = (bw + Self::BITS_PER_WORD - 1) / Self::BITS_PER_WORD;
        Self { bw, words: vec![0; nw] }
    }

    /// Creates a vector holding `value mod 2^bw`.
    pub fn from_u64(bw: usize, value: u64) -> Self {
        let mut v = Self::new(bw);
        v.words[0] = value;
        v.clear_overflow_bits();
        v
    }

    /// Creates the all-ones vector, i.e. `2^bw - 1`.
    pub fn ones(bw: usize) -> Self {
        let mut v = Self::new(bw);
        v.words.fill(u64::MAX);
        v.clear_overflow_bits();
        v
    }

    /// Returns the bit-width.
    #[inline]
    pub fn bw(&self) -> usize {
        self.bw
    }

    /// Returns the number of limbs.
    #[inline]
    pub fn nw(&self) -> usize {
        self.words.len()
    }

    /// Mask of the significant bits of the last limb.
    #[inline]
    pub fn mask(&self) -> u64 {
        match self.bw % Self::BITS_PER_WORD {
            0 => u64::MAX,
            r => (1u64 << r) - 1,
        }
    }

    /// Returns the limbs, least significant first.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Returns the limbs mutably. Callers must restore the no-overflow invariant.
    #[inline]
    pub fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    /// Returns the bit at the given position.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.bw, "bit {} out of width {}", index, self.bw);
        let (w, b) = Self::word_and_bit(index);
        (self.words[w] >> b) & 1 != 0
    }

    /// Sets the bit at the given position to `value`.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        debug_assert!(index < self.bw, "bit {} out of width {}", index, self.bw);
        let (w, b) = Self::word_and_bit(index);
        if value {
            self.words[w] |= 1u64 << b;
        } else {
            self.words[w] &= !(1u64 << b);
        }
    }

    /// Returns true if any bit at position `>= bw` is set.
    pub fn has_overflow(&self) -> bool {
        self.words[self.nw() - 1] & !self.mask() != 0
    }

    /// Clears every bit at position `>= bw`.
    pub fn clear_overflow_bits(&mut self) {
        let mask = self.mask();
        let last = self.nw() - 1;
        self.words[last] &= mask;
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns true if all `bw` bits are set.
    pub fn is_ones(&self) -> bool {
        let last = self.nw() - 1;
        self.words[..last].iter().all(|&w| w == u64::MAX) && self.words[last] == self.mask()
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Index of the most significant set bit, or `bw` if the vector is zero.
    pub fn msb(&self) -> usize {
        debug_assert!(!self.has_overflow());
        for i in (0..self.nw()).rev() {
            let w = self.words[i];
            if w != 0 {
                return i * Self::BITS_PER_WORD + (63 - w.leading_zeros() as usize);
            }
        }
        self.bw
    }

    /// Returns true if exactly one bit is set.
    pub fn is_power_of_two(&self) -> bool {
        self.count_ones() == 1
    }

    /// Overwrites `self` with `other`. Widths must match.
    pub fn copy_from(&mut self, other: &BitVect) {
        debug_assert_eq!(self.bw, other.bw);
        self.words.copy_from_slice(&other.words);
    }

    /// Returns an iterator over the positions of all set bits, lowest first.
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_idx: 0,
            current_word: self.words[0],
        }
    }

    /// Increments in place modulo `2^bw`. Returns true if the value wrapped to zero.
    pub fn add1(&mut self) -> bool {
        for i in 0..self.nw() {
            let (w, c) = self.words[i].overflowing_add(1);
            self.words[i] = w;
            if !c {
                break;
            }
        }
        let wrapped = self.has_overflow() || self.is_zero();
        self.clear_overflow_bits();
        wrapped
    }

    /// Decrements in place modulo `2^bw`. Returns true if the value was zero.
    pub fn sub1(&mut self) -> bool {
        let was_zero = self.is_zero();
        for i in 0..self.nw() {
            let (w, b) = self.words[i].overflowing_sub(1);
            self.words[i] = w;
            if !b {
                break;
            }
        }
        self.clear_overflow_bits();
        was_zero
    }

    /// `self = (a + b) mod 2^bw`. Returns true if the exact sum needs more than `bw` bits.
    pub fn set_add(&mut self, a: &BitVect, b: &BitVect) -> bool {
        debug_assert!(self.bw == a.bw && a.bw == b.bw);
        let carry = mpn::add(&a.words, &b.words, &mut self.words);
        let ovfl = carry != 0 || self.has_overflow();
        self.clear_overflow_bits();
        ovfl
    }

    /// `self = (a - b) mod 2^bw`. Returns true if `a < b` (a borrow occurred).
    pub fn set_sub(&mut self, a: &BitVect, b: &BitVect) -> bool {
        debug_assert!(self.bw == a.bw && a.bw == b.bw);
        let borrow = mpn::sub(&a.words, &b.words, &mut self.words);
        self.clear_overflow_bits();
        borrow != 0
    }

    /// `self = (a * b) mod 2^bw`.
    ///
    /// With `check_overflow`, returns true if the double-width product does
    /// not fit in `bw` bits; otherwise always returns false.
    pub fn set_mul(&mut self, a: &BitVect, b: &BitVect, check_overflow: bool) -> bool {
        debug_assert!(self.bw == a.bw && a.bw == b.bw);
        let nw = self.nw();
        let mut full = vec![0u64; 2 * nw];
        mpn::mul(&a.words, &b.words, &mut full);
        self.words.copy_from_slice(&full[..nw]);
        let ovfl = check_overflow && (self.has_overflow() || full[nw..].iter().any(|&w| w != 0));
        self.clear_overflow_bits();
        ovfl
    }

    /// Returns `(self + other) mod 2^bw` and the overflow flag.
    pub fn overflowing_add(&self, other: &BitVect) -> (BitVect, bool) {
        let mut out = BitVect::new(self.bw);
        let ovfl = out.set_add(self, other);
        (out, ovfl)
    }

    /// Returns `(self - other) mod 2^bw` and the borrow flag.
    pub fn overflowing_sub(&self, other: &BitVect) -> (BitVect, bool) {
        let mut out = BitVect::new(self.bw);
        let borrow = out.set_sub(self, other);
        (out, borrow)
    }

    /// Returns `(self * other) mod 2^bw` and the overflow flag.
    pub fn overflowing_mul(&self, other: &BitVect) -> (BitVect, bool) {
        let mut out = BitVect::new(self.bw);
        let ovfl = out.set_mul(self, other, true);
        (out, ovfl)
    }

    /// Logical right shift by `shift < bw` positions.
    pub fn shift_right(&self, shift: usize) -> BitVect {
        debug_assert!(shift < self.bw);
        let mut out = BitVect::new(self.bw);
        for i in 0..self.bw - shift {
            out.set(i, self.get(i + shift));
        }
        out
    }

    /// Value as an arbitrary-precision integer: `sum(limb[i] * 2^(64 i))`.
    pub fn to_magnitude(&self) -> BigUint {
        let mut r = BigUint::ZERO;
        for &w in self.words.iter().rev() {
            r = (r << Self::BITS_PER_WORD) + BigUint::from(w);
        }
        r
    }

    /// Creates a vector holding `n mod 2^bw`.
    pub fn from_magnitude(bw: usize, n: &BigUint) -> Self {
        let mut v = Self::new(bw);
        v.set_magnitude(n);
        v
    }

    /// Overwrites the value with `n mod 2^bw`.
    pub fn set_magnitude(&mut self, n: &BigUint) {
        self.words.fill(0);
        for (w, d) in self.words.iter_mut().zip(n.to_u64_digits()) {
            *w = d;
        }
        self.clear_overflow_bits();
    }
}

impl Index<usize> for BitVect {
    type Output = u64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.words[index]
    }
}

impl IndexMut<usize> for BitVect {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.words[index]
    }
}

impl PartialEq for BitVect {
    fn eq(&self, other: &Self) -> bool {
        debug_assert_eq!(self.bw, other.bw);
        self.words == other.words
    }
}

impl Eq for BitVect {}

impl PartialOrd for BitVect {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitVect {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert_eq!(self.bw, other.bw);
        mpn::compare(&self.words, &other.words)
    }
}

/// Hexadecimal, leading zeros suppressed.
impl Display for BitVect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut nz = false;
        for &w in self.words.iter().rev() {
            if nz {
                write!(f, "{:016x}", w)?;
            } else if w != 0 {
                write!(f, "{:x}", w)?;
                nz = true;
            }
        }
        if !nz {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl Debug for BitVect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "BitVect({}; 0x{})", self.bw, self)
    }
}

/// Iterator over set bits in a [`BitVect`].
pub struct Ones<'a> {
    words: &'a [u64],
    word_idx: usize,
    current_word: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(self.word_idx * BitVect::BITS_PER_WORD + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.words.len() {
                return None;
            }
            self.current_word = self.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_new() {
        let v = BitVect::new(70);
        assert_eq!(v.bw(), 70);
        assert_eq!(v.nw(), 2);
        assert_eq!(v.mask(), (1 << 6) - 1);
        assert!(v.is_zero());
        assert_eq!(v.msb(), 70);

        let v = BitVect::new(64);
        assert_eq!(v.nw(), 1);
        assert_eq!(v.mask(), u64::MAX);
    }

    #[test]
    #[should_panic(expected = "Bit-width must be positive")]
    fn test_zero_width_panics() {
        BitVect::new(0);
    }

    #[test]
    fn test_get_set() {
        let mut v = BitVect::new(100);
        v.set(0, true);
        v.set(64, true);
        v.set(99, true);
        assert!(v.get(0));
        assert!(v.get(64));
        assert!(v.get(99));
        assert!(!v.get(1));
        assert_eq!(v[1], (1 << 0) | (1 << 35));
        v.set(64, false);
        assert!(!v.get(64));
        assert_eq!(v.count_ones(), 2);
        assert!(!v.has_overflow());
    }

    #[test]
    fn test_from_u64_truncates() {
        let v = BitVect::from_u64(4, 0x1f);
        assert_eq!(v[0], 0xf);
        assert!(v.is_ones());
        assert!(!BitVect::from_u64(4, 7).is_ones());
    }

    #[test]
    fn test_ordering() {
        let mut a = BitVect::new(70);
        let mut b = BitVect::new(70);
        a[0] = u64::MAX;
        b.set(64, true);
        assert!(a < b);
        assert!(b > a);
        assert!(a <= a.clone());
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_msb_and_power_of_two() {
        let v = BitVect::from_u64(8, 0b0010_0000);
        assert_eq!(v.msb(), 5);
        assert!(v.is_power_of_two());
        let v = BitVect::from_u64(8, 0b0010_0100);
        assert_eq!(v.msb(), 5);
        assert!(!v.is_power_of_two());
        assert!(!BitVect::new(8).is_power_of_two());

        let mut v = BitVect::new(130);
        v.set(129, true);
        assert_eq!(v.msb(), 129);
    }

    #[test]
    fn test_add_overflow() {
        let a = BitVect::from_u64(4, 9);
        let b = BitVect::from_u64(4, 8);
        let (s, ovfl) = a.overflowing_add(&b);
        assert_eq!(s, BitVect::from_u64(4, 1));
        assert!(ovfl);

        let (s, ovfl) = a.overflowing_add(&BitVect::from_u64(4, 6));
        assert_eq!(s, BitVect::from_u64(4, 15));
        assert!(!ovfl);

        // Carry out of the full top limb
        let a = BitVect::ones(64);
        let (s, ovfl) = a.overflowing_add(&BitVect::from_u64(64, 1));
        assert!(s.is_zero());
        assert!(ovfl);
    }

    #[test]
    fn test_sub_borrow() {
        let a = BitVect::from_u64(4, 3);
        let b = BitVect::from_u64(4, 5);
        let (d, borrow) = a.overflowing_sub(&b);
        assert_eq!(d, BitVect::from_u64(4, 14));
        assert!(borrow);
        let (d, borrow) = b.overflowing_sub(&a);
        assert_eq!(d, BitVect::from_u64(4, 2));
        assert!(!borrow);
    }

    #[test]
    fn test_mul_max_by_two() {
        for bw in [4, 64, 70, 128] {
            let max = BitVect::ones(bw);
            let two = BitVect::from_u64(bw, 2);
            let (p, ovfl) = max.overflowing_mul(&two);
            assert!(ovfl, "bw = {}", bw);
            let mut expected = BitVect::ones(bw);
            expected.set(0, false);
            assert_eq!(p, expected, "bw = {}", bw);
        }
    }

    #[test]
    fn test_mul_no_overflow() {
        let a = BitVect::from_u64(8, 15);
        let b = BitVect::from_u64(8, 17);
        let (p, ovfl) = a.overflowing_mul(&b);
        assert_eq!(p, BitVect::from_u64(8, 255));
        assert!(!ovfl);

        let mut out = BitVect::new(8);
        assert!(!out.set_mul(&a, &BitVect::from_u64(8, 20), false));
        assert_eq!(out, BitVect::from_u64(8, (15 * 20) % 256));
    }

    #[test]
    fn test_add1_sub1() {
        let mut v = BitVect::from_u64(4, 15);
        assert!(v.add1());
        assert!(v.is_zero());
        assert!(v.sub1());
        assert!(v.is_ones());
        assert!(!v.sub1());
        assert_eq!(v, BitVect::from_u64(4, 14));

        let mut v = BitVect::new(70);
        v[0] = u64::MAX;
        assert!(!v.add1());
        assert_eq!(v.msb(), 64);
        v.sub1();
        assert_eq!(v[0], u64::MAX);
        assert_eq!(v[1], 0);
    }

    #[test]
    fn test_iter_ones() {
        let mut v = BitVect::new(130);
        for i in [3, 5, 10, 64, 65, 129] {
            v.set(i, true);
        }
        let indices: Vec<_> = v.iter_ones().collect();
        assert_eq!(indices, vec![3, 5, 10, 64, 65, 129]);
        assert_eq!(BitVect::new(8).iter_ones().count(), 0);
    }

    #[test]
    fn test_shift_right() {
        let v = BitVect::from_u64(8, 0b1011_0000);
        assert_eq!(v.shift_right(4), BitVect::from_u64(8, 0b1011));
        assert_eq!(v.shift_right(0), v);
    }

    #[test]
    fn test_magnitude_codec() {
        let mut v = BitVect::new(70);
        v[0] = 5;
        v[1] = 3;
        let n = v.to_magnitude();
        assert_eq!(n, (BigUint::from(3u32) << 64usize) + BigUint::from(5u32));
        assert_eq!(BitVect::from_magnitude(70, &n), v);

        // Reduced modulo 2^bw
        let big = BigUint::from(1u32) << 70usize;
        assert!(BitVect::from_magnitude(70, &(big + BigUint::from(1u32))) == BitVect::from_u64(70, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(BitVect::new(8).to_string(), "0");
        assert_eq!(BitVect::from_u64(8, 0xab).to_string(), "ab");
        let mut v = BitVect::new(70);
        v[0] = 0xff;
        v[1] = 0x2;
        assert_eq!(v.to_string(), "200000000000000ff");
        assert_eq!(format!("{:?}", BitVect::from_u64(4, 5)), "BitVect(4; 0x5)");
    }
}
