//! Limb-level multi-precision arithmetic.
//!
//! All numbers are little-endian slices of `u64` limbs (`a[0]` is the least
//! significant limb). The helpers here know nothing about bit-widths: callers
//! truncate the results themselves.

use std::cmp::Ordering;

/// Add with carry: `(sum, carry) = a + b + carry_in`.
#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = a as u128 + b as u128 + carry as u128;
    (t as u64, (t >> 64) as u64)
}

/// Subtract with borrow: `(diff, borrow) = a - b - borrow_in`.
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub(b as u128).wrapping_sub(borrow as u128);
    (t as u64, (t >> 127) as u64)
}

/// Multiply-accumulate: `(lo, hi) = a * b + c + carry_in`.
#[inline(always)]
const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let t = a as u128 * b as u128 + c as u128 + carry as u128;
    (t as u64, (t >> 64) as u64)
}

/// Unsigned comparison of two numbers with the same number of limbs.
pub fn compare(a: &[u64], b: &[u64]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    for i in (0..a.len()).rev() {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// `out = a + b`, returning the carry out of the top limb.
pub fn add(a: &[u64], b: &[u64], out: &mut [u64]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    let mut carry = 0;
    for i in 0..a.len() {
        let (s, c) = adc(a[i], b[i], carry);
        out[i] = s;
        carry = c;
    }
    carry
}

/// `out = a - b`, returning the borrow out of the top limb.
pub fn sub(a: &[u64], b: &[u64], out: &mut [u64]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    let mut borrow = 0;
    for i in 0..a.len() {
        let (d, br) = sbb(a[i], b[i], borrow);
        out[i] = d;
        borrow = br;
    }
    borrow
}

/// Schoolbook product. `out` must hold `a.len() + b.len()` limbs.
pub fn mul(a: &[u64], b: &[u64], out: &mut [u64]) {
    debug_assert_eq!(out.len(), a.len() + b.len());
    out.fill(0);
    for i in 0..a.len() {
        let mut carry = 0;
        for j in 0..b.len() {
            let (lo, hi) = mac(a[i], b[j], out[i + j], carry);
            out[i + j] = lo;
            carry = hi;
        }
        out[i + b.len()] = carry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare() {
        assert_eq!(compare(&[1, 2], &[1, 2]), Ordering::Equal);
        assert_eq!(compare(&[5, 1], &[0, 2]), Ordering::Less);
        assert_eq!(compare(&[0, 2], &[u64::MAX, 1]), Ordering::Greater);
        assert_eq!(compare(&[3], &[2]), Ordering::Greater);
    }

    #[test]
    fn test_add_carry_chain() {
        let mut out = [0; 2];
        let c = add(&[u64::MAX, 0], &[1, 0], &mut out);
        assert_eq!(out, [0, 1]);
        assert_eq!(c, 0);

        let c = add(&[u64::MAX, u64::MAX], &[1, 0], &mut out);
        assert_eq!(out, [0, 0]);
        assert_eq!(c, 1);
    }

    #[test]
    fn test_sub_borrow_chain() {
        let mut out = [0; 2];
        let b = sub(&[0, 1], &[1, 0], &mut out);
        assert_eq!(out, [u64::MAX, 0]);
        assert_eq!(b, 0);

        let b = sub(&[0, 0], &[1, 0], &mut out);
        assert_eq!(out, [u64::MAX, u64::MAX]);
        assert_eq!(b, 1);
    }

    #[test]
    fn test_mul() {
        let mut out = [0; 2];
        mul(&[u64::MAX], &[u64::MAX], &mut out);
        // (2^64 - 1)^2 = 2^128 - 2^65 + 1
        assert_eq!(out, [1, u64::MAX - 1]);

        let mut out = [0; 4];
        mul(&[0, 1], &[3, 0], &mut out);
        assert_eq!(out, [0, 3, 0, 0]);
    }
}
