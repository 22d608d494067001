//! Directed nearest-feasible search.
//!
//! Given an arbitrary target (typically obtained by inverting an arithmetic
//! constraint), find the closest admissible value on a chosen side of it.
//!
//! Both directions work in two steps:
//!
//! 1. **Fixed-bit projection.** Copy the don't-care bits of the target and
//!    force every fixed bit to its pinned value, then locate the most
//!    significant position where the projection and the target disagree. The
//!    index is computed on the unmodified projection first and only then is
//!    the projection mutated; the first (most significant) disagreement wins.
//!    Depending on which side of the target the projection landed, the bits
//!    below that position are saturated, or a borrow/carry is taken from the
//!    nearest don't-care bit above it.
//! 2. **Range rounding.** The projected value is clamped into `[lo, hi)` with
//!    [`round_down`][Valuation::round_down] or [`round_up`][Valuation::round_up];
//!    a clamped bound is projected onto the fixed bits once more.

use log::trace;

use crate::bitvect::BitVect;
use crate::valuation::Valuation;

/// Highest bit position where `a` and `b` differ.
fn highest_difference(a: &BitVect, b: &BitVect) -> Option<usize> {
    for i in (0..a.nw()).rev() {
        let x = a[i] ^ b[i];
        if x != 0 {
            return Some(i * BitVect::BITS_PER_WORD + (63 - x.leading_zeros() as usize));
        }
    }
    None
}

impl Valuation {
    /// `(v & !fixed) | (fixed & bits)`: the don't-care bits of `v` with every
    /// fixed bit at its pinned value.
    pub fn project(&self, v: &BitVect) -> BitVect {
        let mut dst = v.clone();
        for i in 0..self.nw() {
            dst[i] = (!self.fixed[i] & v[i]) | (self.fixed[i] & self.bits[i]);
        }
        dst
    }

    /// Sets every don't-care bit below position `end` to `value`.
    fn fill_free_below(&self, dst: &mut BitVect, end: usize, value: bool) {
        for j in 0..end {
            if !self.fixed.get(j) {
                dst.set(j, value);
            }
        }
    }

    /// Largest value `<= target` that agrees with the fixed bits, ignoring the range.
    pub fn fixed_at_most(&self, target: &BitVect) -> Option<BitVect> {
        let mut dst = self.project(target);
        let Some(i) = highest_difference(&dst, target) else {
            return Some(dst);
        };
        if target.get(i) {
            // Bit i is pinned to 0, so dst < target already: maximize below i.
            self.fill_free_below(&mut dst, i, true);
        } else {
            // Bit i is pinned to 1, so dst > target: borrow from the lowest
            // don't-care bit above i that the target has set.
            let j = (i + 1..self.bw()).find(|&j| !self.fixed.get(j) && target.get(j))?;
            dst.set(j, false);
            self.fill_free_below(&mut dst, j, true);
        }
        Some(dst)
    }

    /// Smallest value `>= target` that agrees with the fixed bits, ignoring the range.
    pub fn fixed_at_least(&self, target: &BitVect) -> Option<BitVect> {
        let mut dst = self.project(target);
        let Some(i) = highest_difference(&dst, target) else {
            return Some(dst);
        };
        if !target.get(i) {
            // Bit i is pinned to 1, so dst > target already: minimize below i.
            self.fill_free_below(&mut dst, i, false);
        } else {
            // Bit i is pinned to 0, so dst < target: carry into the lowest
            // don't-care bit above i that the target has clear.
            let j = (i + 1..self.bw()).find(|&j| !self.fixed.get(j) && !target.get(j))?;
            dst.set(j, true);
            self.fill_free_below(&mut dst, j, false);
        }
        Some(dst)
    }

    /// Largest feasible value `<= target`, or `None` if there is none.
    pub fn get_at_most(&self, target: &BitVect) -> Option<BitVect> {
        debug_assert!(!target.has_overflow());
        let result = self.fixed_at_most(target).and_then(|mut dst| {
            if !self.round_down(&mut dst) {
                return None;
            }
            if !self.agrees_with_fixed(&dst) {
                dst = self.fixed_at_most(&dst)?;
            }
            self.in_range(&dst).then_some(dst)
        });
        trace!("get_at_most({}) = {:?}", target, result);
        result
    }

    /// Smallest feasible value `>= target`, or `None` if there is none.
    pub fn get_at_least(&self, target: &BitVect) -> Option<BitVect> {
        debug_assert!(!target.has_overflow());
        let result = self.fixed_at_least(target).and_then(|mut dst| {
            if !self.round_up(&mut dst) {
                return None;
            }
            if !self.agrees_with_fixed(&dst) {
                dst = self.fixed_at_least(&dst)?;
            }
            self.in_range(&dst).then_some(dst)
        });
        trace!("get_at_least({}) = {:?}", target, result);
        result
    }

    /// Moves `dst` down into the range. Returns false, leaving `dst` untouched,
    /// if nothing in range lies at or below it.
    pub fn round_down(&self, dst: &mut BitVect) -> bool {
        if self.lo < self.hi {
            if *dst < self.lo {
                return false;
            }
            if *dst >= self.hi {
                dst.copy_from(&self.hi);
                dst.sub1();
            }
        } else if self.lo > self.hi && self.hi <= *dst && *dst < self.lo {
            if self.hi.is_zero() {
                return false;
            }
            dst.copy_from(&self.hi);
            dst.sub1();
        }
        true
    }

    /// Moves `dst` up into the range. Returns false, leaving `dst` untouched,
    /// if nothing in range lies at or above it.
    pub fn round_up(&self, dst: &mut BitVect) -> bool {
        if self.lo < self.hi {
            if *dst >= self.hi {
                return false;
            }
            if *dst < self.lo {
                dst.copy_from(&self.lo);
            }
        } else if self.lo > self.hi && self.hi <= *dst && *dst < self.lo {
            dst.copy_from(&self.lo);
        }
        true
    }

    /// Clears set don't-care bits of `dst`, most significant first, until
    /// `is_feasible` holds. Returns whether it holds in the end.
    pub fn round_down_by(&self, dst: &mut BitVect, is_feasible: impl Fn(&BitVect) -> bool) -> bool {
        for i in (0..self.bw()).rev() {
            if is_feasible(dst) {
                return true;
            }
            if !self.fixed.get(i) && dst.get(i) {
                dst.set(i, false);
            }
        }
        is_feasible(dst)
    }

    /// Sets clear don't-care bits of `dst`, least significant first, until
    /// `is_feasible` holds. Returns whether it holds in the end.
    pub fn round_up_by(&self, dst: &mut BitVect, is_feasible: impl Fn(&BitVect) -> bool) -> bool {
        for i in 0..self.bw() {
            if is_feasible(dst) {
                return true;
            }
            if !self.fixed.get(i) && !dst.get(i) {
                dst.set(i, true);
            }
        }
        is_feasible(dst)
    }
}
