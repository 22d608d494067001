//! Range and fixed-bit co-propagation.
//!
//! Constraints learned by the search driver only ever tighten a domain:
//! [`add_range`][Valuation::add_range] shrinks the cyclic window, and
//! [`tighten`][Valuation::tighten] moves the window bounds onto values that
//! agree with the fixed bits and pins new bits implied by the window.

use log::debug;
use num_bigint::BigInt;

use crate::bitvect::BitVect;
use crate::valuation::Valuation;

impl Valuation {
    /// Reduces a signed integer modulo `2^bw`.
    fn reduce(&self, n: BigInt) -> BitVect {
        let modulus = BigInt::from(1) << self.bw();
        let r = ((n % &modulus) + &modulus) % &modulus;
        BitVect::from_magnitude(self.bw(), r.magnitude())
    }

    /// Intersects the range with the cyclic interval `[l, h)`, both taken modulo `2^bw`.
    ///
    /// Equal bounds denote the full domain and change nothing. A bound is
    /// adopted only if it lies strictly inside the current window, so the
    /// window never grows. A committed or staged value falling outside the new
    /// window is reset to `lo`.
    ///
    /// Ranges must be added before any bit is fixed.
    pub fn add_range(&mut self, l: impl Into<BigInt>, h: impl Into<BigInt>) {
        let l = self.reduce(l.into());
        let h = self.reduce(h.into());
        debug!("add_range(l = {}, h = {}) on {}", l, h, self);
        if l == h {
            return;
        }
        debug_assert!(self.fixed.is_zero(), "ranges can only be added before fixed bits are set");

        if self.lo == self.hi {
            self.lo = l;
            self.hi = h;
        } else {
            if self.in_range(&l) && l != self.lo {
                self.lo = l;
            }
            if self.in_range(&h) && h != self.lo {
                self.hi = h;
            }
        }

        self.reset_out_of_range();
        debug_assert!(self.well_formed());
    }

    /// Moves a committed value outside the window to `lo`, and drops a staged
    /// trial that is no longer admissible.
    fn reset_out_of_range(&mut self) {
        if !self.in_range(&self.bits) {
            // Projected so that pinned values survive even on an empty domain.
            let lo = self.project(&self.lo);
            self.bits.copy_from(&lo);
        }
        if self.has_eval && !self.can_set(&self.eval) {
            self.has_eval = false;
        }
    }

    /// Pins bit `i` to `value` unless it is already fixed.
    fn pin_if_free(&mut self, i: usize, value: bool) {
        if !self.fixed.get(i) {
            self.fixed.set(i, true);
            self.bits.set(i, value);
        }
    }

    /// Propagates between the range and the fixed bits.
    ///
    /// - `lo` moves up to the least value agreeing with the fixed bits, and
    ///   `hi - 1` down to the greatest, both cyclically within the window;
    /// - for a non-wrapping window, every bit above the most significant set
    ///   bit of `hi` is pinned to 0, and so is that bit if `hi` is a power of two;
    /// - a single-value window `lo + 1 == hi` pins every bit to `lo`.
    ///
    /// Idempotent. Never unpins a bit and never widens the window.
    pub fn tighten(&mut self) {
        debug!("tighten({:?})", self);
        if self.lo == self.hi {
            return;
        }

        if !self.agrees_with_fixed(&self.lo) {
            let next = self
                .fixed_at_least(&self.lo)
                .unwrap_or_else(|| self.project(&BitVect::new(self.bw())));
            if self.in_range(&next) {
                self.lo = next;
            } else {
                debug!("tighten: no value in [{}, {}[ agrees with the fixed bits", self.lo, self.hi);
            }
        }

        let mut last = self.hi.clone();
        last.sub1();
        if !self.agrees_with_fixed(&last) {
            let prev = self
                .fixed_at_most(&last)
                .unwrap_or_else(|| self.project(&BitVect::ones(self.bw())));
            if self.in_range(&prev) {
                self.hi = prev;
                self.hi.add1();
            } else {
                debug!("tighten: no value in [{}, {}[ agrees with the fixed bits", self.lo, self.hi);
            }
        }

        self.reset_out_of_range();

        if self.lo < self.hi {
            let mut i = self.bw();
            while i > 0 && !self.hi.get(i - 1) {
                i -= 1;
                self.pin_if_free(i, false);
            }
            if self.hi.is_power_of_two() {
                self.pin_if_free(i - 1, false);
            }
        }

        let mut next = self.lo.clone();
        next.add1();
        if next == self.hi {
            for i in 0..self.bw() {
                let b = self.lo.get(i);
                self.pin_if_free(i, b);
            }
        }

        self.reset_out_of_range();
        debug!("tighten: {:?}", self);
    }
}
