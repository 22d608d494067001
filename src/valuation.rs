//! Per-variable bit-vector domains.
//!
//! A [`Valuation`] tracks the admissible values of one bit-vector variable
//! under three simultaneous constraints:
//!
//! - **fixed bits**: positions where `fixed` is set must agree with the
//!   committed value `bits`, which doubles as the store of pinned values;
//! - **a cyclic range** `[lo, hi)` over residues modulo `2^bw`, where
//!   `lo == hi` means "no restriction" and `lo > hi` wraps through zero;
//! - **the committed value** `bits` itself.
//!
//! Search steps go through a trial buffer: [`repair`][Valuation::repair] and
//! the randomized routines stage a candidate in `eval`, and only
//! [`commit`][Valuation::commit] copies it into `bits`.
//!
//! ```
//! use sls_bv::bitvect::BitVect;
//! use sls_bv::valuation::Valuation;
//!
//! let mut v = Valuation::new(4);
//! v.add_range(3, 12);
//! v.fix_bit(0, true);
//! v.tighten();
//!
//! // Largest odd value below 12 that is at most 10
//! let d = v.get_at_most(&BitVect::from_u64(4, 10)).unwrap();
//! assert_eq!(d, BitVect::from_u64(4, 9));
//!
//! v.repair(true, &BitVect::from_u64(4, 14));
//! v.commit();
//! assert_eq!(v.bits(), &BitVect::from_u64(4, 11));
//! ```

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use log::debug;
use num_bigint::BigUint;

use crate::bitvect::BitVect;

#[derive(Clone)]
pub struct Valuation {
    bw: usize,
    /// Committed value; also holds the pinned value of every fixed bit.
    pub(crate) bits: BitVect,
    pub(crate) fixed: BitVect,
    pub(crate) lo: BitVect,
    pub(crate) hi: BitVect,
    /// Trial buffer, valid only while `has_eval` is set.
    pub(crate) eval: BitVect,
    pub(crate) has_eval: bool,
}

impl Valuation {
    /// Creates an unconstrained domain of the given width, committed to zero.
    ///
    /// # Panics
    ///
    /// Panics if `bw == 0`.
    pub fn new(bw: usize) -> Self {
        assert!(bw > 0, "Bit-width must be positive");
        Self {
            bw,
            bits: BitVect::new(bw),
            fixed: BitVect::new(bw),
            lo: BitVect::new(bw),
            hi: BitVect::new(bw),
            eval: BitVect::new(bw),
            has_eval: false,
        }
    }

    pub fn bw(&self) -> usize {
        self.bw
    }
    pub fn nw(&self) -> usize {
        self.bits.nw()
    }
    pub fn bits(&self) -> &BitVect {
        &self.bits
    }
    pub fn fixed(&self) -> &BitVect {
        &self.fixed
    }
    pub fn lo(&self) -> &BitVect {
        &self.lo
    }
    pub fn hi(&self) -> &BitVect {
        &self.hi
    }

    /// The staged trial value, if a repair or randomized routine produced one.
    pub fn eval(&self) -> Option<&BitVect> {
        self.has_eval.then_some(&self.eval)
    }

    /// Returns true if a range restriction is active (`lo != hi`).
    pub fn has_range(&self) -> bool {
        self.lo != self.hi
    }

    pub fn is_fixed(&self, i: usize) -> bool {
        self.fixed.get(i)
    }

    /// Returns true if every bit is fixed.
    pub fn is_fully_fixed(&self) -> bool {
        self.fixed.is_ones()
    }

    /// Pins bit `i` to `value`. Already fixed bits are never unpinned; pinning
    /// one to the opposite value is a contract violation.
    ///
    /// The committed value may leave the range; [`tighten`][Self::tighten]
    /// restores it.
    pub fn fix_bit(&mut self, i: usize, value: bool) {
        debug!("fix_bit(i = {}, value = {})", i, value);
        debug_assert!(
            !self.fixed.get(i) || self.bits.get(i) == value,
            "bit {} is already fixed to {}",
            i,
            !value
        );
        self.fixed.set(i, true);
        self.bits.set(i, value);
        if self.has_eval && self.eval.get(i) != value {
            self.has_eval = false;
        }
    }

    /// Returns true if `v` lies in `[lo, hi)` under the wraparound convention.
    pub fn in_range(&self, v: &BitVect) -> bool {
        debug_assert!(!v.has_overflow());
        match self.lo.cmp(&self.hi) {
            Ordering::Equal => true,
            Ordering::Less => &self.lo <= v && v < &self.hi,
            Ordering::Greater => &self.lo <= v || v < &self.hi,
        }
    }

    /// Returns true if `v` agrees with the pinned value of every fixed bit.
    pub fn agrees_with_fixed(&self, v: &BitVect) -> bool {
        (0..self.nw()).all(|i| (v[i] ^ self.bits[i]) & self.fixed[i] == 0)
    }

    /// Full admissibility predicate: fixed bits agree and `v` is in range.
    pub fn can_set(&self, v: &BitVect) -> bool {
        debug_assert!(!v.has_overflow());
        self.agrees_with_fixed(v) && self.in_range(v)
    }

    /// Least admissible value: `lo` for a proper range, otherwise the
    /// projection with every don't-care bit cleared.
    pub fn min_feasible(&self) -> BitVect {
        if self.lo < self.hi {
            self.lo.clone()
        } else {
            let mut out = BitVect::new(self.bw);
            for i in 0..self.nw() {
                out[i] = self.fixed[i] & self.bits[i];
            }
            out
        }
    }

    /// Greatest admissible value: `hi - 1` for a proper range, otherwise the
    /// projection with every don't-care bit set.
    pub fn max_feasible(&self) -> BitVect {
        let mut out = BitVect::new(self.bw);
        if self.lo < self.hi {
            out.copy_from(&self.hi);
            out.sub1();
        } else {
            for i in 0..self.nw() {
                out[i] = !self.fixed[i] | self.bits[i];
            }
            out.clear_overflow_bits();
        }
        out
    }

    /// Stages `v` as the trial value if it is admissible.
    pub fn try_set(&mut self, v: &BitVect) -> bool {
        if !self.can_set(v) {
            return false;
        }
        self.eval.copy_from(v);
        self.has_eval = true;
        true
    }

    /// Projects a raw candidate onto the domain and stages it as the trial value.
    ///
    /// Fixed bits of `dst` are forced to their pinned values, then the range is
    /// applied by rounding in the preferred direction, falling back to the
    /// other one. Returns true if the staged trial differs from the committed
    /// value; the trial is staged either way.
    ///
    /// # Panics
    ///
    /// Panics if neither direction yields a value, i.e. the domain is empty.
    pub fn repair(&mut self, prefer_round_down: bool, dst: &BitVect) -> bool {
        debug!("repair(prefer_round_down = {}, dst = {})", prefer_round_down, dst);
        let mut tmp = dst.clone();
        for i in 0..self.nw() {
            tmp[i] = (!self.fixed[i] & tmp[i]) | (self.fixed[i] & self.bits[i]);
        }
        // On a tightened domain these coincide with round_down/round_up of the
        // masked candidate; they additionally re-project a clamped bound onto
        // the fixed bits.
        let repaired = if prefer_round_down {
            self.get_at_most(&tmp).or_else(|| self.get_at_least(&tmp))
        } else {
            self.get_at_least(&tmp).or_else(|| self.get_at_most(&tmp))
        };
        let Some(tmp) = repaired else {
            panic!("repair on an empty domain: {:?}", self);
        };
        debug_assert!(self.agrees_with_fixed(&tmp), "repair broke a fixed bit: {}", tmp);
        self.eval.copy_from(&tmp);
        self.has_eval = true;
        self.eval != self.bits
    }

    /// Copies the staged trial value into the committed value.
    ///
    /// Returns false, leaving the committed value unchanged, if nothing was staged.
    pub fn commit(&mut self) -> bool {
        if !self.has_eval {
            return false;
        }
        debug_assert!(
            self.agrees_with_fixed(&self.eval),
            "trial {} disagrees with fixed bits of {}",
            self.eval,
            self
        );
        debug!("commit({} -> {})", self.bits, self.eval);
        self.bits.copy_from(&self.eval);
        self.has_eval = false;
        debug_assert!(self.well_formed());
        true
    }

    /// Drops the staged trial value.
    pub fn discard(&mut self) {
        self.has_eval = false;
    }

    /// Commits `v` directly, bypassing the trial buffer. Returns false, changing
    /// nothing, if `v` is not admissible.
    pub fn set(&mut self, v: &BitVect) -> bool {
        if !self.can_set(v) {
            return false;
        }
        self.bits.copy_from(v);
        true
    }

    /// Checks the domain invariants: no overflow bits anywhere, the committed
    /// value in range, and a staged trial agreeing with every fixed bit.
    pub fn well_formed(&self) -> bool {
        let containers = [&self.bits, &self.fixed, &self.lo, &self.hi, &self.eval];
        if containers.iter().any(|v| v.has_overflow()) {
            return false;
        }
        if !self.in_range(&self.bits) {
            return false;
        }
        !self.has_eval || self.agrees_with_fixed(&self.eval)
    }

    /// Committed value as an arbitrary-precision integer.
    pub fn get_value(&self, v: &BitVect) -> BigUint {
        v.to_magnitude()
    }

    /// Overwrites `v` with `n mod 2^bw`.
    pub fn set_value(&self, v: &mut BitVect, n: &BigUint) {
        debug_assert_eq!(v.bw(), self.bw);
        v.set_magnitude(n);
    }

    /// Committed value as a `u64`, saturated at `max_n`.
    pub fn to_nat(&self, max_n: u64) -> u64 {
        let mut value = 0u64;
        for i in 0..self.bw {
            if !self.bits.get(i) {
                continue;
            }
            if i >= 64 || value + (1u64 << i) >= max_n {
                return max_n;
            }
            value += 1u64 << i;
        }
        value
    }

    /// Committed value logically shifted right by `shift` positions.
    pub fn shift_right(&self, shift: usize) -> BitVect {
        self.bits.shift_right(shift)
    }
}

/// Renders the committed value in hexadecimal, followed by the range if one is active.
impl Display for Valuation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits)?;
        if self.has_range() {
            write!(f, " [{}, {}[", self.lo, self.hi)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Valuation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Valuation")
            .field("bw", &self.bw)
            .field("bits", &self.bits)
            .field("fixed", &self.fixed)
            .field("lo", &self.lo)
            .field("hi", &self.hi)
            .field("eval", &self.eval())
            .finish()
    }
}
