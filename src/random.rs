//! Randomized proposals.
//!
//! Local search benefits from not always moving to the deterministic extreme.
//! Each routine here computes the extreme with [`get_at_most`] or
//! [`get_at_least`], keeps it with probability 1/2, and otherwise perturbs its
//! don't-care bits, falling back to the extreme when the perturbation leaves
//! the domain. Accepted candidates are staged in the trial buffer; nothing here
//! touches the committed value.
//!
//! [`get_at_most`]: Valuation::get_at_most
//! [`get_at_least`]: Valuation::get_at_least

use log::trace;
use rand::Rng;

use crate::bitvect::BitVect;
use crate::valuation::Valuation;

impl Valuation {
    /// A random value agreeing with every fixed bit. The range is not enforced.
    pub fn get_variant<R: Rng + ?Sized>(&self, rng: &mut R) -> BitVect {
        let mut dst = BitVect::new(self.bw());
        for i in 0..self.nw() {
            dst[i] = (rng.random::<u64>() & !self.fixed[i]) | (self.fixed[i] & self.bits[i]);
        }
        dst.clear_overflow_bits();
        dst
    }

    /// A random value strictly below `bound`: one set don't-care bit, chosen
    /// uniformly, is cleared and every don't-care bit below it is randomized.
    /// Returns `bound` unchanged if it has no set don't-care bit.
    fn random_below<R: Rng + ?Sized>(&self, bound: &BitVect, rng: &mut R) -> BitVect {
        let mut free_set = bound.clone();
        for i in 0..self.nw() {
            free_set[i] = bound[i] & !self.fixed[i];
        }

        // Reservoir sampling over the candidate positions
        let mut chosen = None;
        for (seen, pos) in free_set.iter_ones().enumerate() {
            if rng.random_range(0..=seen) == 0 {
                chosen = Some(pos);
            }
        }
        let Some(pos) = chosen else {
            return bound.clone();
        };

        let mut tmp = bound.clone();
        tmp.set(pos, false);
        for j in 0..pos {
            if !self.fixed.get(j) {
                tmp.set(j, rng.random_bool(0.5));
            }
        }
        tmp
    }

    /// A random value at least `bound`: don't-care bits above the most
    /// significant set bit of `bound` are set at random.
    fn random_above<R: Rng + ?Sized>(&self, bound: &BitVect, rng: &mut R) -> BitVect {
        let msb = bound.msb();
        let start = if msb == self.bw() { 0 } else { msb + 1 };
        let mut tmp = bound.clone();
        for j in start..self.bw() {
            if !self.fixed.get(j) && rng.random_bool(0.5) {
                tmp.set(j, true);
            }
        }
        tmp
    }

    /// Stages a random feasible value `<= target`, biased towards the largest one.
    ///
    /// Returns false if no feasible value lies at or below `target`.
    pub fn set_random_at_most<R: Rng + ?Sized>(&mut self, target: &BitVect, rng: &mut R) -> bool {
        let Some(bound) = self.get_at_most(target) else {
            return false;
        };
        if bound.is_zero() || rng.random_bool(0.5) {
            return self.try_set(&bound);
        }
        let tmp = self.random_below(&bound, rng);
        trace!("set_random_at_most({}): bound = {}, proposal = {}", target, bound, tmp);
        self.try_set(&tmp) || self.try_set(&bound)
    }

    /// Stages a random feasible value `>= target`, biased towards the smallest one.
    ///
    /// Returns false if no feasible value lies at or above `target`.
    pub fn set_random_at_least<R: Rng + ?Sized>(&mut self, target: &BitVect, rng: &mut R) -> bool {
        let Some(bound) = self.get_at_least(target) else {
            return false;
        };
        if bound.is_ones() || rng.random_bool(0.5) {
            return self.try_set(&bound);
        }
        let tmp = self.random_above(&bound, rng);
        trace!("set_random_at_least({}): bound = {}, proposal = {}", target, bound, tmp);
        self.try_set(&tmp) || self.try_set(&bound)
    }

    /// Stages a random feasible value in `[lo, hi]` (both inclusive), anchored
    /// at either end with equal probability.
    ///
    /// Returns false if no feasible value lies in `[lo, hi]`.
    pub fn set_random_in_range<R: Rng + ?Sized>(&mut self, lo: &BitVect, hi: &BitVect, rng: &mut R) -> bool {
        if rng.random_bool(0.5) {
            let Some(anchor) = self.get_at_least(lo) else {
                return false;
            };
            if *hi < anchor {
                return false;
            }
            if anchor.is_ones() || rng.random_bool(0.5) {
                return self.try_set(&anchor);
            }
            let mut tmp = self.random_above(&anchor, rng);
            self.round_down_by(&mut tmp, |t| t <= hi && self.in_range(t));
            trace!("set_random_in_range({}, {}): anchor = {}, proposal = {}", lo, hi, anchor, tmp);
            (lo <= &tmp && &tmp <= hi && self.try_set(&tmp)) || self.try_set(&anchor)
        } else {
            let Some(anchor) = self.get_at_most(hi) else {
                return false;
            };
            if anchor < *lo {
                return false;
            }
            if anchor.is_zero() || rng.random_bool(0.5) {
                return self.try_set(&anchor);
            }
            let mut tmp = self.random_below(&anchor, rng);
            self.round_up_by(&mut tmp, |t| lo <= t && self.in_range(t));
            trace!("set_random_in_range({}, {}): anchor = {}, proposal = {}", lo, hi, anchor, tmp);
            (lo <= &tmp && &tmp <= hi && self.try_set(&tmp)) || self.try_set(&anchor)
        }
    }
}
