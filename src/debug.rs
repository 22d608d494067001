//! Debug utilities for inspecting domains.
//!
//! These helpers render a [`Valuation`] for logs and enumerate small domains
//! exhaustively. They are primarily useful in tests and during development.

use std::fmt::Write;

use crate::bitvect::BitVect;
use crate::valuation::Valuation;

/// Snapshot of a domain, rendered on one line.
#[derive(Debug, Clone)]
pub struct ValuationInfo {
    /// Bit-width
    pub bw: usize,
    /// Committed value (hex)
    pub bits: String,
    /// Fixed bits, most significant first, `x` for don't-care
    pub pattern: String,
    /// Range bounds (hex), if a range is active
    pub range: Option<(String, String)>,
    /// Staged trial value (hex), if any
    pub eval: Option<String>,
}

impl std::fmt::Display for ValuationInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bv{} = {} fixed={}", self.bw, self.bits, self.pattern)?;
        if let Some((lo, hi)) = &self.range {
            write!(f, " range=[{}, {}[", lo, hi)?;
        }
        if let Some(eval) = &self.eval {
            write!(f, " eval={}", eval)?;
        }
        Ok(())
    }
}

impl Valuation {
    /// Fixed bits as a string, most significant first: the pinned `0`/`1` for
    /// fixed positions and `x` for don't-care ones.
    pub fn pattern_string(&self) -> String {
        (0..self.bw())
            .rev()
            .map(|i| match (self.fixed().get(i), self.bits().get(i)) {
                (false, _) => 'x',
                (true, false) => '0',
                (true, true) => '1',
            })
            .collect()
    }

    /// Snapshot of the whole domain.
    pub fn info(&self) -> ValuationInfo {
        ValuationInfo {
            bw: self.bw(),
            bits: self.bits().to_string(),
            pattern: self.pattern_string(),
            range: self.has_range().then(|| (self.lo().to_string(), self.hi().to_string())),
            eval: self.eval().map(|e| e.to_string()),
        }
    }

    /// Multi-line dump of every container.
    pub fn dump_state(&self) -> String {
        let mut result = String::new();
        writeln!(&mut result, "=== Valuation (bw = {}) ===", self.bw()).unwrap();
        writeln!(&mut result, "bits  = {}", self.bits()).unwrap();
        writeln!(&mut result, "fixed = {}", self.fixed()).unwrap();
        writeln!(&mut result, "lo    = {}", self.lo()).unwrap();
        writeln!(&mut result, "hi    = {}", self.hi()).unwrap();
        match self.eval() {
            Some(eval) => writeln!(&mut result, "eval  = {}", eval).unwrap(),
            None => writeln!(&mut result, "eval  = -").unwrap(),
        }
        result
    }

    /// All admissible values, in increasing order.
    ///
    /// # Panics
    ///
    /// Panics if the width exceeds 20 bits.
    pub fn feasible_values(&self) -> Vec<u64> {
        assert!(self.bw() <= 20, "Exhaustive enumeration is limited to 20 bits");
        (0..1u64 << self.bw())
            .filter(|&n| self.can_set(&BitVect::from_u64(self.bw(), n)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_pattern_string() {
        let mut v = Valuation::new(6);
        v.fix_bit(5, true);
        v.fix_bit(2, false);
        v.fix_bit(0, true);
        assert_eq!(v.pattern_string(), "1xx0x1");
    }

    #[test]
    fn test_info() {
        let mut v = Valuation::new(8);
        v.add_range(0x10, 0x80);
        v.fix_bit(0, true);
        let info = v.info();
        assert_eq!(info.bits, "11");
        assert_eq!(info.range, Some(("10".to_string(), "80".to_string())));
        assert_eq!(info.eval, None);
        assert_eq!(info.to_string(), "bv8 = 11 fixed=xxxxxxx1 range=[10, 80[");
    }

    #[test]
    fn test_dump_state() {
        let v = Valuation::new(4);
        let s = v.dump_state();
        assert!(s.contains("bw = 4"), "Expected width in: {}", s);
        assert!(s.contains("eval  = -"), "Expected empty trial in: {}", s);
    }

    #[test]
    fn test_feasible_values() {
        let mut v = Valuation::new(4);
        v.add_range(6, 2);
        v.fix_bit(0, false);
        assert_eq!(v.feasible_values(), vec![0, 6, 8, 10, 12, 14]);
    }
}
