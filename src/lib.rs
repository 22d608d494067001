//! # sls-bv: bit-vector domains for stochastic local search
//!
//! **`sls-bv`** maintains the set of admissible values of a single bit-vector
//! variable during stochastic local search. The domain of a variable of width
//! `bw` is described by three constraints at once:
//!
//! - **Fixed bits**: individual positions pinned to a value, the others are "don't-care".
//! - **A cyclic range** `[lo, hi)` over residues modulo `2^bw`. `lo == hi` means
//!   no restriction and `lo > hi` wraps through zero.
//! - **The committed value**, which is always admissible.
//!
//! ## Key Features
//!
//! - **Nearest feasible values**: [`get_at_most`][crate::valuation::Valuation::get_at_most]
//!   and [`get_at_least`][crate::valuation::Valuation::get_at_least] project an
//!   arbitrary target onto the domain, exactly, in either direction.
//! - **Randomized proposals** biased towards those extremes, with the random
//!   source passed explicitly so that runs are reproducible from a seed.
//! - **Speculative updates**: candidates are staged in a trial buffer by
//!   [`repair`][crate::valuation::Valuation::repair] and only become the
//!   committed value on [`commit`][crate::valuation::Valuation::commit].
//! - **Co-propagation** between the range and the fixed bits.
//!
//! ## Basic Usage
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sls_bv::bitvect::BitVect;
//! use sls_bv::valuation::Valuation;
//!
//! // 1. An 8-bit variable known to lie in [10, 100) with its lowest bit clear
//! let mut x = Valuation::new(8);
//! x.add_range(10, 100);
//! x.fix_bit(0, false);
//! x.tighten();
//!
//! // 2. Invert some constraint, get a raw target, and project it
//! let target = BitVect::from_u64(8, 123);
//! let best = x.get_at_most(&target).unwrap();
//! assert_eq!(best, BitVect::from_u64(8, 98));
//!
//! // 3. Or propose a randomized value below the target
//! let mut rng = StdRng::seed_from_u64(42);
//! assert!(x.set_random_at_most(&target, &mut rng));
//! assert!(x.can_set(x.eval().unwrap()));
//!
//! // 4. Commit the staged value
//! x.commit();
//! assert!(x.bits() <= &target);
//! ```
//!
//! ## Core Components
//!
//! - **[`bitvect`]**: fixed-width limb vectors with modular arithmetic.
//! - **[`valuation`]**: the domain itself, its queries and the repair/commit protocol.
//! - **[`search`]**, **[`random`]**, **[`propagate`]**: the algorithms, as
//!   further `impl` blocks of [`Valuation`][crate::valuation::Valuation].

pub mod bitvect;
pub mod debug;
pub mod mpn;
pub mod propagate;
pub mod random;
pub mod search;
pub mod valuation;
