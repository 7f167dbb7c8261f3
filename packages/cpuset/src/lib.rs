#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Converts sets of processor IDs between the notations used to configure thread and process
//! affinity, and combines such sets.
//!
//! Three notations are supported:
//!
//! * **Range notation**: comma-separated single IDs and inclusive ranges, e.g. `0-3,7`.
//! * **List notation**: comma-separated single IDs, fully expanded, e.g. `0,1,2,3,7`.
//! * **Mask notation**: a hexadecimal bitmask where bit `n` set means processor `n` is a member,
//!   written in comma-separated 32-bit groups with the most significant group first and only
//!   the leading group unpadded, e.g. `80,0000000f` for `0-3,39`.
//!
//! A [`CpuSet`] is built from range or mask notation and can be read back in any of the three.
//! Two sets can be combined with [`CpuSet::add()`] (union) and [`CpuSet::remove()`]
//! (difference), which leave the result in canonical range notation: ascending, with every run
//! of two or more consecutive IDs written as `first-last`.
//!
//! The identifiers are of type [`CpuId`] (`u32`), up to and including [`MAX_CPU_ID`]. Nothing
//! here checks whether the processors exist on the current system.
//!
//! # Example
//!
//! ```
//! use cpuset::CpuSet;
//!
//! let mut selected = CpuSet::new("0-3,7", false).unwrap();
//! assert_eq!(selected.list(), "0,1,2,3,7");
//! assert_eq!(selected.mask(), "8f");
//!
//! selected.add(&CpuSet::new("80,00000000", true).unwrap());
//! assert_eq!(selected.range(), "0-3,7,39");
//!
//! selected.remove(&CpuSet::new("2-3", false).unwrap());
//! assert_eq!(selected.range(), "0-1,7,39");
//! assert_eq!(selected.mask(), "80,00000083");
//! ```
//!
//! The notation conversions are also available as free functions:
//!
//! ```
//! assert_eq!(cpuset::mask_to_range("f0f").unwrap(), "0-3,8-11");
//! assert_eq!(cpuset::list_to_range("3,2,1,0,7").unwrap(), "0-3,7");
//! ```

mod bits;
mod cpu_set;
mod error;
mod list;
mod mask;
mod range;

pub use cpu_set::*;
pub use error::*;
pub use list::list_to_range;
pub use mask::mask_to_range;

/// Identifies one processor. Bit `n` of a mask corresponds to the processor with ID `n`.
pub type CpuId = u32;

/// The largest processor ID accepted in any notation.
pub const MAX_CPU_ID: CpuId = 65_535;
