use std::fmt::{self, Display, Formatter};
use std::ops::{BitOrAssign, SubAssign};
use std::str::FromStr;

use tracing::{debug, trace};

use crate::bits::CpuBits;
use crate::list::emit_list;
use crate::mask::{emit_mask, parse_mask};
use crate::range::{RangeEntry, canonical_entries, emit_range, parse_range};
use crate::{CpuId, Error, MAX_CPU_ID};

/// A set of CPU identifiers that can be read and written in range, list and mask notation.
///
/// The set remembers the range notation it was built from. Sets built from range text report
/// that text verbatim from [`range()`][Self::range], even if it is not in canonical form. Sets
/// built from a mask, and sets modified by [`add()`][Self::add] or [`remove()`][Self::remove],
/// hold the canonical form: ascending, with every run of two or more consecutive CPUs merged
/// into `first-last`.
///
/// Equality compares membership only, so `0-1` equals `0,1`.
///
/// # Example
///
/// ```
/// use cpuset::CpuSet;
///
/// let mut set = CpuSet::new("0-3", false).unwrap();
/// set.add(&CpuSet::new("e0", true).unwrap());
///
/// assert_eq!(set.range(), "0-3,5-7");
/// assert_eq!(set.list(), "0,1,2,3,5,6,7");
/// assert_eq!(set.mask(), "ef");
/// ```
#[derive(Clone, Debug)]
pub struct CpuSet {
    range: String,

    // Parsed form of `range`, in textual order. List notation is expanded from this.
    entries: Vec<RangeEntry>,

    bits: CpuBits,
}

impl CpuSet {
    /// Creates a set from range notation (`is_mask == false`) or mask notation
    /// (`is_mask == true`). Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRangeSyntax`] or [`Error::InvalidMaskSyntax`] if the text does
    /// not match the selected notation and [`Error::CpuOutOfRange`] if it references a CPU
    /// above [`MAX_CPU_ID`].
    pub fn new(text: &str, is_mask: bool) -> crate::Result<Self> {
        if is_mask {
            Self::from_mask(text)
        } else {
            Self::from_range(text)
        }
    }

    /// Creates a set from range notation such as `0-3,7`. The trimmed text is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRangeSyntax`] if the text is not valid range notation and
    /// [`Error::CpuOutOfRange`] if it references a negative CPU or one above [`MAX_CPU_ID`].
    pub fn from_range(range: &str) -> crate::Result<Self> {
        let range = range.trim();

        let entries = parse_range(range)
            .inspect_err(|error| debug!(%error, range, "rejected CPU range"))?;

        let mut bits = CpuBits::new();
        for entry in &entries {
            bits.insert_range(entry.first, entry.last);
        }

        Ok(Self {
            range: range.to_string(),
            entries,
            bits,
        })
    }

    /// Creates a set from a hexadecimal mask such as `8f` or `80,00000001`.
    ///
    /// See [`mask_to_range()`][crate::mask_to_range] for the accepted mask formats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaskSyntax`] if the text is not a valid mask and
    /// [`Error::CpuOutOfRange`] if it sets a bit above [`MAX_CPU_ID`].
    pub fn from_mask(mask: &str) -> crate::Result<Self> {
        let mask = mask.trim();

        let bits =
            parse_mask(mask).inspect_err(|error| debug!(%error, mask, "rejected CPU mask"))?;

        let set = Self::from_bits(bits);
        trace!(mask, range = %set.range, "decoded CPU mask");

        Ok(set)
    }

    /// Creates a set holding the given CPUs, in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CpuOutOfRange`] if any CPU is above [`MAX_CPU_ID`].
    pub fn from_cpus(cpus: impl IntoIterator<Item = CpuId>) -> crate::Result<Self> {
        let mut bits = CpuBits::new();

        for cpu in cpus {
            if cpu > MAX_CPU_ID {
                return Err(Error::out_of_range(cpu.to_string()));
            }

            bits.insert(cpu);
        }

        Ok(Self::from_bits(bits))
    }

    /// Creates a set with no members.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_bits(CpuBits::new())
    }

    fn from_bits(bits: CpuBits) -> Self {
        let entries = canonical_entries(&bits);

        Self {
            range: emit_range(&entries),
            entries,
            bits,
        }
    }

    /// The set in range notation, e.g. `0-3,7`.
    #[must_use]
    pub fn range(&self) -> &str {
        &self.range
    }

    /// The set in list notation, e.g. `0,1,2,3,7`.
    ///
    /// Each entry of [`range()`][Self::range] is expanded in the order it appears there, so a
    /// set built from non-canonical range text lists its CPUs in that text's order.
    #[must_use]
    pub fn list(&self) -> String {
        emit_list(&self.entries)
    }

    /// The set in mask notation, e.g. `80,00000001`: lowercase hexadecimal in comma-separated
    /// 32-bit groups, most significant group first, the leading group without zero padding.
    ///
    /// The empty set yields an empty string.
    #[must_use]
    pub fn mask(&self) -> String {
        emit_mask(&self.bits)
    }

    /// Adds every CPU in `other` to this set and stores the result in canonical form.
    pub fn add(&mut self, other: &Self) {
        self.bits.union_with(&other.bits);
        self.canonicalize();

        trace!(added = %other.range, range = %self.range, "added CPUs to set");
    }

    /// Removes every CPU in `other` from this set and stores the result in canonical form.
    /// The set may be left empty.
    pub fn remove(&mut self, other: &Self) {
        self.bits.difference_with(&other.bits);

        if self.bits.is_empty() {
            self.range.clear();
            self.entries.clear();
        } else {
            self.canonicalize();
        }

        trace!(removed = %other.range, range = %self.range, "removed CPUs from set");
    }

    fn canonicalize(&mut self) {
        self.entries = canonical_entries(&self.bits);
        self.range = emit_range(&self.entries);
    }

    /// Whether `cpu` is a member of the set.
    #[must_use]
    pub fn contains(&self, cpu: CpuId) -> bool {
        self.bits.contains(cpu)
    }

    /// The number of distinct CPUs in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Iterates over the distinct CPUs in the set, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CpuId> + '_ {
        self.bits.iter()
    }
}

impl Default for CpuSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for CpuSet {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for CpuSet {}

impl Display for CpuSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.range)
    }
}

impl FromStr for CpuSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_range(s)
    }
}

impl BitOrAssign<&CpuSet> for CpuSet {
    fn bitor_assign(&mut self, rhs: &Self) {
        self.add(rhs);
    }
}

impl SubAssign<&CpuSet> for CpuSet {
    fn sub_assign(&mut self, rhs: &Self) {
        self.remove(rhs);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(CpuSet: Send, Sync, Clone, Default, Eq);

    fn range_set(range: &str) -> CpuSet {
        CpuSet::new(range, false).unwrap()
    }

    fn mask_set(mask: &str) -> CpuSet {
        CpuSet::new(mask, true).unwrap()
    }

    #[test]
    fn range_to_mask() {
        assert_eq!(range_set("0-3,7").mask(), "8f");
        assert_eq!(range_set("0").mask(), "1");
        assert_eq!(range_set("39").mask(), "80,00000000");
        assert_eq!(range_set("0-63").mask(), "ffffffff,ffffffff");
    }

    #[test]
    fn mask_to_canonical_range() {
        assert_eq!(mask_set("8f").range(), "0-3,7");
        assert_eq!(mask_set("8d").range(), "0,2-3,7");
        assert_eq!(mask_set("80,00000000").range(), "39");
        assert_eq!(mask_set("  ff\n").range(), "0-7");
    }

    #[test]
    fn plain_construction_keeps_text() {
        let set = range_set("0,1,2,3,7");

        assert_eq!(set.range(), "0,1,2,3,7");
        assert_eq!(set.list(), "0,1,2,3,7");
        assert_eq!(set.mask(), "8f");

        assert_eq!(range_set(" 7,0-3 ").range(), "7,0-3");
    }

    #[test]
    fn list_follows_range_order() {
        assert_eq!(range_set("0-3,7").list(), "0,1,2,3,7");
        assert_eq!(range_set("7,0-2").list(), "7,0,1,2");
    }

    #[test]
    fn empty_set() {
        for set in [
            range_set(""),
            range_set("   "),
            mask_set(""),
            mask_set("0"),
            CpuSet::empty(),
        ] {
            assert_eq!(set.range(), "");
            assert_eq!(set.list(), "");
            assert_eq!(set.mask(), "");
            assert!(set.is_empty());
            assert_eq!(set.len(), 0);
        }

        assert_eq!(CpuSet::default(), CpuSet::empty());
    }

    #[test]
    fn add_merges_and_canonicalizes() {
        let mut set = range_set("0-3");
        set.add(&range_set("5-7"));
        assert_eq!(set.range(), "0-3,5-7");

        let mut set = range_set("5-7");
        set.add(&range_set("0-3"));
        assert_eq!(set.range(), "0-3,5-7");

        let mut set = range_set("0,1,2,3,7");
        set.add(&range_set("4"));
        assert_eq!(set.range(), "0-4,7");
        assert_eq!(set.list(), "0,1,2,3,4,7");
    }

    #[test]
    fn add_to_empty() {
        let mut set = CpuSet::empty();
        set.add(&range_set("3,1"));

        assert_eq!(set.range(), "1,3");
    }

    #[test]
    fn add_self_keeps_members() {
        let mut set = range_set("7,0-3");
        let copy = set.clone();
        set.add(&copy);

        assert_eq!(set.range(), "0-3,7");
        assert_eq!(set, copy);
    }

    #[test]
    fn remove_takes_difference() {
        let mut set = range_set("0-7");
        set.remove(&range_set("2-3"));

        assert_eq!(set.range(), "0-1,4-7");
        assert_eq!(set.list(), "0,1,4,5,6,7");
        assert_eq!(set.mask(), "f3");
    }

    #[test]
    fn remove_disjoint_canonicalizes() {
        let mut set = range_set("3,0-1");
        set.remove(&range_set("10"));

        assert_eq!(set.range(), "0-1,3");
    }

    #[test]
    fn remove_everything_leaves_empty() {
        let mut set = range_set("0-7");
        set.remove(&range_set("0-15"));

        assert_eq!(set.range(), "");
        assert_eq!(set.list(), "");
        assert_eq!(set.mask(), "");
        assert!(set.is_empty());

        let mut set = mask_set("f0");
        let copy = set.clone();
        set.remove(&copy);
        assert_eq!(set.range(), "");
    }

    #[test]
    fn operators_match_methods() {
        let mut set = range_set("0-3");
        set |= &range_set("8");
        assert_eq!(set.range(), "0-3,8");

        set -= &range_set("1-2");
        assert_eq!(set.range(), "0,3,8");
    }

    #[test]
    fn membership() {
        let set = range_set("0-3,7,3");

        assert!(set.contains(0));
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(!set.contains(4));
        assert!(!set.contains(MAX_CPU_ID));

        assert_eq!(set.len(), 5);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 7]);
    }

    #[test]
    fn equality_is_by_membership() {
        assert_eq!(range_set("0-1"), range_set("0,1"));
        assert_eq!(range_set("0-3,7"), mask_set("8f"));
        assert_ne!(range_set("0-3"), range_set("0-4"));
    }

    #[test]
    fn from_cpus_is_canonical() {
        let set = CpuSet::from_cpus([7, 2, 0, 1, 3, 2]).unwrap();

        assert_eq!(set.range(), "0-3,7");
    }

    #[test]
    fn from_cpus_rejects_large_ids() {
        assert!(matches!(
            CpuSet::from_cpus([1, MAX_CPU_ID + 1]),
            Err(Error::CpuOutOfRange { .. })
        ));
    }

    #[test]
    fn display_and_parse() {
        let set: CpuSet = "0-3,7".parse().unwrap();

        assert_eq!(set.to_string(), "0-3,7");
        assert!("0-3,x".parse::<CpuSet>().is_err());
    }

    #[test]
    fn construction_errors_match_notation() {
        assert!(matches!(
            CpuSet::new("0-3,foo", false),
            Err(Error::InvalidRangeSyntax { .. })
        ));
        assert!(matches!(
            CpuSet::new("8g", true),
            Err(Error::InvalidMaskSyntax { .. })
        ));
        assert!(matches!(
            CpuSet::new("-1", false),
            Err(Error::CpuOutOfRange { .. })
        ));

        // Range text is not a valid mask and vice versa.
        assert!(CpuSet::new("0-3", true).is_err());
        assert!(CpuSet::new("ff", false).is_err());
    }
}
