use itertools::Itertools;

use crate::bits::CpuBits;
use crate::range::{RangeEntry, canonical_entries, decimal_to_cpu_id, emit_range, is_decimal};

/// Normalizes list notation (`0,1,2,3,7`) into canonical range notation (`0-3,7`).
///
/// Order and duplicates in the input do not matter. Tokens that are not plain decimal
/// integers, including empty ones, are skipped.
///
/// # Example
///
/// ```
/// assert_eq!(cpuset::list_to_range("7,3,2,1,0,3").unwrap(), "0-3,7");
/// ```
///
/// # Errors
///
/// Returns [`Error::CpuOutOfRange`][crate::Error::CpuOutOfRange] if a token is larger than
/// [`MAX_CPU_ID`][crate::MAX_CPU_ID].
pub fn list_to_range(list: &str) -> crate::Result<String> {
    let mut bits = CpuBits::new();

    for token in list.split(',').filter(|token| is_decimal(token)) {
        bits.insert(decimal_to_cpu_id(token)?);
    }

    Ok(emit_range(&canonical_entries(&bits)))
}

/// Expands range entries into list notation, entry by entry in the order given.
pub(crate) fn emit_list(entries: &[RangeEntry]) -> String {
    entries.iter().copied().flat_map(RangeEntry::cpus).join(",")
}
