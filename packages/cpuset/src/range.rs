use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;

use itertools::Itertools;

use crate::bits::CpuBits;
use crate::{CpuId, Error, MAX_CPU_ID};

/// One comma-separated entry of range notation: either a single CPU (`first == last`) or an
/// inclusive `first-last` range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RangeEntry {
    pub(crate) first: CpuId,
    pub(crate) last: CpuId,
}

impl RangeEntry {
    pub(crate) fn cpus(self) -> RangeInclusive<CpuId> {
        self.first..=self.last
    }
}

impl Display for RangeEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// Parses range notation into its entries, preserving their textual order and any overlap.
///
/// An empty string is valid input and returns an empty result.
pub(crate) fn parse_range(range: &str) -> crate::Result<Vec<RangeEntry>> {
    if range.is_empty() {
        return Ok(vec![]);
    }

    range.split(',').map(parse_entry).collect()
}

fn parse_entry(entry: &str) -> crate::Result<RangeEntry> {
    if entry.is_empty() {
        return Err(Error::range_syntax(
            entry,
            "entries must not be empty (is there a stray comma?)",
        ));
    }

    if entry.strip_prefix('-').is_some_and(is_negative_entry) {
        return Err(Error::out_of_range(entry));
    }

    let Some((first, last)) = entry.split_once('-') else {
        let cpu = parse_cpu_id(entry, "entry was not a range but is not an integer either")?;
        return Ok(RangeEntry {
            first: cpu,
            last: cpu,
        });
    };

    let first = parse_cpu_id(first, "range start could not be parsed as an integer")?;
    let last = parse_cpu_id(last, "range end could not be parsed as an integer")?;

    if first > last {
        return Err(Error::range_syntax(entry, "range start must be <= end"));
    }

    Ok(RangeEntry { first, last })
}

/// Whether the text after a leading `-` is a well-formed number (`5` in `-5`) or range
/// (`3-4` in `-3-4`), which makes the whole entry a negative CPU rather than garbage.
fn is_negative_entry(magnitude: &str) -> bool {
    match magnitude.split_once('-') {
        Some((first, last)) => is_decimal(first) && is_decimal(last),
        None => is_decimal(magnitude),
    }
}

/// Parses one non-negative decimal CPU identifier, rejecting signs, whitespace and anything
/// above [`MAX_CPU_ID`]. `problem` describes the text when it is not a decimal integer.
fn parse_cpu_id(text: &str, problem: &str) -> crate::Result<CpuId> {
    if !is_decimal(text) {
        return Err(Error::range_syntax(text, problem));
    }

    decimal_to_cpu_id(text)
}

/// Converts text already known to be all ASCII digits into a CPU identifier.
pub(crate) fn decimal_to_cpu_id(digits: &str) -> crate::Result<CpuId> {
    debug_assert!(is_decimal(digits));

    // All digits, so the only way this fails is by being too large for any integer type.
    digits
        .parse::<CpuId>()
        .ok()
        .filter(|&cpu| cpu <= MAX_CPU_ID)
        .ok_or_else(|| Error::out_of_range(digits))
}

pub(crate) fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Splits the members of a bitset into maximal runs of consecutive CPUs, in ascending order.
pub(crate) fn canonical_entries(bits: &CpuBits) -> Vec<RangeEntry> {
    bits.iter()
        .map(|cpu| RangeEntry {
            first: cpu,
            last: cpu,
        })
        .coalesce(|current, next| {
            if current.last.checked_add(1) == Some(next.first) {
                Ok(RangeEntry {
                    first: current.first,
                    last: next.last,
                })
            } else {
                Err((current, next))
            }
        })
        .collect()
}

/// Generates range notation from a sequence of entries, in the order given.
pub(crate) fn emit_range(entries: &[RangeEntry]) -> String {
    entries.iter().join(",")
}
