use itertools::Itertools;

use crate::bits::CpuBits;
use crate::range::{canonical_entries, emit_range};
use crate::{CpuId, Error, MAX_CPU_ID};

/// Hex digits in one comma-separated group of mask notation (one 32-bit word).
const DIGITS_PER_GROUP: usize = 8;

const BITS_PER_DIGIT: usize = 4;

/// Converts a hexadecimal CPU mask into canonical range notation.
///
/// The mask is either one hexadecimal number of any length (`8f`, `ff00000000`) or 32-bit
/// groups of up to 8 hex digits separated by commas, most significant group first
/// (`ff,00000000`), as emitted by [`CpuSet::mask()`][crate::CpuSet::mask]. Bit `n` set means
/// CPU `n` is a member.
///
/// The result lists the members in ascending order with every run of two or more consecutive
/// CPUs merged into a `first-last` range. An empty or all-zero mask yields an empty string.
///
/// # Example
///
/// ```
/// assert_eq!(cpuset::mask_to_range("8f").unwrap(), "0-3,7");
/// assert_eq!(cpuset::mask_to_range("1,00000001").unwrap(), "0,32");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidMaskSyntax`] if the mask contains anything other than hex digits
/// and group separators, and [`Error::CpuOutOfRange`] if a bit above
/// [`MAX_CPU_ID`] is set.
pub fn mask_to_range(mask: &str) -> crate::Result<String> {
    let bits = parse_mask(mask)?;

    Ok(emit_range(&canonical_entries(&bits)))
}

pub(crate) fn parse_mask(mask: &str) -> crate::Result<CpuBits> {
    if mask.contains(',') {
        parse_grouped(mask)
    } else {
        parse_ungrouped(mask)
    }
}

fn parse_grouped(mask: &str) -> crate::Result<CpuBits> {
    // Groups are written most significant first but stored least significant first.
    let words = mask
        .split(',')
        .rev()
        .map(|group| {
            if group.is_empty() || group.len() > DIGITS_PER_GROUP {
                return Err(Error::mask_syntax(
                    group,
                    format!("each group must have 1 to {DIGITS_PER_GROUP} hex digits"),
                ));
            }

            check_hex_digits(group)?;

            u32::from_str_radix(group, 16)
                .map_err(|inner| Error::mask_syntax(group, inner.to_string()))
        })
        .collect::<crate::Result<Vec<u32>>>()?;

    CpuBits::from_words(words).ok_or_else(|| Error::out_of_range(mask))
}

fn parse_ungrouped(mask: &str) -> crate::Result<CpuBits> {
    let mut bits = CpuBits::new();

    // Least significant digit first, so the digit index counts nibbles from bit 0 upward.
    for (digit_index, digit) in mask.chars().rev().enumerate() {
        let Some(value) = digit.to_digit(16) else {
            return Err(Error::mask_syntax(
                mask,
                format!("'{digit}' is not a hexadecimal digit"),
            ));
        };

        for bit in 0..BITS_PER_DIGIT {
            if value & (1 << bit) == 0 {
                continue;
            }

            let cpu = digit_index
                .checked_mul(BITS_PER_DIGIT)
                .and_then(|position| position.checked_add(bit))
                .and_then(|position| CpuId::try_from(position).ok())
                .filter(|&cpu| cpu <= MAX_CPU_ID)
                .ok_or_else(|| Error::out_of_range(mask))?;

            bits.insert(cpu);
        }
    }

    Ok(bits)
}

fn check_hex_digits(text: &str) -> crate::Result<()> {
    match text.chars().find(|c| !c.is_ascii_hexdigit()) {
        Some(invalid) => Err(Error::mask_syntax(
            text,
            format!("'{invalid}' is not a hexadecimal digit"),
        )),
        None => Ok(()),
    }
}

/// Generates mask notation: lowercase hex, 32-bit groups separated by commas, most significant
/// group first. The leading group carries no leading zeros, every other group is padded to
/// exactly 8 digits. The empty set yields an empty string.
pub(crate) fn emit_mask(bits: &CpuBits) -> String {
    let mut words = bits.words().iter().rev();

    let Some(leading) = words.next() else {
        return String::new();
    };

    std::iter::once(format!("{leading:x}"))
        .chain(words.map(|word| format!("{word:08x}")))
        .join(",")
}
