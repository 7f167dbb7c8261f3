use std::cmp::Ordering;

use num_integer::Integer;

use crate::{CpuId, MAX_CPU_ID};

/// A growable bit vector where bit `n` set means CPU `n` is a member.
///
/// Stored as 32-bit words, least significant word first, which matches the grouping of the
/// mask notation. Trailing all-zero words are never kept, so two values with the same members
/// always compare equal.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct CpuBits {
    words: Vec<u32>,
}

impl CpuBits {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Builds the bitset from 32-bit words, least significant word first.
    ///
    /// Returns `None` if any bit above [`MAX_CPU_ID`] is set.
    pub(crate) fn from_words(words: Vec<u32>) -> Option<Self> {
        let mut bits = Self { words };
        bits.trim();

        let (max_index, max_mask) = locate(MAX_CPU_ID);

        // Every bit at or below the highest allowed one in the top word.
        let allowed_in_top_word = u32::MAX >> max_mask.leading_zeros();

        let Some(top_index) = bits.words.len().checked_sub(1) else {
            return Some(bits);
        };

        match top_index.cmp(&max_index) {
            Ordering::Less => Some(bits),
            Ordering::Equal => bits
                .words
                .last()
                .is_some_and(|top| top & !allowed_in_top_word == 0)
                .then_some(bits),
            Ordering::Greater => None,
        }
    }

    /// The 32-bit words of the set, least significant word first, without trailing zero words.
    pub(crate) fn words(&self) -> &[u32] {
        &self.words
    }

    /// Adds a CPU to the set. The caller is responsible for checking the ID against
    /// [`MAX_CPU_ID`] first.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "word index is at most MAX_CPU_ID / 32, far from usize::MAX"
    )]
    pub(crate) fn insert(&mut self, cpu: CpuId) {
        debug_assert!(cpu <= MAX_CPU_ID);

        let (index, mask) = locate(cpu);

        if self.words.len() <= index {
            self.words.resize(index + 1, 0);
        }

        if let Some(word) = self.words.get_mut(index) {
            *word |= mask;
        }
    }

    pub(crate) fn insert_range(&mut self, first: CpuId, last: CpuId) {
        for cpu in first..=last {
            self.insert(cpu);
        }
    }

    pub(crate) fn contains(&self, cpu: CpuId) -> bool {
        let (index, mask) = locate(cpu);

        self.words.get(index).is_some_and(|word| word & mask != 0)
    }

    pub(crate) fn union_with(&mut self, other: &Self) {
        if self.words.len() < other.words.len() {
            self.words.resize(other.words.len(), 0);
        }

        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word |= other_word;
        }
    }

    pub(crate) fn difference_with(&mut self, other: &Self) {
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word &= !other_word;
        }

        self.trim();
    }

    pub(crate) fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over the members in ascending order.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "base is a multiple of 32 no larger than MAX_CPU_ID and bit is below 32"
    )]
    pub(crate) fn iter(&self) -> impl Iterator<Item = CpuId> + '_ {
        self.words
            .iter()
            .copied()
            .zip((0..=MAX_CPU_ID).step_by(BITS_PER_WORD))
            .flat_map(|(word, base)| {
                (0..u32::BITS)
                    .filter(move |&bit| word & (1_u32 << bit) != 0)
                    .map(move |bit| base + bit)
            })
    }

    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }
}

const BITS_PER_WORD: usize = u32::BITS as usize;

/// Returns the word index and the in-word mask for a CPU.
fn locate(cpu: CpuId) -> (usize, u32) {
    let (index, bit) = cpu.div_rem(&u32::BITS);

    (index as usize, 1_u32 << bit)
}
