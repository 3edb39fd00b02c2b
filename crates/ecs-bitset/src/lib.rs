//! Growable bit set packed into `u64` words.
//!
//! Used by the entity registry for liveness tracking and by mask-based
//! component storages for containment. Indexing is by `usize` bit position.
//!
//! Bits past [`BitSet::len`] inside the last word are always zero, so word
//! comparisons and popcounts never see stale data.

use std::fmt;

/// Number of bits stored per word.
const WORD_BITS: usize = u64::BITS as usize;

/// Number of words needed to hold `bits` bits.
const fn words_for(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

/// A growable vector of bits.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSet {
    /// Packed storage, least significant bit first.
    words: Vec<u64>,
    /// Logical number of bits.
    len: usize,
}

impl BitSet {
    /// Create an empty bit set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty bit set able to hold `bits` bits without reallocating.
    #[must_use]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(words_for(bits)),
            len: 0,
        }
    }

    /// Create a bit set of `len` bits, all set to `value`.
    #[must_use]
    pub fn repeat(value: bool, len: usize) -> Self {
        let mut bits = Self::new();
        bits.resize(len, value);
        bits
    }

    /// Number of bits (set or not) in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the set holds no bits at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the bit at `index`. Bits past the end read as `false`.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let (word, mask) = Self::locate(index);
        self.words[word] & mask != 0
    }

    /// Write the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`. Use [`BitSet::insert`] to grow on demand.
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(
            index < self.len,
            "bit index {index} out of range for BitSet of length {}",
            self.len
        );
        let (word, mask) = Self::locate(index);
        if value {
            self.words[word] |= mask;
        } else {
            self.words[word] &= !mask;
        }
    }

    /// Set the bit at `index`, growing the set with `false` bits if needed.
    ///
    /// Returns the previous value of the bit.
    pub fn insert(&mut self, index: usize) -> bool {
        if index >= self.len {
            self.resize(index + 1, false);
        }
        let previous = self.get(index);
        self.set(index, true);
        previous
    }

    /// Clear the bit at `index` if it is in range.
    ///
    /// Returns the previous value of the bit. Never grows the set.
    pub fn remove(&mut self, index: usize) -> bool {
        let previous = self.get(index);
        if previous {
            self.set(index, false);
        }
        previous
    }

    /// Append a bit at the end.
    pub fn push(&mut self, value: bool) {
        let index = self.len;
        self.resize(index + 1, false);
        if value {
            self.set(index, true);
        }
    }

    /// Resize to `len` bits, filling any new bits with `value`.
    pub fn resize(&mut self, len: usize, value: bool) {
        if len <= self.len {
            self.truncate(len);
            return;
        }

        let old_len = self.len;
        self.words.resize(words_for(len), 0);
        self.len = len;

        if value {
            for index in old_len..len {
                let (word, mask) = Self::locate(index);
                self.words[word] |= mask;
            }
        }
    }

    /// Shrink to `len` bits. No-op if already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.words.truncate(words_for(len));
        self.len = len;
        self.clear_tail();
    }

    /// Clear every bit and reset the length to zero.
    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    /// Count the bits that are set.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether no bit is set.
    #[must_use]
    pub fn none(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterate over the positions of set bits in increasing order.
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Iterate over every bit as a `bool`.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }

    fn locate(index: usize) -> (usize, u64) {
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    /// Zero any bits past `len` in the last word.
    fn clear_tail(&mut self) {
        let used = self.len % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSet[")?;
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        write!(f, "]")
    }
}

impl FromIterator<bool> for BitSet {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bits = Self::with_capacity(iter.size_hint().0);
        for bit in iter {
            bits.push(bit);
        }
        bits
    }
}

impl Extend<bool> for BitSet {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

/// Iterator over the set positions of a [`BitSet`].
pub struct Ones<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                // Clear lowest set bit
                self.current &= self.current - 1;
                return Some(self.word_index * WORD_BITS + bit);
            }
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
    }
}
