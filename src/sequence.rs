//! Packed nucleotide sequence storage.
//!
//! A genome runs to tens of thousands of bases, so the sequence is stored at
//! 2 bits per symbol, 4 symbols per byte, with the earliest symbol in the
//! lowest bits of each byte. `GeneSequence` behaves like an ordered
//! collection (indexed get/set, push/pop, iteration, lexical ordering) and
//! offers slice views that share the owner's storage by index translation
//! instead of copying.

use std::fmt;
use std::ops::Range;

/// One of the four nucleotide symbols, represented as a 2-bit code.
///
/// The set is closed: sequence decoding skips any byte that is not one of
/// the recognized lowercase letters rather than storing an "unknown" symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Base {
    A = 0b00,
    C = 0b01,
    G = 0b10,
    T = 0b11,
}

/// Bits per packed symbol.
const BASE_BITS: usize = 2;
/// Mask covering one packed symbol.
const BASE_MASK: u8 = 0b11;
/// Symbols stored per backing byte.
const BASES_PER_BYTE: usize = u8::BITS as usize / BASE_BITS;

impl Base {
    /// All four symbols in code order.
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    /// Maps a sequence-section byte to a symbol.
    ///
    /// Only the lowercase letters `a c g t` are recognized, matching the
    /// record format's sequence lines; everything else (digits, spaces,
    /// uppercase) is `None`.
    pub fn from_ascii(byte: u8) -> Option<Base> {
        match byte {
            b'a' => Some(Base::A),
            b'c' => Some(Base::C),
            b'g' => Some(Base::G),
            b't' => Some(Base::T),
            _ => None,
        }
    }

    /// The 2-bit storage code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a 2-bit storage code. The caller masks to two bits.
    fn from_code(code: u8) -> Base {
        match code & BASE_MASK {
            0b00 => Base::A,
            0b01 => Base::C,
            0b10 => Base::G,
            _ => Base::T,
        }
    }

    /// The lowercase letter used in the text format.
    pub fn to_char(self) -> char {
        match self {
            Base::A => 'a',
            Base::C => 'c',
            Base::G => 'g',
            Base::T => 't',
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A growable sequence of [`Base`] symbols packed 4 per byte.
///
/// Indices are valid over `[0, len)`; out-of-range access is a programming
/// error and panics. Value semantics: clones are independent copies.
#[derive(Debug, Clone, Default)]
pub struct GeneSequence {
    storage: Vec<u8>,
    length: usize,
}

impl GeneSequence {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sequence with room for `capacity` symbols.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity.div_ceil(BASES_PER_BYTE)),
            length: 0,
        }
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the sequence holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[track_caller]
    fn check_bounds(&self, index: usize) {
        if index >= self.length {
            panic!(
                "index {} out of bounds for gene sequence of length {}",
                index, self.length
            );
        }
    }

    /// Returns the symbol at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn get(&self, index: usize) -> Base {
        self.check_bounds(index);
        let byte = self.storage[index / BASES_PER_BYTE];
        Base::from_code(byte >> ((index % BASES_PER_BYTE) * BASE_BITS))
    }

    /// Overwrites the symbol at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn set(&mut self, index: usize, base: Base) {
        self.check_bounds(index);
        let shift = (index % BASES_PER_BYTE) * BASE_BITS;
        let slot = &mut self.storage[index / BASES_PER_BYTE];
        *slot = (*slot & !(BASE_MASK << shift)) | (base.code() << shift);
    }

    /// Appends a symbol, allocating a new backing byte only when the length
    /// crosses a 4-symbol boundary.
    pub fn push(&mut self, base: Base) {
        self.length += 1;
        if self.storage.len() <= (self.length - 1) / BASES_PER_BYTE {
            self.storage.push(base.code());
        } else {
            self.set(self.length - 1, base);
        }
    }

    /// Removes and returns the final symbol.
    ///
    /// Storage is not shrunk; the stale bits become unreachable.
    pub fn pop(&mut self) -> Option<Base> {
        if self.length == 0 {
            return None;
        }
        let last = self.get(self.length - 1);
        self.length -= 1;
        Some(last)
    }

    /// Iterates the symbols in index order.
    pub fn iter(&self) -> Bases<'_> {
        Bases {
            seq: self,
            range: 0..self.length,
        }
    }

    /// A read-only view over `[range.start, range.end)` sharing this
    /// sequence's storage.
    ///
    /// # Panics
    /// Panics if the range is out of bounds or inverted.
    #[track_caller]
    pub fn slice(&self, range: Range<usize>) -> GeneSlice<'_> {
        assert!(
            range.start <= range.end && range.end <= self.length,
            "slice {}..{} out of bounds for gene sequence of length {}",
            range.start,
            range.end,
            self.length
        );
        GeneSlice { seq: self, range }
    }

    /// A mutable view over `[range.start, range.end)` sharing this
    /// sequence's storage.
    ///
    /// # Panics
    /// Panics if the range is out of bounds or inverted.
    #[track_caller]
    pub fn slice_mut(&mut self, range: Range<usize>) -> GeneSliceMut<'_> {
        assert!(
            range.start <= range.end && range.end <= self.length,
            "slice {}..{} out of bounds for gene sequence of length {}",
            range.start,
            range.end,
            self.length
        );
        GeneSliceMut { seq: self, range }
    }
}

// Comparisons go symbol by symbol: stale bits beyond `length` (left behind
// by pop) must not take part.
impl PartialEq for GeneSequence {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl Eq for GeneSequence {}

impl PartialOrd for GeneSequence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GeneSequence {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl FromIterator<Base> for GeneSequence {
    fn from_iter<I: IntoIterator<Item = Base>>(iter: I) -> Self {
        let mut seq = GeneSequence::new();
        seq.extend(iter);
        seq
    }
}

impl Extend<Base> for GeneSequence {
    fn extend<I: IntoIterator<Item = Base>>(&mut self, iter: I) {
        for base in iter {
            self.push(base);
        }
    }
}

impl fmt::Display for GeneSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.iter() {
            write!(f, "{}", base)?;
        }
        Ok(())
    }
}

/// Iterator over the symbols of a [`GeneSequence`] or a slice view.
pub struct Bases<'a> {
    seq: &'a GeneSequence,
    range: Range<usize>,
}

impl Iterator for Bases<'_> {
    type Item = Base;

    fn next(&mut self) -> Option<Base> {
        self.range.next().map(|i| self.seq.get(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Bases<'_> {
    fn next_back(&mut self) -> Option<Base> {
        self.range.next_back().map(|i| self.seq.get(i))
    }
}

impl ExactSizeIterator for Bases<'_> {}

impl<'a> IntoIterator for &'a GeneSequence {
    type Item = Base;
    type IntoIter = Bases<'a>;

    fn into_iter(self) -> Bases<'a> {
        self.iter()
    }
}

/// A read-only sub-range view borrowing a [`GeneSequence`]'s storage.
#[derive(Clone)]
pub struct GeneSlice<'a> {
    seq: &'a GeneSequence,
    range: Range<usize>,
}

impl<'a> GeneSlice<'a> {
    /// Number of symbols in the view.
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    /// Returns true if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.range.start == self.range.end
    }

    /// Returns the symbol at `index` within the view.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn get(&self, index: usize) -> Base {
        assert!(
            index < self.len(),
            "index {} out of bounds for slice of length {}",
            index,
            self.len()
        );
        self.seq.get(self.range.start + index)
    }

    /// Iterates the symbols of the view in index order.
    pub fn iter(&self) -> Bases<'a> {
        Bases {
            seq: self.seq,
            range: self.range.clone(),
        }
    }
}

impl PartialEq for GeneSlice<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for GeneSlice<'_> {}

impl fmt::Display for GeneSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.iter() {
            write!(f, "{}", base)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GeneSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeneSlice(\"{}\")", self)
    }
}

/// A mutable sub-range view borrowing a [`GeneSequence`]'s storage.
pub struct GeneSliceMut<'a> {
    seq: &'a mut GeneSequence,
    range: Range<usize>,
}

impl GeneSliceMut<'_> {
    /// Number of symbols in the view.
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    /// Returns true if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.range.start == self.range.end
    }

    /// Returns the symbol at `index` within the view.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn get(&self, index: usize) -> Base {
        assert!(
            index < self.len(),
            "index {} out of bounds for slice of length {}",
            index,
            self.len()
        );
        self.seq.get(self.range.start + index)
    }

    /// Overwrites the symbol at `index`, writing through to the owner.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn set(&mut self, index: usize, base: Base) {
        assert!(
            index < self.len(),
            "index {} out of bounds for slice of length {}",
            index,
            self.len()
        );
        self.seq.set(self.range.start + index, base);
    }
}
