//! Sets of base-position ranges.
//!
//! A feature location like `join(266..805,806..2719)` covers several
//! disjoint segments of the sequence. `RangeSet` stores such a location as a
//! sorted union of half-open spans: the record's inclusive `a..b` becomes
//! `a..b+1` on insertion by the location parser.

use std::ops::Range;

/// An ordered union of half-open `usize` spans.
///
/// Spans are kept sorted by start and coalesced: inserting overlapping or
/// adjacent spans merges them, so two sets built from the same positions in
/// different insertion orders compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    spans: Vec<Range<usize>>,
}

impl RangeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a span, merging it with any spans it overlaps or touches.
    ///
    /// Empty spans are ignored.
    pub fn insert(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }

        // First span that could merge with `range` (its end reaches range.start).
        let first = self.spans.partition_point(|s| s.end < range.start);
        // One past the last span that could merge (its start is within range.end).
        let last = self.spans.partition_point(|s| s.start <= range.end);

        if first == last {
            self.spans.insert(first, range);
        } else {
            let start = range.start.min(self.spans[first].start);
            let end = range.end.max(self.spans[last - 1].end);
            self.spans.splice(first..last, [start..end]);
        }
    }

    /// Merges another set into this one.
    pub fn union(&mut self, other: &RangeSet) {
        for span in &other.spans {
            self.insert(span.clone());
        }
    }

    /// Returns true if `pos` falls inside any span.
    pub fn contains(&self, pos: usize) -> bool {
        let i = self.spans.partition_point(|s| s.end <= pos);
        self.spans.get(i).is_some_and(|s| s.start <= pos)
    }

    /// Iterates the coalesced spans in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Range<usize>> {
        self.spans.iter()
    }

    /// Number of disjoint spans.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Total number of positions covered.
    pub fn len(&self) -> usize {
        self.spans.iter().map(|s| s.end - s.start).sum()
    }

    /// Returns true if no positions are covered.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl From<Range<usize>> for RangeSet {
    fn from(range: Range<usize>) -> Self {
        let mut set = Self::new();
        set.insert(range);
        set
    }
}

impl FromIterator<Range<usize>> for RangeSet {
    fn from_iter<I: IntoIterator<Item = Range<usize>>>(iter: I) -> Self {
        let mut set = Self::new();
        for range in iter {
            set.insert(range);
        }
        set
    }
}
