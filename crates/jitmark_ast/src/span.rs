//! Source span type.
//!
//! Offsets count `char`s (Unicode scalar values) from the start of the
//! source string. [`SourceIndex`](crate::SourceIndex) converts them to byte
//! offsets when slicing many spans out of the same source.

use std::iter;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range over the source text.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SourceSpan {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl SourceSpan {
    /// The empty span at offset zero.
    pub const EMPTY: SourceSpan = SourceSpan { start: 0, end: 0 };

    /// Creates a new span.
    ///
    /// An `end` that precedes `start` is clamped to `start`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Creates a span from an inclusive `[start, end_inclusive]` pair.
    ///
    /// When the inclusive end precedes `start` the result is empty at `start`.
    #[inline]
    pub const fn from_inclusive(start: usize, end_inclusive: usize) -> Self {
        if end_inclusive < start {
            Self { start, end: start }
        } else {
            Self {
                start,
                end: end_inclusive.saturating_add(1),
            }
        }
    }

    /// Returns the length of the span.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span covers nothing.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    #[inline]
    pub const fn encloses(&self, other: &SourceSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Merges two spans into one that covers both.
    #[inline]
    pub const fn merge(&self, other: &SourceSpan) -> SourceSpan {
        SourceSpan {
            start: if self.start < other.start {
                self.start
            } else {
                other.start
            },
            end: if self.end > other.end {
                self.end
            } else {
                other.end
            },
        }
    }

    /// Clamps both ends into `[0, len]`.
    #[inline]
    pub const fn clamp_to(&self, len: usize) -> SourceSpan {
        let start = if self.start > len { len } else { self.start };
        let end = if self.end > len { len } else { self.end };
        SourceSpan::new(start, end)
    }

    /// Returns the span as a `Range` of char offsets.
    #[inline]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Slices the span out of `source`.
    ///
    /// Walks the source from the start; prefer
    /// [`SourceIndex::slice`](crate::SourceIndex::slice) for repeated use.
    /// Returns `None` if the span runs past the end.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        let start = nth_char_start(source, self.start)?;
        let len = nth_char_start(&source[start..], self.len())?;
        Some(&source[start..start + len])
    }
}

/// Byte offset of char `n`, or the byte length when `n` is the char count.
fn nth_char_start(text: &str, n: usize) -> Option<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(iter::once(text.len()))
        .nth(n)
}

impl From<Range<usize>> for SourceSpan {
    fn from(range: Range<usize>) -> Self {
        SourceSpan::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_span() {
        let span = SourceSpan::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(15));
        assert!(!span.contains(5));
        assert!(!span.contains(20));
    }

    #[test]
    fn test_new_clamps_reversed_end() {
        let span = SourceSpan::new(8, 3);
        assert_eq!(span, SourceSpan::new(8, 8));
        assert!(span.is_empty());
    }

    #[rstest]
    #[case::regular(2, 5, SourceSpan { start: 2, end: 6 })]
    #[case::single_char(4, 4, SourceSpan { start: 4, end: 5 })]
    #[case::end_before_start(7, 6, SourceSpan { start: 7, end: 7 })]
    #[case::far_before_start(7, 0, SourceSpan { start: 7, end: 7 })]
    fn test_from_inclusive(
        #[case] start: usize,
        #[case] end_inclusive: usize,
        #[case] expected: SourceSpan,
    ) {
        assert_eq!(SourceSpan::from_inclusive(start, end_inclusive), expected);
    }

    #[test]
    fn test_span_merge() {
        let merged = SourceSpan::new(10, 20).merge(&SourceSpan::new(15, 30));
        assert_eq!(merged, SourceSpan::new(10, 30));
    }

    #[test]
    fn test_clamp_to() {
        assert_eq!(SourceSpan::new(3, 50).clamp_to(10), SourceSpan::new(3, 10));
        assert_eq!(SourceSpan::new(30, 50).clamp_to(10), SourceSpan::new(10, 10));
    }

    #[test]
    fn test_slice_counts_chars() {
        let source = "héllo wörld";
        assert_eq!(SourceSpan::new(0, 5).slice(source), Some("héllo"));
        assert_eq!(SourceSpan::new(6, 11).slice(source), Some("wörld"));
        assert_eq!(SourceSpan::new(1, 2).slice(source), Some("é"));
        assert_eq!(SourceSpan::new(11, 11).slice(source), Some(""));
        assert_eq!(SourceSpan::new(0, 12).slice(source), None);
        assert_eq!(SourceSpan::new(12, 12).slice(source), None);
    }

    #[test]
    fn test_encloses() {
        let outer = SourceSpan::new(0, 10);
        assert!(outer.encloses(&SourceSpan::new(2, 10)));
        assert!(!outer.encloses(&SourceSpan::new(2, 11)));
    }
}
