//! Char offset table for one source string.

use std::iter;
use std::ops::Range;

use crate::SourceSpan;

/// Converts between the UTF-8 byte offsets the grammar engine reports and the
/// char offsets every [`SourceSpan`] carries.
///
/// Built once per parse and kept with the document model. ASCII sources need
/// no table because both units agree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceIndex {
    /// Byte offset of every char start, then the byte length. Empty for ASCII.
    char_starts: Vec<usize>,
    byte_len: usize,
}

impl SourceIndex {
    pub fn new(source: &str) -> Self {
        let char_starts = if source.is_ascii() {
            Vec::new()
        } else {
            source
                .char_indices()
                .map(|(offset, _)| offset)
                .chain(iter::once(source.len()))
                .collect()
        };

        Self {
            char_starts,
            byte_len: source.len(),
        }
    }

    /// Number of chars in the source.
    pub fn char_len(&self) -> usize {
        if self.char_starts.is_empty() {
            self.byte_len
        } else {
            self.char_starts.len() - 1
        }
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Char offset of the char containing byte `offset`.
    ///
    /// Offsets past the end clamp to [`char_len`](Self::char_len).
    pub fn char_offset(&self, offset: usize) -> usize {
        if self.char_starts.is_empty() {
            return offset.min(self.byte_len);
        }
        match self.char_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }

    /// Byte offset where char `offset` starts.
    ///
    /// Offsets past the end clamp to the byte length.
    pub fn byte_offset(&self, offset: usize) -> usize {
        if self.char_starts.is_empty() {
            return offset.min(self.byte_len);
        }
        self.char_starts
            .get(offset)
            .copied()
            .unwrap_or(self.byte_len)
    }

    /// Converts a byte range into a char span.
    pub fn span_from_bytes(&self, range: Range<usize>) -> SourceSpan {
        SourceSpan::new(self.char_offset(range.start), self.char_offset(range.end))
    }

    /// Byte range covered by `span`, clamped to the source.
    pub fn byte_range(&self, span: SourceSpan) -> Range<usize> {
        self.byte_offset(span.start)..self.byte_offset(span.end)
    }

    /// Slices `span` out of `source`, the string this index was built from.
    ///
    /// Returns `None` when the span runs past the end.
    pub fn slice<'a>(&self, source: &'a str, span: SourceSpan) -> Option<&'a str> {
        if span.start > span.end || span.end > self.char_len() {
            return None;
        }
        source.get(self.byte_range(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_ascii_is_identity() {
        let index = SourceIndex::new("hello");
        assert_eq!(index.char_len(), 5);
        assert_eq!(index.char_offset(3), 3);
        assert_eq!(index.byte_offset(3), 3);
        assert_eq!(index.char_offset(50), 5);
    }

    #[rstest]
    #[case::start(0, 0)]
    #[case::after_two_byte_char(3, 2)]
    #[case::inside_three_byte_char(5, 3)]
    #[case::end(9, 5)]
    #[case::past_end(40, 5)]
    fn test_char_offset(#[case] byte: usize, #[case] expected: usize) {
        // é is two bytes, 日 is three.
        let index = SourceIndex::new("aé日bc");
        assert_eq!(index.char_len(), 5);
        assert_eq!(index.char_offset(byte), expected);
    }

    #[test]
    fn test_byte_offset() {
        let index = SourceIndex::new("aé日bc");
        let starts: Vec<usize> = (0..=6).map(|c| index.byte_offset(c)).collect();
        assert_eq!(starts, vec![0, 1, 3, 6, 7, 8, 8]);
    }

    #[test]
    fn test_span_round_trip() {
        let source = "é @bob";
        let index = SourceIndex::new(source);
        let span = index.span_from_bytes(3..7);
        assert_eq!(span, SourceSpan::new(2, 6));
        assert_eq!(index.byte_range(span), 3..7);
        assert_eq!(index.slice(source, span), Some("@bob"));
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let source = "日本";
        let index = SourceIndex::new(source);
        assert_eq!(index.slice(source, SourceSpan::new(0, 2)), Some("日本"));
        assert_eq!(index.slice(source, SourceSpan::new(1, 3)), None);
    }

    #[test]
    fn test_empty_source() {
        let index = SourceIndex::new("");
        assert_eq!(index.char_len(), 0);
        assert_eq!(index.slice("", SourceSpan::EMPTY), Some(""));
    }
}
