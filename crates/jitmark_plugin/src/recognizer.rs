//! Custom inline recognizers.
//!
//! A recognizer is offered the text of a plain text run at every position
//! whose character is one of its trigger characters. It may claim a run of
//! characters starting there and describe the link that should replace them.

/// Returns true for characters that continue an identifier-like token.
///
/// Recognizers must not match when the candidate is glued to one of these on
/// either side (`C#`, `a@b`, `abc1234567`).
#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// The text a recognizer is scanning, positioned at a trigger character.
#[derive(Debug, Clone, Copy)]
pub struct InlineScan<'a> {
    text: &'a str,
    position: usize,
    leading: Option<char>,
    trailing: Option<char>,
}

impl<'a> InlineScan<'a> {
    /// Creates a scan over `text` positioned at byte offset `position`.
    ///
    /// `leading` and `trailing` are the characters just outside `text` in the
    /// surrounding source, used for boundary checks at either end.
    pub fn new(
        text: &'a str,
        position: usize,
        leading: Option<char>,
        trailing: Option<char>,
    ) -> Self {
        Self {
            text,
            position,
            leading,
            trailing,
        }
    }

    /// The whole text run.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the trigger character in [`text`](Self::text).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Text from the trigger character onwards.
    pub fn rest(&self) -> &'a str {
        self.text.get(self.position..).unwrap_or("")
    }

    /// The trigger character.
    pub fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character immediately before the trigger.
    pub fn preceding_char(&self) -> Option<char> {
        match self.text.get(..self.position) {
            Some("") | None => self.leading,
            Some(before) => before.chars().next_back(),
        }
    }

    /// The character immediately after a candidate of `len` bytes.
    pub fn char_after(&self, len: usize) -> Option<char> {
        let end = self.position.saturating_add(len);
        match self.text.get(end..) {
            Some("") | None => self.trailing,
            Some(after) => after.chars().next(),
        }
    }

    /// True when neither neighbor of a `len`-byte candidate is an identifier character.
    pub fn is_bounded(&self, len: usize) -> bool {
        !self.preceding_char().is_some_and(is_identifier_char)
            && !self.char_after(len).is_some_and(is_identifier_char)
    }
}

/// A claimed run of text and the link that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    /// Bytes consumed from the trigger position.
    pub len: usize,
    /// Link target.
    pub url: String,
    /// Optional link title.
    pub title: Option<String>,
}

impl InlineMatch {
    pub fn link(len: usize, url: impl Into<String>) -> Self {
        Self {
            len,
            url: url.into(),
            title: None,
        }
    }
}

/// A custom inline recognizer.
pub trait InlineRecognizer: Send + Sync {
    /// Stable recognizer name.
    fn name(&self) -> &str;

    /// Characters that start a candidate.
    fn trigger_chars(&self) -> &[char];

    /// Tries to claim text at the scan position.
    ///
    /// Must return `None` unless the candidate is bounded by non-identifier
    /// characters, and `len` must cover exactly the recognized text.
    fn recognize(&self, scan: &InlineScan<'_>) -> Option<InlineMatch>;

    /// Returns true if `c` is one of the trigger characters.
    fn is_trigger(&self, c: char) -> bool {
        self.trigger_chars().contains(&c)
    }
}
