//! `@user` mentions and `#123` issue references.

use crate::github::GitHubEnrichmentOptions;
use crate::{InlineMatch, InlineRecognizer, InlineScan};

/// Longest user name, in chars.
const MAX_USERNAME_LEN: usize = 39;

/// Recognizes `@user` mentions and, when a repository is configured, `#123`
/// issue references.
#[derive(Debug, Clone)]
pub struct MentionAndIssueRecognizer {
    options: GitHubEnrichmentOptions,
}

impl MentionAndIssueRecognizer {
    pub fn new(options: GitHubEnrichmentOptions) -> Self {
        Self { options }
    }

    fn recognize_mention(&self, scan: &InlineScan<'_>) -> Option<InlineMatch> {
        let after_at = &scan.rest()[1..];
        let name_end = after_at
            .char_indices()
            .find(|&(_, c)| !(c.is_alphanumeric() || c == '-'))
            .map_or(after_at.len(), |(offset, _)| offset);
        let name = &after_at[..name_end];

        let name_chars = name.chars().count();
        if name_chars == 0 || name_chars > MAX_USERNAME_LEN {
            return None;
        }
        if name.starts_with('-') || name.ends_with('-') {
            return None;
        }

        let len = 1 + name.len();
        if !scan.is_bounded(len) {
            return None;
        }

        Some(InlineMatch::link(len, self.options.user_url(name)))
    }

    fn recognize_issue(&self, scan: &InlineScan<'_>) -> Option<InlineMatch> {
        let repository = self.options.repository()?;

        let digits = scan.rest()[1..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits == 0 {
            return None;
        }

        let len = 1 + digits;
        if !scan.is_bounded(len) {
            return None;
        }

        let number = &scan.rest()[1..len];
        Some(InlineMatch::link(
            len,
            self.options.issue_url(repository, number),
        ))
    }
}

impl InlineRecognizer for MentionAndIssueRecognizer {
    fn name(&self) -> &str {
        "github-mention-issue"
    }

    fn trigger_chars(&self) -> &[char] {
        &['@', '#']
    }

    fn recognize(&self, scan: &InlineScan<'_>) -> Option<InlineMatch> {
        match scan.current()? {
            '@' => self.recognize_mention(scan),
            '#' => self.recognize_issue(scan),
            _ => None,
        }
    }
}
