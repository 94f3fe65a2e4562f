//! Commit SHA links.

use crate::github::GitHubEnrichmentOptions;
use crate::{InlineMatch, InlineRecognizer, InlineScan};

const FULL_SHA_LEN: usize = 40;
const SHORT_SHA_LEN: std::ops::RangeInclusive<usize> = 7..=12;

const HEX_DIGITS: [char; 22] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'A', 'B', 'C',
    'D', 'E', 'F',
];

/// Recognizes commit SHAs and links them into the configured repository.
#[derive(Debug, Clone)]
pub struct CommitShaRecognizer {
    options: GitHubEnrichmentOptions,
}

impl CommitShaRecognizer {
    pub fn new(options: GitHubEnrichmentOptions) -> Self {
        Self { options }
    }

    fn accepts_len(&self, len: usize) -> bool {
        len == FULL_SHA_LEN || (self.options.allow_short_shas && SHORT_SHA_LEN.contains(&len))
    }
}

impl InlineRecognizer for CommitShaRecognizer {
    fn name(&self) -> &str {
        "github-commit-sha"
    }

    fn trigger_chars(&self) -> &[char] {
        &HEX_DIGITS
    }

    fn recognize(&self, scan: &InlineScan<'_>) -> Option<InlineMatch> {
        let repository = self.options.repository()?;

        let len = scan
            .rest()
            .bytes()
            .take_while(u8::is_ascii_hexdigit)
            .count();
        if !self.accepts_len(len) || !scan.is_bounded(len) {
            return None;
        }

        let sha = &scan.rest()[..len];
        Some(InlineMatch::link(
            len,
            self.options.commit_url(repository, sha),
        ))
    }
}
