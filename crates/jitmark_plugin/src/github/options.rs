//! GitHub enrichment options.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// Options for the GitHub enrichment plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubEnrichmentOptions {
    /// Base web URL links are built on.
    pub base_url: String,

    /// Repository in the form `owner/repo`.
    ///
    /// Issue references and commit links are only recognized when this is set.
    pub repository_slug: Option<String>,

    /// Recognize 7 to 12 character short SHAs in addition to full 40 character ones.
    pub allow_short_shas: bool,
}

impl Default for GitHubEnrichmentOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            repository_slug: None,
            allow_short_shas: true,
        }
    }
}

impl GitHubEnrichmentOptions {
    /// Options targeting `repository_slug`.
    pub fn for_repository(repository_slug: impl Into<String>) -> Self {
        Self {
            repository_slug: Some(repository_slug.into()),
            ..Self::default()
        }
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            DEFAULT_BASE_URL
        } else {
            trimmed
        }
    }

    /// Repository slug with surrounding whitespace and slashes removed.
    ///
    /// `None` when unset or blank.
    pub fn repository(&self) -> Option<&str> {
        self.repository_slug
            .as_deref()
            .map(|slug| slug.trim().trim_matches('/'))
            .filter(|slug| !slug.is_empty())
    }

    pub(crate) fn user_url(&self, user: &str) -> String {
        format!("{}/{}", self.base_url(), user)
    }

    pub(crate) fn issue_url(&self, repository: &str, number: &str) -> String {
        format!("{}/{}/issues/{}", self.base_url(), repository, number)
    }

    pub(crate) fn commit_url(&self, repository: &str, sha: &str) -> String {
        format!("{}/{}/commit/{}", self.base_url(), repository, sha)
    }
}
