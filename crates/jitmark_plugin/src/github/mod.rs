//! GitHub enrichments: `@mentions`, `#issue` references, and commit SHAs.

mod commit;
mod mention;
mod options;

pub use commit::CommitShaRecognizer;
pub use mention::MentionAndIssueRecognizer;
pub use options::{DEFAULT_BASE_URL, GitHubEnrichmentOptions};

use crate::{MarkdownPlugin, PluginError, PluginRegistry};

/// Plugin that registers the GitHub recognizers.
#[derive(Debug, Clone, Default)]
pub struct GitHubEnrichmentsPlugin {
    options: GitHubEnrichmentOptions,
}

impl GitHubEnrichmentsPlugin {
    pub fn new(options: GitHubEnrichmentOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GitHubEnrichmentOptions {
        &self.options
    }
}

impl MarkdownPlugin for GitHubEnrichmentsPlugin {
    fn name(&self) -> &str {
        "github-enrichments"
    }

    fn register(&self, registry: &mut PluginRegistry) -> Result<(), PluginError> {
        registry.register_recognizer(CommitShaRecognizer::new(self.options.clone()))?;
        registry.register_recognizer(MentionAndIssueRecognizer::new(self.options.clone()))?;
        Ok(())
    }
}
