//! Markup rendering options and configuration.

use crate::label::Taxonomy;

/// Options for label-to-markup reconstruction.
#[derive(Debug, Clone)]
pub struct MarkupOptions {
    /// Label set and its markup elements
    pub taxonomy: Taxonomy,

    /// Tabs written before every opening element
    pub indent_depth: usize,

    /// What to do when the label stream outruns the document
    pub sync_policy: SyncPolicy,

    /// Replace `@BULLET` markers with a bullet character
    pub substitute_bullets: bool,
}

impl MarkupOptions {
    /// Create new markup options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the taxonomy.
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Set the indentation depth.
    pub fn with_indent(mut self, depth: usize) -> Self {
        self.indent_depth = depth;
        self
    }

    /// Set the synchronization policy.
    pub fn with_sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Enable or disable bullet substitution.
    pub fn with_bullets(mut self, substitute: bool) -> Self {
        self.substitute_bullets = substitute;
        self
    }

    pub(crate) fn indent(&self) -> String {
        "\t".repeat(self.indent_depth)
    }
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            taxonomy: Taxonomy::default(),
            indent_depth: 3,
            sync_policy: SyncPolicy::default(),
            substitute_bullets: true,
        }
    }
}

/// Handling of label records that have no matching unit left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Warn, count, and use an empty line in place of the missing one
    #[default]
    Placeholder,

    /// Fail with [`Error::LostSynchronization`](crate::Error::LostSynchronization)
    Abort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = MarkupOptions::new()
            .with_taxonomy(Taxonomy::monograph())
            .with_indent(0)
            .with_sync_policy(SyncPolicy::Abort);
        assert_eq!(options.taxonomy.name(), "monograph");
        assert_eq!(options.indent(), "");
        assert_eq!(options.sync_policy, SyncPolicy::Abort);
        assert_eq!(MarkupOptions::default().indent(), "\t\t\t");
    }
}
