//! Transformer configuration.

/// Fields deleted from every entry unless configured otherwise.
pub const DEFAULT_REMOVABLE_FIELDS: &[&str] = &["pages", "address"];

/// Rules applied by [`crate::transform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenConfig {
    /// Field names deleted unconditionally (compared case-insensitively).
    pub removable_fields: Vec<String>,
    /// Replace the fields of `online` entries with a single `note` holding the URL.
    pub collapse_online: bool,
}

impl Default for ShortenConfig {
    fn default() -> Self {
        Self {
            removable_fields: DEFAULT_REMOVABLE_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            collapse_online: false,
        }
    }
}

impl ShortenConfig {
    /// Replaces the removable-field set.
    #[must_use]
    pub fn with_removable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.removable_fields = fields
            .into_iter()
            .map(|f| f.into().to_lowercase())
            .collect();
        self
    }

    #[must_use]
    pub fn with_collapse_online(mut self, enable: bool) -> Self {
        self.collapse_online = enable;
        self
    }
}
