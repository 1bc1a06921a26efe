//! Session configuration.

/// Configuration for a [`Session`][crate::session::Session].
///
/// # Example
///
/// ```
/// use tableau_rs::config::SessionConfig;
/// use tableau_rs::session::Session;
///
/// let config = SessionConfig::default()
///     .with_history_limit(100)
///     .with_require_checkmarked_branches(false);
/// let session = Session::with_config(config);
/// assert_eq!(session.config().history_limit, Some(100));
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SessionConfig {
    /// Maximum number of undoable edits kept; the oldest are dropped first
    /// (default: unbounded)
    pub history_limit: Option<usize>,
    /// Whether `check_all_closed` also requires every branching formula to be
    /// checkmarked (default: true)
    pub require_checkmarked_branches: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            require_checkmarked_branches: true,
        }
    }
}

impl SessionConfig {
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn with_unbounded_history(mut self) -> Self {
        self.history_limit = None;
        self
    }

    pub fn with_require_checkmarked_branches(mut self, require: bool) -> Self {
        self.require_checkmarked_branches = require;
        self
    }
}
