//! Immutable description of one history lookup.

/// A history query. Built fresh for every edit and never mutated afterwards.
///
/// `text` is matched as a case-sensitive substring of the command; the empty
/// string matches everything. Each `Some` filter is an equality match on the
/// corresponding record column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub directory: Option<String>,
    pub hostname: Option<String>,
    pub session_id: Option<String>,
    pub sort_by_frequency: bool,
    pub limit: Option<usize>,
}

impl Query {
    /// Unfiltered, recency-ordered query for `text`.
    pub fn matching(text: impl Into<String>) -> Self {
        Query {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Whether any equality filter is set.
    pub fn is_filtered(&self) -> bool {
        self.directory.is_some() || self.hostname.is_some() || self.session_id.is_some()
    }
}
