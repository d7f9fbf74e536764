//! Persisted search toggles.

/// Search toggles. Always fully defined; all flags default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Group by command and directory, most frequent first.
    pub sort_by_frequency: bool,
    /// Only show commands from this host and shell session.
    pub restrict_to_session: bool,
    /// Only show commands run in the current directory.
    pub restrict_to_cwd: bool,
}

impl Settings {
    pub fn toggle_sort_by_frequency(&mut self) {
        self.sort_by_frequency = !self.sort_by_frequency;
    }

    pub fn toggle_restrict_to_session(&mut self) {
        self.restrict_to_session = !self.restrict_to_session;
    }

    pub fn toggle_restrict_to_cwd(&mut self) {
        self.restrict_to_cwd = !self.restrict_to_cwd;
    }
}
