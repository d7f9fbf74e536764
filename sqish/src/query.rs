//! Turns the live search buffer and toggles into a [`Query`].

use sqish_types::{Query, Settings};

/// Environment of the search session, captured once at start and passed
/// explicitly to every query build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnv {
    pub cwd: String,
    pub hostname: String,
    /// Shell session id handed in at process start.
    pub session_id: String,
}

impl SessionEnv {
    pub fn new(
        cwd: impl Into<String>,
        hostname: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        SessionEnv {
            cwd: cwd.into(),
            hostname: hostname.into(),
            session_id: session_id.into(),
        }
    }
}

/// Build the query for the current buffer. Pure.
///
/// Restricting to the session sets both the hostname and the session id so
/// the results come from this shell instance only.
pub fn build_query(
    buffer: &str,
    settings: &Settings,
    env: &SessionEnv,
    limit: Option<usize>,
) -> Query {
    let (hostname, session_id) = if settings.restrict_to_session {
        (Some(env.hostname.clone()), Some(env.session_id.clone()))
    } else {
        (None, None)
    };

    Query {
        text: buffer.to_string(),
        directory: settings.restrict_to_cwd.then(|| env.cwd.clone()),
        hostname,
        session_id,
        sort_by_frequency: settings.sort_by_frequency,
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> SessionEnv {
        SessionEnv::new("/home/user/src", "laptop", "session-1")
    }

    #[test]
    fn test_no_toggles_means_no_filters() {
        let query = build_query("git", &Settings::default(), &env(), Some(128));
        assert_eq!(query.text, "git");
        assert!(!query.is_filtered());
        assert!(!query.sort_by_frequency);
        assert_eq!(query.limit, Some(128));
    }

    #[test]
    fn test_session_and_cwd_compose() {
        let mut settings = Settings {
            restrict_to_session: true,
            restrict_to_cwd: true,
            ..Settings::default()
        };
        let query = build_query("", &settings, &env(), None);
        assert_eq!(query.directory.as_deref(), Some("/home/user/src"));
        assert_eq!(query.hostname.as_deref(), Some("laptop"));
        assert_eq!(query.session_id.as_deref(), Some("session-1"));

        settings.toggle_restrict_to_session();
        let query = build_query("", &settings, &env(), None);
        assert_eq!(query.directory.as_deref(), Some("/home/user/src"));
        assert_eq!(query.hostname, None);
        assert_eq!(query.session_id, None);

        settings.toggle_restrict_to_session();
        settings.toggle_restrict_to_cwd();
        let query = build_query("", &settings, &env(), None);
        assert_eq!(query.directory, None);
        assert_eq!(query.hostname.as_deref(), Some("laptop"));
        assert_eq!(query.session_id.as_deref(), Some("session-1"));
    }

    #[test]
    fn test_empty_buffer_still_builds() {
        let settings = Settings {
            sort_by_frequency: true,
            ..Settings::default()
        };
        let query = build_query("", &settings, &env(), Some(5));
        assert_eq!(query.text, "");
        assert!(query.sort_by_frequency);
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_build_is_pure() {
        let settings = Settings {
            restrict_to_cwd: true,
            ..Settings::default()
        };
        assert_eq!(
            build_query("make", &settings, &env(), None),
            build_query("make", &settings, &env(), None)
        );
    }
}
