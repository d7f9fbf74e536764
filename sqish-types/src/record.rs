//! A single executed shell command.

use chrono::{DateTime, Local, Utc};

/// Display format for record timestamps.
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// One recorded command. Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The command text as typed.
    pub command: String,
    /// Working directory the command ran in.
    pub directory: String,
    pub hostname: String,
    /// Identifier of the shell instance that ran the command.
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(
        command: impl Into<String>,
        directory: impl Into<String>,
        hostname: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Record {
            command: command.into(),
            directory: directory.into(),
            hostname: hostname.into(),
            session_id: session_id.into(),
            timestamp: Utc::now(),
        }
    }

    /// The command flattened onto one line for list display.
    pub fn display_command(&self) -> String {
        self.command.replace('\n', " ")
    }

    /// Local time of the record formatted for display.
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format(TIME_FORMAT)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_command_flattens_newlines() {
        let record = Record::new("for f in *\ndo echo $f\ndone", "/tmp", "host", "s1");
        assert_eq!(record.display_command(), "for f in * do echo $f done");
    }

    #[test]
    fn display_time_uses_fixed_width_format() {
        let record = Record::new("ls", "/", "host", "s1");
        assert_eq!(record.display_time().len(), "2006/01/02 15:04:05".len());
    }
}
