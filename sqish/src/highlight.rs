//! Locates the matched part of a command for emphasis.

/// Byte range of the first occurrence of the query within a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub len: usize,
}

impl Highlight {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Split `text` into the spans before, inside and after the match.
    ///
    /// `text` must be the string this highlight was computed from.
    pub fn split<'a>(&self, text: &'a str) -> (&'a str, &'a str, &'a str) {
        (
            &text[..self.start],
            &text[self.start..self.end()],
            &text[self.end()..],
        )
    }
}

/// First occurrence of `query` in `command`, or `None` when it does not occur.
/// An empty query matches at offset 0 with an empty span.
pub fn highlight(command: &str, query: &str) -> Option<Highlight> {
    command.find(query).map(|start| Highlight {
        start,
        len: query.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_first_occurrence() {
        let hl = highlight("git commit -m fix", "commit").unwrap();
        assert_eq!(hl, Highlight { start: 4, len: 6 });
        assert_eq!(
            hl.split("git commit -m fix"),
            ("git ", "commit", " -m fix")
        );
    }

    #[test]
    fn test_highlight_empty_query() {
        let hl = highlight("git commit -m fix", "").unwrap();
        assert_eq!(hl, Highlight { start: 0, len: 0 });
        assert_eq!(hl.split("ls"), ("", "", "ls"));
    }

    #[test]
    fn test_highlight_repeated_match_uses_first() {
        let hl = highlight("echo echo", "echo").unwrap();
        assert_eq!(hl.start, 0);
    }

    #[test]
    fn test_highlight_no_match() {
        assert_eq!(highlight("ls -la", "git"), None);
        assert_eq!(highlight("ls", "LS"), None);
    }

    #[test]
    fn test_highlight_multibyte() {
        let text = "echo 日本語 done";
        let hl = highlight(text, "本").unwrap();
        let (before, mid, after) = hl.split(text);
        assert_eq!(before, "echo 日");
        assert_eq!(mid, "本");
        assert_eq!(after, "語 done");
    }
}
