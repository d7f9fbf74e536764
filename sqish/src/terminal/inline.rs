//! Single-line type-ahead front end.
//!
//! Shows the selected match on one line as `> before`**`match`**`after`,
//! redrawn in place. A search that matches nothing shows the typed text and
//! rings the bell.

use super::renderer::TerminalRenderer;
use crate::highlight::highlight;
use crate::session::{Frontend, SessionView};
use anyhow::Result;
use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{Stdout, Write};

const PROMPT: &str = "> ";
const BELL: &str = "\x07";

/// What the inline line shows for a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineLine {
    /// Text with the match emphasised.
    Match {
        before: String,
        matched: String,
        after: String,
    },
    /// Plain text: the buffer before the first results or when nothing
    /// matched.
    Plain(String),
}

impl InlineLine {
    pub fn for_view(view: &SessionView<'_>) -> Self {
        let Some(record) = view.selected_record() else {
            return InlineLine::Plain(view.buffer.to_string());
        };
        let command = record.display_command();
        match highlight(&command, view.matched) {
            Some(hl) => {
                let (before, matched, after) = hl.split(&command);
                InlineLine::Match {
                    before: before.to_string(),
                    matched: matched.to_string(),
                    after: after.to_string(),
                }
            }
            None => InlineLine::Plain(command),
        }
    }
}

pub struct InlineFrontend<W: Write = Stdout> {
    renderer: TerminalRenderer<W>,
    /// Result set generation the bell last rang for.
    rang_for: u64,
}

impl Default for InlineFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineFrontend {
    pub fn new() -> Self {
        Self::with_renderer(TerminalRenderer::new())
    }
}

impl<W: Write> InlineFrontend<W> {
    pub fn with_renderer(renderer: TerminalRenderer<W>) -> Self {
        InlineFrontend {
            renderer,
            rang_for: 0,
        }
    }

    /// Clear the line so the shell can redraw its prompt.
    pub fn finish(&mut self) -> Result<()> {
        queue!(self.renderer, Clear(ClearType::CurrentLine), MoveToColumn(0))?;
        self.renderer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
impl InlineFrontend<Vec<u8>> {
    fn output(&self) -> String {
        String::from_utf8_lossy(self.renderer.sink()).into_owned()
    }
}

impl<W: Write> Frontend for InlineFrontend<W> {
    fn draw(&mut self, view: &SessionView<'_>) -> Result<()> {
        queue!(
            self.renderer,
            Clear(ClearType::CurrentLine),
            MoveToColumn(0),
            Print(PROMPT)
        )?;

        match InlineLine::for_view(view) {
            InlineLine::Match {
                before,
                matched,
                after,
            } => {
                queue!(
                    self.renderer,
                    Print(before),
                    SetAttribute(Attribute::Bold),
                    Print(matched),
                    SetAttribute(Attribute::Reset),
                    Print(after)
                )?;
            }
            InlineLine::Plain(text) => queue!(self.renderer, Print(text))?,
        }

        // Ring once per empty result set, not on every redraw.
        if view.searched() && view.results.is_empty() && self.rang_for != view.generation {
            self.rang_for = view.generation;
            queue!(self.renderer, Print(BELL))?;
        }

        self.renderer.flush()?;
        Ok(())
    }

    fn bell(&mut self) -> Result<()> {
        queue!(self.renderer, Print(BELL))?;
        self.renderer.flush()?;
        Ok(())
    }
}
