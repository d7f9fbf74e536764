//! Full-screen list front end built on ratatui.

use crate::highlight::highlight;
use crate::session::{Frontend, SessionView};
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use sqish_types::{Record, Settings};
use std::io::{self, Stdout, Write};

const SEARCH_LABEL: &str = "Search: ";

pub struct FullscreenFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    list_state: ListState,
}

impl FullscreenFrontend {
    /// Draw on stdout. The terminal must already be in raw mode on the
    /// alternate screen.
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(FullscreenFrontend {
            terminal,
            list_state: ListState::default(),
        })
    }
}

impl Frontend for FullscreenFrontend {
    fn draw(&mut self, view: &SessionView<'_>) -> Result<()> {
        self.list_state.select(view.selected);
        let list_state = &mut self.list_state;
        self.terminal.draw(|f| ui(f, view, list_state))?;
        Ok(())
    }

    fn bell(&mut self) -> Result<()> {
        let backend = self.terminal.backend_mut();
        backend.write_all(b"\x07")?;
        Write::flush(backend)?;
        Ok(())
    }
}

fn ui(f: &mut Frame, view: &SessionView<'_>, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let items: Vec<ListItem> = view
        .results
        .iter()
        .map(|record| ListItem::new(result_line(record, view.matched)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("History"))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], list_state);

    render_search_line(f, chunks[1], view.buffer);

    let bar = Paragraph::new(settings_bar(view.settings, chunks[2].width as usize))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(bar, chunks[2]);
}

fn render_search_line(f: &mut Frame, area: Rect, buffer: &str) {
    let line = Line::from(vec![
        Span::styled(SEARCH_LABEL, Style::default().fg(Color::Yellow)),
        Span::raw(buffer),
    ]);
    let cursor = (SEARCH_LABEL.len() + Span::raw(buffer).width()) as u16;
    f.render_widget(Paragraph::new(line), area);
    f.set_cursor_position((
        area.x + cursor.min(area.width.saturating_sub(1)),
        area.y,
    ));
}

/// `time | command` with the first occurrence of `matched` in bold.
pub fn result_line<'a>(record: &Record, matched: &str) -> Line<'a> {
    let command = record.display_command();
    let mut spans = vec![Span::raw(format!("{} | ", record.display_time()))];
    match highlight(&command, matched) {
        Some(hl) if hl.len > 0 => {
            let (before, hit, after) = hl.split(&command);
            spans.push(Span::raw(before.to_string()));
            spans.push(Span::styled(
                hit.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(after.to_string()));
        }
        _ => spans.push(Span::raw(command)),
    }
    Line::from(spans)
}

/// Toggle status line, in long form when it fits in `width` columns and
/// short form otherwise. The middle part is centered.
pub fn settings_bar(settings: &Settings, width: usize) -> String {
    let (time, freq, short) = if settings.sort_by_frequency {
        (' ', '*', 'f')
    } else {
        ('*', ' ', 't')
    };
    let session = mark(settings.restrict_to_session);
    let cwd = mark(settings.restrict_to_cwd);

    let long = [
        format!("[^S]ort by [{time}] time [{freq}] freq"),
        format!("[^L]imit to my session [{session}]"),
        format!("[^W]orking dir only [{cwd}]"),
    ];
    let [left, middle, right] = if long.iter().map(String::len).sum::<usize>() < width {
        long
    } else {
        [
            format!("[^S][{short}]"),
            format!("[^L][{session}]"),
            format!("[^W][{cwd}]"),
        ]
    };

    let half = width / 2;
    let lpad = half.saturating_sub(left.len() + middle.len() / 2);
    let rpad = half.saturating_sub(right.len() + middle.len() / 2);
    format!(
        "{left}{}{middle}{}{right}",
        " ".repeat(lpad),
        " ".repeat(rpad)
    )
}

fn mark(on: bool) -> char {
    if on { '*' } else { ' ' }
}
