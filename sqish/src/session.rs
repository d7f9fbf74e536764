//! One interactive search session.
//!
//! [`SessionState`] holds everything the UI thread mutates: the search
//! buffer, the toggles and the selection. [`run_session`] is the UI loop; it
//! feeds input events into the state, forwards the resulting queries to the
//! [`SearchPipeline`] and applies finished result sets in arrival order.

use crate::input::InputEvent;
use crate::pipeline::{ResultSet, SearchPipeline};
use crate::query::{SessionEnv, build_query};
use crate::selection::Selection;
use anyhow::{Result, bail};
use crossbeam_channel::{Receiver, select};
use sqish_types::{Query, Record, Settings};
use tracing::debug;

/// What the UI loop must do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Submit this query and redraw.
    Search(Query),
    Redraw,
    /// Nothing changed; alert the user.
    Bell,
    /// End the session with the selected record, if any.
    Commit(Option<Record>),
    Quit,
}

/// Read-only snapshot handed to front ends for drawing.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub buffer: &'a str,
    pub settings: &'a Settings,
    pub results: &'a [Record],
    pub selected: Option<usize>,
    /// Query text the displayed results were produced for.
    pub matched: &'a str,
    /// Number of result sets applied so far; zero until the first arrives.
    pub generation: u64,
}

impl SessionView<'_> {
    /// Whether any result set has been shown yet.
    pub fn searched(&self) -> bool {
        self.generation > 0
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selected.and_then(|i| self.results.get(i))
    }
}

/// Something that can show a session.
pub trait Frontend {
    fn draw(&mut self, view: &SessionView<'_>) -> Result<()>;

    /// Audible or visual alert.
    fn bell(&mut self) -> Result<()>;
}

#[derive(Debug)]
pub struct SessionState {
    buffer: String,
    settings: Settings,
    env: SessionEnv,
    limit: Option<usize>,
    selection: Selection,
    matched: String,
    generation: u64,
}

impl SessionState {
    pub fn new(
        initial_query: &str,
        settings: Settings,
        env: SessionEnv,
        limit: Option<usize>,
    ) -> Self {
        SessionState {
            buffer: initial_query.to_string(),
            settings,
            env,
            limit,
            selection: Selection::new(),
            matched: String::new(),
            generation: 0,
        }
    }

    /// Query for the current buffer and toggles.
    pub fn query(&self) -> Query {
        build_query(&self.buffer, &self.settings, &self.env, self.limit)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn apply(&mut self, event: InputEvent) -> Step {
        match event {
            InputEvent::InsertChar(ch) => {
                self.buffer.push(ch);
                Step::Search(self.query())
            }
            InputEvent::Backspace => {
                if self.buffer.pop().is_some() {
                    Step::Search(self.query())
                } else {
                    Step::Bell
                }
            }
            InputEvent::MoveUp => navigated(self.selection.move_up()),
            InputEvent::MoveDown => navigated(self.selection.move_down()),
            InputEvent::ToggleSortMode => {
                self.settings.toggle_sort_by_frequency();
                Step::Search(self.query())
            }
            InputEvent::ToggleSessionFilter => {
                self.settings.toggle_restrict_to_session();
                Step::Search(self.query())
            }
            InputEvent::ToggleCwdFilter => {
                self.settings.toggle_restrict_to_cwd();
                Step::Search(self.query())
            }
            InputEvent::Commit => Step::Commit(std::mem::take(&mut self.selection).commit()),
            InputEvent::Quit => Step::Quit,
        }
    }

    /// Show a finished result set. Resets the selection.
    pub fn apply_results(&mut self, set: ResultSet) {
        self.matched = set.query.text;
        self.generation += 1;
        self.selection.on_new_result_set(set.records);
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            buffer: &self.buffer,
            settings: &self.settings,
            results: self.selection.results(),
            selected: self.selection.index(),
            matched: &self.matched,
            generation: self.generation,
        }
    }
}

fn navigated(moved: bool) -> Step {
    if moved { Step::Redraw } else { Step::Bell }
}

/// Drive a session until the user commits or quits.
///
/// Returns the committed record, or `None` when the user quit or the input
/// ended. A store failure ends the session with an error.
pub fn run_session<F: Frontend>(
    frontend: &mut F,
    events: &Receiver<InputEvent>,
    pipeline: &SearchPipeline,
    state: &mut SessionState,
) -> Result<Option<Record>> {
    pipeline.submit(state.query())?;
    frontend.draw(&state.view())?;

    loop {
        select! {
            recv(events) -> event => {
                let Ok(event) = event else {
                    debug!("input ended, leaving session");
                    return Ok(None);
                };
                match state.apply(event) {
                    Step::Search(query) => {
                        pipeline.submit(query)?;
                        frontend.draw(&state.view())?;
                    }
                    Step::Redraw => frontend.draw(&state.view())?,
                    Step::Bell => frontend.bell()?,
                    Step::Commit(record) => return Ok(record),
                    Step::Quit => return Ok(None),
                }
            }
            recv(pipeline.results()) -> outcome => match outcome {
                Ok(Ok(set)) => {
                    debug!("showing {} results for {:?}", set.records.len(), set.query.text);
                    state.apply_results(set);
                    frontend.draw(&state.view())?;
                }
                Ok(Err(err)) => {
                    return Err(anyhow::Error::new(err).context("history search failed"));
                }
                Err(_) => bail!("search worker stopped unexpectedly"),
            }
        }
    }
}
