//! Input adapters.
//!
//! Both front ends reduce their native input to the same [`InputEvent`]
//! vocabulary:
//!
//! - [`key_action`] - crossterm key events (full-screen widget front end)
//! - [`raw`] - raw terminal bytes (inline front end)

pub mod key_action;
pub mod raw;

use anyhow::Result;
use crossbeam_channel::{Receiver, bounded};
use std::thread;
use tracing::{debug, warn};

pub use key_action::KeyEventInput;
pub use raw::RawByteInput;

/// Capacity of the queue between an input pump and the session loop.
const EVENT_QUEUE_CAPACITY: usize = 128;

/// Logical edit events consumed by the search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    InsertChar(char),
    Backspace,
    MoveUp,
    MoveDown,
    ToggleSortMode,
    ToggleSessionFilter,
    ToggleCwdFilter,
    Commit,
    Quit,
}

/// A source of [`InputEvent`]s.
pub trait InputAdapter {
    /// Block until the next event. `Ok(None)` means the input is exhausted.
    fn next_event(&mut self) -> Result<Option<InputEvent>>;
}

/// Pump `adapter` on its own thread into a bounded queue.
///
/// The queue disconnects when the input ends or fails. The pump stops on its
/// own once the receiver is dropped and the next event arrives.
pub fn spawn_input_pump<A>(mut adapter: A) -> Result<Receiver<InputEvent>>
where
    A: InputAdapter + Send + 'static,
{
    let (tx, rx) = bounded(EVENT_QUEUE_CAPACITY);
    thread::Builder::new()
        .name("sqish-input".to_string())
        .spawn(move || {
            loop {
                match adapter.next_event() {
                    Ok(Some(event)) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("input closed");
                        break;
                    }
                    Err(err) => {
                        warn!("failed to read input: {err:#}");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pump_forwards_until_end_of_input() {
        let input = RawByteInput::new(&b"ls\r"[..]);
        let rx = spawn_input_pump(input).unwrap();
        let events: Vec<InputEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::InsertChar('l'),
                InputEvent::InsertChar('s'),
                InputEvent::Commit,
            ]
        );
    }
}
