//! Terminal front ends and terminal mode handling.

pub mod fullscreen;
pub mod inline;
pub mod renderer;

use anyhow::{Context as _, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

pub use fullscreen::FullscreenFrontend;
pub use inline::InlineFrontend;
pub use renderer::TerminalRenderer;

static RAW_MODE: AtomicBool = AtomicBool::new(false);
static ALTERNATE_SCREEN: AtomicBool = AtomicBool::new(false);

/// Puts the terminal into raw mode (and optionally the alternate screen) and
/// restores it when dropped.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn raw() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        RAW_MODE.store(true, Ordering::SeqCst);
        Ok(TerminalGuard { _private: () })
    }

    pub fn alternate_screen() -> Result<Self> {
        let guard = Self::raw()?;
        execute!(io::stdout(), EnterAlternateScreen)
            .context("failed to enter alternate screen")?;
        ALTERNATE_SCREEN.store(true, Ordering::SeqCst);
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Undo whatever terminal modes are active. Safe to call more than once and
/// from the panic hook.
pub fn restore_terminal() {
    if ALTERNATE_SCREEN.swap(false, Ordering::SeqCst) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
    if RAW_MODE.swap(false, Ordering::SeqCst) {
        let _ = disable_raw_mode();
    }
}
