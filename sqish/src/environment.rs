//! Paths and facts about the process environment.

use crate::query::SessionEnv;
use anyhow::Context as _;
use anyhow::Result;
use std::path::PathBuf;

pub const APP_NAME: &str = "sqish";

/// Get the path to a config file.
pub fn get_config_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_config_file(name).context("failed get path")
}

/// Get the path to a data file.
pub fn get_data_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_data_file(name).context("failed get path")
}

/// Get the path to a state file (e.g. logs).
pub fn get_state_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_state_file(name).context("failed get path")
}

pub fn current_hostname() -> Result<String> {
    let name = nix::unistd::gethostname().context("failed to get hostname")?;
    Ok(name.to_string_lossy().into_owned())
}

pub fn current_dir() -> Result<String> {
    let dir = std::env::current_dir().context("failed to get current directory")?;
    Ok(dir.to_string_lossy().into_owned())
}

/// Capture the environment a search session runs in.
pub fn session_env(session_id: &str) -> Result<SessionEnv> {
    Ok(SessionEnv::new(
        current_dir()?,
        current_hostname()?,
        session_id,
    ))
}
