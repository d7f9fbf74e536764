use crate::config::{CONFIG_FILE, Config};
use crate::environment::session_env;
use crate::errors::display_user_error;
use crate::input::{KeyEventInput, RawByteInput, spawn_input_pump};
use crate::pipeline::SearchPipeline;
use crate::query::SessionEnv;
use crate::session::{SessionState, run_session};
use crate::shell_init::{Shell, init_script};
use crate::terminal::{FullscreenFrontend, InlineFrontend, TerminalGuard, restore_terminal};
use anyhow::{Context as _, Result, bail};
use clap::Parser;
use nix::unistd::isatty;
use sqish_store::{HistoryStore, SqliteStore};
use sqish_types::Record;
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod environment;
pub mod errors;
pub mod highlight;
pub mod input;
pub mod pipeline;
pub mod query;
pub mod selection;
pub mod session;
pub mod shell_init;
pub mod terminal;

#[cfg(test)]
mod test_support;

const LOG_FILE: &str = "sqish.log";
const LOG_ENV: &str = "SQISH_LOG";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the history database.
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Identifies the shell instance commands are recorded from.
    #[arg(long, env = "SQISH_SESSION_ID", default_value = "", global = true)]
    pub shell_session_id: String,

    #[command(subcommand)]
    pub subcommand: SubCommand,
}

#[derive(Parser, Debug)]
pub enum SubCommand {
    /// Add a command to the history.
    #[command(alias = "a")]
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Search in full screen.
    #[command(alias = "s")]
    Search {
        /// Query to pre-fill the search bar with.
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Search inline, one match at a time.
    #[command(alias = "i")]
    Inline {
        /// Query to pre-fill the search bar with.
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print a new shell session id.
    SessionId,
    /// Print shell integration code.
    Init { shell: Shell },
}

pub fn lib_main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing() {
        eprintln!("sqish: failed to initialize tracing: {err:#}");
        return ExitCode::FAILURE;
    }

    setup_panic_handler();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            display_user_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.subcommand {
        SubCommand::SessionId => {
            println!("{}", uuid::Uuid::new_v4());
            Ok(())
        }
        SubCommand::Init { shell } => {
            print!("{}", init_script(*shell));
            Ok(())
        }
        SubCommand::Add { words } => {
            let env = session_env(&cli.shell_session_id)?;
            let Some(record) = record_for(words, &env) else {
                debug!("ignoring empty command");
                return Ok(());
            };
            let (store, _) = open_store(&cli)?;
            store.add(&record).context("failed to add command")
        }
        SubCommand::Search { query } => {
            let (store, config) = open_store(&cli)?;
            search_fullscreen(store, &config, &cli.shell_session_id, query)
        }
        SubCommand::Inline { query } => {
            let (store, config) = open_store(&cli)?;
            search_inline(store, &config, &cli.shell_session_id, query)
        }
    }
}

fn open_store(cli: &Cli) -> Result<(SqliteStore, Config)> {
    let config = Config::from_file(CONFIG_FILE);
    config.validate()?;
    let path = config.database_path(cli.database.as_deref())?;
    debug!("opening history database {}", path.display());
    let store = SqliteStore::open(&path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    Ok((store, config))
}

/// The record `sqish add` stores, or `None` for a blank command line.
fn record_for(words: &[String], env: &SessionEnv) -> Option<Record> {
    let command = words.join(" ");
    let command = command.trim();
    if command.is_empty() {
        return None;
    }
    Some(Record::new(
        command,
        env.cwd.as_str(),
        env.hostname.as_str(),
        env.session_id.as_str(),
    ))
}

fn search_fullscreen(
    store: SqliteStore,
    config: &Config,
    session_id: &str,
    query: &str,
) -> Result<()> {
    ensure_terminal()?;
    let settings = store.load_settings().context("failed to load settings")?;
    let env = session_env(session_id)?;
    let mut state = SessionState::new(query, settings, env, config.query_limit());
    let pipeline = SearchPipeline::spawn(store.clone(), config.queue_capacity)?;

    let selected = {
        let _guard = TerminalGuard::alternate_screen()?;
        let events = spawn_input_pump(KeyEventInput::new())?;
        let mut frontend = FullscreenFrontend::new()?;
        run_session(&mut frontend, &events, &pipeline, &mut state)
    };
    pipeline.shutdown();
    let selected = selected?;

    // Settings are saved before the shell sees the selection.
    store
        .save_settings(state.settings())
        .context("failed to save settings")?;
    if let Some(record) = selected {
        emit_selection(&record)?;
    }
    Ok(())
}

fn search_inline(
    store: SqliteStore,
    config: &Config,
    session_id: &str,
    query: &str,
) -> Result<()> {
    ensure_terminal()?;
    let settings = store.load_settings().context("failed to load settings")?;
    let env = session_env(session_id)?;
    let mut state = SessionState::new(query, settings, env, config.query_limit());
    let pipeline = SearchPipeline::spawn(store.clone(), config.queue_capacity)?;

    let selected = {
        let _guard = TerminalGuard::raw()?;
        let events = spawn_input_pump(RawByteInput::new(io::stdin()))?;
        let mut frontend = InlineFrontend::new();
        let selected = run_session(&mut frontend, &events, &pipeline, &mut state);
        let finished = frontend.finish();
        let selected = selected?;
        finished?;
        selected
    };
    pipeline.shutdown();

    // The selection goes out first so a failed save can't lose it.
    if let Some(record) = selected {
        emit_selection(&record)?;
    }
    store
        .save_settings(state.settings())
        .context("failed to save settings")
}

/// Hand the selected command to the calling shell on stderr, without a
/// trailing newline.
fn emit_selection(record: &Record) -> Result<()> {
    info!("selected {:?}", record.command);
    let mut stderr = io::stderr().lock();
    stderr.write_all(record.command.as_bytes())?;
    stderr.flush()?;
    Ok(())
}

fn ensure_terminal() -> Result<()> {
    let stdin_is_tty = isatty(io::stdin().as_raw_fd()).unwrap_or(false);
    let stdout_is_tty = isatty(io::stdout().as_raw_fd()).unwrap_or(false);
    if !stdin_is_tty || !stdout_is_tty {
        bail!("search needs an interactive terminal");
    }
    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let log_path = environment::get_state_file(LOG_FILE)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Arc::new(log_file))
        .init();
    Ok(())
}

pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Attempt to restore terminal state first
        restore_terminal();

        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");

        let payload = panic_info.payload().downcast_ref::<&str>().map_or_else(
            || {
                if let Some(s) = panic_info.payload().downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic payload".to_string()
                }
            },
            |s| (*s).to_string(),
        );

        let location = panic_info.location().map_or_else(
            || "Unknown location".to_string(),
            |location| {
                format!(
                    "{}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                )
            },
        );

        let backtrace = std::backtrace::Backtrace::capture();
        error!(
            "panic in thread {thread_name} at {location} ({}): {payload}\n{backtrace}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC")
        );
        eprintln!("sqish: panicked at {location}: {payload}");
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> SessionEnv {
        SessionEnv::new("/home/user", "laptop", "s1")
    }

    #[test]
    fn test_record_for_joins_and_trims() {
        let words: Vec<String> = ["  git", "commit", "-m", "fix  "]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let record = record_for(&words, &env()).unwrap();
        assert_eq!(record.command, "git commit -m fix");
        assert_eq!(record.directory, "/home/user");
        assert_eq!(record.hostname, "laptop");
        assert_eq!(record.session_id, "s1");
    }

    #[test]
    fn test_record_for_blank_command() {
        assert!(record_for(&[], &env()).is_none());
        assert!(record_for(&["   ".to_string()], &env()).is_none());
    }

    #[test]
    fn test_cli_aliases_and_global_flags() {
        let cli =
            Cli::try_parse_from(["sqish", "s", "--query", "git", "-d", "/tmp/h.db"]).unwrap();
        assert_eq!(cli.database.as_deref(), Some("/tmp/h.db"));
        assert!(matches!(cli.subcommand, SubCommand::Search { ref query } if query == "git"));

        let cli = Cli::try_parse_from(["sqish", "i"]).unwrap();
        assert!(matches!(cli.subcommand, SubCommand::Inline { ref query } if query.is_empty()));
    }

    #[test]
    fn test_cli_add_keeps_hyphenated_words() {
        let cli = Cli::try_parse_from([
            "sqish",
            "--shell-session-id",
            "abc",
            "a",
            "--",
            "ls -la",
        ])
        .unwrap();
        assert_eq!(cli.shell_session_id, "abc");
        match cli.subcommand {
            SubCommand::Add { words } => assert_eq!(words, vec!["ls -la"]),
            other => panic!("unexpected subcommand {other:?}"),
        }

        let cli = Cli::try_parse_from(["sqish", "add", "rm", "-rf", "build"]).unwrap();
        match cli.subcommand {
            SubCommand::Add { words } => assert_eq!(words, vec!["rm", "-rf", "build"]),
            other => panic!("unexpected subcommand {other:?}"),
        }
    }

    #[test]
    fn test_cli_init_shell() {
        let cli = Cli::try_parse_from(["sqish", "init", "zsh"]).unwrap();
        assert!(matches!(cli.subcommand, SubCommand::Init { shell: Shell::Zsh }));
        assert!(Cli::try_parse_from(["sqish", "init", "fish"]).is_err());
    }
}
