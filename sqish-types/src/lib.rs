use thiserror::Error;

pub mod query;
pub mod record;
pub mod settings;

pub use query::Query;
pub use record::Record;
pub use settings::Settings;

/// sqish specific error types
#[derive(Error, Debug)]
pub enum SqishError {
    /// The history store failed; the message carries the store's context chain.
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    #[error("search pipeline is closed")]
    PipelineClosed,

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type SqishResult<T> = std::result::Result<T, SqishError>;
