use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading content pools.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to read pools file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pools definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("pool '{0}' has no entries")]
    Empty(&'static str),

    #[error("no built-in pools for language '{0}'")]
    UnknownLanguage(String),
}
