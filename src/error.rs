use std::path::PathBuf;

use thiserror::Error;

/// Failures that make the club database unusable. Everything else from the
/// persistence layer travels as a plain `anyhow::Error` with context; this
/// type exists so the shell can tell a dead store apart and shut down.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not open the club database at {}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("could not create the data directory {}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Look for a `StoreError` anywhere in an `anyhow` chain.
    pub fn find(err: &anyhow::Error) -> Option<&StoreError> {
        err.chain().find_map(|cause| cause.downcast_ref::<StoreError>())
    }
}
