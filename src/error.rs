//! Error type shared by the translator, the table persistence and the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a caller's input and a solution.
#[derive(Error, Debug)]
pub enum SolveError {
    /// The facelet string does not have exactly 24 tiles.
    #[error("cube string must have 24 tiles, found {found}")]
    WrongLength { found: usize },

    /// The tiles do not use six labels four times each in a layout that
    /// identifies every face.
    #[error("cube string is not consistently colored")]
    InconsistentColoring,

    /// A corner's three tiles do not form one of the eight real corners, or
    /// two slots claim the same corner.
    #[error("corner slot {slot} does not hold a valid corner")]
    InvalidCorner { slot: usize },

    /// The corner twists do not cancel out, so no sequence of turns solves it.
    #[error("corner twists do not sum to zero; the cube cannot be solved")]
    TwistedCorner,

    /// A move token is not a face letter followed by 1, 2 or 3.
    #[error("unknown move `{token}`")]
    UnknownMove { token: String },

    /// The persisted table could not be opened.
    #[error("table file {} is unavailable: {source}", path.display())]
    PersistenceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted table has the wrong length, e.g. from an interrupted
    /// write.
    #[error("table file {} has {found} bytes, expected {expected}", path.display())]
    TableSizeMismatch {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    /// The persisted table has the right length but cannot be trusted.
    #[error("table file {} is corrupt: {reason}", path.display())]
    CorruptPersistedTable { path: PathBuf, reason: String },

    /// Writing the table failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
