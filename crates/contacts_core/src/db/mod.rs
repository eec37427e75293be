//! SQLite storage bootstrap for the contacts table.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the contacts core.
//! - Create the `contacts` schema before any data access happens.
//!
//! # Invariants
//! - Schema creation is idempotent and runs on every open.
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write contacts before bootstrap succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or bootstrapping the contacts database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open `target` (a file path or `:memory:`).
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Statement failure during bootstrap.
    Sqlite(rusqlite::Error),
    /// The file was stamped by a build with a newer contacts schema.
    NewerSchema { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open contacts database `{target}`: {source}")
            }
            Self::Sqlite(err) => write!(f, "contacts database error: {err}"),
            Self::NewerSchema { found, supported } => write!(
                f,
                "contacts schema v{found} was written by a newer build; this build supports up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::NewerSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
