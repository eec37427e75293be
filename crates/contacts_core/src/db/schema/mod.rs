//! Contacts schema definition and idempotent bootstrap.
//!
//! # Responsibility
//! - Own the single `contacts` table DDL.
//! - Create it when missing and stamp `PRAGMA user_version`.
//!
//! # Invariants
//! - DDL only uses `IF NOT EXISTS`, so bootstrap is safe on every startup.
//! - A database stamped with a newer version than [`SCHEMA_VERSION`] is rejected
//!   instead of being read with a schema this binary does not know.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version written to `PRAGMA user_version` after bootstrap.
pub const SCHEMA_VERSION: u32 = 1;

const CONTACTS_DDL: &str = include_str!("0001_contacts.sql");

/// Columns every usable `contacts` table must expose.
pub const CONTACTS_COLUMNS: &[&str] = &["id", "name", "phone", "email", "favorite", "created_at"];

/// Creates the contacts schema if needed.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    if current_version > SCHEMA_VERSION {
        return Err(DbError::NewerSchema {
            found: current_version,
            supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction()?;
    tx.execute_batch(CONTACTS_DDL)?;
    if current_version < SCHEMA_VERSION {
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    tx.commit()?;

    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
