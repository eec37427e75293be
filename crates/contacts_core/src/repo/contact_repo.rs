//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the single `contacts` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate before any SQL mutation.
//! - Partial updates touch only set columns, in one statement.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List order is `created_at DESC, id DESC`.

use crate::db::schema::{current_user_version, CONTACTS_COLUMNS, SCHEMA_VERSION};
use crate::db::DbError;
use crate::model::contact::{
    non_empty, Contact, ContactId, ContactPatch, ContactValidationError, NewContact,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone,
    email,
    favorite,
    created_at
FROM contacts";

const CONTACT_ORDER_SQL: &str = " ORDER BY created_at DESC, id DESC";

const STORAGE_RETRY_MESSAGE: &str = "Unable to save contact. Please try again.";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Generic retry text suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        STORAGE_RETRY_MESSAGE
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; open it via db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing contacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactListQuery {
    pub favorites_only: bool,
}

impl ContactListQuery {
    pub fn favorites() -> Self {
        Self {
            favorites_only: true,
        }
    }
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    /// Inserts a contact stamped with `created_at` and returns the new id.
    fn create_contact(&self, contact: &NewContact, created_at: i64) -> RepoResult<ContactId>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>>;
    /// Applies set fields only. Returns whether a row matched `id`.
    fn update_contact(&self, id: ContactId, patch: &ContactPatch) -> RepoResult<bool>;
    /// Returns whether a row was removed.
    fn delete_contact(&self, id: ContactId) -> RepoResult<bool>;
    fn count_contacts(&self) -> RepoResult<usize>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Wraps a connection after checking that its schema was bootstrapped.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is behind this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the table shape
    ///   does not match.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        if actual_version < SCHEMA_VERSION {
            return Err(RepoError::UninitializedConnection {
                expected_version: SCHEMA_VERSION,
                actual_version,
            });
        }

        let columns = table_columns(conn, "contacts")?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable("contacts"));
        }
        for required in CONTACTS_COLUMNS {
            if !columns.iter().any(|column| column == required) {
                return Err(RepoError::MissingRequiredColumn {
                    table: "contacts",
                    column: required,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: &NewContact, created_at: i64) -> RepoResult<ContactId> {
        contact.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (name, phone, email, favorite, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                contact.name.as_str(),
                non_empty(contact.phone.as_deref()),
                non_empty(contact.email.as_deref()),
                bool_to_int(contact.favorite),
                created_at,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        let mut sql = String::from(CONTACT_SELECT_SQL);
        if query.favorites_only {
            sql.push_str(" WHERE favorite = 1");
        }
        sql.push_str(CONTACT_ORDER_SQL);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }

    fn update_contact(&self, id: ContactId, patch: &ContactPatch) -> RepoResult<bool> {
        if patch.is_empty() {
            return Ok(false);
        }
        patch.validate()?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &patch.name {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(phone) = &patch.phone {
            assignments.push("phone = ?");
            bind_values.push(optional_text(phone.as_deref()));
        }
        if let Some(email) = &patch.email {
            assignments.push("email = ?");
            bind_values.push(optional_text(email.as_deref()));
        }
        if let Some(favorite) = patch.favorite {
            assignments.push("favorite = ?");
            bind_values.push(Value::Integer(bool_to_int(favorite)));
        }
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE contacts SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        Ok(changed > 0)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn count_contacts(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("invalid contact count `{count}`")))
    }
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let exists = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    if exists.is_none() {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: ContactId = row.get("id")?;

    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty name in contacts.name for id {id}"
        )));
    }

    let favorite = match row.get::<_, Option<i64>>("favorite")? {
        None | Some(0) => false,
        Some(1) => true,
        Some(other) => {
            return Err(RepoError::InvalidData(format!(
                "invalid favorite value `{other}` in contacts.favorite for id {id}"
            )));
        }
    };

    Ok(Contact {
        id,
        name,
        phone: row.get("phone")?,
        email: row.get("email")?,
        favorite,
        created_at: row.get::<_, Option<i64>>("created_at")?.unwrap_or_default(),
    })
}

fn optional_text(value: Option<&str>) -> Value {
    match non_empty(value) {
        Some(text) => Value::Text(text.to_string()),
        None => Value::Null,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
