//! Core domain logic for the contacts app.
//! Local SQLite storage, remote import with phone dedup, and list filtering.

pub mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::CoreConfig;
pub use import::{
    import_contacts, normalize_phone, EmptyPhonePolicy, HttpContactSource, ImportError,
    ImportReport, ImportResult, RemoteContact, RemoteContactSource,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{Contact, ContactId, ContactPatch, ContactValidationError, NewContact};
pub use repo::contact_repo::{
    ContactListQuery, ContactRepository, RepoError, RepoResult, SqliteContactRepository,
};
pub use service::contact_service::ContactService;
pub use view::filter::{ContactFilter, ContactListView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
