//! Contact use-case service.
//!
//! # Responsibility
//! - Expose the contact operations consumed by front ends: add, list, get,
//!   update, delete, favorites, toggle and sample seeding.
//! - Stamp `created_at` on insert.
//!
//! # Invariants
//! - Unknown ids on update/delete are silent no-ops.
//! - Service APIs never bypass repository validation.
//! - Only metadata (ids, counts) is logged, never contact fields.

use crate::model::contact::{Contact, ContactId, ContactPatch, NewContact};
use crate::repo::contact_repo::{ContactListQuery, ContactRepository, RepoResult};
use log::{debug, info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

const SAMPLE_CONTACTS: &[(&str, &str)] = &[
    ("Nguyễn Văn A", "0901234567"),
    ("Trần Thị B", "0987654321"),
    ("Lê Văn C", "0912345678"),
];

/// Use-case service wrapper for contact operations.
///
/// Built explicitly from an initialized repository; there is no ambient
/// global handle.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts a contact stamped with the current time and returns its id.
    pub fn add_contact(&self, contact: &NewContact) -> RepoResult<ContactId> {
        let id = self.repo.create_contact(contact, now_epoch_ms())?;
        info!("event=contact_add module=service status=ok contact_id={id}");
        Ok(id)
    }

    /// Returns all contacts, newest first.
    pub fn get_all(&self) -> RepoResult<Vec<Contact>> {
        self.repo.list_contacts(&ContactListQuery::default())
    }

    /// Returns the contact with `id`, or `None` when it does not exist.
    pub fn get_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.repo.get_contact(id)
    }

    /// Returns favorite contacts in the same order as [`Self::get_all`].
    pub fn get_favorites(&self) -> RepoResult<Vec<Contact>> {
        self.repo.list_contacts(&ContactListQuery::favorites())
    }

    /// Applies a partial update. Empty patches and unknown ids do nothing.
    pub fn update(&self, id: ContactId, patch: &ContactPatch) -> RepoResult<()> {
        if patch.is_empty() {
            debug!("event=contact_update module=service status=noop reason=empty_patch contact_id={id}");
            return Ok(());
        }

        if self.repo.update_contact(id, patch)? {
            info!("event=contact_update module=service status=ok contact_id={id}");
        } else {
            debug!("event=contact_update module=service status=noop reason=not_found contact_id={id}");
        }
        Ok(())
    }

    /// Deletes a contact. Unknown ids do nothing.
    pub fn delete(&self, id: ContactId) -> RepoResult<()> {
        if self.repo.delete_contact(id)? {
            info!("event=contact_delete module=service status=ok contact_id={id}");
        } else {
            debug!("event=contact_delete module=service status=noop reason=not_found contact_id={id}");
        }
        Ok(())
    }

    /// Flips the favorite flag and returns the new value.
    ///
    /// Returns `None` when the contact does not exist.
    pub fn toggle_favorite(&self, id: ContactId) -> RepoResult<Option<bool>> {
        let Some(contact) = self.repo.get_contact(id)? else {
            return Ok(None);
        };

        let favorite = !contact.favorite;
        self.repo
            .update_contact(id, &ContactPatch::new().favorite(favorite))?;
        info!("event=contact_favorite module=service status=ok contact_id={id} favorite={favorite}");
        Ok(Some(favorite))
    }

    /// Number of stored contacts.
    pub fn count(&self) -> RepoResult<usize> {
        self.repo.count_contacts()
    }

    /// Inserts the built-in sample contacts when the table is empty.
    ///
    /// Returns the number of inserted rows (zero when data already exists).
    pub fn seed_sample_contacts(&self) -> RepoResult<usize> {
        if self.repo.count_contacts()? > 0 {
            debug!("event=contact_seed module=service status=skip reason=not_empty");
            return Ok(0);
        }

        let created_at = now_epoch_ms();
        for (name, phone) in SAMPLE_CONTACTS {
            let contact = NewContact::new(*name).with_phone(*phone);
            self.repo.create_contact(&contact, created_at)?;
        }

        info!(
            "event=contact_seed module=service status=ok inserted={}",
            SAMPLE_CONTACTS.len()
        );
        Ok(SAMPLE_CONTACTS.len())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        Err(_) => {
            warn!("event=clock_read module=service status=error reason=before_unix_epoch");
            0
        }
    }
}
