//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted [`Contact`] record.
//! - Define the insert shape [`NewContact`] and the partial update descriptor
//!   [`ContactPatch`].
//! - Provide validation shared by every write path.
//!
//! # Invariants
//! - `name` is never empty after trimming.
//! - `email`, when present, contains `@`.
//! - `id` and `created_at` are assigned once by storage and never change.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned contact identifier (SQLite rowid).
pub type ContactId = i64;

/// Persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    /// Free-form phone as entered.
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Stored as INTEGER 0/1.
    pub favorite: bool,
    /// Unix epoch milliseconds, set at insertion.
    pub created_at: i64,
}

impl Contact {
    /// Returns the digits-only form of `phone`, or an empty string when absent.
    pub fn normalized_phone(&self) -> String {
        self.phone
            .as_deref()
            .map(crate::import::normalize_phone)
            .unwrap_or_default()
    }
}

/// Validation failures for contact writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyName,
    InvalidEmail(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name cannot be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email `{value}`: missing `@`"),
        }
    }
}

impl Error for ContactValidationError {}

/// Insert shape for a contact that has no id yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub favorite: bool,
}

impl NewContact {
    /// Creates a non-favorite contact with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// Validates the insert shape.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        validate_name(&self.name)?;
        validate_email(self.email.as_deref())
    }
}

/// Partial update descriptor.
///
/// Each field is either unset (`None`, column untouched) or set. For the
/// nullable columns the inner `Option` decides between a value and NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub favorite: Option<bool>,
}

impl ContactPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(Some(phone.into()));
        self
    }

    pub fn clear_phone(mut self) -> Self {
        self.phone = Some(None);
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(Some(email.into()));
        self
    }

    pub fn clear_email(mut self) -> Self {
        self.email = Some(None);
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.favorite.is_none()
    }

    /// Validates only the fields that are set.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email.as_deref())?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ContactValidationError> {
    if name.trim().is_empty() {
        return Err(ContactValidationError::EmptyName);
    }
    Ok(())
}

fn validate_email(email: Option<&str>) -> Result<(), ContactValidationError> {
    match email {
        Some(value) if !value.is_empty() && !value.contains('@') => {
            Err(ContactValidationError::InvalidEmail(value.to_string()))
        }
        _ => Ok(()),
    }
}

/// Maps empty strings to `None` so they are persisted as NULL.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ContactPatch, ContactValidationError, NewContact};

    #[test]
    fn new_contact_rejects_blank_name() {
        let err = NewContact::new("   ").validate().unwrap_err();
        assert_eq!(err, ContactValidationError::EmptyName);
    }

    #[test]
    fn new_contact_rejects_email_without_at_sign() {
        let err = NewContact::new("Anna")
            .with_email("anna.example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ContactValidationError::InvalidEmail(_)));
    }

    #[test]
    fn empty_email_counts_as_absent() {
        NewContact::new("Anna").with_email("").validate().unwrap();
    }

    #[test]
    fn patch_tracks_set_fields_only() {
        assert!(ContactPatch::new().is_empty());

        let patch = ContactPatch::new().favorite(true).clear_phone();
        assert!(!patch.is_empty());
        assert_eq!(patch.name, None);
        assert_eq!(patch.phone, Some(None));
        assert_eq!(patch.favorite, Some(true));
    }

    #[test]
    fn patch_validation_ignores_unset_name() {
        ContactPatch::new().favorite(false).validate().unwrap();
        let err = ContactPatch::new().name("").validate().unwrap_err();
        assert_eq!(err, ContactValidationError::EmptyName);
    }
}
