//! Phone normalization and duplicate partitioning for imports.
//!
//! # Invariants
//! - The dedup key is the digits-only phone; name and email are ignored unless
//!   [`EmptyPhonePolicy::MatchByName`] applies to a phoneless record.
//! - Only existing contacts seed the duplicate set; incoming records never
//!   shadow each other by phone.

use crate::model::contact::Contact;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::source::RemoteContact;

static NON_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]+").expect("valid non-digit regex"));

/// How the import treats records whose normalized phone is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyPhonePolicy {
    /// Phoneless records are never duplicates.
    #[default]
    Permissive,
    /// A phoneless record is a duplicate when a phoneless contact with the same
    /// case-insensitive trimmed name already exists, or was accepted earlier in
    /// the same batch.
    MatchByName,
}

/// Incoming record after mapping: name and email default to empty strings,
/// phone is digits-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCandidate {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl From<RemoteContact> for ImportCandidate {
    fn from(value: RemoteContact) -> Self {
        Self {
            name: value.name.unwrap_or_default(),
            phone: value.phone.as_deref().map(normalize_phone).unwrap_or_default(),
            email: value.email.unwrap_or_default(),
        }
    }
}

/// Result of partitioning incoming records against existing contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub accepted: Vec<ImportCandidate>,
    pub skipped_duplicates: usize,
}

/// Strips every character that is not an ASCII digit.
pub fn normalize_phone(phone: &str) -> String {
    NON_DIGIT_RE.replace_all(phone, "").into_owned()
}

/// Splits `incoming` into records to insert and a duplicate count.
pub fn plan_import(
    incoming: Vec<RemoteContact>,
    existing: &[Contact],
    policy: EmptyPhonePolicy,
) -> ImportPlan {
    let existing_phones: HashSet<String> = existing
        .iter()
        .map(Contact::normalized_phone)
        .filter(|phone| !phone.is_empty())
        .collect();

    let mut phoneless_names: HashSet<String> = match policy {
        EmptyPhonePolicy::Permissive => HashSet::new(),
        EmptyPhonePolicy::MatchByName => existing
            .iter()
            .filter(|contact| contact.normalized_phone().is_empty())
            .map(|contact| name_key(&contact.name))
            .collect(),
    };

    let mut plan = ImportPlan::default();
    for candidate in incoming.into_iter().map(ImportCandidate::from) {
        let duplicate = if candidate.phone.is_empty() {
            match policy {
                EmptyPhonePolicy::Permissive => false,
                EmptyPhonePolicy::MatchByName => {
                    let key = name_key(&candidate.name);
                    !key.is_empty() && !phoneless_names.insert(key)
                }
            }
        } else {
            existing_phones.contains(&candidate.phone)
        };

        if duplicate {
            plan.skipped_duplicates += 1;
        } else {
            plan.accepted.push(candidate);
        }
    }

    plan
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_phone, plan_import, EmptyPhonePolicy};
    use crate::import::source::RemoteContact;
    use crate::model::contact::Contact;

    fn existing(id: i64, name: &str, phone: Option<&str>) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            phone: phone.map(str::to_string),
            email: None,
            favorite: false,
            created_at: 0,
        }
    }

    fn remote(name: &str, phone: Option<&str>) -> RemoteContact {
        RemoteContact {
            name: Some(name.to_string()),
            phone: phone.map(str::to_string),
            email: None,
        }
    }

    #[test]
    fn normalize_phone_keeps_ascii_digits_only() {
        assert_eq!(normalize_phone("090-123-4567"), "0901234567");
        assert_eq!(normalize_phone("+84 (90) 123.45"), "849012345");
        assert_eq!(normalize_phone("n/a"), "");
        assert_eq!(normalize_phone("٠١٢"), "");
    }

    #[test]
    fn formatted_phone_matches_existing_digits() {
        let plan = plan_import(
            vec![remote("Anna", Some("090-123-4567"))],
            &[existing(1, "A", Some("0901234567"))],
            EmptyPhonePolicy::Permissive,
        );
        assert!(plan.accepted.is_empty());
        assert_eq!(plan.skipped_duplicates, 1);
    }

    #[test]
    fn existing_formatted_phone_is_normalized_too() {
        let plan = plan_import(
            vec![remote("Anna", Some("0901234567"))],
            &[existing(1, "A", Some("(090) 123 4567"))],
            EmptyPhonePolicy::Permissive,
        );
        assert_eq!(plan.skipped_duplicates, 1);
    }

    #[test]
    fn permissive_policy_accepts_every_phoneless_record() {
        let plan = plan_import(
            vec![remote("Anna", None), remote("Anna", Some("---"))],
            &[existing(1, "Anna", None)],
            EmptyPhonePolicy::Permissive,
        );
        assert_eq!(plan.accepted.len(), 2);
        assert_eq!(plan.skipped_duplicates, 0);
        assert!(plan.accepted.iter().all(|candidate| candidate.phone.is_empty()));
    }

    #[test]
    fn match_by_name_policy_skips_phoneless_name_repeats() {
        let plan = plan_import(
            vec![
                remote(" anna ", None),
                remote("Ben", None),
                remote("BEN", None),
                remote("Carl", Some("333")),
            ],
            &[existing(1, "Anna", None)],
            EmptyPhonePolicy::MatchByName,
        );
        let names: Vec<_> = plan
            .accepted
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ben", "Carl"]);
        assert_eq!(plan.skipped_duplicates, 2);
    }

    #[test]
    fn incoming_records_do_not_dedup_each_other_by_phone() {
        let plan = plan_import(
            vec![remote("Anna", Some("111")), remote("Ann", Some("1-1-1"))],
            &[],
            EmptyPhonePolicy::Permissive,
        );
        assert_eq!(plan.accepted.len(), 2);
    }
}
