//! Favorites/search filtering for contact lists.
//!
//! # Invariants
//! - Filtering never mutates or reorders the source list.
//! - Name matching is case-insensitive; phone matching is a raw substring
//!   check on the trimmed search text.
//! - Favorites-only and search compose with logical AND.

use crate::model::contact::Contact;

/// Filter criteria for a contact list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub favorites_only: bool,
    pub search_text: String,
}

impl ContactFilter {
    pub fn new(favorites_only: bool, search_text: impl Into<String>) -> Self {
        Self {
            favorites_only,
            search_text: search_text.into(),
        }
    }

    /// Returns whether `contact` passes both criteria.
    pub fn matches(&self, contact: &Contact) -> bool {
        if self.favorites_only && !contact.favorite {
            return false;
        }

        let needle = self.search_text.trim();
        if needle.is_empty() {
            return true;
        }

        contact.name.to_lowercase().contains(&needle.to_lowercase())
            || contact
                .phone
                .as_deref()
                .is_some_and(|phone| phone.contains(needle))
    }

    /// Returns the visible subset in source order.
    pub fn apply<'a>(&self, contacts: &'a [Contact]) -> Vec<&'a Contact> {
        contacts
            .iter()
            .filter(|contact| self.matches(contact))
            .collect()
    }
}

/// Contact list with a cached filtered projection.
///
/// The visible subset is recomputed whenever the contacts or either filter
/// criterion change.
#[derive(Debug, Clone, Default)]
pub struct ContactListView {
    contacts: Vec<Contact>,
    filter: ContactFilter,
    visible: Vec<usize>,
}

impl ContactListView {
    pub fn new(contacts: Vec<Contact>) -> Self {
        let mut view = Self {
            contacts,
            ..Self::default()
        };
        view.recompute();
        view
    }

    pub fn set_contacts(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
        self.recompute();
    }

    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        self.filter.search_text = search_text.into();
        self.recompute();
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.filter.favorites_only = favorites_only;
        self.recompute();
    }

    pub fn filter(&self) -> &ContactFilter {
        &self.filter
    }

    /// All loaded contacts, unfiltered.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn visible(&self) -> impl Iterator<Item = &Contact> + '_ {
        self.visible.iter().map(|&index| &self.contacts[index])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    fn recompute(&mut self) {
        self.visible = self
            .contacts
            .iter()
            .enumerate()
            .filter(|(_, contact)| self.filter.matches(contact))
            .map(|(index, _)| index)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactFilter, ContactListView};
    use crate::model::contact::Contact;

    fn contact(id: i64, name: &str, phone: Option<&str>, favorite: bool) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            phone: phone.map(str::to_string),
            email: None,
            favorite,
            created_at: 0,
        }
    }

    fn sample() -> Vec<Contact> {
        vec![
            contact(1, "Anna", Some("111"), true),
            contact(2, "Ben", Some("222"), false),
        ]
    }

    fn names(contacts: &[&Contact]) -> Vec<String> {
        contacts.iter().map(|contact| contact.name.clone()).collect()
    }

    #[test]
    fn favorites_only_keeps_flagged_contacts() {
        let contacts = sample();
        let visible = ContactFilter::new(true, "").apply(&contacts);
        assert_eq!(names(&visible), vec!["Anna"]);
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let contacts = sample();
        let visible = ContactFilter::new(false, "an").apply(&contacts);
        assert_eq!(names(&visible), vec!["Anna"]);

        let visible = ContactFilter::new(false, "  BEN ").apply(&contacts);
        assert_eq!(names(&visible), vec!["Ben"]);
    }

    #[test]
    fn search_matches_raw_phone_substring() {
        let contacts = vec![
            contact(1, "Anna", Some("090-123"), false),
            contact(2, "Ben", Some("090123"), false),
            contact(3, "Carl", None, false),
        ];
        let visible = ContactFilter::new(false, " 0901 ").apply(&contacts);
        assert_eq!(names(&visible), vec!["Ben"]);
    }

    #[test]
    fn blank_search_keeps_everything() {
        let contacts = sample();
        assert_eq!(ContactFilter::new(false, "   ").apply(&contacts).len(), 2);
    }

    #[test]
    fn criteria_compose_with_and() {
        let contacts = sample();
        assert!(ContactFilter::new(true, "ben").apply(&contacts).is_empty());
        assert_eq!(ContactFilter::new(true, "11").apply(&contacts).len(), 1);
    }

    #[test]
    fn list_view_recomputes_on_every_change() {
        let mut view = ContactListView::new(sample());
        assert_eq!(view.visible_len(), 2);

        view.set_favorites_only(true);
        assert_eq!(view.visible().map(|c| c.id).collect::<Vec<_>>(), vec![1]);

        view.set_favorites_only(false);
        view.set_search_text("222");
        assert_eq!(view.visible().map(|c| c.id).collect::<Vec<_>>(), vec![2]);

        view.set_contacts(vec![contact(3, "Bob", Some("2223"), false)]);
        assert_eq!(view.visible().map(|c| c.id).collect::<Vec<_>>(), vec![3]);
        assert_eq!(view.contacts().len(), 1);
    }
}
