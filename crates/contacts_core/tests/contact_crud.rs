use contacts_core::db::open_db_in_memory;
use contacts_core::{
    Contact, ContactPatch, ContactRepository, ContactService, ContactValidationError, NewContact,
    RepoError, SqliteContactRepository,
};
use rusqlite::Connection;

fn service(conn: &Connection) -> ContactService<SqliteContactRepository<'_>> {
    ContactService::new(SqliteContactRepository::try_new(conn).unwrap())
}

fn ids(contacts: &[Contact]) -> Vec<i64> {
    contacts.iter().map(|contact| contact.id).collect()
}

#[test]
fn add_and_get_roundtrip_defaults_to_not_favorite() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let id = service
        .add_contact(
            &NewContact::new("Anna")
                .with_phone("090-123-4567")
                .with_email("anna@example.com"),
        )
        .unwrap();

    let loaded = service.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.name, "Anna");
    assert_eq!(loaded.phone.as_deref(), Some("090-123-4567"));
    assert_eq!(loaded.email.as_deref(), Some("anna@example.com"));
    assert!(!loaded.favorite);
    assert!(loaded.created_at > 0);
}

#[test]
fn add_stores_empty_optional_fields_as_null() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let id = service
        .add_contact(&NewContact::new("Ben").with_phone("").with_email(""))
        .unwrap();

    let (phone, email): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT phone, email FROM contacts WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(phone, None);
    assert_eq!(email, None);
}

#[test]
fn add_rejects_invalid_input_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.add_contact(&NewContact::new(" ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ContactValidationError::EmptyName)
    ));

    let err = service
        .add_contact(&NewContact::new("Anna").with_email("nope"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ContactValidationError::InvalidEmail(_))
    ));
    assert_eq!(service.count().unwrap(), 0);
}

#[test]
fn get_by_missing_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    assert!(service(&conn).get_by_id(42).unwrap().is_none());
}

#[test]
fn get_all_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    assert!(service(&conn).get_all().unwrap().is_empty());
}

#[test]
fn get_all_orders_by_created_at_descending() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = service.add_contact(&NewContact::new("First")).unwrap();
    let second = service.add_contact(&NewContact::new("Second")).unwrap();
    let third = service.add_contact(&NewContact::new("Third")).unwrap();
    assert_eq!(ids(&service.get_all().unwrap()), vec![third, second, first]);

    conn.execute(
        "UPDATE contacts SET created_at = 9999999999999 WHERE id = ?1",
        [first],
    )
    .unwrap();
    assert_eq!(ids(&service.get_all().unwrap()), vec![first, third, second]);
}

#[test]
fn update_with_only_favorite_changes_nothing_else() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let id = service
        .add_contact(
            &NewContact::new("Anna")
                .with_phone("111")
                .with_email("anna@example.com"),
        )
        .unwrap();
    let before = service.get_by_id(id).unwrap().unwrap();

    service
        .update(id, &ContactPatch::new().favorite(true))
        .unwrap();

    let after = service.get_by_id(id).unwrap().unwrap();
    assert!(after.favorite);
    assert_eq!(
        after,
        Contact {
            favorite: true,
            ..before
        }
    );
}

#[test]
fn update_applies_set_fields_and_can_clear_nullable_columns() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let id = service
        .add_contact(
            &NewContact::new("Anna")
                .with_phone("111")
                .with_email("anna@example.com"),
        )
        .unwrap();

    service
        .update(id, &ContactPatch::new().name("Anna B").clear_phone())
        .unwrap();

    let loaded = service.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Anna B");
    assert_eq!(loaded.phone, None);
    assert_eq!(loaded.email.as_deref(), Some("anna@example.com"));
}

#[test]
fn empty_patch_and_unknown_id_are_silent_noops() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let id = service.add_contact(&NewContact::new("Anna")).unwrap();
    let before = service.get_by_id(id).unwrap().unwrap();

    service.update(id, &ContactPatch::new()).unwrap();
    service
        .update(id + 100, &ContactPatch::new().name("Ghost"))
        .unwrap();

    assert_eq!(service.get_by_id(id).unwrap().unwrap(), before);
    assert_eq!(service.count().unwrap(), 1);
}

#[test]
fn update_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let id = service.add_contact(&NewContact::new("Anna")).unwrap();
    let err = service
        .update(id, &ContactPatch::new().name(""))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn repository_reports_whether_rows_matched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();

    let id = repo.create_contact(&NewContact::new("Anna"), 1).unwrap();
    assert!(repo
        .update_contact(id, &ContactPatch::new().favorite(true))
        .unwrap());
    assert!(!repo
        .update_contact(id + 1, &ContactPatch::new().favorite(true))
        .unwrap());
    assert!(repo.delete_contact(id).unwrap());
    assert!(!repo.delete_contact(id).unwrap());
}

#[test]
fn delete_removes_contact_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let keep = service.add_contact(&NewContact::new("Keep")).unwrap();
    let gone = service.add_contact(&NewContact::new("Gone")).unwrap();

    service.delete(gone).unwrap();
    service.delete(gone).unwrap();

    assert!(service.get_by_id(gone).unwrap().is_none());
    assert_eq!(ids(&service.get_all().unwrap()), vec![keep]);
}

#[test]
fn favorites_are_the_flagged_subset_in_same_order() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let a = service
        .add_contact(&NewContact::new("A").with_favorite(true))
        .unwrap();
    service.add_contact(&NewContact::new("B")).unwrap();
    let c = service
        .add_contact(&NewContact::new("C").with_favorite(true))
        .unwrap();
    service.add_contact(&NewContact::new("D")).unwrap();

    let expected: Vec<i64> = service
        .get_all()
        .unwrap()
        .into_iter()
        .filter(|contact| contact.favorite)
        .map(|contact| contact.id)
        .collect();
    assert_eq!(expected, vec![c, a]);
    assert_eq!(ids(&service.get_favorites().unwrap()), expected);
}

#[test]
fn toggle_favorite_flips_flag_and_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let id = service.add_contact(&NewContact::new("Anna")).unwrap();
    assert_eq!(service.toggle_favorite(id).unwrap(), Some(true));
    assert!(service.get_by_id(id).unwrap().unwrap().favorite);
    assert_eq!(service.toggle_favorite(id).unwrap(), Some(false));
    assert_eq!(service.toggle_favorite(id + 1).unwrap(), None);
}

#[test]
fn seed_inserts_samples_only_into_empty_store() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    assert_eq!(service.seed_sample_contacts().unwrap(), 3);
    assert_eq!(service.seed_sample_contacts().unwrap(), 0);

    let contacts = service.get_all().unwrap();
    assert_eq!(contacts.len(), 3);
    assert!(contacts.iter().all(|contact| !contact.favorite));
    assert!(contacts
        .iter()
        .any(|contact| contact.phone.as_deref() == Some("0901234567")));
}

#[test]
fn seed_skips_store_with_existing_contacts() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.add_contact(&NewContact::new("Mine")).unwrap();
    assert_eq!(service.seed_sample_contacts().unwrap(), 0);
    assert_eq!(service.count().unwrap(), 1);
}

#[test]
fn invalid_persisted_favorite_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO contacts (name, favorite, created_at) VALUES ('Odd', 7, 1)",
        [],
    )
    .unwrap();

    let err = service(&conn).get_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(err.user_message(), "Unable to save contact. Please try again.");
}
