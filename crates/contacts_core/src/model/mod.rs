//! Domain model for stored contacts.
//!
//! # Responsibility
//! - Define the canonical contact record and its write-side shapes.
//!
//! # Invariants
//! - Every persisted contact is identified by a storage-assigned `ContactId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod contact;
