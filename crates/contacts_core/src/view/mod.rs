//! Derived, in-memory views over loaded contacts.

pub mod filter;
