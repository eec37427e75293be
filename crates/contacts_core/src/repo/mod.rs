//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the contact data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate input before persistence.
//! - Missing ids are reported as `Ok(None)` / `Ok(false)`, never as errors.

pub mod contact_repo;
