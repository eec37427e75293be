//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations front ends depend on.
//! - Keep front ends decoupled from storage details.

pub mod contact_service;
