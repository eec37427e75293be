//! One-shot import of a remote contact list into local storage.
//!
//! # Responsibility
//! - Fetch the remote list through a [`RemoteContactSource`].
//! - Drop records whose normalized phone already exists locally.
//! - Insert the rest sequentially through [`ContactService`].
//!
//! # Invariants
//! - Fetch or decode failures abort before any insert.
//! - Inserts are not wrapped in a transaction; a failing insert stops the run
//!   and earlier inserts remain.
//! - Records with an empty name are never inserted and are not counted as
//!   duplicates.

mod dedup;
pub mod source;

pub use dedup::{normalize_phone, plan_import, EmptyPhonePolicy, ImportCandidate, ImportPlan};
pub use source::{
    parse_remote_contacts, HttpContactSource, RemoteContact, RemoteContactSource,
    DEFAULT_IMPORT_URL,
};

use crate::model::contact::NewContact;
use crate::repo::contact_repo::{ContactRepository, RepoError};
use crate::service::contact_service::ContactService;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const IMPORT_RETRY_MESSAGE: &str = "Unable to import contacts. Please try again.";

pub type ImportResult<T> = Result<T, ImportError>;

/// Import failure.
#[derive(Debug)]
pub enum ImportError {
    /// Transport-level failure (DNS, connect, TLS, read).
    Network(String),
    /// Server answered with a non-success status.
    HttpStatus(u16),
    /// Body was not a JSON array of contact objects.
    Parse(String),
    /// Local insert failed mid-run.
    Storage(RepoError),
}

impl ImportError {
    /// Text for end users: the underlying message when there is one, otherwise
    /// a generic retry prompt.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(message) | Self::Parse(message) if !message.trim().is_empty() => {
                message.clone()
            }
            Self::HttpStatus(_) => self.to_string(),
            _ => IMPORT_RETRY_MESSAGE.to_string(),
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::HttpStatus(code) => write!(f, "HTTP error! status: {code}"),
            Self::Parse(message) => write!(f, "invalid import payload: {message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Outcome counters of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records returned by the source.
    pub fetched: usize,
    pub inserted: usize,
    /// Records skipped because their dedup key already exists.
    pub skipped_duplicates: usize,
    /// Accepted records dropped for having no name.
    pub skipped_unnamed: usize,
}

/// Runs one import from `source` into the store behind `service`.
pub fn import_contacts<R, S>(
    service: &ContactService<R>,
    source: &S,
    policy: EmptyPhonePolicy,
) -> ImportResult<ImportReport>
where
    R: ContactRepository,
    S: RemoteContactSource + ?Sized,
{
    let started_at = Instant::now();
    info!("event=contact_import module=import status=start policy={policy:?}");

    let result = run_import(service, source, policy);
    match &result {
        Ok(report) => info!(
            "event=contact_import module=import status=ok duration_ms={} fetched={} inserted={} skipped_duplicates={} skipped_unnamed={}",
            started_at.elapsed().as_millis(),
            report.fetched,
            report.inserted,
            report.skipped_duplicates,
            report.skipped_unnamed
        ),
        Err(err) => error!(
            "event=contact_import module=import status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn run_import<R, S>(
    service: &ContactService<R>,
    source: &S,
    policy: EmptyPhonePolicy,
) -> ImportResult<ImportReport>
where
    R: ContactRepository,
    S: RemoteContactSource + ?Sized,
{
    let incoming = source.fetch()?;
    let fetched = incoming.len();

    let existing = service.get_all()?;
    let plan = plan_import(incoming, &existing, policy);

    let mut report = ImportReport {
        fetched,
        skipped_duplicates: plan.skipped_duplicates,
        ..ImportReport::default()
    };

    for candidate in plan.accepted {
        if candidate.name.trim().is_empty() {
            report.skipped_unnamed += 1;
            continue;
        }

        service.add_contact(&to_new_contact(candidate))?;
        report.inserted += 1;
    }

    Ok(report)
}

fn to_new_contact(candidate: ImportCandidate) -> NewContact {
    let email = if candidate.email.is_empty() {
        None
    } else if candidate.email.contains('@') {
        Some(candidate.email)
    } else {
        warn!("event=contact_import module=import status=warn reason=invalid_email action=dropped");
        None
    };

    NewContact {
        name: candidate.name,
        phone: (!candidate.phone.is_empty()).then_some(candidate.phone),
        email,
        favorite: false,
    }
}
