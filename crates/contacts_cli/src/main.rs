//! Command-line front end for the contacts core.
//!
//! # Responsibility
//! - Compose config, logging, storage and services explicitly at startup.
//! - Map each subcommand onto one core operation and print the outcome.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use contacts_core::db::open_db;
use contacts_core::{
    import_contacts, init_logging, Contact, ContactFilter, ContactId, ContactPatch,
    ContactService, CoreConfig, EmptyPhonePolicy, HttpContactSource, NewContact,
    SqliteContactRepository,
};
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "contacts", version, about = "Manage a local contact list")]
struct Cli {
    /// SQLite database file (overrides CONTACTS_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List contacts, newest first.
    List {
        #[arg(long)]
        favorites: bool,
        /// Case-insensitive name or raw phone substring.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one contact.
    Show { id: ContactId },
    /// Add a contact.
    Add(AddArgs),
    /// Change selected fields of a contact.
    Update(UpdateArgs),
    /// Toggle the favorite flag.
    Favorite { id: ContactId },
    /// Delete a contact.
    Delete { id: ContactId },
    /// Insert sample contacts into an empty database.
    Seed,
    /// Import contacts from the remote endpoint, skipping known phones.
    Import {
        /// Endpoint URL (overrides CONTACTS_IMPORT_URL).
        #[arg(long)]
        url: Option<String>,
        /// Treat phoneless records with a known name as duplicates.
        #[arg(long)]
        match_empty_phone_by_name: bool,
    },
}

#[derive(Debug, Args)]
struct AddArgs {
    name: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    favorite: bool,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: ContactId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long, conflicts_with = "clear_phone")]
    phone: Option<String>,
    #[arg(long, conflicts_with = "clear_email")]
    email: Option<String>,
    #[arg(long)]
    clear_phone: bool,
    #[arg(long)]
    clear_email: bool,
    #[arg(long)]
    favorite: Option<bool>,
}

impl UpdateArgs {
    fn to_patch(&self) -> ContactPatch {
        let mut patch = ContactPatch::new();
        if let Some(name) = &self.name {
            patch = patch.name(name.trim());
        }
        if self.clear_phone {
            patch = patch.clear_phone();
        } else if let Some(phone) = &self.phone {
            patch = patch.phone(phone.as_str());
        }
        if self.clear_email {
            patch = patch.clear_email();
        } else if let Some(email) = &self.email {
            patch = patch.email(email.as_str());
        }
        if let Some(favorite) = self.favorite {
            patch = patch.favorite(favorite);
        }
        patch
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let service = ContactService::new(SqliteContactRepository::try_new(&conn)?);

    match cli.command {
        Command::List { favorites, search } => {
            let contacts = service.get_all()?;
            let filter = ContactFilter::new(favorites, search.unwrap_or_default());
            let visible = filter.apply(&contacts);
            for contact in &visible {
                print_contact(contact);
            }
            println!("{} of {} contact(s)", visible.len(), contacts.len());
        }
        Command::Show { id } => match service.get_by_id(id)? {
            Some(contact) => print_contact(&contact),
            None => println!("Contact {id} not found."),
        },
        Command::Add(args) => {
            let contact = NewContact {
                name: args.name.trim().to_string(),
                phone: args.phone,
                email: args.email,
                favorite: args.favorite,
            };
            let id = service
                .add_contact(&contact)
                .map_err(|err| anyhow::anyhow!("{}: {err}", err.user_message()))?;
            println!("Contact {id} added.");
        }
        Command::Update(args) => {
            let patch = args.to_patch();
            if patch.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            service
                .update(args.id, &patch)
                .map_err(|err| anyhow::anyhow!("{}: {err}", err.user_message()))?;
            println!("Contact {} updated.", args.id);
        }
        Command::Favorite { id } => match service.toggle_favorite(id)? {
            Some(true) => println!("Contact {id} marked as favorite."),
            Some(false) => println!("Contact {id} removed from favorites."),
            None => println!("Contact {id} not found."),
        },
        Command::Delete { id } => {
            service.delete(id)?;
            println!("Contact {id} deleted.");
        }
        Command::Seed => {
            let inserted = service.seed_sample_contacts()?;
            println!("Seeded {inserted} sample contact(s).");
        }
        Command::Import {
            url,
            match_empty_phone_by_name,
        } => {
            let source = HttpContactSource::new(url.unwrap_or(config.import_url));
            let policy = if match_empty_phone_by_name {
                EmptyPhonePolicy::MatchByName
            } else {
                EmptyPhonePolicy::Permissive
            };
            let report = import_contacts(&service, &source, policy).map_err(|err| {
                warn!("event=cli_import module=cli status=error");
                anyhow::anyhow!(err.user_message())
            })?;

            let mut summary = format!("Added {} new contact(s).", report.inserted);
            if report.skipped_duplicates > 0 {
                summary.push_str(&format!(
                    " Skipped {} duplicate(s).",
                    report.skipped_duplicates
                ));
            }
            println!("{summary}");
        }
    }

    Ok(())
}

fn print_contact(contact: &Contact) {
    let star = if contact.favorite { "*" } else { " " };
    println!(
        "{star} {:>4}  {:<24} {:<16} {}",
        contact.id,
        contact.name,
        contact.phone.as_deref().unwrap_or("-"),
        contact.email.as_deref().unwrap_or("-"),
    );
}
