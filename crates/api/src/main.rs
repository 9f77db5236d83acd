//! gcontacts - search Google Contacts from the terminal

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gcontacts_domain::Contact;
use gcontacts_lib::utils::logging::init_tracing;
use gcontacts_lib::{AppContext, ContactsController};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "gcontacts")]
#[command(about = "Search your Google Contacts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all contacts, from cache when fresh
    List {
        /// Ignore the cache and fetch from Google
        #[arg(long)]
        refresh: bool,

        /// Only show contacts whose name, email or phone contains TEXT
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,

        /// Print contacts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search contacts on the server
    Search {
        query: String,

        /// Print contacts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the cached contact list
    ClearCache,
    /// Forget stored Google credentials
    Logout,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Warning: could not load .env: {err}");
        }
    }
    init_tracing();

    if let Err(err) = run(cli.command).await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let ctx = AppContext::new().context("failed to initialize gcontacts")?;
    debug!(data_dir = %ctx.data_dir.display(), "Context ready");
    let controller = ContactsController::new(Arc::new(ctx));

    match command {
        Commands::List { refresh, filter, json } => {
            controller.load(refresh).await.context("failed to load contacts")?;
            let contacts = controller.filter(filter.as_deref().unwrap_or_default());
            print_contacts(&contacts, json)
        }
        Commands::Search { query, json } => {
            let contacts = controller.search(&query).await.context("search failed")?;
            print_contacts(&contacts, json)
        }
        Commands::ClearCache => {
            controller.clear_cache().await.context("failed to clear cache")?;
            info!("Cache cleared");
            println!("Contact cache cleared");
            Ok(())
        }
        Commands::Logout => {
            controller.logout().await.context("failed to sign out")?;
            println!("Signed out of Google");
            Ok(())
        }
    }
}

fn print_contacts(contacts: &[Contact], json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(contacts).context("failed to encode contacts")?;
        println!("{rendered}");
        return Ok(());
    }

    if contacts.is_empty() {
        println!("No contacts found");
        return Ok(());
    }

    for contact in contacts {
        match contact.subtitle() {
            Some(subtitle) => println!("{}\t{subtitle}", contact.name),
            None => println!("{}", contact.name),
        }
    }
    Ok(())
}
