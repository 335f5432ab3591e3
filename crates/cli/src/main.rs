//! Gatherly CLI - browse clubs and events, register, and track bookings.
//!
//! # Usage
//!
//! ```bash
//! # Browse upcoming events (only those with seats left)
//! gatherly events --available
//!
//! # Event details by slug
//! gatherly event supper-club-night
//!
//! # Register and pay for an event
//! gatherly register supper-club-night \
//!     --name "Asha Rao" --email asha@example.com --phone "+91 98765 43210" \
//!     --quantity 2
//!
//! # Check a booking later (works without signing in)
//! gatherly status reg_123 asha@example.com --watch
//! ```
//!
//! Configuration comes from the environment (or a `.env` file); at minimum
//! `GATHERLY_API_BASE_URL` must be set.

#![cfg_attr(not(test), forbid(unsafe_code))]
// User-facing output goes to stdout/stderr; tracing is diagnostics only.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod checkout;
mod commands;

#[derive(Parser)]
#[command(name = "gatherly")]
#[command(version, about = "Gatherly event booking client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events
    Events {
        /// Only events with seats remaining
        #[arg(long)]
        available: bool,

        /// Include the hosting club
        #[arg(long)]
        with_club: bool,

        /// Maximum number of events to list
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one event
    Event {
        /// Event slug (or id)
        slug: String,
    },
    /// List clubs
    Clubs,
    /// Show one club and its events
    Club {
        /// Club id
        id: String,
    },
    /// Sign in with email and password
    Signin {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "GATHERLY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "GATHERLY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and discard the stored session
    Signout,
    /// Register for an event and pay
    Register {
        /// Event slug (or id)
        slug: String,

        /// Full name on the booking
        #[arg(long)]
        name: String,

        /// Confirmation email address
        #[arg(long)]
        email: String,

        /// Contact phone number
        #[arg(long)]
        phone: String,

        /// Number of tickets
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Check the status of a booking
    Status {
        /// Registration id from the confirmation screen or email
        registration_id: String,

        /// Email the booking was made with
        email: String,

        /// Keep polling until the booking settles
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() {
    // Diagnostics are opt-in via RUST_LOG; default to quiet.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Events {
            available,
            with_club,
            limit,
        } => commands::events::list(available, with_club, limit).await?,
        Commands::Event { slug } => commands::events::show(&slug).await?,
        Commands::Clubs => commands::clubs::list().await?,
        Commands::Club { id } => commands::clubs::show(&id).await?,
        Commands::Signin { email, password } => commands::auth::sign_in(&email, &password).await?,
        Commands::Signup {
            name,
            email,
            password,
        } => commands::auth::sign_up(&name, &email, &password).await?,
        Commands::Signout => commands::auth::sign_out().await?,
        Commands::Register {
            slug,
            name,
            email,
            phone,
            quantity,
        } => commands::register::run(&slug, &name, &email, &phone, quantity).await?,
        Commands::Status {
            registration_id,
            email,
            watch,
        } => commands::status::run(&registration_id, &email, watch).await?,
    }
    Ok(())
}
