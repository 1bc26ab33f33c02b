mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use evplan_core::{ResponseStatus, RoleFilter};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use commands::Context;
use commands::new::NewArgs;

#[derive(Parser)]
#[command(name = "evplan")]
#[command(about = "Plan events, invite people by email and answer your invitations")]
struct Cli {
    /// Event service to talk to (overrides api_base from the config file)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Log requests and state changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Log in and remember who you are
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Forget the logged-in identity
    Logout,
    /// Show the logged-in identity
    Whoami,
    /// List events you organize and events you are invited to
    Events {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new event
    New {
        /// Event title
        title: Option<String>,

        /// Date (YYYY-MM-DD), today or later
        #[arg(short, long)]
        date: Option<String>,

        /// Time of day (e.g. "10:00")
        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Delete one of your events
    Delete {
        event_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Invite someone to one of your events
    Invite { event_id: String, email: String },
    /// Show who responded to an event
    Attendees { event_id: String },
    /// Answer an invitation (Going, Maybe or "Not Going")
    Respond {
        event_id: String,
        status: ResponseStatus,
    },
    /// Search events by keyword, date and role
    Search {
        #[arg(short, long)]
        keyword: Option<String>,

        /// Exact date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// any, organizer or attendee
        #[arg(short, long, default_value = "any")]
        role: RoleFilter,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}", format!("{:#}", e).red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(cli.api_base)?;

    match cli.command {
        Commands::Signup { email } => commands::auth::signup(ctx, email).await,
        Commands::Login { email } => commands::auth::login(ctx, email).await,
        Commands::Logout => commands::auth::logout(ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Events { json } => commands::events::run(ctx, json).await,
        Commands::New {
            title,
            date,
            time,
            location,
            description,
        } => {
            let args = NewArgs {
                title,
                date,
                time,
                location,
                description,
            };
            commands::new::run(ctx, args).await
        }
        Commands::Delete { event_id, yes } => commands::delete::run(ctx, event_id, yes).await,
        Commands::Invite { event_id, email } => commands::invite::run(ctx, event_id, email).await,
        Commands::Attendees { event_id } => commands::attendees::run(ctx, event_id).await,
        Commands::Respond { event_id, status } => {
            commands::respond::run(ctx, event_id, status).await
        }
        Commands::Search {
            keyword,
            date,
            role,
        } => commands::search::run(ctx, keyword, date, role).await,
    }
}

/// Logs go to stderr so they never mix with command output. `RUST_LOG`
/// takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "evplan=debug,evplan_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
