use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use qrtrail_core::QrError;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

use app::App;

#[derive(Parser)]
#[command(name = "qrtrail")]
#[command(about = "qrtrail - QR code generation and scan history", long_about = None)]
struct Cli {
    /// Directory holding history and session files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the history store, seeding sample data on first run
    Init,
    /// List recorded QR codes, newest first
    History {
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Defaults to `history.default_page_size` from config
        #[arg(long)]
        page_size: Option<usize>,
        /// First day to include (YYYY-MM-DD, local time)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD, local time)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a QR code for a URL or text and record it
    Generate { text: String },
    /// Record a scanned code. Reads decoded frames from stdin, one per line,
    /// when TEXT is omitted
    Scan { text: Option<String> },
    /// Resolve content to a link that can be opened
    Open { text: String },
    /// Sign in with a local account
    Login { email: String, password: String },
    /// Create a local account and sign in
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Sign out and remove the stored token
    Logout,
    /// Show the signed-in account
    Whoami,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,qrtrail=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registering = matches!(cli.command, Commands::Register { .. });

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            match err.downcast_ref::<QrError>() {
                Some(qr) if registering => eprintln!("{}: {}", qr.registration_notice_title(), qr),
                Some(qr) => eprintln!("{}: {}", qr.notice_title(), qr),
                None => eprintln!("Error: {:#}", err),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app = App::bootstrap(cli.data_dir.as_deref(), cli.config.as_deref()).await?;

    match cli.command {
        Commands::Init => commands::history::init(&app).await?,
        Commands::History {
            page,
            page_size,
            from,
            to,
            json,
        } => commands::history::list(&app, page, page_size, from, to, json).await?,
        Commands::Generate { text } => commands::generate::generate(&app, &text).await?,
        Commands::Scan { text } => commands::scan::scan(&app, text).await?,
        Commands::Open { text } => commands::scan::open(&text)?,
        Commands::Login { email, password } => {
            commands::session::login(&app, &email, &password).await?
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::session::register(&app, &name, &email, &password).await?,
        Commands::Logout => commands::session::logout(&app).await?,
        Commands::Whoami => commands::session::whoami(&app).await,
    }

    Ok(())
}
