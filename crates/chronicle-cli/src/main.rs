//! Chronicle CLI - student login and the notice board from the terminal.
//!
//! Plays the part of the mobile home screen: `login` signs in and then shows
//! the latest notices, `notices` shows them without signing in.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chronicle_core::config::Config;
use chronicle_core::screens::{LoginRole, LoginScreen, NoticeBoard};
use chronicle_core::utils::{format_date, format_optional};
use chronicle_core::{ApiClient, ClientConfig, Session};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Password is read from here before falling back to a prompt
const PASSWORD_ENV: &str = "CHRONICLE_PASSWORD";

#[derive(Parser)]
#[command(name = "chronicle", version, about = "Chronicle student portal: login and notices")]
struct Cli {
    /// API base address (overrides config file and CHRONICLE_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the latest notices (default)
    Notices {
        /// Only show notices of this type, e.g. "Events"
        #[arg(long = "type")]
        notice_type: Option<String>,
    },
    /// Show one notice in full
    Notice { id: String },
    /// Log in, then show the latest notices
    Login {
        /// Roll number (or login ID with --staff)
        id: String,
        #[arg(long)]
        staff: bool,
    },
    /// Check that the API is reachable
    Health,
    /// Show or update the saved configuration
    Config {
        #[arg(long)]
        set_base_url: Option<String>,
        #[arg(long)]
        set_timeout: Option<u64>,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Notices { notice_type: None }) {
        Command::Notices { notice_type } => {
            let api = connect(cli.base_url)?;
            show_board(&api, notice_type).await;
            Ok(ExitCode::SUCCESS)
        }
        Command::Notice { id } => {
            let api = connect(cli.base_url)?;
            show_notice(&api, &id).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Login { id, staff } => login(connect(cli.base_url)?, id, staff).await,
        Command::Health => {
            let api = connect(cli.base_url)?;
            let health = api.health().await.context("API health check failed")?;
            println!("{}", if health.ok { "ok" } else { "unhealthy" });
            Ok(if health.ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Config { set_base_url, set_timeout } => update_config(set_base_url, set_timeout),
    }
}

/// Build the client from config file, environment and `--base-url`.
fn connect(base_url: Option<String>) -> Result<ApiClient> {
    let mut client_config = Config::resolve().context("Failed to load configuration")?;
    if let Some(url) = base_url {
        client_config.base_url = url;
    }
    let api = ApiClient::new(&client_config).context("Invalid API configuration")?;
    info!(base_url = api.base_url(), "Chronicle starting");
    Ok(api)
}

async fn login(api: ApiClient, id: String, staff: bool) -> Result<ExitCode> {
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(p) if !p.is_empty() => p,
        _ => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };
    let role = if staff { LoginRole::Staff } else { LoginRole::Student };

    let mut session = Session::new(api);
    let mut screen = LoginScreen::new(role, id, password);
    let ok = screen.submit(&mut session).await;
    if let Some(message) = &screen.message {
        println!("{}", message);
    }
    println!();

    show_board(session.api(), None).await;
    session.logout();

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn show_board(api: &ApiClient, notice_type: Option<String>) {
    let mut board = NoticeBoard::new(notice_type);
    board.load(api).await;

    println!("Latest Notices");
    for line in board.render_lines() {
        println!("{}", line);
    }
}

async fn show_notice(api: &ApiClient, id: &str) -> Result<()> {
    let notice = api
        .fetch_notice(id)
        .await
        .with_context(|| format!("Failed to fetch notice {}", id))?;
    let date = notice.created_at().map(|d| format_date(&d));

    println!("{}", notice.title);
    println!("{} · {}", notice.notice_type, format_optional(date.as_deref(), "undated"));
    println!();
    println!("{}", notice.description);
    if let Some(url) = &notice.uploads_url {
        println!();
        println!("Attachment: {}", url);
    }
    Ok(())
}

fn update_config(set_base_url: Option<String>, set_timeout: Option<u64>) -> Result<ExitCode> {
    let mut config = Config::load().context("Failed to load configuration")?;
    let changed = set_base_url.is_some() || set_timeout.is_some();
    if let Some(url) = set_base_url {
        // Validate before saving
        ApiClient::new(&ClientConfig::new(url.clone()))?;
        config.base_url = Some(url);
    }
    if let Some(secs) = set_timeout {
        config.timeout_secs = Some(secs);
    }
    if changed {
        config.save().context("Failed to save configuration")?;
        info!("Configuration saved");
    }
    let resolved = config.client_config();
    println!("base_url = {}", resolved.base_url);
    println!("timeout_secs = {}", resolved.timeout.as_secs());
    Ok(ExitCode::SUCCESS)
}
