//! teamweight server
//!
//! HTTP API for daily weigh-ins, the admin dashboard and LINE reminders.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use teamweight_core::tracing_init::{LogFormat, init_tracing};
use teamweight_core::{Config, SnapshotPolicy};
use teamweight_server::auth::{AdminGate, password};
use teamweight_server::line::LineClient;
use teamweight_server::records::RecordService;
use teamweight_server::routes::{AppState, build_router};
use teamweight_server::storage::TeamDatabase;

#[derive(Parser, Debug)]
#[command(name = "teamweight")]
#[command(version, about = "teamweight server - team weigh-ins over LINE")]
struct Args {
    /// Path to a JSON config file.
    #[arg(long, global = true, env = "TEAMWEIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Path to SQLite database file.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// How submissions update the profile's last weight.
    #[arg(long)]
    snapshot_policy: Option<SnapshotPolicy>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print an argon2 PHC hash for `admin.password_hash`.
    HashPassword {
        #[arg(env = "TEAMWEIGHT_ADMIN_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(Command::HashPassword { password }) = &args.command {
        let hash = password::hash_password(password)
            .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;
        print_hash(&hash);
        return Ok(());
    }

    let mut config = teamweight_core::config::load_config(args.config.as_deref())?;
    apply_cli_overrides(&mut config, &args);

    init_tracing(
        "teamweight_server=info",
        LogFormat::from_flag(config.server.log_json),
    );

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server.listen_addr,
        snapshot_policy = %config.records.snapshot_policy,
        "Starting teamweight"
    );

    let db_path = match &config.server.database_path {
        Some(path) => path.clone(),
        None => teamweight_core::config::database_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine data directory"))?,
    };
    info!(path = %db_path.display(), "Opening team database");
    let db = TeamDatabase::open(&db_path).await?;

    let records = RecordService::new(db, config.records.snapshot_policy);
    let gate = AdminGate::from_config(&config.admin);
    let line = LineClient::new(&config.line.api_base, config.line.channel_access_token.clone())?;

    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen_addr))?;

    let app = build_router(AppState::new(records, gate, Arc::new(line), config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "teamweight listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await?;

    info!("teamweight stopped");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_hash(hash: &str) {
    println!("{hash}");
}

fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(addr) = args.addr {
        config.server.listen_addr = addr.to_string();
    }
    if let Some(path) = &args.db_path {
        config.server.database_path = Some(path.clone());
    }
    if let Some(policy) = args.snapshot_policy {
        config.records.snapshot_policy = policy;
    }
    if args.log_json {
        config.server.log_json = true;
    }
}
