use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use api_ingress::{ApiIngress, ApiIngressConfig};
use leaderboard::{Leaderboard, LeaderboardConfig};
use modkit::{DbModule, RestfulModule};
use modkit_db::{absolutize_sqlite_dsn, ConnectOpts, DbHandle};
use runtime::{AppConfig, CliArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MOCK_DSN: &str = "sqlite::memory:";

/// Leaderboard Server - users, points and ranks over HTTP
#[derive(Parser)]
#[command(name = "leaderboard-server")]
#[command(about = "Leaderboard Server - users, points and ranks over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database instead of the configured one
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Leaderboard Server starting");
    tracing::debug!("Effective server configuration: {:?}", config.server);

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// DSN the server will connect to: `--mock` wins, relative sqlite paths live under home_dir.
fn resolve_dsn(config: &AppConfig, args: &CliArgs, create_dirs: bool) -> Result<String> {
    if args.mock {
        return Ok(MOCK_DSN.to_string());
    }

    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database configuration missing"))?;
    let dsn = db_config.url.trim();
    if dsn.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    DbHandle::detect(dsn)?;

    // Absolutize sqlite DSNs to avoid cwd issues
    if dsn.starts_with("sqlite://") {
        let base_dir = Path::new(&config.server.home_dir);
        return absolutize_sqlite_dsn(dsn, base_dir, create_dirs)
            .with_context(|| format!("Invalid sqlite DSN '{dsn}'"));
    }
    Ok(dsn.to_string())
}

fn ingress_config(config: &AppConfig) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = config.module_config("api_ingress")?;
    cfg = cfg.with_default_bind(&config.server.host, config.server.port);
    if cfg.timeout_sec == 0 {
        cfg.timeout_sec = config.server.timeout_sec;
    }
    Ok(cfg)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let dsn = resolve_dsn(&config, &args, true)?;
    let db_config = config.database.as_ref();
    let connect_opts = ConnectOpts {
        max_conns: db_config.and_then(|d| d.max_conns),
        acquire_timeout: Some(Duration::from_secs(5)),
        sqlite_busy_timeout: db_config
            .and_then(|d| d.busy_timeout_ms)
            .map(|ms| Duration::from_millis(u64::from(ms))),
        create_sqlite_dirs: true,
        ..Default::default()
    };

    tracing::info!(
        "Connecting to database: {}",
        modkit_db::redact_credentials_in_dsn(&dsn)
    );
    let db = DbHandle::connect(&dsn, connect_opts).await?;
    tracing::info!("Connected DB backend: {:?}", db.engine());

    tracing::info!("Initializing modules...");
    let leaderboard = Leaderboard::new();
    leaderboard.migrate(&db).await?;
    let leaderboard_cfg: LeaderboardConfig = config.module_config("leaderboard")?;
    leaderboard.init(&db, leaderboard_cfg).await?;

    let ingress = ApiIngress::new(ingress_config(&config)?);
    let modules: [&dyn RestfulModule; 1] = [&leaderboard];
    let router = ingress.build_router(&modules)?;

    let cancel = CancellationToken::new();
    let signals = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = modkit::wait_for_shutdown(cancel.clone()).await {
                tracing::error!("Shutdown signal handler failed: {}", e);
            }
            cancel.cancel();
        }
    });

    let served = ingress.serve(router, cancel.clone()).await;
    cancel.cancel();
    join_signal_watcher(signals).await;

    db.close().await?;
    tracing::info!("Leaderboard Server stopped");
    served
}

/// Reap the signal watcher task. Returns `false` when it panicked or was aborted.
async fn join_signal_watcher(handle: tokio::task::JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Shutdown signal task failed: {}", e);
            false
        }
    }
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    resolve_dsn(&config, &args, false)?;
    let leaderboard_cfg: LeaderboardConfig = config.module_config("leaderboard")?;
    leaderboard_cfg.validate()?;
    let ingress_cfg = ingress_config(&config)?;
    ingress_cfg
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}'", ingress_cfg.bind_addr))?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
