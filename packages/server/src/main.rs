use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use server::config::AppConfig;
use server::leaderboard::scheduler::run_leaderboard_scheduler;
use server::leaderboard::{run_top_creator_job, run_top_curator_job};
use server::state::AppState;
use server::utils::clock::{Clock, SystemClock};

/// Spotlight contest curation and leaderboard server
#[derive(Parser)]
#[command(name = "spotlight-server")]
#[command(about = "Contest recommendations and leaderboards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Run one leaderboard pass over all live contests and exit
    Refresh {
        #[arg(value_enum)]
        target: RefreshTarget,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RefreshTarget {
    TopCreators,
    TopCurators,
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load config")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    server::seed::seed_crew_roles(&db)
        .await
        .context("Failed to seed crew roles")?;
    server::seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(db, config, clock).await,
        Commands::Refresh { target } => {
            let now = clock.now();
            if matches!(target, RefreshTarget::TopCreators | RefreshTarget::All) {
                let report = run_top_creator_job(&db, now, &config.leaderboard).await?;
                info!(?report, "Top creators refreshed");
            }
            if matches!(target, RefreshTarget::TopCurators | RefreshTarget::All) {
                let report = run_top_curator_job(&db, now, &config.leaderboard).await?;
                info!(?report, "Top curators refreshed");
            }
            Ok(())
        }
    }
}

async fn serve(
    db: sea_orm::DatabaseConnection,
    config: AppConfig,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<()> {
    if config.leaderboard.scheduler_enabled {
        tokio::spawn(run_leaderboard_scheduler(
            db.clone(),
            clock.clone(),
            config.leaderboard.clone(),
        ));
    } else {
        info!("Leaderboard scheduler disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState { db, config, clock };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
