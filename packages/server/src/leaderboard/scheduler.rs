use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tracing::{error, info};

use super::{run_top_creator_job, run_top_curator_job};
use crate::config::LeaderboardConfig;
use crate::utils::clock::Clock;

/// Refresh both leaderboards on a fixed interval until the process exits.
pub async fn run_leaderboard_scheduler(
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    config: LeaderboardConfig,
) {
    let period = Duration::from_secs(config.refresh_interval_secs.max(1));

    info!(
        refresh_interval_secs = config.refresh_interval_secs,
        "Starting leaderboard scheduler"
    );

    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;

        if let Err(e) = run_top_creator_job(&db, clock.now(), &config).await {
            error!(error = %e, "Top creator job failed");
        }
        if let Err(e) = run_top_curator_job(&db, clock.now(), &config).await {
            error!(error = %e, "Top curator job failed");
        }
    }
}
