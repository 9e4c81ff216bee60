//! One-time sweep that back-fills whichever of the two stored test shapes
//! (legacy nested vs. flat) is empty. Safe to re-run; already-consistent
//! documents are left untouched.

use ielts_backend::config::init_config;
use ielts_backend::database::pool::create_pool;
use ielts_backend::services::structure_sweep;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let report = structure_sweep::run(&pool).await?;
    info!(
        scanned = report.scanned,
        updated = report.updated,
        failed = report.failed,
        "test structure sweep finished"
    );

    Ok(())
}
