use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::Result;
use crate::models::test::TestContent;
use crate::normalize::structure::reconcile_shapes;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub updated: usize,
    pub failed: usize,
}

/// One-shot batch job: loads every stored test, applies the bidirectional
/// shape reconciliation, and persists only the documents where a copy
/// applied. Documents are processed strictly sequentially; a failure on one
/// document is logged and counted, never aborts the rest of the batch.
pub async fn run(pool: &PgPool) -> Result<SweepReport> {
    let rows: Vec<(Uuid, JsonValue)> =
        sqlx::query_as("SELECT id, content FROM tests ORDER BY created_at")
            .fetch_all(pool)
            .await?;

    info!(total = rows.len(), "starting test structure sweep");

    let mut report = SweepReport::default();
    for (test_id, content_json) in rows {
        report.scanned += 1;

        let mut content: TestContent = match serde_json::from_value(content_json) {
            Ok(content) => content,
            Err(e) => {
                report.failed += 1;
                error!(test_id = %test_id, error = %e, "skipping test with undecodable content");
                continue;
            }
        };

        if !reconcile_shapes(&mut content) {
            continue;
        }

        match persist(pool, test_id, &content).await {
            Ok(()) => {
                report.updated += 1;
                info!(test_id = %test_id, "synchronized test structure");
            }
            Err(e) => {
                report.failed += 1;
                error!(test_id = %test_id, error = %e, "failed to persist synchronized structure");
            }
        }
    }

    Ok(report)
}

async fn persist(pool: &PgPool, test_id: Uuid, content: &TestContent) -> Result<()> {
    let content_json = serde_json::to_value(content)?;
    sqlx::query("UPDATE tests SET content = $1, updated_at = NOW() WHERE id = $2")
        .bind(content_json)
        .bind(test_id)
        .execute(pool)
        .await?;
    Ok(())
}
