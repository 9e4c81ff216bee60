use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::test_dto::{CreateTestPayload, UpdateTestPayload};
use crate::error::Result;
use crate::models::test::{Test, TestDocument};
use crate::normalize::ids::assign_content_ids;
use crate::normalize::question::normalize_content_questions;
use crate::normalize::structure::{to_admin_format, to_client_format, to_unified};

const TEST_COLUMNS: &str = "id, title, description, difficulty, status, total_time, tags, \
     is_template, content, created_by, updated_by, created_at, updated_at";

#[derive(Clone)]
pub struct TestService {
    pool: PgPool,
}

impl TestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a test from a raw authoring payload. Entity ids are assigned
    /// before the document is persisted; the response is the unified shape.
    pub async fn create_test(
        &self,
        payload: CreateTestPayload,
        created_by: Uuid,
    ) -> Result<TestDocument> {
        payload.validate()?;

        let content = assign_content_ids(&payload.content);
        let content_json = serde_json::to_value(&content)?;

        let sql = format!(
            "INSERT INTO tests (title, description, difficulty, status, total_time, tags, \
             is_template, content, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) \
             RETURNING {TEST_COLUMNS}"
        );
        let row: Test = sqlx::query_as(&sql)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.difficulty.unwrap_or_default().as_str())
            .bind(payload.status.unwrap_or_default().as_str())
            .bind(payload.total_time.map(|t| t as i32))
            .bind(payload.tags.clone().unwrap_or_default())
            .bind(payload.is_template.unwrap_or(false))
            .bind(&content_json)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await?;

        Ok(to_unified(TestDocument::from(row)))
    }

    /// Admin read path: nested shape populated from flat, question content
    /// defaulted.
    pub async fn get_test(&self, test_id: Uuid) -> Result<TestDocument> {
        let row = self.fetch(test_id).await?;
        let mut doc = to_admin_format(TestDocument::from(row));
        normalize_content_questions(&mut doc.content);
        Ok(doc)
    }

    /// Client read path: flat-only shape, question content defaulted.
    pub async fn get_test_for_client(&self, test_id: Uuid) -> Result<TestDocument> {
        let row = self.fetch(test_id).await?;
        let mut doc = to_client_format(TestDocument::from(row));
        normalize_content_questions(&mut doc.content);
        Ok(doc)
    }

    pub async fn update_test(
        &self,
        test_id: Uuid,
        payload: UpdateTestPayload,
        updated_by: Uuid,
    ) -> Result<TestDocument> {
        payload.validate()?;

        let content_json = if payload.content.is_empty() {
            None
        } else {
            Some(serde_json::to_value(assign_content_ids(&payload.content))?)
        };

        let sql = format!(
            "UPDATE tests SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description), \
                difficulty = COALESCE($3, difficulty), \
                status = COALESCE($4, status), \
                total_time = COALESCE($5, total_time), \
                tags = COALESCE($6, tags), \
                is_template = COALESCE($7, is_template), \
                content = COALESCE($8, content), \
                updated_by = $9, \
                updated_at = NOW() \
             WHERE id = $10 \
             RETURNING {TEST_COLUMNS}"
        );
        let row: Test = sqlx::query_as(&sql)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.difficulty.map(|d| d.as_str()))
            .bind(payload.status.map(|s| s.as_str()))
            .bind(payload.total_time.map(|t| t as i32))
            .bind(&payload.tags)
            .bind(payload.is_template)
            .bind(&content_json)
            .bind(updated_by)
            .bind(test_id)
            .fetch_one(&self.pool)
            .await?;

        let mut doc = to_admin_format(TestDocument::from(row));
        normalize_content_questions(&mut doc.content);
        Ok(doc)
    }

    pub async fn delete_test(&self, test_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tests WHERE id = $1")
            .bind(test_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch(&self, test_id: Uuid) -> Result<Test> {
        let sql = format!("SELECT {TEST_COLUMNS} FROM tests WHERE id = $1");
        let row = sqlx::query_as(&sql)
            .bind(test_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}
