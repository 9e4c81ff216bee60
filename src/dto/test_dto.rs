use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::test::{Difficulty, TestContent, TestStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestPayload {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,

    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    #[serde(default)]
    pub status: Option<TestStatus>,

    #[validate(range(min = 1, message = "Total time must be at least 1 minute"))]
    #[serde(default)]
    pub total_time: Option<i64>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[serde(default)]
    pub is_template: Option<bool>,

    #[serde(flatten)]
    pub content: TestContent,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestPayload {
    // Using serde deserializer to trim and convert empty strings to None
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,

    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    #[serde(default)]
    pub status: Option<TestStatus>,

    #[validate(range(min = 1, message = "Total time must be at least 1 minute"))]
    #[serde(default)]
    pub total_time: Option<i64>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[serde(default)]
    pub is_template: Option<bool>,

    // An all-empty content payload means "leave the stored content alone".
    #[serde(flatten)]
    pub content: TestContent,
}

// Custom deserializer to trim strings and convert empty strings to None
fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
