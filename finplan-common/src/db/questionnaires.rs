//! Questionnaire persistence
//!
//! Questionnaires are loaded and saved wholesale, never patched field by
//! field.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::questionnaire::QuestionnaireData;
use crate::time::to_storage_string;
use crate::Result;

/// Replace the stored questionnaire for a user
pub async fn save_questionnaire(
    pool: &SqlitePool,
    user_id: &str,
    data: &QuestionnaireData,
    saved_at: DateTime<Utc>,
) -> Result<()> {
    let json = serde_json::to_string(data)?;

    sqlx::query(
        r#"
        INSERT INTO questionnaires (user_id, data, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(&json)
    .bind(to_storage_string(saved_at))
    .execute(pool)
    .await?;

    debug!(user_id = %user_id, completed = data.completed_count(), "Saved questionnaire");
    Ok(())
}

/// Load the stored questionnaire for a user
///
/// A user with nothing saved gets an empty questionnaire.
pub async fn load_questionnaire(pool: &SqlitePool, user_id: &str) -> Result<QuestionnaireData> {
    let row: Option<(String,)> = sqlx::query_as("SELECT data FROM questionnaires WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some((json,)) => Ok(QuestionnaireData::from_value(serde_json::from_str(&json)?)),
        None => Ok(QuestionnaireData::new()),
    }
}
