//! Stored analyses
//!
//! Each analysis keeps the exact request that was sent alongside the coerced
//! report, so a dashboard can always be traced back to its inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::analysis::AnalysisReport;
use crate::normalize::NormalizedAnalysisRequest;
use crate::time::to_storage_string;
use crate::{Error, Result};

/// Analysis as stored for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub guid: Uuid,
    pub user_id: String,
    pub request: NormalizedAnalysisRequest,
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

/// Persist an analysis, returning its id
pub async fn record_analysis(
    pool: &SqlitePool,
    user_id: &str,
    request: &NormalizedAnalysisRequest,
    report: &AnalysisReport,
    created_at: DateTime<Utc>,
) -> Result<Uuid> {
    let guid = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO analyses (guid, user_id, request, report, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(guid.to_string())
    .bind(user_id)
    .bind(serde_json::to_string(request)?)
    .bind(serde_json::to_string(report)?)
    .bind(to_storage_string(created_at))
    .execute(pool)
    .await?;

    Ok(guid)
}

/// Most recent analysis for a user, if any
pub async fn latest_analysis(pool: &SqlitePool, user_id: &str) -> Result<Option<StoredAnalysis>> {
    let row: Option<(String, String, String, String)> = sqlx::query_as(
        r#"
        SELECT guid, request, report, created_at
        FROM analyses
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some((guid, request, report, created_at)) = row else {
        return Ok(None);
    };

    let guid = Uuid::parse_str(&guid)
        .map_err(|e| Error::Internal(format!("Corrupt analysis id '{}': {}", guid, e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Corrupt analysis timestamp '{}': {}", created_at, e)))?
        .with_timezone(&Utc);

    Ok(Some(StoredAnalysis {
        guid,
        user_id: user_id.to_string(),
        request: serde_json::from_str(&request)?,
        report: serde_json::from_str(&report)?,
        created_at,
    }))
}
