//! Analysis endpoints
//!
//! Running an analysis loads the stored questionnaire, normalizes it, hands
//! the request to the external collaborator and persists the coerced report.

use axum::{
    extract::{Path, State},
    Json,
};
use finplan_common::db::{latest_analysis, load_questionnaire, record_analysis, StoredAnalysis};
use finplan_common::plan_tier::accessible_sections;
use finplan_common::{
    classify, normalize, time, AnalysisReport, NormalizedAnalysisRequest, PlanType,
    QuestionnaireData,
};
use serde::Serialize;
use uuid::Uuid;

use super::validate_user_id;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Result of a completed analysis run
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub guid: Uuid,
    pub plan_type: PlanType,
    pub report: AnalysisReport,
}

/// Normalized request scoped to the questionnaire's plan tier
fn scoped_request(data: &QuestionnaireData) -> NormalizedAnalysisRequest {
    let plan_type = classify(data);
    normalize(data, time::today()).scoped_to(plan_type, accessible_sections(plan_type))
}

/// GET /api/users/:user_id/analysis/preview
///
/// The exact request body that would be sent to the analysis service.
pub async fn preview_analysis_request(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<NormalizedAnalysisRequest>> {
    validate_user_id(&user_id)?;

    let data = load_questionnaire(&state.db, &user_id).await?;
    Ok(Json(scoped_request(&data)))
}

/// POST /api/users/:user_id/analysis
pub async fn run_analysis(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<AnalysisResponse>> {
    validate_user_id(&user_id)?;

    let data = load_questionnaire(&state.db, &user_id).await?;
    if data.completed_count() == 0 {
        return Err(ApiError::BadRequest(
            "Questionnaire is empty; save at least one section first".to_string(),
        ));
    }

    // Only requests that would reach the collaborator spend quota
    if !state.limiter.check(&user_id) {
        tracing::warn!(user_id = %user_id, "Analysis rate limit exceeded");
        return Err(ApiError::RateLimited(
            "Too many analysis requests, try again later".to_string(),
        ));
    }

    let request = scoped_request(&data);
    let plan_type = request.analysis_requirements.plan_type;

    let raw = state.provider.analyze(&request).await.map_err(|e| {
        tracing::error!(user_id = %user_id, "Analysis failed: {}", e);
        e
    })?;
    let report = AnalysisReport::from_value(raw);

    let guid = record_analysis(&state.db, &user_id, &request, &report, time::now()).await?;
    tracing::info!(
        user_id = %user_id,
        guid = %guid,
        plan_type = %plan_type,
        score = report.financial_health_score,
        "Analysis recorded"
    );

    Ok(Json(AnalysisResponse {
        guid,
        plan_type,
        report,
    }))
}

/// GET /api/users/:user_id/analysis/latest
pub async fn get_latest_analysis(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<StoredAnalysis>> {
    validate_user_id(&user_id)?;

    latest_analysis(&state.db, &user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No analysis for user {}", user_id)))
}
