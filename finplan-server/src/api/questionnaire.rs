//! Questionnaire storage endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use finplan_common::db::{load_questionnaire, save_questionnaire};
use finplan_common::plan_tier::PlanSummary;
use finplan_common::{time, QuestionnaireData};
use serde_json::Value;

use super::validate_user_id;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/users/:user_id/questionnaire
///
/// Users that never saved anything get an empty questionnaire.
pub async fn get_questionnaire(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<QuestionnaireData>> {
    validate_user_id(&user_id)?;

    let data = load_questionnaire(&state.db, &user_id).await?;
    Ok(Json(data))
}

/// PUT /api/users/:user_id/questionnaire
///
/// Replaces the stored record wholesale and returns the resulting plan summary.
pub async fn put_questionnaire(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PlanSummary>> {
    validate_user_id(&user_id)?;

    if !body.is_object() {
        return Err(ApiError::BadRequest(
            "Questionnaire must be a JSON object keyed by section".to_string(),
        ));
    }

    let data = QuestionnaireData::from_value(body);
    save_questionnaire(&state.db, &user_id, &data, time::now()).await?;

    let summary = PlanSummary::for_questionnaire(&data);
    tracing::info!(
        user_id = %user_id,
        completed = summary.completed_sections.len(),
        plan_type = %summary.plan_type,
        "Questionnaire saved"
    );

    Ok(Json(summary))
}
