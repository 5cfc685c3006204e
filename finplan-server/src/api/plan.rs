//! Plan tier, section gating and dashboard metrics

use axum::{
    extract::{Path, State},
    Json,
};
use finplan_common::analysis::Recommendation;
use finplan_common::db::{latest_analysis, load_questionnaire};
use finplan_common::metrics::FinancialSnapshot;
use finplan_common::plan_tier::{PlanSummary, UpgradeMessage};
use finplan_common::{
    can_access_section, classify, normalize, time, upgrade_message, PlanType, ReportSection,
};
use serde::Serialize;

use super::validate_user_id;
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/users/:user_id/plan
pub async fn get_plan(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PlanSummary>> {
    validate_user_id(&user_id)?;

    let data = load_questionnaire(&state.db, &user_id).await?;
    Ok(Json(PlanSummary::for_questionnaire(&data)))
}

/// Gate decision for one report section
#[derive(Debug, Serialize)]
pub struct SectionAccess {
    pub section_id: String,
    pub plan_type: PlanType,
    pub accessible: bool,
    /// Overlay text; present only when the section is locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<UpgradeMessage>,
    /// Narrative from the latest analysis; present only when accessible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Recommendation>,
}

/// GET /api/users/:user_id/sections/:section_id
///
/// Unknown section ids are answered like any other locked section.
pub async fn get_section_access(
    State(state): State<AppState>,
    Path((user_id, section_id)): Path<(String, String)>,
) -> ApiResult<Json<SectionAccess>> {
    validate_user_id(&user_id)?;

    let data = load_questionnaire(&state.db, &user_id).await?;
    let plan_type = classify(&data);

    if !can_access_section(&section_id, plan_type) {
        tracing::debug!(user_id = %user_id, section_id = %section_id, "Section locked");
        return Ok(Json(SectionAccess {
            upgrade: Some(upgrade_message(&section_id)),
            section_id,
            plan_type,
            accessible: false,
            content: None,
            recommendations: Vec::new(),
        }));
    }

    let (content, recommendations) = match latest_analysis(&state.db, &user_id).await? {
        Some(stored) => {
            let recommendations = ReportSection::from_id(&section_id)
                .map(|section| stored.report.recommendations_for(section).cloned().collect())
                .unwrap_or_default();
            (stored.report.sections.get(&section_id).cloned(), recommendations)
        }
        None => (None, Vec::new()),
    };

    Ok(Json(SectionAccess {
        section_id,
        plan_type,
        accessible: true,
        upgrade: None,
        content,
        recommendations,
    }))
}

/// GET /api/users/:user_id/snapshot
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<FinancialSnapshot>> {
    validate_user_id(&user_id)?;

    let data = load_questionnaire(&state.db, &user_id).await?;
    let request = normalize(&data, time::today());
    Ok(Json(FinancialSnapshot::from_request(&request)))
}
