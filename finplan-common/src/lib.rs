//! # FinPlan Common Library
//!
//! Shared code for the financial-plan services including:
//! - Questionnaire data model (sparse, section-keyed form state)
//! - Plan-tier classification and report-section access policy
//! - Normalization of questionnaire data into analysis requests
//! - Derived financial metrics
//! - Analysis report schema
//! - Configuration loading
//! - Database persistence

pub mod analysis;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod plan_tier;
pub mod questionnaire;
pub mod time;

pub use analysis::AnalysisReport;
pub use error::{Error, Result};
pub use normalize::{normalize, NormalizedAnalysisRequest};
pub use plan_tier::{can_access_section, classify, upgrade_message, PlanType, ReportSection};
pub use questionnaire::{QuestionnaireData, QuestionnaireSection};
