//! HTTP API handlers for finplan-server

pub mod analysis;
pub mod health;
pub mod plan;
pub mod questionnaire;

pub use analysis::{get_latest_analysis, preview_analysis_request, run_analysis};
pub use health::health_routes;
pub use plan::{get_plan, get_section_access, get_snapshot};
pub use questionnaire::{get_questionnaire, put_questionnaire};

use crate::error::{ApiError, ApiResult};

const MAX_USER_ID_LEN: usize = 128;

/// Reject user ids that are empty, oversized, or contain anything beyond
/// ASCII alphanumerics, `-`, `_` and `.`
pub(crate) fn validate_user_id(user_id: &str) -> ApiResult<()> {
    let valid = !user_id.is_empty()
        && user_id.len() <= MAX_USER_ID_LEN
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid user id: {:?}", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("user-1").is_ok());
        assert!(validate_user_id("a.b_c").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("has space").is_err());
        assert!(validate_user_id(&"x".repeat(129)).is_err());
    }
}
