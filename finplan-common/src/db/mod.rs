//! Database models and queries
//!
//! Persistence for questionnaires (stored wholesale as JSON) and the
//! analyses produced from them.

pub mod analyses;
pub mod init;
pub mod questionnaires;

pub use analyses::{latest_analysis, record_analysis, StoredAnalysis};
pub use init::init_database;
pub use questionnaires::{load_questionnaire, save_questionnaire};
