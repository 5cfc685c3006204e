//! Plan-tier classification and report-section access policy
//!
//! A user holds either a quick or a comprehensive plan. The tier is never
//! stored; it is recomputed from the questionnaire every time a report
//! section is rendered.
//!
//! Access is driven by a single table ([`REPORT_SECTIONS`]) mapping each
//! report section to its display title, the minimum tier that may view it,
//! and the overlay shown to users below that tier. Because access is
//! `plan >= min_tier`, everything a quick plan may see is also visible to a
//! comprehensive plan.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::questionnaire::{QuestionnaireData, QuestionnaireSection};

/// Display name written by the quick-intake flow in place of a real name
pub const QUICK_PLAN_SENTINEL_NAME: &str = "Quick Plan User";

/// Completed sections required for a comprehensive plan
pub const COMPREHENSIVE_MIN_SECTIONS: usize = 7;

/// Plan tier held by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Quick,
    Comprehensive,
}

impl PlanType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report section rendered in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSection {
    Executive,
    Assets,
    Retirement,
    Debt,
    Risk,
    Actions,
    Goals,
    Cashflow,
    Insurance,
    Tax,
}

/// Title and description of the gating overlay for a locked section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeMessage {
    pub title: String,
    pub description: String,
}

/// One row of the access policy table
#[derive(Debug, Clone, Copy)]
pub struct SectionPolicy {
    pub section: ReportSection,
    pub id: &'static str,
    pub title: &'static str,
    pub min_tier: PlanType,
    /// Overlay text for users below `min_tier`; `None` for quick sections
    pub upgrade: Option<(&'static str, &'static str)>,
}

/// The access policy, in dashboard order
pub const REPORT_SECTIONS: [SectionPolicy; 10] = [
    SectionPolicy {
        section: ReportSection::Executive,
        id: "executive",
        title: "Executive Summary",
        min_tier: PlanType::Quick,
        upgrade: None,
    },
    SectionPolicy {
        section: ReportSection::Assets,
        id: "assets",
        title: "Asset Allocation",
        min_tier: PlanType::Comprehensive,
        upgrade: Some((
            "Unlock Asset Allocation Analysis",
            "Get a detailed breakdown of your portfolio with personalized rebalancing recommendations.",
        )),
    },
    SectionPolicy {
        section: ReportSection::Retirement,
        id: "retirement",
        title: "Retirement Planning",
        min_tier: PlanType::Comprehensive,
        upgrade: Some((
            "Unlock Retirement Planning",
            "See retirement projections, contribution targets and withdrawal strategies tailored to your timeline.",
        )),
    },
    SectionPolicy {
        section: ReportSection::Debt,
        id: "debt",
        title: "Debt Management",
        min_tier: PlanType::Quick,
        upgrade: None,
    },
    SectionPolicy {
        section: ReportSection::Risk,
        id: "risk",
        title: "Risk Assessment",
        min_tier: PlanType::Quick,
        upgrade: None,
    },
    SectionPolicy {
        section: ReportSection::Actions,
        id: "actions",
        title: "Action Plan",
        min_tier: PlanType::Quick,
        upgrade: None,
    },
    SectionPolicy {
        section: ReportSection::Goals,
        id: "goals",
        title: "Goal Tracking",
        min_tier: PlanType::Comprehensive,
        upgrade: Some((
            "Unlock Goal Tracking",
            "Track progress toward each financial goal with funding gaps and milestone dates.",
        )),
    },
    SectionPolicy {
        section: ReportSection::Cashflow,
        id: "cashflow",
        title: "Cash Flow Analysis",
        min_tier: PlanType::Comprehensive,
        upgrade: Some((
            "Unlock Cash Flow Analysis",
            "Understand where your money goes each month and find room to save more.",
        )),
    },
    SectionPolicy {
        section: ReportSection::Insurance,
        id: "insurance",
        title: "Insurance Review",
        min_tier: PlanType::Comprehensive,
        upgrade: Some((
            "Unlock Insurance Review",
            "Identify coverage gaps across life, disability, health and property insurance.",
        )),
    },
    SectionPolicy {
        section: ReportSection::Tax,
        id: "tax",
        title: "Tax Optimization",
        min_tier: PlanType::Comprehensive,
        upgrade: Some((
            "Unlock Tax Optimization",
            "Discover tax-advantaged strategies and account placement opportunities.",
        )),
    },
];

const FALLBACK_UPGRADE_TITLE: &str = "Upgrade to a Comprehensive Plan";
const FALLBACK_UPGRADE_DESCRIPTION: &str =
    "Complete the full questionnaire to unlock this section of your financial plan.";

impl ReportSection {
    /// Identifier used by the rendering layer
    pub fn id(self) -> &'static str {
        self.policy().id
    }

    /// Parse a section identifier; unknown ids yield `None`
    pub fn from_id(id: &str) -> Option<Self> {
        REPORT_SECTIONS.iter().find(|p| p.id == id).map(|p| p.section)
    }

    /// Access policy row for this section
    pub fn policy(self) -> &'static SectionPolicy {
        REPORT_SECTIONS
            .iter()
            .find(|p| p.section == self)
            .unwrap_or(&REPORT_SECTIONS[0])
    }

    pub fn is_accessible(self, plan: PlanType) -> bool {
        plan >= self.policy().min_tier
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Whether the record was produced by the quick-intake flow
///
/// Currently inferred from the sentinel display name. A real user whose name
/// is exactly the sentinel is misclassified; callers must go through this
/// predicate so the detection can be replaced by an explicit marker.
pub fn is_quick_intake(data: &QuestionnaireData) -> bool {
    data.field(QuestionnaireSection::Personal, "name")
        .and_then(|v| v.as_str())
        .is_some_and(|name| name == QUICK_PLAN_SENTINEL_NAME)
}

/// Decide which plan tier the questionnaire represents
pub fn classify(data: &QuestionnaireData) -> PlanType {
    if is_quick_intake(data) {
        return PlanType::Quick;
    }

    if data.completed_count() < COMPREHENSIVE_MIN_SECTIONS {
        PlanType::Quick
    } else {
        PlanType::Comprehensive
    }
}

/// Whether a plan may view the report section with the given id
///
/// The policy is an allowlist: unknown ids are never accessible.
pub fn can_access_section(section_id: &str, plan: PlanType) -> bool {
    ReportSection::from_id(section_id).is_some_and(|s| s.is_accessible(plan))
}

/// Gating overlay text for a section
pub fn upgrade_message(section_id: &str) -> UpgradeMessage {
    let (title, description) = ReportSection::from_id(section_id)
        .and_then(|s| s.policy().upgrade)
        .unwrap_or((FALLBACK_UPGRADE_TITLE, FALLBACK_UPGRADE_DESCRIPTION));

    UpgradeMessage {
        title: title.to_string(),
        description: description.to_string(),
    }
}

/// Sections visible to a plan, in dashboard order
pub fn accessible_sections(plan: PlanType) -> Vec<ReportSection> {
    REPORT_SECTIONS
        .iter()
        .filter(|p| plan >= p.min_tier)
        .map(|p| p.section)
        .collect()
}

/// Tier and gating summary handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan_type: PlanType,
    pub completed_sections: Vec<String>,
    pub total_sections: usize,
    pub accessible_sections: Vec<ReportSection>,
    pub locked_sections: Vec<ReportSection>,
}

impl PlanSummary {
    pub fn for_questionnaire(data: &QuestionnaireData) -> Self {
        let plan_type = classify(data);
        let (accessible, locked): (Vec<_>, Vec<_>) = REPORT_SECTIONS
            .iter()
            .map(|p| p.section)
            .partition(|s| s.is_accessible(plan_type));

        Self {
            plan_type,
            completed_sections: data
                .completed_sections()
                .into_iter()
                .map(|s| s.key().to_string())
                .collect(),
            total_sections: QuestionnaireSection::ALL.len(),
            accessible_sections: accessible,
            locked_sections: locked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_sections(count: usize) -> QuestionnaireData {
        QuestionnaireSection::ALL
            .iter()
            .take(count)
            .fold(QuestionnaireData::new(), |data, s| {
                data.with_section(*s, json!({"answered": "yes"}))
            })
    }

    #[test]
    fn test_empty_questionnaire_is_quick() {
        assert_eq!(classify(&QuestionnaireData::new()), PlanType::Quick);
    }

    #[test]
    fn test_threshold_boundary() {
        for count in 0..=16 {
            let expected = if count < 7 { PlanType::Quick } else { PlanType::Comprehensive };
            assert_eq!(classify(&with_sections(count)), expected, "count = {}", count);
        }
    }

    #[test]
    fn test_sentinel_name_forces_quick() {
        let data = with_sections(16).with_section(
            QuestionnaireSection::Personal,
            json!({"name": QUICK_PLAN_SENTINEL_NAME}),
        );

        assert_eq!(data.completed_count(), 16);
        assert!(is_quick_intake(&data));
        assert_eq!(classify(&data), PlanType::Quick);
    }

    #[test]
    fn test_sentinel_requires_exact_match() {
        let data = with_sections(16).with_section(
            QuestionnaireSection::Personal,
            json!({"name": "quick plan user"}),
        );

        assert!(!is_quick_intake(&data));
        assert_eq!(classify(&data), PlanType::Comprehensive);
    }

    #[test]
    fn test_quick_allowlist() {
        let quick: Vec<&str> = accessible_sections(PlanType::Quick).iter().map(|s| s.id()).collect();
        assert_eq!(quick, vec!["executive", "debt", "risk", "actions"]);
    }

    #[test]
    fn test_comprehensive_sees_every_section() {
        assert_eq!(accessible_sections(PlanType::Comprehensive).len(), REPORT_SECTIONS.len());
    }

    #[test]
    fn test_comprehensive_is_strict_superset_of_quick() {
        let quick = accessible_sections(PlanType::Quick);
        let comprehensive = accessible_sections(PlanType::Comprehensive);

        for section in &quick {
            assert!(comprehensive.contains(section));
        }
        assert!(comprehensive.len() > quick.len());

        for policy in REPORT_SECTIONS {
            if can_access_section(policy.id, PlanType::Quick) {
                assert!(can_access_section(policy.id, PlanType::Comprehensive));
            }
        }
    }

    #[test]
    fn test_unknown_section_is_never_accessible() {
        assert!(!can_access_section("bogus", PlanType::Quick));
        assert!(!can_access_section("bogus", PlanType::Comprehensive));
        assert!(!can_access_section("", PlanType::Comprehensive));
        assert!(!can_access_section("Executive", PlanType::Comprehensive));
    }

    #[test]
    fn test_upgrade_messages_cover_locked_sections() {
        for id in ["assets", "retirement", "goals", "cashflow", "insurance", "tax"] {
            let message = upgrade_message(id);
            assert_ne!(message.title, FALLBACK_UPGRADE_TITLE, "{} should have its own message", id);
            assert!(!message.description.is_empty());
        }
    }

    #[test]
    fn test_upgrade_message_fallback() {
        for id in ["executive", "debt", "unknown", ""] {
            let message = upgrade_message(id);
            assert_eq!(message.title, FALLBACK_UPGRADE_TITLE);
            assert_eq!(message.description, FALLBACK_UPGRADE_DESCRIPTION);
        }
    }

    #[test]
    fn test_locked_sections_are_exactly_those_with_upgrade_text() {
        for policy in REPORT_SECTIONS {
            assert_eq!(
                policy.upgrade.is_some(),
                !can_access_section(policy.id, PlanType::Quick),
                "{}",
                policy.id
            );
        }
    }

    #[test]
    fn test_plan_summary_partitions_sections() {
        let data = with_sections(2);
        let summary = PlanSummary::for_questionnaire(&data);

        assert_eq!(summary.plan_type, PlanType::Quick);
        assert_eq!(summary.completed_sections, vec!["personal", "income"]);
        assert_eq!(summary.total_sections, 16);
        assert_eq!(summary.accessible_sections.len() + summary.locked_sections.len(), 10);
        assert!(summary.locked_sections.contains(&ReportSection::Tax));
    }

    #[test]
    fn test_plan_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(PlanType::Comprehensive).unwrap(), json!("comprehensive"));
        assert_eq!(serde_json::to_value(ReportSection::Cashflow).unwrap(), json!("cashflow"));
    }
}
