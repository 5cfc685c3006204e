//! Questionnaire data model
//!
//! A questionnaire is a sparse record keyed by section name. Each section is
//! an optional JSON object of loosely-typed form fields (numbers usually
//! arrive as strings). Absence of a section means "not yet answered".
//!
//! The record is loaded and saved wholesale; nothing in this crate mutates
//! it in place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One of the sixteen questionnaire sections counted toward plan completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuestionnaireSection {
    Personal,
    Income,
    Expenses,
    Assets,
    Liabilities,
    Goals,
    Preferences,
    Risk,
    EmployerBenefits,
    Insurance,
    TaxSituation,
    EstatePlanning,
    Behavioral,
    CashFlow,
    LifeCareer,
    InvestmentPhilosophy,
}

impl QuestionnaireSection {
    /// The fixed section catalog, core sections first
    pub const ALL: [QuestionnaireSection; 16] = [
        Self::Personal,
        Self::Income,
        Self::Expenses,
        Self::Assets,
        Self::Liabilities,
        Self::Goals,
        Self::Preferences,
        Self::Risk,
        Self::EmployerBenefits,
        Self::Insurance,
        Self::TaxSituation,
        Self::EstatePlanning,
        Self::Behavioral,
        Self::CashFlow,
        Self::LifeCareer,
        Self::InvestmentPhilosophy,
    ];

    /// Key under which the section is stored in questionnaire data
    pub fn key(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Income => "income",
            Self::Expenses => "expenses",
            Self::Assets => "assets",
            Self::Liabilities => "liabilities",
            Self::Goals => "goals",
            Self::Preferences => "preferences",
            Self::Risk => "risk",
            Self::EmployerBenefits => "employerBenefits",
            Self::Insurance => "insurance",
            Self::TaxSituation => "taxSituation",
            Self::EstatePlanning => "estatePlanning",
            Self::Behavioral => "behavioral",
            Self::CashFlow => "cashFlow",
            Self::LifeCareer => "lifeCareer",
            Self::InvestmentPhilosophy => "investmentPhilosophy",
        }
    }

    /// Look up a section by its storage key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.key() == key)
    }
}

impl fmt::Display for QuestionnaireSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw questionnaire state for one user
///
/// Serializes as the bare section map, e.g.
/// `{"personal": {"name": "Ada", "age": "41"}, "income": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionnaireData {
    sections: Map<String, Value>,
}

impl QuestionnaireData {
    /// Empty questionnaire (nothing answered)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an arbitrary JSON value
    ///
    /// Anything other than an object (including `null`) is treated as an
    /// empty questionnaire.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(sections) => Self { sections },
            _ => Self::default(),
        }
    }

    /// Replace a section wholesale, returning the updated record
    pub fn with_section(mut self, section: QuestionnaireSection, fields: Value) -> Self {
        self.sections.insert(section.key().to_string(), fields);
        self
    }

    /// Fields of a section, if the section is present and is an object
    pub fn section(&self, section: QuestionnaireSection) -> Option<&Map<String, Value>> {
        self.sections.get(section.key()).and_then(Value::as_object)
    }

    /// Single raw field of a section
    pub fn field(&self, section: QuestionnaireSection, name: &str) -> Option<&Value> {
        self.section(section).and_then(|fields| fields.get(name))
    }

    /// A section is completed iff it is present and has at least one key
    pub fn is_completed(&self, section: QuestionnaireSection) -> bool {
        self.section(section).is_some_and(|fields| !fields.is_empty())
    }

    /// Completed sections in catalog order
    pub fn completed_sections(&self) -> Vec<QuestionnaireSection> {
        QuestionnaireSection::ALL
            .iter()
            .copied()
            .filter(|s| self.is_completed(*s))
            .collect()
    }

    /// Number of completed catalog sections (keys outside the catalog never count)
    pub fn completed_count(&self) -> usize {
        QuestionnaireSection::ALL
            .iter()
            .filter(|s| self.is_completed(**s))
            .count()
    }

    /// Underlying JSON value for persistence
    pub fn to_value(&self) -> Value {
        Value::Object(self.sections.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_has_sixteen_distinct_keys() {
        let mut keys: Vec<&str> = QuestionnaireSection::ALL.iter().map(|s| s.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 16);
    }

    #[test]
    fn test_from_key_round_trips_catalog() {
        for section in QuestionnaireSection::ALL {
            assert_eq!(QuestionnaireSection::from_key(section.key()), Some(section));
        }
        assert_eq!(QuestionnaireSection::from_key("Personal"), None);
        assert_eq!(QuestionnaireSection::from_key("unknown"), None);
    }

    #[test]
    fn test_empty_object_section_is_not_completed() {
        let data = QuestionnaireData::from_value(json!({
            "personal": {},
            "income": {"salary": "90000"},
        }));

        assert!(!data.is_completed(QuestionnaireSection::Personal));
        assert!(data.is_completed(QuestionnaireSection::Income));
        assert_eq!(data.completed_count(), 1);
    }

    #[test]
    fn test_non_object_section_is_not_completed() {
        let data = QuestionnaireData::from_value(json!({
            "personal": "Ada",
            "income": null,
            "assets": [1, 2, 3],
        }));

        assert_eq!(data.completed_count(), 0);
        assert!(data.section(QuestionnaireSection::Personal).is_none());
    }

    #[test]
    fn test_unknown_keys_do_not_count() {
        let data = QuestionnaireData::from_value(json!({
            "personal": {"name": "Ada"},
            "favouriteColour": {"value": "green"},
        }));

        assert_eq!(data.completed_count(), 1);
        assert_eq!(data.completed_sections(), vec![QuestionnaireSection::Personal]);
    }

    #[test]
    fn test_null_value_is_empty_questionnaire() {
        let data = QuestionnaireData::from_value(Value::Null);
        assert_eq!(data, QuestionnaireData::new());
        assert_eq!(data.completed_count(), 0);
    }

    #[test]
    fn test_serializes_as_bare_section_map() {
        let data = QuestionnaireData::new()
            .with_section(QuestionnaireSection::Personal, json!({"name": "Ada"}));

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, json!({"personal": {"name": "Ada"}}));

        let parsed: QuestionnaireData = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_field_lookup() {
        let data = QuestionnaireData::from_value(json!({
            "personal": {"name": "Ada", "age": "41"},
        }));

        assert_eq!(data.field(QuestionnaireSection::Personal, "age"), Some(&json!("41")));
        assert_eq!(data.field(QuestionnaireSection::Personal, "missing"), None);
        assert_eq!(data.field(QuestionnaireSection::Income, "salary"), None);
    }
}
