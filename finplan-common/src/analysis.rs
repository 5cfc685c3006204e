//! Analysis report schema
//!
//! The analysis collaborator returns a loosely-structured JSON document. It
//! is coerced into [`AnalysisReport`] exactly once, at the boundary, so
//! downstream consumers never deal with missing or mistyped fields.
//!
//! Coercion is total: unknown shapes degrade to empty values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::normalize::coerce::{coerce_float, coerce_string};
use crate::plan_tier::ReportSection;

/// Recommendation urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parse a collaborator-supplied label, defaulting to medium
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" | "critical" | "urgent" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Report section the recommendation belongs to, if recognised
    pub section: Option<ReportSection>,
}

/// Strictly-typed analysis returned to the rendering layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub executive_summary: String,
    /// 0-100, clamped
    pub financial_health_score: u8,
    pub recommendations: Vec<Recommendation>,
    /// Narrative per report section id
    pub sections: BTreeMap<String, String>,
}

fn first<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k))
}

/// Render a section body as text; nested objects are kept as compact JSON
fn section_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
        other => coerce_string(Some(other)),
    }
}

fn recommendation(value: &Value) -> Option<Recommendation> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(Recommendation {
            title: text.clone(),
            description: String::new(),
            priority: Priority::Medium,
            section: None,
        }),
        Value::Object(map) => {
            let title = coerce_string(first(map, &["title", "action", "recommendation"]));
            let description = coerce_string(first(map, &["description", "details", "rationale"]));
            if title.is_empty() && description.is_empty() {
                return None;
            }
            Some(Recommendation {
                title,
                description,
                priority: Priority::from_label(&coerce_string(map.get("priority"))),
                section: ReportSection::from_id(&coerce_string(first(map, &["section", "category"]))),
            })
        }
        _ => None,
    }
}

impl AnalysisReport {
    /// Coerce an arbitrary collaborator payload
    ///
    /// A string payload is parsed as embedded JSON first (language models
    /// commonly return the document as message text, sometimes inside a
    /// fenced code block); unparseable text becomes the executive summary.
    pub fn from_value(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            Value::String(text) => match parse_embedded_json(&text) {
                Some(Value::Object(map)) => map,
                _ => {
                    return Self {
                        executive_summary: text.trim().to_string(),
                        ..Self::default()
                    }
                }
            },
            _ => return Self::default(),
        };

        let score = coerce_float(first(&map, &["financial_health_score", "financialHealthScore", "health_score"]));

        let recommendations = match first(&map, &["recommendations", "priority_recommendations"]) {
            Some(Value::Array(items)) => items.iter().filter_map(recommendation).collect(),
            _ => Vec::new(),
        };

        let sections = match map.get("sections") {
            Some(Value::Object(sections)) => sections
                .iter()
                .map(|(id, body)| (id.clone(), section_text(body)))
                .filter(|(_, body)| !body.is_empty())
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            executive_summary: coerce_string(first(&map, &["executive_summary", "executiveSummary", "summary"])),
            financial_health_score: score.round().clamp(0.0, 100.0) as u8,
            recommendations,
            sections,
        }
    }

    /// Recommendations filed under a report section
    pub fn recommendations_for(&self, section: ReportSection) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(move |r| r.section == Some(section))
    }
}

fn parse_embedded_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    // Fall back to the outermost brace pair (fenced or prefixed output)
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}
