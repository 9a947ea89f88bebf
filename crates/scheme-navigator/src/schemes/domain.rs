use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::eligibility::EligibilityRules;

/// Identifier of a welfare scheme as published in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemeId(pub String);

impl SchemeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SchemeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SchemeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A welfare scheme record. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scheme {
    pub id: SchemeId,
    pub name: String,
    pub benefit: String,
    pub category: String,
    #[serde(default)]
    pub official_url: Option<String>,
    #[serde(default)]
    pub eligibility: EligibilityRules,
    #[serde(default)]
    pub roadmap: Vec<RoadmapStep>,
}

impl Scheme {
    pub fn summary(&self) -> SchemeSummary {
        SchemeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            benefit: self.benefit.clone(),
            category: self.category.clone(),
        }
    }

    pub fn roadmap_view(&self) -> RoadmapView {
        RoadmapView {
            scheme_name: self.name.clone(),
            benefit: self.benefit.clone(),
            roadmap: self.roadmap.clone(),
            official_url: self.official_url.clone(),
        }
    }
}

/// One application step. The record is passed through verbatim; only the CLI peeks at the
/// conventional `step`, `title`, `action`, `method`, `time`, `documents` and `location` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoadmapStep(pub Value);

impl RoadmapStep {
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn number(&self) -> Option<u64> {
        self.0.get("step").and_then(Value::as_u64)
    }

    pub fn documents(&self) -> Vec<&str> {
        self.0
            .get("documents")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Listing projection returned by the eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeSummary {
    pub id: SchemeId,
    pub name: String,
    pub benefit: String,
    pub category: String,
}

/// Result of matching one profile against the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub total_eligible: usize,
    pub eligible_schemes: Vec<SchemeSummary>,
}

impl EligibilityReport {
    pub fn new(eligible_schemes: Vec<SchemeSummary>) -> Self {
        Self {
            total_eligible: eligible_schemes.len(),
            eligible_schemes,
        }
    }
}

/// Application guide for a single scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapView {
    pub scheme_name: String,
    pub benefit: String,
    pub roadmap: Vec<RoadmapStep>,
    pub official_url: Option<String>,
}
