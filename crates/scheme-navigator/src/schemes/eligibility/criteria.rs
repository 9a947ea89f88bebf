use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::super::profile::Years;

/// Recognised eligibility keys, declared in evaluation order: integer bounds first, then the
/// income bound, set membership and finally the string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CriterionKind {
    MinAge,
    MaxAge,
    ChildAgeMax,
    IncomeMax,
    Gender,
    RationCard,
    HousingStatus,
    MaritalStatus,
    Education,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 9] = [
        CriterionKind::MinAge,
        CriterionKind::MaxAge,
        CriterionKind::ChildAgeMax,
        CriterionKind::IncomeMax,
        CriterionKind::Gender,
        CriterionKind::RationCard,
        CriterionKind::HousingStatus,
        CriterionKind::MaritalStatus,
        CriterionKind::Education,
    ];

    /// Dataset key for this criterion.
    pub fn key(self) -> &'static str {
        match self {
            CriterionKind::MinAge => "min_age",
            CriterionKind::MaxAge => "max_age",
            CriterionKind::ChildAgeMax => "child_age_max",
            CriterionKind::IncomeMax => "income_max",
            CriterionKind::Gender => "gender",
            CriterionKind::RationCard => "ration_card",
            CriterionKind::HousingStatus => "housing_status",
            CriterionKind::MaritalStatus => "marital_status",
            CriterionKind::Education => "education",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Profile attribute the criterion reads.
    pub fn attribute(self) -> &'static str {
        match self {
            CriterionKind::MinAge | CriterionKind::MaxAge => "age",
            CriterionKind::ChildAgeMax => "child_age",
            CriterionKind::IncomeMax => "income",
            other => other.key(),
        }
    }
}

/// A single typed eligibility rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    MinAge(Years),
    MaxAge(Years),
    ChildAgeMax(Years),
    IncomeMax(f64),
    Gender(Vec<String>),
    RationCard(Vec<String>),
    HousingStatus(Vec<String>),
    MaritalStatus(String),
    /// Token that must appear inside the applicant's education text.
    Education(String),
    /// Recognised key whose value has the wrong shape in the dataset.
    Malformed { kind: CriterionKind, raw: Value },
}

impl Criterion {
    pub fn parse(kind: CriterionKind, raw: Value) -> Self {
        let parsed = match kind {
            CriterionKind::MinAge => Years::from_value(&raw).map(Criterion::MinAge),
            CriterionKind::MaxAge => Years::from_value(&raw).map(Criterion::MaxAge),
            CriterionKind::ChildAgeMax => Years::from_value(&raw).map(Criterion::ChildAgeMax),
            CriterionKind::IncomeMax => raw.as_f64().map(Criterion::IncomeMax),
            CriterionKind::Gender => string_set(&raw).map(Criterion::Gender),
            CriterionKind::RationCard => string_set(&raw).map(Criterion::RationCard),
            CriterionKind::HousingStatus => string_set(&raw).map(Criterion::HousingStatus),
            CriterionKind::MaritalStatus => raw
                .as_str()
                .map(|value| Criterion::MaritalStatus(value.to_string())),
            CriterionKind::Education => raw
                .as_str()
                .map(|value| Criterion::Education(value.to_string())),
        };

        parsed.unwrap_or(Criterion::Malformed { kind, raw })
    }

    pub fn kind(&self) -> CriterionKind {
        match self {
            Criterion::MinAge(_) => CriterionKind::MinAge,
            Criterion::MaxAge(_) => CriterionKind::MaxAge,
            Criterion::ChildAgeMax(_) => CriterionKind::ChildAgeMax,
            Criterion::IncomeMax(_) => CriterionKind::IncomeMax,
            Criterion::Gender(_) => CriterionKind::Gender,
            Criterion::RationCard(_) => CriterionKind::RationCard,
            Criterion::HousingStatus(_) => CriterionKind::HousingStatus,
            Criterion::MaritalStatus(_) => CriterionKind::MaritalStatus,
            Criterion::Education(_) => CriterionKind::Education,
            Criterion::Malformed { kind, .. } => *kind,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Criterion::Malformed { .. })
    }
}

fn string_set(raw: &Value) -> Option<Vec<String>> {
    raw.as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// Conjunctive rule set of a scheme. Keys outside the recognised vocabulary are remembered
/// by name and never evaluated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EligibilityRules {
    criteria: BTreeMap<CriterionKind, Criterion>,
    unrecognized: Vec<String>,
}

impl EligibilityRules {
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut rules = Self::default();
        for (key, raw) in map {
            match CriterionKind::from_key(&key) {
                Some(kind) => {
                    rules.criteria.insert(kind, Criterion::parse(kind, raw));
                }
                None => rules.unrecognized.push(key),
            }
        }
        rules
    }

    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.insert(criterion.kind(), criterion);
        self
    }

    /// Criteria in evaluation order.
    pub fn criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.values()
    }

    pub fn get(&self, kind: CriterionKind) -> Option<&Criterion> {
        self.criteria.get(&kind)
    }

    pub fn malformed(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria().filter(|criterion| criterion.is_malformed())
    }

    pub fn unrecognized_keys(&self) -> &[String] {
        &self.unrecognized
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl<'de> Deserialize<'de> for EligibilityRules {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(Self::from_map(map.unwrap_or_default()))
    }
}
