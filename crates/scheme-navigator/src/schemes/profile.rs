use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// A user-supplied attribute as it arrived on the wire.
///
/// `Malformed` keeps the raw value when it could not be read as `T`. Evaluation treats it as
/// a failed check for any rule keyed to the attribute instead of rejecting the whole request.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute<T> {
    Absent,
    Provided(T),
    Malformed(Value),
}

impl<T> Default for Attribute<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Attribute<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn provided(&self) -> Option<&T> {
        match self {
            Self::Provided(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: DeserializeOwned> Attribute<T> {
    pub fn from_value(raw: Value) -> Self {
        if raw.is_null() {
            return Self::Absent;
        }

        match serde_json::from_value::<T>(raw.clone()) {
            Ok(value) => Self::Provided(value),
            Err(_) => Self::Malformed(raw),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Attribute<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(raw))
    }
}

/// Whole, non-negative number of years.
///
/// Accepts `65` and `65.0` (browser forms send `parseFloat` output) but not `64.5` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Years(pub u32);

impl Years {
    pub fn from_number(number: &Number) -> Option<Self> {
        if let Some(whole) = number.as_u64() {
            return u32::try_from(whole).ok().map(Self);
        }

        let value = number.as_f64()?;
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
            Some(Self(value as u32))
        } else {
            None
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Self::from_number(number),
            _ => None,
        }
    }
}

impl fmt::Display for Years {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Years {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = Number::deserialize(deserializer)?;
        Self::from_number(&number).ok_or_else(|| {
            D::Error::custom(format!("expected a whole number of years, got {number}"))
        })
    }
}

/// Demographic attributes submitted by a citizen. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: Attribute<Years>,
    pub gender: Attribute<String>,
    pub income: Attribute<f64>,
    pub ration_card: Attribute<String>,
    pub education: Attribute<String>,
    pub housing_status: Attribute<String>,
    pub marital_status: Attribute<String>,
    pub child_age: Attribute<Years>,
}

impl UserProfile {
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Attribute::Provided(Years(age));
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Attribute::Provided(gender.into());
        self
    }

    pub fn with_income(mut self, income: f64) -> Self {
        self.income = Attribute::Provided(income);
        self
    }

    pub fn with_ration_card(mut self, ration_card: impl Into<String>) -> Self {
        self.ration_card = Attribute::Provided(ration_card.into());
        self
    }

    pub fn with_education(mut self, education: impl Into<String>) -> Self {
        self.education = Attribute::Provided(education.into());
        self
    }

    pub fn with_housing_status(mut self, housing_status: impl Into<String>) -> Self {
        self.housing_status = Attribute::Provided(housing_status.into());
        self
    }

    pub fn with_marital_status(mut self, marital_status: impl Into<String>) -> Self {
        self.marital_status = Attribute::Provided(marital_status.into());
        self
    }

    pub fn with_child_age(mut self, child_age: u32) -> Self {
        self.child_age = Attribute::Provided(Years(child_age));
        self
    }
}
