use super::super::profile::{Attribute, UserProfile, Years};
use super::criteria::{Criterion, CriterionKind, EligibilityRules};

/// Verdict for one profile against one rule set.
#[derive(Debug, Clone, PartialEq)]
pub enum EligibilityOutcome {
    Eligible,
    Ineligible(RuleFailure),
}

impl EligibilityOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityOutcome::Eligible)
    }

    pub fn failure(&self) -> Option<&RuleFailure> {
        match self {
            EligibilityOutcome::Eligible => None,
            EligibilityOutcome::Ineligible(failure) => Some(failure),
        }
    }
}

/// First rule that rejected the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    pub criterion: CriterionKind,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    Unsatisfied(String),
    /// The rule or the applicant's value could not be compared.
    TypeMismatch,
}

impl RuleFailure {
    pub fn summary(&self) -> String {
        match &self.reason {
            FailureReason::Unsatisfied(detail) => format!("{}: {detail}", self.criterion.key()),
            FailureReason::TypeMismatch => format!(
                "{}: rule and {} are not comparable",
                self.criterion.key(),
                self.criterion.attribute()
            ),
        }
    }
}

pub fn is_eligible(profile: &UserProfile, rules: &EligibilityRules) -> bool {
    evaluate(profile, rules).is_eligible()
}

/// Checks every criterion present in `rules`, stopping at the first failure. Criteria whose
/// attribute the applicant did not supply pass.
pub fn evaluate(profile: &UserProfile, rules: &EligibilityRules) -> EligibilityOutcome {
    for criterion in rules.criteria() {
        if let Some(reason) = check(profile, criterion) {
            return EligibilityOutcome::Ineligible(RuleFailure {
                criterion: criterion.kind(),
                reason,
            });
        }
    }

    EligibilityOutcome::Eligible
}

fn check(profile: &UserProfile, criterion: &Criterion) -> Option<FailureReason> {
    match criterion {
        Criterion::MinAge(min) => against(&profile.age, |age| {
            (age < min).then(|| format!("age {age} is below the minimum of {min}"))
        }),
        Criterion::MaxAge(max) => against(&profile.age, |age| {
            (age > max).then(|| format!("age {age} is above the maximum of {max}"))
        }),
        Criterion::ChildAgeMax(max) => against(&profile.child_age, |age: &Years| {
            (age > max).then(|| format!("child age {age} is above the maximum of {max}"))
        }),
        Criterion::IncomeMax(max) => against(&profile.income, |income| {
            (income > max).then(|| format!("income {income} exceeds the limit of {max}"))
        }),
        Criterion::Gender(allowed) => against_text(&profile.gender, |gender| {
            one_of(allowed, gender, "gender")
        }),
        Criterion::RationCard(allowed) => against_text(&profile.ration_card, |card| {
            one_of(allowed, card, "ration card")
        }),
        Criterion::HousingStatus(allowed) => against_text(&profile.housing_status, |status| {
            one_of(allowed, status, "housing status")
        }),
        Criterion::MaritalStatus(required) => against_text(&profile.marital_status, |status| {
            (status != required.as_str())
                .then(|| format!("marital status '{status}' is not '{required}'"))
        }),
        Criterion::Education(token) => against_text(&profile.education, |education| {
            (!education.contains(token.as_str()))
                .then(|| format!("education '{education}' does not mention '{token}'"))
        }),
        Criterion::Malformed { kind, .. } => {
            supplies(profile, *kind).then_some(FailureReason::TypeMismatch)
        }
    }
}

fn against<T>(
    attribute: &Attribute<T>,
    verdict: impl FnOnce(&T) -> Option<String>,
) -> Option<FailureReason> {
    match attribute {
        Attribute::Absent => None,
        Attribute::Malformed(_) => Some(FailureReason::TypeMismatch),
        Attribute::Provided(value) => verdict(value).map(FailureReason::Unsatisfied),
    }
}

/// Empty text counts as not supplied.
fn against_text(
    attribute: &Attribute<String>,
    verdict: impl FnOnce(&str) -> Option<String>,
) -> Option<FailureReason> {
    match attribute {
        Attribute::Provided(value) if value.is_empty() => None,
        other => against(other, |value: &String| verdict(value.as_str())),
    }
}

fn one_of(allowed: &[String], value: &str, label: &str) -> Option<String> {
    (!allowed.iter().any(|candidate| candidate == value))
        .then(|| format!("{label} '{value}' is not one of [{}]", allowed.join(", ")))
}

fn supplies(profile: &UserProfile, kind: CriterionKind) -> bool {
    fn text(attribute: &Attribute<String>) -> bool {
        match attribute {
            Attribute::Absent => false,
            Attribute::Provided(value) => !value.is_empty(),
            Attribute::Malformed(_) => true,
        }
    }

    match kind {
        CriterionKind::MinAge | CriterionKind::MaxAge => !profile.age.is_absent(),
        CriterionKind::ChildAgeMax => !profile.child_age.is_absent(),
        CriterionKind::IncomeMax => !profile.income.is_absent(),
        CriterionKind::Gender => text(&profile.gender),
        CriterionKind::RationCard => text(&profile.ration_card),
        CriterionKind::HousingStatus => text(&profile.housing_status),
        CriterionKind::MaritalStatus => text(&profile.marital_status),
        CriterionKind::Education => text(&profile.education),
    }
}
