//! Scheme catalog, eligibility matching and roadmap lookup.

pub mod catalog;
pub mod domain;
pub mod eligibility;
pub mod profile;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, SchemeCatalog};
pub use domain::{EligibilityReport, RoadmapStep, RoadmapView, Scheme, SchemeId, SchemeSummary};
pub use eligibility::{
    evaluate, is_eligible, Criterion, CriterionKind, EligibilityOutcome, EligibilityRules,
    FailureReason, RuleFailure,
};
pub use profile::{Attribute, UserProfile, Years};
pub use router::eligibility_router;
pub use service::{LookupError, SchemeService};
