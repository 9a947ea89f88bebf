//! Predicate engine matching a [`UserProfile`](super::UserProfile) against a scheme's
//! eligibility rules.
//!
//! Rules arrive from an externally edited dataset, so every recognised key is parsed into a
//! typed [`Criterion`] and anything that does not fit becomes [`Criterion::Malformed`] rather
//! than an error. Evaluation is a short-circuiting conjunction in which a criterion passes
//! whenever the applicant did not supply the attribute it reads.

mod criteria;
mod evaluate;

pub use criteria::{Criterion, CriterionKind, EligibilityRules};
pub use evaluate::{evaluate, is_eligible, EligibilityOutcome, FailureReason, RuleFailure};
