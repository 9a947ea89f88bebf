use std::sync::Arc;

use tracing::debug;

use super::catalog::SchemeCatalog;
use super::domain::{EligibilityReport, RoadmapView, SchemeId};
use super::eligibility::{evaluate, EligibilityOutcome};
use super::profile::UserProfile;

/// Read-only query facade over the scheme catalog.
#[derive(Debug, Clone)]
pub struct SchemeService {
    catalog: Arc<SchemeCatalog>,
}

impl SchemeService {
    pub fn new(catalog: Arc<SchemeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SchemeCatalog {
        &self.catalog
    }

    /// Match a profile against every scheme, keeping catalog order.
    pub fn find_eligible(&self, profile: &UserProfile) -> EligibilityReport {
        let eligible = self
            .catalog
            .iter()
            .filter(|scheme| match evaluate(profile, &scheme.eligibility) {
                EligibilityOutcome::Eligible => true,
                EligibilityOutcome::Ineligible(failure) => {
                    debug!(scheme = %scheme.id, reason = %failure.summary(), "scheme rejected");
                    false
                }
            })
            .map(|scheme| scheme.summary())
            .collect();

        EligibilityReport::new(eligible)
    }

    pub fn roadmap(&self, scheme_id: &str) -> Result<RoadmapView, LookupError> {
        self.catalog
            .get(scheme_id)
            .map(|scheme| scheme.roadmap_view())
            .ok_or_else(|| LookupError::NotFound(SchemeId::from(scheme_id)))
    }
}

/// Error raised when a caller names a scheme the catalog does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("scheme '{0}' not found")]
    NotFound(SchemeId),
}
