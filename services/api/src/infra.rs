use metrics_exporter_prometheus::PrometheusHandle;
use scheme_navigator::config::DataConfig;
use scheme_navigator::guidance::{GuidanceError, GuidanceTable};
use scheme_navigator::schemes::{CatalogError, SchemeCatalog};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_catalog(data: &DataConfig) -> Result<SchemeCatalog, CatalogError> {
    SchemeCatalog::load(&data.schemes_path)
}

/// Configured override when present, otherwise the table compiled into the binary.
pub(crate) fn load_guidance(data: &DataConfig) -> Result<GuidanceTable, GuidanceError> {
    match &data.guidance_path {
        Some(path) => GuidanceTable::load(path),
        None => GuidanceTable::bundled(),
    }
}
