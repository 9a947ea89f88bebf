use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::{Scheme, SchemeId};

/// Top-level keys under which a dataset may nest its scheme array.
const DATASET_KEYS: [&str; 2] = ["kerala_schemes", "schemes"];

/// Read-only, ordered collection of schemes with an id index.
#[derive(Debug, Clone, Default)]
pub struct SchemeCatalog {
    schemes: Vec<Scheme>,
    index: HashMap<SchemeId, usize>,
}

impl SchemeCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            schemes = catalog.len(),
            "scheme catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    /// Accepts either a bare array of schemes or an object wrapping one.
    fn from_document(document: Value) -> Result<Self, CatalogError> {
        let entries = match document {
            array @ Value::Array(_) => array,
            Value::Object(mut object) => DATASET_KEYS
                .iter()
                .find_map(|key| object.remove(*key))
                .ok_or(CatalogError::MissingSchemes)?,
            _ => return Err(CatalogError::MissingSchemes),
        };

        let schemes: Vec<Scheme> = serde_json::from_value(entries)?;
        Self::from_schemes(schemes)
    }

    pub fn from_schemes(schemes: Vec<Scheme>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(schemes.len());
        for (position, scheme) in schemes.iter().enumerate() {
            if index.insert(scheme.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(scheme.id.clone()));
            }
            report_rule_anomalies(scheme);
        }

        if schemes.is_empty() {
            warn!("scheme catalog is empty; every eligibility check will return no schemes");
        }

        Ok(Self { schemes, index })
    }

    pub fn get(&self, id: &str) -> Option<&Scheme> {
        self.index.get(id).map(|position| &self.schemes[*position])
    }

    /// Schemes in dataset order.
    pub fn iter(&self) -> std::slice::Iter<'_, Scheme> {
        self.schemes.iter()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl<'a> IntoIterator for &'a SchemeCatalog {
    type Item = &'a Scheme;
    type IntoIter = std::slice::Iter<'a, Scheme>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn report_rule_anomalies(scheme: &Scheme) {
    for criterion in scheme.eligibility.malformed() {
        warn!(
            scheme = %scheme.id,
            criterion = criterion.kind().key(),
            "malformed eligibility rule; applicants supplying this attribute will not match"
        );
    }

    for key in scheme.eligibility.unrecognized_keys() {
        debug!(scheme = %scheme.id, key = %key, "ignoring unrecognized eligibility key");
    }
}

/// Failures while building the catalog. All of them abort startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read scheme dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scheme dataset is not valid JSON for the scheme schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scheme dataset must be an array or an object with a `kerala_schemes` array")]
    MissingSchemes,
    #[error("duplicate scheme id '{0}' in dataset")]
    DuplicateId(SchemeId),
}
