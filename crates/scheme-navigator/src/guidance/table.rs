use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

const BUNDLED_GUIDANCE: &str = include_str!("../../data/form_guidance.json");

/// Canned instructions for one step of a scheme's application form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceEntry {
    pub instructions: Vec<String>,
    #[serde(default)]
    pub field_mappings: BTreeMap<String, String>,
    pub next_action: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl GuidanceEntry {
    /// Returned when no guidance exists for the scheme at all.
    pub fn not_configured() -> Self {
        Self {
            instructions: vec![
                "AI guidance not yet configured for this scheme. Please follow the roadmap steps."
                    .to_string(),
            ],
            field_mappings: BTreeMap::new(),
            next_action: "Follow the instructions provided".to_string(),
            warnings: Vec::new(),
        }
    }

    /// Returned when the scheme is known but the step is not.
    pub fn continue_current_step() -> Self {
        Self {
            instructions: vec![
                "Continue with the current step as described in the roadmap".to_string(),
            ],
            field_mappings: BTreeMap::new(),
            next_action: "Follow on-screen instructions".to_string(),
            warnings: Vec::new(),
        }
    }
}

/// Scheme id → step number → entry.
#[derive(Debug, Clone, Default)]
pub struct GuidanceTable {
    schemes: HashMap<String, BTreeMap<u32, GuidanceEntry>>,
}

impl GuidanceTable {
    /// Table compiled into the binary from the crate's `data/form_guidance.json`.
    pub fn bundled() -> Result<Self, GuidanceError> {
        Self::from_json_str(BUNDLED_GUIDANCE)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GuidanceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GuidanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            schemes = table.schemes.len(),
            "guidance table loaded"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GuidanceError> {
        let raw: HashMap<String, BTreeMap<String, GuidanceEntry>> =
            serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, GuidanceError> {
        let raw: HashMap<String, BTreeMap<String, GuidanceEntry>> = serde_json::from_str(raw)?;
        Self::from_raw(raw)
    }

    fn from_raw(
        raw: HashMap<String, BTreeMap<String, GuidanceEntry>>,
    ) -> Result<Self, GuidanceError> {
        let mut schemes = HashMap::with_capacity(raw.len());
        for (scheme_id, steps) in raw {
            let mut parsed = BTreeMap::new();
            for (key, entry) in steps {
                let step = parse_step_key(&key).ok_or_else(|| GuidanceError::InvalidStepKey {
                    scheme_id: scheme_id.clone(),
                    key: key.clone(),
                })?;
                parsed.insert(step, entry);
            }
            schemes.insert(scheme_id, parsed);
        }

        Ok(Self { schemes })
    }

    /// Never fails: unknown schemes and steps degrade to generic entries.
    pub fn guidance(&self, scheme_id: &str, step: i64) -> GuidanceEntry {
        let Some(steps) = self.schemes.get(scheme_id) else {
            return GuidanceEntry::not_configured();
        };

        u32::try_from(step)
            .ok()
            .and_then(|step| steps.get(&step))
            .cloned()
            .unwrap_or_else(GuidanceEntry::continue_current_step)
    }

    pub fn steps(&self, scheme_id: &str) -> Vec<u32> {
        self.schemes
            .get(scheme_id)
            .map(|steps| steps.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains_scheme(&self, scheme_id: &str) -> bool {
        self.schemes.contains_key(scheme_id)
    }
}

/// Only the canonical `step_<n>` spelling is accepted, so `step_07` never stands in for step 7.
fn parse_step_key(key: &str) -> Option<u32> {
    let digits = key.strip_prefix("step_")?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let step: u32 = digits.parse().ok()?;
    (step.to_string() == digits).then_some(step)
}

#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    #[error("unable to read guidance table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("guidance table is not valid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("guidance for scheme '{scheme_id}' uses step key '{key}', expected step_<n>")]
    InvalidStepKey { scheme_id: String, key: String },
}
