use super::path::FieldPath;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A soft-validation issue reported by the claims API for one field of the claim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Warning {
    pub field: String,
    pub rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Warning {
    pub fn new(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: None,
        }
    }

    /// The warning's field as a path. Unparseable fields reference nothing.
    pub fn path(&self) -> Option<FieldPath> {
        FieldPath::parse(&self.field).ok()
    }

    /// True when the warning is keyed to `path` or to something nested beneath it.
    pub fn is_under(&self, path: &FieldPath) -> bool {
        self.path().is_some_and(|own| path.is_prefix_of(&own))
    }

    /// True when the warning and `path` address overlapping parts of the claim.
    pub fn touches(&self, path: &FieldPath) -> bool {
        self.path().is_some_and(|own| own.overlaps(path))
    }
}

/// Warnings returned by the claims API, keyed by claim id.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(transparent)]
pub struct WarningStore {
    by_claim: AHashMap<String, Vec<Warning>>,
}

impl WarningStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `{"claim_id": [warning, ...]}` map from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replaces the warnings held for `claim_id`.
    pub fn set(&mut self, claim_id: impl Into<String>, warnings: Vec<Warning>) {
        self.by_claim.insert(claim_id.into(), warnings);
    }

    pub fn get(&self, claim_id: &str) -> &[Warning] {
        self.by_claim
            .get(claim_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn clear(&mut self, claim_id: &str) {
        self.by_claim.remove(claim_id);
    }
}
