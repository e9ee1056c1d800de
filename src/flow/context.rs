use crate::claim::ClaimSnapshot;
use ahash::{AHashMap, AHashSet};
use chrono::NaiveDate;

/// Feature flag names read by the portal graph's guards.
pub mod features {
    pub const EMPLOYMENT_STATUS: &str = "claimantShowEmploymentStatus";
    pub const OTHER_LEAVE: &str = "claimantShowOtherLeaveStep";
    pub const ORGANIZATION_UNITS: &str = "claimantShowOrganizationUnits";
}

/// The feature-flag capability injected into guard evaluation.
pub trait FeatureFlags {
    fn is_enabled(&self, name: &str) -> bool;
}

/// Every flag disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeatures;

impl FeatureFlags for NoFeatures {
    fn is_enabled(&self, _name: &str) -> bool {
        false
    }
}

impl FeatureFlags for AHashMap<String, bool> {
    fn is_enabled(&self, name: &str) -> bool {
        self.get(name).copied().unwrap_or(false)
    }
}

impl FeatureFlags for AHashSet<String> {
    fn is_enabled(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Ordered query-string parameters carried through a navigation.
///
/// Used both for the transient hints guards may read and for the `extraParams` the router
/// merges into the destination's query string. Inserting an existing key replaces its value
/// in place, so iteration order stays deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

static NO_HINTS: QueryParams = QueryParams(Vec::new());

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Everything a guard may look at: the claim, feature flags, navigation hints and the date
/// used for "is this date in the future" checks.
#[derive(Clone, Copy)]
pub struct ClaimContext<'a> {
    pub claim: &'a ClaimSnapshot,
    pub flags: &'a dyn FeatureFlags,
    pub hints: &'a QueryParams,
    pub today: NaiveDate,
}

impl<'a> ClaimContext<'a> {
    pub fn new(claim: &'a ClaimSnapshot, flags: &'a dyn FeatureFlags, today: NaiveDate) -> Self {
        Self {
            claim,
            flags,
            hints: &NO_HINTS,
            today,
        }
    }

    pub fn with_hints(mut self, hints: &'a QueryParams) -> Self {
        self.hints = hints;
        self
    }
}
