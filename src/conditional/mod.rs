//! Clearing answers that belong to a section the claimant has just hidden.

use crate::claim::{FieldPath, Warning};
use crate::error::PathError;
use serde_json::Value;

/// The editable state of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    /// Local form values, shaped like the claim JSON.
    pub data: Value,
    /// The patch that will be sent on save.
    pub pending: Value,
    /// Warnings currently shown on the page.
    pub errors: Vec<Warning>,
}

impl FormState {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            pending: Value::Object(Default::default()),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<Warning>) -> Self {
        self.errors = errors;
        self
    }
}

/// What a clearing pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub cleared: Vec<FieldPath>,
    pub removed_warnings: usize,
}

impl ClearReport {
    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty() && self.removed_warnings == 0
    }
}

/// Tracks one conditional section's visibility and clears its fields when it is hidden.
///
/// Only the declared paths are cleared. Paths missing from the state are skipped, and a
/// repeated `apply` with an unchanged visibility does nothing.
#[derive(Debug, Clone)]
pub struct ConditionalFieldController {
    visible: bool,
    owned: Vec<FieldPath>,
}

impl ConditionalFieldController {
    pub fn new(visible: bool, owned: Vec<FieldPath>) -> Self {
        Self { visible, owned }
    }

    pub fn from_paths(visible: bool, paths: &[&str]) -> Result<Self, PathError> {
        let owned = paths
            .iter()
            .map(|p| FieldPath::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(visible, owned))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn owned_paths(&self) -> &[FieldPath] {
        &self.owned
    }

    /// Records the new visibility; on a visible-to-hidden transition clears every owned path.
    pub fn apply(&mut self, visible: bool, state: &mut FormState) -> ClearReport {
        let was_visible = std::mem::replace(&mut self.visible, visible);
        if was_visible && !visible {
            clear_owned_fields(&self.owned, state)
        } else {
            ClearReport::default()
        }
    }
}

/// Clears `paths` from local and pending state and drops the warnings beneath them.
///
/// Each cleared value in `data` is also written into `pending` at the same location, so the
/// save persists the removal without carrying unrelated data.
pub fn clear_owned_fields(paths: &[FieldPath], state: &mut FormState) -> ClearReport {
    let mut report = ClearReport::default();

    for path in paths {
        let matches = path.concrete_in(&state.data);
        let in_data = path.clear_in(&mut state.data) > 0;
        for cleared in &matches {
            mirror_into_pending(cleared, state);
        }
        let in_pending = path.clear_in(&mut state.pending) > 0;
        if in_data || in_pending {
            log::debug!("Cleared hidden field {}", path);
            report.cleared.push(path.clone());
        }

        let before = state.errors.len();
        state.errors.retain(|w| !w.is_under(path));
        report.removed_warnings += before - state.errors.len();
    }

    report
}

/// Writes the cleared value at `path` into `pending`.
///
/// When `pending` has no element at that index, the innermost enclosing array is copied
/// from `data` instead.
fn mirror_into_pending(path: &FieldPath, state: &mut FormState) {
    if !state.pending.is_object() {
        state.pending = Value::Object(Default::default());
    }
    let candidates = std::iter::once(path.clone()).chain(path.enclosing_arrays());
    for target in candidates {
        let Some(value) = target.get(&state.data).first().map(|v| (*v).clone()) else {
            continue;
        };
        if target.set_in(&mut state.pending, value, true) {
            return;
        }
    }
    log::warn!("Could not record cleared field {} in the pending patch", path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_showing_a_section_clears_nothing() {
        let mut controller = ConditionalFieldController::from_paths(false, &["mass_id"]).unwrap();
        let mut state = FormState::new(json!({"mass_id": "S12345678"}));

        let report = controller.apply(true, &mut state);
        assert!(report.is_empty());
        assert_eq!(state.data["mass_id"], "S12345678");
    }

    #[test]
    fn test_hiding_mirrors_clear_into_pending() {
        let mut controller = ConditionalFieldController::from_paths(
            true,
            &["leave_details.employer_notification_date"],
        )
        .unwrap();
        let mut state = FormState::new(json!({
            "leave_details": {
                "employer_notified": false,
                "employer_notification_date": "2026-09-01"
            }
        }));

        let report = controller.apply(false, &mut state);
        assert_eq!(report.cleared.len(), 1);
        assert_eq!(state.data["leave_details"]["employer_notification_date"], Value::Null);
        assert_eq!(
            state.pending,
            json!({"leave_details": {"employer_notification_date": null}})
        );
    }

    #[test]
    fn test_hiding_keeps_other_pending_edits() {
        let mut controller = ConditionalFieldController::from_paths(
            true,
            &["leave_details.employer_notification_date"],
        )
        .unwrap();
        let mut state = FormState::new(json!({
            "leave_details": {
                "reason": "bonding",
                "employer_notified": false,
                "employer_notification_date": "2026-09-01",
                "continuous_leave_periods": [{"leave_period_id": "lp-1"}]
            }
        }));
        state.pending = json!({"leave_details": {"reason": "medical"}});

        controller.apply(false, &mut state);
        assert_eq!(
            state.pending,
            json!({"leave_details": {"reason": "medical", "employer_notification_date": null}})
        );
    }

    #[test]
    fn test_cleared_array_element_fields_reach_pending() {
        let mut state = FormState::new(json!({
            "employer_benefits": [
                {"benefit_type": "paid_leave", "benefit_amount_dollars": 100},
                {"benefit_type": "disability", "benefit_amount_dollars": 250}
            ]
        }));
        let paths = vec![FieldPath::parse("employer_benefits[*].benefit_amount_dollars").unwrap()];

        clear_owned_fields(&paths, &mut state);
        assert_eq!(
            state.pending,
            json!({"employer_benefits": [
                {"benefit_type": "paid_leave", "benefit_amount_dollars": null},
                {"benefit_type": "disability", "benefit_amount_dollars": null}
            ]})
        );

        let mut edited = FormState::new(json!({
            "employer_benefits": [{"benefit_type": "paid_leave", "benefit_amount_dollars": 100}]
        }));
        edited.pending = json!({"employer_benefits": [{"benefit_type": "disability"}]});
        clear_owned_fields(&paths, &mut edited);
        assert_eq!(
            edited.pending,
            json!({"employer_benefits": [
                {"benefit_type": "disability", "benefit_amount_dollars": null}
            ]})
        );
    }

    #[test]
    fn test_missing_path_is_skipped() {
        let mut controller = ConditionalFieldController::from_paths(true, &["mass_id"]).unwrap();
        let mut state = FormState::new(json!({"first_name": "Ada"}));

        let report = controller.apply(false, &mut state);
        assert!(report.cleared.is_empty());
        assert_eq!(state.data, json!({"first_name": "Ada"}));
        assert!(!controller.is_visible());
    }
}
