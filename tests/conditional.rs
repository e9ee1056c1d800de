//! Conditional field clearing tests
mod common;
use claimflow::claim::FieldPath;
use claimflow::conditional::clear_owned_fields;
use claimflow::prelude::*;
use serde_json::{Value, json};

#[cfg(test)]
mod conditional_tests {
    use super::*;

    fn benefits_form() -> FormState {
        FormState::new(json!({
            "has_employer_benefits": false,
            "employer_benefits": [
                {"benefit_type": "short_term_disability", "benefit_amount_dollars": 400.0},
                {"benefit_type": "accrued_paid_leave", "benefit_amount_dollars": 1200.0}
            ]
        }))
        .with_errors(vec![
            Warning::new("employer_benefits[0].benefit_type", "required"),
            Warning::new("first_name", "required"),
        ])
    }

    #[test]
    fn test_toggling_employer_benefits_off() {
        let mut controller =
            ConditionalFieldController::from_paths(true, &["employer_benefits"]).unwrap();
        let mut state = benefits_form();

        let report = controller.apply(false, &mut state);

        assert_eq!(state.data["employer_benefits"], json!([]));
        assert_eq!(state.pending["employer_benefits"], json!([]));
        assert_eq!(report.removed_warnings, 1);
        assert_eq!(state.errors, vec![Warning::new("first_name", "required")]);
        assert_eq!(
            report.cleared,
            vec![FieldPath::parse("employer_benefits").unwrap()]
        );
    }

    #[test]
    fn test_repeated_apply_is_a_no_op() {
        let mut controller =
            ConditionalFieldController::from_paths(true, &["employer_benefits"]).unwrap();
        let mut state = benefits_form();

        controller.apply(false, &mut state);
        let once = state.clone();
        let report = controller.apply(false, &mut state);

        assert!(report.is_empty());
        assert_eq!(state, once);
    }

    #[test]
    fn test_reshowing_keeps_values() {
        let mut controller =
            ConditionalFieldController::from_paths(true, &["mass_id"]).unwrap();
        let mut state = FormState::new(json!({"has_state_id": false, "mass_id": "S12345678"}));

        controller.apply(false, &mut state);
        assert_eq!(state.data["mass_id"], Value::Null);

        state.data["mass_id"] = json!("S87654321");
        let report = controller.apply(true, &mut state);
        assert!(report.is_empty());
        assert_eq!(state.data["mass_id"], "S87654321");
    }

    #[test]
    fn test_only_declared_paths_are_cleared() {
        // A nested toggle inside a still-visible section only clears its own fields.
        let mut controller = ConditionalFieldController::from_paths(
            true,
            &["leave_details.caring_leave_metadata.family_member_date_of_birth"],
        )
        .unwrap();
        let mut state = FormState::new(json!({
            "leave_details": {
                "reason": "care",
                "caring_leave_metadata": {
                    "family_member_first_name": "Grace",
                    "family_member_date_of_birth": "1950-03-01"
                }
            }
        }));

        controller.apply(false, &mut state);

        let metadata = &state.data["leave_details"]["caring_leave_metadata"];
        assert_eq!(metadata["family_member_first_name"], "Grace");
        assert_eq!(metadata["family_member_date_of_birth"], Value::Null);
        assert_eq!(state.data["leave_details"]["reason"], "care");
    }

    #[test]
    fn test_wildcard_paths_clear_every_entry() {
        let paths = vec![FieldPath::parse("other_incomes[*].income_amount_dollars").unwrap()];
        let mut state = FormState::new(json!({
            "other_incomes": [
                {"income_type": "ssdi", "income_amount_dollars": 900.0},
                {"income_type": "unemployment", "income_amount_dollars": 300.0}
            ]
        }));

        let report = clear_owned_fields(&paths, &mut state);

        assert_eq!(report.cleared.len(), 1);
        assert_eq!(state.data["other_incomes"][0]["income_amount_dollars"], Value::Null);
        assert_eq!(state.data["other_incomes"][1]["income_amount_dollars"], Value::Null);
        assert_eq!(state.data["other_incomes"][1]["income_type"], "unemployment");
    }

    #[test]
    fn test_pending_only_values_are_cleared() {
        let paths = vec![FieldPath::parse("mailing_address").unwrap()];
        let mut state = FormState::new(json!({"has_mailing_address": false}));
        state.pending = json!({"mailing_address": {"line_1": "PO Box 1"}});

        let report = clear_owned_fields(&paths, &mut state);

        assert_eq!(report.cleared.len(), 1);
        assert_eq!(state.pending["mailing_address"], Value::Null);
        assert_eq!(state.data, json!({"has_mailing_address": false}));
    }
}
