//! Step model tests
//!
//! Checklist status inference for realistic claims.
mod common;
use claimflow::claim::*;
use claimflow::prelude::*;
use common::*;

#[cfg(test)]
mod step_tests {
    use super::*;

    fn compute(claim: &ClaimSnapshot) -> StepList {
        StepModel::new(&portal()).compute(&StepInputs::new(claim, &NoFeatures, today()))
    }

    fn missing(list: &StepList, name: StepName) -> Vec<String> {
        list.get(name)
            .map(|s| s.missing_fields.iter().map(|p| p.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_medical_continuous_leave() {
        let steps = compute(&medical_continuous_claim());

        assert_eq!(
            steps.status_of(StepName::IntermittentLeave),
            Some(StepStatus::NotApplicable)
        );
        assert_eq!(
            steps.status_of(StepName::LeavePeriod),
            Some(StepStatus::Completed)
        );
        assert_eq!(
            steps.status_of(StepName::LeaveDetails),
            Some(StepStatus::Completed)
        );
    }

    #[test]
    fn test_future_child_date_excludes_certification_upload() {
        let claim = bonding_newborn_claim(date(2027, 1, 15));
        assert!(claim.leave_details.has_future_child_date(today()));

        let steps = compute(&claim);
        assert!(steps.get(StepName::UploadCertification).is_none());
        assert!(steps.get(StepName::UploadId).is_some());

        let born = compute(&bonding_newborn_claim(date(2026, 9, 1)));
        assert!(born.get(StepName::UploadCertification).is_some());
    }

    #[test]
    fn test_recorded_future_child_date_does_not_outlive_bonding() {
        let mut claim = bonding_newborn_claim(date(2027, 1, 15));
        claim.leave_details.has_future_child_date = Some(true);
        assert!(compute(&claim).get(StepName::UploadCertification).is_none());

        claim.leave_details.reason = Some(LeaveReason::Medical);
        assert!(!claim.leave_details.has_future_child_date(today()));
        assert!(compute(&claim).get(StepName::UploadCertification).is_some());

        let mut submitted = submitted_claim();
        submitted.leave_details.has_future_child_date = Some(true);
        let steps = compute(&submitted);
        assert_ne!(
            steps.status_of(StepName::UploadCertification),
            Some(StepStatus::Completed)
        );
        assert!(!steps.ready_to_submit());
    }

    #[test]
    fn test_leave_reason_change_rederives_completion() {
        let claim = bonding_newborn_claim(date(2026, 9, 1));
        let steps = compute(&claim);
        assert_eq!(
            steps.status_of(StepName::LeaveDetails),
            Some(StepStatus::Completed)
        );

        // Bonding answers are still on the record, but no longer count.
        let mut switched = claim.clone();
        switched.leave_details.reason = Some(LeaveReason::Medical);
        let steps = compute(&switched);

        assert_eq!(
            steps.status_of(StepName::LeaveDetails),
            Some(StepStatus::InProgress)
        );
        assert_eq!(
            missing(&steps, StepName::LeaveDetails),
            vec!["leave_details.pregnant_or_recent_birth".to_string()]
        );
        let fields = &steps.get(StepName::LeaveDetails).unwrap().fields;
        assert!(
            !fields
                .iter()
                .any(|f| f.to_string() == "leave_details.child_birth_date")
        );
    }

    #[test]
    fn test_hybrid_leave_requires_both_types() {
        let mut claim = medical_continuous_claim();
        claim.leave_details.continuous_leave_periods[0].start_date = None;
        claim.leave_details.continuous_leave_periods[0].end_date = None;
        claim.leave_details.has_intermittent_leave_periods = Some(true);
        claim.leave_details.intermittent_leave_periods = vec![IntermittentLeavePeriod {
            leave_period_id: None,
            start_date: Some(date(2026, 11, 2)),
            end_date: Some(date(2027, 2, 26)),
            frequency: Some(2),
            frequency_interval_basis: Some(FrequencyBasis::Weeks),
            duration: Some(1),
            duration_basis: Some(DurationBasis::Days),
        }];

        let steps = compute(&claim);
        assert_eq!(
            steps.status_of(StepName::IntermittentLeave),
            Some(StepStatus::InProgress)
        );
        assert_eq!(
            steps.status_of(StepName::LeavePeriod),
            Some(StepStatus::InProgress)
        );

        claim.leave_details.continuous_leave_periods[0].start_date = Some(date(2026, 11, 2));
        claim.leave_details.continuous_leave_periods[0].end_date = Some(date(2026, 12, 18));
        let steps = compute(&claim);
        assert_eq!(
            steps.status_of(StepName::IntermittentLeave),
            Some(StepStatus::Completed)
        );
        assert_eq!(
            steps.status_of(StepName::LeavePeriod),
            Some(StepStatus::Completed)
        );
    }

    #[test]
    fn test_conflicting_leave_types_never_complete() {
        let mut claim = medical_continuous_claim();
        claim.leave_details.has_reduced_schedule_leave_periods = Some(true);
        claim.leave_details.reduced_schedule_leave_periods = vec![ReducedScheduleLeavePeriod {
            leave_period_id: None,
            start_date: Some(date(2026, 11, 2)),
            end_date: Some(date(2026, 12, 18)),
            minutes_off_per_week: Some(600),
        }];

        let steps = compute(&claim);
        assert_eq!(
            steps.status_of(StepName::LeavePeriod),
            Some(StepStatus::InProgress)
        );
    }

    #[test]
    fn test_saved_period_id_counts_during_retry() {
        let mut claim = medical_continuous_claim();
        claim.leave_details.continuous_leave_periods = vec![LeavePeriod {
            leave_period_id: Some("period-1".to_string()),
            start_date: None,
            end_date: None,
        }];

        let steps = compute(&claim);
        assert_eq!(
            steps.status_of(StepName::LeavePeriod),
            Some(StepStatus::Completed)
        );
    }

    #[test]
    fn test_warnings_downgrade_completed_steps() {
        let graph = portal();
        let claim = complete_part_one_claim();
        let model = StepModel::new(&graph);

        let clean = model.compute(&StepInputs::new(&claim, &NoFeatures, today()));
        assert_eq!(
            clean.status_of(StepName::VerifyId),
            Some(StepStatus::Completed)
        );

        let warnings = vec![
            Warning::new("tax_identifier", "checksum"),
            Warning::new("employer_benefits[0].benefit_type", "required"),
        ];
        let warned = model.compute(
            &StepInputs::new(&claim, &NoFeatures, today()).with_warnings(&warnings),
        );
        assert_eq!(
            warned.status_of(StepName::VerifyId),
            Some(StepStatus::InProgress)
        );
        // Nothing in the other steps is touched by these warnings.
        assert_eq!(
            warned.status_of(StepName::LeaveDetails),
            Some(StepStatus::Completed)
        );
    }

    #[test]
    fn test_complete_part_one_is_ready_for_review() {
        let steps = compute(&complete_part_one_claim());

        for name in [
            StepName::VerifyId,
            StepName::EmployerInformation,
            StepName::LeaveDetails,
            StepName::LeavePeriod,
        ] {
            assert_eq!(steps.status_of(name), Some(StepStatus::Completed), "{}", name);
        }
        assert_eq!(
            steps.status_of(StepName::OtherLeave),
            Some(StepStatus::NotApplicable)
        );
        assert!(steps.part_one_ready());
        assert_eq!(
            steps.status_of(StepName::ReviewAndConfirm),
            Some(StepStatus::NotStarted)
        );
        assert_eq!(
            steps.status_of(StepName::Payment),
            Some(StepStatus::Disabled)
        );
        assert!(!steps.ready_to_submit());
    }

    #[test]
    fn test_other_leave_depends_on_leave_details() {
        let graph = portal();
        let model = StepModel::new(&graph);
        let on = flags(&[features::OTHER_LEAVE]);

        let empty = ClaimSnapshot::new("claim-1");
        let steps = model.compute(&StepInputs::new(&empty, &on, today()));
        assert_eq!(
            steps.status_of(StepName::OtherLeave),
            Some(StepStatus::Disabled)
        );
        // Always satisfied, whatever else is outstanding.
        assert_eq!(
            steps.status_of(StepName::PreviousLeaves),
            Some(StepStatus::Completed)
        );

        let claim = medical_continuous_claim();
        let steps = model.compute(&StepInputs::new(&claim, &on, today()));
        assert_eq!(
            steps.status_of(StepName::OtherLeave),
            Some(StepStatus::NotStarted)
        );
    }

    #[test]
    fn test_indices_groups_and_hrefs() {
        let steps = compute(&complete_part_one_claim());

        for (i, step) in steps.steps().iter().enumerate() {
            assert_eq!(step.index, i + 1);
        }
        assert_eq!(steps.len(), 11);
        assert_eq!(steps.group(2).count(), 1);
        assert_eq!(steps.group(3).count(), 2);

        assert_eq!(
            steps.get(StepName::VerifyId).unwrap().href.as_deref(),
            Some("/applications/name?claim_id=claim-1")
        );
        assert_eq!(
            steps.get(StepName::EmployerInformation).unwrap().href.as_deref(),
            Some("/applications/notified-employer?claim_id=claim-1")
        );
        assert_eq!(
            steps.get(StepName::UploadId).unwrap().href.as_deref(),
            Some("/applications/claim-1/documents/id?showStateId=true")
        );
    }

    #[test]
    fn test_submission_locks_part_one() {
        let steps = compute(&submitted_claim());

        assert!(!steps.get(StepName::VerifyId).unwrap().editable);
        assert!(!steps.get(StepName::ReviewAndConfirm).unwrap().editable);
        assert!(!steps.get(StepName::Payment).unwrap().editable);
        assert!(steps.get(StepName::UploadId).unwrap().editable);

        let mut unpaid = submitted_claim();
        unpaid.has_submitted_payment_preference = None;
        let steps = compute(&unpaid);
        assert!(steps.get(StepName::Payment).unwrap().editable);
        assert_eq!(
            steps.status_of(StepName::Payment),
            Some(StepStatus::InProgress)
        );
    }

    #[test]
    fn test_ready_to_submit_after_uploads() {
        let graph = portal();
        let claim = submitted_claim();
        let model = StepModel::new(&graph);

        let without_docs = model.compute(&StepInputs::new(&claim, &NoFeatures, today()));
        assert_eq!(
            without_docs.status_of(StepName::ReviewAndConfirm),
            Some(StepStatus::Completed)
        );
        assert_eq!(
            without_docs.status_of(StepName::UploadId),
            Some(StepStatus::NotStarted)
        );
        assert!(!without_docs.ready_to_submit());

        let uploads = UploadState {
            id_documents: 2,
            certification_documents: 1,
        };
        let with_docs = model
            .compute(&StepInputs::new(&claim, &NoFeatures, today()).with_uploads(uploads));
        assert!(with_docs.ready_to_submit());
    }

    #[test]
    fn test_step_list_is_deterministic() {
        let claim = complete_part_one_claim();
        assert_eq!(compute(&claim), compute(&claim));
    }
}
