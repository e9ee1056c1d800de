//! Common test utilities for building claims, flags and graphs.
use ahash::AHashSet;
use chrono::NaiveDate;
use claimflow::claim::*;
use claimflow::prelude::*;

/// The fixed "today" every test evaluates future-date rules against.
#[allow(dead_code)]
pub fn today() -> NaiveDate {
    date(2026, 10, 18)
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

#[allow(dead_code)]
pub fn portal() -> FlowGraph {
    build_portal_graph().expect("portal graph must build")
}

/// A flag set with exactly the given flags enabled.
#[allow(dead_code)]
pub fn flags(enabled: &[&str]) -> AHashSet<String> {
    enabled.iter().map(|f| f.to_string()).collect()
}

/// Medical leave with one fully dated continuous period and nothing else.
#[allow(dead_code)]
pub fn medical_continuous_claim() -> ClaimSnapshot {
    let mut claim = ClaimSnapshot::new("claim-1");
    claim.leave_details.reason = Some(LeaveReason::Medical);
    claim.leave_details.pregnant_or_recent_birth = Some(false);
    claim.leave_details.has_continuous_leave_periods = Some(true);
    claim.leave_details.continuous_leave_periods = vec![LeavePeriod {
        leave_period_id: None,
        start_date: Some(date(2026, 11, 2)),
        end_date: Some(date(2026, 12, 18)),
    }];
    claim
}

/// Bonding leave for a newborn born (or due) on `birth`.
#[allow(dead_code)]
pub fn bonding_newborn_claim(birth: NaiveDate) -> ClaimSnapshot {
    let mut claim = ClaimSnapshot::new("claim-1");
    claim.leave_details.reason = Some(LeaveReason::Bonding);
    claim.leave_details.reason_qualifier = Some(ReasonQualifier::Newborn);
    claim.leave_details.child_birth_date = Some(birth);
    claim
}

/// A claim with every Part 1 question answered, with all feature flags off.
#[allow(dead_code)]
pub fn complete_part_one_claim() -> ClaimSnapshot {
    let mut claim = medical_continuous_claim();

    claim.first_name = Some("Ada".to_string());
    claim.last_name = Some("Lovelace".to_string());
    claim.date_of_birth = Some(date(1985, 12, 10));
    claim.phone = Some(Phone {
        phone_number: Some("555-555-0100".to_string()),
        phone_type: Some("Cell".to_string()),
    });
    claim.residential_address = Some(Address {
        line_1: Some("1 Main St".to_string()),
        line_2: None,
        city: Some("Boston".to_string()),
        state: Some("MA".to_string()),
        zip: Some("02110".to_string()),
    });
    claim.has_mailing_address = Some(false);
    claim.has_state_id = Some(true);
    claim.mass_id = Some("S12345678".to_string());
    claim.tax_identifier = Some("123-45-6789".to_string());

    claim.employer_fein = Some("12-3456789".to_string());
    claim.leave_details.employer_notified = Some(true);
    claim.leave_details.employer_notification_date = Some(date(2026, 10, 1));
    claim.work_pattern = Some(WorkPattern {
        work_pattern_type: Some(WorkPatternType::Fixed),
        work_pattern_days: vec![WorkPatternDay {
            day_of_week: "Monday".to_string(),
            minutes: Some(480),
        }],
        hours_worked_per_week: None,
    });

    claim
}

/// A claim that has passed every gate: Part 1 submitted, payment submitted.
#[allow(dead_code)]
pub fn submitted_claim() -> ClaimSnapshot {
    let mut claim = complete_part_one_claim();
    claim.status = Some(ClaimStatus::Submitted);
    claim.payment_preference = Some(PaymentPreference {
        payment_method: Some(PaymentMethod::Check),
        routing_number: None,
        account_number: None,
        bank_account_type: None,
    });
    claim.has_submitted_payment_preference = Some(true);
    claim
}

/// Every combination of the three portal feature flags.
#[allow(dead_code)]
pub fn all_flag_combinations() -> Vec<AHashSet<String>> {
    let names = [
        features::EMPLOYMENT_STATUS,
        features::OTHER_LEAVE,
        features::ORGANIZATION_UNITS,
    ];
    (0..1u8 << names.len())
        .map(|mask| {
            names
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, n)| n.to_string())
                .collect()
        })
        .collect()
}
