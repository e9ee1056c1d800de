use super::model::{LeaveDetails, LeaveReason, ReasonQualifier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeavePeriodType {
    Continuous,
    ReducedSchedule,
    Intermittent,
}

/// Which leave-period types a claim reports, classified against the one-type-per-claim rule.
///
/// Intermittent leave may be reported alongside exactly one other type ("hybrid" leave).
/// Every other multi-type combination is `Conflicting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeavePeriodMix {
    Unselected,
    Continuous,
    ReducedSchedule,
    Intermittent,
    Hybrid { other: LeavePeriodType },
    Conflicting,
}

impl LeavePeriodMix {
    pub fn is_hybrid(&self) -> bool {
        matches!(self, LeavePeriodMix::Hybrid { .. })
    }
}

impl fmt::Display for LeavePeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeavePeriodType::Continuous => write!(f, "continuous"),
            LeavePeriodType::ReducedSchedule => write!(f, "reduced_schedule"),
            LeavePeriodType::Intermittent => write!(f, "intermittent"),
        }
    }
}

impl fmt::Display for LeavePeriodMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeavePeriodMix::Unselected => write!(f, "unselected"),
            LeavePeriodMix::Continuous => write!(f, "continuous"),
            LeavePeriodMix::ReducedSchedule => write!(f, "reduced_schedule"),
            LeavePeriodMix::Intermittent => write!(f, "intermittent"),
            LeavePeriodMix::Hybrid { other } => write!(f, "hybrid(intermittent+{})", other),
            LeavePeriodMix::Conflicting => write!(f, "conflicting"),
        }
    }
}

/// A leave type is active when the claimant answered yes, or has not answered but
/// periods of that type already exist.
fn is_active(flag: Option<bool>, has_periods: bool) -> bool {
    flag.unwrap_or(has_periods)
}

impl LeaveDetails {
    pub fn is_active(&self, kind: LeavePeriodType) -> bool {
        match kind {
            LeavePeriodType::Continuous => is_active(
                self.has_continuous_leave_periods,
                !self.continuous_leave_periods.is_empty(),
            ),
            LeavePeriodType::ReducedSchedule => is_active(
                self.has_reduced_schedule_leave_periods,
                !self.reduced_schedule_leave_periods.is_empty(),
            ),
            LeavePeriodType::Intermittent => is_active(
                self.has_intermittent_leave_periods,
                !self.intermittent_leave_periods.is_empty(),
            ),
        }
    }

    pub fn active_leave_period_types(&self) -> Vec<LeavePeriodType> {
        [
            LeavePeriodType::Continuous,
            LeavePeriodType::ReducedSchedule,
            LeavePeriodType::Intermittent,
        ]
        .into_iter()
        .filter(|kind| self.is_active(*kind))
        .collect()
    }

    pub fn leave_period_mix(&self) -> LeavePeriodMix {
        match self.active_leave_period_types().as_slice() {
            [] => LeavePeriodMix::Unselected,
            [LeavePeriodType::Continuous] => LeavePeriodMix::Continuous,
            [LeavePeriodType::ReducedSchedule] => LeavePeriodMix::ReducedSchedule,
            [LeavePeriodType::Intermittent] => LeavePeriodMix::Intermittent,
            [other, LeavePeriodType::Intermittent] => LeavePeriodMix::Hybrid { other: *other },
            _ => LeavePeriodMix::Conflicting,
        }
    }

    /// True when the child's birth or placement date is still ahead of `today`.
    ///
    /// Only bonding leave with a qualifier has a child date. For such claims a value
    /// already recorded on the claim takes precedence over the derivation.
    pub fn has_future_child_date(&self, today: NaiveDate) -> bool {
        if self.reason != Some(LeaveReason::Bonding) {
            return false;
        }
        let date = match self.reason_qualifier {
            Some(ReasonQualifier::Newborn) => self.child_birth_date,
            Some(ReasonQualifier::Adoption | ReasonQualifier::FosterCare) => {
                self.child_placement_date
            }
            None => return false,
        };
        self.has_future_child_date.unwrap_or_else(|| date.is_some_and(|d| d > today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::model::IntermittentLeavePeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_leave_period_mix() {
        let mut details = LeaveDetails::default();
        assert_eq!(details.leave_period_mix(), LeavePeriodMix::Unselected);

        details.has_continuous_leave_periods = Some(true);
        assert_eq!(details.leave_period_mix(), LeavePeriodMix::Continuous);

        details.has_intermittent_leave_periods = Some(true);
        assert_eq!(
            details.leave_period_mix(),
            LeavePeriodMix::Hybrid {
                other: LeavePeriodType::Continuous
            }
        );

        details.has_reduced_schedule_leave_periods = Some(true);
        assert_eq!(details.leave_period_mix(), LeavePeriodMix::Conflicting);

        details.has_intermittent_leave_periods = Some(false);
        assert_eq!(details.leave_period_mix(), LeavePeriodMix::Conflicting);
    }

    #[test]
    fn test_unanswered_flag_falls_back_to_existing_periods() {
        let details = LeaveDetails {
            intermittent_leave_periods: vec![IntermittentLeavePeriod::default()],
            ..Default::default()
        };
        assert_eq!(details.leave_period_mix(), LeavePeriodMix::Intermittent);

        let declined = LeaveDetails {
            has_intermittent_leave_periods: Some(false),
            ..details
        };
        assert_eq!(declined.leave_period_mix(), LeavePeriodMix::Unselected);
    }

    #[test]
    fn test_future_child_date() {
        let today = date(2026, 10, 18);
        let mut details = LeaveDetails {
            reason: Some(LeaveReason::Bonding),
            reason_qualifier: Some(ReasonQualifier::Newborn),
            child_birth_date: Some(date(2026, 12, 1)),
            ..Default::default()
        };
        assert!(details.has_future_child_date(today));

        details.child_birth_date = Some(date(2026, 9, 1));
        assert!(!details.has_future_child_date(today));

        details.reason = Some(LeaveReason::Medical);
        details.child_birth_date = Some(date(2026, 12, 1));
        assert!(!details.has_future_child_date(today));
    }

    #[test]
    fn test_recorded_child_date_flag_only_applies_to_bonding() {
        let today = date(2026, 10, 18);
        let mut details = LeaveDetails {
            reason: Some(LeaveReason::Bonding),
            reason_qualifier: Some(ReasonQualifier::Adoption),
            child_placement_date: Some(date(2026, 9, 1)),
            has_future_child_date: Some(true),
            ..Default::default()
        };
        assert!(details.has_future_child_date(today));

        details.reason = Some(LeaveReason::Medical);
        assert!(!details.has_future_child_date(today));

        details.reason = Some(LeaveReason::Bonding);
        details.reason_qualifier = None;
        assert!(!details.has_future_child_date(today));
    }
}
