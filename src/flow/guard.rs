use super::context::ClaimContext;
use crate::claim::{
    ClaimPhase, ClaimSnapshot, EmploymentStatus, LeavePeriodMix, LeavePeriodType, LeaveReason,
    ReasonQualifier, WorkPatternType,
};
use crate::trace::GuardTrace;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boolean facts derived from a claim that guards can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCondition {
    HasContinuousLeave,
    HasReducedScheduleLeave,
    HasIntermittentLeave,
    AnyLeavePeriodType,
    HybridLeave,
    ConflictingLeavePeriods,
    HasFutureChildDate,
    OrganizationUnitRequired,
    HasMailingAddress,
    HasStateId,
    EmployerNotified,
    WorkPatternFixed,
    PaymentByDeposit,
    HasEmployerBenefits,
    HasOtherIncomes,
    HasPreviousLeavesSameReason,
    HasPreviousLeavesOtherReason,
    Part1Submitted,
    PaymentSubmitted,
}

impl ClaimCondition {
    pub fn evaluate(&self, claim: &ClaimSnapshot, today: NaiveDate) -> bool {
        let leave = &claim.leave_details;
        match self {
            ClaimCondition::HasContinuousLeave => leave.is_active(LeavePeriodType::Continuous),
            ClaimCondition::HasReducedScheduleLeave => {
                leave.is_active(LeavePeriodType::ReducedSchedule)
            }
            ClaimCondition::HasIntermittentLeave => leave.is_active(LeavePeriodType::Intermittent),
            ClaimCondition::AnyLeavePeriodType => {
                leave.leave_period_mix() != LeavePeriodMix::Unselected
            }
            ClaimCondition::HybridLeave => leave.leave_period_mix().is_hybrid(),
            ClaimCondition::ConflictingLeavePeriods => {
                leave.leave_period_mix() == LeavePeriodMix::Conflicting
            }
            ClaimCondition::HasFutureChildDate => leave.has_future_child_date(today),
            ClaimCondition::OrganizationUnitRequired => claim.organization_unit_required(),
            ClaimCondition::HasMailingAddress => claim.has_mailing_address == Some(true),
            ClaimCondition::HasStateId => claim.has_state_id == Some(true),
            ClaimCondition::EmployerNotified => leave.employer_notified == Some(true),
            ClaimCondition::WorkPatternFixed => {
                claim
                    .work_pattern
                    .as_ref()
                    .and_then(|w| w.work_pattern_type)
                    == Some(WorkPatternType::Fixed)
            }
            ClaimCondition::PaymentByDeposit => claim.pays_by_direct_deposit(),
            ClaimCondition::HasEmployerBenefits => claim.has_employer_benefits == Some(true),
            ClaimCondition::HasOtherIncomes => claim.has_other_incomes == Some(true),
            ClaimCondition::HasPreviousLeavesSameReason => {
                claim.has_previous_leaves_same_reason == Some(true)
            }
            ClaimCondition::HasPreviousLeavesOtherReason => {
                claim.has_previous_leaves_other_reason == Some(true)
            }
            ClaimCondition::Part1Submitted => claim.has_reached(ClaimPhase::Part1Submitted),
            ClaimCondition::PaymentSubmitted => claim.has_reached(ClaimPhase::PaymentSubmitted),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ClaimCondition::HasContinuousLeave => "has_continuous_leave_periods",
            ClaimCondition::HasReducedScheduleLeave => "has_reduced_schedule_leave_periods",
            ClaimCondition::HasIntermittentLeave => "has_intermittent_leave_periods",
            ClaimCondition::AnyLeavePeriodType => "any_leave_period_type",
            ClaimCondition::HybridLeave => "hybrid_leave",
            ClaimCondition::ConflictingLeavePeriods => "conflicting_leave_periods",
            ClaimCondition::HasFutureChildDate => "has_future_child_date",
            ClaimCondition::OrganizationUnitRequired => "organization_unit_required",
            ClaimCondition::HasMailingAddress => "has_mailing_address",
            ClaimCondition::HasStateId => "has_state_id",
            ClaimCondition::EmployerNotified => "employer_notified",
            ClaimCondition::WorkPatternFixed => "work_pattern_fixed",
            ClaimCondition::PaymentByDeposit => "payment_by_deposit",
            ClaimCondition::HasEmployerBenefits => "has_employer_benefits",
            ClaimCondition::HasOtherIncomes => "has_other_incomes",
            ClaimCondition::HasPreviousLeavesSameReason => "has_previous_leaves_same_reason",
            ClaimCondition::HasPreviousLeavesOtherReason => "has_previous_leaves_other_reason",
            ClaimCondition::Part1Submitted => "part_one_submitted",
            ClaimCondition::PaymentSubmitted => "payment_submitted",
        }
    }
}

impl fmt::Display for ClaimCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A predicate over a `ClaimContext` attached to a graph edge.
///
/// Guards are plain data so a graph can be inspected, printed and compared. Evaluation
/// always produces a [`GuardTrace`] recording the values that decided the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    #[default]
    Always,
    LeaveReason(LeaveReason),
    ReasonQualifier(ReasonQualifier),
    EmploymentStatus(EmploymentStatus),
    Claim(ClaimCondition),
    Feature(String),
    /// A transient navigation hint, e.g. which upload type the claimant picked.
    Hint { key: String, value: String },
    Not(Box<Guard>),
    And(Box<Guard>, Box<Guard>),
    Or(Box<Guard>, Box<Guard>),
}

impl Guard {
    pub fn claim(condition: ClaimCondition) -> Self {
        Guard::Claim(condition)
    }

    pub fn feature(name: &str) -> Self {
        Guard::Feature(name.to_string())
    }

    pub fn hint(key: &str, value: &str) -> Self {
        Guard::Hint {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn negate(self) -> Self {
        Guard::Not(Box::new(self))
    }

    pub fn and(self, other: Guard) -> Self {
        Guard::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Guard) -> Self {
        Guard::Or(Box::new(self), Box::new(other))
    }

    pub fn holds(&self, ctx: &ClaimContext<'_>) -> bool {
        self.evaluate(ctx).outcome()
    }

    /// Evaluates the guard, short-circuiting `AND`/`OR` the way the trace formatter expects.
    pub fn evaluate(&self, ctx: &ClaimContext<'_>) -> GuardTrace {
        match self {
            Guard::Always => GuardTrace::Always,
            Guard::LeaveReason(expected) => {
                let observed = ctx.claim.leave_details.reason;
                leaf(
                    "leave_details.reason",
                    observed.map(|r| label(&r)),
                    Some(label(expected)),
                    observed == Some(*expected),
                )
            }
            Guard::ReasonQualifier(expected) => {
                let observed = ctx.claim.leave_details.reason_qualifier;
                leaf(
                    "leave_details.reason_qualifier",
                    observed.map(|q| label(&q)),
                    Some(label(expected)),
                    observed == Some(*expected),
                )
            }
            Guard::EmploymentStatus(expected) => {
                let observed = ctx.claim.employment_status;
                leaf(
                    "employment_status",
                    observed.map(|s| label(&s)),
                    Some(label(expected)),
                    observed == Some(*expected),
                )
            }
            Guard::Claim(condition) => {
                let outcome = condition.evaluate(ctx.claim, ctx.today);
                leaf(condition.name(), Some(outcome.to_string()), None, outcome)
            }
            Guard::Feature(name) => {
                let outcome = ctx.flags.is_enabled(name);
                let observed = if outcome { "on" } else { "off" };
                leaf(
                    &format!("feature {}", name),
                    Some(observed.to_string()),
                    None,
                    outcome,
                )
            }
            Guard::Hint { key, value } => {
                let observed = ctx.hints.get(key);
                leaf(
                    &format!("hint {}", key),
                    observed.map(str::to_string),
                    Some(value.clone()),
                    observed == Some(value.as_str()),
                )
            }
            Guard::Not(inner) => {
                let child = inner.evaluate(ctx);
                let outcome = !child.outcome();
                GuardTrace::Unary {
                    op_symbol: "NOT",
                    child: Box::new(child),
                    outcome,
                }
            }
            Guard::And(l, r) => {
                let left = l.evaluate(ctx);
                if !left.outcome() {
                    return GuardTrace::Binary {
                        op_symbol: "AND",
                        left: Box::new(left),
                        right: Box::new(GuardTrace::NotEvaluated),
                        outcome: false,
                    };
                }
                let right = r.evaluate(ctx);
                let outcome = right.outcome();
                GuardTrace::Binary {
                    op_symbol: "AND",
                    left: Box::new(left),
                    right: Box::new(right),
                    outcome,
                }
            }
            Guard::Or(l, r) => {
                let left = l.evaluate(ctx);
                if left.outcome() {
                    return GuardTrace::Binary {
                        op_symbol: "OR",
                        left: Box::new(left),
                        right: Box::new(GuardTrace::NotEvaluated),
                        outcome: true,
                    };
                }
                let right = r.evaluate(ctx);
                let outcome = right.outcome();
                GuardTrace::Binary {
                    op_symbol: "OR",
                    left: Box::new(left),
                    right: Box::new(right),
                    outcome,
                }
            }
        }
    }
}

fn leaf(
    subject: &str,
    observed: Option<String>,
    expected: Option<String>,
    outcome: bool,
) -> GuardTrace {
    GuardTrace::Leaf {
        subject: subject.to_string(),
        observed: observed.unwrap_or_else(|| "unset".to_string()),
        expected,
        outcome,
    }
}

/// The snake_case wire name of a claim enum value.
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "?".to_string(),
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Always => write!(f, "always"),
            Guard::LeaveReason(r) => write!(f, "leave_details.reason == {}", label(r)),
            Guard::ReasonQualifier(q) => {
                write!(f, "leave_details.reason_qualifier == {}", label(q))
            }
            Guard::EmploymentStatus(s) => write!(f, "employment_status == {}", label(s)),
            Guard::Claim(c) => write!(f, "{}", c),
            Guard::Feature(name) => write!(f, "feature {}", name),
            Guard::Hint { key, value } => write!(f, "hint {} == {}", key, value),
            Guard::Not(inner) => match **inner {
                Guard::And(..) | Guard::Or(..) => write!(f, "NOT ({})", inner),
                _ => write!(f, "NOT {}", inner),
            },
            Guard::And(l, r) => write!(f, "{} AND {}", paren_or(l), paren_or(r)),
            Guard::Or(l, r) => write!(f, "{} OR {}", l, r),
        }
    }
}

/// `OR` binds looser than `AND`, so it needs parentheses inside one.
fn paren_or(guard: &Guard) -> String {
    match guard {
        Guard::Or(..) => format!("({})", guard),
        _ => guard.to_string(),
    }
}
