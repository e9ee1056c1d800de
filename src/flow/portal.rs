//! The claimant portal's application wizard, expressed as one guarded page graph.

use super::context::features;
use super::definition::PageNode;
use super::graph::FlowGraph;
use super::guard::{ClaimCondition as C, Guard};
use crate::claim::{ClaimPhase, DocumentKind, EmploymentStatus, LeaveReason, ReasonQualifier};
use crate::error::GraphBuildError;
use crate::steps::{Completion, StepDefinition, StepName};

/// Page names of the portal graph.
pub mod pages {
    pub const CHECKLIST: &str = "checklist";

    pub const NAME: &str = "name";
    pub const DATE_OF_BIRTH: &str = "date-of-birth";
    pub const PHONE_NUMBER: &str = "phone-number";
    pub const ADDRESS: &str = "address";
    pub const STATE_ID: &str = "state-id";
    pub const SSN: &str = "ssn";

    pub const EMPLOYMENT_STATUS: &str = "employment-status";
    pub const NOTIFIED_EMPLOYER: &str = "notified-employer";
    pub const DEPARTMENT: &str = "department";
    pub const WORK_PATTERN_TYPE: &str = "work-pattern-type";
    pub const SCHEDULE_FIXED: &str = "schedule-fixed";
    pub const SCHEDULE_VARIABLE: &str = "schedule-variable";

    pub const LEAVE_REASON: &str = "leave-reason";
    pub const REASON_PREGNANCY: &str = "reason-pregnancy";
    pub const BONDING_TYPE: &str = "bonding-type";
    pub const DATE_OF_CHILD: &str = "date-of-child";
    pub const FAMILY_MEMBER_RELATIONSHIP: &str = "family-member-relationship";
    pub const FAMILY_MEMBER_NAME: &str = "family-member-name";
    pub const FAMILY_MEMBER_DATE_OF_BIRTH: &str = "family-member-date-of-birth";

    pub const LEAVE_PERIOD_CONTINUOUS: &str = "leave-period-continuous";
    pub const LEAVE_PERIOD_REDUCED_SCHEDULE: &str = "leave-period-reduced-schedule";
    pub const REDUCED_LEAVE_SCHEDULE: &str = "reduced-leave-schedule";
    pub const LEAVE_PERIOD_INTERMITTENT: &str = "leave-period-intermittent";
    pub const INTERMITTENT_FREQUENCY: &str = "intermittent-frequency";

    pub const EMPLOYER_BENEFITS: &str = "employer-benefits";
    pub const EMPLOYER_BENEFITS_DETAILS: &str = "employer-benefits-details";
    pub const OTHER_INCOMES: &str = "other-incomes";
    pub const OTHER_INCOMES_DETAILS: &str = "other-incomes-details";
    pub const PREVIOUS_LEAVES_SAME_REASON: &str = "previous-leaves-same-reason";
    pub const PREVIOUS_LEAVES_OTHER_REASON: &str = "previous-leaves-other-reason";

    pub const REVIEW: &str = "review";
    pub const PAYMENT_METHOD: &str = "payment-method";
    pub const UPLOAD_ID: &str = "upload-id";
    pub const UPLOAD_CERTIFICATION: &str = "upload-certification";
    pub const UPLOAD_DOCS_OPTIONS: &str = "upload-docs-options";
    pub const STATUS: &str = "status";
}

use pages::*;

/// Hint the upload-options page passes forward with the document type picked.
pub const UPLOAD_DOCS_OPTIONS_HINT: &str = "upload_docs_options";
/// Query flag marking an upload made after the application was completed.
pub const ADDITIONAL_DOC: &str = "additionalDoc";

fn route(slug: &str) -> String {
    format!("/applications/{}", slug)
}

fn page(name: &str, step: StepName) -> PageNode {
    PageNode::new(name, &route(name))
        .step(step)
        .claim_param("claim_id", "application_id")
}

/// Builds the claimant application graph and its checklist steps.
pub fn build_portal_graph() -> Result<FlowGraph, GraphBuildError> {
    let reduced = C::HasReducedScheduleLeave;
    let no_leave_type = Guard::claim(C::AnyLeavePeriodType).negate();

    FlowGraph::builder(CHECKLIST)
        .page(
            PageNode::new(CHECKLIST, &route(CHECKLIST))
                .hub()
                .claim_param("claim_id", "application_id")
                .param("part-one-submitted")
                .param("payment-pref-submitted")
                .next(NAME)
                .edge(EMPLOYMENT_STATUS, Guard::feature(features::EMPLOYMENT_STATUS))
                .edge(
                    NOTIFIED_EMPLOYER,
                    Guard::feature(features::EMPLOYMENT_STATUS).negate(),
                )
                .next(LEAVE_REASON)
                .next(LEAVE_PERIOD_CONTINUOUS)
                .next(INTERMITTENT_FREQUENCY)
                .next(EMPLOYER_BENEFITS)
                .next(PREVIOUS_LEAVES_SAME_REASON)
                .next(REVIEW)
                .next(PAYMENT_METHOD)
                .next(UPLOAD_ID)
                .edge(
                    UPLOAD_CERTIFICATION,
                    Guard::claim(C::HasFutureChildDate).negate(),
                )
                .edge(UPLOAD_DOCS_OPTIONS, Guard::claim(C::Part1Submitted)),
        )
        // Verify identity
        .page(
            page(NAME, StepName::VerifyId)
                .field("first_name")
                .field("last_name")
                .next(DATE_OF_BIRTH),
        )
        .page(
            page(DATE_OF_BIRTH, StepName::VerifyId)
                .field("date_of_birth")
                .next(PHONE_NUMBER),
        )
        .page(
            page(PHONE_NUMBER, StepName::VerifyId)
                .field("phone.phone_number")
                .field("phone.phone_type")
                .next(ADDRESS),
        )
        .page(
            page(ADDRESS, StepName::VerifyId)
                .field("residential_address.line_1")
                .field("residential_address.city")
                .field("residential_address.state")
                .field("residential_address.zip")
                .field("has_mailing_address")
                .field_when("mailing_address.line_1", Guard::claim(C::HasMailingAddress))
                .field_when("mailing_address.city", Guard::claim(C::HasMailingAddress))
                .field_when("mailing_address.state", Guard::claim(C::HasMailingAddress))
                .field_when("mailing_address.zip", Guard::claim(C::HasMailingAddress))
                .next(STATE_ID),
        )
        .page(
            page(STATE_ID, StepName::VerifyId)
                .field("has_state_id")
                .field_when("mass_id", Guard::claim(C::HasStateId))
                .next(SSN),
        )
        .page(
            page(SSN, StepName::VerifyId)
                .field("tax_identifier")
                .next(CHECKLIST),
        )
        // Employer information
        .page(
            page(EMPLOYMENT_STATUS, StepName::EmployerInformation)
                .field("employment_status")
                .field_when(
                    "employer_fein",
                    Guard::EmploymentStatus(EmploymentStatus::Employed),
                )
                .edge(
                    NOTIFIED_EMPLOYER,
                    Guard::EmploymentStatus(EmploymentStatus::Employed),
                )
                .next(CHECKLIST),
        )
        .page(
            page(NOTIFIED_EMPLOYER, StepName::EmployerInformation)
                .field_when(
                    "employer_fein",
                    Guard::feature(features::EMPLOYMENT_STATUS).negate(),
                )
                .field("leave_details.employer_notified")
                .field_when(
                    "leave_details.employer_notification_date",
                    Guard::claim(C::EmployerNotified),
                )
                .edge(
                    DEPARTMENT,
                    Guard::feature(features::ORGANIZATION_UNITS)
                        .and(Guard::claim(C::OrganizationUnitRequired)),
                )
                .next(WORK_PATTERN_TYPE),
        )
        .page(
            page(DEPARTMENT, StepName::EmployerInformation)
                .field("organization_unit_id")
                .next(WORK_PATTERN_TYPE),
        )
        .page(
            page(WORK_PATTERN_TYPE, StepName::EmployerInformation)
                .field("work_pattern.work_pattern_type")
                .edge(SCHEDULE_FIXED, Guard::claim(C::WorkPatternFixed))
                .next(SCHEDULE_VARIABLE),
        )
        .page(
            page(SCHEDULE_FIXED, StepName::EmployerInformation)
                .field("work_pattern.work_pattern_days")
                .next(CHECKLIST),
        )
        .page(
            page(SCHEDULE_VARIABLE, StepName::EmployerInformation)
                .field("work_pattern.hours_worked_per_week")
                .next(CHECKLIST),
        )
        // Leave details
        .page(
            page(LEAVE_REASON, StepName::LeaveDetails)
                .field("leave_details.reason")
                .edge(REASON_PREGNANCY, Guard::LeaveReason(LeaveReason::Medical))
                .edge(BONDING_TYPE, Guard::LeaveReason(LeaveReason::Bonding))
                .edge(
                    FAMILY_MEMBER_RELATIONSHIP,
                    Guard::LeaveReason(LeaveReason::Care),
                )
                .next(CHECKLIST),
        )
        .page(
            page(REASON_PREGNANCY, StepName::LeaveDetails)
                .field("leave_details.pregnant_or_recent_birth")
                .next(CHECKLIST),
        )
        .page(
            page(BONDING_TYPE, StepName::LeaveDetails)
                .field("leave_details.reason_qualifier")
                .next(DATE_OF_CHILD),
        )
        .page(
            page(DATE_OF_CHILD, StepName::LeaveDetails)
                .field_when(
                    "leave_details.child_birth_date",
                    Guard::ReasonQualifier(ReasonQualifier::Newborn),
                )
                .field_when(
                    "leave_details.child_placement_date",
                    Guard::ReasonQualifier(ReasonQualifier::Newborn).negate(),
                )
                .next(CHECKLIST),
        )
        .page(
            page(FAMILY_MEMBER_RELATIONSHIP, StepName::LeaveDetails)
                .field("leave_details.caring_leave_metadata.relationship_to_caregiver")
                .next(FAMILY_MEMBER_NAME),
        )
        .page(
            page(FAMILY_MEMBER_NAME, StepName::LeaveDetails)
                .field("leave_details.caring_leave_metadata.family_member_first_name")
                .field("leave_details.caring_leave_metadata.family_member_last_name")
                .next(FAMILY_MEMBER_DATE_OF_BIRTH),
        )
        .page(
            page(FAMILY_MEMBER_DATE_OF_BIRTH, StepName::LeaveDetails)
                .field("leave_details.caring_leave_metadata.family_member_date_of_birth")
                .next(CHECKLIST),
        )
        // Leave periods. Each type's flag is only required until one type is chosen.
        .page(
            page(LEAVE_PERIOD_CONTINUOUS, StepName::LeavePeriod)
                .field_when(
                    "leave_details.has_continuous_leave_periods",
                    no_leave_type.clone(),
                )
                .saved_field(
                    "leave_details.continuous_leave_periods[0].start_date",
                    Guard::claim(C::HasContinuousLeave),
                    "leave_details.continuous_leave_periods[0].leave_period_id",
                )
                .saved_field(
                    "leave_details.continuous_leave_periods[0].end_date",
                    Guard::claim(C::HasContinuousLeave),
                    "leave_details.continuous_leave_periods[0].leave_period_id",
                )
                .next(LEAVE_PERIOD_REDUCED_SCHEDULE),
        )
        .page(
            page(LEAVE_PERIOD_REDUCED_SCHEDULE, StepName::LeavePeriod)
                .field_when(
                    "leave_details.has_reduced_schedule_leave_periods",
                    no_leave_type.clone(),
                )
                .saved_field(
                    "leave_details.reduced_schedule_leave_periods[0].start_date",
                    Guard::claim(reduced),
                    "leave_details.reduced_schedule_leave_periods[0].leave_period_id",
                )
                .saved_field(
                    "leave_details.reduced_schedule_leave_periods[0].end_date",
                    Guard::claim(reduced),
                    "leave_details.reduced_schedule_leave_periods[0].leave_period_id",
                )
                .edge(REDUCED_LEAVE_SCHEDULE, Guard::claim(reduced))
                .next(LEAVE_PERIOD_INTERMITTENT),
        )
        .page(
            page(REDUCED_LEAVE_SCHEDULE, StepName::LeavePeriod)
                .saved_field(
                    "leave_details.reduced_schedule_leave_periods[0].minutes_off_per_week",
                    Guard::claim(reduced),
                    "leave_details.reduced_schedule_leave_periods[0].leave_period_id",
                )
                .next(LEAVE_PERIOD_INTERMITTENT),
        )
        .page(
            page(LEAVE_PERIOD_INTERMITTENT, StepName::LeavePeriod)
                .field_when(
                    "leave_details.has_intermittent_leave_periods",
                    no_leave_type,
                )
                .edge(INTERMITTENT_FREQUENCY, Guard::claim(C::HasIntermittentLeave))
                .next(CHECKLIST),
        )
        .page(intermittent_frequency_page())
        // Other leave, benefits and income
        .page(
            page(EMPLOYER_BENEFITS, StepName::OtherLeave)
                .field("has_employer_benefits")
                .edge(EMPLOYER_BENEFITS_DETAILS, Guard::claim(C::HasEmployerBenefits))
                .next(OTHER_INCOMES),
        )
        .page(
            page(EMPLOYER_BENEFITS_DETAILS, StepName::OtherLeave)
                .field("employer_benefits[*].benefit_type")
                .field("employer_benefits[*].benefit_start_date")
                .field("employer_benefits[*].benefit_amount_dollars")
                .field("employer_benefits[*].benefit_amount_frequency")
                .next(OTHER_INCOMES),
        )
        .page(
            page(OTHER_INCOMES, StepName::OtherLeave)
                .field("has_other_incomes")
                .edge(OTHER_INCOMES_DETAILS, Guard::claim(C::HasOtherIncomes))
                .next(CHECKLIST),
        )
        .page(
            page(OTHER_INCOMES_DETAILS, StepName::OtherLeave)
                .field("other_incomes[*].income_type")
                .field("other_incomes[*].income_start_date")
                .field("other_incomes[*].income_amount_dollars")
                .field("other_incomes[*].income_amount_frequency")
                .next(CHECKLIST),
        )
        .page(
            page(PREVIOUS_LEAVES_SAME_REASON, StepName::PreviousLeaves)
                .field("has_previous_leaves_same_reason")
                .next(PREVIOUS_LEAVES_OTHER_REASON),
        )
        .page(
            page(PREVIOUS_LEAVES_OTHER_REASON, StepName::PreviousLeaves)
                .field("has_previous_leaves_other_reason")
                .next(CHECKLIST),
        )
        // Review, payment and documents
        .page(page(REVIEW, StepName::ReviewAndConfirm).next(CHECKLIST))
        .page(
            page(PAYMENT_METHOD, StepName::Payment)
                .group(2)
                .field("payment_preference.payment_method")
                .field_when(
                    "payment_preference.routing_number",
                    Guard::claim(C::PaymentByDeposit),
                )
                .field_when(
                    "payment_preference.account_number",
                    Guard::claim(C::PaymentByDeposit),
                )
                .field_when(
                    "payment_preference.bank_account_type",
                    Guard::claim(C::PaymentByDeposit),
                )
                .next(CHECKLIST),
        )
        .page(
            upload_page(
                UPLOAD_ID,
                "/applications/{claim_id}/documents/id",
                StepName::UploadId,
            )
            .claim_param("showStateId", "has_state_id"),
        )
        .page(upload_page(
            UPLOAD_CERTIFICATION,
            "/applications/{claim_id}/documents/certification",
            StepName::UploadCertification,
        ))
        .page(
            PageNode::new(UPLOAD_DOCS_OPTIONS, &route(UPLOAD_DOCS_OPTIONS))
                .group(3)
                .claim_param("claim_id", "application_id")
                .edge(UPLOAD_ID, Guard::hint(UPLOAD_DOCS_OPTIONS_HINT, "id"))
                .edge(
                    UPLOAD_CERTIFICATION,
                    Guard::hint(UPLOAD_DOCS_OPTIONS_HINT, "certification")
                        .and(Guard::claim(C::HasFutureChildDate).negate()),
                )
                .next(CHECKLIST),
        )
        .page(
            PageNode::new(STATUS, &route(STATUS))
                .group(3)
                .claim_param("claim_id", "application_id")
                .claim_param("uploadedAbsenceId", "fineos_absence_id"),
        )
        .step(StepDefinition::new(StepName::VerifyId, 1).locks_after(ClaimPhase::Part1Submitted))
        .step(
            StepDefinition::new(StepName::EmployerInformation, 1)
                .locks_after(ClaimPhase::Part1Submitted),
        )
        .step(
            StepDefinition::new(StepName::LeaveDetails, 1).locks_after(ClaimPhase::Part1Submitted),
        )
        .step(
            StepDefinition::new(StepName::LeavePeriod, 1)
                .complete_when(
                    Guard::claim(C::AnyLeavePeriodType)
                        .and(Guard::claim(C::ConflictingLeavePeriods).negate()),
                )
                .locks_after(ClaimPhase::Part1Submitted),
        )
        .step(
            StepDefinition::new(StepName::IntermittentLeave, 1)
                .applicable_when(Guard::claim(C::HasIntermittentLeave))
                .jointly_requires(Guard::claim(C::HybridLeave), StepName::LeavePeriod)
                .locks_after(ClaimPhase::Part1Submitted),
        )
        .step(
            StepDefinition::new(StepName::OtherLeave, 1)
                .applicable_when(Guard::feature(features::OTHER_LEAVE))
                .depends_on(&[StepName::LeaveDetails])
                .locks_after(ClaimPhase::Part1Submitted),
        )
        .step(
            StepDefinition::new(StepName::PreviousLeaves, 1)
                .completion(Completion::AlwaysSatisfied)
                .applicable_when(Guard::feature(features::OTHER_LEAVE))
                .depends_on(&[StepName::LeaveDetails])
                .locks_after(ClaimPhase::Part1Submitted),
        )
        .step(
            StepDefinition::new(StepName::ReviewAndConfirm, 1)
                .completion(Completion::PhaseReached(ClaimPhase::Part1Submitted))
                .depends_on(&[
                    StepName::VerifyId,
                    StepName::EmployerInformation,
                    StepName::LeaveDetails,
                    StepName::LeavePeriod,
                    StepName::IntermittentLeave,
                    StepName::OtherLeave,
                    StepName::PreviousLeaves,
                ])
                .locks_after(ClaimPhase::Part1Submitted),
        )
        .step(
            StepDefinition::new(StepName::Payment, 2)
                .complete_when(Guard::claim(C::PaymentSubmitted))
                .depends_on(&[StepName::ReviewAndConfirm])
                .locks_after(ClaimPhase::PaymentSubmitted),
        )
        .step(
            StepDefinition::new(StepName::UploadId, 3)
                .completion(Completion::Documents(DocumentKind::IdentityProof))
                .depends_on(&[StepName::ReviewAndConfirm]),
        )
        .step(
            StepDefinition::new(StepName::UploadCertification, 3)
                .completion(Completion::Documents(DocumentKind::Certification))
                .depends_on(&[StepName::ReviewAndConfirm]),
        )
        .build()
}

fn intermittent_frequency_page() -> PageNode {
    let when = || Guard::claim(C::HasIntermittentLeave);
    let saved = |field: &str| {
        (
            format!("leave_details.intermittent_leave_periods[0].{}", field),
            "leave_details.intermittent_leave_periods[0].leave_period_id",
        )
    };

    [
        "start_date",
        "end_date",
        "frequency",
        "frequency_interval_basis",
        "duration",
        "duration_basis",
    ]
    .into_iter()
    .map(saved)
    .fold(
        page(INTERMITTENT_FREQUENCY, StepName::IntermittentLeave),
        |node, (path, id)| node.saved_field(&path, when(), id),
    )
    .next(CHECKLIST)
}

/// Document upload pages return to the status page when an additional document was sent
/// after completion, and to the checklist otherwise, in both directions.
fn upload_page(name: &str, template: &str, step: StepName) -> PageNode {
    let additional = || Guard::hint(ADDITIONAL_DOC, "true");
    PageNode::new(name, template)
        .group(3)
        .step(step)
        .claim_param("claim_id", "application_id")
        .param(ADDITIONAL_DOC)
        .edge(STATUS, additional())
        .next(CHECKLIST)
        .back_edge(STATUS, additional())
        .back_edge(CHECKLIST, Guard::Always)
}
