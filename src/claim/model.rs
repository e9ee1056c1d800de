use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;

/// One in-progress or submitted benefits application, as returned by the claims API.
///
/// Almost every field is optional: the record is created empty when the wizard starts and
/// filled page by page. The JSON form of this struct is what `FieldPath`s address.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClaimSnapshot {
    pub application_id: Option<String>,
    pub fineos_absence_id: Option<String>,
    pub status: Option<ClaimStatus>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<Phone>,
    pub residential_address: Option<Address>,
    pub has_mailing_address: Option<bool>,
    pub mailing_address: Option<Address>,
    pub has_state_id: Option<bool>,
    pub mass_id: Option<String>,
    pub tax_identifier: Option<String>,

    pub employer_fein: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub organization_unit_id: Option<String>,
    pub employer_organization_units: Vec<OrganizationUnit>,
    pub work_pattern: Option<WorkPattern>,

    pub leave_details: LeaveDetails,

    pub has_employer_benefits: Option<bool>,
    pub employer_benefits: Vec<EmployerBenefit>,
    pub has_other_incomes: Option<bool>,
    pub other_incomes: Vec<OtherIncome>,
    pub has_previous_leaves_same_reason: Option<bool>,
    pub has_previous_leaves_other_reason: Option<bool>,

    pub payment_preference: Option<PaymentPreference>,
    pub has_submitted_payment_preference: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Started,
    Submitted,
    Completed,
}

/// Milestones after which parts of the application can no longer be edited.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPhase {
    Started,
    Part1Submitted,
    PaymentSubmitted,
    Completed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    Unemployed,
    SelfEmployed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Phone {
    pub phone_number: Option<String>,
    pub phone_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Address {
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrganizationUnit {
    pub organization_unit_id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkPatternType {
    Fixed,
    Variable,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct WorkPattern {
    pub work_pattern_type: Option<WorkPatternType>,
    pub work_pattern_days: Vec<WorkPatternDay>,
    pub hours_worked_per_week: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkPatternDay {
    pub day_of_week: String,
    pub minutes: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeaveReason {
    Medical,
    Bonding,
    Care,
    Pregnancy,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReasonQualifier {
    Newborn,
    Adoption,
    FosterCare,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LeaveDetails {
    pub reason: Option<LeaveReason>,
    pub reason_qualifier: Option<ReasonQualifier>,
    pub pregnant_or_recent_birth: Option<bool>,
    pub child_birth_date: Option<NaiveDate>,
    pub child_placement_date: Option<NaiveDate>,
    pub has_future_child_date: Option<bool>,
    pub caring_leave_metadata: Option<CaringLeaveMetadata>,
    pub employer_notified: Option<bool>,
    pub employer_notification_date: Option<NaiveDate>,

    pub has_continuous_leave_periods: Option<bool>,
    pub continuous_leave_periods: Vec<LeavePeriod>,
    pub has_reduced_schedule_leave_periods: Option<bool>,
    pub reduced_schedule_leave_periods: Vec<ReducedScheduleLeavePeriod>,
    pub has_intermittent_leave_periods: Option<bool>,
    pub intermittent_leave_periods: Vec<IntermittentLeavePeriod>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CaringLeaveMetadata {
    pub relationship_to_caregiver: Option<String>,
    pub family_member_first_name: Option<String>,
    pub family_member_last_name: Option<String>,
    pub family_member_date_of_birth: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LeavePeriod {
    pub leave_period_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ReducedScheduleLeavePeriod {
    pub leave_period_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub minutes_off_per_week: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBasis {
    Days,
    Weeks,
    Months,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DurationBasis {
    Hours,
    Days,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct IntermittentLeavePeriod {
    pub leave_period_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub frequency: Option<u32>,
    pub frequency_interval_basis: Option<FrequencyBasis>,
    pub duration: Option<u32>,
    pub duration_basis: Option<DurationBasis>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AmountFrequency {
    PerDay,
    PerWeek,
    PerMonth,
    InTotal,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmployerBenefitType {
    ShortTermDisability,
    PermanentDisability,
    FamilyOrMedicalLeave,
    AccruedPaidLeave,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EmployerBenefit {
    pub employer_benefit_id: Option<String>,
    pub benefit_type: Option<EmployerBenefitType>,
    pub benefit_start_date: Option<NaiveDate>,
    pub benefit_end_date: Option<NaiveDate>,
    pub benefit_amount_dollars: Option<f64>,
    pub benefit_amount_frequency: Option<AmountFrequency>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OtherIncomeType {
    WorkersCompensation,
    Unemployment,
    Ssdi,
    RetirementDisability,
    JonesAct,
    RailroadRetirement,
    OtherEmployer,
    SelfEmployed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OtherIncome {
    pub other_income_id: Option<String>,
    pub income_type: Option<OtherIncomeType>,
    pub income_start_date: Option<NaiveDate>,
    pub income_end_date: Option<NaiveDate>,
    pub income_amount_dollars: Option<f64>,
    pub income_amount_frequency: Option<AmountFrequency>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Ach,
    Check,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PaymentPreference {
    pub payment_method: Option<PaymentMethod>,
    pub routing_number: Option<String>,
    pub account_number: Option<String>,
    pub bank_account_type: Option<String>,
}

/// Documents already attached to the claim, as reported by the documents API.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UploadState {
    pub id_documents: usize,
    pub certification_documents: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    IdentityProof,
    Certification,
}

impl UploadState {
    pub fn count(&self, kind: DocumentKind) -> usize {
        match kind {
            DocumentKind::IdentityProof => self.id_documents,
            DocumentKind::Certification => self.certification_documents,
        }
    }
}

impl ClaimSnapshot {
    /// Creates an empty snapshot for a freshly started claim.
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: Some(application_id.into()),
            status: Some(ClaimStatus::Started),
            ..Default::default()
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let claim = serde_json::from_str(&content)?;
        Ok(claim)
    }

    pub fn claim_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    pub fn has_reached(&self, phase: ClaimPhase) -> bool {
        let status = self.status.unwrap_or(ClaimStatus::Started);
        match phase {
            ClaimPhase::Started => true,
            ClaimPhase::Part1Submitted => {
                matches!(status, ClaimStatus::Submitted | ClaimStatus::Completed)
            }
            ClaimPhase::PaymentSubmitted => {
                self.has_submitted_payment_preference == Some(true)
                    || status == ClaimStatus::Completed
            }
            ClaimPhase::Completed => status == ClaimStatus::Completed,
        }
    }

    pub fn organization_unit_required(&self) -> bool {
        !self.employer_organization_units.is_empty()
    }

    pub fn pays_by_direct_deposit(&self) -> bool {
        self.payment_preference
            .as_ref()
            .and_then(|p| p.payment_method)
            == Some(PaymentMethod::Ach)
    }

    /// The JSON view of the snapshot that field paths are resolved against.
    pub fn to_value(&self) -> Value {
        // Every field serializes to a JSON primitive, array or object.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
