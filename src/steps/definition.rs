use crate::claim::{ClaimPhase, DocumentKind};
use crate::flow::Guard;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Checklist steps of the claimant application, in checklist order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepName {
    VerifyId,
    EmployerInformation,
    LeaveDetails,
    LeavePeriod,
    IntermittentLeave,
    OtherLeave,
    PreviousLeaves,
    ReviewAndConfirm,
    Payment,
    UploadId,
    UploadCertification,
}

impl StepName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::VerifyId => "verifyId",
            StepName::EmployerInformation => "employerInformation",
            StepName::LeaveDetails => "leaveDetails",
            StepName::LeavePeriod => "leavePeriod",
            StepName::IntermittentLeave => "intermittentLeave",
            StepName::OtherLeave => "otherLeave",
            StepName::PreviousLeaves => "previousLeaves",
            StepName::ReviewAndConfirm => "reviewAndConfirm",
            StepName::Payment => "payment",
            StepName::UploadId => "uploadId",
            StepName::UploadCertification => "uploadCertification",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What has to be true for a step to count as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every required owned field is present and none of them carries a warning.
    OwnedFields,
    /// Answering is optional; the step is complete as soon as it is reachable.
    AlwaysSatisfied,
    /// The claim has progressed past the given lifecycle point.
    PhaseReached(ClaimPhase),
    /// At least one document of the kind has been uploaded.
    Documents(DocumentKind),
}

/// While `when` holds, the step also needs `step` completed before it can complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointRequirement {
    pub when: Guard,
    pub step: StepName,
}

/// Static description of a checklist step. Membership of pages is declared on the pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub name: StepName,
    pub group: u8,
    pub completion: Completion,
    pub applicable_when: Guard,
    pub complete_when: Guard,
    pub depends_on: Vec<StepName>,
    pub locks_after: Option<ClaimPhase>,
    pub joint: Option<JointRequirement>,
}

impl StepDefinition {
    pub fn new(name: StepName, group: u8) -> Self {
        Self {
            name,
            group,
            completion: Completion::OwnedFields,
            applicable_when: Guard::Always,
            complete_when: Guard::Always,
            depends_on: Vec::new(),
            locks_after: None,
            joint: None,
        }
    }

    pub fn completion(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    pub fn applicable_when(mut self, guard: Guard) -> Self {
        self.applicable_when = guard;
        self
    }

    pub fn complete_when(mut self, guard: Guard) -> Self {
        self.complete_when = guard;
        self
    }

    pub fn depends_on(mut self, steps: &[StepName]) -> Self {
        self.depends_on = steps.to_vec();
        self
    }

    pub fn locks_after(mut self, phase: ClaimPhase) -> Self {
        self.locks_after = Some(phase);
        self
    }

    pub fn jointly_requires(mut self, when: Guard, step: StepName) -> Self {
        self.joint = Some(JointRequirement { when, step });
        self
    }
}
