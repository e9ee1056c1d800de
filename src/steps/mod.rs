//! Checklist steps derived from the flow graph and the current claim.
//!
//! [`StepModel::compute`] is a pure function of its inputs: it walks the pages reachable for
//! the claim, groups them by step, and infers each step's status. Nothing is cached between
//! calls.

mod definition;

pub use definition::{Completion, JointRequirement, StepDefinition, StepName};

use crate::claim::{ClaimSnapshot, FieldPath, UploadState, Warning};
use crate::flow::{ClaimContext, FeatureFlags, FlowGraph, OwnedField, PageNode, QueryParams};
use crate::router::PortalFlowRouter;
use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepStatus {
    NotStarted,
    InProgress,
    Completed,
    Disabled,
    NotApplicable,
}

impl StepStatus {
    /// Completed and not-applicable steps never block submission.
    pub fn is_settled(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::NotApplicable)
    }
}

/// One row of the checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub name: StepName,
    pub group: u8,
    /// 1-based position in the full step list.
    pub index: usize,
    pub status: StepStatus,
    pub editable: bool,
    /// Route of the step's first reachable page; `None` when it cannot be built for this claim.
    pub href: Option<String>,
    pub fields: Vec<FieldPath>,
    pub missing_fields: Vec<FieldPath>,
}

/// The ordered result of one [`StepModel::compute`] pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, name: StepName) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn status_of(&self, name: StepName) -> Option<StepStatus> {
        self.get(name).map(|s| s.status)
    }

    pub fn group(&self, group: u8) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.group == group)
    }

    pub fn ready_to_submit(&self) -> bool {
        self.steps.iter().all(|s| s.status.is_settled())
    }

    /// Whether every Part 1 step ahead of the review page is settled.
    pub fn part_one_ready(&self) -> bool {
        self.group(1)
            .filter(|s| s.name != StepName::ReviewAndConfirm)
            .all(|s| s.status.is_settled())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a> IntoIterator for &'a StepList {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Everything a step computation reads.
#[derive(Clone, Copy)]
pub struct StepInputs<'a> {
    pub claim: &'a ClaimSnapshot,
    pub warnings: &'a [Warning],
    pub uploads: UploadState,
    pub flags: &'a dyn FeatureFlags,
    pub today: NaiveDate,
}

impl<'a> StepInputs<'a> {
    pub fn new(claim: &'a ClaimSnapshot, flags: &'a dyn FeatureFlags, today: NaiveDate) -> Self {
        Self {
            claim,
            warnings: &[],
            uploads: UploadState::default(),
            flags,
            today,
        }
    }

    pub fn with_warnings(mut self, warnings: &'a [Warning]) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_uploads(mut self, uploads: UploadState) -> Self {
        self.uploads = uploads;
        self
    }

    fn context(&self) -> ClaimContext<'a> {
        ClaimContext::new(self.claim, self.flags, self.today)
    }
}

/// Per-step facts gathered before statuses are assigned.
struct Evaluation<'g> {
    definition: &'g StepDefinition,
    entry: &'g PageNode,
    fields: Vec<FieldPath>,
    missing: Vec<FieldPath>,
    started: bool,
    applicable: bool,
    complete: bool,
}

/// Computes checklist steps for a [`FlowGraph`].
pub struct StepModel<'g> {
    graph: &'g FlowGraph,
}

impl<'g> StepModel<'g> {
    pub fn new(graph: &'g FlowGraph) -> Self {
        Self { graph }
    }

    pub fn compute(&self, inputs: &StepInputs<'_>) -> StepList {
        let ctx = inputs.context();
        let claim_json = inputs.claim.to_value();
        let reachable = self.graph.reachable_pages(&ctx);

        let mut evaluations: Vec<Evaluation<'g>> = self
            .graph
            .steps()
            .iter()
            .filter_map(|definition| {
                let pages: Vec<&'g PageNode> = reachable
                    .iter()
                    .copied()
                    .filter(|p| p.step == Some(definition.name))
                    .collect();
                // A step with no reachable page is left out of the list entirely.
                let entry = *pages.first()?;
                Some(self.evaluate(definition, entry, &pages, &ctx, &claim_json, inputs))
            })
            .collect();

        let joint_blocked: Vec<bool> = evaluations
            .iter()
            .map(|e| match &e.definition.joint {
                Some(joint) if joint.when.holds(&ctx) => !settled(&evaluations, joint.step),
                _ => false,
            })
            .collect();
        for (evaluation, blocked) in evaluations.iter_mut().zip(joint_blocked) {
            if blocked {
                evaluation.complete = false;
            }
        }

        let router = PortalFlowRouter::new(self.graph);
        let no_params = QueryParams::new();
        let steps = evaluations
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let status = if !e.applicable {
                    StepStatus::NotApplicable
                } else if e.complete {
                    StepStatus::Completed
                } else if e
                    .definition
                    .depends_on
                    .iter()
                    .any(|dep| !settled(&evaluations, *dep))
                {
                    StepStatus::Disabled
                } else if e.started {
                    StepStatus::InProgress
                } else {
                    StepStatus::NotStarted
                };

                let href = match router.page_route(&e.entry.name, &ctx, &no_params) {
                    Ok(route) => Some(route.href),
                    Err(err) => {
                        log::debug!("No href for step {}: {}", e.definition.name, err);
                        None
                    }
                };

                Step {
                    name: e.definition.name,
                    group: e.definition.group,
                    index: i + 1,
                    status,
                    editable: e
                        .definition
                        .locks_after
                        .is_none_or(|phase| !inputs.claim.has_reached(phase)),
                    href,
                    fields: e.fields.clone(),
                    missing_fields: e.missing.clone(),
                }
            })
            .collect();

        StepList { steps }
    }

    fn evaluate(
        &self,
        definition: &'g StepDefinition,
        entry: &'g PageNode,
        pages: &[&'g PageNode],
        ctx: &ClaimContext<'_>,
        claim_json: &Value,
        inputs: &StepInputs<'_>,
    ) -> Evaluation<'g> {
        let owned: Vec<&OwnedField> = pages
            .iter()
            .flat_map(|p| p.fields.iter())
            .unique_by(|f| f.path.clone())
            .collect();

        let answered = |f: &OwnedField| {
            f.path.is_present_in(claim_json)
                || f.saved_by
                    .as_ref()
                    .is_some_and(|id| id.is_present_in(claim_json))
        };

        let missing: Vec<FieldPath> = owned
            .iter()
            .copied()
            .filter(|f| f.when.holds(ctx) && !answered(f))
            .map(|f| f.path.clone())
            .collect();
        let started = owned.iter().copied().any(|f| answered(f));
        let warned = inputs
            .warnings
            .iter()
            .any(|w| owned.iter().any(|f| w.touches(&f.path)));

        let satisfied = match definition.completion {
            Completion::OwnedFields => missing.is_empty() && !warned,
            Completion::AlwaysSatisfied => true,
            Completion::PhaseReached(phase) => inputs.claim.has_reached(phase),
            Completion::Documents(kind) => inputs.uploads.count(kind) > 0,
        };

        Evaluation {
            definition,
            entry,
            fields: owned.iter().map(|f| f.path.clone()).collect(),
            missing,
            started,
            applicable: definition.applicable_when.holds(ctx),
            complete: satisfied && definition.complete_when.holds(ctx),
        }
    }
}

/// Steps left out of the list, not applicable, or complete do not hold anything up.
fn settled(evaluations: &[Evaluation<'_>], name: StepName) -> bool {
    evaluations
        .iter()
        .find(|e| e.definition.name == name)
        .is_none_or(|e| !e.applicable || e.complete)
}
