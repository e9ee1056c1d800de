//! "Save and continue": awaits the claim update, then routes to the next page.

use super::{PortalFlowRouter, Route};
use crate::claim::{ClaimSnapshot, Warning};
use crate::error::{FlowError, NavigationError, SaveError};
use crate::flow::{ClaimContext, FeatureFlags, QueryParams};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::cell::{Cell, RefCell};

/// What the claims API answered to a save.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveResponse {
    /// The patch was stored; the API returns the whole updated claim and its current warnings.
    Saved {
        claim: ClaimSnapshot,
        warnings: Vec<Warning>,
    },
    /// The patch failed validation and nothing was stored.
    Rejected(Vec<Warning>),
}

/// The external collaborator that persists claim patches.
#[async_trait(?Send)]
pub trait ClaimUpdater {
    async fn update_claim(&self, claim_id: &str, patch: &Value) -> Result<SaveResponse, SaveError>;
}

/// Identifies the claim state a save was issued against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub claim_id: Option<String>,
    pub revision: u64,
}

#[derive(Debug)]
struct SessionState {
    claim: ClaimSnapshot,
    warnings: Vec<Warning>,
    revision: u64,
}

/// The claim one claimant is currently working on.
///
/// Every applied save or load bumps the revision; a response issued against an older
/// revision no longer applies.
#[derive(Debug)]
pub struct WizardSession {
    state: RefCell<SessionState>,
}

impl WizardSession {
    pub fn new(claim: ClaimSnapshot) -> Self {
        Self {
            state: RefCell::new(SessionState {
                claim,
                warnings: Vec::new(),
                revision: 0,
            }),
        }
    }

    pub fn claim(&self) -> ClaimSnapshot {
        self.state.borrow().claim.clone()
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.state.borrow().warnings.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    pub fn token(&self) -> SessionToken {
        let state = self.state.borrow();
        SessionToken {
            claim_id: state.claim.application_id.clone(),
            revision: state.revision,
        }
    }

    /// Switches the session to another snapshot, superseding any save still in flight.
    pub fn load(&self, claim: ClaimSnapshot) {
        let mut state = self.state.borrow_mut();
        state.claim = claim;
        state.warnings.clear();
        state.revision += 1;
    }

    /// Applies a save result if the session is still at `token`. Returns whether it applied.
    fn apply(&self, token: &SessionToken, claim: ClaimSnapshot, warnings: Vec<Warning>) -> bool {
        if self.token() != *token {
            return false;
        }
        let mut state = self.state.borrow_mut();
        state.claim = claim;
        state.warnings = warnings;
        state.revision += 1;
        true
    }

    fn show_warnings(&self, token: &SessionToken, warnings: Vec<Warning>) -> bool {
        if self.token() != *token {
            return false;
        }
        self.state.borrow_mut().warnings = warnings;
        true
    }
}

/// How a navigation attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Navigated(Route),
    /// The save was rejected; the claimant stays put and sees the issues.
    StayOnPage { issues: Vec<Warning> },
    /// Another navigation from this page was already running.
    Suppressed,
    /// The response arrived for a claim state that has since been replaced.
    Discarded,
}

/// Resets the single-flight flag however the navigation ends.
struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Navigation for one rendered page.
pub struct PageNavigator<'a, U> {
    router: PortalFlowRouter<'a>,
    page: String,
    updater: U,
    flags: &'a dyn FeatureFlags,
    today: NaiveDate,
    in_flight: Cell<bool>,
}

impl<'a, U: ClaimUpdater> PageNavigator<'a, U> {
    pub fn new(
        router: PortalFlowRouter<'a>,
        page: &str,
        updater: U,
        flags: &'a dyn FeatureFlags,
        today: NaiveDate,
    ) -> Self {
        Self {
            router,
            page: page.to_string(),
            updater,
            flags,
            today,
            in_flight: Cell::new(false),
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn updater(&self) -> &U {
        &self.updater
    }

    pub fn is_navigating(&self) -> bool {
        self.in_flight.get()
    }

    /// Saves `patch`, then routes forward from this page using the saved claim.
    ///
    /// Rejected saves keep the claimant on the page. Transport failures abort with an error.
    /// `extra` feeds both the destination's query string and the guards' hints.
    pub async fn go_to_next_page(
        &self,
        session: &WizardSession,
        patch: &Value,
        extra: &QueryParams,
    ) -> Result<NavigationOutcome, NavigationError> {
        if self.in_flight.replace(true) {
            log::debug!("Ignoring repeated navigation from '{}'", self.page);
            return Ok(NavigationOutcome::Suppressed);
        }
        let _in_flight = InFlight(&self.in_flight);

        let token = session.token();
        let claim_id = token.claim_id.clone().ok_or(SaveError::MissingClaimId)?;
        let response = self.updater.update_claim(&claim_id, patch).await?;

        match response {
            SaveResponse::Rejected(issues) => {
                if !session.show_warnings(&token, issues.clone()) {
                    log::warn!("Discarding rejected save for superseded claim {}", claim_id);
                    return Ok(NavigationOutcome::Discarded);
                }
                Ok(NavigationOutcome::StayOnPage { issues })
            }
            SaveResponse::Saved { claim, warnings } => {
                if claim.claim_id() != Some(claim_id.as_str()) {
                    log::warn!(
                        "Discarding save response for claim {:?}; expected {}",
                        claim.claim_id(),
                        claim_id
                    );
                    return Ok(NavigationOutcome::Discarded);
                }
                if !session.apply(&token, claim, warnings) {
                    log::warn!("Discarding stale save response for claim {}", claim_id);
                    return Ok(NavigationOutcome::Discarded);
                }

                let claim = session.claim();
                let ctx = ClaimContext::new(&claim, self.flags, self.today).with_hints(extra);
                let route = self.router.next_page_route(&self.page, &ctx, extra)?;
                Ok(NavigationOutcome::Navigated(route))
            }
        }
    }

    /// Back navigation needs no save.
    pub fn go_to_previous_page(
        &self,
        session: &WizardSession,
        extra: &QueryParams,
    ) -> Result<Route, FlowError> {
        let claim = session.claim();
        let ctx = ClaimContext::new(&claim, self.flags, self.today).with_hints(extra);
        self.router.previous_page_route(&self.page, &ctx, extra)
    }
}
