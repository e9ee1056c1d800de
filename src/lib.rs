//! # Claimflow - Application Flow Engine for Benefits Claim Wizards
//!
//! **Claimflow** drives a multi-page claim application wizard from one declarative,
//! guarded page graph. Given the current (partial) claim it decides where "next" and
//! "back" go, which checklist steps are done, and which answers must be cleared when a
//! section is hidden.
//!
//! ## Core Workflow
//!
//! 1.  **Build the graph**: `build_portal_graph()` returns the claimant portal's
//!     [`FlowGraph`](flow::FlowGraph), validated once at startup. Custom graphs use
//!     `FlowGraph::builder` with [`PageNode`](flow::PageNode)s and step definitions.
//! 2.  **Describe the claim**: load a [`ClaimSnapshot`](claim::ClaimSnapshot) and wrap it in a
//!     [`ClaimContext`](flow::ClaimContext) together with feature flags and today's date.
//! 3.  **Route**: [`PortalFlowRouter`](router::PortalFlowRouter) resolves next/previous
//!     routes; [`PageNavigator`](router::PageNavigator) awaits the save first.
//! 4.  **Render the checklist**: [`StepModel`](steps::StepModel) computes each step's status
//!     and whether the application is ready to submit.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use claimflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let graph = build_portal_graph()?;
//!     let config = EngineConfig::from_file("config.json")?;
//!     let claim = ClaimSnapshot::from_file("claim.json")?;
//!
//!     let ctx = ClaimContext::new(&claim, &config, config.today());
//!     let router = PortalFlowRouter::new(&graph);
//!     let next = router.next_page_route("leave-reason", &ctx, &QueryParams::new())?;
//!     println!("Next: {}", next.href);
//!
//!     let steps = StepModel::new(&graph).compute(&StepInputs::new(&claim, &config, config.today()));
//!     for step in &steps {
//!         println!("{}. {} - {:?}", step.index, step.name, step.status);
//!     }
//!     println!("Ready to submit: {}", steps.ready_to_submit());
//!     Ok(())
//! }
//! ```

pub mod claim;
pub mod conditional;
pub mod config;
pub mod error;
pub mod flow;
pub mod prelude;
pub mod router;
pub mod steps;
pub mod trace;
