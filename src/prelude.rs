//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the claimflow crate.
//!
//! ```rust,no_run
//! use claimflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = build_portal_graph()?;
//! let claim = ClaimSnapshot::from_file("path/to/claim.json")?;
//! let ctx = ClaimContext::new(&claim, &NoFeatures, chrono::Local::now().date_naive());
//! let resolution = graph.resolve_traced("leave-reason", &ctx)?;
//! println!("-> {} because {}", resolution.target.name, resolution.reason);
//! # Ok(())
//! # }
//! ```

// Claim data
pub use crate::claim::{ClaimSnapshot, FieldPath, UploadState, Warning, WarningStore};

// Graph and guards
pub use crate::flow::{
    ClaimCondition, ClaimContext, FeatureFlags, FlowGraph, Guard, NoFeatures, PageNode,
    QueryParams, build_portal_graph, features, pages,
};

// Steps
pub use crate::steps::{Step, StepInputs, StepList, StepModel, StepName, StepStatus};

// Conditional sections
pub use crate::conditional::{ClearReport, ConditionalFieldController, FormState};

// Routing and navigation
pub use crate::router::{
    ClaimUpdater, NavigationOutcome, PageNavigator, PortalFlowRouter, Route, SaveResponse,
    WizardSession,
};

// Configuration
pub use crate::config::EngineConfig;

// Error types
pub use crate::error::{FlowError, GraphBuildError, NavigationError, SaveError};

// Trace formatting
pub use crate::trace::{GuardTrace, TraceFormatter};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
