use thiserror::Error;

/// Errors that can occur while building a `FlowGraph`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphBuildError {
    #[error("Page '{0}' is declared more than once")]
    DuplicatePage(String),

    #[error("Page '{missing_page}' not found, which is required by an edge from page '{source_page}'")]
    EdgeTargetNotFound {
        source_page: String,
        missing_page: String,
    },

    #[error("Start page '{0}' is not declared in the graph")]
    StartPageNotFound(String),

    #[error("Forward edges form a cycle through page '{page}'")]
    CycleDetected { page: String },

    #[error("Step '{0}' has no pages")]
    StepWithoutPages(String),

    #[error("Step '{0}' is declared more than once")]
    DuplicateStep(String),

    #[error("Page '{page}' belongs to step '{step}', but that step is not declared")]
    PageWithoutStep { page: String, step: String },

    #[error("Page '{page}' has group {group}; groups must be between 1 and 3")]
    InvalidGroup { page: String, group: u8 },

    #[error("Page '{page}' declares an invalid field path: {source}")]
    InvalidFieldPath { page: String, source: PathError },
}

/// Errors raised while resolving routes through a built graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Page '{0}' is not part of the flow graph")]
    PageNotFound(String),

    #[error("No outgoing edge of page '{page}' matched the current claim")]
    NoMatchingEdge { page: String },

    #[error("Page '{page}' has no previous page for the current claim")]
    NoPreviousPage { page: String },

    #[error("Route template of page '{page}' left placeholder '{{{placeholder}}}' unresolved")]
    UnresolvedPlaceholder { page: String, placeholder: String },

    #[error("Failed to encode query string for page '{page}': {message}")]
    QueryEncoding { page: String, message: String },
}

/// Errors produced when parsing a field path expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Field path is empty")]
    Empty,

    #[error("Field path '{path}' has an invalid segment: '{segment}'")]
    InvalidSegment { path: String, segment: String },
}

/// Transport-level failure reported by the claim update collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("Claim update request failed: {0}")]
    Transport(String),

    #[error("Claim '{0}' was not found by the claims API")]
    ClaimNotFound(String),

    #[error("The active claim has no application id to save against")]
    MissingClaimId,
}

/// Errors that abort a "save and continue" navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Errors raised while loading engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
