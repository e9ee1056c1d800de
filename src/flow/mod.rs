pub mod context;
pub mod definition;
pub mod graph;
pub mod guard;
pub mod portal;

pub use context::{ClaimContext, FeatureFlags, NoFeatures, QueryParams, features};
pub use definition::{Edge, OwnedField, PageNode, ParamSource, ParamSpec};
pub use graph::{FlowGraph, FlowGraphBuilder, Resolution};
pub use guard::{ClaimCondition, Guard};
pub use portal::{build_portal_graph, pages};
