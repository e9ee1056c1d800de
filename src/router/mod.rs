//! Turns "next", "previous" and "go to page" intents into concrete routes.

pub mod navigation;
mod template;

pub use navigation::{
    ClaimUpdater, NavigationOutcome, PageNavigator, SaveResponse, SessionToken, WizardSession,
};

use crate::error::FlowError;
use crate::flow::{ClaimContext, FlowGraph, PageNode, ParamSource, QueryParams};
use serde::Serialize;
use serde_json::Value;

/// A fully expanded destination: path with placeholders filled, plus whitelisted query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub page: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// `path`, followed by `?query` when there is one.
    pub href: String,
}

impl Route {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Resolves routes over a [`FlowGraph`].
///
/// Guards are evaluated against the given context, including its hints. `extra` supplies
/// navigation parameters; only keys the destination page declares are forwarded.
#[derive(Debug, Clone, Copy)]
pub struct PortalFlowRouter<'g> {
    graph: &'g FlowGraph,
}

impl<'g> PortalFlowRouter<'g> {
    pub fn new(graph: &'g FlowGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g FlowGraph {
        self.graph
    }

    pub fn next_page_route(
        &self,
        current: &str,
        ctx: &ClaimContext<'_>,
        extra: &QueryParams,
    ) -> Result<Route, FlowError> {
        let target = self.graph.resolve(current, ctx)?;
        self.expand(target, ctx, extra)
    }

    pub fn previous_page_route(
        &self,
        current: &str,
        ctx: &ClaimContext<'_>,
        extra: &QueryParams,
    ) -> Result<Route, FlowError> {
        let target = self.graph.previous(current, ctx)?;
        self.expand(target, ctx, extra)
    }

    /// Route to a named page regardless of where the claimant is now.
    pub fn page_route(
        &self,
        page: &str,
        ctx: &ClaimContext<'_>,
        extra: &QueryParams,
    ) -> Result<Route, FlowError> {
        let target = self.graph.page(page)?;
        self.expand(target, ctx, extra)
    }

    fn expand(
        &self,
        target: &PageNode,
        ctx: &ClaimContext<'_>,
        extra: &QueryParams,
    ) -> Result<Route, FlowError> {
        let params = collect_params(target, ctx, extra);
        let (path, consumed) = template::expand(&target.route, &params).map_err(|placeholder| {
            FlowError::UnresolvedPlaceholder {
                page: target.name.clone(),
                placeholder,
            }
        })?;

        let query: Vec<(String, String)> = params
            .into_iter()
            .filter(|(key, _)| !consumed.contains(key))
            .collect();

        let href = if query.is_empty() {
            path.clone()
        } else {
            let encoded =
                serde_urlencoded::to_string(&query).map_err(|e| FlowError::QueryEncoding {
                    page: target.name.clone(),
                    message: e.to_string(),
                })?;
            format!("{}?{}", path, encoded)
        };

        Ok(Route {
            page: target.name.clone(),
            path,
            query,
            href,
        })
    }
}

/// The destination's declared parameters, in declaration order. Claim-sourced values are
/// written by the router; everything else must come from `extra`. Unset values are skipped.
fn collect_params(
    target: &PageNode,
    ctx: &ClaimContext<'_>,
    extra: &QueryParams,
) -> Vec<(String, String)> {
    let mut claim_json: Option<Value> = None;
    target
        .params
        .iter()
        .filter_map(|spec| {
            let value = match &spec.source {
                ParamSource::Navigation => extra.get(&spec.key).map(str::to_string),
                ParamSource::Claim(path) => {
                    let json = claim_json.get_or_insert_with(|| ctx.claim.to_value());
                    path.get(json).into_iter().find_map(scalar)
                }
            }?;
            Some((spec.key.clone(), value))
        })
        .collect()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
