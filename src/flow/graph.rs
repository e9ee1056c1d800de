use super::context::ClaimContext;
use super::definition::{Edge, PageNode};
use crate::error::{FlowError, GraphBuildError};
use crate::steps::StepDefinition;
use crate::trace::TraceFormatter;
use ahash::{AHashMap, AHashSet};

/// The result of resolving a page's forward edges, with the guard trace that decided it.
#[derive(Debug, Clone)]
pub struct Resolution<'g> {
    pub target: &'g PageNode,
    pub reason: String,
}

/// The directed page graph of the application wizard.
///
/// Built once through [`FlowGraph::builder`], which validates edge targets, step membership
/// and forward acyclicity. Pages keep their declaration order; every query that enumerates
/// pages returns them in that order.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    pages: Vec<PageNode>,
    index: AHashMap<String, usize>,
    start: usize,
    steps: Vec<StepDefinition>,
}

impl FlowGraph {
    pub fn builder(start: &str) -> FlowGraphBuilder {
        FlowGraphBuilder {
            start: start.to_string(),
            pages: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn page(&self, name: &str) -> Result<&PageNode, FlowError> {
        self.index
            .get(name)
            .map(|&i| &self.pages[i])
            .ok_or_else(|| FlowError::PageNotFound(name.to_string()))
    }

    pub fn pages(&self) -> &[PageNode] {
        &self.pages
    }

    pub fn start(&self) -> &PageNode {
        &self.pages[self.start]
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Follows the first forward edge of `current` whose guard holds.
    pub fn resolve(&self, current: &str, ctx: &ClaimContext<'_>) -> Result<&PageNode, FlowError> {
        self.resolve_traced(current, ctx).map(|r| r.target)
    }

    /// Like [`FlowGraph::resolve`], also explaining which guard selected the target.
    pub fn resolve_traced(
        &self,
        current: &str,
        ctx: &ClaimContext<'_>,
    ) -> Result<Resolution<'_>, FlowError> {
        let page = self.page(current)?;
        for edge in &page.edges {
            let trace = edge.guard.evaluate(ctx);
            if trace.outcome() {
                let reason = TraceFormatter::format_trace(&trace);
                log::debug!("{} -> {} ({})", page.name, edge.target, reason);
                return Ok(Resolution {
                    target: self.page(&edge.target)?,
                    reason,
                });
            }
        }

        log::error!(
            "No edge out of '{}' matched claim {:?}",
            page.name,
            ctx.claim.claim_id()
        );
        Err(FlowError::NoMatchingEdge {
            page: page.name.clone(),
        })
    }

    /// Every page the claimant can currently get to from the start page.
    ///
    /// Hub pages follow all of their true edges, other pages only their first match.
    /// A non-hub page without a matching edge is a dead end for this walk; use
    /// [`FlowGraph::resolve`] to surface that as an error.
    pub fn reachable_pages(&self, ctx: &ClaimContext<'_>) -> Vec<&PageNode> {
        let reachable = self.reachable_set(ctx);
        self.pages
            .iter()
            .enumerate()
            .filter(|(i, _)| reachable.contains(i))
            .map(|(_, p)| p)
            .collect()
    }

    /// The page "back" leads to from `current`.
    ///
    /// Explicit back edges win. Otherwise the predecessor is the first reachable non-hub page
    /// whose forward resolution is `current`, then any reachable hub with a true edge to it.
    pub fn previous(&self, current: &str, ctx: &ClaimContext<'_>) -> Result<&PageNode, FlowError> {
        let page = self.page(current)?;
        if let Some(edge) = first_match(&page.back, ctx) {
            return self.page(&edge.target);
        }

        let reachable = self.reachable_set(ctx);
        let candidates = || {
            self.pages
                .iter()
                .enumerate()
                .filter(|(i, _)| reachable.contains(i))
                .map(|(_, p)| p)
        };

        let linear = candidates().filter(|p| !p.fan_out).find(|p| {
            first_match(&p.edges, ctx).is_some_and(|edge| edge.target == page.name)
        });
        let hub = || {
            candidates().filter(|p| p.fan_out).find(|p| {
                p.edges
                    .iter()
                    .any(|edge| edge.target == page.name && edge.guard.holds(ctx))
            })
        };

        linear.or_else(hub).ok_or_else(|| FlowError::NoPreviousPage {
            page: page.name.clone(),
        })
    }

    fn reachable_set(&self, ctx: &ClaimContext<'_>) -> AHashSet<usize> {
        let mut seen = AHashSet::new();
        let mut stack = vec![self.start];
        while let Some(i) = stack.pop() {
            if !seen.insert(i) {
                continue;
            }
            let page = &self.pages[i];
            let targets: Vec<&Edge> = if page.fan_out {
                page.edges.iter().filter(|e| e.guard.holds(ctx)).collect()
            } else {
                first_match(&page.edges, ctx).into_iter().collect()
            };
            stack.extend(targets.iter().filter_map(|e| self.index.get(&e.target).copied()));
        }
        seen
    }
}

fn first_match<'e>(edges: &'e [Edge], ctx: &ClaimContext<'_>) -> Option<&'e Edge> {
    edges.iter().find(|e| e.guard.holds(ctx))
}

/// Collects pages and steps and validates them into a [`FlowGraph`].
pub struct FlowGraphBuilder {
    start: String,
    pages: Vec<PageNode>,
    steps: Vec<StepDefinition>,
}

impl FlowGraphBuilder {
    pub fn page(mut self, page: PageNode) -> Self {
        self.pages.push(page);
        self
    }

    pub fn step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> Result<FlowGraph, GraphBuildError> {
        let mut index = AHashMap::new();
        for (i, page) in self.pages.iter().enumerate() {
            if index.insert(page.name.clone(), i).is_some() {
                return Err(GraphBuildError::DuplicatePage(page.name.clone()));
            }
            if !(1..=3).contains(&page.group) {
                return Err(GraphBuildError::InvalidGroup {
                    page: page.name.clone(),
                    group: page.group,
                });
            }
            if let Some(e) = page.invalid_paths().first() {
                return Err(GraphBuildError::InvalidFieldPath {
                    page: page.name.clone(),
                    source: e.clone(),
                });
            }
        }

        let start = *index
            .get(&self.start)
            .ok_or_else(|| GraphBuildError::StartPageNotFound(self.start.clone()))?;

        for page in &self.pages {
            for edge in page.edges.iter().chain(&page.back) {
                if !index.contains_key(&edge.target) {
                    return Err(GraphBuildError::EdgeTargetNotFound {
                        source_page: page.name.clone(),
                        missing_page: edge.target.clone(),
                    });
                }
            }
        }

        let mut declared = AHashSet::new();
        for step in &self.steps {
            if !declared.insert(step.name) {
                return Err(GraphBuildError::DuplicateStep(step.name.to_string()));
            }
            if !self.pages.iter().any(|p| p.step == Some(step.name)) {
                return Err(GraphBuildError::StepWithoutPages(step.name.to_string()));
            }
        }
        let orphan = self
            .pages
            .iter()
            .find_map(|p| p.step.filter(|s| !declared.contains(s)).map(|s| (p, s)));
        if let Some((page, step)) = orphan {
            return Err(GraphBuildError::PageWithoutStep {
                page: page.name.clone(),
                step: step.to_string(),
            });
        }

        check_acyclic(&self.pages, &index, start)?;

        log::info!(
            "Built flow graph with {} pages and {} steps, starting at '{}'",
            self.pages.len(),
            self.steps.len(),
            self.start
        );

        Ok(FlowGraph {
            pages: self.pages,
            index,
            start,
            steps: self.steps,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Forward edges must not form a cycle. Edges back into the start page close the loop
/// the wizard is built around and are excluded.
fn check_acyclic(
    pages: &[PageNode],
    index: &AHashMap<String, usize>,
    start: usize,
) -> Result<(), GraphBuildError> {
    let successors = |i: usize| -> Vec<usize> {
        pages[i]
            .edges
            .iter()
            .filter_map(|e| index.get(&e.target).copied())
            .filter(|&t| t != start)
            .collect()
    };

    let mut marks = vec![Mark::Unvisited; pages.len()];
    for root in 0..pages.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        // Iterative DFS: (page, next successor to visit).
        let mut stack = vec![(root, successors(root), 0usize)];
        marks[root] = Mark::InProgress;
        while let Some((node, next, cursor)) = stack.last_mut() {
            if let Some(&succ) = next.get(*cursor) {
                *cursor += 1;
                match marks[succ] {
                    Mark::InProgress => {
                        return Err(GraphBuildError::CycleDetected {
                            page: pages[succ].name.clone(),
                        });
                    }
                    Mark::Unvisited => {
                        marks[succ] = Mark::InProgress;
                        stack.push((succ, successors(succ), 0));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[*node] = Mark::Done;
                stack.pop();
            }
        }
    }
    Ok(())
}
