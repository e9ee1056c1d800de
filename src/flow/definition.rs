use super::guard::Guard;
use crate::claim::FieldPath;
use crate::error::PathError;
use crate::steps::StepName;

/// A guarded transition between two pages. Edges are tried in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub target: String,
    pub guard: Guard,
}

/// A claim field a page collects.
///
/// `when` decides whether the field is required for the current claim. `saved_by` names an
/// identifier the backend assigns once the entry has been saved; its presence counts the
/// field as answered even if the field itself is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedField {
    pub path: FieldPath,
    pub when: Guard,
    pub saved_by: Option<FieldPath>,
}

/// Where a route parameter takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSource {
    /// Only forwarded when the caller passes it in the navigation's extra params.
    Navigation,
    /// Read from the claim, e.g. `claim_id` from `application_id`.
    Claim(FieldPath),
}

/// A query parameter (or route placeholder) a page accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub key: String,
    pub source: ParamSource,
}

/// A single page of the wizard and its outgoing edges.
#[derive(Debug, Clone)]
pub struct PageNode {
    pub name: String,
    /// Route template; `{key}` placeholders are filled from the page's params.
    pub route: String,
    pub group: u8,
    pub step: Option<StepName>,
    pub fields: Vec<OwnedField>,
    pub params: Vec<ParamSpec>,
    pub edges: Vec<Edge>,
    /// Explicit "back" edges; when none match, the previous page is derived from the graph.
    pub back: Vec<Edge>,
    /// Hub pages (the checklist) enter several steps; reachability follows every true edge.
    pub fan_out: bool,
    invalid_paths: Vec<PathError>,
}

impl PageNode {
    pub fn new(name: &str, route: &str) -> Self {
        Self {
            name: name.to_string(),
            route: route.to_string(),
            group: 1,
            step: None,
            fields: Vec::new(),
            params: Vec::new(),
            edges: Vec::new(),
            back: Vec::new(),
            fan_out: false,
            invalid_paths: Vec::new(),
        }
    }

    pub fn group(mut self, group: u8) -> Self {
        self.group = group;
        self
    }

    pub fn step(mut self, step: StepName) -> Self {
        self.step = Some(step);
        self
    }

    pub fn hub(mut self) -> Self {
        self.fan_out = true;
        self
    }

    /// A field that is always required.
    pub fn field(self, path: &str) -> Self {
        self.field_when(path, Guard::Always)
    }

    pub fn field_when(self, path: &str, when: Guard) -> Self {
        self.push_field(path, when, None)
    }

    /// A field whose entry counts as answered once `saved_by` has been assigned.
    pub fn saved_field(self, path: &str, when: Guard, saved_by: &str) -> Self {
        self.push_field(path, when, Some(saved_by))
    }

    fn push_field(mut self, path: &str, when: Guard, saved_by: Option<&str>) -> Self {
        let saved_by = match saved_by.map(FieldPath::parse).transpose() {
            Ok(id) => id,
            Err(e) => {
                self.invalid_paths.push(e);
                return self;
            }
        };
        match FieldPath::parse(path) {
            Ok(path) => self.fields.push(OwnedField {
                path,
                when,
                saved_by,
            }),
            Err(e) => self.invalid_paths.push(e),
        }
        self
    }

    /// A parameter forwarded from the navigation's extra params.
    pub fn param(mut self, key: &str) -> Self {
        self.params.push(ParamSpec {
            key: key.to_string(),
            source: ParamSource::Navigation,
        });
        self
    }

    /// A parameter filled from a claim field.
    pub fn claim_param(mut self, key: &str, path: &str) -> Self {
        match FieldPath::parse(path) {
            Ok(path) => self.params.push(ParamSpec {
                key: key.to_string(),
                source: ParamSource::Claim(path),
            }),
            Err(e) => self.invalid_paths.push(e),
        }
        self
    }

    pub fn edge(mut self, target: &str, guard: Guard) -> Self {
        self.edges.push(Edge {
            target: target.to_string(),
            guard,
        });
        self
    }

    /// An unconditional edge; by convention the last edge of a page.
    pub fn next(self, target: &str) -> Self {
        self.edge(target, Guard::Always)
    }

    pub fn back_edge(mut self, target: &str, guard: Guard) -> Self {
        self.back.push(Edge {
            target: target.to_string(),
            guard,
        });
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn accepts_param(&self, key: &str) -> bool {
        self.params.iter().any(|p| p.key == key)
    }

    pub(crate) fn invalid_paths(&self) -> &[PathError] {
        &self.invalid_paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_paths_are_collected() {
        let page = PageNode::new("name", "/applications/name")
            .field("first_name")
            .field("last_name[")
            .claim_param("claim_id", "");

        assert_eq!(page.fields.len(), 1);
        assert_eq!(page.invalid_paths().len(), 2);
        assert!(page.params.is_empty());
    }

    #[test]
    fn test_terminal_and_params() {
        let page = PageNode::new("status", "/applications/status")
            .claim_param("claim_id", "application_id")
            .param("uploadedAbsenceId");

        assert!(page.is_terminal());
        assert!(page.accepts_param("claim_id"));
        assert!(!page.accepts_param("additionalDoc"));
    }
}
