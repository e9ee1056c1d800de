use crate::error::PathError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One step of a `FieldPath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
    /// `[*]`: every element of an array.
    AnyIndex,
}

/// A dotted path into the claim record, e.g. `leave_details.continuous_leave_periods[0].start_date`.
///
/// Paths address the JSON form of a `ClaimSnapshot`, so the same expression can be used
/// against the typed snapshot (after `serde_json::to_value`) and against raw form state.
/// `[*]` matches every element of an array and can be bound to a concrete index with
/// [`FieldPath::with_index`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let invalid = |segment: &str| PathError::InvalidSegment {
            path: path.to_string(),
            segment: segment.to_string(),
        };

        let mut segments = Vec::new();
        for part in path.split('.') {
            let (name, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };
            if name.is_empty()
                || !name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(invalid(part));
            }
            segments.push(Segment::Key(name.to_string()));

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid(part))?;
                if !rest.starts_with('[') {
                    return Err(invalid(part));
                }
                let inner = &rest[1..close];
                let segment = if inner == "*" {
                    Segment::AnyIndex
                } else {
                    inner
                        .parse::<usize>()
                        .map(Segment::Index)
                        .map_err(|_| invalid(part))?
                };
                segments.push(segment);
                rest = &rest[close + 1..];
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Binds the first `[*]` segment to a concrete array index.
    pub fn with_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(slot) = segments.iter_mut().find(|s| **s == Segment::AnyIndex) {
            *slot = Segment::Index(index);
        }
        Self { segments }
    }

    /// True when every value addressed by `other` lives at or beneath this path.
    /// `[*]` on either side matches any index.
    pub fn is_prefix_of(&self, other: &FieldPath) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| segments_match(a, b))
    }

    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }

    /// All values addressed by this path. Missing keys and out-of-range indexes yield nothing.
    pub fn get<'v>(&self, root: &'v Value) -> Vec<&'v Value> {
        let mut found = Vec::new();
        collect(root, &self.segments, &mut found);
        found
    }

    /// One concrete path per match in `root`, with every `[*]` bound to an existing index.
    pub fn concrete_in(&self, root: &Value) -> Vec<FieldPath> {
        let Some(pos) = self.segments.iter().position(|s| *s == Segment::AnyIndex) else {
            return if self.get(root).is_empty() {
                Vec::new()
            } else {
                vec![self.clone()]
            };
        };
        let array = Self {
            segments: self.segments[..pos].to_vec(),
        };
        let len = array
            .get(root)
            .first()
            .and_then(|v| v.as_array())
            .map_or(0, |items| items.len());
        (0..len)
            .flat_map(|i| self.with_index(i).concrete_in(root))
            .collect()
    }

    /// The paths of the arrays this path indexes into, innermost first.
    pub fn enclosing_arrays(&self) -> Vec<FieldPath> {
        self.segments
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, s)| matches!(s, Segment::Index(_) | Segment::AnyIndex))
            .map(|(i, _)| Self {
                segments: self.segments[..i].to_vec(),
            })
            .collect()
    }

    /// A path is present when it resolves and every resolved value is non-empty.
    /// A `[*]` path over an empty array is not present.
    pub fn is_present_in(&self, root: &Value) -> bool {
        let values = self.get(root);
        !values.is_empty() && values.into_iter().all(is_filled)
    }

    /// Clears every existing match in place: arrays become `[]`, anything else `null`.
    /// Returns the number of matched locations.
    pub fn clear_in(&self, root: &mut Value) -> usize {
        clear_at(root, &self.segments)
    }

    /// Writes `value` at this path. Missing object keys are created when `create` is set
    /// and no array index follows them; array indexes are never created.
    pub fn set_in(&self, root: &mut Value, value: Value, create: bool) -> bool {
        set_at(root, &self.segments, &value, create)
    }
}

/// `null`, empty strings and empty arrays count as unanswered.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

fn segments_match(a: &Segment, b: &Segment) -> bool {
    match (a, b) {
        (Segment::AnyIndex, Segment::Index(_) | Segment::AnyIndex)
        | (Segment::Index(_), Segment::AnyIndex) => true,
        _ => a == b,
    }
}

fn collect<'v>(value: &'v Value, segments: &[Segment], found: &mut Vec<&'v Value>) {
    let Some((head, tail)) = segments.split_first() else {
        found.push(value);
        return;
    };
    match head {
        Segment::Key(key) => {
            if let Some(child) = value.as_object().and_then(|map| map.get(key)) {
                collect(child, tail, found);
            }
        }
        Segment::Index(index) => {
            if let Some(child) = value.as_array().and_then(|items| items.get(*index)) {
                collect(child, tail, found);
            }
        }
        Segment::AnyIndex => {
            if let Some(items) = value.as_array() {
                for child in items {
                    collect(child, tail, found);
                }
            }
        }
    }
}

fn clear_at(value: &mut Value, segments: &[Segment]) -> usize {
    let Some((head, tail)) = segments.split_first() else {
        *value = match value {
            Value::Array(_) => Value::Array(Vec::new()),
            _ => Value::Null,
        };
        return 1;
    };
    match head {
        Segment::Key(key) => value
            .as_object_mut()
            .and_then(|map| map.get_mut(key))
            .map_or(0, |child| clear_at(child, tail)),
        Segment::Index(index) => value
            .as_array_mut()
            .and_then(|items| items.get_mut(*index))
            .map_or(0, |child| clear_at(child, tail)),
        Segment::AnyIndex => value.as_array_mut().map_or(0, |items| {
            items.iter_mut().map(|child| clear_at(child, tail)).sum()
        }),
    }
}

fn set_at(target: &mut Value, segments: &[Segment], value: &Value, create: bool) -> bool {
    let Some((head, tail)) = segments.split_first() else {
        *target = value.clone();
        return true;
    };
    match head {
        Segment::Key(key) => {
            let create = create && tail.iter().all(|s| matches!(s, Segment::Key(_)));
            if create && target.is_null() {
                *target = Value::Object(serde_json::Map::new());
            }
            let Some(map) = target.as_object_mut() else {
                return false;
            };
            if create {
                set_at(map.entry(key.clone()).or_insert(Value::Null), tail, value, create)
            } else {
                map.get_mut(key)
                    .is_some_and(|child| set_at(child, tail, value, create))
            }
        }
        Segment::Index(index) => target
            .as_array_mut()
            .and_then(|items| items.get_mut(*index))
            .is_some_and(|child| set_at(child, tail, value, create)),
        Segment::AnyIndex => target.as_array_mut().is_some_and(|items| {
            let mut any = false;
            for child in items.iter_mut() {
                any |= set_at(child, tail, value, create);
            }
            any
        }),
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
                Segment::AnyIndex => write!(f, "[*]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let p = path("leave_details.continuous_leave_periods[0].start_date");
        assert_eq!(p.segments().len(), 4);
        assert_eq!(p.segments()[2], Segment::Index(0));
        assert_eq!(p.to_string(), "leave_details.continuous_leave_periods[0].start_date");
        assert_eq!(
            path("other_incomes[*].income_type").to_string(),
            "other_incomes[*].income_type"
        );
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        assert_eq!(FieldPath::parse(""), Err(PathError::Empty));
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse("a[x]").is_err());
        assert!(FieldPath::parse("a[0").is_err());
        assert!(FieldPath::parse("[0]").is_err());
    }

    #[test]
    fn test_with_index_binds_first_wildcard() {
        let p = path("other_incomes[*].income_type").with_index(2);
        assert_eq!(p.to_string(), "other_incomes[2].income_type");
    }

    #[test]
    fn test_prefix_and_overlap() {
        let section = path("employer_benefits");
        let field = path("employer_benefits[0].benefit_type");
        assert!(section.is_prefix_of(&field));
        assert!(!field.is_prefix_of(&section));
        assert!(field.overlaps(&section));
        assert!(path("employer_benefits[*].benefit_type").overlaps(&field));
        assert!(!path("other_incomes").overlaps(&field));
    }

    #[test]
    fn test_presence_rules() {
        let data = json!({
            "first_name": "Ada",
            "last_name": "  ",
            "items": [{ "a": 1 }, { "a": null }],
            "empty": [],
        });
        assert!(path("first_name").is_present_in(&data));
        assert!(!path("last_name").is_present_in(&data));
        assert!(!path("missing").is_present_in(&data));
        assert!(!path("empty").is_present_in(&data));
        assert!(path("items[0].a").is_present_in(&data));
        assert!(!path("items[*].a").is_present_in(&data));
        assert!(!path("empty[*].a").is_present_in(&data));
    }

    #[test]
    fn test_clear_and_set() {
        let mut data = json!({ "list": [{ "x": 1 }, { "x": 2 }], "flag": true });
        assert_eq!(path("list[*].x").clear_in(&mut data), 2);
        assert_eq!(data["list"][1]["x"], Value::Null);
        assert_eq!(path("list").clear_in(&mut data), 1);
        assert_eq!(data["list"], json!([]));
        assert_eq!(path("nope.deeper").clear_in(&mut data), 0);

        let mut pending = Value::Null;
        assert!(path("a.b").set_in(&mut pending, json!(3), true));
        assert_eq!(pending, json!({ "a": { "b": 3 } }));
        assert!(!path("a.c").set_in(&mut pending, json!(4), false));

        assert!(!path("list[0].x").set_in(&mut pending, json!(5), true));
        assert_eq!(pending, json!({ "a": { "b": 3 } }));
    }

    #[test]
    fn test_concrete_matches_bind_wildcards() {
        let data = json!({ "list": [{ "x": [1, 2] }, { "x": [] }], "flag": true });
        let found: Vec<String> = path("list[*].x[*]")
            .concrete_in(&data)
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(found, vec!["list[0].x[0]", "list[0].x[1]"]);
        assert_eq!(path("flag").concrete_in(&data), vec![path("flag")]);
        assert!(path("missing").concrete_in(&data).is_empty());

        let arrays: Vec<String> = path("list[1].x[0]")
            .enclosing_arrays()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(arrays, vec!["list[1].x", "list"]);
    }
}
