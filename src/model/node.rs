//! Read-only, ordered document tree with typed accessors.
//!
//! Documents are parsed from YAML into [`serde_yaml::Value`] and converted
//! into [`Node`]s that remember where they came from. Every accessor that
//! expects a particular shape fails with a [`Error::Structural`] naming the
//! node's location, the expected type and the type actually found.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Location, ReferenceKind, Result};

/// Payload of a document node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Node>),
    Map(Map),
}

/// A value plus its location in the originating document.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    value: Value,
    location: Location,
}

/// An ordered mapping from string keys to nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Node)>,
    location: Location,
}

impl Node {
    pub fn new(value: Value, location: Location) -> Self {
        Self { value, location }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Human-readable name of this node's shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match &self.value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Map(_) => "map",
            Value::List(items) => {
                if items.is_empty() {
                    "empty list"
                } else if items.iter().all(Node::is_str) {
                    "list of strings"
                } else if items.iter().all(|n| matches!(n.value, Value::Map(_))) {
                    "list of maps"
                } else {
                    "mixed list"
                }
            }
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::structural(
            &self.location,
            format!("expected {}, found {}", expected, self.type_name()),
        )
    }

    pub fn is_str(&self) -> bool {
        matches!(self.value, Value::String(_))
    }

    /// True for a list whose items are all strings. An empty list qualifies.
    pub fn is_string_list(&self) -> bool {
        matches!(&self.value, Value::List(items) if items.iter().all(Node::is_str))
    }

    /// True for a non-empty list whose items are all maps.
    pub fn is_map_list(&self) -> bool {
        matches!(
            &self.value,
            Value::List(items)
                if !items.is_empty() && items.iter().all(|n| matches!(n.value, Value::Map(_)))
        )
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.value {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch("a string")),
        }
    }

    /// Numeric value; integers are widened.
    pub fn as_f64(&self) -> Result<f64> {
        match self.value {
            Value::Float(x) => Ok(x),
            Value::Integer(i) => Ok(i as f64),
            _ => Err(self.mismatch("a number")),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match self.value {
            Value::Integer(i) => Ok(i),
            _ => Err(self.mismatch("an integer")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.value {
            Value::Bool(b) => Ok(b),
            _ => Err(self.mismatch("a boolean")),
        }
    }

    pub fn as_list(&self) -> Result<&[Node]> {
        match &self.value {
            Value::List(items) => Ok(items),
            _ => Err(self.mismatch("a list")),
        }
    }

    pub fn as_map(&self) -> Result<&Map> {
        match &self.value {
            Value::Map(map) => Ok(map),
            _ => Err(self.mismatch("a map")),
        }
    }

    pub fn as_string_list(&self) -> Result<Vec<&str>> {
        match &self.value {
            Value::List(items) => items
                .iter()
                .map(|item| item.as_str().map_err(|_| self.mismatch("a list of strings")))
                .collect(),
            _ => Err(self.mismatch("a list of strings")),
        }
    }

    pub fn as_f64_list(&self) -> Result<Vec<f64>> {
        match &self.value {
            Value::List(items) => items.iter().map(Node::as_f64).collect(),
            _ => Err(self.mismatch("a list of numbers")),
        }
    }

    /// Items of a list of maps. A single map is treated as a one-item list.
    pub fn as_map_list(&self) -> Result<Vec<&Map>> {
        match &self.value {
            Value::Map(map) => Ok(vec![map]),
            Value::List(items) => items
                .iter()
                .map(|item| item.as_map().map_err(|_| self.mismatch("a list of maps")))
                .collect(),
            _ => Err(self.mismatch("a list of maps")),
        }
    }

    /// Indexes a list of maps by the string field `key`.
    ///
    /// Used to look up element definitions by `symbol` and species
    /// definitions by `name`. Duplicate keys are rejected.
    pub fn index_by(&self, key: &str) -> Result<HashMap<&str, &Map>> {
        let items = self.as_map_list()?;
        let mut index = HashMap::with_capacity(items.len());
        for item in items {
            let id = item.require(key)?.as_str()?;
            if index.insert(id, item).is_some() {
                return Err(Error::structural(
                    item.location(),
                    format!("duplicate entry with {} '{}'", key, id),
                ));
            }
        }
        Ok(index)
    }

    /// Finds the list item whose `key` field equals `value`.
    ///
    /// An empty `value` selects the first item.
    pub fn find_where(&self, key: &str, value: &str) -> Result<&Map> {
        let items = self.as_map_list()?;
        if value.is_empty() {
            return items.into_iter().next().ok_or_else(|| {
                Error::not_found(ReferenceKind::Phase, "<first>", "an empty list", &self.location)
            });
        }
        for item in items {
            if let Some(node) = item.get(key) {
                if node.as_str()? == value {
                    return Ok(item);
                }
            }
        }
        Err(Error::not_found(
            ReferenceKind::Phase,
            value,
            format!("entries keyed by '{}'", key),
            &self.location,
        ))
    }

    fn from_yaml(value: serde_yaml::Value, location: Location) -> Result<Self> {
        use serde_yaml::Value as Y;

        let value = match value {
            Y::Null => Value::Null,
            Y::Bool(b) => Value::Bool(b),
            Y::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Y::String(s) => Value::String(s),
            Y::Sequence(items) => Value::List(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| Node::from_yaml(item, location.child_index(i)))
                    .collect::<Result<_>>()?,
            ),
            Y::Mapping(mapping) => {
                let mut map = Map::new(location.clone());
                for (key, item) in mapping {
                    let key = yaml_key(&key).ok_or_else(|| {
                        Error::structural(&location, "mapping keys must be scalars")
                    })?;
                    let child = Node::from_yaml(item, location.child_key(&key))?;
                    map.insert(key, child);
                }
                Value::Map(map)
            }
            Y::Tagged(tagged) => return Node::from_yaml(tagged.value, location),
        };

        Ok(Self { value, location })
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value as Y;

    match key {
        Y::String(s) => Some(s.clone()),
        Y::Bool(b) => Some(b.to_string()),
        Y::Number(n) => Some(n.to_string()),
        Y::Null => Some("null".to_string()),
        Y::Tagged(tagged) => yaml_key(&tagged.value),
        Y::Sequence(_) | Y::Mapping(_) => None,
    }
}

impl Map {
    pub fn new(location: Location) -> Self {
        Self {
            entries: Vec::new(),
            location,
        }
    }

    /// Parses YAML text into a document root.
    ///
    /// `file` tags every node for diagnostics and is the anchor for relative
    /// cross-file references.
    pub fn from_yaml_str(text: &str, file: Option<&Path>) -> Result<Self> {
        let file: Option<Arc<Path>> = file.map(Arc::from);
        let parsed: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|source| Error::Yaml {
                path: file
                    .as_deref()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| "<input>".into()),
                source,
            })?;

        let root = Location::root(file);
        match Node::from_yaml(parsed, root.clone())? {
            Node {
                value: Value::Map(map),
                ..
            } => Ok(map),
            Node {
                value: Value::Null, ..
            } => Ok(Map::new(root)),
            other => Err(Error::structural(
                &root,
                format!("document root must be a map, found {}", other.type_name()),
            )),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// File this map was parsed from, if any.
    pub fn file(&self) -> Option<&Path> {
        self.location.file()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or replaces `key`, keeping the position of an existing entry.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((key, node)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub(crate) fn value_at(&self, index: usize) -> &Node {
        &self.entries[index].1
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn require(&self, key: &str) -> Result<&Node> {
        self.get(key).ok_or_else(|| {
            Error::structural(&self.location, format!("missing required key '{}'", key))
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str> {
        self.get(key).map_or(Ok(default), Node::as_str)
    }

    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64> {
        self.get(key).map_or(Ok(default), Node::as_f64)
    }

    pub fn get_i64_or(&self, key: &str, default: i64) -> Result<i64> {
        self.get(key).map_or(Ok(default), Node::as_i64)
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        self.get(key).map_or(Ok(default), Node::as_bool)
    }

    /// The only entry of a `{key: value}` map.
    pub fn single_entry(&self) -> Result<(&str, &Node)> {
        match self.entries.as_slice() {
            [(key, node)] => Ok((key.as_str(), node)),
            _ => Err(Error::structural(
                &self.location,
                format!("expected a map with exactly one entry, found {}", self.len()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Map {
        Map::from_yaml_str(text, None).unwrap()
    }

    #[test]
    fn preserves_document_order() {
        let map = parse("zeta: 1\nalpha: 2\nmid: 3\n");
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn typed_accessors_report_expected_and_found() {
        let map = parse("name: gas\nelements: [H, O]\n");
        let err = map.require("name").unwrap().as_f64().unwrap_err();
        assert_eq!(err.to_string(), "<input>: name: expected a number, found string");

        let err = map.require("elements").unwrap().as_map().unwrap_err();
        assert_eq!(
            err.to_string(),
            "<input>: elements: expected a map, found list of strings"
        );
    }

    #[test]
    fn integers_widen_to_floats() {
        let map = parse("a: 3\nb: 2.5\n");
        assert_eq!(map.require("a").unwrap().as_f64().unwrap(), 3.0);
        assert!(map.require("b").unwrap().as_i64().is_err());
    }

    #[test]
    fn shape_predicates() {
        let map = parse("a: [x, y]\nb: [{x: 1}]\nc: []\nd: [x, {y: 1}]\n");
        assert!(map.require("a").unwrap().is_string_list());
        assert!(!map.require("a").unwrap().is_map_list());
        assert!(map.require("b").unwrap().is_map_list());
        assert!(map.require("c").unwrap().is_string_list());
        assert!(!map.require("d").unwrap().is_string_list());
        assert!(!map.require("d").unwrap().is_map_list());
        assert_eq!(map.require("d").unwrap().type_name(), "mixed list");
    }

    #[test]
    fn defaulted_getters_still_check_types() {
        let map = parse("flag: yes-please\n");
        assert!(map.get_bool_or("missing", true).unwrap());
        assert!(map.get_bool_or("flag", false).is_err());
        assert_eq!(map.get_str_or("other", "fallback").unwrap(), "fallback");
    }

    #[test]
    fn missing_key_is_structural() {
        let map = parse("phases: []\n");
        let err = map.require("species").unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
        assert!(err.to_string().contains("missing required key 'species'"));
    }

    #[test]
    fn nested_locations_follow_key_path() {
        let map = parse("phases:\n- name: gas\n  state: {T: 300}\n");
        let phase = map.require("phases").unwrap().as_map_list().unwrap()[0];
        let temp = phase.require("state").unwrap().as_map().unwrap().require("T").unwrap();
        assert_eq!(temp.location().path(), "phases[0].state.T");
    }

    #[test]
    fn index_by_rejects_duplicates() {
        let map = parse("species:\n- name: H2\n- name: O2\n- name: H2\n");
        let err = map.require("species").unwrap().index_by("name").unwrap_err();
        assert!(err.to_string().contains("duplicate entry with name 'H2'"));
    }

    #[test]
    fn find_where_empty_value_selects_first() {
        let map = parse("phases:\n- name: gas\n- name: liquid\n");
        let phases = map.require("phases").unwrap();
        assert_eq!(
            phases.find_where("name", "").unwrap().require("name").unwrap().as_str().unwrap(),
            "gas"
        );
        assert_eq!(
            phases
                .find_where("name", "liquid")
                .unwrap()
                .require("name")
                .unwrap()
                .as_str()
                .unwrap(),
            "liquid"
        );
        let err = phases.find_where("name", "solid").unwrap_err();
        assert!(matches!(
            err,
            Error::ReferenceNotFound { kind: ReferenceKind::Phase, .. }
        ));
    }

    #[test]
    fn single_entry_requires_exactly_one() {
        let map = parse("a: {x: [H]}\nb: {x: [H], y: [O]}\n");
        let (key, _) = map.require("a").unwrap().as_map().unwrap().single_entry().unwrap();
        assert_eq!(key, "x");
        assert!(map.require("b").unwrap().as_map().unwrap().single_entry().is_err());
    }

    #[test]
    fn non_map_root_is_rejected() {
        assert!(Map::from_yaml_str("- a\n- b\n", None).is_err());
        assert!(Map::from_yaml_str("", None).unwrap().is_empty());
    }
}
