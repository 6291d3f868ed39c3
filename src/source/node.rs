//! Hierarchical configuration tree

use serde_json::Value;

/// Separator used by [`ConfigNode::section`] and [`ConfigNode::set`] paths
pub const PATH_SEPARATOR: char = ':';

/// A node in the merged configuration view.
///
/// A node may carry a scalar value, children, or both (layers can set `a`
/// and `a:b` independently). Child lookup ignores case, child order follows
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    value: Option<String>,
    children: Vec<(String, ConfigNode)>,
}

impl ConfigNode {
    /// Create an empty node
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a leaf node holding `value`
    pub fn leaf(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Build a tree from a parsed document.
    ///
    /// Scalars become strings (`true`, `42`, `1.5`), arrays become children
    /// keyed by index and `null` is treated as absent. Sibling keys differing
    /// only in case fold into one child, the later one winning per key as in
    /// [`ConfigNode::merge`].
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::new(),
            Value::Bool(b) => Self::leaf(b.to_string()),
            Value::Number(n) => Self::leaf(n.to_string()),
            Value::String(s) => Self::leaf(s.clone()),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .fold(Self::new(), |mut node, (i, v)| {
                    node.child_mut_or_insert(&i.to_string()).merge(Self::from_value(v));
                    node
                }),
            Value::Object(map) => map.iter().fold(Self::new(), |mut node, (k, v)| {
                node.child_mut_or_insert(k).merge(Self::from_value(v));
                node
            }),
        }
    }

    /// Scalar value of this node
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether this node carries a value or any child
    pub fn exists(&self) -> bool {
        self.value.is_some() || self.children.iter().any(|(_, c)| c.exists())
    }

    /// Iterate over direct children in insertion order
    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        !self.exists()
    }

    /// Direct child by literal key, ignoring case.
    ///
    /// The key is not split, so `"database.host"` only matches a child whose
    /// own key is `database.host`.
    pub fn child(&self, key: &str) -> Option<&ConfigNode> {
        self.children
            .iter()
            .find(|(k, _)| keys_match(k, key))
            .map(|(_, v)| v)
    }

    fn child_mut_or_insert(&mut self, key: &str) -> &mut ConfigNode {
        let idx = match self.children.iter().position(|(k, _)| keys_match(k, key)) {
            Some(idx) => idx,
            None => {
                self.children.push((key.to_string(), ConfigNode::new()));
                self.children.len() - 1
            }
        };
        &mut self.children[idx].1
    }

    /// Descend along a `:`-separated path
    pub fn section(&self, path: &str) -> Option<&ConfigNode> {
        path.split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Value at a `:`-separated path
    pub fn get(&self, path: &str) -> Option<&str> {
        self.section(path).and_then(ConfigNode::value)
    }

    /// Set the value at a `:`-separated path, creating sections as needed
    pub fn set(&mut self, path: &str, value: impl Into<String>) {
        let node = path
            .split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .fold(self, |node, segment| node.child_mut_or_insert(segment));
        node.value = Some(value.into());
    }

    /// Overlay `other` on top of this node.
    ///
    /// Values in `other` replace values here key by key; keys only present
    /// here are kept.
    pub fn merge(&mut self, other: ConfigNode) {
        if other.value.is_some() {
            self.value = other.value;
        }
        for (key, child) in other.children {
            self.child_mut_or_insert(&key).merge(child);
        }
    }

    /// Flatten the tree into `(path, value)` pairs with `:` separators
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        if let Some(v) = &self.value {
            if !prefix.is_empty() {
                out.push((prefix.to_string(), v.clone()));
            }
        }
        for (key, child) in &self.children {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{PATH_SEPARATOR}{key}")
            };
            child.flatten_into(&path, out);
        }
    }
}

impl From<&Value> for ConfigNode {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

fn keys_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || (!a.is_ascii() && a.to_lowercase() == b.to_lowercase())
}
