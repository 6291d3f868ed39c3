//! Convention-driven configuration binder
//!
//! For each field of a settings type the binder looks for a configuration
//! key, in this order:
//!
//! 1. The explicit key, if the field declares one. Otherwise the declared
//!    name in PascalCase, camelCase, snake_case, kebab-case and dot.notation.
//! 2. For every candidate, a direct child of the current section, then a
//!    flattened lookup that splits the candidate on `.` and descends.
//! 3. The raw declared name as a last resort.
//!
//! Leaves are converted from their string value; conversion failures keep
//! the default value and are collected in a [`BindReport`]. Nested settings
//! start from `Default` and are bound recursively.

pub mod convert;
pub mod manifest;
pub mod naming;

use crate::error::{Error, Result};
use crate::source::{ConfigNode, PATH_SEPARATOR};
use manifest::{Field, FieldKind, Settings};

/// A leaf whose value existed but could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Dotted path of declared names, e.g. `DatabaseSettings.Port`
    pub path: String,
    /// The offending value
    pub raw: String,
    pub target_type: &'static str,
    pub reason: String,
}

/// Fields the binder had to skip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    skipped: Vec<SkippedField>,
}

impl BindReport {
    pub fn skipped(&self) -> &[SkippedField] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    /// Whether a field with this path was skipped
    pub fn contains(&self, path: &str) -> bool {
        self.skipped.iter().any(|s| s.path == path)
    }

    /// Turn a non-empty report into [`Error::Conversion`]
    pub fn into_result(self) -> Result<()> {
        if self.skipped.is_empty() {
            Ok(())
        } else {
            Err(Error::Conversion(self.skipped))
        }
    }
}

impl IntoIterator for BindReport {
    type Item = SkippedField;
    type IntoIter = std::vec::IntoIter<SkippedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.skipped.into_iter()
    }
}

/// A bound settings value together with its report
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<T> {
    pub value: T,
    pub report: BindReport,
}

impl<T> Bound<T> {
    /// The value, ignoring skipped fields
    pub fn into_value(self) -> T {
        self.value
    }

    /// The value, or [`Error::Conversion`] if any field was skipped
    pub fn into_strict(self) -> Result<T> {
        self.report.into_result()?;
        Ok(self.value)
    }

    pub fn is_complete(&self) -> bool {
        self.report.is_empty()
    }
}

/// Binds configuration trees into settings types
#[derive(Debug, Clone, Copy)]
pub struct Binder {
    flexible_names: bool,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    /// Binder with multi-convention name matching
    pub fn new() -> Self {
        Self {
            flexible_names: true,
        }
    }

    /// Binder that only tries the explicit key or the declared name
    pub fn exact() -> Self {
        Self {
            flexible_names: false,
        }
    }

    pub fn uses_flexible_names(&self) -> bool {
        self.flexible_names
    }

    /// Bind a fresh `T` from `node`.
    ///
    /// Never fails: unconvertible leaves keep their default and show up in
    /// the returned report.
    pub fn bind<T: Settings>(&self, node: &ConfigNode) -> Bound<T> {
        let mut value = T::default();
        let report = self.bind_into(&mut value, node);
        Bound { value, report }
    }

    /// Bind into an existing value, returning the skipped fields
    pub fn bind_into<T: Settings>(&self, target: &mut T, node: &ConfigNode) -> BindReport {
        let mut report = BindReport::default();
        let mut ctx = BindContext {
            binder: self,
            path: String::new(),
            report: &mut report,
        };
        ctx.bind_fields(target, node);
        report
    }

    /// Validate the manifest of `T` and its nested types
    pub fn validate<T: Settings>() -> Result<()> {
        manifest::validate_manifest::<T>()
    }

    /// Find the configuration node for a field
    pub fn resolve<'n, T>(&self, node: &'n ConfigNode, field: &Field<T>) -> Option<&'n ConfigNode> {
        let candidates = match field.explicit_key() {
            Some(key) => vec![key.to_string()],
            None if self.flexible_names => naming::candidates(field.declared()),
            None => vec![field.declared().to_string()],
        };

        for candidate in &candidates {
            if let Some(found) = lookup(node, candidate) {
                log::trace!("Resolved '{}' via key '{candidate}'", field.declared());
                return Some(found);
            }
        }

        // Raw declared name last, for sources written in exact PascalCase
        node.child(field.declared()).filter(|n| n.exists())
    }
}

/// Literal child first, then a segment-by-segment descent on `.`
fn lookup<'n>(node: &'n ConfigNode, key: &str) -> Option<&'n ConfigNode> {
    if let Some(found) = node.child(key).filter(|n| n.exists()) {
        return Some(found);
    }
    if key.contains(PATH_SEPARATOR) {
        if let Some(found) = node.section(key).filter(|n| n.exists()) {
            return Some(found);
        }
    }
    find_by_flattened_key(node, key)
}

fn find_by_flattened_key<'n>(node: &'n ConfigNode, key: &str) -> Option<&'n ConfigNode> {
    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    if parts.len() <= 1 {
        return None;
    }
    parts
        .iter()
        .try_fold(node, |current, part| current.child(part))
        .filter(|n| n.exists())
}

/// State threaded through one bind
pub struct BindContext<'a> {
    binder: &'a Binder,
    path: String,
    report: &'a mut BindReport,
}

impl BindContext<'_> {
    /// Dotted path of the settings value currently being bound
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn bind_fields<T: Settings>(&mut self, target: &mut T, node: &ConfigNode) {
        for field in T::fields() {
            let field_path = if self.path.is_empty() {
                field.declared().to_string()
            } else {
                format!("{}.{}", self.path, field.declared())
            };

            match field.kind() {
                FieldKind::Leaf { type_name, set } => {
                    let resolved = self.binder.resolve(node, &field);
                    let Some(raw) = resolved.and_then(ConfigNode::value) else {
                        continue;
                    };
                    if let Err(e) = set(&mut *target, raw) {
                        log::debug!("Skipping {field_path}: {e}");
                        self.report.skipped.push(SkippedField {
                            path: field_path,
                            raw: raw.to_string(),
                            target_type: *type_name,
                            reason: e.reason,
                        });
                    }
                }
                FieldKind::Nested { bind, .. } => {
                    let empty = ConfigNode::new();
                    let section = self.binder.resolve(node, &field).unwrap_or(&empty);
                    let parent = std::mem::replace(&mut self.path, field_path);
                    bind(&mut *target, section, &mut *self);
                    self.path = parent;
                }
                FieldKind::Flatten { bind, .. } => {
                    bind(&mut *target, node, &mut *self);
                }
            }
        }
    }
}
