//! Statically declared field manifests
//!
//! Every settings type lists its bindable fields once, either by hand or via
//! `#[derive(Settings)]`. The binder walks these manifests instead of
//! inspecting types at runtime.

use super::convert::{ConvertError, FromConfigValue};
use super::BindContext;
use crate::error::{Error, Result};
use crate::source::ConfigNode;

type LeafSetter<T> = Box<dyn Fn(&mut T, &str) -> std::result::Result<(), ConvertError> + Send + Sync>;
type NestedBinder<T> = Box<dyn Fn(&mut T, &ConfigNode, &mut BindContext<'_>) + Send + Sync>;

/// A settings type that can be populated by the binder.
///
/// `Default` is the zero-argument constructor used for every composite node,
/// so an unconstructible schema is rejected at compile time.
///
/// # Example
/// ```rust
/// use confbind::{Field, Settings};
///
/// #[derive(Debug, Default)]
/// struct QueueSettings {
///     address: String,
///     prefetch: u16,
/// }
///
/// impl Settings for QueueSettings {
///     fn fields() -> Vec<Field<Self>> {
///         vec![
///             Field::leaf("Address", |s: &mut Self| &mut s.address).key("mq_address"),
///             Field::leaf("Prefetch", |s: &mut Self| &mut s.prefetch),
///         ]
///     }
/// }
/// ```
pub trait Settings: Default + 'static {
    /// The bindable fields of this type, in binding order
    fn fields() -> Vec<Field<Self>>;
}

/// How a field is populated
pub enum FieldKind<T> {
    /// Converted from a single string value
    Leaf {
        type_name: &'static str,
        set: LeafSetter<T>,
    },
    /// Built from `Default` and bound recursively
    Nested {
        type_name: &'static str,
        bind: NestedBinder<T>,
        validate: fn() -> Result<()>,
    },
    /// Bound from the same section as its parent
    Flatten {
        type_name: &'static str,
        bind: NestedBinder<T>,
        validate: fn() -> Result<()>,
    },
}

/// One entry of a settings manifest
pub struct Field<T> {
    declared: &'static str,
    key: Option<&'static str>,
    kind: FieldKind<T>,
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, type_name) = match &self.kind {
            FieldKind::Leaf { type_name, .. } => ("leaf", type_name),
            FieldKind::Nested { type_name, .. } => ("nested", type_name),
            FieldKind::Flatten { type_name, .. } => ("flatten", type_name),
        };
        f.debug_struct("Field")
            .field("declared", &self.declared)
            .field("key", &self.key)
            .field("kind", &kind)
            .field("type_name", type_name)
            .finish()
    }
}

impl<T: 'static> Field<T> {
    /// A scalar field.
    ///
    /// `declared` is the PascalCase name conventions are derived from;
    /// `access` returns the field inside the settings value.
    pub fn leaf<V>(declared: &'static str, access: fn(&mut T) -> &mut V) -> Self
    where
        V: FromConfigValue + 'static,
    {
        Self {
            declared,
            key: None,
            kind: FieldKind::Leaf {
                type_name: V::TYPE_NAME,
                set: Box::new(move |target: &mut T, raw: &str| {
                    *access(target) = V::from_config_value(raw)?;
                    Ok(())
                }),
            },
        }
    }

    /// A nested settings field, bound recursively
    pub fn nested<V>(declared: &'static str, access: fn(&mut T) -> &mut V) -> Self
    where
        V: Settings,
    {
        Self {
            declared,
            key: None,
            kind: FieldKind::Nested {
                type_name: std::any::type_name::<V>(),
                bind: Box::new(
                    move |target: &mut T, node: &ConfigNode, ctx: &mut BindContext<'_>| {
                        let mut sub = V::default();
                        ctx.bind_fields(&mut sub, node);
                        *access(target) = sub;
                    },
                ),
                validate: validate_manifest::<V>,
            },
        }
    }

    /// Embedded settings whose fields live in the parent's section.
    ///
    /// Models a settings type extending a base type: the base fields are
    /// looked up next to the extending type's own fields.
    pub fn flatten<V>(declared: &'static str, access: fn(&mut T) -> &mut V) -> Self
    where
        V: Settings,
    {
        Self {
            declared,
            key: None,
            kind: FieldKind::Flatten {
                type_name: std::any::type_name::<V>(),
                bind: Box::new(
                    move |target: &mut T, node: &ConfigNode, ctx: &mut BindContext<'_>| {
                        let mut sub = V::default();
                        ctx.bind_fields(&mut sub, node);
                        *access(target) = sub;
                    },
                ),
                validate: validate_manifest::<V>,
            },
        }
    }

    /// Explicit configuration key; replaces convention-derived candidates
    #[must_use]
    pub fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }
}

impl<T> Field<T> {
    /// Declared (PascalCase) name
    pub fn declared(&self) -> &'static str {
        self.declared
    }

    /// Explicit key, if any
    pub fn explicit_key(&self) -> Option<&'static str> {
        self.key
    }

    pub fn kind(&self) -> &FieldKind<T> {
        &self.kind
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.kind, FieldKind::Nested { .. } | FieldKind::Flatten { .. })
    }
}

/// Check the manifest of `T` and of every nested type.
///
/// Rejects empty declared names, blank explicit keys and declared names that
/// appear twice (ignoring case).
pub fn validate_manifest<T: Settings>() -> Result<()> {
    let type_name = std::any::type_name::<T>();
    let schema_error = |reason: String| Error::Schema { type_name, reason };

    let fields = T::fields();
    let mut seen: Vec<&str> = Vec::with_capacity(fields.len());

    for field in &fields {
        if field.declared.trim().is_empty() {
            return Err(schema_error("field with an empty declared name".into()));
        }
        if let Some(key) = field.key {
            if key.trim().is_empty() {
                return Err(schema_error(format!(
                    "field '{}' has a blank explicit key",
                    field.declared
                )));
            }
        }
        if seen.iter().any(|s| s.eq_ignore_ascii_case(field.declared)) {
            return Err(schema_error(format!(
                "field '{}' is declared more than once",
                field.declared
            )));
        }
        seen.push(field.declared);

        match &field.kind {
            FieldKind::Nested { validate, .. } | FieldKind::Flatten { validate, .. } => validate()?,
            FieldKind::Leaf { .. } => {}
        }
    }
    Ok(())
}
