//! Layered configuration builder

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::env::{env_layer, DefaultEnvSource, EnvSource};
use super::node::ConfigNode;
use crate::error::{Error, Result};
use crate::storage::{backend_for_path, Format};

/// Default name of the bundled defaults document
pub const DEFAULT_BASE_FILE: &str = "appsettings.base.json";

/// File name of the environment-specific override document
pub fn environment_file_name(environment: &str) -> String {
    format!("appsettings.{environment}.json")
}

enum Layer {
    Document {
        name: String,
        format: Format,
        content: String,
    },
    File {
        path: PathBuf,
        optional: bool,
    },
    Env {
        prefix: String,
    },
    Node(ConfigNode),
}

/// Builder merging configuration layers into one [`ConfigNode`].
///
/// Layers are applied in the order they were added; later layers override
/// earlier ones key by key.
///
/// # Example
/// ```rust,no_run
/// use confbind::ConfigBuilder;
///
/// let root = ConfigBuilder::new()
///     .add_json_str("appsettings.base.json", r#"{"rabbit_mq": {"mq_address": "amqp://localhost"}}"#)
///     .with_environment(".", "Development")
///     .add_env_prefixed("VICTOR")
///     .build()?;
/// # Ok::<(), confbind::Error>(())
/// ```
pub struct ConfigBuilder {
    layers: Vec<Layer>,
    env_source: Arc<dyn EnvSource>,
}

impl std::fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layers: Vec<String> = self
            .layers
            .iter()
            .map(|layer| match layer {
                Layer::Document { name, .. } => format!("document:{name}"),
                Layer::File { path, optional } => {
                    format!("file:{}{}", path.display(), if *optional { "?" } else { "" })
                }
                Layer::Env { prefix } => format!("env:{prefix}"),
                Layer::Node(_) => "node".to_string(),
            })
            .collect();
        f.debug_struct("ConfigBuilder").field("layers", &layers).finish()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Create a builder with no layers, reading the process environment
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            env_source: Arc::new(DefaultEnvSource),
        }
    }

    /// Replace the environment variable source used by env layers
    pub fn with_env_source(mut self, source: Arc<dyn EnvSource>) -> Self {
        self.env_source = source;
        self
    }

    /// Add an in-memory document, such as defaults bundled with `include_str!`
    pub fn add_str(mut self, name: impl Into<String>, format: Format, content: impl Into<String>) -> Self {
        self.layers.push(Layer::Document {
            name: name.into(),
            format,
            content: content.into(),
        });
        self
    }

    /// Add an in-memory JSON document
    pub fn add_json_str(self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.add_str(name, Format::Json, content)
    }

    /// Add a document file; the format follows the file extension.
    ///
    /// Supports `~` expansion for home directory. A missing optional file is
    /// skipped.
    pub fn add_file(mut self, path: impl Into<PathBuf>, optional: bool) -> Self {
        self.layers.push(Layer::File {
            path: expand_home(path.into()),
            optional,
        });
        self
    }

    /// Add the optional `appsettings.{environment}.json` from `dir`
    pub fn with_environment(self, dir: impl AsRef<Path>, environment: &str) -> Self {
        let path = dir.as_ref().join(environment_file_name(environment));
        self.add_file(path, true)
    }

    /// Add environment variables named `{PREFIX}_{SECTION}__{KEY}`
    pub fn add_env_prefixed(mut self, prefix: impl Into<String>) -> Self {
        self.layers.push(Layer::Env {
            prefix: prefix.into(),
        });
        self
    }

    /// Add an already built tree
    pub fn add_node(mut self, node: ConfigNode) -> Self {
        self.layers.push(Layer::Node(node));
        self
    }

    /// Merge every layer into the final configuration view
    pub fn build(self) -> Result<ConfigNode> {
        let mut root = ConfigNode::new();
        for layer in self.layers {
            match layer {
                Layer::Document {
                    name,
                    format,
                    content,
                } => {
                    let value = format.backend().parse(&name, &content)?;
                    log::debug!("Merged document layer '{name}'");
                    root.merge(ConfigNode::from_value(&value));
                }
                Layer::File { path, optional } => {
                    if !path.exists() {
                        if optional {
                            log::debug!("Optional configuration file {} not found, skipping", path.display());
                            continue;
                        }
                        return Err(Error::PathNotFound(path.display().to_string()));
                    }
                    let value = backend_for_path(&path)?.read(&path)?;
                    log::debug!("Merged file layer {}", path.display());
                    root.merge(ConfigNode::from_value(&value));
                }
                Layer::Env { prefix } => {
                    root.merge(env_layer(&prefix, self.env_source.as_ref()));
                }
                Layer::Node(node) => root.merge(node),
            }
        }
        Ok(root)
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(&path));
        }
    }
    path
}
