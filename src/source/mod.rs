//! Configuration sources
//!
//! This module contains the merged configuration view the binder reads:
//! - `ConfigNode` - case-insensitive hierarchical key/value tree
//! - `ConfigBuilder` - layers bundled defaults, override files and env vars
//! - `EnvSource` - pluggable environment variable access

mod builder;
mod env;
mod node;

pub use builder::{environment_file_name, ConfigBuilder, DEFAULT_BASE_FILE};
pub use env::{
    env_layer, env_var_to_path, DefaultEnvSource, EnvSource, MapEnvSource, ENV_SECTION_SEPARATOR,
};
pub use node::{ConfigNode, PATH_SEPARATOR};
