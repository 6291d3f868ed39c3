//! Chat API settings

use std::time::Duration;

use crate::binder::manifest::{Field, Settings};
use crate::settings::AppConfigurationSettings;

/// Default model for chat completions
pub const DEFAULT_MODEL: &str = "qwen-plus";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings of the AI supporter service.
///
/// Extends the shared application settings with the chat API section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiSupporterSettings {
    pub app: AppConfigurationSettings,
    pub qwen: QwenSettings,
}

impl Settings for AiSupporterSettings {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::flatten("AppConfigurationSettings", |s: &mut Self| &mut s.app),
            Field::nested("QwenSetting", |s: &mut Self| &mut s.qwen).key("qwen"),
        ]
    }
}

/// Chat API endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QwenSettings {
    /// Absolute base URI of the API
    pub base_uri: String,
    /// Chat path, relative to `base_uri`
    pub chat_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for QwenSettings {
    fn default() -> Self {
        Self {
            base_uri: String::new(),
            chat_url: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Settings for QwenSettings {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::leaf("BaseUri", |s: &mut Self| &mut s.base_uri).key("base_uri"),
            Field::leaf("ChatUrl", |s: &mut Self| &mut s.chat_url).key("chat_url"),
            Field::leaf("Model", |s: &mut Self| &mut s.model).key("model"),
            Field::leaf("Timeout", |s: &mut Self| &mut s.timeout).key("timeout"),
        ]
    }
}
