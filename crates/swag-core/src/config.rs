use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::compile::NamingStyle;
use crate::error::ConfigError;
use crate::validate::Language;

/// Top-level project configuration loaded from `.swag.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwagConfig {
    pub lang: Language,
    pub output_dir: String,
    pub model_file: String,
    pub generator: GeneratorConfig,
    pub naming: NamingStyle,
}

impl Default for SwagConfig {
    fn default() -> Self {
        Self {
            lang: Language::Swift,
            output_dir: ".".to_string(),
            model_file: "model.json".to_string(),
            generator: GeneratorConfig::default(),
            naming: NamingStyle::Preserve,
        }
    }
}

/// The external model generator invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub command: String,
    /// Output file name without extension; the language name is appended.
    pub output_stem: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: "quicktype".to_string(),
            output_stem: "SwaggerModel".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swag.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwagConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swag configuration
lang: swift              # objc | java | ts | js | swift
output_dir: .
model_file: model.json   # filtered definitions written here

generator:
  command: quicktype
  output_stem: SwaggerModel   # -> SwaggerModel.<lang>

naming: preserve         # preserve | snake_case | camel_case (used by `swag check`)
"#
}
