use crate::error::Result;
use crate::exceptions::CodePrecedence;
use crate::plugin::Plugin;
use crate::server::SWAGGER_VERSION;
use crate::spec::ApiSpec;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Settings of the generated document.
///
/// Loadable from a YAML (or JSON) file:
///
/// ```yaml
/// title: Pets API
/// version: 1.2.0
/// info:
///   description: Everything about pets
/// options:
///   host: pets.example.com
/// code_precedence: declared
/// ```
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    /// Plugins added before the routes plugin
    #[serde(skip)]
    pub plugins: Vec<Arc<dyn Plugin>>,
    /// Extra fields merged into `info`
    pub info: Map<String, Value>,
    /// Extra top-level fields
    pub options: Map<String, Value>,
    pub code_precedence: CodePrecedence,
}

impl Default for SwaggerConfig {
    fn default() -> Self {
        Self {
            title: "My API".to_string(),
            version: "0.0.1".to_string(),
            plugins: Vec::new(),
            info: Map::new(),
            options: Map::new(),
            code_precedence: CodePrecedence::default(),
        }
    }
}

impl fmt::Debug for SwaggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwaggerConfig")
            .field("title", &self.title)
            .field("version", &self.version)
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("info", &self.info)
            .field("options", &self.options)
            .field("code_precedence", &self.code_precedence)
            .finish()
    }
}

impl SwaggerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// A Swagger 2.0 spec carrying the configured metadata and plugins.
    pub fn to_spec(&self) -> ApiSpec {
        let mut options = self.options.clone();
        if !self.info.is_empty() {
            let mut info = Map::new();
            info.insert("info".to_string(), Value::Object(self.info.clone()));
            crate::spec::deep_update(&mut options, &info);
        }

        self.plugins.iter().fold(
            ApiSpec::new(&self.title, &self.version, SWAGGER_VERSION).with_options(options),
            |spec, plugin| spec.with_plugin(plugin.clone()),
        )
    }
}
