use std::collections::BTreeMap;

use crate::{
    conf::{AuthConfig, CorsConfig, DatabaseConfig, ResourceConfig, ServerConfig},
    core::RestplateError::{self, ConfigParsingError},
};
use config::{Config as CConfig, ConfigBuilder, builder::DefaultState};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "RESTPLATE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default = "Config::default_resources")]
    pub resources: BTreeMap<String, ResourceConfig>,
}

impl Config {
    fn default_resources() -> BTreeMap<String, ResourceConfig> {
        BTreeMap::from([(String::from("table_one"), ResourceConfig::table_one())])
    }

    pub fn from_str(toml_str: &str) -> Result<Config, RestplateError> {
        let builder = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml));
        Self::build(builder)
    }

    /// Loads the optional TOML file, then overlays `RESTPLATE_*` environment
    /// variables (`RESTPLATE_AUTH__API_TOKEN=...`).
    pub fn load(path: Option<&str>) -> Result<Config, RestplateError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, RestplateError> {
        builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            resources: Self::default_resources(),
        }
    }
}
