use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};

use super::{ReposweepConfig, smart_load};
use crate::error::ConfigError;
use crate::scheduler::CancelPolicy;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "REPOSWEEP_";

/// Values given on the command line. They sit on top of every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root: Option<String>,
    pub parallel: Option<usize>,
    pub on_interrupt: Option<CancelPolicy>,
}

/// Layered configuration sources, merged lowest to highest priority.
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Self {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // A custom config replaces the user and directory-local files
        if let Some(custom_path) = custom_config {
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            if let Some(user_config) = Self::user_config_path() {
                figment = figment
                    .merge(Toml::file(user_config.with_extension("toml")))
                    .merge(Json::file(user_config.with_extension("json")))
                    .merge(Yaml::file(user_config.with_extension("yaml")))
                    .merge(Yaml::file(user_config.with_extension("yml")));
            }
            figment = figment
                .merge(Toml::file("reposweep.toml"))
                .merge(Json::file("reposweep.json"))
                .merge(Yaml::file("reposweep.yaml"))
                .merge(Yaml::file("reposweep.yml"));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        ConfigLoader { figment }
    }

    /// Layer command-line values on top of everything loaded so far.
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(root) = &overrides.root {
            self.figment = self.figment.merge(Serialized::default("scan.root", root));
        }
        if let Some(parallel) = overrides.parallel {
            self.figment = self
                .figment
                .merge(Serialized::default("run.parallel", parallel));
        }
        if let Some(policy) = overrides.on_interrupt {
            self.figment = self
                .figment
                .merge(Serialized::default("run.on_interrupt", policy));
        }
        self
    }

    /// Extract and validate the merged configuration.
    pub fn extract(&self) -> Result<ReposweepConfig, ConfigError> {
        let config: ReposweepConfig = self.figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("reposweep").join("config.toml"))
    }
}
