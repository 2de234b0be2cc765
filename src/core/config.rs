use crate::core::paths;
use crate::TaxforestError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub taxonomy: TaxonomyConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// TaxID at which genealogies end
    pub root_id: u32,
    /// Display name for taxa without a scientific name
    pub unknown_name: String,
    /// names.dmp name class kept in the name index
    pub scientific_name_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Record names missing from names.dmp as skipped instead of failing
    pub skip_unresolved: bool,
    /// Treat all-digit query lines as taxIDs rather than names
    pub numeric_as_id: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub nodes_file: String,
    pub names_file: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            root_id: 1,
            unknown_name: "unknown".to_string(),
            scientific_name_class: "scientific name".to_string(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            skip_unresolved: false,
            numeric_as_id: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            nodes_file: "nodes2.dmp".to_string(),
            names_file: "names2.dmp".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), TaxforestError> {
        if self.taxonomy.scientific_name_class.is_empty() {
            return Err(TaxforestError::Config(
                "taxonomy.scientific_name_class must not be empty".to_string(),
            ));
        }
        if !matches!(self.output.format.as_str(), "text" | "json") {
            return Err(TaxforestError::Config(format!(
                "Unknown output format: {}",
                self.output.format
            )));
        }
        if self.output.nodes_file == self.output.names_file {
            return Err(TaxforestError::Config(
                "output.nodes_file and output.names_file must differ".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, TaxforestError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| TaxforestError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), TaxforestError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| TaxforestError::Config(format!("Failed to serialize config: {}", e)))?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config file to use: the explicit path, then ./taxforest.toml, then the
/// per-user file. `None` means built-in defaults.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(paths::CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    let user = paths::user_config_path();
    user.exists().then_some(user)
}

/// Load the config chosen by [`find_config`], or defaults
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config, TaxforestError> {
    match find_config(explicit) {
        Some(path) => load_config(path),
        None => Ok(default_config()),
    }
}
