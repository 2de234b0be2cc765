use std::path::PathBuf;
use std::sync::OnceLock;

static TAXFOREST_HOME: OnceLock<PathBuf> = OnceLock::new();

pub const CONFIG_FILE: &str = "taxforest.toml";

/// Get the taxforest home directory
/// Checks TAXFOREST_HOME environment variable, falls back to the platform
/// config directory (e.g. ~/.config/taxforest), then ./.taxforest
pub fn taxforest_home() -> PathBuf {
    TAXFOREST_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TAXFOREST_HOME") {
                PathBuf::from(path)
            } else {
                dirs::config_dir()
                    .map(|dir| dir.join("taxforest"))
                    .unwrap_or_else(|| PathBuf::from(".taxforest"))
            }
        })
        .clone()
}

/// Per-user configuration file
pub fn user_config_path() -> PathBuf {
    taxforest_home().join(CONFIG_FILE)
}
