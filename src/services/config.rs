use crate::feed::DEFAULT_RELEASE_HISTORY_BASE;
use crate::services::fetcher::{CONTRIB_CVS_ROOT, CORE_CVS_ROOT};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: ConfigGeneral,
}

#[derive(Debug, Deserialize)]
pub struct ConfigGeneral {
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Candidate core versions for release-tag resolution, in priority order.
    #[serde(default = "default_core_versions")]
    pub core_versions: Vec<String>,
    #[serde(default = "default_release_history_base")]
    pub release_history_base: String,
    #[serde(default = "default_core_cvs_root")]
    pub core_cvs_root: String,
    #[serde(default = "default_contrib_cvs_root")]
    pub contrib_cvs_root: String,
}

impl Default for ConfigGeneral {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            core_versions: default_core_versions(),
            release_history_base: default_release_history_base(),
            core_cvs_root: default_core_cvs_root(),
            contrib_cvs_root: default_contrib_cvs_root(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("stats_checkout")
}

fn default_core_versions() -> Vec<String> {
    vec!["7.x".to_string(), "6.x".to_string()]
}

fn default_release_history_base() -> String {
    DEFAULT_RELEASE_HISTORY_BASE.to_string()
}

fn default_core_cvs_root() -> String {
    CORE_CVS_ROOT.to_string()
}

fn default_contrib_cvs_root() -> String {
    CONTRIB_CVS_ROOT.to_string()
}

/// `$HOME/.config/modstats/config.toml`; absent file means defaults, a
/// malformed one is an error.
pub fn load_config() -> anyhow::Result<ConfigFile> {
    let home = std::env::var("HOME")?;
    let path = PathBuf::from(home).join(".config/modstats/config.toml");
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::ConfigFile;
    use std::path::Path;

    #[test]
    fn empty_document_yields_defaults() {
        let config: ConfigFile = toml::from_str("").expect("empty config parses");
        assert_eq!(config.general.download_dir, Path::new("stats_checkout"));
        assert_eq!(config.general.core_versions, vec!["7.x", "6.x"]);
    }

    #[test]
    fn partial_general_table_keeps_remaining_defaults() {
        let config: ConfigFile = toml::from_str(
            r#"[general]
core_versions = ["8.x"]
"#,
        )
        .expect("partial config parses");
        assert_eq!(config.general.core_versions, vec!["8.x"]);
        assert_eq!(config.general.download_dir, Path::new("stats_checkout"));
        assert!(config.general.core_cvs_root.contains("cvs.drupal.org"));
    }
}
