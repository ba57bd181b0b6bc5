use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::auth::Identity;
use crate::error::{Error, Result};
use crate::i18n::Locale;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Document store root.
    pub data_dir: Option<PathBuf>,
    /// Province/district/ward table (JSON).
    pub geography: Option<PathBuf>,
    pub locale: Locale,
    pub log_level: Option<String>,
    pub user: Option<Identity>,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "surveyor")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join(CONFIG_FILE))
}

pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".surveyor"))
}

impl Config {
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load `explicit`, or the default location when absent. A missing
    /// default file gives defaults; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            if required {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Self::from_yaml(&raw).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_and_locale() {
        let config = Config::from_yaml(
            "locale: vi\nuser:\n  email: lan@example.org\n  display_name: Lan\n  unit: hr\n",
        )
        .unwrap();
        assert_eq!(config.locale, Locale::Vi);
        let user = config.user.unwrap();
        assert_eq!(user.unit.as_deref(), Some("hr"));
        assert_eq!(config.log_level.as_deref(), None);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_yaml("colour: blue\n").is_err());
    }
}
