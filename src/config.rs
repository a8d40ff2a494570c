use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::launcher::Handoff;

/// Logging filter for the launcher itself (`env_logger` syntax)
pub const LOG_ENV: &str = "BUNDLE_LAUNCHER_LOG";
/// `exec` or `spawn`
pub const HANDOFF_ENV: &str = "BUNDLE_LAUNCHER_HANDOFF";
/// Explicit bundle root, skipping self-location
pub const ROOT_ENV: &str = "BUNDLE_LAUNCHER_ROOT";

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BUNDLE_LAUNCHER_HANDOFF must be \"exec\" or \"spawn\", not {0:?}")]
    InvalidHandoff(String),
}

/// Launcher settings read once from the launcher's own environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub handoff: Handoff,
    pub root_override: Option<PathBuf>,
}

impl LauncherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key), home::home_dir())
    }

    /// Build the config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, home_dir: Option<PathBuf>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let handoff = match lookup(HANDOFF_ENV) {
            None => Handoff::default(),
            Some(value) => match value.to_string_lossy().trim().to_ascii_lowercase().as_str() {
                "" => Handoff::default(),
                "exec" => Handoff::Exec,
                "spawn" => Handoff::Spawn,
                other => return Err(ConfigError::InvalidHandoff(other.to_string())),
            },
        };

        let root_override = lookup(ROOT_ENV)
            .filter(|value| !value.is_empty())
            .map(|value| expand_home(Path::new(&value), home_dir.as_deref()));

        Ok(Self {
            handoff,
            root_override,
        })
    }
}

/// Expand a leading `~` to the user's home directory
fn expand_home(path: &Path, home_dir: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home_dir) {
        (Ok(rest), Some(home)) if !home.as_os_str().is_empty() => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<LauncherConfig, ConfigError> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        LauncherConfig::from_lookup(
            |key| vars.get(key).cloned(),
            Some(PathBuf::from("/Users/someone")),
        )
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.handoff, Handoff::default());
        assert_eq!(config.root_override, None);
    }

    #[test]
    fn handoff_mode_is_case_insensitive() {
        let config = config_from(&[(HANDOFF_ENV, "Spawn")]).unwrap();
        assert_eq!(config.handoff, Handoff::Spawn);

        let config = config_from(&[(HANDOFF_ENV, "exec")]).unwrap();
        assert_eq!(config.handoff, Handoff::Exec);
    }

    #[test]
    fn unknown_handoff_mode_is_rejected() {
        let err = config_from(&[(HANDOFF_ENV, "fork")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidHandoff("fork".to_string()));
    }

    #[test]
    fn root_override_expands_home() {
        let config = config_from(&[(ROOT_ENV, "~/Applications/Tool.app")]).unwrap();
        assert_eq!(
            config.root_override,
            Some(PathBuf::from("/Users/someone/Applications/Tool.app"))
        );
    }

    #[test]
    fn absolute_root_override_is_kept() {
        let config = config_from(&[(ROOT_ENV, "/Apps/Tool.app")]).unwrap();
        assert_eq!(config.root_override, Some(PathBuf::from("/Apps/Tool.app")));
    }

    #[test]
    fn empty_root_override_is_ignored() {
        let config = config_from(&[(ROOT_ENV, "")]).unwrap();
        assert_eq!(config.root_override, None);
    }

    #[test]
    fn tilde_inside_a_name_is_literal() {
        assert_eq!(
            expand_home(Path::new("~other/Tool.app"), Some(Path::new("/Users/someone"))),
            PathBuf::from("~other/Tool.app")
        );
    }
}
