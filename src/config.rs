//! Configuration loading and management

use std::path::PathBuf;

use crate::counter::Thresholds;
use crate::error::ConfigError;

const SOCKET_VAR: &str = "REPCOUNT_SOCKET";
const UP_ANGLE_VAR: &str = "REPCOUNT_UP_ANGLE";
const DOWN_ANGLE_VAR: &str = "REPCOUNT_DOWN_ANGLE";
const MIN_CONFIDENCE_VAR: &str = "REPCOUNT_MIN_CONFIDENCE";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Unix domain socket for IPC
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Counting thresholds, fixed for the daemon's lifetime
    pub thresholds: Thresholds,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup("HOME").ok_or(ConfigError::MissingHome)?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("repcount");

        let socket_path = lookup(SOCKET_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("daemon.sock"));

        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            up_angle_deg: parse_or(&lookup, UP_ANGLE_VAR, defaults.up_angle_deg)?,
            down_angle_deg: parse_or(&lookup, DOWN_ANGLE_VAR, defaults.down_angle_deg)?,
            min_confidence: parse_or(&lookup, MIN_CONFIDENCE_VAR, defaults.min_confidence)?,
        };
        thresholds.validate()?;

        Ok(Self {
            socket_path,
            data_dir,
            thresholds,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}

fn parse_or<F>(lookup: &F, var: &'static str, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("HOME", "/home/lifter")])).unwrap();
        assert_eq!(
            config.socket_path,
            PathBuf::from("/home/lifter/.local/share/repcount/daemon.sock")
        );
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOME", "/home/lifter"),
            ("REPCOUNT_SOCKET", "/tmp/rc.sock"),
            ("REPCOUNT_UP_ANGLE", "150"),
            ("REPCOUNT_DOWN_ANGLE", " 80.5 "),
            ("REPCOUNT_MIN_CONFIDENCE", "0.7"),
        ]))
        .unwrap();
        assert_eq!(config.socket_path, PathBuf::from("/tmp/rc.sock"));
        assert_eq!(config.thresholds, Thresholds::new(150.0, 80.5, 0.7));
    }

    #[test]
    fn test_missing_home() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingHome)));
    }

    #[test]
    fn test_bad_number() {
        let result = Config::from_lookup(lookup_from(&[
            ("HOME", "/home/lifter"),
            ("REPCOUNT_UP_ANGLE", "high"),
        ]));
        match result {
            Err(ConfigError::InvalidNumber { var, value }) => {
                assert_eq!(var, "REPCOUNT_UP_ANGLE");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("HOME", "/home/lifter"),
            ("REPCOUNT_DOWN_ANGLE", "170"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvertedThresholds { .. })));
    }

    #[test]
    fn test_config_load() {
        // Only meaningful where HOME is set, as on any dev machine or CI runner
        if std::env::var("HOME").is_ok() {
            let config = Config::load().unwrap();
            assert!(config.data_dir.to_string_lossy().contains("repcount"));
        }
    }
}
