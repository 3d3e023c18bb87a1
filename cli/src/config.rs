use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use shared::constants::{DEFAULT_MAX_SELECTABLE, DEFAULT_MIN_SELECTABLE, SPIN_DURATION_MS};
use shared::validation::ValidationError;
use shared::SpinConfiguration;

pub const MIN_SELECTABLE_VAR: &str = "PICKWHEEL_MIN_SELECTABLE";
pub const MAX_SELECTABLE_VAR: &str = "PICKWHEEL_MAX_SELECTABLE";
pub const RESOLVE_DELAY_VAR: &str = "PICKWHEEL_RESOLVE_DELAY_MS";
pub const SEED_VAR: &str = "PICKWHEEL_SEED";
pub const PRESET_VAR: &str = "PICKWHEEL_PRESET";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Default,
    Empty,
}

impl FromStr for Preset {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "empty" | "none" => Ok(Self::Empty),
            _ => Err(()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
    Bounds(ValidationError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { key, value } => write!(f, "Invalid value for {}: {:?}", key, value),
            Self::Bounds(e) => match &e.message {
                Some(message) => write!(f, "Invalid selectable bounds: {}", message),
                None => write!(f, "Invalid selectable bounds: {}", e.code),
            },
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        Self::Bounds(err)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub spin: SpinConfiguration,
    pub resolve_delay: Duration,
    pub seed: Option<u64>,
    pub preset: Preset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spin: SpinConfiguration::default(),
            resolve_delay: Duration::from_millis(SPIN_DURATION_MS),
            seed: None,
            preset: Preset::Default,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let min = parse_or(&lookup, MIN_SELECTABLE_VAR, DEFAULT_MIN_SELECTABLE)?;
        let max = parse_or(&lookup, MAX_SELECTABLE_VAR, DEFAULT_MAX_SELECTABLE)?;
        let delay_ms = parse_or(&lookup, RESOLVE_DELAY_VAR, SPIN_DURATION_MS)?;
        let seed = match lookup(SEED_VAR) {
            Some(value) => Some(parse_value(SEED_VAR, &value)?),
            None => None,
        };
        let preset = match lookup(PRESET_VAR) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: PRESET_VAR, value })?,
            None => Preset::Default,
        };

        Ok(Self {
            spin: SpinConfiguration::new(min, max)?,
            resolve_delay: Duration::from_millis(delay_ms),
            seed,
            preset,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => parse_value(key, &value),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.spin, SpinConfiguration::default());
        assert_eq!(config.resolve_delay, Duration::from_secs(3));
        assert_eq!(config.seed, None);
        assert_eq!(config.preset, Preset::Default);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (MIN_SELECTABLE_VAR, "3"),
            (MAX_SELECTABLE_VAR, " 5 "),
            (RESOLVE_DELAY_VAR, "250"),
            (SEED_VAR, "99"),
            (PRESET_VAR, "Empty"),
        ]))
        .unwrap();
        assert_eq!(config.spin.min_selectable(), 3);
        assert_eq!(config.spin.max_selectable(), 5);
        assert_eq!(config.resolve_delay, Duration::from_millis(250));
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.preset, Preset::Empty);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = Config::from_lookup(lookup(&[(SEED_VAR, "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: SEED_VAR, .. }));

        let err = Config::from_lookup(lookup(&[(PRESET_VAR, "fancy")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: PRESET_VAR, .. }));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = Config::from_lookup(lookup(&[
            (MIN_SELECTABLE_VAR, "6"),
            (MAX_SELECTABLE_VAR, "4"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Bounds(_)));
        assert!(err.to_string().contains("cannot exceed"));
    }
}
