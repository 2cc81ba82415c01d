use std::path::PathBuf;

use crate::SyncError;

pub const DEFAULT_YEAR: i32 = 2025;
pub const DEFAULT_SOURCE_PATH: &str = "data/politicalData.ts";
pub const DEFAULT_OUTPUT_PATH: &str = "public/data/political_data.json";

/// Run configuration, resolved once at startup and passed to every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub database_url: Option<String>,
    pub year: i32,
    pub source_path: PathBuf,
    pub binding: String,
    pub output_path: PathBuf,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub year: Option<i32>,
    pub source_path: Option<PathBuf>,
    pub binding: Option<String>,
    pub output_path: Option<PathBuf>,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SyncError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let year = match get("PULSE_DATA_YEAR") {
            Some(raw) => raw.parse::<i32>().map_err(|_| {
                SyncError::Configuration(format!("PULSE_DATA_YEAR must be a year, got {raw:?}"))
            })?,
            None => DEFAULT_YEAR,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            year: validate_year(year)?,
            source_path: get("PULSE_SOURCE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_PATH)),
            binding: get("PULSE_SOURCE_BINDING")
                .unwrap_or_else(|| pulse_source::DEFAULT_BINDING.to_string()),
            output_path: get("PULSE_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
        })
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, SyncError> {
        if let Some(year) = overrides.year {
            self.year = validate_year(year)?;
        }
        if let Some(path) = overrides.source_path {
            self.source_path = path;
        }
        if let Some(binding) = overrides.binding {
            self.binding = binding;
        }
        if let Some(path) = overrides.output_path {
            self.output_path = path;
        }
        Ok(self)
    }

    pub fn require_database_url(&self) -> Result<&str, SyncError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| SyncError::Configuration("DATABASE_URL is not set".to_string()))
    }
}

fn validate_year(year: i32) -> Result<i32, SyncError> {
    if (1..=9999).contains(&year) {
        Ok(year)
    } else {
        Err(SyncError::Configuration(format!(
            "year {year} is outside 1..=9999"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = SyncConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.year, DEFAULT_YEAR);
        assert_eq!(config.source_path, PathBuf::from(DEFAULT_SOURCE_PATH));
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.binding, "politicalDataMap");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn missing_database_url_is_a_configuration_error() {
        let config = SyncConfig::from_lookup(lookup(&[("DATABASE_URL", "   ")])).unwrap();
        let err = config.require_database_url().unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
    }

    #[test]
    fn environment_values_are_read() {
        let config = SyncConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://pulse@localhost/pulse"),
            ("PULSE_DATA_YEAR", "2024"),
            ("PULSE_OUTPUT_PATH", "/tmp/out.json"),
        ]))
        .unwrap();
        assert_eq!(
            config.require_database_url().unwrap(),
            "postgres://pulse@localhost/pulse"
        );
        assert_eq!(config.year, 2024);
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.json"));
    }

    #[test]
    fn bad_years_are_rejected() {
        assert!(SyncConfig::from_lookup(lookup(&[("PULSE_DATA_YEAR", "twenty")])).is_err());
        assert!(SyncConfig::from_lookup(lookup(&[("PULSE_DATA_YEAR", "0")])).is_err());
        let config = SyncConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config
            .with_overrides(ConfigOverrides {
                year: Some(12_000),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn overrides_win_over_environment() {
        let config = SyncConfig::from_lookup(lookup(&[("PULSE_DATA_YEAR", "2023")]))
            .unwrap()
            .with_overrides(ConfigOverrides {
                year: Some(2024),
                source_path: Some(PathBuf::from("other.js")),
                binding: Some("metrics".into()),
                output_path: None,
            })
            .unwrap();
        assert_eq!(config.year, 2024);
        assert_eq!(config.source_path, PathBuf::from("other.js"));
        assert_eq!(config.binding, "metrics");
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }
}
