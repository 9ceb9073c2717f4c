//! Normalized, immutable run settings derived from [`Config`].

use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::warn;

use super::types::Config;
use super::ConfigError;

/// Output extension, always stored with its leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetFormat(String);

impl TargetFormat {
    /// Normalizes `"m4a"` and `".m4a"` to the same value.
    ///
    /// Rejects empty formats and anything that is not a bare extension, so
    /// a destination always keeps an extension.
    pub fn new(format: &str) -> Result<Self, ConfigError> {
        let trimmed = format.trim();
        let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);

        if bare.is_empty() {
            return Err(ConfigError::ValidationError(
                "conversion.format cannot be empty".to_string(),
            ));
        }
        if bare.contains(['/', '\\', '.']) {
            return Err(ConfigError::ValidationError(format!(
                "conversion.format must be a bare extension, got {:?}",
                format
            )));
        }

        Ok(Self(format!(".{}", bare)))
    }

    /// The extension including the dot, e.g. `".m4a"`.
    pub fn with_dot(&self) -> &str {
        &self.0
    }

    /// The extension without the dot, e.g. `"m4a"`.
    pub fn extension(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the scheduler needs for one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSettings {
    pub format: TargetFormat,
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub concurrency: NonZeroUsize,
}

impl RunSettings {
    pub fn new(
        format: TargetFormat,
        source_root: PathBuf,
        destination_root: PathBuf,
        concurrency: NonZeroUsize,
    ) -> Self {
        Self {
            format,
            source_root,
            destination_root,
            concurrency,
        }
    }

    /// Builds settings from a loaded configuration, coercing a thread
    /// count below 1 to 1. The configuration itself is left untouched.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let conversion = &config.conversion;
        Ok(Self {
            format: TargetFormat::new(&conversion.format)?,
            source_root: conversion.source_path.clone(),
            destination_root: conversion.destination_path.clone(),
            concurrency: coerce_concurrency(conversion.thread_count),
        })
    }
}

fn coerce_concurrency(thread_count: i64) -> NonZeroUsize {
    match usize::try_from(thread_count).ok().and_then(NonZeroUsize::new) {
        Some(n) => n,
        None => {
            warn!(
                "Invalid thread count {}, falling back to a single worker",
                thread_count
            );
            NonZeroUsize::MIN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConversionConfig, EncoderConfig};

    fn config(thread_count: i64) -> Config {
        Config {
            conversion: ConversionConfig {
                format: "flac".to_string(),
                source_path: PathBuf::from("/a/b"),
                destination_path: PathBuf::from("/x/y"),
                thread_count,
            },
            encoder: EncoderConfig::default(),
        }
    }

    fn format(value: &str) -> TargetFormat {
        TargetFormat::new(value).unwrap()
    }

    #[test]
    fn test_target_format_normalization() {
        assert_eq!(format("m4a").with_dot(), ".m4a");
        assert_eq!(format(".m4a").with_dot(), ".m4a");
        assert_eq!(format(" m4a ").with_dot(), ".m4a");
        assert_eq!(format(".m4a").extension(), "m4a");
        assert_eq!(format("m4a"), format(".m4a"));
    }

    #[test]
    fn test_target_format_rejects_empty_and_compound() {
        for bad in ["", ".", " . ", "..m4a", "tar.gz", "m4a/x", "m4a\\x"] {
            assert!(
                matches!(TargetFormat::new(bad), Err(ConfigError::ValidationError(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_from_config_rejects_empty_format() {
        let mut config = config(2);
        config.conversion.format = ".".to_string();
        assert!(RunSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_concurrency_coerced_to_one() {
        let concurrency = |n| RunSettings::from_config(&config(n)).unwrap().concurrency.get();
        assert_eq!(concurrency(0), 1);
        assert_eq!(concurrency(-5), 1);
        assert_eq!(concurrency(8), 8);
    }

    #[test]
    fn test_from_config_leaves_config_untouched() {
        let config = config(-1);
        let settings = RunSettings::from_config(&config).unwrap();
        assert_eq!(config.conversion.thread_count, -1);
        assert_eq!(settings.format.with_dot(), ".flac");
        assert_eq!(settings.source_root, PathBuf::from("/a/b"));
        assert_eq!(settings.destination_root, PathBuf::from("/x/y"));
    }
}
