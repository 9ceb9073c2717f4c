use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
}

/// What to convert and where to put it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Target extension, with or without the leading dot.
    #[serde(default = "default_format")]
    pub format: String,
    /// Root of the library to convert. Every input file lives below it.
    pub source_path: PathBuf,
    /// Root of the mirrored output tree.
    pub destination_path: PathBuf,
    /// Maximum simultaneous encoder processes. Values below 1 run serially.
    #[serde(default = "default_thread_count")]
    pub thread_count: i64,
}

fn default_format() -> String {
    "m4a".to_string()
}

fn default_thread_count() -> i64 {
    std::thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(1)
}

/// Encoder executable configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoderConfig {
    /// Encoder binary, or a directory containing it.
    #[serde(default = "default_encoder_path")]
    pub path: PathBuf,
    /// Value passed to `-loglevel`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Extra arguments placed right before the output path.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            path: default_encoder_path(),
            log_level: default_log_level(),
            extra_args: Vec::new(),
        }
    }
}

fn default_encoder_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_log_level() -> String {
    "error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_defaults() {
        let config = EncoderConfig::default();
        assert_eq!(config.path, PathBuf::from("ffmpeg"));
        assert_eq!(config.log_level, "error");
        assert!(config.extra_args.is_empty());
    }

    #[test]
    fn test_default_thread_count_is_positive() {
        assert!(default_thread_count() >= 1);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            conversion: ConversionConfig {
                format: ".m4a".to_string(),
                source_path: PathBuf::from("/music"),
                destination_path: PathBuf::from("/alac"),
                thread_count: 3,
            },
            encoder: EncoderConfig::default(),
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.conversion.thread_count, 3);
        assert_eq!(parsed.conversion.source_path, PathBuf::from("/music"));
    }
}
