use super::{settings::TargetFormat, types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Source and destination roots are set and differ
/// - Target format is a bare extension
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let conversion = &config.conversion;

    if conversion.source_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "conversion.source_path cannot be empty".to_string(),
        ));
    }

    if conversion.destination_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "conversion.destination_path cannot be empty".to_string(),
        ));
    }

    if conversion.source_path == conversion.destination_path {
        return Err(ConfigError::ValidationError(
            "conversion.destination_path must differ from conversion.source_path".to_string(),
        ));
    }

    TargetFormat::new(&conversion.format)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConversionConfig, EncoderConfig};
    use std::path::PathBuf;

    fn config(format: &str, source: &str, destination: &str) -> Config {
        Config {
            conversion: ConversionConfig {
                format: format.to_string(),
                source_path: PathBuf::from(source),
                destination_path: PathBuf::from(destination),
                thread_count: 4,
            },
            encoder: EncoderConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config("m4a", "/music", "/alac")).is_ok());
        assert!(validate_config(&config(".m4a", "/music", "/alac")).is_ok());
    }

    #[test]
    fn test_validate_same_roots_fails() {
        let result = validate_config(&config("m4a", "/music", "/music"));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_paths_fail() {
        assert!(validate_config(&config("m4a", "", "/alac")).is_err());
        assert!(validate_config(&config("m4a", "/music", "")).is_err());
    }

    #[test]
    fn test_validate_bad_format_fails() {
        assert!(validate_config(&config("", "/music", "/alac")).is_err());
        assert!(validate_config(&config(".", "/music", "/alac")).is_err());
        assert!(validate_config(&config("m4a/x", "/music", "/alac")).is_err());
        assert!(validate_config(&config("tar.gz", "/music", "/alac")).is_err());
    }
}
