use super::schema::{Config, MAX_THINKING_DELAY};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref delay) = config.thinking_delay {
        match humantime::parse_duration(delay.trim()) {
            Ok(d) if d > MAX_THINKING_DELAY => errors.push(format!(
                "thinking_delay: '{}' exceeds the maximum of {}",
                delay,
                humantime::format_duration(MAX_THINKING_DELAY)
            )),
            Ok(_) => {}
            Err(e) => errors.push(format!("thinking_delay: invalid duration '{}' - {}", delay, e)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_valid_delay() {
        let config = Config {
            thinking_delay: Some("1500ms".to_string()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_delay_format() {
        let config = Config {
            thinking_delay: Some("a while".to_string()),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("thinking_delay"));
        assert!(errors[0].contains("a while"));
    }

    #[test]
    fn test_delay_too_long() {
        let config = Config {
            thinking_delay: Some("1m".to_string()),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("exceeds the maximum"));
    }

    #[test]
    fn test_max_delay_is_allowed() {
        let config = Config {
            thinking_delay: Some("10s".to_string()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
