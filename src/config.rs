use crate::negotiation::{ConfigError, NegotiationConfig};
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Language negotiation
    pub negotiation: NegotiationConfig,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            negotiation: NegotiationConfig {
                match_languages: std::env::var("LANGNEG_MATCH_LANGUAGES")
                    .map(|v| parse_list(&v))
                    .unwrap_or_default(),
                full_locale: match std::env::var("LANGNEG_FULL_LOCALE") {
                    Ok(v) => parse_bool("LANGNEG_FULL_LOCALE", &v)?,
                    Err(_) => false,
                },
                var_language: optional_var("LANGNEG_VAR_LANGUAGE"),
                fallback_value: optional_var("LANGNEG_FALLBACK_VALUE"),
            },

            port: match std::env::var("PORT") {
                Ok(v) => v.parse().with_context(|| format!("Invalid PORT: '{}'", v))?,
                Err(_) => 8080,
            },
        })
    }
}

/// Split a whitespace- or comma-separated list, dropping empty items.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a boolean the way config files commonly spell it (`1`, `t`, `TRUE`, `false`, ...).
fn parse_bool(option: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(ConfigError::InvalidBool {
            option,
            value: other.to_string(),
        }),
    }
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 5] = [
        "LANGNEG_MATCH_LANGUAGES",
        "LANGNEG_FULL_LOCALE",
        "LANGNEG_VAR_LANGUAGE",
        "LANGNEG_FALLBACK_VALUE",
        "PORT",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    // ==================== Parsing Helper Tests ====================

    #[test]
    fn test_parse_list_mixed_separators() {
        assert_eq!(parse_list("de en,fr-CA ,, es"), vec!["de", "en", "fr-CA", "es"]);
        assert!(parse_list("  ").is_empty());
    }

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool("X", value).unwrap());
        }
        for value in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool("X", value).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_rejects_other_values() {
        let err = parse_bool("LANGNEG_FULL_LOCALE", "yes").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                option: "LANGNEG_FULL_LOCALE",
                value: "yes".to_string()
            }
        );
    }

    // ==================== from_env Tests ====================

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.negotiation, NegotiationConfig::default());
        assert_eq!(config.port, 8080);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_all_options() {
        clear_env();
        std::env::set_var("LANGNEG_MATCH_LANGUAGES", "de-DE, en");
        std::env::set_var("LANGNEG_FULL_LOCALE", "true");
        std::env::set_var("LANGNEG_VAR_LANGUAGE", "lang");
        std::env::set_var("LANGNEG_FALLBACK_VALUE", "en");
        std::env::set_var("PORT", "3000");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.negotiation.match_languages, vec!["de-DE", "en"]);
        assert!(config.negotiation.full_locale);
        assert_eq!(config.negotiation.var_language.as_deref(), Some("lang"));
        assert_eq!(config.negotiation.fallback_value.as_deref(), Some("en"));
        assert_eq!(config.port, 3000);
    }

    #[test]
    #[serial]
    fn test_from_env_empty_strings_are_unset() {
        clear_env();
        std::env::set_var("LANGNEG_VAR_LANGUAGE", "");
        std::env::set_var("LANGNEG_FALLBACK_VALUE", "");

        let config = Config::from_env().unwrap();
        clear_env();

        assert!(config.negotiation.var_language.is_none());
        assert!(config.negotiation.fallback_value.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_full_locale() {
        clear_env();
        std::env::set_var("LANGNEG_FULL_LOCALE", "maybe");

        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("maybe"));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");

        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
