//! Negotiation gate: per-request orchestration and fallback policy.

use super::format::format_locale;
use super::matcher::OfferedSet;
use super::range::parse_accept_language;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Prefix under which the resolved value is published to the host.
pub const VARIABLE_PREFIX: &str = "langneg_";

/// Errors raised while building a negotiator from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "cannot store language negotiation results in variable '{variable}' without offered \
         languages (use '*' in match_languages to work around this constraint)"
    )]
    VariableWithoutLanguages { variable: String },

    #[error("invalid boolean for {option}: '{value}'")]
    InvalidBool { option: &'static str, value: String },
}

/// Already-parsed matcher configuration, as produced by the configuration loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Offered language identifiers, in priority order
    pub match_languages: Vec<String>,

    /// Publish the closest-to-full locale (e.g. "en-US") instead of the language only
    pub full_locale: bool,

    /// Variable name; the value is published as `langneg_<name>`
    pub var_language: Option<String>,

    /// Value used when no offered language matches
    pub fallback_value: Option<String>,
}

/// Outcome of negotiating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationResult {
    /// Whether the request satisfies the matcher
    pub matched: bool,

    /// Negotiated locale, fallback value, or empty
    pub value: String,
}

impl NegotiationResult {
    fn matched(value: impl Into<String>) -> Self {
        Self {
            matched: true,
            value: value.into(),
        }
    }

    fn unmatched() -> Self {
        Self {
            matched: false,
            value: String::new(),
        }
    }
}

/// Language negotiator built once from configuration.
///
/// Immutable after construction, so a single instance can be shared across
/// concurrent requests (e.g. behind an `Arc`).
#[derive(Debug, Clone)]
pub struct LanguageNegotiator {
    offered: OfferedSet,
    full_locale: bool,
    var_language: Option<String>,
    fallback_value: Option<String>,
}

impl LanguageNegotiator {
    /// Validate the configuration and build the negotiator.
    ///
    /// Empty `var_language` and `fallback_value` strings count as unset.
    ///
    /// # Returns
    /// * `Ok(LanguageNegotiator)` for a consistent configuration
    /// * `Err(ConfigError::VariableWithoutLanguages)` if a variable is named
    ///   but no languages are offered
    pub fn new(config: &NegotiationConfig) -> Result<Self, ConfigError> {
        let var_language = non_empty(&config.var_language);
        let fallback_value = non_empty(&config.fallback_value);

        if let Some(variable) = &var_language {
            if config.match_languages.is_empty() {
                return Err(ConfigError::VariableWithoutLanguages {
                    variable: variable.clone(),
                });
            }
        }

        Ok(Self {
            offered: OfferedSet::new(&config.match_languages),
            full_locale: config.full_locale,
            var_language,
            fallback_value,
        })
    }

    pub fn offered(&self) -> &OfferedSet {
        &self.offered
    }

    /// Full name of the published variable (`langneg_<var_language>`), if configured.
    pub fn variable_name(&self) -> Option<String> {
        self.var_language
            .as_ref()
            .map(|name| format!("{}{}", VARIABLE_PREFIX, name))
    }

    /// Negotiate a request given its raw Accept-Language header.
    ///
    /// # Arguments
    /// * `accept_language` - Header value, or `None` when the header is absent
    ///
    /// # Returns
    /// * `matched = true` with an empty value when no languages are offered
    /// * `matched = true` with the formatted locale when an offered tag matches
    /// * `matched = true` with the fallback value when nothing matches and a
    ///   fallback is configured
    /// * `matched = false` with an empty value otherwise
    pub fn negotiate(&self, accept_language: Option<&str>) -> NegotiationResult {
        if self.offered.is_empty() {
            return NegotiationResult::matched(String::new());
        }

        let header = accept_language.unwrap_or_default();
        debug!("Header Accept-Language: {:?}", header);
        debug!(
            "Match language values: {:?}",
            self.offered.iter().map(ToString::to_string).collect::<Vec<_>>()
        );

        let ranges = parse_accept_language(header);
        let tag = self.offered.best_match(&ranges);
        if !tag.is_root() {
            let value = format_locale(tag, self.full_locale);
            debug!("Matched language value: {}", value);
            return NegotiationResult::matched(value);
        }

        match &self.fallback_value {
            Some(fallback) => {
                debug!("No offered language matched, using fallback value: {}", fallback);
                NegotiationResult::matched(fallback.clone())
            }
            None => {
                debug!("No offered language matched");
                NegotiationResult::unmatched()
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(languages: &[&str]) -> NegotiationConfig {
        NegotiationConfig {
            match_languages: languages.iter().map(|l| l.to_string()).collect(),
            ..NegotiationConfig::default()
        }
    }

    fn negotiator(config: NegotiationConfig) -> LanguageNegotiator {
        LanguageNegotiator::new(&config).expect("valid config")
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_variable_without_languages_is_rejected() {
        let config = NegotiationConfig {
            var_language: Some("lang".to_string()),
            ..NegotiationConfig::default()
        };

        let err = LanguageNegotiator::new(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::VariableWithoutLanguages {
                variable: "lang".to_string()
            }
        );
        assert!(err.to_string().contains("'*'"));
    }

    #[test]
    fn test_empty_variable_counts_as_unset() {
        let config = NegotiationConfig {
            var_language: Some(String::new()),
            ..NegotiationConfig::default()
        };
        let negotiator = negotiator(config);
        assert!(negotiator.variable_name().is_none());
    }

    #[test]
    fn test_variable_name_is_prefixed() {
        let negotiator = negotiator(NegotiationConfig {
            var_language: Some("lang".to_string()),
            ..config(&["en"])
        });
        assert_eq!(negotiator.variable_name().as_deref(), Some("langneg_lang"));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: NegotiationConfig =
            serde_json::from_str(r#"{"match_languages": ["de", "en"], "var_language": "lang"}"#)
                .unwrap();
        assert_eq!(config.match_languages, vec!["de", "en"]);
        assert!(!config.full_locale);
        assert_eq!(config.var_language.as_deref(), Some("lang"));
        assert!(config.fallback_value.is_none());
    }

    // ==================== No Offered Languages Tests ====================

    #[test]
    fn test_no_offered_languages_always_matches() {
        let negotiator = negotiator(NegotiationConfig::default());
        for header in [None, Some(""), Some("fr-FR"), Some("garbage;;q=7")] {
            let result = negotiator.negotiate(header);
            assert!(result.matched);
            assert!(result.value.is_empty());
        }
    }

    // ==================== Scenario Tests ====================

    #[test]
    fn test_no_match_without_fallback() {
        let result = negotiator(config(&["de", "en"])).negotiate(Some("fr-FR"));
        assert_eq!(
            result,
            NegotiationResult {
                matched: false,
                value: String::new()
            }
        );
    }

    #[test]
    fn test_no_match_with_fallback() {
        let negotiator = negotiator(NegotiationConfig {
            fallback_value: Some("Fallback".to_string()),
            ..config(&["de", "en"])
        });
        let result = negotiator.negotiate(Some("fr-FR"));
        assert!(result.matched);
        assert_eq!(result.value, "Fallback");
    }

    #[test]
    fn test_missing_header_uses_fallback() {
        let negotiator = negotiator(NegotiationConfig {
            fallback_value: Some("en".to_string()),
            ..config(&["de", "en"])
        });
        assert_eq!(negotiator.negotiate(None).value, "en");
    }

    #[test]
    fn test_missing_header_without_fallback_does_not_match() {
        assert!(!negotiator(config(&["de", "en"])).negotiate(None).matched);
    }

    #[test]
    fn test_exact_language_match() {
        let result = negotiator(config(&["de", "en"])).negotiate(Some("en"));
        assert!(result.matched);
        assert_eq!(result.value, "en");
    }

    #[test]
    fn test_quality_beats_position() {
        let result = negotiator(config(&["de", "en"])).negotiate(Some("en;q=0.4, de;q=0.8"));
        assert_eq!(result.value, "de");
    }

    #[test]
    fn test_stronger_preference_wins_over_exact_weaker_one() {
        let result = negotiator(config(&["en", "de"])).negotiate(Some("de-DE;q=0.9, en;q=0.5"));
        assert!(result.matched);
        assert_eq!(result.value, "de");
    }

    #[test]
    fn test_zero_quality_range_does_not_block_wildcard() {
        let result = negotiator(config(&["en-US", "en-GB"])).negotiate(Some("en;q=0, *"));
        assert!(result.matched);
        assert_eq!(result.value, "en");
    }

    #[test]
    fn test_full_locale() {
        let negotiator = negotiator(NegotiationConfig {
            full_locale: true,
            ..config(&["de-DE", "en"])
        });
        assert_eq!(negotiator.negotiate(Some("de-DE")).value, "de-DE");
    }

    #[test]
    fn test_region_mismatch_reports_offered_components() {
        let full = negotiator(NegotiationConfig {
            full_locale: true,
            ..config(&["en-US"])
        });
        let result = full.negotiate(Some("en-AU"));
        assert!(result.matched);
        assert_eq!(result.value, "en-US");

        let short = negotiator(config(&["en-US"]));
        assert_eq!(short.negotiate(Some("en-AU")).value, "en");
    }

    #[test]
    fn test_language_only_mode_never_contains_hyphen() {
        let negotiator = negotiator(config(&["zh-Hant-TW", "sr-Latn", "en-US"]));
        for header in ["zh-TW", "sr", "en-US", "*"] {
            let result = negotiator.negotiate(Some(header));
            assert!(result.matched);
            assert!(!result.value.contains('-'), "{}", result.value);
        }
    }

    #[test]
    fn test_negotiation_is_idempotent() {
        let negotiator = negotiator(NegotiationConfig {
            fallback_value: Some("de".to_string()),
            ..config(&["de", "en-GB", "fr"])
        });
        let header = Some("fr-CA;q=0.7, en, *;q=0.1");
        assert_eq!(negotiator.negotiate(header), negotiator.negotiate(header));
    }
}
