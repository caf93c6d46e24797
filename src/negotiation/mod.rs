//! Language negotiation for the Accept-Language header.
//!
//! This module holds everything needed to pick the best offered language for
//! a request. It has no I/O and no shared mutable state.
//!
//! # Architecture
//!
//! - `range`: Parses the header into weighted language ranges
//! - `tag`: Normalized language tags and the Root / wildcard sentinel
//! - `matcher`: Confidence scoring and best-match selection over the offered set
//! - `format`: Renders a matched tag as a language or closest-to-full locale
//! - `negotiator`: Per-request gate applying the fallback policy
//!
//! # Example
//!
//! ```rust
//! use langneg::negotiation::{LanguageNegotiator, NegotiationConfig};
//!
//! let config = NegotiationConfig {
//!     match_languages: vec!["de".into(), "en".into()],
//!     ..NegotiationConfig::default()
//! };
//! let negotiator = LanguageNegotiator::new(&config)?;
//!
//! let result = negotiator.negotiate(Some("en;q=0.4, de;q=0.8"));
//! assert!(result.matched);
//! assert_eq!(result.value, "de");
//! # Ok::<(), langneg::negotiation::ConfigError>(())
//! ```

mod format;
mod matcher;
mod negotiator;
mod range;
mod tag;

pub use format::format_locale;
pub use matcher::{
    confidence, OfferedSet, FULL_MATCH, LANGUAGE_MATCH, NO_MATCH, REGION_MATCH, WILDCARD_MATCH,
};
pub use negotiator::{
    ConfigError, LanguageNegotiator, NegotiationConfig, NegotiationResult, VARIABLE_PREFIX,
};
pub use range::{parse_accept_language, LanguageRange};
pub use tag::{LanguageTag, Subtag};
