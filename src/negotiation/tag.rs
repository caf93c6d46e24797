//! Language tag model: normalized BCP47-style identifiers.
//!
//! A `LanguageTag` carries up to three components (language, script, region),
//! each remembering whether it was explicitly present in the source string.
//! The distinguished Root tag stands for "any" / "no preference" and is never
//! reported as a successful negotiation result.

use std::fmt;
use unic_langid::subtags::{Language, Region, Script};

/// A single tag component together with its exactness marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtag {
    value: String,
    exact: bool,
}

impl Subtag {
    /// Create a component that was explicitly present in the source identifier.
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            exact: true,
        }
    }

    /// The normalized component string (e.g. "en", "Latn", "US").
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the component was explicitly present rather than inferred.
    pub fn is_exact(&self) -> bool {
        self.exact
    }
}

/// A normalized language identifier.
///
/// Tags are immutable value objects. Two tags compare equal when their
/// language, script and region components are equal; variants are kept only
/// for display.
#[derive(Debug, Clone, Default)]
pub struct LanguageTag {
    language: Option<Subtag>,
    script: Option<Subtag>,
    region: Option<Subtag>,
    variants: Vec<String>,
}

impl LanguageTag {
    /// The Root / wildcard tag.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a hyphen-delimited identifier such as `en`, `zh-Hant-TW` or `de-DE-1996`.
    ///
    /// Recognized subtags are validated and case-normalized by `unic_langid`;
    /// anything after the region is kept as a lowercase variant.
    ///
    /// Never fails: `*`, `*-*`, `und` and identifiers without a recognizable
    /// primary language subtag all yield the Root tag.
    ///
    /// # Example
    /// ```
    /// use langneg::negotiation::LanguageTag;
    ///
    /// let tag = LanguageTag::parse("sr-latn-rs");
    /// assert_eq!(tag.to_string(), "sr-Latn-RS");
    /// assert!(LanguageTag::parse("*").is_root());
    /// ```
    pub fn parse(identifier: &str) -> Self {
        let identifier = identifier.trim();
        if identifier == "*" || identifier == "*-*" {
            return Self::root();
        }

        let mut subtags = identifier.split('-').peekable();
        let Some(language) = subtags
            .next()
            .filter(|s| (2..=3).contains(&s.len()))
            .and_then(|s| Language::from_bytes(s.as_bytes()).ok())
            .map(|language| language.to_string())
            .filter(|language| language != "und")
        else {
            return Self::root();
        };

        let mut tag = Self {
            language: Some(Subtag::exact(language)),
            ..Self::default()
        };

        if let Some(script) = subtags
            .peek()
            .and_then(|s| Script::from_bytes(s.as_bytes()).ok())
        {
            subtags.next();
            tag.script = Some(Subtag::exact(script.to_string()));
        }
        if let Some(region) = subtags
            .peek()
            .and_then(|s| Region::from_bytes(s.as_bytes()).ok())
        {
            subtags.next();
            tag.region = Some(Subtag::exact(region.to_string()));
        }
        tag.variants = subtags
            .filter(|s| !s.is_empty())
            .map(|s| s.to_ascii_lowercase())
            .collect();

        tag
    }

    /// Check if this is the Root / wildcard tag.
    pub fn is_root(&self) -> bool {
        self.language.is_none()
    }

    pub fn language(&self) -> Option<&Subtag> {
        self.language.as_ref()
    }

    pub fn script(&self) -> Option<&Subtag> {
        self.script.as_ref()
    }

    pub fn region(&self) -> Option<&Subtag> {
        self.region.as_ref()
    }

    /// Variant subtags, ignored by matching.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }
}

impl PartialEq for LanguageTag {
    fn eq(&self, other: &Self) -> bool {
        fn value(subtag: &Option<Subtag>) -> Option<&str> {
            subtag.as_ref().map(Subtag::value)
        }

        value(&self.language) == value(&other.language)
            && value(&self.script) == value(&other.script)
            && value(&self.region) == value(&other.region)
    }
}

impl Eq for LanguageTag {}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(language) = &self.language else {
            return f.write_str("und");
        };

        f.write_str(language.value())?;
        for subtag in [&self.script, &self.region].into_iter().flatten() {
            write!(f, "-{}", subtag.value())?;
        }
        for variant in &self.variants {
            write!(f, "-{}", variant)?;
        }
        Ok(())
    }
}
