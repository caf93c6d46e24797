//! Accept-Language parsing into weighted language ranges.

use tracing::debug;

/// One client-stated preference: a language identifier plus its quality weight.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    /// Raw language identifier as sent by the client (e.g. "de-AT", "*")
    pub tag: String,

    /// Quality weight in `[0.0, 1.0]`; 0 marks the range as not acceptable
    pub quality: f32,
}

impl LanguageRange {
    /// Create a range with the default quality of 1.0.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            quality: 1.0,
        }
    }

    /// Create a range with an explicit quality weight.
    pub fn with_quality(tag: impl Into<String>, quality: f32) -> Self {
        Self {
            tag: tag.into(),
            quality,
        }
    }

    /// Check if the client marked this range as not acceptable (`q=0`).
    pub fn is_excluded(&self) -> bool {
        self.quality == 0.0
    }

    /// Parse a single `tag` or `tag;q=weight` item.
    ///
    /// # Returns
    /// * `Some(LanguageRange)` for a well-formed item
    /// * `None` if the item is empty or its weight is malformed or out of range
    pub fn parse(item: &str) -> Option<Self> {
        let mut params = item.split(';');
        let tag = params.next()?.trim();
        if tag.is_empty() {
            return None;
        }

        let mut quality = 1.0;
        for param in params {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("q") {
                quality = parse_quality(value.trim())?;
            }
        }

        Some(Self::with_quality(tag, quality))
    }
}

/// Parse an Accept-Language header value into ranges, keeping header order.
///
/// Empty segments and items with a bad weight are dropped individually; an
/// empty header yields no ranges.
///
/// # Example
/// ```
/// use langneg::negotiation::parse_accept_language;
///
/// let ranges = parse_accept_language("de-CH, fr;q=0.9, en;q=nope, *;q=0.1");
/// let tags: Vec<_> = ranges.iter().map(|r| r.tag.as_str()).collect();
/// assert_eq!(tags, ["de-CH", "fr", "*"]);
/// ```
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    header
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| {
            let range = LanguageRange::parse(item);
            if range.is_none() {
                debug!("Dropping malformed language range: {:?}", item);
            }
            range
        })
        .collect()
}

fn parse_quality(value: &str) -> Option<f32> {
    value
        .parse::<f32>()
        .ok()
        .filter(|q| (0.0..=1.0).contains(q))
}
