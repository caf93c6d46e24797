//! Rendering of a matched tag into the published locale string.

use super::tag::{LanguageTag, Subtag};

/// Render a matched tag.
///
/// With `full_locale` unset only the language is returned (`en` for `en-US`).
/// Otherwise the exact components are joined in language, region, script
/// order, giving the closest-to-full locale the tag actually carries.
///
/// # Example
/// ```
/// use langneg::negotiation::{format_locale, LanguageTag};
///
/// let tag = LanguageTag::parse("zh-Hant-TW");
/// assert_eq!(format_locale(&tag, false), "zh");
/// assert_eq!(format_locale(&tag, true), "zh-TW-Hant");
/// ```
pub fn format_locale(tag: &LanguageTag, full_locale: bool) -> String {
    if !full_locale {
        return tag
            .language()
            .map(|language| language.value().to_string())
            .unwrap_or_default();
    }

    [tag.language(), tag.region(), tag.script()]
        .into_iter()
        .flatten()
        .filter(|subtag| subtag.is_exact())
        .map(Subtag::value)
        .collect::<Vec<_>>()
        .join("-")
}
