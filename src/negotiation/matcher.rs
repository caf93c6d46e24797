//! Match engine: scores client ranges against the offered tags.
//!
//! Every (range, offered tag) pair gets a confidence score from a staged
//! language → script → region comparison. An offered tag's total confidence
//! is the best `score * quality` over all ranges, and the tag with the highest
//! total wins. Equal totals go to the tag matched by the earlier range, then
//! to a tag identical to that range, then to the earlier configured tag.

use super::range::LanguageRange;
use super::tag::{LanguageTag, Subtag};
use tracing::warn;

/// Language, script and region all agree.
pub const FULL_MATCH: f32 = 3.0;

/// Language and region agree; script unspecified on at least one side.
pub const REGION_MATCH: f32 = 2.0;

/// Only the language agrees.
pub const LANGUAGE_MATCH: f32 = 1.0;

/// Wildcard range against any concrete tag.
pub const WILDCARD_MATCH: f32 = 0.5;

pub const NO_MATCH: f32 = 0.0;

/// Confidence that `offered` satisfies the client range `range`.
///
/// # Example
/// ```
/// use langneg::negotiation::{confidence, LanguageTag, LANGUAGE_MATCH, REGION_MATCH};
///
/// let offered = LanguageTag::parse("en-US");
/// assert_eq!(confidence(&LanguageTag::parse("en-US"), &offered), REGION_MATCH);
/// assert_eq!(confidence(&LanguageTag::parse("en-Latn-US"), &offered), REGION_MATCH);
/// assert_eq!(confidence(&LanguageTag::parse("en-AU"), &offered), LANGUAGE_MATCH);
/// assert_eq!(confidence(&LanguageTag::parse("en"), &offered), LANGUAGE_MATCH);
/// assert_eq!(confidence(&LanguageTag::parse("fr"), &offered), 0.0);
///
/// let full = LanguageTag::parse("sr-Latn-RS");
/// assert_eq!(confidence(&LanguageTag::parse("sr-Latn-RS"), &full), 3.0);
/// ```
pub fn confidence(range: &LanguageTag, offered: &LanguageTag) -> f32 {
    let (Some(wanted), Some(available)) = (range.language(), offered.language()) else {
        return if range.is_root() && !offered.is_root() {
            WILDCARD_MATCH
        } else {
            NO_MATCH
        };
    };

    if conflicts(Some(wanted), Some(available)) {
        return NO_MATCH;
    }
    // Different scripts are not mutually readable, unlike different regions.
    if conflicts(range.script(), offered.script()) {
        return NO_MATCH;
    }

    let scripts_agree = agrees(range.script(), offered.script());
    let regions_agree = agrees(range.region(), offered.region());
    let script_unspecified = range.script().is_none() || offered.script().is_none();

    if scripts_agree && regions_agree {
        FULL_MATCH
    } else if script_unspecified && regions_agree {
        REGION_MATCH
    } else {
        LANGUAGE_MATCH
    }
}

/// Both sides specify the component exactly and agree on it.
fn agrees(a: Option<&Subtag>, b: Option<&Subtag>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_exact() && b.is_exact() && a.value() == b.value(),
        _ => false,
    }
}

/// Both sides specify the component and disagree on it.
fn conflicts(a: Option<&Subtag>, b: Option<&Subtag>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.value() != b.value(),
        _ => false,
    }
}

/// The server's offered language tags, in configured order.
///
/// Built once from configuration and read-only afterwards. The Root sentinel
/// always occupies the first slot and is what `best_match` returns when no
/// configured tag is acceptable.
#[derive(Debug, Clone)]
pub struct OfferedSet {
    tags: Vec<LanguageTag>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    confidence: f32,
    range_index: usize,
    /// The offered tag equals the range that produced `confidence`
    identical: bool,
    offered_index: usize,
}

impl Candidate {
    /// Candidates are visited in configured order, so a full tie keeps the earlier one.
    fn beats(&self, other: &Candidate) -> bool {
        if self.confidence != other.confidence {
            return self.confidence > other.confidence;
        }
        if self.range_index != other.range_index {
            return self.range_index < other.range_index;
        }
        self.identical && !other.identical
    }
}

impl OfferedSet {
    /// Build the set from configured identifiers.
    ///
    /// Identifiers that do not parse degrade to Root and are logged; they
    /// stay in the set but can never win a match.
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = vec![LanguageTag::root()];
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            let tag = LanguageTag::parse(identifier);
            if tag.is_root() {
                warn!(
                    "Offered language '{}' is not a usable language tag and will never match",
                    identifier
                );
            }
            tags.push(tag);
        }
        Self { tags }
    }

    /// Number of configured tags (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.tags.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the configured tags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageTag> {
        self.tags.iter().skip(1)
    }

    /// Total confidence of each configured tag against `ranges`, in declaration order.
    pub fn confidences(&self, ranges: &[LanguageRange]) -> Vec<f32> {
        let mut totals = vec![NO_MATCH; self.len()];
        for candidate in self.candidates(ranges) {
            totals[candidate.offered_index - 1] = candidate.confidence;
        }
        totals
    }

    /// Select the configured tag that best satisfies `ranges`.
    ///
    /// # Returns
    /// The winning offered tag, or the Root sentinel when no configured tag
    /// reaches a non-zero confidence.
    pub fn best_match(&self, ranges: &[LanguageRange]) -> &LanguageTag {
        let mut best: Option<Candidate> = None;
        for candidate in self.candidates(ranges) {
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => &self.tags[candidate.offered_index],
            None => &self.tags[0],
        }
    }

    /// Non-zero candidates in offered order, each carrying its best range.
    fn candidates(&self, ranges: &[LanguageRange]) -> Vec<Candidate> {
        let mut weighted: Vec<(f32, LanguageTag)> = ranges
            .iter()
            .filter(|range| !range.is_excluded())
            .map(|range| (range.quality, LanguageTag::parse(&range.tag)))
            .collect();
        // Stable: equal qualities keep header order.
        weighted.sort_by(|a, b| b.0.total_cmp(&a.0));

        self.tags
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(offered_index, offered)| {
                let mut best: Option<Candidate> = None;
                for (range_index, (quality, range)) in weighted.iter().enumerate() {
                    let score = confidence(range, offered) * quality;
                    if score > best.map_or(NO_MATCH, |b| b.confidence) {
                        best = Some(Candidate {
                            confidence: score,
                            range_index,
                            identical: range == offered,
                            offered_index,
                        });
                    }
                }
                best
            })
            .collect()
    }
}
