use deunicode::deunicode;
use log::debug;
use crate::classifier::tables::{Brand, BLOCKED_PHRASES, BRANDS, COMMERCIAL_KEYWORDS, RADIO_HOST_KEYWORDS};
use crate::classifier::{Classifier, TrackQuery};
use crate::data::ClassificationVerdict;

/// Deterministic classifier over the static keyword tables
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    fn classify(&self, query: &TrackQuery) -> ClassificationVerdict {
        classify(&query.title, &query.artist, &query.album)
    }
}

/// Classify a track by keyword matching.
///
/// Rules are checked in priority order and the first match wins:
/// blocked phrases, then commercial keywords (with brand lookup), then
/// radio host patterns. Everything else is music.
pub fn classify(title: &str, artist: &str, album: &str) -> ClassificationVerdict {
    let haystack = search_string(title, artist, album);

    if let Some(phrase) = find_any(&haystack, BLOCKED_PHRASES) {
        debug!("Blocked phrase '{}' in '{}'", phrase, haystack);
        return ClassificationVerdict::blocked(0.9, format!("blocked phrase '{}'", phrase));
    }

    if let Some(keyword) = find_any(&haystack, COMMERCIAL_KEYWORDS) {
        return match find_brand(&haystack) {
            Some(brand) => {
                debug!("Commercial for {} detected in '{}'", brand.display_name, haystack);
                ClassificationVerdict::commercial(
                    0.85,
                    format!("commercial keyword '{}' with brand '{}'", keyword, brand.keyword),
                )
                .with_brand(brand.display_name, brand.logo_url)
            }
            None => ClassificationVerdict::commercial(0.8, format!("commercial keyword '{}'", keyword)),
        };
    }

    if let Some(keyword) = find_any(&haystack, RADIO_HOST_KEYWORDS) {
        return ClassificationVerdict::radio_host(0.75, format!("radio host keyword '{}'", keyword.trim()));
    }

    ClassificationVerdict::music(0.9, "no ad keywords")
}

fn search_string(title: &str, artist: &str, album: &str) -> String {
    let joined = format!("{} {} {}", title, artist, album);
    deunicode(&joined).to_lowercase()
}

fn find_any<'a>(haystack: &str, needles: &[&'a str]) -> Option<&'a str> {
    needles.iter().copied().find(|needle| haystack.contains(needle))
}

fn find_brand(haystack: &str) -> Option<&'static Brand> {
    BRANDS.iter().find(|brand| contains_word(haystack, brand.keyword))
}

/// `word` standing on its own, optionally followed by a plural or possessive `s`
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let rest = &haystack[start + word.len()..];
        let rest = rest.strip_prefix('s').unwrap_or(rest);
        let after = rest.chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AdType;

    #[test]
    fn test_plain_song_is_music() {
        let verdict = classify("Bohemian Rhapsody", "Queen", "A Night at the Opera");
        assert_eq!(verdict.ad_type, AdType::Music);
        assert!(!verdict.is_ad);
        assert!(!verdict.is_blocked);
        assert_eq!(verdict.confidence, 0.9);
    }

    #[test]
    fn test_brand_commercial() {
        let verdict = classify("Gain Commercial Break", "Unknown", "");
        assert!(verdict.is_ad);
        assert!(!verdict.is_blocked);
        assert_eq!(verdict.ad_type, AdType::Commercial);
        assert_eq!(verdict.brand_name.as_deref(), Some("Gain"));
        assert!(verdict.brand_logo_url.is_some());
        assert_eq!(verdict.confidence, 0.85);
    }

    #[test]
    fn test_brand_match_is_case_insensitive() {
        let verdict = classify("SPONSORED BY GEICO", "", "");
        assert_eq!(verdict.brand_name.as_deref(), Some("GEICO"));

        let verdict = classify("Commercial", "State Farm Insurance", "");
        assert_eq!(verdict.brand_name.as_deref(), Some("State Farm"));
    }

    #[test]
    fn test_brand_without_commercial_keyword_is_music() {
        // brands only count inside a commercial
        let verdict = classify("Tide Is High", "Blondie", "Autoamerican");
        assert_eq!(verdict.ad_type, AdType::Music);
        assert!(verdict.brand_name.is_none());
    }

    #[test]
    fn test_generic_commercial() {
        let verdict = classify("Advertisement", "Radio", "");
        assert!(verdict.is_ad);
        assert_eq!(verdict.ad_type, AdType::Commercial);
        assert!(verdict.brand_name.is_none());
        assert_eq!(verdict.confidence, 0.8);
    }

    #[test]
    fn test_blocked_dominates_commercial() {
        let verdict = classify("MAGA Rally Ad", "Political Committee", "");
        assert!(verdict.is_ad);
        assert!(verdict.is_blocked);
        assert_eq!(verdict.ad_type, AdType::Blocked);
        assert_eq!(verdict.confidence, 0.9);

        let verdict = classify("Gain Commercial", "Paid for by Friends of Somebody", "");
        assert!(verdict.is_blocked);
        assert!(verdict.brand_name.is_none());
    }

    #[test]
    fn test_radio_host() {
        let verdict = classify("Morning News", "WXYZ", "");
        assert_eq!(verdict.ad_type, AdType::RadioHost);
        assert!(!verdict.is_ad);
        assert_eq!(verdict.confidence, 0.75);
    }

    #[test]
    fn test_commercial_beats_radio_host() {
        let verdict = classify("Traffic update sponsored by Toyota", "", "");
        assert_eq!(verdict.ad_type, AdType::Commercial);
        assert_eq!(verdict.brand_name.as_deref(), Some("Toyota"));
    }

    #[test]
    fn test_brand_must_be_a_whole_word() {
        let verdict = classify("Commercial Free Hour Again", "Station", "");
        assert_eq!(verdict.ad_type, AdType::Commercial);
        assert!(verdict.brand_name.is_none());

        let verdict = classify("Oxford Yuletide Advertisement", "", "");
        assert!(verdict.brand_name.is_none());

        let verdict = classify("McDonalds Commercial", "", "");
        assert_eq!(verdict.brand_name.as_deref(), Some("McDonald's"));

        let verdict = classify("Commercial", "Ford's Summer Sale", "");
        assert_eq!(verdict.brand_name.as_deref(), Some("Ford"));
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("gain commercial", "gain"));
        assert!(contains_word("buy at&t now", "at&t"));
        assert!(contains_word("the home depot", "home depot"));
        assert!(!contains_word("again", "gain"));
        assert!(!contains_word("gaining", "gain"));
    }

    #[test]
    fn test_accents_are_transliterated() {
        let verdict = classify("Pépsi Cömmercial", "", "");
        assert_eq!(verdict.brand_name.as_deref(), Some("Pepsi"));
    }
}
