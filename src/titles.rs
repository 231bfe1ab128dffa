//! Display-title extraction.
//!
//! Scraped programme titles frequently restate the programme or institution
//! name in their tail ("MSc Data Science: Data Science", "Master of Arts in
//! Global Studies Global Studies"). `clean_title` collapses the repeated part
//! so list views stay readable; `resolve_title` picks the source field per
//! origin before the cleanup runs.

use crate::origin::Origin;
use crate::store::{first_string, Record};

/// Longest repeated tail (in words) the cleanup will look for.
const MAX_SUFFIX_WINDOW: usize = 8;

/// Collapse a redundant restatement at the end of a raw title.
///
/// Two shapes are recognized, in order:
/// 1. `"<A>: <B>"` where the lowercased `A` already contains `B` — keep `A`.
/// 2. A trailing run of 2..=8 words that reappears, lowercased, inside the
///    words before it — keep the words before it. Larger windows are tried
///    first so the longest repetition wins; the first hit stops the scan.
///
/// Anything else comes back trimmed but otherwise untouched.
pub fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some((head, tail)) = trimmed.split_once(':') {
        let head = head.trim();
        let tail = tail.trim();
        if !head.is_empty()
            && !tail.is_empty()
            && head.to_lowercase().contains(&tail.to_lowercase())
        {
            return head.to_string();
        }
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let max_window = MAX_SUFFIX_WINDOW.min(words.len() / 2);
    for window in (2..=max_window).rev() {
        let split = words.len() - window;
        let prefix = words[..split].join(" ");
        let suffix = words[split..].join(" ");
        if prefix.to_lowercase().contains(&suffix.to_lowercase()) {
            return prefix;
        }
    }

    trimmed.to_string()
}

/// Derive the display title for a record from its origin's field order,
/// first non-empty wins. Records with none of the fields yield an empty
/// string, never an error.
pub fn resolve_title(origin: Origin, record: &Record) -> String {
    match origin {
        Origin::Uk => first_string(record, &["programme_title", "title"])
            .map(|raw| clean_title(&raw))
            .unwrap_or_default(),
        // US feeds already carry clean names; no heuristic applied.
        Origin::Usa => {
            first_string(record, &["name", "title", "programTitle"]).unwrap_or_default()
        }
        Origin::Australia => first_string(record, &["title", "programme_title", "header_line"])
            .map(|raw| clean_title(&raw))
            .unwrap_or_default(),
        Origin::Japan => japan_title(record)
            .map(|raw| clean_title(&raw))
            .unwrap_or_default(),
    }
}

/// Japanese records carry a bilingual `name` object next to an optional flat
/// `title`; prefer the English variant, fall back to the Japanese one.
fn japan_title(record: &Record) -> Option<String> {
    if let Some(title) = first_string(record, &["title"]) {
        return Some(title);
    }
    let name = record.get("name")?.as_object()?;
    first_string(name, &["en", "ja"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().expect("test record is an object").clone()
    }

    #[test]
    fn colon_redundancy_collapses_to_head() {
        assert_eq!(clean_title("Data Science: Data Science"), "Data Science");
        assert_eq!(
            clean_title("MSc Advanced Data Science: Data Science"),
            "MSc Advanced Data Science"
        );
    }

    #[test]
    fn colon_without_redundancy_is_kept() {
        assert_eq!(
            clean_title("Data: Data Science and AI"),
            "Data: Data Science and AI"
        );
    }

    #[test]
    fn repeated_suffix_window_collapses() {
        assert_eq!(
            clean_title("Master of Arts in Global Studies Global Studies"),
            "Master of Arts in Global Studies"
        );
    }

    #[test]
    fn largest_matching_window_wins() {
        // Both the 2-word and 3-word tails repeat; the 3-word window fires first.
        assert_eq!(
            clean_title("BSc in Marine Biology in Marine Biology"),
            "BSc in Marine Biology"
        );
    }

    #[test]
    fn plain_titles_pass_through() {
        assert_eq!(clean_title("Physics"), "Physics");
        assert_eq!(clean_title("  Physics  "), "Physics");
        assert_eq!(clean_title(""), "");
    }

    #[test]
    fn short_titles_never_trigger_the_window() {
        // Three words: floor(3/2) = 1 < 2, so no window is tried.
        assert_eq!(
            clean_title("Physics Physics Physics"),
            "Physics Physics Physics"
        );
    }

    #[test]
    fn uk_prefers_programme_title_and_cleans() {
        let rec = record(json!({
            "programme_title": "MSc Data Science: Data Science",
            "title": "ignored"
        }));
        assert_eq!(resolve_title(Origin::Uk, &rec), "MSc Data Science");
    }

    #[test]
    fn usa_takes_first_field_without_cleanup() {
        let rec = record(json!({ "name": "Data Science: Data Science" }));
        assert_eq!(
            resolve_title(Origin::Usa, &rec),
            "Data Science: Data Science"
        );

        let fallback = record(json!({ "programTitle": "MS in Robotics" }));
        assert_eq!(resolve_title(Origin::Usa, &fallback), "MS in Robotics");
    }

    #[test]
    fn australia_falls_back_to_header_line() {
        let rec = record(json!({ "title": "", "header_line": "Master of Laws" }));
        assert_eq!(resolve_title(Origin::Australia, &rec), "Master of Laws");
    }

    #[test]
    fn japan_prefers_title_then_english_then_japanese() {
        let flat = record(json!({ "title": "Global Engineering Program" }));
        assert_eq!(
            resolve_title(Origin::Japan, &flat),
            "Global Engineering Program"
        );

        let english = record(json!({ "name": { "en": "Global Engineering", "ja": "国際工学" } }));
        assert_eq!(resolve_title(Origin::Japan, &english), "Global Engineering");

        let japanese_only = record(json!({ "name": { "ja": "国際工学" } }));
        assert_eq!(resolve_title(Origin::Japan, &japanese_only), "国際工学");
    }

    #[test]
    fn missing_fields_yield_empty_title() {
        let rec = record(json!({ "unrelated": 1 }));
        for origin in Origin::ALL {
            assert_eq!(resolve_title(origin, &rec), "");
        }
    }
}
