//! Rewrites video-search mentions in generated notes into Markdown links

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

/// Phrases the notes prompt asks the model to emit for each suggested video
static VIDEO_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:search for|search query|watch):?\s*"([^"]+)""#).unwrap()
});

const SEARCH_BASE: &str = "https://www.youtube.com/results";

/// Rewrite every `search for "..."` / `search query "..."` / `watch "..."`
/// phrase into a Markdown link targeting a video search for the quoted text.
///
/// Idempotent: the rewritten label carries no quoted phrase, so running the
/// pass again leaves the text unchanged. Text without matches is returned
/// as-is.
pub fn link_video_searches(text: &str) -> String {
    VIDEO_PHRASE
        .replace_all(text, |caps: &Captures| {
            let query = &caps[1];
            format!("[📺 Watch: {}]({})", query, search_url(query))
        })
        .into_owned()
}

/// Build the video search URL with the query form-encoded
fn search_url(query: &str) -> Url {
    let mut url = Url::parse(SEARCH_BASE).expect("static URL parses");
    url.query_pairs_mut().append_pair("search_query", query);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_search_for_phrase() {
        let input = r#"To go deeper, search for "binary trees" on YouTube."#;
        let output = link_video_searches(input);
        assert!(
            output.contains("[📺 Watch: binary trees]"),
            "label missing: {}",
            output
        );
        assert!(
            output.contains("https://www.youtube.com/results?search_query=binary+trees"),
            "url missing or not form-encoded: {}",
            output
        );
        assert!(!output.contains(r#"search for "binary trees""#));
    }

    #[test]
    fn test_all_phrase_forms_match() {
        for phrase in [
            r#"search for "rust lifetimes""#,
            r#"Search Query: "rust lifetimes""#,
            r#"watch: "rust lifetimes""#,
            r#"WATCH "rust lifetimes""#,
        ] {
            let output = link_video_searches(phrase);
            assert!(
                output.contains("[📺 Watch: rust lifetimes]"),
                "phrase not rewritten: {}",
                phrase
            );
        }
    }

    #[test]
    fn test_idempotent_on_processed_text() {
        let input = r#"1. search for "sorting algorithms"
2. search query: "big O notation"
Regular prose stays put."#;
        let once = link_video_searches(input);
        let twice = link_video_searches(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_match_returns_input_unaltered() {
        let input = "# Notes\n\nNothing to link here, not even a watch reference without quotes.";
        assert_eq!(link_video_searches(input), input);
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let input = r#"search for "C++ & templates""#;
        let output = link_video_searches(input);
        assert!(
            output.contains("search_query=C%2B%2B+%26+templates"),
            "special chars not encoded: {}",
            output
        );
    }

    #[test]
    fn test_surrounding_text_untouched() {
        let input = r#"Before. search for "graphs" After."#;
        let output = link_video_searches(input);
        assert!(output.starts_with("Before. ["));
        assert!(output.ends_with(" After."));
    }
}
