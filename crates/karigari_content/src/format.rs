//! The shared formatting contract between prompts and the parser.
//!
//! The formatting instructions embedded in prompts ("Caption 1:", tokens
//! starting with `#`) are a de facto contract with the response parser.
//! Both sides consume the definitions here; changing one without the
//! other is a compile-visible edit to this module, not silent drift.

use regex::Regex;
use std::sync::OnceLock;

/// How many generic captions a caption prompt asks for.
pub const CAPTION_COUNT: usize = 3;

/// Marker pattern introducing one caption block: `Caption <n>:`.
///
/// Block numbers are matched in order of appearance and are not
/// numerically validated.
pub const CAPTION_MARKER_PATTERN: &str = r"Caption \d+:";

/// Hashtag token pattern: `#` followed by alphanumerics or underscores.
///
/// Tokens therefore always begin with `#` and contain no whitespace.
pub const HASHTAG_PATTERN: &str = r"#[A-Za-z0-9_]+";

/// Compiled caption marker regex.
pub fn caption_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(CAPTION_MARKER_PATTERN).expect("caption marker pattern must compile")
    })
}

/// Compiled hashtag token regex.
pub fn hashtag_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(HASHTAG_PATTERN).expect("hashtag pattern must compile"))
}

/// Prompt instruction that produces caption blocks the parser can scan.
pub fn caption_format_instruction() -> String {
    format!(
        "Format your response as {} separate captions, each starting with \
         \"Caption 1:\", \"Caption 2:\", and \"Caption 3:\".",
        CAPTION_COUNT
    )
}

/// Prompt instruction that produces hashtag tokens the parser can scan.
pub const HASHTAG_FORMAT_INSTRUCTION: &str =
    "Format your response as a list of hashtags, each starting with #, separated by spaces.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_matches_numbered_captions() {
        let marker = caption_marker();
        assert!(marker.is_match("Caption 1: hello"));
        assert!(marker.is_match("Caption 12: hello"));
        assert!(!marker.is_match("Caption: hello"));
    }

    #[test]
    fn hashtag_token_rejects_whitespace_and_punctuation() {
        let token = hashtag_token();
        let found: Vec<_> = token
            .find_iter("#Handmade, #Indian_Craft! # not-a-tag")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, ["#Handmade", "#Indian_Craft"]);
    }

    #[test]
    fn caption_instruction_embeds_the_marker_grammar() {
        let instruction = caption_format_instruction();
        assert!(caption_marker().is_match(&instruction));
    }
}
