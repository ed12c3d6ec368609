//! Choice patterns for enumerated argument values.
//!
//! An enumerated parameter accepts more than bare literals:
//!
//! - `literal`    -- must equal one of the allowed choices
//! - `!literal`   -- negation; accepted iff the negated literal is a real choice
//! - `~pattern`   -- regex form; accepted iff the pattern compiles
//! - `!~pattern`  -- negated regex form; accepted iff the pattern compiles
//!
//! The regex forms only validate syntax here; interpreting the pattern
//! against live data is the command body's business.

use regex::Regex;

/// Check whether `value` is acceptable for the given choice set.
pub fn matches_choice_pattern(value: &str, choices: &[String]) -> bool {
    if let Some(pattern) = value.strip_prefix("!~").or_else(|| value.strip_prefix('~')) {
        return Regex::new(pattern).is_ok();
    }
    if let Some(literal) = value.strip_prefix('!') {
        return choices.iter().any(|c| c == literal);
    }
    choices.iter().any(|c| c == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn literal_matching() {
        let cs = choices(&["a", "a1", "b1", "a2a1"]);
        assert!(matches_choice_pattern("a", &cs));
        assert!(matches_choice_pattern("a2a1", &cs));
        assert!(!matches_choice_pattern("c", &cs));
        assert!(!matches_choice_pattern("a2", &cs));
    }

    #[test]
    fn negation_requires_real_choice() {
        let cs = choices(&["a", "a1", "b1"]);
        assert!(matches_choice_pattern("!a1", &cs));
        assert!(matches_choice_pattern("!b1", &cs));
        assert!(!matches_choice_pattern("!c", &cs));
    }

    #[test]
    fn regex_form_validates_syntax() {
        let cs = choices(&["a", "b1"]);
        assert!(matches_choice_pattern("~a.*", &cs));
        assert!(matches_choice_pattern("~.*", &cs));
        assert!(!matches_choice_pattern("~[invalid", &cs));
        assert!(!matches_choice_pattern("~(", &cs));
    }

    #[test]
    fn negated_regex_form() {
        let cs = choices(&["a", "b1"]);
        assert!(matches_choice_pattern("!~b.*", &cs));
        assert!(!matches_choice_pattern("!~[invalid", &cs));
    }

    #[test]
    fn empty_choices_match_nothing() {
        let cs: Vec<String> = vec![];
        assert!(!matches_choice_pattern("a", &cs));
        assert!(!matches_choice_pattern("!a", &cs));
        // Regex forms only check the pattern itself.
        assert!(matches_choice_pattern("~.*", &cs));
    }
}
