// src/extract/patterns.rs
use std::fmt;

/// HTML construct (or JSON-ish key) a sub-pattern recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    InputName,
    AnchorHref,
    FormName,
    MapName,
    FieldsetName,
    OutputName,
    IframeName,
    InputId,
    ObjectKey,
    ObjectName,
    ParamName,
    TextareaName,
    SelectName,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Construct::InputName => "input[name]",
            Construct::AnchorHref => "a[href]",
            Construct::FormName => "form[name]",
            Construct::MapName => "map[name]",
            Construct::FieldsetName => "fieldset[name]",
            Construct::OutputName => "output[name]",
            Construct::IframeName => "iframe[name]",
            Construct::InputId => "input[id]",
            Construct::ObjectKey => "object key",
            Construct::ObjectName => "object[name]",
            Construct::ParamName => "param[name]",
            Construct::TextareaName => "textarea[name]",
            Construct::SelectName => "select[name]",
        };
        f.write_str(name)
    }
}

/// One alternative of the composite pattern. Each source has exactly one capture group.
#[derive(Debug, Clone, Copy)]
pub struct SubPattern {
    pub construct: Construct,
    pub source: &'static str,
}

/// Sub-patterns in alternation order. Earlier entries win when several
/// could match at the same position.
pub const SUB_PATTERNS: &[SubPattern] = &[
    SubPattern { construct: Construct::InputName, source: r#"<input[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::AnchorHref, source: r#"<a\s[^>]*\bhref\s*=\s*["']([^"']*)["'][^>]*>"# },
    SubPattern { construct: Construct::FormName, source: r#"<form[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::MapName, source: r#"<map[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::FieldsetName, source: r#"<fieldset[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::OutputName, source: r#"<output[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::IframeName, source: r#"<iframe[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::InputId, source: r#"<input[^>]*\sid\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::ObjectKey, source: r#"["']([^"']+?)["']\s*:\s*"# },
    SubPattern { construct: Construct::ObjectName, source: r#"<object[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::ParamName, source: r#"<param[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::TextareaName, source: r#"<textarea[^>]*\sname\s*=\s*["']([^"']*)["']"# },
    SubPattern { construct: Construct::SelectName, source: r#"<select[^>]*\sname\s*=\s*["']([^"']*)["']"# },
];

/// `?key=value` / `&key=value` pairs inside a matched attribute value
pub const QUERY_KEY_PATTERN: &str = r"[?&]([^=&]+)=([^&]*)";

/// Join the sub-patterns into a single alternation. Capture group `i + 1`
/// belongs to `SUB_PATTERNS[i]`.
pub fn composite_source() -> String {
    SUB_PATTERNS
        .iter()
        .map(|p| p.source)
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn first_capture(pattern: &SubPattern, body: &str) -> Option<String> {
        Regex::new(pattern.source)
            .unwrap()
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn pattern(construct: Construct) -> &'static SubPattern {
        SUB_PATTERNS.iter().find(|p| p.construct == construct).unwrap()
    }

    #[test]
    fn test_every_sub_pattern_has_one_group() {
        for p in SUB_PATTERNS {
            let re = Regex::new(p.source).unwrap();
            assert_eq!(re.captures_len(), 2, "{} should have exactly one group", p.construct);
        }
    }

    #[test]
    fn test_composite_group_count_matches_sub_patterns() {
        let re = Regex::new(&composite_source()).unwrap();
        assert_eq!(re.captures_len(), SUB_PATTERNS.len() + 1);
    }

    #[test]
    fn test_input_name_allows_preceding_attributes_and_quotes() {
        let p = pattern(Construct::InputName);
        assert_eq!(first_capture(p, r#"<input type="text" name="username">"#).as_deref(), Some("username"));
        assert_eq!(first_capture(p, "<input class='x' name='email' />").as_deref(), Some("email"));
        assert_eq!(first_capture(p, r#"<INPUT name="upper">"#), None);
    }

    #[test]
    fn test_anchor_href_requires_closing_bracket() {
        let p = pattern(Construct::AnchorHref);
        assert_eq!(first_capture(p, r#"<a class="nav" href="/x?id=1">"#).as_deref(), Some("/x?id=1"));
        assert_eq!(first_capture(p, r#"<a href="/dangling""#), None);
        assert_eq!(first_capture(p, r#"<abbr href="/x">"#), None);
    }

    #[test]
    fn test_container_constructs() {
        assert_eq!(first_capture(pattern(Construct::FormName), r#"<form method="post" name="login">"#).as_deref(), Some("login"));
        assert_eq!(first_capture(pattern(Construct::MapName), r#"<map name="planets">"#).as_deref(), Some("planets"));
        assert_eq!(first_capture(pattern(Construct::FieldsetName), r#"<fieldset name="billing">"#).as_deref(), Some("billing"));
        assert_eq!(first_capture(pattern(Construct::OutputName), r#"<output name="total">"#).as_deref(), Some("total"));
        assert_eq!(first_capture(pattern(Construct::IframeName), r#"<iframe src="x" name="frame1">"#).as_deref(), Some("frame1"));
        assert_eq!(first_capture(pattern(Construct::ObjectName), r#"<object name="player">"#).as_deref(), Some("player"));
        assert_eq!(first_capture(pattern(Construct::ParamName), r#"<param name="autoplay">"#).as_deref(), Some("autoplay"));
        assert_eq!(first_capture(pattern(Construct::TextareaName), r#"<textarea rows="3" name="comment">"#).as_deref(), Some("comment"));
        assert_eq!(first_capture(pattern(Construct::SelectName), r#"<select name="country">"#).as_deref(), Some("country"));
    }

    #[test]
    fn test_input_id() {
        assert_eq!(first_capture(pattern(Construct::InputId), r#"<input type="hidden" id="csrf_token">"#).as_deref(), Some("csrf_token"));
    }

    #[test]
    fn test_object_key_is_non_greedy() {
        let p = pattern(Construct::ObjectKey);
        assert_eq!(first_capture(p, r#"{"apiKey": "x"}"#).as_deref(), Some("apiKey"));
        assert_eq!(first_capture(p, "{'user_id' : 5}").as_deref(), Some("user_id"));
    }

    #[test]
    fn test_query_key_pattern() {
        let re = Regex::new(QUERY_KEY_PATTERN).unwrap();
        let keys: Vec<&str> = re
            .captures_iter("/search?q=rust&page=2&sort=")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(keys, vec!["q", "page", "sort"]);
    }
}
