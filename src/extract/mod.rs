// src/extract/mod.rs
mod patterns;

use regex::Regex;

pub use patterns::{composite_source, Construct, SubPattern, QUERY_KEY_PATTERN, SUB_PATTERNS};

use crate::error::{ParamCrawlError, ParamCrawlResult};

/// Whether a candidate is a matched attribute value or a key pulled out of one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Value,
    QueryKey,
}

/// A raw substring of a response body, prior to filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub text: &'a str,
    pub construct: Construct,
    pub origin: Origin,
}

/// Pulls candidate parameter names out of response bodies
#[derive(Debug, Clone)]
pub struct Extractor {
    composite: Regex,
    query_pattern: Regex,
}

impl Extractor {
    /// Compile the composite pattern
    pub fn new() -> ParamCrawlResult<Self> {
        let composite = Regex::new(&composite_source())
            .map_err(|e| ParamCrawlError::ConfigError(format!("Invalid extraction pattern: {}", e)))?;
        let query_pattern = Regex::new(QUERY_KEY_PATTERN)
            .map_err(|e| ParamCrawlError::ConfigError(format!("Invalid query key pattern: {}", e)))?;

        Ok(Self { composite, query_pattern })
    }

    /// Lazily yield every candidate in `body`, in the order found.
    ///
    /// For each matched attribute value, the keys of any `?k=v`/`&k=v`
    /// pairs it contains are yielded first, followed by the value itself.
    /// Empty attribute values are skipped.
    pub fn extract<'a>(&'a self, body: &'a str) -> impl Iterator<Item = Candidate<'a>> + 'a {
        self.composite
            .captures_iter(body)
            .filter_map(|caps| {
                caps.iter()
                    .enumerate()
                    .skip(1)
                    .find_map(|(group, m)| m.map(|m| (SUB_PATTERNS[group - 1].construct, m.as_str())))
            })
            .filter(|(_, value)| !value.is_empty())
            .flat_map(move |(construct, value)| {
                self.query_keys(value)
                    .map(move |key| Candidate { text: key, construct, origin: Origin::QueryKey })
                    .chain(std::iter::once(Candidate { text: value, construct, origin: Origin::Value }))
            })
    }

    /// Keys of the query-string pairs embedded in `value`
    pub fn query_keys<'a>(&'a self, value: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query_pattern
            .captures_iter(value)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(body: &str) -> Vec<String> {
        let extractor = Extractor::new().unwrap();
        extractor.extract(body).map(|c| c.text.to_string()).collect()
    }

    #[test]
    fn test_form_and_anchor() {
        let extractor = Extractor::new().unwrap();
        let body = r#"<form><input type="text" name="username"></form>
<a href="/x?token=abc&redirect=home">click</a>"#;

        let found: Vec<Candidate> = extractor.extract(body).collect();
        assert_eq!(found, vec![
            Candidate { text: "username", construct: Construct::InputName, origin: Origin::Value },
            Candidate { text: "token", construct: Construct::AnchorHref, origin: Origin::QueryKey },
            Candidate { text: "redirect", construct: Construct::AnchorHref, origin: Origin::QueryKey },
            Candidate { text: "/x?token=abc&redirect=home", construct: Construct::AnchorHref, origin: Origin::Value },
        ]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(texts("<html><body><p>nothing to see</p></body></html>").is_empty());
        assert!(texts("").is_empty());
    }

    #[test]
    fn test_extraction_is_restartable() {
        let extractor = Extractor::new().unwrap();
        let body = r#"<select name="country"></select><textarea name="bio"></textarea>"#;
        let first: Vec<_> = extractor.extract(body).collect();
        let second: Vec<_> = extractor.extract(body).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_input_name_takes_precedence_over_id() {
        assert_eq!(texts(r#"<input id="field_id" name="field_name">"#), vec!["field_name"]);
        assert_eq!(texts(r#"<input id="only_id">"#), vec!["only_id"]);
    }

    #[test]
    fn test_json_keys() {
        let body = r#"<script>var cfg = {"apiVersion": 2, "debugMode": false};</script>"#;
        assert_eq!(texts(body), vec!["apiVersion", "debugMode"]);
    }

    #[test]
    fn test_empty_attribute_values_are_skipped() {
        assert!(texts(r#"<input type="submit" name="">"#).is_empty());
    }

    #[test]
    fn test_entities_are_not_decoded() {
        assert_eq!(texts(r#"<input name="a&amp;b">"#), vec!["a&amp;b"]);
    }

    #[test]
    fn test_query_keys() {
        let extractor = Extractor::new().unwrap();
        let keys: Vec<&str> = extractor.query_keys("https://x.test/p?a=1&b=&c=3").collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(extractor.query_keys("plain").count(), 0);
    }
}
