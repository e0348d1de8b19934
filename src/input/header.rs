use std::str::FromStr;
use reqwest::header::{HeaderName, HeaderValue};

use crate::error::{ParamCrawlError, ParamCrawlResult};

/// A `Name: Value` pair sent with every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl FromStr for Header {
    type Err = ParamCrawlError;

    /// Parse `Name: Value`. The string must contain exactly one colon, a
    /// valid HTTP header name and a valid header value; both halves are trimmed.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ParamCrawlError::InvalidHeader { header: raw.to_string() };

        let mut parts = raw.split(':');
        let (name, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(value), None) => (name.trim(), value.trim()),
            _ => return Err(invalid()),
        };

        HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        HeaderValue::from_str(value).map_err(|_| invalid())?;

        Ok(Header {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Parse every raw header, failing on the first malformed one.
///
/// A name given more than once (compared case-insensitively) keeps only its
/// last value, so later sources override earlier ones.
pub fn parse_headers(raw: &[String]) -> ParamCrawlResult<Vec<Header>> {
    let mut headers: Vec<Header> = Vec::with_capacity(raw.len());
    for header in raw.iter().map(|h| h.parse::<Header>()) {
        let header = header?;
        match headers.iter_mut().find(|h| h.name.eq_ignore_ascii_case(&header.name)) {
            Some(existing) => *existing = header,
            None => headers.push(header),
        }
    }
    Ok(headers)
}
