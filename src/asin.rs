//! Amazon Standard Identification Numbers and extraction from free text.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Length of every ASIN.
pub const ASIN_LEN: usize = 10;

/// Marker-prefixed ASIN inside a link or query string (`dp/`, `dp%2F`,
/// `product/`, `ASIN=`).
static MARKED_ASIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:dp/|dp%2F|product/|ASIN=)([A-Z0-9]{10})").unwrap()
});

/// A validated, uppercase ASIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asin(String);

/// Rejected ASIN candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ASIN '{0}': expected {ASIN_LEN} alphanumeric characters")]
pub struct InvalidAsin(pub String);

impl Asin {
    /// Validates a candidate and normalizes it to uppercase.
    pub fn parse(candidate: &str) -> Result<Self, InvalidAsin> {
        if is_asin_shaped(candidate) {
            Ok(Self(candidate.to_ascii_uppercase()))
        } else {
            Err(InvalidAsin(candidate.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_asin_shaped(s: &str) -> bool {
    s.len() == ASIN_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

impl FromStr for Asin {
    type Err = InvalidAsin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Asin {
    type Error = InvalidAsin;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Asin> for String {
    fn from(asin: Asin) -> Self {
        asin.0
    }
}

impl AsRef<str> for Asin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finds the ASIN a chat message refers to.
///
/// A marker-prefixed occurrence anywhere in the text wins. Failing that, the
/// whole trimmed message must itself be an ASIN. A bare 10-character token
/// buried in longer text is not accepted.
pub fn extract(text: &str) -> Option<Asin> {
    if let Some(span) = MARKED_ASIN.captures(text).and_then(|caps| caps.get(1)) {
        return Asin::parse(span.as_str()).ok();
    }

    Asin::parse(text.trim()).ok()
}
