//! Identifiers, candidates and persisted records
//!
//! Serialized field names (`UUID`, `URL`, `Probe`) match the database files
//! written by earlier versions of the tool, so old stores load unchanged.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier length in bytes (ASCII only)
pub const IDENTIFIER_LEN: usize = 32;

/// Opaque probe output, passed through into the record untouched.
pub type Metadata = serde_json::Value;

/// 32-character lowercase alphanumeric work-unit key.
///
/// Only constructible through validation, so every `Identifier` in memory
/// (including ones replayed from disk) has the fixed format.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(s: &str) -> Option<Self> {
        is_identifier(s).then(|| Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier(s: &str) -> bool {
    s.len() == IDENTIFIER_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

impl TryFrom<String> for Identifier {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if is_identifier(&s) {
            Ok(Self(s))
        } else {
            Err(format!(
                "invalid identifier {s:?}: expected {IDENTIFIER_LEN} lowercase alphanumeric characters"
            ))
        }
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

// Hash/Eq agree with `str`, so the store map can be queried by `&str`.
impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed `(identifier, locator)` pair awaiting processing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "UUID")]
    id: Identifier,
    #[serde(rename = "URL")]
    locator: String,
}

impl Candidate {
    pub fn new(id: Identifier, locator: impl Into<String>) -> Self {
        Self {
            id,
            locator: locator.into(),
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }
}

/// Persisted unit: a candidate plus the metadata its probe returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    candidate: Candidate,
    #[serde(rename = "Probe")]
    metadata: Metadata,
}

impl Record {
    pub fn new(candidate: Candidate, metadata: Metadata) -> Self {
        Self {
            candidate,
            metadata,
        }
    }

    pub fn id(&self) -> &Identifier {
        self.candidate.id()
    }

    pub fn locator(&self) -> &str {
        self.candidate.locator()
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0123456789abcdefghijklmnopqrstuv";

    #[test]
    fn identifier_accepts_lowercase_alnum() {
        let id = Identifier::parse(ID).unwrap();
        assert_eq!(id.as_str(), ID);
        assert_eq!(id.to_string(), ID);
    }

    #[test]
    fn identifier_rejects_wrong_length() {
        assert!(Identifier::parse(&ID[..31]).is_none());
        assert!(Identifier::parse(&format!("{ID}a")).is_none());
        assert!(Identifier::parse("").is_none());
    }

    #[test]
    fn identifier_rejects_uppercase_and_symbols() {
        assert!(Identifier::parse(&ID.to_uppercase()).is_none());
        assert!(Identifier::parse("0123456789abcdef-hijklmnopqrstuv").is_none());
        // 32 bytes but not ASCII
        assert!(Identifier::parse("0123456789abcdefghijklmnopqrst\u{e9}").is_none());
    }

    #[test]
    fn record_uses_legacy_field_names() {
        let candidate = Candidate::new(Identifier::parse(ID).unwrap(), "/media/a.mp4");
        let record = Record::new(candidate, serde_json::json!({"duration": 10}));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"UUID": ID, "URL": "/media/a.mp4", "Probe": {"duration": 10}})
        );
    }

    #[test]
    fn record_rejects_invalid_identifier_on_decode() {
        let line = r#"{"UUID":"short","URL":"/a","Probe":{}}"#;
        assert!(serde_json::from_str::<Record>(line).is_err());
    }

    #[test]
    fn record_decodes_legacy_line() {
        let line = format!(r#"{{"UUID":"{ID}","URL":"http://x/y.mov","Probe":{{"format":{{}}}}}}"#);
        let record: Record = serde_json::from_str(&line).unwrap();
        assert_eq!(record.id().as_str(), ID);
        assert_eq!(record.locator(), "http://x/y.mov");
        assert!(record.metadata()["format"].is_object());
    }
}
