use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// A single primitive field value.
///
/// Form input always arrives as text; numbers only show up when the remote
/// store typed them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Returns the text payload, `None` for numbers.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Returns `true` for empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Flat field mapping of a record or draft.
pub type Fields = BTreeMap<String, FieldValue>;

/// Builds a [`Fields`] map from `(name, value)` pairs.
pub fn fields<I, K, V>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

/// Identifier assigned by the remote store. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Returns `None` for an empty or blank identifier.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return None;
        }
        Some(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One persisted business entity.
///
/// `id` is `None` only for records the store handed back without a usable
/// identifier; records created through the ledger always carry one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Option<DocumentId>,
    pub fields: Fields,
}

impl Record {
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self {
            id: Some(id),
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Display text of a field, empty when missing.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(ToString::to_string).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identifier_is_rejected() {
        assert!(DocumentId::new("").is_none());
        assert!(DocumentId::new("   ").is_none());
        assert_eq!(DocumentId::new("x1").unwrap().as_str(), "x1");
    }

    #[test]
    fn untagged_values_keep_their_json_shape() {
        let parsed: Fields =
            serde_json::from_str(r#"{"amount": 12.5, "name": "Rent"}"#).unwrap();
        assert_eq!(parsed.get("amount"), Some(&FieldValue::Number(12.5)));
        assert_eq!(parsed.get("name"), Some(&FieldValue::from("Rent")));
    }

    #[test]
    fn record_text_of_missing_field_is_empty() {
        let record = Record::new(
            DocumentId::new("a").unwrap(),
            fields([("amount", FieldValue::Number(100.0))]),
        );
        assert_eq!(record.text("amount"), "100");
        assert_eq!(record.text("name"), "");
    }
}
