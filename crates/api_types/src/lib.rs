//! Wire types shared by the remote adapters.
//!
//! The document types mirror the Firestore REST representation
//! (`projects/{project}/databases/(default)/documents`), the contact types the
//! body accepted by the message dispatch endpoint.

use serde::{Deserialize, Serialize};

pub mod document {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};

    use super::*;

    /// A typed Firestore value.
    ///
    /// Scalars are modelled one by one. Compound kinds written by other
    /// clients are kept as raw JSON so a document holding them still parses.
    /// `integerValue` is transported as a decimal string, as Firestore does
    /// for int64.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Value {
        StringValue(String),
        IntegerValue(String),
        DoubleValue(f64),
        BooleanValue(bool),
        TimestampValue(String),
        NullValue(()),
        /// Resource name of another document.
        ReferenceValue(String),
        /// Base64 payload.
        BytesValue(String),
        GeoPointValue(serde_json::Value),
        ArrayValue(serde_json::Value),
        MapValue(serde_json::Value),
    }

    /// A stored document as returned by get/list/create/patch.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Document {
        /// Full resource name; the document identifier is the last segment.
        pub name: String,
        #[serde(default)]
        pub fields: BTreeMap<String, Value>,
        pub create_time: Option<DateTime<Utc>>,
        pub update_time: Option<DateTime<Utc>>,
    }

    impl Document {
        /// Returns the trailing path segment of `name`.
        pub fn id(&self) -> &str {
            self.name.rsplit('/').next().unwrap_or_default()
        }
    }

    /// Request body for create and patch.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DocumentWrite {
        pub fields: BTreeMap<String, Value>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListDocumentsResponse {
        #[serde(default)]
        pub documents: Vec<Document>,
        /// Present while more pages remain.
        pub next_page_token: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: ErrorStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorStatus {
        pub code: u16,
        pub message: String,
        #[serde(default)]
        pub status: String,
    }
}

pub mod contact {
    use super::*;

    /// Body of an outbound contact message.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ContactMessage {
        pub email: String,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContactAccepted {
        pub success: bool,
    }
}
