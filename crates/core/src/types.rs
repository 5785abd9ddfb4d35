use chrono::{DateTime, Utc};

/// Document identifier as stored in the document store (opaque string).
pub type DocId = String;

/// Stable user identifier.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

/// Raw document fields as read from / written to the store.
pub type Fields = serde_json::Map<String, serde_json::Value>;
