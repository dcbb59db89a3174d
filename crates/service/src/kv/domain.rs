use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored record (business view); `value` is decoded JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a delete; a missing key is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { rows_affected: u64 },
    NotFound,
}
