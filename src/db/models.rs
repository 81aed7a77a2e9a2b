use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of `kv_store`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
