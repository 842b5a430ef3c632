use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Domain note. The repository is the sole owner; a note is replaced
/// wholesale on update and removed wholesale on delete.
///
/// Timestamps are epoch milliseconds and serialize camelCase so the
/// persisted file and the wire format agree. Invariant: `updated_at`
/// is never behind `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    /// Builds a fresh note with both timestamps set to now.
    pub fn new(id: String, title: String, content: Option<String>) -> Self {
        let now = Utc::now().timestamp_millis();

        Self {
            id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
