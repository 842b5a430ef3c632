use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Note;

/// Envelope wrapping every response body. `data` is null on failure
/// and on bodiless messages.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Human-readable outcome description
    pub message: String,
    /// Payload, absent on errors
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Server-generated note ID
    pub id: String,
    /// Note title
    pub title: String,
    /// Note content, may be null
    pub content: Option<String>,
    /// Creation time, epoch millis
    pub created_at: i64,
    /// Last mutation time, epoch millis
    pub updated_at: i64,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// `title` stays optional on the wire so a missing title reaches the
/// handler's own 400 path instead of a framework 422 rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note title, required and non-blank
    pub title: Option<String>,
    /// Note content
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// New title, kept as-is when absent
    pub title: Option<String>,
    /// New content, kept as-is when absent
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring to match against titles
    pub title: Option<String>,
    /// Case-insensitive substring to match against contents
    pub content: Option<String>,
}
