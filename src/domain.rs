pub mod timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("note title cannot be empty")]
    EmptyTitle,
    #[error("note content cannot be empty")]
    EmptyContent,
    #[error("note not found: {0}")]
    NotFound(String),
    #[error("there are no notes to export")]
    NothingToExport,
}

/// A single note as held by the [`NoteStore`](crate::store::NoteStore).
///
/// The serialized shape is the persisted one: a JSON object with
/// `id`, `title`, `content`, `createdAt` and `updatedAt`. Collections written
/// by the Spanish app use `titulo`, `contenido`, `creadoEn` and
/// `actualizadoEn`; those names are accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(alias = "contenido")]
    pub content: String,
    #[serde(with = "timestamp", alias = "creadoEn")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp", alias = "actualizadoEn")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Builds a fresh note stamped at `now`.
    ///
    /// Both timestamps start equal. The id is supplied by the caller so the
    /// store can keep ids unique across the collection.
    pub fn new(id: String, title: String, content: String, now: DateTime<Utc>) -> Note {
        Note {
            id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces title and content and refreshes `updated_at`.
    ///
    /// `updated_at` never moves before `created_at` or backwards, even if
    /// the wall clock does.
    pub fn revise(&mut self, title: String, content: String, now: DateTime<Utc>) {
        self.title = title;
        self.content = content;
        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }
}

/// Title and content recovered from an imported Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedNote {
    pub title: String,
    pub content: String,
}

/// User input from the editor, checked before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// Trims both fields and rejects empty ones.
    ///
    /// Returns [`NoteError::EmptyTitle`] first, then [`NoteError::EmptyContent`].
    pub fn new(title: &str, content: &str) -> Result<NoteDraft, NoteError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NoteError::EmptyTitle);
        }

        let content = content.trim();
        if content.is_empty() {
            return Err(NoteError::EmptyContent);
        }

        Ok(NoteDraft {
            title: title.to_owned(),
            content: content.to_owned(),
        })
    }
}

/// Current time truncated to whole milliseconds, the precision notes persist at.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Picks the next note id from the clock and the last id handed out.
///
/// Ids are millisecond timestamps rendered as decimal strings. When the clock
/// has not advanced past `last`, the id is `last + 1`, or the clock value
/// again if `last` is already `i64::MAX`.
pub fn next_id(now: DateTime<Utc>, last: Option<i64>) -> i64 {
    let candidate = now.timestamp_millis();
    match last {
        Some(last) if candidate <= last => last.checked_add(1).unwrap_or(candidate),
        _ => candidate,
    }
}
