//! The authoritative note collection.
//!
//! [`NoteStore`] owns every [`Note`] in memory and writes the whole collection
//! as one JSON array under a single storage key after each mutation. Storage
//! failures never undo a mutation: they are logged and remembered in
//! [`NoteStore::last_persist_error`].

use crate::config::NotesConfig;
use crate::domain::{self, Note, NoteError};
use crate::error::JotterResult;
use crate::files::{FileService, ShareSheet};
use crate::storage::{KeyValueStore, SqliteKeyValueStore, StorageError};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct NoteStore {
    notes: Vec<Note>,
    backend: Arc<dyn KeyValueStore>,
    files: Arc<FileService>,
    storage_key: String,
    last_id: Option<i64>,
    last_persist_error: Option<String>,
    recovered_key: Option<String>,
}

impl NoteStore {
    /// Wires a store from `config`: SQLite storage at
    /// [`NotesConfig::database_path`] and a [`FileService`] on
    /// [`NotesConfig::notes_dir`], then loads the collection.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub async fn open(config: &NotesConfig, share: Arc<dyn ShareSheet>) -> JotterResult<Self> {
        tokio::fs::create_dir_all(config.data_dir()).await?;
        let backend = SqliteKeyValueStore::open(&config.database_path()).await?;
        let files = FileService::new(config.notes_dir(), config.locale, share);
        files.ensure_directory().await;

        Ok(Self::load(Arc::new(backend), Arc::new(files), config.storage_key()).await)
    }

    /// Reads the collection stored under `storage_key`.
    ///
    /// Nothing stored means an empty collection. A read error or an
    /// unparseable blob is logged and also yields an empty collection; an
    /// unparseable blob is first copied to a recovery key (see
    /// [`recovered_key`](Self::recovered_key)). Loading never writes the
    /// collection back.
    pub async fn load(
        backend: Arc<dyn KeyValueStore>,
        files: Arc<FileService>,
        storage_key: impl Into<String>,
    ) -> Self {
        let mut store = NoteStore {
            notes: Vec::new(),
            backend,
            files,
            storage_key: storage_key.into(),
            last_id: None,
            last_persist_error: None,
            recovered_key: None,
        };

        let raw = match store.backend.get(&store.storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %store.storage_key, "no stored notes");
                return store;
            }
            Err(e) => {
                error!(key = %store.storage_key, error = %e, "error loading notes");
                return store;
            }
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => {
                store.notes = dedup_by_id(notes);
                store.last_id = store.notes.iter().filter_map(|n| n.id.parse::<i64>().ok()).max();
                info!(count = store.notes.len(), "loaded notes");
            }
            Err(source) => {
                let e = StorageError::Corrupt {
                    key: store.storage_key.clone(),
                    source,
                };
                error!(error = %e, "error loading notes, starting empty");
                store.recovered_key = store.preserve_corrupt(&raw).await;
            }
        }

        store
    }

    /// All notes, most recently created first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn files(&self) -> &FileService {
        &self.files
    }

    /// Creates a note, puts it at the front of the collection and persists.
    ///
    /// Title and content are stored as given; trimming and emptiness checks
    /// belong to [`NoteDraft`](crate::domain::NoteDraft).
    pub async fn create(&mut self, title: impl Into<String>, content: impl Into<String>) -> Note {
        let now = domain::now_millis();
        let id = domain::next_id(now, self.last_id);
        self.last_id = Some(id);

        let note = Note::new(id.to_string(), title.into(), content.into(), now);
        self.notes.insert(0, note.clone());
        debug!(id = %note.id, "created note");

        self.persist().await;
        note
    }

    /// Replaces title and content of note `id` and refreshes `updated_at`.
    ///
    /// The note keeps its position in the collection.
    ///
    /// # Errors
    /// Returns [`NoteError::NotFound`] if there is no such note; nothing is
    /// persisted in that case.
    pub async fn update(
        &mut self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note, NoteError> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_owned()))?;

        note.revise(title.into(), content.into(), domain::now_millis());
        let updated = note.clone();
        debug!(id = %updated.id, "updated note");

        self.persist().await;
        Ok(updated)
    }

    /// Removes note `id` and best-effort deletes its exported file.
    ///
    /// Returns `false`, without persisting, if there was no such note.
    pub async fn delete(&mut self, id: &str) -> bool {
        let Some(pos) = self.notes.iter().position(|n| n.id == id) else {
            debug!(id, "delete of unknown note ignored");
            return false;
        };

        let path = self.files.note_file_path(&self.notes[pos]);
        if !self.files.delete_note_file(&path).await {
            debug!(id, path = %path.display(), "no exported file removed");
        }

        self.notes.remove(pos);
        debug!(id, "deleted note");

        self.persist().await;
        true
    }

    /// Writes the whole collection to storage and reports the outcome.
    pub async fn flush(&self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.notes).map_err(|source| StorageError::Encode {
            key: self.storage_key.clone(),
            source,
        })?;

        self.backend.set(&self.storage_key, &encoded).await
    }

    /// Message of the most recent failed background write, cleared by the
    /// next successful one.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Key holding the unparseable blob found at load time, if any.
    pub fn recovered_key(&self) -> Option<&str> {
        self.recovered_key.as_deref()
    }

    /// Exports note `id` through the share sheet.
    ///
    /// Returns `Ok(false)` if the user cancelled the share.
    ///
    /// # Errors
    /// [`NoteError::NotFound`] for an unknown id, or the file/share failure.
    pub async fn export_note(&self, id: &str) -> JotterResult<bool> {
        let note = self
            .get(id)
            .ok_or_else(|| NoteError::NotFound(id.to_owned()))?;

        Ok(self.files.export_note(note).await?)
    }

    /// Saves every note as a file and shares the notes directory.
    ///
    /// # Errors
    /// [`NoteError::NothingToExport`] when the collection is empty; the
    /// filesystem is not touched in that case.
    pub async fn export_all(&self) -> JotterResult<bool> {
        if self.notes.is_empty() {
            return Err(NoteError::NothingToExport.into());
        }

        Ok(self.files.export_all_notes(&self.notes).await?)
    }

    /// Reads a Markdown file and adds it as a new note.
    pub async fn import_note(&mut self, path: &Path) -> JotterResult<Note> {
        let imported = self.files.import_note_from_file(path).await?;
        let note = self.create(imported.title, imported.content).await;
        info!(id = %note.id, path = %path.display(), "imported note");
        Ok(note)
    }

    async fn persist(&mut self) {
        match self.flush().await {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                error!(key = %self.storage_key, error = %e, "error saving notes");
                self.last_persist_error = Some(e.to_string());
            }
        }
    }

    async fn preserve_corrupt(&self, raw: &str) -> Option<String> {
        let key = format!(
            "{}.corrupt-{}",
            self.storage_key,
            domain::now_millis().timestamp_millis()
        );

        match self.backend.set(&key, raw).await {
            Ok(()) => {
                warn!(key = %key, "preserved unreadable notes blob");
                Some(key)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "could not preserve unreadable notes blob");
                None
            }
        }
    }
}

fn dedup_by_id(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter(|note| {
            let fresh = seen.insert(note.id.clone());
            if !fresh {
                warn!(id = %note.id, "dropping duplicate stored note");
            }
            fresh
        })
        .collect()
}
