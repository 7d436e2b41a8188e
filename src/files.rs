//! Exported note files and platform sharing.
//!
//! Exported notes live as `{sanitized-title}-{id}.md` in one flat notes
//! directory. Saving, exporting and importing report failures to the caller;
//! listing and deleting are best effort and only log.

pub mod share;

pub use share::{DeclineShareSheet, OutboxShareSheet, ShareError, ShareRequest, ShareSheet};

use crate::codec;
use crate::domain::{ImportedNote, Note};
use crate::locale::Locale;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::fs;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const MAX_FILENAME_STEM: usize = 50;
const MARKDOWN_MIME: &str = "text/markdown";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not save file {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Share(ShareError),
}

/// An exported note file found in the notes directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedNoteFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Filesystem side of the notes app: one notes directory plus a share sheet.
pub struct FileService {
    notes_dir: PathBuf,
    locale: Locale,
    share: Arc<dyn ShareSheet>,
}

impl FileService {
    pub fn new(notes_dir: impl Into<PathBuf>, locale: Locale, share: Arc<dyn ShareSheet>) -> Self {
        FileService {
            notes_dir: notes_dir.into(),
            locale,
            share,
        }
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Creates the notes directory if it is missing.
    ///
    /// Failures are logged, not returned; the result only says whether the
    /// directory is there afterwards. Every write re-runs this.
    pub async fn ensure_directory(&self) -> bool {
        ensure_dir(&self.notes_dir).await
    }

    /// Filesystem-safe stem for a note title in this service's locale.
    pub fn sanitize_filename(&self, title: &str) -> String {
        sanitize_filename(title, self.locale)
    }

    /// Where `note` is (or would be) exported: `{notes_dir}/{stem}-{id}.md`.
    pub fn note_file_path(&self, note: &Note) -> PathBuf {
        note_file_path(&self.notes_dir, note, self.locale)
    }

    /// Writes `note` as Markdown into the notes directory, replacing any
    /// previous export, and returns the file path.
    pub async fn save_note_as_file(&self, note: &Note) -> Result<PathBuf, FileError> {
        write_note_file(self.notes_dir.clone(), self.locale, note.clone()).await
    }

    /// Saves `note` and opens the share sheet on the file.
    ///
    /// Returns `Ok(false)` if the user dismissed the sheet.
    pub async fn export_note(&self, note: &Note) -> Result<bool, FileError> {
        let path = self.save_note_as_file(note).await?;

        let mut request = ShareRequest::for_path(self.locale.export_note_title(&note.title), &path);
        request.mime_type = Some(MARKDOWN_MIME.to_owned());
        request.subject = Some(note.title.clone());
        request.message = Some(note.title.clone());

        self.share(&request).await
    }

    /// Saves every note concurrently, then shares the whole notes directory.
    ///
    /// Any failed write fails the batch before anything is shared.
    pub async fn export_all_notes(&self, notes: &[Note]) -> Result<bool, FileError> {
        self.ensure_directory().await;

        let mut writes = JoinSet::new();
        for note in notes {
            writes.spawn(write_note_file(
                self.notes_dir.clone(),
                self.locale,
                note.clone(),
            ));
        }

        while let Some(joined) = writes.join_next().await {
            match joined {
                Ok(result) => {
                    result?;
                }
                Err(e) => {
                    return Err(FileError::Save {
                        path: self.notes_dir.clone(),
                        source: std::io::Error::other(e),
                    });
                }
            }
        }
        info!(count = notes.len(), dir = %self.notes_dir.display(), "saved all notes");

        let request = ShareRequest::for_path(self.locale.export_all_title(), &self.notes_dir);
        self.share(&request).await
    }

    /// Reads a Markdown file and extracts its title and content.
    pub async fn import_note_from_file(&self, path: &Path) -> Result<ImportedNote, FileError> {
        let document = fs::read_to_string(path).await.map_err(|source| {
            error!(path = %path.display(), error = %source, "error importing file");
            FileError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(codec::parse_note(&document, self.locale))
    }

    /// Lists the `.md` files in the notes directory, sorted by name.
    ///
    /// Any listing error yields an empty list.
    pub async fn list_saved_notes(&self) -> Vec<SavedNoteFile> {
        self.ensure_directory().await;

        match self.read_saved_notes().await {
            Ok(mut files) => {
                files.sort_by(|a, b| a.name.cmp(&b.name));
                files
            }
            Err(e) => {
                warn!(dir = %self.notes_dir.display(), error = %e, "error listing files");
                Vec::new()
            }
        }
    }

    /// Removes an exported file if it exists. Errors are logged and dropped.
    ///
    /// Returns whether a file was actually removed.
    pub async fn delete_note_file(&self, path: &Path) -> bool {
        match fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error deleting file");
                return false;
            }
        }

        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "deleted note file");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error deleting file");
                false
            }
        }
    }

    async fn read_saved_notes(&self) -> std::io::Result<Vec<SavedNoteFile>> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&self.notes_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".md") {
                continue;
            }

            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }

            files.push(SavedNoteFile {
                name,
                path: entry.path(),
                size: meta.len(),
                modified_at: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        Ok(files)
    }

    async fn share(&self, request: &ShareRequest) -> Result<bool, FileError> {
        match self.share.share(request).await {
            Ok(()) => Ok(true),
            Err(ShareError::Cancelled) => {
                debug!(url = %request.url, "share cancelled by user");
                Ok(false)
            }
            Err(e) => {
                error!(url = %request.url, error = %e, "error exporting");
                Err(FileError::Share(e))
            }
        }
    }
}

/// Reduces a title to a filename stem.
///
/// Keeps ASCII letters and digits, whitespace, `-` and the locale's extra
/// letters (either case), turns whitespace runs into a single `-`, lowercases
/// and cuts to 50 characters. Different titles can map to the same stem.
pub fn sanitize_filename(title: &str, locale: Locale) -> String {
    let extra = locale.extra_filename_chars();
    let allowed = |c: char| {
        c.is_ascii_alphanumeric()
            || c.is_whitespace()
            || c == '-'
            || c.to_lowercase().any(|lower| extra.contains(&lower))
    };

    let mut stem = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars().filter(|&c| allowed(c)) {
        if c.is_whitespace() {
            if !in_space {
                stem.push('-');
            }
            in_space = true;
        } else {
            stem.extend(c.to_lowercase());
            in_space = false;
        }
    }

    stem.chars().take(MAX_FILENAME_STEM).collect()
}

pub fn note_file_path(notes_dir: &Path, note: &Note, locale: Locale) -> PathBuf {
    let stem = sanitize_filename(&note.title, locale);
    notes_dir.join(format!("{stem}-{}.md", note.id))
}

async fn ensure_dir(dir: &Path) -> bool {
    match fs::create_dir_all(dir).await {
        Ok(()) => true,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "error creating directory");
            false
        }
    }
}

async fn write_note_file(notes_dir: PathBuf, locale: Locale, note: Note) -> Result<PathBuf, FileError> {
    ensure_dir(&notes_dir).await;

    let path = note_file_path(&notes_dir, &note, locale);
    let markdown = codec::serialize_note(&note, locale);

    let target = path.clone();
    let written = tokio::task::spawn_blocking(move || write_atomic(&target, markdown.as_bytes()))
        .await
        .unwrap_or_else(|e| Err(std::io::Error::other(e)));

    match written {
        Ok(()) => {
            debug!(id = %note.id, path = %path.display(), "saved note file");
            Ok(path)
        }
        Err(source) => {
            error!(path = %path.display(), error = %source, "error saving file");
            Err(FileError::Save { path, source })
        }
    }
}

/// Writes through a temporary file in the same directory and renames it into
/// place, so a reader never sees a half-written note.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent"))?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
