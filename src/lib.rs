//! # jotter_core
//!
//! The core of a small Markdown note-taking app: an in-memory note
//! collection persisted to key-value storage, a Markdown export format with a
//! metadata footer, and a file service for exporting, sharing and importing
//! notes.
//!
//! ## Features
//!
//! - **Note Store**: Create, update, delete and look up notes; the whole collection is written after every change
//! - **Export Format**: Notes become `# Title` documents with a `*Created:*` / `*Modified:*` footer, and parse back
//! - **File Service**: Atomic file writes, concurrent bulk export, directory listing and a pluggable share sheet
//! - **Localized Variants**: English and Spanish differ only in strings, directory names and filename rules
//! - **Robust Error Handling**: User-initiated operations return errors; background persistence and cleanup only log
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jotter_core::config::NotesConfig;
//! use jotter_core::files::OutboxShareSheet;
//! use jotter_core::locale::Locale;
//! use jotter_core::store::NoteStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> jotter_core::JotterResult<()> {
//! let config = NotesConfig::default_for(Locale::En)?;
//! let share = Arc::new(OutboxShareSheet::new("/tmp/outbox"));
//! let mut store = NoteStore::open(&config, share).await?;
//!
//! let note = store.create("Shopping List", "- milk\n- eggs").await;
//! store.update(&note.id, "Shopping List", "- milk\n- eggs\n- bread").await?;
//! store.export_note(&note.id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`domain`]**: The [`Note`](domain::Note) entity and editor-side validation
//! - **[`store`]**: The note collection and its persistence
//! - **[`codec`]**: Markdown export and import
//! - **[`files`]**: Notes directory, exported files and sharing
//! - **[`storage`]**: Key-value backends (SQLite, in-memory)
//! - **[`locale`]** and **[`dates`]**: Localized strings and date rendering
//! - **[`config`]**: Data directory and locale resolution
//! - **[`error`]**: Unified error handling
//!
//! ## Error Handling
//!
//! Fallible operations return [`JotterResult<T>`], wrapping [`JotterError`].
//! Each module's error converts into it, so `?` works across modules.
//!
//! ```rust,no_run
//! use jotter_core::domain::NoteDraft;
//! use jotter_core::store::NoteStore;
//! use jotter_core::{JotterResult, domain::Note};
//!
//! async fn save(store: &mut NoteStore, title: &str, content: &str) -> JotterResult<Note> {
//!     // Empty titles or bodies become NoteError -> JotterError
//!     let draft = NoteDraft::new(title, content)?;
//!     Ok(store.create(draft.title, draft.content).await)
//! }
//! ```

pub mod codec;
pub mod config;
pub mod dates;
pub mod domain;
pub mod error;
pub mod files;
pub mod locale;
pub mod storage;
pub mod store;

/// Re-exports the most commonly used types for convenience.
pub use error::{JotterError, JotterResult};
