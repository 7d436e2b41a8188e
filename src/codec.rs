//! Markdown export format for notes.
//!
//! An exported note is a level-1 heading with the title, a blank line, the
//! content verbatim, then a `---` rule and a two-line footer with the
//! creation and modification dates:
//!
//! ```text
//! # Shopping List
//!
//! - milk
//! - eggs
//!
//! ---
//!
//! *Created: 1/5/2024*
//! *Modified: 1/6/2024*
//! ```
//!
//! [`parse_note`] is a best-effort inverse. It recovers the title exactly and
//! the content up to surrounding whitespace, as long as the content does not
//! itself contain the footer separator.

use crate::dates;
use crate::domain::{ImportedNote, Note};
use crate::locale::Locale;
use chrono::Local;
use regex::Regex;
use std::sync::LazyLock;

/// Marks the start of the metadata footer. The last occurrence wins.
pub const FOOTER_SEPARATOR: &str = "\n\n---\n";

const TITLE_MARKER: &str = "# ";

static LEADING_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+.*\n\n").expect("heading pattern is valid"));

/// Renders a note as a Markdown document with the metadata footer.
///
/// Footer dates use the locale's numeric short date in local time.
pub fn serialize_note(note: &Note, locale: Locale) -> String {
    let created = dates::short_date(&note.created_at.with_timezone(&Local), locale);
    let modified = dates::short_date(&note.updated_at.with_timezone(&Local), locale);

    format!(
        "{TITLE_MARKER}{title}\n\n{content}\n\n---\n\n*{created_label}: {created}*\n*{modified_label}: {modified}*",
        title = note.title,
        content = note.content,
        created_label = locale.created_label(),
        modified_label = locale.modified_label(),
    )
}

/// Extracts a title and content from an exported (or hand-written) document.
///
/// - The first line starting with `# ` supplies the title, trimmed. Without
///   one the locale's fallback title is used.
/// - Content is everything before the last footer separator (or the whole
///   document if there is none, or it sits at offset 0), minus one leading
///   heading line and its blank line, trimmed.
pub fn parse_note(document: &str, locale: Locale) -> ImportedNote {
    let title = document
        .split('\n')
        .find(|line| line.starts_with(TITLE_MARKER))
        .map(|line| line[TITLE_MARKER.len()..].trim().to_owned())
        .unwrap_or_else(|| locale.fallback_title().to_owned());

    let body = match document.rfind(FOOTER_SEPARATOR) {
        Some(idx) if idx > 0 => &document[..idx],
        _ => document,
    };

    let content = LEADING_HEADING.replace(body, "").trim().to_owned();

    ImportedNote { title, content }
}
