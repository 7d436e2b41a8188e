use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two localized variants of the notes app.
///
/// Both behave identically; they differ only in user-facing strings, the
/// on-disk directory name, the persistence key and the characters allowed
/// in exported filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Name of the flat directory exported notes are written to.
    pub fn notes_dir_name(self) -> &'static str {
        match self {
            Locale::En => "notes",
            Locale::Es => "notas",
        }
    }

    /// Key the whole note collection is persisted under.
    pub fn storage_key(self) -> &'static str {
        match self {
            Locale::En => "notes",
            Locale::Es => "notas",
        }
    }

    /// Title given to imported documents that have no `# ` heading.
    pub fn fallback_title(self) -> &'static str {
        match self {
            Locale::En => "Imported note",
            Locale::Es => "Nota importada",
        }
    }

    pub fn created_label(self) -> &'static str {
        match self {
            Locale::En => "Created",
            Locale::Es => "Creado",
        }
    }

    pub fn modified_label(self) -> &'static str {
        match self {
            Locale::En => "Modified",
            Locale::Es => "Modificado",
        }
    }

    pub fn export_note_title(self, note_title: &str) -> String {
        match self {
            Locale::En => format!("Export {note_title}"),
            Locale::Es => format!("Exportar {note_title}"),
        }
    }

    pub fn export_all_title(self) -> &'static str {
        match self {
            Locale::En => "Export all notes",
            Locale::Es => "Exportar todas las notas",
        }
    }

    /// Letters beyond ASCII that survive filename sanitizing, lowercase form.
    ///
    /// Matching is case-insensitive, so the uppercase forms are kept too.
    pub fn extra_filename_chars(self) -> &'static [char] {
        match self {
            Locale::En => &[],
            Locale::Es => &['á', 'é', 'í', 'ó', 'ú', 'ñ', 'ü'],
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale '{0}'")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Accepts `en`/`es` and region-tagged forms such as `en-US` or `es_ES`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s
            .trim()
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match lang.as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            _ => Err(UnknownLocale(s.to_owned())),
        }
    }
}
