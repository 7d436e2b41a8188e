use crate::locale::{Locale, UnknownLocale};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides the application data directory.
pub const DATA_DIR_ENV: &str = "JOTTER_DATA_DIR";
/// Selects the locale (`en`, `es`, `es-ES`, ...).
pub const LOCALE_ENV: &str = "JOTTER_LOCALE";

const APP_DIR: &str = "jotter";
const DATABASE_FILE: &str = ".jotter.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("documents directory not found")]
    NoDocumentsDir,

    #[error(transparent)]
    Locale(#[from] UnknownLocale),
}

/// Where the app keeps its data and which locale it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesConfig {
    pub data_dir: PathBuf,
    pub locale: Locale,
}

impl NotesConfig {
    pub fn new(data_dir: impl Into<PathBuf>, locale: Locale) -> Self {
        NotesConfig {
            data_dir: data_dir.into(),
            locale,
        }
    }

    /// Resolves the data directory under `~/Documents/jotter` for `locale`.
    ///
    /// # Errors
    /// - [`ConfigError::NoDocumentsDir`] if the user's documents directory cannot be determined
    pub fn default_for(locale: Locale) -> Result<Self, ConfigError> {
        Ok(NotesConfig::new(Self::default_data_dir()?, locale))
    }

    /// Builds a config from `JOTTER_DATA_DIR` and `JOTTER_LOCALE`, falling
    /// back to the documents directory and English.
    pub fn from_env() -> Result<Self, ConfigError> {
        let locale = match env::var(LOCALE_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse::<Locale>()?,
            _ => Locale::default(),
        };

        let data_dir = match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::default_data_dir()?,
        };

        Ok(NotesConfig { data_dir, locale })
    }

    /// The flat directory exported notes are written to.
    pub fn notes_dir(&self) -> PathBuf {
        self.data_dir.join(self.locale.notes_dir_name())
    }

    /// SQLite file backing the key-value store.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn storage_key(&self) -> &'static str {
        self.locale.storage_key()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn default_data_dir() -> Result<PathBuf, ConfigError> {
        let docs = dirs::document_dir().ok_or(ConfigError::NoDocumentsDir)?;
        Ok(docs.join(APP_DIR))
    }
}
