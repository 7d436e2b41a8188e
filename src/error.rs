use thiserror::Error;

#[derive(Debug, Error)]
pub enum JotterError {
    #[error(transparent)]
    Note(#[from] crate::domain::NoteError),

    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),

    #[error(transparent)]
    File(#[from] crate::files::FileError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type JotterResult<T> = Result<T, JotterError>;
