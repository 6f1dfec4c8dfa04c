use std::path::{Path, PathBuf};

/// Errors that can occur while loading inputs or writing JSON artifacts.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Spreadsheet error in {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("Missing column \"{column}\" in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl DataError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn spreadsheet(path: &Path, source: calamine::Error) -> Self {
        Self::Spreadsheet {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn missing_column(path: &Path, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            path: path.to_path_buf(),
            column: column.into(),
        }
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
