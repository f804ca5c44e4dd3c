use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors while loading a transaction file.
///
/// Row-level problems (bad amount, bad date) are not errors: such rows are
/// skipped. Anything here aborts the whole load. The underlying `csv` error
/// is exposed through [`std::error::Error::source`], not repeated in the
/// message.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open {kind} file '{}'", .path.display())]
    Open {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("could not read header from '{}': file is empty", .path.display())]
    MissingHeader { path: PathBuf },
    #[error("could not read header from '{}'", .path.display())]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("error reading record from '{}'", .path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    /// The file the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Open { path, .. }
            | LoadError::MissingHeader { path }
            | LoadError::Header { path, .. }
            | LoadError::Record { path, .. } => path,
        }
    }
}
