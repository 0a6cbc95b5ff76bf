use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ledgerun_core::{ProgressSource, ProgressStore, SavedProgress};
use thiserror::Error;

/// Errors raised while reading or writing the progress file.
#[derive(Debug, Error)]
pub(crate) enum ProgressFileError {
    /// The file could not be read or written.
    #[error("progress file {path} is not accessible: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The file does not contain valid progress JSON.
    #[error("progress file {path} is malformed: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying decoding failure.
        source: serde_json::Error,
    },
}

/// Persists [`SavedProgress`] as a pretty-printed JSON document.
#[derive(Clone, Debug)]
pub(crate) struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn json_error(&self, source: serde_json::Error) -> ProgressFileError {
        ProgressFileError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl ProgressStore for JsonProgressStore {
    type Error = ProgressFileError;

    fn load(&mut self) -> Result<Option<SavedProgress>, Self::Error> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ProgressFileError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| self.json_error(source))
    }

    fn save(&mut self, progress: &SavedProgress) -> Result<(), Self::Error> {
        let json = serde_json::to_string_pretty(progress).map_err(|source| self.json_error(source))?;
        fs::write(&self.path, json).map_err(|source| ProgressFileError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Progress of the current CLI session, fed to the difficulty controllers.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SessionProgress {
    completions: u32,
    distance: f32,
}

impl SessionProgress {
    pub(crate) fn complete_level(&mut self) {
        self.completions += 1;
    }

    pub(crate) fn travel_to(&mut self, distance: f32) {
        self.distance = distance;
    }
}

impl ProgressSource for SessionProgress {
    fn completions(&self) -> u32 {
        self.completions
    }

    fn distance(&self) -> f32 {
        self.distance
    }
}
