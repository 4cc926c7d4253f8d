//! Local persistence of a program's state record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FileError;
use crate::model::ProgramState;

/// JSON file holding the state of one program.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state. A missing file means no state.
    pub async fn load(&self) -> Result<Option<ProgramState>, FileError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };
        let state = serde_json::from_str(&raw).map_err(|source| FileError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(state))
    }

    /// Write the state, replacing the previous file atomically.
    pub async fn save(&self, state: &ProgramState) -> Result<(), FileError> {
        let json = serde_json::to_string_pretty(state).map_err(|source| FileError::Json {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// Remove the state file. Removing a missing file is not an error.
    pub async fn remove(&self) -> Result<(), FileError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> FileError {
        FileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
