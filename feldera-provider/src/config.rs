//! Provider and program configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FileError;

/// Provider-level configuration. `endpoint` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Feldera API, e.g. `http://localhost:8080`.
    pub endpoint: Option<String>,
}

impl ProviderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
        }
    }
}

/// Declared configuration of one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    pub name: String,
    pub description: String,
    pub code: String,
    #[serde(default)]
    pub should_compile: bool,
}

/// On-disk form of [`ProgramConfig`]. The code is given inline or as a path
/// relative to the config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProgramConfigFile {
    name: String,
    description: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    code_file: Option<PathBuf>,
    #[serde(default)]
    should_compile: bool,
}

impl ProgramConfig {
    /// Load a program declaration from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, FileError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FileError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file: ProgramConfigFile =
            serde_json::from_str(&raw).map_err(|source| FileError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let code = match (file.code, file.code_file) {
            (Some(code), None) => code,
            (None, Some(code_file)) => {
                let code_path = match path.parent() {
                    Some(dir) => dir.join(&code_file),
                    None => code_file,
                };
                tokio::fs::read_to_string(&code_path)
                    .await
                    .map_err(|source| FileError::Io {
                        path: code_path,
                        source,
                    })?
            }
            (Some(_), Some(_)) => {
                return Err(FileError::Invalid {
                    path: path.to_path_buf(),
                    message: "`code` and `code_file` are mutually exclusive".to_string(),
                })
            }
            (None, None) => {
                return Err(FileError::Invalid {
                    path: path.to_path_buf(),
                    message: "one of `code` or `code_file` is required".to_string(),
                })
            }
        };

        Ok(Self {
            name: file.name,
            description: file.description,
            code,
            should_compile: file.should_compile,
        })
    }
}
