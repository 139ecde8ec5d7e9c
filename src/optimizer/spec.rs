use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Serializable predictor configuration: the instruction text the optimizer
/// searches over, plus whatever extra state the optimizer wants to carry.
///
/// The metadata map is opaque to the harness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictorSpec {
    pub instruction: String,

    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum SpecPersistError {
    #[error("could not write predictor spec to `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read predictor spec from `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PredictorSpec {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Writes the spec as JSON, atomically: the bytes land in a temporary
    /// file in the target directory and are renamed into place, so a failure
    /// mid-write never leaves a partial artifact at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SpecPersistError> {
        let path = path.as_ref();
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());

        let write = || -> io::Result<()> {
            let mut tmp = match dir {
                Some(dir) => NamedTempFile::new_in(dir)?,
                None => NamedTempFile::new_in(".")?,
            };
            serde_json::to_writer_pretty(&mut tmp, self).map_err(io::Error::other)?;
            tmp.persist(path).map_err(|err| err.error)?;
            Ok(())
        };

        write().map_err(|source| SpecPersistError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecPersistError> {
        let path = path.as_ref();
        let read = || -> io::Result<Self> {
            let data = fs::read_to_string(path)?;
            serde_json::from_str(&data).map_err(io::Error::other)
        };

        read().map_err(|source| SpecPersistError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}
