use super::revision::RevisionState;
use crate::error::StateError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Persistence port for revision state. The planner itself never touches it.
pub trait StateStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<RevisionState>, StateError>;
    fn save(&self, state: &RevisionState) -> Result<(), StateError>;
}

/// Keeps state in memory. Useful for tests and for hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<RevisionState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RevisionState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<RevisionState>, StateError> {
        let guard = self.state.lock().map_err(|_| StateError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, state: &RevisionState) -> Result<(), StateError> {
        let mut guard = self.state.lock().map_err(|_| StateError::Poisoned)?;
        *guard = Some(state.clone());
        Ok(())
    }
}

/// Stores revision state in a single file using the bincode format.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StateError {
        StateError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Deserializes revision state from a byte slice.
    pub fn decode(bytes: &[u8]) -> Result<RevisionState, StateError> {
        // bincode 2 returns a tuple (data, bytes_read)
        let (state, _) = decode_from_slice(bytes, standard())?;
        Ok(state)
    }

    pub fn encode(state: &RevisionState) -> Result<Vec<u8>, StateError> {
        Ok(encode_to_vec(state, standard())?)
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<RevisionState>, StateError> {
        let mut file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| self.io_error(e))?;
        Self::decode(&bytes).map(Some)
    }

    fn save(&self, state: &RevisionState) -> Result<(), StateError> {
        let bytes = Self::encode(state)?;
        let mut file = fs::File::create(&self.path).map_err(|e| self.io_error(e))?;
        file.write_all(&bytes).map_err(|e| self.io_error(e))?;
        info!(
            path = %self.path.display(),
            revision = state.revision,
            "saved revision state"
        );
        Ok(())
    }
}
