//! Trainer session: who is logged in, and which fetch generation is current.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    #[error("no user config directory available")]
    NoConfigDir,
    #[error("trainer id file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Session context created on login and torn down on logout or when the
/// backend rejects the id.
///
/// Every identity change bumps `generation`. Async results are tagged with the
/// generation that requested them, and anything older than the current one is
/// dropped instead of applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    pub trainer_id: Option<String>,
    pub generation: u64,
}

impl Session {
    pub fn login(&mut self, trainer_id: String) -> u64 {
        self.trainer_id = Some(trainer_id);
        self.generation += 1;
        self.generation
    }

    pub fn logout(&mut self) -> u64 {
        self.trainer_id = None;
        self.generation += 1;
        self.generation
    }

    /// Supersede in-flight requests for the same trainer.
    pub fn renew(&mut self) -> Option<u64> {
        self.trainer_id.as_ref()?;
        self.generation += 1;
        Some(self.generation)
    }

    pub fn trainer_id(&self) -> Option<&str> {
        self.trainer_id.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.trainer_id.is_some()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// Accepts a bare id, an `id=...` query, or a full login link such as
/// `https://host/login?id=1234`. A link or path without an `id` pair is
/// rejected.
pub fn parse_login(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let query = match input.split_once('?') {
        Some((_, query)) => Some(query),
        None if input.contains('=') => Some(input),
        None => None,
    };

    let id = match query {
        Some(query) => query
            .split(['&', '#'])
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "id")
            .map(|(_, value)| {
                urlencoding::decode(value)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| value.to_string())
            })?,
        None if input.contains("://") || input.contains('/') => return None,
        None => input.to_string(),
    };

    let id = id.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// The one piece of local state: the trainer id, kept in a small file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_config_dir() -> Result<Self, IdentityError> {
        let dir = dirs_next::config_dir().ok_or(IdentityError::NoConfigDir)?;
        Ok(Self::new(dir.join("trainerdex").join("trainer_id")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Option<String>, IdentityError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let id = contents.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    pub async fn save(&self, trainer_id: &str) -> Result<(), IdentityError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        tokio::fs::write(&self.path, trainer_id)
            .await
            .map_err(|source| self.io_error(source))
    }

    pub async fn clear(&self) -> Result<(), IdentityError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> IdentityError {
        IdentityError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
