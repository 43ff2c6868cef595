//! Session persistence for the BizPrompt CLI
//!
//! Stores the logged-in session in the system data directory so that
//! consecutive commands share it.

use std::path::PathBuf;

use bizprompt_sdk::Session;

/// Location of the stored session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/bizprompt/session.toml`
    pub fn default_location() -> Result<Self, String> {
        let data_dir = dirs::data_dir().ok_or("Failed to get system data directory")?;
        Ok(Self::new(data_dir.join("bizprompt").join("session.toml")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Write the session to disk.
    pub fn save(&self, session: &Session) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create data directory: {}", e))?;
        }

        let toml = toml::to_string(session)
            .map_err(|e| format!("Failed to serialize session: {}", e))?;

        std::fs::write(&self.path, toml)
            .map_err(|e| format!("Failed to write session file: {}", e))
    }

    /// Read the session from disk.
    pub fn load(&self) -> Result<Option<Session>, String> {
        if !self.path.exists() {
            return Ok(None);
        }

        let buf = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read session file: {}", e))?;

        let session =
            toml::from_str(&buf).map_err(|e| format!("Failed to parse session file: {}", e))?;
        Ok(Some(session))
    }

    /// Read the session, discarding it if the token has expired.
    pub fn load_valid(&self) -> Result<Option<Session>, String> {
        match self.load()? {
            Some(session) if session.is_expired() => {
                tracing::info!(email = %session.user.email, "Stored session expired, discarding");
                self.clear()?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Delete the session from disk.
    pub fn clear(&self) -> Result<(), String> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| format!("Failed to delete session file: {}", e))?;
        }
        Ok(())
    }
}
