use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_STATE_PATH: &str = "config/cli_state.json";

/// Sessions remembered between invocations, one per server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub sessions: Vec<SessionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub base_url: String,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Token for `base_url`, unless it already expired.
    pub fn session_for(&self, base_url: &str, now: DateTime<Utc>) -> Option<&SessionEntry> {
        self.sessions
            .iter()
            .find(|entry| entry.base_url == base_url && entry.expires_at > now)
    }

    pub fn set_session(&mut self, entry: SessionEntry) {
        self.clear_session(&entry.base_url);
        self.sessions.push(entry);
    }

    pub fn clear_session(&mut self, base_url: &str) {
        self.sessions.retain(|entry| entry.base_url != base_url);
    }
}

pub fn default_state_path() -> &'static str {
    DEFAULT_STATE_PATH
}
