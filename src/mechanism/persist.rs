use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FlexDockError;
use crate::frames::AxisFrames;

/// Mechanism fields that survive a save/load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    /// Tube was deployed when saved.
    pub deployed: bool,
    /// Magnetic assist was switched on when saved.
    pub magnets_enabled: bool,
    /// Target frames at save time; restored as the mated pose.
    pub targets: AxisFrames,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            deployed: false,
            magnets_enabled: true,
            targets: AxisFrames::NEUTRAL,
        }
    }
}

impl PersistedState {
    /// Parse from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, FlexDockError> {
        toml::from_str(text).map_err(|e| FlexDockError::StateParse(e.to_string()))
    }

    /// Serialize to TOML text.
    pub fn to_toml(&self) -> Result<String, FlexDockError> {
        toml::to_string_pretty(self)
            .map_err(|e| FlexDockError::StateParse(e.to_string()))
    }

    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails on I/O or on text that does not describe a saved state.
    pub fn load(path: &Path) -> Result<Self, FlexDockError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), FlexDockError> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(FlexDockError::Io)
    }
}
