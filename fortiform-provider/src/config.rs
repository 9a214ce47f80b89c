//! Provider configuration

use std::path::{Path, PathBuf};

use fortiform_core::PatchTable;
use fortiform_core::patch::PatchError;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::scope::ScopeType;

pub const ENV_HOSTNAME: &str = "FORTIMANAGER_ACCESS_HOSTNAME";
pub const ENV_ADOM: &str = "FORTIMANAGER_ADOM";
pub const ENV_IMPORT_TABLE: &str = "FORTIMANAGER_IMPORT_TABLE";
pub const ENV_RETRIES: &str = "FORTIMANAGER_RETRIES";

/// Provider-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub hostname: Option<String>,

    /// Provider ADOM; empty means global
    pub adom: String,

    /// Scope used by resources that do not set `scopetype`
    pub scopetype: ScopeType,

    /// Import mode: discover every object list during read
    pub import_options: bool,

    /// Retry count handed to the client (default: 1)
    pub retries: u32,

    /// Optional JSON coercion table merged over the built-in rules
    pub patch_table: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            adom: String::new(),
            scopetype: ScopeType::Inherit,
            import_options: false,
            retries: 1,
            patch_table: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid provider configuration: {0}")]
    Parse(String),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

impl ProviderConfig {
    /// Defaults overridden by the FORTIMANAGER_* environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by a variable lookup; unparsable values keep the default
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(hostname) = lookup(ENV_HOSTNAME).filter(|h| !h.is_empty()) {
            config.hostname = Some(hostname);
        }
        if let Some(adom) = lookup(ENV_ADOM) {
            config.adom = adom;
        }
        if let Some(value) = lookup(ENV_IMPORT_TABLE) {
            match value.trim() {
                "true" => config.import_options = true,
                "false" | "" => config.import_options = false,
                other => warn!("Ignoring {ENV_IMPORT_TABLE}={other}: expected true or false"),
            }
        }
        if let Some(value) = lookup(ENV_RETRIES) {
            match value.trim().parse::<u32>() {
                Ok(retries) => config.retries = retries,
                Err(_) => warn!("Ignoring {ENV_RETRIES}={value}: expected a number"),
            }
        }

        config
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// The configured coercion table, or the built-in one
    pub fn load_patch_table(&self) -> Result<PatchTable, ConfigError> {
        match &self.patch_table {
            Some(path) => Ok(PatchTable::from_file(path)?),
            None => Ok(PatchTable::builtin()),
        }
    }
}
