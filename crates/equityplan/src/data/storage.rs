//! Per-client file storage
//!
//! Directory structure:
//! ~/.equityplan/
//!   config.yaml          # Active client, planning preferences
//!   equityplan.log
//!   clients/
//!     sample.yaml
//!     jordan-lee.yaml

use std::fs;
use std::path::{Path, PathBuf};

use equityplan_core::config::PlanningConfig;
use equityplan_core::model::Client;
use serde::{Deserialize, Serialize};

/// Configuration stored in config.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Client used when a command does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_client: Option<String>,
    /// Default ISO exercise-planning horizon in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u8>,
}

impl DataConfig {
    pub fn planning_config(&self) -> PlanningConfig {
        self.horizon_years
            .map(PlanningConfig::with_horizon)
            .unwrap_or_default()
    }
}

/// Error types for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
    ClientNotFound(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {msg}"),
            StorageError::Parse(msg) => write!(f, "Parse error: {msg}"),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            StorageError::ClientNotFound(id) => write!(f, "Client '{id}' not found"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Manages the data directory of client files
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the default data directory path (~/.equityplan/)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".equityplan")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    fn clients_dir(&self) -> PathBuf {
        self.root.join("clients")
    }

    fn client_path(&self, id: &str) -> PathBuf {
        self.clients_dir()
            .join(format!("{}.yaml", sanitize_filename(id)))
    }

    /// Check if the data directory exists and has been initialized
    pub fn exists(&self) -> bool {
        self.root.exists() && self.clients_dir().exists()
    }

    /// Initialize the data directory structure
    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.clients_dir())
            .map_err(|e| StorageError::Io(format!("Failed to create clients directory: {e}")))
    }

    pub fn load_config(&self) -> Result<DataConfig, StorageError> {
        let config_path = self.config_path();
        if !config_path.exists() {
            return Ok(DataConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| StorageError::Io(format!("Failed to read config: {e}")))?;

        serde_saphyr::from_str(&content)
            .map_err(|e| StorageError::Parse(format!("Failed to parse config: {e}")))
    }

    pub fn save_config(&self, config: &DataConfig) -> Result<(), StorageError> {
        if !self.exists() {
            self.init()?;
        }

        let yaml = serde_saphyr::to_string(config)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize config: {e}")))?;

        fs::write(self.config_path(), yaml)
            .map_err(|e| StorageError::Io(format!("Failed to write config: {e}")))
    }

    /// Client file stems in the clients directory, sorted
    pub fn list_clients(&self) -> Result<Vec<String>, StorageError> {
        let clients_dir = self.clients_dir();
        if !clients_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&clients_dir)
            .map_err(|e| StorageError::Io(format!("Failed to read clients directory: {e}")))?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn load_client(&self, id: &str) -> Result<Client, StorageError> {
        let path = self.client_path(id);
        if !path.exists() {
            return Err(StorageError::ClientNotFound(id.to_string()));
        }
        load_client_from_path(&path)
    }

    /// Load every readable client. Unreadable files are logged and skipped.
    pub fn load_all_clients(&self) -> Result<Vec<Client>, StorageError> {
        let mut clients = Vec::new();
        for name in self.list_clients()? {
            match self.load_client(&name) {
                Ok(client) => clients.push(client),
                Err(e) => tracing::warn!(client = %name, error = %e, "Failed to load client"),
            }
        }
        Ok(clients)
    }

    pub fn save_client(&self, client: &Client) -> Result<(), StorageError> {
        if !self.exists() {
            self.init()?;
        }

        let yaml = serde_saphyr::to_string(client)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize client: {e}")))?;

        fs::write(self.client_path(client.id.as_str()), yaml)
            .map_err(|e| StorageError::Io(format!("Failed to write client: {e}")))?;

        tracing::info!(client = %client.id, grants = client.grants.len(), "saved client");
        Ok(())
    }
}

fn load_client_from_path(path: &Path) -> Result<Client, StorageError> {
    let content = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read file: {e}")))?;

    serde_saphyr::from_str(&content)
        .map_err(|e| StorageError::Parse(format!("Failed to parse YAML: {e}")))
}

/// Sanitize a client id for use as a filename
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
