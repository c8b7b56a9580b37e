//! Configuration management for netmong

use crate::error::{NetmongError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comment settings
    pub comment: CommentConfig,
    /// Post settings
    pub post: PostConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            NetmongError::Config(format!("Invalid configuration {}: {}", path.display(), e))
        })
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NetmongError::Config(e.to_string()))
    }
}

/// Who may edit or delete a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationPolicy {
    /// Only the comment's author
    #[default]
    AuthorOnly,
    /// Any caller, no ownership check
    Open,
}

/// Comment-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// Maximum comment content length in characters
    pub max_content_length: usize,
    /// Ownership policy for update and delete
    pub authorization: AuthorizationPolicy,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            max_content_length: 2000,
            authorization: AuthorizationPolicy::AuthorOnly,
        }
    }
}

/// Post-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Posts per listing page
    pub page_size: usize,
    /// Maximum post content length in characters
    pub max_content_length: usize,
    /// Directory component of composed image URLs
    pub image_dir: String,
    /// Public origin prefixed to image URLs
    pub domain: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            max_content_length: 100,
            image_dir: "images".to_string(),
            domain: "http://localhost:8080".to_string(),
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot file; the platform data directory is used when unset
    pub data_file: Option<PathBuf>,
}
