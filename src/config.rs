//! Configuration management
//!
//! Manages the provider endpoint, model assignments for the two generation
//! calls, and storage settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model provider API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Model assignments for the two generation calls
    #[serde(default)]
    pub models: ModelsConfig,
    /// Local storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key is stored in keyring, this is just a reference
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible provider
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
        }
    }
}

/// Model assignments for the syllabus and notes calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Model for syllabus generation (schema-constrained call)
    #[serde(default = "default_syllabus_model")]
    pub syllabus: String,
    /// Model for topic notes generation (freeform call)
    #[serde(default = "default_notes_model")]
    pub notes: String,
}

fn default_syllabus_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_notes_model() -> String {
    // Flash is fast and good at markdown generation; the same model serves
    // both calls by default.
    "google/gemini-2.5-flash".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            syllabus: default_syllabus_model(),
            notes: default_notes_model(),
        }
    }
}

impl ModelsConfig {
    /// Get model for a role name
    pub fn get(&self, role: &str) -> Option<&str> {
        match role.to_lowercase().as_str() {
            "syllabus" => Some(&self.syllabus),
            "notes" | "content" => Some(&self.notes),
            _ => None,
        }
    }

    /// Set model for a role name
    pub fn set(&mut self, role: &str, model: String) -> bool {
        match role.to_lowercase().as_str() {
            "syllabus" => {
                self.syllabus = model;
                true
            }
            "notes" | "content" => {
                self.notes = model;
                true
            }
            _ => false,
        }
    }

    /// List all available roles
    pub fn roles() -> &'static [&'static str] {
        &["syllabus", "notes"]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the data directory (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Capacity limit in bytes for the local store. Writes beyond it fail
    /// with a quota error, which the store reports as a "cloud" save.
    #[serde(default = "default_capacity")]
    pub capacity_bytes: Option<u64>,
}

fn default_capacity() -> Option<u64> {
    // Matches the ~5 MB quota typical of browser key-value stores
    Some(5 * 1024 * 1024)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            capacity_bytes: default_capacity(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            models: ModelsConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path()?;
        let parent = config_path.parent().context("Config path has no parent")?;

        std::fs::create_dir_all(parent).context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Resolve the directory course data is stored in
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => data_dir(),
        }
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "notesmith", "notesmith")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "notesmith", "notesmith")
        .context("Failed to get project directories")?;
    Ok(base.data_dir().to_path_buf())
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Provider:");
    println!("  base_url:  {}", config.api.base_url);
    println!("  api key:   {}", if crate::security::keyring::has_api_key() {
        "configured"
    } else {
        "not set"
    });
    println!("Models:");
    println!("  syllabus:  {}", config.models.syllabus);
    println!("  notes:     {}", config.models.notes);
    println!("Storage:");
    println!("  data dir:  {}", config.resolved_data_dir()?.display());
    match config.storage.capacity_bytes {
        Some(cap) => println!("  capacity:  {} bytes", cap),
        None => println!("  capacity:  unlimited"),
    }

    println!("\nUse 'notesmith config --set-model <role> <model>' to change a model");
    println!("Available roles: {}", ModelsConfig::roles().join(", "));

    Ok(())
}

/// Set API key
pub fn set_api_key(key: &str) -> Result<()> {
    crate::security::keyring::set_api_key(key)?;
    println!("API key stored securely.");
    Ok(())
}

/// Set model for a specific role
pub fn set_model(role: &str, model: &str) -> Result<()> {
    let mut config = Config::load()?;

    if !config.models.set(role, model.to_string()) {
        anyhow::bail!(
            "Unknown role '{}'. Available roles: {}",
            role,
            ModelsConfig::roles().join(", ")
        );
    }

    config.save()?;
    println!("Model for '{}' set to: {}", role, model);
    Ok(())
}

/// Reset configuration to defaults
pub fn reset_config() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults.");
    Ok(())
}
