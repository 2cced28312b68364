//! Notesmith - AI Study Notes Generator Library
//!
//! A study-notes generator with:
//! - Syllabus generation via an OpenAI-compatible model provider
//! - On-demand Markdown notes per topic with video-search links
//! - Local single-blob persistence with a storage-mode indicator
//! - CLI and interactive shell front-end
//!
//! # Example
//!
//! ```ignore
//! use notesmith::app::AppController;
//! use notesmith::config::Config;
//! use notesmith::content::LlmContentGenerator;
//! use notesmith::store::CourseStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let generator = LlmContentGenerator::from_config(&config)?;
//!     let store = CourseStore::open(config.resolved_data_dir()?, config.storage.capacity_bytes)?;
//!     let mut controller = AppController::new(generator, store);
//!     controller.create_course("Python").await?;
//!     Ok(())
//! }
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod types;
pub mod config;
pub mod security;
pub mod content;
pub mod store;
pub mod app;

// Presentation modules
pub mod ui;
pub mod cli;

// Re-export commonly used types for convenience
pub use app::{AppController, AppState};
pub use content::{ContentGenerator, GenerationError, LlmContentGenerator};
pub use store::{CourseStore, SaveReceipt};
pub use types::{Course, DifficultyLevel, StorageMode, Topic, TopicStatus};

pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - AI Study Notes Generator", NAME, VERSION)
}
