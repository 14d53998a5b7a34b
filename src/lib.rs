//! relaise - A CLI tool that generates release notes from git history.
//!
//! # Overview
//!
//! relaise finds the latest annotated semantic version tag in a repository,
//! collects every commit message since that tag, and asks a language-model
//! provider to turn them into release notes.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod prompt;

// Re-export commonly used types
pub use config::{Config, ConfigOverrides, ReleaseType};
pub use error::{ClipboardError, ConfigError, GitError, LlmError};
pub use git::{LatestTag, ReleasePayload, SemanticTag};
pub use llm::Provider;
pub use prompt::NotesPrompt;
