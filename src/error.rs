//! Error types for relaise modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("No git repository found in '{}': {source}", .path.display())]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to enumerate tags: {0}")]
    TagEnumeration(#[source] git2::Error),

    #[error("No semantic version tags found")]
    NoSemanticTags,

    #[error("Failed to resolve HEAD: {0}")]
    HeadResolution(#[source] git2::Error),

    #[error("Failed to resolve the commit tagged by '{tag}': {source}")]
    TagTarget {
        tag: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to read commit {hash}: {source}")]
    ReadCommit {
        hash: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error(
        "Commit {commit} tagged by '{tag}' is not reachable from HEAD. \
         History may have been rewritten since the tag was created."
    )]
    BoundaryUnreachable { tag: String, commit: String },
}

/// Errors from loading and saving the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error(
        "No configuration found at '{}'. Run `relaise config --api-key AI_API_KEY` first.",
        .0.display()
    )]
    NotFound(PathBuf),

    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Failed to write config file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("AI API key not provided. Run `relaise config --api-key AI_API_KEY`.")]
    MissingApiKey,
}

/// Errors from language-model provider calls.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request to {provider} failed: {source}")]
    Request {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request timed out after {secs} seconds")]
    Timeout { provider: String, secs: u64 },

    #[error("{provider} API returned {status}: {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} returned an unreadable response: {detail}")]
    InvalidResponse { provider: String, detail: String },

    #[error("{0} returned no release notes")]
    EmptyResponse(String),

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<LlmError>),
}

impl LlmError {
    /// Whether another attempt may succeed.
    ///
    /// Network failures, timeouts, rate limits and server errors are transient.
    /// Client errors such as a bad API key are not.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Request { .. } | LlmError::Timeout { .. } => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::ClientBuild(_)
            | LlmError::EmptyResponse(_)
            | LlmError::InvalidResponse { .. }
            | LlmError::RetriesExhausted(_) => false,
        }
    }
}

/// Errors from copying release notes to the clipboard.
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error(
        "No clipboard tool found. Install one of: pbcopy, wl-copy, xclip, xsel \
         (or drop --copy)"
    )]
    NoTool,

    #[error("Failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with code {code}")]
    Failed { tool: String, code: i32 },
}
