//! Language-model providers and release note generation.

pub mod client;
pub mod provider;
pub mod retry;

pub use client::{CompletionRequest, HttpExecutor, NotesExecutor, get_timeout};
pub use provider::{ApiFlavor, Provider};
pub use retry::{complete_with_retry, retry_with_backoff};

use tracing::info;

use crate::config::Config;
use crate::error::LlmError;
use crate::prompt::NotesPrompt;

/// Build the provider request for a notes prompt.
pub fn build_request(prompt: &NotesPrompt, config: &Config) -> CompletionRequest {
    CompletionRequest {
        system: prompt.system_instruction().to_string(),
        prompt: prompt.commit_text(),
        directives: prompt.directives(),
        model: config.model.clone(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Generate release notes for `prompt` using `executor`.
pub async fn generate_notes<E: NotesExecutor + ?Sized>(
    prompt: &NotesPrompt,
    config: &Config,
    executor: &E,
) -> Result<String, LlmError> {
    let request = build_request(prompt, config);
    info!(
        provider = %config.provider,
        model = %config.model,
        commits = prompt.messages.len(),
        "Generating release notes"
    );
    complete_with_retry(&request, executor).await
}
