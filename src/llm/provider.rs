//! Supported language-model providers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire protocol a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    /// `POST {base}/chat/completions` with bearer auth.
    ChatCompletions,
    /// `POST {base}/messages` with `x-api-key` auth.
    AnthropicMessages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Mistral,
    #[value(name = "openai")]
    OpenAi,
    Anthropic,
    Groq,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Mistral => "Mistral",
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Groq => "Groq",
            Provider::Ollama => "Ollama",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Mistral => "https://api.mistral.ai/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::Ollama => "http://localhost:11434/v1",
        }
    }

    pub fn flavor(&self) -> ApiFlavor {
        match self {
            Provider::Anthropic => ApiFlavor::AnthropicMessages,
            _ => ApiFlavor::ChatCompletions,
        }
    }

    /// Local providers accept unauthenticated requests.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
