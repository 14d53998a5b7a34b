//! Prompt construction for release note generation.

use crate::config::{Config, ReleaseType};
use crate::git::ReleasePayload;

const SYSTEM_INSTRUCTION: &str = r#"You are a professional release note generator.

Your task is to generate clear, well-structured, and concise release notes
for a new version of a software project. You will be provided with:
- The previous version tag (e.g., v1.2.3)
- A list of Git commit messages since that release
- Contextual preferences such as tone, language, bullet style, and section layout

Your responsibilities:
1. Analyze commit messages and identify notable changes.
2. Determine the new semantic version based on the release type (major, minor, patch).
3. Format the release notes according to the given preferences.
4. Be consistent, professional, and avoid redundancy.
5. Follow any additional instructions provided.
6. Do not make assumptions about the project or its context beyond what is provided.

Output only the release notes. Do not include explanations or commentary."#;

const COMMIT_TEXT_LEAD: &str = "Generate release notes based on the following commit messages:";

/// Release payload combined with the formatting preferences that shape it.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesPrompt {
    pub tag_name: String,
    pub initial_release: bool,
    pub messages: Vec<String>,
    pub mood: String,
    pub release_type: ReleaseType,
    pub bullet_style: String,
    pub include_sections: bool,
    pub language: String,
    pub emojis: bool,
}

impl NotesPrompt {
    pub fn new(payload: ReleasePayload, config: &Config) -> Self {
        Self {
            tag_name: payload.tag_name,
            initial_release: payload.initial_release,
            messages: payload.messages,
            mood: config.mood.clone(),
            release_type: config.release_type,
            bullet_style: config.bullet_style.clone(),
            include_sections: config.include_sections,
            language: config.language.clone(),
            emojis: config.emojis,
        }
    }

    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    /// Commit messages as a bulleted list under a fixed lead-in line.
    pub fn commit_text(&self) -> String {
        let mut text = format!("{COMMIT_TEXT_LEAD}\n\n");
        for message in &self.messages {
            text.push_str("- ");
            text.push_str(message.trim_end());
            text.push('\n');
        }
        text
    }

    /// Formatting directives derived from the preferences.
    ///
    /// Blank string preferences are left out.
    pub fn directives(&self) -> Vec<String> {
        let mut directives = Vec::new();

        if self.include_sections {
            directives.push("Group changes into sections: Features, Fixes, Other.".to_string());
        }

        if self.initial_release {
            directives.push(format!(
                "This is the initial {} release of the project; there is no previous tag. \
                 Propose an appropriate first version tag.",
                self.release_type
            ));
        } else {
            directives.push(format!(
                "This is a {} release. Provide the appropriate next tag number from: {}.",
                self.release_type, self.tag_name
            ));
        }

        if !self.bullet_style.trim().is_empty() {
            directives.push(format!("Use '{}' for bullets in lists.", self.bullet_style));
        }

        if !self.language.trim().is_empty() {
            directives.push(format!("Write the release notes in {}.", self.language));
        }

        if self.emojis {
            directives.push(
                "Include relevant emojis next to each item to enhance readability.".to_string(),
            );
        }

        if !self.mood.trim().is_empty() {
            directives.push(format!("Set the tone of voice to '{}'.", self.mood));
        }

        directives.push("Avoid listing trivial or repetitive commits.".to_string());
        directives.push(
            "Do not include internal or build-related changes unless significant.".to_string(),
        );

        directives
    }
}
