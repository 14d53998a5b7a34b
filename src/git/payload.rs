//! Release payload handed to prompt construction.

use git2::Repository;

use crate::error::GitError;

use super::range::collect_messages_since;
use super::tags::{LatestTag, find_latest_semantic_tag};

/// Tag name used when the repository has no prior release.
pub const INITIAL_RELEASE: &str = "Initial Release";

/// Everything the notes generator needs to know about the release range.
#[derive(Debug, Clone)]
pub struct ReleasePayload {
    /// Latest release tag name, or [`INITIAL_RELEASE`].
    pub tag_name: String,
    /// Commit messages since that tag, newest first.
    pub messages: Vec<String>,
    pub initial_release: bool,
}

impl ReleasePayload {
    pub fn new(latest: &LatestTag, messages: Vec<String>) -> Self {
        match latest {
            LatestTag::Found(tag) => Self {
                tag_name: tag.name.clone(),
                messages,
                initial_release: false,
            },
            LatestTag::NotFound => Self {
                tag_name: INITIAL_RELEASE.to_string(),
                messages,
                initial_release: true,
            },
        }
    }

    /// True when HEAD is the tagged commit, i.e. nothing to release.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Resolve the latest release tag and collect the commits since it.
pub fn build_release_payload(repo: &Repository) -> Result<ReleasePayload, GitError> {
    let latest = find_latest_semantic_tag(repo)?;
    let messages = collect_messages_since(repo, &latest)?;
    Ok(ReleasePayload::new(&latest, messages))
}
