//! Git operations using git2-rs.

pub mod commits;
pub mod payload;
pub mod range;
pub mod tags;

use std::path::Path;

use git2::Repository;
use tracing::debug;

use crate::error::GitError;

pub use commits::{CommitRecord, History};
pub use payload::{INITIAL_RELEASE, ReleasePayload, build_release_payload};
pub use range::{collect_all_messages, collect_messages_since};
pub use tags::{LatestTag, SemanticTag, find_latest_semantic_tag, get_version_from_tag};

/// Open the repository at `path` for reading.
pub fn open_repository(path: &Path) -> Result<Repository, GitError> {
    let repo = Repository::open(path).map_err(|source| GitError::OpenRepository {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Opened repository");
    Ok(repo)
}
