//! Commit range collection bounded by the latest release tag.

use git2::{Oid, Repository};
use tracing::debug;

use crate::error::GitError;

use super::commits::History;
use super::tags::{LatestTag, SemanticTag};

/// Resolve the commit a release tag points at.
///
/// Annotated tags may target another tag object, so the target is peeled
/// until a commit is reached.
pub fn resolve_boundary(repo: &Repository, tag: &SemanticTag) -> Result<Oid, GitError> {
    let to_err = |source| GitError::TagTarget {
        tag: tag.name.clone(),
        source,
    };

    let target = repo.find_object(tag.target_oid, None).map_err(to_err)?;
    let commit = target.peel_to_commit().map_err(to_err)?;
    Ok(commit.id())
}

/// Collect commit messages from HEAD back to (excluding) the tagged commit.
///
/// Messages are returned newest first and unmodified. With
/// [`LatestTag::NotFound`] the whole history reachable from HEAD is returned.
///
/// If the tagged commit is never reached the history has diverged from the
/// tag and [`GitError::BoundaryUnreachable`] is returned rather than a
/// partial list.
pub fn collect_messages_since(
    repo: &Repository,
    latest: &LatestTag,
) -> Result<Vec<String>, GitError> {
    let tag = match latest {
        LatestTag::Found(tag) => tag,
        LatestTag::NotFound => return collect_all_messages(repo),
    };

    let boundary = resolve_boundary(repo, tag)?;
    let mut messages = Vec::new();

    for record in History::from_head(repo)? {
        let record = record?;
        if record.oid == boundary {
            debug!(
                tag = %tag.name,
                count = messages.len(),
                "Reached tagged commit"
            );
            return Ok(messages);
        }
        messages.push(record.message);
    }

    Err(GitError::BoundaryUnreachable {
        tag: tag.name.clone(),
        commit: boundary.to_string(),
    })
}

/// Collect every commit message reachable from HEAD, newest first.
pub fn collect_all_messages(repo: &Repository) -> Result<Vec<String>, GitError> {
    let messages = History::from_head(repo)?
        .map(|record| record.map(|r| r.message))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = messages.len(), "Collected full history");
    Ok(messages)
}
