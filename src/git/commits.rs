//! Lazy history traversal from HEAD.

use chrono::{DateTime, TimeZone, Utc};
use git2::{Commit, Oid, Repository, Revwalk, Sort};

use crate::error::GitError;

/// A commit as seen by the range collector.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub hash: String,
    /// Raw message as stored, trailing newline included.
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub oid: Oid,
}

impl CommitRecord {
    /// Create a CommitRecord from a git2 Commit.
    pub fn from_git2_commit(commit: &Commit) -> Result<Self, GitError> {
        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let time = commit.committer().when();
        let timestamp = Utc
            .timestamp_opt(time.seconds(), 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Ok(Self {
            hash: commit.id().to_string(),
            message,
            timestamp,
            oid: commit.id(),
        })
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(7)]
    }
}

/// Resolve HEAD to a commit id.
pub fn head_commit(repo: &Repository) -> Result<Oid, GitError> {
    let head = repo.head().map_err(GitError::HeadResolution)?;
    let commit = head.peel_to_commit().map_err(GitError::HeadResolution)?;
    Ok(commit.id())
}

/// Commits reachable from a starting point, newest committer time first.
///
/// A commit is never yielded before any of its descendants, even when
/// committer times tie.
///
/// Pulls one commit at a time from a libgit2 revwalk, so callers that stop
/// early never read the rest of the history. Not restartable.
pub struct History<'repo> {
    repo: &'repo Repository,
    revwalk: Revwalk<'repo>,
}

impl<'repo> History<'repo> {
    /// Walk everything reachable from `start`.
    pub fn starting_at(repo: &'repo Repository, start: Oid) -> Result<Self, GitError> {
        let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
            .map_err(GitError::RevwalkError)?;
        revwalk.push(start).map_err(GitError::RevwalkError)?;
        Ok(Self { repo, revwalk })
    }

    /// Walk everything reachable from HEAD.
    pub fn from_head(repo: &'repo Repository) -> Result<Self, GitError> {
        let head = head_commit(repo)?;
        Self::starting_at(repo, head)
    }
}

impl Iterator for History<'_> {
    type Item = Result<CommitRecord, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = match self.revwalk.next()? {
            Ok(oid) => oid,
            Err(e) => return Some(Err(GitError::RevwalkError(e))),
        };

        let record = self
            .repo
            .find_commit(oid)
            .map_err(|source| GitError::ReadCommit {
                hash: oid.to_string(),
                source,
            })
            .and_then(|commit| CommitRecord::from_git2_commit(&commit));

        Some(record)
    }
}
