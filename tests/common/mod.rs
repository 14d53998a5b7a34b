//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use git2::{Oid, Repository, Signature, Time};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'static> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    fn signature_at(&self, seconds: i64) -> Signature<'static> {
        Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))
            .expect("Failed to create signature")
    }

    /// Write a file, stage it and return the resulting tree id.
    fn stage(&self, message: &str) -> Oid {
        let file_path = self.dir.path().join("test.txt");
        let content = format!(
            "{}\n{}",
            message,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        std::fs::write(&file_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(Path::new("test.txt"))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        index.write_tree().expect("Failed to write tree")
    }

    fn head_commit(&self) -> Option<git2::Commit<'_>> {
        self.repo.head().ok().and_then(|h| h.peel_to_commit().ok())
    }

    fn commit_with(&self, sig: &Signature, message: &str) -> Oid {
        let tree_id = self.stage(message);
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.head_commit();
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), sig, sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a commit on HEAD with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = self.signature();
        self.commit_with(&sig, message)
    }

    /// Create a commit on HEAD with a fixed author/committer time.
    pub fn commit_at(&self, message: &str, seconds: i64) -> Oid {
        let sig = self.signature_at(seconds);
        self.commit_with(&sig, message)
    }

    /// Create a commit with explicit parents that does not move HEAD.
    pub fn commit_detached(&self, message: &str, parents: &[Oid], seconds: i64) -> Oid {
        let sig = self.signature_at(seconds);
        let tree_id = self.stage(message);
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent_commits: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).expect("Failed to find parent"))
            .collect();
        let parent_refs: Vec<&git2::Commit> = parent_commits.iter().collect();

        self.repo
            .commit(None, &sig, &sig, message, &tree, &parent_refs)
            .expect("Failed to create detached commit")
    }

    /// Create a merge commit on HEAD whose second parent is `other`.
    pub fn merge(&self, message: &str, other: Oid, seconds: i64) -> Oid {
        let sig = self.signature_at(seconds);
        let tree_id = self.stage(message);
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let head = self.head_commit().expect("HEAD must exist to merge");
        let other = self.repo.find_commit(other).expect("Failed to find merge parent");

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&head, &other])
            .expect("Failed to create merge commit")
    }

    /// Create a lightweight tag pointing to the given OID.
    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let obj = self
            .repo
            .find_object(oid, None)
            .expect("Failed to find object");
        self.repo
            .tag_lightweight(name, &obj, false)
            .expect("Failed to create lightweight tag");
    }

    /// Create an annotated tag pointing to the given OID. Returns the tag object OID.
    pub fn tag_annotated(&self, name: &str, oid: Oid, message: &str) -> Oid {
        let sig = self.signature();
        let obj = self
            .repo
            .find_object(oid, None)
            .expect("Failed to find object");
        self.repo
            .tag(name, &obj, &sig, message, false)
            .expect("Failed to create annotated tag")
    }

    /// Tree id of the given commit.
    pub fn tree_of(&self, oid: Oid) -> Oid {
        self.repo
            .find_commit(oid)
            .expect("Failed to find commit")
            .tree_id()
    }
}
