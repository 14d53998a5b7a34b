//! Integration tests for commit range collection.
//!
//! Tests `collect_messages_since` and `collect_all_messages` from
//! `src/git/range.rs` using temporary git repositories.

mod common;

use common::TestRepo;
use relaise::GitError;
use relaise::git::{
    LatestTag, collect_all_messages, collect_messages_since, find_latest_semantic_tag,
};

fn latest(test_repo: &TestRepo) -> LatestTag {
    find_latest_semantic_tag(&test_repo.repo).expect("Failed to resolve tag")
}

// =============================================================================
// BOUNDED RANGE TESTS
// =============================================================================

#[test]
fn test_linear_history_excludes_tagged_commit() {
    let test_repo = TestRepo::new();

    let c = test_repo.commit("C");
    test_repo.tag_annotated("v1.0.0", c, "Release 1.0.0");
    test_repo.commit("D");
    test_repo.commit("E");
    test_repo.commit("head");

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert_eq!(messages, vec!["head", "E", "D"]);
}

#[test]
fn test_round_trip_scenario() {
    let test_repo = TestRepo::new();

    test_repo.commit("A");
    let b = test_repo.commit("B");
    test_repo.tag_annotated("v1.0.0", b, "Release 1.0.0");
    test_repo.commit("C");
    test_repo.commit("D");

    let latest = latest(&test_repo);
    assert_eq!(latest.as_found().map(|t| t.name.as_str()), Some("v1.0.0"));

    let messages = collect_messages_since(&test_repo.repo, &latest).expect("Failed to collect");
    assert_eq!(messages, vec!["D", "C"]);
}

#[test]
fn test_head_is_tagged_commit_yields_empty() {
    let test_repo = TestRepo::new();

    test_repo.commit("feat: first");
    let head = test_repo.commit("feat: second");
    test_repo.tag_annotated("v1.0.0", head, "Release 1.0.0");

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert!(messages.is_empty(), "Expected no commits since tag");
}

#[test]
fn test_messages_are_unmodified() {
    let test_repo = TestRepo::new();

    let base = test_repo.commit("chore: base");
    test_repo.tag_annotated("v0.1.0", base, "0.1.0");
    test_repo.commit("feat: add export\n\nSupports CSV and JSON.\n");

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert_eq!(
        messages,
        vec!["feat: add export\n\nSupports CSV and JSON.\n".to_string()]
    );
}

#[test]
fn test_uses_latest_version_not_latest_commit() {
    let test_repo = TestRepo::new();

    test_repo.commit("A");
    let b = test_repo.commit("B");
    let c = test_repo.commit("C");
    test_repo.commit("D");

    // Highest version sits on the older commit.
    test_repo.tag_annotated("v2.0.0", b, "2.0.0");
    test_repo.tag_annotated("v1.0.0", c, "1.0.0");

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert_eq!(messages, vec!["D", "C"]);
}

#[test]
fn test_merge_history_ordered_by_committer_time() {
    let test_repo = TestRepo::new();

    let a = test_repo.commit_at("A", 1_000);
    test_repo.tag_annotated("v1.0.0", a, "1.0.0");
    test_repo.commit_at("B", 2_000);
    let side = test_repo.commit_detached("C", &[a], 3_000);
    test_repo.merge("M", side, 4_000);

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert_eq!(messages, vec!["M", "C", "B"]);
}

#[test]
fn test_equal_commit_times_keep_history_order() {
    let test_repo = TestRepo::new();

    test_repo.commit_at("A", 1_000);
    let b = test_repo.commit_at("B", 1_000);
    test_repo.tag_annotated("v1.0.0", b, "Release 1.0.0");
    test_repo.commit_at("C", 1_000);
    test_repo.commit_at("D", 1_000);

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert_eq!(messages, vec!["D", "C"]);
}

#[test]
fn test_equal_commit_times_full_history_is_child_first() {
    let test_repo = TestRepo::new();

    for message in ["first", "second", "third", "fourth", "fifth"] {
        test_repo.commit_at(message, 5_000);
    }

    let messages = collect_all_messages(&test_repo.repo).expect("Failed to collect");

    assert_eq!(messages, vec!["fifth", "fourth", "third", "second", "first"]);
}

#[test]
fn test_merge_with_tied_branch_times_stays_above_tag() {
    let test_repo = TestRepo::new();

    test_repo.commit_at("base", 1_000);
    let a = test_repo.commit_at("A", 1_000);
    test_repo.tag_annotated("v1.0.0", a, "1.0.0");
    test_repo.commit_at("B", 1_000);
    let side = test_repo.commit_detached("C", &[a], 1_000);
    test_repo.merge("M", side, 1_000);

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], "M");
    let mut branches = messages[1..].to_vec();
    branches.sort();
    assert_eq!(branches, vec!["B", "C"]);
    assert!(!messages.iter().any(|m| m == "A" || m == "base"));
}

// =============================================================================
// ERROR CASES
// =============================================================================

#[test]
fn test_boundary_not_ancestor_of_head_is_error() {
    let test_repo = TestRepo::new();

    let a = test_repo.commit_at("A", 1_000);
    let orphan_side = test_repo.commit_detached("side", &[a], 2_000);
    test_repo.tag_annotated("v1.0.0", orphan_side, "tag on unmerged work");
    test_repo.commit_at("B", 3_000);

    let result = collect_messages_since(&test_repo.repo, &latest(&test_repo));

    match result {
        Err(GitError::BoundaryUnreachable { tag, commit }) => {
            assert_eq!(tag, "v1.0.0");
            assert_eq!(commit, orphan_side.to_string());
        }
        other => panic!("Expected BoundaryUnreachable, got {:?}", other),
    }
}

#[test]
fn test_unborn_head_is_head_resolution_error() {
    let test_repo = TestRepo::new();

    let result = collect_messages_since(&test_repo.repo, &LatestTag::NotFound);

    assert!(matches!(result, Err(GitError::HeadResolution(_))));
}

// =============================================================================
// NO TAG (INITIAL RELEASE)
// =============================================================================

#[test]
fn test_no_tag_returns_full_history_newest_first() {
    let test_repo = TestRepo::new();

    test_repo.commit("first");
    test_repo.commit("second");
    test_repo.commit("third");
    test_repo.commit("fourth");

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert_eq!(messages, vec!["fourth", "third", "second", "first"]);
}

#[test]
fn test_lightweight_tag_does_not_bound_range() {
    let test_repo = TestRepo::new();

    let first = test_repo.commit("first");
    test_repo.tag_lightweight("v1.0.0", first);
    test_repo.commit("second");

    let messages =
        collect_messages_since(&test_repo.repo, &latest(&test_repo)).expect("Failed to collect");

    assert_eq!(messages, vec!["second", "first"]);
}

#[test]
fn test_collect_all_messages_matches_commit_count() {
    let test_repo = TestRepo::new();

    for i in 0..7 {
        test_repo.commit(&format!("commit {}", i));
    }

    let messages = collect_all_messages(&test_repo.repo).expect("Failed to collect");

    assert_eq!(messages.len(), 7);
    assert_eq!(messages.first().map(String::as_str), Some("commit 6"));
    assert_eq!(messages.last().map(String::as_str), Some("commit 0"));
}
