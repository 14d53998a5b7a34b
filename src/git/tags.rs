//! Tag enumeration and latest semantic version detection.

use std::cmp::Ordering;

use git2::{Oid, Repository};
use semver::Version;
use tracing::{debug, warn};

use crate::error::GitError;

/// An annotated git tag whose name parses as a semantic version.
#[derive(Debug, Clone)]
pub struct SemanticTag {
    pub name: String,
    pub version: Version,
    /// Id of the tag object itself.
    pub tag_oid: Oid,
    /// Id of the commit the tag ultimately points at.
    pub target_oid: Oid,
    pub tagger: Option<String>,
    pub message: Option<String>,
}

impl SemanticTag {
    /// Total order used to pick the latest tag.
    ///
    /// Higher version wins; equal versions (`v1.0.0` vs `1.0.0`) prefer the
    /// lexically smaller name so the result never depends on enumeration order.
    fn precedence(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| other.name.cmp(&self.name))
    }
}

/// Outcome of looking up the latest release tag.
///
/// `NotFound` is the first-release case, not an error.
#[derive(Debug, Clone)]
pub enum LatestTag {
    Found(SemanticTag),
    NotFound,
}

impl LatestTag {
    pub fn as_found(&self) -> Option<&SemanticTag> {
        match self {
            LatestTag::Found(tag) => Some(tag),
            LatestTag::NotFound => None,
        }
    }

    /// Treat a missing tag as an error, for callers that need one.
    pub fn require(self) -> Result<SemanticTag, GitError> {
        match self {
            LatestTag::Found(tag) => Ok(tag),
            LatestTag::NotFound => Err(GitError::NoSemanticTags),
        }
    }
}

/// Find the annotated tag with the highest semantic version in the repository.
///
/// Lightweight tags and tags whose name (minus an optional leading `v`) does
/// not parse as a semantic version are skipped.
pub fn find_latest_semantic_tag(repo: &Repository) -> Result<LatestTag, GitError> {
    let latest = get_semantic_tags(repo)?
        .into_iter()
        .max_by(|a, b| a.precedence(b));

    match latest {
        Some(tag) => {
            debug!(tag = %tag.name, version = %tag.version, "Found latest semantic tag");
            Ok(LatestTag::Found(tag))
        }
        None => {
            debug!("No annotated semantic version tags found in repository");
            Ok(LatestTag::NotFound)
        }
    }
}

/// Get every annotated tag whose name parses as a semantic version.
pub fn get_semantic_tags(repo: &Repository) -> Result<Vec<SemanticTag>, GitError> {
    let mut tags = Vec::new();

    repo.tag_foreach(|oid, name_bytes| {
        let Ok(name_str) = std::str::from_utf8(name_bytes) else {
            warn!("Skipping tag with OID {} - name is not valid UTF-8", oid);
            return true;
        };
        let name = name_str.strip_prefix("refs/tags/").unwrap_or(name_str);

        let tag_obj = match repo.find_tag(oid) {
            Ok(tag_obj) => tag_obj,
            Err(e) => {
                debug!(tag = %name, error = %e, "Skipping lightweight or unresolvable tag");
                return true;
            }
        };

        let Some(version) = get_version_from_tag(name) else {
            debug!(tag = %name, "Skipping tag that is not a semantic version");
            return true;
        };

        // Tags on trees or blobs cannot bound a commit range.
        let target = match tag_obj.target().and_then(|obj| obj.peel_to_commit()) {
            Ok(commit) => commit.id(),
            Err(e) => {
                debug!(tag = %name, error = %e, "Skipping tag that does not point at a commit");
                return true;
            }
        };

        tags.push(SemanticTag {
            name: name.to_string(),
            version,
            tag_oid: oid,
            target_oid: target,
            tagger: tag_obj.tagger().map(|sig| {
                format!(
                    "{} <{}>",
                    sig.name().unwrap_or("unknown"),
                    sig.email().unwrap_or("unknown")
                )
            }),
            message: tag_obj.message().map(str::to_string),
        });

        true
    })
    .map_err(GitError::TagEnumeration)?;

    Ok(tags)
}

/// Extract a semantic version from a tag name.
/// Handles both "v1.2.3" and "1.2.3" formats.
pub fn get_version_from_tag(tag_name: &str) -> Option<Version> {
    let version_str = tag_name.strip_prefix('v').unwrap_or(tag_name);
    Version::parse(version_str).ok()
}
