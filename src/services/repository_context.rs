//! Gathers the repository facts a new patch is described by

use crate::error::{DraftsError, Result};
use crate::models::{GitRepoData, GitUser, Remote, NO_HISTORY_SENTINEL};

use super::git_repository::RepositoryReader;
use super::settle::settled_value;

/// Where a patch originates
#[derive(Debug, Clone)]
pub struct RepositoryContext {
    /// Remote with a recognized hosting provider
    pub remote: Remote,
    pub user: Option<GitUser>,
    /// Empty when no branch is checked out
    pub branch_name: String,
    /// Root commit SHA; `None` when the repository has no history
    pub repository_id: Option<String>,
    /// Full SHA of the commit the patch applies to
    pub base_commit_sha: String,
}

impl RepositoryContext {
    /// Repository identity sent along with a new patch
    pub fn git_repo_data(&self) -> GitRepoData {
        GitRepoData::from_remote(&self.remote, self.repository_id.as_deref())
    }

    pub fn git_user_name(&self) -> Option<String> {
        self.user.as_ref().and_then(|u| u.name.clone())
    }

    pub fn git_user_email(&self) -> Option<String> {
        self.user.as_ref().and_then(|u| u.email.clone())
    }
}

/// Whether `reference` is already a full 40-character lowercase commit SHA.
/// Anything else, uppercase hex included, goes through resolution.
pub fn is_sha(reference: &str) -> bool {
    reference.len() == 40
        && reference
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Gather the remote, identity, branch and repository id concurrently,
/// then pin `base_ref` to a commit.
///
/// Only a missing provider-bearing remote and an unresolvable base are
/// fatal; every other fact degrades to a default.
pub async fn resolve_repository_context(
    repository: &dyn RepositoryReader,
    base_ref: &str,
) -> Result<RepositoryContext> {
    let (remote, user, branch, repository_id) = tokio::join!(
        repository.best_remote_with_provider(),
        repository.current_user(),
        repository.current_branch(),
        repository.unique_repository_id(),
    );

    let remote = settled_value(remote, "look up remotes")
        .flatten()
        .filter(|remote| remote.provider.is_some())
        .ok_or_else(|| DraftsError::Configuration("No Git provider found".to_string()))?;

    let user = settled_value(user, "read git identity").flatten();
    let branch_name = settled_value(branch, "read current branch")
        .flatten()
        .unwrap_or_default();
    let repository_id = settled_value(repository_id, "compute repository id")
        .filter(|id| !id.is_empty() && id != NO_HISTORY_SENTINEL);

    let base_commit_sha = if is_sha(base_ref) {
        base_ref.to_string()
    } else {
        repository
            .resolve_commit(base_ref)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to resolve {}: {}", base_ref, e);
                DraftsError::ReferenceResolution(base_ref.to_string())
            })?
            .ok_or_else(|| DraftsError::ReferenceResolution(base_ref.to_string()))?
    };

    tracing::debug!(
        "Resolved context for {}: remote {}, base {}",
        repository.path().display(),
        remote.name,
        base_commit_sha
    );

    Ok(RepositoryContext {
        remote,
        user,
        branch_name,
        repository_id,
        base_commit_sha,
    })
}
