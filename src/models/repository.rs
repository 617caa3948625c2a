//! Repository identity models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::remote::Remote;

/// Value the repository identifier takes when HEAD has no history
pub const NO_HISTORY_SENTINEL: &str = "-";

/// Git identity (user.name / user.email) of the local user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GitUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Hosting provider metadata attached to a remote. All fields travel
/// together; a remote either has all of them or none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderRepoData {
    #[serde(rename = "remoteProvider")]
    pub provider: String,
    #[serde(rename = "remoteProviderRepoDomain")]
    pub repo_domain: String,
    #[serde(rename = "remoteProviderRepoName")]
    pub repo_name: String,
    #[serde(
        rename = "remoteProviderRepoOwnerDomain",
        skip_serializing_if = "Option::is_none"
    )]
    pub repo_owner_domain: Option<String>,
}

/// Identifies which physical repository a new patch belongs to
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GitRepoData {
    /// Repository without a remote, identified by its root commit
    InitialCommit {
        #[serde(rename = "initialCommitSha")]
        initial_commit_sha: String,
    },
    /// Repository identified by a remote
    Remote {
        #[serde(rename = "initialCommitSha", skip_serializing_if = "Option::is_none")]
        initial_commit_sha: Option<String>,
        #[serde(rename = "remoteURL")]
        remote_url: String,
        #[serde(rename = "remoteDomain")]
        remote_domain: String,
        #[serde(rename = "remotePath")]
        remote_path: String,
        #[serde(flatten)]
        provider: Option<ProviderRepoData>,
    },
}

impl GitRepoData {
    /// Build the identity for a remote. `repository_id` is the stable root
    /// commit identifier; the no-history sentinel is dropped.
    pub fn from_remote(remote: &Remote, repository_id: Option<&str>) -> Self {
        let provider = remote.provider.as_ref().map(|p| ProviderRepoData {
            provider: p.kind.to_string(),
            repo_domain: p.domain.clone(),
            repo_name: p.repo_name.clone(),
            repo_owner_domain: p.owner.clone(),
        });

        GitRepoData::Remote {
            initial_commit_sha: usable_repository_id(repository_id),
            remote_url: remote.url.clone(),
            remote_domain: remote.domain.clone(),
            remote_path: remote.path.clone(),
            provider,
        }
    }

    pub fn initial_commit_sha(&self) -> Option<&str> {
        match self {
            GitRepoData::InitialCommit { initial_commit_sha } => Some(initial_commit_sha),
            GitRepoData::Remote {
                initial_commit_sha, ..
            } => initial_commit_sha.as_deref(),
        }
    }
}

fn usable_repository_id(repository_id: Option<&str>) -> Option<String> {
    repository_id
        .map(str::trim)
        .filter(|id| !id.is_empty() && *id != NO_HISTORY_SENTINEL)
        .map(|id| id.to_string())
}

/// Remote descriptor of a repository record returned by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRepoData {
    pub url: String,
    pub domain: String,
    pub path: String,
    pub provider: Option<ProviderRepoData>,
}

/// Repository record the server associates with a patch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GitRepositoryData {
    pub id: String,
    pub initial_commit_sha: Option<String>,
    pub remote: Option<RemoteRepoData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
