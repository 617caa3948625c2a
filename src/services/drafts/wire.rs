//! Wire shapes of the drafts API and their mapping onto the models.
//!
//! Response field names differ from the model (`deepLink` becomes
//! `deep_link_url`, timestamps arrive as strings), so every entity has an
//! explicit mapping function instead of deserializing the model directly.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DraftsError, Result};
use crate::models::{
    Draft, DraftChangeset, DraftPatch, DraftUser, GitRepoData, GitRepositoryData,
    ProviderRepoData, RemoteRepoData, SecureLink, NONEXISTING_CHANGESET_ID,
};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDraftRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateChangesetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_changeset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_user_email: Option<String>,
    pub patches: Vec<CreatePatchRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePatchRequest {
    pub base_commit_sha: String,
    pub base_branch_name: String,
    pub git_repo_data: GitRepoData,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DraftUserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DraftResponse {
    pub id: String,
    pub created_by: String,
    pub organization_id: Option<String>,
    pub deep_link: String,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub user: Option<DraftUserResponse>,
}

/// Changeset as returned by both the create and list endpoints; only the
/// patch shape differs between them
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangesetResponse<P> {
    pub id: String,
    pub draft_id: String,
    pub parent_changeset_id: Option<String>,
    pub user_id: String,
    pub git_user_name: Option<String>,
    pub git_user_email: Option<String>,
    pub deep_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default = "Vec::new")]
    pub patches: Vec<P>,
}

/// Patch created alongside a changeset, carrying its upload target
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedPatchResponse {
    pub id: String,
    pub changeset_id: String,
    pub base_commit_sha: String,
    pub base_branch_name: String,
    pub git_repository_id: Option<String>,
    pub secure_upload_data: SecureLink,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PatchResponse {
    pub id: String,
    pub changeset_id: String,
    pub user_id: Option<String>,
    pub base_commit_sha: String,
    pub base_branch_name: String,
    pub deep_link: Option<String>,
    pub secure_download_data: Option<SecureLink>,
    pub git_repository_id: Option<String>,
    pub git_repository_data: Option<GitRepositoryResponse>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitRepositoryResponse {
    pub id: String,
    pub initial_commit_sha: Option<String>,
    #[serde(rename = "remoteURL")]
    pub remote_url: Option<String>,
    pub remote_domain: Option<String>,
    pub remote_path: Option<String>,
    pub remote_provider: Option<String>,
    pub remote_provider_repo_domain: Option<String>,
    pub remote_provider_repo_name: Option<String>,
    pub remote_provider_repo_owner_domain: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

// ============================================================================
// Mapping
// ============================================================================

/// Parse an API timestamp. Offsets are honored; a timestamp without one is
/// taken as UTC.
pub(crate) fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| DraftsError::InvalidResponse(format!("Invalid {} '{}': {}", field, value, e)))
}

fn parse_optional_timestamp(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(v, field)).transpose()
}

fn parent_changeset_id(value: Option<String>) -> Option<String> {
    value.filter(|id| !id.is_empty() && id != NONEXISTING_CHANGESET_ID)
}

pub(crate) fn draft_from_response(response: DraftResponse) -> Result<Draft> {
    Ok(Draft {
        created_at: parse_timestamp(&response.created_at, "draft createdAt")?,
        updated_at: parse_timestamp(&response.updated_at, "draft updatedAt")?,
        id: response.id,
        created_by: response.created_by,
        organization_id: response.organization_id,
        deep_link_url: response.deep_link,
        is_public: response.is_public,
        title: response.title,
        description: response.description,
        user: response.user.map(|u| DraftUser {
            id: u.id,
            name: u.name,
            email: u.email,
        }),
        changesets: None,
    })
}

/// Map a changeset, building each patch with `map_patch`, which receives
/// the changeset's user id for patches that do not carry their own
pub(crate) fn changeset_from_response<P, F>(
    response: ChangesetResponse<P>,
    map_patch: F,
) -> Result<DraftChangeset>
where
    F: Fn(P, &str) -> Result<DraftPatch>,
{
    let patches = response
        .patches
        .into_iter()
        .map(|p| map_patch(p, &response.user_id))
        .collect::<Result<Vec<_>>>()?;

    Ok(DraftChangeset {
        created_at: parse_timestamp(&response.created_at, "changeset createdAt")?,
        updated_at: parse_timestamp(&response.updated_at, "changeset updatedAt")?,
        id: response.id,
        draft_id: response.draft_id,
        parent_changeset_id: parent_changeset_id(response.parent_changeset_id),
        user_id: response.user_id,
        git_user_name: response.git_user_name,
        git_user_email: response.git_user_email,
        deep_link_url: response.deep_link,
        patches,
    })
}

pub(crate) fn patch_from_response(
    response: PatchResponse,
    fallback_user_id: Option<&str>,
) -> Result<DraftPatch> {
    let repository = response
        .git_repository_data
        .map(repository_from_response)
        .transpose()?;

    let user_id = response
        .user_id
        .or_else(|| fallback_user_id.map(|id| id.to_string()))
        .ok_or_else(|| {
            DraftsError::InvalidResponse(format!("Patch {} has no user id", response.id))
        })?;

    Ok(DraftPatch {
        created_at: parse_optional_timestamp(response.created_at.as_deref(), "patch createdAt")?,
        updated_at: parse_optional_timestamp(response.updated_at.as_deref(), "patch updatedAt")?,
        id: response.id,
        changeset_id: response.changeset_id,
        user_id,
        base_commit_sha: response.base_commit_sha,
        base_branch_name: response.base_branch_name,
        deep_link_url: response.deep_link,
        git_repository_id: response.git_repository_id,
        repository,
        contents: None,
        download: response.secure_download_data,
    })
}

/// Map a freshly created patch; its contents are the text just uploaded.
///
/// `repository` stays `None`: the create response only returns
/// `gitRepositoryId`, and a `GitRepositoryData` needs the server's id and
/// timestamps. The full record arrives when the draft is read back.
pub(crate) fn created_patch_from_response(
    response: CreatedPatchResponse,
    user_id: &str,
    contents: &str,
) -> DraftPatch {
    DraftPatch {
        id: response.id,
        changeset_id: response.changeset_id,
        user_id: user_id.to_string(),
        base_commit_sha: response.base_commit_sha,
        base_branch_name: response.base_branch_name,
        deep_link_url: None,
        created_at: None,
        updated_at: None,
        git_repository_id: response.git_repository_id,
        repository: None,
        contents: Some(contents.to_string()),
        download: None,
    }
}

pub(crate) fn repository_from_response(response: GitRepositoryResponse) -> Result<GitRepositoryData> {
    let provider = match (
        response.remote_provider,
        response.remote_provider_repo_domain,
        response.remote_provider_repo_name,
    ) {
        (Some(provider), Some(repo_domain), Some(repo_name)) => Some(ProviderRepoData {
            provider,
            repo_domain,
            repo_name,
            repo_owner_domain: response.remote_provider_repo_owner_domain,
        }),
        _ => None,
    };

    let remote = match (response.remote_url, response.remote_domain, response.remote_path) {
        (Some(url), Some(domain), Some(path)) => Some(RemoteRepoData {
            url,
            domain,
            path,
            provider,
        }),
        _ => None,
    };

    Ok(GitRepositoryData {
        created_at: parse_timestamp(&response.created_at, "repository createdAt")?,
        updated_at: parse_timestamp(&response.updated_at, "repository updatedAt")?,
        id: response.id,
        initial_commit_sha: response.initial_commit_sha,
        remote,
    })
}
