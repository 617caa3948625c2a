//! Draft, changeset and patch models

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::repository::GitRepositoryData;
use super::transfer::SecureLink;

/// Changeset id the server uses for "no parent changeset"
pub const NONEXISTING_CHANGESET_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Creator profile denormalized onto a draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DraftUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A cloud-hosted, shareable bundle of changesets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,
    /// User id of the creator
    pub created_by: String,
    pub organization_id: Option<String>,
    pub deep_link_url: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub user: Option<DraftUser>,
    /// `None` until the changesets have been fetched
    pub changesets: Option<Vec<DraftChangeset>>,
}

impl Draft {
    /// Display label: the title, or a placeholder naming the id
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("Draft ({})", self.id),
        }
    }

    /// All patches across the fetched changesets, oldest changeset first
    pub fn patches(&self) -> impl Iterator<Item = &DraftPatch> {
        self.changesets
            .iter()
            .flatten()
            .flat_map(|changeset| changeset.patches.iter())
    }
}

/// Sort drafts so the most recently created comes first
pub fn sort_newest_first(drafts: &mut [Draft]) {
    drafts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// One atomic submission of patches within a draft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftChangeset {
    pub id: String,
    pub draft_id: String,
    /// `None` for the first changeset of a draft
    pub parent_changeset_id: Option<String>,
    pub user_id: String,
    pub git_user_name: Option<String>,
    pub git_user_email: Option<String>,
    pub deep_link_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patches: Vec<DraftPatch>,
}

/// Diff contents for one repository within a changeset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    pub id: String,
    pub changeset_id: String,
    pub user_id: String,
    pub base_commit_sha: String,
    pub base_branch_name: String,
    pub deep_link_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub git_repository_id: Option<String>,
    /// Server record of the repository; only present on patches read back
    pub repository: Option<GitRepositoryData>,
    /// `None` until fetched; distinct from empty contents
    pub contents: Option<String>,
    /// Where the contents can be downloaded from, if the server issued a link
    #[serde(skip)]
    pub download: Option<SecureLink>,
}

/// A patch that has not been submitted to the drafts service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalDraft {
    pub repository_path: PathBuf,
    /// Reference the contents were computed against
    pub base_ref: String,
    pub contents: String,
}

/// Either a local, unsubmitted patch or a cloud draft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DraftRef {
    Local(LocalDraft),
    Cloud(Draft),
}

impl DraftRef {
    pub fn is_cloud(&self) -> bool {
        matches!(self, DraftRef::Cloud(_))
    }

    /// Server id of a cloud draft
    pub fn id(&self) -> Option<&str> {
        match self {
            DraftRef::Local(_) => None,
            DraftRef::Cloud(draft) => Some(&draft.id),
        }
    }
}
