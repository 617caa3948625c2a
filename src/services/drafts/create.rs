//! Draft creation protocol

use crate::error::{DraftsError, Result};
use crate::models::{Draft, SecureLink};
use crate::services::git_repository::RepositoryReader;
use crate::services::repository_context::resolve_repository_context;

use super::wire::{
    changeset_from_response, created_patch_from_response, draft_from_response,
    ChangesetResponse, CreateChangesetRequest, CreateDraftRequest, CreatePatchRequest,
    CreatedPatchResponse, DraftResponse,
};
use super::{changesets_path, draft_path, DraftService};

/// Parameters of a new draft
#[derive(Debug, Clone)]
pub struct CreateDraftOptions {
    /// Commit the contents were computed against; may be symbolic
    pub base_ref: String,
    pub contents: String,
    pub is_public: bool,
    pub organization_id: Option<String>,
}

impl CreateDraftOptions {
    /// Public draft with no organization
    pub fn new(base_ref: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            base_ref: base_ref.into(),
            contents: contents.into(),
            is_public: true,
            organization_id: None,
        }
    }
}

impl DraftService {
    /// Create a public draft holding `contents` as a single patch
    pub async fn create_draft(
        &self,
        repository: &dyn RepositoryReader,
        base_ref: &str,
        contents: &str,
    ) -> Result<Draft> {
        self.create_draft_with(repository, CreateDraftOptions::new(base_ref, contents))
            .await
    }

    /// Create a draft. Each step depends on the previous one:
    /// 1. resolve repository context (no network; fails on a missing
    ///    provider remote or an unresolvable base)
    /// 2. create the draft record
    /// 3. create the changeset and patch records, yielding an upload target
    /// 4. upload the contents
    ///
    /// Nothing is rolled back. If the upload fails the draft and changeset
    /// already exist remotely and `DraftsError::PartialDraft` names them.
    pub async fn create_draft_with(
        &self,
        repository: &dyn RepositoryReader,
        options: CreateDraftOptions,
    ) -> Result<Draft> {
        let context = resolve_repository_context(repository, &options.base_ref).await?;

        tracing::info!(
            "Creating draft for {} based on {}",
            repository.path().display(),
            context.base_commit_sha
        );

        let draft_response: DraftResponse = self
            .connection
            .post_data(
                "/v1/drafts",
                &CreateDraftRequest {
                    organization_id: options.organization_id.clone(),
                    is_public: options.is_public,
                },
            )
            .await?;
        let draft_id = draft_response.id.clone();

        let changeset_request = CreateChangesetRequest {
            parent_changeset_id: None,
            git_user_name: context.git_user_name(),
            git_user_email: context.git_user_email(),
            patches: vec![CreatePatchRequest {
                base_commit_sha: context.base_commit_sha.clone(),
                base_branch_name: context.branch_name.clone(),
                git_repo_data: context.git_repo_data(),
            }],
        };

        let changeset_response: ChangesetResponse<CreatedPatchResponse> = self
            .connection
            .post_data(&changesets_path(&draft_id), &changeset_request)
            .await?;

        let upload_target = changeset_response
            .patches
            .first()
            .map(|patch| patch.secure_upload_data.clone())
            .ok_or_else(|| {
                DraftsError::InvalidResponse(format!(
                    "Changeset {} was created without a patch",
                    changeset_response.id
                ))
            })?;

        if let Err(error) = self
            .upload_patch_contents(&upload_target, &options.contents)
            .await
        {
            tracing::warn!(
                "Draft {} left without contents, upload failed: {}",
                draft_id,
                error
            );
            return Err(DraftsError::PartialDraft {
                draft_id,
                changeset_id: changeset_response.id,
                source: Box::new(error),
            });
        }

        let contents = options.contents;
        let changeset = changeset_from_response(changeset_response, |patch, user_id| {
            Ok(created_patch_from_response(patch, user_id, &contents))
        })?;

        let mut draft = draft_from_response(draft_response)?;
        draft.changesets = Some(vec![changeset]);

        tracing::info!("Created draft {}", draft.id);
        Ok(draft)
    }

    /// Upload patch contents to a target issued by the API. Exposed so a
    /// caller holding a `PartialDraft` can retry just this step.
    pub async fn upload_patch_contents(&self, target: &SecureLink, contents: &str) -> Result<()> {
        self.transfer.upload(target, contents).await
    }

    /// Delete a draft remotely
    pub async fn delete_draft(&self, id: &str) -> Result<()> {
        self.connection.delete(&draft_path(id)).await?;
        tracing::info!("Deleted draft {}", id);
        Ok(())
    }
}
