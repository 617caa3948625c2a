//! Reading drafts, changesets and patches back from the API

use crate::error::{DraftsError, Result};
use crate::models::{Draft, DraftChangeset, DraftPatch};
use crate::services::settle::{settle_all, settled_value};

use super::wire::{
    changeset_from_response, draft_from_response, patch_from_response, ChangesetResponse,
    DraftResponse, PatchResponse,
};
use super::{changesets_path, draft_path, draft_patches_path, patch_path, DraftService};

/// Options for listing the patches of a draft
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchesOptions {
    /// Download each patch's contents as well
    pub include_contents: bool,
}

impl DraftService {
    /// List drafts visible to the current user. Changesets are not fetched.
    pub async fn get_drafts(&self) -> Result<Vec<Draft>> {
        let responses: Vec<DraftResponse> = self.connection.get_data("/v1/drafts").await?;

        let drafts = responses
            .into_iter()
            .filter_map(|response| settled_value(draft_from_response(response), "read draft"))
            .collect::<Vec<_>>();

        tracing::debug!("Fetched {} drafts", drafts.len());
        Ok(drafts)
    }

    /// Fetch a draft together with its changesets
    pub async fn get_draft(&self, id: &str) -> Result<Draft> {
        let response: DraftResponse = self.connection.get_data(&draft_path(id)).await?;
        let mut draft = draft_from_response(response)?;
        draft.changesets = Some(self.get_changesets(&draft.id).await?);
        Ok(draft)
    }

    /// Fetch the changesets of a draft. Patch contents are not downloaded;
    /// each patch keeps the repository data and download link the server
    /// returned for it.
    pub async fn get_changesets(&self, draft_id: &str) -> Result<Vec<DraftChangeset>> {
        let responses: Vec<ChangesetResponse<PatchResponse>> =
            self.connection.get_data(&changesets_path(draft_id)).await?;

        responses
            .into_iter()
            .map(|response| {
                changeset_from_response(response, |patch, user_id| {
                    patch_from_response(patch, Some(user_id))
                })
            })
            .collect()
    }

    /// List every patch of a draft.
    ///
    /// With `include_contents`, all downloads run concurrently. A patch
    /// whose download fails is still returned, with `contents: None`; a
    /// patch record that cannot be read is left out. Both are logged.
    pub async fn get_patches(
        &self,
        draft_id: &str,
        options: PatchesOptions,
    ) -> Result<Vec<DraftPatch>> {
        let responses: Vec<PatchResponse> =
            self.connection.get_data(&draft_patches_path(draft_id)).await?;

        let settled = settle_all(responses.into_iter().map(|response| async move {
            let mut patch = patch_from_response(response, None)?;
            if options.include_contents {
                if let Err(error) = self.download_contents(&mut patch).await {
                    tracing::warn!(
                        "Failed to download contents of patch {}: {}",
                        patch.id,
                        error
                    );
                }
            }
            Ok(patch)
        }))
        .await;

        Ok(settled.into_values_logged("read patch"))
    }

    /// Fetch a single patch with its contents. A failed download is an error.
    pub async fn get_patch(&self, id: &str) -> Result<DraftPatch> {
        let response: PatchResponse = self.connection.get_data(&patch_path(id)).await?;
        let mut patch = patch_from_response(response, None)?;
        self.download_contents(&mut patch).await?;
        Ok(patch)
    }

    /// Fetch just the contents of a patch
    pub async fn get_patch_contents(&self, id: &str) -> Result<String> {
        self.get_patch(id)
            .await?
            .contents
            .ok_or_else(|| DraftsError::InvalidResponse(format!("Patch {} has no contents", id)))
    }

    /// Fetch the draft's changesets unless they are already present
    pub async fn ensure_changesets<'a>(&self, draft: &'a mut Draft) -> Result<&'a [DraftChangeset]> {
        if draft.changesets.is_none() {
            draft.changesets = Some(self.get_changesets(&draft.id).await?);
        }
        Ok(draft.changesets.as_deref().unwrap_or_default())
    }

    /// Resolve a patch's contents unless already present. Uses the stored
    /// download link, or fetches the patch record again when there is none.
    pub async fn ensure_patch_contents<'a>(&self, patch: &'a mut DraftPatch) -> Result<&'a str> {
        if patch.contents.is_none() {
            if patch.download.is_some() {
                self.download_contents(patch).await?;
            } else {
                let fetched = self.get_patch(&patch.id).await?;
                patch.download = fetched.download;
                patch.contents = fetched.contents;
            }
        }
        Ok(patch.contents.as_deref().unwrap_or_default())
    }

    async fn download_contents(&self, patch: &mut DraftPatch) -> Result<()> {
        let target = patch.download.as_ref().ok_or_else(|| {
            DraftsError::InvalidResponse(format!("Patch {} has no download link", patch.id))
        })?;
        patch.contents = Some(self.transfer.download(target).await?);
        Ok(())
    }
}
