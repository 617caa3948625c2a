//! Draft service: creating drafts and reading them back
//!
//! Creation is a strictly ordered protocol (draft record, then changeset and
//! patch records, then the content upload); reads rebuild the
//! draft → changeset → patch graph from independently shaped responses.

mod create;
#[cfg(test)]
mod fixtures;
mod read;
mod wire;

use crate::config::DraftsConfig;
use crate::error::Result;

use super::connection::{encode_id, ApiConnection};
use super::secure_transfer::SecureTransferClient;

pub use create::CreateDraftOptions;
pub use read::PatchesOptions;

/// Client for the drafts API
#[derive(Clone)]
pub struct DraftService {
    connection: ApiConnection,
    transfer: SecureTransferClient,
}

impl DraftService {
    /// Create a service from configuration
    pub fn new(config: &DraftsConfig) -> Result<Self> {
        Ok(Self::from_connection(ApiConnection::new(config)?))
    }

    /// Create a service over an existing connection; secure transfers share
    /// its HTTP client and timeout
    pub fn from_connection(connection: ApiConnection) -> Self {
        let transfer = SecureTransferClient::new(connection.client().clone());
        Self {
            connection,
            transfer,
        }
    }
}

fn draft_path(id: &str) -> String {
    format!("/v1/drafts/{}", encode_id(id))
}

fn changesets_path(draft_id: &str) -> String {
    format!("/v1/drafts/{}/changesets", encode_id(draft_id))
}

fn draft_patches_path(draft_id: &str) -> String {
    format!("/v1/drafts/{}/patches", encode_id(draft_id))
}

fn patch_path(id: &str) -> String {
    format!("/v1/patches/{}", encode_id(id))
}
