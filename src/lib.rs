//! Cloud Drafts - shareable patch drafts for git repositories
//!
//! Creates drafts from a local diff (draft record, changeset, patch, then a
//! content upload to a pre-signed target) and reads them back as a typed
//! draft, changeset and patch graph.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

#[cfg(test)]
mod test_utils;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::DraftsConfig;
pub use error::{DraftsError, ErrorResponse, Result};
pub use services::{CreateDraftOptions, DraftService, GitRepository, PatchesOptions};

/// Install a global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Does nothing if the host already installed one.
pub fn init_tracing() {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloud_drafts=debug,git2=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Cloud drafts logging initialized");
    }
}
