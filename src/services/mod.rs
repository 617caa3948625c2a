//! Service layer
//!
//! The API connection and secure transfers talk to the network, the
//! repository reader talks to git; the draft service composes them.

pub mod connection;
pub mod drafts;
pub mod git_repository;
pub mod repository_context;
pub mod secure_transfer;
pub mod settle;

pub use connection::ApiConnection;
pub use drafts::{CreateDraftOptions, DraftService, PatchesOptions};
pub use git_repository::{GitRepository, RepositoryReader};
pub use repository_context::{resolve_repository_context, RepositoryContext};
pub use secure_transfer::SecureTransferClient;
pub use settle::{settle_all, settled_value, Settled};
