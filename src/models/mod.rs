//! Data models for cloud drafts

pub mod draft;
pub mod remote;
pub mod repository;
pub mod transfer;

pub use draft::*;
pub use remote::*;
pub use repository::*;
pub use transfer::*;
