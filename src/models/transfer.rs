//! Pre-signed transfer target models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Pre-signed upload or download location issued by the drafts API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecureLink {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,
}

impl SecureLink {
    /// First `Host` header value, or an empty string if none was issued
    pub fn host(&self) -> &str {
        self.headers
            .get("Host")
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}
