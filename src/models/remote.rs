//! Remote models and hosting provider detection

use serde::{Deserialize, Serialize};

/// Hosting provider recognized from a remote URL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RemoteProviderKind {
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "gitlab")]
    GitLab,
    #[serde(rename = "bitbucket")]
    Bitbucket,
    #[serde(rename = "azure-devops")]
    AzureDevOps,
}

impl std::fmt::Display for RemoteProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteProviderKind::GitHub => write!(f, "github"),
            RemoteProviderKind::GitLab => write!(f, "gitlab"),
            RemoteProviderKind::Bitbucket => write!(f, "bitbucket"),
            RemoteProviderKind::AzureDevOps => write!(f, "azure-devops"),
        }
    }
}

/// Provider metadata for a remote whose host was recognized
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProvider {
    pub kind: RemoteProviderKind,
    /// Domain the provider serves the repository from (e.g. "github.com")
    pub domain: String,
    /// Repository name without the ".git" suffix
    pub repo_name: String,
    /// Owning user, organization or namespace
    pub owner: Option<String>,
}

/// Remote repository information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remote {
    pub name: String,
    pub url: String,
    pub push_url: Option<String>,
    pub domain: String,
    pub path: String,
    pub provider: Option<RemoteProvider>,
}

impl Remote {
    /// Build a remote from its configured URL, detecting the hosting provider.
    /// Returns `None` if the URL has no recognizable host/path.
    pub fn parse(name: &str, url: &str, push_url: Option<&str>) -> Option<Self> {
        let (domain, path) = split_remote_url(url)?;
        let provider = detect_provider(&domain, &path);

        Some(Self {
            name: name.to_string(),
            url: url.to_string(),
            push_url: push_url.map(|u| u.to_string()),
            domain,
            path,
            provider,
        })
    }
}

/// Split a remote URL into `(domain, path)`, handling these forms:
/// https://host/owner/repo.git
/// https://user@host/owner/repo.git
/// ssh://git@host:22/owner/repo.git
/// git@host:owner/repo.git
pub fn split_remote_url(url: &str) -> Option<(String, String)> {
    let url = url.trim();

    if url.contains("://") {
        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        let path = clean_path(parsed.path());
        if path.is_empty() {
            return None;
        }
        return Some((host, path));
    }

    // scp-like syntax: [user@]host:path
    let (authority, path) = url.split_once(':')?;
    let host = authority
        .rsplit_once('@')
        .map(|(_, h)| h)
        .unwrap_or(authority);
    let path = clean_path(path);
    if host.is_empty() || path.is_empty() {
        return None;
    }

    Some((host.to_lowercase(), path))
}

fn clean_path(path: &str) -> String {
    path.trim_matches('/').trim_end_matches(".git").to_string()
}

/// Recognize the hosting provider from a remote's domain and path
pub fn detect_provider(domain: &str, path: &str) -> Option<RemoteProvider> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if domain == "github.com" || domain == "ssh.github.com" {
        return owner_and_name(RemoteProviderKind::GitHub, "github.com", &segments);
    }

    if domain == "bitbucket.org" {
        return owner_and_name(RemoteProviderKind::Bitbucket, domain, &segments);
    }

    // Azure DevOps URLs can be:
    // dev.azure.com/{org}/{project}/_git/{repo}
    // {org}.visualstudio.com/{project}/_git/{repo}
    // ssh.dev.azure.com:v3/{org}/{project}/{repo}
    if domain == "ssh.dev.azure.com" {
        if segments.len() >= 4 && segments[0] == "v3" {
            return Some(RemoteProvider {
                kind: RemoteProviderKind::AzureDevOps,
                domain: "dev.azure.com".to_string(),
                repo_name: segments[3].to_string(),
                owner: Some(segments[1].to_string()),
            });
        }
        return None;
    }

    if domain == "dev.azure.com" {
        if segments.len() >= 4 && segments[2] == "_git" {
            return Some(RemoteProvider {
                kind: RemoteProviderKind::AzureDevOps,
                domain: domain.to_string(),
                repo_name: segments[3].to_string(),
                owner: Some(segments[0].to_string()),
            });
        }
        return None;
    }

    if let Some(org) = domain.strip_suffix(".visualstudio.com") {
        if segments.len() >= 3 && segments[1] == "_git" {
            return Some(RemoteProvider {
                kind: RemoteProviderKind::AzureDevOps,
                domain: domain.to_string(),
                repo_name: segments[2].to_string(),
                owner: Some(org.to_string()),
            });
        }
        return None;
    }

    // gitlab.com or any self-hosted instance with "gitlab" in its host
    if domain.contains("gitlab") && segments.len() >= 2 {
        let (name, namespace) = segments.split_last()?;
        return Some(RemoteProvider {
            kind: RemoteProviderKind::GitLab,
            domain: domain.to_string(),
            repo_name: name.to_string(),
            owner: Some(namespace.join("/")),
        });
    }

    None
}

fn owner_and_name(
    kind: RemoteProviderKind,
    domain: &str,
    segments: &[&str],
) -> Option<RemoteProvider> {
    if segments.len() < 2 {
        return None;
    }

    Some(RemoteProvider {
        kind,
        domain: domain.to_string(),
        repo_name: segments[1].to_string(),
        owner: Some(segments[0].to_string()),
    })
}
