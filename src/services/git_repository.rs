//! Read-only repository access needed to describe where a patch originates

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{DraftsError, Result};
use crate::models::{GitUser, LocalDraft, Remote, NO_HISTORY_SENTINEL};

/// The narrow set of source-control reads the drafts client depends on
#[async_trait]
pub trait RepositoryReader: Send + Sync {
    /// Working directory of the repository
    fn path(&self) -> &Path;

    /// The most suitable remote whose hosting provider is recognized
    async fn best_remote_with_provider(&self) -> Result<Option<Remote>>;

    /// Configured git identity, if any part of it is set
    async fn current_user(&self) -> Result<Option<GitUser>>;

    /// Name of the checked-out branch; `None` when HEAD is detached
    async fn current_branch(&self) -> Result<Option<String>>;

    /// Full SHA of the commit `reference` points at, if it resolves
    async fn resolve_commit(&self, reference: &str) -> Result<Option<String>>;

    /// Root commit SHA of HEAD's history, or the no-history sentinel
    async fn unique_repository_id(&self) -> Result<String>;
}

/// `RepositoryReader` backed by libgit2
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = git2::Repository::discover(path.as_ref())
            .map_err(|e| DraftsError::RepositoryNotFound(e.to_string()))?;
        let path = repo.workdir().unwrap_or(repo.path()).to_path_buf();
        Ok(Self { path })
    }

    /// Run a libgit2 operation on the blocking pool
    async fn with_repo<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&git2::Repository) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let repo = git2::Repository::open(&path)?;
            operation(&repo)
        })
        .await
        .map_err(|e| DraftsError::OperationFailed(format!("Repository task failed: {}", e)))?
    }

    /// Diff of the working tree (staged and unstaged changes) against
    /// `base_ref`, as a local draft ready to be submitted
    pub async fn local_draft(&self, base_ref: &str) -> Result<LocalDraft> {
        let base = base_ref.to_string();
        let contents = self
            .with_repo(move |repo| working_tree_patch(repo, &base))
            .await?;

        Ok(LocalDraft {
            repository_path: self.path.clone(),
            base_ref: base_ref.to_string(),
            contents,
        })
    }
}

#[async_trait]
impl RepositoryReader for GitRepository {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn best_remote_with_provider(&self) -> Result<Option<Remote>> {
        self.with_repo(best_remote_with_provider).await
    }

    async fn current_user(&self) -> Result<Option<GitUser>> {
        self.with_repo(|repo| {
            let config = repo.config()?;
            let name = config.get_string("user.name").ok().filter(|s| !s.is_empty());
            let email = config.get_string("user.email").ok().filter(|s| !s.is_empty());

            if name.is_none() && email.is_none() {
                return Ok(None);
            }
            Ok(Some(GitUser { name, email }))
        })
        .await
    }

    async fn current_branch(&self) -> Result<Option<String>> {
        self.with_repo(|repo| {
            // An unborn branch has no commit yet but HEAD still names it
            let head = repo.find_reference("HEAD")?;
            if let Some(target) = head.symbolic_target() {
                return Ok(target.strip_prefix("refs/heads/").map(|s| s.to_string()));
            }
            Ok(None)
        })
        .await
    }

    async fn resolve_commit(&self, reference: &str) -> Result<Option<String>> {
        let reference = reference.to_string();
        self.with_repo(move |repo| {
            let commit = repo
                .revparse_single(&reference)
                .and_then(|object| object.peel_to_commit());

            match commit {
                Ok(commit) => Ok(Some(commit.id().to_string())),
                Err(e) => {
                    tracing::debug!("Could not resolve {}: {}", reference, e);
                    Ok(None)
                }
            }
        })
        .await
    }

    async fn unique_repository_id(&self) -> Result<String> {
        self.with_repo(|repo| {
            let mut revwalk = repo.revwalk()?;
            if revwalk.push_head().is_err() {
                return Ok(NO_HISTORY_SENTINEL.to_string());
            }
            revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;

            for oid in revwalk {
                let commit = repo.find_commit(oid?)?;
                if commit.parent_count() == 0 {
                    return Ok(commit.id().to_string());
                }
            }

            Ok(NO_HISTORY_SENTINEL.to_string())
        })
        .await
    }
}

/// Remotes ranked: the current branch's upstream, then "origin", then
/// "upstream", then the rest by name. The first recognized one wins.
fn best_remote_with_provider(repo: &git2::Repository) -> Result<Option<Remote>> {
    let upstream = repo
        .head()
        .ok()
        .filter(|head| head.is_branch())
        .and_then(|head| head.name().map(|n| n.to_string()))
        .and_then(|name| repo.branch_upstream_remote(&name).ok())
        .and_then(|buf| buf.as_str().map(|s| s.to_string()));

    let mut names: Vec<String> = repo
        .remotes()?
        .iter()
        .flatten()
        .map(|name| name.to_string())
        .collect();

    let rank = |name: &str| {
        if Some(name) == upstream.as_deref() {
            0
        } else if name == "origin" {
            1
        } else if name == "upstream" {
            2
        } else {
            3
        }
    };
    names.sort_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));

    for name in names {
        let remote = match repo.find_remote(&name) {
            Ok(remote) => remote,
            Err(e) => {
                tracing::debug!("Skipping remote {}: {}", name, e);
                continue;
            }
        };

        let Some(url) = remote.url() else { continue };
        if let Some(parsed) = Remote::parse(&name, url, remote.pushurl()) {
            if parsed.provider.is_some() {
                return Ok(Some(parsed));
            }
        }
    }

    Ok(None)
}

fn working_tree_patch(repo: &git2::Repository, base_ref: &str) -> Result<String> {
    let commit = repo
        .revparse_single(base_ref)
        .and_then(|object| object.peel_to_commit())
        .map_err(|_| DraftsError::ReferenceResolution(base_ref.to_string()))?;
    let tree = commit.tree()?;

    let mut opts = git2::DiffOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .show_untracked_content(true);

    let diff = repo.diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts))?;

    let mut patch = String::new();
    diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            patch.push(origin);
        }
        // Every line must survive, or the hunk counts stop matching the body
        patch.push_str(&String::from_utf8_lossy(line.content()));
        true
    })?;

    Ok(patch)
}
