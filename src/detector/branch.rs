use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::types::BranchError;

/// Puts a repository checkout on a required branch before detection.
///
/// The detector holds this as a trait object; the concrete
/// implementation shells out to git, test doubles record or fail.
#[async_trait]
pub trait BranchEnsurer: Send + Sync {
    async fn ensure_branch(&self, repo_path: &Path, branch: &str) -> Result<(), BranchError>;
}

/// Shells out to `git`, asynchronously, to check and switch branches.
pub struct GitBranchEnsurer;

#[async_trait]
impl BranchEnsurer for GitBranchEnsurer {
    async fn ensure_branch(&self, repo_path: &Path, branch: &str) -> Result<(), BranchError> {
        let output = Command::new("git")
            .args(["branch", "--show-current"])
            .current_dir(repo_path)
            .output()
            .await?;
        if !output.status.success() {
            return Err(BranchError::Git {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let current = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if current == branch {
            return Ok(());
        }

        info!(repo = %repo_path.display(), from = %current, to = %branch, "switching branch");
        let output = Command::new("git")
            .args(["checkout", branch])
            .current_dir(repo_path)
            .output()
            .await?;
        if !output.status.success() {
            return Err(BranchError::Git {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Does nothing. Useful where no branch pinning is configured and in
/// tests.
pub struct NoopBranchEnsurer;

#[async_trait]
impl BranchEnsurer for NoopBranchEnsurer {
    async fn ensure_branch(&self, _repo_path: &Path, _branch: &str) -> Result<(), BranchError> {
        Ok(())
    }
}
