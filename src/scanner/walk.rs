use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Flat, recursive candidate-file enumeration for API detection.
///
/// Returns repository-relative paths (forward-slash joined) whose file
/// name matches any of the given substring patterns. Hidden entries and
/// `node_modules` are skipped. Failing to read the root directory is an
/// error; unreadable nested directories are skipped.
pub async fn find_files(root: &Path, patterns: &[&str]) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    let mut queue: VecDeque<(PathBuf, String)> = VecDeque::new();
    queue.push_back((root.to_path_buf(), String::new()));
    let mut at_root = true;

    while let Some((dir, prefix)) = queue.pop_front() {
        let mut reader = match tokio::fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(e) if at_root => return Err(e),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        at_root = false;

        loop {
            let entry = match reader.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "directory listing interrupted");
                    break;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name == "node_modules" {
                continue;
            }

            let relative = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };

            match entry.file_type().await {
                Ok(ft) if ft.is_dir() => queue.push_back((entry.path(), relative)),
                Ok(ft) if ft.is_file() => {
                    if patterns.iter().any(|p| name.contains(p)) {
                        files.push(relative);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                }
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.unwrap();
        }
        tokio::fs::write(path, "x").await.unwrap();
    }

    #[tokio::test]
    async fn matches_by_extension_substring() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "api.yaml").await;
        write(tmp.path(), "nested/openapi.yml").await;
        write(tmp.path(), "config.toml").await;

        let mut found = find_files(tmp.path(), &[".yaml", ".yml"]).await.unwrap();
        found.sort();
        assert_eq!(found, vec!["api.yaml", "nested/openapi.yml"]);
    }

    #[tokio::test]
    async fn skips_hidden_and_node_modules() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".hidden/secret.yaml").await;
        write(tmp.path(), "node_modules/pkg/spec.yaml").await;
        write(tmp.path(), "real.yaml").await;

        let found = find_files(tmp.path(), &[".yaml"]).await.unwrap();
        assert_eq!(found, vec!["real.yaml"]);
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let result = find_files(Path::new("/nonexistent/apiscout-walk"), &[".yaml"]).await;
        assert!(result.is_err());
    }
}
