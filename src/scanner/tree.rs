use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::fs;
use tracing::{debug, warn};

use crate::types::{FileTreeNode, TreeOptions};

/// Directories that never contain documentation worth listing.
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", "coverage", "__pycache__"];

/// Extensions included as documentation leaves.
const DOC_EXTENSIONS: &[&str] = &["md", "mdx", "txt", "rst", "adoc"];

/// Extensionless canonical names included as documentation leaves,
/// compared against the uppercased file name.
const DOC_BASENAMES: &[&str] = &[
    "README",
    "LICENSE",
    "CHANGELOG",
    "CONTRIBUTING",
    "AUTHORS",
    "NOTICE",
];

/// Build the documentation file tree rooted at `dir`.
///
/// Sibling entries are processed concurrently; the explicit sort
/// afterwards makes the result independent of completion order. An
/// unreadable directory yields an empty subtree instead of an error.
pub async fn build_file_tree(dir: &Path, options: &TreeOptions) -> Vec<FileTreeNode> {
    build_subtree(dir.to_path_buf(), String::new(), options.max_depth, 0).await
}

fn build_subtree(
    dir: PathBuf,
    base_path: String,
    max_depth: usize,
    current_depth: usize,
) -> Pin<Box<dyn Future<Output = Vec<FileTreeNode>> + Send>> {
    Box::pin(async move {
        if current_depth >= max_depth {
            return Vec::new();
        }

        let mut reader = match fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "could not read directory, skipping subtree");
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        loop {
            match reader.next_entry().await {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "directory listing interrupted");
                    break;
                }
            }
        }

        let tasks = entries.into_iter().map(|entry| {
            let base_path = base_path.clone();
            async move { process_entry(entry, base_path, max_depth, current_depth).await }
        });

        let mut items: Vec<FileTreeNode> = join_all(tasks).await.into_iter().flatten().collect();
        sort_nodes(&mut items);
        items
    })
}

async fn process_entry(
    entry: fs::DirEntry,
    base_path: String,
    max_depth: usize,
    current_depth: usize,
) -> Option<FileTreeNode> {
    let name = entry.file_name().to_string_lossy().into_owned();

    if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_str()) {
        return None;
    }

    let relative_path = if base_path.is_empty() {
        name.clone()
    } else {
        format!("{base_path}/{name}")
    };

    let file_type = match entry.file_type().await {
        Ok(ft) => ft,
        Err(e) => {
            debug!(path = %entry.path().display(), error = %e, "could not stat entry, skipping");
            return None;
        }
    };

    if file_type.is_dir() {
        let children =
            build_subtree(entry.path(), relative_path.clone(), max_depth, current_depth + 1).await;
        return Some(FileTreeNode::directory(name, relative_path, children));
    }

    if !is_documentation_file(&name) {
        return None;
    }

    match entry.metadata().await {
        Ok(metadata) => {
            let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
            Some(FileTreeNode::file(
                name,
                relative_path,
                metadata.len(),
                modified,
            ))
        }
        Err(e) => {
            debug!(path = %entry.path().display(), error = %e, "could not stat file, skipping");
            None
        }
    }
}

fn is_documentation_file(name: &str) -> bool {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    if let Some(ext) = extension {
        if DOC_EXTENSIONS.contains(&ext.as_str()) {
            return true;
        }
    }
    DOC_BASENAMES.contains(&name.to_uppercase().as_str())
}

/// Directories before files, then case-insensitive by name.
fn sort_nodes(items: &mut [FileTreeNode]) {
    items.sort_by(|a, b| {
        b.is_directory()
            .cmp(&a.is_directory())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;
    use tempfile::TempDir;

    async fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, content).await.unwrap();
    }

    #[tokio::test]
    async fn filters_noise_directories_and_hidden_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, ".git/config", "noise").await;
        write(root, "node_modules/pkg/README.md", "noise").await;
        write(root, ".hidden.md", "noise").await;
        write(root, "README.md", "# hello").await;

        let tree = build_file_tree(root, &TreeOptions::default()).await;

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "README.md");
        assert_eq!(tree[0].kind, NodeKind::File);
        assert!(tree[0].children.is_none());
        assert!(tree[0].size.is_some());
    }

    #[tokio::test]
    async fn includes_canonical_names_and_doc_extensions() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "LICENSE", "MIT").await;
        write(root, "notes.rst", "notes").await;
        write(root, "guide.adoc", "guide").await;
        write(root, "main.rs", "fn main() {}").await;
        write(root, "image.png", "binary").await;

        let tree = build_file_tree(root, &TreeOptions::default()).await;

        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["guide.adoc", "LICENSE", "notes.rst"]);
    }

    #[tokio::test]
    async fn directories_sort_before_files_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "zeta/README.md", "z").await;
        write(root, "Alpha/README.md", "a").await;
        write(root, "aardvark.md", "file").await;
        write(root, "Beta.md", "file").await;

        let tree = build_file_tree(root, &TreeOptions::default()).await;

        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "zeta", "aardvark.md", "Beta.md"]);
    }

    #[tokio::test]
    async fn directories_always_have_children_even_when_empty() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("empty")).await.unwrap();

        let tree = build_file_tree(root, &TreeOptions::default()).await;

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].kind, NodeKind::Directory);
        assert!(tree[0].children.as_ref().is_some_and(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn depth_limit_prunes_deep_subtrees() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "a/b/c/deep.md", "deep").await;

        let tree = build_file_tree(root, &TreeOptions { max_depth: 2 }).await;

        // depth 0 lists "a", depth 1 lists "b", recursion stops there
        let a = &tree[0];
        let b = &a.children.as_ref().unwrap()[0];
        assert_eq!(b.name, "b");
        assert!(b.children.as_ref().is_some_and(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn relative_paths_are_forward_slash_joined() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "docs/guide/intro.md", "intro").await;

        let tree = build_file_tree(root, &TreeOptions::default()).await;

        let docs = &tree[0];
        let guide = &docs.children.as_ref().unwrap()[0];
        let intro = &guide.children.as_ref().unwrap()[0];
        assert_eq!(intro.path, "docs/guide/intro.md");
    }

    #[tokio::test]
    async fn missing_root_yields_empty_tree() {
        let tree = build_file_tree(Path::new("/nonexistent/apiscout-test"), &TreeOptions::default())
            .await;
        assert!(tree.is_empty());
    }
}
