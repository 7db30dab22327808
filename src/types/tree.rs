use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// A node in a repository's documentation file tree. Paths are relative
/// to the repository root and joined with forward slashes.
///
/// Directories always carry a `children` list, files never do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl FileTreeNode {
    pub fn directory(name: String, path: String, children: Vec<FileTreeNode>) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::Directory,
            children: Some(children),
            size: None,
            modified: None,
        }
    }

    pub fn file(name: String, path: String, size: u64, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::File,
            children: None,
            size: Some(size),
            modified,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Options for building a file tree. Serialized into the tree cache key
/// so that requests with different settings never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    pub max_depth: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self { max_depth: 5 }
    }
}
