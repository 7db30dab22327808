pub mod tree;
pub mod walk;

use std::io;
use std::path::Path;

pub use tree::build_file_tree;
pub use walk::find_files;

/// Read a file as text. Invalid UTF-8 sequences are replaced rather
/// than rejected, and a leading byte-order mark is stripped.
pub async fn read_lossy(path: &Path) -> io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(text.to_string())
}
