use once_cell::sync::Lazy;
use regex::Regex;

use super::leading_comment_block;

static SERVICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"service\s+(\w+)\s*\{").expect("service pattern"));
static PACKAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"package\s+([^;]+);").expect("package pattern"));

/// Service names declared in a proto file, in file order. Repeated
/// declarations are kept verbatim, duplicates included.
pub fn extract_grpc_services(content: &str) -> Vec<String> {
    SERVICE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// First `package <name>;` declaration, trimmed.
pub fn extract_grpc_package(content: &str) -> Option<String> {
    PACKAGE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Leading `//` or `/* */` comment block, joined with spaces.
pub fn extract_grpc_description(content: &str) -> Option<String> {
    leading_comment_block(
        content,
        |line| line.starts_with("//") || line.starts_with("/*"),
        strip_markers,
    )
}

fn strip_markers(line: &str) -> String {
    let stripped = line.strip_prefix("//").unwrap_or(line);
    let stripped = stripped.strip_prefix("/*").unwrap_or(stripped);
    let stripped = stripped.strip_suffix("*/").unwrap_or(stripped);
    stripped.trim().to_string()
}
