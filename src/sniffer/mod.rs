//! Heuristic text classifiers for API specification files.
//!
//! These are sniffers, not parsers: they work on substring and regex
//! patterns over raw file text, tolerate malformed input, and return
//! best-effort partial data. Absence of a match yields `None` or an
//! empty list, never an error.

pub mod graphql;
pub mod grpc;
pub mod openapi;

pub use graphql::{determine_graphql_type, extract_graphql_description};
pub use grpc::{extract_grpc_description, extract_grpc_package, extract_grpc_services};
pub use openapi::{is_openapi_spec, parse_openapi_info};

/// Collect the leading comment block of a file: consecutive comment
/// lines from the top, stopping at the first substantive line. Blank
/// lines inside the block are allowed. Marker stripping is left to the
/// caller-supplied function.
fn leading_comment_block(
    content: &str,
    is_comment: impl Fn(&str) -> bool,
    strip: impl Fn(&str) -> String,
) -> Option<String> {
    let mut lines = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if is_comment(trimmed) {
            lines.push(strip(trimmed));
        } else if !trimmed.is_empty() {
            break;
        }
    }

    let joined = lines.join(" ").trim().to_string();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
