use crate::types::GraphqlKind;

use super::leading_comment_block;

/// Classify a GraphQL file from its name and content. Schema cues win,
/// then operation cues, then example naming; anything else defaults to
/// a schema.
pub fn determine_graphql_type(file: &str, content: &str) -> GraphqlKind {
    let file_name = file.to_lowercase();
    let content_lower = content.to_lowercase();

    if file_name.contains("schema")
        || content_lower.contains("type query")
        || content_lower.contains("type mutation")
    {
        GraphqlKind::Schema
    } else if file_name.contains("query") || content_lower.contains("query {") {
        GraphqlKind::Query
    } else if file_name.contains("mutation") || content_lower.contains("mutation {") {
        GraphqlKind::Mutation
    } else if file_name.contains("subscription") || content_lower.contains("subscription {") {
        GraphqlKind::Subscription
    } else if file_name.contains("example") || file_name.contains("sample") {
        GraphqlKind::Example
    } else {
        GraphqlKind::Schema
    }
}

/// Leading `#` or `"""` comment block, joined with spaces.
pub fn extract_graphql_description(content: &str) -> Option<String> {
    leading_comment_block(
        content,
        |line| line.starts_with('#') || line.starts_with("\"\"\""),
        strip_markers,
    )
}

fn strip_markers(line: &str) -> String {
    let stripped = line.trim_start_matches('#');
    let stripped = stripped.strip_prefix("\"\"\"").unwrap_or(stripped);
    let stripped = stripped.strip_suffix("\"\"\"").unwrap_or(stripped);
    stripped.trim().to_string()
}
