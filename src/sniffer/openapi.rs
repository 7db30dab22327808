use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::RestApi;

static TITLE_YAML: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)title:\s*["']?([^"'\n]+)["']?"#).expect("title pattern"));
static TITLE_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"title":\s*"([^"]+)""#).expect("title pattern"));
static VERSION_YAML: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)version:\s*["']?([^"'\n]+)["']?"#).expect("version pattern"));
static VERSION_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"version":\s*"([^"]+)""#).expect("version pattern"));

/// Does this text look like an OpenAPI/Swagger document? Substring
/// test over the lowercased content; matches YAML and JSON forms
/// without parsing either.
pub fn is_openapi_spec(content: &str) -> bool {
    let lower = content.to_lowercase();
    lower.contains("openapi:")
        || lower.contains("swagger:")
        || lower.contains("\"openapi\"")
        || lower.contains("\"swagger\"")
        || (lower.contains("paths:") && lower.contains("info:"))
        || (lower.contains("\"paths\"") && lower.contains("\"info\""))
}

/// Best-effort extraction of the spec's title and version. Missing
/// fields are simply omitted.
pub fn parse_openapi_info(content: &str, file: &str) -> RestApi {
    RestApi {
        file: file.to_string(),
        title: capture_first(&TITLE_YAML, &TITLE_JSON, content),
        version: capture_first(&VERSION_YAML, &VERSION_JSON, content),
    }
}

fn capture_first(yaml: &Regex, json: &Regex, content: &str) -> Option<String> {
    yaml.captures(content)
        .or_else(|| json.captures(content))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_yaml_openapi_marker() {
        assert!(is_openapi_spec("openapi: 3.0.0\ninfo:\n  title: X"));
        assert!(is_openapi_spec("swagger: \"2.0\""));
    }

    #[test]
    fn detects_json_openapi_marker() {
        assert!(is_openapi_spec(r#"{"openapi": "3.1.0"}"#));
        assert!(is_openapi_spec(r#"{"swagger": "2.0"}"#));
    }

    #[test]
    fn detects_paths_plus_info_combination() {
        assert!(is_openapi_spec("info:\n  title: X\npaths:\n  /x: {}"));
        assert!(is_openapi_spec(r#"{"info": {}, "paths": {}}"#));
    }

    #[test]
    fn rejects_unrelated_config_files() {
        assert!(!is_openapi_spec("database: postgres\nport: 5432"));
        assert!(!is_openapi_spec(r#"{"name": "pkg", "dependencies": {}}"#));
        assert!(!is_openapi_spec(""));
    }

    #[test]
    fn extracts_title_and_version_from_yaml() {
        let content = "openapi: 3.0.0\ninfo:\n  title: Fleet API\n  version: 2.1.0\n";
        let api = parse_openapi_info(content, "api.yaml");
        assert_eq!(api.file, "api.yaml");
        assert_eq!(api.title.as_deref(), Some("Fleet API"));
        assert_eq!(api.version.as_deref(), Some("2.1.0"));
    }

    #[test]
    fn extracts_quoted_yaml_values() {
        let content = "info:\n  title: \"Quoted API\"\n  version: '1.0'\n";
        let api = parse_openapi_info(content, "api.yml");
        assert_eq!(api.title.as_deref(), Some("Quoted API"));
        assert_eq!(api.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn extracts_fields_from_json() {
        let content = r#"{"openapi": "3.0.0", "info": {"title": "Json API", "version": "0.9"}}"#;
        let api = parse_openapi_info(content, "api.json");
        assert_eq!(api.title.as_deref(), Some("Json API"));
        assert_eq!(api.version.as_deref(), Some("0.9"));
    }

    #[test]
    fn missing_fields_are_omitted() {
        let api = parse_openapi_info("openapi: 3.0.0", "bare.yaml");
        assert_eq!(api.title, None);
        assert_eq!(api.version, None);
    }
}
