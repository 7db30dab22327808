use serde::{Deserialize, Serialize};
use std::fmt;

/// A REST/OpenAPI specification file and the fields sniffed out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestApi {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphqlKind {
    Schema,
    Query,
    Mutation,
    Subscription,
    Example,
}

impl fmt::Display for GraphqlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GraphqlKind::Schema => "schema",
            GraphqlKind::Query => "query",
            GraphqlKind::Mutation => "mutation",
            GraphqlKind::Subscription => "subscription",
            GraphqlKind::Example => "example",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlApi {
    pub file: String,
    #[serde(rename = "type")]
    pub kind: GraphqlKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A protobuf file with its service declarations in file order.
/// Repeated declarations of the same service name are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrpcApi {
    pub file: String,
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub file: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInventory {
    pub rest: Vec<RestApi>,
    pub graphql: Vec<GraphqlApi>,
    pub grpc: Vec<GrpcApi>,
}

impl ApiInventory {
    pub fn total(&self) -> usize {
        self.rest.len() + self.graphql.len() + self.grpc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    Swagger,
    Graphql,
    Grpc,
    Postman,
}

/// Everything detected in one repository. `has_any_apis` reflects the
/// rest/graphql/grpc inventory; Postman collections alone do not count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryApiReport {
    pub repository: String,
    pub apis: ApiInventory,
    pub postman: Vec<PostmanCollection>,
    pub has_any_apis: bool,
    pub recommended_buttons: Vec<ButtonKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RepositoryApiReport {
    /// Placeholder entry for a repository whose detection failed
    /// outright. Batch detection folds these into its results instead
    /// of aborting.
    pub fn failed(repository: String, error: String) -> Self {
        Self {
            repository,
            apis: ApiInventory::default(),
            postman: Vec::new(),
            has_any_apis: false,
            recommended_buttons: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiButton {
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCountSummary {
    pub rest: usize,
    pub graphql: usize,
    pub grpc: usize,
    pub total: usize,
}

/// Display metadata derived from a report. Pure projection, no I/O.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonConfig {
    pub repository: String,
    pub has_apis: bool,
    pub buttons: Vec<ApiButton>,
    pub summary: ApiCountSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSummary {
    pub total_repositories: usize,
    pub total_rest_apis: usize,
    pub total_graphql_schemas: usize,
    pub total_grpc_services: usize,
    pub repositories_with_apis: usize,
    pub api_coverage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDetectionResponse {
    pub repositories: Vec<RepositoryApiReport>,
    pub summary: DetectionSummary,
}

/// One row in the fleet-wide API explorer listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiExplorerEntry {
    pub repository: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiExplorerResponse {
    pub apis: Vec<ApiExplorerEntry>,
    pub total: usize,
    pub filter: String,
}
