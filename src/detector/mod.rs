pub mod branch;
pub mod buttons;
pub mod summary;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::scanner::{self, walk};
use crate::sniffer;
use crate::types::{
    ApiInventory, BatchDetectionResponse, DetectError, GraphqlApi, GrpcApi, PostmanCollection,
    RepositoryApiReport, RestApi,
};

pub use branch::{BranchEnsurer, GitBranchEnsurer, NoopBranchEnsurer};
pub use buttons::{determine_recommended_buttons, generate_button_config};
pub use summary::generate_summary;

const REST_PATTERNS: &[&str] = &[".yaml", ".yml", ".json"];
const GRAPHQL_PATTERNS: &[&str] = &[".graphql", ".gql"];
const GRPC_PATTERNS: &[&str] = &[".proto"];

/// Detects API specification artifacts across a repository tree.
///
/// One instance serves the whole process. Each detection call walks
/// the repository fresh; nothing is cached between calls.
pub struct RepositoryApiDetector {
    branch_ensurer: Arc<dyn BranchEnsurer>,
    branch_overrides: HashMap<String, String>,
}

impl RepositoryApiDetector {
    pub fn new(
        branch_ensurer: Arc<dyn BranchEnsurer>,
        branch_overrides: HashMap<String, String>,
    ) -> Self {
        Self {
            branch_ensurer,
            branch_overrides,
        }
    }

    /// Run all four artifact scans over one repository and aggregate
    /// the result. The scans share no state and are awaited jointly.
    pub async fn detect_repository_apis(
        &self,
        repo_path: &Path,
        repo_name: &str,
    ) -> Result<RepositoryApiReport, DetectError> {
        if let Some(required_branch) = self.branch_overrides.get(repo_name) {
            if let Err(e) = self
                .branch_ensurer
                .ensure_branch(repo_path, required_branch)
                .await
            {
                warn!(
                    repository = repo_name,
                    branch = %required_branch,
                    error = %e,
                    "could not switch branch, detecting on current checkout"
                );
            }
        }

        let (rest, graphql, grpc, postman) = tokio::try_join!(
            detect_rest_apis(repo_path),
            detect_graphql_apis(repo_path),
            detect_grpc_apis(repo_path),
            detect_postman_collections(repo_path),
        )?;

        let has_any_apis = !rest.is_empty() || !graphql.is_empty() || !grpc.is_empty();
        let recommended_buttons = determine_recommended_buttons(&rest, &graphql, &grpc);

        Ok(RepositoryApiReport {
            repository: repo_name.to_string(),
            apis: ApiInventory {
                rest,
                graphql,
                grpc,
            },
            postman,
            has_any_apis,
            recommended_buttons,
            error: None,
        })
    }

    /// Detect across every repository under `repos_root`. A repository
    /// whose detection fails outright becomes an error entry; the batch
    /// itself only fails when the root cannot be listed.
    pub async fn detect_all(
        &self,
        repos_root: &Path,
    ) -> Result<BatchDetectionResponse, DetectError> {
        let repositories = list_repositories(repos_root).await?;

        let mut results = Vec::with_capacity(repositories.len());
        for name in repositories {
            let repo_path = repos_root.join(&name);
            results.push(self.detect_or_fold(&repo_path, name).await);
        }

        let summary = generate_summary(&results);
        Ok(BatchDetectionResponse {
            repositories: results,
            summary,
        })
    }

    /// Detection that never fails: a repository-level error becomes an
    /// error entry in the report instead.
    async fn detect_or_fold(&self, repo_path: &Path, name: String) -> RepositoryApiReport {
        match self.detect_repository_apis(repo_path, &name).await {
            Ok(report) => report,
            Err(e) => {
                warn!(repository = %name, error = %e, "detection failed");
                RepositoryApiReport::failed(name, e.to_string())
            }
        }
    }
}

/// Direct subdirectories of the repos root, hidden entries skipped, in
/// directory-listing order.
pub async fn list_repositories(repos_root: &Path) -> Result<Vec<String>, DetectError> {
    let mut reader = tokio::fs::read_dir(repos_root)
        .await
        .map_err(|e| DetectError::Scan {
            path: repos_root.to_path_buf(),
            source: e,
        })?;

    let mut names = Vec::new();
    loop {
        let entry = match reader.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                return Err(DetectError::Scan {
                    path: repos_root.to_path_buf(),
                    source: e,
                })
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type().await.map(|ft| ft.is_dir()).unwrap_or(false) {
            names.push(name);
        }
    }
    Ok(names)
}

/// YAML/JSON candidates that actually look like OpenAPI documents.
/// Files that match by extension but not by content are excluded.
async fn detect_rest_apis(repo_path: &Path) -> Result<Vec<RestApi>, DetectError> {
    let candidates = find_candidates(repo_path, REST_PATTERNS).await?;

    let mut apis = Vec::new();
    for file in candidates {
        let Some(content) = read_candidate(repo_path, &file).await else {
            continue;
        };
        if sniffer::is_openapi_spec(&content) {
            apis.push(sniffer::parse_openapi_info(&content, &file));
        }
    }
    Ok(apis)
}

/// Every readable `.graphql`/`.gql` file becomes an artifact.
async fn detect_graphql_apis(repo_path: &Path) -> Result<Vec<GraphqlApi>, DetectError> {
    let candidates = find_candidates(repo_path, GRAPHQL_PATTERNS).await?;

    let mut apis = Vec::new();
    for file in candidates {
        let Some(content) = read_candidate(repo_path, &file).await else {
            continue;
        };
        apis.push(GraphqlApi {
            kind: sniffer::determine_graphql_type(&file, &content),
            description: sniffer::extract_graphql_description(&content),
            file,
        });
    }
    Ok(apis)
}

/// Every readable `.proto` file becomes an artifact.
async fn detect_grpc_apis(repo_path: &Path) -> Result<Vec<GrpcApi>, DetectError> {
    let candidates = find_candidates(repo_path, GRPC_PATTERNS).await?;

    let mut apis = Vec::new();
    for file in candidates {
        let Some(content) = read_candidate(repo_path, &file).await else {
            continue;
        };
        apis.push(GrpcApi {
            services: sniffer::extract_grpc_services(&content),
            package: sniffer::extract_grpc_package(&content),
            description: sniffer::extract_grpc_description(&content),
            file,
        });
    }
    Ok(apis)
}

/// JSON files named after Postman that also have the collection shape
/// (`info` and `item` top-level keys). Anything else is discarded.
async fn detect_postman_collections(
    repo_path: &Path,
) -> Result<Vec<PostmanCollection>, DetectError> {
    let candidates = find_candidates(repo_path, &[".json"]).await?;

    let mut collections = Vec::new();
    for file in candidates {
        let file_name = file.rsplit('/').next().unwrap_or(&file).to_lowercase();
        if !(file_name.contains("postman") && file_name.ends_with(".json")) {
            continue;
        }

        let Some(content) = read_candidate(repo_path, &file).await else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&content) else {
            debug!(file = %file, "not valid JSON, skipping");
            continue;
        };
        let (Some(info), Some(_items)) = (value.get("info"), value.get("item")) else {
            continue;
        };

        collections.push(PostmanCollection {
            file,
            name: info
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("Postman Collection")
                .to_string(),
            description: info
                .get("description")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            version: info
                .get("version")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        });
    }
    Ok(collections)
}

async fn find_candidates(repo_path: &Path, patterns: &[&str]) -> Result<Vec<String>, DetectError> {
    walk::find_files(repo_path, patterns)
        .await
        .map_err(|e| DetectError::Scan {
            path: repo_path.to_path_buf(),
            source: e,
        })
}

/// Read one candidate file; unreadable files are skipped, never fatal.
async fn read_candidate(repo_path: &Path, relative: &str) -> Option<String> {
    match scanner::read_lossy(&repo_path.join(relative)).await {
        Ok(content) => Some(content),
        Err(e) => {
            debug!(file = %relative, error = %e, "skipping unreadable candidate");
            None
        }
    }
}
