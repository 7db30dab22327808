use std::path::{Component, Path, PathBuf};

use axum::extract::{Path as PathParam, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::detector::{self, generate_button_config};
use crate::storage::FileContent;
use crate::types::{
    ApiExplorerEntry, ApiExplorerResponse, BatchDetectionResponse, ButtonConfig,
    RepositoryApiReport, TreeOptions,
};

use super::{ApiError, AppState};

const TREE_CACHE_CONTROL: &str = "public, max-age=300";
const FILE_CACHE_CONTROL: &str = "public, max-age=3600";
const FROM_CACHE_HEADER: &str = "X-Content-From-Cache";

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExplorerQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn detect_repository(
    State(state): State<AppState>,
    PathParam(repo_name): PathParam<String>,
) -> Result<Json<RepositoryApiReport>, ApiError> {
    let repo_path = resolve_repository(&state, &repo_name).await?;
    let report = state
        .detector
        .detect_repository_apis(&repo_path, &repo_name)
        .await
        .map_err(|e| ApiError::internal("Failed to detect APIs", e))?;
    Ok(Json(report))
}

/// Same report as detect-apis; kept as its own route for the
/// documentation hub, which addresses repositories by resource path.
pub async fn repository_apis(
    State(state): State<AppState>,
    PathParam(repo_name): PathParam<String>,
) -> Result<Json<RepositoryApiReport>, ApiError> {
    detect_repository(State(state), PathParam(repo_name)).await
}

pub async fn api_buttons(
    State(state): State<AppState>,
    PathParam(repo_name): PathParam<String>,
) -> Result<Json<ButtonConfig>, ApiError> {
    let repo_path = resolve_repository(&state, &repo_name).await?;
    let report = state
        .detector
        .detect_repository_apis(&repo_path, &repo_name)
        .await
        .map_err(|e| ApiError::internal("Failed to generate button config", e))?;
    Ok(Json(generate_button_config(&report)))
}

pub async fn detect_all(
    State(state): State<AppState>,
) -> Result<Json<BatchDetectionResponse>, ApiError> {
    let batch = state
        .detector
        .detect_all(&state.repos_dir)
        .await
        .map_err(|e| ApiError::internal("Failed to detect APIs", e))?;
    Ok(Json(batch))
}

/// Fleet-wide flattened API listing with an optional type filter.
pub async fn api_explorer(
    State(state): State<AppState>,
    Query(query): Query<ExplorerQuery>,
) -> Result<Json<ApiExplorerResponse>, ApiError> {
    let kind = query.kind;
    let repositories = detector::list_repositories(&state.repos_dir)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch APIs", e))?;

    let wants = |name: &str| kind.as_deref().is_none() || kind.as_deref() == Some(name);
    let mut apis = Vec::new();

    for repo_name in repositories {
        let repo_path = state.repos_dir.join(&repo_name);
        let report = match state
            .detector
            .detect_repository_apis(&repo_path, &repo_name)
            .await
        {
            Ok(report) => report,
            Err(e) => {
                warn!(repository = %repo_name, error = %e, "skipping repository in explorer");
                continue;
            }
        };

        if wants("rest") || wants("openapi") {
            for api in &report.apis.rest {
                apis.push(ApiExplorerEntry {
                    repository: repo_name.clone(),
                    kind: "OpenAPI".to_string(),
                    name: api.title.clone().unwrap_or_else(|| api.file.clone()),
                    path: api.file.clone(),
                    version: api.version.clone(),
                    description: None,
                    services: None,
                    package: None,
                });
            }
        }
        if wants("graphql") {
            for api in &report.apis.graphql {
                apis.push(ApiExplorerEntry {
                    repository: repo_name.clone(),
                    kind: "GraphQL".to_string(),
                    name: api.file.clone(),
                    path: api.file.clone(),
                    version: None,
                    description: api.description.clone(),
                    services: None,
                    package: None,
                });
            }
        }
        if wants("grpc") {
            for api in &report.apis.grpc {
                apis.push(ApiExplorerEntry {
                    repository: repo_name.clone(),
                    kind: "gRPC".to_string(),
                    name: api.file.clone(),
                    path: api.file.clone(),
                    version: None,
                    description: api.description.clone(),
                    services: Some(api.services.clone()),
                    package: api.package.clone(),
                });
            }
        }
        if wants("postman") {
            for collection in &report.postman {
                apis.push(ApiExplorerEntry {
                    repository: repo_name.clone(),
                    kind: "Postman".to_string(),
                    name: collection.name.clone(),
                    path: collection.file.clone(),
                    version: None,
                    description: Some(format!("Postman collection: {}", collection.name)),
                    services: None,
                    package: None,
                });
            }
        }
    }

    let total = apis.len();
    Ok(Json(ApiExplorerResponse {
        apis,
        total,
        filter: kind.unwrap_or_else(|| "all".to_string()),
    }))
}

pub async fn repository_files(
    State(state): State<AppState>,
    PathParam(repo_name): PathParam<String>,
) -> Result<Response, ApiError> {
    let repo_path = resolve_repository(&state, &repo_name).await?;
    let result = state.cache.get_file_tree(&repo_path, &TreeOptions::default()).await;

    Ok((
        [
            (header::CACHE_CONTROL.as_str(), TREE_CACHE_CONTROL),
            (FROM_CACHE_HEADER, bool_header(result.from_cache)),
        ],
        Json(result.tree),
    )
        .into_response())
}

pub async fn repository_file(
    State(state): State<AppState>,
    PathParam(repo_name): PathParam<String>,
    Query(query): Query<FileQuery>,
) -> Result<Response, ApiError> {
    let Some(file_path) = query.path else {
        return Err(ApiError::BadRequest("File path is required".to_string()));
    };

    let repo_base = normalize_path(&resolve_repository(&state, &repo_name).await?);
    let requested = normalize_path(&repo_base.join(&file_path));
    if !requested.starts_with(&repo_base) {
        return Err(ApiError::AccessDenied);
    }

    let file = state.cache.get_file_content(&requested).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::NotFound("File not found".to_string())
        } else {
            ApiError::internal("Failed to read file", e)
        }
    })?;

    let FileContent {
        content,
        mime_type,
        from_cache,
    } = file;
    Ok((
        [
            (header::CONTENT_TYPE.as_str(), mime_type.as_str()),
            (header::CACHE_CONTROL.as_str(), FILE_CACHE_CONTROL),
            (FROM_CACHE_HEADER, bool_header(from_cache)),
        ],
        content,
    )
        .into_response())
}

pub async fn cache_stats(State(state): State<AppState>) -> Response {
    Json(state.cache.get_cache_stats()).into_response()
}

pub async fn cache_clear(State(state): State<AppState>) -> Response {
    state.cache.clear_cache();
    Json(json!({ "message": "Cache cleared" })).into_response()
}

/// Validate a repository name and confirm its directory exists.
/// Names that could address anything outside the repos root are
/// rejected before touching the filesystem.
async fn resolve_repository(state: &AppState, repo_name: &str) -> Result<PathBuf, ApiError> {
    if repo_name.is_empty()
        || repo_name.starts_with('.')
        || repo_name.contains('/')
        || repo_name.contains('\\')
    {
        return Err(not_found(repo_name));
    }

    let repo_path = state.repos_dir.join(repo_name);
    match tokio::fs::metadata(&repo_path).await {
        Ok(metadata) if metadata.is_dir() => Ok(repo_path),
        _ => Err(not_found(repo_name)),
    }
}

fn not_found(repo_name: &str) -> ApiError {
    ApiError::NotFound(format!("Repository not found: {repo_name}"))
}

fn bool_header(from_cache: bool) -> &'static str {
    if from_cache {
        "true"
    } else {
        "false"
    }
}

/// Lexical path normalization: resolves `.` and `..` without touching
/// the filesystem, so the traversal check runs before any I/O.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
