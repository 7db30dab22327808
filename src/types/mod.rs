pub mod error;
pub mod report;
pub mod tree;

pub use error::{BranchError, CacheError, DetectError};
pub use report::{
    ApiButton, ApiCountSummary, ApiExplorerEntry, ApiExplorerResponse, ApiInventory,
    BatchDetectionResponse, ButtonConfig, ButtonKind, DetectionSummary, GraphqlApi, GraphqlKind,
    GrpcApi, PostmanCollection, RepositoryApiReport, RestApi,
};
pub use tree::{FileTreeNode, NodeKind, TreeOptions};
