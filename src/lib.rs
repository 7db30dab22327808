pub mod config;
pub mod detector;
pub mod mime;
pub mod scanner;
pub mod server;
pub mod sniffer;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::ServerConfig;
pub use detector::{BranchEnsurer, GitBranchEnsurer, NoopBranchEnsurer, RepositoryApiDetector};
pub use scanner::build_file_tree;
pub use server::{router, ApiError, AppState};
pub use storage::{CacheConfig, CacheStats, ContentCache, FileContent, FileTree};
pub use types::{
    ApiInventory, BatchDetectionResponse, ButtonConfig, ButtonKind, DetectionSummary, FileTreeNode,
    GraphqlApi, GraphqlKind, GrpcApi, PostmanCollection, RepositoryApiReport, RestApi, TreeOptions,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
