pub mod error;
pub mod models;
pub mod storage;
pub mod types;
pub mod web;

pub use error::{Error, Result};
pub use models::{CompletionModel, CompletionRequest};
pub use storage::ContentStore;
pub use types::{
    ArticleId, PublishedMetadata, ReferenceSet, ReferenceText, RewriteResult, SourceArticle,
};
pub use web::{PageFetcher, SearchHit, SearchProvider};
