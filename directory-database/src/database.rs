//! Generic directory store trait and types.
use crate::resource::ResourceSpec;
use crate::types::{Comment, LikeAction, Page, PageRequest, ResourceKey};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Debug;
use thiserror::Error;

/// Type alias for directory store results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Abstract the document store API so it can be swapped out
/// for any backend.
#[async_trait]
pub trait DirectoryStore: Send + Sync + Debug {
    /// All documents of one family, with its fixed filter and sort applied.
    async fn list(&self, resource: &ResourceSpec) -> StoreResult<Vec<Value>>;
    /// Lookup one document by key.
    async fn find(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
    ) -> StoreResult<Option<Value>>;
    /// Insert a prepared document, returning the store-assigned key.
    async fn insert(
        &self,
        resource: &ResourceSpec,
        doc: Map<String, Value>,
    ) -> StoreResult<ResourceKey>;
    /// Overwrite the named fields of one document, leaving all others
    /// untouched.
    async fn update(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        fields: Map<String, Value>,
    ) -> StoreResult<UpdateReport>;
    /// Remove one document, reporting how many were deleted.
    async fn remove(&self, resource: &ResourceSpec, key: &ResourceKey) -> StoreResult<u64>;
    /// One window of a family, sorted by its fixed sort.
    async fn page(&self, resource: &ResourceSpec, request: PageRequest) -> StoreResult<Page>;
    /// Atomically adjust the like counter of a blog, returning the new
    /// value. `None` when the blog does not exist; an unlike never drops
    /// the counter below zero.
    async fn adjust_likes(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        action: LikeAction,
    ) -> StoreResult<Option<i64>>;
    /// Embedded comments of a blog, oldest first. `None` when the blog
    /// does not exist.
    async fn comments(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
    ) -> StoreResult<Option<Vec<Comment>>>;
    /// Atomically append a comment to a blog. `false` when the blog does
    /// not exist.
    async fn push_comment(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        comment: &Comment,
    ) -> StoreResult<bool>;
}

/// Counts reported back from a set-semantics update.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct UpdateReport {
    #[serde(rename = "matchedCount")]
    pub matched: u64,
    #[serde(rename = "modifiedCount")]
    pub modified: u64,
}

/// Directory store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Mongodb error: `{0}`")]
    MongoError(#[from] mongodb::error::Error),
    #[error("Bson encoding error: `{0}`")]
    BsonError(#[from] mongodb::bson::ser::Error),
    #[error("Store returned a non-ObjectId key: `{0}`")]
    UnexpectedKey(mongodb::bson::Bson),
    #[error("Store Test Failure")]
    TestError,
}
