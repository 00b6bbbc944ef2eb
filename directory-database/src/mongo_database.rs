//! This module provides data access to the mongodb directory collections.
use crate::{
    database::{DirectoryStore, StoreError, StoreResult, UpdateReport},
    init_mongo_client,
    resource::ResourceSpec,
    types::{Comment, LikeAction, Page, PageRequest, ResourceKey},
    MongoArgs,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, from_bson, to_document, Bson, Document},
    options::ReturnDocument,
    results::InsertOneResult,
    Collection, Database,
};
use serde_json::{Map, Value};
use std::ops::Deref;
use tracing::debug;

/// An implementation of DirectoryStore for MongoDB.
#[derive(Debug, Clone)]
pub struct MongoDirectory(Database);

impl Deref for MongoDirectory {
    type Target = Database;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoDirectory {
    /// Creates a new MongoDirectory API.
    pub async fn new(options: MongoArgs) -> StoreResult<Self> {
        let db = init_mongo_client(options).await?;
        Ok(Self(db))
    }

    /// Get the backing collection of a resource family.
    fn documents(&self, resource: &ResourceSpec) -> Collection<Document> {
        self.collection::<Document>(resource.collection)
    }
}

#[async_trait]
impl DirectoryStore for MongoDirectory {
    async fn list(&self, resource: &ResourceSpec) -> StoreResult<Vec<Value>> {
        let mut filter = Document::new();
        if let Some((field, value)) = resource.list_filter {
            filter.insert(field, value);
        }

        let collection = self.documents(resource);
        let mut query = collection.find(filter);
        if !resource.sort.is_empty() {
            query = query.sort(sort_document(resource.sort));
        }

        let docs = query.await?.try_collect::<Vec<Document>>().await?;

        Ok(docs.into_iter().map(json_document).collect())
    }

    async fn find(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
    ) -> StoreResult<Option<Value>> {
        let found = self
            .documents(resource)
            .find_one(doc! {"_id": key.as_object_id()})
            .await?;

        Ok(found.map(json_document))
    }

    async fn insert(
        &self,
        resource: &ResourceSpec,
        doc: Map<String, Value>,
    ) -> StoreResult<ResourceKey> {
        let document = to_document(&doc)?;

        let InsertOneResult { inserted_id, .. } =
            self.documents(resource).insert_one(document).await?;

        match inserted_id {
            Bson::ObjectId(key) => Ok(ResourceKey::from(key)),
            other => Err(StoreError::UnexpectedKey(other)),
        }
    }

    async fn update(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        fields: Map<String, Value>,
    ) -> StoreResult<UpdateReport> {
        let query = doc! {"_id": key.as_object_id()};
        let update = doc! {"$set": to_document(&fields)?};

        let updated = self.documents(resource).update_one(query, update).await?;

        debug!("update result: {updated:?}");

        Ok(UpdateReport {
            matched: updated.matched_count,
            modified: updated.modified_count,
        })
    }

    async fn remove(&self, resource: &ResourceSpec, key: &ResourceKey) -> StoreResult<u64> {
        let result = self
            .documents(resource)
            .delete_one(doc! {"_id": key.as_object_id()})
            .await?;

        debug!("delete result: {result:?}");

        Ok(result.deleted_count)
    }

    async fn page(&self, resource: &ResourceSpec, request: PageRequest) -> StoreResult<Page> {
        let total = self.documents(resource).count_documents(doc! {}).await?;

        let docs = self
            .documents(resource)
            .find(doc! {})
            .sort(sort_document(resource.sort))
            .skip(request.skip())
            .limit(request.limit as i64)
            .await?
            .try_collect::<Vec<Document>>()
            .await?;

        Ok(Page::new(
            total,
            request,
            docs.into_iter().map(json_document).collect(),
        ))
    }

    async fn adjust_likes(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        action: LikeAction,
    ) -> StoreResult<Option<i64>> {
        let blogs = self.documents(resource);

        // The decrement is conditional on a positive counter so it can
        // never go negative, and both directions are single atomic
        // commands so concurrent reactions are never lost.
        let (filter, delta) = match action {
            LikeAction::Like => (doc! {"_id": key.as_object_id()}, 1),
            LikeAction::Unlike => (doc! {"_id": key.as_object_id(), "likes": {"$gt": 0}}, -1),
        };

        let updated = blogs
            .find_one_and_update(filter, doc! {"$inc": {"likes": delta}})
            .return_document(ReturnDocument::After)
            .await?;

        if let Some(doc) = updated {
            return Ok(Some(likes_of(&doc)));
        }

        // An unlike at zero matches nothing; report the current counter
        // if the blog itself exists.
        let current = blogs.find_one(doc! {"_id": key.as_object_id()}).await?;

        Ok(current.map(|doc| likes_of(&doc)))
    }

    async fn comments(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
    ) -> StoreResult<Option<Vec<Comment>>> {
        let blog = self
            .documents(resource)
            .find_one(doc! {"_id": key.as_object_id()})
            .projection(doc! {"comments": 1})
            .await?;

        Ok(blog.map(|doc| {
            doc.get_array("comments")
                .map(|items| {
                    items
                        .iter()
                        .cloned()
                        .filter_map(|item| from_bson::<Comment>(item).ok())
                        .collect()
                })
                .unwrap_or_default()
        }))
    }

    async fn push_comment(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        comment: &Comment,
    ) -> StoreResult<bool> {
        let updated = self
            .documents(resource)
            .update_one(
                doc! {"_id": key.as_object_id()},
                doc! {"$push": {"comments": to_document(comment)?}},
            )
            .await?;

        Ok(updated.matched_count > 0)
    }
}

fn sort_document(sort: &[(&str, i8)]) -> Document {
    sort.iter()
        .map(|(field, direction)| ((*field).to_owned(), Bson::Int32(i32::from(*direction))))
        .collect()
}

fn likes_of(doc: &Document) -> i64 {
    match doc.get("likes") {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(n)) => *n as i64,
        _ => 0,
    }
}

/// Bring a stored document into its JSON wire shape. The store's native
/// key and timestamp types map to plain strings.
fn json_document(document: Document) -> Value {
    json_value(Bson::Document(document))
}

fn json_value(bson: Bson) -> Value {
    match bson {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(at) => Value::String(at.try_to_rfc3339_string().unwrap_or_default()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(field, value)| (field, json_value(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(json_value).collect()),
        other => other.into_relaxed_extjson(),
    }
}
