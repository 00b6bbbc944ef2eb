//! A mocked directory store test api.
use async_trait::async_trait;
use directory_database::{
    database::{DirectoryStore, StoreResult, UpdateReport},
    resource::ResourceSpec,
    types::{Comment, LikeAction, Page, PageRequest, ResourceKey},
};
use serde_json::{Map, Value};
use std::{cmp::Ordering, collections::HashMap, sync::RwLock};

type Stored = Vec<(ResourceKey, Map<String, Value>)>;

/// In-memory directory store backed by per-collection vectors. Honors
/// the same fixed-filter, fixed-sort and counter semantics as the
/// mongodb implementation.
#[derive(Debug, Default)]
pub struct TestDirectory {
    collections: RwLock<HashMap<String, Stored>>,
}

impl TestDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert documents directly, bypassing payload shaping.
    #[allow(dead_code)]
    pub fn seed(
        &self,
        spec: &ResourceSpec,
        docs: impl IntoIterator<Item = Map<String, Value>>,
    ) -> Vec<ResourceKey> {
        let mut guard = self.collections.write().unwrap();
        let collection = guard.entry(spec.collection.to_owned()).or_default();

        docs.into_iter()
            .map(|doc| {
                let key = ResourceKey::generate();
                collection.push((key, doc));
                key
            })
            .collect()
    }
}

fn render(key: &ResourceKey, doc: &Map<String, Value>) -> Value {
    let mut doc = doc.clone();
    doc.insert("_id".to_owned(), Value::String(key.to_string()));
    Value::Object(doc)
}

fn compare(a: &Map<String, Value>, b: &Map<String, Value>, sort: &[(&str, i8)]) -> Ordering {
    for (field, direction) in sort {
        let ordering = match (a.get(*field), b.get(*field)) {
            (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
            (Some(Value::Number(x)), Some(Value::Number(y))) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        };
        let ordering = if *direction < 0 {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl DirectoryStore for TestDirectory {
    async fn list(&self, resource: &ResourceSpec) -> StoreResult<Vec<Value>> {
        let guard = self.collections.read().unwrap();
        let mut docs = guard.get(resource.collection).cloned().unwrap_or_default();

        if let Some((field, value)) = resource.list_filter {
            docs.retain(|(_, doc)| doc.get(field).and_then(Value::as_str) == Some(value));
        }
        docs.sort_by(|(_, a), (_, b)| compare(a, b, resource.sort));

        Ok(docs.iter().map(|(key, doc)| render(key, doc)).collect())
    }

    async fn find(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
    ) -> StoreResult<Option<Value>> {
        let guard = self.collections.read().unwrap();

        Ok(guard
            .get(resource.collection)
            .and_then(|docs| docs.iter().find(|(stored, _)| stored == key))
            .map(|(key, doc)| render(key, doc)))
    }

    async fn insert(
        &self,
        resource: &ResourceSpec,
        doc: Map<String, Value>,
    ) -> StoreResult<ResourceKey> {
        let mut guard = self.collections.write().unwrap();
        let key = ResourceKey::generate();
        guard
            .entry(resource.collection.to_owned())
            .or_default()
            .push((key, doc));
        Ok(key)
    }

    async fn update(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        fields: Map<String, Value>,
    ) -> StoreResult<UpdateReport> {
        let mut guard = self.collections.write().unwrap();

        let found = guard
            .get_mut(resource.collection)
            .and_then(|docs| docs.iter_mut().find(|(stored, _)| stored == key));

        Ok(match found {
            Some((_, doc)) => {
                for (field, value) in fields {
                    doc.insert(field, value);
                }
                UpdateReport {
                    matched: 1,
                    modified: 1,
                }
            }
            None => UpdateReport {
                matched: 0,
                modified: 0,
            },
        })
    }

    async fn remove(&self, resource: &ResourceSpec, key: &ResourceKey) -> StoreResult<u64> {
        let mut guard = self.collections.write().unwrap();

        Ok(match guard.get_mut(resource.collection) {
            Some(docs) => {
                let before = docs.len();
                docs.retain(|(stored, _)| stored != key);
                (before - docs.len()) as u64
            }
            None => 0,
        })
    }

    async fn page(&self, resource: &ResourceSpec, request: PageRequest) -> StoreResult<Page> {
        let guard = self.collections.read().unwrap();
        let mut docs = guard.get(resource.collection).cloned().unwrap_or_default();
        docs.sort_by(|(_, a), (_, b)| compare(a, b, resource.sort));

        let total = docs.len() as u64;
        let items = docs
            .iter()
            .skip(request.skip() as usize)
            .take(request.limit as usize)
            .map(|(key, doc)| render(key, doc))
            .collect();

        Ok(Page::new(total, request, items))
    }

    async fn adjust_likes(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        action: LikeAction,
    ) -> StoreResult<Option<i64>> {
        let mut guard = self.collections.write().unwrap();

        let found = guard
            .get_mut(resource.collection)
            .and_then(|docs| docs.iter_mut().find(|(stored, _)| stored == key));

        Ok(found.map(|(_, doc)| {
            let likes = doc.get("likes").and_then(Value::as_i64).unwrap_or(0);
            let likes = match action {
                LikeAction::Like => likes + 1,
                LikeAction::Unlike => (likes - 1).max(0),
            };
            doc.insert("likes".to_owned(), Value::from(likes));
            likes
        }))
    }

    async fn comments(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
    ) -> StoreResult<Option<Vec<Comment>>> {
        let guard = self.collections.read().unwrap();

        let found = guard
            .get(resource.collection)
            .and_then(|docs| docs.iter().find(|(stored, _)| stored == key));

        Ok(found.map(|(_, doc)| {
            doc.get("comments")
                .cloned()
                .map(|comments| serde_json::from_value(comments).unwrap_or_default())
                .unwrap_or_default()
        }))
    }

    async fn push_comment(
        &self,
        resource: &ResourceSpec,
        key: &ResourceKey,
        comment: &Comment,
    ) -> StoreResult<bool> {
        let mut guard = self.collections.write().unwrap();

        let found = guard
            .get_mut(resource.collection)
            .and_then(|docs| docs.iter_mut().find(|(stored, _)| stored == key));

        Ok(match found {
            Some((_, doc)) => {
                doc.entry("comments")
                    .or_insert_with(|| Value::Array(Vec::new()))
                    .as_array_mut()
                    .expect("comments is an array")
                    .push(serde_json::to_value(comment).unwrap());
                true
            }
            None => false,
        })
    }
}
