//! In-process record store

use std::{cmp::Ordering, collections::BTreeMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{check_field, Query, RecordStore};
use crate::{
    error::{AppError, AppResult},
    models::Entity,
};

struct Collection<E> {
    records: BTreeMap<i32, E>,
    /// None once the identifier space is used up
    next_id: Option<i32>,
}

pub struct MemoryStore<E> {
    inner: RwLock<Collection<E>>,
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seed the store; new ids continue after the highest seeded one
    pub fn with_records(records: Vec<E>) -> Self {
        let records: BTreeMap<i32, E> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = records.keys().next_back().map_or(Some(1), |id| id.checked_add(1));
        Self {
            inner: RwLock::new(Collection { records, next_id }),
        }
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> RecordStore<E> for MemoryStore<E> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<E>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn find(&self, query: &Query) -> AppResult<Vec<E>> {
        for (field, _) in &query.filters {
            check_field::<E>(field)?;
        }
        if let Some(field) = query.sort {
            check_field::<E>(field)?;
        }

        let collection = self.inner.read().await;
        let mut found: Vec<E> = collection
            .records
            .values()
            .filter(|record| {
                query
                    .filters
                    .iter()
                    .all(|(field, value)| record.field(field).as_ref() == Some(value))
            })
            .cloned()
            .collect();

        // Stable sort keeps id order between equal keys
        if let Some(field) = query.sort {
            found.sort_by(|a, b| {
                a.field(field)
                    .partial_cmp(&b.field(field))
                    .unwrap_or(Ordering::Equal)
            });
        }

        Ok(found)
    }

    async fn insert(&self, draft: &E::Draft) -> AppResult<E> {
        let mut collection = self.inner.write().await;
        let id = collection.next_id.ok_or_else(|| {
            AppError::Internal(format!("No identifiers left in {}", E::COLLECTION))
        })?;
        collection.next_id = id.checked_add(1);
        let record = E::from_draft(id, draft.clone());
        collection.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update_by_id(&self, id: i32, draft: &E::Draft) -> AppResult<bool> {
        let mut collection = self.inner.write().await;
        match collection.records.get_mut(&id) {
            Some(record) => {
                *record = E::from_draft(id, draft.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        Ok(self.inner.write().await.records.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookDraft, FieldValue};

    fn book(id: i32, title: &str, author: i32) -> Book {
        Book {
            id,
            title: title.to_string(),
            summary: String::new(),
            author,
        }
    }

    #[tokio::test]
    async fn test_insert_continues_after_seeded_ids() {
        let store = MemoryStore::with_records(vec![book(41, "Emma", 1)]);
        let draft = BookDraft {
            title: "Persuasion".to_string(),
            summary: String::new(),
            author: 1,
        };
        let created = store.insert(&draft).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(store.find_by_id(42).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_find_filters_and_sorts() {
        let store = MemoryStore::with_records(vec![
            book(1, "Persuasion", 1),
            book(2, "Dracula", 2),
            book(3, "Emma", 1),
        ]);

        let query = Query::all()
            .filter("author", FieldValue::Int(1))
            .sort_by("title");
        let titles: Vec<String> = store
            .find(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Emma", "Persuasion"]);
    }

    #[tokio::test]
    async fn test_find_rejects_unknown_field() {
        let store: MemoryStore<Book> = MemoryStore::new();
        let result = store.find(&Query::all().sort_by("rating")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete_report_missing_records() {
        let store = MemoryStore::with_records(vec![book(5, "Emma", 1)]);
        let draft = BookDraft {
            title: "Emma (revised)".to_string(),
            summary: String::new(),
            author: 1,
        };

        assert!(store.update_by_id(5, &draft).await.unwrap());
        assert!(!store.update_by_id(6, &draft).await.unwrap());
        assert_eq!(store.find_by_id(5).await.unwrap().unwrap().title, "Emma (revised)");

        assert!(store.delete_by_id(5).await.unwrap());
        assert!(!store.delete_by_id(5).await.unwrap());
        assert_eq!(store.find_by_id(5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_fails_when_ids_are_exhausted() {
        let store = MemoryStore::with_records(vec![book(i32::MAX, "Emma", 1)]);
        let draft = BookDraft {
            title: "Persuasion".to_string(),
            summary: String::new(),
            author: 1,
        };

        let result = store.insert(&draft).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(store.find(&Query::all()).await.unwrap().len(), 1);
    }
}
