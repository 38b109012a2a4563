//! Repository layer: record stores, one per collection

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookInstance, Entity, FieldValue, Genre},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Equality filters and an optional ascending sort key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(&'static str, FieldValue)>,
    pub sort: Option<&'static str>,
}

impl Query {
    /// Every record of the collection, unsorted
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &'static str, value: FieldValue) -> Self {
        self.filters.push((field, value));
        self
    }

    pub fn sort_by(mut self, field: &'static str) -> Self {
        self.sort = Some(field);
        self
    }
}

/// Reject field names the collection does not declare
pub(crate) fn check_field<E: Entity>(name: &str) -> AppResult<()> {
    if E::has_field(name) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Unknown field '{}' for {}",
            name,
            E::COLLECTION
        )))
    }
}

/// Generic document collection holding one entity type
#[async_trait]
pub trait RecordStore<E: Entity>: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<E>>;

    async fn find(&self, query: &Query) -> AppResult<Vec<E>>;

    async fn insert(&self, draft: &E::Draft) -> AppResult<E>;

    /// Replace the mutable fields of record `id`; false when no record matched
    async fn update_by_id(&self, id: i32, draft: &E::Draft) -> AppResult<bool>;

    /// Remove record `id`; false when no record matched
    async fn delete_by_id(&self, id: i32) -> AppResult<bool>;
}

/// Record stores for every collection of the catalog
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn RecordStore<Author>>,
    pub books: Arc<dyn RecordStore<Book>>,
    pub genres: Arc<dyn RecordStore<Genre>>,
    pub book_instances: Arc<dyn RecordStore<BookInstance>>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(PgStore::new(pool.clone())),
            books: Arc::new(PgStore::new(pool.clone())),
            genres: Arc::new(PgStore::new(pool.clone())),
            book_instances: Arc::new(PgStore::new(pool)),
        }
    }

    /// Create a repository holding everything in process memory
    pub fn in_memory() -> Self {
        Self {
            authors: Arc::new(MemoryStore::new()),
            books: Arc::new(MemoryStore::new()),
            genres: Arc::new(MemoryStore::new()),
            book_instances: Arc::new(MemoryStore::new()),
        }
    }
}
