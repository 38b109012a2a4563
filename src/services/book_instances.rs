//! Book instances (copies): validation rules, populated views and the book
//! choices offered on the form

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::catalog::Resource;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookView,
        book_instance::{self, BookInstanceView},
        Book, BookInstance, BookInstanceDraft, BookInstanceStatus,
    },
    repository::{Query, RecordStore, Repository},
    validation::{Check, FieldRule, Kind, Predicate, Presence, Submission},
};

const BOOK_INSTANCE_RULES: &[FieldRule] = &[
    FieldRule {
        field: "book",
        presence: Presence::Required("Book must be specified"),
        checks: &[Check {
            predicate: Predicate::Integer,
            message: "Book reference is not a valid identifier",
        }],
        escape: true,
        kind: Kind::Int,
    },
    FieldRule {
        field: "imprint",
        presence: Presence::Required("Imprint must be specified"),
        checks: &[],
        escape: true,
        kind: Kind::Text,
    },
    FieldRule {
        field: "status",
        presence: Presence::Optional,
        checks: &[Check {
            predicate: Predicate::OneOf(BookInstanceStatus::LABELS),
            message: "Invalid status",
        }],
        escape: true,
        kind: Kind::Text,
    },
    FieldRule {
        field: "due_back",
        presence: Presence::Optional,
        checks: &[Check {
            predicate: Predicate::IsoDate,
            message: "Invalid date",
        }],
        escape: false,
        kind: Kind::Date,
    },
];

/// Referenced books, keyed by id
async fn books_for(repository: &Repository, records: &[BookInstance]) -> AppResult<HashMap<i32, Book>> {
    let books = match records {
        [] => Vec::new(),
        [single] => repository.books.find_by_id(single.book).await?.into_iter().collect(),
        _ => repository.books.find(&Query::all()).await?,
    };
    Ok(books.into_iter().map(|book| (book.id, book)).collect())
}

#[async_trait]
impl Resource for BookInstance {
    const LABEL: &'static str = "BookInstance";
    const KEY: &'static str = "bookinstance";
    const LIST_URL: &'static str = "/catalog/bookinstances";
    const NOT_FOUND: &'static str = "Book copy not found";
    const DELETE_FIELD: &'static str = "id";
    const RULES: &'static [FieldRule] = BOOK_INSTANCE_RULES;

    fn store(repository: &Repository) -> &dyn RecordStore<Self> {
        repository.book_instances.as_ref()
    }

    fn url(&self) -> String {
        book_instance::url(self.id)
    }

    fn draft(form: &Submission) -> BookInstanceDraft {
        BookInstanceDraft {
            book: form.int("book").unwrap_or_default(),
            imprint: form.text("imprint"),
            status: BookInstanceStatus::try_from(form.text("status")).unwrap_or_default(),
            due_back: form.date("due_back"),
        }
    }

    /// Each copy carries its book, like a populated reference
    async fn present(repository: &Repository, records: &[Self]) -> AppResult<Vec<Value>> {
        let books = books_for(repository, records).await?;
        records
            .iter()
            .map(|record| {
                let view = BookInstanceView {
                    url: record.url(),
                    due_back_formatted: record.due_back_formatted(),
                    book: books.get(&record.book).map(BookView::from),
                    instance: record.clone(),
                };
                serde_json::to_value(view).map_err(AppError::from)
            })
            .collect()
    }

    async fn form_context(repository: &Repository) -> AppResult<Map<String, Value>> {
        let books = repository
            .books
            .find(&Query::all().sort_by("title"))
            .await?;
        let book_list: Vec<BookView> = books.iter().map(BookView::from).collect();

        let mut context = Map::new();
        context.insert("book_list".to_string(), serde_json::to_value(book_list)?);
        context.insert(
            "status_list".to_string(),
            serde_json::to_value(BookInstanceStatus::LABELS)?,
        );
        Ok(context)
    }
}
