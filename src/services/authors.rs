//! Authors: validation rules, presentation and the books that depend on them

use async_trait::async_trait;
use serde_json::Value;

use super::catalog::Resource;
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{self, AuthorView},
        Author, AuthorDraft, Book, FieldValue,
    },
    repository::{Query, RecordStore, Repository},
    validation::{Check, FieldRule, Kind, Predicate, Presence, Submission},
};

const AUTHOR_RULES: &[FieldRule] = &[
    FieldRule {
        field: "first_name",
        presence: Presence::Required("First name must be specified."),
        checks: &[
            Check {
                predicate: Predicate::Length { min: 0, max: 100 },
                message: "First name must not exceed 100 characters.",
            },
            Check {
                predicate: Predicate::Alphanumeric,
                message: "First name has non-alphanumeric characters.",
            },
        ],
        escape: true,
        kind: Kind::Text,
    },
    FieldRule {
        field: "family_name",
        presence: Presence::Required("Family name must be specified."),
        checks: &[
            Check {
                predicate: Predicate::Length { min: 0, max: 100 },
                message: "Family name must not exceed 100 characters.",
            },
            Check {
                predicate: Predicate::Alphanumeric,
                message: "Family name has non-alphanumeric characters.",
            },
        ],
        escape: true,
        kind: Kind::Text,
    },
    FieldRule {
        field: "date_of_birth",
        presence: Presence::Optional,
        checks: &[Check {
            predicate: Predicate::IsoDate,
            message: "Invalid date of birth",
        }],
        escape: false,
        kind: Kind::Date,
    },
    FieldRule {
        field: "date_of_death",
        presence: Presence::Optional,
        checks: &[Check {
            predicate: Predicate::IsoDate,
            message: "Invalid date of death",
        }],
        escape: false,
        kind: Kind::Date,
    },
];

#[async_trait]
impl Resource for Author {
    const LABEL: &'static str = "Author";
    const KEY: &'static str = "author";
    const LIST_URL: &'static str = "/catalog/authors";
    const NOT_FOUND: &'static str = "Author not found";
    const SORT_KEY: Option<&'static str> = Some("family_name");
    const DELETE_FIELD: &'static str = "authorid";
    const DEPENDENTS_KEY: Option<&'static str> = Some("author_books");
    const RULES: &'static [FieldRule] = AUTHOR_RULES;

    fn store(repository: &Repository) -> &dyn RecordStore<Self> {
        repository.authors.as_ref()
    }

    fn url(&self) -> String {
        author::url(self.id)
    }

    fn draft(form: &Submission) -> AuthorDraft {
        AuthorDraft {
            first_name: form.text("first_name"),
            family_name: form.text("family_name"),
            date_of_birth: form.date("date_of_birth"),
            date_of_death: form.date("date_of_death"),
        }
    }

    async fn present(_repository: &Repository, records: &[Self]) -> AppResult<Vec<Value>> {
        records
            .iter()
            .map(|record| serde_json::to_value(AuthorView::from(record)).map_err(AppError::from))
            .collect()
    }

    async fn dependents(repository: &Repository, id: i32) -> AppResult<Vec<Book>> {
        let query = Query::all()
            .filter("author", FieldValue::Int(id))
            .sort_by("title");
        repository.books.find(&query).await
    }
}
