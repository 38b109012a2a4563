//! Genres

use async_trait::async_trait;
use serde_json::Value;

use super::catalog::Resource;
use crate::{
    error::{AppError, AppResult},
    models::{
        genre::{self, GenreView},
        Genre, GenreDraft,
    },
    repository::{RecordStore, Repository},
    validation::{Check, FieldRule, Kind, Predicate, Presence, Submission},
};

const GENRE_RULES: &[FieldRule] = &[FieldRule {
    field: "name",
    presence: Presence::Required("Genre name must be specified."),
    checks: &[Check {
        predicate: Predicate::Length { min: 3, max: 100 },
        message: "Genre name must contain between 3 and 100 characters.",
    }],
    escape: true,
    kind: Kind::Text,
}];

#[async_trait]
impl Resource for Genre {
    const LABEL: &'static str = "Genre";
    const KEY: &'static str = "genre";
    const LIST_URL: &'static str = "/catalog/genres";
    const NOT_FOUND: &'static str = "Genre not found";
    const SORT_KEY: Option<&'static str> = Some("name");
    const DELETE_FIELD: &'static str = "genreid";
    const RULES: &'static [FieldRule] = GENRE_RULES;

    fn store(repository: &Repository) -> &dyn RecordStore<Self> {
        repository.genres.as_ref()
    }

    fn url(&self) -> String {
        genre::url(self.id)
    }

    fn draft(form: &Submission) -> GenreDraft {
        GenreDraft {
            name: form.text("name"),
        }
    }

    async fn present(_repository: &Repository, records: &[Self]) -> AppResult<Vec<Value>> {
        records
            .iter()
            .map(|record| serde_json::to_value(GenreView::from(record)).map_err(AppError::from))
            .collect()
    }
}
