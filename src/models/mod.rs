//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

// Re-export commonly used types
pub use author::{Author, AuthorDraft};
pub use book::{Book, BookDraft};
pub use book_instance::{BookInstance, BookInstanceDraft, BookInstanceStatus};
pub use genre::{Genre, GenreDraft};

/// Scalar value of a stored field, used for filters, sorting and writes
#[derive(Debug, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i32),
    Text(String),
    Date(Option<NaiveDate>),
}

/// A record kept in one collection of the record store.
///
/// Mutable fields live in the associated `Draft`; the identifier is owned by
/// the store and never appears in a draft.
pub trait Entity: Clone + Send + Sync + Unpin + Serialize + 'static {
    type Draft: Clone + Send + Sync + Serialize + 'static;

    /// Collection (table) name
    const COLLECTION: &'static str;

    /// Names of the mutable fields, in column order
    const FIELDS: &'static [&'static str];

    fn id(&self) -> i32;

    fn from_draft(id: i32, draft: Self::Draft) -> Self;

    fn to_draft(&self) -> Self::Draft;

    /// Field/value pairs of a draft, in `FIELDS` order
    fn draft_values(draft: &Self::Draft) -> Vec<(&'static str, FieldValue)>;

    /// Look up a field by name, `id` included
    fn field(&self, name: &str) -> Option<FieldValue> {
        if name == "id" {
            return Some(FieldValue::Int(self.id()));
        }
        Self::draft_values(&self.to_draft())
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Whether `name` is a queryable field of this collection
    fn has_field(name: &str) -> bool {
        name == "id" || Self::FIELDS.contains(&name)
    }
}

/// Long human-readable date, e.g. "January 1st, 2020"
pub fn format_long_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!(
            "{} {}{}, {}",
            date.format("%B"),
            date.day(),
            ordinal_suffix(date.day()),
            date.year()
        ),
        None => String::new(),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
