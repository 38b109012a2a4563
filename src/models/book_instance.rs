//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{book::BookView, format_long_date, Entity, FieldValue};

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    /// Form and storage labels, in `ALL` order
    pub const LABELS: &'static [&'static str] = &["Available", "Maintenance", "Loaned", "Reserved"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl TryFrom<String> for BookInstanceStatus {
    type Error = String;

    fn try_from(v: String) -> Result<Self, Self::Error> {
        BookInstanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == v)
            .ok_or_else(|| format!("unknown book instance status: {}", v))
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: i32,
    /// Book ID
    pub book: i32,
    pub imprint: String,
    #[sqlx(try_from = "String")]
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstanceDraft {
    pub book: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// Book instance as handed to the renderer, with its book populated
#[derive(Debug, Serialize, ToSchema)]
pub struct BookInstanceView {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub url: String,
    pub due_back_formatted: String,
    /// Populated book, `None` when the reference is dangling
    #[serde(rename = "book_detail")]
    pub book: Option<BookView>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        url(self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        format_long_date(self.due_back)
    }
}

pub fn url(id: i32) -> String {
    format!("/catalog/bookinstance/{}", id)
}

impl Entity for BookInstance {
    type Draft = BookInstanceDraft;

    const COLLECTION: &'static str = "book_instances";
    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: BookInstanceDraft) -> Self {
        Self {
            id,
            book: draft.book,
            imprint: draft.imprint,
            status: draft.status,
            due_back: draft.due_back,
        }
    }

    fn to_draft(&self) -> BookInstanceDraft {
        BookInstanceDraft {
            book: self.book,
            imprint: self.imprint.clone(),
            status: self.status,
            due_back: self.due_back,
        }
    }

    fn draft_values(draft: &BookInstanceDraft) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("book", FieldValue::Int(draft.book)),
            ("imprint", FieldValue::Text(draft.imprint.clone())),
            ("status", FieldValue::Text(draft.status.as_str().to_string())),
            ("due_back", FieldValue::Date(draft.due_back)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_string() {
        assert_eq!(
            BookInstanceStatus::try_from("Loaned".to_string()),
            Ok(BookInstanceStatus::Loaned)
        );
        assert!(BookInstanceStatus::try_from("loaned".to_string()).is_err());
        assert_eq!(BookInstanceStatus::default(), BookInstanceStatus::Maintenance);
    }

    #[test]
    fn test_labels_match_statuses() {
        let labels: Vec<&str> = BookInstanceStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(labels, BookInstanceStatus::LABELS);
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_value(BookInstanceStatus::Reserved).unwrap();
        assert_eq!(json, "Reserved");
    }
}
