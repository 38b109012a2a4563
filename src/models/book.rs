//! Book model
//!
//! Books are read-only here: they are listed as an author's works and offered
//! as choices when recording a book copy.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Entity, FieldValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    /// Author ID
    pub author: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub summary: String,
    pub author: i32,
}

/// Book as handed to the renderer
#[derive(Debug, Serialize, ToSchema)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            url: book.url(),
            book: book.clone(),
        }
    }
}

impl Entity for Book {
    type Draft = BookDraft;

    const COLLECTION: &'static str = "books";
    const FIELDS: &'static [&'static str] = &["title", "summary", "author"];

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            summary: draft.summary,
            author: draft.author,
        }
    }

    fn to_draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            summary: self.summary.clone(),
            author: self.author,
        }
    }

    fn draft_values(draft: &BookDraft) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("title", FieldValue::Text(draft.title.clone())),
            ("summary", FieldValue::Text(draft.summary.clone())),
            ("author", FieldValue::Int(draft.author)),
        ]
    }
}
