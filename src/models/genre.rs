//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Entity, FieldValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreDraft {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

impl Genre {
    pub fn url(&self) -> String {
        url(self.id)
    }
}

pub fn url(id: i32) -> String {
    format!("/catalog/genre/{}", id)
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            url: genre.url(),
            genre: genre.clone(),
        }
    }
}

impl Entity for Genre {
    type Draft = GenreDraft;

    const COLLECTION: &'static str = "genres";
    const FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: GenreDraft) -> Self {
        Self {
            id,
            name: draft.name,
        }
    }

    fn to_draft(&self) -> GenreDraft {
        GenreDraft {
            name: self.name.clone(),
        }
    }

    fn draft_values(draft: &GenreDraft) -> Vec<(&'static str, FieldValue)> {
        vec![("name", FieldValue::Text(draft.name.clone()))]
    }
}
