//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{format_long_date, Entity, FieldValue};

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Mutable author fields, built from a validated form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDraft {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author as handed to the renderer, with computed presentation values
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    /// "family, first"
    pub name: String,
    pub url: String,
    pub lifespan: String,
    pub date_of_birth_formatted: String,
    pub date_of_death_formatted: String,
}

impl Author {
    /// Display name, family name first
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn url(&self) -> String {
        url(self.id)
    }

    pub fn date_of_birth_formatted(&self) -> String {
        format_long_date(self.date_of_birth)
    }

    pub fn date_of_death_formatted(&self) -> String {
        format_long_date(self.date_of_death)
    }

    pub fn lifespan(&self) -> String {
        match (self.date_of_birth, self.date_of_death) {
            (None, None) => String::new(),
            _ => format!(
                "{} - {}",
                self.date_of_birth_formatted(),
                self.date_of_death_formatted()
            ),
        }
    }
}

/// Canonical URL of an author
pub fn url(id: i32) -> String {
    format!("/catalog/author/{}", id)
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            name: author.name(),
            url: author.url(),
            lifespan: author.lifespan(),
            date_of_birth_formatted: author.date_of_birth_formatted(),
            date_of_death_formatted: author.date_of_death_formatted(),
            author: author.clone(),
        }
    }
}

impl Entity for Author {
    type Draft = AuthorDraft;

    const COLLECTION: &'static str = "authors";
    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: AuthorDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            family_name: draft.family_name,
            date_of_birth: draft.date_of_birth,
            date_of_death: draft.date_of_death,
        }
    }

    fn to_draft(&self) -> AuthorDraft {
        AuthorDraft {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        }
    }

    fn draft_values(draft: &AuthorDraft) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("first_name", FieldValue::Text(draft.first_name.clone())),
            ("family_name", FieldValue::Text(draft.family_name.clone())),
            ("date_of_birth", FieldValue::Date(draft.date_of_birth)),
            ("date_of_death", FieldValue::Date(draft.date_of_death)),
        ]
    }
}
