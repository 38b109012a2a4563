//! Record lifecycle shared by every catalog entity
//!
//! [`Controller`] implements list, detail, create, update and delete for any
//! [`Resource`]. Each operation ends in an [`Outcome`]: a view to render or a
//! URL to redirect to. Failed validation and blocked deletions come back as
//! views; only missing records and store failures are errors.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{book::BookView, Book, Entity},
    render::View,
    repository::{Query, RecordStore, Repository},
    validation::{self, FieldRule, RawFields, Submission},
};

/// What the caller should do once an operation completes
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(View),
    Redirect(String),
}

/// Describes how one entity type is validated, presented and related
#[async_trait]
pub trait Resource: Entity {
    /// Human-readable name, used in titles
    const LABEL: &'static str;
    /// Template and data-bag key, e.g. `author` for `author_form`
    const KEY: &'static str;
    const LIST_URL: &'static str;
    const NOT_FOUND: &'static str;
    const SORT_KEY: Option<&'static str> = None;
    /// Body field carrying the identifier of the record to delete
    const DELETE_FIELD: &'static str;
    /// Data-bag key for records that block deletion
    const DEPENDENTS_KEY: Option<&'static str> = None;
    const RULES: &'static [FieldRule];

    fn store(repository: &Repository) -> &dyn RecordStore<Self>;

    /// Canonical URL
    fn url(&self) -> String;

    /// Build a draft from a submission that passed validation
    fn draft(form: &Submission) -> Self::Draft;

    /// Records as handed to the renderer
    async fn present(_repository: &Repository, records: &[Self]) -> AppResult<Vec<Value>> {
        records
            .iter()
            .map(|record| serde_json::to_value(record).map_err(AppError::from))
            .collect()
    }

    /// Books referencing record `id`
    async fn dependents(_repository: &Repository, _id: i32) -> AppResult<Vec<Book>> {
        Ok(Vec::new())
    }

    /// Extra values every form of this entity needs (choice lists)
    async fn form_context(_repository: &Repository) -> AppResult<Map<String, Value>> {
        Ok(Map::new())
    }
}

pub struct Controller<R> {
    repository: Repository,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Controller<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Controller<R> {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            _resource: PhantomData,
        }
    }

    fn store(&self) -> &dyn RecordStore<R> {
        R::store(&self.repository)
    }

    fn template(kind: &str) -> String {
        format!("{}_{}", R::KEY, kind)
    }

    async fn present_one(&self, record: &R) -> AppResult<Value> {
        let mut presented = R::present(&self.repository, std::slice::from_ref(record)).await?;
        presented
            .pop()
            .ok_or_else(|| AppError::Internal(format!("{} could not be presented", R::LABEL)))
    }

    fn with_dependents(view: View, dependents: &[Book]) -> AppResult<View> {
        match R::DEPENDENTS_KEY {
            Some(key) => {
                let books: Vec<BookView> = dependents.iter().map(BookView::from).collect();
                view.with(key, &books)
            }
            None => Ok(view),
        }
    }

    /// List every record, sorted by the resource's sort key when it has one
    pub async fn list(&self) -> AppResult<Outcome> {
        let mut query = Query::all();
        if let Some(key) = R::SORT_KEY {
            query = query.sort_by(key);
        }

        let records = self.store().find(&query).await?;
        let presented = R::present(&self.repository, &records).await?;

        let view = View::new(Self::template("list"), format!("{} List", R::LABEL))
            .with(format!("{}_list", R::KEY), &presented)?;
        Ok(Outcome::Render(view))
    }

    /// One record plus its dependents, fetched concurrently
    pub async fn detail(&self, id: i32) -> AppResult<Outcome> {
        let (record, dependents) = tokio::try_join!(
            self.store().find_by_id(id),
            R::dependents(&self.repository, id)
        )?;

        let record = record.ok_or_else(|| {
            tracing::debug!("{} {} not found", R::LABEL, id);
            AppError::NotFound(R::NOT_FOUND.to_string())
        })?;

        let view = View::new(Self::template("detail"), format!("{} Detail", R::LABEL))
            .with(R::KEY, &self.present_one(&record).await?)?;
        Ok(Outcome::Render(Self::with_dependents(view, &dependents)?))
    }

    async fn form(&self, title: String, entity: Option<Value>, errors: &[validation::FieldError]) -> AppResult<Outcome> {
        let context = R::form_context(&self.repository).await?;
        let mut view = View::new(Self::template("form"), title).extend(context);
        if let Some(entity) = entity {
            view = view.with(R::KEY, &entity)?;
        }
        if !errors.is_empty() {
            view = view.with("errors", errors)?;
        }
        Ok(Outcome::Render(view))
    }

    /// Echo a rejected submission back into the form
    fn echo(form: &Submission, id: Option<i32>) -> AppResult<Value> {
        let mut echoed = serde_json::to_value(form.values())?;
        if let (Some(id), Value::Object(fields)) = (id, &mut echoed) {
            fields.insert("id".to_string(), Value::from(id));
        }
        Ok(echoed)
    }

    pub async fn create_get(&self) -> AppResult<Outcome> {
        self.form(format!("Create {}", R::LABEL), None, &[]).await
    }

    pub async fn create_post(&self, fields: &RawFields) -> AppResult<Outcome> {
        let form = validation::evaluate(R::RULES, fields);

        if !form.is_valid() {
            tracing::debug!("{} create rejected: {} field error(s)", R::LABEL, form.errors().len());
            let echoed = Self::echo(&form, None)?;
            return self
                .form(format!("Create {}", R::LABEL), Some(echoed), form.errors())
                .await;
        }

        let record = self.store().insert(&R::draft(&form)).await?;
        tracing::info!("Created {} id={}", R::LABEL, record.id());
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn update_get(&self, id: i32) -> AppResult<Outcome> {
        let record = self.store().find_by_id(id).await?.ok_or_else(|| {
            tracing::debug!("id not found on update: {}", id);
            AppError::NotFound(R::NOT_FOUND.to_string())
        })?;

        let presented = self.present_one(&record).await?;
        self.form(format!("Update {}", R::LABEL), Some(presented), &[])
            .await
    }

    /// Replace the mutable fields of record `id`; the identifier always comes
    /// from the route, never from the submission
    pub async fn update_post(&self, id: i32, fields: &RawFields) -> AppResult<Outcome> {
        let form = validation::evaluate(R::RULES, fields);

        if !form.is_valid() {
            tracing::debug!("{} {} update rejected: {} field error(s)", R::LABEL, id, form.errors().len());
            let echoed = Self::echo(&form, Some(id))?;
            return self
                .form(format!("Update {}", R::LABEL), Some(echoed), form.errors())
                .await;
        }

        let draft = R::draft(&form);
        if !self.store().update_by_id(id, &draft).await? {
            tracing::debug!("id not found on update: {}", id);
            return Err(AppError::NotFound(R::NOT_FOUND.to_string()));
        }

        tracing::info!("Updated {} id={}", R::LABEL, id);
        Ok(Outcome::Redirect(R::from_draft(id, draft).url()))
    }

    fn delete_view(&self, record: Option<Value>, dependents: &[Book]) -> AppResult<Outcome> {
        let view = View::new(Self::template("delete"), format!("Delete {}", R::LABEL))
            .with(R::KEY, &record)?;
        Ok(Outcome::Render(Self::with_dependents(view, dependents)?))
    }

    /// Confirmation page; a missing record sends the caller back to the list
    pub async fn delete_get(&self, id: i32) -> AppResult<Outcome> {
        let (record, dependents) = tokio::try_join!(
            self.store().find_by_id(id),
            R::dependents(&self.repository, id)
        )?;

        match record {
            Some(record) => {
                let presented = self.present_one(&record).await?;
                self.delete_view(Some(presented), &dependents)
            }
            None => Ok(Outcome::Redirect(R::LIST_URL.to_string())),
        }
    }

    /// Delete the record named by the submitted id field, unless other
    /// records still depend on it
    pub async fn delete_post(&self, fields: &RawFields) -> AppResult<Outcome> {
        let id = fields
            .get(R::DELETE_FIELD)
            .and_then(|value| value.trim().parse::<i32>().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("Missing or invalid '{}' field", R::DELETE_FIELD))
            })?;

        let (record, dependents) = tokio::try_join!(
            self.store().find_by_id(id),
            R::dependents(&self.repository, id)
        )?;

        if !dependents.is_empty() {
            tracing::info!(
                "Refusing to delete {} id={}: {} dependent record(s)",
                R::LABEL,
                id,
                dependents.len()
            );
            let presented = match record {
                Some(record) => Some(self.present_one(&record).await?),
                None => None,
            };
            return self.delete_view(presented, &dependents);
        }

        if self.store().delete_by_id(id).await? {
            tracing::info!("Deleted {} id={}", R::LABEL, id);
        } else {
            tracing::debug!("{} {} already absent on delete", R::LABEL, id);
        }
        Ok(Outcome::Redirect(R::LIST_URL.to_string()))
    }
}
