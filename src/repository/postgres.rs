//! PostgreSQL record store
//!
//! One table per collection. SQL is assembled only from field names the
//! entity declares; every value goes through a bind parameter.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Pool, Postgres,
};

use super::{check_field, Query, RecordStore};
use crate::{
    error::AppResult,
    models::{Entity, FieldValue},
};

pub struct PgStore<E> {
    pool: Pool<Postgres>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgStore<E> {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

fn bind_value<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    value: FieldValue,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        FieldValue::Int(v) => query.bind(v),
        FieldValue::Text(v) => query.bind(v),
        FieldValue::Date(v) => query.bind(v),
    }
}

/// SELECT statement for a query, with `$n` placeholders for the filters
fn select_sql<E: Entity>(query: &Query) -> AppResult<String> {
    let mut sql = format!("SELECT * FROM {}", E::COLLECTION);

    if !query.filters.is_empty() {
        let mut conditions = Vec::with_capacity(query.filters.len());
        for (idx, (field, _)) in query.filters.iter().enumerate() {
            check_field::<E>(field)?;
            conditions.push(format!("{} = ${}", field, idx + 1));
        }
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    match query.sort {
        Some(field) => {
            check_field::<E>(field)?;
            sql.push_str(&format!(" ORDER BY {} ASC, id ASC", field));
        }
        None => sql.push_str(" ORDER BY id ASC"),
    }

    Ok(sql)
}

fn insert_sql<E: Entity>(values: &[(&'static str, FieldValue)]) -> String {
    let columns: Vec<&str> = values.iter().map(|(field, _)| *field).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|idx| format!("${}", idx)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        E::COLLECTION,
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn update_sql<E: Entity>(values: &[(&'static str, FieldValue)]) -> String {
    let sets: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(idx, (field, _))| format!("{} = ${}", field, idx + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING *",
        E::COLLECTION,
        sets.join(", "),
        values.len() + 1
    )
}

#[async_trait]
impl<E> RecordStore<E> for PgStore<E>
where
    E: Entity + for<'r> FromRow<'r, PgRow>,
{
    async fn find_by_id(&self, id: i32) -> AppResult<Option<E>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::COLLECTION);
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find(&self, query: &Query) -> AppResult<Vec<E>> {
        let sql = select_sql::<E>(query)?;
        let mut builder = sqlx::query_as::<_, E>(&sql);
        for (_, value) in &query.filters {
            builder = bind_value(builder, value.clone());
        }
        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert(&self, draft: &E::Draft) -> AppResult<E> {
        let values = E::draft_values(draft);
        let sql = insert_sql::<E>(&values);
        let mut builder = sqlx::query_as::<_, E>(&sql);
        for (_, value) in values {
            builder = bind_value(builder, value);
        }
        let row = builder.fetch_one(&self.pool).await?;
        tracing::debug!("Inserted {} id={}", E::COLLECTION, row.id());
        Ok(row)
    }

    async fn update_by_id(&self, id: i32, draft: &E::Draft) -> AppResult<bool> {
        let values = E::draft_values(draft);
        let sql = update_sql::<E>(&values);
        let mut builder = sqlx::query_as::<_, E>(&sql);
        for (_, value) in values {
            builder = bind_value(builder, value);
        }
        let row = builder.bind(id).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::COLLECTION);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Author, AuthorDraft, Book};

    #[test]
    fn test_select_sql_with_filter_and_sort() {
        let query = Query::all()
            .filter("author", FieldValue::Int(3))
            .sort_by("title");
        assert_eq!(
            select_sql::<Book>(&query).unwrap(),
            "SELECT * FROM books WHERE author = $1 ORDER BY title ASC, id ASC"
        );
    }

    #[test]
    fn test_select_sql_rejects_unknown_fields() {
        let query = Query::all().sort_by("title; DROP TABLE books");
        assert!(matches!(
            select_sql::<Book>(&query),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_write_sql() {
        let draft = AuthorDraft {
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        let values = Author::draft_values(&draft);
        assert_eq!(
            insert_sql::<Author>(&values),
            "INSERT INTO authors (first_name, family_name, date_of_birth, date_of_death) \
             VALUES ($1, $2, $3, $4) RETURNING *"
        );
        assert_eq!(
            update_sql::<Author>(&values),
            "UPDATE authors SET first_name = $1, family_name = $2, date_of_birth = $3, \
             date_of_death = $4 WHERE id = $5 RETURNING *"
        );
    }
}
