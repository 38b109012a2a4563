//! Author endpoints

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};

use super::respond;
use crate::{
    error::{AppResult, ErrorResponse},
    validation::RawFields,
    AppState,
};

/// List all authors, sorted by family name
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Rendered author_list view")
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.authors.list().await?;
    respond(&state, outcome)
}

/// Get an author with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Rendered author_detail view"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let outcome = state.services.authors.detail(id).await?;
    respond(&state, outcome)
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "Rendered author_form view")
    )
)]
pub async fn create_author_form(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.authors.create_get().await?;
    respond(&state, outcome)
}

/// Create an author from a form submission
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "Form re-rendered with field errors"),
        (status = 303, description = "Created; redirect to the new author")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state.services.authors.create_post(&fields).await?;
    respond(&state, outcome)
}

/// Author form pre-filled with the stored record
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Rendered author_form view"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let outcome = state.services.authors.update_get(id).await?;
    respond(&state, outcome)
}

/// Replace an author's fields from a form submission
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Form re-rendered with field errors"),
        (status = 303, description = "Updated; redirect to the author"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state.services.authors.update_post(id, &fields).await?;
    respond(&state, outcome)
}

/// Delete confirmation, listing the author's books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Rendered author_delete view"),
        (status = 303, description = "Unknown author; redirect to the list")
    )
)]
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let outcome = state.services.authors.delete_get(id).await?;
    respond(&state, outcome)
}

/// Delete the author named by the `authorid` form field
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID (ignored; the authorid field decides)")),
    responses(
        (status = 200, description = "Deletion refused; author still has books"),
        (status = 303, description = "Deleted; redirect to the list"),
        (status = 400, description = "Missing authorid field", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state.services.authors.delete_post(&fields).await?;
    respond(&state, outcome)
}
