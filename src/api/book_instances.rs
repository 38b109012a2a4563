//! Book instance (copy) endpoints

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

/// List all book copies with their books
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Rendered bookinstance_list view")
    )
)]
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.book_instances.list().await?;
    respond(&state, outcome)
}

/// Get a book copy with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Rendered bookinstance_detail view"),
        (status = 404, description = "Book copy not found", body = ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.detail(id).await?;
    respond(&state, outcome)
}

/// Empty copy form, with the book choices
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Rendered bookinstance_form view")
    )
)]
pub async fn create_book_instance_form(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.book_instances.create_get().await?;
    respond(&state, outcome)
}

/// Record a new copy of a book
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Form re-rendered with field errors"),
        (status = 303, description = "Created; redirect to the new copy")
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.create_post(&fields).await?;
    respond(&state, outcome)
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Rendered bookinstance_form view"),
        (status = 404, description = "Book copy not found", body = ErrorResponse)
    )
)]
pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.update_get(id).await?;
    respond(&state, outcome)
}

/// Replace a copy's book, imprint, status and due date
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Form re-rendered with field errors"),
        (status = 303, description = "Updated; redirect to the copy"),
        (status = 404, description = "Book copy not found", body = ErrorResponse)
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state
        .services
        .book_instances
        .update_post(id, &fields)
        .await?;
    respond(&state, outcome)
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Rendered bookinstance_delete view"),
        (status = 303, description = "Unknown copy; redirect to the list")
    )
)]
pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.delete_get(id).await?;
    respond(&state, outcome)
}

/// Delete the copy named by the `id` form field
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID (ignored; the id field decides)")),
    responses(
        (status = 303, description = "Deleted; redirect to the list"),
        (status = 400, description = "Missing id field", body = ErrorResponse)
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.delete_post(&fields).await?;
    respond(&state, outcome)
}
