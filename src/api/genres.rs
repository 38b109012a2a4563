//! Genre endpoints

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

/// List all genres by name
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Rendered genre_list view")
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.genres.list().await?;
    respond(&state, outcome)
}

/// Get a genre
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Rendered genre_detail view"),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn get_genre(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let outcome = state.services.genres.detail(id).await?;
    respond(&state, outcome)
}

#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "Rendered genre_form view")
    )
)]
pub async fn create_genre_form(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.genres.create_get().await?;
    respond(&state, outcome)
}

#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "Form re-rendered with field errors"),
        (status = 303, description = "Created; redirect to the new genre")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state.services.genres.create_post(&fields).await?;
    respond(&state, outcome)
}

#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Rendered genre_form view"),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let outcome = state.services.genres.update_get(id).await?;
    respond(&state, outcome)
}

/// Rename a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Form re-rendered with field errors"),
        (status = 303, description = "Updated; redirect to the genre"),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state.services.genres.update_post(id, &fields).await?;
    respond(&state, outcome)
}

#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Rendered genre_delete view"),
        (status = 303, description = "Unknown genre; redirect to the list")
    )
)]
pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let outcome = state.services.genres.delete_get(id).await?;
    respond(&state, outcome)
}

/// Delete the genre named by the `genreid` form field
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID (ignored; the genreid field decides)")),
    responses(
        (status = 303, description = "Deleted; redirect to the list"),
        (status = 400, description = "Missing genreid field", body = ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Form(fields): Form<RawFields>,
) -> AppResult<Response> {
    let outcome = state.services.genres.delete_post(&fields).await?;
    respond(&state, outcome)
}
