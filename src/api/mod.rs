//! HTTP handlers for the catalog

pub mod authors;
pub mod book_instances;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppResult, services::Outcome, AppState};

/// Turn a controller outcome into an HTTP response: views go through the
/// configured renderer, redirects become 303 See Other
pub fn respond(state: &AppState, outcome: Outcome) -> AppResult<Response> {
    match outcome {
        Outcome::Redirect(url) => Ok(Redirect::to(&url).into_response()),
        Outcome::Render(view) => {
            let body = state.renderer.render(&view.template, &view.data)?;
            Ok(([(CONTENT_TYPE, state.renderer.content_type())], body).into_response())
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/author/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/author/:id", get(authors::get_author))
        .route(
            "/author/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        .route(
            "/author/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        // Genres
        .route("/genres", get(genres::list_genres))
        .route(
            "/genre/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/genre/:id", get(genres::get_genre))
        .route(
            "/genre/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        .route(
            "/genre/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        )
        // Book instances
        .route("/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/bookinstance/create",
            get(book_instances::create_book_instance_form).post(book_instances::create_book_instance),
        )
        .route("/bookinstance/:id", get(book_instances::get_book_instance))
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_book_instance_form).post(book_instances::update_book_instance),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_book_instance_form).post(book_instances::delete_book_instance),
        );

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    app.merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
