//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::{authors, book_instances, genres, health},
    error::ErrorResponse,
    models::{
        author::AuthorView, book::BookView, book_instance::BookInstanceView, genre::GenreView,
        Author, Book, BookInstance, BookInstanceStatus, Genre,
    },
    validation::FieldError,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library API",
        version = "0.1.0",
        description = "Catalog of authors, genres and book copies. \
                       GET endpoints return render directives; form POSTs either \
                       redirect (303) or re-render the form with field errors."
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_form,
        authors::create_author,
        authors::update_author_form,
        authors::update_author,
        authors::delete_author_form,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre_form,
        genres::create_genre,
        genres::update_genre_form,
        genres::update_genre,
        genres::delete_genre_form,
        genres::delete_genre,
        // Book instances
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance_form,
        book_instances::create_book_instance,
        book_instances::update_book_instance_form,
        book_instances::update_book_instance,
        book_instances::delete_book_instance_form,
        book_instances::delete_book_instance,
    ),
    components(
        schemas(
            Author,
            AuthorView,
            Book,
            BookView,
            Genre,
            GenreView,
            BookInstance,
            BookInstanceStatus,
            BookInstanceView,
            FieldError,
            ErrorResponse,
            health::HealthResponse,
            health::ReadinessResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Authors and their books"),
        (name = "genres", description = "Genres"),
        (name = "bookinstances", description = "Physical copies of books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
