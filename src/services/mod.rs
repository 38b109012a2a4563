//! Catalog controllers

pub mod authors;
pub mod book_instances;
pub mod catalog;
pub mod genres;

use crate::{
    models::{Author, BookInstance, Genre},
    repository::Repository,
};

pub use catalog::{Controller, Outcome, Resource};

/// Container for all controllers
#[derive(Clone)]
pub struct Services {
    pub authors: Controller<Author>,
    pub genres: Controller<Genre>,
    pub book_instances: Controller<BookInstance>,
}

impl Services {
    /// Create all controllers over the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: Controller::new(repository.clone()),
            genres: Controller::new(repository.clone()),
            book_instances: Controller::new(repository),
        }
    }
}
