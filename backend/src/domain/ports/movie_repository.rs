//! Port for movie persistence.
//!
//! Adapters report absent records as [`PersistenceError::NotFound`] and
//! rejected optimistic updates as [`PersistenceError::EditConflict`]. The port
//! surfaces conflicts; it never retries them.

use async_trait::async_trait;

use crate::domain::{Movie, MovieId, NewMovie};

use super::PersistenceError;

/// Storage contract for movies.
///
/// # Version semantics
///
/// - Inserted movies start at version 1.
/// - [`MovieRepository::update`] only applies when the stored version equals
///   `movie.version`; the stored copy is returned with the version bumped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Store a new movie and return it with its assigned id.
    async fn insert(&self, movie: &NewMovie) -> Result<Movie, PersistenceError>;

    /// Fetch a movie by id.
    ///
    /// Returns [`PersistenceError::NotFound`] for unknown or non-positive ids.
    async fn get(&self, id: MovieId) -> Result<Movie, PersistenceError>;

    /// Replace a movie's fields, guarded by its version.
    ///
    /// Returns [`PersistenceError::EditConflict`] when the stored version no
    /// longer matches or the record disappeared since it was read.
    async fn update(&self, movie: &Movie) -> Result<Movie, PersistenceError>;

    /// Remove a movie.
    ///
    /// Returns [`PersistenceError::NotFound`] when nothing was deleted.
    async fn delete(&self, id: MovieId) -> Result<(), PersistenceError>;
}
