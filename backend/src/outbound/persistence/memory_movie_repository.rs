//! Process-local [`MovieRepository`] used when no database is configured.
//!
//! Follows the same sentinel contract as the Diesel adapter so handlers and
//! tests observe identical outcomes.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{MovieRepository, PersistenceError};
use crate::domain::{Movie, MovieId, NewMovie};

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    movies: BTreeMap<MovieId, Movie>,
}

/// In-memory movie store.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    store: RwLock<Store>,
}

impl InMemoryMovieRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> PersistenceError {
    PersistenceError::connection("in-memory store lock poisoned")
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn insert(&self, movie: &NewMovie) -> Result<Movie, PersistenceError> {
        let mut store = self.store.write().map_err(poisoned)?;
        store.next_id += 1;
        let id = MovieId::new(store.next_id);
        let stored = movie.clone().into_movie(id, Utc::now());
        store.movies.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: MovieId) -> Result<Movie, PersistenceError> {
        let store = self.store.read().map_err(poisoned)?;
        store
            .movies
            .get(&id)
            .cloned()
            .ok_or(PersistenceError::NotFound)
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, PersistenceError> {
        let mut store = self.store.write().map_err(poisoned)?;
        let Some(current) = store.movies.get_mut(&movie.id) else {
            return Err(PersistenceError::EditConflict);
        };
        if current.version != movie.version {
            return Err(PersistenceError::EditConflict);
        }

        current.title.clone_from(&movie.title);
        current.year = movie.year;
        current.runtime = movie.runtime;
        current.genres.clone_from(&movie.genres);
        current.version += 1;
        Ok(current.clone())
    }

    async fn delete(&self, id: MovieId) -> Result<(), PersistenceError> {
        let mut store = self.store.write().map_err(poisoned)?;
        store
            .movies
            .remove(&id)
            .map(|_| ())
            .ok_or(PersistenceError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn casablanca() -> NewMovie {
        NewMovie {
            title: "Casablanca".to_owned(),
            year: 1942,
            runtime: 102,
            genres: vec!["drama".to_owned(), "romance".to_owned()],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_sequential_ids(casablanca: NewMovie) {
        let repo = InMemoryMovieRepository::new();
        let first = repo.insert(&casablanca).await.expect("insert");
        let second = repo.insert(&casablanca).await.expect("insert");

        assert_eq!(first.id, MovieId::new(1));
        assert_eq!(second.id, MovieId::new(2));
        assert_eq!(repo.get(first.id).await.expect("stored"), first);
    }

    #[rstest]
    #[case(MovieId::new(99))]
    #[case(MovieId::new(0))]
    #[case(MovieId::new(-1))]
    #[tokio::test]
    async fn missing_ids_are_not_found(#[case] id: MovieId) {
        let repo = InMemoryMovieRepository::new();

        assert_eq!(repo.get(id).await, Err(PersistenceError::NotFound));
        assert_eq!(repo.delete(id).await, Err(PersistenceError::NotFound));
    }

    #[rstest]
    #[tokio::test]
    async fn update_bumps_version(casablanca: NewMovie) {
        let repo = InMemoryMovieRepository::new();
        let mut movie = repo.insert(&casablanca).await.expect("insert");
        movie.runtime = 103;

        let updated = repo.update(&movie).await.expect("update");

        assert_eq!(updated.version, 2);
        assert_eq!(updated.runtime, 103);
    }

    #[rstest]
    #[tokio::test]
    async fn stale_update_is_an_edit_conflict(casablanca: NewMovie) {
        let repo = InMemoryMovieRepository::new();
        let original = repo.insert(&casablanca).await.expect("insert");
        let mut first_writer = original.clone();
        let mut second_writer = original;

        first_writer.title = "Casablanca (restored)".to_owned();
        repo.update(&first_writer).await.expect("first writer wins");

        second_writer.year = 1943;
        assert_eq!(
            repo.update(&second_writer).await,
            Err(PersistenceError::EditConflict)
        );
        let stored = repo.get(second_writer.id).await.expect("still stored");
        assert_eq!(stored.year, 1942);
    }

    #[rstest]
    #[tokio::test]
    async fn update_after_delete_is_an_edit_conflict(casablanca: NewMovie) {
        let repo = InMemoryMovieRepository::new();
        let movie = repo.insert(&casablanca).await.expect("insert");
        repo.delete(movie.id).await.expect("delete");

        assert_eq!(repo.update(&movie).await, Err(PersistenceError::EditConflict));
    }
}
