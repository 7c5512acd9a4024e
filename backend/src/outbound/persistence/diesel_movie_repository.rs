//! PostgreSQL-backed [`MovieRepository`] using Diesel.
//!
//! Optimistic concurrency is a single statement:
//! `UPDATE movies SET ..., version = version + 1 WHERE id = $1 AND version = $2`.
//! When it matches no row the update reports [`PersistenceError::EditConflict`];
//! lookups and deletes that match no row report [`PersistenceError::NotFound`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{MovieRepository, PersistenceError};
use crate::domain::{Movie, MovieId, NewMovie};

use super::models::{MovieChangeset, MovieRow, NewMovieRow};
use super::pool::DbPool;
use super::schema::movies;

/// Diesel adapter for the movie port.
#[derive(Clone)]
pub struct DieselMovieRepository {
    pool: DbPool,
}

impl DieselMovieRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Translate Diesel failures, reporting an empty result as `on_missing`.
fn map_diesel_error(error: diesel::result::Error, on_missing: PersistenceError) -> PersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => on_missing,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::connection("database connection closed")
        }
        DieselError::QueryBuilderError(_) => PersistenceError::query("database query error"),
        _ => PersistenceError::query("database error"),
    }
}

#[async_trait]
impl MovieRepository for DieselMovieRepository {
    async fn insert(&self, movie: &NewMovie) -> Result<Movie, PersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = NewMovieRow {
            title: &movie.title,
            year: movie.year,
            runtime: movie.runtime,
            genres: &movie.genres,
        };

        diesel::insert_into(movies::table)
            .values(&row)
            .returning(MovieRow::as_returning())
            .get_result::<MovieRow>(&mut conn)
            .await
            .map(Movie::from)
            .map_err(|err| map_diesel_error(err, PersistenceError::query("insert returned no row")))
    }

    async fn get(&self, id: MovieId) -> Result<Movie, PersistenceError> {
        if !id.is_valid() {
            return Err(PersistenceError::NotFound);
        }
        let mut conn = self.pool.get().await?;

        movies::table
            .find(id.get())
            .select(MovieRow::as_select())
            .first::<MovieRow>(&mut conn)
            .await
            .map(Movie::from)
            .map_err(|err| map_diesel_error(err, PersistenceError::NotFound))
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, PersistenceError> {
        let mut conn = self.pool.get().await?;
        let changes = MovieChangeset {
            title: &movie.title,
            year: movie.year,
            runtime: movie.runtime,
            genres: &movie.genres,
        };

        diesel::update(
            movies::table
                .filter(movies::id.eq(movie.id.get()))
                .filter(movies::version.eq(movie.version)),
        )
        .set((&changes, movies::version.eq(movies::version + 1)))
        .returning(MovieRow::as_returning())
        .get_result::<MovieRow>(&mut conn)
        .await
        .map(Movie::from)
        .map_err(|err| map_diesel_error(err, PersistenceError::EditConflict))
    }

    async fn delete(&self, id: MovieId) -> Result<(), PersistenceError> {
        if !id.is_valid() {
            return Err(PersistenceError::NotFound);
        }
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(movies::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, PersistenceError::NotFound))?;

        if affected == 0 {
            return Err(PersistenceError::NotFound);
        }
        Ok(())
    }
}
