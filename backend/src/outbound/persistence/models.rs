//! Diesel row structs. Internal to the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{Movie, MovieId};

use super::schema::movies;

/// Row read from `movies`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MovieRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
    pub version: i32,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            id: MovieId::new(row.id),
            created_at: row.created_at,
            title: row.title,
            year: row.year,
            runtime: row.runtime,
            genres: row.genres,
            version: row.version,
        }
    }
}

/// Insertable movie fields; id, timestamp, and version come from defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = movies)]
pub(crate) struct NewMovieRow<'a> {
    pub title: &'a str,
    pub year: i32,
    pub runtime: i32,
    pub genres: &'a [String],
}

/// Mutable movie fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = movies)]
pub(crate) struct MovieChangeset<'a> {
    pub title: &'a str,
    pub year: i32,
    pub runtime: i32,
    pub genres: &'a [String],
}
