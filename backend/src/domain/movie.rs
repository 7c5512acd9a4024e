//! Movie catalogue entity.
//!
//! `version` starts at 1 and increases by one on every stored update. Writers
//! send back the version they read so concurrent edits surface as
//! [`PersistenceError::EditConflict`](crate::domain::ports::PersistenceError::EditConflict).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Positive database identifier of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(i64);

impl MovieId {
    /// Wrap a raw identifier.
    ///
    /// Values below 1 are accepted here and rejected by repositories as
    /// absent records.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether the identifier can name a stored record.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 1
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[schema(value_type = i64, example = 1)]
    pub id: MovieId,
    pub created_at: DateTime<Utc>,
    #[schema(example = "Casablanca")]
    pub title: String,
    #[schema(example = 1942)]
    pub year: i32,
    /// Runtime in minutes.
    #[schema(example = 102)]
    pub runtime: i32,
    pub genres: Vec<String>,
    #[schema(example = 1)]
    pub version: i32,
}

/// Fields supplied when inserting a movie.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl NewMovie {
    /// Materialise a stored movie at version 1.
    #[must_use]
    pub fn into_movie(self, id: MovieId, created_at: DateTime<Utc>) -> Movie {
        Movie {
            id,
            created_at,
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: self.genres,
            version: 1,
        }
    }
}
