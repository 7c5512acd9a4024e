//! Movie HTTP handlers.
//!
//! ```text
//! POST   /v1/movies
//! GET    /v1/movies/{id}
//! PATCH  /v1/movies/{id}
//! DELETE /v1/movies/{id}
//! ```
//!
//! Storage failures are mapped by [`persistence_error_response`]: absent
//! records answer 404, lost optimistic updates answer 409, and anything else
//! is logged once as a server error.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{MovieRepository, PersistenceError};
use crate::domain::{Error, Movie, MovieId, NewMovie};
use crate::inbound::http::error::persistence_error_response;
use crate::inbound::http::state::HttpState;

/// Single-movie response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MovieEnvelope {
    pub movie: Movie,
}

/// Confirmation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageEnvelope {
    #[schema(example = "movie successfully deleted")]
    pub message: String,
}

/// Partial update; omitted fields keep their stored value.
///
/// `expectedVersion` lets a client assert the version it last read. When it
/// is stale the store rejects the write with an edit conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub genres: Option<Vec<String>>,
    pub expected_version: Option<i32>,
}

impl UpdateMovieRequest {
    fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
        if let Some(version) = self.expected_version {
            movie.version = version;
        }
    }
}

async fn read_modify_write(
    movies: &dyn MovieRepository,
    id: MovieId,
    changes: UpdateMovieRequest,
) -> Result<Movie, PersistenceError> {
    let mut movie = movies.get(id).await?;
    changes.apply_to(&mut movie);
    movies.update(&movie).await
}

/// Create a movie.
#[utoipa::path(
    post,
    path = "/v1/movies",
    request_body = NewMovie,
    responses(
        (status = 201, description = "Movie created", body = MovieEnvelope),
        (status = 400, description = "Malformed body", body = Error),
        (status = 500, description = "Server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "createMovie"
)]
#[post("/movies")]
pub async fn create_movie(
    req: HttpRequest,
    state: web::Data<HttpState>,
    payload: web::Json<NewMovie>,
) -> HttpResponse {
    match state.models.movies.insert(&payload).await {
        Ok(movie) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/v1/movies/{}", movie.id)))
            .json(MovieEnvelope { movie }),
        Err(error) => persistence_error_response(&req, &error),
    }
}

/// Fetch a movie.
#[utoipa::path(
    get,
    path = "/v1/movies/{id}",
    params(("id" = i64, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Movie found", body = MovieEnvelope),
        (status = 404, description = "No such movie", body = Error),
        (status = 500, description = "Server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "showMovie"
)]
#[get("/movies/{id}")]
pub async fn show_movie(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = MovieId::new(path.into_inner());
    match state.models.movies.get(id).await {
        Ok(movie) => HttpResponse::Ok().json(MovieEnvelope { movie }),
        Err(error) => persistence_error_response(&req, &error),
    }
}

/// Partially update a movie under optimistic concurrency.
#[utoipa::path(
    patch,
    path = "/v1/movies/{id}",
    params(("id" = i64, Path, description = "Movie identifier")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = MovieEnvelope),
        (status = 400, description = "Malformed body", body = Error),
        (status = 404, description = "No such movie", body = Error),
        (status = 409, description = "Edit conflict", body = Error),
        (status = 500, description = "Server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "updateMovie"
)]
#[patch("/movies/{id}")]
pub async fn update_movie(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateMovieRequest>,
) -> HttpResponse {
    let id = MovieId::new(path.into_inner());
    match read_modify_write(state.models.movies.as_ref(), id, payload.into_inner()).await {
        Ok(movie) => HttpResponse::Ok().json(MovieEnvelope { movie }),
        Err(error) => persistence_error_response(&req, &error),
    }
}

/// Delete a movie.
#[utoipa::path(
    delete,
    path = "/v1/movies/{id}",
    params(("id" = i64, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Movie deleted", body = MessageEnvelope),
        (status = 404, description = "No such movie", body = Error),
        (status = 500, description = "Server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "deleteMovie"
)]
#[delete("/movies/{id}")]
pub async fn delete_movie(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = MovieId::new(path.into_inner());
    match state.models.movies.delete(id).await {
        Ok(()) => HttpResponse::Ok().json(MessageEnvelope {
            message: "movie successfully deleted".to_owned(),
        }),
        Err(error) => persistence_error_response(&req, &error),
    }
}

#[cfg(test)]
#[path = "movies_tests.rs"]
mod tests;
