//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the payload schemas they exchange. Swagger UI serves it in debug
//! builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, Movie, NewMovie};
use crate::inbound::http::health::HealthReport;
use crate::inbound::http::movies::{MessageEnvelope, MovieEnvelope, UpdateMovieRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Greenlight movie API",
        description = "Movie catalogue with optimistic concurrency and a uniform error envelope.",
        license(name = "ISC", url = "https://opensource.org/license/isc-license-txt")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::healthcheck,
        crate::inbound::http::movies::create_movie,
        crate::inbound::http::movies::show_movie,
        crate::inbound::http::movies::update_movie,
        crate::inbound::http::movies::delete_movie,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Movie,
        NewMovie,
        MovieEnvelope,
        MessageEnvelope,
        UpdateMovieRequest,
        HealthReport
    )),
    tags(
        (name = "movies", description = "Movie catalogue operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
