//! Healthcheck endpoint for load balancers and operators.

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::state::HttpState;

/// Healthcheck payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    #[schema(example = "available")]
    pub status: String,
    #[schema(example = "development")]
    pub environment: String,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Report that the server is accepting requests.
#[utoipa::path(
    get,
    path = "/v1/healthcheck",
    tags = ["health"],
    responses((status = 200, description = "Server is available", body = HealthReport))
)]
#[get("/healthcheck")]
pub async fn healthcheck(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(HealthReport {
            status: "available".to_owned(),
            environment: state.environment.clone(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        })
}
