//! HTTP mapping for errors.
//!
//! [`server_error_response`] is the only place that logs and writes a 500
//! response. Both the panic guard and handlers facing an opaque storage
//! failure go through it, so every server fault is logged exactly once in the
//! same shape. Persistence sentinels never reach it: they map to 404 and 409.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::{Method, StatusCode, Uri};
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde_json::json;
use tracing::error;

use crate::domain::ports::PersistenceError;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, TraceId};

/// Generic message sent with every 500 response.
pub const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";
/// Message sent when a record does not exist.
pub const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
/// Message sent when an optimistic update loses a race.
pub const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(SERVER_ERROR_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

/// Log `error` and write the generic 500 response for the request
/// `method uri`.
///
/// The client only sees [`SERVER_ERROR_MESSAGE`]; the error text goes to the
/// log together with the request line and trace identifier. Takes the request
/// line instead of the request: the panic guard must not hold a request clone
/// while routing runs.
pub fn server_error_response(
    method: &Method,
    uri: &Uri,
    error: &dyn std::error::Error,
) -> HttpResponse {
    error!(
        error = %error,
        method = %method,
        uri = %uri,
        trace_id = TraceId::current().map(tracing::field::display),
        "server error"
    );
    Error::internal(SERVER_ERROR_MESSAGE).error_response()
}

/// 404 response for an absent record.
#[must_use]
pub fn not_found_response() -> HttpResponse {
    Error::not_found(NOT_FOUND_MESSAGE).error_response()
}

/// 409 response for a rejected optimistic update.
#[must_use]
pub fn edit_conflict_response() -> HttpResponse {
    Error::conflict(EDIT_CONFLICT_MESSAGE).error_response()
}

/// Map a persistence failure onto the client-visible outcome.
///
/// Sentinels become 404 and 409 without touching the error log; anything
/// else is an unexpected server fault.
pub fn persistence_error_response(req: &HttpRequest, error: &PersistenceError) -> HttpResponse {
    if !error.is_sentinel() {
        return server_error_response(req.method(), req.uri(), error);
    }
    if error.is_edit_conflict() {
        edit_conflict_response()
    } else {
        not_found_response()
    }
}

/// `JsonConfig` error handler producing the JSON error payload.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("body contains badly-formed JSON")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

/// `PathConfig` error handler producing the JSON error payload.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("invalid path parameter")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}
