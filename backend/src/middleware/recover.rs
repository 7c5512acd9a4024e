//! Panic recovery middleware.
//!
//! [`RecoverPanic`] turns a panic anywhere in the wrapped service, whether
//! raised while building the handler future or while polling it, into a 500
//! response instead of letting the unwind tear down the worker and drop the
//! connection. Recovered responses carry `Connection: close` because the
//! panic may have left connection-level state half-written.
//!
//! The guard does not format the error body. It converts the panic payload
//! into a [`Fault`] and hands it to
//! [`server_error_response`](crate::inbound::http::error::server_error_response),
//! which logs it and writes the generic server error.
//!
//! Wrap [`Trace`](crate::middleware::Trace) outside this middleware so
//! recovered responses still carry the `trace-id` header:
//!
//! ```
//! use actix_web::App;
//! use greenlight::middleware::{RecoverPanic, Trace};
//!
//! let app = App::new().wrap(RecoverPanic).wrap(Trace);
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::task::{Context, Poll};

use actix_http::ConnectionType;
use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::{Method, Uri};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::inbound::http::error::server_error_response;

/// Description used when a panic payload is neither text nor an error.
pub const UNKNOWN_PAYLOAD: &str = "panic payload of unknown type";

/// Error value built from a recovered panic payload.
///
/// Text payloads (`panic!("...")` with or without format arguments) and
/// boxed errors passed to [`std::panic::panic_any`] keep their description
/// verbatim.
///
/// # Examples
/// ```
/// use greenlight::middleware::Fault;
///
/// let payload = std::panic::catch_unwind(|| panic!("index {} out of range", 4))
///     .expect_err("closure panics");
/// assert_eq!(Fault::from_panic(payload).to_string(), "index 4 out of range");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Fault {
    message: String,
}

impl Fault {
    /// Wrap an arbitrary panic payload.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Self>() {
            Ok(fault) => return *fault,
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self { message: *message },
            Err(payload) => payload,
        };
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_owned()
        } else if let Some(error) =
            payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>()
        {
            error.to_string()
        } else {
            UNKNOWN_PAYLOAD.to_owned()
        };
        Self { message }
    }

    /// Preserved payload description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Middleware recovering from panics raised by downstream services.
///
/// A recovered panic surfaces as an `actix_web::Error` carrying the finished
/// 500 response, which Actix writes as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoverPanic;

impl<S, B> Transform<S, ServiceRequest> for RecoverPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RecoverPanicMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoverPanicMiddleware { service }))
    }
}

/// Service produced by [`RecoverPanic`].
pub struct RecoverPanicMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RecoverPanicMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Routing needs sole ownership of the request, so keep only the
        // request line for the fault log.
        let method = req.method().clone();
        let uri = req.uri().clone();
        let started = panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req)));

        Box::pin(async move {
            let outcome = match started {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(payload) => Err(payload),
            };
            match outcome {
                Ok(result) => result,
                Err(payload) => Err(recovered_error(&method, &uri, payload)),
            }
        })
    }
}

fn recovered_error(method: &Method, uri: &Uri, payload: Box<dyn Any + Send>) -> Error {
    let fault = Fault::from_panic(payload);
    let mut response = server_error_response(method, uri, &fault);
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response.head_mut().set_connection_type(ConnectionType::Close);
    InternalError::from_response(fault, response).into()
}

#[cfg(test)]
mod tests;
