//! Helpers shared by unit and integration tests.
//!
//! Enabled for integration tests through the `test-support` feature.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use actix_http::Request;
use actix_web::body::{self, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{Error, HttpResponse};
use serde::de::DeserializeOwned;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink for `tracing` output on the current thread.
///
/// # Examples
/// ```
/// use greenlight::test_support::CapturedLogs;
///
/// let (logs, _guard) = CapturedLogs::install();
/// tracing::error!("boom");
/// assert_eq!(logs.error_lines().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Install a plain-text subscriber for the current thread.
    ///
    /// Events are captured until the returned guard is dropped.
    #[must_use]
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    /// Everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Lines logged at `ERROR` level.
    #[must_use]
    pub fn error_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains("ERROR"))
            .map(str::to_owned)
            .collect()
    }
}

/// Writer handed out by [`CapturedLogs`].
pub struct CapturedWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Call `app` and return the response the client would see.
///
/// Unlike `actix_web::test::call_service`, a service error is rendered the
/// way the HTTP dispatcher renders it instead of panicking. Recovered panics
/// surface this way.
pub async fn respond<S, B>(app: &S, req: Request) -> HttpResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody + 'static,
{
    match app.call(req).await {
        Ok(res) => res.into_parts().1.map_into_boxed_body(),
        Err(err) => err.error_response(),
    }
}

/// Read a JSON body from a response produced by [`respond`].
///
/// # Panics
/// Panics when the body cannot be read or does not deserialize into `T`.
pub async fn read_json<T: DeserializeOwned>(response: HttpResponse) -> T {
    let bytes = body::to_bytes(response.into_body())
        .await
        .unwrap_or_else(|err| panic!("reading response body failed: {err}"));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|err| panic!("response body is not the expected JSON: {err}"))
}
