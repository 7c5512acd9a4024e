//! Tests for panic recovery.

use super::*;
use crate::domain::{Error as ApiError, ErrorCode, TRACE_ID_HEADER};
use crate::inbound::http::error::SERVER_ERROR_MESSAGE;
use crate::middleware::Trace;
use crate::test_support::{CapturedLogs, read_json, respond};
use actix_web::dev::Service as _;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use rstest::rstest;

#[derive(Debug)]
struct Unprintable;

fn fault_of(payload: Box<dyn Any + Send>) -> String {
    Fault::from_panic(payload).message().to_owned()
}

#[rstest]
fn fault_keeps_static_str_payload() {
    assert_eq!(fault_of(Box::new("nil dereference")), "nil dereference");
}

#[rstest]
fn fault_keeps_formatted_payload() {
    assert_eq!(fault_of(Box::new(format!("slot {}", 3))), "slot 3");
}

#[rstest]
fn fault_keeps_boxed_error_description() {
    let error: Box<dyn std::error::Error + Send + Sync> = "disk on fire".into();
    assert_eq!(fault_of(Box::new(error)), "disk on fire");
}

#[rstest]
fn fault_passes_through_existing_fault() {
    let wrapped = Fault {
        message: "already wrapped".to_owned(),
    };
    assert_eq!(Fault::from_panic(Box::new(wrapped.clone())), wrapped);
}

#[rstest]
fn fault_describes_opaque_payloads() {
    assert_eq!(fault_of(Box::new(Unprintable)), UNKNOWN_PAYLOAD);
    assert_eq!(fault_of(Box::new(7_u8)), UNKNOWN_PAYLOAD);
}

async fn dereference_nothing() -> HttpResponse {
    let slot: Option<&'static str> = std::hint::black_box(None);
    HttpResponse::Ok().body(slot.unwrap())
}

async fn explode() -> HttpResponse {
    panic!("boom")
}

fn guarded_app() -> App<
    impl actix_web::dev::ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<actix_web::body::BoxBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap_fn(|req: ServiceRequest, srv| {
            if req.path() == "/sync-panic" {
                panic!("panicked before the handler future existed");
            }
            srv.call(req)
        })
        .wrap(RecoverPanic)
        .route("/ok", web::get().to(|| async { HttpResponse::Ok().body("fine") }))
        .route(
            "/missing",
            web::get().to(|| async {
                Err::<HttpResponse, ApiError>(ApiError::not_found("no such thing"))
            }),
        )
        .route("/panic", web::get().to(dereference_nothing))
        .route(
            "/sync-panic",
            web::get().to(|| async { HttpResponse::Ok().finish() }),
        )
        .service(
            web::scope("/nested")
                .route(
                    "/{id}",
                    web::get().to(|id: web::Path<u32>| async move {
                        HttpResponse::Ok().body(id.into_inner().to_string())
                    }),
                ),
        )
}

fn connection_header(res: &HttpResponse) -> Option<&str> {
    res.headers()
        .get(header::CONNECTION)
        .and_then(|value| value.to_str().ok())
}

async fn get(path: &str) -> HttpResponse {
    let app = test::init_service(guarded_app()).await;
    respond(&app, test::TestRequest::get().uri(path).to_request()).await
}

#[actix_web::test]
async fn panicking_handler_yields_500_and_closes_connection() {
    let (logs, _guard) = CapturedLogs::install();

    let res = get("/panic").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(connection_header(&res), Some("close"));
    assert_eq!(res.head().connection_type(), ConnectionType::Close);

    let body: ApiError = read_json(res).await;
    assert_eq!(body.code(), ErrorCode::InternalError);
    assert_eq!(body.message(), SERVER_ERROR_MESSAGE);

    let lines = logs.error_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("called `Option::unwrap()` on a `None` value"));
    assert!(lines[0].contains("/panic"));
}

#[actix_web::test]
async fn panic_while_creating_the_future_is_recovered() {
    let (logs, _guard) = CapturedLogs::install();

    let res = get("/sync-panic").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(connection_header(&res), Some("close"));
    assert!(logs.contents().contains("panicked before the handler future existed"));
}

#[rstest]
#[case("/ok", "fine")]
#[case("/nested/7", "7")]
#[actix_web::test]
async fn routed_responses_pass_through_untouched(
    #[case] path: &'static str,
    #[case] expected: &'static str,
) {
    let (logs, _guard) = CapturedLogs::install();
    let app = test::init_service(guarded_app()).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(header::CONNECTION).is_none());
    assert_eq!(test::read_body(res).await, expected);
    assert!(logs.error_lines().is_empty());
}

#[actix_web::test]
async fn handler_errors_are_not_treated_as_faults() {
    let (logs, _guard) = CapturedLogs::install();

    let res = get("/missing").await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(connection_header(&res).is_none());
    assert!(logs.error_lines().is_empty());
}

#[actix_web::test]
async fn service_keeps_serving_after_a_fault() {
    let app = test::init_service(guarded_app()).await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/panic").to_request();
        let res = respond(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(connection_header(&res), Some("close"));
    }

    let req = test::TestRequest::get().uri("/ok").to_request();
    let res = respond(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(connection_header(&res).is_none());
}

#[actix_web::test]
async fn recovered_responses_keep_the_trace_header() {
    let app = test::init_service(
        App::new()
            .wrap(RecoverPanic)
            .wrap(Trace)
            .route("/panic", web::get().to(explode)),
    )
    .await;

    let req = test::TestRequest::get().uri("/panic").to_request();
    let res = respond(&app, req).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: ApiError = read_json(res).await;
    assert_eq!(body.trace_id(), Some(header_id.as_str()));
}
