//! Server construction and middleware wiring.

mod config;

pub use config::{ConfigError, ServerSettings};

use std::sync::Arc;

use actix_web::body::BoxBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::Models;
use crate::inbound::http::error::{json_error_handler, path_error_handler};
use crate::inbound::http::health::healthcheck;
use crate::inbound::http::movies::{create_movie, delete_movie, show_movie, update_movie};
use crate::inbound::http::state::HttpState;
use crate::middleware::{RecoverPanic, Trace};
use crate::outbound::persistence::{
    DbPool, DieselMovieRepository, InMemoryMovieRepository, PoolConfig, PoolError,
};

/// Build the repositories backing the HTTP adapter.
///
/// Uses PostgreSQL when a database URL is configured, otherwise keeps movies
/// in process memory.
///
/// # Errors
/// Returns [`PoolError`] when the connection pool cannot be built.
pub async fn build_models(settings: &ServerSettings) -> Result<Models, PoolError> {
    match settings.database_url() {
        Some(url) => {
            let config = PoolConfig::new(url)
                .with_max_size(settings.db_max_connections())
                .with_connection_timeout(settings.db_connect_timeout());
            let pool = DbPool::new(config).await?;
            info!(max_connections = settings.db_max_connections(), "using postgres movie store");
            Ok(Models::new(Arc::new(DieselMovieRepository::new(pool))))
        }
        None => {
            warn!("no database url configured; movies are kept in memory");
            Ok(Models::new(Arc::new(InMemoryMovieRepository::new())))
        }
    }
}

/// Assemble the application with its middleware stack.
///
/// [`Trace`] is registered last so it runs outermost; the trace identifier
/// therefore covers responses produced by [`RecoverPanic`].
pub fn build_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/v1")
        .service(healthcheck)
        .service(create_movie)
        .service(show_movie)
        .service(update_movie)
        .service(delete_movie);

    let app = App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(RecoverPanic)
        .wrap(Trace)
        .service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from loaded settings.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the settings are invalid, the pool
/// cannot be built, or binding the socket fails.
pub async fn create_server(settings: &ServerSettings) -> std::io::Result<Server> {
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let models = build_models(settings)
        .await
        .map_err(std::io::Error::other)?;
    let state = web::Data::new(HttpState::new(models, settings.environment()));

    let server = HttpServer::new(move || build_app(state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, environment = settings.environment(), "server listening");
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    fn memory_settings() -> ServerSettings {
        ServerSettings {
            host: None,
            port: 4000,
            environment: Some("test".to_owned()),
            database_url: None,
            db_max_connections: None,
            db_connect_timeout_secs: None,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn memory_store_is_used_without_database_url() {
        let models = build_models(&memory_settings()).await.expect("models");
        let state = web::Data::new(HttpState::new(models, "test"));
        let app = test::init_service(build_app(state)).await;

        let req = test::TestRequest::get().uri("/v1/movies/1").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn invalid_host_fails_before_binding() {
        let mut settings = memory_settings();
        settings.host = Some("not an address".to_owned());

        let err = create_server(&settings).await.err().expect("invalid host");

        assert!(err.to_string().contains("not an address"));
    }
}
