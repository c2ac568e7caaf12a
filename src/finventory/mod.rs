#[allow(unused_imports)]
use crate::{
    auth::{token::TokenSigner, AuthService},
    cli::globals::GlobalArgs,
    finventory::handlers::{
        health, health::__path_health, layers::__path_counties, layers::__path_trout_streams,
        login, login::__path_login, profile, profile::__path_profile, signup,
        signup::__path_signup,
    },
    users::UserStore,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

// Matches the connection limit the datastore is provisioned for
const POOL_MAX_CONNECTIONS: u32 = 10;

// Bounded wait for a free connection; exhaustion surfaces as an error
// instead of hanging the request
const POOL_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(OpenApi)]
#[openapi(
    paths(health, signup, login, profile, counties, trout_streams),
    components(
        schemas(
            signup::Signup,
            signup::SignupOk,
            login::Login,
            login::LoginOk,
            profile::Profile,
            health::Health
        )
    ),
    tags(
        (name = "finventory", description = "Trout stream tracker API"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// router
/// # Errors
/// Returns an error if the server fails to start
pub async fn new(port: u16, dsn: String, globals: &GlobalArgs) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(POOL_MAX_CONNECTIONS)
        .acquire_timeout(POOL_ACQUIRE_TIMEOUT)
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let store = UserStore::new(pool.clone());

    store
        .ensure_schema()
        .await
        .context("Failed to create users table")?;

    let signer = Arc::new(TokenSigner::new(
        globals.token_secret.expose_secret().as_bytes(),
        globals.token_ttl,
    ));

    let auth = AuthService::new(store.clone(), signer.clone());

    let cors = match globals.frontend_origin.as_deref() {
        // allow only the frontend to communicate with the backend
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .context("Invalid frontend origin")?;

            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .allow_origin(origin)
        }
        None => CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_origin(Any),
    };

    let app = Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/profile", get(handlers::profile))
        .route("/layers/counties", get(handlers::counties))
        .route("/layers/trout-streams", get(handlers::trout_streams))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(store))
                .layer(Extension(signer))
                .layer(Extension(auth)),
        )
        .route("/health", get(handlers::health).options(handlers::health))
        .layer(Extension(pool));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;

            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}
