use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tower::{limit::ConcurrencyLimitLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

pub mod config;
pub mod error_404;
pub mod handlers;
pub mod models;
pub mod utils;

use crate::config::Config;
use crate::error_404::error_404::error_404;
use crate::handlers::actor_handler::{create_actor, submit_recording};
use crate::handlers::audio_cleanup_handler::audio_cleanup_webhook;
use crate::handlers::order_intake_handler::create_order;
use crate::handlers::order_materials_handler::upload_order_materials;
use crate::handlers::payment_intent_handler::create_payment_intent;

#[tokio::main]
pub async fn main() {
    dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "ucpmaroc_service=debug,tower_http=debug");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("configuration is incomplete");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to the database");

    let axum_make_service = create_app(&pool, config);

    axum::Server::bind(&"0.0.0.0:3000".parse().unwrap())
        .serve(axum_make_service.into_make_service())
        .await
        .unwrap();
}

pub fn create_app(pool: &PgPool, config: Config) -> Router {
    let pool_arc = Arc::new(pool.clone());
    let config_arc = Arc::new(config);

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_credentials(false)
        .allow_headers(Any);

    // Limit concurrency for all routes ,Trace layer for all routes
    let middleware_stack = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(ConcurrencyLimitLayer::new(64))
        .layer(cors)
        .into_inner();

    let app = Router::new()
        .route(
            "/create_order",
            post(create_order),
        )
        .route(
            "/create_payment_intent",
            post(create_payment_intent),
        )
        .route(
            "/audio_cleanup_webhook",
            post(audio_cleanup_webhook),
        )
        .route(
            "/upload_order_materials",
            post(upload_order_materials),
        )
        .route(
            "/create_actor",
            post(create_actor),
        )
        .route(
            "/submit_recording",
            post(submit_recording),
        )
        .fallback(get(error_404))
        .layer(Extension(pool_arc))
        .layer(Extension(config_arc))
        .layer(middleware_stack);

    return app;
}
