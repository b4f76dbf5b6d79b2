use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use color_eyre::Result;
use http::{header::CONTENT_TYPE, Method};


mod_use::mod_use![config, handler, context, ext];

/// Routes of the settings resource, with `ctx` shared to every handler.
pub fn router(ctx: Context) -> Router {
    let cors_layer = tower_http::cors::CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::PUT, Method::POST])
        .allow_headers(vec![CONTENT_TYPE])
        .allow_credentials(false)
        // Allow requests from any origin
        .allow_origin(tower_http::cors::Any);

    let trace_layer = tower_http::trace::TraceLayer::new_for_http();

    Router::new()
        .route(
            "/v1/settings",
            get(handle_get).put(handle_update).post(handle_update),
        )
        .layer(Extension(ctx))
        .layer(cors_layer)
        .layer(trace_layer)
}

pub async fn serve_with_config(config: Config) -> Result<()> {
    let config = Arc::new(config);
    tracing::debug!(config = ?config);

    let server = axum::Server::bind(&config.bind);
    let ctx = Context::new(config).await?;
    let app = router(ctx).into_make_service();

    tracing::info!("Server starting");

    server.serve(app).await?;

    tracing::info!("Server stopped");

    Ok(())
}

pub async fn serve() -> Result<()> {
    serve_with_config(Config::from_env()?).await
}
