use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use quote_invoice_generator::api::{configure_routes, json_config, ApiState};
use quote_invoice_generator::core::AppConfig;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    tracing::info!("Starting Quote & Invoice Generator API");

    // Initialize Prometheus metrics
    prometheus::default_registry()
        .register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

    // Load configuration
    let config = AppConfig::load()?;
    let host = config.host.clone();
    let port = config.port;
    let max_json_bytes = config.max_json_bytes;

    tracing::info!(
        typst = %config.typst_bin,
        temp_dir = %config.temp_dir,
        supplier = %config.documents.supplier.name,
        "configuration loaded"
    );

    // Initialize application state
    let state = web::Data::new(ApiState::new(config)?);

    tracing::info!("Starting server on {}:{}", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config(max_json_bytes))
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST"])
                    .allowed_headers(vec!["Content-Type"])
                    .expose_headers(vec!["Content-Disposition"])
                    .max_age(3600)
            )
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
