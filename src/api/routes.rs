use actix_web::{web, HttpResponse};
use prometheus::{Encoder, TextEncoder};

use super::error::{ApiError, ApiResult};
use super::handlers;
use super::metrics::REJECTED_TOTAL;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health checks
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics_endpoint))

        .service(
            web::scope("/api")
                .route("/themes", web::get().to(handlers::list_themes))

                // Devis
                .route("/quotes", web::post().to(handlers::generate_quote))
                .route("/quotes/preview", web::post().to(handlers::preview_quote))
                .route("/devis", web::post().to(handlers::generate_quote))
                .route("/devis/preview", web::post().to(handlers::preview_quote))

                // Facturas
                .route("/invoices", web::post().to(handlers::generate_invoice))
                .route("/invoices/preview", web::post().to(handlers::preview_invoice))
                .route("/factures", web::post().to(handlers::generate_invoice))
                .route("/factures/preview", web::post().to(handlers::preview_invoice)),
        );
}

/// Límite de tamaño y errores de JSON como 400 con el formato común
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            REJECTED_TOTAL.with_label_values(&["invalid_json"]).inc();
            ApiError::bad_request(format!("invalid request body: {}", err)).into()
        })
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_endpoint() -> ApiResult<HttpResponse> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ApiError::internal_server_error(format!("metrics encoding failed: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer))
}
