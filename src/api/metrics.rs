use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

/// Documentos generados por tipo, formato y resultado
pub static DOCUMENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "documents_generated_total",
        "Total number of generated documents",
        &["kind", "format", "status"]
    )
    .expect("Failed to register documents_generated_total")
});

/// Tiempo de renderizado por formato
pub static RENDER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "document_render_duration_seconds",
        "Document rendering duration in seconds",
        &["format"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to register document_render_duration_seconds")
});

/// Vistas previas JSON servidas por tipo
pub static PREVIEWS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "document_previews_total",
        "Total number of JSON previews",
        &["kind"]
    )
    .expect("Failed to register document_previews_total")
});

/// Peticiones rechazadas por error del cliente
pub static REJECTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "document_requests_rejected_total",
        "Requests rejected before rendering",
        &["reason"]
    )
    .expect("Failed to register document_requests_rejected_total")
});
