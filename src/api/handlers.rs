use std::time::Instant;

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::core::{AppConfig, DocumentError};
use crate::models::{DocumentAggregate, DocumentKind, DocumentRequest, OutputFormat};
use crate::templates::{DocumentView, Theme};
use super::error::{ApiError, ApiResult};
use super::metrics::{DOCUMENTS_TOTAL, PREVIEWS_TOTAL, RENDER_DURATION, REJECTED_TOTAL};
use super::state::ApiState;

/// Genera un devis en PDF o DOCX
pub async fn generate_quote(
    req: HttpRequest,
    body: web::Json<DocumentRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    generate(DocumentKind::Quote, &req, body.into_inner(), &state).await
}

/// Genera una factura en PDF o DOCX
pub async fn generate_invoice(
    req: HttpRequest,
    body: web::Json<DocumentRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    generate(DocumentKind::Invoice, &req, body.into_inner(), &state).await
}

pub async fn preview_quote(
    req: HttpRequest,
    body: web::Json<DocumentRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    preview(DocumentKind::Quote, &req, body.into_inner(), &state)
}

pub async fn preview_invoice(
    req: HttpRequest,
    body: web::Json<DocumentRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    preview(DocumentKind::Invoice, &req, body.into_inner(), &state)
}

pub async fn list_themes(state: web::Data<ApiState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "themes": Theme::all(),
        "default": state.config.documents.default_theme
    }))
}

async fn generate(
    kind: DocumentKind,
    req: &HttpRequest,
    request: DocumentRequest,
    state: &ApiState,
) -> ApiResult<HttpResponse> {
    check_rate_limit(req, state)?;

    // El formato se valida antes de construir o renderizar nada
    let format: OutputFormat = request
        .format
        .parse()
        .map_err(|e| reject("unsupported_format", e))?;

    let (document, theme) = build_document(kind, request, &state.config)?;
    let kind_label = kind.to_string();
    let start = Instant::now();

    let logo = match &document.presentation().logo_url {
        Some(url) => state.logo_fetcher.fetch(url).await,
        None => None,
    };

    let view = DocumentView::new(&document, theme);
    let bytes = state
        .renderers
        .for_format(format)
        .render(&view, logo.as_ref())
        .await
        .map_err(|e| {
            DOCUMENTS_TOTAL
                .with_label_values(&[kind_label.as_str(), format.extension(), "error"])
                .inc();
            ApiError::from(e)
        })?;

    let elapsed = start.elapsed();
    RENDER_DURATION
        .with_label_values(&[format.extension()])
        .observe(elapsed.as_secs_f64());
    DOCUMENTS_TOTAL
        .with_label_values(&[kind_label.as_str(), format.extension(), "ok"])
        .inc();

    let file_name = document.file_name(format.extension());
    tracing::info!(
        kind = %kind,
        number = document.number(),
        format = %format,
        theme = theme.name,
        size_bytes = bytes.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "document generated"
    );

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(bytes))
}

fn preview(
    kind: DocumentKind,
    req: &HttpRequest,
    request: DocumentRequest,
    state: &ApiState,
) -> ApiResult<HttpResponse> {
    check_rate_limit(req, state)?;

    let (document, _) = build_document(kind, request, &state.config)?;
    PREVIEWS_TOTAL.with_label_values(&[kind.to_string().as_str()]).inc();

    Ok(HttpResponse::Ok().json(document.to_serializable()))
}

/// Construye el agregado, añade las líneas y calcula totales
fn build_document(
    kind: DocumentKind,
    request: DocumentRequest,
    config: &AppConfig,
) -> ApiResult<(DocumentAggregate, &'static Theme)> {
    let DocumentRequest {
        options,
        items,
        theme,
        ..
    } = request;

    let theme = Theme::by_name(
        theme
            .as_deref()
            .unwrap_or(config.documents.default_theme.as_str()),
    );

    let mut document = DocumentAggregate::new(kind, options, &config.documents)
        .map_err(|e| reject("missing_field", e))?;
    for item in items {
        document.add_item(item);
    }
    document
        .check_amounts()
        .map_err(|e| reject("amount_out_of_range", e))?;
    document.compute_totals();

    Ok((document, theme))
}

fn check_rate_limit(req: &HttpRequest, state: &ApiState) -> ApiResult<()> {
    let client = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();

    if state.rate_limiter.check_key(&client).is_err() {
        tracing::warn!(client = %client, "rate limit exceeded");
        REJECTED_TOTAL.with_label_values(&["rate_limited"]).inc();
        return Err(ApiError::too_many_requests("Rate limit exceeded"));
    }

    Ok(())
}

fn reject(reason: &str, err: DocumentError) -> ApiError {
    tracing::debug!(reason, error = %err, "request rejected");
    REJECTED_TOTAL.with_label_values(&[reason]).inc();
    ApiError::from(err)
}
