use std::io::{Cursor, Read};

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use quote_invoice_generator::api::{configure_routes, json_config, ApiState};
use quote_invoice_generator::AppConfig;

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(ApiState::new(AppConfig::default()).unwrap()))
                .app_data(json_config(1_048_576))
                .configure(configure_routes),
        )
        .await
    };
}

fn quote_body() -> Value {
    json!({
        "number": "D-2025-061",
        "issue_date": "10/01/2025",
        "client_name": "CRINSTALLE",
        "client_address": "400 AVENUE GEORGES CLEMENCEAU",
        "client_city": "84300 CAVAILLON, FR",
        "client_tax_id": "952170736",
        "client_vat_number": "FR57952170736",
        "items": [
            {"description": "AGENT IA SLACK", "quantity": 1, "unit_price": 900, "tax_rate": 20, "discount": 100},
            {"description": "SYSTÈME DE GESTION DES JETONS", "quantity": 1, "unit_price": 850, "tax_rate": 20, "discount": 100}
        ]
    })
}

#[actix_web::test]
async fn health_reports_healthy() {
    let app = app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn quote_preview_returns_totals() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/quotes/preview")
        .set_json(quote_body())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["identity"]["kind"], "quote");
    assert_eq!(body["identity"]["number"], "D-2025-061");
    assert_eq!(body["identity"]["expiration_date"], "09/02/2025");
    assert_eq!(body["supplier"]["name"], "Infinytia");
    assert_eq!(body["items"][0]["net_amount"].as_f64(), Some(800.0));
    assert_eq!(body["totals"]["total_net"].as_f64(), Some(1550.0));
    assert_eq!(body["totals"]["total_tax"].as_f64(), Some(310.0));
    assert_eq!(body["totals"]["total_gross"].as_f64(), Some(1860.0));
}

#[actix_web::test]
async fn french_invoice_route_accepts_french_keys() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/factures/preview")
        .set_json(json!({
            "numero": "F-2025-003",
            "date_emission": "01/03/2025",
            "client_nom": "Atelier Dupont",
            "client_adresse": "12 Rue des Lilas",
            "client_ville": "13001 Marseille",
            "client_siret": "80295478500028",
            "client_tva": "FR12802954785",
            "numero_commande": "PO-77",
            "items": [{"description": "Maintenance", "quantite": 3, "prix_unitaire": "10.50", "tva_taux": 5.5}]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["identity"]["kind"], "invoice");
    assert_eq!(body["identity"]["due_date"], "31/03/2025");
    assert_eq!(body["identity"]["payment_status"], "pending");
    assert_eq!(body["identity"]["purchase_order"], "PO-77");
    assert_eq!(body["totals"]["total_net"].as_f64(), Some(31.5));
    assert_eq!(body["totals"]["total_tax"].as_f64(), Some(1.7325));
}

#[actix_web::test]
async fn missing_client_name_is_bad_request() {
    let app = app!();
    let mut payload = quote_body();
    payload["client_name"] = json!("   ");

    let req = test::TestRequest::post()
        .uri("/api/quotes")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "missing required field: client name");
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn overflowing_amount_is_bad_request() {
    let app = app!();
    let mut payload = quote_body();
    payload["items"] = json!([
        {"description": "Serveurs", "quantity": 1000, "unit_price": "10000000000000000000000000"}
    ]);

    let req = test::TestRequest::post()
        .uri("/api/quotes/preview")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "amount out of range: line 'Serveurs'");
}

#[actix_web::test]
async fn format_is_checked_before_document_fields() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/invoices")
        .set_json(json!({"format": "odt"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("unsupported output format 'odt'"));
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/quotes/preview")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"items\": [")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
}

#[actix_web::test]
async fn docx_quote_is_downloadable() {
    let app = app!();
    let mut payload = quote_body();
    payload["format"] = json!("DOCX");
    payload["theme"] = json!("violet");

    let req = test::TestRequest::post()
        .uri("/api/devis")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"devis_D-2025-061.docx\""
    );

    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..2], b"PK");

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut document)
        .unwrap();

    assert!(document.contains(">DEVIS<"));
    assert!(document.contains("CRINSTALLE"));
    assert!(document.contains("1 860.00 €"));
    assert!(document.contains("TVA (20%)"));
    assert!(document.contains(r#"w:fill="8e44ad""#));

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let metrics = test::call_and_read_body(&app, req).await;
    let metrics = String::from_utf8(metrics.to_vec()).unwrap();
    assert!(metrics.contains("documents_generated_total"));
}

#[actix_web::test]
async fn themes_are_listed() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/themes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["themes"].as_array().unwrap().len(), 6);
    assert_eq!(body["themes"][0]["name"], "blue");
    assert_eq!(body["default"], "blue");
}
