//! CSV export: streaming response shape, escaping, and round-tripping
//! against the JSON rendering of the same filtered query.

use axum::http::{StatusCode, header};
use serde_json::json;

mod common;
use common::{MockStore, get_json, get_response, setup_app, setup_unconfigured_app};

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

async fn get_csv(app: &axum::Router, uri: &str) -> (StatusCode, String, String) {
    let response = get_response(app, uri).await;
    let status = response.status();
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|value| value.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..3], BOM, "body must start with a UTF-8 BOM");
    (
        status,
        String::from_utf8(body[3..].to_vec()).unwrap(),
        disposition,
    )
}

#[tokio::test]
async fn csv_round_trips_the_json_values() {
    let rows = json!([
        {"dni": "30123456", "apellido": "PEREZ, JUAN", "empresa": "ACME \"SA\""},
        {"dni": "28999888", "apellido": "GOMEZ\nlinea", "empresa": null},
    ]);
    let mock = MockStore::with_rows(rows, "0-1/2");
    let app = setup_app(mock).await;

    let (_, json_body) = get_json(&app, "/api/afiliados").await;
    let (status, csv_body, _) = get_csv(&app, "/api/afiliados?format=csv").await;
    assert_eq!(status, StatusCode::OK);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_body.as_bytes());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["dni", "apellido", "empresa"]);

    let parsed: Vec<Vec<String>> = reader
        .records()
        .map(|record| record.unwrap().iter().map(String::from).collect())
        .collect();
    let expected: Vec<Vec<String>> = json_body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|col| match &row[col] {
                    serde_json::Value::Null => String::new(),
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect();
    assert_eq!(parsed, expected);
}

#[tokio::test]
async fn csv_escapes_metacharacter_fields() {
    let rows = json!([
        {"apellido": "a,b", "nombres": "c\"d"},
    ]);
    let mock = MockStore::with_rows(rows, "0-0/1");
    let app = setup_app(mock).await;

    let (_, body, _) = get_csv(&app, "/api/afiliados?format=csv").await;
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("apellido,nombres"));
    assert_eq!(lines.next(), Some("\"a,b\",\"c\"\"d\""));
}

#[tokio::test]
async fn csv_without_rows_uses_the_projection_as_header() {
    let mock = MockStore::with_rows(json!([]), "*/0");
    let app = setup_app(mock).await;

    let (status, body, _) =
        get_csv(&app, "/api/afiliados?format=csv&fields=dni,apellido").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.trim_end(), "dni,apellido");
}

#[tokio::test]
async fn csv_disposition_names_page_and_timestamp() {
    let mock = MockStore::with_rows(json!([]), "*/0");
    let app = setup_app(mock).await;

    let (_, _, disposition) = get_csv(&app, "/api/afiliados?format=csv&page=3").await;
    assert!(
        disposition.starts_with("attachment; filename=\"afiliados_p3_"),
        "unexpected disposition: {disposition}"
    );
    assert!(disposition.ends_with(".csv\""));
}

#[tokio::test]
async fn csv_content_type_is_declared() {
    let mock = MockStore::with_rows(json!([]), "*/0");
    let app = setup_app(mock).await;

    let response = get_response(&app, "/api/afiliados?format=csv").await;
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(content_type, "text/csv; charset=utf-8");
}

#[tokio::test]
async fn unconfigured_store_still_serves_an_empty_export() {
    let app = setup_unconfigured_app();

    let (status, body, _) = get_csv(&app, "/api/afiliados?format=csv").await;
    assert_eq!(status, StatusCode::OK);
    // header row from the default projection, no data rows
    assert_eq!(body.lines().count(), 1);
}
