//! HTTP surface: handlers and router assembly.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::export;
use crate::filtering::{
    ListQuery, clean_identifier, count_params, detail_params, detail_select, has_next, has_prev,
    resolve_stats_group, stats_params,
};
use crate::models::{
    CountEnvelope, DEFAULT_FIELDS, DEFAULT_SORT_FIELD, DETAIL_FIELDS, DetailEnvelope,
    DetailParams, FIELDS_ALL, GroupCount, ListEnvelope, ListParams, SORT_FIELDS, STATS_GROUPS,
    SchemaEnvelope, SortSpec, StatsEnvelope, StatsParams,
};
use crate::store::StoreClient;

/// Shared per-process state: read-only configuration plus the store
/// client. Absent client means the deployment is degraded.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Option<Arc<StoreClient>>,
}

/// Build the shared state from resolved configuration.
#[must_use]
pub fn build_state(config: AppConfig) -> AppState {
    let store = config.store.as_ref().and_then(|cfg| match StoreClient::new(cfg) {
        Ok(client) => Some(Arc::new(client)),
        Err(err) => {
            tracing::error!(error = %err, "failed to build store client");
            None
        }
    });
    AppState {
        config: Arc::new(config),
        store,
    }
}

/// Assemble the service router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(list_afiliados))
        .route("/count", get(count_afiliados))
        .route("/stats", get(stats_afiliados))
        .route("/schema", get(schema))
        .route("/{dni}", get(get_by_dni));

    Router::new()
        .route("/", get(root_index))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/openapi.json", get(openapi))
        .nest("/api/afiliados", api)
        .fallback(not_found)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_credentials(true)
}

fn config_error(state: &AppState) -> ApiError {
    ApiError::Config {
        missing: state.config.missing_store_vars.clone(),
    }
}

/// List afiliados with filtering, sorting and pagination, as a JSON
/// envelope or a streamed CSV attachment.
#[utoipa::path(
    get,
    path = "/api/afiliados",
    params(ListParams),
    responses((status = 200, description = "Filtered page of afiliados", body = ListEnvelope))
)]
async fn list_afiliados(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let started = Instant::now();
    let query = ListQuery::from_params(&params, state.config.max_page_size);

    let (rows, total) = match &state.store {
        Some(store) => {
            let response = store.rows(&query.compile()).await?;
            (response.rows, response.total)
        }
        None => {
            // unconfigured store: degrade to an empty result; /readyz
            // carries the deployment defect
            tracing::warn!("backing store not configured, serving empty result");
            (Vec::new(), 0)
        }
    };

    let wants_csv = params
        .format
        .as_deref()
        .is_some_and(|format| format.trim().eq_ignore_ascii_case("csv"));
    if wants_csv {
        return Ok(export::stream_csv(rows, &query.select, query.page));
    }

    let offset = query.offset();
    let envelope = ListEnvelope {
        data: rows,
        page: query.page,
        page_size: query.page_size,
        total,
        has_next: has_next(offset, query.page_size, total),
        has_prev: has_prev(query.page),
        sort: SortSpec {
            field: query.sort_field.to_string(),
            order: query.sort_order.as_str().to_string(),
        },
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    tracing::debug!(
        total = envelope.total,
        page = envelope.page,
        duration_ms = envelope.duration_ms,
        "served list"
    );
    Ok(Json(envelope).into_response())
}

/// Single-record lookup by identifier. Absence is a valid outcome, not an
/// error.
#[utoipa::path(
    get,
    path = "/api/afiliados/{dni}",
    params(("dni" = String, Path, description = "Identifier; non-digits are stripped"), DetailParams),
    responses(
        (status = 200, description = "Lookup outcome", body = DetailEnvelope),
        (status = 400, description = "Identifier contained no digits")
    )
)]
async fn get_by_dni(
    State(state): State<AppState>,
    Path(dni): Path<String>,
    Query(params): Query<DetailParams>,
) -> Result<Json<DetailEnvelope>, ApiError> {
    let store = state.store.as_ref().ok_or_else(|| config_error(&state))?;
    let id = clean_identifier(&dni).ok_or(ApiError::InvalidIdentifier)?;

    let select = detail_select(params.fields.as_deref());
    let response = store.rows(&detail_params(&select, &id)).await?;
    let row = response.rows.into_iter().next();
    Ok(Json(DetailEnvelope {
        found: row.is_some(),
        data: row,
    }))
}

/// Total row count of the table.
#[utoipa::path(
    get,
    path = "/api/afiliados/count",
    responses((status = 200, description = "Total rows", body = CountEnvelope))
)]
async fn count_afiliados(
    State(state): State<AppState>,
) -> Result<Json<CountEnvelope>, ApiError> {
    let store = state.store.as_ref().ok_or_else(|| config_error(&state))?;
    let response = store.rows(&count_params()).await?;
    Ok(Json(CountEnvelope {
        total: response.total,
    }))
}

/// Row counts grouped by a whitelisted column, largest groups first.
#[utoipa::path(
    get,
    path = "/api/afiliados/stats",
    params(StatsParams),
    responses((status = 200, description = "Grouped counts", body = StatsEnvelope))
)]
async fn stats_afiliados(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsEnvelope>, ApiError> {
    let store = state.store.as_ref().ok_or_else(|| config_error(&state))?;
    let group = resolve_stats_group(params.group.as_deref());

    let response = store.rows(&stats_params(group)).await?;
    let data = response
        .rows
        .into_iter()
        .map(|row| GroupCount {
            group: row.get(group).cloned().unwrap_or(Value::Null),
            count: row.get("count").and_then(Value::as_u64).unwrap_or(0),
        })
        .collect();
    Ok(Json(StatsEnvelope {
        group_by: group.to_string(),
        data,
    }))
}

/// Static description of the queryable surface; no store call.
#[utoipa::path(
    get,
    path = "/api/afiliados/schema",
    responses((status = 200, description = "Whitelists and limits", body = SchemaEnvelope))
)]
async fn schema(State(state): State<AppState>) -> Json<SchemaEnvelope> {
    Json(SchemaEnvelope {
        fields: FIELDS_ALL,
        default_fields: DEFAULT_FIELDS,
        detail_fields: DETAIL_FIELDS,
        sortable: SORT_FIELDS,
        stats_groups: STATS_GROUPS,
        default_sort: DEFAULT_SORT_FIELD,
        max_page_size: state.config.max_page_size,
    })
}

async fn healthz() -> Json<Value> {
    Json(json!({"ok": true, "service": "afiliados-api"}))
}

/// Readiness: configuration present and the store answering a lightweight
/// probe.
async fn readyz(State(state): State<AppState>) -> Response {
    let missing = &state.config.missing_store_vars;
    if !missing.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "degraded", "missing": missing})),
        )
            .into_response();
    }

    match &state.store {
        Some(store) => match store.probe().await {
            Ok(()) => (
                StatusCode::OK,
                Json(json!({"status": "ready", "missing": []})),
            )
                .into_response(),
            Err(err) => {
                tracing::warn!(error = %err, "store probe failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"status": "degraded", "missing": []})),
                )
                    .into_response()
            }
        },
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "degraded", "missing": []})),
        )
            .into_response(),
    }
}

async fn root_index() -> Json<Value> {
    Json(json!({
        "ok": true,
        "links": {
            "healthz": "/healthz",
            "readyz": "/readyz",
            "openapi": "/openapi.json",
            "afiliados_list": "/api/afiliados?page_size=5",
            "afiliados_schema": "/api/afiliados/schema",
        }
    }))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "not_found", "path": uri.path()})),
    )
        .into_response()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "afiliados-api",
        description = "Query-translation facade over the afiliados backing store"
    ),
    paths(list_afiliados, get_by_dni, count_afiliados, stats_afiliados, schema),
    components(schemas(
        ListEnvelope,
        DetailEnvelope,
        CountEnvelope,
        StatsEnvelope,
        SchemaEnvelope,
        SortSpec,
        GroupCount
    ))
)]
struct ApiDoc;
