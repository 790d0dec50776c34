use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hyper::Server;
use serde_json::json;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogStats};
use crate::common::constants::{self, SERVICE_NAME};
use crate::domain::FormattedInstitution;
use crate::filter::SearchCriteria;
use crate::metrics::ApiMetrics;
use crate::modality::Modality;

/// Shared, read-only handle to the catalog
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

/// Errors surfaced to HTTP clients
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    MissingParameter(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingParameter(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "erro": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "mensagem": message }))).into_response()
            }
        }
    }
}

type SearchResponse = Result<Json<Vec<FormattedInstitution>>, ApiError>;

async fn index() -> &'static str {
    ApiMetrics::record_request("index");
    constants::BANNER
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "etecs": state.catalog.len(),
    }))
}

async fn all(State(state): State<AppState>) -> Json<Vec<FormattedInstitution>> {
    ApiMetrics::record_request("all");
    Json(state.catalog.institutions().to_vec())
}

async fn names(State(state): State<AppState>) -> Json<Vec<String>> {
    ApiMetrics::record_request("etecs");
    Json(state.catalog.names().into_iter().map(str::to_string).collect())
}

async fn cities(State(state): State<AppState>) -> Json<Vec<String>> {
    ApiMetrics::record_request("cidades");
    Json(state.catalog.cities().to_vec())
}

async fn courses(State(state): State<AppState>) -> Json<Vec<String>> {
    ApiMetrics::record_request("cursos");
    Json(state.catalog.courses().to_vec())
}

async fn modalities() -> Json<Vec<Modality>> {
    ApiMetrics::record_request("modalidades");
    Json(Modality::ALL.to_vec())
}

async fn stats(State(state): State<AppState>) -> Json<CatalogStats> {
    ApiMetrics::record_request("estatisticas");
    Json(state.catalog.stats())
}

fn respond(
    catalog: &Catalog,
    endpoint: &'static str,
    criteria: &SearchCriteria,
    not_found: &'static str,
) -> SearchResponse {
    ApiMetrics::record_request(endpoint);
    let results = catalog.search(criteria);
    ApiMetrics::record_search(endpoint, results.len());
    debug!(endpoint, ?criteria, matches = results.len(), "Search request");

    if results.is_empty() {
        return Err(ApiError::NotFound(not_found));
    }
    Ok(Json(results))
}

/// Combined search; no criteria at all returns the whole collection.
async fn search(State(state): State<AppState>, Query(criteria): Query<SearchCriteria>) -> SearchResponse {
    respond(&state.catalog, "busca", &criteria, constants::MSG_NO_SEARCH_MATCH)
}

/// Single-criterion searches require their parameter.
fn required(value: Option<String>, missing: &'static str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiError::MissingParameter(missing))
}

async fn search_city(State(state): State<AppState>, Query(params): Query<SearchCriteria>) -> SearchResponse {
    let cidade = required(params.cidade, constants::MSG_MISSING_CITY)?;
    respond(
        &state.catalog,
        "busca_cidade",
        &SearchCriteria::city(cidade),
        constants::MSG_NO_CITY_MATCH,
    )
}

async fn search_course(State(state): State<AppState>, Query(params): Query<SearchCriteria>) -> SearchResponse {
    let curso = required(params.curso, constants::MSG_MISSING_COURSE)?;
    respond(
        &state.catalog,
        "busca_curso",
        &SearchCriteria::course(curso),
        constants::MSG_NO_COURSE_MATCH,
    )
}

async fn search_name(State(state): State<AppState>, Query(params): Query<SearchCriteria>) -> SearchResponse {
    let nome = required(params.nome, constants::MSG_MISSING_NAME)?;
    respond(
        &state.catalog,
        "busca_etec",
        &SearchCriteria::name(nome),
        constants::MSG_NO_NAME_MATCH,
    )
}

async fn search_modality(State(state): State<AppState>, Query(params): Query<SearchCriteria>) -> SearchResponse {
    let modalidade = required(params.modalidade, constants::MSG_MISSING_MODALITY)?;
    respond(
        &state.catalog,
        "busca_modalidade",
        &SearchCriteria::modality(modalidade),
        constants::MSG_NO_MODALITY_MATCH,
    )
}

/// Create the HTTP router with all routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/all", get(all))
        .route("/etecs", get(names))
        .route("/cidades", get(cities))
        .route("/cursos", get(courses))
        .route("/modalidades", get(modalities))
        .route("/estatisticas", get(stats))
        .route("/busca", get(search))
        .route("/busca/cidade", get(search_city))
        .route("/busca/curso", get(search_course))
        .route("/busca/etec", get(search_name))
        .route("/busca/modalidade", get(search_modality))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Start the HTTP server on `addr` and serve until Ctrl-C
pub async fn start_server(catalog: Catalog, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(AppState::new(catalog));

    info!("HTTP server running on http://{addr}");
    info!("Health check: http://{addr}/health");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
