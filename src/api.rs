use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::alerts::AlertFilter;
use crate::bulletin_links::{BulletinKind, BulletinLink};
use crate::services::alert_service::{AlertListResponse, AlertQuery};
use crate::services::bulletin_service::{
    BulletinListResponse, BulletinQuery, SerranaBulletinResponse,
};
use crate::services::{AlertService, BulletinError, BulletinService};

pub const HOME_MESSAGE: &str =
    "API de Scraping do Alerta ES rodando com sucesso! Acesse /api-docs/openapi.json para ver a documentação.";

#[derive(Clone)]
pub struct AppState {
    pub alert_service: AlertService,
    pub bulletin_service: BulletinService,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HomeResponse {
    pub mensagem: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Handler error carrying the message returned to the caller.
#[derive(Debug)]
pub enum ApiError {
    InvalidQuery(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::InvalidQuery(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("Rejected query string: {}", rejection.body_text());
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl From<BulletinError> for ApiError {
    fn from(err: BulletinError) -> Self {
        match err {
            BulletinError::NotFound => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alerta ES - API não oficial",
        description = "API de web scraping para extrair informações dos sites de alerta e boletins da Defesa Civil do ES."
    ),
    paths(
        home,
        get_alerts,
        get_meteorological_bulletins,
        get_extraordinary_bulletins,
        get_serrana_bulletin
    ),
    components(schemas(
        HomeResponse,
        ErrorResponse,
        AlertFilter,
        AlertListResponse,
        BulletinLink,
        BulletinListResponse,
        SerranaBulletinResponse
    ))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/alertas", get(get_alerts))
        .route("/boletim-meteorologico", get(get_meteorological_bulletins))
        .route("/boletim-extraordinario", get(get_extraordinary_bulletins))
        .route("/boletim-serrana", get(get_serrana_bulletin))
        .with_state(state);

    Router::new()
        .route("/", get(home))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api_routes)
}

#[utoipa::path(get, path = "/", responses((status = 200, body = HomeResponse)))]
#[instrument]
async fn home() -> impl IntoResponse {
    debug!("Home requested");
    (
        StatusCode::OK,
        Json(HomeResponse {
            mensagem: HOME_MESSAGE.to_string(),
        }),
    )
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(generate_openapi_spec())
}

#[utoipa::path(
    get,
    path = "/api/alertas",
    params(
        ("filtro_serrana" = Option<bool>, Query, description = "Keep only alerts mentioning a Serrana municipality"),
        ("termo" = Option<String>, Query, description = "Keep only alerts containing this term")
    ),
    responses(
        (status = 200, body = AlertListResponse),
        (status = 422, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_alerts(
    State(state): State<AppState>,
    query: Result<Query<AlertQuery>, QueryRejection>,
) -> Result<Json<AlertListResponse>, ApiError> {
    let Query(query) = query?;
    let response = state
        .alert_service
        .list_alerts(query.into())
        .await
        .map_err(|e| {
            error!("Failed to scrape alerts: {}", e);
            ApiError::Internal(format!("Erro ao extrair dados da página: {e}"))
        })?;

    info!("Returning {} alerts", response.total_encontrado);
    Ok(Json(response))
}

async fn list_bulletins(
    state: &AppState,
    kind: BulletinKind,
    query: &BulletinQuery,
) -> Result<Json<BulletinListResponse>, ApiError> {
    let response = state
        .bulletin_service
        .list_bulletins(kind, query)
        .await
        .map_err(|e| {
            error!("Failed to scrape {:?} bulletin listing: {}", kind, e);
            ApiError::Internal(format!("Erro ao extrair dados da página: {e}"))
        })?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/boletim-meteorologico",
    params(
        ("limite" = Option<usize>, Query, description = "Maximum number of bulletins"),
        ("ano" = Option<String>, Query, description = "Keep bulletins whose title or URL contains this year")
    ),
    responses(
        (status = 200, body = BulletinListResponse),
        (status = 422, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_meteorological_bulletins(
    State(state): State<AppState>,
    query: Result<Query<BulletinQuery>, QueryRejection>,
) -> Result<Json<BulletinListResponse>, ApiError> {
    let Query(query) = query?;
    list_bulletins(&state, BulletinKind::Meteorological, &query).await
}

#[utoipa::path(
    get,
    path = "/api/boletim-extraordinario",
    params(
        ("limite" = Option<usize>, Query, description = "Maximum number of bulletins"),
        ("ano" = Option<String>, Query, description = "Keep bulletins whose title or URL contains this year")
    ),
    responses(
        (status = 200, body = BulletinListResponse),
        (status = 422, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_extraordinary_bulletins(
    State(state): State<AppState>,
    query: Result<Query<BulletinQuery>, QueryRejection>,
) -> Result<Json<BulletinListResponse>, ApiError> {
    let Query(query) = query?;
    list_bulletins(&state, BulletinKind::Extraordinary, &query).await
}

#[utoipa::path(
    get,
    path = "/api/boletim-serrana",
    responses(
        (status = 200, body = SerranaBulletinResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_serrana_bulletin(
    State(state): State<AppState>,
) -> Result<Json<SerranaBulletinResponse>, ApiError> {
    let response = state
        .bulletin_service
        .latest_serrana_digest()
        .await
        .map_err(|e| {
            match &e {
                BulletinError::NotFound => warn!("{}", e),
                _ => error!("Failed to read Serrana bulletin: {}", e),
            }
            ApiError::from(e)
        })?;

    Ok(Json(response))
}
