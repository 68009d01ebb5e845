// src/handlers/rotas.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::extract::{JsonBody, QueryParams},
    middleware::i18n::Locale,
    models::rotas::{DiaRota, LinkMapa, OrigemRota, RotaSugerida},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SugestaoQuery {
    /// Cidade (busca parcial, sem diferenciar maiúsculas)
    #[serde(default)]
    pub cidade: String,
    pub dia: Option<DiaRota>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkRotaPayload {
    #[serde(default)]
    #[schema(example = "São Paulo")]
    pub cidade: String,
    pub dia: Option<DiaRota>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[schema(example = "Av. Paulista, 1000, São Paulo")]
    pub partida: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrigemQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Endereço de partida, usado quando não há coordenadas
    pub partida: Option<String>,
}

// GET /api/rotas/cidades
#[utoipa::path(
    get,
    path = "/api/rotas/cidades",
    tag = "Rotas",
    responses(
        (status = 200, description = "Cidades dos clientes, em ordem alfabética", body = Vec<String>)
    )
)]
pub async fn list_cidades(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let cidades = app_state.route_service.list_cidades().await;

    Ok((StatusCode::OK, Json(cidades)))
}

// GET /api/rotas/sugestao
#[utoipa::path(
    get,
    path = "/api/rotas/sugestao",
    tag = "Rotas",
    params(SugestaoQuery),
    responses(
        (status = 200, description = "Rota sugerida com os clientes ativos da cidade", body = RotaSugerida)
    )
)]
pub async fn get_sugestao(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<SugestaoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rota = app_state.route_service
        .get_sugestao(&query.cidade, query.dia)
        .await;

    Ok((StatusCode::OK, Json(rota)))
}

// POST /api/rotas/link
#[utoipa::path(
    post,
    path = "/api/rotas/link",
    tag = "Rotas",
    request_body = LinkRotaPayload,
    responses(
        (status = 200, description = "Link do Google Maps com as paradas da rota", body = LinkMapa),
        (status = 422, description = "Nenhum cliente da rota tem endereço")
    )
)]
pub async fn create_link_rota(
    State(app_state): State<AppState>,
    locale: Locale,
    JsonBody(payload): JsonBody<LinkRotaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let origem = OrigemRota::from_parts(payload.lat, payload.lng, payload.partida.as_deref());

    let link = app_state.route_service
        .get_link_rota(&payload.cidade, payload.dia, origem.as_ref())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(link)))
}

// GET /api/clientes/{id}/mapa
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/mapa",
    tag = "Rotas",
    params(
        ("id" = String, Path, description = "ID do cliente"),
        OrigemQuery
    ),
    responses(
        (status = 200, description = "Link do Google Maps para o cliente", body = LinkMapa),
        (status = 404, description = "Cliente não encontrado"),
        (status = 422, description = "Cliente sem endereço completo")
    )
)]
pub async fn get_mapa_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    QueryParams(query): QueryParams<OrigemQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let origem = OrigemRota::from_parts(query.lat, query.lng, query.partida.as_deref());

    let link = app_state.route_service
        .get_link_cliente(&id, origem.as_ref())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(link)))
}
