// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Days, Local, NaiveDate};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::extract::QueryParams,
    middleware::i18n::Locale,
    // Importamos os models para referenciar no Swagger
    models::dashboard::{DiaAgenda, PainelDashboard, ResumoVisitas},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReferenciaQuery {
    /// Data usada como "hoje" (YYYY-MM-DD). Padrão: data local do servidor.
    #[param(value_type = Option<String>, format = Date)]
    pub referencia: Option<NaiveDate>,
}

// Margem para a semana anterior e os 7 dias da agenda
const MARGEM_REFERENCIA: Days = Days::new(7);

impl ReferenciaQuery {
    fn hoje(&self) -> Result<NaiveDate, AppError> {
        let hoje = self.referencia.unwrap_or_else(|| Local::now().date_naive());

        let fora_do_intervalo = hoje.checked_sub_days(MARGEM_REFERENCIA).is_none()
            || hoje.checked_add_days(MARGEM_REFERENCIA).is_none();
        if fora_do_intervalo {
            return Err(AppError::InvalidField {
                field: "referencia",
                code: "date_out_of_range",
            });
        }
        Ok(hoje)
    }
}

// GET /api/dashboard/metricas
#[utoipa::path(
    get,
    path = "/api/dashboard/metricas",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores, próximas visitas e últimas visitas realizadas", body = PainelDashboard)
    )
)]
pub async fn get_metricas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let painel = app_state.dashboard_service.get_painel().await;

    Ok((StatusCode::OK, Json(painel)))
}

// GET /api/dashboard/resumo
#[utoipa::path(
    get,
    path = "/api/dashboard/resumo",
    tag = "Dashboard",
    params(ReferenciaQuery),
    responses(
        (status = 200, description = "Resumo semanal e mensal das visitas realizadas", body = ResumoVisitas),
        (status = 400, description = "Data de referência fora do intervalo suportado")
    )
)]
pub async fn get_resumo(
    State(app_state): State<AppState>,
    locale: Locale,
    QueryParams(query): QueryParams<ReferenciaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let hoje = query.hoje().map_err(|app_err| app_err.to_api_error(&locale))?;

    let resumo = app_state.dashboard_service.get_resumo(hoje).await;

    Ok((StatusCode::OK, Json(resumo)))
}

// GET /api/agenda
#[utoipa::path(
    get,
    path = "/api/agenda",
    tag = "Dashboard",
    params(ReferenciaQuery),
    responses(
        (status = 200, description = "Visitas agendadas nos próximos 7 dias", body = Vec<DiaAgenda>),
        (status = 400, description = "Data de referência fora do intervalo suportado")
    )
)]
pub async fn get_agenda(
    State(app_state): State<AppState>,
    locale: Locale,
    QueryParams(query): QueryParams<ReferenciaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let hoje = query.hoje().map_err(|app_err| app_err.to_api_error(&locale))?;

    let agenda = app_state.dashboard_service.get_agenda(hoje).await;

    Ok((StatusCode::OK, Json(agenda)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_near_calendar_limits_is_rejected() {
        let query = |referencia| ReferenciaQuery { referencia: Some(referencia) };

        assert!(query(NaiveDate::MAX).hoje().is_err());
        assert!(query(NaiveDate::MIN).hoje().is_err());

        let dia = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(query(dia).hoje().unwrap(), dia);
    }
}
