// src/handlers/crm.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::extract::{JsonBody, QueryParams},
    handlers::forms::{
        self, validate_horario, validate_preenchido, CampoSimNao, CampoValor,
    },
    middleware::i18n::Locale,
    models::crm::{
        AtualizacaoCliente, AtualizacaoVisita, Cliente, NovaVisita, NovoCliente, StatusCliente,
        StatusVisita, TipoVisita, Visita,
    },
};

// =============================================================================
//  ÁREA 1: CLIENTES
// =============================================================================

// Campos obrigatórios têm `default` para que a ausência caia na validação (400)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientePayload {
    #[serde(default)]
    #[validate(custom(function = "validate_preenchido"))]
    #[schema(example = "Ana Souza")]
    pub nome: String,

    #[serde(default)]
    #[validate(custom(function = "validate_preenchido"))]
    #[schema(example = "Mercado Central")]
    pub empresa: String,

    #[serde(default)]
    #[validate(custom(function = "validate_preenchido"))]
    #[schema(example = "(11) 99999-8888")]
    pub telefone: String,

    #[serde(default)]
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "ana@mercado.com")]
    pub email: String,

    #[serde(default)]
    #[schema(example = "Rua das Flores, 123")]
    pub endereco: String,

    #[serde(default)]
    #[validate(custom(function = "validate_preenchido"))]
    #[schema(example = "São Paulo")]
    pub cidade: String,

    #[serde(default)]
    #[validate(custom(function = "validate_preenchido"))]
    #[schema(example = "SP")]
    pub estado: String,

    #[serde(default)]
    #[schema(example = "Varejo")]
    pub segmento: String,

    #[serde(default)]
    pub status: StatusCliente,

    pub observacoes: Option<String>,
}

impl CreateClientePayload {
    fn into_novo(self) -> NovoCliente {
        NovoCliente {
            nome: self.nome.trim().to_string(),
            empresa: self.empresa.trim().to_string(),
            telefone: self.telefone.trim().to_string(),
            email: self.email.trim().to_string(),
            endereco: self.endereco.trim().to_string(),
            cidade: self.cidade.trim().to_string(),
            estado: self.estado.trim().to_string(),
            segmento: self.segmento.trim().to_string(),
            status: self.status,
            observacoes: forms::texto_opcional(self.observacoes),
        }
    }
}

// Atualização parcial: só os campos presentes mudam. observacoes = "" apaga.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientePayload {
    #[validate(custom(function = "validate_preenchido"))]
    pub nome: Option<String>,
    #[validate(custom(function = "validate_preenchido"))]
    pub empresa: Option<String>,
    #[validate(custom(function = "validate_preenchido"))]
    pub telefone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub endereco: Option<String>,
    #[validate(custom(function = "validate_preenchido"))]
    pub cidade: Option<String>,
    #[validate(custom(function = "validate_preenchido"))]
    pub estado: Option<String>,
    pub segmento: Option<String>,
    pub status: Option<StatusCliente>,
    pub observacoes: Option<String>,
}

impl UpdateClientePayload {
    fn into_atualizacao(self) -> AtualizacaoCliente {
        let limpar = |v: Option<String>| v.map(|s| s.trim().to_string());
        AtualizacaoCliente {
            nome: limpar(self.nome),
            empresa: limpar(self.empresa),
            telefone: limpar(self.telefone),
            email: limpar(self.email),
            endereco: limpar(self.endereco),
            cidade: limpar(self.cidade),
            estado: limpar(self.estado),
            segmento: limpar(self.segmento),
            status: self.status,
            observacoes: forms::atualizacao_texto(self.observacoes),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListClientesQuery {
    /// Termo buscado em nome, empresa e cidade
    pub busca: Option<String>,
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(ListClientesQuery),
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Cliente>)
    )
)]
pub async fn list_clientes(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<ListClientesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let clientes = app_state.crm_service
        .list_clientes(query.busca.as_deref())
        .await;

    Ok((StatusCode::OK, Json(clientes)))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CreateClientePayload,
    responses(
        (status = 201, description = "Cliente criado", body = Cliente),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    JsonBody(payload): JsonBody<CreateClientePayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cliente = app_state.crm_service
        .create_cliente(payload.into_novo())
        .await;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Cliente),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cliente = app_state.crm_service
        .get_cliente(&id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(cliente)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = UpdateClientePayload,
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Cliente),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateClientePayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cliente = app_state.crm_service
        .update_cliente(&id, payload.into_atualizacao())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(cliente)))
}

// DELETE /api/clientes/{id} (apaga também as visitas do cliente)
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente e visitas removidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn delete_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let removidas = app_state.crm_service
        .delete_cliente(&id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(json!({ "id": id, "visitasRemovidas": removidas }))))
}

// =============================================================================
//  ÁREA 2: VISITAS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitaPayload {
    #[serde(default)]
    #[validate(custom(function = "validate_preenchido"))]
    pub cliente_id: String,

    #[validate(required(message = "required"))]
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-10")]
    pub data: Option<NaiveDate>,

    #[serde(default)]
    #[validate(custom(function = "validate_horario"))]
    #[schema(example = "14:30")]
    pub horario: String,

    #[serde(default)]
    pub tipo: TipoVisita,

    #[serde(default)]
    pub status: StatusVisita,

    #[serde(default)]
    #[validate(custom(function = "validate_preenchido"))]
    #[schema(example = "Apresentar catálogo")]
    pub objetivo: String,

    pub resultado: Option<String>,
    pub proxima_acao: Option<String>,

    // Número ou texto do formulário ("1.500,00"); vazio = não informado
    #[schema(value_type = Option<String>, example = "1.500,00")]
    pub valor_negociado: Option<CampoValor>,

    // Booleano ou "sim"/"nao"
    #[schema(value_type = Option<String>, example = "sim")]
    pub venda_realizada: Option<CampoSimNao>,
}

impl CreateVisitaPayload {
    fn into_nova(self) -> Result<NovaVisita, AppError> {
        let data = self.data.ok_or(AppError::InvalidField {
            field: "data",
            code: "required",
        })?;

        Ok(NovaVisita {
            cliente_id: self.cliente_id.trim().to_string(),
            data,
            horario: self.horario,
            tipo: self.tipo,
            status: self.status,
            objetivo: self.objetivo.trim().to_string(),
            resultado: forms::texto_opcional(self.resultado),
            proxima_acao: forms::texto_opcional(self.proxima_acao),
            valor_negociado: self
                .valor_negociado
                .as_ref()
                .map(forms::valor_negociado)
                .transpose()?
                .flatten(),
            venda_realizada: self
                .venda_realizada
                .as_ref()
                .map(forms::venda_realizada)
                .transpose()?
                .flatten(),
        })
    }
}

// Atualização parcial. Em resultado/proximaAcao/valorNegociado/vendaRealizada,
// texto vazio apaga o valor.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisitaPayload {
    #[validate(custom(function = "validate_preenchido"))]
    pub cliente_id: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data: Option<NaiveDate>,
    #[validate(custom(function = "validate_horario"))]
    pub horario: Option<String>,
    pub tipo: Option<TipoVisita>,
    pub status: Option<StatusVisita>,
    #[validate(custom(function = "validate_preenchido"))]
    pub objetivo: Option<String>,
    pub resultado: Option<String>,
    pub proxima_acao: Option<String>,
    #[schema(value_type = Option<String>)]
    pub valor_negociado: Option<CampoValor>,
    #[schema(value_type = Option<String>)]
    pub venda_realizada: Option<CampoSimNao>,
}

impl UpdateVisitaPayload {
    fn into_atualizacao(self) -> Result<AtualizacaoVisita, AppError> {
        Ok(AtualizacaoVisita {
            cliente_id: self.cliente_id.map(|id| id.trim().to_string()),
            data: self.data,
            horario: self.horario,
            tipo: self.tipo,
            status: self.status,
            objetivo: self.objetivo.map(|o| o.trim().to_string()),
            resultado: forms::atualizacao_texto(self.resultado),
            proxima_acao: forms::atualizacao_texto(self.proxima_acao),
            valor_negociado: self
                .valor_negociado
                .as_ref()
                .map(forms::valor_negociado)
                .transpose()?,
            venda_realizada: self
                .venda_realizada
                .as_ref()
                .map(forms::venda_realizada)
                .transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListVisitasQuery {
    /// "todas", "agendada", "realizada" ou "cancelada"
    pub status: Option<String>,
}

fn parse_filtro_status(status: Option<&str>) -> Result<Option<StatusVisita>, AppError> {
    match status.map(str::trim) {
        None | Some("") | Some("todas") => Ok(None),
        Some(s) => serde_json::from_value(json!(s))
            .map(Some)
            .map_err(|_| AppError::InvalidField {
                field: "status",
                code: "invalid_status",
            }),
    }
}

// GET /api/visitas
#[utoipa::path(
    get,
    path = "/api/visitas",
    tag = "Visitas",
    params(ListVisitasQuery),
    responses(
        (status = 200, description = "Visitas, da mais recente para a mais antiga", body = Vec<Visita>),
        (status = 400, description = "Filtro de status inválido")
    )
)]
pub async fn list_visitas(
    State(app_state): State<AppState>,
    locale: Locale,
    QueryParams(query): QueryParams<ListVisitasQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = parse_filtro_status(query.status.as_deref())
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    let visitas = app_state.crm_service.list_visitas(status).await;

    Ok((StatusCode::OK, Json(visitas)))
}

// POST /api/visitas
#[utoipa::path(
    post,
    path = "/api/visitas",
    tag = "Visitas",
    request_body = CreateVisitaPayload,
    responses(
        (status = 201, description = "Visita criada", body = Visita),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn create_visita(
    State(app_state): State<AppState>,
    locale: Locale,
    JsonBody(payload): JsonBody<CreateVisitaPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let nova = payload
        .into_nova()
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    let visita = app_state.crm_service
        .create_visita(nova)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(visita)))
}

// GET /api/visitas/{id}
#[utoipa::path(
    get,
    path = "/api/visitas/{id}",
    tag = "Visitas",
    params(("id" = String, Path, description = "ID da visita")),
    responses(
        (status = 200, description = "Visita", body = Visita),
        (status = 404, description = "Visita não encontrada")
    )
)]
pub async fn get_visita(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let visita = app_state.crm_service
        .get_visita(&id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(visita)))
}

// PUT /api/visitas/{id}
#[utoipa::path(
    put,
    path = "/api/visitas/{id}",
    tag = "Visitas",
    request_body = UpdateVisitaPayload,
    params(("id" = String, Path, description = "ID da visita")),
    responses(
        (status = 200, description = "Visita atualizada", body = Visita),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Visita ou cliente não encontrado")
    )
)]
pub async fn update_visita(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateVisitaPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let atualizacao = payload
        .into_atualizacao()
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    let visita = app_state.crm_service
        .update_visita(&id, atualizacao)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(visita)))
}

// DELETE /api/visitas/{id}
#[utoipa::path(
    delete,
    path = "/api/visitas/{id}",
    tag = "Visitas",
    params(("id" = String, Path, description = "ID da visita")),
    responses(
        (status = 204, description = "Visita removida"),
        (status = 404, description = "Visita não encontrada")
    )
)]
pub async fn delete_visita(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.crm_service
        .delete_visita(&id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn status_filter_accepts_todas_and_known_statuses() {
        assert_eq!(parse_filtro_status(None).unwrap(), None);
        assert_eq!(parse_filtro_status(Some("todas")).unwrap(), None);
        assert_eq!(
            parse_filtro_status(Some("realizada")).unwrap(),
            Some(StatusVisita::Realizada)
        );
        assert!(parse_filtro_status(Some("perdida")).is_err());
    }

    #[test]
    fn create_payload_reports_every_missing_field() {
        let payload: CreateClientePayload = serde_json::from_value(json!({})).unwrap();
        let errors = payload.validate().unwrap_err();
        let campos = errors.field_errors();
        for campo in ["nome", "empresa", "telefone", "email", "cidade", "estado"] {
            assert!(campos.contains_key(campo), "faltou erro para {campo}");
        }
        assert!(!campos.contains_key("endereco"));
    }

    #[test]
    fn visit_payload_converts_form_values() {
        let payload: CreateVisitaPayload = serde_json::from_value(json!({
            "clienteId": "c1",
            "data": "2024-01-10",
            "horario": "09:00",
            "objetivo": "Demo",
            "resultado": "",
            "valorNegociado": "2.500,00",
            "vendaRealizada": "sim"
        }))
        .unwrap();
        assert!(payload.validate().is_ok());

        let nova = payload.into_nova().unwrap();
        assert_eq!(nova.valor_negociado, Some(Decimal::from(2500)));
        assert_eq!(nova.venda_realizada, Some(true));
        assert_eq!(nova.resultado, None);
        assert_eq!(nova.status, StatusVisita::Agendada);
        assert_eq!(nova.tipo, TipoVisita::Presencial);
    }

    #[test]
    fn visit_update_with_empty_amount_clears_it() {
        let payload: UpdateVisitaPayload = serde_json::from_value(json!({
            "valorNegociado": "",
            "vendaRealizada": false
        }))
        .unwrap();

        let atualizacao = payload.into_atualizacao().unwrap();
        assert_eq!(atualizacao.valor_negociado, Some(None));
        assert_eq!(atualizacao.venda_realizada, Some(Some(false)));
        assert_eq!(atualizacao.horario, None);
    }
}
