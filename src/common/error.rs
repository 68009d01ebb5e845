// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Erros do domínio e da infraestrutura. Os handlers convertem para `ApiError`
// (com a mensagem no idioma do cliente) antes de responder.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Valores de formulário que não puderam ser convertidos (ex: "12,x" em valorNegociado)
    #[error("Campo inválido: {field} ({code})")]
    InvalidField {
        field: &'static str,
        code: &'static str,
    },

    // Corpo JSON ou query string que nem chegou a ser desserializado
    #[error("Requisição inválida: {0}")]
    InvalidRequest(String),

    #[error("Cliente não encontrado: {0}")]
    ClienteNaoEncontrado(String),

    #[error("Visita não encontrada: {0}")]
    VisitaNaoEncontrada(String),

    #[error("Nenhum cliente da rota possui endereço completo")]
    SemEnderecos,

    #[error("Cliente sem endereço completo: {0}")]
    EnderecoIncompleto(String),

    #[error("Chave de armazenamento inválida: {0}")]
    InvalidStoreKey(String),

    #[error("Erro de E/S no armazenamento: {0}")]
    StorageIo(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidField { .. }
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ClienteNaoEncontrado(_) | AppError::VisitaNaoEncontrada(_) => StatusCode::NOT_FOUND,
            AppError::SemEnderecos | AppError::EnderecoIncompleto(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Código estável, pensado para o frontend traduzir ou testar.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::InvalidField { code, .. } => *code,
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::ClienteNaoEncontrado(_) => "cliente_not_found",
            AppError::VisitaNaoEncontrada(_) => "visita_not_found",
            AppError::SemEnderecos => "route_without_addresses",
            AppError::EnderecoIncompleto(_) => "incomplete_address",
            _ => "internal_error",
        }
    }

    fn message(&self, lang: &str) -> String {
        let en = lang == "en";
        match self {
            AppError::ValidationError(_) if en => "One or more fields are invalid.".into(),
            AppError::ValidationError(_) => "Um ou mais campos são inválidos.".into(),
            AppError::InvalidField { field, .. } if en => format!("Invalid value for '{field}'."),
            AppError::InvalidField { field, .. } => format!("Valor inválido para '{field}'."),
            AppError::InvalidRequest(detalhe) if en => format!("Malformed request: {detalhe}"),
            AppError::InvalidRequest(detalhe) => format!("Requisição malformada: {detalhe}"),
            AppError::ClienteNaoEncontrado(_) if en => "Client not found.".into(),
            AppError::ClienteNaoEncontrado(_) => "Cliente não encontrado.".into(),
            AppError::VisitaNaoEncontrada(_) if en => "Visit not found.".into(),
            AppError::VisitaNaoEncontrada(_) => "Visita não encontrada.".into(),
            AppError::SemEnderecos if en => "No client in this route has a complete address.".into(),
            AppError::SemEnderecos => "Nenhum cliente possui endereço completo cadastrado.".into(),
            AppError::EnderecoIncompleto(_) if en => "Client has no complete address.".into(),
            AppError::EnderecoIncompleto(_) => "Cliente não possui endereço completo cadastrado.".into(),
            _ if en => "An unexpected error occurred.".into(),
            _ => "Ocorreu um erro inesperado.".into(),
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica no log, o cliente recebe só a mensagem genérica
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let mut body = json!({
            "error": self.message(&locale.0),
            "code": self.code(),
        });

        // Retorna todos os detalhes da validação, campo a campo.
        if let AppError::ValidationError(errors) = self {
            let mut details: HashMap<String, Vec<String>> = HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
            body["details"] = json!(details);
        }

        ApiError { status, body }
    }
}

// Erro já pronto para virar resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn not_found_maps_to_404_with_stable_code() {
        let err = AppError::ClienteNaoEncontrado("abc".into());
        let api = err.to_api_error(&Locale("pt".into()));
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.body["code"], "cliente_not_found");
        assert_eq!(api.body["error"], "Cliente não encontrado.");
    }

    #[test]
    fn messages_follow_locale() {
        let err = AppError::SemEnderecos;
        let api = err.to_api_error(&Locale("en".into()));
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.body["error"], "No client in this route has a complete address.");
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = ValidationErrors::new();
        let mut e = ValidationError::new("length");
        e.message = Some("required".into());
        errors.add("nome", e);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.body["details"]["nome"][0], "required");
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::InternalServerError(anyhow::anyhow!("segredo"));
        let api = err.to_api_error(&Locale("pt".into()));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.body["error"].as_str().unwrap().contains("segredo"));
    }
}
