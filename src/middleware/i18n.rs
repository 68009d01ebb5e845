// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

// Idioma usado nas mensagens de erro ("pt" ou "en")
pub struct Locale(pub String);

const IDIOMAS_SUPORTADOS: [&str; 2] = ["pt", "en"];

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}

impl Locale {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let lang = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(resolve_language)
            .unwrap_or_else(|| "pt".to_string());

        Locale(lang)
    }
}

// "pt-BR,en;q=0.8" -> "pt". Idiomas que não atendemos caem no português.
fn resolve_language(header_str: &str) -> String {
    accept_language::parse(header_str)
        .iter()
        .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
        .find(|lang| IDIOMAS_SUPORTADOS.contains(&lang.as_str()))
        .unwrap_or_else(|| "pt".to_string())
}
