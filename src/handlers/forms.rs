// src/handlers/forms.rs
//
// Conversão dos valores "de formulário" para os tipos do domínio.
// Só a camada HTTP conhece texto vazio, "sim"/"nao" e vírgula decimal.

use std::str::FromStr;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::ValidationError;

use crate::common::error::AppError;

/// Valor monetário vindo como número JSON ou como texto digitado ("1.500,50").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CampoValor {
    Numero(Decimal),
    Texto(String),
}

/// Sim/não vindo como booleano ou como texto do select ("sim", "nao").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CampoSimNao {
    Booleano(bool),
    Texto(String),
}

// Texto vazio significa "não informado"
pub fn valor_negociado(campo: &CampoValor) -> Result<Option<Decimal>, AppError> {
    let invalido = |code| AppError::InvalidField { field: "valorNegociado", code };

    let valor = match campo {
        CampoValor::Numero(valor) => *valor,
        CampoValor::Texto(texto) => {
            let texto = texto.trim();
            if texto.is_empty() {
                return Ok(None);
            }
            // Formato brasileiro: ponto de milhar, vírgula decimal
            let normalizado = if texto.contains(',') {
                texto.replace('.', "").replace(',', ".")
            } else {
                texto.to_string()
            };
            Decimal::from_str(&normalizado).map_err(|_| invalido("invalid_number"))?
        }
    };

    if valor.is_sign_negative() && !valor.is_zero() {
        return Err(invalido("negative_value"));
    }
    Ok(Some(valor))
}

pub fn venda_realizada(campo: &CampoSimNao) -> Result<Option<bool>, AppError> {
    match campo {
        CampoSimNao::Booleano(valor) => Ok(Some(*valor)),
        CampoSimNao::Texto(texto) => match texto.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "sim" | "true" => Ok(Some(true)),
            "nao" | "não" | "false" => Ok(Some(false)),
            _ => Err(AppError::InvalidField {
                field: "vendaRealizada",
                code: "invalid_boolean",
            }),
        },
    }
}

/// Texto opcional na criação: vazio vira None.
pub fn texto_opcional(valor: Option<String>) -> Option<String> {
    valor
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Texto opcional na edição: ausente mantém, vazio apaga, preenchido substitui.
pub fn atualizacao_texto(valor: Option<String>) -> Option<Option<String>> {
    valor.map(|v| texto_opcional(Some(v)))
}

pub fn validate_preenchido(texto: &str) -> Result<(), ValidationError> {
    if texto.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("required".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_horario(horario: &str) -> Result<(), ValidationError> {
    let formato_ok = horario.len() == 5 && NaiveTime::parse_from_str(horario, "%H:%M").is_ok();
    if !formato_ok {
        let mut err = ValidationError::new("horario");
        err.message = Some("invalid_time".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texto(s: &str) -> CampoValor {
        CampoValor::Texto(s.to_string())
    }

    #[test]
    fn parses_amounts_in_both_notations() {
        assert_eq!(valor_negociado(&texto("1500")).unwrap(), Some(Decimal::from(1500)));
        assert_eq!(valor_negociado(&texto("1.500,50")).unwrap(), Some(Decimal::new(150050, 2)));
        assert_eq!(valor_negociado(&texto("99.9")).unwrap(), Some(Decimal::new(999, 1)));
        assert_eq!(
            valor_negociado(&CampoValor::Numero(Decimal::from(20))).unwrap(),
            Some(Decimal::from(20))
        );
    }

    #[test]
    fn empty_amount_means_not_informed() {
        assert_eq!(valor_negociado(&texto("  ")).unwrap(), None);
    }

    #[test]
    fn rejects_negative_or_garbage_amounts() {
        assert!(matches!(
            valor_negociado(&texto("-10")),
            Err(AppError::InvalidField { code: "negative_value", .. })
        ));
        assert!(matches!(
            valor_negociado(&texto("dez reais")),
            Err(AppError::InvalidField { code: "invalid_number", .. })
        ));
    }

    #[test]
    fn sale_flag_accepts_form_and_json_values() {
        let t = |s: &str| CampoSimNao::Texto(s.to_string());
        assert_eq!(venda_realizada(&t("sim")).unwrap(), Some(true));
        assert_eq!(venda_realizada(&t("nao")).unwrap(), Some(false));
        assert_eq!(venda_realizada(&t("Não")).unwrap(), Some(false));
        assert_eq!(venda_realizada(&t("")).unwrap(), None);
        assert_eq!(venda_realizada(&CampoSimNao::Booleano(true)).unwrap(), Some(true));
        assert!(venda_realizada(&t("talvez")).is_err());
    }

    #[test]
    fn untagged_fields_deserialize_from_numbers_and_strings() {
        let numero: CampoValor = serde_json::from_str("1200.5").unwrap();
        assert!(matches!(numero, CampoValor::Numero(_)));
        let texto: CampoValor = serde_json::from_str("\"1.200,50\"").unwrap();
        assert!(matches!(texto, CampoValor::Texto(_)));
        let flag: CampoSimNao = serde_json::from_str("false").unwrap();
        assert!(matches!(flag, CampoSimNao::Booleano(false)));
    }

    #[test]
    fn optional_text_helpers() {
        assert_eq!(texto_opcional(Some("  ".into())), None);
        assert_eq!(texto_opcional(Some(" ok ".into())).as_deref(), Some("ok"));
        assert_eq!(atualizacao_texto(None), None);
        assert_eq!(atualizacao_texto(Some(String::new())), Some(None));
    }

    #[test]
    fn blank_text_is_not_filled() {
        assert!(validate_preenchido("Ana").is_ok());
        assert!(validate_preenchido("   ").is_err());
    }

    #[test]
    fn time_must_be_hh_mm() {
        assert!(validate_horario("09:30").is_ok());
        assert!(validate_horario("23:59").is_ok());
        assert!(validate_horario("9:30").is_err());
        assert!(validate_horario("24:00").is_err());
        assert!(validate_horario("09:30:00").is_err());
    }
}
