// src/models/rotas.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::crm::Cliente;

// Dias úteis oferecidos no planejamento de rota
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiaRota {
    Segunda,
    Terca,
    Quarta,
    Quinta,
    Sexta,
}

impl DiaRota {
    pub fn label(self) -> &'static str {
        match self {
            DiaRota::Segunda => "Segunda-feira",
            DiaRota::Terca => "Terça-feira",
            DiaRota::Quarta => "Quarta-feira",
            DiaRota::Quinta => "Quinta-feira",
            DiaRota::Sexta => "Sexta-feira",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParadaRota {
    pub ordem: usize, // 1-based
    pub cliente: Cliente,
    pub visitas_agendadas: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RotaSugerida {
    pub cidade: String,
    #[schema(example = "Segunda-feira")]
    pub dia: String,
    pub paradas: Vec<ParadaRota>,
    pub total_clientes: usize,
    // Heurísticas de exibição, não há cálculo real de distância
    pub distancia_estimada_km: usize,
    pub duracao_estimada_min: usize,
    pub total_visitas_agendadas: usize,
}

/// Ponto de partida para os links do Maps.
#[derive(Debug, Clone, PartialEq)]
pub enum OrigemRota {
    Coordenadas { lat: f64, lng: f64 },
    Endereco(String),
}

impl OrigemRota {
    // Coordenadas têm prioridade; endereço em branco é ignorado.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>, partida: Option<&str>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Some(OrigemRota::Coordenadas { lat, lng }),
            _ => partida
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| OrigemRota::Endereco(p.to_string())),
        }
    }

    pub fn as_segment(&self) -> String {
        match self {
            OrigemRota::Coordenadas { lat, lng } => format!("{lat},{lng}"),
            OrigemRota::Endereco(endereco) => endereco.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkMapa {
    #[schema(example = "https://www.google.com/maps/dir/Rua%20A,%20S%C3%A3o%20Paulo")]
    pub url: String,
    pub destinos: usize,
}
