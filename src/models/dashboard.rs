// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::crm::Visita;

// 1. Os Cards do Topo
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metricas {
    pub total_clientes: usize,
    pub clientes_ativos: usize,
    pub visitas_realizadas: usize,
    pub visitas_agendadas: usize,
    #[schema(value_type = f64)]
    pub valor_total_negociado: Decimal,
    pub taxa_conversao: f64, // Percentual (0 a 100)
}

// 2. Painel completo: métricas + listas laterais
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PainelDashboard {
    pub metricas: Metricas,
    pub proximas_visitas: Vec<Visita>,
    pub ultimas_visitas: Vec<Visita>,
}

// 3. Resumo automático (semana e mês)
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoPeriodo {
    #[schema(value_type = String, format = Date)]
    pub inicio: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub fim: NaiveDate,
    pub visitas: usize,
    pub vendas: usize,
    pub taxa_conversao: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoVisitas {
    pub semanal: ResumoPeriodo,
    pub mensal: ResumoPeriodo,
}

// 4. Agenda dos próximos 7 dias
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaAgenda {
    #[schema(value_type = String, format = Date)]
    pub data: NaiveDate,
    #[schema(example = "Segunda")]
    pub dia_semana: String,
    pub hoje: bool,
    pub visitas: Vec<Visita>,
}
