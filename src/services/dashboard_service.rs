// src/services/dashboard_service.rs

use std::cmp::Reverse;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::{
    db::SharedCrmRepository,
    models::{
        crm::{Cliente, StatusCliente, StatusVisita, Visita},
        dashboard::{DiaAgenda, Metricas, PainelDashboard, ResumoPeriodo, ResumoVisitas},
    },
};

// Quantidade de itens nas listas "próximas" e "últimas" visitas
const LIMITE_LISTAS: usize = 5;
const DIAS_AGENDA: u64 = 7;

#[derive(Clone)]
pub struct DashboardService {
    repo: SharedCrmRepository,
    primeiro_dia_semana: Weekday,
}

impl DashboardService {
    pub fn new(repo: SharedCrmRepository, primeiro_dia_semana: Weekday) -> Self {
        Self { repo, primeiro_dia_semana }
    }

    pub async fn get_painel(&self) -> PainelDashboard {
        let repo = self.repo.read().await;
        montar_painel(repo.clientes(), repo.visitas())
    }

    pub async fn get_resumo(&self, hoje: NaiveDate) -> ResumoVisitas {
        let repo = self.repo.read().await;
        resumir_visitas(repo.visitas(), hoje, self.primeiro_dia_semana)
    }

    pub async fn get_agenda(&self, hoje: NaiveDate) -> Vec<DiaAgenda> {
        let repo = self.repo.read().await;
        montar_agenda(repo.visitas(), hoje)
    }
}

// =========================================================================
//  FUNÇÕES PURAS (não mexem nas coleções recebidas)
// =========================================================================

pub fn calcular_metricas(clientes: &[Cliente], visitas: &[Visita]) -> Metricas {
    let contar = |status: StatusVisita| visitas.iter().filter(|v| v.status == status).count();

    // Só entram os valores informados; ausente não conta como zero
    let valor_total_negociado = visitas
        .iter()
        .filter_map(|v| v.valor_negociado)
        .sum::<Decimal>();

    let convertidas = visitas
        .iter()
        .filter(|v| v.status == StatusVisita::Realizada && v.valor_negociado.is_some())
        .count();

    Metricas {
        total_clientes: clientes.len(),
        clientes_ativos: clientes.iter().filter(|c| c.status == StatusCliente::Ativo).count(),
        visitas_realizadas: contar(StatusVisita::Realizada),
        visitas_agendadas: contar(StatusVisita::Agendada),
        valor_total_negociado,
        taxa_conversao: percentual(convertidas, visitas.len()),
    }
}

pub fn montar_painel(clientes: &[Cliente], visitas: &[Visita]) -> PainelDashboard {
    let mut proximas: Vec<Visita> = visitas
        .iter()
        .filter(|v| v.status == StatusVisita::Agendada)
        .cloned()
        .collect();
    proximas.sort_by(|a, b| (a.data, &a.horario).cmp(&(b.data, &b.horario)));
    proximas.truncate(LIMITE_LISTAS);

    let mut ultimas: Vec<Visita> = visitas
        .iter()
        .filter(|v| v.status == StatusVisita::Realizada)
        .cloned()
        .collect();
    ultimas.sort_by_key(|v| Reverse((v.data, v.horario.clone())));
    ultimas.truncate(LIMITE_LISTAS);

    PainelDashboard {
        metricas: calcular_metricas(clientes, visitas),
        proximas_visitas: proximas,
        ultimas_visitas: ultimas,
    }
}

/// Início da semana que contém `dia`, dado o primeiro dia da semana do locale.
pub fn inicio_da_semana(dia: NaiveDate, primeiro_dia: Weekday) -> NaiveDate {
    let offset = (dia.weekday().num_days_from_monday() + 7 - primeiro_dia.num_days_from_monday()) % 7;
    // Perto de NaiveDate::MIN a semana fica truncada no menor dia representável
    dia.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MIN)
}

pub fn inicio_do_mes(dia: NaiveDate) -> NaiveDate {
    dia.with_day(1).unwrap_or(dia)
}

pub fn resumir_periodo(visitas: &[Visita], inicio: NaiveDate, fim: NaiveDate) -> ResumoPeriodo {
    let no_periodo: Vec<&Visita> = visitas
        .iter()
        .filter(|v| v.status == StatusVisita::Realizada && v.data >= inicio && v.data <= fim)
        .collect();
    let vendas = no_periodo
        .iter()
        .filter(|v| v.venda_realizada == Some(true))
        .count();

    ResumoPeriodo {
        inicio,
        fim,
        visitas: no_periodo.len(),
        vendas,
        taxa_conversao: percentual(vendas, no_periodo.len()),
    }
}

pub fn resumir_visitas(visitas: &[Visita], hoje: NaiveDate, primeiro_dia: Weekday) -> ResumoVisitas {
    ResumoVisitas {
        semanal: resumir_periodo(visitas, inicio_da_semana(hoje, primeiro_dia), hoje),
        mensal: resumir_periodo(visitas, inicio_do_mes(hoje), hoje),
    }
}

pub fn montar_agenda(visitas: &[Visita], hoje: NaiveDate) -> Vec<DiaAgenda> {
    // Dias além de NaiveDate::MAX simplesmente não aparecem
    (0..DIAS_AGENDA)
        .map_while(|i| hoje.checked_add_days(Days::new(i)).map(|data| (i, data)))
        .map(|(i, data)| {
            let mut do_dia: Vec<Visita> = visitas
                .iter()
                .filter(|v| v.status == StatusVisita::Agendada && v.data == data)
                .cloned()
                .collect();
            // HH:MM tem largura fixa, então a ordem de string basta
            do_dia.sort_by(|a, b| a.horario.cmp(&b.horario));

            DiaAgenda {
                data,
                dia_semana: nome_dia_semana(data.weekday()).to_string(),
                hoje: i == 0,
                visitas: do_dia,
            }
        })
        .collect()
}

pub fn nome_dia_semana(dia: Weekday) -> &'static str {
    match dia {
        Weekday::Sun => "Domingo",
        Weekday::Mon => "Segunda",
        Weekday::Tue => "Terça",
        Weekday::Wed => "Quarta",
        Weekday::Thu => "Quinta",
        Weekday::Fri => "Sexta",
        Weekday::Sat => "Sábado",
    }
}

fn percentual(parte: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    parte as f64 / total as f64 * 100.0
}
