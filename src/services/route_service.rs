// src/services/route_service.rs

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use url::Url;

use crate::{
    common::error::AppError,
    db::SharedCrmRepository,
    models::{
        crm::{Cliente, StatusCliente, StatusVisita, Visita},
        rotas::{DiaRota, LinkMapa, OrigemRota, ParadaRota, RotaSugerida},
    },
};

// Estimativas fixas por cliente na rota
pub const KM_POR_CLIENTE: usize = 15;
pub const MINUTOS_POR_CLIENTE: usize = 45;

// O Google Maps aceita no máximo 10 destinos na URL
pub const MAX_DESTINOS: usize = 10;

const MAPS_DIR_URL: &str = "https://www.google.com/maps/dir";
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";
const DIA_PADRAO: &str = "Dia selecionado";

#[derive(Clone)]
pub struct RouteService {
    repo: SharedCrmRepository,
}

impl RouteService {
    pub fn new(repo: SharedCrmRepository) -> Self {
        Self { repo }
    }

    pub async fn list_cidades(&self) -> Vec<String> {
        cidades_disponiveis(self.repo.read().await.clientes())
    }

    pub async fn get_sugestao(&self, cidade: &str, dia: Option<DiaRota>) -> RotaSugerida {
        let repo = self.repo.read().await;
        sugerir_rota(repo.clientes(), repo.visitas(), cidade, dia)
    }

    pub async fn get_link_rota(
        &self,
        cidade: &str,
        dia: Option<DiaRota>,
        origem: Option<&OrigemRota>,
    ) -> Result<LinkMapa, AppError> {
        let rota = self.get_sugestao(cidade, dia).await;
        link_rota(&rota, origem)
    }

    pub async fn get_link_cliente(
        &self,
        cliente_id: &str,
        origem: Option<&OrigemRota>,
    ) -> Result<LinkMapa, AppError> {
        let repo = self.repo.read().await;
        let cliente = repo
            .find_cliente(cliente_id)
            .ok_or_else(|| AppError::ClienteNaoEncontrado(cliente_id.to_string()))?;
        link_cliente(cliente, origem)
    }
}

/// Cidades distintas dos clientes, em ordem alfabética.
pub fn cidades_disponiveis(clientes: &[Cliente]) -> Vec<String> {
    clientes
        .iter()
        .map(|c| c.cidade.trim())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Ordena os clientes ativos da cidade: quem tem mais visitas agendadas primeiro,
/// empate resolvido pelo nome.
pub fn sugerir_rota(
    clientes: &[Cliente],
    visitas: &[Visita],
    cidade: &str,
    dia: Option<DiaRota>,
) -> RotaSugerida {
    let alvo = cidade.trim().to_lowercase();

    let mut agendadas: HashMap<&str, usize> = HashMap::new();
    for visita in visitas.iter().filter(|v| v.status == StatusVisita::Agendada) {
        *agendadas.entry(visita.cliente_id.as_str()).or_default() += 1;
    }

    let mut selecionados: Vec<(&Cliente, usize)> = if alvo.is_empty() {
        Vec::new()
    } else {
        clientes
            .iter()
            .filter(|c| c.status == StatusCliente::Ativo && c.cidade.to_lowercase().contains(&alvo))
            .map(|c| (c, agendadas.get(c.id.as_str()).copied().unwrap_or(0)))
            .collect()
    };

    selecionados.sort_by(|(a, qtd_a), (b, qtd_b)| {
        Reverse(*qtd_a)
            .cmp(&Reverse(*qtd_b))
            .then_with(|| a.nome.to_lowercase().cmp(&b.nome.to_lowercase()))
            .then_with(|| a.nome.cmp(&b.nome))
    });

    let total_clientes = selecionados.len();
    let paradas: Vec<ParadaRota> = selecionados
        .into_iter()
        .enumerate()
        .map(|(i, (cliente, visitas_agendadas))| ParadaRota {
            ordem: i + 1,
            cliente: cliente.clone(),
            visitas_agendadas,
        })
        .collect();

    RotaSugerida {
        cidade: cidade.trim().to_string(),
        dia: dia.map_or(DIA_PADRAO, DiaRota::label).to_string(),
        total_visitas_agendadas: paradas.iter().map(|p| p.visitas_agendadas).sum(),
        paradas,
        total_clientes,
        distancia_estimada_km: total_clientes * KM_POR_CLIENTE,
        duracao_estimada_min: total_clientes * MINUTOS_POR_CLIENTE,
    }
}

/// Link de rotas com até 10 destinos, na ordem sugerida.
pub fn link_rota(rota: &RotaSugerida, origem: Option<&OrigemRota>) -> Result<LinkMapa, AppError> {
    let destinos: Vec<String> = rota
        .paradas
        .iter()
        .filter_map(|p| p.cliente.endereco_completo())
        .take(MAX_DESTINOS)
        .collect();

    if destinos.is_empty() {
        return Err(AppError::SemEnderecos);
    }

    let url = url_direcoes(origem, &destinos)?;
    Ok(LinkMapa {
        url,
        destinos: destinos.len(),
    })
}

/// Link para um único cliente: rota a partir da origem, ou busca simples sem origem.
pub fn link_cliente(cliente: &Cliente, origem: Option<&OrigemRota>) -> Result<LinkMapa, AppError> {
    let endereco = cliente
        .endereco_completo()
        .ok_or_else(|| AppError::EnderecoIncompleto(cliente.id.clone()))?;

    let url = match origem {
        Some(_) => url_direcoes(origem, std::slice::from_ref(&endereco))?,
        None => Url::parse_with_params(MAPS_SEARCH_URL, &[("api", "1"), ("query", endereco.as_str())])
            .map_err(anyhow::Error::from)?
            .to_string(),
    };

    Ok(LinkMapa { url, destinos: 1 })
}

fn url_direcoes(origem: Option<&OrigemRota>, destinos: &[String]) -> Result<String, AppError> {
    let mut url = Url::parse(MAPS_DIR_URL).map_err(anyhow::Error::from)?;
    {
        let mut segmentos = url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL do Maps não aceita segmentos"))?;
        if let Some(origem) = origem {
            segmentos.push(&origem.as_segment());
        }
        for destino in destinos {
            segmentos.push(destino);
        }
    }
    Ok(url.to_string())
}
