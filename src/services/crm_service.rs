// src/services/crm_service.rs

use std::cmp::Reverse;

use crate::{
    common::error::AppError,
    db::SharedCrmRepository,
    models::crm::{
        AtualizacaoCliente, AtualizacaoVisita, Cliente, NovaVisita, NovoCliente, StatusVisita, Visita,
    },
};

#[derive(Clone)]
pub struct CrmService {
    repo: SharedCrmRepository,
}

impl CrmService {
    pub fn new(repo: SharedCrmRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  1. CLIENTES
    // =========================================================================

    pub async fn list_clientes(&self, busca: Option<&str>) -> Vec<Cliente> {
        let repo = self.repo.read().await;
        filtrar_clientes(repo.clientes(), busca.unwrap_or_default())
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get_cliente(&self, id: &str) -> Result<Cliente, AppError> {
        self.repo
            .read()
            .await
            .find_cliente(id)
            .cloned()
            .ok_or_else(|| AppError::ClienteNaoEncontrado(id.to_string()))
    }

    pub async fn create_cliente(&self, novo: NovoCliente) -> Cliente {
        self.repo.write().await.add_cliente(novo).await
    }

    pub async fn update_cliente(
        &self,
        id: &str,
        atualizacao: AtualizacaoCliente,
    ) -> Result<Cliente, AppError> {
        self.repo.write().await.update_cliente(id, atualizacao).await
    }

    pub async fn delete_cliente(&self, id: &str) -> Result<usize, AppError> {
        self.repo.write().await.delete_cliente(id).await
    }

    // =========================================================================
    //  2. VISITAS
    // =========================================================================

    pub async fn list_visitas(&self, status: Option<StatusVisita>) -> Vec<Visita> {
        let repo = self.repo.read().await;
        listar_visitas(repo.visitas(), status)
    }

    pub async fn get_visita(&self, id: &str) -> Result<Visita, AppError> {
        self.repo
            .read()
            .await
            .find_visita(id)
            .cloned()
            .ok_or_else(|| AppError::VisitaNaoEncontrada(id.to_string()))
    }

    pub async fn create_visita(&self, nova: NovaVisita) -> Result<Visita, AppError> {
        self.repo.write().await.add_visita(nova).await
    }

    pub async fn update_visita(
        &self,
        id: &str,
        atualizacao: AtualizacaoVisita,
    ) -> Result<Visita, AppError> {
        self.repo.write().await.update_visita(id, atualizacao).await
    }

    pub async fn delete_visita(&self, id: &str) -> Result<(), AppError> {
        self.repo.write().await.delete_visita(id).await
    }
}

/// Busca por nome, empresa ou cidade (sem diferenciar maiúsculas). Termo vazio devolve tudo.
pub fn filtrar_clientes<'a>(clientes: &'a [Cliente], termo: &str) -> Vec<&'a Cliente> {
    let termo = termo.trim().to_lowercase();
    clientes
        .iter()
        .filter(|c| {
            termo.is_empty()
                || c.nome.to_lowercase().contains(&termo)
                || c.empresa.to_lowercase().contains(&termo)
                || c.cidade.to_lowercase().contains(&termo)
        })
        .collect()
}

/// Filtra por status (None = todas) e ordena da data mais recente para a mais antiga.
pub fn listar_visitas(visitas: &[Visita], status: Option<StatusVisita>) -> Vec<Visita> {
    let mut lista: Vec<Visita> = visitas
        .iter()
        .filter(|v| status.is_none_or(|s| v.status == s))
        .cloned()
        .collect();
    lista.sort_by_key(|v| Reverse(v.data));
    lista
}
