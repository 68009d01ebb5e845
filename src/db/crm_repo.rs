// src/db/crm_repo.rs

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::record_store::{load_collection, save_collection, RecordStore, CLIENTES_KEY, VISITAS_KEY},
    models::crm::{AtualizacaoCliente, AtualizacaoVisita, Cliente, NovaVisita, NovoCliente, Visita},
};

// Compartilhado entre os serviços: leituras concorrentes, mutações serializadas
pub type SharedCrmRepository = Arc<RwLock<CrmRepository>>;

/// Dono das coleções em memória. Toda mutação grava a coleção inteira no `RecordStore`.
pub struct CrmRepository {
    store: Arc<dyn RecordStore>,
    clientes: Vec<Cliente>,
    visitas: Vec<Visita>,
}

impl CrmRepository {
    /// Carrega as duas coleções do armazenamento (vazias se nunca foram salvas).
    pub async fn load(store: Arc<dyn RecordStore>) -> Result<Self, AppError> {
        let clientes = load_collection(store.as_ref(), CLIENTES_KEY).await?;
        let visitas = load_collection(store.as_ref(), VISITAS_KEY).await?;

        tracing::info!(
            "📂 Dados carregados: {} clientes, {} visitas",
            clientes.len(),
            visitas.len()
        );

        Ok(Self { store, clientes, visitas })
    }

    pub fn into_shared(self) -> SharedCrmRepository {
        Arc::new(RwLock::new(self))
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub fn clientes(&self) -> &[Cliente] {
        &self.clientes
    }

    pub fn visitas(&self) -> &[Visita] {
        &self.visitas
    }

    pub fn find_cliente(&self, id: &str) -> Option<&Cliente> {
        self.clientes.iter().find(|c| c.id == id)
    }

    pub fn find_visita(&self, id: &str) -> Option<&Visita> {
        self.visitas.iter().find(|v| v.id == id)
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn add_cliente(&mut self, novo: NovoCliente) -> Cliente {
        let cliente = Cliente {
            id: Uuid::new_v4().to_string(),
            nome: novo.nome,
            empresa: novo.empresa,
            telefone: novo.telefone,
            email: novo.email,
            endereco: novo.endereco,
            cidade: novo.cidade,
            estado: novo.estado,
            segmento: novo.segmento,
            status: novo.status,
            observacoes: novo.observacoes,
            criado_em: Utc::now(),
        };

        self.clientes.push(cliente.clone());
        self.persist(CLIENTES_KEY).await;
        tracing::info!("Cliente criado: {} ({})", cliente.nome, cliente.id);

        cliente
    }

    pub async fn update_cliente(
        &mut self,
        id: &str,
        atualizacao: AtualizacaoCliente,
    ) -> Result<Cliente, AppError> {
        let cliente = self
            .clientes
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::ClienteNaoEncontrado(id.to_string()))?;

        // O nome nas visitas existentes continua o antigo (cópia histórica)
        atualizacao.aplicar(cliente);
        let atualizado = cliente.clone();

        self.persist(CLIENTES_KEY).await;
        Ok(atualizado)
    }

    /// Remove o cliente e todas as visitas dele. Retorna quantas visitas saíram junto.
    pub async fn delete_cliente(&mut self, id: &str) -> Result<usize, AppError> {
        let antes = self.clientes.len();
        self.clientes.retain(|c| c.id != id);
        if self.clientes.len() == antes {
            return Err(AppError::ClienteNaoEncontrado(id.to_string()));
        }

        let visitas_antes = self.visitas.len();
        self.visitas.retain(|v| v.cliente_id != id);
        let removidas = visitas_antes - self.visitas.len();

        self.persist(CLIENTES_KEY).await;
        if removidas > 0 {
            self.persist(VISITAS_KEY).await;
        }
        tracing::info!("Cliente {} removido junto com {} visita(s)", id, removidas);

        Ok(removidas)
    }

    // =========================================================================
    //  VISITAS
    // =========================================================================

    pub async fn add_visita(&mut self, nova: NovaVisita) -> Result<Visita, AppError> {
        let cliente_nome = self
            .find_cliente(&nova.cliente_id)
            .map(|c| c.nome.clone())
            .ok_or_else(|| AppError::ClienteNaoEncontrado(nova.cliente_id.clone()))?;

        let visita = Visita {
            id: Uuid::new_v4().to_string(),
            cliente_id: nova.cliente_id,
            cliente_nome,
            data: nova.data,
            horario: nova.horario,
            tipo: nova.tipo,
            status: nova.status,
            objetivo: nova.objetivo,
            resultado: nova.resultado,
            proxima_acao: nova.proxima_acao,
            valor_negociado: nova.valor_negociado,
            venda_realizada: nova.venda_realizada,
            criada_em: Utc::now(),
        };

        self.visitas.push(visita.clone());
        self.persist(VISITAS_KEY).await;
        tracing::info!("Visita criada: {} para {} em {}", visita.id, visita.cliente_nome, visita.data);

        Ok(visita)
    }

    pub async fn update_visita(
        &mut self,
        id: &str,
        mut atualizacao: AtualizacaoVisita,
    ) -> Result<Visita, AppError> {
        let index = self
            .visitas
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| AppError::VisitaNaoEncontrada(id.to_string()))?;

        // Trocar de cliente exige que o novo exista
        let cliente_id = match atualizacao.cliente_id.take() {
            Some(novo_id) => {
                if self.find_cliente(&novo_id).is_none() {
                    return Err(AppError::ClienteNaoEncontrado(novo_id));
                }
                novo_id
            }
            None => self.visitas[index].cliente_id.clone(),
        };

        // Editar a visita renova a cópia do nome, se o cliente ainda existir
        let cliente_nome = self.find_cliente(&cliente_id).map(|c| c.nome.clone());

        let visita = &mut self.visitas[index];
        atualizacao.aplicar(visita);
        visita.cliente_id = cliente_id;
        if let Some(nome) = cliente_nome {
            visita.cliente_nome = nome;
        }
        let atualizada = visita.clone();

        self.persist(VISITAS_KEY).await;
        Ok(atualizada)
    }

    pub async fn delete_visita(&mut self, id: &str) -> Result<(), AppError> {
        let antes = self.visitas.len();
        self.visitas.retain(|v| v.id != id);
        if self.visitas.len() == antes {
            return Err(AppError::VisitaNaoEncontrada(id.to_string()));
        }

        self.persist(VISITAS_KEY).await;
        Ok(())
    }

    // Gravação best-effort: a falha é logada e a mutação em memória permanece
    async fn persist(&self, key: &str) {
        let result = match key {
            CLIENTES_KEY => self.save(key, &self.clientes).await,
            _ => self.save(key, &self.visitas).await,
        };

        if let Err(e) = result {
            tracing::error!("🔥 Falha ao salvar a coleção '{}': {}", key, e);
        }
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, records: &[T]) -> Result<(), AppError> {
        save_collection(self.store.as_ref(), key, records).await
    }
}
