// src/db/record_store.rs

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::common::error::AppError;

// As duas coleções persistidas
pub const CLIENTES_KEY: &str = "clientes";
pub const VISITAS_KEY: &str = "visitas";

/// Armazenamento chave/valor onde cada chave guarda um array JSON inteiro.
///
/// Não há transação: cada mutação sobrescreve a coleção completa.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// `None` quando a chave nunca foi gravada.
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError>;

    async fn save(&self, key: &str, value: &Value) -> Result<(), AppError>;
}

/// Carrega uma coleção tipada; chave ausente vira lista vazia.
pub async fn load_collection<T: DeserializeOwned>(
    store: &dyn RecordStore,
    key: &str,
) -> Result<Vec<T>, AppError> {
    match store.load(key).await? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

pub async fn save_collection<T: Serialize + Sync>(
    store: &dyn RecordStore,
    key: &str,
    records: &[T],
) -> Result<(), AppError> {
    let value = serde_json::to_value(records)?;
    store.save(key, &value).await
}

/// Rejeita chaves que não servem como nome de arquivo.
pub(crate) fn validate_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() {
        return Err(AppError::InvalidStoreKey("a chave não pode ser vazia".to_string()));
    }
    if key.contains('/') || key.contains('\\') || key.contains("..") || key.contains('\0') {
        return Err(AppError::InvalidStoreKey(format!(
            "a chave contém caracteres inválidos: {key:?}"
        )));
    }
    if key.chars().any(|c| c.is_control()) {
        return Err(AppError::InvalidStoreKey(format!(
            "a chave contém caracteres de controle: {key:?}"
        )));
    }
    Ok(())
}

// ---
// Implementação em memória (testes e STORE_BACKEND=memory)
// ---
#[derive(Default)]
pub struct MemoryRecordStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &Value) -> Result<(), AppError> {
        validate_key(key)?;
        self.entries.write().await.insert(key.to_string(), value.clone());
        Ok(())
    }
}
