// src/db/file_store.rs

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    common::error::AppError,
    db::record_store::{validate_key, RecordStore},
};

/// Um arquivo `<base>/<chave>.json` por coleção.
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, AppError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError> {
        let path = self.key_path(key)?;
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&path).await?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, key: &str, value: &Value) -> Result<(), AppError> {
        let path = self.key_path(key)?;
        tokio::fs::create_dir_all(&self.base_path).await?;

        // Escreve num temporário e renomeia, para não deixar o arquivo pela metade
        let tmp_path = self.base_path.join(format!("{key}.json.tmp"));
        let content = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }
}
