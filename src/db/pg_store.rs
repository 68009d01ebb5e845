// src/db/pg_store.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::record_store::{validate_key, RecordStore},
};

// Tabela criada em migrations/0001_record_store.sql
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError> {
        let value = sqlx::query_scalar::<_, Value>("SELECT value FROM record_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn save(&self, key: &str, value: &Value) -> Result<(), AppError> {
        validate_key(key)?;

        // UPSERT (Insert or Update)
        sqlx::query(
            r#"
            INSERT INTO record_store (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key)
            DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
