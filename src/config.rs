// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use chrono::Weekday;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{CrmRepository, JsonFileStore, MemoryRecordStore, PgRecordStore, RecordStore, SharedCrmRepository},
    services::{CrmService, DashboardService, RouteService},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATA_DIR: &str = "./data";

/// Onde as coleções `clientes` e `visitas` ficam gravadas.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Memory,
    File(PathBuf),
    Postgres(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    pub primeiro_dia_semana: Weekday,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    // Separado do `env` para os testes não precisarem mexer no ambiente do processo
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let database_url = var("DATABASE_URL");
        let data_dir = || PathBuf::from(var("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let store_backend = match var("STORE_BACKEND").map(|b| b.to_lowercase()).as_deref() {
            Some("memory") => StoreBackend::Memory,
            Some("file") => StoreBackend::File(data_dir()),
            Some("postgres") => StoreBackend::Postgres(
                database_url.context("DATABASE_URL deve ser definida para STORE_BACKEND=postgres")?,
            ),
            Some(outro) => bail!("STORE_BACKEND inválido: {outro} (use file, memory ou postgres)"),
            None => match database_url {
                Some(url) => StoreBackend::Postgres(url),
                None => StoreBackend::File(data_dir()),
            },
        };

        let primeiro_dia_semana = match var("PRIMEIRO_DIA_SEMANA") {
            Some(dia) => parse_weekday(&dia)
                .with_context(|| format!("PRIMEIRO_DIA_SEMANA inválido: {dia}"))?,
            None => Weekday::Sun,
        };

        Ok(Self {
            bind_addr,
            store_backend,
            primeiro_dia_semana,
        })
    }
}

/// Aceita nomes em português (com ou sem acento/"-feira") e em inglês.
fn parse_weekday(texto: &str) -> Option<Weekday> {
    let normalizado = texto.trim().to_lowercase();
    let nome = normalizado.strip_suffix("-feira").unwrap_or(&normalizado);

    match nome {
        "domingo" | "sunday" | "sun" => Some(Weekday::Sun),
        "segunda" | "monday" | "mon" => Some(Weekday::Mon),
        "terça" | "terca" | "tuesday" | "tue" => Some(Weekday::Tue),
        "quarta" | "wednesday" | "wed" => Some(Weekday::Wed),
        "quinta" | "thursday" | "thu" => Some(Weekday::Thu),
        "sexta" | "friday" | "fri" => Some(Weekday::Fri),
        "sábado" | "sabado" | "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub crm_service: CrmService,
    pub dashboard_service: DashboardService,
    pub route_service: RouteService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn RecordStore> = match &config.store_backend {
            StoreBackend::Memory => {
                tracing::warn!("⚠️ Armazenamento em memória: os dados somem ao encerrar o processo");
                Arc::new(MemoryRecordStore::new())
            }
            StoreBackend::File(dir) => {
                tracing::info!("💾 Armazenamento em arquivos JSON em {}", dir.display());
                Arc::new(JsonFileStore::new(dir.clone()))
            }
            StoreBackend::Postgres(database_url) => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;

                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgRecordStore::new(db_pool))
            }
        };

        // --- Monta o gráfico de dependências ---
        let repo = CrmRepository::load(store).await?.into_shared();

        Ok(Self::from_repository(repo, config.primeiro_dia_semana))
    }

    pub fn from_repository(repo: SharedCrmRepository, primeiro_dia_semana: Weekday) -> Self {
        Self {
            crm_service: CrmService::new(repo.clone()),
            dashboard_service: DashboardService::new(repo.clone(), primeiro_dia_semana),
            route_service: RouteService::new(repo),
        }
    }
}
