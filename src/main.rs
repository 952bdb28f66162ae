use std::{error::Error, sync::Arc};

use ai_llm_service::{OllamaService, config::default_config::config_ollama_chat, telemetry};
use api::core::{app_config::ApiConfig, app_state::AppState};
use code_generator::CodeGenerator;
use snippet_store::{QdrantSnippetStore, SeedOutcome, StoreConfig, build_embedder, ensure_seeded};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file; a missing file is fine.
    dotenvy::dotenv().ok();

    telemetry::init(telemetry::DEFAULT_FILTER)?;

    let api_cfg = ApiConfig::from_env()?;
    let chat_cfg = config_ollama_chat()?;
    let store_cfg = StoreConfig::from_env()?;

    info!(
        chat_model = %chat_cfg.model,
        embedder = ?store_cfg.embedder,
        ollama = %chat_cfg.endpoint,
        qdrant = %store_cfg.qdrant_url,
        collection = %store_cfg.collection,
        "configuration loaded"
    );

    let chat = Arc::new(OllamaService::new(chat_cfg)?);
    let embedder = build_embedder(&store_cfg.embedder).await?;
    let store = Arc::new(QdrantSnippetStore::new(&store_cfg, embedder)?);

    match ensure_seeded(store.as_ref()).await? {
        SeedOutcome::Seeded { inserted } => info!(inserted, "snippet store seeded"),
        SeedOutcome::AlreadyPopulated { existing } => {
            info!(existing, "snippet store already populated")
        }
    }

    let generator = CodeGenerator::new(store, chat);
    api::start(api_cfg, AppState::new(generator)).await?;

    Ok(())
}
