use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tuning_service::{
    api::{AppState, router},
    config::Config,
    prompts::{
        ADJUST_PROFILE, GENERATE_PROFILE,
        loader::{load_prompt_profiles, take_profile},
        provider_factory::ProviderFactory,
        tuning_provider::TuningProvider,
    },
    store::sqlite_store::SqliteStore,
};

async fn init() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let loaded_config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&loaded_config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("initialising SQLite store at {}", loaded_config.database_url);
    let store = SqliteStore::with_builder(&loaded_config.database_url, |b| b)
        .await
        .map_err(|e| {
            error!("Failed to initialize store: {}", e);
            e
        })?;

    let mut profiles = load_prompt_profiles(&loaded_config.prompts_dir)?;
    let generate_profile = take_profile(&mut profiles, GENERATE_PROFILE)?;
    let adjust_profile = take_profile(&mut profiles, ADJUST_PROFILE)?;

    let provider_factory = ProviderFactory {
        default_provider: loaded_config.llm_provider.clone(),
        default_model: loaded_config.llm_name.clone(),
        api_key: loaded_config.api_key.clone(),
        base_url: loaded_config.llm_base_url.clone(),
    };
    let tuning = TuningProvider::new(
        provider_factory.build_provider(&generate_profile)?,
        provider_factory.build_provider(&adjust_profile)?,
    );

    let app = router(AppState {
        store: Arc::new(store),
        tuning: Arc::new(tuning),
    });

    let listener = tokio::net::TcpListener::bind(&loaded_config.bind_addr).await?;
    info!("Server running on {}", loaded_config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Ctrl+C received, shutting down gracefully");
}

#[tokio::main]
async fn main() {
    if let Err(e) = init().await {
        error!("Application error: {:?}", e);
        eprintln!("Application error: {}", e);
    }
}
