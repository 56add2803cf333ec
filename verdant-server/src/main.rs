mod error;
mod routes;

use tracing::{info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use verdant_core::Data;
use verdant_core::config::AppConfig;
use verdant_database::{Database, MIGRATOR};
use verdant_llm::LlmService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("hyper") || target.starts_with("h2"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    info!("PostgreSQL connection established.");

    if config.auto_run_migrations {
        MIGRATOR.run(&db_pool).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let db = Database::new(db_pool);

    let llm = match &config.llm {
        Some(llm_config) => {
            info!(model = %llm_config.model, "Feedback generation enabled.");
            Some(LlmService::new(llm_config)?)
        }
        None => {
            warn!("Feedback generation disabled (GEMINI_API_KEY is not set).");
            None
        }
    };

    let app = routes::router(Data { db, llm });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Verdant is listening.");

    axum::serve(listener, app).await?;
    Ok(())
}
