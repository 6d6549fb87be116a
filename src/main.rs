mod config;
mod error;
mod ai {
    pub mod agents;
    pub mod client;
    pub mod prompts;
    pub mod template;
}
mod handlers;
mod server;

use std::sync::Arc;

use ai::agents::Tutor;
use ai::client::GroqClient;
use ai::prompts::PromptCatalog;
use config::AppConfig;
use dotenv::dotenv;
use handlers::AppState;
use server::ApiServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = AppConfig::from_env()?;
    log::info!("🤖 Using model {} at {}", config.model.model, config.model.base_url);

    let catalog = Arc::new(PromptCatalog::load()?);
    let gateway = Arc::new(GroqClient::new(config.model.clone())?);
    let state = Arc::new(AppState {
        tutor: Tutor::new(gateway, catalog),
    });

    ApiServer::new(config.server, state).start().await?;
    Ok(())
}
