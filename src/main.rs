use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use nyaya::api::HttpApi;
use nyaya::session::SessionStore;
use nyaya::{config, shell};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let api = Arc::new(HttpApi::new(&config::api_base_url()));
    let store = Arc::new(tokio::sync::Mutex::new(SessionStore::new(
        config::session_file(),
    )));
    store.lock().await.restore();

    if let Err(e) = shell::run(api, store).await {
        tracing::error!(error = %e, "shell terminated with error");
        std::process::exit(1);
    }
}
