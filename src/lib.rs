pub mod api;
pub mod config;
pub mod models;
pub mod screens;
pub mod seatmap;
pub mod session;
pub mod table;

use std::sync::Arc;

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub api: api::ApiClient,
    pub session: session::SessionStore,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let api = api::ApiClient::new(&config.api);
        let session = session::SessionStore::new(api.clone());
        Arc::new(Self {
            config,
            api,
            session,
        })
    }
}
