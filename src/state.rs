use std::sync::Arc;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn build(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
