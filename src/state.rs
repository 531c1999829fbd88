// src/state.rs
use std::sync::Arc;

use crate::{
    errors::RoadcallError as AppError,
    services::catalog_service::{CatalogStore, build_catalog},
    services::pricing_service::{PriceEngine, PricingConfig},
};

pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub price_engine: PriceEngine,
    pub config: AppConfig,
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub redis_url: Option<String>,
    pub pricing_config_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            redis_url: std::env::var("REDIS_URL").ok(),
            pricing_config_path: std::env::var("PRICING_CONFIG").ok(),
        }
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        // The rate table is loaded once here and never mutated afterwards;
        // retuning rates means restarting with a new table
        let pricing_config = match &config.pricing_config_path {
            Some(path) => PricingConfig::from_file(path)?,
            None => PricingConfig::default(),
        };
        pricing_config.validate()?;

        let catalog = build_catalog(config.redis_url.as_deref())?;
        let price_engine = PriceEngine::new(Arc::new(pricing_config));

        Ok(Self {
            catalog,
            price_engine,
            config,
        })
    }
}
