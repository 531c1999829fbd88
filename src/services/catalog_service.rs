// src/services/catalog_service.rs
use async_trait::async_trait;
use redis::Client;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    errors::RoadcallError as AppError,
    models::catalog::{Garage, ServiceRecord},
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Operation error: {0}")]
    Operation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<CatalogError> for AppError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Connection(msg) => AppError::StoreConnection(msg),
            CatalogError::Operation(msg) => AppError::StoreQuery(msg),
            CatalogError::Serialization(msg) => AppError::StoreSerialization(msg),
        }
    }
}

// Key generators for catalog records
pub struct CatalogKeys;

impl CatalogKeys {
    pub fn service_by_id(service_id: &str) -> String {
        format!("service:id:{}", service_id)
    }

    pub fn garage_by_id(garage_id: &str) -> String {
        format!("garage:id:{}", garage_id)
    }
}

/// Lookup surface the quote handler depends on. The pricing engine never
/// touches the store; missing records are reported before pricing runs.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_service(&self, service_id: &str) -> Result<Option<ServiceRecord>, AppError>;
    async fn put_service(&self, service: &ServiceRecord) -> Result<(), AppError>;
    async fn get_garage(&self, garage_id: &str) -> Result<Option<Garage>, AppError>;
    async fn put_garage(&self, garage: &Garage) -> Result<(), AppError>;
}

// Redis-backed catalog, records stored as JSON strings
pub struct RedisCatalog {
    client: Client,
}

impl RedisCatalog {
    pub fn new(redis_url: &str) -> Result<Self, CatalogError> {
        let client =
            Client::open(redis_url).map_err(|e| CatalogError::Connection(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get_connection(&self) -> Result<redis::aio::Connection, CatalogError> {
        self.client
            .get_async_connection()
            .await
            .map_err(|e| CatalogError::Connection(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CatalogError> {
        let mut conn = self.get_connection().await?;

        let data: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CatalogError::Operation(e.to_string()))?;

        match data {
            Some(json) => {
                let value: T = serde_json::from_str(&json)
                    .map_err(|e| CatalogError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CatalogError> {
        let json = serde_json::to_string(value)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;

        let mut conn = self.get_connection().await?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(json)
            .query_async(&mut conn)
            .await
            .map_err(|e| CatalogError::Operation(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl CatalogStore for RedisCatalog {
    async fn get_service(&self, service_id: &str) -> Result<Option<ServiceRecord>, AppError> {
        Ok(self.get_json(&CatalogKeys::service_by_id(service_id)).await?)
    }

    async fn put_service(&self, service: &ServiceRecord) -> Result<(), AppError> {
        Ok(self.set_json(&CatalogKeys::service_by_id(&service.id), service).await?)
    }

    async fn get_garage(&self, garage_id: &str) -> Result<Option<Garage>, AppError> {
        Ok(self.get_json(&CatalogKeys::garage_by_id(garage_id)).await?)
    }

    async fn put_garage(&self, garage: &Garage) -> Result<(), AppError> {
        Ok(self.set_json(&CatalogKeys::garage_by_id(&garage.id), garage).await?)
    }
}

// In-memory catalog for tests and redis-less development
pub struct MemoryCatalog {
    services: RwLock<HashMap<String, ServiceRecord>>,
    garages: RwLock<HashMap<String, Garage>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            garages: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn get_service(&self, service_id: &str) -> Result<Option<ServiceRecord>, AppError> {
        Ok(self.services.read().await.get(service_id).cloned())
    }

    async fn put_service(&self, service: &ServiceRecord) -> Result<(), AppError> {
        self.services
            .write()
            .await
            .insert(service.id.clone(), service.clone());
        Ok(())
    }

    async fn get_garage(&self, garage_id: &str) -> Result<Option<Garage>, AppError> {
        Ok(self.garages.read().await.get(garage_id).cloned())
    }

    async fn put_garage(&self, garage: &Garage) -> Result<(), AppError> {
        self.garages
            .write()
            .await
            .insert(garage.id.clone(), garage.clone());
        Ok(())
    }
}

/// Pick a catalog backend at startup. Without a redis url the service
/// still boots, serving quotes against an in-memory catalog.
pub fn build_catalog(redis_url: Option<&str>) -> Result<Arc<dyn CatalogStore>, AppError> {
    match redis_url {
        Some(url) => {
            tracing::info!("Using redis catalog at {}", url);
            Ok(Arc::new(RedisCatalog::new(url)?))
        }
        None => {
            tracing::warn!("REDIS_URL not set, using in-memory catalog");
            Ok(Arc::new(MemoryCatalog::new()))
        }
    }
}
