// src/handlers/catalog_handler.rs
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    errors::RoadcallError as AppError,
    models::catalog::{CreateGarageRequest, CreateServiceRequest, Garage, ServiceRecord},
    state::AppState,
};

/// POST /services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<ServiceRecord>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::MissingRequiredField("name".to_string()));
    }
    if !request.base_price.is_finite() || request.base_price < 0.0 {
        return Err(AppError::validation_error(
            "basePrice",
            "must be a non-negative number",
        ));
    }

    let service = ServiceRecord {
        id: Uuid::new_v4().to_string(),
        name: request.name,
        base_price: request.base_price,
        towing_available: request.towing_available,
        created_at: Utc::now(),
    };

    state.catalog.put_service(&service).await?;
    tracing::info!("Service created: {} ({})", service.id, service.name);

    Ok(Json(service))
}

/// GET /services/:service_id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> Result<Json<ServiceRecord>, AppError> {
    let service = state
        .catalog
        .get_service(&service_id)
        .await?
        .ok_or_else(|| AppError::service_not_found(&service_id))?;

    Ok(Json(service))
}

/// POST /garages
pub async fn create_garage(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateGarageRequest>,
) -> Result<Json<Garage>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::MissingRequiredField("name".to_string()));
    }
    if !request.latitude.is_finite() || request.latitude < -90.0 || request.latitude > 90.0 {
        return Err(AppError::validation_error(
            "latitude",
            "must be between -90 and 90",
        ));
    }
    if !request.longitude.is_finite() || request.longitude < -180.0 || request.longitude > 180.0 {
        return Err(AppError::validation_error(
            "longitude",
            "must be between -180 and 180",
        ));
    }

    let garage = Garage {
        id: Uuid::new_v4().to_string(),
        name: request.name,
        latitude: request.latitude,
        longitude: request.longitude,
        address: request.address,
        created_at: Utc::now(),
    };

    state.catalog.put_garage(&garage).await?;
    tracing::info!("Garage created: {} ({})", garage.id, garage.name);

    Ok(Json(garage))
}

/// GET /garages/:garage_id
pub async fn get_garage(
    State(state): State<Arc<AppState>>,
    Path(garage_id): Path<String>,
) -> Result<Json<Garage>, AppError> {
    let garage = state
        .catalog
        .get_garage(&garage_id)
        .await?
        .ok_or_else(|| AppError::garage_not_found(&garage_id))?;

    Ok(Json(garage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog_service::MemoryCatalog;
    use crate::services::pricing_service::{PriceEngine, PricingConfig};
    use crate::state::AppConfig;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            catalog: Arc::new(MemoryCatalog::new()),
            price_engine: PriceEngine::new(Arc::new(PricingConfig::default())),
            config: AppConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                redis_url: None,
                pricing_config_path: None,
            },
        })
    }

    #[tokio::test]
    async fn test_create_and_fetch_service() {
        let state = test_state();

        let Json(created) = create_service(
            State(state.clone()),
            Json(CreateServiceRequest {
                name: "Battery replacement".to_string(),
                base_price: 800.0,
                towing_available: false,
            }),
        )
        .await
        .unwrap();

        let Json(fetched) = get_service(State(state), Path(created.id.clone()))
            .await
            .unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.base_price, 800.0);
    }

    #[tokio::test]
    async fn test_create_service_rejects_negative_price() {
        let result = create_service(
            State(test_state()),
            Json(CreateServiceRequest {
                name: "Tow".to_string(),
                base_price: -10.0,
                towing_available: true,
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_create_garage_rejects_bad_longitude() {
        let result = create_garage(
            State(test_state()),
            Json(CreateGarageRequest {
                name: "Nowhere".to_string(),
                latitude: 0.0,
                longitude: 200.0,
                address: "N/A".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_get_missing_garage_is_404() {
        let result = get_garage(State(test_state()), Path("grg-missing".to_string())).await;
        assert!(matches!(result, Err(AppError::GarageNotFound(_))));
    }
}
