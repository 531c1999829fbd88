// src/handlers/quote_handler.rs
use axum::{Json, extract::State};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    errors::RoadcallError as AppError,
    models::pricing::{
        Coordinates, PricingRequest, QuoteData, QuoteRequest, QuoteResponse, VehicleType,
    },
    state::AppState,
    utils::geo,
};

/// POST /quotes
///
/// Resolves the service and optional garage from the catalog, computes
/// the customer-to-garage distance, and runs the pricing pipeline.
/// Distance is 0 when no garage is specified.
pub async fn calculate_quote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    validate_coordinates(&request.customer_location)?;

    let service = state
        .catalog
        .get_service(&request.service_id)
        .await?
        .ok_or_else(|| AppError::service_not_found(&request.service_id))?;

    let garage = match &request.garage_id {
        Some(garage_id) => Some(
            state
                .catalog
                .get_garage(garage_id)
                .await?
                .ok_or_else(|| AppError::garage_not_found(garage_id))?,
        ),
        None => None,
    };

    let distance_km = match &garage {
        Some(garage) => geo::haversine_km(
            request.customer_location.lat,
            request.customer_location.lng,
            garage.latitude,
            garage.longitude,
        ),
        None => 0.0,
    };

    let pricing_request = PricingRequest {
        base_price: service.base_price,
        distance_km,
        vehicle_type: VehicleType::from_wire(&request.vehicle_type),
        is_emergency: request.is_emergency,
        is_urgent: request.is_urgent,
        towing_requested: request.towing_requested,
        scheduled_at: request.scheduled_at.unwrap_or_else(Utc::now),
    };

    let price_breakdown = state.price_engine.calculate(&pricing_request)?;
    let estimate = state.price_engine.estimate(&pricing_request)?;

    tracing::info!(
        "Quote for service {}: {:.1}km, total {}",
        service.id,
        distance_km,
        price_breakdown.total
    );

    Ok(Json(QuoteResponse {
        success: true,
        data: QuoteData {
            service,
            garage,
            distance: distance_km,
            price_breakdown,
            estimate,
        },
    }))
}

fn validate_coordinates(location: &Coordinates) -> Result<(), AppError> {
    if !location.lat.is_finite() || location.lat < -90.0 || location.lat > 90.0 {
        return Err(AppError::validation_error(
            "customerLocation.lat",
            "latitude must be between -90 and 90",
        ));
    }
    if !location.lng.is_finite() || location.lng < -180.0 || location.lng > 180.0 {
        return Err(AppError::validation_error(
            "customerLocation.lng",
            "longitude must be between -180 and 180",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Garage, ServiceRecord};
    use crate::services::catalog_service::{CatalogStore, MemoryCatalog};
    use crate::services::pricing_service::{PriceEngine, PricingConfig};
    use crate::state::{AppConfig, AppState};
    use chrono::TimeZone;

    async fn test_state() -> Arc<AppState> {
        let catalog = Arc::new(MemoryCatalog::new());

        catalog
            .put_service(&ServiceRecord {
                id: "svc-1".to_string(),
                name: "Engine jump start".to_string(),
                base_price: 500.0,
                towing_available: true,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        // Garage placed roughly 8km from the customer point below, past
        // the default free radius
        catalog
            .put_garage(&Garage {
                id: "grg-1".to_string(),
                name: "Dhanmondi Workshop".to_string(),
                latitude: 23.7465,
                longitude: 90.3760,
                address: "Dhanmondi, Dhaka".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        Arc::new(AppState {
            catalog,
            price_engine: PriceEngine::new(Arc::new(PricingConfig::default())),
            config: AppConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                redis_url: None,
                pricing_config_path: None,
            },
        })
    }

    fn quote_request() -> QuoteRequest {
        QuoteRequest {
            service_id: "svc-1".to_string(),
            garage_id: Some("grg-1".to_string()),
            customer_location: Coordinates {
                lat: 23.8103,
                lng: 90.4125,
            },
            vehicle_type: "car".to_string(),
            is_emergency: false,
            is_urgent: false,
            towing_requested: false,
            // Daytime on a Tuesday, outside every default premium window
            scheduled_at: Some(Utc.with_ymd_and_hms(2025, 3, 4, 10, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_quote_with_garage() {
        let state = test_state().await;
        let Json(response) = calculate_quote(State(state), Json(quote_request()))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.data.service.id, "svc-1");
        assert_eq!(response.data.garage.as_ref().unwrap().id, "grg-1");
        assert!(response.data.distance > 3.0);
        assert!(response.data.price_breakdown.distance_charge > 0.0);
        assert_eq!(response.data.price_breakdown.base_price, 500.0);
        assert_eq!(
            response.data.price_breakdown.total,
            response.data.price_breakdown.subtotal.round()
        );
        assert!(response.data.estimate.low <= response.data.price_breakdown.total);
        assert!(response.data.estimate.high >= response.data.price_breakdown.total);
    }

    #[tokio::test]
    async fn test_quote_without_garage_has_zero_distance() {
        let state = test_state().await;
        let mut request = quote_request();
        request.garage_id = None;

        let Json(response) = calculate_quote(State(state), Json(request)).await.unwrap();

        assert!(response.data.garage.is_none());
        assert_eq!(response.data.distance, 0.0);
        assert_eq!(response.data.price_breakdown.distance_charge, 0.0);
        assert_eq!(response.data.price_breakdown.total, 500.0);
    }

    #[tokio::test]
    async fn test_unknown_service_is_404() {
        let state = test_state().await;
        let mut request = quote_request();
        request.service_id = "svc-missing".to_string();

        let result = calculate_quote(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::ServiceNotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_garage_is_404() {
        let state = test_state().await;
        let mut request = quote_request();
        request.garage_id = Some("grg-missing".to_string());

        let result = calculate_quote(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::GarageNotFound(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_latitude_rejected() {
        let state = test_state().await;
        let mut request = quote_request();
        request.customer_location.lat = 91.0;

        let result = calculate_quote(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_unknown_vehicle_type_still_quotes() {
        let state = test_state().await;
        let mut request = quote_request();
        request.vehicle_type = "hovercraft".to_string();

        let Json(response) = calculate_quote(State(state), Json(request)).await.unwrap();

        assert!(response.success);
        assert_eq!(response.data.price_breakdown.vehicle_multiplier_amount, 0.0);
    }

    #[tokio::test]
    async fn test_emergency_towing_quote() {
        let state = test_state().await;
        let mut request = quote_request();
        request.garage_id = None;
        request.is_emergency = true;
        request.towing_requested = true;

        let Json(response) = calculate_quote(State(state), Json(request)).await.unwrap();

        // 20% of 500 plus the flat 300 towing fee
        assert_eq!(response.data.price_breakdown.emergency_surcharge, 100.0);
        assert_eq!(response.data.price_breakdown.towing_fee, 300.0);
        assert_eq!(response.data.price_breakdown.total, 900.0);
    }
}
