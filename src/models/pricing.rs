// src/models/pricing.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::catalog::{Garage, ServiceRecord};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorcycle,
    Bus,
    Truck,
    Cng,        // Auto-rickshaw running on compressed natural gas
    Rickshaw,
    Other,
}

impl VehicleType {
    /// Parse a wire value. Unrecognized strings fall back to the default
    /// multiplier class instead of failing the whole quote.
    pub fn from_wire(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "car" => VehicleType::Car,
            "motorcycle" => VehicleType::Motorcycle,
            "bus" => VehicleType::Bus,
            "truck" => VehicleType::Truck,
            "cng" => VehicleType::Cng,
            "rickshaw" => VehicleType::Rickshaw,
            "other" => VehicleType::Other,
            unknown => {
                tracing::debug!("Unrecognized vehicle type '{}', using default multiplier", unknown);
                VehicleType::Other
            }
        }
    }
}

/// Input to the pricing pipeline. Never mutated by the engine.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PricingRequest {
    pub base_price: f64,
    pub distance_km: f64,
    pub vehicle_type: VehicleType,
    pub is_emergency: bool,
    pub is_urgent: bool,
    pub towing_requested: bool,
    pub scheduled_at: DateTime<Utc>,
}

/// Itemized result of one pricing run. Every line item is reported even
/// when zero so the client can render a transparent breakdown.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub distance_charge: f64,
    pub vehicle_multiplier_amount: f64,
    pub emergency_surcharge: f64,
    pub urgent_surcharge: f64,
    pub towing_fee: f64,
    pub time_surcharge: f64,
    pub subtotal: f64,
    /// Rounded to a whole currency unit.
    pub total: f64,
}

/// Low/high band shown to the customer before the exact price is confirmed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Estimate {
    pub low: f64,
    pub high: f64,
}

// Request/Response Models
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub service_id: String,
    pub garage_id: Option<String>,
    pub customer_location: Coordinates,
    pub vehicle_type: String,
    #[serde(default)]
    pub is_emergency: bool,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub towing_requested: bool,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    pub service: ServiceRecord,
    pub garage: Option<Garage>,
    pub distance: f64,
    pub price_breakdown: PriceBreakdown,
    pub estimate: Estimate,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub data: QuoteData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_from_wire() {
        assert_eq!(VehicleType::from_wire("car"), VehicleType::Car);
        assert_eq!(VehicleType::from_wire("TRUCK"), VehicleType::Truck);
        assert_eq!(VehicleType::from_wire("cng"), VehicleType::Cng);
        assert_eq!(VehicleType::from_wire("hovercraft"), VehicleType::Other);
        assert_eq!(VehicleType::from_wire(""), VehicleType::Other);
    }

    #[test]
    fn test_quote_request_flag_defaults() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{
                "serviceId": "svc-1",
                "customerLocation": { "lat": 23.81, "lng": 90.41 },
                "vehicleType": "car"
            }"#,
        )
        .unwrap();

        assert_eq!(request.service_id, "svc-1");
        assert!(request.garage_id.is_none());
        assert!(!request.is_emergency);
        assert!(!request.is_urgent);
        assert!(!request.towing_requested);
        assert!(request.scheduled_at.is_none());
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let breakdown = PriceBreakdown {
            base_price: 500.0,
            distance_charge: 140.0,
            vehicle_multiplier_amount: 0.0,
            emergency_surcharge: 0.0,
            urgent_surcharge: 0.0,
            towing_fee: 0.0,
            time_surcharge: 0.0,
            subtotal: 640.0,
            total: 640.0,
        };

        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["basePrice"], 500.0);
        assert_eq!(json["distanceCharge"], 140.0);
        assert_eq!(json["vehicleMultiplierAmount"], 0.0);
        assert_eq!(json["total"], 640.0);
    }
}
