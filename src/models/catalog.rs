// src/models/catalog.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable breakdown-assistance service with its list price.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    pub base_price: f64,
    pub towing_available: bool,
    pub created_at: DateTime<Utc>,
}

/// A provider location quotes are priced against.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Garage {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

// Request Models
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    pub base_price: f64,
    #[serde(default)]
    pub towing_available: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGarageRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}
