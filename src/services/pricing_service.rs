// src/services/pricing_service.rs
use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday as ChronoWeekday};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    errors::RoadcallError as AppError,
    models::pricing::{Estimate, PriceBreakdown, PricingRequest, VehicleType},
    ValidationError,
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    fn matches(&self, day: ChronoWeekday) -> bool {
        matches!(
            (self, day),
            (Weekday::Monday, ChronoWeekday::Mon)
                | (Weekday::Tuesday, ChronoWeekday::Tue)
                | (Weekday::Wednesday, ChronoWeekday::Wed)
                | (Weekday::Thursday, ChronoWeekday::Thu)
                | (Weekday::Friday, ChronoWeekday::Fri)
                | (Weekday::Saturday, ChronoWeekday::Sat)
                | (Weekday::Sunday, ChronoWeekday::Sun)
        )
    }
}

/// A surcharge window. Hours are wall-clock in the configured local
/// offset; `end_hour` is exclusive and the window wraps past midnight
/// when `start_hour > end_hour`. `days: None` means every day.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PremiumWindow {
    pub label: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub days: Option<Vec<Weekday>>,
    pub surcharge_pct: f64,
}

impl PremiumWindow {
    fn contains(&self, hour: u32, day: ChronoWeekday) -> bool {
        if let Some(days) = &self.days {
            if !days.iter().any(|d| d.matches(day)) {
                return false;
            }
        }

        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Per-vehicle-class price multipliers. The accessor match is exhaustive
/// so adding a `VehicleType` variant without a rate fails to compile.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct VehicleMultipliers {
    pub car: f64,
    pub motorcycle: f64,
    pub bus: f64,
    pub truck: f64,
    pub cng: f64,
    pub rickshaw: f64,
    pub other: f64,
}

impl VehicleMultipliers {
    pub fn for_vehicle(&self, vehicle_type: VehicleType) -> f64 {
        match vehicle_type {
            VehicleType::Car => self.car,
            VehicleType::Motorcycle => self.motorcycle,
            VehicleType::Bus => self.bus,
            VehicleType::Truck => self.truck,
            VehicleType::Cng => self.cng,
            VehicleType::Rickshaw => self.rickshaw,
            VehicleType::Other => self.other,
        }
    }
}

impl Default for VehicleMultipliers {
    fn default() -> Self {
        // Multipliers below 1.0 would make a line item negative, so the
        // lighter classes sit at the 1.0 floor
        Self {
            car: 1.0,
            motorcycle: 1.0,
            bus: 1.4,
            truck: 1.5,
            cng: 1.0,
            rickshaw: 1.0,
            other: 1.0,
        }
    }
}

/// Asymmetric tolerance around the computed total. Under-promising is
/// worse than over-estimating, so the band widens more upward.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct EstimateBand {
    pub below_pct: f64,
    pub above_pct: f64,
}

impl Default for EstimateBand {
    fn default() -> Self {
        Self {
            below_pct: 0.05,
            above_pct: 0.10,
        }
    }
}

/// The full rate table. Loaded once at startup and treated as read-only;
/// retuning means swapping the whole table, never mutating fields.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PricingConfig {
    /// Distance included in the base price before per-km charges accrue.
    pub free_radius_km: f64,
    pub per_km_rate: f64,
    pub vehicle_multipliers: VehicleMultipliers,
    /// Percentage of (base + distance charge) when is_emergency is set.
    pub emergency_surcharge_pct: f64,
    /// Percentage of (base + distance charge) when is_urgent is set.
    pub urgent_surcharge_pct: f64,
    /// Flat add-on when towing is requested.
    pub towing_fee: f64,
    pub premium_windows: Vec<PremiumWindow>,
    pub estimate_band: EstimateBand,
    /// Offset applied to scheduled_at before premium-window lookup.
    pub utc_offset_minutes: i32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_radius_km: 3.0,
            per_km_rate: 20.0,
            vehicle_multipliers: VehicleMultipliers::default(),
            emergency_surcharge_pct: 0.20,
            urgent_surcharge_pct: 0.10,
            towing_fee: 300.0,
            premium_windows: vec![
                PremiumWindow {
                    label: "night".to_string(),
                    start_hour: 22,
                    end_hour: 6,
                    days: None,
                    surcharge_pct: 0.15,
                },
                PremiumWindow {
                    label: "weekend".to_string(),
                    start_hour: 0,
                    end_hour: 24,
                    days: Some(vec![Weekday::Friday, Weekday::Saturday]),
                    surcharge_pct: 0.10,
                },
            ],
            estimate_band: EstimateBand::default(),
            utc_offset_minutes: 0,
        }
    }
}

impl PricingConfig {
    /// Load a rate table from a JSON file. Missing fields keep their
    /// compiled-in defaults, so operators only override what they retune.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigurationError(format!("Cannot read pricing config {}: {}", path, e))
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| AppError::ConfigurationError(format!("Invalid pricing config {}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.free_radius_km < 0.0
            || self.per_km_rate < 0.0
            || self.towing_fee < 0.0
            || self.emergency_surcharge_pct < 0.0
            || self.urgent_surcharge_pct < 0.0
        {
            return Err(AppError::ConfigurationError(
                "Rates and surcharges must be non-negative".to_string(),
            ));
        }

        let m = &self.vehicle_multipliers;
        for (name, value) in [
            ("car", m.car),
            ("motorcycle", m.motorcycle),
            ("bus", m.bus),
            ("truck", m.truck),
            ("cng", m.cng),
            ("rickshaw", m.rickshaw),
            ("other", m.other),
        ] {
            if value < 1.0 {
                return Err(AppError::ConfigurationError(format!(
                    "Vehicle multiplier '{}' must be at least 1.0, got {}",
                    name, value
                )));
            }
        }

        for window in &self.premium_windows {
            if window.start_hour > 24 || window.end_hour > 24 {
                return Err(AppError::ConfigurationError(format!(
                    "Premium window '{}' has an hour outside 0..=24",
                    window.label
                )));
            }
            if window.surcharge_pct < 0.0 {
                return Err(AppError::ConfigurationError(format!(
                    "Premium window '{}' has a negative surcharge",
                    window.label
                )));
            }
        }

        if self.estimate_band.below_pct < 0.0 || self.estimate_band.above_pct < 0.0 {
            return Err(AppError::ConfigurationError(
                "Estimate band percentages must be non-negative".to_string(),
            ));
        }

        if self.utc_offset_minutes.abs() > 18 * 60 {
            return Err(AppError::ConfigurationError(
                "utc_offset_minutes must be within +/- 18 hours".to_string(),
            ));
        }

        Ok(())
    }
}

/// Deterministic pricing pipeline. Pure computation over an immutable
/// rate table, safe to share across request handlers.
pub struct PriceEngine {
    config: Arc<PricingConfig>,
}

impl PriceEngine {
    pub fn new(config: Arc<PricingConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Run the adjustment pipeline and return the itemized breakdown.
    ///
    /// Line items are applied in a fixed order so the breakdown reads the
    /// same on every quote: distance charge, vehicle multiplier, emergency
    /// surcharge, urgent surcharge, towing fee, time surcharge.
    pub fn calculate(&self, request: &PricingRequest) -> Result<PriceBreakdown, AppError> {
        self.validate_request(request)?;

        let cfg = &self.config;
        let base_price = request.base_price;

        let billable_km = (request.distance_km - cfg.free_radius_km).max(0.0);
        let distance_charge = billable_km * cfg.per_km_rate;

        let multiplier = cfg.vehicle_multipliers.for_vehicle(request.vehicle_type);
        let vehicle_multiplier_amount = base_price * (multiplier - 1.0);

        // Emergency and urgent are independent dimensions; both apply when
        // both flags are set
        let surcharge_basis = base_price + distance_charge;
        let emergency_surcharge = if request.is_emergency {
            surcharge_basis * cfg.emergency_surcharge_pct
        } else {
            0.0
        };
        let urgent_surcharge = if request.is_urgent {
            surcharge_basis * cfg.urgent_surcharge_pct
        } else {
            0.0
        };

        let towing_fee = if request.towing_requested {
            cfg.towing_fee
        } else {
            0.0
        };

        let time_surcharge = surcharge_basis * self.premium_rate_at(request.scheduled_at);

        let subtotal = base_price
            + distance_charge
            + vehicle_multiplier_amount
            + emergency_surcharge
            + urgent_surcharge
            + towing_fee
            + time_surcharge;

        // The currency has no usable sub-unit
        let total = subtotal.round();

        Ok(PriceBreakdown {
            base_price,
            distance_charge,
            vehicle_multiplier_amount,
            emergency_surcharge,
            urgent_surcharge,
            towing_fee,
            time_surcharge,
            subtotal,
            total,
        })
    }

    /// Same pipeline as [`calculate`](Self::calculate), widened into the
    /// configured tolerance band for display before firm assignment.
    pub fn estimate(&self, request: &PricingRequest) -> Result<Estimate, AppError> {
        let breakdown = self.calculate(request)?;
        let band = &self.config.estimate_band;

        let low = (breakdown.total * (1.0 - band.below_pct)).round().max(0.0);
        let high = (breakdown.total * (1.0 + band.above_pct)).round();

        Ok(Estimate { low, high })
    }

    fn validate_request(&self, request: &PricingRequest) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if !request.base_price.is_finite() || request.base_price < 0.0 {
            errors.push(ValidationError {
                field: "basePrice".to_string(),
                message: "must be a non-negative number".to_string(),
            });
        }
        if !request.distance_km.is_finite() || request.distance_km < 0.0 {
            errors.push(ValidationError {
                field: "distanceKm".to_string(),
                message: "must be a non-negative number".to_string(),
            });
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationFailed(errors));
        }
        Ok(())
    }

    /// Highest surcharge percentage among premium windows matching the
    /// scheduled time. Overlapping windows do not stack.
    fn premium_rate_at(&self, scheduled_at: DateTime<Utc>) -> f64 {
        let local = match FixedOffset::east_opt(self.config.utc_offset_minutes * 60) {
            Some(offset) => scheduled_at.with_timezone(&offset),
            None => scheduled_at.fixed_offset(),
        };
        let hour = local.hour();
        let day = local.weekday();

        self.config
            .premium_windows
            .iter()
            .filter(|window| window.contains(hour, day))
            .map(|window| window.surcharge_pct)
            .fold(0.0, f64::max)
    }
}
