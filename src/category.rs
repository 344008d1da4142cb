// 🏷️ Data Categories - fixed price table
// Every submitted record declares a category; the category decides the price.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Price charged for any label not in the table.
pub const FALLBACK_PRICE: Money = Money::from_cents(10);

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    SoilMoisture,
    GpsTracking,
    /// Government delivery tracking, the highest-value category
    DeliveryStatus,
    LivestockHealth,
    WeatherData,
    CropHealth,
    /// Any label outside the table
    Unknown,
}

impl DataCategory {
    /// All priced categories, in table order.
    pub const PRICED: [DataCategory; 6] = [
        DataCategory::SoilMoisture,
        DataCategory::GpsTracking,
        DataCategory::DeliveryStatus,
        DataCategory::LivestockHealth,
        DataCategory::WeatherData,
        DataCategory::CropHealth,
    ];

    /// Look up a caller-supplied label. Matching is exact; anything else is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "soil_moisture" => DataCategory::SoilMoisture,
            "gps_tracking" => DataCategory::GpsTracking,
            "delivery_status" => DataCategory::DeliveryStatus,
            "livestock_health" => DataCategory::LivestockHealth,
            "weather_data" => DataCategory::WeatherData,
            "crop_health" => DataCategory::CropHealth,
            _ => DataCategory::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataCategory::SoilMoisture => "soil_moisture",
            DataCategory::GpsTracking => "gps_tracking",
            DataCategory::DeliveryStatus => "delivery_status",
            DataCategory::LivestockHealth => "livestock_health",
            DataCategory::WeatherData => "weather_data",
            DataCategory::CropHealth => "crop_health",
            DataCategory::Unknown => "unknown",
        }
    }

    /// Price per accepted record (USD).
    pub fn price(&self) -> Money {
        match self {
            DataCategory::SoilMoisture => Money::from_cents(15),
            DataCategory::GpsTracking => Money::from_cents(25),
            DataCategory::DeliveryStatus => Money::from_cents(47),
            DataCategory::LivestockHealth => Money::from_cents(32),
            DataCategory::WeatherData => Money::from_cents(18),
            DataCategory::CropHealth => Money::from_cents(28),
            DataCategory::Unknown => FALLBACK_PRICE,
        }
    }
}

impl std::fmt::Display for DataCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
