// Sensor line format: KEYWORD,field1,field2,...
// Fields are positional. Missing trailing fields take defaults; a numeric field
// that is present but unparsable is an error.

use crate::category::DataCategory;
use crate::error::HardwareError;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorReading {
    SoilMoisture {
        moisture_level: f64,
        temperature: f64,
    },
    GpsTracking {
        latitude: f64,
        longitude: f64,
        animal_id: String,
    },
    DeliveryStatus {
        package_id: String,
        status: String,
        location: String,
    },
    LivestockHealth {
        animal_id: String,
        heart_rate: f64,
        temperature: f64,
        activity_level: String,
    },
    Unknown {
        raw: String,
    },
}

impl SensorReading {
    /// Parse one raw line. Keywords are checked in order SOIL, GPS, DELIVER, LIVESTOCK.
    pub fn parse(line: &str) -> Result<Self, HardwareError> {
        let fields = Fields::new(line);

        let reading = if line.contains("SOIL") {
            SensorReading::SoilMoisture {
                moisture_level: fields.number(1)?,
                temperature: fields.number(2)?,
            }
        } else if line.contains("GPS") {
            SensorReading::GpsTracking {
                latitude: fields.number(1)?,
                longitude: fields.number(2)?,
                animal_id: fields.text(3, "unknown"),
            }
        } else if line.contains("DELIVER") {
            SensorReading::DeliveryStatus {
                package_id: fields.text(1, "unknown"),
                status: fields.text(2, "in_transit"),
                location: fields.text(3, "unknown"),
            }
        } else if line.contains("LIVESTOCK") {
            SensorReading::LivestockHealth {
                animal_id: fields.text(1, "unknown"),
                heart_rate: fields.number(2)?,
                temperature: fields.number(3)?,
                activity_level: fields.text(4, "normal"),
            }
        } else {
            SensorReading::Unknown {
                raw: line.to_string(),
            }
        };

        Ok(reading)
    }

    pub fn category(&self) -> DataCategory {
        match self {
            SensorReading::SoilMoisture { .. } => DataCategory::SoilMoisture,
            SensorReading::GpsTracking { .. } => DataCategory::GpsTracking,
            SensorReading::DeliveryStatus { .. } => DataCategory::DeliveryStatus,
            SensorReading::LivestockHealth { .. } => DataCategory::LivestockHealth,
            SensorReading::Unknown { .. } => DataCategory::Unknown,
        }
    }

    /// Unrecognized lines earn nothing (unlike unrecognized API submissions).
    pub fn price(&self) -> Money {
        match self {
            SensorReading::Unknown { .. } => Money::ZERO,
            known => known.category().price(),
        }
    }

    /// Government form code the reading is filed under.
    pub fn government_form(&self) -> Option<&'static str> {
        match self {
            SensorReading::SoilMoisture { .. } => Some("AGR-SOIL-2024"),
            SensorReading::GpsTracking { .. } => Some("LSTK-GPS-2024"),
            SensorReading::DeliveryStatus { .. } => Some("LOG-DEL-2024"),
            SensorReading::LivestockHealth { .. } => Some("LSTK-HEALTH-2024"),
            SensorReading::Unknown { .. } => None,
        }
    }
}

struct Fields<'a> {
    line: &'a str,
    parts: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Fields {
            line,
            parts: line.split(',').map(str::trim).collect(),
        }
    }

    fn text(&self, index: usize, default: &str) -> String {
        self.parts.get(index).copied().unwrap_or(default).to_string()
    }

    fn number(&self, index: usize) -> Result<f64, HardwareError> {
        match self.parts.get(index) {
            None => Ok(0.0),
            Some(raw) => raw.parse::<f64>().map_err(|_| {
                HardwareError::Malformed(format!(
                    "field {} is not a number ({:?}) in {:?}",
                    index, raw, self.line
                ))
            }),
        }
    }
}

/// A parsed reading plus the server-side fields reported with it.
#[derive(Debug, Clone, Serialize)]
pub struct HardwareReading {
    #[serde(flatten)]
    pub reading: SensorReading,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub government_form: Option<&'static str>,

    pub revenue_generated: Money,
    pub timestamp: DateTime<Utc>,
    pub simulated: bool,
}

impl HardwareReading {
    pub fn new(reading: SensorReading, simulated: bool) -> Self {
        HardwareReading {
            government_form: reading.government_form(),
            revenue_generated: reading.price(),
            timestamp: Utc::now(),
            simulated,
            reading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_soil() {
        let reading = SensorReading::parse("SOIL,42.5,21.0").unwrap();
        assert_eq!(
            reading,
            SensorReading::SoilMoisture {
                moisture_level: 42.5,
                temperature: 21.0
            }
        );
        assert_eq!(reading.price().cents(), 15);
        assert_eq!(reading.government_form(), Some("AGR-SOIL-2024"));
    }

    #[test]
    fn test_parse_gps_with_defaults() {
        let reading = SensorReading::parse("GPS,-25.7479").unwrap();
        assert_eq!(
            reading,
            SensorReading::GpsTracking {
                latitude: -25.7479,
                longitude: 0.0,
                animal_id: "unknown".to_string()
            }
        );
    }

    #[test]
    fn test_parse_delivery() {
        let reading = SensorReading::parse("DELIVER,PKG-10001,delivered,hub-7").unwrap();
        assert_eq!(reading.category(), DataCategory::DeliveryStatus);
        assert_eq!(reading.price().cents(), 47);

        let bare = SensorReading::parse("DELIVER").unwrap();
        assert_eq!(
            bare,
            SensorReading::DeliveryStatus {
                package_id: "unknown".to_string(),
                status: "in_transit".to_string(),
                location: "unknown".to_string()
            }
        );
    }

    #[test]
    fn test_parse_livestock() {
        let reading = SensorReading::parse("LIVESTOCK,CATTLE-1234,88,38.6,resting").unwrap();
        assert_eq!(
            reading,
            SensorReading::LivestockHealth {
                animal_id: "CATTLE-1234".to_string(),
                heart_rate: 88.0,
                temperature: 38.6,
                activity_level: "resting".to_string()
            }
        );
        assert_eq!(reading.price().cents(), 32);
    }

    #[test]
    fn test_keyword_order() {
        // SOIL is checked before GPS
        let reading = SensorReading::parse("SOIL-GPS,10,20").unwrap();
        assert_eq!(reading.category(), DataCategory::SoilMoisture);
    }

    #[test]
    fn test_unknown_line_earns_nothing() {
        let reading = SensorReading::parse("PING").unwrap();
        assert_eq!(reading.category(), DataCategory::Unknown);
        assert_eq!(reading.price(), Money::ZERO);
        assert_eq!(reading.government_form(), None);
    }

    #[test]
    fn test_bad_number_is_malformed() {
        let result = SensorReading::parse("SOIL,wet,20");
        assert!(matches!(result, Err(HardwareError::Malformed(_))));
    }

    #[test]
    fn test_reading_json_is_flat() {
        let reading = SensorReading::parse("GPS,1.5,2.5,CATTLE-7").unwrap();
        let json = serde_json::to_value(HardwareReading::new(reading, true)).unwrap();

        assert_eq!(json["type"], "gps_tracking");
        assert_eq!(json["animal_id"], "CATTLE-7");
        assert_eq!(json["government_form"], "LSTK-GPS-2024");
        assert_eq!(json["revenue_generated"], serde_json::json!(0.25));
        assert_eq!(json["simulated"], true);
    }
}
