use fuel_dash_core::format::{de_opt_f64_lenient, de_string_lenient};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Shown in place of the data status when `/status-dados` cannot be read.
pub const STATUS_UNAVAILABLE: &str = "status unavailable";

/// Shown while the first status request is in flight.
pub const STATUS_LOADING: &str = "loading...";

/// Placeholder vehicle type when the top consumer is unknown.
pub const UNKNOWN_VEHICLE: &str = "N/A";

/// Fuel types the averages card always lists, even before data arrives.
pub const KNOWN_FUEL_TYPES: [&str; 3] = ["Gasolina", "Etanol", "Diesel S10"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReport {
    #[serde(deserialize_with = "de_string_lenient")]
    pub friendly_status: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataStatus {
    Available(StatusReport),
    Unavailable,
}

impl DataStatus {
    pub fn display(&self) -> &str {
        match self {
            DataStatus::Available(report) => &report.friendly_status,
            DataStatus::Unavailable => STATUS_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FuelAverage {
    #[serde(rename = "tipo_combustivel", deserialize_with = "de_string_lenient")]
    pub fuel_type: String,
    #[serde(rename = "media_preco", default, deserialize_with = "de_opt_f64_lenient")]
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopConsumer {
    #[serde(rename = "tipo_veiculo", deserialize_with = "de_string_lenient")]
    pub vehicle_type: String,
    /// String-encoded decimal, as served.
    #[serde(rename = "volume_total", deserialize_with = "de_string_lenient")]
    pub total_volume: String,
}

impl Default for TopConsumer {
    fn default() -> Self {
        Self {
            vehicle_type: UNKNOWN_VEHICLE.to_string(),
            total_volume: "0.00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TotalRevenue {
    /// String-encoded decimal, as served.
    #[serde(rename = "receita_total", deserialize_with = "de_string_lenient")]
    pub total_revenue: String,
}

impl Default for TotalRevenue {
    fn default() -> Self {
        Self {
            total_revenue: "0.00".to_string(),
        }
    }
}
