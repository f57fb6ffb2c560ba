use fuel_dash_core::format::{de_f64_lenient, de_string_lenient};
use serde::{Deserialize, Serialize};

/// Slice colours, reused in order when there are more than seven vehicle types.
pub const CHART_PALETTE: [&str; 7] = [
    "#4f46e5", "#059669", "#f59e0b", "#ef4444", "#10b981", "#3b82f6", "#6366f1",
];

/// One row of `/dashboard/volume-por-veiculo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleVolume {
    #[serde(rename = "tipo_veiculo", deserialize_with = "de_string_lenient")]
    pub vehicle_type: String,
    #[serde(rename = "volume_total", deserialize_with = "de_f64_lenient")]
    pub total_volume: f64,
}

/// Pie chart input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChartData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
}

pub fn consumption_distribution(volumes: &[VehicleVolume]) -> PieChartData {
    PieChartData {
        labels: volumes.iter().map(|v| v.vehicle_type.clone()).collect(),
        data: volumes.iter().map(|v| v.total_volume).collect(),
        background_color: (0..volumes.len())
            .map(|i| CHART_PALETTE[i % CHART_PALETTE.len()].to_string())
            .collect(),
    }
}
