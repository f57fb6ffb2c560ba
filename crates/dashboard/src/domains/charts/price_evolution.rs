use fuel_dash_core::format::{de_f64_lenient, de_string_lenient};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One `(date, fuel type, average price)` row from `/dashboard/historico-preco-combustivel`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricePoint {
    #[serde(rename = "data_coleta", deserialize_with = "de_string_lenient")]
    pub date: String,
    #[serde(rename = "tipo_combustivel", deserialize_with = "de_string_lenient")]
    pub fuel_type: String,
    #[serde(rename = "preco_medio_arredondado", deserialize_with = "de_f64_lenient")]
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
}

/// Line chart input: one series per fuel type over a shared date axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineChartData {
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// Pivot sparse price rows into a dense date x fuel matrix.
///
/// Dates are ISO strings, so sorting them lexicographically sorts them in time.
/// Fuel types keep first-seen order. Missing `(date, fuel)` cells are 0; when a pair
/// repeats, the later row wins.
pub fn pivot_price_evolution(points: &[PricePoint]) -> LineChartData {
    let dates: BTreeSet<&str> = points.iter().map(|p| p.date.as_str()).collect();

    let mut fuel_types: Vec<&str> = Vec::new();
    let mut prices: HashMap<(&str, &str), f64> = HashMap::with_capacity(points.len());
    for point in points {
        if !fuel_types.contains(&point.fuel_type.as_str()) {
            fuel_types.push(&point.fuel_type);
        }
        prices.insert((point.date.as_str(), point.fuel_type.as_str()), point.price);
    }

    let series = fuel_types
        .iter()
        .map(|fuel| ChartSeries {
            label: fuel.to_string(),
            data: dates
                .iter()
                .map(|date| prices.get(&(*date, *fuel)).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    LineChartData {
        categories: dates.into_iter().map(str::to_string).collect(),
        series,
    }
}
