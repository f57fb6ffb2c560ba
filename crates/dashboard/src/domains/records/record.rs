use fuel_dash_core::format::{de_f64_lenient, de_string_lenient};
use serde::Deserialize;
use std::sync::Arc;

/// One fuel sale as served by `/coletas/coletas`.
///
/// Prices and volumes arrive as decimals encoded either as numbers or strings;
/// text fields tolerate `null` and come out empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoricalRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub posto_identificador: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub posto_nome: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub cidade: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub estado: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub data_coleta: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub tipo_combustivel: String,
    #[serde(deserialize_with = "de_f64_lenient")]
    pub preco_venda: f64,
    #[serde(deserialize_with = "de_f64_lenient")]
    pub volume_vendido: f64,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub motorista_nome: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub motorista_cpf: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub veiculo_placa: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub tipo_veiculo: String,
}

impl HistoricalRecord {
    /// Sale total, price per litre times litres sold.
    pub fn total(&self) -> f64 {
        self.preco_venda * self.volume_vendido
    }
}

/// The page of records most recently fetched from the server.
pub type RecordPage = Arc<Vec<HistoricalRecord>>;
