use serde::de::DeserializeOwned;
use slog::{debug, error, Logger};
use std::sync::Arc;

use crate::{
    consumption_distribution, DataStatus, FilterSnapshot, FuelAverage, HistoricalRecord,
    PieChartData, PricePoint, RecordPage, RecordStore, StatusReport, TopConsumer, TotalRevenue,
    Transport, TransportError, VehicleVolume,
};

pub const STATUS_PATH: &str = "/status-dados";
pub const RECORDS_PATH: &str = "/coletas/coletas";
pub const FUEL_AVERAGES_PATH: &str = "/dashboard/media-preco-combustivel";
pub const PRICE_EVOLUTION_PATH: &str = "/dashboard/historico-preco-combustivel";
pub const CONSUMPTION_PATH: &str = "/dashboard/volume-por-veiculo";
pub const TOP_CONSUMER_PATH: &str = "/dashboard/maior-consumidor";
pub const TOTAL_REVENUE_PATH: &str = "/dashboard/receita-total-estimada";

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected payload from {path}: {source}")]
    Payload {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Typed access to the telemetry API.
///
/// Every public `fetch_*` call is infallible: transport failures, non-2xx responses and
/// malformed payloads are logged and replaced by that endpoint's safe default.
pub struct DataGateway {
    logger: Logger,
    transport: Arc<dyn Transport>,
    records: RecordStore,
}

impl DataGateway {
    pub fn new(logger: Logger, transport: Arc<dyn Transport>) -> Self {
        Self {
            logger,
            transport,
            records: RecordStore::new(),
        }
    }

    /// The store refreshed by [`DataGateway::fetch_record_page`].
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub async fn fetch_status(&self) -> DataStatus {
        let result = self.get::<StatusReport>(STATUS_PATH, Vec::new()).await;
        self.or_default(STATUS_PATH, result.map(DataStatus::Available), || {
            DataStatus::Unavailable
        })
    }

    pub async fn fetch_fuel_averages(&self, filters: &FilterSnapshot) -> Vec<FuelAverage> {
        let result = self.get(FUEL_AVERAGES_PATH, filters.query_params()).await;
        self.or_default(FUEL_AVERAGES_PATH, result, Vec::new)
    }

    /// Raw rows; see [`crate::pivot_price_evolution`] for the chart shape.
    pub async fn fetch_price_evolution(&self, filters: &FilterSnapshot) -> Vec<PricePoint> {
        let result = self.get(PRICE_EVOLUTION_PATH, filters.query_params()).await;
        self.or_default(PRICE_EVOLUTION_PATH, result, Vec::new)
    }

    pub async fn fetch_consumption_distribution(&self, filters: &FilterSnapshot) -> PieChartData {
        let result = self
            .get::<Vec<VehicleVolume>>(CONSUMPTION_PATH, filters.query_params())
            .await
            .map(|volumes| consumption_distribution(&volumes));
        self.or_default(CONSUMPTION_PATH, result, PieChartData::default)
    }

    pub async fn fetch_top_consumer(&self, filters: &FilterSnapshot) -> TopConsumer {
        let result = self.get(TOP_CONSUMER_PATH, filters.query_params()).await;
        self.or_default(TOP_CONSUMER_PATH, result, TopConsumer::default)
    }

    pub async fn fetch_total_revenue(&self, filters: &FilterSnapshot) -> TotalRevenue {
        let result = self.get(TOTAL_REVENUE_PATH, filters.query_params()).await;
        self.or_default(TOTAL_REVENUE_PATH, result, TotalRevenue::default)
    }

    /// Fetch one page of records and, on success, publish it to the record store.
    ///
    /// A failed fetch returns an empty page and leaves the store as it was.
    pub async fn fetch_record_page(
        &self,
        filters: &FilterSnapshot,
        skip: u64,
        limit: u32,
    ) -> RecordPage {
        let mut query = filters.query_params();
        query.push(("skip".to_string(), skip.to_string()));
        query.push(("limit".to_string(), limit.to_string()));

        let result = self
            .get::<Vec<HistoricalRecord>>(RECORDS_PATH, query)
            .await
            .map(|records| self.records.replace(records));
        self.or_default(RECORDS_PATH, result, RecordPage::default)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &'static str,
        query: Vec<(String, String)>,
    ) -> Result<T, GatewayError> {
        debug!(self.logger, "fetching {}", path; "params" => query.len());
        let value = self.transport.get_json(path, &query).await?;
        serde_json::from_value(value).map_err(|source| GatewayError::Payload { path, source })
    }

    fn or_default<T>(
        &self,
        path: &str,
        result: Result<T, GatewayError>,
        default: impl FnOnce() -> T,
    ) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                error!(self.logger, "{} unavailable, using default: {}", path, err);
                default()
            }
        }
    }
}
