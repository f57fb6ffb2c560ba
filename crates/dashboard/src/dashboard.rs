use fuel_dash_core::{DecimalFormat, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE_MS};
use futures::future::join_all;
use slog::{debug, info, Logger};
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    pivot_price_evolution, spawn_filtered_view, DataGateway, FilterKind, FilterSnapshot,
    FilterValue, LineChartData, PageState, PieChartData, RecordPage, SearchPipeline,
    VisibleRecords, KNOWN_FUEL_TYPES, STATUS_LOADING,
};

/// Loading flag plus the last display value of one data source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceState<T> {
    pub loading: bool,
    pub value: T,
}

/// Observable state of one data source.
///
/// `begin` raises the loading flag when a fetch is issued, `finish` lowers it and
/// applies the result in one notification.
pub struct SourceCell<T> {
    sender: watch::Sender<SourceState<T>>,
}

impl<T: Clone> SourceCell<T> {
    fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(SourceState {
            loading: false,
            value: initial,
        });
        Self { sender }
    }

    fn begin(&self) {
        self.sender.send_modify(|state| state.loading = true);
    }

    fn finish(&self, update: impl FnOnce(&mut T)) {
        self.sender.send_modify(|state| {
            update(&mut state.value);
            state.loading = false;
        });
    }

    pub fn is_loading(&self) -> bool {
        self.sender.borrow().loading
    }

    pub fn value(&self) -> T {
        self.sender.borrow().value.clone()
    }

    pub fn snapshot(&self) -> SourceState<T> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SourceState<T>> {
        self.sender.subscribe()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopConsumerDisplay {
    pub vehicle_type: String,
    pub total_volume: String,
    pub formatted_volume: String,
}

/// Every source the dashboard drives, each with its own flag and value.
pub struct Sources {
    pub status: SourceCell<String>,
    /// Fuel type to formatted average price.
    pub fuel_averages: SourceCell<BTreeMap<String, String>>,
    pub total_revenue: SourceCell<String>,
    pub top_consumer: SourceCell<TopConsumerDisplay>,
    pub price_evolution: SourceCell<LineChartData>,
    pub consumption: SourceCell<PieChartData>,
    /// Page requested by the last records fetch; rows live in the record store.
    pub records: SourceCell<PageState>,
}

impl Sources {
    fn new(format: DecimalFormat, page: PageState) -> Self {
        let averages = KNOWN_FUEL_TYPES
            .iter()
            .map(|fuel| (fuel.to_string(), format.zero()))
            .collect();

        Self {
            status: SourceCell::new(STATUS_LOADING.to_string()),
            fuel_averages: SourceCell::new(averages),
            total_revenue: SourceCell::new(format.zero()),
            top_consumer: SourceCell::new(TopConsumerDisplay {
                vehicle_type: crate::UNKNOWN_VEHICLE.to_string(),
                total_volume: format.zero(),
                formatted_volume: format.zero(),
            }),
            price_evolution: SourceCell::new(LineChartData::default()),
            consumption: SourceCell::new(PieChartData::default()),
            records: SourceCell::new(page),
        }
    }
}

/// Point-in-time copy of the six filtered sources' loading flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingFlags {
    pub records: bool,
    pub fuel_averages: bool,
    pub total_revenue: bool,
    pub top_consumer: bool,
    pub price_evolution: bool,
    pub consumption: bool,
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub page_size: u32,
    pub search_debounce: Duration,
    pub format: DecimalFormat,
    pub filters: FilterSnapshot,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            format: DecimalFormat::default(),
            filters: FilterSnapshot::default(),
        }
    }
}

/// Fetches issued by one trigger. Dropping it detaches them; nothing is cancelled.
pub struct FetchBatch {
    handles: Vec<JoinHandle<()>>,
}

impl FetchBatch {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait until every fetch in the batch has completed.
    pub async fn settled(self) {
        join_all(self.handles).await;
    }
}

/// Owns filter and page state and drives the data sources.
///
/// Each trigger captures a [`FilterSnapshot`] and spawns one task per source. Tasks
/// complete in any order; whichever response lands last for a source is what that
/// source shows. Must be created inside a tokio runtime.
pub struct Dashboard {
    logger: Logger,
    gateway: Arc<DataGateway>,
    sources: Arc<Sources>,
    format: DecimalFormat,
    filters: FilterSnapshot,
    page: PageState,
    search: SearchPipeline,
    visible: watch::Receiver<VisibleRecords>,
    cancel: CancellationToken,
}

impl Dashboard {
    pub fn new(logger: Logger, gateway: Arc<DataGateway>, options: DashboardOptions) -> Self {
        let page = PageState::new(options.page_size);
        let cancel = CancellationToken::new();
        let search = SearchPipeline::spawn("", options.search_debounce, cancel.child_token());
        let visible = spawn_filtered_view(
            gateway.records().subscribe(),
            search.subscribe(),
            cancel.child_token(),
        );

        Self {
            logger,
            sources: Arc::new(Sources::new(options.format, page)),
            gateway,
            format: options.format,
            filters: options.filters,
            page,
            search,
            visible,
            cancel,
        }
    }

    /// Initial load: status plus the six filtered sources.
    pub fn mount(&self) -> FetchBatch {
        info!(self.logger, "loading dashboard"; "filters" => format!("{:?}", self.filters));
        self.refresh_all()
    }

    /// Change one filter, go back to page 1 and reload everything.
    pub fn set_filter(&mut self, kind: FilterKind, value: FilterValue) -> FetchBatch {
        self.filters.set(kind, value);
        self.on_filters_changed()
    }

    pub fn set_filters(&mut self, filters: FilterSnapshot) -> FetchBatch {
        self.filters = filters;
        self.on_filters_changed()
    }

    /// Move to `page` and reload only the records. Pages below 1 are ignored.
    pub fn change_page(&mut self, page: i64) -> Option<FetchBatch> {
        if !self.page.go_to(page) {
            debug!(self.logger, "ignoring page change to {}", page);
            return None;
        }
        Some(FetchBatch {
            handles: vec![self.load_records()],
        })
    }

    /// Feed raw search input; filtering happens locally once the term commits.
    pub fn search(&self, raw: &str) {
        self.search.push(raw);
    }

    pub fn filters(&self) -> &FilterSnapshot {
        &self.filters
    }

    pub fn format(&self) -> DecimalFormat {
        self.format
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    pub fn loading_flags(&self) -> LoadingFlags {
        LoadingFlags {
            records: self.sources.records.is_loading(),
            fuel_averages: self.sources.fuel_averages.is_loading(),
            total_revenue: self.sources.total_revenue.is_loading(),
            top_consumer: self.sources.top_consumer.is_loading(),
            price_evolution: self.sources.price_evolution.is_loading(),
            consumption: self.sources.consumption.is_loading(),
        }
    }

    pub fn record_page(&self) -> RecordPage {
        self.gateway.records().current()
    }

    pub fn committed_search(&self) -> String {
        self.search.committed()
    }

    pub fn visible_records(&self) -> VisibleRecords {
        Arc::clone(&self.visible.borrow())
    }

    pub fn subscribe_visible(&self) -> watch::Receiver<VisibleRecords> {
        self.visible.clone()
    }

    /// Stop the search and table tasks. In-flight fetches still complete.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn on_filters_changed(&mut self) -> FetchBatch {
        self.page.reset();
        info!(self.logger, "filters changed"; "filters" => format!("{:?}", self.filters));
        self.refresh_all()
    }

    fn refresh_all(&self) -> FetchBatch {
        let filters = self.filters.clone();
        let handles = vec![
            self.load_records(),
            self.load_fuel_averages(filters.clone()),
            self.load_total_revenue(filters.clone()),
            self.load_top_consumer(filters.clone()),
            self.load_price_evolution(filters.clone()),
            self.load_consumption(filters),
            self.load_status(),
        ];
        FetchBatch { handles }
    }

    fn load_status(&self) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let sources = Arc::clone(&self.sources);
        sources.status.begin();
        tokio::spawn(async move {
            let status = gateway.fetch_status().await;
            sources
                .status
                .finish(|value| *value = status.display().to_string());
        })
    }

    fn load_records(&self) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let sources = Arc::clone(&self.sources);
        let filters = self.filters.clone();
        let page = self.page;
        sources.records.begin();
        tokio::spawn(async move {
            gateway
                .fetch_record_page(&filters, page.skip(), page.page_size())
                .await;
            sources.records.finish(|value| *value = page);
        })
    }

    fn load_fuel_averages(&self, filters: FilterSnapshot) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let sources = Arc::clone(&self.sources);
        let format = self.format;
        sources.fuel_averages.begin();
        tokio::spawn(async move {
            let averages = gateway.fetch_fuel_averages(&filters).await;
            sources.fuel_averages.finish(|shown| {
                for average in averages {
                    let price = average
                        .average_price
                        .map(|p| format.format(p))
                        .unwrap_or_else(|| format.zero());
                    shown.insert(average.fuel_type, price);
                }
            });
        })
    }

    fn load_total_revenue(&self, filters: FilterSnapshot) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let sources = Arc::clone(&self.sources);
        let format = self.format;
        sources.total_revenue.begin();
        tokio::spawn(async move {
            let revenue = gateway.fetch_total_revenue(&filters).await;
            sources
                .total_revenue
                .finish(|value| *value = format.format_str(&revenue.total_revenue));
        })
    }

    fn load_top_consumer(&self, filters: FilterSnapshot) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let sources = Arc::clone(&self.sources);
        let format = self.format;
        sources.top_consumer.begin();
        tokio::spawn(async move {
            let top = gateway.fetch_top_consumer(&filters).await;
            sources.top_consumer.finish(|value| {
                *value = TopConsumerDisplay {
                    formatted_volume: format.format_str(&top.total_volume),
                    vehicle_type: top.vehicle_type,
                    total_volume: top.total_volume,
                }
            });
        })
    }

    fn load_price_evolution(&self, filters: FilterSnapshot) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let sources = Arc::clone(&self.sources);
        sources.price_evolution.begin();
        tokio::spawn(async move {
            let points = gateway.fetch_price_evolution(&filters).await;
            let chart = pivot_price_evolution(&points);
            sources.price_evolution.finish(|value| *value = chart);
        })
    }

    fn load_consumption(&self, filters: FilterSnapshot) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let sources = Arc::clone(&self.sources);
        sources.consumption.begin();
        tokio::spawn(async move {
            let pie = gateway.fetch_consumption_distribution(&filters).await;
            sources.consumption.finish(|value| *value = pie);
        })
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
