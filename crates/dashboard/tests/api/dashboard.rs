use crate::helpers::{healthy_api, record, sample_records, settle, spawn_dashboard, FakeTransport};
use fuel_dash::{
    FilterKind, FilterValue, LoadingFlags, CONSUMPTION_PATH, FUEL_AVERAGES_PATH,
    PRICE_EVOLUTION_PATH, RECORDS_PATH, STATUS_PATH, STATUS_UNAVAILABLE, TOP_CONSUMER_PATH,
    TOTAL_REVENUE_PATH, UNKNOWN_VEHICLE,
};
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;

const ALL_LOADING: LoadingFlags = LoadingFlags {
    records: true,
    fuel_averages: true,
    total_revenue: true,
    top_consumer: true,
    price_evolution: true,
    consumption: true,
};

fn driver_names(records: &[fuel_dash::HistoricalRecord]) -> Vec<&str> {
    records.iter().map(|r| r.motorista_nome.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn mount_loads_every_source_once() {
    let test = spawn_dashboard(healthy_api());
    let dashboard = &test.dashboard;

    let batch = dashboard.mount();
    assert_eq!(batch.len(), 7);
    assert_eq!(dashboard.loading_flags(), ALL_LOADING);
    settle(batch).await;

    assert_eq!(dashboard.loading_flags(), LoadingFlags::default());
    let calls = test.transport.calls();
    assert_eq!(calls.len(), 7);
    for path in [
        STATUS_PATH,
        RECORDS_PATH,
        FUEL_AVERAGES_PATH,
        PRICE_EVOLUTION_PATH,
        CONSUMPTION_PATH,
        TOP_CONSUMER_PATH,
        TOTAL_REVENUE_PATH,
    ] {
        assert_eq!(test.transport.calls_to(path).len(), 1, "{}", path);
    }

    let sources = dashboard.sources();
    assert_eq!(sources.status.value(), "Dados atualizados há 3 minutos");
    assert_eq!(sources.total_revenue.value(), "27345.68");

    let top = sources.top_consumer.value();
    assert_eq!(top.vehicle_type, "Carreta");
    assert_eq!(top.total_volume, "4310.0");
    assert_eq!(top.formatted_volume, "4310.00");

    let averages = sources.fuel_averages.value();
    assert_eq!(averages["Gasolina"], "5.90");
    assert_eq!(averages["Etanol"], "3.95");
    // known fuel with no row from the API keeps its zero
    assert_eq!(averages["Diesel S10"], "0.00");

    let chart = sources.price_evolution.value();
    assert_eq!(chart.categories, vec!["2024-01-01", "2024-01-02"]);
    assert_eq!(chart.series[0].label, "Etanol");
    assert_eq!(chart.series[0].data, vec![0.0, 4.0]);
    assert_eq!(chart.series[1].label, "Gasolina");
    assert_eq!(chart.series[1].data, vec![5.0, 0.0]);

    let pie = sources.consumption.value();
    assert_eq!(pie.labels, vec!["Carro", "Carreta"]);
    assert_eq!(pie.data, vec![820.5, 4310.0]);

    assert_eq!(dashboard.record_page().len(), 3);
    assert_eq!(dashboard.visible_records().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn filter_change_resets_page_and_refetches_with_params() {
    let mut test = spawn_dashboard(healthy_api());
    settle(test.dashboard.mount()).await;
    if let Some(batch) = test.dashboard.change_page(3) {
        settle(batch).await;
    }
    assert_eq!(test.dashboard.page().current_page(), 3);
    let before = test.transport.calls().len();

    let batch = test
        .dashboard
        .set_filter(FilterKind::Fuel, FilterValue::only("Diesel S10"));
    assert_eq!(test.dashboard.page().current_page(), 1);
    assert_eq!(batch.len(), 7);
    settle(batch).await;

    let calls = test.transport.calls();
    let issued = &calls[before..];
    assert_eq!(issued.len(), 7);
    for call in issued.iter().filter(|call| call.path != STATUS_PATH) {
        assert_eq!(call.param("tipo_combustivel"), Some("Diesel S10"));
        assert_eq!(call.param("estado"), None);
        assert_eq!(call.param("tipo_veiculo"), None);
    }
    let records_call = issued
        .iter()
        .find(|call| call.path == RECORDS_PATH)
        .expect("records call");
    assert_eq!(records_call.param("skip"), Some("0"));
    assert_eq!(records_call.param("limit"), Some("10"));

    // back to "all" drops the param again
    let before = test.transport.calls().len();
    settle(test.dashboard.set_filter(FilterKind::Fuel, "todos".parse().unwrap())).await;
    assert!(test.transport.calls()[before..]
        .iter()
        .all(|call| call.param("tipo_combustivel").is_none()));
}

#[tokio::test(start_paused = true)]
async fn failed_sources_show_defaults_without_touching_others() {
    let api = FakeTransport::new();
    api.respond(STATUS_PATH, json!({"friendly_status": "ok"}))
        .respond(RECORDS_PATH, sample_records())
        .respond(
            FUEL_AVERAGES_PATH,
            json!([{"tipo_combustivel": "Gasolina", "media_preco": 6.0}]),
        )
        .respond(PRICE_EVOLUTION_PATH, json!([]))
        .respond(CONSUMPTION_PATH, json!([]))
        .fail(TOTAL_REVENUE_PATH, StatusCode::INTERNAL_SERVER_ERROR)
        .fail(TOP_CONSUMER_PATH, StatusCode::INTERNAL_SERVER_ERROR);
    let test = spawn_dashboard(api);

    settle(test.dashboard.mount()).await;

    let sources = test.dashboard.sources();
    assert_eq!(test.dashboard.loading_flags(), LoadingFlags::default());
    assert_eq!(sources.total_revenue.value(), "0.00");
    let top = sources.top_consumer.value();
    assert_eq!(top.vehicle_type, UNKNOWN_VEHICLE);
    assert_eq!(top.formatted_volume, "0.00");

    assert_eq!(sources.status.value(), "ok");
    assert_eq!(sources.fuel_averages.value()["Gasolina"], "6.00");
    assert_eq!(test.dashboard.record_page().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn unreachable_api_leaves_every_widget_in_its_empty_state() {
    let test = spawn_dashboard(FakeTransport::new());

    settle(test.dashboard.mount()).await;

    let sources = test.dashboard.sources();
    assert_eq!(test.dashboard.loading_flags(), LoadingFlags::default());
    assert_eq!(sources.status.value(), STATUS_UNAVAILABLE);
    assert!(sources
        .fuel_averages
        .value()
        .values()
        .all(|price| price == "0.00"));
    assert!(sources.price_evolution.value().categories.is_empty());
    assert!(sources.consumption.value().labels.is_empty());
    assert!(test.dashboard.visible_records().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sources_resolve_independently() {
    let api = healthy_api();
    api.clear(TOP_CONSUMER_PATH).respond_after(
        TOP_CONSUMER_PATH,
        Duration::from_millis(500),
        json!({"tipo_veiculo": "Van", "volume_total": "12.5"}),
    );
    let test = spawn_dashboard(api);

    let batch = test.dashboard.mount();
    sleep(Duration::from_millis(10)).await;

    let flags = test.dashboard.loading_flags();
    assert!(flags.top_consumer);
    assert!(!flags.total_revenue);
    assert!(!flags.records);
    assert_eq!(test.dashboard.sources().total_revenue.value(), "27345.68");

    settle(batch).await;
    assert!(!test.dashboard.loading_flags().top_consumer);
    assert_eq!(test.dashboard.sources().top_consumer.value().vehicle_type, "Van");
}

#[tokio::test(start_paused = true)]
async fn invalid_page_issues_no_request() {
    let mut test = spawn_dashboard(healthy_api());
    settle(test.dashboard.mount()).await;
    let before = test.transport.calls().len();

    assert!(test.dashboard.change_page(0).is_none());
    assert!(test.dashboard.change_page(-4).is_none());

    assert_eq!(test.transport.calls().len(), before);
    assert_eq!(test.dashboard.page().current_page(), 1);
    assert!(!test.dashboard.loading_flags().records);
}

#[tokio::test(start_paused = true)]
async fn page_change_reloads_only_records() {
    let mut test = spawn_dashboard(healthy_api());
    settle(test.dashboard.mount()).await;
    let before = test.transport.calls().len();

    let batch = test.dashboard.change_page(3).expect("valid page");
    assert_eq!(batch.len(), 1);
    assert_eq!(
        test.dashboard.loading_flags(),
        LoadingFlags {
            records: true,
            ..LoadingFlags::default()
        }
    );
    settle(batch).await;

    let calls = test.transport.calls();
    let issued = &calls[before..];
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].path, RECORDS_PATH);
    assert_eq!(issued[0].param("skip"), Some("20"));
    assert_eq!(issued[0].param("limit"), Some("10"));
    assert_eq!(test.dashboard.sources().records.value().current_page(), 3);
}

#[tokio::test(start_paused = true)]
async fn search_filters_the_loaded_page_locally() {
    let api = healthy_api();
    api.respond(
        RECORDS_PATH,
        json!([
            record(11, "Marina Souza", "Posto Norte", "XYZ9K88", "10120230344"),
            record(12, "Paulo Reis", "Posto Marina", "PAU3L00", "40450560677"),
        ]),
    );
    let mut test = spawn_dashboard(api);
    settle(test.dashboard.mount()).await;
    let before = test.transport.calls().len();

    test.dashboard.search("  MARINA ");
    sleep(Duration::from_millis(310)).await;
    assert_eq!(test.dashboard.committed_search(), "marina");
    assert_eq!(
        driver_names(&test.dashboard.visible_records()),
        vec!["Marina Alves"]
    );
    assert_eq!(test.transport.calls().len(), before);

    // cpf digits match verbatim
    test.dashboard.search("987654");
    sleep(Duration::from_millis(310)).await;
    assert_eq!(
        driver_names(&test.dashboard.visible_records()),
        vec!["Carlos Lima"]
    );

    // a new page is filtered by the committed term
    test.dashboard.search("marina");
    sleep(Duration::from_millis(310)).await;
    let batch = test.dashboard.change_page(2).expect("valid page");
    settle(batch).await;
    assert_eq!(
        driver_names(&test.dashboard.visible_records()),
        vec!["Marina Souza", "Paulo Reis"]
    );

    test.dashboard.search("");
    sleep(Duration::from_millis(310)).await;
    assert_eq!(test.dashboard.visible_records().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn search_waits_for_quiet_input() {
    let test = spawn_dashboard(healthy_api());
    settle(test.dashboard.mount()).await;

    for partial in ["c", "ca", "car"] {
        test.dashboard.search(partial);
        sleep(Duration::from_millis(100)).await;
    }
    // still typing: nothing committed yet
    assert_eq!(test.dashboard.committed_search(), "");
    assert_eq!(test.dashboard.visible_records().len(), 3);

    sleep(Duration::from_millis(250)).await;
    assert_eq!(test.dashboard.committed_search(), "car");
    assert_eq!(
        driver_names(&test.dashboard.visible_records()),
        vec!["Carlos Lima"]
    );
}

#[tokio::test(start_paused = true)]
async fn last_resolved_response_wins() {
    let api = healthy_api();
    let stale = json!([record(7, "Stale Driver", "Posto Velho", "OLD0A00", "00000000000")]);
    let fresh = json!([record(8, "Fresh Driver", "Posto Novo", "NEW0A00", "11111111111")]);
    api.clear(RECORDS_PATH)
        .respond_after(RECORDS_PATH, Duration::from_millis(300), stale)
        .respond(RECORDS_PATH, fresh);
    let mut test = spawn_dashboard(api);

    let first = test.dashboard.mount();
    let second = test
        .dashboard
        .set_filter(FilterKind::State, FilterValue::only("PR"));
    settle(second).await;
    assert_eq!(test.dashboard.record_page()[0].id, 8);

    // the slower, older request lands afterwards and overwrites
    settle(first).await;
    assert_eq!(test.dashboard.record_page()[0].id, 7);
    assert_eq!(
        driver_names(&test.dashboard.visible_records()),
        vec!["Stale Driver"]
    );
    assert!(!test.dashboard.loading_flags().records);
}

#[tokio::test(start_paused = true)]
async fn loading_flag_rises_and_clears_once_per_trigger() {
    let api = FakeTransport::new();
    api.respond_after(
        TOTAL_REVENUE_PATH,
        Duration::from_millis(100),
        json!({"receita_total": "10"}),
    );
    let test = spawn_dashboard(api);
    let mut revenue = test.dashboard.sources().total_revenue.subscribe();

    let batch = test.dashboard.mount();
    {
        let state = revenue.borrow_and_update();
        assert!(state.loading);
        assert_eq!(state.value, "0.00");
    }

    revenue.changed().await.unwrap();
    {
        let state = revenue.borrow_and_update();
        assert!(!state.loading);
        assert_eq!(state.value, "10.00");
    }
    settle(batch).await;
    assert!(!revenue.has_changed().unwrap());
}
