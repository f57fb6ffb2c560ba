use fuel_dash::{
    get_config_info, setup_logger, Command, Dashboard, DataGateway, HttpTransport,
};
use slog::{error, info, warn};
use std::{fmt::Write as _, sync::Arc, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Rows printed per table render.
const TABLE_PREVIEW: usize = 20;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let (cli, source) = get_config_info();
    let logger = setup_logger(&cli);

    info!(logger, "Fuel dashboard starting...");
    info!(logger, "  Config: {}", source);
    info!(logger, "  API URL: {}", cli.base_url());
    info!(logger, "  Page size: {}", cli.page_size());
    if cli.token.is_none() {
        warn!(logger, "no API token configured, requests will be anonymous");
    }

    let transport = HttpTransport::new(
        logger.clone(),
        &cli.base_url(),
        cli.token.as_deref(),
        &cli.user_agent(),
        cli.request_timeout(),
    )?;
    let gateway = Arc::new(DataGateway::new(logger.clone(), Arc::new(transport)));
    let mut dashboard = Dashboard::new(logger.clone(), gateway, cli.dashboard_options());
    let settle_search = cli.search_debounce() + Duration::from_millis(50);

    dashboard.mount().settled().await;
    tokio::task::yield_now().await;
    println!("{}", render(&dashboard));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                error!(logger, "{}", err);
                continue;
            }
        };

        match command {
            Command::Filter(kind, value) => {
                dashboard.set_filter(kind, value).settled().await;
                // let the table view pick up the new page
                tokio::task::yield_now().await;
                println!("{}", render(&dashboard));
            }
            Command::Page(page) => match dashboard.change_page(page) {
                Some(batch) => {
                    batch.settled().await;
                    tokio::task::yield_now().await;
                    println!("{}", render_table(&dashboard));
                }
                None => warn!(logger, "page must be 1 or greater"),
            },
            Command::Search(term) => {
                dashboard.search(&term);
                tokio::time::sleep(settle_search).await;
                println!("{}", render_table(&dashboard));
            }
            Command::Show => println!("{}", render(&dashboard)),
            Command::Quit => break,
        }
    }

    dashboard.shutdown();
    Ok(())
}

fn render(dashboard: &Dashboard) -> String {
    let sources = dashboard.sources();
    let filters = dashboard.filters();
    let format = dashboard.format();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "== fuel: {} | state: {} | vehicle: {} ==",
        filters.fuel, filters.state, filters.vehicle
    );
    let _ = writeln!(out, "status: {}", sources.status.value());
    let _ = writeln!(out, "revenue: R$ {}", sources.total_revenue.value());

    let top = sources.top_consumer.value();
    let _ = writeln!(
        out,
        "top consumer: {} ({} L)",
        top.vehicle_type, top.formatted_volume
    );

    for (fuel, price) in sources.fuel_averages.value() {
        let _ = writeln!(out, "avg {}: R$ {}", fuel, price);
    }

    let chart = sources.price_evolution.value();
    let _ = writeln!(
        out,
        "price evolution: {} dates x {} fuels",
        chart.categories.len(),
        chart.series.len()
    );

    let pie = sources.consumption.value();
    for (label, volume) in pie.labels.iter().zip(pie.data.iter()) {
        let _ = writeln!(out, "volume {}: {} L", label, format.format(*volume));
    }

    out.push_str(&render_table(dashboard));
    out
}

fn render_table(dashboard: &Dashboard) -> String {
    let page = dashboard.page();
    let visible = dashboard.visible_records();
    let format = dashboard.format();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "-- page {} | {} of {} rows | search: {:?} --",
        page.current_page(),
        visible.len(),
        dashboard.record_page().len(),
        dashboard.committed_search()
    );
    for record in visible.iter().take(TABLE_PREVIEW) {
        let _ = writeln!(
            out,
            "{} | {} | {} | {} | {} | {} x {} = {}",
            record.data_coleta,
            record.posto_nome,
            record.motorista_nome,
            record.veiculo_placa,
            record.tipo_combustivel,
            format.format(record.preco_venda),
            format.format(record.volume_vendido),
            format.format(record.total())
        );
    }
    out
}
