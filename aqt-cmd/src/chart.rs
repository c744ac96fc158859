//! `chart` and `watch`: fetch the trend series and emit CSV.

use crate::ChartArgs;
use aqt_client::api::{ApiConfig, HttpApi};
use aqt_client::series::{SeriesFetcher, SeriesQuery};
use aqt_core::chart::csv_file_name;
use aqt_core::filters::{FilterState, MAX_COMPARE_PLACES};
use aqt_core::refresh::AutoRefresh;
use chrono::Utc;
use log::{info, warn};
use std::rc::Rc;
use std::time::Duration;

/// Filters equivalent to what the page would hold for these arguments.
fn filters_from_args(args: &ChartArgs) -> FilterState {
    let mut selected: Vec<String> = args
        .places
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    selected.truncate(MAX_COMPARE_PLACES);
    FilterState {
        range: args.range,
        metric: args.metric,
        place: args.filter.clone().unwrap_or_default(),
        selected_places: selected,
        ..FilterState::default()
    }
}

fn emit(csv: &str, output: Option<&str>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, csv)?;
            info!("Wrote {}", path);
        }
        None => print!("{csv}"),
    }
    Ok(())
}

pub async fn run_chart(config: ApiConfig, args: &ChartArgs) -> anyhow::Result<()> {
    let fetcher = SeriesFetcher::new(Rc::new(HttpApi::new(config)));
    let query = SeriesQuery::from_filters(&filters_from_args(args), 0);
    let snapshot = fetcher.load(&query).await?;
    if snapshot.table.is_empty() {
        warn!("No data for {} / {}", args.range.as_str(), args.metric);
    }
    emit(&snapshot.table.to_csv()?, args.output.as_deref())
}

/// Re-run the chart query on every tick. Ticks after the first bypass the
/// series cache, like the page's auto refresh.
pub async fn run_watch(
    config: ApiConfig,
    args: &ChartArgs,
    interval_secs: u64,
) -> anyhow::Result<()> {
    anyhow::ensure!(interval_secs > 0, "--interval-secs must be positive");
    let fetcher = SeriesFetcher::new(Rc::new(HttpApi::new(config)));
    let filters = filters_from_args(args);
    let mut refresh = AutoRefresh::new(interval_secs * 1000);
    let mut timer = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        timer.tick().await;
        let query = SeriesQuery::from_filters(&filters, refresh.tick);
        match fetcher.load(&query).await {
            Ok(snapshot) => {
                let csv = snapshot.table.to_csv()?;
                match args.output.as_deref() {
                    Some(dir) => {
                        let name = csv_file_name(
                            args.range.as_str(),
                            args.metric.as_str(),
                            Utc::now().timestamp_millis(),
                        );
                        let path = std::path::Path::new(dir).join(name);
                        std::fs::write(&path, csv)?;
                        info!("tick {}: wrote {}", refresh.tick, path.display());
                    }
                    None => {
                        println!("# tick {} ({} rows)", refresh.tick, snapshot.table.rows.len());
                        print!("{csv}");
                    }
                }
            }
            Err(e) => warn!("tick {} failed: {}", refresh.tick, e),
        }
        refresh.on_timer();
    }
}
