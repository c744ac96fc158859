//! `freshness` and `sync`.

use aqt_client::api::{ApiConfig, HttpApi};
use aqt_client::freshness::CompareRangeResolver;
use aqt_client::sync::run_pipeline_refresh;
use aqt_core::filters::MAX_COMPARE_PLACES;
use aqt_core::freshness::describe_span;
use chrono::{Local, Utc};
use std::rc::Rc;

pub async fn run_freshness(config: ApiConfig, places: &[String]) -> anyhow::Result<()> {
    let resolver = CompareRangeResolver::new(Rc::new(HttpApi::new(config)));
    let places: Vec<String> = places.iter().take(MAX_COMPARE_PLACES).cloned().collect();
    let span = resolver.resolve(&places).await?;
    println!("{}", describe_span(span, Utc::now().timestamp_millis()));
    Ok(())
}

pub async fn run_sync(config: ApiConfig) -> anyhow::Result<()> {
    let api = HttpApi::new(config);
    let report = run_pipeline_refresh(&api).await;
    println!("{}", report.outcome);
    if let Some(at) = report.synced_at {
        println!("Last sync {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"));
    }
    anyhow::ensure!(report.outcome.is_success(), "pipeline refresh did not succeed");
    Ok(())
}
