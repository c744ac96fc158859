//! Command implementations for the tracking CLI.
//!
//! Each subcommand drives the same fetchers the dashboard uses, against the
//! backend named by the `ApiConfig` passed to [`run`].

use aqt_client::api::ApiConfig;
use aqt_core::{Metric, TimeRange};
use clap::{Args, Subcommand};

pub mod chart;
pub mod filters;
pub mod heatmap;
pub mod places;
pub mod status;

/// Chart selection shared by `chart` and `watch`.
#[derive(Args, Debug, Clone)]
pub struct ChartArgs {
    /// Time range: Today, "24 Hour", "1 Week", "1 Month", "3 Month", "1 Year"
    #[arg(long, default_value = "24 Hour")]
    pub range: TimeRange,

    /// Metric: pm25, pm10 or aqi
    #[arg(long, default_value = "pm25")]
    pub metric: Metric,

    /// Province or place to filter on
    #[arg(long)]
    pub filter: Option<String>,

    /// Comma-separated places to compare (at most 3)
    #[arg(long, value_delimiter = ',')]
    pub places: Vec<String>,

    /// Write CSV here instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the trend series and print it as CSV
    Chart(ChartArgs),

    /// Print the one-year calendar as bucket digits
    Heatmap {
        /// Province or place
        #[arg(long)]
        filter: String,

        #[arg(long, default_value = "pm25")]
        metric: Metric,
    },

    /// List known places
    Places {
        #[arg(long)]
        province: Option<String>,
    },

    /// Rank the places nearest to a position
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long)]
        province: Option<String>,
    },

    /// Print the last-updated span across compared places
    Freshness {
        #[arg(long, value_delimiter = ',', required = true)]
        places: Vec<String>,
    },

    /// Trigger the backend pipeline refresh
    Sync,

    /// Parse a tracking query string and print the derived filters
    Filters {
        /// e.g. "range=1+Week&places=Bangkok,Chiang+Mai"
        #[arg(long)]
        query: String,
    },

    /// Re-fetch the chart on every auto-refresh tick
    Watch {
        /// Seconds between refreshes
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,

        #[command(flatten)]
        chart: ChartArgs,
    },
}

pub async fn run(command: Command, config: ApiConfig) -> anyhow::Result<()> {
    match command {
        Command::Chart(args) => chart::run_chart(config, &args).await,
        Command::Heatmap { filter, metric } => heatmap::run_heatmap(config, &filter, metric).await,
        Command::Places { province } => {
            places::run_places(config, province.as_deref().unwrap_or("")).await
        }
        Command::Nearby { lat, lon, province } => {
            places::run_nearby(config, lat, lon, province.as_deref().unwrap_or("")).await
        }
        Command::Freshness { places } => status::run_freshness(config, &places).await,
        Command::Sync => status::run_sync(config).await,
        Command::Filters { query } => filters::run_filters(&query),
        Command::Watch {
            interval_secs,
            chart,
        } => chart::run_watch(config, &chart, interval_secs).await,
    }
}
