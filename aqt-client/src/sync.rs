//! The "sync & refresh" pipeline action.

use crate::api::TrackingApi;
use aqt_core::sync::SyncOutcome;
use chrono::{DateTime, Utc};
use log::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    /// Set only when the backend accepted the sync.
    pub synced_at: Option<DateTime<Utc>>,
}

/// Ask the backend to re-run its ingestion pipeline. Never fails; every
/// problem is folded into the outcome message.
///
/// Callers invalidate their caches and bump the refresh tick afterwards,
/// whatever the outcome.
pub async fn run_pipeline_refresh<A: TrackingApi>(api: &A) -> SyncReport {
    let outcome = match api.pipeline_refresh().await {
        Ok(response) => SyncOutcome::from_response(response.is_success(), &response.body),
        Err(e) => SyncOutcome::Error(e.to_string()),
    };
    if outcome.is_success() {
        info!("{}", outcome);
    } else {
        warn!("{}", outcome);
    }
    SyncReport {
        synced_at: outcome.is_success().then(Utc::now),
        outcome,
    }
}
