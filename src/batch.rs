//! Batch orchestration: drives the per-site pipeline sequentially and
//! packages the results.
//!
//! One run resolves connectivity, fetches, aggregates and renders per site,
//! isolating failures so that one site never blocks the rest, then bundles
//! the successful reports into a zip archive.

use chrono::Local;
use indexmap::IndexMap;
use serde::Serialize;

use crate::archive;
use crate::config::{BatchConfig, Credentials};
use crate::domain::site::{Series, SiteId};
use crate::domain::summary::SalesSummary;
use crate::domain::DateRange;
use crate::error::{Result, TillrollError};
use crate::render::{self, ReportMeta};
use crate::resolver;
use crate::source::{SiteConnection, SiteConnector};

/// Outcome of one batch run.
///
/// Both maps keep input order and use map semantics for duplicate site ids:
/// a later result overwrites the earlier entry in whichever map it lands in.
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    /// Rendered report per successfully processed site.
    pub reports: IndexMap<SiteId, String>,
    /// Failure description per failed site.
    pub failures: IndexMap<SiteId, String>,
    /// Zip archive of the successful reports; `None` when there were none.
    #[serde(skip)]
    pub archive: Option<Vec<u8>>,
}

impl BatchOutcome {
    /// The overall zero-success condition, distinct from the individual
    /// per-site failures recorded in [`BatchOutcome::failures`].
    pub fn overall_failure(&self) -> Option<TillrollError> {
        if self.reports.is_empty() {
            Some(TillrollError::NoSuccessfulReports)
        } else {
            None
        }
    }
}

/// Run the report pipeline over an ordered list of sites.
///
/// Performs a single pre-flight connectivity check against the first site;
/// a pre-flight failure aborts the whole batch before any site is attempted.
/// After that, every site is processed in input order, strictly
/// sequentially, and any per-site failure is recorded without stopping the
/// loop.
///
/// # Errors
/// Returns an error only for an empty site list, a failed pre-flight check,
/// or a failure while packaging the archive. Per-site errors end up in the
/// outcome's failure map instead.
pub async fn run_batch<C: SiteConnector>(
    connector: &C,
    site_ids: &[SiteId],
    range: DateRange,
    credentials: &Credentials,
    series: Series,
    config: &BatchConfig,
) -> Result<BatchOutcome> {
    let first = site_ids
        .first()
        .ok_or_else(|| TillrollError::Validation("site id list is empty".to_string()))?;

    // Pre-flight: validates credentials and reachability once, up front. Not
    // a per-site guarantee; individual sites may still fail below.
    if config.preflight_check {
        let probe =
            resolver::resolve(connector, first, series, credentials, config.connect_timeout())
                .await?;
        if let Err(error) = probe.close().await {
            tracing::warn!(error = %error, "failed to close pre-flight connection");
        }
        tracing::info!(
            site_count = site_ids.len(),
            series = %series,
            "pre-flight connectivity check passed"
        );
    }

    let mut outcome = BatchOutcome::default();

    for (position, site_id) in site_ids.iter().enumerate() {
        tracing::info!(
            site_id = %site_id,
            position = position + 1,
            total = site_ids.len(),
            "processing site"
        );
        match process_site(connector, site_id, &range, credentials, series, config).await {
            Ok(report) => {
                outcome.reports.insert(site_id.clone(), report);
            }
            Err(error) => {
                tracing::warn!(site_id = %site_id, error = %error, "site failed");
                outcome.failures.insert(site_id.clone(), error.to_string());
            }
        }
    }

    if outcome.reports.is_empty() {
        tracing::warn!(
            failed = outcome.failures.len(),
            "batch produced no successful reports"
        );
    } else {
        outcome.archive = Some(archive::build_archive(&outcome.reports)?);
        tracing::info!(
            succeeded = outcome.reports.len(),
            failed = outcome.failures.len(),
            "batch complete"
        );
    }

    Ok(outcome)
}

/// Resolve, fetch, aggregate and render one site.
///
/// The connection is released on both the success and the failure path
/// before the next site starts.
async fn process_site<C: SiteConnector>(
    connector: &C,
    site_id: &SiteId,
    range: &DateRange,
    credentials: &Credentials,
    series: Series,
    config: &BatchConfig,
) -> Result<String> {
    let connection =
        resolver::resolve(connector, site_id, series, credentials, config.connect_timeout())
            .await?;

    let result = generate_report(&connection, site_id, range).await;

    if let Err(error) = connection.close().await {
        tracing::warn!(site_id = %site_id, error = %error, "failed to close site connection");
    }

    result
}

async fn generate_report<K: SiteConnection>(
    connection: &K,
    site_id: &SiteId,
    range: &DateRange,
) -> Result<String> {
    let site_name = connection
        .site_name(site_id)
        .await?
        .unwrap_or_else(|| "Unknown Site".to_string());
    let rows = connection.fetch_rows(range).await?;
    let summary = SalesSummary::from_rows(&rows)?;

    let meta = ReportMeta {
        site_id: site_id.clone(),
        site_name,
        range: *range,
        generated_at: Local::now(),
    };
    Ok(render::render_report(&summary, &meta))
}
