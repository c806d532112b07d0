//! Site address resolution: races candidate endpoints to the first
//! established connection.

use std::time::Duration;

use tokio::task::JoinSet;

use crate::config::Credentials;
use crate::domain::site::{ConnectionCandidate, Series, SiteId};
use crate::error::{Result, TillrollError};
use crate::source::SiteConnector;

/// Resolve connectivity for a site on the chosen addressing series.
///
/// Builds one candidate per configured prefix and races them; see
/// [`resolve_candidates`].
pub async fn resolve<C: SiteConnector>(
    connector: &C,
    site_id: &SiteId,
    series: Series,
    credentials: &Credentials,
    connect_timeout: Duration,
) -> Result<C::Connection> {
    let candidates = ConnectionCandidate::for_site(site_id, series);
    resolve_candidates(connector, site_id, candidates, credentials, connect_timeout).await
}

/// Race an explicit candidate set to the first successful connection.
///
/// One attempt is spawned per candidate, each bounded by `connect_timeout`.
/// The first connection to come up wins and the remaining attempts are
/// aborted with the task set. Fails with [`TillrollError::Connectivity`]
/// naming every attempted host when no candidate succeeds.
pub async fn resolve_candidates<C: SiteConnector>(
    connector: &C,
    site_id: &SiteId,
    candidates: Vec<ConnectionCandidate>,
    credentials: &Credentials,
    connect_timeout: Duration,
) -> Result<C::Connection> {
    let hosts: Vec<String> = candidates.iter().map(|c| c.host.clone()).collect();

    let mut attempts: JoinSet<std::result::Result<C::Connection, ()>> = JoinSet::new();
    for candidate in candidates {
        let connector = connector.clone();
        let credentials = credentials.clone();
        attempts.spawn(async move {
            let host = candidate.host;
            match tokio::time::timeout(connect_timeout, connector.connect(&host, &credentials))
                .await
            {
                Ok(Ok(connection)) => {
                    tracing::debug!(host = %host, "candidate connection established");
                    Ok(connection)
                }
                Ok(Err(error)) => {
                    tracing::debug!(host = %host, error = %error, "candidate connection failed");
                    Err(())
                }
                Err(_) => {
                    tracing::debug!(
                        host = %host,
                        timeout_ms = connect_timeout.as_millis() as u64,
                        "candidate connection timed out"
                    );
                    Err(())
                }
            }
        });
    }

    while let Some(joined) = attempts.join_next().await {
        match joined {
            // First success wins; dropping the set aborts the other attempts.
            Ok(Ok(connection)) => return Ok(connection),
            Ok(Err(())) => continue,
            Err(join_error) => {
                tracing::warn!(error = %join_error, "candidate attempt task failed");
                continue;
            }
        }
    }

    Err(TillrollError::Connectivity {
        site_id: site_id.clone(),
        candidates: hosts,
    })
}
