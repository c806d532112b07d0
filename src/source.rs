//! Data-source abstraction for site databases.
//!
//! This module defines the `SiteConnector`/`SiteConnection` traits to abstract
//! the transactional database behind the reports, enabling testability with a
//! mock implementation. The fixed summary query and the site-name lookup are
//! the production implementor's concern; the core only sees rows of the known
//! shape.

use async_trait::async_trait;

use crate::config::Credentials;
use crate::domain::row::RawRow;
use crate::domain::site::SiteId;
use crate::domain::DateRange;
use crate::error::Result;

/// A live connection to one site's database.
///
/// A connection is exclusively owned by the site-processing step that created
/// it and must be released with [`SiteConnection::close`] on every exit path,
/// success or failure, before the next site starts.
#[async_trait]
pub trait SiteConnection: Send + 'static {
    /// Look up the display name for a site.
    ///
    /// Returns `None` when the site has no name row; callers substitute a
    /// default rather than treating that as a fetch failure.
    async fn site_name(&self, site_id: &SiteId) -> Result<Option<String>>;

    /// Execute the fixed summary query over the inclusive date range and
    /// return its rows in query order.
    async fn fetch_rows(&self, range: &DateRange) -> Result<Vec<RawRow>>;

    /// Release the connection.
    async fn close(self) -> Result<()>;
}

/// Trait for opening connections to site databases.
///
/// This abstraction allows for different implementations (production vs.
/// testing) and makes the resolver and batch loop testable without a real
/// database. Connectors are cheap to clone: the resolver clones one per
/// candidate attempt.
#[async_trait]
pub trait SiteConnector: Send + Sync + Clone + 'static {
    type Connection: SiteConnection;

    /// Attempt to open a connection to `host` with the given credentials.
    async fn connect(&self, host: &str, credentials: &Credentials) -> Result<Self::Connection>;
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Configured behavior for one mock host.
#[derive(Debug, Clone, Default)]
pub struct MockSite {
    /// Site name returned by the lookup; `None` simulates a missing name row.
    pub site_name: Option<String>,
    /// Rows returned by the summary query.
    pub rows: Vec<RawRow>,
    /// When set, `fetch_rows` fails with this message instead of returning rows.
    pub fetch_error: Option<String>,
    /// Artificial delay before `connect` resolves, for exercising the
    /// candidate race and timeouts.
    pub connect_delay_ms: u64,
}

/// Mock connector for testing.
///
/// Hosts not registered with [`MockConnector::add_site`] refuse connections.
/// Connection attempts and closes are recorded so tests can assert on the
/// race and on connection release.
///
/// # Example
/// ```ignore
/// let connector = MockConnector::new();
/// connector.add_site(
///     "10.16.102.34",
///     MockSite {
///         site_name: Some("MG ROAD".to_string()),
///         rows: vec![],
///         ..Default::default()
///     },
/// );
/// ```
#[derive(Clone, Default)]
pub struct MockConnector {
    sites: Arc<Mutex<HashMap<String, MockSite>>>,
    queued: Arc<Mutex<HashMap<String, Vec<MockSite>>>>,
    connect_attempts: Arc<Mutex<Vec<String>>>,
    closed_hosts: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reachable host with its configured behavior.
    pub fn add_site(&self, host: &str, site: MockSite) {
        self.sites.lock().insert(host.to_string(), site);
    }

    /// Queue a one-shot behavior for a host, consumed in FIFO order before
    /// the sticky behavior registered with [`MockConnector::add_site`]. Lets
    /// a test hand out different data for successive connections to the same
    /// host.
    pub fn queue_site(&self, host: &str, site: MockSite) {
        self.queued
            .lock()
            .entry(host.to_string())
            .or_default()
            .push(site);
    }

    /// Every host a connection was attempted against, in attempt order.
    pub fn connect_attempts(&self) -> Vec<String> {
        self.connect_attempts.lock().clone()
    }

    /// Every host whose connection was closed, in close order.
    pub fn closed_hosts(&self) -> Vec<String> {
        self.closed_hosts.lock().clone()
    }
}

#[async_trait]
impl SiteConnector for MockConnector {
    type Connection = MockConnection;

    async fn connect(&self, host: &str, _credentials: &Credentials) -> Result<Self::Connection> {
        self.connect_attempts.lock().push(host.to_string());

        let queued = {
            let mut queued = self.queued.lock();
            match queued.get_mut(host) {
                Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                _ => None,
            }
        };
        let site = queued.or_else(|| self.sites.lock().get(host).cloned());
        match site {
            Some(site) => {
                if site.connect_delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(site.connect_delay_ms)).await;
                }
                Ok(MockConnection {
                    host: host.to_string(),
                    site,
                    closed_hosts: self.closed_hosts.clone(),
                })
            }
            None => Err(crate::error::TillrollError::Other(anyhow::anyhow!(
                "no listener at {host}"
            ))),
        }
    }
}

/// Connection handed out by [`MockConnector`].
#[derive(Debug)]
pub struct MockConnection {
    host: String,
    site: MockSite,
    closed_hosts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SiteConnection for MockConnection {
    async fn site_name(&self, _site_id: &SiteId) -> Result<Option<String>> {
        Ok(self.site.site_name.clone())
    }

    async fn fetch_rows(&self, _range: &DateRange) -> Result<Vec<RawRow>> {
        match &self.site.fetch_error {
            Some(message) => Err(crate::error::TillrollError::DataFetch(anyhow::anyhow!(
                "{message}"
            ))),
            None => Ok(self.site.rows.clone()),
        }
    }

    async fn close(self) -> Result<()> {
        self.closed_hosts.lock().push(self.host);
        Ok(())
    }
}
