//! Batched fixed-width sales summary reports for retail sites.
//!
//! This crate is the core behind two thin UI front ends (a web form and a
//! desktop form). Given a list of 5-digit site ids, a date range, database
//! credentials and an addressing series, it resolves connectivity to each
//! site's database by racing candidate endpoints, aggregates the raw summary
//! query rows into typed sales/partner buckets, renders a 180-column
//! fixed-width text page per site, and packages the successful reports into a
//! zip archive. Sites are processed strictly sequentially with per-site
//! failure isolation: one unreachable or misbehaving site never stops the
//! batch.
//!
//! The database itself is abstracted behind the [`source::SiteConnector`]
//! trait; a mock implementation is provided for tests.

pub mod archive;
pub mod batch;
pub mod config;
pub mod domain;
pub mod error;
pub mod render;
pub mod resolver;
pub mod sitelist;
pub mod source;

// Re-export commonly used types
pub use batch::{run_batch, BatchOutcome};
pub use config::{BatchConfig, Credentials};
pub use domain::row::{RawRow, RowKind};
pub use domain::site::{ConnectionCandidate, Series, SiteId};
pub use domain::summary::{PartnerBucket, ReportTotals, SalesBucket, SalesSummary};
pub use domain::DateRange;
pub use error::{Result, TillrollError};
pub use render::{render_report, ReportMeta, PAGE_WIDTH};
pub use sitelist::{is_site_id_column, parse_site_ids, SiteList};
pub use source::{MockConnector, MockSite, SiteConnection, SiteConnector};
