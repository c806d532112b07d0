//! Core domain types for the report pipeline.
//!
//! This module contains pure types with no I/O dependencies:
//! - Site identity and network addressing
//! - Raw query rows and their kind tags
//! - Aggregated sales/partner buckets and grand totals

pub mod row;
pub mod site;
pub mod summary;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive business-date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }
}
