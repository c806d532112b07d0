//! Zip packaging of successful reports.

use std::io::{Cursor, Write};

use indexmap::IndexMap;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::site::SiteId;
use crate::error::Result;

/// Build a zip archive with one `"<SiteID>.txt"` entry per report, in map
/// iteration order.
///
/// Entry timestamps are the zip default (a fixed epoch), so identical report
/// maps produce identical archive bytes.
pub fn build_archive(reports: &IndexMap<SiteId, String>) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (site_id, report) in reports {
        writer.start_file(format!("{site_id}.txt"), options)?;
        writer.write_all(report.as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
