//! CSV export of report tables

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use freshroute_domain::service::{ReportKind, ReportTable};
use freshroute_types::{Error, Result};

/// `<slug>_<YYYY-MM-DD>.csv`
pub fn export_filename(kind: ReportKind, date: NaiveDate) -> String {
    format!("{}_{}.csv", kind.slug(), date.format("%Y-%m-%d"))
}

/// Write the header row and one row per item to `output_path`
pub fn export_to_csv(table: &ReportTable, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(output_path)
        .map_err(|e| Error::Export(format!("{}: {}", output_path.display(), e)))?;
    writer
        .write_record(&table.headers)
        .map_err(|e| Error::Export(e.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    writer.flush()?;

    info!(report = table.kind.slug(), rows = table.rows.len(), path = %output_path.display(), "report exported");
    Ok(())
}

/// Export into `dir` under the dated default file name
pub fn export_to_dir(table: &ReportTable, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    let path = dir.join(export_filename(table.kind, date));
    export_to_csv(table, &path)?;
    Ok(path)
}
