use crate::report::ReportRow;
use anyhow::{Context, Result};
use std::path::Path;

pub const DEFAULT_CSV_FILE: &str = "repricing_suggestions.csv";

/// Writes a header line followed by one record per product.
pub fn write_csv(path: &Path, headers: &[String], rows: &[ReportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;

    wtr.write_record(headers).context("writing CSV header")?;

    for row in rows {
        wtr.write_record(row.to_record())
            .with_context(|| format!("writing CSV record for {}", row.product))?;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}
