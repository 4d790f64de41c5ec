//! Export result tables to CSV or JSON.
//!
//! The format follows the file extension. Exports feed spreadsheets and the
//! chart layer, so rows keep their full precision.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use tracing::info;
use ytd_core::trends::MonthlyPivot;
use ytd_shared::{AppError, AppResult};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Pretty-printed JSON array.
    Json,
}

impl ExportFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(AppError::InvalidInput(format!(
                "Cannot export to '{}': use a .csv or .json extension",
                path.display()
            ))),
        }
    }
}

/// Writes flat rows, one CSV line or JSON object per row.
pub fn export_rows<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, &e))?;
            for row in rows {
                writer.serialize(row).map_err(|e| write_error(path, &e))?;
            }
            writer.flush()?;
        }
        ExportFormat::Json => write_json(path, &rows)?,
    }

    info!(path = %path.display(), rows = rows.len(), "Exported table");
    Ok(())
}

/// Writes a product × month matrix.
///
/// CSV gets one row per product and one `YYYY-MM` column per month; JSON
/// gets the pivot structure as is.
pub fn export_pivot(path: &Path, pivot: &MonthlyPivot) -> AppResult<()> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, &e))?;

            let header = std::iter::once("product_name".to_string())
                .chain(pivot.months.iter().map(|m| m.format("%Y-%m").to_string()));
            writer
                .write_record(header)
                .map_err(|e| write_error(path, &e))?;

            for (product, values) in pivot.products.iter().zip(&pivot.values) {
                let record =
                    std::iter::once(product.clone()).chain(values.iter().map(ToString::to_string));
                writer
                    .write_record(record)
                    .map_err(|e| write_error(path, &e))?;
            }
            writer.flush()?;
        }
        ExportFormat::Json => write_json(path, pivot)?,
    }

    info!(
        path = %path.display(),
        products = pivot.products.len(),
        months = pivot.months.len(),
        "Exported pivot"
    );
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> AppResult<()> {
    let file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value).map_err(|e| write_error(path, &e))
}

fn write_error(path: &Path, err: &dyn std::fmt::Display) -> AppError {
    AppError::Io(format!("Failed to write '{}': {err}", path.display()))
}
