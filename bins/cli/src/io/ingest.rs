//! CSV ingest.
//!
//! Headers are matched case-insensitively after trimming. A row that fails
//! validation aborts the load with its file line number.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};
use ytd_core::sales::{RawSalesRecord, SalesRecord};
use ytd_core::trends::CategoryMap;
use ytd_shared::{AppError, AppResult};

const SALES_COLUMNS: [&str; 4] = ["date", "product_name", "sales_amount", "quantity"];
const CATEGORY_COLUMNS: [&str; 2] = ["product_name", "category"];

/// Loads and validates the sales log.
pub fn load_sales(path: &Path) -> AppResult<Vec<SalesRecord>> {
    let (headers, mut reader) = open_csv(path)?;
    let [date, product, amount, quantity] = require_columns(path, &headers, SALES_COLUMNS)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| csv_error(path, &e))?;
        let line = line_of(&row);
        if is_blank(&row) {
            continue;
        }

        let raw = RawSalesRecord {
            date: field(&row, date),
            product_name: field(&row, product),
            sales_amount: field(&row, amount),
            quantity: field(&row, quantity),
        };
        let record = SalesRecord::try_from(raw).map_err(|e| row_error(path, line, &e))?;
        records.push(record);
    }

    info!(path = %path.display(), records = records.len(), "Loaded sales records");
    Ok(records)
}

/// Loads a `product_name,category` mapping.
///
/// Later rows win when a product appears twice. Rows with an empty product
/// or category are skipped.
pub fn load_category_map(path: &Path) -> AppResult<CategoryMap> {
    let (headers, mut reader) = open_csv(path)?;
    let [product, category] = require_columns(path, &headers, CATEGORY_COLUMNS)?;

    let mut map = CategoryMap::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let row = result.map_err(|e| csv_error(path, &e))?;

        let product_name = field(&row, product);
        let category_name = field(&row, category);
        if product_name.is_empty() || category_name.is_empty() {
            skipped += 1;
            continue;
        }
        map.insert(product_name, category_name);
    }

    debug!(path = %path.display(), products = map.len(), skipped, "Loaded category map");
    Ok(map)
}

fn open_csv(path: &Path) -> AppResult<(HashMap<String, usize>, csv::Reader<File>)> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            AppError::NotFound(format!("CSV file '{}' does not exist", path.display()))
        }
        _ => AppError::Io(format!("Failed to open CSV '{}': {e}", path.display())),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            AppError::InvalidInput(format!(
                "Failed to read CSV headers from '{}': {e}",
                path.display()
            ))
        })?
        .clone();

    Ok((build_header_map(&headers), reader))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header(name), idx))
        .collect()
}

fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_ascii_lowercase()
}

fn require_columns<const N: usize>(
    path: &Path,
    headers: &HashMap<String, usize>,
    columns: [&str; N],
) -> AppResult<[usize; N]> {
    let missing: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| !headers.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "'{}' is missing required column(s): {}",
            path.display(),
            missing.join(", ")
        )));
    }

    Ok(columns.map(|c| headers.get(c).copied().unwrap_or_default()))
}

fn field(row: &StringRecord, idx: usize) -> String {
    row.get(idx).unwrap_or_default().to_string()
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(str::is_empty)
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map_or(0, csv::Position::line)
}

fn row_error(path: &Path, line: u64, err: &dyn std::fmt::Display) -> AppError {
    AppError::InvalidInput(format!("{}:{line}: {err}", path.display()))
}

fn csv_error(path: &Path, err: &csv::Error) -> AppError {
    AppError::InvalidInput(format!("Malformed CSV '{}': {err}", path.display()))
}
