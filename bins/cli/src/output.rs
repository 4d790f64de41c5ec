//! Terminal tables.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;
use ytd_core::metrics::{MetricsReport, MetricsSummary, ProductMetrics};
use ytd_core::trends::{MonthlyPivot, MonthlyTrend};

fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money(value: Decimal) -> Cell {
    Cell::new(value.round_dp(2)).set_alignment(CellAlignment::Right)
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn percent(value: Decimal) -> Cell {
    Cell::new(format!("{}%", value.round_dp(2))).set_alignment(CellAlignment::Right)
}

/// One-line description of the windows a report covers.
#[must_use]
pub fn report_heading(report: &MetricsReport) -> String {
    let windows = &report.windows;
    format!(
        "{} as of {} | YTD {} | PYTD {} | P1YTD {}",
        report.fiscal_year(),
        report.as_of_date().format("%Y-%m-%d"),
        windows.ytd,
        windows.pytd,
        windows.p1ytd
    )
}

/// Main metrics table, one row per key.
#[must_use]
pub fn metrics_table<'a>(
    key_column: &str,
    rows: impl IntoIterator<Item = &'a ProductMetrics>,
) -> Table {
    let mut table = new_table([
        key_column,
        "YTD",
        "PYTD",
        "P1YTD",
        "Δ YTD-PYTD",
        "Growth vs PYTD",
        "Growth vs P1YTD",
        "YTD Qty",
        "Qty Δ",
        "Performance",
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.product_name),
            money(row.ytd_sales),
            money(row.pytd_sales),
            money(row.p1ytd_sales),
            money(row.delta_ytd_pytd),
            percent(row.growth_ytd_vs_pytd_pct),
            percent(row.growth_ytd_vs_p1ytd_pct),
            number(row.ytd_quantity),
            number(row.qty_delta_ytd_pytd),
            Cell::new(row.performance),
        ]);
    }
    table
}

/// Portfolio totals.
#[must_use]
pub fn summary_table(summary: &MetricsSummary) -> Table {
    let mut table = new_table(["", "YTD", "PYTD", "P1YTD"]);
    table.add_row(vec![
        Cell::new("Sales"),
        money(summary.ytd_sales),
        money(summary.pytd_sales),
        money(summary.p1ytd_sales),
    ]);
    table.add_row(vec![
        Cell::new("Quantity"),
        number(summary.ytd_quantity),
        number(summary.pytd_quantity),
        number(summary.p1ytd_quantity),
    ]);
    table.add_row(vec![
        Cell::new("Growth"),
        Cell::new(""),
        percent(summary.growth_ytd_vs_pytd_pct),
        percent(summary.growth_ytd_vs_p1ytd_pct),
    ]);
    table.add_row(vec![
        Cell::new("Rows"),
        Cell::new(format!(
            "{} growing / {} declining / {} stable",
            summary.growing, summary.declining, summary.stable
        )),
    ]);
    table
}

/// Top movers on one side of the YTD vs PYTD delta.
#[must_use]
pub fn movers_table(title: &str, rows: &[&ProductMetrics]) -> Table {
    let mut table = new_table([title, "Δ YTD-PYTD", "Growth vs PYTD"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.product_name),
            money(row.delta_ytd_pytd),
            percent(row.growth_ytd_vs_pytd_pct),
        ]);
    }
    table
}

/// Monthly trend rows.
#[must_use]
pub fn trends_table(trends: &[MonthlyTrend]) -> Table {
    let mut table = new_table(["Month", "Fiscal Year", "Product", "Sales", "Quantity"]);
    for trend in trends {
        table.add_row(vec![
            Cell::new(trend.year_month.format("%Y-%m")),
            Cell::new(&trend.fiscal_year),
            Cell::new(&trend.product_name),
            money(trend.sales_amount),
            number(trend.quantity),
        ]);
    }
    table
}

/// Product × month matrix.
#[must_use]
pub fn pivot_table(pivot: &MonthlyPivot) -> Table {
    let header = std::iter::once("Product".to_string())
        .chain(pivot.months.iter().map(|m| m.format("%Y-%m").to_string()));
    let mut table = new_table(header);

    for (product, values) in pivot.products.iter().zip(&pivot.values) {
        let mut cells = vec![Cell::new(product)];
        cells.extend(values.iter().copied().map(money));
        table.add_row(cells);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use ytd_core::metrics::{MetricsOptions, MetricsService};
    use ytd_core::sales::SalesRecord;

    fn report() -> MetricsReport {
        let as_of = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        let records = vec![
            SalesRecord::new(as_of, "Widget", dec!(100), 2),
            SalesRecord::new(NaiveDate::from_ymd_opt(2023, 4, 5).unwrap(), "Widget", dec!(80), 1),
        ];
        MetricsService::calculate(&records, &MetricsOptions::default()).unwrap()
    }

    #[test]
    fn test_metrics_table_renders_rows() {
        let report = report();
        let rendered = metrics_table(report.group_by.key_column(), &report.rows).to_string();

        assert!(rendered.contains("product_name"));
        assert!(rendered.contains("Widget"));
        assert!(rendered.contains("25.00%") || rendered.contains("25%"));
        assert!(rendered.contains("Growing"));
    }

    #[test]
    fn test_report_heading_names_fiscal_year() {
        let heading = report_heading(&report());
        assert!(heading.starts_with("FY 2024-25 as of 2024-04-10"));
    }

    #[test]
    fn test_pivot_table_has_month_columns() {
        let pivot = MonthlyPivot {
            months: vec![NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()],
            products: vec!["A".to_string()],
            values: vec![vec![dec!(5)]],
        };

        let rendered = pivot_table(&pivot).to_string();

        assert!(rendered.contains("2024-03"));
        assert!(rendered.contains("5"));
    }

    #[test]
    fn test_growth_is_rounded_for_display() {
        let as_of = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        let records = vec![
            SalesRecord::new(as_of, "Gadget", dec!(10), 1),
            SalesRecord::new(NaiveDate::from_ymd_opt(2023, 4, 5).unwrap(), "Gadget", dec!(3), 1),
        ];
        let report = MetricsService::calculate(&records, &MetricsOptions::default()).unwrap();

        let rendered = metrics_table(report.group_by.key_column(), &report.rows).to_string();

        assert!(rendered.contains("233.33%"));
        assert!(!rendered.contains("233.333"));
    }
}
