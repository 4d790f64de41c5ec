//! Command dispatch.

use std::path::{Path, PathBuf};

use tracing::info;
use ytd_core::metrics::{MetricsError, MetricsService};
use ytd_core::trends::{CategoryRollup, MonthlyTrendAggregator};
use ytd_shared::{AppConfig, AppError, AppResult};

use crate::cli::{CategoryArgs, Cli, Command, MetricsArgs, TrendsArgs};
use crate::io::{export_pivot, export_rows, load_category_map, load_sales};
use crate::output;

/// Runs one CLI command against the loaded configuration.
pub fn run(cli: &Cli, config: &AppConfig) -> AppResult<()> {
    let input = cli
        .input
        .clone()
        .unwrap_or_else(|| config.input.sales_path.clone());

    match &cli.command {
        Command::Metrics(args) => run_metrics(&input, args, config),
        Command::Trends(args) => run_trends(&input, args),
        Command::Categories(args) => run_categories(&input, args, config),
    }
}

fn run_metrics(input: &Path, args: &MetricsArgs, config: &AppConfig) -> AppResult<()> {
    let records = load_sales(input)?;
    let report = MetricsService::calculate(&records, &args.window.options(&config.report))
        .map_err(calculation_error)?;

    println!("{}", output::report_heading(&report));
    let key_column = report.group_by.key_column();
    if args.ranked {
        println!("{}", output::metrics_table(key_column, report.ranked_by_growth()));
    } else {
        println!("{}", output::metrics_table(key_column, &report.rows));
    }
    let summary = report.summary().map_err(calculation_error)?;
    println!("{}", output::summary_table(&summary));

    let top_n = args.top.unwrap_or(config.report.top_n);
    let movers = report.top_movers(top_n);
    if !movers.growing.is_empty() {
        println!("{}", output::movers_table("Top growing", &movers.growing));
    }
    if !movers.declining.is_empty() {
        println!("{}", output::movers_table("Top declining", &movers.declining));
    }

    if let Some(path) = &args.export {
        export_rows(path, &report.keyed_rows())?;
    }
    Ok(())
}

fn run_trends(input: &Path, args: &TrendsArgs) -> AppResult<()> {
    let records = load_sales(input)?;
    let trends = MonthlyTrendAggregator::monthly_trends_for(&records, &args.products)
        .map_err(calculation_error)?;
    info!(rows = trends.len(), "Monthly trends calculated");

    if args.pivot {
        let pivot = MonthlyTrendAggregator::pivot(&trends).map_err(calculation_error)?;
        println!("{}", output::pivot_table(&pivot));
        if let Some(path) = &args.export {
            export_pivot(path, &pivot)?;
        }
    } else {
        println!("{}", output::trends_table(&trends));
        if let Some(path) = &args.export {
            export_rows(path, &trends)?;
        }
    }
    Ok(())
}

fn run_categories(input: &Path, args: &CategoryArgs, config: &AppConfig) -> AppResult<()> {
    let map_path = category_map_path(args, config)?;
    let records = load_sales(input)?;
    let categories = load_category_map(&map_path)?;
    let policy = args.unmapped.unwrap_or(config.report.unmapped_category);

    let report = CategoryRollup::category_metrics(
        &records,
        &categories,
        &args.window.options(&config.report),
        policy,
    )
    .map_err(calculation_error)?;

    println!("{}", output::report_heading(&report));
    println!(
        "{}",
        output::metrics_table(report.group_by.key_column(), &report.rows)
    );
    let summary = report.summary().map_err(calculation_error)?;
    println!("{}", output::summary_table(&summary));

    if let Some(path) = &args.export {
        export_rows(path, &report.keyed_rows())?;
    }
    Ok(())
}

fn category_map_path(args: &CategoryArgs, config: &AppConfig) -> AppResult<PathBuf> {
    args.category_map
        .clone()
        .or_else(|| config.input.category_map_path.clone())
        .ok_or_else(|| {
            AppError::InvalidInput(
                "No category map given: pass --category-map or set input.category_map_path"
                    .to_string(),
            )
        })
}

fn calculation_error(err: MetricsError) -> AppError {
    match err {
        MetricsError::NoRecords => AppError::InvalidInput(err.to_string()),
        MetricsError::Overflow { .. } => AppError::Calculation(err.to_string()),
    }
}
