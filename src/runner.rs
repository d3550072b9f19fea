//! Functionality for running a forecast over every scenario in a model.
use crate::forecast::{ScenarioProjection, SeriesFilter};
use crate::metrics::ScenarioMetrics;
use crate::model::Model;
use crate::output::DataWriter;
use crate::output::export::{build_export, write_export};
use crate::output::metadata::write_metadata;
use crate::settings::ExportFormat;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

/// Options controlling what is forecast and how it is exported
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOptions {
    /// The hospital and service to generate summary series for
    pub filter: SeriesFilter,
    /// The number of forecast years to include in the summary
    pub horizon: u32,
    /// The file format for exported forecasts
    pub export_format: ExportFormat,
    /// Whether exported forecasts include historical years
    pub include_history: bool,
}

/// Run the forecast.
///
/// For each scenario, the summary projection and metrics are written to CSV files and the
/// scenario's forecast is exported in the requested format.
///
/// # Arguments
///
/// * `model` - The model to forecast
/// * `model_path` - Path to the model directory, recorded in the run metadata
/// * `output_path` - Folder where output files will be saved
/// * `options` - Forecast and export options
pub fn run(
    model: &Model,
    model_path: &Path,
    output_path: &Path,
    options: &ForecastOptions,
) -> Result<()> {
    let config = model.config();
    let base_params = model.base_params();
    info!(
        "Forecasting {} scenario(s) for {}-{} (history to {})",
        model.scenarios.len(),
        config.start_year,
        config.end_year,
        config.history_cutoff
    );
    debug!("Series filter: {}", options.filter.salt());

    let mut writer = DataWriter::create(output_path)?;
    for scenario in model.scenarios.iter() {
        info!("Scenario: {}", scenario.name);

        let projection = ScenarioProjection::generate(
            scenario,
            base_params,
            config,
            &options.filter,
            options.horizon,
        );
        writer.write_projection(&projection)?;

        let metrics = ScenarioMetrics::calculate(scenario, base_params, config);
        debug!(
            "Terminal volumes for {}: inpatient {}, outpatient {}",
            scenario.id, metrics.terminal_inpatient, metrics.terminal_outpatient
        );
        writer.write_metrics(&metrics)?;

        let records = build_export(scenario, base_params, config, options.include_history);
        let file_path = write_export(output_path, scenario, &records, options.export_format)?;
        debug!("Exported forecast to {}", file_path.display());
    }
    writer.flush()?;

    write_metadata(output_path, model_path, model).context("Failed to save metadata")?;

    Ok(())
}
