//! Exporting a scenario's forecast to a standalone CSV or JSON file.
use crate::forecast::{BaseParams, ForecastConfig, export_seed, generate_series};
use crate::scenario::Scenario;
use crate::settings::ExportFormat;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A single year of an exported forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// The calendar year
    pub year: i32,
    /// Inpatient volume
    pub inpatient: i64,
    /// Outpatient volume
    pub outpatient: i64,
}

/// The JSON document written for an exported forecast
#[derive(Debug, Serialize, Deserialize)]
pub struct ForecastExport {
    /// The scenario's display name
    pub scenario: String,
    /// When the export was generated (RFC 3339)
    pub generated: String,
    /// The exported years
    pub data: Vec<ExportRecord>,
}

/// Generate the records to export for a scenario.
///
/// Series are generated with the scenario's export seed over the whole forecast range. If
/// `include_history` is false, only years after the history cutoff are kept.
pub fn build_export(
    scenario: &Scenario,
    base_params: &BaseParams,
    config: &ForecastConfig,
    include_history: bool,
) -> Vec<ExportRecord> {
    let seed = export_seed(scenario.id.as_str());
    let inpatient = generate_series(
        base_params.inpatient,
        scenario.data.inpatient_growth,
        config,
        &seed,
    );
    let outpatient = generate_series(
        base_params.outpatient,
        scenario.data.outpatient_growth,
        config,
        &seed,
    );

    config
        .iter_years()
        .zip(inpatient)
        .zip(outpatient)
        .filter(|((year, _), _)| include_history || !config.is_historical(*year))
        .map(|((year, inpatient), outpatient)| ExportRecord {
            year,
            inpatient,
            outpatient,
        })
        .collect()
}

/// Get the path of the export file for a scenario
pub fn export_file_path(output_path: &Path, scenario: &Scenario, format: ExportFormat) -> PathBuf {
    output_path.join(format!("forecast_{}.{}", scenario.id, format.extension()))
}

/// Write exported records for a scenario in the given format.
///
/// # Returns
///
/// The path of the file written.
pub fn write_export(
    output_path: &Path,
    scenario: &Scenario,
    records: &[ExportRecord],
    format: ExportFormat,
) -> Result<PathBuf> {
    let file_path = export_file_path(output_path, scenario, format);
    match format {
        ExportFormat::Csv => write_csv(&file_path, records),
        ExportFormat::Json => write_json(&file_path, scenario, records),
    }
    .with_context(|| format!("Failed to write {}", file_path.display()))?;

    Ok(file_path)
}

fn write_csv(file_path: &Path, records: &[ExportRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

fn write_json(file_path: &Path, scenario: &Scenario, records: &[ExportRecord]) -> Result<()> {
    let export = ForecastExport {
        scenario: scenario.name.clone(),
        generated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        data: records.to_vec(),
    };
    let mut writer = BufWriter::new(File::create(file_path)?);
    serde_json::to_writer_pretty(&mut writer, &export)?;
    writer.flush()?;

    Ok(())
}
