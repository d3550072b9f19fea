//! The module responsible for writing output data to disk.
use crate::forecast::ScenarioProjection;
use crate::metrics::ScenarioMetrics;
use crate::scenario::ScenarioID;
use crate::units::Percent;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod export;
pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "capfore_results";

/// The output file name for the yearly forecast summary
const FORECAST_SUMMARY_FILE_NAME: &str = "forecast_summary.csv";

/// The output file name for scenario metrics
const SCENARIO_METRICS_FILE_NAME: &str = "scenario_metrics.csv";

/// Get the default output directory for the model specified at `model_dir`
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory.
///
/// If the directory already exists and is not empty, it is only replaced if `allow_overwrite` is
/// true.
///
/// # Returns
///
/// True if an existing folder was overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let mut overwrite = false;
    if output_dir.is_dir() {
        if output_dir.read_dir()?.next().is_none() {
            // already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Use the --overwrite option to replace it."
        );
        fs::remove_dir_all(output_dir)?;
        overwrite = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the forecast summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ForecastSummaryRow {
    scenario_id: ScenarioID,
    year: i32,
    inpatient: i64,
    outpatient: i64,
    inpatient_growth: Percent,
    capacity_gap: i64,
}

/// An object for writing forecast summaries and scenario metrics to file
pub struct DataWriter {
    summary_writer: csv::Writer<File>,
    metrics_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            summary_writer: new_writer(FORECAST_SUMMARY_FILE_NAME)?,
            metrics_writer: new_writer(SCENARIO_METRICS_FILE_NAME)?,
        })
    }

    /// Write a scenario's yearly projection to the summary CSV file
    pub fn write_projection(&mut self, projection: &ScenarioProjection) -> Result<()> {
        for year in projection.iter_years() {
            let row = ForecastSummaryRow {
                scenario_id: projection.scenario_id.clone(),
                year: year.year,
                inpatient: year.inpatient,
                outpatient: year.outpatient,
                inpatient_growth: year.inpatient_growth,
                capacity_gap: year.capacity_gap,
            };
            self.summary_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write metrics for a scenario to the metrics CSV file
    pub fn write_metrics(&mut self, metrics: &ScenarioMetrics) -> Result<()> {
        self.metrics_writer.serialize(metrics)?;

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.summary_writer.flush()?;
        self.metrics_writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{base_params, forecast_config, scenario};
    use crate::forecast::{BaseParams, ForecastConfig, SeriesFilter};
    use crate::scenario::Scenario;
    use itertools::{Itertools, assert_equal};
    use rstest::rstest;
    use std::iter;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_projection(
        scenario: Scenario,
        base_params: BaseParams,
        forecast_config: ForecastConfig,
    ) {
        let projection = ScenarioProjection::generate(
            &scenario,
            &base_params,
            &forecast_config,
            &SeriesFilter::default(),
            2,
        );
        let dir = tempdir().unwrap();

        // Write the projection
        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_projection(&projection).unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let records: Vec<ForecastSummaryRow> =
            csv::Reader::from_path(dir.path().join(FORECAST_SUMMARY_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_eq!(records.len(), 8);
        assert_equal(
            records.iter().map(|row| row.year),
            forecast_config.start_year..=2027,
        );
        assert!(records.iter().all(|row| row.scenario_id == scenario.id));
        assert_equal(
            records.iter().map(|row| row.capacity_gap),
            projection.capacity_gap.iter().copied(),
        );
    }

    #[rstest]
    fn test_write_metrics(
        scenario: Scenario,
        base_params: BaseParams,
        forecast_config: ForecastConfig,
    ) {
        let metrics = ScenarioMetrics::calculate(&scenario, &base_params, &forecast_config);
        let dir = tempdir().unwrap();

        // Write metrics
        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_metrics(&metrics).unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let records: Vec<ScenarioMetrics> =
            csv::Reader::from_path(dir.path().join(SCENARIO_METRICS_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_equal(records, iter::once(metrics));
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("results");

        // New folder
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Existing empty folder
        assert!(!create_output_directory(&output_dir, false).unwrap());

        // Existing folder with contents
        fs::write(output_dir.join("old.csv"), "a,b\n").unwrap();
        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(!output_dir.join("old.csv").exists());
    }

    #[test]
    fn test_get_output_dir() {
        let dir = tempdir().unwrap();
        let model_dir = dir.path().join("my_model");
        fs::create_dir(&model_dir).unwrap();

        assert_eq!(
            get_output_dir(&model_dir).unwrap(),
            Path::new(OUTPUT_DIRECTORY_ROOT).join("my_model")
        );
    }
}
