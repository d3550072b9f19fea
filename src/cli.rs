//! The command line interface for the forecasting tool.
use crate::comparison::{compare, parameter_rows};
use crate::input::load_model;
use crate::log;
use crate::output::{create_output_directory, get_output_dir};
use crate::runner::{ForecastOptions, run};
use crate::settings::{ExportFormat, Settings};
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the forecasting tool.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Hospital to generate summary series for (default: all)
    #[arg(long)]
    pub hospital: Option<String>,
    /// Service line to generate summary series for (default: all)
    #[arg(long)]
    pub service: Option<String>,
    /// Number of forecast years to include in the summary (default: from model.toml)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub horizon: Option<u32>,
    /// File format for exported forecasts ("csv" or "json")
    #[arg(long)]
    pub format: Option<ExportFormat>,
    /// Only export years after the history cutoff
    #[arg(long)]
    pub exclude_history: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run a forecast for every scenario in a model.
    Run {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Compare the terminal-year projections of two scenarios.
    Compare {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// ID of the first scenario.
        scenario_a: String,
        /// ID of the second scenario.
        scenario_b: String,
    },
    /// Manage example models.
    Example {
        /// The available subcommands for managing example models.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a model.
    Validate {
        /// The path to the model directory.
        model_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { model_dir, opts } => handle_run_command(&model_dir, &opts, None),
            Self::Compare {
                model_dir,
                scenario_a,
                scenario_b,
            } => handle_compare_command(&model_dir, &scenario_a, &scenario_b, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ capfore --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    if let Some(settings) = settings {
        Ok(settings)
    } else {
        Settings::load().context("Failed to load settings.")
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(model_path)?;
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(Some(&settings.log_level), Some(output_path))
        .context("Failed to initialise logging.")?;

    // Load the model to run
    let model = load_model(model_path).context("Failed to load model.")?;
    info!("Loaded model from {}", model_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    // Command-line arguments take precedence over settings and the model file
    let options = ForecastOptions {
        filter: model.series_filter(opts.hospital.as_deref(), opts.service.as_deref())?,
        horizon: opts.horizon.unwrap_or(model.parameters.horizon),
        export_format: opts.format.unwrap_or(settings.export_format),
        include_history: settings.include_history && !opts.exclude_history,
    };

    run(&model, model_path, output_path, &options)?;
    info!("Forecast complete!");

    Ok(())
}

/// Handle the `compare` command.
pub fn handle_compare_command(
    model_path: &Path,
    scenario_a: &str,
    scenario_b: &str,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // We don't save log files for comparisons
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    let model = load_model(model_path).context("Failed to load model.")?;
    let a = model.scenarios.get(scenario_a)?;
    let b = model.scenarios.get(scenario_b)?;
    let comparison = compare(a, b, model.base_params(), model.config());

    println!(
        "{:<24}{:>20}{:>20}{:>20}",
        "Terminal year", a.name, b.name, "Difference"
    );
    let deltas = &comparison.deltas;
    println!(
        "{:<24}{:>20}{:>20}{:>20}",
        "Inpatient volume",
        comparison.terminal_a.inpatient,
        comparison.terminal_b.inpatient,
        format!("{:+} ({})", deltas.inpatient_diff, deltas.inpatient_pct)
    );
    println!(
        "{:<24}{:>20}{:>20}{:>20}",
        "Outpatient volume",
        comparison.terminal_a.outpatient,
        comparison.terminal_b.outpatient,
        format!("{:+} ({})", deltas.outpatient_diff, deltas.outpatient_pct)
    );
    println!();
    for row in parameter_rows(a, b) {
        println!("{:<24}{:>20}{:>20}", row.label, row.value_a, row.value_b);
    }

    if !comparison.is_favourable() {
        info!("{} projects fewer inpatients than {}", b.name, a.name);
    }

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    // Load/validate the model
    load_model(model_path).context("Failed to validate model.")?;
    info!("Model validation successful!");

    Ok(())
}
