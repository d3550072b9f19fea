//! The `capfore settings` subcommands.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// Subcommands for settings
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open `settings.toml` in a text editor, creating it first if needed
    Edit,
    /// Print the location of `settings.toml` in the capfore config folder
    Path,
    /// Print a commented `settings.toml` listing every setting with its default value
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Edit => handle_edit_command()?,
            Self::Path => handle_path_command(),
            Self::DumpDefault => print!("{}", Settings::default_file_contents()),
        }

        Ok(())
    }
}

/// Write the commented default settings to `file_path`, unless a file is already there.
///
/// Returns whether a new file was written.
fn create_settings_file_if_missing(file_path: &Path) -> Result<bool> {
    if file_path.is_file() {
        return Ok(false);
    }

    if let Some(config_dir) = file_path.parent() {
        fs::create_dir_all(config_dir).with_context(|| {
            format!("Failed to create config folder: {}", config_dir.display())
        })?;
    }
    fs::write(file_path, Settings::default_file_contents())
        .with_context(|| format!("Failed to write {}", file_path.display()))?;

    Ok(true)
}

/// Describe the settings that will apply to the next forecast run
fn describe_settings(settings: &Settings) -> String {
    format!(
        "log level {}, export format {}, history {}, overwrite {}",
        settings.log_level,
        settings.export_format,
        if settings.include_history {
            "included"
        } else {
            "excluded"
        },
        if settings.overwrite { "on" } else { "off" }
    )
}

/// Handle the `edit` command.
///
/// The file is re-read after the editor closes so mistakes are reported straight away rather
/// than on the next `capfore run`.
fn handle_edit_command() -> Result<()> {
    let file_path = get_settings_file_path();
    if create_settings_file_if_missing(&file_path)? {
        println!("Created default settings file");
    }

    println!("Opening settings file for editing: {}", file_path.display());
    edit::edit_file(&file_path)?;

    let settings = Settings::load_from_path(&file_path)
        .with_context(|| format!("Edited settings file is invalid: {}", file_path.display()))?;
    println!("Settings saved: {}", describe_settings(&settings));

    Ok(())
}

/// Handle the `path` command
fn handle_path_command() {
    let file_path = get_settings_file_path();
    println!("{}", file_path.display());
    if !file_path.is_file() {
        eprintln!("(file does not exist yet; default settings are in use)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ExportFormat;
    use tempfile::tempdir;

    #[test]
    fn test_create_settings_file_if_missing() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("capfore").join("settings.toml");

        // Config folder and commented defaults are created
        assert!(create_settings_file_if_missing(&file_path).unwrap());
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            Settings::default_file_contents()
        );
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );

        // Existing files are left alone
        fs::write(&file_path, "log_level = \"warn\"\n").unwrap();
        assert!(!create_settings_file_if_missing(&file_path).unwrap());
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "log_level = \"warn\"\n"
        );
    }

    #[test]
    fn test_describe_settings() {
        let settings = Settings {
            export_format: ExportFormat::Json,
            include_history: false,
            ..Settings::default()
        };
        assert_eq!(
            describe_settings(&settings),
            "log level info, export format json, history excluded, overwrite off"
        );
    }
}
