use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use introcar_data::Settings;

use crate::error::CliError;

/// Print the settings file path.
pub(crate) fn run_config_path(settings_file: &Path) {
    log::info!("{}", settings_file.display());
}

/// Show the settings file status and the settings in effect.
pub(crate) fn run_config_show(settings_file: &Path, settings: &Settings) -> Result<(), CliError> {
    let status = if settings_file.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found, using defaults)"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string()
    };
    log::info!(
        "Settings file: {} {}",
        settings_file.display().if_supports_color(Stdout, |t| t.cyan()),
        status
    );
    log::info!("");
    log::info!("{}", settings.to_toml()?);
    log::info!("image_base_url (effective): {}", settings.image_base_url());
    log::info!(
        "video extensions (effective): {}",
        settings.video_extensions().join(", ")
    );
    Ok(())
}
