use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use introcar_data::settings::resolve_path;
use introcar_data::{ChassisJob, Settings};

use crate::error::CliError;

const SAMPLE_MAKE: &str = "Bentley";
const SAMPLE_MODEL: &str = "T2";

/// Build the chassis year lookup.
pub(crate) fn run_chassis(
    settings: &Settings,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let paths = &settings.paths;
    let job = ChassisJob::new(
        resolve_path(input, paths.chassis_input.as_ref(), "chassis_input")?,
        resolve_path(output, paths.chassis_output.as_ref(), "chassis_output")?,
    );

    log::info!("Loading chassis master from {}...", job.input.display());
    let (rows, table) = job.run()?;
    log::info!("Loaded {rows} chassis records");

    log::info!("");
    log::info!(
        "{} Created {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        job.output.display()
    );
    log::info!("   Makes: {}", table.make_count());
    log::info!("   Total models: {}", table.model_count());

    if let Some(model) = table.get(SAMPLE_MAKE, SAMPLE_MODEL) {
        log::info!("");
        log::info!(
            "{}",
            format!("Sample: {SAMPLE_MAKE} {SAMPLE_MODEL}").if_supports_color(Stdout, |t| t.bold())
        );
        log::info!("   Year range: {}-{}", model.year_start, model.year_end);
        for (year, chassis) in model.years.iter().take(3) {
            log::info!(
                "   {year}: chassis {}-{} ({} cars)",
                chassis.chassis_first,
                chassis.chassis_last,
                chassis.count
            );
        }
    }
    Ok(())
}
