//! introcar-data CLI
//!
//! Runs the batch jobs that turn vendor exports into the website's JSON
//! lookup files.

mod cli_types;
mod commands;
mod error;
mod logger;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use introcar_data::Settings;
use introcar_data::settings::settings_path;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    logger::init(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

/// Whether `command` reads the settings file. Printing its path must keep
/// working even when the file is broken.
fn needs_settings(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Config {
            action: ConfigAction::Path
        }
    )
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings_file = cli.config.unwrap_or_else(settings_path);
    let settings = if needs_settings(&cli.command) {
        Settings::load(&settings_file)?
    } else {
        Settings::default()
    };

    match cli.command {
        Commands::Videos { source, output, ext } => {
            commands::videos::run_videos(&settings, source, output, ext)
        }
        Commands::Chassis { input, output } => {
            commands::chassis::run_chassis(&settings, input, output)
        }
        Commands::Lookbooks { input, out } => {
            commands::lookbooks::run_lookbooks_csv(&settings, input, out)
        }
        Commands::LookbooksFromProducts {
            products,
            image_map,
            out,
        } => commands::lookbooks::run_lookbooks_products(&settings, products, image_map, out),
        Commands::Config { action } => match action {
            ConfigAction::Path => {
                commands::config::run_config_path(&settings_file);
                Ok(())
            }
            ConfigAction::Show => commands::config::run_config_show(&settings_file, &settings),
        },
    }
}
