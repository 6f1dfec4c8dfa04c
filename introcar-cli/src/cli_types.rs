//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "introcar-data")]
#[command(about = "Build the website's static JSON lookup files", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to ~/.config/introcar-data/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Index product videos from a folder of per-SKU subfolders
    Videos {
        /// Folder containing one subfolder per SKU
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Video extensions to include (e.g., mp4,mov)
        #[arg(long, value_delimiter = ',')]
        ext: Option<Vec<String>>,
    },

    /// Build the Make -> Model -> Year chassis lookup from the chassis master CSV
    Chassis {
        /// Chassis master sheet exported as CSV
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build lookbooks and the hotspot index from the lookbook CSV
    Lookbooks {
        /// Lookbook/catalogue CSV
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        out: LookbookOutputArgs,
    },

    /// Build lookbooks and the hotspot index from the product export
    LookbooksFromProducts {
        /// Product export (JSON array)
        #[arg(short, long)]
        products: Option<PathBuf>,

        /// Optional lookbook CSV providing image file names per SKU
        #[arg(long)]
        image_map: Option<PathBuf>,

        #[command(flatten)]
        out: LookbookOutputArgs,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Output arguments shared by both lookbook commands.
#[derive(clap::Args, Clone)]
pub(crate) struct LookbookOutputArgs {
    /// Output lookbooks JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output hotspot index JSON file
    #[arg(long)]
    pub hotspot_index: Option<PathBuf>,

    /// Prefix joined to image file names
    #[arg(long)]
    pub image_base_url: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the settings file path
    Path,

    /// Show the settings currently in effect
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_videos_with_extensions() {
        let cli = Cli::try_parse_from([
            "introcar-data",
            "videos",
            "--source",
            "/mnt/turntable",
            "--ext",
            "mp4,mov",
        ])
        .unwrap();
        match cli.command {
            Commands::Videos { source, output, ext } => {
                assert_eq!(source, Some(PathBuf::from("/mnt/turntable")));
                assert_eq!(output, None);
                assert_eq!(ext, Some(vec!["mp4".to_string(), "mov".to_string()]));
            }
            _ => panic!("expected videos command"),
        }
    }

    #[test]
    fn test_parse_products_command_with_globals() {
        let cli = Cli::try_parse_from([
            "introcar-data",
            "lookbooks-from-products",
            "--products",
            "products.json",
            "--hotspot-index",
            "hotspot-index.json",
            "--quiet",
            "--config",
            "settings.toml",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("settings.toml")));
        match cli.command {
            Commands::LookbooksFromProducts {
                products,
                image_map,
                out,
            } => {
                assert_eq!(products, Some(PathBuf::from("products.json")));
                assert_eq!(image_map, None);
                assert_eq!(out.hotspot_index, Some(PathBuf::from("hotspot-index.json")));
            }
            _ => panic!("expected lookbooks-from-products command"),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["introcar-data", "scrape"]).is_err());
    }
}
