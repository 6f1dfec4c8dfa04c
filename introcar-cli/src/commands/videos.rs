use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use introcar_data::settings::resolve_path;
use introcar_data::{DataError, Settings, VideoIndex, VideoJob};

use crate::error::CliError;

/// A missing source folder is reported and yields `None`; other failures
/// are errors.
fn index_or_skip(
    result: Result<VideoIndex, DataError>,
) -> Result<Option<VideoIndex>, CliError> {
    match result {
        Ok(index) => Ok(Some(index)),
        Err(DataError::SourceNotFound(path)) => {
            log::warn!("Video source folder not found: {}", path.display());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Build the video index.
///
/// A missing source folder is reported but is not an error.
pub(crate) fn run_videos(
    settings: &Settings,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    ext: Option<Vec<String>>,
) -> Result<(), CliError> {
    let paths = &settings.paths;
    let mut job = VideoJob::new(
        resolve_path(source, paths.video_source.as_ref(), "video_source")?,
        resolve_path(output, paths.video_output.as_ref(), "video_output")?,
    );
    job.extensions = match ext {
        Some(exts) => exts
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect(),
        None => settings.video_extensions(),
    };

    let Some(index) = index_or_skip(job.run())? else {
        return Ok(());
    };

    let check = "\u{2714}".if_supports_color(Stdout, |t| t.green()).to_string();
    log::info!(
        "{check} Built video index with {} unique SKU folders",
        index.unique_folders()
    );
    log::info!(
        "{check} Total index entries (with variants): {}",
        index.len()
    );
    log::info!("");
    log::info!(
        "{}",
        "Sample entries:".if_supports_color(Stdout, |t| t.bold())
    );
    for (sku, entry) in index.iter().take(5) {
        log::info!(
            "   {}: {}",
            sku.if_supports_color(Stdout, |t| t.cyan()),
            entry.file
        );
    }
    Ok(())
}
