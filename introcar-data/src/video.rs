//! Product video index.
//!
//! Scans a directory of per-SKU folders and maps each SKU to the videos found
//! in its folder. Every folder is indexed twice: under its normalized SKU
//! (suffix stripped) and under its raw uppercased name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::DataError;
use crate::ordered::OrderedIndex;
use crate::output;
use crate::sku::normalize_sku;

/// Default video file extensions (lowercase, without the dot).
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp4"];

/// One folder's videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    /// Folder name as it appears on disk
    pub folder: String,
    /// Primary video: the first file whose stem starts with the folder name
    /// (case-insensitive), else the first file found
    pub file: String,
    /// Every matching video in the folder, in directory order
    pub all_files: Vec<String>,
}

/// SKU -> video entry, in folder scan order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct VideoIndex {
    entries: OrderedIndex<VideoEntry>,
}

impl VideoIndex {
    pub fn get(&self, sku: &str) -> Option<&VideoEntry> {
        self.entries.get(sku)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VideoEntry)> {
        self.entries.iter()
    }

    /// Total index keys, counting both key variants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct folders referenced by the index.
    pub fn unique_folders(&self) -> usize {
        self.entries
            .values()
            .map(|e| e.folder.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    fn insert_folder(&mut self, entry: VideoEntry) {
        let normalized = normalize_sku(&entry.folder);
        let raw = entry.folder.to_uppercase();
        self.entries.insert(normalized, entry.clone());
        self.entries.insert(raw, entry);
    }
}

/// Input and output locations for the video index job.
#[derive(Debug, Clone)]
pub struct VideoJob {
    pub source_dir: PathBuf,
    pub output: PathBuf,
    /// Lowercase extensions without the dot
    pub extensions: Vec<String>,
}

impl VideoJob {
    pub fn new(source_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output: output.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Scan the source directory and write the index.
    ///
    /// Returns [`DataError::SourceNotFound`] without writing anything when the
    /// source directory does not exist.
    pub fn run(&self) -> Result<VideoIndex, DataError> {
        let index = build_video_index(&self.source_dir, &self.extensions)?;
        output::write_json_pretty(&self.output, &index)?;
        Ok(index)
    }
}

/// Build the index from a directory of per-SKU folders.
pub fn build_video_index(source: &Path, extensions: &[String]) -> Result<VideoIndex, DataError> {
    if !source.exists() {
        return Err(DataError::SourceNotFound(source.to_path_buf()));
    }

    let mut index = VideoIndex::default();
    for entry in std::fs::read_dir(source).map_err(|e| DataError::io(source, e))? {
        let entry = entry.map_err(|e| DataError::io(source, e))?;
        let folder_path = entry.path();
        if !folder_path.is_dir() {
            continue;
        }
        let Some(folder) = entry.file_name().to_str().map(str::to_string) else {
            log::debug!("Skipping non-UTF-8 folder {}", folder_path.display());
            continue;
        };

        let files = list_videos(&folder_path, extensions)?;
        if files.is_empty() {
            log::debug!("No videos in {folder}");
            continue;
        }

        let file = pick_primary(&folder, &files).to_string();
        index.insert_folder(VideoEntry {
            folder,
            file,
            all_files: files,
        });
    }

    Ok(index)
}

/// File names in `dir` whose extension matches one of `extensions`.
fn list_videos(dir: &Path, extensions: &[String]) -> Result<Vec<String>, DataError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| DataError::io(dir, e))? {
        let entry = entry.map_err(|e| DataError::io(dir, e))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if has_video_extension(&name, extensions) {
            files.push(name);
        }
    }
    Ok(files)
}

fn has_video_extension(name: &str, extensions: &[String]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| {
        lower
            .strip_suffix(ext.as_str())
            .is_some_and(|rest| rest.ends_with('.'))
    })
}

/// Choose the file whose stem starts with the folder name, else the first.
///
/// `files` must be non-empty.
pub fn pick_primary<'a>(folder: &str, files: &'a [String]) -> &'a str {
    let folder_upper = folder.to_uppercase();
    files
        .iter()
        .find(|f| {
            let stem = Path::new(f.as_str())
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(f.as_str());
            stem.to_uppercase().starts_with(&folder_upper)
        })
        .or_else(|| files.first())
        .map(String::as_str)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/video_tests.rs"]
mod tests;
