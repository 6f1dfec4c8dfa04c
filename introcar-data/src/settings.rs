//! Path and option defaults, stored in `~/.config/introcar-data/settings.toml`.
//!
//! Every job takes explicit paths; this file only supplies defaults so the
//! jobs can be rerun without repeating them on the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::lookbook::DEFAULT_IMAGE_BASE_URL;
use crate::video::DEFAULT_EXTENSIONS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub lookbooks: LookbookSettings,
    pub videos: VideoSettings,
}

/// Input and output locations. Any of them may be unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub video_source: Option<PathBuf>,
    pub video_output: Option<PathBuf>,
    pub chassis_input: Option<PathBuf>,
    pub chassis_output: Option<PathBuf>,
    pub lookbook_csv: Option<PathBuf>,
    pub image_map_csv: Option<PathBuf>,
    pub products_json: Option<PathBuf>,
    pub lookbooks_output: Option<PathBuf>,
    pub hotspot_index_output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookbookSettings {
    /// Prefix joined to CSV image file names (default: the live media URL)
    pub image_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Video extensions without the dot (default: `["mp4"]`)
    pub extensions: Option<Vec<String>>,
}

/// Canonical settings path: `<config dir>/introcar-data/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("introcar-data").join("settings.toml")
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            log::debug!("No settings file at {}", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        Self::from_toml(&contents)
            .map_err(|e| DataError::settings(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String, DataError> {
        toml::to_string_pretty(self).map_err(|e| DataError::settings(e.to_string()))
    }

    pub fn image_base_url(&self) -> String {
        self.lookbooks
            .image_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string())
    }

    /// Configured extensions, lowercased with any leading dot removed.
    pub fn video_extensions(&self) -> Vec<String> {
        match &self.videos.extensions {
            Some(exts) => exts
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            None => DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Resolve a path: command-line override first, then the settings value.
///
/// `name` is the settings key, used in the error when neither is set.
pub fn resolve_path(
    cli_override: Option<PathBuf>,
    configured: Option<&PathBuf>,
    name: &str,
) -> Result<PathBuf, DataError> {
    cli_override
        .or_else(|| configured.cloned())
        .ok_or_else(|| {
            DataError::settings(format!(
                "no path for `{name}`: pass it on the command line or set paths.{name} in {}",
                settings_path().display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let settings = Settings::from_toml(
            r#"
[paths]
video_source = "/mnt/turntable"
lookbooks_output = "data/json/lookbooks.json"

[lookbooks]
image_base_url = "https://cdn.example/lookbooks/"

[videos]
extensions = [".MP4", "mov"]
"#,
        )
        .unwrap();

        assert_eq!(
            settings.paths.video_source,
            Some(PathBuf::from("/mnt/turntable"))
        );
        assert_eq!(settings.paths.chassis_input, None);
        assert_eq!(settings.image_base_url(), "https://cdn.example/lookbooks/");
        assert_eq!(settings.video_extensions(), vec!["mp4", "mov"]);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.image_base_url(), DEFAULT_IMAGE_BASE_URL);
        assert_eq!(settings.video_extensions(), vec!["mp4"]);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let settings = Settings::load(Path::new("/no/such/settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "[paths\nbroken").unwrap();
        assert!(matches!(Settings::load(&path), Err(DataError::Settings(_))));
    }

    #[test]
    fn test_resolve_path_priority() {
        let configured = PathBuf::from("from-settings.json");
        let cli = Some(PathBuf::from("from-cli.json"));

        assert_eq!(
            resolve_path(cli, Some(&configured), "video_output").unwrap(),
            PathBuf::from("from-cli.json")
        );
        assert_eq!(
            resolve_path(None, Some(&configured), "video_output").unwrap(),
            configured
        );
        let err = resolve_path(None, None, "video_output").unwrap_err();
        assert!(err.to_string().contains("paths.video_output"));
    }

    #[test]
    fn test_roundtrip_to_toml() {
        let mut settings = Settings::default();
        settings.paths.chassis_input = Some(PathBuf::from("chassis.csv"));
        let text = settings.to_toml().unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }
}
