use crate::archive::{ArchiveConfig, ARCHIVE_DIR_NAME, BYTES_PER_MB};
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_ENV_VAR: &str = "GRAPH_SERVICE_SETTINGS";
pub const SETTINGS_DIR_NAME: &str = "graph-service";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const MIN_IMAGE_DIMENSION: u32 = 16;

/// Persisted service settings. Unknown keys are rejected when patching, and
/// missing keys fall back to their defaults when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub main_left: f32,
    pub main_top: f32,
    pub main_width: f32,
    pub main_height: f32,
    pub archive_location: PathBuf,
    pub archive_enabled: bool,
    pub max_archive_size_mb: u64,
    pub image_width: u32,
    pub image_height: u32,
    pub history_enabled: bool,
    pub num_pages_history: usize,
    pub auto_navigate: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            main_left: 100.0,
            main_top: 100.0,
            main_width: 1280.0,
            main_height: 720.0,
            archive_location: default_archive_location(),
            archive_enabled: true,
            max_archive_size_mb: 500,
            image_width: 1280,
            image_height: 1024,
            history_enabled: true,
            num_pages_history: 10,
            auto_navigate: true,
        }
    }
}

impl GraphSettings {
    /// Number of figures kept live. Disabled history keeps only the newest.
    pub fn history_depth(&self) -> usize {
        if self.history_enabled {
            self.num_pages_history.max(1)
        } else {
            1
        }
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig {
            enabled: self.archive_enabled && self.max_archive_size_mb > 0,
            max_size_bytes: self.max_archive_size_mb.saturating_mul(BYTES_PER_MB),
            root: self.archive_location.clone(),
        }
    }

    pub fn image_preset(&self) -> ImagePreset {
        ImagePreset::from_dimensions(self.image_width, self.image_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePreset {
    Small,
    Medium,
    Large,
    Custom,
}

impl ImagePreset {
    pub const FIXED: [ImagePreset; 3] = [ImagePreset::Small, ImagePreset::Medium, ImagePreset::Large];

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            ImagePreset::Small => Some((800, 600)),
            ImagePreset::Medium => Some((1280, 1024)),
            ImagePreset::Large => Some((1920, 1080)),
            ImagePreset::Custom => None,
        }
    }

    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::FIXED
            .into_iter()
            .find(|preset| preset.dimensions() == Some((width, height)))
            .unwrap_or(ImagePreset::Custom)
    }

    pub fn label(&self) -> String {
        match self.dimensions() {
            Some((w, h)) => format!("{w} x {h}"),
            None => "Custom".to_string(),
        }
    }
}

/// `<desktop>/SavedGraphs`, falling back to the home directory and then the
/// working directory when no desktop is known.
pub fn default_archive_location() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(ARCHIVE_DIR_NAME)
}

pub fn default_settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SETTINGS_ENV_VAR) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR_NAME)
        .join(SETTINGS_FILE_NAME)
}

pub fn normalize_settings(mut settings: GraphSettings) -> GraphSettings {
    settings.image_width = settings.image_width.max(MIN_IMAGE_DIMENSION);
    settings.image_height = settings.image_height.max(MIN_IMAGE_DIMENSION);
    settings.num_pages_history = settings.num_pages_history.max(1);
    if settings.main_width <= 0.0 || settings.main_height <= 0.0 {
        let defaults = GraphSettings::default();
        settings.main_width = defaults.main_width;
        settings.main_height = defaults.main_height;
    }
    settings
}

pub fn load_settings_file(path: &Path) -> Result<GraphSettings, SettingsError> {
    let data = std::fs::read(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: GraphSettings = serde_json::from_slice(&data)?;
    Ok(normalize_settings(settings))
}

pub fn save_settings_file(path: &Path, settings: &GraphSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = serde_json::to_vec_pretty(settings)?;
    std::fs::write(path, data).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Merges a partial JSON object into `settings`. Every key must name an
/// existing setting.
pub fn apply_settings_patch(
    settings: &GraphSettings,
    patch: &str,
) -> Result<GraphSettings, SettingsError> {
    let patch: serde_json::Value = serde_json::from_str(patch)?;
    let serde_json::Value::Object(entries) = patch else {
        return Err(SettingsError::Invalid(
            "settings patch must be a JSON object".to_string(),
        ));
    };
    let mut merged = serde_json::to_value(settings)?;
    let Some(target) = merged.as_object_mut() else {
        return Err(SettingsError::Invalid(
            "settings did not serialize to an object".to_string(),
        ));
    };
    for (key, value) in entries {
        if !target.contains_key(&key) {
            return Err(SettingsError::Invalid(format!("unknown setting '{key}'")));
        }
        target.insert(key, value);
    }
    let updated: GraphSettings = serde_json::from_value(merged)?;
    Ok(normalize_settings(updated))
}

/// Settings plus the file they persist to. Without a path the store lives in
/// memory only.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: GraphSettings,
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Loads `path`, writing defaults there first when the file is missing
    /// or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match load_settings_file(&path) {
            Ok(settings) => settings,
            Err(err) => {
                if path.exists() {
                    log::warn!("Replacing unreadable settings '{}': {err}", path.display());
                }
                let defaults = GraphSettings::default();
                if let Err(err) = save_settings_file(&path, &defaults) {
                    log::warn!("Failed to write default settings: {err}");
                }
                defaults
            }
        };
        Self {
            settings,
            path: Some(path),
        }
    }

    pub fn in_memory(settings: GraphSettings) -> Self {
        Self {
            settings: normalize_settings(settings),
            path: None,
        }
    }

    pub fn get(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        match &self.path {
            Some(path) => save_settings_file(path, &self.settings),
            None => Ok(()),
        }
    }

    /// Applies `change`, normalizes and persists. Nothing changes when the
    /// file cannot be written.
    pub fn update(&mut self, change: impl FnOnce(&mut GraphSettings)) -> Result<(), SettingsError> {
        let mut next = self.settings.clone();
        change(&mut next);
        self.commit(normalize_settings(next))
    }

    pub fn apply_json(&mut self, patch: &str) -> Result<(), SettingsError> {
        let next = apply_settings_patch(&self.settings, patch)?;
        self.commit(next)
    }

    fn commit(&mut self, next: GraphSettings) -> Result<(), SettingsError> {
        if let Some(path) = &self.path {
            save_settings_file(path, &next)?;
        }
        self.settings = next;
        Ok(())
    }
}
