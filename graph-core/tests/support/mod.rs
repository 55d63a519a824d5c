#![allow(dead_code)]

use figure::{ContourSpec, Plot};
use graph_core::{GraphSettings, PlotRenderer, RenderError, SettingsStore};
use std::path::Path;

/// Writes `bytes` zero bytes per image so archive sizes are exact.
pub struct FixedSizeRenderer {
    pub bytes: usize,
}

impl PlotRenderer for FixedSizeRenderer {
    fn render_png(
        &self,
        _plot: &Plot,
        path: &Path,
        _width: u32,
        _height: u32,
    ) -> Result<(), RenderError> {
        std::fs::write(path, vec![0u8; self.bytes]).map_err(|e| RenderError::Draw(e.to_string()))
    }
}

pub struct FailingRenderer;

impl PlotRenderer for FailingRenderer {
    fn render_png(
        &self,
        _plot: &Plot,
        _path: &Path,
        _width: u32,
        _height: u32,
    ) -> Result<(), RenderError> {
        Err(RenderError::Draw("backend unavailable".to_string()))
    }
}

pub fn settings(root: &Path, pages: usize, archive_mb: u64) -> GraphSettings {
    GraphSettings {
        archive_location: root.to_path_buf(),
        archive_enabled: archive_mb > 0,
        max_archive_size_mb: archive_mb,
        history_enabled: true,
        num_pages_history: pages,
        auto_navigate: true,
        ..GraphSettings::default()
    }
}

pub fn in_memory(root: &Path, pages: usize, archive_mb: u64) -> SettingsStore {
    SettingsStore::in_memory(settings(root, pages, archive_mb))
}

pub fn contour(title: &str) -> ContourSpec {
    ContourSpec {
        title: title.to_string(),
        x_label: "x".to_string(),
        y_label: "y".to_string(),
        x_min: -1.0,
        x_max: 1.0,
        y_min: -1.0,
        y_max: 1.0,
        levels: vec![0.5],
        grid: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
    }
}

pub fn archive_dirs(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
