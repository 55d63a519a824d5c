use crate::error::ArchiveError;
use crate::render::PlotRenderer;
use chrono::{DateTime, Local};
use figure::Plot;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const ARCHIVE_DIR_NAME: &str = "SavedGraphs";
pub const BYTES_PER_MB: u64 = 1024 * 1024;
pub const IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub max_size_bytes: u64,
    pub root: PathBuf,
}

/// One archived figure: its directory and the images written into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Total size of every regular file under `path`. A missing path is empty.
pub fn dir_size(path: &Path) -> Result<u64, ArchiveError> {
    if !path.exists() {
        return Ok(0);
    }
    let mut total = 0;
    let entries = std::fs::read_dir(path).map_err(|e| ArchiveError::io(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ArchiveError::io(path, e))?;
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| ArchiveError::io(&entry_path, e))?;
        if file_type.is_dir() {
            total += dir_size(&entry_path)?;
        } else if file_type.is_file() {
            let meta = entry
                .metadata()
                .map_err(|e| ArchiveError::io(&entry_path, e))?;
            total += meta.len();
        }
    }
    Ok(total)
}

fn entry_timestamp(meta: &std::fs::Metadata) -> SystemTime {
    meta.created()
        .or_else(|_| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Top-level directories under `root`, oldest first.
pub fn archive_entries(root: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    let entries = std::fs::read_dir(root).map_err(|e| ArchiveError::io(root, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ArchiveError::io(root, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| ArchiveError::io(&path, e))?;
        if meta.is_dir() {
            found.push((entry_timestamp(&meta), path));
        }
    }
    found.sort();
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Deletes the oldest top-level directories of `root` until its size fits
/// `max_bytes`. The newest directory is never removed. Returns the removed
/// directories, oldest first.
pub fn enforce_size_limit(root: &Path, max_bytes: u64) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut removed = Vec::new();
    let mut size = dir_size(root)?;
    while size > max_bytes {
        let entries = archive_entries(root)?;
        if entries.len() <= 1 {
            break;
        }
        let oldest = &entries[0];
        std::fs::remove_dir_all(oldest).map_err(|e| ArchiveError::io(oldest, e))?;
        log::info!("Pruned archive entry '{}'", oldest.display());
        removed.push(oldest.clone());
        size = dir_size(root)?;
    }
    Ok(removed)
}

/// Replaces characters that are not valid in file names on common
/// platforms. Empty input becomes `untitled`.
pub fn sanitize_file_component(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn archive_dir_name(at: &DateTime<Local>, figure_name: &str) -> String {
    format!(
        "{} - {}",
        at.format("%Y-%m-%d %H-%M-%S%.3f"),
        sanitize_file_component(figure_name)
    )
}

/// File names for a figure's plots. Repeated titles get a ` (2)`, ` (3)`
/// suffix so no image overwrites another.
pub fn plot_file_names<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    titles
        .into_iter()
        .map(|title| {
            let base = sanitize_file_component(title);
            let count = seen.entry(base.to_lowercase()).or_insert(0);
            *count += 1;
            let stem = if *count == 1 {
                base
            } else {
                format!("{base} ({count})")
            };
            format!("{stem}.{IMAGE_EXTENSION}")
        })
        .collect()
}

fn unique_dir(parent: &Path, name: &str) -> PathBuf {
    let mut candidate = parent.join(name);
    let mut n = 2;
    while candidate.exists() {
        candidate = parent.join(format!("{name} ({n})"));
        n += 1;
    }
    candidate
}

/// Renders every plot into `directory`, creating it when needed.
pub fn export_plots(
    renderer: &dyn PlotRenderer,
    directory: &Path,
    plots: &[&Plot],
    size: (u32, u32),
) -> Result<Vec<PathBuf>, ArchiveError> {
    std::fs::create_dir_all(directory).map_err(|e| ArchiveError::io(directory, e))?;
    let names = plot_file_names(plots.iter().map(|plot| plot.title()));
    let mut files = Vec::with_capacity(plots.len());
    for (plot, name) in plots.iter().zip(names) {
        let path = directory.join(name);
        renderer
            .render_png(plot, &path, size.0, size.1)
            .map_err(|source| ArchiveError::Export {
                title: plot.title().to_string(),
                source,
            })?;
        files.push(path);
    }
    Ok(files)
}

pub struct ArchiveManager {
    config: ArchiveConfig,
    image_size: (u32, u32),
}

impl ArchiveManager {
    pub fn new(config: ArchiveConfig, image_size: (u32, u32)) -> Self {
        Self { config, image_size }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Writes one image per plot into a fresh timestamped directory.
    pub fn save_figure(
        &self,
        renderer: &dyn PlotRenderer,
        figure_name: &str,
        plots: &[&Plot],
        at: &DateTime<Local>,
    ) -> Result<ArchiveEntry, ArchiveError> {
        let root = &self.config.root;
        std::fs::create_dir_all(root).map_err(|e| ArchiveError::io(root, e))?;
        let directory = unique_dir(root, &archive_dir_name(at, figure_name));
        let files = export_plots(renderer, &directory, plots, self.image_size)?;
        log::info!(
            "Archived figure '{figure_name}' to '{}' ({} images)",
            directory.display(),
            files.len()
        );
        Ok(ArchiveEntry { directory, files })
    }

    /// Prunes the archive down to its budget. Does nothing when disabled.
    pub fn sweep(&self) -> Result<Vec<PathBuf>, ArchiveError> {
        if !self.config.enabled {
            return Ok(Vec::new());
        }
        enforce_size_limit(&self.config.root, self.config.max_size_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sanitize_replaces_reserved_characters() {
        assert_eq!(sanitize_file_component("Graph 1: a/b"), "Graph 1_ a_b");
        assert_eq!(sanitize_file_component("  "), "untitled");
        assert_eq!(sanitize_file_component(".."), "untitled");
        assert_eq!(sanitize_file_component("name."), "name");
    }

    #[test]
    fn dir_name_has_millisecond_timestamp() {
        let at = Local
            .with_ymd_and_hms(2024, 3, 5, 14, 7, 9)
            .single()
            .expect("unambiguous time");
        assert_eq!(
            archive_dir_name(&at, "Graph Collection 1"),
            "2024-03-05 14-07-09.000 - Graph Collection 1"
        );
    }

    #[test]
    fn repeated_titles_get_suffixes() {
        let names = plot_file_names(["Graph 1", "Graph 2", "Graph 1", "graph 1"]);
        assert_eq!(
            names,
            vec!["Graph 1.png", "Graph 2.png", "Graph 1 (2).png", "graph 1 (3).png"]
        );
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("absent");
        assert_eq!(dir_size(&root).unwrap(), 0);
        assert!(enforce_size_limit(&root, 0).unwrap().is_empty());
    }
}
