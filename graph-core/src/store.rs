use crate::archive::{export_plots, sanitize_file_component, ArchiveEntry, ArchiveManager};
use crate::error::GraphError;
use crate::render::PlotRenderer;
use crate::settings::{GraphSettings, SettingsStore};
use chrono::{DateTime, Local};
use figure::{
    validate_bounds, validate_contour, validate_series, Arena, AxisBounds, ContourSpec, Figure,
    FigureId, FigureSummary, LineGraph, LineGraphSpec, LineStyle, Plot, PlotId, PlotSummary,
    Series,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What a history update did. Failed archive writes are logged and left out
/// of `archived`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryReport {
    pub evicted: Vec<FigureId>,
    pub archived: Vec<ArchiveEntry>,
    pub pruned: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotView {
    pub id: PlotId,
    pub plot: Plot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureView {
    pub id: FigureId,
    pub name: String,
    pub plots: Vec<PlotView>,
}

/// Owned copy of everything a viewer needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreView {
    pub figures: Vec<FigureView>,
    pub current: Option<FigureId>,
}

impl StoreView {
    pub fn current_figure(&self) -> Option<&FigureView> {
        let current = self.current?;
        self.figures.iter().find(|figure| figure.id == current)
    }

    /// Position of the displayed figure in the live list.
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current?;
        self.figures.iter().position(|figure| figure.id == current)
    }
}

/// Every live figure and plot, the display cursor and the settings they are
/// governed by. Figures are kept in creation order.
pub struct FigureStore {
    figures: Arena<Figure>,
    plots: Arena<Plot>,
    live: Vec<FigureId>,
    current: Option<FigureId>,
    settings: SettingsStore,
    renderer: Box<dyn PlotRenderer>,
}

impl FigureStore {
    pub fn new(settings: SettingsStore, renderer: Box<dyn PlotRenderer>) -> Self {
        Self {
            figures: Arena::new(),
            plots: Arena::new(),
            live: Vec::new(),
            current: None,
            settings,
            renderer,
        }
    }

    pub fn settings(&self) -> &GraphSettings {
        self.settings.get()
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings.path()
    }

    pub fn live_figures(&self) -> &[FigureId] {
        &self.live
    }

    pub fn current(&self) -> Option<FigureId> {
        self.current
    }

    pub fn figure(&self, id: FigureId) -> Result<&Figure, GraphError> {
        self.figures
            .get(id.0)
            .ok_or_else(|| GraphError::not_found("figure", id))
    }

    pub fn plot_data(&self, id: PlotId) -> Result<&Plot, GraphError> {
        self.plots
            .get(id.0)
            .ok_or_else(|| GraphError::not_found("plot", id))
    }

    fn plot_mut(&mut self, id: PlotId) -> Result<&mut Plot, GraphError> {
        self.plots
            .get_mut(id.0)
            .ok_or_else(|| GraphError::not_found("plot", id))
    }

    fn line_graph_mut(&mut self, id: PlotId) -> Result<&mut LineGraph, GraphError> {
        match self.plot_mut(id)? {
            Plot::Line(graph) => Ok(graph),
            Plot::Contour(_) => Err(GraphError::invalid(format!(
                "plot '{id}' is a contour plot, not a line graph"
            ))),
        }
    }

    fn figure_plots(&self, figure: &Figure) -> Vec<&Plot> {
        figure
            .plots
            .iter()
            .filter_map(|id| self.plots.get(id.0))
            .collect()
    }

    /// Creates an empty figure, shows it when auto-navigation is on (or
    /// nothing is shown yet), then applies history retention.
    pub fn add_figure(&mut self, name: &str) -> FigureId {
        let id = FigureId(self.figures.insert(Figure::new(name)));
        self.live.push(id);
        if self.settings().auto_navigate || self.current.is_none() {
            self.current = Some(id);
        }
        log::info!("Added figure '{name}' ({id})");
        self.update_history();
        id
    }

    fn attach_plot(&mut self, figure: FigureId, plot: Plot) -> Result<PlotId, GraphError> {
        if !self.figures.contains(figure.0) {
            return Err(GraphError::not_found("figure", figure));
        }
        let id = PlotId(self.plots.insert(plot));
        if let Some(entry) = self.figures.get_mut(figure.0) {
            entry.plots.push(id);
        }
        Ok(id)
    }

    pub fn add_line_graph(
        &mut self,
        figure: FigureId,
        spec: LineGraphSpec,
    ) -> Result<PlotId, GraphError> {
        self.attach_plot(figure, Plot::Line(LineGraph::new(spec)))
    }

    pub fn add_contour_plot(
        &mut self,
        figure: FigureId,
        spec: ContourSpec,
    ) -> Result<PlotId, GraphError> {
        validate_contour(&spec)?;
        self.attach_plot(figure, Plot::Contour(spec))
    }

    /// Appends a series to a line graph.
    pub fn plot(
        &mut self,
        line_graph: PlotId,
        title: Option<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
        style: Option<LineStyle>,
    ) -> Result<(), GraphError> {
        let graph = self.line_graph_mut(line_graph)?;
        validate_series(&xs, &ys)?;
        graph.series.push(Series {
            title,
            xs,
            ys,
            style,
        });
        Ok(())
    }

    pub fn set_axis_boundaries(
        &mut self,
        line_graph: PlotId,
        bounds: AxisBounds,
    ) -> Result<(), GraphError> {
        let graph = self.line_graph_mut(line_graph)?;
        validate_bounds(&bounds)?;
        graph.bounds = bounds;
        Ok(())
    }

    pub fn clear_graph(&mut self, plot: PlotId) -> Result<(), GraphError> {
        self.plot_mut(plot)?.clear();
        Ok(())
    }

    pub fn navigate_to(&mut self, figure: FigureId) -> Result<(), GraphError> {
        if !self.live.contains(&figure) {
            return Err(GraphError::not_found("figure", figure));
        }
        self.current = Some(figure);
        Ok(())
    }

    fn current_position(&self) -> Option<usize> {
        let current = self.current?;
        self.live.iter().position(|id| *id == current)
    }

    /// Shows the previous figure. At the first figure the display stays put.
    pub fn navigate_back(&mut self) -> Result<FigureId, GraphError> {
        let position = self
            .current_position()
            .ok_or_else(|| GraphError::invalid("no figure is displayed"))?;
        let target = self.live[position.saturating_sub(1)];
        self.current = Some(target);
        Ok(target)
    }

    /// Shows the next figure.
    pub fn navigate_forward(&mut self) -> Result<FigureId, GraphError> {
        let position = self
            .current_position()
            .ok_or_else(|| GraphError::invalid("no figure is displayed"))?;
        let target = self
            .live
            .get(position + 1)
            .copied()
            .ok_or_else(|| GraphError::invalid("already at the newest figure"))?;
        self.current = Some(target);
        Ok(target)
    }

    pub fn set_ui_history(&mut self, count: usize) -> Result<HistoryReport, GraphError> {
        if count == 0 {
            return Err(GraphError::invalid("history count must be at least 1"));
        }
        self.settings.update(|s| s.num_pages_history = count)?;
        Ok(self.update_history())
    }

    /// Zero disables archiving and keeps the stored budget; any other size
    /// enables it with that budget.
    pub fn set_archive_size(&mut self, size_mb: u64) -> Result<(), GraphError> {
        self.settings.update(|s| {
            if size_mb > 0 {
                s.max_archive_size_mb = size_mb;
            }
            s.archive_enabled = size_mb > 0;
        })?;
        if size_mb > 0 {
            log::info!("Archive budget set to {size_mb} MB");
        } else {
            log::info!("Archiving disabled");
        }
        Ok(())
    }

    /// Merges a partial JSON settings object, persists it and re-applies
    /// history retention.
    pub fn update_settings(&mut self, patch: &str) -> Result<HistoryReport, GraphError> {
        self.settings.apply_json(patch)?;
        Ok(self.update_history())
    }

    fn archive_manager(&self) -> ArchiveManager {
        let settings = self.settings();
        ArchiveManager::new(settings.archive_config(), settings.image_size())
    }

    fn archive_figure(
        &self,
        archive: &ArchiveManager,
        id: FigureId,
        at: &DateTime<Local>,
    ) -> Result<ArchiveEntry, GraphError> {
        let figure = self.figure(id)?;
        let plots = self.figure_plots(figure);
        Ok(archive.save_figure(self.renderer.as_ref(), &figure.name, &plots, at)?)
    }

    fn drop_figure(&mut self, id: FigureId) {
        if let Some(figure) = self.figures.remove(id.0) {
            for plot in figure.plots {
                self.plots.remove(plot.0);
            }
        }
    }

    /// Evicts the oldest figures beyond the history depth, archiving each
    /// one first when archiving is enabled, then prunes the archive.
    pub fn update_history(&mut self) -> HistoryReport {
        let keep = self.settings().history_depth();
        let excess = self.live.len().saturating_sub(keep);
        let evicted: Vec<FigureId> = self.live.drain(..excess).collect();
        let archive = self.archive_manager();
        let mut report = HistoryReport::default();

        if archive.is_enabled() && !evicted.is_empty() {
            let now = Local::now();
            for id in &evicted {
                match self.archive_figure(&archive, *id, &now) {
                    Ok(entry) => report.archived.push(entry),
                    Err(err) => log::warn!("Failed to archive figure {id}: {err}"),
                }
            }
        }
        for id in &evicted {
            self.drop_figure(*id);
            log::info!("Evicted figure {id}");
        }
        if self.current.is_some_and(|current| evicted.contains(&current)) {
            self.current = self.live.first().copied();
        }

        match archive.sweep() {
            Ok(pruned) => report.pruned = pruned,
            Err(err) => log::warn!("Archive sweep failed: {err}"),
        }
        report.evicted = evicted;
        report
    }

    /// Exports every plot of `figure` into `directory/<figure name>/`.
    pub fn save_figure_to(
        &self,
        figure: FigureId,
        directory: &Path,
    ) -> Result<Vec<PathBuf>, GraphError> {
        let entry = self.figure(figure)?;
        let target = directory.join(sanitize_file_component(&entry.name));
        let plots = self.figure_plots(entry);
        let files = export_plots(
            self.renderer.as_ref(),
            &target,
            &plots,
            self.settings().image_size(),
        )?;
        log::info!("Saved figure '{}' to '{}'", entry.name, target.display());
        Ok(files)
    }

    pub fn list_figures(&self) -> Vec<FigureSummary> {
        self.live
            .iter()
            .filter_map(|id| {
                let figure = self.figures.get(id.0)?;
                let plots = figure
                    .plots
                    .iter()
                    .filter_map(|plot_id| {
                        let plot = self.plots.get(plot_id.0)?;
                        Some(PlotSummary {
                            id: *plot_id,
                            kind: plot.kind_name().to_string(),
                            title: plot.title().to_string(),
                        })
                    })
                    .collect();
                Some(FigureSummary {
                    id: *id,
                    name: figure.name.clone(),
                    plots,
                })
            })
            .collect()
    }

    pub fn view(&self) -> StoreView {
        let figures = self
            .live
            .iter()
            .filter_map(|id| {
                let figure = self.figures.get(id.0)?;
                let plots = figure
                    .plots
                    .iter()
                    .filter_map(|plot_id| {
                        Some(PlotView {
                            id: *plot_id,
                            plot: self.plots.get(plot_id.0)?.clone(),
                        })
                    })
                    .collect();
                Some(FigureView {
                    id: *id,
                    name: figure.name.clone(),
                    plots,
                })
            })
            .collect();
        StoreView {
            figures,
            current: self.current,
        }
    }

    /// Archives every live figure when archiving is enabled and persists
    /// settings. The store is empty afterwards.
    pub fn shutdown(&mut self) -> Vec<ArchiveEntry> {
        let archive = self.archive_manager();
        let live = std::mem::take(&mut self.live);
        let mut archived = Vec::new();
        if archive.is_enabled() {
            let now = Local::now();
            for id in &live {
                match self.archive_figure(&archive, *id, &now) {
                    Ok(entry) => archived.push(entry),
                    Err(err) => log::warn!("Failed to archive figure {id}: {err}"),
                }
            }
            if let Err(err) = archive.sweep() {
                log::warn!("Archive sweep failed: {err}");
            }
        }
        for id in live {
            self.drop_figure(id);
        }
        self.current = None;
        if let Err(err) = self.settings.save() {
            log::warn!("Failed to persist settings: {err}");
        }
        archived
    }
}
