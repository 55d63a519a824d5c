use crate::message_handler::{HostMessage, Reply};
use crate::HostError;
use figure::{
    AxisBounds, ContourSpec, FigureId, FigureSummary, LineGraphSpec, LineStyle, PlotId, Series,
};
use graph_core::{ArchiveEntry, GraphSettings, HistoryReport};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

/// Cloneable, blocking front door to the host thread. Each call sends one
/// message and waits for its reply.
#[derive(Debug, Clone)]
pub struct HostHandle {
    tx: Sender<HostMessage>,
}

impl HostHandle {
    pub fn new(tx: Sender<HostMessage>) -> Self {
        Self { tx }
    }

    fn request<T>(&self, build: impl FnOnce(Sender<T>) -> HostMessage) -> Result<T, HostError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(build(reply_tx))
            .map_err(|_| HostError::Disconnected)?;
        reply_rx.recv().map_err(|_| HostError::Disconnected)
    }

    fn call<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> HostMessage,
    ) -> Result<T, HostError> {
        Ok(self.request(build)??)
    }

    pub fn add_figure(&self, name: &str) -> Result<FigureId, HostError> {
        let name = name.to_string();
        self.request(|reply| HostMessage::AddFigure { name, reply })
    }

    pub fn add_line_graph(
        &self,
        figure: FigureId,
        spec: LineGraphSpec,
    ) -> Result<PlotId, HostError> {
        self.call(|reply| HostMessage::AddLineGraph {
            figure,
            spec,
            reply,
        })
    }

    pub fn add_contour_plot(
        &self,
        figure: FigureId,
        spec: ContourSpec,
    ) -> Result<PlotId, HostError> {
        self.call(|reply| HostMessage::AddContourPlot {
            figure,
            spec,
            reply,
        })
    }

    pub fn plot(
        &self,
        line_graph: PlotId,
        title: Option<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
        style: Option<LineStyle>,
    ) -> Result<(), HostError> {
        let series = Series {
            title,
            xs,
            ys,
            style,
        };
        self.call(|reply| HostMessage::Plot {
            line_graph,
            series,
            reply,
        })
    }

    pub fn set_axis_boundaries(
        &self,
        line_graph: PlotId,
        bounds: AxisBounds,
    ) -> Result<(), HostError> {
        self.call(|reply| HostMessage::SetAxisBoundaries {
            line_graph,
            bounds,
            reply,
        })
    }

    pub fn clear_graph(&self, plot: PlotId) -> Result<(), HostError> {
        self.call(|reply| HostMessage::ClearGraph { plot, reply })
    }

    pub fn navigate_to(&self, figure: FigureId) -> Result<(), HostError> {
        self.call(|reply| HostMessage::NavigateTo { figure, reply })
    }

    pub fn navigate_back(&self) -> Result<FigureId, HostError> {
        self.call(|reply| HostMessage::NavigateBack { reply })
    }

    pub fn navigate_forward(&self) -> Result<FigureId, HostError> {
        self.call(|reply| HostMessage::NavigateForward { reply })
    }

    pub fn set_ui_history(&self, count: usize) -> Result<HistoryReport, HostError> {
        self.call(|reply| HostMessage::SetUiHistory { count, reply })
    }

    pub fn set_archive_size(&self, size_mb: u64) -> Result<(), HostError> {
        self.call(|reply| HostMessage::SetArchiveSize { size_mb, reply })
    }

    pub fn update_settings(&self, patch: &str) -> Result<HistoryReport, HostError> {
        let patch = patch.to_string();
        self.call(|reply| HostMessage::UpdateSettings { patch, reply })
    }

    pub fn save_figure(
        &self,
        figure: FigureId,
        directory: impl Into<PathBuf>,
    ) -> Result<Vec<PathBuf>, HostError> {
        let directory = directory.into();
        self.call(|reply| HostMessage::SaveFigure {
            figure,
            directory,
            reply,
        })
    }

    pub fn list_figures(&self) -> Result<(Vec<FigureSummary>, Option<FigureId>), HostError> {
        self.request(|reply| HostMessage::ListFigures { reply })
    }

    pub fn settings(&self) -> Result<GraphSettings, HostError> {
        self.request(|reply| HostMessage::QuerySettings { reply })
    }

    /// Archives live figures, persists settings and stops the host thread.
    pub fn shutdown(&self) -> Result<Vec<ArchiveEntry>, HostError> {
        self.request(|reply| HostMessage::Shutdown { reply })
    }
}
