use figure::{
    AxisBounds, ContourSpec, FigureId, FigureSummary, LineGraphSpec, PlotId, Series,
};
use graph_core::{ArchiveEntry, GraphError, GraphSettings, HistoryReport, StoreView};
use std::path::PathBuf;
use std::sync::mpsc::Sender;

pub type Reply<T> = Sender<Result<T, GraphError>>;

/// Snapshot published by the host after every change.
#[derive(Debug, Clone, Default)]
pub struct HostView {
    pub revision: u64,
    pub store: StoreView,
    pub settings: Option<GraphSettings>,
}

#[derive(Debug)]
pub enum HostMessage {
    AddFigure {
        name: String,
        reply: Sender<FigureId>,
    },
    AddLineGraph {
        figure: FigureId,
        spec: LineGraphSpec,
        reply: Reply<PlotId>,
    },
    AddContourPlot {
        figure: FigureId,
        spec: ContourSpec,
        reply: Reply<PlotId>,
    },
    Plot {
        line_graph: PlotId,
        series: Series,
        reply: Reply<()>,
    },
    SetAxisBoundaries {
        line_graph: PlotId,
        bounds: AxisBounds,
        reply: Reply<()>,
    },
    ClearGraph {
        plot: PlotId,
        reply: Reply<()>,
    },
    NavigateTo {
        figure: FigureId,
        reply: Reply<()>,
    },
    NavigateBack {
        reply: Reply<FigureId>,
    },
    NavigateForward {
        reply: Reply<FigureId>,
    },
    SetUiHistory {
        count: usize,
        reply: Reply<HistoryReport>,
    },
    SetArchiveSize {
        size_mb: u64,
        reply: Reply<()>,
    },
    UpdateSettings {
        patch: String,
        reply: Reply<HistoryReport>,
    },
    SaveFigure {
        figure: FigureId,
        directory: PathBuf,
        reply: Reply<Vec<PathBuf>>,
    },
    ListFigures {
        reply: Sender<(Vec<FigureSummary>, Option<FigureId>)>,
    },
    QuerySettings {
        reply: Sender<GraphSettings>,
    },
    Shutdown {
        reply: Sender<Vec<ArchiveEntry>>,
    },
}

impl HostMessage {
    /// Whether handling the message can change what the viewer shows.
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            HostMessage::ListFigures { .. }
                | HostMessage::QuerySettings { .. }
                | HostMessage::SaveFigure { .. }
        )
    }
}
