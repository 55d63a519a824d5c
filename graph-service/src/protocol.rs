use figure::{
    AxisBounds, ContourSpec, FigureId, FigureSummary, LineGraphSpec, LineStyle, PlotId,
};
use graph_core::GraphSettings;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/graph-service.sock";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceRequest {
    AddFigure {
        name: String,
    },
    AddLineGraph {
        figure: FigureId,
        #[serde(flatten)]
        spec: LineGraphSpec,
    },
    Plot {
        line_graph: PlotId,
        #[serde(default)]
        title: Option<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
        #[serde(default)]
        style: Option<LineStyle>,
    },
    AddContourPlot {
        figure: FigureId,
        #[serde(flatten)]
        spec: ContourSpec,
    },
    SetAxisBoundaries {
        line_graph: PlotId,
        #[serde(flatten)]
        bounds: AxisBounds,
    },
    ClearGraph {
        graph: PlotId,
    },
    NavigateTo {
        figure: FigureId,
    },
    NavigateBack,
    NavigateForward,
    SetUiHistory {
        count: usize,
    },
    SetArchiveSize {
        size_mb: u64,
    },
    ListFigures,
    SaveFigure {
        figure: FigureId,
        directory: String,
    },
    SettingsShow,
    SettingsSet {
        json: String,
    },
    ServiceStop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceResponse {
    Ok {
        message: String,
    },
    FigureAdded {
        id: FigureId,
    },
    PlotAdded {
        id: PlotId,
    },
    FigureList {
        figures: Vec<FigureSummary>,
        current: Option<FigureId>,
    },
    Saved {
        files: Vec<String>,
    },
    Settings {
        settings: GraphSettings,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl ServiceResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        ServiceResponse::Ok {
            message: message.into(),
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        ServiceResponse::Error {
            kind,
            message: message.into(),
        }
    }
}
