use crate::protocol::{ErrorKind, ServiceRequest, ServiceResponse, DEFAULT_SOCKET_PATH};
use figure::{
    AxisBounds, ContourSpec, FigureId, FigureSummary, LineGraphSpec, LineStyle, PlotId,
};
use graph_core::GraphSettings;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("service error: {0}")]
    Service(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub fn send_request(request: &ServiceRequest) -> Result<ServiceResponse, ClientError> {
    send_request_to(DEFAULT_SOCKET_PATH, request)
}

pub fn send_request_to(
    path: &str,
    request: &ServiceRequest,
) -> Result<ServiceResponse, ClientError> {
    let mut stream = UnixStream::connect(path).map_err(|_| {
        ClientError::Transport(format!(
            "Failed to connect to graph service at {path}. Is it running?"
        ))
    })?;
    let payload =
        serde_json::to_string(request).map_err(|e| ClientError::Transport(e.to_string()))?;
    stream
        .write_all(format!("{payload}\n").as_bytes())
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| ClientError::Transport(e.to_string()))?;
    if line.trim().is_empty() {
        return Err(ClientError::Transport(
            "Graph service returned empty response".to_string(),
        ));
    }
    serde_json::from_str::<ServiceResponse>(line.trim())
        .map_err(|e| ClientError::UnexpectedResponse(e.to_string()))
}

fn unexpected(response: ServiceResponse) -> ClientError {
    ClientError::UnexpectedResponse(format!("{response:?}"))
}

/// Typed wrapper over the socket protocol. Service-side failures come back
/// as the matching [`ClientError`] variant.
#[derive(Debug, Clone)]
pub struct GraphClient {
    socket_path: String,
}

impl Default for GraphClient {
    fn default() -> Self {
        Self::new(DEFAULT_SOCKET_PATH)
    }
}

impl GraphClient {
    pub fn new(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    pub fn call(&self, request: &ServiceRequest) -> Result<ServiceResponse, ClientError> {
        match send_request_to(&self.socket_path, request)? {
            ServiceResponse::Error { kind, message } => Err(match kind {
                ErrorKind::NotFound => ClientError::NotFound(message),
                ErrorKind::InvalidArgument => ClientError::InvalidArgument(message),
                ErrorKind::Internal => ClientError::Service(message),
            }),
            response => Ok(response),
        }
    }

    fn call_ok(&self, request: &ServiceRequest) -> Result<String, ClientError> {
        match self.call(request)? {
            ServiceResponse::Ok { message } => Ok(message),
            other => Err(unexpected(other)),
        }
    }

    fn call_plot_added(&self, request: &ServiceRequest) -> Result<PlotId, ClientError> {
        match self.call(request)? {
            ServiceResponse::PlotAdded { id } => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    pub fn add_figure(&self, name: &str) -> Result<FigureId, ClientError> {
        match self.call(&ServiceRequest::AddFigure {
            name: name.to_string(),
        })? {
            ServiceResponse::FigureAdded { id } => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    pub fn add_line_graph(
        &self,
        figure: FigureId,
        spec: LineGraphSpec,
    ) -> Result<PlotId, ClientError> {
        self.call_plot_added(&ServiceRequest::AddLineGraph { figure, spec })
    }

    pub fn add_contour_plot(
        &self,
        figure: FigureId,
        spec: ContourSpec,
    ) -> Result<PlotId, ClientError> {
        self.call_plot_added(&ServiceRequest::AddContourPlot { figure, spec })
    }

    pub fn plot(
        &self,
        line_graph: PlotId,
        title: &str,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<(), ClientError> {
        self.plot_with_style(line_graph, title, xs, ys, None)
    }

    pub fn plot_with_style(
        &self,
        line_graph: PlotId,
        title: &str,
        xs: &[f64],
        ys: &[f64],
        style: Option<LineStyle>,
    ) -> Result<(), ClientError> {
        self.call_ok(&ServiceRequest::Plot {
            line_graph,
            title: (!title.is_empty()).then(|| title.to_string()),
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            style,
        })
        .map(|_| ())
    }

    pub fn set_axis_boundaries(
        &self,
        line_graph: PlotId,
        bounds: AxisBounds,
    ) -> Result<(), ClientError> {
        self.call_ok(&ServiceRequest::SetAxisBoundaries { line_graph, bounds })
            .map(|_| ())
    }

    pub fn clear_graph(&self, graph: PlotId) -> Result<(), ClientError> {
        self.call_ok(&ServiceRequest::ClearGraph { graph }).map(|_| ())
    }

    pub fn navigate_to(&self, figure: FigureId) -> Result<(), ClientError> {
        self.call_ok(&ServiceRequest::NavigateTo { figure })
            .map(|_| ())
    }

    pub fn navigate_back(&self) -> Result<String, ClientError> {
        self.call_ok(&ServiceRequest::NavigateBack)
    }

    pub fn navigate_forward(&self) -> Result<String, ClientError> {
        self.call_ok(&ServiceRequest::NavigateForward)
    }

    pub fn set_ui_history(&self, count: usize) -> Result<String, ClientError> {
        self.call_ok(&ServiceRequest::SetUiHistory { count })
    }

    pub fn set_archive_size(&self, size_mb: u64) -> Result<String, ClientError> {
        self.call_ok(&ServiceRequest::SetArchiveSize { size_mb })
    }

    pub fn list_figures(&self) -> Result<(Vec<FigureSummary>, Option<FigureId>), ClientError> {
        match self.call(&ServiceRequest::ListFigures)? {
            ServiceResponse::FigureList { figures, current } => Ok((figures, current)),
            other => Err(unexpected(other)),
        }
    }

    pub fn save_figure(&self, figure: FigureId, directory: &str) -> Result<Vec<String>, ClientError> {
        match self.call(&ServiceRequest::SaveFigure {
            figure,
            directory: directory.to_string(),
        })? {
            ServiceResponse::Saved { files } => Ok(files),
            other => Err(unexpected(other)),
        }
    }

    pub fn settings(&self) -> Result<GraphSettings, ClientError> {
        match self.call(&ServiceRequest::SettingsShow)? {
            ServiceResponse::Settings { settings } => Ok(settings),
            other => Err(unexpected(other)),
        }
    }

    pub fn update_settings(&self, json: &str) -> Result<String, ClientError> {
        self.call_ok(&ServiceRequest::SettingsSet {
            json: json.to_string(),
        })
    }

    pub fn stop(&self) -> Result<String, ClientError> {
        self.call_ok(&ServiceRequest::ServiceStop)
    }
}
