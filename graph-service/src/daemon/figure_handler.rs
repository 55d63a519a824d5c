use super::respond;
use crate::protocol::ServiceResponse;
use figure::{AxisBounds, ContourSpec, FigureId, LineGraphSpec, LineStyle, PlotId};
use graph_host::HostHandle;

pub fn add_figure(host: &HostHandle, name: &str) -> ServiceResponse {
    respond(host.add_figure(name), |id| ServiceResponse::FigureAdded { id })
}

pub fn add_line_graph(host: &HostHandle, figure: FigureId, spec: LineGraphSpec) -> ServiceResponse {
    respond(host.add_line_graph(figure, spec), |id| {
        ServiceResponse::PlotAdded { id }
    })
}

pub fn add_contour_plot(host: &HostHandle, figure: FigureId, spec: ContourSpec) -> ServiceResponse {
    respond(host.add_contour_plot(figure, spec), |id| {
        ServiceResponse::PlotAdded { id }
    })
}

pub fn plot(
    host: &HostHandle,
    line_graph: PlotId,
    title: Option<String>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    style: Option<LineStyle>,
) -> ServiceResponse {
    let points = xs.len();
    respond(host.plot(line_graph, title, xs, ys, style), |()| {
        ServiceResponse::ok(format!("Plotted {points} points on {line_graph}"))
    })
}

pub fn set_axis_boundaries(
    host: &HostHandle,
    line_graph: PlotId,
    bounds: AxisBounds,
) -> ServiceResponse {
    respond(host.set_axis_boundaries(line_graph, bounds), |()| {
        ServiceResponse::ok("Axis boundaries updated")
    })
}

pub fn clear_graph(host: &HostHandle, graph: PlotId) -> ServiceResponse {
    respond(host.clear_graph(graph), |()| {
        ServiceResponse::ok(format!("Cleared {graph}"))
    })
}

pub fn navigate_to(host: &HostHandle, figure: FigureId) -> ServiceResponse {
    respond(host.navigate_to(figure), |()| {
        ServiceResponse::ok(format!("Showing figure {figure}"))
    })
}

pub fn navigate_back(host: &HostHandle) -> ServiceResponse {
    respond(host.navigate_back(), |id| {
        ServiceResponse::ok(format!("Showing figure {id}"))
    })
}

pub fn navigate_forward(host: &HostHandle) -> ServiceResponse {
    respond(host.navigate_forward(), |id| {
        ServiceResponse::ok(format!("Showing figure {id}"))
    })
}

pub fn list_figures(host: &HostHandle) -> ServiceResponse {
    respond(host.list_figures(), |(figures, current)| {
        ServiceResponse::FigureList { figures, current }
    })
}

pub fn save_figure(host: &HostHandle, figure: FigureId, directory: &str) -> ServiceResponse {
    respond(host.save_figure(figure, directory), |files| {
        ServiceResponse::Saved {
            files: files
                .iter()
                .map(|path| path.to_string_lossy().to_string())
                .collect(),
        }
    })
}
