use crate::protocol::{ErrorKind, ServiceRequest, ServiceResponse, DEFAULT_SOCKET_PATH};
use crate::ServiceError;
use graph_core::{GraphError, SettingsError};
use graph_host::{HostError, HostHandle};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;

mod figure_handler;
mod settings_handler;

enum Next {
    Serve,
    Stop,
}

pub fn run_service(host: HostHandle) -> Result<(), ServiceError> {
    run_service_at(DEFAULT_SOCKET_PATH, host)
}

/// Serves one request per connection, one connection at a time, until a
/// `service_stop` request arrives. Stopping shuts the host down.
pub fn run_service_at(socket_path: &str, host: HostHandle) -> Result<(), ServiceError> {
    if Path::new(socket_path).exists() {
        let _ = std::fs::remove_file(socket_path);
    }
    let listener = UnixListener::bind(socket_path).map_err(ServiceError::Bind)?;
    log::info!("Graph service listening on {socket_path}");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => match handle_client(stream, &host) {
                Ok(Next::Serve) => {}
                Ok(Next::Stop) => break,
                Err(err) => log::warn!("Service client error: {err}"),
            },
            Err(err) => log::warn!("Service accept error: {err}"),
        }
    }

    match host.shutdown() {
        Ok(archived) => log::info!("Archived {} figures on stop", archived.len()),
        Err(HostError::Disconnected) => {}
        Err(err) => log::warn!("Host shutdown failed: {err}"),
    }
    let _ = std::fs::remove_file(socket_path);
    log::info!("Graph service stopped");
    Ok(())
}

fn handle_client(stream: UnixStream, host: &HostHandle) -> Result<Next, ServiceError> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let mut stream = reader.into_inner();

    let request: ServiceRequest = match serde_json::from_str(line.trim()) {
        Ok(request) => request,
        Err(err) => {
            let response =
                ServiceResponse::error(ErrorKind::InvalidArgument, format!("malformed request: {err}"));
            send_response(&mut stream, &response)?;
            return Ok(Next::Serve);
        }
    };

    let mut next = Next::Serve;
    let response = match request {
        ServiceRequest::AddFigure { name } => figure_handler::add_figure(host, &name),
        ServiceRequest::AddLineGraph { figure, spec } => {
            figure_handler::add_line_graph(host, figure, spec)
        }
        ServiceRequest::Plot {
            line_graph,
            title,
            xs,
            ys,
            style,
        } => figure_handler::plot(host, line_graph, title, xs, ys, style),
        ServiceRequest::AddContourPlot { figure, spec } => {
            figure_handler::add_contour_plot(host, figure, spec)
        }
        ServiceRequest::SetAxisBoundaries { line_graph, bounds } => {
            figure_handler::set_axis_boundaries(host, line_graph, bounds)
        }
        ServiceRequest::ClearGraph { graph } => figure_handler::clear_graph(host, graph),
        ServiceRequest::NavigateTo { figure } => figure_handler::navigate_to(host, figure),
        ServiceRequest::NavigateBack => figure_handler::navigate_back(host),
        ServiceRequest::NavigateForward => figure_handler::navigate_forward(host),
        ServiceRequest::ListFigures => figure_handler::list_figures(host),
        ServiceRequest::SaveFigure { figure, directory } => {
            figure_handler::save_figure(host, figure, &directory)
        }
        ServiceRequest::SetUiHistory { count } => settings_handler::set_ui_history(host, count),
        ServiceRequest::SetArchiveSize { size_mb } => {
            settings_handler::set_archive_size(host, size_mb)
        }
        ServiceRequest::SettingsShow => settings_handler::settings_show(host),
        ServiceRequest::SettingsSet { json } => settings_handler::settings_set(host, &json),
        ServiceRequest::ServiceStop => {
            next = Next::Stop;
            ServiceResponse::ok("Graph service stopping")
        }
    };

    send_response(&mut stream, &response)?;
    Ok(next)
}

fn send_response(stream: &mut impl Write, response: &ServiceResponse) -> Result<(), ServiceError> {
    let payload = serde_json::to_string(response)?;
    stream.write_all(format!("{payload}\n").as_bytes())?;
    Ok(())
}

/// Maps a host failure onto the wire error taxonomy.
pub(crate) fn error_response(err: HostError) -> ServiceResponse {
    let kind = match &err {
        HostError::Graph(GraphError::NotFound { .. }) => ErrorKind::NotFound,
        HostError::Graph(GraphError::InvalidArgument(_))
        | HostError::Graph(GraphError::Settings(SettingsError::Invalid(_)))
        | HostError::Graph(GraphError::Settings(SettingsError::Json(_))) => {
            ErrorKind::InvalidArgument
        }
        _ => ErrorKind::Internal,
    };
    ServiceResponse::error(kind, err.to_string())
}

pub(crate) fn respond<T>(
    result: Result<T, HostError>,
    build: impl FnOnce(T) -> ServiceResponse,
) -> ServiceResponse {
    match result {
        Ok(value) => build(value),
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_not_found_kind() {
        let response = error_response(HostError::Graph(GraphError::not_found("figure", "3v1")));
        assert!(matches!(
            response,
            ServiceResponse::Error {
                kind: ErrorKind::NotFound,
                ..
            }
        ));
        let response = error_response(HostError::Disconnected);
        assert!(matches!(
            response,
            ServiceResponse::Error {
                kind: ErrorKind::Internal,
                ..
            }
        ));
    }
}
