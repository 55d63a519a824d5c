use crate::message_handler::{HostMessage, HostView};
use crate::{HostError, HostHandle};
use graph_core::FigureStore;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

fn snapshot(store: &FigureStore, revision: u64) -> HostView {
    HostView {
        revision,
        store: store.view(),
        settings: Some(store.settings().clone()),
    }
}

fn handle_message(store: &mut FigureStore, message: HostMessage) -> Flow {
    match message {
        HostMessage::AddFigure { name, reply } => {
            let _ = reply.send(store.add_figure(&name));
        }
        HostMessage::AddLineGraph {
            figure,
            spec,
            reply,
        } => {
            let _ = reply.send(store.add_line_graph(figure, spec));
        }
        HostMessage::AddContourPlot {
            figure,
            spec,
            reply,
        } => {
            let _ = reply.send(store.add_contour_plot(figure, spec));
        }
        HostMessage::Plot {
            line_graph,
            series,
            reply,
        } => {
            let result = store.plot(line_graph, series.title, series.xs, series.ys, series.style);
            let _ = reply.send(result);
        }
        HostMessage::SetAxisBoundaries {
            line_graph,
            bounds,
            reply,
        } => {
            let _ = reply.send(store.set_axis_boundaries(line_graph, bounds));
        }
        HostMessage::ClearGraph { plot, reply } => {
            let _ = reply.send(store.clear_graph(plot));
        }
        HostMessage::NavigateTo { figure, reply } => {
            let _ = reply.send(store.navigate_to(figure));
        }
        HostMessage::NavigateBack { reply } => {
            let _ = reply.send(store.navigate_back());
        }
        HostMessage::NavigateForward { reply } => {
            let _ = reply.send(store.navigate_forward());
        }
        HostMessage::SetUiHistory { count, reply } => {
            let _ = reply.send(store.set_ui_history(count));
        }
        HostMessage::SetArchiveSize { size_mb, reply } => {
            let _ = reply.send(store.set_archive_size(size_mb));
        }
        HostMessage::UpdateSettings { patch, reply } => {
            let _ = reply.send(store.update_settings(&patch));
        }
        HostMessage::SaveFigure {
            figure,
            directory,
            reply,
        } => {
            let _ = reply.send(store.save_figure_to(figure, &directory));
        }
        HostMessage::ListFigures { reply } => {
            let _ = reply.send((store.list_figures(), store.current()));
        }
        HostMessage::QuerySettings { reply } => {
            let _ = reply.send(store.settings().clone());
        }
        HostMessage::Shutdown { reply } => {
            let archived = store.shutdown();
            log::info!("Host stopped, archived {} figures", archived.len());
            let _ = reply.send(archived);
            return Flow::Stop;
        }
    }
    Flow::Continue
}

/// Moves `store` onto a dedicated thread. Every message is applied in
/// arrival order; a fresh [`HostView`] is published after each change.
pub fn spawn_host(
    store: FigureStore,
) -> Result<(HostHandle, Receiver<HostView>, JoinHandle<()>), HostError> {
    let (host_tx, host_rx) = mpsc::channel::<HostMessage>();
    let (view_tx, view_rx) = mpsc::channel::<HostView>();

    let thread = thread::Builder::new()
        .name("graph-host".to_string())
        .spawn(move || run_host(store, host_rx, view_tx))
        .map_err(HostError::Spawn)?;
    Ok((HostHandle::new(host_tx), view_rx, thread))
}

/// Runs the host loop on the calling thread until shutdown or until every
/// sender is gone.
pub fn run_host(mut store: FigureStore, host_rx: Receiver<HostMessage>, view_tx: Sender<HostView>) {
    let mut revision = 0;
    let _ = view_tx.send(snapshot(&store, revision));
    for message in host_rx {
        let mutates = message.mutates();
        let flow = handle_message(&mut store, message);
        if mutates {
            revision += 1;
            let _ = view_tx.send(snapshot(&store, revision));
        }
        if flow == Flow::Stop {
            return;
        }
    }
    log::info!("Host channel closed, shutting down");
    store.shutdown();
}
