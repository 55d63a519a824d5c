use eframe::egui;
use figure::FigureId;
use graph_host::{HostHandle, HostView};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

mod dialog_polling;
mod managers;
mod options;
mod plot_view;
mod utils;

use managers::{FileDialogManager, NotificationHandler};
use options::OptionsDraft;
use plot_view::PlotCanvas;

pub use utils::{open_in_file_browser, spawn_file_dialog_thread};

/// Configuration of the viewer window.
///
/// # Fields
///
/// * `title` - Window title shown by the platform window manager
/// * `width` - Initial inner width in logical points
/// * `height` - Initial inner height in logical points
/// * `position` - Optional top-left corner of the window in screen points
#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub position: Option<(f32, f32)>,
}

impl Default for GuiConfig {
    /// Creates the default window configuration.
    ///
    /// # Returns
    ///
    /// A `GuiConfig` titled "Graph Service", 1280x720, placed by the window
    /// manager.
    fn default() -> Self {
        Self {
            title: "Graph Service".to_string(),
            width: 1280.0,
            height: 720.0,
            position: None,
        }
    }
}

impl GuiConfig {
    /// Builds a window configuration from persisted main window geometry.
    ///
    /// # Parameters
    ///
    /// * `settings` - Settings carrying `main_left`, `main_top`, `main_width`
    ///   and `main_height`
    ///
    /// # Returns
    ///
    /// A `GuiConfig` with the default title and the stored geometry.
    pub fn from_settings(settings: &graph_core::GraphSettings) -> Self {
        Self {
            width: settings.main_width,
            height: settings.main_height,
            position: Some((settings.main_left, settings.main_top)),
            ..Self::default()
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("gui error: {0}")]
    Gui(String),
}

/// Runs the viewer window until the user closes it or the host stops.
///
/// The viewer never owns figure state. It draws the latest `HostView`
/// snapshot published by the host thread and turns button presses into
/// `HostHandle` calls.
///
/// # Parameters
///
/// * `config` - Window title and geometry
/// * `host` - Handle used to navigate, save and change settings
/// * `views` - Snapshots published by the host after every change
///
/// # Returns
///
/// * `Ok(())` - The window was closed
/// * `Err(GuiError::Gui)` - eframe failed to create or run the window
///
/// # Side Effects
///
/// - Blocks the calling thread for the lifetime of the window
/// - Persists the final window geometry through `update_settings` on close
/// - Does not stop the host; the caller decides what closing means
pub fn run_gui(
    config: GuiConfig,
    host: HostHandle,
    views: Receiver<HostView>,
) -> Result<(), GuiError> {
    let mut viewport =
        egui::ViewportBuilder::default().with_inner_size([config.width, config.height]);
    if let Some((left, top)) = config.position {
        viewport = viewport.with_position([left, top]);
    }
    let mut options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    // NOTE: Vsync generates hangs and lag on occluded windows.
    options.vsync = false;

    eframe::run_native(
        &config.title,
        options,
        Box::new(move |_cc| Box::new(GraphViewer::new(host, views))),
    )
    .map_err(|err| GuiError::Gui(err.to_string()))
}

struct GraphViewer {
    host: HostHandle,
    views: Receiver<HostView>,
    view: HostView,
    host_gone: bool,
    geometry_saved: bool,
    file_dialogs: FileDialogManager,
    notifications: NotificationHandler,
    canvas: PlotCanvas,
    options: Option<OptionsDraft>,
    status: String,
}

impl GraphViewer {
    fn new(host: HostHandle, views: Receiver<HostView>) -> Self {
        Self {
            host,
            views,
            view: HostView::default(),
            host_gone: false,
            geometry_saved: false,
            file_dialogs: FileDialogManager::new(),
            notifications: NotificationHandler::new(),
            canvas: PlotCanvas::new(),
            options: None,
            status: String::new(),
        }
    }

    /// Drains pending host snapshots, keeping only the newest.
    ///
    /// # Side Effects
    ///
    /// - Marks the host as gone when its channel has disconnected
    fn poll_host_views(&mut self) {
        loop {
            match self.views.try_recv() {
                Ok(view) => self.view = view,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.host_gone = true;
                    break;
                }
            }
        }
    }

    fn current_figure(&self) -> Option<FigureId> {
        self.view.store.current
    }

    /// Moves the display one figure back or forward.
    ///
    /// # Parameters
    ///
    /// * `forward` - `true` for the next figure, `false` for the previous one
    ///
    /// # Side Effects
    ///
    /// - Sends a navigation message to the host
    /// - Records failures in the status line
    fn navigate(&mut self, forward: bool) {
        let result = if forward {
            self.host.navigate_forward()
        } else {
            self.host.navigate_back()
        };
        if let Err(err) = result {
            self.status = format!("Navigation failed: {err}");
        }
    }

    /// Stores the window geometry so the next session opens in place.
    ///
    /// # Parameters
    ///
    /// * `ctx` - egui context used to read the current viewport rectangles
    fn persist_geometry(&mut self, ctx: &egui::Context) {
        if self.geometry_saved || self.host_gone {
            return;
        }
        self.geometry_saved = true;
        let (outer, inner) = ctx.input(|i| (i.viewport().outer_rect, i.viewport().inner_rect));
        let (Some(outer), Some(inner)) = (outer, inner) else {
            return;
        };
        let patch = serde_json::json!({
            "main_left": outer.min.x,
            "main_top": outer.min.y,
            "main_width": inner.width(),
            "main_height": inner.height(),
        });
        if let Err(err) = self.host.update_settings(&patch.to_string()) {
            log::warn!("Failed to store window geometry: {err}");
        }
    }

    fn render_toolbar(&mut self, ctx: &egui::Context) {
        let index = self.view.store.current_index();
        let count = self.view.store.figures.len();
        let has_current = self.current_figure().is_some();
        let can_back = matches!(index, Some(i) if i > 0);
        let can_forward = matches!(index, Some(i) if i + 1 < count);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(can_back, egui::Button::new("< Back"))
                    .clicked()
                {
                    self.navigate(false);
                }
                if ui
                    .add_enabled(can_forward, egui::Button::new("Forward >"))
                    .clicked()
                {
                    self.navigate(true);
                }
                ui.separator();
                if ui
                    .add_enabled(has_current, egui::Button::new("Save"))
                    .clicked()
                {
                    self.open_save_dialog();
                }
                if ui.button("Open archive").clicked() {
                    self.open_archive();
                }
                if ui.button("Options").clicked() {
                    self.open_options();
                }
                ui.separator();
                let page = match index {
                    Some(i) => format!("Page {} of {count}", i + 1),
                    None => "No figures".to_string(),
                };
                ui.label(page);
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(egui::RichText::new(&self.status).color(egui::Color32::LIGHT_RED));
                }
            });
        });
    }

    fn render_figure(&mut self, ctx: &egui::Context) {
        let revision = self.view.revision;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(figure) = self.view.store.current_figure() else {
                ui.centered_and_justified(|ui| {
                    ui.label("Waiting for figures...");
                });
                return;
            };
            self.canvas.show_figure(ui, figure, revision);
        });
    }

    /// Shows the archive folder in the system file browser, creating it
    /// first so a fresh install has something to open.
    fn open_archive(&mut self) {
        let location = match self.host.settings() {
            Ok(settings) => settings.archive_location,
            Err(err) => {
                self.status = format!("Failed to read settings: {err}");
                return;
            }
        };
        let opened = std::fs::create_dir_all(&location)
            .and_then(|()| open_in_file_browser(&location));
        match opened {
            Ok(()) => self.status.clear(),
            Err(err) => {
                log::warn!("Failed to open archive '{}': {err}", location.display());
                self.status = format!("Failed to open {}: {err}", location.display());
            }
        }
    }

    fn open_options(&mut self) {
        match self.host.settings() {
            Ok(settings) => self.options = Some(OptionsDraft::from_settings(&settings)),
            Err(err) => self.status = format!("Failed to read settings: {err}"),
        }
    }
}

impl eframe::App for GraphViewer {
    /// Draws one frame of the viewer.
    ///
    /// # Parameters
    ///
    /// * `ctx` - egui context for input and painting
    /// * `_frame` - eframe frame (unused)
    ///
    /// # Update Cycle
    ///
    /// 1. Pulls the newest host snapshot and polls finished file dialogs
    /// 2. Closes the window when the host has stopped
    /// 3. Persists geometry when the user asked to close
    /// 4. Renders the toolbar, the current figure, the options window and
    ///    notifications
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_host_views();
        self.poll_save_dialog();
        self.poll_archive_location_dialog();

        if self.host_gone {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        if ctx.input(|i| i.viewport().close_requested()) {
            self.persist_geometry(ctx);
        }
        ctx.request_repaint_after(Duration::from_millis(100));

        self.render_toolbar(ctx);
        self.render_figure(ctx);
        self.render_options_window(ctx);
        self.notifications.render(ctx);
    }
}
