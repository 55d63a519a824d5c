use crate::GraphViewer;
use eframe::egui;
use graph_core::settings::MIN_IMAGE_DIMENSION;
use graph_core::{GraphSettings, ImagePreset};
use std::path::PathBuf;

/// Editable copy of the settings shown in the options window. Nothing
/// reaches the host until the user presses Apply.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OptionsDraft {
    pub(crate) archive_location: String,
    pub(crate) archive_enabled: bool,
    pub(crate) max_archive_size_mb: u64,
    pub(crate) preset: ImagePreset,
    pub(crate) image_width: u32,
    pub(crate) image_height: u32,
    pub(crate) history_enabled: bool,
    pub(crate) num_pages_history: usize,
    pub(crate) auto_navigate: bool,
}

impl OptionsDraft {
    pub(crate) fn from_settings(settings: &GraphSettings) -> Self {
        Self {
            archive_location: settings.archive_location.display().to_string(),
            archive_enabled: settings.archive_enabled,
            max_archive_size_mb: settings.max_archive_size_mb,
            preset: settings.image_preset(),
            image_width: settings.image_width,
            image_height: settings.image_height,
            history_enabled: settings.history_enabled,
            num_pages_history: settings.num_pages_history,
            auto_navigate: settings.auto_navigate,
        }
    }

    /// Image size the draft asks for. A fixed preset wins over the custom
    /// fields.
    pub(crate) fn image_size(&self) -> (u32, u32) {
        self.preset
            .dimensions()
            .unwrap_or((self.image_width, self.image_height))
    }

    /// JSON patch accepted by `HostHandle::update_settings`.
    pub(crate) fn to_patch(&self) -> serde_json::Value {
        let (width, height) = self.image_size();
        serde_json::json!({
            "archive_location": PathBuf::from(self.archive_location.trim()),
            "archive_enabled": self.archive_enabled,
            "max_archive_size_mb": self.max_archive_size_mb,
            "image_width": width,
            "image_height": height,
            "history_enabled": self.history_enabled,
            "num_pages_history": self.num_pages_history,
            "auto_navigate": self.auto_navigate,
        })
    }
}

impl GraphViewer {
    /// Renders the options window while a draft is open.
    ///
    /// # Parameters
    /// - `ctx`: egui context for the floating window
    ///
    /// # Side Effects
    /// - Apply sends the draft to the host as a settings patch; history
    ///   changes take effect immediately, archiving evicted figures
    /// - Browse opens a folder dialog for the archive location
    /// - Closing or cancelling drops the draft
    pub(crate) fn render_options_window(&mut self, ctx: &egui::Context) {
        let Some(draft) = self.options.as_mut() else {
            return;
        };
        let mut open = true;
        let mut apply = false;
        let mut cancel = false;
        let mut browse = false;

        egui::Window::new("Options")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Archive");
                ui.checkbox(&mut draft.archive_enabled, "Archive figures leaving history");
                ui.horizontal(|ui| {
                    ui.label("Location");
                    ui.text_edit_singleline(&mut draft.archive_location);
                    if ui.button("Browse").clicked() {
                        browse = true;
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Maximum size (MB, 0 disables)");
                    ui.add(egui::DragValue::new(&mut draft.max_archive_size_mb).clamp_range(0..=1_000_000));
                });
                ui.horizontal(|ui| {
                    ui.label("Image size");
                    egui::ComboBox::from_id_source("image_preset")
                        .selected_text(draft.preset.label())
                        .show_ui(ui, |ui| {
                            for preset in ImagePreset::FIXED {
                                ui.selectable_value(&mut draft.preset, preset, preset.label());
                            }
                            ui.selectable_value(&mut draft.preset, ImagePreset::Custom, "Custom");
                        });
                });
                if draft.preset == ImagePreset::Custom {
                    ui.horizontal(|ui| {
                        ui.label("Width");
                        ui.add(
                            egui::DragValue::new(&mut draft.image_width)
                                .clamp_range(MIN_IMAGE_DIMENSION..=16_384),
                        );
                        ui.label("Height");
                        ui.add(
                            egui::DragValue::new(&mut draft.image_height)
                                .clamp_range(MIN_IMAGE_DIMENSION..=16_384),
                        );
                    });
                }

                ui.separator();
                ui.heading("History");
                ui.checkbox(&mut draft.history_enabled, "Keep previous figures");
                ui.add_enabled_ui(draft.history_enabled, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Pages kept");
                        ui.add(egui::DragValue::new(&mut draft.num_pages_history).clamp_range(1..=1_000));
                    });
                });
                ui.checkbox(&mut draft.auto_navigate, "Show new figures as they arrive");

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        apply = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if browse {
            let start = Some(PathBuf::from(draft.archive_location.trim()));
            self.open_archive_location_dialog(start);
        }
        if apply {
            self.apply_options();
        } else if cancel || !open {
            self.options = None;
        }
    }

    fn apply_options(&mut self) {
        let Some(draft) = self.options.as_ref() else {
            return;
        };
        match self.host.update_settings(&draft.to_patch().to_string()) {
            Ok(report) => {
                self.options = None;
                self.status.clear();
                let message = if report.evicted.is_empty() {
                    "Settings applied".to_string()
                } else {
                    format!(
                        "{} figures left history, {} archived",
                        report.evicted.len(),
                        report.archived.len()
                    )
                };
                self.notifications.show_info("Options", &message);
            }
            Err(err) => self.status = format!("Settings rejected: {err}"),
        }
    }
}
