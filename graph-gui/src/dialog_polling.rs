use crate::utils::display_path;
use crate::{spawn_file_dialog_thread, GraphViewer};
use std::path::PathBuf;
use std::sync::mpsc;

impl GraphViewer {
    /// Asks for a destination folder for the displayed figure.
    ///
    /// The dialog runs on its own thread; `poll_save_dialog` picks up the
    /// answer on a later frame.
    pub(crate) fn open_save_dialog(&mut self) {
        if self.file_dialogs.save_dialog_rx.is_some() {
            return;
        }
        let Some(figure) = self.current_figure() else {
            return;
        };
        let (tx, rx) = mpsc::channel();
        self.file_dialogs.save_dialog_rx = Some(rx);
        spawn_file_dialog_thread(move || {
            let folder = rfd::FileDialog::new().pick_folder();
            let _ = tx.send((figure, folder));
        });
    }

    pub(crate) fn poll_save_dialog(&mut self) {
        let result = match &self.file_dialogs.save_dialog_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        let Some((figure, selection)) = result else {
            return;
        };
        self.file_dialogs.save_dialog_rx = None;
        let Some(folder) = selection else {
            self.status = "Save cancelled".to_string();
            return;
        };
        match self.host.save_figure(figure, folder) {
            Ok(files) => {
                let target = files
                    .first()
                    .and_then(|file| file.parent())
                    .map(display_path)
                    .unwrap_or_default();
                self.status.clear();
                self.notifications.show_info(
                    "Figure saved",
                    &format!("{} images in '{target}'", files.len()),
                );
            }
            Err(err) => self.status = format!("Save failed: {err}"),
        }
    }

    /// Lets the options window browse for a new archive root.
    pub(crate) fn open_archive_location_dialog(&mut self, start: Option<PathBuf>) {
        if self.file_dialogs.archive_location_rx.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.file_dialogs.archive_location_rx = Some(rx);
        spawn_file_dialog_thread(move || {
            let mut dialog = rfd::FileDialog::new();
            if let Some(dir) = start.filter(|dir| dir.is_dir()) {
                dialog = dialog.set_directory(dir);
            }
            let _ = tx.send(dialog.pick_folder());
        });
    }

    pub(crate) fn poll_archive_location_dialog(&mut self) {
        let result = match &self.file_dialogs.archive_location_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        let Some(selection) = result else {
            return;
        };
        self.file_dialogs.archive_location_rx = None;
        if let (Some(folder), Some(draft)) = (selection, self.options.as_mut()) {
            draft.archive_location = folder.display().to_string();
        }
    }
}
