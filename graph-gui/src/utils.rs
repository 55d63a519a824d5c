use egui::Color32;

/// Runs a blocking dialog off the UI thread.
pub fn spawn_file_dialog_thread<F, T>(f: F) -> std::thread::JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    std::thread::spawn(f)
}

/// Program that shows a folder in the desktop's file manager.
pub fn file_browser_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Opens `path` in the system file browser without waiting for it.
pub fn open_in_file_browser(path: &std::path::Path) -> std::io::Result<()> {
    std::process::Command::new(file_browser_command())
        .arg(path)
        .stdin(std::process::Stdio::null())
        .spawn()
        .map(|_| ())
}

pub(crate) fn to_color32(color: figure::Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Short form of a path for status lines and toasts.
pub(crate) fn display_path(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
