use figure::{FigureId, FigureSummary};
use graph_core::GraphSettings;

pub fn print_info(message: &str) {
    println!("[graphd][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[graphd][ERROR]: {message}");
}

pub fn print_figure_list(figures: &[FigureSummary], current: Option<FigureId>) {
    if figures.is_empty() {
        print_info("No figures");
        return;
    }
    print_info("List of figures:");
    for figure in figures {
        let marker = if Some(figure.id) == current { "*" } else { " " };
        let plots = if figure.plots.len() == 1 { "plot" } else { "plots" };
        println!(
            "{marker} {} - {} ({} {plots})",
            figure.id,
            figure.name,
            figure.plots.len()
        );
        for plot in &figure.plots {
            println!("\t{} [{}] {}", plot.id, plot.kind, plot.title);
        }
    }
}

pub fn print_saved_files(files: &[String]) {
    if files.is_empty() {
        print_info("Figure has no plots to save");
        return;
    }
    print_info(&format!("Saved {} images:", files.len()));
    for file in files {
        println!("{file}");
    }
}

pub fn print_settings(settings: &GraphSettings) {
    print_info("Settings:");
    println!(
        "window: {}x{} at ({}, {})",
        settings.main_width, settings.main_height, settings.main_left, settings.main_top
    );
    println!("archive_location: {}", settings.archive_location.display());
    println!("archive_enabled: {}", settings.archive_enabled);
    println!("max_archive_size_mb: {}", settings.max_archive_size_mb);
    println!(
        "image_size: {}x{} ({})",
        settings.image_width,
        settings.image_height,
        settings.image_preset().label()
    );
    println!("history_enabled: {}", settings.history_enabled);
    println!("num_pages_history: {}", settings.num_pages_history);
    println!("auto_navigate: {}", settings.auto_navigate);
}
