use clap::{Parser, Subcommand};
use figure::{FigureId, PlotId};
use graph_service::DEFAULT_SOCKET_PATH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "graphd", version, about = "Figure host and client for the graph service")]
pub struct Cli {
    /// Socket of the running service
    #[arg(long, global = true, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the figure host, the socket service and (by default) the viewer
    Serve {
        #[arg(long)]
        no_gui: bool,
        /// Settings file; defaults to $GRAPH_SERVICE_SETTINGS or the user config dir
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    Figure {
        #[command(subcommand)]
        command: FigureCommands,
    },
    Line {
        #[command(subcommand)]
        command: LineCommands,
    },
    /// Add a series to a line graph
    Plot {
        line_graph: PlotId,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        xs: Vec<f64>,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        ys: Vec<f64>,
        #[arg(long, default_value = "")]
        title: String,
        /// Line style as JSON, e.g. '{"line_color":{"a":255,"r":255,"g":0,"b":0},"thickness":2}'
        #[arg(long)]
        style_json: Option<String>,
    },
    Contour {
        #[command(subcommand)]
        command: ContourCommands,
    },
    Axis {
        #[command(subcommand)]
        command: AxisCommands,
    },
    /// Remove every series of a line graph or the data of a contour plot
    Clear {
        id: PlotId,
    },
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    Archive {
        #[command(subcommand)]
        command: ArchiveCommands,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Stop the service; live figures are archived first
    Stop,
    /// Send sample pages to a running service
    Demo {
        #[arg(long, default_value_t = 4)]
        figures: usize,
        /// Redraw three collections in turn instead of sending new figures
        #[arg(long)]
        cycle: bool,
        #[arg(long, default_value_t = 3)]
        rounds: usize,
        #[arg(long, default_value_t = 250)]
        delay_ms: u64,
    },
}

#[derive(Subcommand)]
pub enum FigureCommands {
    Add {
        name: String,
    },
    List {
        #[arg(long, alias = "jq")]
        json_query: bool,
    },
    Navigate {
        id: FigureId,
    },
    Back,
    Forward,
    /// Export every plot of a figure into DIR/<figure name>/
    Save {
        id: FigureId,
        dir: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum LineCommands {
    Add {
        figure: FigureId,
        title: String,
        #[arg(long, default_value = "")]
        x_label: String,
        #[arg(long, default_value = "")]
        y_label: String,
        #[arg(long)]
        no_legend: bool,
        /// e.g. top_left, right_middle
        #[arg(long)]
        legend_position: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ContourCommands {
    Add {
        figure: FigureId,
        title: String,
        /// Grid as a JSON array of columns, one column per x sample
        #[arg(long)]
        grid_json: String,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        levels: Vec<f64>,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x_min: f64,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        x_max: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y_min: f64,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        y_max: f64,
        #[arg(long, default_value = "")]
        x_label: String,
        #[arg(long, default_value = "")]
        y_label: String,
    },
}

#[derive(Subcommand)]
pub enum AxisCommands {
    /// Fix any of the four bounds; omitted bounds fit the data
    Set {
        line_graph: PlotId,
        #[arg(long, allow_negative_numbers = true)]
        x_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        x_max: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        y_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        y_max: Option<f64>,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    Set { count: usize },
}

#[derive(Subcommand)]
pub enum ArchiveCommands {
    /// Archive budget in MB; 0 disables archiving
    Size { mb: u64 },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    Show,
    Set { json: String },
}
