use crate::commands::*;
use crate::demo;
use crate::output::*;
use figure::{AxisBounds, ContourSpec, LegendPosition, LineGraphSpec, LineStyle};
use graph_core::settings::default_settings_path;
use graph_core::{FigureStore, PlottersRenderer, SettingsStore};
use graph_gui::{run_gui, GuiConfig};
use graph_host::spawn_host;
use graph_service::{run_service_at, GraphClient};
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

type CliResult = Result<(), Box<dyn Error>>;

pub fn handle_command(cli: Cli) -> CliResult {
    let client = GraphClient::new(cli.socket.clone());
    match cli.command {
        Commands::Serve { no_gui, settings } => serve(&cli.socket, no_gui, settings)?,
        Commands::Figure { command } => handle_figure_command(&client, command)?,
        Commands::Line { command } => handle_line_command(&client, command)?,
        Commands::Plot {
            line_graph,
            xs,
            ys,
            title,
            style_json,
        } => {
            let style = match style_json {
                Some(json) => Some(serde_json::from_str::<LineStyle>(&json)?),
                None => None,
            };
            client.plot_with_style(line_graph, &title, &xs, &ys, style)?;
            print_info(&format!("Added {} points to {line_graph}", xs.len()));
        }
        Commands::Contour { command } => handle_contour_command(&client, command)?,
        Commands::Axis {
            command:
                AxisCommands::Set {
                    line_graph,
                    x_min,
                    x_max,
                    y_min,
                    y_max,
                },
        } => {
            let bounds = AxisBounds {
                x_min,
                x_max,
                y_min,
                y_max,
            };
            client.set_axis_boundaries(line_graph, bounds)?;
            print_info(&format!("Axis boundaries set on {line_graph}"));
        }
        Commands::Clear { id } => {
            client.clear_graph(id)?;
            print_info(&format!("Cleared {id}"));
        }
        Commands::History {
            command: HistoryCommands::Set { count },
        } => print_info(&client.set_ui_history(count)?),
        Commands::Archive {
            command: ArchiveCommands::Size { mb },
        } => print_info(&client.set_archive_size(mb)?),
        Commands::Settings { command } => match command {
            SettingsCommands::Show => print_settings(&client.settings()?),
            SettingsCommands::Set { json } => print_info(&client.update_settings(&json)?),
        },
        Commands::Stop => print_info(&client.stop()?),
        Commands::Demo {
            figures,
            cycle,
            rounds,
            delay_ms,
        } => {
            if cycle {
                demo::run_cycle(&client, rounds, Duration::from_millis(delay_ms))?;
                print_info(&format!("Cycled collections {rounds} times"));
            } else {
                let created = demo::run_showcase(&client, figures)?;
                print_info(&format!("Sent {} demo figures", created.len()));
            }
        }
    }
    Ok(())
}

/// Host on its own thread, the socket service on another, and the viewer on
/// this one unless `no_gui`. Closing the viewer stops the service.
fn serve(socket: &str, no_gui: bool, settings: Option<PathBuf>) -> CliResult {
    let settings_path = settings.unwrap_or_else(default_settings_path);
    let settings = SettingsStore::open(&settings_path);
    log::info!("Using settings '{}'", settings_path.display());
    let gui_config = GuiConfig::from_settings(settings.get());

    let store = FigureStore::new(settings, Box::new(PlottersRenderer));
    let (host, views, host_thread) = spawn_host(store)?;

    if no_gui {
        drop(views);
        run_service_at(socket, host)?;
    } else {
        let service_host = host.clone();
        let service_socket = socket.to_string();
        let service = thread::Builder::new()
            .name("graph-service".to_string())
            .spawn(move || run_service_at(&service_socket, service_host))?;

        let gui_result = run_gui(gui_config, host, views);
        if !service.is_finished() {
            if let Err(err) = GraphClient::new(socket).stop() {
                log::warn!("Failed to stop service after the viewer closed: {err}");
            }
        }
        match service.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => print_error(&err.to_string()),
            Err(_) => print_error("service thread panicked"),
        }
        gui_result?;
    }

    if host_thread.join().is_err() {
        print_error("host thread panicked");
    }
    print_info("Graph service stopped");
    Ok(())
}

fn handle_figure_command(client: &GraphClient, command: FigureCommands) -> CliResult {
    match command {
        FigureCommands::Add { name } => {
            let id = client.add_figure(&name)?;
            print_info(&format!("Figure added with id {id}"));
        }
        FigureCommands::List { json_query } => {
            let (figures, current) = client.list_figures()?;
            if json_query {
                let value = serde_json::json!({ "figures": figures, "current": current });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_figure_list(&figures, current);
            }
        }
        FigureCommands::Navigate { id } => {
            client.navigate_to(id)?;
            print_info(&format!("Showing {id}"));
        }
        FigureCommands::Back => print_info(&client.navigate_back()?),
        FigureCommands::Forward => print_info(&client.navigate_forward()?),
        FigureCommands::Save { id, dir } => {
            let dir = absolute(dir)?;
            let files = client.save_figure(id, &dir.to_string_lossy())?;
            print_saved_files(&files);
        }
    }
    Ok(())
}

fn handle_line_command(client: &GraphClient, command: LineCommands) -> CliResult {
    let LineCommands::Add {
        figure,
        title,
        x_label,
        y_label,
        no_legend,
        legend_position,
    } = command;
    let mut spec = LineGraphSpec::new(title, x_label, y_label);
    spec.show_legend = !no_legend;
    if let Some(name) = legend_position {
        spec.legend_position = LegendPosition::from_name(&name)
            .ok_or_else(|| format!("unknown legend position '{name}'"))?;
    }
    let id = client.add_line_graph(figure, spec)?;
    print_info(&format!("Line graph added with id {id}"));
    Ok(())
}

fn handle_contour_command(client: &GraphClient, command: ContourCommands) -> CliResult {
    let ContourCommands::Add {
        figure,
        title,
        grid_json,
        levels,
        x_min,
        x_max,
        y_min,
        y_max,
        x_label,
        y_label,
    } = command;
    let grid: Vec<Vec<f64>> = serde_json::from_str(&grid_json)?;
    let spec = ContourSpec {
        title,
        x_label,
        y_label,
        x_min,
        x_max,
        y_min,
        y_max,
        levels,
        grid,
    };
    let id = client.add_contour_plot(figure, spec)?;
    print_info(&format!("Contour plot added with id {id}"));
    Ok(())
}

/// The service may run in another directory, so relative paths are resolved
/// here.
fn absolute(path: PathBuf) -> Result<PathBuf, std::io::Error> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
