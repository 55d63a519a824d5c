use serial_test::serial;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output};
use std::time::Duration;

struct Service {
    child: Child,
    socket: String,
    archive: PathBuf,
    _dir: tempfile::TempDir,
}

impl Drop for Service {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn exe() -> &'static str {
    env!("CARGO_BIN_EXE_graphd")
}

fn start_service(history: usize) -> Service {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("archive");
    let settings_path = dir.path().join("settings.json");
    let settings = serde_json::json!({
        "archive_location": archive,
        "num_pages_history": history,
    });
    std::fs::write(&settings_path, settings.to_string()).expect("write settings");
    let socket = dir.path().join("graphd.sock").to_string_lossy().to_string();

    let child = Command::new(exe())
        .args(["serve", "--no-gui", "--socket", &socket, "--settings"])
        .arg(&settings_path)
        .spawn()
        .expect("run graphd serve");

    for _ in 0..100 {
        if Path::new(&socket).exists() {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    assert!(Path::new(&socket).exists(), "service did not start");
    Service {
        child,
        socket,
        archive,
        _dir: dir,
    }
}

fn run(service: &Service, args: &[&str]) -> Output {
    Command::new(exe())
        .args(["--socket", &service.socket])
        .args(args)
        .output()
        .expect("run graphd client")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn figure_id(output: &Output) -> String {
    stdout(output)
        .trim()
        .rsplit(' ')
        .next()
        .expect("figure id")
        .to_string()
}

fn archive_names(root: &Path) -> Vec<String> {
    match std::fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn wait_for_exit(service: &mut Service) {
    for _ in 0..100 {
        if let Ok(Some(_)) = service.child.try_wait() {
            return;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    panic!("service did not stop in time");
}

#[test]
#[serial]
fn stop_archives_live_figures_and_exits() {
    let mut service = start_service(10);

    let added = run(&service, &["figure", "add", "Graph Collection 1"]);
    assert!(added.status.success());
    assert!(stdout(&added).contains("[graphd][INFO] Figure added with id"));

    let listed = run(&service, &["figure", "list"]);
    assert!(stdout(&listed).contains("Graph Collection 1"));

    let stopped = run(&service, &["stop"]);
    assert!(stopped.status.success());
    wait_for_exit(&mut service);

    let names = archive_names(&service.archive);
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(" - Graph Collection 1"));
    assert!(!Path::new(&service.socket).exists());
}

#[test]
#[serial]
fn history_limit_evicts_oldest_figure() {
    let service = start_service(2);
    for name in ["First", "Second", "Third"] {
        assert!(run(&service, &["figure", "add", name]).status.success());
    }

    let listed = stdout(&run(&service, &["figure", "list"]));
    assert!(!listed.contains("First"));
    assert!(listed.contains("Second"));
    assert!(listed.contains("Third"));

    let names = archive_names(&service.archive);
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(" - First"));
}

#[test]
#[serial]
fn plots_and_errors_round_trip_through_cli() {
    let service = start_service(10);
    let figure = figure_id(&run(&service, &["figure", "add", "Plots"]));
    let line = run(
        &service,
        &["line", "add", &figure, "Graph 1", "--x-label", "x", "--legend-position", "right_middle"],
    );
    assert!(line.status.success());
    let graph = figure_id(&line);

    let plotted = run(
        &service,
        &["plot", &graph, "--xs", "0,1,2", "--ys=-1,0,1", "--title", "y1"],
    );
    assert!(plotted.status.success(), "{}", String::from_utf8_lossy(&plotted.stderr));

    let mismatched = run(&service, &["plot", &graph, "--xs", "0,1", "--ys", "1"]);
    assert!(!mismatched.status.success());
    assert!(String::from_utf8_lossy(&mismatched.stderr).contains("[graphd][ERROR]: invalid argument"));

    let missing = run(&service, &["figure", "navigate", "99v1"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("[graphd][ERROR]: not found"));

    let listed = stdout(&run(&service, &["figure", "list", "--json-query"]));
    let value: serde_json::Value = serde_json::from_str(&listed).expect("json list");
    assert_eq!(value["figures"][0]["plots"][0]["title"], "Graph 1");

    let listed_id = value["figures"][0]["id"].as_str().expect("text handle");
    assert_eq!(listed_id, figure);
    let shown = run(&service, &["figure", "navigate", listed_id]);
    assert!(shown.status.success(), "{}", String::from_utf8_lossy(&shown.stderr));
}

#[test]
#[serial]
fn client_without_service_reports_transport_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let socket = dir.path().join("absent.sock");
    let output = Command::new(exe())
        .arg("--socket")
        .arg(&socket)
        .args(["figure", "list"])
        .output()
        .expect("run graphd client");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("[graphd][ERROR]: transport error"));
}
