mod support;

use figure::{AxisBounds, LineGraphSpec};
use graph_core::{FigureStore, GraphError, GraphSettings, SettingsStore};
use graph_core::settings::save_settings_file;
use std::time::Duration;
use support::{archive_dirs, contour, in_memory, FailingRenderer, FixedSizeRenderer};

fn store(root: &std::path::Path, pages: usize, archive_mb: u64) -> FigureStore {
    FigureStore::new(
        in_memory(root, pages, archive_mb),
        Box::new(FixedSizeRenderer { bytes: 64 }),
    )
}

#[test]
fn live_figures_never_exceed_history_depth() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store(dir.path(), 3, 0);
    let mut ids = Vec::new();
    for n in 0..10 {
        ids.push(store.add_figure(&format!("Graph Collection {n}")));
        assert!(store.live_figures().len() <= 3);
    }
    assert_eq!(store.live_figures(), &ids[7..]);
    assert!(matches!(
        store.figure(ids[0]),
        Err(GraphError::NotFound { kind: "figure", .. })
    ));
}

#[test]
fn disabled_history_keeps_only_newest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut settings = support::settings(dir.path(), 10, 0);
    settings.history_enabled = false;
    let mut store = FigureStore::new(
        SettingsStore::in_memory(settings),
        Box::new(FixedSizeRenderer { bytes: 1 }),
    );
    store.add_figure("a");
    let newest = store.add_figure("b");
    assert_eq!(store.live_figures(), &[newest]);
}

#[test]
fn evicted_figure_is_archived_at_predictable_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("SavedGraphs");
    let mut store = store(&root, 1, 500);

    let first = store.add_figure("Graph Collection: 1");
    store
        .add_line_graph(first, LineGraphSpec::new("Graph 1", "x", "y"))
        .expect("line graph");
    store
        .add_contour_plot(first, contour("Graph 2"))
        .expect("contour");
    store.add_figure("Graph Collection 2");

    let dirs = archive_dirs(&root);
    assert_eq!(dirs.len(), 1);
    assert!(dirs[0].ends_with(" - Graph Collection_ 1"), "{}", dirs[0]);
    let entry = root.join(&dirs[0]);
    assert!(entry.join("Graph 1.png").is_file());
    assert!(entry.join("Graph 2.png").is_file());
}

#[test]
fn archive_is_pruned_oldest_first_to_budget() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("archive");
    let mut store = FigureStore::new(
        in_memory(&root, 1, 1),
        Box::new(FixedSizeRenderer { bytes: 400 * 1024 }),
    );
    for n in 0..6 {
        let id = store.add_figure(&format!("F{n}"));
        store
            .add_line_graph(id, LineGraphSpec::new("plot", "x", "y"))
            .expect("line graph");
        std::thread::sleep(Duration::from_millis(20));
    }

    let dirs = archive_dirs(&root);
    assert_eq!(dirs.len(), 2, "{dirs:?}");
    assert!(dirs[0].ends_with(" - F3"));
    assert!(dirs[1].ends_with(" - F4"));
    assert!(graph_core::archive::dir_size(&root).expect("size") <= 1024 * 1024);
}

#[test]
fn last_archive_entry_survives_even_over_budget() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("archive");
    let mut store = FigureStore::new(
        in_memory(&root, 1, 1),
        Box::new(FixedSizeRenderer {
            bytes: 2 * 1024 * 1024,
        }),
    );
    for n in 0..3 {
        let id = store.add_figure(&format!("F{n}"));
        store
            .add_line_graph(id, LineGraphSpec::new("plot", "x", "y"))
            .expect("line graph");
        std::thread::sleep(Duration::from_millis(20));
    }
    let dirs = archive_dirs(&root);
    assert_eq!(dirs.len(), 1);
    assert!(dirs[0].ends_with(" - F1"));
}

#[test]
fn zero_archive_size_stops_writes_until_reenabled() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("archive");
    let mut store = store(&root, 1, 500);

    store.set_archive_size(0).expect("disable");
    assert!(!store.settings().archive_enabled);
    assert_eq!(store.settings().max_archive_size_mb, 500);
    for n in 0..3 {
        store.add_figure(&format!("off {n}"));
    }
    assert!(archive_dirs(&root).is_empty());

    store.set_archive_size(5).expect("enable");
    store.add_figure("on");
    assert_eq!(archive_dirs(&root).len(), 1);
}

#[test]
fn failed_archive_write_still_evicts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = FigureStore::new(in_memory(dir.path(), 10, 500), Box::new(FailingRenderer));
    for n in 0..3 {
        let id = store.add_figure(&format!("F{n}"));
        store
            .add_line_graph(id, LineGraphSpec::new("plot", "x", "y"))
            .expect("line graph");
    }
    let report = store.set_ui_history(1).expect("history");
    assert_eq!(report.evicted.len(), 2);
    assert!(report.archived.is_empty());
    assert_eq!(store.live_figures().len(), 1);
}

#[test]
fn stale_and_unknown_ids_leave_state_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store(dir.path(), 1, 0);
    let old = store.add_figure("old");
    let old_plot = store
        .add_line_graph(old, LineGraphSpec::new("g", "x", "y"))
        .expect("line graph");
    let new = store.add_figure("new");
    let graph = store
        .add_line_graph(new, LineGraphSpec::new("g", "x", "y"))
        .expect("line graph");
    let contour_plot = store.add_contour_plot(new, contour("c")).expect("contour");
    let before = store.view();

    assert!(matches!(
        store.plot(old_plot, None, vec![1.0], vec![2.0], None),
        Err(GraphError::NotFound { .. })
    ));
    assert!(matches!(
        store.add_line_graph(old, LineGraphSpec::new("g", "x", "y")),
        Err(GraphError::NotFound { .. })
    ));
    assert!(matches!(store.clear_graph(old_plot), Err(GraphError::NotFound { .. })));
    assert!(matches!(store.navigate_to(old), Err(GraphError::NotFound { .. })));
    assert!(matches!(
        store.plot(graph, None, vec![1.0, 2.0], vec![2.0], None),
        Err(GraphError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.plot(contour_plot, None, vec![1.0], vec![2.0], None),
        Err(GraphError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.set_axis_boundaries(
            graph,
            AxisBounds {
                x_min: Some(3.0),
                x_max: Some(1.0),
                ..AxisBounds::default()
            }
        ),
        Err(GraphError::InvalidArgument(_))
    ));
    let mut ragged = contour("r");
    ragged.grid[1].pop();
    assert!(matches!(
        store.add_contour_plot(new, ragged),
        Err(GraphError::InvalidArgument(_))
    ));
    assert_eq!(store.view(), before);
}

#[test]
fn plot_appends_series_and_clear_removes_them() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store(dir.path(), 5, 0);
    let fig = store.add_figure("fig");
    let graph = store
        .add_line_graph(fig, LineGraphSpec::new("g", "x", "y"))
        .expect("line graph");
    store
        .plot(graph, Some("y1".to_string()), vec![0.0, 1.0], vec![1.0, 2.0], None)
        .expect("plot");
    store
        .plot(
            graph,
            Some("y2".to_string()),
            vec![0.0],
            vec![3.0],
            Some(figure::styles::red_line()),
        )
        .expect("plot with style");
    let figure::Plot::Line(line) = store.plot_data(graph).expect("plot data") else {
        panic!("expected line graph");
    };
    assert_eq!(line.series.len(), 2);
    assert_eq!(line.series[1].style, Some(figure::styles::red_line()));

    store.clear_graph(graph).expect("clear");
    let figure::Plot::Line(line) = store.plot_data(graph).expect("plot data") else {
        panic!("expected line graph");
    };
    assert!(line.series.is_empty());
}

#[test]
fn navigation_moves_between_live_figures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store(dir.path(), 3, 0);
    let a = store.add_figure("a");
    let b = store.add_figure("b");
    let c = store.add_figure("c");
    assert_eq!(store.current(), Some(c));

    assert!(matches!(store.navigate_forward(), Err(GraphError::InvalidArgument(_))));
    assert_eq!(store.navigate_back().expect("back"), b);
    assert_eq!(store.navigate_back().expect("back"), a);
    assert_eq!(store.navigate_back().expect("back"), a);
    assert_eq!(store.navigate_forward().expect("forward"), b);

    store.navigate_to(a).expect("navigate");
    assert_eq!(store.current(), Some(a));
    let d = store.add_figure("d");
    assert_eq!(store.current(), Some(d));
    assert_eq!(store.live_figures(), &[b, c, d]);
}

#[test]
fn evicting_displayed_figure_shows_oldest_remaining() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut settings = support::settings(dir.path(), 2, 0);
    settings.auto_navigate = false;
    let mut store = FigureStore::new(
        SettingsStore::in_memory(settings),
        Box::new(FixedSizeRenderer { bytes: 1 }),
    );
    let a = store.add_figure("a");
    let b = store.add_figure("b");
    assert_eq!(store.current(), Some(a));
    let c = store.add_figure("c");
    assert_eq!(store.live_figures(), &[b, c]);
    assert_eq!(store.current(), Some(b));
}

#[test]
fn set_ui_history_validates_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    let settings = SettingsStore::open(&path);
    let mut store = FigureStore::new(settings, Box::new(FixedSizeRenderer { bytes: 1 }));
    store.set_archive_size(0).expect("disable archive");
    for n in 0..4 {
        store.add_figure(&format!("F{n}"));
    }

    assert!(matches!(store.set_ui_history(0), Err(GraphError::InvalidArgument(_))));
    let report = store.set_ui_history(2).expect("history");
    assert_eq!(report.evicted.len(), 2);
    assert_eq!(store.live_figures().len(), 2);

    let reloaded = SettingsStore::open(&path);
    assert_eq!(reloaded.get().num_pages_history, 2);
    assert!(!reloaded.get().archive_enabled);
    assert_eq!(reloaded.get().max_archive_size_mb, GraphSettings::default().max_archive_size_mb);
}

#[test]
fn update_settings_rejects_unknown_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store(dir.path(), 4, 0);
    store.add_figure("a");
    store.add_figure("b");
    assert!(matches!(
        store.update_settings(r#"{"not_a_setting": 1}"#),
        Err(GraphError::Settings(_))
    ));
    assert_eq!(store.settings().num_pages_history, 4);

    let report = store
        .update_settings(r#"{"num_pages_history": 1}"#)
        .expect("update");
    assert_eq!(report.evicted.len(), 1);
}

#[test]
fn save_figure_to_writes_one_image_per_plot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store(dir.path(), 4, 0);
    let fig = store.add_figure("Collection/1");
    for title in ["Graph", "Graph"] {
        store
            .add_line_graph(fig, LineGraphSpec::new(title, "x", "y"))
            .expect("line graph");
    }
    let out = dir.path().join("exports");
    let files = store.save_figure_to(fig, &out).expect("save");
    assert_eq!(
        files,
        vec![
            out.join("Collection_1").join("Graph.png"),
            out.join("Collection_1").join("Graph (2).png"),
        ]
    );
    assert!(files.iter().all(|file| file.is_file()));
}

#[test]
fn shutdown_archives_every_live_figure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("archive");
    let mut store = store(&root, 5, 500);
    for name in ["a", "b"] {
        let id = store.add_figure(name);
        store
            .add_line_graph(id, LineGraphSpec::new("plot", "x", "y"))
            .expect("line graph");
    }
    let archived = store.shutdown();
    assert_eq!(archived.len(), 2);
    assert!(store.live_figures().is_empty());
    assert_eq!(store.current(), None);
    assert_eq!(archive_dirs(&root).len(), 2);
}

#[test]
fn list_figures_reports_plots_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store(dir.path(), 5, 0);
    let fig = store.add_figure("fig");
    store
        .add_line_graph(fig, LineGraphSpec::new("line", "x", "y"))
        .expect("line graph");
    store.add_contour_plot(fig, contour("heat")).expect("contour");
    let figures = store.list_figures();
    assert_eq!(figures.len(), 1);
    let kinds: Vec<_> = figures[0].plots.iter().map(|p| p.kind.as_str()).collect();
    assert_eq!(kinds, vec!["line", "contour"]);
    let view = store.view();
    assert_eq!(view.current_figure().map(|f| f.name.as_str()), Some("fig"));
}

#[test]
fn reenabling_archive_keeps_previous_budget() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("archive");
    let mut store = store(&root, 1, 7);
    store.set_archive_size(0).expect("disable");
    store
        .update_settings(r#"{"archive_enabled": true}"#)
        .expect("enable from options");
    assert_eq!(store.settings().max_archive_size_mb, 7);
    store.add_figure("first");
    store.add_figure("second");
    assert_eq!(archive_dirs(&root).len(), 1);
}

#[test]
fn failed_settings_write_leaves_settings_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config");
    let path = config.join("settings.json");
    save_settings_file(&path, &support::settings(&dir.path().join("archive"), 10, 0))
        .expect("seed settings");
    let settings = SettingsStore::open(&path);
    // Replace the settings directory with a file so every later save fails.
    std::fs::remove_dir_all(&config).expect("remove config");
    std::fs::write(&config, b"file").expect("write blocker");
    let mut store = FigureStore::new(settings, Box::new(FixedSizeRenderer { bytes: 1 }));
    let before = store.settings().clone();
    for n in 0..4 {
        store.add_figure(&format!("F{n}"));
    }
    let live = store.live_figures().len();

    assert!(matches!(store.set_ui_history(1), Err(GraphError::Settings(_))));
    assert!(matches!(store.set_archive_size(0), Err(GraphError::Settings(_))));
    assert!(matches!(
        store.update_settings(r#"{"auto_navigate": false}"#),
        Err(GraphError::Settings(_))
    ));
    assert_eq!(store.settings(), &before);
    assert_eq!(store.live_figures().len(), live);
}
