use figure::{styles, AxisBounds, Color, ContourSpec, FigureId, LineGraphSpec, PlotId};
use graph_service::{ClientError, GraphClient};
use std::f64::consts::PI;
use std::time::Duration;

const SAMPLES: usize = 41;
const SURFACE_STEPS: usize = 100;
const CONTOUR_LEVELS: [f64; 7] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75];
const SPOKE_GROUPS: usize = 6;

/// `x sin x` for x = 0, 0.5, .., 20.
pub fn sinc_wave() -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = (0..SAMPLES).map(|i| i as f64 * 0.5).collect();
    let ys = xs.iter().map(|x| x * x.sin()).collect();
    (xs, ys)
}

/// Archimedean spiral `(t cos t, t sin t)` sampled from `t = 1` in `step`
/// increments.
pub fn spiral(step: f64) -> (Vec<f64>, Vec<f64>) {
    let ts = (0..SAMPLES).map(|i| 1.0 + i as f64 * step);
    ts.map(|t| (t * t.cos(), t * t.sin())).unzip()
}

fn extent(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

/// Bounds around the data widened by `fraction` of the span on every side.
pub fn padded_bounds(xs: &[f64], ys: &[f64], fraction: f64) -> AxisBounds {
    let (x_lo, x_hi) = extent(xs);
    let (y_lo, y_hi) = extent(ys);
    let x_pad = fraction * (x_hi - x_lo);
    let y_pad = fraction * (y_hi - y_lo);
    AxisBounds {
        x_min: Some(x_lo - x_pad),
        x_max: Some(x_hi + x_pad),
        y_min: Some(y_lo - y_pad),
        y_max: Some(y_hi + y_pad),
    }
}

/// `1 + cos(x + y) cos(x - y)`, sampled on a `steps`×`steps` grid starting at
/// the minimum corner. Columns run along x.
pub fn surface_grid(min: f64, max: f64, steps: usize) -> Vec<Vec<f64>> {
    let step = (max - min) / steps as f64;
    (0..steps)
        .map(|i| {
            let x = min + i as f64 * step;
            (0..steps)
                .map(|j| {
                    let y = min + j as f64 * step;
                    1.0 + (x + y).cos() * (x - y).cos()
                })
                .collect()
        })
        .collect()
}

fn shifted(ys: &[f64], offset: f64) -> Vec<f64> {
    ys.iter().map(|y| y + offset).collect()
}

fn wave_color(j: f64, f: fn(f64) -> f64) -> Color {
    let channel = |offset: f64, period: f64| (255.0 * (f((j + offset) / period) + 1.0) / 2.0) as u8;
    Color::argb(0xA0, channel(0.0, 1.5), channel(1.0, 2.0), channel(2.0, 2.5))
}

/// Six sample graphs per figure: default and custom multi-series lines,
/// smoothed and marked spirals, spokes in changing colours and a contour map.
pub fn run_showcase(client: &GraphClient, figures: usize) -> Result<Vec<FigureId>, ClientError> {
    let (sinc_x, sinc_y) = sinc_wave();
    let (spiral_x, spiral_y) = spiral(1.0);
    let (spiral2_x, spiral2_y) = spiral(0.5);
    let grid = surface_grid(-PI, PI, SURFACE_STEPS);
    let mut created = Vec::with_capacity(figures);

    for n in 1..=figures {
        let figure = client.add_figure(&format!("Graph Collection {n}"))?;
        created.push(figure);

        let graph = client.add_line_graph(
            figure,
            LineGraphSpec::new("Graph 1", "Current (mA)", "Voltage (V)"),
        )?;
        for (k, title) in ["y1", "y2", "y3", "y4"].iter().enumerate() {
            client.plot(graph, title, &sinc_x, &shifted(&sinc_y, 4.0 * k as f64))?;
        }

        let graph = client.add_line_graph(
            figure,
            LineGraphSpec::new("Graph 2", "Current (mA)", "Voltage (V)"),
        )?;
        let custom = [
            styles::red_line(),
            styles::blue_line(),
            styles::green_line(),
            styles::slate_blue_line(),
        ];
        for (k, style) in custom.into_iter().enumerate() {
            let title = format!("y{}", k + 1);
            let ys = shifted(&sinc_y, 4.0 * k as f64);
            client.plot_with_style(graph, &title, &sinc_x, &ys, Some(style))?;
        }

        let graph = client
            .add_line_graph(figure, LineGraphSpec::new("Graph 3", "time", "space").without_legend())?;
        client.plot_with_style(graph, "Smooth", &spiral_x, &spiral_y, Some(styles::red_dash_dot()))?;
        client.plot_with_style(
            graph,
            "Not Smooth",
            &spiral_x,
            &spiral_y,
            Some(styles::blue_with_markers()),
        )?;
        client.set_axis_boundaries(graph, padded_bounds(&spiral_x, &spiral_y, 0.1))?;

        let graph = client
            .add_line_graph(figure, LineGraphSpec::new("Graph 4", "time", "space").without_legend())?;
        client.plot_with_style(
            graph,
            "Series 1",
            &spiral_x,
            &spiral_y,
            Some(styles::blue_star_markers()),
        )?;
        client.plot_with_style(
            graph,
            "Series 2",
            &spiral2_x,
            &spiral2_y,
            Some(styles::red_cross_markers()),
        )?;
        client.set_axis_boundaries(graph, padded_bounds(&spiral_x, &spiral_y, 0.1))?;

        let graph = client
            .add_line_graph(figure, LineGraphSpec::new("Graph 5", "time", "space").without_legend())?;
        for j in 1..spiral_x.len() {
            let mut style = styles::transparent_line();
            style.line_color = wave_color(j as f64, f64::sin);
            client.plot_with_style(
                graph,
                "",
                &[0.0, spiral_x[j]],
                &[0.0, spiral_y[j]],
                Some(style),
            )?;
        }
        client.set_axis_boundaries(graph, padded_bounds(&spiral_x, &spiral_y, 0.025))?;
        client.plot_with_style(
            graph,
            "",
            &spiral_x[1..],
            &spiral_y[1..],
            Some(styles::green_diamond_marker()),
        )?;

        client.add_contour_plot(
            figure,
            ContourSpec {
                title: "Graph 6".to_string(),
                x_label: "x".to_string(),
                y_label: "y".to_string(),
                x_min: -PI,
                x_max: PI,
                y_min: -PI,
                y_max: PI,
                levels: CONTOUR_LEVELS.to_vec(),
                grid: grid.clone(),
            },
        )?;
        log::info!("Demo figure {n} sent");
    }
    Ok(created)
}

/// Three collections redrawn in turn for `rounds` rounds, with history sized
/// to hold them all and a small archive budget.
pub fn run_cycle(client: &GraphClient, rounds: usize, delay: Duration) -> Result<(), ClientError> {
    let mut collections: Vec<(FigureId, Vec<PlotId>)> = Vec::new();
    for (name, count) in [("A", 1), ("B", 2), ("C", 3)] {
        let figure = client.add_figure(&format!("Collection {name}"))?;
        let mut graphs = Vec::with_capacity(count);
        for k in 1..=count {
            let spec = LineGraphSpec::new(format!("{name}{k}"), "x", "y").without_legend();
            graphs.push(client.add_line_graph(figure, spec)?);
        }
        collections.push((figure, graphs));
    }
    client.set_ui_history(collections.len())?;
    client.set_archive_size(5)?;

    let (spiral_x, spiral_y) = spiral(1.0);
    let bounds = padded_bounds(&spiral_x, &spiral_y, 0.1);
    for _ in 0..rounds {
        for (figure, graphs) in &collections {
            for graph in graphs {
                client.clear_graph(*graph)?;
            }
            client.navigate_to(*figure)?;
            for graph in graphs {
                std::thread::sleep(delay);
                client.set_axis_boundaries(*graph, bounds)?;
                for group in 0..SPOKE_GROUPS {
                    let xs: Vec<f64> = spiral_x.iter().skip(group).step_by(SPOKE_GROUPS).copied().collect();
                    let ys: Vec<f64> = spiral_y.iter().skip(group).step_by(SPOKE_GROUPS).copied().collect();
                    let mut style = styles::transparent_line();
                    style.line_color = wave_color(group as f64 + 2.0, f64::cos);
                    client.plot_with_style(*graph, "", &xs, &ys, Some(style))?;
                }
                client.plot_with_style(
                    *graph,
                    "",
                    &spiral_x,
                    &spiral_y,
                    Some(styles::slate_blue_line()),
                )?;
                std::thread::sleep(delay);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_curves_have_matching_lengths() {
        let (xs, ys) = sinc_wave();
        assert_eq!(xs.len(), SAMPLES);
        assert_eq!(xs.len(), ys.len());
        assert_eq!(xs[SAMPLES - 1], 20.0);
        assert!((ys[1] - 0.239712769).abs() < 1e-6);

        let (xs, ys) = spiral(1.0);
        assert!((xs[0] - 0.540302306).abs() < 1e-6);
        assert!((ys[1] - 1.818594854).abs() < 1e-6);
    }

    #[test]
    fn padded_bounds_widen_each_side() {
        let bounds = padded_bounds(&[0.0, 10.0], &[-1.0, 1.0], 0.1);
        assert_eq!(bounds.x_min, Some(-1.0));
        assert_eq!(bounds.x_max, Some(11.0));
        assert!((bounds.y_min.unwrap() + 1.2).abs() < 1e-12);
        assert!((bounds.y_max.unwrap() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn surface_is_square_and_bounded() {
        let grid = surface_grid(-PI, PI, 10);
        assert_eq!(grid.len(), 10);
        assert!(grid.iter().all(|column| column.len() == 10));
        assert!(grid.iter().flatten().all(|v| (0.0..=2.0).contains(v)));
        assert!((grid[0][0] - (1.0 + (-2.0 * PI).cos())).abs() < 1e-12);
    }
}
