use figure::{AxisBounds, ContourSpec, Series};

/// Fraction of the data span added on each side when an axis auto-fits.
pub const AUTO_FIT_PADDING: f64 = 0.05;

pub const PALETTE: [(u8, u8, u8); 10] = [
    (0x4E, 0x79, 0xA7),
    (0xF2, 0x8E, 0x2B),
    (0xE1, 0x57, 0x59),
    (0x76, 0xB7, 0xB2),
    (0x59, 0xA1, 0x4F),
    (0xED, 0xC9, 0x48),
    (0xB0, 0x7A, 0xA1),
    (0xFF, 0x9D, 0xA7),
    (0x9C, 0x75, 0x5F),
    (0xBA, 0xB0, 0xAC),
];

pub fn palette_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Data window of a chart in axis units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// Fits the finite points of `series`, then applies any fixed bounds.
    pub fn fit(bounds: &AxisBounds, series: &[Series]) -> Self {
        let points = series
            .iter()
            .flat_map(Series::points)
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        let mut x_extent: Option<(f64, f64)> = None;
        let mut y_extent: Option<(f64, f64)> = None;
        for (x, y) in points {
            x_extent = Some(widen(x_extent, x));
            y_extent = Some(widen(y_extent, y));
        }
        let (x_min, x_max) = resolve_axis(bounds.x_min, bounds.x_max, x_extent);
        let (y_min, y_max) = resolve_axis(bounds.y_min, bounds.y_max, y_extent);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn scale(&self, size: (u32, u32)) -> (f64, f64) {
        (
            f64::from(size.0.max(1)) / (self.x_max - self.x_min),
            f64::from(size.1.max(1)) / (self.y_max - self.y_min),
        )
    }

    pub fn to_pixels(&self, points: &[(f64, f64)], size: (u32, u32)) -> Vec<(f64, f64)> {
        let (sx, sy) = self.scale(size);
        points
            .iter()
            .map(|(x, y)| ((x - self.x_min) * sx, (y - self.y_min) * sy))
            .collect()
    }

    pub fn from_pixels(&self, points: &[(f64, f64)], size: (u32, u32)) -> Vec<(f64, f64)> {
        let (sx, sy) = self.scale(size);
        points
            .iter()
            .map(|(px, py)| (self.x_min + px / sx, self.y_min + py / sy))
            .collect()
    }
}

fn widen(extent: Option<(f64, f64)>, value: f64) -> (f64, f64) {
    match extent {
        Some((lo, hi)) => (lo.min(value), hi.max(value)),
        None => (value, value),
    }
}

/// Resolves one axis. Fixed ends win; open ends come from the padded data
/// extent, or `0..1` without data.
pub fn resolve_axis(min: Option<f64>, max: Option<f64>, extent: Option<(f64, f64)>) -> (f64, f64) {
    let (lo, hi) = extent.unwrap_or((0.0, 1.0));
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * AUTO_FIT_PADDING
    } else {
        lo.abs().max(1.0) * AUTO_FIT_PADDING
    };
    let start = min.unwrap_or(lo - pad);
    let end = max.unwrap_or(hi + pad);
    if start < end {
        return (start, end);
    }
    let width = if span > 0.0 { span } else { 1.0 };
    match (min, max) {
        (Some(_), None) => (start, start + width),
        (None, Some(_)) => (end - width, end),
        _ => (start, start + width),
    }
}

/// Catmull-Rom spline through `points` with `steps` samples per segment.
/// Every input point is kept.
pub fn catmull_rom(points: &[(f64, f64)], steps: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || steps < 2 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let mut out = Vec::with_capacity(last * steps + 1);
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        for s in 0..steps {
            let t = s as f64 / steps as f64;
            out.push((
                spline(p0.0, p1.0, p2.0, p3.0, t),
                spline(p0.1, p1.1, p2.1, p3.1, t),
            ));
        }
    }
    out.push(points[last]);
    out
}

fn spline(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

fn lerp(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

/// Part of the segment `a..b` inside `0..width` x `0..height`
/// (Liang-Barsky). Ends already inside are returned unchanged.
pub fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    width: f64,
    height: f64,
) -> Option<((f64, f64), (f64, f64))> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [(-dx, a.0), (dx, width - a.0), (-dy, a.1), (dy, height - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let start = if t0 > 0.0 { lerp(a, b, t0) } else { a };
    let end = if t1 < 1.0 { lerp(a, b, t1) } else { b };
    Some((start, end))
}

/// Visible runs of a pixel-space polyline inside a `size` canvas. Segments
/// entirely outside are dropped, so the output is bounded by the canvas no
/// matter how far the data reaches.
pub fn clip_polyline(points: &[(f64, f64)], size: (u32, u32)) -> Vec<Vec<(f64, f64)>> {
    let (width, height) = (f64::from(size.0), f64::from(size.1));
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], width, height) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    if current.len() > 1 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current = vec![start];
                }
                current.push(end);
            }
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

/// Splits a polyline into dashes. `pattern` alternates on/off lengths in
/// the same units as the points. An empty pattern yields the whole line.
pub fn dash_polyline(points: &[(f64, f64)], pattern: &[f64]) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 || pattern.is_empty() || pattern.iter().sum::<f64>() <= 0.0 {
        return vec![points.to_vec()];
    }
    let mut dashes = Vec::new();
    let mut index = 0;
    let mut remaining = pattern[0];
    let mut drawing = true;
    let mut current = vec![points[0]];
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        let mut travelled = 0.0;
        while length - travelled > remaining {
            travelled += remaining;
            let split = lerp(a, b, travelled / length);
            if drawing {
                current.push(split);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![split];
            }
            drawing = !drawing;
            index = (index + 1) % pattern.len();
            remaining = pattern[index];
        }
        remaining -= length - travelled;
        if drawing {
            current.push(b);
        }
    }
    if drawing && current.len() > 1 {
        dashes.push(current);
    }
    dashes
}

/// Jet colormap: dark blue at 0, through cyan, yellow, to dark red at 1.
pub fn jet(t: f64) -> (u8, u8, u8) {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let channel = |offset: f64| {
        let v = (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    (channel(3.0), channel(2.0), channel(1.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub value: f64,
}

/// One cell per grid sample, centred on the sample and clipped to the
/// plot range.
pub fn heatmap_cells(spec: &ContourSpec) -> Vec<HeatCell> {
    let Some((nx, ny)) = spec.dimensions() else {
        return Vec::new();
    };
    let half_dx = half_step(spec.x_min, spec.x_max, nx);
    let half_dy = half_step(spec.y_min, spec.y_max, ny);
    let mut cells = Vec::with_capacity(nx * ny);
    for (i, column) in spec.grid.iter().enumerate() {
        let x = spec.x_at(i);
        for (j, value) in column.iter().enumerate() {
            let y = spec.y_at(j);
            cells.push(HeatCell {
                x0: (x - half_dx).max(spec.x_min),
                y0: (y - half_dy).max(spec.y_min),
                x1: (x + half_dx).min(spec.x_max),
                y1: (y + half_dy).min(spec.y_max),
                value: *value,
            });
        }
    }
    cells
}

fn half_step(min: f64, max: f64, count: usize) -> f64 {
    if count <= 1 {
        (max - min) / 2.0
    } else {
        (max - min) / (count - 1) as f64 / 2.0
    }
}

fn crossing(a: (f64, f64, f64), b: (f64, f64, f64), level: f64) -> (f64, f64) {
    let t = if b.2 == a.2 {
        0.5
    } else {
        (level - a.2) / (b.2 - a.2)
    };
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

/// Marching squares over the grid. Returns line segments in plot
/// coordinates where the field crosses `level`.
pub fn contour_segments(spec: &ContourSpec, level: f64) -> Vec<[(f64, f64); 2]> {
    let Some((nx, ny)) = spec.dimensions() else {
        return Vec::new();
    };
    let mut segments = Vec::new();
    for i in 0..nx.saturating_sub(1) {
        for j in 0..ny.saturating_sub(1) {
            let corner = |di: usize, dj: usize| {
                (
                    spec.x_at(i + di),
                    spec.y_at(j + dj),
                    spec.grid[i + di][j + dj],
                )
            };
            let (c00, c10, c11, c01) = (corner(0, 0), corner(1, 0), corner(1, 1), corner(0, 1));
            if [c00, c10, c11, c01].iter().any(|c| !c.2.is_finite()) {
                continue;
            }
            let above = |c: (f64, f64, f64)| c.2 >= level;
            // Edges in order: bottom, right, top, left.
            let edges = [(c00, c10), (c10, c11), (c01, c11), (c00, c01)];
            let points: Vec<Option<(f64, f64)>> = edges
                .iter()
                .map(|(a, b)| (above(*a) != above(*b)).then(|| crossing(*a, *b, level)))
                .collect();
            let found: Vec<(f64, f64)> = points.iter().flatten().copied().collect();
            match found.len() {
                2 => segments.push([found[0], found[1]]),
                4 => {
                    let centre = (c00.2 + c10.2 + c11.2 + c01.2) / 4.0;
                    let [bottom, right, top, left] = [found[0], found[1], found[2], found[3]];
                    if (centre >= level) == above(c00) {
                        segments.push([bottom, right]);
                        segments.push([top, left]);
                    } else {
                        segments.push([left, bottom]);
                        segments.push([right, top]);
                    }
                }
                _ => {}
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(grid: Vec<Vec<f64>>) -> ContourSpec {
        ContourSpec {
            title: "c".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
            levels: vec![0.5],
            grid,
        }
    }

    #[test]
    fn auto_fit_pads_data_extent() {
        let series = vec![Series {
            title: None,
            xs: vec![0.0, 10.0],
            ys: vec![-1.0, 1.0],
            style: None,
        }];
        let view = Viewport::fit(&AxisBounds::default(), &series);
        assert_eq!((view.x_min, view.x_max), (-0.5, 10.5));
        assert!((view.y_min + 1.1).abs() < 1e-12);
        assert!((view.y_max - 1.1).abs() < 1e-12);
    }

    #[test]
    fn fixed_bounds_override_data() {
        let bounds = AxisBounds {
            x_min: Some(2.0),
            x_max: Some(4.0),
            y_min: Some(100.0),
            y_max: None,
        };
        let series = vec![Series {
            title: None,
            xs: vec![0.0, 10.0],
            ys: vec![0.0, 1.0],
            style: None,
        }];
        let view = Viewport::fit(&bounds, &series);
        assert_eq!((view.x_min, view.x_max), (2.0, 4.0));
        assert_eq!((view.y_min, view.y_max), (100.0, 101.0));
    }

    #[test]
    fn empty_graph_gets_unit_window() {
        let view = Viewport::fit(&AxisBounds::default(), &[]);
        assert!(view.x_min < 0.0 && view.x_max > 1.0);
    }

    #[test]
    fn dashes_follow_pattern() {
        let dashes = dash_polyline(&[(0.0, 0.0), (4.0, 0.0), (8.0, 0.0)], &[2.0, 2.0]);
        assert_eq!(
            dashes,
            vec![vec![(0.0, 0.0), (2.0, 0.0)], vec![(4.0, 0.0), (6.0, 0.0)]]
        );
        let solid = dash_polyline(&[(0.0, 0.0), (1.0, 1.0)], &[]);
        assert_eq!(solid.len(), 1);
    }

    #[test]
    fn clipping_trims_segments_to_canvas() {
        let inside = [(10.0, 10.0), (20.0, 30.0), (40.0, 5.0)];
        assert_eq!(clip_polyline(&inside, (100, 100)), vec![inside.to_vec()]);

        let runs = clip_polyline(&[(-50.0, 50.0), (150.0, 50.0)], (100, 100));
        assert_eq!(runs, vec![vec![(0.0, 50.0), (100.0, 50.0)]]);

        assert!(clip_polyline(&[(200.0, 0.0), (300.0, 90.0)], (100, 100)).is_empty());
        assert!(clip_segment((0.0, 0.0), (f64::INFINITY, 0.0), 10.0, 10.0).is_none());
    }

    #[test]
    fn leaving_and_reentering_splits_runs() {
        let points = [(0.0, 50.0), (200.0, 50.0), (200.0, 60.0), (0.0, 60.0)];
        let runs = clip_polyline(&points, (100, 100));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(0.0, 50.0), (100.0, 50.0)]);
        assert_eq!(runs[1], vec![(100.0, 60.0), (0.0, 60.0)]);
    }

    #[test]
    fn dashing_far_outside_fixed_bounds_stays_bounded() {
        let bounds = AxisBounds {
            x_min: Some(0.0),
            x_max: Some(1.0),
            y_min: Some(0.0),
            y_max: Some(1.0),
        };
        let view = Viewport::fit(&bounds, &[]);
        let size = (1200, 900);
        let pixels = view.to_pixels(&[(0.0, 0.5), (1.0e9, 0.5)], size);
        let dashes: Vec<_> = clip_polyline(&pixels, size)
            .iter()
            .flat_map(|run| dash_polyline(run, &[8.0, 8.0]))
            .collect();
        assert!((75..=76).contains(&dashes.len()), "{} dashes", dashes.len());
        assert!(dashes.iter().flatten().all(|(x, _)| *x <= 1200.0 + 1e-6));
    }

    #[test]
    fn spline_passes_through_inputs() {
        let points = [(0.0, 0.0), (1.0, 2.0), (2.0, 0.0), (3.0, 1.0)];
        let smooth = catmull_rom(&points, 4);
        assert_eq!(smooth.len(), 3 * 4 + 1);
        for point in points {
            assert!(smooth.contains(&point));
        }
    }

    #[test]
    fn jet_runs_blue_to_red() {
        assert_eq!(jet(0.0), (0, 0, 128));
        assert_eq!(jet(1.0), (128, 0, 0));
        assert_eq!(jet(0.5).1, 255);
    }

    #[test]
    fn marching_squares_finds_vertical_edge() {
        let spec = contour(vec![vec![0.0, 0.0], vec![1.0, 1.0]]);
        let segments = contour_segments(&spec, 0.5);
        assert_eq!(segments, vec![[(0.5, 0.0), (0.5, 1.0)]]);
        assert!(contour_segments(&spec, 2.0).is_empty());
    }

    #[test]
    fn heat_cells_stay_inside_range() {
        let spec = contour(vec![vec![0.0; 3]; 3]);
        let cells = heatmap_cells(&spec);
        assert_eq!(cells.len(), 9);
        assert_eq!((cells[0].x0, cells[0].x1), (0.0, 0.25));
        assert_eq!((cells[4].x0, cells[4].x1), (0.25, 0.75));
    }
}
