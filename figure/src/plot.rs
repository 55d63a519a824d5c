use crate::style::{LegendPosition, LineStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub title: Option<String>,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    #[serde(default)]
    pub style: Option<LineStyle>,
}

impl Series {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

/// Visible window of a line graph. `None` on either end means fit to data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisBounds {
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineGraphSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(default = "default_show_legend")]
    pub show_legend: bool,
    #[serde(default)]
    pub legend_position: LegendPosition,
}

fn default_show_legend() -> bool {
    true
}

impl LineGraphSpec {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            show_legend: true,
            legend_position: LegendPosition::TopLeft,
        }
    }

    pub fn without_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineGraph {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_legend: bool,
    pub legend_position: LegendPosition,
    pub series: Vec<Series>,
    pub bounds: AxisBounds,
}

impl LineGraph {
    pub fn new(spec: LineGraphSpec) -> Self {
        Self {
            title: spec.title,
            x_label: spec.x_label,
            y_label: spec.y_label,
            show_legend: spec.show_legend,
            legend_position: spec.legend_position,
            series: Vec::new(),
            bounds: AxisBounds::default(),
        }
    }
}

/// Inputs for a heatmap with contour lines. `grid[i][j]` is the value at the
/// i-th x sample and the j-th y sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub levels: Vec<f64>,
    pub grid: Vec<Vec<f64>>,
}

pub type ContourPlot = ContourSpec;

impl ContourSpec {
    /// (columns along x, rows along y), or `None` for an empty grid.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        let nx = self.grid.len();
        let ny = self.grid.first().map(Vec::len)?;
        if nx == 0 || ny == 0 {
            return None;
        }
        Some((nx, ny))
    }

    pub fn x_at(&self, i: usize) -> f64 {
        coordinate(self.x_min, self.x_max, i, self.grid.len())
    }

    pub fn y_at(&self, j: usize) -> f64 {
        let ny = self.grid.first().map(Vec::len).unwrap_or(0);
        coordinate(self.y_min, self.y_max, j, ny)
    }

    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in self.grid.iter().flatten().copied().filter(|v| v.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
        (min.is_finite() && max.is_finite()).then_some((min, max))
    }
}

fn coordinate(min: f64, max: f64, index: usize, count: usize) -> f64 {
    if count <= 1 {
        return min;
    }
    min + (max - min) * index as f64 / (count - 1) as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Plot {
    Line(LineGraph),
    Contour(ContourPlot),
}

impl Plot {
    pub fn title(&self) -> &str {
        match self {
            Plot::Line(graph) => &graph.title,
            Plot::Contour(contour) => &contour.title,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Plot::Line(_) => "line",
            Plot::Contour(_) => "contour",
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut LineGraph> {
        match self {
            Plot::Line(graph) => Some(graph),
            Plot::Contour(_) => None,
        }
    }

    /// Drops every series of a line graph, or the data of a contour plot.
    pub fn clear(&mut self) {
        match self {
            Plot::Line(graph) => graph.series.clear(),
            Plot::Contour(contour) => {
                contour.grid.clear();
                contour.levels.clear();
            }
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PlotRuleError {
    #[error("series has {xs} x values but {ys} y values")]
    MismatchedSeries { xs: usize, ys: usize },
    #[error("contour grid is empty")]
    EmptyGrid,
    #[error("contour grid row {row} has {found} values, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{axis} range must satisfy min < max (got {min}..{max})")]
    InvalidRange { axis: char, min: f64, max: f64 },
    #[error("{axis} bound must be finite")]
    NonFiniteBound { axis: char },
}

pub fn validate_series(xs: &[f64], ys: &[f64]) -> Result<(), PlotRuleError> {
    if xs.len() != ys.len() {
        return Err(PlotRuleError::MismatchedSeries {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    Ok(())
}

fn validate_range(axis: char, min: f64, max: f64) -> Result<(), PlotRuleError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(PlotRuleError::NonFiniteBound { axis });
    }
    if min >= max {
        return Err(PlotRuleError::InvalidRange { axis, min, max });
    }
    Ok(())
}

pub fn validate_bounds(bounds: &AxisBounds) -> Result<(), PlotRuleError> {
    for (axis, min, max) in [
        ('x', bounds.x_min, bounds.x_max),
        ('y', bounds.y_min, bounds.y_max),
    ] {
        for value in [min, max].into_iter().flatten() {
            if !value.is_finite() {
                return Err(PlotRuleError::NonFiniteBound { axis });
            }
        }
        if let (Some(min), Some(max)) = (min, max) {
            validate_range(axis, min, max)?;
        }
    }
    Ok(())
}

pub fn validate_contour(spec: &ContourSpec) -> Result<(), PlotRuleError> {
    validate_range('x', spec.x_min, spec.x_max)?;
    validate_range('y', spec.y_min, spec.y_max)?;
    let expected = spec.grid.first().map(Vec::len).unwrap_or(0);
    if expected == 0 {
        return Err(PlotRuleError::EmptyGrid);
    }
    for (row, values) in spec.grid.iter().enumerate() {
        if values.len() != expected {
            return Err(PlotRuleError::RaggedGrid {
                row,
                expected,
                found: values.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(grid: Vec<Vec<f64>>) -> ContourSpec {
        ContourSpec {
            title: "c".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            x_min: -1.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 4.0,
            levels: vec![0.5],
            grid,
        }
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let spec = contour(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(
            validate_contour(&spec),
            Err(PlotRuleError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(validate_contour(&contour(vec![])), Err(PlotRuleError::EmptyGrid));
    }

    #[test]
    fn contour_coordinates_span_the_range() {
        let spec = contour(vec![vec![0.0; 5]; 3]);
        assert_eq!(spec.dimensions(), Some((3, 5)));
        assert_eq!(spec.x_at(0), -1.0);
        assert_eq!(spec.x_at(2), 1.0);
        assert_eq!(spec.y_at(4), 4.0);
        assert_eq!(spec.y_at(2), 2.0);
    }

    #[test]
    fn bounds_accept_open_ends_and_reject_inverted_ranges() {
        let open = AxisBounds {
            x_min: Some(1.0),
            ..AxisBounds::default()
        };
        assert!(validate_bounds(&open).is_ok());
        let inverted = AxisBounds {
            y_min: Some(2.0),
            y_max: Some(1.0),
            ..AxisBounds::default()
        };
        assert!(matches!(
            validate_bounds(&inverted),
            Err(PlotRuleError::InvalidRange { axis: 'y', .. })
        ));
    }

    #[test]
    fn clearing_a_line_graph_keeps_its_axes() {
        let mut plot = Plot::Line(LineGraph::new(LineGraphSpec::new("t", "x", "y")));
        if let Some(graph) = plot.as_line_mut() {
            graph.series.push(Series {
                title: None,
                xs: vec![1.0],
                ys: vec![2.0],
                style: None,
            });
            graph.bounds.x_min = Some(0.0);
        }
        plot.clear();
        let Plot::Line(graph) = &plot else {
            panic!("expected line graph");
        };
        assert!(graph.series.is_empty());
        assert_eq!(graph.bounds.x_min, Some(0.0));
    }
}
