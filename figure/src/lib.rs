use serde::{Deserialize, Serialize};

pub mod handle;
pub mod layout;
pub mod plot;
pub mod style;

pub use handle::{Arena, FigureId, HandleParseError, PlotId, RawHandle};
pub use layout::{cell_position, grid_dimensions, row_height};
pub use plot::{
    validate_bounds, validate_contour, validate_series, AxisBounds, ContourPlot, ContourSpec,
    LineGraph, LineGraphSpec, Plot, PlotRuleError, Series,
};
pub use style::{styles, Color, LegendPosition, LineDashedness, LineStyle, MarkerType};

/// A titled page of plots. Plot data lives in the store's plot arena; the
/// figure only keeps the handles in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub name: String,
    pub plots: Vec<PlotId>,
}

impl Figure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSummary {
    pub id: FigureId,
    pub name: String,
    pub plots: Vec<PlotSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSummary {
    pub id: PlotId,
    pub kind: String,
    pub title: String,
}
