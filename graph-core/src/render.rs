use crate::error::RenderError;
use crate::settings::MIN_IMAGE_DIMENSION;
use figure::{ContourPlot, LegendPosition, LineDashedness, LineGraph, LineStyle, MarkerType, Plot};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub mod geometry;

pub use geometry::{
    catmull_rom, clip_polyline, clip_segment, contour_segments, dash_polyline, heatmap_cells, jet,
    palette_color, HeatCell, Viewport,
};

const SMOOTH_STEPS: usize = 8;
const DEFAULT_THICKNESS: f64 = 5.0;
const LEGEND_TITLE: &str = "Legend";

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Rasterizes a single plot to an image file.
pub trait PlotRenderer: Send {
    fn render_png(
        &self,
        plot: &Plot,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError>;
}

/// Bitmap renderer built on `plotters`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersRenderer;

impl PlotRenderer for PlottersRenderer {
    fn render_png(
        &self,
        plot: &Plot,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if width < MIN_IMAGE_DIMENSION || height < MIN_IMAGE_DIMENSION {
            return Err(RenderError::InvalidSize { width, height });
        }
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::draw)?;
        match plot {
            Plot::Line(graph) => draw_line_graph(&root, graph)?,
            Plot::Contour(contour) => draw_contour(&root, contour)?,
        }
        root.present().map_err(RenderError::draw)
    }
}

fn to_rgba(color: figure::Color) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.opacity())
}

fn stroke_px(thickness: f64) -> u32 {
    thickness.round().max(1.0) as u32
}

/// Style given to a series plotted without one: a solid palette line.
pub fn default_style(index: usize) -> LineStyle {
    let (r, g, b) = palette_color(index);
    LineStyle {
        line_color: figure::Color::rgb(r, g, b),
        dashedness: LineDashedness::Solid,
        thickness: DEFAULT_THICKNESS,
        ..LineStyle::default()
    }
}

pub fn series_label_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::TopLeft | LegendPosition::LeftTop => SeriesLabelPosition::UpperLeft,
        LegendPosition::TopCenter => SeriesLabelPosition::UpperMiddle,
        LegendPosition::TopRight | LegendPosition::RightTop => SeriesLabelPosition::UpperRight,
        LegendPosition::BottomLeft | LegendPosition::LeftBottom => SeriesLabelPosition::LowerLeft,
        LegendPosition::BottomCenter => SeriesLabelPosition::LowerMiddle,
        LegendPosition::BottomRight | LegendPosition::RightBottom => {
            SeriesLabelPosition::LowerRight
        }
        LegendPosition::LeftMiddle => SeriesLabelPosition::MiddleLeft,
        LegendPosition::RightMiddle => SeriesLabelPosition::MiddleRight,
    }
}

fn draw_line_graph(root: &Area<'_>, graph: &LineGraph) -> Result<(), RenderError> {
    let view = Viewport::fit(&graph.bounds, &graph.series);
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(graph.title.as_str(), ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(view.x_min..view.x_max, view.y_min..view.y_max)
        .map_err(RenderError::draw)?;
    chart
        .configure_mesh()
        .x_desc(graph.x_label.as_str())
        .y_desc(graph.y_label.as_str())
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(RenderError::draw)?;

    let area_px = chart.plotting_area().dim_in_pixel();
    if let Some(title) = legend_title(graph) {
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
            .map_err(RenderError::draw)?
            .label(title)
            .legend(|(x, y)| EmptyElement::at((x, y)));
    }
    let mut labelled = 0;
    for (index, series) in graph.series.iter().enumerate() {
        let style = series
            .style
            .clone()
            .unwrap_or_else(|| default_style(index));
        let points: Vec<(f64, f64)> = series
            .points()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        let draws_line =
            !style.line_color.is_transparent() && style.thickness > 0.0 && points.len() > 1;
        if draws_line {
            let path = if style.smooth {
                catmull_rom(&points, SMOOTH_STEPS)
            } else {
                points.clone()
            };
            let line_style = to_rgba(style.line_color).stroke_width(stroke_px(style.thickness));
            let pattern: Vec<f64> = style
                .dashedness
                .pattern()
                .iter()
                .map(|len| len * style.thickness.max(1.0))
                .collect();
            let pixels = view.to_pixels(&path, area_px);
            let dashes: Vec<Vec<(f64, f64)>> = clip_polyline(&pixels, area_px)
                .iter()
                .flat_map(|run| dash_polyline(run, &pattern))
                .map(|dash| view.from_pixels(&dash, area_px))
                .collect();
            chart
                .draw_series(
                    dashes
                        .into_iter()
                        .map(|dash| PathElement::new(dash, line_style)),
                )
                .map_err(RenderError::draw)?;
        }
        draw_markers(&mut chart, &points, &style)?;

        if let Some(title) = series.title.as_ref().filter(|_| graph.show_legend) {
            let sample = legend_color(&style);
            chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
                .map_err(RenderError::draw)?
                .label(title.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], sample.stroke_width(3))
                });
            labelled += 1;
        }
    }

    if labelled > 0 {
        chart
            .configure_series_labels()
            .position(series_label_position(graph.legend_position))
            .background_style(&TRANSPARENT)
            .border_style(&TRANSPARENT)
            .draw()
            .map_err(RenderError::draw)?;
    }
    Ok(())
}

/// Heading row of the legend, present whenever a titled series is listed.
fn legend_title(graph: &LineGraph) -> Option<&'static str> {
    let listed = graph.show_legend && graph.series.iter().any(|series| series.title.is_some());
    listed.then_some(LEGEND_TITLE)
}

fn legend_color(style: &LineStyle) -> RGBAColor {
    [style.line_color, style.marker_stroke, style.marker_fill]
        .into_iter()
        .find(|color| !color.is_transparent())
        .map(to_rgba)
        .unwrap_or(RGBAColor(0, 0, 0, 1.0))
}

/// Outline of a marker around the origin, in pixels.
fn marker_outline(marker: MarkerType, size: i32) -> Vec<(i32, i32)> {
    let s = size;
    match marker {
        MarkerType::Square => vec![(-s, -s), (s, -s), (s, s), (-s, s)],
        MarkerType::Diamond => vec![(0, -s), (s, 0), (0, s), (-s, 0)],
        MarkerType::Triangle => vec![(0, -s), (s, s), (-s, s)],
        _ => Vec::new(),
    }
}

/// Strokes of line-only markers around the origin, in pixels.
fn marker_strokes(marker: MarkerType, size: i32) -> Vec<[(i32, i32); 2]> {
    let s = size;
    let cross = [[(-s, -s), (s, s)], [(-s, s), (s, -s)]];
    let plus = [[(-s, 0), (s, 0)], [(0, -s), (0, s)]];
    match marker {
        MarkerType::Cross => cross.to_vec(),
        MarkerType::Plus => plus.to_vec(),
        MarkerType::Star => cross.into_iter().chain(plus).collect(),
        _ => Vec::new(),
    }
}

fn draw_markers(
    chart: &mut Chart<'_, '_>,
    points: &[(f64, f64)],
    style: &LineStyle,
) -> Result<(), RenderError> {
    if style.marker_type == MarkerType::None || style.marker_size <= 0.0 || points.is_empty() {
        return Ok(());
    }
    let size = style.marker_size.round().max(1.0) as i32;
    let has_fill = !style.marker_fill.is_transparent();
    let has_stroke =
        !style.marker_stroke.is_transparent() && style.marker_stroke_thickness > 0.0;
    let fill = to_rgba(style.marker_fill).filled();
    let stroke = to_rgba(style.marker_stroke).stroke_width(stroke_px(style.marker_stroke_thickness));

    match style.marker_type {
        MarkerType::None => {}
        MarkerType::Circle | MarkerType::Custom => {
            if has_fill {
                chart
                    .draw_series(points.iter().map(|p| Circle::new(*p, size, fill)))
                    .map_err(RenderError::draw)?;
            }
            if has_stroke {
                chart
                    .draw_series(points.iter().map(|p| Circle::new(*p, size, stroke)))
                    .map_err(RenderError::draw)?;
            }
        }
        MarkerType::Square | MarkerType::Diamond | MarkerType::Triangle => {
            let outline = marker_outline(style.marker_type, size);
            if has_fill {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|p| EmptyElement::at(*p) + Polygon::new(outline.clone(), fill)),
                    )
                    .map_err(RenderError::draw)?;
            }
            if has_stroke {
                let mut closed = outline.clone();
                closed.extend(outline.first().copied());
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|p| EmptyElement::at(*p) + PathElement::new(closed.clone(), stroke)),
                    )
                    .map_err(RenderError::draw)?;
            }
        }
        MarkerType::Cross | MarkerType::Plus | MarkerType::Star => {
            // Line markers have no interior; fall back to the fill color.
            let pen = if has_stroke {
                stroke
            } else if has_fill {
                to_rgba(style.marker_fill).stroke_width(stroke_px(style.marker_stroke_thickness))
            } else {
                return Ok(());
            };
            for [a, b] in marker_strokes(style.marker_type, size) {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|p| EmptyElement::at(*p) + PathElement::new(vec![a, b], pen)),
                    )
                    .map_err(RenderError::draw)?;
            }
        }
    }
    Ok(())
}

fn draw_contour(root: &Area<'_>, contour: &ContourPlot) -> Result<(), RenderError> {
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(contour.title.as_str(), ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(contour.x_min..contour.x_max, contour.y_min..contour.y_max)
        .map_err(RenderError::draw)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(contour.x_label.as_str())
        .y_desc(contour.y_label.as_str())
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(RenderError::draw)?;

    let Some((low, high)) = contour.value_range() else {
        return Ok(());
    };
    let span = if high > low { high - low } else { 1.0 };
    chart
        .draw_series(heatmap_cells(contour).into_iter().map(|cell| {
            let shade = if cell.value.is_finite() {
                let (r, g, b) = jet((cell.value - low) / span);
                RGBColor(r, g, b)
            } else {
                RGBColor(160, 160, 160)
            };
            Rectangle::new([(cell.x0, cell.y0), (cell.x1, cell.y1)], shade.filled())
        }))
        .map_err(RenderError::draw)?;

    let contour_line = BLACK.stroke_width(2);
    for level in &contour.levels {
        chart
            .draw_series(
                contour_segments(contour, *level)
                    .into_iter()
                    .map(|[a, b]| PathElement::new(vec![a, b], contour_line)),
            )
            .map_err(RenderError::draw)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_positions_map_to_corners() {
        assert!(matches!(
            series_label_position(LegendPosition::LeftMiddle),
            SeriesLabelPosition::MiddleLeft
        ));
        assert!(matches!(
            series_label_position(LegendPosition::BottomCenter),
            SeriesLabelPosition::LowerMiddle
        ));
    }

    #[test]
    fn unstyled_series_get_thick_palette_lines() {
        let style = default_style(0);
        assert_eq!(style.thickness, 5.0);
        assert_eq!(style.dashedness, LineDashedness::Solid);
        assert_ne!(default_style(1).line_color, style.line_color);
    }

    #[test]
    fn legend_is_titled_only_when_it_lists_series() {
        let mut graph = LineGraph::new(figure::LineGraphSpec::new("t", "x", "y"));
        assert_eq!(legend_title(&graph), None);
        graph.series.push(figure::Series {
            title: Some("y1".to_string()),
            xs: vec![0.0, 1.0],
            ys: vec![0.0, 1.0],
            style: None,
        });
        assert_eq!(legend_title(&graph), Some("Legend"));
        graph.show_legend = false;
        assert_eq!(legend_title(&graph), None);
    }

    #[test]
    fn marker_only_style_uses_stroke_for_legend() {
        let style = figure::styles::blue_star_markers();
        let color = legend_color(&style);
        assert_eq!((color.0, color.1, color.2), (0, 0, 255));
    }

    #[test]
    fn star_marker_is_cross_plus() {
        assert_eq!(marker_strokes(MarkerType::Star, 3).len(), 4);
        assert_eq!(marker_outline(MarkerType::Diamond, 2)[1], (2, 0));
        assert!(marker_outline(MarkerType::Cross, 2).is_empty());
    }

    #[test]
    fn tiny_images_are_rejected() {
        let dir = std::env::temp_dir().join("graph-core-render-size");
        let plot = Plot::Line(LineGraph::new(figure::LineGraphSpec::new("t", "x", "y")));
        let result = PlottersRenderer.render_png(&plot, &dir.join("t.png"), 4, 4);
        assert!(matches!(result, Err(RenderError::InvalidSize { width: 4, height: 4 })));
    }
}
