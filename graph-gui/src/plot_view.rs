use crate::utils::to_color32;
use eframe::egui::{self, RichText};
use egui_plot::{Corner, Legend, Line, MarkerShape, PlotBounds, PlotImage, PlotPoint, PlotPoints, Points};
use figure::layout::{cell_position, grid_dimensions, row_height};
use figure::{ContourPlot, LegendPosition, LineDashedness, LineGraph, MarkerType, Plot, PlotId};
use graph_core::render::{
    catmull_rom, clip_polyline, contour_segments, default_style, jet, Viewport,
};
use graph_core::{FigureView, PlotView};
use std::collections::HashMap;

const SMOOTH_STEPS: usize = 8;
/// Reference canvas for clipping dashed lines to fixed bounds.
const CLIP_CANVAS: (u32, u32) = (4096, 4096);

/// GPU texture and isolines of one contour plot, rebuilt whenever the host
/// publishes a new revision.
struct ContourCache {
    revision: u64,
    texture: Option<egui::TextureHandle>,
    isolines: Vec<[(f64, f64); 2]>,
}

/// Draws the plots of a figure in a grid and keeps per-plot caches alive
/// between frames.
pub(crate) struct PlotCanvas {
    contours: HashMap<PlotId, ContourCache>,
}

impl PlotCanvas {
    pub(crate) fn new() -> Self {
        Self {
            contours: HashMap::new(),
        }
    }

    /// Lays the figure's plots out in a grid, columns first, with every row
    /// sharing the available height equally.
    ///
    /// # Parameters
    /// - `ui`: panel the figure fills
    /// - `figure`: snapshot of the displayed figure
    /// - `revision`: host revision the snapshot belongs to
    pub(crate) fn show_figure(&mut self, ui: &mut egui::Ui, figure: &FigureView, revision: u64) {
        self.contours
            .retain(|id, _| figure.plots.iter().any(|plot| plot.id == *id));

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&figure.name).strong().size(18.0));
        });
        if figure.plots.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("This figure has no plots yet");
            });
            return;
        }

        let (rows, cols) = grid_dimensions(figure.plots.len());
        let spacing = ui.spacing().item_spacing;
        let available = ui.available_size();
        let height = row_height(available.y, spacing.y * rows as f32, rows);
        let width = ((available.x - spacing.x * (cols.saturating_sub(1)) as f32) / cols as f32).max(0.0);

        for row in 0..rows {
            ui.horizontal(|ui| {
                for (index, plot) in figure.plots.iter().enumerate() {
                    if cell_position(index, cols).0 != row {
                        continue;
                    }
                    ui.allocate_ui(egui::vec2(width, height), |ui| {
                        ui.set_min_size(egui::vec2(width, height));
                        self.show_plot(ui, plot, revision);
                    });
                }
            });
        }
    }

    fn show_plot(&mut self, ui: &mut egui::Ui, view: &PlotView, revision: u64) {
        ui.vertical(|ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(view.plot.title()).strong());
            });
            match &view.plot {
                Plot::Line(graph) => show_line_graph(ui, view.id, graph),
                Plot::Contour(contour) => self.show_contour(ui, view.id, contour, revision),
            }
        });
    }

    fn show_contour(&mut self, ui: &mut egui::Ui, id: PlotId, contour: &ContourPlot, revision: u64) {
        let stale = self
            .contours
            .get(&id)
            .map_or(true, |cache| cache.revision != revision);
        if stale {
            let cache = build_contour_cache(ui.ctx(), id, contour, revision);
            self.contours.insert(id, cache);
        }
        let Some(cache) = self.contours.get(&id) else {
            return;
        };

        let size = ui.available_size();
        egui_plot::Plot::new(("contour", id))
            .width(size.x)
            .height(size.y)
            .x_axis_label(contour.x_label.as_str())
            .y_axis_label(contour.y_label.as_str())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                if let Some(texture) = &cache.texture {
                    let center = PlotPoint::new(
                        (contour.x_min + contour.x_max) / 2.0,
                        (contour.y_min + contour.y_max) / 2.0,
                    );
                    let extent = egui::vec2(
                        (contour.x_max - contour.x_min) as f32,
                        (contour.y_max - contour.y_min) as f32,
                    );
                    plot_ui.image(PlotImage::new(texture.id(), center, extent));
                }
                for [a, b] in &cache.isolines {
                    plot_ui.line(
                        Line::new(vec![[a.0, a.1], [b.0, b.1]])
                            .color(egui::Color32::BLACK)
                            .width(1.0),
                    );
                }
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [contour.x_min, contour.y_min],
                    [contour.x_max, contour.y_max],
                ));
            });
    }
}

fn show_line_graph(ui: &mut egui::Ui, id: PlotId, graph: &LineGraph) {
    let size = ui.available_size();
    let mut plot = egui_plot::Plot::new(("line", id))
        .width(size.x)
        .height(size.y)
        .x_axis_label(graph.x_label.as_str())
        .y_axis_label(graph.y_label.as_str())
        .allow_scroll(false);
    if graph.show_legend {
        plot = plot.legend(Legend::default().position(legend_corner(graph.legend_position)));
    }
    let bounds = graph.bounds;
    let fixed = bounds.x_min.is_some()
        || bounds.x_max.is_some()
        || bounds.y_min.is_some()
        || bounds.y_max.is_some();

    let viewport = fixed.then(|| Viewport::fit(&bounds, &graph.series));

    plot.show(ui, |plot_ui| {
        for (index, series) in graph.series.iter().enumerate() {
            let style = series.style.clone().unwrap_or_else(|| default_style(index));
            let mut points: Vec<(f64, f64)> = series.points().collect();
            if style.smooth {
                points = catmull_rom(&points, SMOOTH_STEPS);
            }
            let name = series.title.clone().unwrap_or_default();
            let draws_line = !style.line_color.is_transparent();

            if draws_line {
                let thickness = style.thickness.max(1.0) as f32;
                let runs = match viewport {
                    Some(view) if style.dashedness != LineDashedness::Solid => {
                        visible_runs(&view, &points)
                    }
                    _ => vec![points.clone()],
                };
                for (run_index, run) in runs.into_iter().enumerate() {
                    let line_points = PlotPoints::from_iter(run.into_iter().map(|(x, y)| [x, y]));
                    let mut line = Line::new(line_points)
                        .color(to_color32(style.line_color))
                        .width(thickness)
                        .style(dash_style(style.dashedness, thickness));
                    if run_index == 0 {
                        line = line.name(&name);
                    }
                    plot_ui.line(line);
                }
            }
            if let Some(shape) = marker_shape(style.marker_type) {
                let filled = !style.marker_fill.is_transparent();
                let color = if filled {
                    style.marker_fill
                } else {
                    style.marker_stroke
                };
                let mut markers =
                    Points::new(PlotPoints::from_iter(series.points().map(|(x, y)| [x, y])))
                        .shape(shape)
                        .radius((style.marker_size / 2.0).max(1.0) as f32)
                        .color(to_color32(color))
                        .filled(filled);
                if !draws_line {
                    markers = markers.name(&name);
                }
                plot_ui.points(markers);
            }
        }
        if let Some(viewport) = viewport {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [viewport.x_min, viewport.y_min],
                [viewport.x_max, viewport.y_max],
            ));
        }
    });
}

/// Pieces of `points` inside fixed bounds. Dashes are laid out in screen
/// space, so a line reaching far past the bounds would otherwise be cut
/// into an unbounded number of them.
fn visible_runs(view: &Viewport, points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    clip_polyline(&view.to_pixels(points, CLIP_CANVAS), CLIP_CANVAS)
        .iter()
        .map(|run| view.from_pixels(run, CLIP_CANVAS))
        .collect()
}

fn build_contour_cache(
    ctx: &egui::Context,
    id: PlotId,
    contour: &ContourPlot,
    revision: u64,
) -> ContourCache {
    let texture = heatmap_image(contour).map(|image| {
        ctx.load_texture(format!("contour_{id}"), image, egui::TextureOptions::NEAREST)
    });
    let isolines = contour
        .levels
        .iter()
        .flat_map(|level| contour_segments(contour, *level))
        .collect();
    ContourCache {
        revision,
        texture,
        isolines,
    }
}

/// One pixel per grid sample, jet-coloured, with the highest y on the top
/// row. Non-finite samples stay transparent.
fn heatmap_image(contour: &ContourPlot) -> Option<egui::ColorImage> {
    let (nx, ny) = contour.dimensions()?;
    let (min, max) = contour.value_range()?;
    let span = max - min;
    let mut rgba = Vec::with_capacity(nx * ny * 4);
    for row in 0..ny {
        let j = ny - 1 - row;
        for column in &contour.grid {
            let value = column.get(j).copied().unwrap_or(f64::NAN);
            if !value.is_finite() {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let t = if span > 0.0 { (value - min) / span } else { 0.5 };
            let (r, g, b) = jet(t);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    Some(egui::ColorImage::from_rgba_unmultiplied([nx, ny], &rgba))
}

fn dash_style(dashedness: LineDashedness, thickness: f32) -> egui_plot::LineStyle {
    match dashedness {
        LineDashedness::Solid => egui_plot::LineStyle::Solid,
        LineDashedness::Dashed => egui_plot::LineStyle::Dashed {
            length: 4.0 * thickness,
        },
        LineDashedness::Dotted => egui_plot::LineStyle::Dotted {
            spacing: 2.0 * thickness,
        },
        LineDashedness::DashDot => egui_plot::LineStyle::Dashed {
            length: 2.0 * thickness,
        },
    }
}

fn marker_shape(marker: MarkerType) -> Option<MarkerShape> {
    match marker {
        MarkerType::None => None,
        MarkerType::Circle | MarkerType::Custom => Some(MarkerShape::Circle),
        MarkerType::Square => Some(MarkerShape::Square),
        MarkerType::Diamond => Some(MarkerShape::Diamond),
        MarkerType::Triangle => Some(MarkerShape::Up),
        MarkerType::Cross => Some(MarkerShape::Cross),
        MarkerType::Plus => Some(MarkerShape::Plus),
        MarkerType::Star => Some(MarkerShape::Asterisk),
    }
}

/// egui_plot only has corner legends; edge-centred positions snap to the
/// nearest corner on the same side.
fn legend_corner(position: LegendPosition) -> Corner {
    match position {
        LegendPosition::TopLeft | LegendPosition::LeftTop | LegendPosition::LeftMiddle => {
            Corner::LeftTop
        }
        LegendPosition::TopCenter
        | LegendPosition::TopRight
        | LegendPosition::RightTop
        | LegendPosition::RightMiddle => Corner::RightTop,
        LegendPosition::BottomLeft | LegendPosition::LeftBottom => Corner::LeftBottom,
        LegendPosition::BottomCenter
        | LegendPosition::BottomRight
        | LegendPosition::RightBottom => Corner::RightBottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(grid: Vec<Vec<f64>>) -> ContourPlot {
        ContourPlot {
            title: "Contour".to_string(),
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
    fn heatmap_puts_highest_y_on_top_row() {
        // grid[i][j]: column i along x, sample j along y.
        let image = heatmap_image(&contour(vec![vec![0.0, 1.0], vec![0.0, 1.0]])).expect("image");
        assert_eq!(image.size, [2, 2]);
        let (r, g, b) = jet(1.0);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(r, g, b));
        let (r, g, b) = jet(0.0);
        assert_eq!(image.pixels[2], egui::Color32::from_rgb(r, g, b));
    }

    #[test]
    fn dashed_lines_are_clipped_to_fixed_bounds() {
        let view = Viewport {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        let runs = visible_runs(&view, &[(0.0, 0.5), (1.0e9, 0.5)]);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].iter().all(|(x, _)| *x <= 1.0 + 1e-9));
        assert!(visible_runs(&view, &[(2.0, 2.0), (3.0, 3.0)]).is_empty());
    }

    #[test]
    fn empty_contour_has_no_image() {
        assert!(heatmap_image(&contour(Vec::new())).is_none());
    }

    #[test]
    fn markers_map_to_plot_shapes() {
        assert!(marker_shape(MarkerType::None).is_none());
        assert!(matches!(marker_shape(MarkerType::Star), Some(MarkerShape::Asterisk)));
        assert!(matches!(marker_shape(MarkerType::Custom), Some(MarkerShape::Circle)));
    }

    #[test]
    fn centred_legends_snap_to_corners() {
        assert!(matches!(legend_corner(LegendPosition::TopCenter), Corner::RightTop));
        assert!(matches!(legend_corner(LegendPosition::LeftMiddle), Corner::LeftTop));
        assert!(matches!(legend_corner(LegendPosition::BottomCenter), Corner::RightBottom));
    }
}
