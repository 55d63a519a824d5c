use serde::{Deserialize, Serialize};

/// ARGB color; alpha 0 is fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::argb(0x00, 0xFF, 0xFF, 0xFF);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
    pub const CORNFLOWER_BLUE: Color = Color::rgb(0x64, 0x95, 0xED);
    pub const DARK_BLUE: Color = Color::rgb(0x00, 0x00, 0x8B);
    pub const CHARTREUSE: Color = Color::rgb(0x7F, 0xFF, 0x00);
    pub const DARK_GREEN: Color = Color::rgb(0x00, 0x64, 0x00);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xFF, r, g, b }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDashedness {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineDashedness {
    /// Alternating on/off lengths in units of stroke thickness. Empty for solid.
    pub fn pattern(&self) -> &'static [f64] {
        match self {
            LineDashedness::Solid => &[],
            LineDashedness::Dashed => &[4.0, 4.0],
            LineDashedness::Dotted => &[1.0, 1.0],
            LineDashedness::DashDot => &[4.0, 2.0, 1.0, 2.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerType {
    #[default]
    None,
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    Plus,
    Star,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    LeftTop,
    LeftMiddle,
    LeftBottom,
    RightTop,
    RightMiddle,
    RightBottom,
}

impl LegendPosition {
    pub const ALL: [LegendPosition; 12] = [
        LegendPosition::TopLeft,
        LegendPosition::TopCenter,
        LegendPosition::TopRight,
        LegendPosition::BottomLeft,
        LegendPosition::BottomCenter,
        LegendPosition::BottomRight,
        LegendPosition::LeftTop,
        LegendPosition::LeftMiddle,
        LegendPosition::LeftBottom,
        LegendPosition::RightTop,
        LegendPosition::RightMiddle,
        LegendPosition::RightBottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LegendPosition::TopLeft => "top_left",
            LegendPosition::TopCenter => "top_center",
            LegendPosition::TopRight => "top_right",
            LegendPosition::BottomLeft => "bottom_left",
            LegendPosition::BottomCenter => "bottom_center",
            LegendPosition::BottomRight => "bottom_right",
            LegendPosition::LeftTop => "left_top",
            LegendPosition::LeftMiddle => "left_middle",
            LegendPosition::LeftBottom => "left_bottom",
            LegendPosition::RightTop => "right_top",
            LegendPosition::RightMiddle => "right_middle",
            LegendPosition::RightBottom => "right_bottom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|position| position.as_str() == normalized)
    }
}

/// Appearance of a single line series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub line_color: Color,
    pub dashedness: LineDashedness,
    pub thickness: f64,
    pub smooth: bool,
    pub marker_type: MarkerType,
    pub marker_fill: Color,
    pub marker_stroke: Color,
    pub marker_size: f64,
    pub marker_stroke_thickness: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            line_color: Color::TRANSPARENT,
            dashedness: LineDashedness::Solid,
            thickness: 0.0,
            smooth: false,
            marker_type: MarkerType::None,
            marker_fill: Color::TRANSPARENT,
            marker_stroke: Color::TRANSPARENT,
            marker_size: 0.0,
            marker_stroke_thickness: 0.0,
        }
    }
}

/// Ready-made styles matching the sample client's pages.
pub mod styles {
    use super::{Color, LineDashedness, LineStyle, MarkerType};

    fn line(color: Color, dashedness: LineDashedness, thickness: f64, smooth: bool) -> LineStyle {
        LineStyle {
            line_color: color,
            dashedness,
            thickness,
            smooth,
            ..LineStyle::default()
        }
    }

    fn markers(
        marker_type: MarkerType,
        fill: Color,
        stroke: Color,
        size: f64,
        stroke_thickness: f64,
    ) -> LineStyle {
        LineStyle {
            line_color: Color::TRANSPARENT,
            marker_type,
            marker_fill: fill,
            marker_stroke: stroke,
            marker_size: size,
            marker_stroke_thickness: stroke_thickness,
            ..LineStyle::default()
        }
    }

    pub fn red_dash_dot_line() -> LineStyle {
        line(Color::rgb(0xFF, 0x00, 0x00), LineDashedness::DashDot, 3.0, true)
    }

    pub fn red_line() -> LineStyle {
        line(Color::rgb(0xFF, 0x00, 0x00), LineDashedness::Solid, 3.0, false)
    }

    pub fn green_line() -> LineStyle {
        line(Color::rgb(0x00, 0xBB, 0x00), LineDashedness::Dashed, 3.0, true)
    }

    pub fn blue_line() -> LineStyle {
        line(Color::rgb(0x00, 0x00, 0xFF), LineDashedness::Dotted, 3.0, true)
    }

    pub fn slate_blue_line() -> LineStyle {
        line(Color::rgb(0x48, 0x3D, 0x8B), LineDashedness::Solid, 3.0, true)
    }

    pub fn red_dash_dot() -> LineStyle {
        line(Color::rgb(0xDC, 0x14, 0x3C), LineDashedness::DashDot, 8.0, true)
    }

    pub fn blue_with_markers() -> LineStyle {
        LineStyle {
            line_color: Color::BLUE,
            dashedness: LineDashedness::Solid,
            thickness: 2.0,
            smooth: false,
            marker_type: MarkerType::Circle,
            marker_fill: Color::CORNFLOWER_BLUE,
            marker_stroke: Color::DARK_BLUE,
            marker_size: 4.0,
            marker_stroke_thickness: 2.0,
        }
    }

    pub fn blue_star_markers() -> LineStyle {
        markers(
            MarkerType::Star,
            Color::TRANSPARENT,
            Color::argb(0xAA, 0x00, 0x00, 0xFF),
            5.0,
            2.0,
        )
    }

    pub fn red_cross_markers() -> LineStyle {
        markers(
            MarkerType::Cross,
            Color::TRANSPARENT,
            Color::argb(0xAA, 0xFF, 0x00, 0x00),
            5.0,
            2.0,
        )
    }

    pub fn transparent_line() -> LineStyle {
        line(Color::argb(0x00, 0x00, 0x00, 0x00), LineDashedness::Solid, 10.0, true)
    }

    pub fn green_diamond_marker() -> LineStyle {
        markers(
            MarkerType::Diamond,
            Color::CHARTREUSE,
            Color::DARK_GREEN,
            5.0,
            2.0,
        )
    }

    pub fn diamond_marker() -> LineStyle {
        markers(
            MarkerType::Diamond,
            Color::rgb(0x00, 0xFF, 0xFF),
            Color::rgb(0x00, 0x00, 0xFF),
            4.0,
            3.0,
        )
    }

    pub fn bottom_line_color() -> LineStyle {
        line(Color::rgb(0xFF, 0x00, 0x80), LineDashedness::Solid, 10.0, false)
    }

    pub fn top_line_color() -> LineStyle {
        line(Color::rgb(0x00, 0xFF, 0xFF), LineDashedness::Solid, 4.0, false)
    }

    pub fn error_marker() -> LineStyle {
        LineStyle {
            line_color: Color::rgb(0xFF, 0x00, 0x00),
            dashedness: LineDashedness::Solid,
            thickness: 5.0,
            smooth: false,
            marker_type: MarkerType::Circle,
            marker_fill: Color::rgb(0x00, 0xFF, 0xFF),
            marker_stroke: Color::TRANSPARENT,
            marker_size: 5.0,
            marker_stroke_thickness: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_position_names_round_trip() {
        for position in LegendPosition::ALL {
            assert_eq!(LegendPosition::from_name(position.as_str()), Some(position));
        }
        assert_eq!(
            LegendPosition::from_name("Bottom-Right"),
            Some(LegendPosition::BottomRight)
        );
        assert_eq!(LegendPosition::from_name("middle"), None);
    }

    #[test]
    fn partial_style_json_uses_defaults() {
        let style: LineStyle =
            serde_json::from_str(r#"{"thickness": 2.5, "dashedness": "dash_dot"}"#).unwrap();
        assert_eq!(style.thickness, 2.5);
        assert_eq!(style.dashedness, LineDashedness::DashDot);
        assert_eq!(style.marker_type, MarkerType::None);
        assert!(style.line_color.is_transparent());
    }
}
