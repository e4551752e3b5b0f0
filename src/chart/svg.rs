//! SVG bar charts.

use super::VehicleCounts;
use crate::common::xml::escape_xml;
use std::fmt::Write;

pub const DEFAULT_TITLE: &str = "Quantidade de OS por Veículo";
pub const DEFAULT_X_LABEL: &str = "Veículo";
pub const DEFAULT_Y_LABEL: &str = "Quantidade";

const BAR_COLOR: &str = "#1f77b4";
const GRID_COLOR: &str = "#dddddd";
const FONT: &str = "sans-serif";

/// Space around the plot area, in pixels.
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
/// Room for the rotated category labels and the axis label
const MARGIN_BOTTOM: f64 = 140.0;

/// Share of each category slot covered by its bar.
const BAR_FILL: f64 = 0.8;
/// Target number of ticks on the value axis.
const TICKS: usize = 5;

/// A vertical bar chart with one bar per category.
///
/// # Examples
///
/// ```
/// use ordem::chart::svg::BarChart;
///
/// let svg = BarChart::new("Ordens")
///     .with_bar("Gol", 2)
///     .with_bar("Uno", 1)
///     .to_svg();
/// assert!(svg.contains(">Gol</text>"));
/// ```
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, usize)>,
    pub width: f64,
    pub height: f64,
}

impl BarChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            bars: Vec::new(),
            width: 800.0,
            height: 500.0,
        }
    }

    /// The orders-per-vehicle chart.
    pub fn from_counts(counts: &VehicleCounts) -> Self {
        let mut chart = Self::new(DEFAULT_TITLE).with_axis_labels(DEFAULT_X_LABEL, DEFAULT_Y_LABEL);
        chart.bars = counts
            .iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        chart
    }

    pub fn with_axis_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_bar(mut self, label: impl Into<String>, value: usize) -> Self {
        self.bars.push((label.into(), value));
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Tick step and top of the value axis.
    fn value_scale(&self) -> (usize, usize) {
        let max = self.bars.iter().map(|(_, value)| *value).max().unwrap_or(0).max(1);
        let step = max.div_ceil(TICKS).max(1);
        (step, max.div_ceil(step) * step)
    }

    /// Render the chart as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(2048 + self.bars.len() * 256);
        let plot_width = (self.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_height = (self.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let baseline = MARGIN_TOP + plot_height;
        let (step, top) = self.value_scale();
        let scale = plot_height / top as f64;

        svg.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" width=""#);
        write_num(&mut svg, self.width);
        svg.push_str(r#"" height=""#);
        write_num(&mut svg, self.height);
        svg.push_str(r#"" viewBox="0 0 "#);
        write_num(&mut svg, self.width);
        svg.push(' ');
        write_num(&mut svg, self.height);
        let _ = write!(svg, r#"" font-family="{}">"#, FONT);
        svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);

        write_text(&mut svg, self.width / 2.0, MARGIN_TOP / 2.0, 18, "middle", None, &self.title);

        // Value axis: grid lines and tick labels
        for tick in (0..=top).step_by(step) {
            let y = baseline - tick as f64 * scale;
            svg.push_str(r#"<line x1=""#);
            write_num(&mut svg, MARGIN_LEFT);
            svg.push_str(r#"" y1=""#);
            write_num(&mut svg, y);
            svg.push_str(r#"" x2=""#);
            write_num(&mut svg, MARGIN_LEFT + plot_width);
            svg.push_str(r#"" y2=""#);
            write_num(&mut svg, y);
            let _ = write!(svg, r#"" stroke="{}"/>"#, GRID_COLOR);
            write_text(
                &mut svg,
                MARGIN_LEFT - 8.0,
                y + 4.0,
                12,
                "end",
                None,
                itoa::Buffer::new().format(tick),
            );
        }

        if !self.bars.is_empty() {
            let slot = plot_width / self.bars.len() as f64;
            let bar_width = slot * BAR_FILL;

            for (index, (label, value)) in self.bars.iter().enumerate() {
                let center = MARGIN_LEFT + slot * (index as f64 + 0.5);
                let height = *value as f64 * scale;

                svg.push_str(r#"<rect class="bar" x=""#);
                write_num(&mut svg, center - bar_width / 2.0);
                svg.push_str(r#"" y=""#);
                write_num(&mut svg, baseline - height);
                svg.push_str(r#"" width=""#);
                write_num(&mut svg, bar_width);
                svg.push_str(r#"" height=""#);
                write_num(&mut svg, height);
                let _ = write!(svg, r#"" fill="{}"><title>"#, BAR_COLOR);
                svg.push_str(&escape_xml(label));
                svg.push_str(": ");
                svg.push_str(itoa::Buffer::new().format(*value));
                svg.push_str("</title></rect>");

                // Category labels hang below the axis at 45 degrees
                write_text(&mut svg, center, baseline + 14.0, 12, "end", Some(-45.0), label);
            }
        }

        // Axes
        svg.push_str(r#"<path d="M "#);
        write_num(&mut svg, MARGIN_LEFT);
        svg.push(' ');
        write_num(&mut svg, MARGIN_TOP);
        svg.push_str(" V ");
        write_num(&mut svg, baseline);
        svg.push_str(" H ");
        write_num(&mut svg, MARGIN_LEFT + plot_width);
        svg.push_str(r#"" fill="none" stroke="black"/>"#);

        write_text(
            &mut svg,
            MARGIN_LEFT + plot_width / 2.0,
            self.height - 12.0,
            14,
            "middle",
            None,
            &self.x_label,
        );
        write_text(&mut svg, 18.0, MARGIN_TOP + plot_height / 2.0, 14, "middle", Some(-90.0), &self.y_label);

        svg.push_str("</svg>");
        svg
    }
}

/// Write a coordinate: integers without a fraction, anything else rounded
/// to two decimals.
fn write_num(buf: &mut String, n: f64) {
    if n.fract() == 0.0 && n.abs() < 1e10 {
        buf.push_str(itoa::Buffer::new().format(n as i64));
    } else {
        let rounded = (n * 100.0).round() / 100.0;
        let mut buffer = ryu::Buffer::new();
        let s = buffer.format(rounded);
        buf.push_str(s.trim_end_matches('0').trim_end_matches('.'));
    }
}

fn write_text(
    buf: &mut String,
    x: f64,
    y: f64,
    size: u32,
    anchor: &str,
    rotate: Option<f64>,
    text: &str,
) {
    buf.push_str(r#"<text x=""#);
    write_num(buf, x);
    buf.push_str(r#"" y=""#);
    write_num(buf, y);
    let _ = write!(buf, r#"" font-size="{}" text-anchor="{}""#, size, anchor);
    if let Some(angle) = rotate {
        buf.push_str(r#" transform="rotate("#);
        write_num(buf, angle);
        buf.push(' ');
        write_num(buf, x);
        buf.push(' ');
        write_num(buf, y);
        buf.push_str(r#")""#);
    }
    buf.push('>');
    buf.push_str(&escape_xml(text));
    buf.push_str("</text>");
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `height` attribute of every bar, in drawing order.
    fn bar_heights(svg: &str) -> Vec<f64> {
        svg.match_indices(r#"<rect class="bar""#)
            .map(|(start, _)| {
                let rest = &svg[start..];
                let value = rest.split(r#"height=""#).nth(1).unwrap();
                value[..value.find('"').unwrap()].parse().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_orders_per_vehicle_chart() {
        let mut counts = VehicleCounts::new();
        for vehicle in ["Gol", "Uno", "Gol"] {
            counts.add(vehicle);
        }
        let svg = BarChart::from_counts(&counts).to_svg();

        assert!(svg.contains(">Quantidade de OS por Veículo</text>"));
        assert!(svg.contains(">Veículo</text>"));
        assert!(svg.contains(">Quantidade</text>"));
        assert!(svg.contains(r#"transform="rotate(-45 "#));

        let heights = bar_heights(&svg);
        assert_eq!(heights.len(), 2);
        assert!((heights[0] - 2.0 * heights[1]).abs() < 0.05);
    }

    #[test]
    fn test_labels_are_escaped() {
        let svg = BarChart::new("A & B").with_bar("<Gol>", 1).to_svg();
        assert!(svg.contains(">A &amp; B</text>"));
        assert!(svg.contains(">&lt;Gol&gt;</text>"));
        assert!(!svg.contains("<Gol>"));
    }

    #[test]
    fn test_value_scale() {
        assert_eq!(BarChart::new("").value_scale(), (1, 1));
        assert_eq!(BarChart::new("").with_bar("a", 3).value_scale(), (1, 3));
        assert_eq!(BarChart::new("").with_bar("a", 12).value_scale(), (3, 12));
        assert_eq!(BarChart::new("").with_bar("a", 11).value_scale(), (3, 12));
    }

    #[test]
    fn test_write_num() {
        let mut buf = String::new();
        write_num(&mut buf, 10.0);
        buf.push(' ');
        write_num(&mut buf, 10.5);
        buf.push(' ');
        write_num(&mut buf, 10.126);
        buf.push(' ');
        write_num(&mut buf, -45.0);
        assert_eq!(buf, "10 10.5 10.13 -45");
    }
}
