//! Plotters drawing primitives
//!
//! Each function renders one kind of figure to a PNG at the given path on
//! a fresh backend, so concurrent callers never share canvas state. All
//! take pre-aggregated data; nothing here counts or sorts. Empty input
//! degrades to [`empty_chart`], which still writes a valid artifact.

use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::Path;

use crate::stats::{CrossTab, GroupedCounts, Histogram};

/// Pixel size of every artifact.
pub const CHART_DIMENSIONS: (u32, u32) = (1024, 768);

/// Fixed series palette; chart colors never depend on input order beyond
/// the aggregation orderings themselves.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
    RGBColor(218, 139, 195),
    RGBColor(140, 140, 140),
    RGBColor(204, 185, 116),
    RGBColor(100, 181, 205),
];

/// Pie start angle in degrees.
pub const PIE_START_ANGLE: f64 = 140.0;

const BAR_COLOR: RGBColor = PALETTE[0];
const KDE_COLOR: RGBColor = PALETTE[1];

pub(crate) type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Vertical bar chart with one bar per labelled value
pub fn bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    rotated_labels: bool,
) -> DrawResult {
    if bars.is_empty() {
        return empty_chart(path, title);
    }

    let root = BitMapBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<&str> = bars.iter().map(|(name, _)| name.as_str()).collect();
    let y_max = bars
        .iter()
        .map(|(_, value)| *value)
        .fold(0f64, f64::max)
        .max(1.0)
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(if rotated_labels { 170 } else { 50 })
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..bars.len() as f64 - 0.5, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(bars.len())
        .x_label_style(label_font(rotated_labels))
        .x_label_formatter(&|x| category_label(*x, &names))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        Rectangle::new(
            [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, *value)],
            BAR_COLOR.filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Clustered bar chart: one bar cluster per category, one color per series
pub fn grouped_bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    grouped: &GroupedCounts,
    rotated_labels: bool,
) -> DrawResult {
    if grouped.categories.is_empty() || grouped.series.is_empty() {
        return empty_chart(path, title);
    }

    let root = BitMapBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<&str> = grouped
        .categories
        .iter()
        .map(|name| name.as_str())
        .collect();
    let y_max = (grouped.max_count() as f64).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(if rotated_labels { 170 } else { 50 })
        .y_label_area_size(60)
        .build_cartesian_2d(
            -0.5f64..grouped.categories.len() as f64 - 0.5,
            0f64..y_max,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(grouped.categories.len())
        .x_label_style(label_font(rotated_labels))
        .x_label_formatter(&|x| category_label(*x, &names))
        .draw()?;

    let bar_width = 0.8 / grouped.series.len() as f64;
    for (si, series_name) in grouped.series.iter().enumerate() {
        let color = PALETTE[si % PALETTE.len()];
        chart
            .draw_series(grouped.counts.iter().enumerate().map(|(ci, row)| {
                let x0 = ci as f64 - 0.4 + si as f64 * bar_width;
                Rectangle::new(
                    [(x0, 0.0), (x0 + bar_width * 0.9, row[si] as f64)],
                    color.filled(),
                )
            }))?
            .label(series_name)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Histogram with a scaled density curve overlaid
///
/// The density estimate is a probability density; it is multiplied by
/// `samples * bucket_width` so the curve rides over the count bars the
/// way a seaborn `kde=True` histogram does.
pub fn histogram_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    hist: &Histogram,
    kde: &[(f64, f64)],
    samples: usize,
) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
    root.fill(&WHITE)?;

    let scale = samples as f64 * hist.bucket_width;
    let curve: Vec<(f64, f64)> = kde
        .iter()
        .map(|(x, density)| (*x, density * scale))
        .collect();

    let x_lo = curve
        .first()
        .map(|(x, _)| x.min(hist.start))
        .unwrap_or(hist.start);
    let x_hi = curve
        .last()
        .map(|(x, _)| x.max(hist.end()))
        .unwrap_or_else(|| hist.end());
    let curve_max = curve.iter().map(|(_, y)| *y).fold(0f64, f64::max);
    let y_max = (hist.max_count() as f64).max(curve_max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_max)?;

    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    chart.draw_series(hist.counts.iter().enumerate().map(|(i, count)| {
        let left = hist.start + i as f64 * hist.bucket_width;
        Rectangle::new(
            [(left, 0.0), (left + hist.bucket_width, *count as f64)],
            BAR_COLOR.mix(0.6).filled(),
        )
    }))?;

    chart.draw_series(LineSeries::new(
        curve,
        ShapeStyle::from(&KDE_COLOR).stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

/// Annotated heatmap over a contingency table
///
/// Cell shade scales with the count; every cell is annotated with its
/// value. The first table row renders at the top.
pub fn heatmap_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    table: &CrossTab,
) -> DrawResult {
    if table.rows.is_empty() || table.cols.is_empty() {
        return empty_chart(path, title);
    }

    let root = BitMapBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
    root.fill(&WHITE)?;

    let row_count = table.rows.len();
    let max = table.max_count();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(
            -0.5f64..table.cols.len() as f64 - 0.5,
            -0.5f64..row_count as f64 - 0.5,
        )?;

    let col_names: Vec<&str> = table.cols.iter().map(|name| name.as_str()).collect();
    let row_names: Vec<&str> = table.rows.iter().map(|name| name.as_str()).collect();

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(table.cols.len())
        .y_labels(row_count)
        .x_label_formatter(&|x| category_label(*x, &col_names))
        .y_label_formatter(&|y| {
            let rounded = y.round();
            if (*y - rounded).abs() > 0.001 || rounded < 0.0 {
                return String::new();
            }
            // Flip so the first row sits at the top
            row_names
                .get(row_count - 1 - (rounded as usize).min(row_count - 1))
                .map(|name| (*name).to_string())
                .unwrap_or_default()
        })
        .draw()?;

    for (ri, row) in table.counts.iter().enumerate() {
        let cy = (row_count - 1 - ri) as f64;
        for (ci, count) in row.iter().enumerate() {
            let t = if max > 0 { *count as f64 / max as f64 } else { 0.0 };
            let cx = ci as f64;

            chart.draw_series(std::iter::once(Rectangle::new(
                [(cx - 0.5, cy - 0.5), (cx + 0.5, cy + 0.5)],
                heat_color(t).filled(),
            )))?;

            let text_color = if t > 0.5 { WHITE } else { BLACK };
            let style = TextStyle::from(("sans-serif", 20).into_font())
                .color(&text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(std::iter::once(Text::new(
                count.to_string(),
                (cx, cy),
                style,
            )))?;
        }
    }

    root.present()?;
    Ok(())
}

/// Line chart over ordered labelled points, with point markers
pub fn line_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[(String, u64)],
) -> DrawResult {
    if points.is_empty() {
        return empty_chart(path, title);
    }

    let root = BitMapBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<&str> = points.iter().map(|(name, _)| name.as_str()).collect();
    let y_max = points
        .iter()
        .map(|(_, value)| *value)
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..points.len() as f64 - 0.5, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(points.len().min(12))
        .x_label_formatter(&|x| category_label(*x, &names))
        .draw()?;

    chart.draw_series(LineSeries::new(
        points
            .iter()
            .enumerate()
            .map(|(i, (_, value))| (i as f64, *value as f64)),
        ShapeStyle::from(&BAR_COLOR).stroke_width(2),
    ))?;

    chart.draw_series(points.iter().enumerate().map(|(i, (_, value))| {
        Circle::new((i as f64, *value as f64), 4, BAR_COLOR.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Pie chart with per-slice percentage labels (one decimal place)
pub fn pie_chart(path: &Path, title: &str, slices: &[(String, u64)]) -> DrawResult {
    let total: u64 = slices.iter().map(|(_, value)| value).sum();
    if slices.is_empty() || total == 0 {
        return empty_chart(path, title);
    }

    let root = BitMapBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
    root.fill(&WHITE)?;

    let (width, height) = CHART_DIMENSIONS;
    let title_style = TextStyle::from(("sans-serif", 28).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(
        title.to_string(),
        ((width / 2) as i32, 20),
        title_style,
    ))?;

    let center = ((width / 2) as i32, (height / 2) as i32 + 20);
    let radius = (width.min(height) as f64) * 0.32;
    let weights: Vec<f64> = slices.iter().map(|(_, value)| *value as f64).collect();
    let labels: Vec<String> = slices.iter().map(|(name, _)| name.clone()).collect();
    let colors: Vec<RGBColor> = (0..slices.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &weights, &colors, &labels);
    pie.start_angle(PIE_START_ANGLE);
    pie.label_style(("sans-serif", 22).into_font());
    pie.percentages(("sans-serif", 18).into_font().color(&BLACK));
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}

/// Axes-only figure for charts whose input aggregated to nothing
pub fn empty_chart(path: &Path, title: &str) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)?;

    chart.configure_mesh().disable_mesh().draw()?;

    root.present()?;
    Ok(())
}

/// Label for integer category positions; blank elsewhere
fn category_label(x: f64, names: &[&str]) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 0.001 || rounded < 0.0 {
        return String::new();
    }
    names
        .get(rounded as usize)
        .map(|name| (*name).to_string())
        .unwrap_or_default()
}

fn label_font(rotated: bool) -> FontDesc<'static> {
    if rotated {
        ("sans-serif", 12).into_font().transform(FontTransform::Rotate90)
    } else {
        ("sans-serif", 13).into_font()
    }
}

/// White-to-dark-blue ramp for heatmap cells, `t` in [0, 1]
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(247.0, 8.0), lerp(251.0, 48.0), lerp(255.0, 107.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn assert_png_written(path: &Path) {
        let metadata = std::fs::metadata(path).unwrap();
        assert!(metadata.len() > 0, "artifact {} is empty", path.display());
    }

    #[test]
    fn test_bar_chart_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bars.png");
        let bars = vec![("Male".to_string(), 3.0), ("Female".to_string(), 5.0)];

        bar_chart(&path, "Bars", "Gender", "Count", &bars, false).unwrap();
        assert_png_written(&path);
    }

    #[test]
    fn test_empty_bar_chart_still_writes_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");

        bar_chart(&path, "Nothing", "X", "Y", &[], false).unwrap();
        assert_png_written(&path);
    }

    #[test]
    fn test_pie_chart_zero_total_degrades() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pie.png");
        let slices = vec![("On Time".to_string(), 0u64)];

        pie_chart(&path, "Statuses", &slices).unwrap();
        assert_png_written(&path);
    }

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0), RGBColor(247, 251, 255));
        assert_eq!(heat_color(1.0), RGBColor(8, 48, 107));
    }
}
