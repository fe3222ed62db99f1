//! Visualization: render the two projection charts to **PNG** or **SVG**.
//!
//! - Daily chart: observed daily vaccinations (markers) with the fitted trend line
//! - Cumulative chart: projected fully vaccinated people with the threshold line
//! - Office palette colors, auto-scaled Y axis (thousands/millions/billions)
//! - Locale-aware tick labels (`30,000` vs `30.000`) on unscaled axes
//!
//! The backend is chosen from the output extension: `.svg` renders with
//! `SVGBackend`, anything else with `BitMapBackend`.

pub mod fonts;
pub mod text;
pub mod types;
pub mod util;

pub use fonts::ensure_fonts_registered;
pub use types::{ChartKind, ChartOptions};

use crate::error::{ProjectionError, Result};
use crate::models::{ProjectionCurve, TimeSeries, TrendLine};
use crate::projection::Projection;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use text::truncate_to_width;
use util::{
    choose_axis_scale, compute_left_label_area_px, format_tick, map_locale, office_color,
    padded_range, scaled_axis_title,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayerKind {
    Line,
    Scatter,
}

/// One labelled series on a chart.
#[derive(Debug, Clone)]
struct Layer {
    label: String,
    kind: LayerKind,
    color: RGBAColor,
    points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
struct ChartData {
    x_desc: String,
    y_desc: &'static str,
    layers: Vec<Layer>,
}

/// Observed daily vaccinations against the fitted trend over the sample grid.
pub fn plot_daily_rate<P: AsRef<Path>>(
    series: &TimeSeries,
    trend: &TrendLine,
    projection: &Projection,
    x_desc: &str,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    let observed: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|p| (p.day_offset as f64, p.daily_vaccinations as f64))
        .collect();
    let fitted: Vec<(f64, f64)> = projection
        .x
        .iter()
        .copied()
        .zip(projection.yhat.iter().copied())
        .collect();

    let chart = ChartData {
        x_desc: x_desc.to_string(),
        y_desc: "Daily vaccinations",
        layers: vec![
            Layer {
                label: "True daily vaccinations".into(),
                kind: LayerKind::Scatter,
                color: office_color(0),
                points: observed,
            },
            Layer {
                label: trend.equation(),
                kind: LayerKind::Line,
                color: RED.to_rgba(),
                points: fitted,
            },
        ],
    };
    render(&chart, out_path.as_ref(), opts)
}

/// Projected cumulative fully vaccinated people with a horizontal threshold line.
pub fn plot_cumulative<P: AsRef<Path>>(
    curve: &ProjectionCurve,
    threshold: f64,
    threshold_label: &str,
    x_desc: &str,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    let projected: Vec<(f64, f64)> = curve
        .points
        .iter()
        .map(|p| (p.day, p.fully_vaccinated))
        .collect();
    let threshold_line: Vec<(f64, f64)> = projected.iter().map(|(x, _)| (*x, threshold)).collect();

    let chart = ChartData {
        x_desc: x_desc.to_string(),
        y_desc: "Fully vaccinated people",
        layers: vec![
            Layer {
                label: "Projected Vaccinations".into(),
                kind: LayerKind::Line,
                color: office_color(0),
                points: projected,
            },
            Layer {
                label: threshold_label.to_string(),
                kind: LayerKind::Line,
                color: office_color(1),
                points: threshold_line,
            },
        ],
    };
    render(&chart, out_path.as_ref(), opts)
}

fn render(chart: &ChartData, out_path: &Path, opts: &ChartOptions) -> Result<()> {
    let finite = || {
        chart
            .layers
            .iter()
            .flat_map(|l| l.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    };
    if finite().next().is_none() {
        return Err(ProjectionError::Render("no data to plot".into()));
    }
    ensure_fonts_registered(opts.font_path.as_deref())?;

    let fold = |f: fn(&(f64, f64)) -> f64| {
        finite().map(f).fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
    };
    let (mut x_min, mut x_max) = fold(|p| p.0);
    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    let (y_lo, y_hi) = fold(|p| p.1);
    let (y_min, y_max) = padded_range(y_lo, y_hi);

    let path_string = out_path.to_string_lossy().into_owned();
    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root =
            SVGBackend::new(path_string.as_str(), (opts.width, opts.height)).into_drawing_area();
        draw_chart(root, chart, (x_min, x_max), (y_min, y_max), opts)?;
    } else {
        let root =
            BitMapBackend::new(path_string.as_str(), (opts.width, opts.height)).into_drawing_area();
        draw_chart(root, chart, (x_min, x_max), (y_min, y_max), opts)?;
    }
    log::info!("Wrote chart {}", out_path.display());
    Ok(())
}

fn render_err<E: std::fmt::Debug>(e: E) -> ProjectionError {
    ProjectionError::Render(format!("{e:?}"))
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    chart: &ChartData,
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
    opts: &ChartOptions,
) -> Result<()>
where
    DB: DrawingBackend,
{
    const MARGIN: u32 = 16;
    const Y_LABELS: usize = 10;

    root.fill(&WHITE).map_err(render_err)?;

    let locale = map_locale(&opts.locale);
    let (yscale, scale_word) = choose_axis_scale(y_min.abs().max(y_max.abs()));
    let scaled = yscale != 1.0;
    let y_title = scaled_axis_title(chart.y_desc, scale_word);
    let left_label_px =
        compute_left_label_area_px(y_min / yscale, y_max / yscale, Y_LABELS, 12, scaled, locale);

    let mut cc = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption(&opts.title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, left_label_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(x_min..x_max, (y_min / yscale)..(y_max / yscale))
        .map_err(render_err)?;

    let x_label_fmt = |x: &f64| format!("{:.0}", x);
    let y_label_fmt = |v: &f64| format_tick(*v, scaled, locale);

    cc.configure_mesh()
        .x_desc(chart.x_desc.as_str())
        .y_desc(y_title)
        .x_labels(12)
        .y_labels(Y_LABELS)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(render_err)?;

    let max_label_px = (opts.width as f64 * 0.45) as u32;
    for layer in &chart.layers {
        let color = layer.color;
        let pts: Vec<(f64, f64)> = layer
            .points
            .iter()
            .map(|(x, y)| (*x, *y / yscale))
            .collect();

        let anno = match layer.kind {
            LayerKind::Line => {
                let style = ShapeStyle {
                    color,
                    filled: false,
                    stroke_width: 2,
                };
                cc.draw_series(LineSeries::new(pts, style))
                    .map_err(render_err)?
            }
            LayerKind::Scatter => cc
                .draw_series(
                    pts.into_iter()
                        .map(|(x, y)| Circle::new((x, y), 3, color.filled())),
                )
                .map_err(render_err)?,
        };
        anno.label(truncate_to_width(&layer.label, 14, max_label_px))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    cc.configure_series_labels()
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 14))
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
