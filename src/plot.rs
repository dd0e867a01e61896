//! Renders an extracted spectrum as a line chart image.
//!
//! Every call owns its drawing area locally; there is no shared figure
//! state between renders.

use std::path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::spectrum::ArrayPair;

/// The ways rendering a spectrum image can fail
#[derive(Debug, Error)]
pub enum RenderError {
    /// Drawing or writing the image failed inside the plotting backend
    #[error("Failed to render the spectrum image: {0}")]
    Backend(String),
}

/**
The layout of a rendered spectrum chart.

The defaults reproduce the conventional mass spectrum rendering: a
1000x600 pixel chart titled "Mass Spectrum" with labeled axes, grid
lines, and a solid blue trace.
*/
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            title: "Mass Spectrum".to_string(),
            x_label: "Mass-to-Charge Ratio (m/z)".to_string(),
            y_label: "Intensity".to_string(),
        }
    }
}

/// Render `arrays` to a PNG file at `path` with the default [`PlotConfig`],
/// overwriting any existing file there
pub fn draw_png_file<P>(arrays: &ArrayPair, path: P) -> Result<(), RenderError>
where
    P: AsRef<path::Path>,
{
    draw_png_file_with(&PlotConfig::default(), arrays, path)
}

/// Render `arrays` to a PNG file at `path` with an explicit [`PlotConfig`]
pub fn draw_png_file_with<P>(
    config: &PlotConfig,
    arrays: &ArrayPair,
    path: P,
) -> Result<(), RenderError>
where
    P: AsRef<path::Path>,
{
    let backend = BitMapBackend::new(&path, (config.width, config.height));
    draw_spectrum(config, arrays, backend.into_drawing_area())
}

/// Render `arrays` to an SVG file at `path` with the default [`PlotConfig`]
pub fn draw_svg_file<P>(arrays: &ArrayPair, path: P) -> Result<(), RenderError>
where
    P: AsRef<path::Path>,
{
    draw_svg_file_with(&PlotConfig::default(), arrays, path)
}

/// Render `arrays` to an SVG file at `path` with an explicit [`PlotConfig`]
pub fn draw_svg_file_with<P>(
    config: &PlotConfig,
    arrays: &ArrayPair,
    path: P,
) -> Result<(), RenderError>
where
    P: AsRef<path::Path>,
{
    let backend = SVGBackend::new(&path, (config.width, config.height));
    draw_spectrum(config, arrays, backend.into_drawing_area())
}

// The m/z axis must be a non-degenerate interval or the chart cannot be
// built, so empty input gets a unit domain and a lone point is padded.
fn axis_bounds(arrays: &ArrayPair) -> ((f64, f64), f32) {
    let (xmin, xmax) = match arrays.mz_range() {
        Some((lo, hi)) if lo < hi => (lo, hi),
        Some((lo, hi)) => (lo - 1.0, hi + 1.0),
        None => (0.0, 1.0),
    };
    let ymax = match arrays.base_peak() {
        Some((_, intensity)) if intensity > 0.0 => intensity,
        _ => 1.0,
    };
    ((xmin, xmax), ymax)
}

fn draw_spectrum<DB>(
    config: &PlotConfig,
    arrays: &ArrayPair,
    root: DrawingArea<DB, Shift>,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    let ((xmin, xmax), ymax) = axis_bounds(arrays);

    root.fill(&WHITE).map_err(|e| RenderError::Backend(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xmin..xmax, 0.0f32..ymax)
        .map_err(|e| RenderError::Backend(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(config.x_label.as_str())
        .axis_desc_style(("sans-serif", 16).into_font())
        .y_desc(config.y_label.as_str())
        .draw()
        .map_err(|e| RenderError::Backend(e.to_string()))?;

    let series = LineSeries::new(
        arrays.iter(),
        ShapeStyle {
            color: BLUE.mix(1.0),
            filled: false,
            stroke_width: 1,
        },
    );

    chart
        .draw_series(series)
        .map_err(|e| RenderError::Backend(e.to_string()))?;

    root.present().map_err(|e| RenderError::Backend(e.to_string()))?;

    Ok(())
}
