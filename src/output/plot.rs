//! Boxplot rendering of latency summaries
//!
//! Each box is drawn from the quartiles of the four summary values
//! `[min, med, avg, max]`, with a triangle marking their mean.

use crate::defaults::{GRAPH_HEIGHT, GRAPH_WIDTH};
use crate::error::{AppError, Result};
use crate::models::{Hop, LatencySummary};
use crate::stats;
use crate::types::ImageFormat;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::register_font;
use std::path::Path;
use std::sync::OnceLock;
use svg2pdf::{usvg, ConversionOptions, PageOptions};

/// One labelled box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxplotGroup {
    pub label: String,
    /// `[min, med, avg, max]`
    pub values: [f64; 4],
}

impl BoxplotGroup {
    pub fn from_summary<L: Into<String>>(label: L, summary: &LatencySummary) -> Self {
        Self {
            label: label.into(),
            values: summary.values(),
        }
    }

    /// One box per hop, labelled with the hop number
    pub fn from_hops(hops: &[Hop]) -> Vec<Self> {
        hops.iter()
            .map(|hop| Self::from_summary(hop.hop.to_string(), &hop.summary()))
            .collect()
    }

    /// Mean of the four plotted values
    pub fn mean(&self) -> f64 {
        stats::mean(&self.values).unwrap_or(self.values[2])
    }
}

/// Chart title and axis labels
#[derive(Debug, Clone, PartialEq)]
pub struct BoxplotStyle {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

impl BoxplotStyle {
    pub fn ping() -> Self {
        Self {
            title: "Ping Latency Distribution",
            x_label: "Ping Runs",
            y_label: "Latency (ms)",
        }
    }

    pub fn traceroute() -> Self {
        Self {
            title: "Latency Distribution per Hop",
            x_label: "Hop Number",
            y_label: "Latency (ms)",
        }
    }
}

/// Font used for every graph, registered with plotters as `sans-serif`
const GRAPH_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const GRAPH_FONT_FAMILY: &str = "DejaVu Sans";

/// Register the embedded font once per process
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();

    let registered = *REGISTERED.get_or_init(|| {
        register_font("sans-serif", FontStyle::Normal, GRAPH_FONT).is_ok()
    });
    if registered {
        Ok(())
    } else {
        Err(AppError::render("Embedded graph font could not be loaded"))
    }
}

/// Render `groups` to `path`; the backend follows the file extension
pub fn render_boxplot(groups: &[BoxplotGroup], style: &BoxplotStyle, path: &Path) -> Result<()> {
    if groups.is_empty() {
        return Err(AppError::render("Nothing to plot"));
    }
    let format = ImageFormat::from_path(path)?;

    let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();

    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, (GRAPH_WIDTH, GRAPH_HEIGHT)).into_drawing_area();
            draw(&root, groups, &labels, style)?;
            root.present().map_err(|e| render_error(path, e))
        }
        ImageFormat::Bitmap => {
            let root = BitMapBackend::new(path, (GRAPH_WIDTH, GRAPH_HEIGHT)).into_drawing_area();
            draw(&root, groups, &labels, style)?;
            root.present().map_err(|e| render_error(path, e))
        }
        ImageFormat::Pdf => {
            let svg = render_svg_string(groups, &labels, style)?;
            let pdf = svg_to_pdf(&svg).map_err(|e| render_error(path, e))?;
            std::fs::write(path, pdf)
                .map_err(|e| AppError::io(format!("Failed to write {}: {}", path.display(), e)))
        }
    }
}

/// SVG document kept in memory, used as the source of PDF output
fn render_svg_string(groups: &[BoxplotGroup], labels: &[String], style: &BoxplotStyle) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (GRAPH_WIDTH, GRAPH_HEIGHT)).into_drawing_area();
        draw(&root, groups, labels, style)?;
        root.present().map_err(|e| AppError::render(e.to_string()))?;
    }
    Ok(svg)
}

/// Convert an SVG document to PDF bytes, resolving `sans-serif` to the embedded font
fn svg_to_pdf(svg: &str) -> std::result::Result<Vec<u8>, String> {
    let mut options = usvg::Options::default();
    let fontdb = options.fontdb_mut();
    fontdb.load_font_data(GRAPH_FONT.to_vec());
    fontdb.set_sans_serif_family(GRAPH_FONT_FAMILY);

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| e.to_string())?;
    svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| format!("{:?}", e))
}

fn render_error<E: std::fmt::Display>(path: &Path, e: E) -> AppError {
    AppError::render(format!("Failed to render {}: {}", path.display(), e))
}

/// Lower and upper y bounds with some headroom
fn value_range(groups: &[BoxplotGroup]) -> (f32, f32) {
    let all: Vec<f64> = groups.iter().flat_map(|g| g.values).collect();
    let lo = stats::min(&all).unwrap_or(0.0);
    let hi = stats::max(&all).unwrap_or(1.0);
    let pad = ((hi - lo) * 0.1).max(1.0);
    ((lo - pad).max(0.0) as f32, (hi + pad) as f32)
}

/// Draw the chart; `labels` must outlive the chart built on `root`
fn draw<'a, DB>(
    root: &'a DrawingArea<DB, Shift>,
    groups: &[BoxplotGroup],
    labels: &'a [String],
    style: &BoxplotStyle,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
{
    ensure_font()?;
    let map = |e: DrawingAreaErrorKind<DB::ErrorType>| AppError::render(e.to_string());

    root.fill(&WHITE).map_err(map)?;

    let (lo, hi) = value_range(groups);

    let mut chart = ChartBuilder::on(root)
        .caption(style.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(labels.into_segmented(), lo..hi)
        .map_err(map)?;

    chart
        .configure_mesh()
        .x_desc(style.x_label)
        .y_desc(style.y_label)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(label) | SegmentValue::Exact(label) => label.to_string(),
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(map)?;

    chart
        .draw_series(groups.iter().zip(labels.iter()).map(|(group, label)| {
            let quartiles = Quartiles::new(&group.values[..]);
            Boxplot::new_vertical(SegmentValue::CenterOf(label), &quartiles).style(BLUE)
        }))
        .map_err(map)?;

    chart
        .draw_series(groups.iter().zip(labels.iter()).map(|(group, label)| {
            EmptyElement::at((SegmentValue::CenterOf(label), group.mean() as f32))
                + TriangleMarker::new((0, 0), 6, GREEN.filled())
        }))
        .map_err(map)?;

    Ok(())
}
