// ─────────────────────────────────────────────────────────────────────
// PMPL — Chart Primitives
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! SVG charts on top of plotters: line/point plots, density histograms,
//! field heatmaps, histogram panels and scatter frames.

use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;
use pmpl_math::stats::Histogram;
use pmpl_types::error::{PmplError, PmplResult};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CHART_SIZE: (u32, u32) = (800, 600);
const FONT: &str = "sans-serif";

/// Series colours in draw order.
pub const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

pub(crate) fn plot_error<E: std::fmt::Display>(e: E) -> PmplError {
    PmplError::Plot(e.to_string())
}

fn palette(k: usize) -> RGBColor {
    PALETTE[k % PALETTE.len()]
}

fn sci_label(v: &f64) -> String {
    format!("{v:.1e}")
}

/// Padded `[min, max]` of the finite values, `None` when there are none.
pub fn data_range(values: impl IntoIterator<Item = f64>) -> Option<Range<f64>> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return None;
    }
    let span = hi - lo;
    if span == 0.0 {
        let pad = if lo == 0.0 { 0.5 } else { 0.05 * lo.abs() };
        return Some(lo - pad..hi + pad);
    }
    Some(lo - 0.05 * span..hi + 0.05 * span)
}

fn inside(p: (f64, f64), x: &Range<f64>, y: &Range<f64>) -> bool {
    p.0 >= x.start && p.0 <= x.end && p.1 >= y.start && p.1 <= y.end
}

/// Split a polyline into the runs of consecutive points inside the window.
pub fn visible_runs(points: &[(f64, f64)], x: &Range<f64>, y: &Range<f64>) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &p in points {
        if p.0.is_finite() && p.1.is_finite() && inside(p, x, y) {
            current.push(p);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    Points,
}

#[derive(Debug, Clone)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

/// Cartesian chart of line and point series.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub x_range: Option<Range<f64>>,
    pub y_range: Option<Range<f64>>,
    pub scientific: bool,
    pub grid: bool,
}

impl LineChart {
    pub fn new(title: impl Into<String>) -> Self {
        LineChart {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            series: Vec::new(),
            x_range: None,
            y_range: None,
            scientific: false,
            grid: false,
        }
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn line(mut self, label: Option<&str>, points: Vec<(f64, f64)>) -> Self {
        self.series.push(Series {
            label: label.map(str::to_string),
            points,
            style: SeriesStyle::Line,
        });
        self
    }

    pub fn points(mut self, label: Option<&str>, points: Vec<(f64, f64)>) -> Self {
        self.series.push(Series {
            label: label.map(str::to_string),
            points,
            style: SeriesStyle::Points,
        });
        self
    }

    pub fn x_range(mut self, range: Range<f64>) -> Self {
        self.x_range = Some(range);
        self
    }

    pub fn y_range(mut self, range: Range<f64>) -> Self {
        self.y_range = Some(range);
        self
    }

    pub fn scientific(mut self) -> Self {
        self.scientific = true;
        self
    }

    pub fn grid(mut self) -> Self {
        self.grid = true;
        self
    }

    fn ranges(&self) -> (Range<f64>, Range<f64>) {
        let all = || self.series.iter().flat_map(|s| s.points.iter().copied());
        let x = self
            .x_range
            .clone()
            .or_else(|| data_range(all().map(|p| p.0)))
            .unwrap_or(0.0..1.0);
        let y = self
            .y_range
            .clone()
            .or_else(|| data_range(all().map(|p| p.1)))
            .unwrap_or(0.0..1.0);
        (x, y)
    }

    pub fn render(&self, path: &Path) -> PmplResult<()> {
        let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        self.draw_on(&root)?;
        root.present().map_err(plot_error)?;
        debug!(path = %path.display(), "chart written");
        Ok(())
    }

    pub fn draw_on<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> PmplResult<()> {
        let (x, y) = self.ranges();
        let mut chart = ChartBuilder::on(area)
            .caption(&self.title, (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x.clone(), y.clone())
            .map_err(plot_error)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.x_label.as_str()).y_desc(self.y_label.as_str());
        if self.scientific {
            mesh.x_label_formatter(&sci_label).y_label_formatter(&sci_label);
        }
        if !self.grid {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(plot_error)?;

        let mut labelled = false;
        for (k, series) in self.series.iter().enumerate() {
            let color = palette(k);
            let runs = match series.style {
                SeriesStyle::Line => visible_runs(&series.points, &x, &y),
                SeriesStyle::Points => vec![series
                    .points
                    .iter()
                    .copied()
                    .filter(|&p| p.0.is_finite() && p.1.is_finite() && inside(p, &x, &y))
                    .collect()],
            };
            for (r, run) in runs.into_iter().enumerate() {
                let anno = match series.style {
                    SeriesStyle::Line => chart
                        .draw_series(LineSeries::new(run, color.stroke_width(2)))
                        .map_err(plot_error)?,
                    SeriesStyle::Points => chart
                        .draw_series(run.into_iter().map(|p| Circle::new(p, 2, color.filled())))
                        .map_err(plot_error)?,
                };
                if r == 0 {
                    if let Some(label) = &series.label {
                        labelled = true;
                        anno.label(label.as_str()).legend(move |(px, py)| {
                            PathElement::new(vec![(px, py), (px + 20, py)], color.stroke_width(2))
                        });
                    }
                }
            }
        }

        if labelled {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_error)?;
        }
        Ok(())
    }
}

/// Overlaid density histograms with optional analytic curves.
#[derive(Debug, Clone)]
pub struct HistogramChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub histograms: Vec<(String, Histogram)>,
    pub curves: Vec<(String, Vec<(f64, f64)>)>,
    pub scientific: bool,
}

impl HistogramChart {
    pub fn new(title: impl Into<String>) -> Self {
        HistogramChart {
            title: title.into(),
            x_label: String::new(),
            y_label: "f [-]".to_string(),
            histograms: Vec::new(),
            curves: Vec::new(),
            scientific: true,
        }
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    pub fn histogram(mut self, label: impl Into<String>, histogram: Histogram) -> Self {
        self.histograms.push((label.into(), histogram));
        self
    }

    pub fn curve(mut self, label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        self.curves.push((label.into(), points));
        self
    }

    fn ranges(&self) -> (Range<f64>, Range<f64>) {
        let xs = self
            .histograms
            .iter()
            .flat_map(|(_, h)| {
                let (lo, hi) = h.range();
                [lo, hi]
            })
            .chain(self.curves.iter().flat_map(|(_, c)| c.iter().map(|p| p.0)));
        let x = data_range(xs).unwrap_or(0.0..1.0);
        let top = self
            .histograms
            .iter()
            .map(|(_, h)| h.max_density())
            .chain(self.curves.iter().flat_map(|(_, c)| c.iter().map(|p| p.1)))
            .filter(|v| v.is_finite())
            .fold(0.0f64, f64::max);
        let top = if top > 0.0 { top * 1.1 } else { 1.0 };
        (x, 0.0..top)
    }

    pub fn render(&self, path: &Path) -> PmplResult<()> {
        let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        self.draw_on(&root)?;
        root.present().map_err(plot_error)?;
        debug!(path = %path.display(), "histogram written");
        Ok(())
    }

    pub fn draw_on<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> PmplResult<()> {
        let (x, y) = self.ranges();
        let mut chart = ChartBuilder::on(area)
            .caption(&self.title, (FONT, 16))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x, y)
            .map_err(plot_error)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str());
        if self.scientific {
            mesh.x_label_formatter(&sci_label).y_label_formatter(&sci_label);
        }
        mesh.draw().map_err(plot_error)?;

        let mut k = 0;
        for (label, histogram) in &self.histograms {
            let color = palette(k);
            k += 1;
            chart
                .draw_series(histogram.bars().map(|(left, right, density)| {
                    Rectangle::new([(left, 0.0), (right, density)], color.mix(0.6).filled())
                }))
                .map_err(plot_error)?
                .label(label.as_str())
                .legend(move |(px, py)| {
                    Rectangle::new([(px, py - 5), (px + 20, py + 5)], color.mix(0.6).filled())
                });
        }
        for (label, points) in &self.curves {
            let color = palette(k);
            k += 1;
            chart
                .draw_series(LineSeries::new(
                    points.iter().copied().filter(|p| p.0.is_finite() && p.1.is_finite()),
                    color.stroke_width(2),
                ))
                .map_err(plot_error)?
                .label(label.as_str())
                .legend(move |(px, py)| {
                    PathElement::new(vec![(px, py), (px + 20, py)], color.stroke_width(2))
                });
        }

        if k > 0 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_error)?;
        }
        Ok(())
    }
}

/// Grid of histogram charts under a common title.
pub fn render_panels(
    path: &Path,
    title: &str,
    panels: &[HistogramChart],
    grid: (usize, usize),
) -> PmplResult<()> {
    if panels.len() > grid.0 * grid.1 {
        return Err(PmplError::InvalidInput(format!(
            "{} panels do not fit a {}x{} grid",
            panels.len(),
            grid.0,
            grid.1
        )));
    }
    let size = (550 * grid.1 as u32, 400 * grid.0 as u32 + 40);
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;
    let body = root.titled(title, (FONT, 24)).map_err(plot_error)?;
    let areas = body.split_evenly(grid);
    for (panel, area) in panels.iter().zip(areas.iter()) {
        panel.draw_on(area)?;
    }
    root.present().map_err(plot_error)?;
    debug!(path = %path.display(), panels = panels.len(), "panels written");
    Ok(())
}

/// Linear interpolation through a few viridis anchors.
pub fn viridis(t: f64) -> RGBColor {
    const ANCHORS: [(f64, f64, f64); 5] = [
        (68.0, 1.0, 84.0),
        (59.0, 82.0, 139.0),
        (33.0, 145.0, 140.0),
        (94.0, 201.0, 98.0),
        (253.0, 231.0, 37.0),
    ];
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (ANCHORS.len() - 1) as f64;
    let k = (scaled.floor() as usize).min(ANCHORS.len() - 2);
    let f = scaled - k as f64;
    let (a, b) = (ANCHORS[k], ANCHORS[k + 1]);
    let mix = |u: f64, v: f64| (u + (v - u) * f).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// pcolor-style field: cell `[x_i, x_{i+1}] × [y_j, y_{j+1}]` takes
/// `values[[j, i]]`.
#[derive(Debug, Clone)]
pub struct Heatmap {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub values: Array2<f64>,
}

impl Heatmap {
    pub fn validate(&self) -> PmplResult<()> {
        let (rows, cols) = self.values.dim();
        if self.x.len() < 2 || self.y.len() < 2 {
            return Err(PmplError::InvalidInput(
                "heatmap needs at least two x and two y nodes".to_string(),
            ));
        }
        if rows != self.y.len() || cols != self.x.len() {
            return Err(PmplError::InvalidInput(format!(
                "heatmap values are {rows}x{cols}, axes are {}x{}",
                self.y.len(),
                self.x.len()
            )));
        }
        Ok(())
    }

    pub fn render(&self, path: &Path) -> PmplResult<()> {
        self.validate()?;
        let (lo, hi) = self
            .values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let (lo, hi) = if lo > hi {
            (0.0, 1.0)
        } else if lo == hi {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        };
        let scale = |v: f64| (v - lo) / (hi - lo);

        let root = SVGBackend::new(path, (900, 700)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        let (field_area, bar_area) = root.split_horizontally(760);

        let x_range = self.x[0]..self.x[self.x.len() - 1];
        let y_range = self.y[0]..self.y[self.y.len() - 1];
        let mut chart = ChartBuilder::on(&field_area)
            .caption(&self.title, (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(plot_error)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(plot_error)?;

        let cells = self.y.windows(2).enumerate().flat_map(|(j, yw)| {
            self.x.windows(2).enumerate().map(move |(i, xw)| {
                let color = viridis(scale(self.values[[j, i]]));
                Rectangle::new([(xw[0], yw[0]), (xw[1], yw[1])], color.filled())
            })
        });
        chart.draw_series(cells).map_err(plot_error)?;

        let mut bar = ChartBuilder::on(&bar_area)
            .margin_top(50)
            .margin_bottom(50)
            .margin_left(10)
            .margin_right(10)
            .x_label_area_size(0)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..1.0, lo..hi)
            .map_err(plot_error)?;
        bar.configure_mesh()
            .x_labels(0)
            .disable_x_mesh()
            .disable_y_mesh()
            .y_label_formatter(&|v: &f64| format!("{v:.2}"))
            .draw()
            .map_err(plot_error)?;
        let levels = 200usize;
        bar.draw_series((0..levels).map(|k| {
            let y0 = lo + (hi - lo) * k as f64 / levels as f64;
            let y1 = lo + (hi - lo) * (k + 1) as f64 / levels as f64;
            Rectangle::new([(0.0, y0), (1.0, y1)], viridis(scale(y1)).filled())
        }))
        .map_err(plot_error)?;

        root.present().map_err(plot_error)?;
        debug!(path = %path.display(), "heatmap written");
        Ok(())
    }
}

/// One scatter snapshot of a particle animation.
#[derive(Debug, Clone)]
pub struct Frame {
    pub title: String,
    pub points: Vec<(f64, f64)>,
}

/// Write each frame as `{stem}_{k:04}.svg` under `dir` with fixed axes.
pub fn render_frames(
    dir: &Path,
    stem: &str,
    frames: &[Frame],
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> PmplResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(frames.len());
    for (k, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("{stem}_{k:04}.svg"));
        LineChart::new(frame.title.as_str())
            .labels("x [m]", "y [m]")
            .points(None, frame.points.clone())
            .x_range(x_range.clone())
            .y_range(y_range.clone())
            .render(&path)?;
        paths.push(path);
    }
    debug!(dir = %dir.display(), frames = paths.len(), "frames written");
    Ok(paths)
}
