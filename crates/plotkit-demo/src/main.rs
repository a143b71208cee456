// File: crates/plotkit-demo/src/main.rs
// Summary: Demo loads an x,y CSV (or synthesizes a dense signal) and renders it through the
//          transform -> decimate -> clip pipeline to PNG or SVG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};

use plotkit_core::rendering::{draw_clipped_line_segments, draw_clipped_text};
use plotkit_core::{
    draw_data_line, Axis, Color, DataPoint, Font, HorizontalAlignment, LineOptions, PlotAxes, Rect,
    RenderContext, ScreenPoint, Stroke, TextLayout, VerticalAlignment,
};
use plotkit_skia::{RenderOptions, RenderSurface, SurfaceKind, HEIGHT, WIDTH};

#[derive(Parser, Debug)]
#[command(name = "plotkit-demo", version)]
struct Cli {
    /// Input CSV with x and y columns; a synthetic signal is plotted when omitted.
    input: Option<String>,

    /// Output directory.
    #[arg(long, default_value = "target/out")]
    out_dir: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,

    #[arg(long, default_value_t = WIDTH)]
    width: i32,

    #[arg(long, default_value_t = HEIGHT)]
    height: i32,

    /// Resolution recorded in the PNG pHYs chunk.
    #[arg(long, default_value_t = 96.0)]
    dpi: f64,

    /// Draw every point instead of the per-column envelope.
    #[arg(long)]
    no_decimate: bool,

    /// Logarithmic y axis; non-positive values become gaps.
    #[arg(long)]
    log_y: bool,

    /// Swap the screen axes (x runs bottom to top).
    #[arg(long)]
    transposed: bool,

    /// Number of points in the synthetic signal.
    #[arg(long, default_value_t = 250_000)]
    points: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Png,
    Svg,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let (data, stem) = match &cli.input {
        Some(raw) => {
            let (path, used_alt) = resolve_path(raw)?;
            info!(path = %path.display(), "using input file");
            if used_alt {
                info!("extension swapped between .csv/.cvs");
            }
            let data = load_xy_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("chart").to_owned();
            (data, stem)
        }
        None => (synthetic(cli.points), "synthetic".to_owned()),
    };
    info!(points = data.len(), "loaded series");

    let (x_min, x_max) = minmax(data.iter().map(|p| p.x));
    let (y_min, y_max) = minmax(data.iter().map(|p| p.y).filter(|&y| !cli.log_y || y > 0.0));
    if !x_min.is_finite() || !y_min.is_finite() {
        anyhow::bail!("no plottable points, check headers/delimiter");
    }
    info!(x_min, x_max, y_min, y_max, "data range");

    let opts = RenderOptions { width: cli.width, height: cli.height, dpi: cli.dpi, ..RenderOptions::default() };
    let area = opts.plot_area();
    let x_axis = Axis::new("x", x_min, x_max);
    let y_axis = if cli.log_y { Axis::log10("y (log)", y_min, y_max) } else { Axis::new("y", y_min, y_max) };
    let axes = PlotAxes::new(x_axis, y_axis, area, cli.transposed);

    let kind = match cli.format {
        Format::Png => SurfaceKind::Raster,
        Format::Svg => SurfaceKind::Vector,
    };
    let mut surface = RenderSurface::new(kind, &opts)?;

    draw_frame(&mut surface, &axes, area);

    surface.set_clip(area);
    let stroke = Stroke::new(Color::from_rgb(64, 160, 255), 1.5);
    let options = LineOptions { decimate: !cli.no_decimate, min_distance: 0.0 };
    let emitted = draw_data_line(&mut surface, area, &axes, &data, &stroke, options);
    surface.reset_clip();
    info!(input = data.len(), emitted, decimate = options.decimate, "drew series");

    let suffix = if cli.transposed { "transposed" } else { "line" };
    let out = out_name_with(&cli.out_dir, &stem, suffix, surface.extension())?;
    let bytes = surface.finish()?;
    std::fs::write(&out, &bytes).with_context(|| format!("writing {}", out.display()))?;
    info!(path = %out.display(), bytes = bytes.len(), "wrote chart");
    Ok(())
}

/// Plot-area border, a light grid and the axis labels.
fn draw_frame(ctx: &mut dyn RenderContext, axes: &PlotAxes, area: Rect) {
    let grid = Stroke::new(Color::from_rgb(40, 40, 45), 1.0);
    let mut segments = Vec::new();
    for x in linspace(area.left, area.right(), 10) {
        segments.extend([ScreenPoint::new(x, area.top), ScreenPoint::new(x, area.bottom())]);
    }
    for y in linspace(area.top, area.bottom(), 6) {
        segments.extend([ScreenPoint::new(area.left, y), ScreenPoint::new(area.right(), y)]);
    }
    draw_clipped_line_segments(ctx, area, &segments, &grid);
    ctx.draw_rectangle(area, Color::UNDEFINED, &Stroke::new(Color::from_rgb(180, 180, 190), 1.5));

    let font = Font::new("Arial", 14.0);
    let label = Color::from_rgb(210, 210, 220);
    let (horizontal, vertical) = if axes.transposed { (&axes.y_axis, &axes.x_axis) } else { (&axes.x_axis, &axes.y_axis) };
    let under = TextLayout { halign: HorizontalAlignment::Center, valign: VerticalAlignment::Top, ..TextLayout::default() };
    ctx.draw_text(
        ScreenPoint::new(area.center().x, area.bottom() + 24.0),
        &horizontal.label,
        label,
        &font,
        &under,
    );
    let beside = TextLayout {
        rotation: -90.0,
        halign: HorizontalAlignment::Center,
        valign: VerticalAlignment::Bottom,
        ..TextLayout::default()
    };
    ctx.draw_text(ScreenPoint::new(area.left - 40.0, area.center().y), &vertical.label, label, &font, &beside);

    // corner readout of the data range, only if it fits inside the plot
    let lo = axes.to_data(ScreenPoint::new(area.left, area.bottom()));
    let hi = axes.to_data(ScreenPoint::new(area.right(), area.top));
    let readout = format!("[{:.3}, {:.3}] x [{:.3}, {:.3}]", lo.x, hi.x, lo.y, hi.y);
    let size = ctx.measure_text(&readout, &font);
    debug!(width = size.width, "range readout");
    if size.width < area.width {
        let top_right = TextLayout { halign: HorizontalAlignment::Right, ..TextLayout::default() };
        draw_clipped_text(ctx, area, ScreenPoint::new(area.right() - 6.0, area.top + 6.0), &readout, label, &font, &top_right);
    }
}

fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 {
        return vec![start, end];
    }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

fn minmax(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    (min_v, max_v)
}

/// Dense noisy signal with a couple of gaps, far more points than pixel columns.
fn synthetic(n: usize) -> Vec<DataPoint> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    (0..n)
        .map(|i| {
            if i % 50_000 == 49_999 {
                return DataPoint::UNDEFINED;
            }
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let noise = (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5;
            let t = i as f64 / n as f64;
            DataPoint::new(t * 100.0, 10.0 + (t * 40.0).sin() * 4.0 + noise * 2.0)
        })
        .collect()
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

/// Produce output file name like target/out/chart_<stem>_<suffix>.<ext>
fn out_name_with(dir: &Path, stem: &str, suffix: &str, ext: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let short = stem.split('_').take(3).collect::<Vec<_>>().join("_");
    let name = if short.is_empty() { format!("chart_{suffix}.{ext}") } else { format!("chart_{short}_{suffix}.{ext}") };
    Ok(dir.join(name))
}

/// Load an x,y CSV. Unparsable y values become gaps; rows without x are skipped.
fn load_xy_csv(path: &Path) -> Result<Vec<DataPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    debug!(?headers, "csv headers");

    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
    let i_x = idx(&["x", "t", "time", "timestamp", "index"]).unwrap_or(0);
    let i_y = idx(&["y", "value", "v", "close"]).unwrap_or(1);
    if i_x == i_y {
        anyhow::bail!("x and y resolve to the same column {i_x}");
    }

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let parse = |i: usize| rec.get(i).and_then(|s| s.trim().parse::<f64>().ok());
        match (parse(i_x), parse(i_y)) {
            (Some(x), Some(y)) => out.push(DataPoint::new(x, y)),
            (Some(_), None) => out.push(DataPoint::UNDEFINED),
            (None, _) => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "rows without a numeric x were skipped");
    }
    Ok(out)
}
