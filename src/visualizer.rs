//! Draws a [`Mountain`] as a 3D surface on any plotters drawing area.
//!
//! Strides run along the x axis, log2 of the working set size along the depth axis and the
//! read throughput is the height. A colour scale next to the surface maps colours back to MB/s.

use log::warn;
use mountain::{Mountain, WorkingSetSize};
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

pub const TITLE: &str = "Memory Mountain";
const STRIDE_CAPTION: &str = "Stride (elements)";
const SIZE_CAPTION: &str = "Working Set Size (log2 bytes)";
const THROUGHPUT_CAPTION: &str = "Read Throughput (MB/s)";

/// Width in pixels reserved for the colour scale
const SCALE_WIDTH: i32 = 120;
const SCALE_BANDS: usize = 64;

/// Anchors of the viridis colour map, from low to high
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Maps throughput values onto the viridis colour map
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        if max > min {
            Self { min, max }
        } else {
            // a flat mountain still needs a non-empty range
            Self {
                min: min - 0.5,
                max: min + 0.5,
            }
        }
    }

    pub fn range(&self) -> Range<f64> {
        self.min..self.max
    }

    /// Position of `value` inside the scale, clamped to `0.0..=1.0`
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> RGBColor {
        let position = self.normalize(value) * (VIRIDIS.len() - 1) as f64;
        let lower = (position.floor() as usize).min(VIRIDIS.len() - 2);
        let t = position - lower as f64;
        let (a, b) = (VIRIDIS[lower], VIRIDIS[lower + 1]);
        let mix = |from: u8, to: u8| {
            (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
        };
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

/// Axis ranges of the surface chart
#[derive(Debug, Clone, PartialEq)]
pub struct PlotBounds {
    pub strides: Range<f64>,
    pub sizes: Range<f64>,
    pub throughput: Range<f64>,
}

impl PlotBounds {
    pub fn of(mountain: &Mountain) -> Self {
        let strides = padded(
            mountain.strides().values().iter().map(|&s| f64::from(s)),
            1.0,
        );
        let sizes = padded(mountain.sizes().iter().map(WorkingSetSize::log2), 0.5);
        let peak = mountain.matrix().max();
        // Leaving some room above the highest value
        let throughput = if peak > 0.0 { 0.0..peak * 1.1 } else { 0.0..1.0 };

        Self {
            strides,
            sizes,
            throughput,
        }
    }
}

/// Linear axis whose ticks sit exactly on the given values instead of round numbers
#[derive(Debug, Clone, PartialEq)]
pub struct TickedAxis {
    range: Range<f64>,
    ticks: Vec<f64>,
}

impl TickedAxis {
    pub fn new(range: Range<f64>, ticks: Vec<f64>) -> Self {
        Self { range, ticks }
    }
}

impl Ranged for TickedAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let span = self.range.end - self.range.start;
        if span <= 0.0 {
            return limit.0;
        }
        let t = (value - self.range.start) / span;
        limit.0 + (f64::from(limit.1 - limit.0) * t).round() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.range.clone()
    }
}

impl ValueFormatter<f64> for TickedAxis {
    fn format(value: &f64) -> String {
        format!("{value}")
    }
}

/// Smallest range holding all values, widened by `pad` on both sides when it would be empty
fn padded(values: impl Iterator<Item = f64>, pad: f64) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if max > min {
        min..max
    } else {
        min - pad..max + pad
    }
}

/// One quadrilateral of the surface, between two neighbouring strides and sizes
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceCell {
    /// `(stride, throughput, log2(size))` in drawing order
    pub corners: Vec<(f64, f64, f64)>,
    /// Mean throughput of the corners, used for the colour
    pub mean: f64,
}

/// Splits the mesh into cells; a mountain needs at least two rows and two columns to have any
pub fn surface_cells(mountain: &Mountain) -> Vec<SurfaceCell> {
    let mesh = mountain.mesh();
    let matrix = mountain.matrix();
    let mut cells = Vec::new();

    for row in 0..matrix.rows().saturating_sub(1) {
        for column in 0..matrix.columns().saturating_sub(1) {
            let corners: Vec<(f64, f64, f64)> = [
                (row, column),
                (row, column + 1),
                (row + 1, column + 1),
                (row + 1, column),
            ]
            .iter()
            .filter_map(|&(r, c)| {
                let (stride, size) = mesh[r][c];
                matrix.get(r, c).map(|value| (stride, value, size))
            })
            .collect();
            let mean = corners.iter().map(|c| c.1).sum::<f64>() / corners.len() as f64;
            cells.push(SurfaceCell { corners, mean });
        }
    }
    cells
}

fn stride_label(value: &f64) -> String {
    format!("{}", value.round() as i64)
}

/// Turns a log2 position back into the size label of the input format, e.g. `17.0` -> `128k`
fn size_label(value: &f64) -> String {
    WorkingSetSize::from_log2(*value)
        .map(|size| size.label())
        .unwrap_or_default()
}

fn throughput_label(value: &f64) -> String {
    format!("{value:.0}")
}

/// Draws the title, the surface and the colour scale
pub fn draw_mountain<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    mountain: &Mountain,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    //Background color
    root.fill(&WHITE)?;
    let root = root.titled(TITLE, ("sans-serif", 28))?;

    let (width, _) = root.dim_in_pixel();
    let (surface_area, scale_area) = root.split_horizontally((width as i32 - SCALE_WIDTH).max(0));

    let matrix = mountain.matrix();
    let scale = ColorScale::new(matrix.min(), matrix.max());

    draw_surface(&surface_area, mountain, &scale)?;
    draw_color_scale(&scale_area, &scale)?;
    root.present()
}

fn draw_surface<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    mountain: &Mountain,
    scale: &ColorScale,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let bounds = PlotBounds::of(mountain);

    // Ticks only on every other stride and size, otherwise the labels overlap
    let stride_axis = TickedAxis::new(bounds.strides.clone(), mountain.stride_ticks());
    let size_axis = TickedAxis::new(
        bounds.sizes.clone(),
        mountain
            .size_ticks()
            .iter()
            .map(WorkingSetSize::log2)
            .collect(),
    );

    let mut chart = ChartBuilder::on(area);
    chart.margin(20);
    let mut chart_context =
        chart.build_cartesian_3d(stride_axis, bounds.throughput.clone(), size_axis)?;

    chart_context.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart_context
        .configure_axes()
        .light_grid_style(BLACK.mix(0.1))
        .max_light_lines(3)
        .x_formatter(&stride_label)
        .y_formatter(&throughput_label)
        .z_formatter(&size_label)
        .draw()?;

    let cells = surface_cells(mountain);
    if cells.is_empty() {
        warn!("At least two working set sizes and two strides are needed to draw a surface");
    }
    chart_context.draw_series(
        cells
            .into_iter()
            .map(|cell| Polygon::new(cell.corners, scale.color(cell.mean).filled())),
    )?;

    let caption_style = ("sans-serif", 16).into_font().color(&BLACK);
    let mid = |range: &Range<f64>| (range.start + range.end) / 2.0;
    chart_context.draw_series([
        Text::new(
            STRIDE_CAPTION,
            (mid(&bounds.strides), bounds.throughput.start, bounds.sizes.start),
            caption_style.clone(),
        ),
        Text::new(
            SIZE_CAPTION,
            (bounds.strides.end, bounds.throughput.start, mid(&bounds.sizes)),
            caption_style.clone(),
        ),
        Text::new(
            THROUGHPUT_CAPTION,
            (bounds.strides.start, bounds.throughput.end, bounds.sizes.end),
            caption_style,
        ),
    ])?;

    Ok(())
}

fn draw_color_scale<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: &ColorScale,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let mut chart = ChartBuilder::on(area);
    chart
        .margin(20)
        .margin_top(120)
        .margin_bottom(120)
        .set_label_area_size(LabelAreaPosition::Right, 60);

    let range = scale.range();
    let mut chart_context = chart.build_cartesian_2d(0.0..1.0, range.clone())?;

    chart_context
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_label_formatter(&throughput_label)
        .y_desc("MB/s")
        .draw()?;

    let band = (range.end - range.start) / SCALE_BANDS as f64;
    chart_context.draw_series((0..SCALE_BANDS).map(|i| {
        let low = range.start + band * i as f64;
        let high = low + band;
        Rectangle::new(
            [(0.0, low), (1.0, high)],
            scale.color((low + high) / 2.0).filled(),
        )
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mountain::{reader, StrideSequence, ThroughputMatrix};

    fn mountain(sizes: &[&str], strides: Vec<u32>, rows: Vec<Vec<f64>>) -> Mountain {
        Mountain::new(
            StrideSequence::new(strides).unwrap(),
            sizes.iter().map(|s| s.parse().unwrap()).collect(),
            ThroughputMatrix::from_rows(rows).unwrap(),
        )
        .unwrap()
    }

    fn bundled_sample() -> Mountain {
        reader::parse(include_str!("../data.txt"), &StrideSequence::default()).unwrap()
    }

    /// Draws into an in-memory SVG document
    fn render_svg(mountain: &Mountain) -> Result<String, String> {
        let mut out = String::new();
        let result = {
            let root = SVGBackend::with_string(&mut out, (1200, 800)).into_drawing_area();
            draw_mountain(&root, mountain).map_err(|e| e.to_string())
        };
        result.map(|_| out)
    }

    /// Contents of every `<text>` element
    fn svg_texts(svg: &str) -> Vec<String> {
        let mut parts: Vec<&str> = svg.split("</text>").collect();
        parts.pop();
        parts
            .into_iter()
            .filter_map(|part| part.rsplit('>').next())
            .map(|text| text.trim().to_string())
            .collect()
    }

    #[test]
    fn test_draw_title_and_captions() {
        let svg = render_svg(&bundled_sample()).unwrap();
        let texts = svg_texts(&svg);

        for expected in [
            TITLE,
            STRIDE_CAPTION,
            SIZE_CAPTION,
            THROUGHPUT_CAPTION,
            "MB/s",
        ] {
            assert!(
                texts.iter().any(|t| t == expected),
                "'{}' must be drawn, found {:?}",
                expected,
                texts
            );
        }
    }

    #[test]
    fn test_draw_every_other_tick() {
        let svg = render_svg(&bundled_sample()).unwrap();
        let texts = svg_texts(&svg);
        let drawn = |label: &str| texts.iter().any(|t| t == label);

        for stride in ["1", "5", "9", "13", "17", "21", "25", "29"] {
            assert!(drawn(stride), "Stride tick {} is missing", stride);
        }
        for stride in ["3", "7", "31"] {
            assert!(!drawn(stride), "Stride tick {} should be thinned out", stride);
        }

        for size in ["128m", "32m", "8m", "2m", "512k", "128k", "32k"] {
            assert!(drawn(size), "Size tick {} is missing", size);
        }
        for size in ["64m", "16m", "4m", "1m", "256k", "64k", "16k"] {
            assert!(!drawn(size), "Size tick {} should be thinned out", size);
        }
    }

    #[test]
    fn test_draw_surface_and_color_scale() {
        let svg = render_svg(&bundled_sample()).unwrap();

        // 14 sizes and 16 strides give 13 x 15 cells
        assert!(svg.matches("<polygon").count() >= 13 * 15);
        assert!(svg.matches("<rect").count() >= SCALE_BANDS);
    }

    #[test]
    fn test_draw_single_row() {
        let mountain = mountain(&["4k"], vec![1, 3, 5], vec![vec![100.0, 90.0, 80.0]]);
        let svg = render_svg(&mountain);

        assert!(svg.is_ok(), "Drawing a single row failed: {:?}", svg.err());
        assert!(svg_texts(&svg.unwrap()).iter().any(|t| t == TITLE));
    }

    #[test]
    fn test_color_scale_endpoints() {
        let scale = ColorScale::new(100.0, 500.0);
        assert_eq!(RGBColor(68, 1, 84), scale.color(100.0));
        assert_eq!(RGBColor(253, 231, 37), scale.color(500.0));
        assert_eq!(RGBColor(33, 145, 140), scale.color(300.0));
        // Out of range values are clamped
        assert_eq!(scale.color(100.0), scale.color(-10.0));
        assert_eq!(scale.color(500.0), scale.color(9000.0));
    }

    #[test]
    fn test_color_scale_normalize() {
        let scale = ColorScale::new(0.0, 200.0);
        assert_eq!(0.0, scale.normalize(0.0));
        assert_eq!(0.25, scale.normalize(50.0));
        assert_eq!(1.0, scale.normalize(200.0));

        let flat = ColorScale::new(42.0, 42.0);
        assert_eq!(41.5..42.5, flat.range());
        assert_eq!(0.5, flat.normalize(42.0));
    }

    #[test]
    fn test_plot_bounds() {
        let mountain = mountain(
            &["64m", "1k"],
            vec![1, 3, 5],
            vec![vec![10.0, 20.0, 30.0], vec![100.0, 90.0, 80.0]],
        );
        let bounds = PlotBounds::of(&mountain);
        assert_eq!(1.0..5.0, bounds.strides);
        assert_eq!(10.0..26.0, bounds.sizes);
        assert_eq!(0.0, bounds.throughput.start);
        assert!((bounds.throughput.end - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_plot_bounds_single_row() {
        let mountain = mountain(&["4k"], vec![7], vec![vec![0.0]]);
        let bounds = PlotBounds::of(&mountain);
        assert_eq!(6.0..8.0, bounds.strides);
        assert_eq!(11.5..12.5, bounds.sizes);
        assert_eq!(0.0..1.0, bounds.throughput);
    }

    #[test]
    fn test_surface_cells() {
        let mountain = mountain(
            &["2k", "4k", "8k"],
            vec![1, 3],
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        );
        let cells = surface_cells(&mountain);

        assert_eq!(2, cells.len());
        assert_eq!(
            vec![
                (1.0, 1.0, 11.0),
                (3.0, 2.0, 11.0),
                (3.0, 4.0, 12.0),
                (1.0, 3.0, 12.0)
            ],
            cells[0].corners
        );
        assert_eq!(2.5, cells[0].mean);
        assert_eq!(4.5, cells[1].mean);
    }

    #[test]
    fn test_surface_cells_need_two_rows() {
        let mountain = mountain(&["2k"], vec![1, 3, 5], vec![vec![1.0, 2.0, 3.0]]);
        assert!(surface_cells(&mountain).is_empty());
    }

    #[test]
    fn test_ticked_axis() {
        let axis = TickedAxis::new(1.0..31.0, vec![1.0, 5.0, 9.0]);
        assert_eq!(0, axis.map(&1.0, (0, 300)));
        assert_eq!(300, axis.map(&31.0, (0, 300)));
        assert_eq!(150, axis.map(&16.0, (0, 300)));
        assert_eq!(vec![1.0, 5.0, 9.0], axis.key_points(10usize));
        assert_eq!(1.0..31.0, axis.range());
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!("128k", size_label(&17.0));
        assert_eq!("1m", size_label(&20.0));
        assert_eq!("4m", size_label(&22.0));
        assert_eq!("", size_label(&f64::NAN));
        assert_eq!("31", stride_label(&31.0));
        assert_eq!("1235", throughput_label(&1234.6));
    }
}
