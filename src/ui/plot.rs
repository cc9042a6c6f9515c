//! Character-cell rendering of line charts and greyscale rasters.

use crate::signal::WaveformImage;

/// Plot area in terminal cells, axes and labels excluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotSize {
    pub width: usize,
    pub height: usize,
}

impl PlotSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(2),
            height: height.max(2),
        }
    }
}

const LABEL_WIDTH: usize = 9;
const POINT: char = '•';
const SHADES: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Smallest and largest finite value, widened when flat.
pub fn auto_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    (min, max)
}

fn cell(value: f64, (lo, hi): (f64, f64), cells: usize) -> usize {
    if hi <= lo || !value.is_finite() {
        return 0;
    }
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    (t * (cells - 1) as f64).round() as usize
}

/// Scatter of `(x, y)` joined by vertical strokes between neighbours.
pub fn line_chart(
    title: &str,
    x: &[f64],
    y: &[f64],
    x_range: (f64, f64),
    y_range: (f64, f64),
    size: PlotSize,
) -> String {
    let mut grid = vec![vec![' '; size.width]; size.height];
    let mut previous: Option<(usize, usize)> = None;

    for (&xv, &yv) in x.iter().zip(y.iter()) {
        let col = cell(xv, x_range, size.width);
        let level = cell(yv, y_range, size.height);
        if let Some((prev_col, prev_level)) = previous {
            if prev_col != col {
                let (lo, hi) = if prev_level < level {
                    (prev_level, level)
                } else {
                    (level, prev_level)
                };
                for l in lo..=hi {
                    grid[size.height - 1 - l][col] = POINT;
                }
            }
        }
        grid[size.height - 1 - level][col] = POINT;
        previous = Some((col, level));
    }

    let mut out = String::new();
    out.push_str(&format!("{:^w$}\n", title, w = LABEL_WIDTH + size.width + 2));
    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            format!("{:>8.1}", y_range.1)
        } else if i == size.height - 1 {
            format!("{:>8.1}", y_range.0)
        } else if i == size.height / 2 {
            format!("{:>8.1}", (y_range.0 + y_range.1) / 2.0)
        } else {
            " ".repeat(8)
        };
        out.push_str(&label);
        out.push_str(" │");
        out.extend(row.iter());
        out.push('\n');
    }
    out.push_str(&" ".repeat(LABEL_WIDTH));
    out.push('└');
    out.push_str(&"─".repeat(size.width));
    out.push('\n');
    let left = format!("{:.1}", x_range.0);
    let right = format!("{:.1}", x_range.1);
    let gap = (size.width + 1).saturating_sub(left.len() + right.len());
    out.push_str(&" ".repeat(LABEL_WIDTH));
    out.push_str(&left);
    out.push_str(&" ".repeat(gap));
    out.push_str(&right);
    out.push('\n');
    out
}

/// Shade character for an 8-bit intensity.
pub fn shade(value: u8) -> char {
    let levels = SHADES.len() - 1;
    SHADES[(value as usize * levels + 127) / 255]
}

/// Downsampled greyscale view, origin at the lower left.
pub fn raster(title: &str, image: &WaveformImage, size: PlotSize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:^w$}\n", title, w = size.width + 2));
    out.push('┌');
    out.push_str(&"─".repeat(size.width));
    out.push_str("┐\n");

    let n = image.width();
    for r in 0..size.height {
        out.push('│');
        if n > 0 {
            let img_row = ((size.height - 1 - r) * n / size.height).min(n - 1);
            for c in 0..size.width {
                let img_col = (c * n / size.width).min(n - 1);
                out.push(shade(image.pixel(img_row, img_col)));
            }
        } else {
            out.push_str(&" ".repeat(size.width));
        }
        out.push_str("│\n");
    }

    out.push('└');
    out.push_str(&"─".repeat(size.width));
    out.push_str("┘\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::WaveformSamples;

    #[test]
    fn chart_has_one_line_per_row_plus_frame() {
        let size = PlotSize::new(30, 8);
        let x = [0.0, 500.0, 1000.0];
        let y = [0.0, 255.0, 127.0];
        let chart = line_chart("t", &x, &y, (0.0, 1000.0), (0.0, 255.0), size);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 1 + 8 + 2);
        // top row holds the 255 point in the middle column
        assert!(lines[1].contains(POINT));
        assert!(lines[1].starts_with("   255.0"));
        assert!(lines[8].starts_with("     0.0"));
    }

    #[test]
    fn out_of_range_points_are_pinned_to_the_frame() {
        let size = PlotSize::new(10, 4);
        let chart =
            line_chart("", &[-5.0], &[900.0], (0.0, 1.0), (0.0, 1.0), size);
        let top = chart.lines().nth(1).unwrap();
        assert_eq!(top.chars().nth(LABEL_WIDTH + 1), Some(POINT));
    }

    #[test]
    fn auto_range_handles_flat_and_empty_input() {
        assert_eq!(auto_range([3.0, 3.0]), (2.0, 4.0));
        assert_eq!(auto_range(std::iter::empty()), (0.0, 1.0));
        assert_eq!(auto_range([-2.0, f64::NAN, 5.0]), (-2.0, 5.0));
    }

    #[test]
    fn shades_cover_black_to_white() {
        assert_eq!(shade(0), ' ');
        assert_eq!(shade(255), '@');
    }

    #[test]
    fn raster_columns_are_uniform() {
        let samples = WaveformSamples {
            x: (0..50).map(|i| i as f64).collect(),
            y: (0..50).map(|i| (i * 5) as f64).collect(),
        };
        let image = WaveformImage::from_samples(&samples);
        let text = raster("img", &image, PlotSize::new(25, 6));
        let rows: Vec<Vec<char>> = text
            .lines()
            .skip(2)
            .take(6)
            .map(|l| l.chars().collect())
            .collect();
        for row in &rows[1..] {
            assert_eq!(row, &rows[0]);
        }
        assert_eq!(rows[0][1], ' ');
    }
}
