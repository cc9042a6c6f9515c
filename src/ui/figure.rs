//! SVG figures of the rendered plots, drawn with plotters.

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;
use tracing::info;

use crate::error::AppError;
use crate::utils::dump::{PlotData, RasterData, ensure_parent_dir};

pub const FIGURE_SIZE: (u32, u32) = (800, 600);
const RASTER_SIZE: (u32, u32) = (640, 640);

fn render_failed(path: &Path, e: Box<dyn Error>) -> AppError {
    AppError::Render {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Line chart of `data` with fixed axis limits.
pub fn line_svg(
    data: &PlotData,
    x_range: (f64, f64),
    y_range: (f64, f64),
    path: &Path,
) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    draw_line(data, x_range, y_range, path)
        .map_err(|e| render_failed(path, e))?;
    info!("Figure written to {}", path.display());
    Ok(())
}

fn draw_line(
    data: &PlotData,
    x_range: (f64, f64),
    y_range: (f64, f64),
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&data.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
    chart
        .configure_mesh()
        .x_desc(data.x_label.as_str())
        .y_desc(data.y_label.as_str())
        .draw()?;

    let series = data
        .x
        .iter()
        .copied()
        .zip(data.y.iter().copied());
    chart.draw_series(LineSeries::new(series, &BLUE))?;

    root.present()?;
    Ok(())
}

/// Greyscale image, one filled band per column, origin lower.
pub fn raster_svg(
    title: &str,
    data: &RasterData,
    path: &Path,
) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    draw_raster(title, data, path).map_err(|e| render_failed(path, e))?;
    info!("Figure written to {}", path.display());
    Ok(())
}

fn draw_raster(
    title: &str,
    data: &RasterData,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, RASTER_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = data.size.max(1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..n, 0.0..n)?;
    chart.configure_mesh().disable_mesh().draw()?;

    chart.draw_series(data.columns.iter().enumerate().map(|(i, &v)| {
        Rectangle::new(
            [(i as f64, 0.0), ((i + 1) as f64, n)],
            RGBColor(v, v, v).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_svg(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "wavelab_figure_{}_{}.svg",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn line_figure_is_an_svg_with_a_polyline() {
        let path = temp_svg("line");
        let data =
            PlotData::from_audio(&[0, 300, -300, 0], &[0.0, 0.3, 0.6, 1.0]);
        line_svg(&data, (0.0, 1.0), (-400.0, 400.0), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.contains("<svg"));
        assert!(text.contains("<polyline"));
    }

    #[test]
    fn raster_figure_draws_every_column() {
        let path = temp_svg("raster");
        let data = RasterData {
            size: 3,
            columns: vec![0, 128, 255],
        };
        raster_svg("bands", &data, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        // background plus one rectangle per column
        assert!(text.matches("<rect").count() >= 1 + 3);
    }

    #[test]
    fn unwritable_figure_is_recoverable() {
        let err = line_svg(
            &PlotData::from_audio(&[1, 2], &[0.0, 1.0]),
            (0.0, 1.0),
            (0.0, 2.0),
            &std::env::temp_dir(),
        )
        .unwrap_err();
        assert!(err.is_recoverable(), "{err:?}");
    }
}
