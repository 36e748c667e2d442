use crate::history::{log10_population, PopulationHistory};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

const PANEL_WIDTH: u32 = 480;
const PANEL_HEIGHT: u32 = 320;
const MARGIN: u32 = 24;

const BACKGROUND: Rgb<u8> = Rgb([31, 41, 55]);
const AXIS: Rgb<u8> = Rgb([156, 163, 175]);
const LINE: Rgb<u8> = Rgb([75, 192, 192]);

/// Write the population history as a PNG with two panels side by side:
/// raw population on the left and log10 population on the right.
pub fn export_population_chart(history: &PopulationHistory, path: &Path) -> Result<(), String> {
    if history.is_empty() {
        return Err("No population history to export yet".to_string());
    }

    let image = render_population_chart(history);
    image
        .save(path)
        .map_err(|e| format!("Failed to write chart image: {}", e))?;
    log::info!("Exported {} generations to {}", history.len(), path.display());
    Ok(())
}

/// Default file name for a chart export taken at `generation`
pub fn default_chart_path(generation: u64) -> PathBuf {
    PathBuf::from(format!("population-gen{}.png", generation))
}

fn render_population_chart(history: &PopulationHistory) -> RgbImage {
    let mut image = RgbImage::from_pixel(PANEL_WIDTH * 2, PANEL_HEIGHT, BACKGROUND);

    let linear: Vec<f64> = history.as_slice().iter().map(|&p| p as f64).collect();
    let log: Vec<f64> = history
        .as_slice()
        .iter()
        .map(|&p| log10_population(p))
        .collect();

    draw_panel(&mut image, 0, &linear);
    draw_panel(&mut image, PANEL_WIDTH, &log);
    image
}

/// Plot one series inside the panel starting at pixel column `x0`
fn draw_panel(image: &mut RgbImage, x0: u32, series: &[f64]) {
    let left = x0 + MARGIN;
    let right = x0 + PANEL_WIDTH - MARGIN;
    let top = MARGIN;
    let bottom = PANEL_HEIGHT - MARGIN;

    // Axes
    for x in left..=right {
        image.put_pixel(x, bottom, AXIS);
    }
    for y in top..=bottom {
        image.put_pixel(left, y, AXIS);
    }

    let max = series.iter().copied().fold(0.0_f64, f64::max);
    let y_scale = if max > 0.0 { (bottom - top) as f64 / max } else { 0.0 };
    let x_span = (right - left) as f64;
    let steps = series.len().saturating_sub(1).max(1) as f64;

    let to_pixel = |i: usize, v: f64| -> (i64, i64) {
        let px = left as f64 + i as f64 * x_span / steps;
        let py = bottom as f64 - v * y_scale;
        (px.round() as i64, py.round() as i64)
    };

    let mut prev = to_pixel(0, series[0]);
    image.put_pixel(prev.0 as u32, prev.1 as u32, LINE);
    for (i, &v) in series.iter().enumerate().skip(1) {
        let next = to_pixel(i, v);
        draw_line(image, prev, next, LINE);
        prev = next;
    }
}

/// Bresenham line, skipping pixels outside the image
fn draw_line(image: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
            image.put_pixel(x as u32, y as u32, color);
        }
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn history_of(values: &[usize]) -> PopulationHistory {
        let mut history = PopulationHistory::new();
        for &v in values {
            history.push(v);
        }
        history
    }

    #[test]
    fn test_export_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");

        export_population_chart(&history_of(&[10, 40, 25, 0, 3]), &path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), PANEL_WIDTH * 2);
        assert_eq!(loaded.height(), PANEL_HEIGHT);
    }

    #[test]
    fn test_export_rejects_empty_history() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");
        assert!(export_population_chart(&PopulationHistory::new(), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_series_endpoints_are_plotted() {
        let image = render_population_chart(&history_of(&[0, 100]));

        // First point sits on the x axis, last point at the top of the panel
        assert_eq!(*image.get_pixel(MARGIN, PANEL_HEIGHT - MARGIN), LINE);
        assert_eq!(*image.get_pixel(PANEL_WIDTH - MARGIN, MARGIN), LINE);
        // log10(100) = 2 is also the maximum of the right panel
        assert_eq!(*image.get_pixel(2 * PANEL_WIDTH - MARGIN, MARGIN), LINE);
    }

    #[test]
    fn test_single_entry_history() {
        let image = render_population_chart(&history_of(&[0]));
        assert_eq!(*image.get_pixel(MARGIN, PANEL_HEIGHT - MARGIN), LINE);
    }

    #[test]
    fn test_default_chart_path() {
        assert_eq!(default_chart_path(42), PathBuf::from("population-gen42.png"));
    }
}
