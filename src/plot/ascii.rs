//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - brand observations: one letter per brand (`a`, `b`, ...), listed in a legend
//! - connecting lines: `.`
//! - horizontal bars: `#`

use crate::report::{TrendChart, fit_width};

const GLYPHS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const LABEL_WIDTH: usize = 20;

fn glyph(i: usize) -> char {
    GLYPHS[i % GLYPHS.len()] as char
}

/// Render every brand's series on one grid, plus a legend.
pub fn render_trend_plot(chart: &TrendChart, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let [x_min, x_max] = chart.x_bounds;
    let [y_min, y_max] = chart.y_bounds;

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so observations can overlay.
    for s in &chart.series {
        let mut prev = None;
        for &(x, y) in &s.points {
            let cx = map_x(x, x_min, x_max, width);
            let cy = map_y(y, y_min, y_max, height);
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, cx, cy, '.');
            }
            prev = Some((cx, cy));
        }
    }

    for (i, s) in chart.series.iter().enumerate() {
        let ch = glyph(i);
        for &(x, y) in &s.points {
            let cx = map_x(x, x_min, x_max, width);
            let cy = map_y(y, y_min, y_max, height);
            grid[cy][cx] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: period=[{}, {}] | ratio=[{y_min:.2}, {y_max:.2}]\n",
        chart.period_label(x_min),
        chart.period_label(x_max),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (i, s) in chart.series.iter().enumerate() {
        out.push_str(&format!("{} = {}\n", glyph(i), s.brand));
    }

    out
}

/// Horizontal bar chart; bars scale to the largest positive value.
///
/// Non-positive values get an empty bar but still show their label.
pub fn render_bars(title: &str, rows: &[(String, f64)], width: usize, fmt_value: fn(f64) -> String) -> String {
    let width = width.max(5);
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    for (label, v) in rows {
        let len = if max > 0.0 && *v > 0.0 {
            ((v / max) * width as f64).round() as usize
        } else {
            0
        };
        let line = format!(
            "{} {:<width$} {}",
            fit_width(label, LABEL_WIDTH),
            "#".repeat(len.min(width)),
            fmt_value(*v),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    if x_max <= x_min {
        return 0;
    }
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    if y_max <= y_min {
        return height - 1;
    }
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
