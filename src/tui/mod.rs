//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing the date range, time unit, and
//! categories, then renders the brand trend chart, the rankings, and the raw data.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
};

use crate::analysis::GROWTH_WINDOW;
use crate::app::pipeline::{AnalysisOutput, run_analysis};
use crate::catalog::KeywordCatalog;
use crate::data::DataLabClient;
use crate::domain::{AnalysisConfig, parse_date};
use crate::error::AppError;
use crate::report::{TrendChart, fit_width, trend_chart};

mod plotters_chart;

use plotters_chart::{ChartLine, TrendPlottersChart};

/// High-contrast line colors, cycled per brand.
const PALETTE: [(u8, u8, u8); 8] = [
    (0, 255, 255),
    (255, 200, 0),
    (0, 255, 0),
    (255, 80, 80),
    (180, 120, 255),
    (255, 140, 0),
    (80, 160, 255),
    (255, 255, 255),
];

/// Settings rows above the category toggles.
const FIXED_FIELDS: usize = 3;
const FIELD_START: usize = 0;
const FIELD_END: usize = 1;
const FIELD_UNIT: usize = 2;

/// Start the TUI.
pub fn run(config: AnalysisConfig, client: DataLabClient, catalog: KeywordCatalog) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, client, catalog);
    app.request_refresh();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Trends,
    Rankings,
    Data,
}

impl View {
    fn next(self) -> Self {
        match self {
            View::Trends => View::Rankings,
            View::Rankings => View::Data,
            View::Data => View::Trends,
        }
    }

    fn title(self) -> &'static str {
        match self {
            View::Trends => "Search trend by brand",
            View::Rankings => "Rankings",
            View::Data => "Raw search ratios",
        }
    }
}

struct App {
    config: AnalysisConfig,
    catalog: KeywordCatalog,
    client: DataLabClient,
    selected_field: usize,
    editing_date: bool,
    date_input: String,
    view: View,
    data_scroll: u16,
    status: String,
    /// Set when a sweep should start right after the next redraw.
    fetch_pending: bool,
    run: Option<AnalysisOutput>,
}

impl App {
    fn new(config: AnalysisConfig, client: DataLabClient, catalog: KeywordCatalog) -> Self {
        Self {
            config,
            catalog,
            client,
            selected_field: 0,
            editing_date: false,
            date_input: String::new(),
            view: View::Trends,
            data_scroll: 0,
            status: String::new(),
            fetch_pending: false,
            run: None,
        }
    }

    fn field_count(&self) -> usize {
        FIXED_FIELDS + self.catalog.list_categories().len()
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            // The sweep blocks; the "Fetching" status was drawn above.
            if self.fetch_pending {
                self.fetch_pending = false;
                self.refresh();
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_date {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < self.field_count() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_field(),
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char('v') => {
                self.view = self.view.next();
                self.data_scroll = 0;
            }
            KeyCode::Char('j') | KeyCode::PageDown => {
                self.data_scroll = self.data_scroll.saturating_add(5);
            }
            KeyCode::Char('k') | KeyCode::PageUp => {
                self.data_scroll = self.data_scroll.saturating_sub(5);
            }
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_date = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_date = false;
                self.apply_date_input();
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn activate_field(&mut self) {
        match self.selected_field {
            FIELD_START | FIELD_END => {
                self.editing_date = true;
                self.date_input.clear();
                self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
            }
            FIELD_UNIT => self.adjust_field(1),
            i => self.toggle_category(i - FIXED_FIELDS),
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_START => self.shift_date(true, delta),
            FIELD_END => self.shift_date(false, delta),
            FIELD_UNIT => {
                self.config.time_unit = if delta >= 0 {
                    self.config.time_unit.next()
                } else {
                    self.config.time_unit.prev()
                };
                self.status = format!("unit: {} (r to run)", self.config.time_unit.display_name());
            }
            i => self.toggle_category(i - FIXED_FIELDS),
        }
    }

    fn shift_date(&mut self, start: bool, delta: i32) {
        let step = chrono::Duration::days(i64::from(delta));
        let date = if start {
            &mut self.config.start_date
        } else {
            &mut self.config.end_date
        };
        *date += step;
        self.status = format!(
            "range: {} .. {} (r to run)",
            self.config.start_date, self.config.end_date
        );
    }

    fn toggle_category(&mut self, index: usize) {
        let Some(name) = self.catalog.list_categories().get(index).map(|c| c.to_string()) else {
            return;
        };
        if let Some(pos) = self.config.categories.iter().position(|c| *c == name) {
            self.config.categories.remove(pos);
            self.status = format!("removed {name} (r to run)");
        } else {
            self.status = format!("added {name} (r to run)");
            self.config.categories.push(name);
        }
    }

    fn apply_date_input(&mut self) {
        let date = match parse_date(&self.date_input) {
            Ok(d) => d,
            Err(e) => {
                self.status = e;
                return;
            }
        };
        if self.selected_field == FIELD_START {
            self.config.start_date = date;
        } else {
            self.config.end_date = date;
        }
        self.date_input.clear();
        self.status = format!(
            "range: {} .. {} (r to run)",
            self.config.start_date, self.config.end_date
        );
    }

    fn request_refresh(&mut self) {
        self.fetch_pending = true;
        self.status = format!(
            "Fetching {} .. {} ({})...",
            self.config.start_date,
            self.config.end_date,
            self.config.categories.join(", ")
        );
    }

    /// Run a fresh sweep. Errors land in the status line; the previous result is dropped.
    fn refresh(&mut self) {
        self.run = None;
        self.data_scroll = 0;
        match run_analysis(&self.config, &self.client, &self.catalog) {
            Ok(run) => {
                self.status = if run.failures.is_empty() {
                    format!("Fetched {} points.", run.table.len())
                } else {
                    let first = &run.failures[0];
                    format!(
                        "Fetched {} points; {} of {} request(s) failed (chunk {}: {}).",
                        run.table.len(),
                        run.failures.len(),
                        run.chunks,
                        first.index + 1,
                        first.error
                    )
                };
                self.run = Some(run);
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let settings_height = (self.field_count() as u16).saturating_add(2);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(settings_height),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.view {
            View::Trends => self.draw_trends(frame, chunks[1]),
            View::Rankings => self.draw_rankings(frame, chunks[1]),
            View::Data => self.draw_data(frame, chunks[1]),
        }
        self.draw_settings(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("trends", Style::default().fg(Color::Cyan)),
            Span::raw(" - food brand search trends (NAVER DataLab)"),
        ]));

        let (points, brands, failed) = self
            .run
            .as_ref()
            .map(|r| (r.table.len(), r.table.brands().len(), r.failures.len()))
            .unwrap_or((0, 0, 0));

        lines.push(Line::from(Span::styled(
            format!(
                "range: {} .. {} | unit: {} | categories: {} | brands: {brands} | points: {points} | failed requests: {failed}",
                self.config.start_date,
                self.config.end_date,
                self.config.time_unit.display_name(),
                if self.config.categories.is_empty() {
                    "-".to_string()
                } else {
                    self.config.categories.join(", ")
                },
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn waiting(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let msg = Paragraph::new("No data. Adjust settings and press r.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default());
        frame.render_widget(msg, area);
    }

    fn draw_trends(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.view.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(chart) = self.run.as_ref().and_then(|r| trend_chart(&r.table)) else {
            self.waiting(frame, inner);
            return;
        };

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(24)])
            .split(inner);

        let lines = chart_lines(&chart);
        let fmt_x = |x: f64| chart.period_label(x);
        let (chart_rect, insets) = chart_layout(cols[0]);
        let widget = TrendPlottersChart {
            lines: &lines,
            x_bounds: chart.x_bounds,
            y_bounds: chart.y_bounds,
            x_label: "period",
            y_label: "ratio",
            fmt_x: &fmt_x,
            fmt_y: fmt_axis_y,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, cols[0], chart_rect, insets, &chart);
        }

        let legend: Vec<ListItem> = chart
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let (r, g, b) = PALETTE[i % PALETTE.len()];
                ListItem::new(Line::from(vec![
                    Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))),
                    Span::raw(s.brand.clone()),
                ]))
            })
            .collect();
        frame.render_widget(List::new(legend).block(Block::default().title("Brands")), cols[1]);
    }

    fn draw_rankings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(run) = &self.run else {
            let block = Block::default().title(self.view.title()).borders(Borders::ALL);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            self.waiting(frame, inner);
            return;
        };

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(area);

        let header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

        let mean_rows: Vec<Row> = run
            .rankings
            .mean
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(r.brand.clone()),
                    Cell::from(format!("{:.2}", r.mean_ratio)),
                ])
            })
            .collect();
        let mean = Table::new(mean_rows, [Constraint::Length(3), Constraint::Min(8), Constraint::Length(8)])
            .header(Row::new(vec!["#", "brand", "mean"]).style(header_style))
            .block(Block::default().title(format!("Top {} by mean ratio", run.rankings.mean.len())).borders(Borders::ALL));
        frame.render_widget(mean, cols[0]);

        let share_rows: Vec<Row> = run
            .rankings
            .share
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let (r, g, b) = PALETTE[i % PALETTE.len()];
                Row::new(vec![
                    Cell::from(s.brand.clone()),
                    Cell::from(format!("{:.1}%", s.share * 100.0)),
                    Cell::from(share_bar(s.share, 20)).style(Style::default().fg(Color::Rgb(r, g, b))),
                ])
            })
            .collect();
        let share = Table::new(share_rows, [Constraint::Min(8), Constraint::Length(7), Constraint::Length(20)])
            .header(Row::new(vec!["brand", "share", ""]).style(header_style))
            .block(Block::default().title("Share of mean ratio").borders(Borders::ALL));
        frame.render_widget(share, cols[1]);

        let window = run.range.unit.window_label(GROWTH_WINDOW);
        let growth_block = Block::default()
            .title(format!("Top risers, last {window}"))
            .borders(Borders::ALL);
        if run.rankings.growth.is_empty() {
            let msg = Paragraph::new(format!(
                "No brand rose meaningfully over the last {window}."
            ))
            .style(Style::default().fg(Color::Yellow))
            .block(growth_block);
            frame.render_widget(msg, cols[2]);
        } else {
            let growth_rows: Vec<Row> = run
                .rankings
                .growth
                .iter()
                .map(|g| {
                    Row::new(vec![
                        Cell::from(g.brand.clone()),
                        Cell::from(format!("{:+.1}%", g.growth_percent))
                            .style(Style::default().fg(Color::Green)),
                    ])
                })
                .collect();
            let growth = Table::new(growth_rows, [Constraint::Min(8), Constraint::Length(10)])
                .header(Row::new(vec!["brand", "growth"]).style(header_style))
                .block(growth_block);
            frame.render_widget(growth, cols[2]);
        }
    }

    fn draw_data(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!("{} (j/k scroll)", self.view.title()))
            .borders(Borders::ALL);
        let Some(run) = &self.run else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            self.waiting(frame, inner);
            return;
        };

        let mut lines: Vec<Line> = Vec::with_capacity(run.table.len() + 1);
        lines.push(Line::from(Span::styled(
            format!("{:<20} {:<10} {:>10}", "brand", "period", "ratio"),
            Style::default().fg(Color::Cyan),
        )));
        for (brand, series) in run.table.grouped() {
            for (period, ratio) in series {
                lines.push(Line::from(format!("{} {period:<10} {ratio:>10.3}", fit_width(brand, 20))));
            }
        }

        let p = Paragraph::new(Text::from(lines))
            .block(block)
            .scroll((self.data_scroll, 0));
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::new();
        items.push(ListItem::new(format!("Start: {}", self.config.start_date)));
        items.push(ListItem::new(format!("End:   {}", self.config.end_date)));
        items.push(ListItem::new(format!("Unit:  {}", self.config.time_unit.display_name())));
        for cat in self.catalog.list_categories() {
            let mark = if self.config.categories.iter().any(|c| c == cat) { "[x]" } else { "[ ]" };
            items.push(ListItem::new(format!("{mark} {cat}")));
        }

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_date {
            let hint = Paragraph::new(format!("New date: {}_", self.date_input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + area.width / 2,
                y: area.y + 1,
                width: (area.width / 2).saturating_sub(1),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit/toggle  r run  v view  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn chart_lines(chart: &TrendChart) -> Vec<ChartLine> {
    chart
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let (r, g, b) = PALETTE[i % PALETTE.len()];
            ChartLine {
                color: RGBColor(r, g, b),
                points: s.points.clone(),
            }
        })
        .collect()
}

fn share_bar(share: f64, width: usize) -> String {
    let n = (share.clamp(0.0, 1.0) * width as f64).round() as usize;
    "█".repeat(n)
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 6,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(frame: &mut ratatui::Frame<'_>, inner: Rect, chart: Rect, insets: AxisInsets, trend: &TrendChart) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let [x0, x1] = trend.x_bounds;
    let [y0, y1] = trend.y_bounds;

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = trend.period_label(x0 + u * (x1 - x0));
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = fmt_axis_y(y0 + u * (y1 - y0));
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("period")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("ratio")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_bar_scales_and_clamps() {
        assert_eq!(share_bar(0.5, 10).chars().count(), 5);
        assert_eq!(share_bar(1.5, 10).chars().count(), 10);
        assert_eq!(share_bar(0.0, 10), "");
    }

    #[test]
    fn view_cycles() {
        assert_eq!(View::Trends.next(), View::Rankings);
        assert_eq!(View::Data.next(), View::Trends);
    }

    fn app() -> App {
        let client = DataLabClient::new(
            crate::data::Credentials::new("id", "secret"),
            "http://127.0.0.1:9",
            Duration::from_secs(1),
        )
        .unwrap();
        let config = AnalysisConfig {
            start_date: parse_date("2025-03-01").unwrap(),
            end_date: parse_date("2025-03-07").unwrap(),
            time_unit: crate::domain::TimeUnit::Day,
            categories: vec!["pizza".to_string()],
            plot: false,
            plot_width: 100,
            plot_height: 20,
            export_csv: None,
            export_json: None,
        };
        App::new(config, client, KeywordCatalog::default())
    }

    #[test]
    fn category_rows_toggle_selection() {
        let mut app = app();
        app.selected_field = FIXED_FIELDS + 1;
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.config.categories, vec!["pizza", "burger"]);

        app.selected_field = FIXED_FIELDS;
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.config.categories, vec!["burger"]);
    }

    #[test]
    fn date_editing_applies_valid_input_only() {
        let mut app = app();
        app.selected_field = FIELD_END;
        app.handle_key(KeyCode::Enter);
        assert!(app.editing_date);
        for c in "2025-03-31".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert!(!app.editing_date);
        assert_eq!(app.config.end_date, parse_date("2025-03-31").unwrap());

        app.handle_key(KeyCode::Enter);
        for c in "2025-13".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.config.end_date, parse_date("2025-03-31").unwrap());
        assert!(app.status.contains("invalid date"));
    }

    #[test]
    fn arrows_move_dates_and_cycle_unit() {
        let mut app = app();
        app.handle_key(KeyCode::Right);
        assert_eq!(app.config.start_date, parse_date("2025-03-02").unwrap());

        app.selected_field = FIELD_UNIT;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.config.time_unit, crate::domain::TimeUnit::Week);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn refresh_key_shows_fetching_before_the_sweep() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('r')));
        assert!(app.fetch_pending);
        assert!(app.status.starts_with("Fetching 2025-03-01 .. 2025-03-07"));
        assert!(app.run.is_none());
    }

    #[test]
    fn tiny_area_skips_insets() {
        let (rect, insets) = chart_layout(Rect::new(0, 0, 10, 5));
        assert_eq!(rect, Rect::new(0, 0, 10, 5));
        assert!(insets.is_none());
    }
}
