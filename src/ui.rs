use crate::app::{App, Focus};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;
const STATUS_HEIGHT: u16 = 10;
const PARAMS_HEIGHT: u16 = 8;

/// Height of the population chart strip under the canvas
const CHART_HEIGHT: u16 = 12;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 50;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 19;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;
const CHART_COLOR: Color = Color::Rgb(75, 192, 192);
const CURSOR_COLOR: Color = Color::LightRed;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (sidebar, canvas, charts) = split_layout(area, app.fullscreen_mode, app.show_charts);

    if let Some(sidebar) = sidebar {
        render_sidebar(frame, sidebar, app);
    }
    render_canvas(frame, canvas, app);
    if let Some(charts) = charts {
        render_charts(frame, charts, app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Split the frame into (sidebar, canvas, charts)
fn split_layout(area: Rect, fullscreen: bool, show_charts: bool) -> (Option<Rect>, Rect, Option<Rect>) {
    if fullscreen {
        return (None, area, None);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    if !show_charts {
        return (Some(columns[0]), columns[1], None);
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(CHART_HEIGHT)])
        .split(columns[1]);

    (Some(columns[0]), rows[0], Some(rows[1]))
}

/// Inner canvas rectangle (excluding borders) for the given frame area
pub fn get_canvas_rect(frame_area: Rect, fullscreen: bool, show_charts: bool) -> Rect {
    let (_, canvas, _) = split_layout(frame_area, fullscreen, show_charts);
    styled_block("").inner(canvas)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Length(PARAMS_HEIGHT),
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Game of Life ");
    let engine = app.engine();

    let (status_text, status_color) = if app.driver.is_running() {
        ("RUNNING", Color::Green)
    } else {
        ("PAUSED", HIGHLIGHT_COLOR)
    };

    let stat = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(value, Style::default().fg(TEXT_COLOR)),
        ])
    };

    let mut content = vec![
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
        stat("Gen", engine.generation().to_string()),
        stat("Peak", engine.history().peak().to_string()),
        stat("Live", engine.population().to_string()),
        stat("Grid", format!("{}x{}", engine.width(), engine.height())),
        stat("Period", format!("{}ms", app.driver.period_ms())),
        stat("Edge", engine.boundary_policy().name().to_string()),
    ];

    if let Some(message) = &app.status_message {
        content.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(HIGHLIGHT_COLOR),
        )));
    }

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let settings = &app.settings;

    let content = vec![
        make_line(
            "Boundary",
            settings.boundary.name().to_string(),
            app.focus == Focus::Boundary,
        ),
        make_line(
            "Cell",
            format!("{} dot", settings.cell_size),
            app.focus == Focus::CellSize,
        ),
        make_line(
            "Color",
            settings.color_scheme.name().to_string(),
            app.focus == Focus::Color,
        ),
        make_line(
            "Density",
            format!("{:.2}", settings.random_density),
            app.focus == Focus::Density,
        ),
        make_line(
            "Pattern",
            app.seed_pattern.name().to_string(),
            app.focus == Focus::Pattern,
        ),
        make_line(
            "Period",
            format!("{}ms", settings.period_ms),
            app.focus == Focus::Speed,
        ),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2); // minus borders
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0 // No scrolling needed
    } else if focus_line >= visible_height {
        // Scroll to show focused line at bottom of visible area
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0 // Focus is within first visible lines
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: String| {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let run_label = if app.driver.is_running() { "stop" } else { "start" };

    let content = vec![
        make_control("Space", run_label.to_string()),
        make_control("N/.", "step once".to_string()),
        make_control("Click", "toggle cell".to_string()),
        make_control("E", "cell cursor".to_string()),
        make_control("T", "toggle at cursor".to_string()),
        make_control("X", "clear".to_string()),
        make_control("R", "randomize".to_string()),
        make_control("Enter", "reload pattern".to_string()),
        make_control("1-8", "patterns".to_string()),
        make_control("B", app.settings.boundary.name().to_string()),
        make_control("C", "cell color".to_string()),
        make_control("+/-", "speed".to_string()),
        make_control("[/]", "cell size".to_string()),
        make_control("G", "charts".to_string()),
        make_control("V", "fullscreen".to_string()),
        make_control("S", "save config".to_string()),
        make_control("P", "export chart".to_string()),
        make_control("H", "help".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let block = styled_block(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut cells = braille::render_to_braille(
        app.engine(),
        inner.width,
        inner.height,
        app.settings.cell_size,
        app.settings.color_scheme.color(),
    );
    if app.focus == Focus::Canvas {
        braille::overlay_cursor(&mut cells, app.cursor, app.settings.cell_size, CURSOR_COLOR);
    }

    for cell in cells {
        let x = inner.x.saturating_add(cell.x);
        let y = inner.y.saturating_add(cell.y);

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            let paragraph = Paragraph::new(Line::from(span));
            frame.render_widget(paragraph, cell_rect);
        }
    }
}

fn render_charts(frame: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let history = app.engine().history();
    let linear: Vec<(f64, f64)> = history
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &p)| (i as f64, p as f64))
        .collect();
    let log: Vec<(f64, f64)> = history
        .log10_series()
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v))
        .collect();

    let title = format!(" Population: {} ", history.latest());
    render_series(frame, halves[0], &title, &linear);
    render_series(frame, halves[1], " Population (log10) ", &log);
}

fn render_series(frame: &mut Frame, area: Rect, title: &str, points: &[(f64, f64)]) {
    let x_max = points.len().saturating_sub(1).max(1) as f64;
    let y_max = points.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max).max(1.0);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(CHART_COLOR))
        .data(points);

    let label_style = Style::default().fg(DIM_TEXT_COLOR);
    let chart = Chart::new(vec![dataset])
        .block(styled_block(title))
        .x_axis(
            Axis::default()
                .style(label_style)
                .bounds([0.0, x_max])
                .labels(["0".to_string(), format!("{}", x_max as u64)]),
        )
        .y_axis(
            Axis::default()
                .style(label_style)
                .bounds([0.0, y_max])
                .labels(["0".to_string(), format_axis_value(y_max)]),
        );

    frame.render_widget(chart, area);
}

fn format_axis_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{:.2}", value)
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(36);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("CONWAY'S GAME OF LIFE", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("A live cell with 2 or 3 live neighbors survives. A dead cell with exactly 3 live neighbors is born. Everything else dies or stays dead."),
        Line::from(""),
        Line::from(Span::styled("PATTERNS (1-8):", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("1=Empty, 2=Random, 3=Block, 4=Blinker, 5=Glider, 6=R-Pentomino, 7=Acorn, 8=Gosper Gun"),
        Line::from(""),
        Line::from(Span::styled("B - Boundary", Style::default().fg(TEXT_COLOR))),
        Line::from("Toroidal: edges wrap to the opposite side"),
        Line::from("Bounded: cells past the edge are always dead"),
        Line::from(""),
        Line::from(Span::styled("Editing", Style::default().fg(TEXT_COLOR))),
        Line::from("Click a cell to toggle it. E shows the cell cursor: arrows move it one cell, T toggles the cell under it. Edits do not advance the generation counter."),
        Line::from(""),
        Line::from(Span::styled("Charts", Style::default().fg(TEXT_COLOR))),
        Line::from("Population per generation, linear and log10. Clear, randomize and pattern loads reset the history."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Start/Stop, N=Step, X=Clear, R=Randomize, +/-=Speed, [/]=Cell size, G=Charts, V=Fullscreen, S=Save config, P=Export chart, Tab/Arrows=Adjust, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

/// Visible lines in the controls box for a given terminal height
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    // Status + Parameters + controls borders
    terminal_height.saturating_sub(STATUS_HEIGHT + PARAMS_HEIGHT + 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::SeedPattern;
    use crate::settings::{BoundaryPolicy, SimulationSettings};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::{backend::TestBackend, Terminal};

    fn frame_area(width: u16, height: u16) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    #[test]
    fn test_canvas_rect_fullscreen() {
        let canvas = get_canvas_rect(frame_area(80, 24), true, true);
        assert_eq!(canvas, Rect { x: 1, y: 1, width: 78, height: 22 });
    }

    #[test]
    fn test_canvas_rect_with_sidebar_and_charts() {
        let canvas = get_canvas_rect(frame_area(80, 40), false, true);
        assert_eq!(canvas.x, SIDEBAR_WIDTH + 1);
        assert_eq!(canvas.width, 80 - SIDEBAR_WIDTH - 2);
        assert_eq!(canvas.height, 40 - CHART_HEIGHT - 2);

        let without_charts = get_canvas_rect(frame_area(80, 40), false, false);
        assert_eq!(without_charts.height, 38);
    }

    fn screen_text(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_status_box_shows_period_and_boundary() {
        let mut settings = SimulationSettings::default();
        settings.period_ms = 250;
        settings.boundary = BoundaryPolicy::Bounded;
        let app = App::new(
            settings,
            SeedPattern::Glider,
            (30, 20),
            (40, 20),
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        let text = screen_text(&app, 100, 40);
        assert!(text.contains("Period: 250ms"));
        assert!(text.contains("Edge: Bounded"));
        assert!(text.contains("Live: 5"));
    }

    #[test]
    fn test_controls_visible_lines() {
        assert_eq!(get_controls_visible_lines(40), 40 - STATUS_HEIGHT - PARAMS_HEIGHT - 2);
        assert_eq!(get_controls_visible_lines(10), 0);
    }

    #[test]
    fn test_format_axis_value() {
        assert_eq!(format_axis_value(120.0), "120");
        assert_eq!(format_axis_value(2.5), "2.50");
    }
}
