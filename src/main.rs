mod app;
mod braille;
mod color;
mod config;
mod driver;
mod error;
mod export;
mod history;
mod patterns;
mod settings;
mod simulation;
mod ui;

use app::{App, Focus};
use clap::Parser;
use color::ColorScheme;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use patterns::SeedPattern;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use settings::BoundaryPolicy;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "life-simulator")]
#[command(about = "Conway's Game of Life in the terminal")]
struct Args {
    // === Grid ===
    /// Grid width in cells (defaults to fitting the terminal)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (defaults to fitting the terminal)
    #[arg(long)]
    height: Option<usize>,

    /// Braille dots per cell side (1-4)
    #[arg(long = "cell-size")]
    cell_size: Option<u16>,

    /// Boundary policy (toroidal, bounded)
    #[arg(short = 'b', long)]
    boundary: Option<String>,

    // === Simulation ===
    /// Milliseconds between generations (50-2000)
    #[arg(short = 'p', long)]
    period: Option<u64>,

    /// Live probability used by randomize (0.0-1.0)
    #[arg(short = 'd', long)]
    density: Option<f64>,

    /// Starting pattern (empty, random, block, blinker, glider, r-pentomino, acorn, gosper)
    #[arg(long)]
    pattern: Option<String>,

    /// Seed for the random generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Start running immediately instead of paused
    #[arg(long, default_value = "false")]
    run: bool,

    // === Visual ===
    /// Live cell color (white, green, cyan, amber, magenta, red)
    #[arg(long)]
    color: Option<String>,

    // === Files ===
    /// Load settings from this JSON file (also where S saves)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write log output to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Route `log` output to a file; the terminal itself belongs to the UI
fn init_logging(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Merge the config file (if any) with command line overrides
fn load_config(args: &Args) -> Result<(AppConfig, Option<PathBuf>), String> {
    let path = args.config.clone().or_else(AppConfig::default_path);

    let mut config = match (&args.config, path.as_deref()) {
        // An explicit file must parse; a missing one is created on save
        (Some(explicit), _) if explicit.exists() => AppConfig::load_from_file(explicit)?,
        (None, Some(default)) if default.exists() => {
            AppConfig::load_from_file(default).unwrap_or_else(|err| {
                log::warn!("{}", err);
                AppConfig::default()
            })
        }
        _ => AppConfig::default(),
    };

    let settings = &mut config.settings;
    if let Some(period) = args.period {
        settings.period_ms = period;
    }
    if let Some(density) = args.density {
        settings.random_density = density;
    }
    if let Some(cell_size) = args.cell_size {
        settings.cell_size = cell_size;
    }
    if let Some(boundary) = &args.boundary {
        settings.boundary = BoundaryPolicy::parse(boundary);
    }
    if let Some(color) = &args.color {
        settings.color_scheme = ColorScheme::parse(color);
    }
    settings.sanitize();

    if let Some(pattern) = &args.pattern {
        config.seed_pattern = SeedPattern::parse(pattern);
    }

    Ok((config, path))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let (config, config_path) = load_config(&args)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let canvas = ui::get_canvas_rect(Rect::new(0, 0, size.width, size.height), false, true);
    let fitted =
        braille::calculate_simulation_size(canvas.width, canvas.height, config.settings.cell_size);
    let grid_size = (args.width.unwrap_or(fitted.0), args.height.unwrap_or(fitted.1));

    let res = match App::new(
        config.settings,
        config.seed_pattern,
        grid_size,
        (canvas.width, canvas.height),
        rng,
    ) {
        Ok(mut app) => {
            app.fit_to_canvas = args.width.is_none() && args.height.is_none();
            app.config_path = config_path;
            if args.run {
                app.toggle_pause();
            }
            log::info!(
                "Started with {}x{} grid, {} boundary",
                grid_size.0,
                grid_size.1,
                app.settings.boundary.name()
            );
            run_app(&mut terminal, &mut app)
        }
        Err(err) => Err(io::Error::new(io::ErrorKind::InvalidInput, err)),
    };

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{}", err);
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn frame_area<B: ratatui::backend::Backend>(terminal: &Terminal<B>) -> Rect {
    terminal
        .size()
        .map(|size| Rect::new(0, 0, size.width, size.height))
        .unwrap_or_default()
}

/// Feed the current canvas size back into the app after a layout change
fn sync_canvas<B: ratatui::backend::Backend>(terminal: &Terminal<B>, app: &mut App) {
    let canvas = ui::get_canvas_rect(frame_area(terminal), app.fullscreen_mode, app.show_charts);
    app.resize(canvas.width, canvas.height);
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Redraw at least this often even when paused
    const FRAME_DURATION: Duration = Duration::from_millis(50);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Wake up in time for the next scheduled generation
        let timeout = app
            .driver
            .time_until_next(Instant::now())
            .map_or(FRAME_DURATION, |due| due.min(FRAME_DURATION));

        // Poll for events with timeout
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('.') => app.step_once(),
                        KeyCode::Char('x') | KeyCode::Char('X') => app.clear(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.randomize(),
                        KeyCode::Enter => app.reset(),
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            sync_canvas(terminal, app);
                        }
                        KeyCode::Char('g') | KeyCode::Char('G') => {
                            app.toggle_charts();
                            sync_canvas(terminal, app);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                        KeyCode::Char('s') | KeyCode::Char('S') => app.save_config(),
                        KeyCode::Char('p') | KeyCode::Char('P') => app.export_chart(),
                        KeyCode::Char('1') => app.set_seed_pattern(SeedPattern::Empty),
                        KeyCode::Char('2') => app.set_seed_pattern(SeedPattern::Random),
                        KeyCode::Char('3') => app.set_seed_pattern(SeedPattern::Block),
                        KeyCode::Char('4') => app.set_seed_pattern(SeedPattern::Blinker),
                        KeyCode::Char('5') => app.set_seed_pattern(SeedPattern::Glider),
                        KeyCode::Char('6') => app.set_seed_pattern(SeedPattern::RPentomino),
                        KeyCode::Char('7') => app.set_seed_pattern(SeedPattern::Acorn),
                        KeyCode::Char('8') => app.set_seed_pattern(SeedPattern::GosperGun),
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.focus = Focus::Speed;
                            app.adjust_focused_up();
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.focus = Focus::Speed;
                            app.adjust_focused_down();
                        }
                        KeyCode::Char('[') => {
                            app.adjust_cell_size(-1);
                            app.focus = Focus::CellSize;
                        }
                        KeyCode::Char(']') => {
                            app.adjust_cell_size(1);
                            app.focus = Focus::CellSize;
                        }
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            app.cycle_boundary();
                            app.focus = Focus::Boundary;
                        }
                        KeyCode::Char('c') | KeyCode::Char('C') => app.cycle_color_scheme(),
                        KeyCode::Char('e') | KeyCode::Char('E') => app.focus = Focus::Canvas,
                        KeyCode::Char('t') | KeyCode::Char('T') => {
                            if app.focus == Focus::Canvas {
                                app.toggle_at_cursor();
                            }
                        }
                        KeyCode::Left if app.focus == Focus::Canvas => app.move_cursor(-1, 0),
                        KeyCode::Right if app.focus == Focus::Canvas => app.move_cursor(1, 0),
                        KeyCode::Up if app.focus == Focus::Canvas && !app.show_help => app.move_cursor(0, -1),
                        KeyCode::Down if app.focus == Focus::Canvas && !app.show_help => app.move_cursor(0, 1),

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up();
                                } else {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down();
                                } else {
                                    let visible = ui::get_controls_visible_lines(frame_area(terminal).height);
                                    app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES.saturating_sub(visible));
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() || app.focus == Focus::Canvas {
                                app.focus = Focus::Controls;
                            } else {
                                app.status_message = None;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        let canvas = ui::get_canvas_rect(frame_area(terminal), app.fullscreen_mode, app.show_charts);
                        let inside = mouse.column >= canvas.x
                            && mouse.column < canvas.x + canvas.width
                            && mouse.row >= canvas.y
                            && mouse.row < canvas.y + canvas.height;
                        if inside && !app.show_help {
                            app.click(mouse.column - canvas.x, mouse.row - canvas.y);
                        }
                    }
                }
                Event::Resize(width, height) => {
                    let canvas = ui::get_canvas_rect(
                        Rect::new(0, 0, width, height),
                        app.fullscreen_mode,
                        app.show_charts,
                    );
                    app.resize(canvas.width, canvas.height);
                }
                _ => {}
            }
        }

        // Fire the driver's schedule if due
        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimulationSettings;
    use tempfile::tempdir;

    fn args_for(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("life-simulator").chain(extra.iter().copied()))
    }

    #[test]
    fn test_cli_values_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        AppConfig {
            version: 1,
            settings: SimulationSettings {
                period_ms: 1000,
                boundary: BoundaryPolicy::Bounded,
                random_density: 0.4,
                cell_size: 2,
                color_scheme: ColorScheme::Cyan,
            },
            seed_pattern: SeedPattern::Acorn,
        }
        .save_to_file(&path)
        .unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let args = args_for(&["--config", &path_arg, "--period", "250", "--pattern", "glider"]);
        let (config, config_path) = load_config(&args).unwrap();

        assert_eq!(config_path, Some(path));
        // Overridden on the command line
        assert_eq!(config.settings.period_ms, 250);
        assert_eq!(config.seed_pattern, SeedPattern::Glider);
        // Kept from the file
        assert_eq!(config.settings.boundary, BoundaryPolicy::Bounded);
        assert_eq!(config.settings.random_density, 0.4);
        assert_eq!(config.settings.cell_size, 2);
        assert_eq!(config.settings.color_scheme, ColorScheme::Cyan);
    }

    #[test]
    fn test_cli_values_are_clamped() {
        let dir = tempdir().unwrap();
        let path_arg = dir.path().join("absent.json").to_string_lossy().to_string();
        let args = args_for(&["--config", &path_arg, "--period", "10", "--cell-size", "9"]);

        let (config, _) = load_config(&args).unwrap();
        assert_eq!(config.settings.period_ms, settings::MIN_PERIOD_MS);
        assert_eq!(config.settings.cell_size, settings::MAX_CELL_SIZE);
    }

    #[test]
    fn test_missing_explicit_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new").join("config.json");
        let path_arg = path.to_string_lossy().to_string();

        let (config, config_path) = load_config(&args_for(&["--config", &path_arg])).unwrap();
        assert_eq!(config_path, Some(path.clone()));
        assert_eq!(config.settings.period_ms, settings::DEFAULT_PERIOD_MS);
        assert_eq!(config.seed_pattern, SeedPattern::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_unreadable_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let result = load_config(&args_for(&["--config", &path_arg, "--period", "250"]));
        assert!(result.unwrap_err().contains("Failed to parse config file"));

        // A directory exists but cannot be read as a file
        let dir_arg = dir.path().to_string_lossy().to_string();
        assert!(load_config(&args_for(&["--config", &dir_arg])).is_err());
    }
}
