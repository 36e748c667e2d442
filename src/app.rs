use crate::braille;
use crate::config::AppConfig;
use crate::driver::SimulationDriver;
use crate::error::LifeError;
use crate::export;
use crate::patterns::SeedPattern;
use crate::settings::{BoundaryPolicy, SimulationSettings};
use crate::simulation::LifeSimulation;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;

/// Period change per keypress, in milliseconds
const PERIOD_STEP_MS: i64 = 50;
const DENSITY_STEP: f64 = 0.05;

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    Boundary,
    CellSize,
    Color,
    Density,
    Pattern,
    Speed,
    // Controls box (not a param)
    Controls,
    // Cell cursor on the canvas (not a param)
    Canvas,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls | Focus::Canvas => Focus::Boundary,
            Focus::Boundary => Focus::CellSize,
            Focus::CellSize => Focus::Color,
            Focus::Color => Focus::Density,
            Focus::Density => Focus::Pattern,
            Focus::Pattern => Focus::Speed,
            Focus::Speed => Focus::Boundary, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse alphabetical order
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls | Focus::Canvas => Focus::Speed,
            Focus::Boundary => Focus::Speed, // Loop back
            Focus::CellSize => Focus::Boundary,
            Focus::Color => Focus::CellSize,
            Focus::Density => Focus::Color,
            Focus::Pattern => Focus::Density,
            Focus::Speed => Focus::Pattern,
        }
    }

    /// Get the line index in the parameters box for this focus (alphabetical order)
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls | Focus::Canvas => 0,
            Focus::Boundary => 0,
            Focus::CellSize => 1,
            Focus::Color => 2,
            Focus::Density => 3,
            Focus::Pattern => 4,
            Focus::Speed => 5,
        }
    }

    /// Check if focus is on a parameter (not Controls, Canvas or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls | Focus::Canvas)
    }
}

/// Main application state
pub struct App {
    pub driver: SimulationDriver,
    pub settings: SimulationSettings,
    pub seed_pattern: SeedPattern,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_charts: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    /// Grid follows the canvas size instead of fixed dimensions
    pub fit_to_canvas: bool,
    /// Last error or confirmation shown in the status box
    pub status_message: Option<String>,
    /// Where `save_config` writes
    pub config_path: Option<PathBuf>,
    /// Grid cell edited by `toggle_at_cursor`
    pub cursor: (usize, usize),
    canvas_size: (u16, u16),
    rng: StdRng,
}

impl App {
    pub fn new(
        settings: SimulationSettings,
        seed_pattern: SeedPattern,
        grid_size: (usize, usize),
        canvas_size: (u16, u16),
        rng: StdRng,
    ) -> Result<Self, LifeError> {
        let mut engine = LifeSimulation::new(grid_size.0, grid_size.1)?;
        engine.set_boundary_policy(settings.boundary);
        let driver = SimulationDriver::new(engine, settings.period_ms)?;

        let mut app = Self {
            driver,
            settings,
            seed_pattern,
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_charts: true,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            fit_to_canvas: false,
            status_message: None,
            config_path: AppConfig::default_path(),
            cursor: (grid_size.0 / 2, grid_size.1 / 2),
            canvas_size,
            rng,
        };
        app.reset();
        Ok(app)
    }

    pub fn engine(&self) -> &LifeSimulation {
        self.driver.engine()
    }

    /// Fire the driver's schedule if due
    pub fn tick(&mut self) {
        self.driver.poll(Instant::now());
    }

    fn report<T>(&mut self, result: Result<T, LifeError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("{}", err);
                self.status_message = Some(err.to_string());
                None
            }
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls | Focus::Canvas => {}
            Focus::Boundary => self.cycle_boundary(),
            Focus::CellSize => self.adjust_cell_size(1),
            Focus::Color => self.settings.color_scheme = self.settings.color_scheme.next(),
            Focus::Density => self.adjust_density(DENSITY_STEP),
            Focus::Pattern => self.set_seed_pattern(self.seed_pattern.next()),
            // Faster means a shorter period
            Focus::Speed => self.adjust_speed(-PERIOD_STEP_MS),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls | Focus::Canvas => {}
            Focus::Boundary => self.cycle_boundary_prev(),
            Focus::CellSize => self.adjust_cell_size(-1),
            Focus::Color => self.settings.color_scheme = self.settings.color_scheme.prev(),
            Focus::Density => self.adjust_density(-DENSITY_STEP),
            Focus::Pattern => self.set_seed_pattern(self.seed_pattern.prev()),
            Focus::Speed => self.adjust_speed(PERIOD_STEP_MS),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Start or stop periodic stepping
    pub fn toggle_pause(&mut self) {
        if self.driver.is_running() {
            self.driver.stop();
        } else {
            let period = self.settings.period_ms;
            let result = self.driver.start(period);
            self.report(result);
        }
    }

    /// Advance exactly one generation
    pub fn step_once(&mut self) {
        self.driver.step_once();
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.driver.engine_mut().clear();
    }

    /// Fill the grid at the configured density
    pub fn randomize(&mut self) {
        let density = self.settings.random_density;
        let result = self.driver.engine_mut().randomize(density, &mut self.rng);
        self.report(result);
    }

    /// Reload the current seed pattern
    pub fn reset(&mut self) {
        let density = self.settings.random_density;
        let pattern = self.seed_pattern;
        let result = self
            .driver
            .engine_mut()
            .load_pattern(pattern, density, &mut self.rng);
        self.report(result);
    }

    /// Set seed pattern directly (number keys)
    pub fn set_seed_pattern(&mut self, pattern: SeedPattern) {
        self.seed_pattern = pattern;
        self.reset();
    }

    /// Flip the cell under a canvas-relative terminal position and put the
    /// cursor there.
    ///
    /// A terminal character can cover several cells; the cursor keys reach
    /// the others from the clicked one.
    pub fn click(&mut self, col: u16, row: u16) {
        let (x, y) = braille::canvas_to_cell(col, row, self.settings.cell_size);
        self.focus = Focus::Canvas;
        if x < self.engine().width() && y < self.engine().height() {
            self.cursor = (x, y);
        }
        let result = self.driver.engine_mut().toggle_cell(x, y);
        self.report(result);
    }

    /// Move the cell cursor, stopping at the grid edges
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let max_x = self.engine().width() - 1;
        let max_y = self.engine().height() - 1;
        let (x, y) = self.cursor;
        self.cursor = (
            x.saturating_add_signed(dx).min(max_x),
            y.saturating_add_signed(dy).min(max_y),
        );
        self.focus = Focus::Canvas;
    }

    /// Flip the cell under the cursor
    pub fn toggle_at_cursor(&mut self) {
        self.clamp_cursor();
        let (x, y) = self.cursor;
        let result = self.driver.engine_mut().toggle_cell(x, y);
        self.report(result);
    }

    fn clamp_cursor(&mut self) {
        let (w, h) = (self.engine().width(), self.engine().height());
        self.cursor = (self.cursor.0.min(w - 1), self.cursor.1.min(h - 1));
    }

    /// Cycle through boundary policies
    pub fn cycle_boundary(&mut self) {
        self.apply_boundary(self.settings.boundary.next());
    }

    /// Cycle boundary backward
    pub fn cycle_boundary_prev(&mut self) {
        self.apply_boundary(self.settings.boundary.prev());
    }

    fn apply_boundary(&mut self, policy: BoundaryPolicy) {
        self.settings.boundary = policy;
        self.driver.engine_mut().set_boundary_policy(policy);
        log::info!("Boundary policy set to {}", policy.name());
    }

    /// Change the tick period by `delta_ms`, re-arming the driver if running
    pub fn adjust_speed(&mut self, delta_ms: i64) {
        self.settings.adjust_period(delta_ms);
        let period = self.settings.period_ms;
        let result = self.driver.set_period(period);
        self.report(result);
    }

    /// Adjust randomize density
    pub fn adjust_density(&mut self, delta: f64) {
        self.settings.adjust_random_density(delta);
    }

    /// Adjust cell size; a fitted grid is rebuilt for the new scale
    pub fn adjust_cell_size(&mut self, delta: i32) {
        let before = self.settings.cell_size;
        self.settings.adjust_cell_size(delta);
        if self.settings.cell_size != before && self.fit_to_canvas {
            let (w, h) = self.canvas_size;
            self.refit(w, h);
        }
    }

    /// Cycle live cell colour
    pub fn cycle_color_scheme(&mut self) {
        self.settings.color_scheme = self.settings.color_scheme.next();
        self.focus = Focus::Color;
    }

    /// Track the canvas size; a fitted grid follows it
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        if (canvas_width, canvas_height) == self.canvas_size {
            return;
        }
        self.canvas_size = (canvas_width, canvas_height);
        if self.fit_to_canvas {
            self.refit(canvas_width, canvas_height);
        }
    }

    fn refit(&mut self, canvas_width: u16, canvas_height: u16) {
        let (w, h) =
            braille::calculate_simulation_size(canvas_width, canvas_height, self.settings.cell_size);
        if (w, h) == (self.engine().width(), self.engine().height()) {
            return;
        }
        let result = self.driver.engine_mut().resize(w, h);
        if self.report(result).is_some() {
            self.clamp_cursor();
            self.reset();
        }
    }

    /// Write current settings to the config file
    pub fn save_config(&mut self) {
        let Some(path) = self.config_path.clone() else {
            self.status_message = Some("Could not determine config directory".to_string());
            return;
        };
        let config = AppConfig {
            version: 1,
            settings: self.settings.clone(),
            seed_pattern: self.seed_pattern,
        };
        self.status_message = Some(match config.save_to_file(&path) {
            Ok(()) => {
                log::info!("Saved config to {}", path.display());
                format!("Saved {}", path.display())
            }
            Err(err) => {
                log::warn!("{}", err);
                err
            }
        });
    }

    /// Export the population charts as a PNG in the working directory
    pub fn export_chart(&mut self) {
        let path = export::default_chart_path(self.engine().generation());
        let result = export::export_population_chart(self.engine().history(), &path);
        self.status_message = Some(match result {
            Ok(()) => format!("Wrote {}", path.display()),
            Err(err) => {
                log::warn!("{}", err);
                err
            }
        });
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle population charts
    pub fn toggle_charts(&mut self) {
        self.show_charts = !self.show_charts;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }
}
