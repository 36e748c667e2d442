use crate::color::ColorScheme;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PERIOD_MS: u64 = 500;
pub const MIN_PERIOD_MS: u64 = 50;
pub const MAX_PERIOD_MS: u64 = 2000;
pub const MAX_CELL_SIZE: u16 = 4;

/// How neighbor lookups behave past the grid edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Edges wrap to the opposite side
    #[default]
    Toroidal,
    /// Positions past the edge are permanently dead
    Bounded,
}

impl BoundaryPolicy {
    pub fn name(&self) -> &str {
        match self {
            BoundaryPolicy::Toroidal => "Toroidal",
            BoundaryPolicy::Bounded => "Bounded",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            BoundaryPolicy::Toroidal => BoundaryPolicy::Bounded,
            BoundaryPolicy::Bounded => BoundaryPolicy::Toroidal,
        }
    }

    pub fn prev(&self) -> Self {
        // Only two variants, so both directions land on the other one
        self.next()
    }

    /// Parse a CLI value, falling back to toroidal
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bounded" | "bound" | "dead" | "finite" => BoundaryPolicy::Bounded,
            _ => BoundaryPolicy::Toroidal,
        }
    }
}

/// User-adjustable simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Milliseconds between generations while running
    pub period_ms: u64,
    /// Edge handling for neighbor counts
    pub boundary: BoundaryPolicy,
    /// Live probability used by randomize (0.0-1.0)
    pub random_density: f64,
    /// Braille dots per cell side (1-4)
    pub cell_size: u16,
    /// Live cell colour
    pub color_scheme: ColorScheme,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            boundary: BoundaryPolicy::default(),
            random_density: 0.1,
            cell_size: 1,
            color_scheme: ColorScheme::default(),
        }
    }
}

impl SimulationSettings {
    /// Adjust tick period within bounds
    pub fn adjust_period(&mut self, delta: i64) {
        self.period_ms =
            (self.period_ms as i64 + delta).clamp(MIN_PERIOD_MS as i64, MAX_PERIOD_MS as i64) as u64;
    }

    /// Adjust random density within bounds
    pub fn adjust_random_density(&mut self, delta: f64) {
        self.random_density = (self.random_density + delta).clamp(0.0, 1.0);
    }

    /// Adjust cell size within bounds
    pub fn adjust_cell_size(&mut self, delta: i32) {
        self.cell_size = (self.cell_size as i32 + delta).clamp(1, MAX_CELL_SIZE as i32) as u16;
    }

    /// Bring values loaded from disk or the command line back into range.
    ///
    /// Each adjusted value is logged at `warn`. Returns true if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;

        let period = self.period_ms.clamp(MIN_PERIOD_MS, MAX_PERIOD_MS);
        if period != self.period_ms {
            log::warn!("Period {}ms out of range, using {}ms", self.period_ms, period);
            self.period_ms = period;
            changed = true;
        }

        let density = if self.random_density.is_finite() {
            self.random_density.clamp(0.0, 1.0)
        } else {
            0.1
        };
        if density.to_bits() != self.random_density.to_bits() {
            log::warn!("Density {} out of range, using {}", self.random_density, density);
            self.random_density = density;
            changed = true;
        }

        let cell_size = self.cell_size.clamp(1, MAX_CELL_SIZE);
        if cell_size != self.cell_size {
            log::warn!("Cell size {} out of range, using {}", self.cell_size, cell_size);
            self.cell_size = cell_size;
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_reports_clamped_values() {
        let mut settings = SimulationSettings::default();
        assert!(!settings.sanitize());

        settings.period_ms = 10;
        assert!(settings.sanitize());
        assert_eq!(settings.period_ms, MIN_PERIOD_MS);

        settings.random_density = f64::NAN;
        settings.cell_size = 0;
        assert!(settings.sanitize());
        assert_eq!(settings.random_density, 0.1);
        assert_eq!(settings.cell_size, 1);
        assert!(!settings.sanitize());
    }

    #[test]
    fn test_boundary_cycle() {
        assert_eq!(BoundaryPolicy::Toroidal.next(), BoundaryPolicy::Bounded);
        assert_eq!(BoundaryPolicy::Bounded.next(), BoundaryPolicy::Toroidal);
        assert_eq!(BoundaryPolicy::Bounded.prev(), BoundaryPolicy::Toroidal);
    }

    #[test]
    fn test_boundary_parse() {
        assert_eq!(BoundaryPolicy::parse("Bounded"), BoundaryPolicy::Bounded);
        assert_eq!(BoundaryPolicy::parse("wrap"), BoundaryPolicy::Toroidal);
        assert_eq!(BoundaryPolicy::parse("torus"), BoundaryPolicy::Toroidal);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut settings = SimulationSettings::default();
        assert_eq!(settings.period_ms, 500);

        settings.adjust_period(-10_000);
        assert_eq!(settings.period_ms, MIN_PERIOD_MS);
        settings.adjust_period(10_000);
        assert_eq!(settings.period_ms, MAX_PERIOD_MS);

        settings.adjust_random_density(5.0);
        assert_eq!(settings.random_density, 1.0);
        settings.adjust_random_density(-5.0);
        assert_eq!(settings.random_density, 0.0);

        settings.adjust_cell_size(-3);
        assert_eq!(settings.cell_size, 1);
        settings.adjust_cell_size(10);
        assert_eq!(settings.cell_size, MAX_CELL_SIZE);
    }

    #[test]
    fn test_sanitize() {
        let mut settings = SimulationSettings {
            period_ms: 0,
            random_density: f64::NAN,
            cell_size: 0,
            ..SimulationSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.period_ms, MIN_PERIOD_MS);
        assert_eq!(settings.random_density, 0.1);
        assert_eq!(settings.cell_size, 1);
    }
}
