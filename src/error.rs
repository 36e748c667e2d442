use std::fmt;

/// Rejected engine or driver operation. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifeError {
    /// Width or height of zero passed to `resize`
    InvalidDimension { width: usize, height: usize },
    /// Coordinate outside the grid passed to `toggle_cell`
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Live probability outside [0, 1] (or NaN) passed to `randomize`
    InvalidProbability(f64),
    /// Zero tick period passed to the driver
    InvalidPeriod(u64),
}

impl fmt::Display for LifeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeError::InvalidDimension { width, height } => {
                write!(f, "Invalid grid dimensions {}x{}: both must be positive", width, height)
            }
            LifeError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "Cell ({}, {}) is outside the {}x{} grid", x, y, width, height),
            LifeError::InvalidProbability(p) => {
                write!(f, "Invalid live probability {}: must be within 0.0-1.0", p)
            }
            LifeError::InvalidPeriod(ms) => {
                write!(f, "Invalid tick period {}ms: must be positive", ms)
            }
        }
    }
}

impl std::error::Error for LifeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LifeError::OutOfBounds {
            x: 10,
            y: 2,
            width: 8,
            height: 8,
        };
        assert_eq!(err.to_string(), "Cell (10, 2) is outside the 8x8 grid");
        assert!(LifeError::InvalidPeriod(0).to_string().contains("0ms"));
    }
}
