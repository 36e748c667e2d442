use serde::{Deserialize, Serialize};

/// Built-in starting patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeedPattern {
    Empty,
    #[default]
    Random,
    Block,
    Blinker,
    Glider,
    RPentomino,
    Acorn,
    GosperGun,
}

impl SeedPattern {
    pub fn name(&self) -> &str {
        match self {
            SeedPattern::Empty => "Empty",
            SeedPattern::Random => "Random",
            SeedPattern::Block => "Block",
            SeedPattern::Blinker => "Blinker",
            SeedPattern::Glider => "Glider",
            SeedPattern::RPentomino => "R-Pentomino",
            SeedPattern::Acorn => "Acorn",
            SeedPattern::GosperGun => "Gosper Gun",
        }
    }

    pub fn next(&self) -> SeedPattern {
        match self {
            SeedPattern::Empty => SeedPattern::Random,
            SeedPattern::Random => SeedPattern::Block,
            SeedPattern::Block => SeedPattern::Blinker,
            SeedPattern::Blinker => SeedPattern::Glider,
            SeedPattern::Glider => SeedPattern::RPentomino,
            SeedPattern::RPentomino => SeedPattern::Acorn,
            SeedPattern::Acorn => SeedPattern::GosperGun,
            SeedPattern::GosperGun => SeedPattern::Empty,
        }
    }

    pub fn prev(&self) -> SeedPattern {
        match self {
            SeedPattern::Empty => SeedPattern::GosperGun,
            SeedPattern::Random => SeedPattern::Empty,
            SeedPattern::Block => SeedPattern::Random,
            SeedPattern::Blinker => SeedPattern::Block,
            SeedPattern::Glider => SeedPattern::Blinker,
            SeedPattern::RPentomino => SeedPattern::Glider,
            SeedPattern::Acorn => SeedPattern::RPentomino,
            SeedPattern::GosperGun => SeedPattern::Acorn,
        }
    }

    /// Parse a CLI value, falling back to random
    pub fn parse(s: &str) -> SeedPattern {
        match s.to_lowercase().as_str() {
            "empty" | "none" | "blank" => SeedPattern::Empty,
            "block" => SeedPattern::Block,
            "blinker" => SeedPattern::Blinker,
            "glider" => SeedPattern::Glider,
            "r-pentomino" | "rpentomino" | "r" => SeedPattern::RPentomino,
            "acorn" => SeedPattern::Acorn,
            "gosper" | "gun" | "gosper-gun" => SeedPattern::GosperGun,
            _ => SeedPattern::Random,
        }
    }

    /// Live cell offsets relative to the pattern's top-left corner.
    /// Empty for `Empty` and `Random`, which are not fixed shapes.
    pub fn cells(&self) -> &'static [(usize, usize)] {
        match self {
            SeedPattern::Empty | SeedPattern::Random => &[],
            SeedPattern::Block => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            SeedPattern::Blinker => &[(0, 0), (1, 0), (2, 0)],
            SeedPattern::Glider => &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            SeedPattern::RPentomino => &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
            SeedPattern::Acorn => &[(1, 0), (3, 1), (0, 2), (1, 2), (4, 2), (5, 2), (6, 2)],
            SeedPattern::GosperGun => &[
                // Left block
                (0, 4), (0, 5), (1, 4), (1, 5),
                // Left ship
                (10, 4), (10, 5), (10, 6),
                (11, 3), (11, 7),
                (12, 2), (12, 8),
                (13, 2), (13, 8),
                (14, 5),
                (15, 3), (15, 7),
                (16, 4), (16, 5), (16, 6),
                (17, 5),
                // Right ship
                (20, 2), (20, 3), (20, 4),
                (21, 2), (21, 3), (21, 4),
                (22, 1), (22, 5),
                (24, 0), (24, 1), (24, 5), (24, 6),
                // Right block
                (34, 2), (34, 3), (35, 2), (35, 3),
            ],
        }
    }

    /// Bounding box (width, height) of the fixed shape
    pub fn extent(&self) -> (usize, usize) {
        self.cells()
            .iter()
            .fold((0, 0), |(w, h), &(x, y)| (w.max(x + 1), h.max(y + 1)))
    }
}
