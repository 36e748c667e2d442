use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Colour used to draw live cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    White,
    Green,
    Cyan,
    Amber,
    Magenta,
    Red,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::White => "White",
            ColorScheme::Green => "Green",
            ColorScheme::Cyan => "Cyan",
            ColorScheme::Amber => "Amber",
            ColorScheme::Magenta => "Magenta",
            ColorScheme::Red => "Red",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorScheme::White => ColorScheme::Green,
            ColorScheme::Green => ColorScheme::Cyan,
            ColorScheme::Cyan => ColorScheme::Amber,
            ColorScheme::Amber => ColorScheme::Magenta,
            ColorScheme::Magenta => ColorScheme::Red,
            ColorScheme::Red => ColorScheme::White,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ColorScheme::White => ColorScheme::Red,
            ColorScheme::Green => ColorScheme::White,
            ColorScheme::Cyan => ColorScheme::Green,
            ColorScheme::Amber => ColorScheme::Cyan,
            ColorScheme::Magenta => ColorScheme::Amber,
            ColorScheme::Red => ColorScheme::Magenta,
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            ColorScheme::White => [255, 255, 255],
            ColorScheme::Green => [80, 250, 123],
            ColorScheme::Cyan => [75, 192, 192],
            ColorScheme::Amber => [255, 191, 0],
            ColorScheme::Magenta => [255, 85, 255],
            ColorScheme::Red => [255, 85, 85],
        }
    }

    /// Terminal colour for live cells
    pub fn color(&self) -> Color {
        let [r, g, b] = self.rgb();
        Color::Rgb(r, g, b)
    }

    /// Parse a CLI value, falling back to white
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "green" => ColorScheme::Green,
            "cyan" | "teal" => ColorScheme::Cyan,
            "amber" | "yellow" | "orange" => ColorScheme::Amber,
            "magenta" | "pink" | "purple" => ColorScheme::Magenta,
            "red" => ColorScheme::Red,
            _ => ColorScheme::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_visits_every_scheme() {
        let mut scheme = ColorScheme::default();
        let mut seen = vec![scheme];
        loop {
            scheme = scheme.next();
            if scheme == ColorScheme::default() {
                break;
            }
            seen.push(scheme);
        }
        assert_eq!(seen.len(), 6);
        for s in seen {
            assert_eq!(s.next().prev(), s);
        }
    }

    #[test]
    fn test_color_matches_rgb() {
        assert_eq!(ColorScheme::Cyan.color(), Color::Rgb(75, 192, 192));
        assert_eq!(ColorScheme::parse("YELLOW"), ColorScheme::Amber);
        assert_eq!(ColorScheme::parse("unknown"), ColorScheme::White);
    }
}
