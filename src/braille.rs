use crate::simulation::LifeSimulation;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// A grid cell covers `cell_size x cell_size` dots, so cell (x, y) is lit by
/// every dot (dx, dy) with `dx / cell_size == x` and `dy / cell_size == y`.
const BRAILLE_BASE: u32 = 0x2800;

/// Dots per terminal character horizontally and vertically
pub const DOTS_X: usize = 2;
pub const DOTS_Y: usize = 4;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Render the live cells of the grid to Braille characters
pub fn render_to_braille(
    simulation: &LifeSimulation,
    canvas_width: u16,
    canvas_height: u16,
    cell_size: u16,
    color: Color,
) -> Vec<BrailleCell> {
    let cell_size = cell_size.max(1) as usize;

    // Only the part of the canvas the grid actually covers needs sampling
    let cols = (simulation.width() * cell_size).div_ceil(DOTS_X).min(canvas_width as usize);
    let rows = (simulation.height() * cell_size).div_ceil(DOTS_Y).min(canvas_height as usize);

    let mut cells = Vec::with_capacity(cols * rows);

    for cy in 0..rows {
        for cx in 0..cols {
            let mut pattern: u8 = 0;

            let base_bx = cx * DOTS_X;
            let base_by = cy * DOTS_Y;

            for dx in 0..DOTS_X {
                for dy in 0..DOTS_Y {
                    let grid_x = (base_bx + dx) / cell_size;
                    let grid_y = (base_by + dy) / cell_size;
                    if simulation.is_alive(grid_x, grid_y) {
                        pattern |= BRAILLE_DOTS[dx][dy];
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                cells.push(BrailleCell {
                    x: cx as u16,
                    y: cy as u16,
                    char: braille_char,
                    color,
                });
            }
        }
    }

    cells
}

/// Light every dot of the cursor cell in `color`, merging with live dots
/// already drawn in the same characters
pub fn overlay_cursor(cells: &mut Vec<BrailleCell>, cursor: (usize, usize), cell_size: u16, color: Color) {
    let cell_size = cell_size.max(1) as usize;
    let (left, top) = (cursor.0 * cell_size, cursor.1 * cell_size);
    let (right, bottom) = (left + cell_size, top + cell_size);

    for cy in top / DOTS_Y..=(bottom - 1) / DOTS_Y {
        for cx in left / DOTS_X..=(right - 1) / DOTS_X {
            let mut pattern: u8 = 0;
            for dx in 0..DOTS_X {
                for dy in 0..DOTS_Y {
                    let (bx, by) = (cx * DOTS_X + dx, cy * DOTS_Y + dy);
                    if (left..right).contains(&bx) && (top..bottom).contains(&by) {
                        pattern |= BRAILLE_DOTS[dx][dy];
                    }
                }
            }

            let (Ok(x), Ok(y)) = (u16::try_from(cx), u16::try_from(cy)) else {
                continue;
            };
            match cells.iter_mut().find(|c| c.x == x && c.y == y) {
                Some(cell) => {
                    let existing = (cell.char as u32).saturating_sub(BRAILLE_BASE) as u8;
                    cell.char = char::from_u32(BRAILLE_BASE + (existing | pattern) as u32).unwrap_or(' ');
                    cell.color = color;
                }
                None => cells.push(BrailleCell {
                    x,
                    y,
                    char: char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' '),
                    color,
                }),
            }
        }
    }
}

/// Largest grid (width, height) that fits the canvas at the given cell size
pub fn calculate_simulation_size(canvas_width: u16, canvas_height: u16, cell_size: u16) -> (usize, usize) {
    let cell_size = cell_size.max(1) as usize;
    let width = (canvas_width as usize * DOTS_X / cell_size).max(1);
    let height = (canvas_height as usize * DOTS_Y / cell_size).max(1);
    (width, height)
}

/// Map a terminal character offset inside the canvas to the grid cell under it.
///
/// The character's top-left dot is taken as the pointer position, then
/// divided by the cell size in dots.
pub fn canvas_to_cell(col: u16, row: u16, cell_size: u16) -> (usize, usize) {
    let cell_size = cell_size.max(1) as usize;
    let dot_x = col as usize * DOTS_X;
    let dot_y = row as usize * DOTS_Y;
    (dot_x / cell_size, dot_y / cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_single_cell_lights_one_dot() {
        let mut sim = LifeSimulation::new(8, 8).unwrap();
        sim.toggle_cell(3, 5).unwrap();

        let cells = render_to_braille(&sim, 10, 10, 1, Color::White);
        assert_eq!(cells.len(), 1);
        // Dot (3, 5) sits in character (1, 1) at local position (1, 1)
        assert_eq!((cells[0].x, cells[0].y), (1, 1));
        assert_eq!(cells[0].char, char::from_u32(BRAILLE_BASE + 0x10).unwrap());
    }

    #[test]
    fn test_cell_size_scales_dots() {
        let mut sim = LifeSimulation::new(4, 4).unwrap();
        sim.toggle_cell(0, 0).unwrap();

        // A 2x2-dot cell fills the top half of the left column pair
        let cells = render_to_braille(&sim, 10, 10, 2, Color::White);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].char, char::from_u32(BRAILLE_BASE + (0x01 | 0x02 | 0x08 | 0x10)).unwrap());
    }

    #[test]
    fn test_render_clipped_to_canvas() {
        let mut sim = LifeSimulation::new(40, 40).unwrap();
        sim.toggle_cell(39, 39).unwrap();
        assert!(render_to_braille(&sim, 4, 4, 1, Color::White).is_empty());
    }

    #[test]
    fn test_simulation_size() {
        assert_eq!(calculate_simulation_size(40, 10, 1), (80, 40));
        assert_eq!(calculate_simulation_size(40, 10, 2), (40, 20));
        assert_eq!(calculate_simulation_size(0, 0, 1), (1, 1));
    }

    #[test]
    fn test_cursor_lights_exactly_its_own_dots() {
        for cell_size in 1..=4u16 {
            let cs = cell_size as usize;
            for cursor in [(0, 0), (1, 0), (0, 1), (3, 5), (7, 2)] {
                let mut cells = Vec::new();
                overlay_cursor(&mut cells, cursor, cell_size, Color::Yellow);

                let mut lit = 0;
                for cell in &cells {
                    let pattern = (cell.char as u32 - BRAILLE_BASE) as u8;
                    for dx in 0..DOTS_X {
                        for dy in 0..DOTS_Y {
                            if pattern & BRAILLE_DOTS[dx][dy] != 0 {
                                let bx = cell.x as usize * DOTS_X + dx;
                                let by = cell.y as usize * DOTS_Y + dy;
                                assert_eq!((bx / cs, by / cs), cursor);
                                lit += 1;
                            }
                        }
                    }
                }
                assert_eq!(lit, cs * cs, "cell size {} cursor {:?}", cell_size, cursor);
            }
        }
    }

    #[test]
    fn test_cursor_merges_with_live_dots() {
        let mut sim = LifeSimulation::new(8, 8).unwrap();
        sim.toggle_cell(0, 0).unwrap();
        let mut cells = render_to_braille(&sim, 10, 10, 1, Color::White);

        overlay_cursor(&mut cells, (1, 0), 1, Color::Yellow);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].char, char::from_u32(BRAILLE_BASE + (0x01 | 0x08)).unwrap());
        assert_eq!(cells[0].color, Color::Yellow);
    }

    #[test]
    fn test_canvas_to_cell() {
        assert_eq!(canvas_to_cell(0, 0, 1), (0, 0));
        assert_eq!(canvas_to_cell(3, 2, 1), (6, 8));
        assert_eq!(canvas_to_cell(3, 2, 4), (1, 2));
    }
}
