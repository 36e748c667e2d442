use crate::error::LifeError;
use crate::history::PopulationHistory;
use crate::patterns::SeedPattern;
use crate::settings::BoundaryPolicy;
use rand::Rng;

/// Moore neighborhood offsets
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Game of Life engine (B3/S23).
///
/// Owns the cell matrix together with the generation counter and population
/// history; all three are reset together by `resize`, `clear` and
/// `randomize`.
pub struct LifeSimulation {
    grid_width: usize,
    grid_height: usize,
    /// Row-major cell states
    cells: Vec<bool>,
    /// Back buffer the successor generation is written into
    next: Vec<bool>,
    boundary: BoundaryPolicy,
    generation: u64,
    history: PopulationHistory,
}

impl LifeSimulation {
    pub fn new(width: usize, height: usize) -> Result<Self, LifeError> {
        let len = Self::check_dimensions(width, height)?;
        Ok(Self {
            grid_width: width,
            grid_height: height,
            cells: vec![false; len],
            next: vec![false; len],
            boundary: BoundaryPolicy::default(),
            generation: 0,
            history: PopulationHistory::new(),
        })
    }

    /// Cell count for a `width` x `height` grid, or an error if it is empty or
    /// too large to allocate
    fn check_dimensions(width: usize, height: usize) -> Result<usize, LifeError> {
        width
            .checked_mul(height)
            .filter(|&len| len > 0 && len <= isize::MAX as usize)
            .ok_or(LifeError::InvalidDimension { width, height })
    }

    pub fn width(&self) -> usize {
        self.grid_width
    }

    pub fn height(&self) -> usize {
        self.grid_height
    }

    pub fn boundary_policy(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn history(&self) -> &PopulationHistory {
        &self.history
    }

    /// Live cells in the current grid
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Cell state at (x, y); anything outside the grid reads as dead
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        x < self.grid_width && y < self.grid_height && self.cells[y * self.grid_width + x]
    }

    /// Replace the grid with an all-dead one of the given size
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), LifeError> {
        let len = Self::check_dimensions(width, height)?;
        self.grid_width = width;
        self.grid_height = height;
        self.cells = vec![false; len];
        self.next = vec![false; len];
        self.reset_counters();
        log::debug!("Grid resized to {}x{}", width, height);
        Ok(())
    }

    /// Flip one cell. Manual edits are not steps, so counters are untouched.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> Result<(), LifeError> {
        if x >= self.grid_width || y >= self.grid_height {
            return Err(LifeError::OutOfBounds {
                x,
                y,
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        let idx = y * self.grid_width + x;
        self.cells[idx] = !self.cells[idx];
        Ok(())
    }

    /// Change the edge handling used by later steps
    pub fn set_boundary_policy(&mut self, policy: BoundaryPolicy) {
        self.boundary = policy;
    }

    /// Advance one generation and return the new population
    pub fn step(&mut self) -> usize {
        let mut population = 0;

        // Read only from `cells`, write only into `next`
        for y in 0..self.grid_height {
            for x in 0..self.grid_width {
                let idx = y * self.grid_width + x;
                let neighbors = self.count_neighbors(x, y);
                let alive = matches!((self.cells[idx], neighbors), (true, 2) | (true, 3) | (false, 3));
                self.next[idx] = alive;
                if alive {
                    population += 1;
                }
            }
        }

        std::mem::swap(&mut self.cells, &mut self.next);
        self.generation += 1;
        self.history.push(population);
        population
    }

    /// Count live cells among the 8 neighbors of (x, y) under the current policy
    fn count_neighbors(&self, x: usize, y: usize) -> u8 {
        let w = self.grid_width as isize;
        let h = self.grid_height as isize;
        let mut count = 0;

        for &(dx, dy) in &NEIGHBOR_OFFSETS {
            let nx = x as isize + dx;
            let ny = y as isize + dy;

            let (nx, ny) = match self.boundary {
                BoundaryPolicy::Toroidal => (nx.rem_euclid(w), ny.rem_euclid(h)),
                BoundaryPolicy::Bounded => {
                    if nx < 0 || nx >= w || ny < 0 || ny >= h {
                        continue;
                    }
                    (nx, ny)
                }
            };

            if self.cells[ny as usize * self.grid_width + nx as usize] {
                count += 1;
            }
        }

        count
    }

    /// Kill every cell in place
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.reset_counters();
        log::debug!("Grid cleared");
    }

    /// Set each cell live independently with probability `live_probability`
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        live_probability: f64,
        rng: &mut R,
    ) -> Result<(), LifeError> {
        if !(0.0..=1.0).contains(&live_probability) {
            return Err(LifeError::InvalidProbability(live_probability));
        }
        for cell in self.cells.iter_mut() {
            *cell = rng.gen_bool(live_probability);
        }
        self.reset_counters();
        log::debug!("Grid randomized with p={:.2}", live_probability);
        Ok(())
    }

    /// Clear the grid and stamp a built-in pattern at its centre.
    /// `Random` defers to `randomize` with `density`.
    pub fn load_pattern<R: Rng + ?Sized>(
        &mut self,
        pattern: SeedPattern,
        density: f64,
        rng: &mut R,
    ) -> Result<(), LifeError> {
        if pattern == SeedPattern::Random {
            return self.randomize(density, rng);
        }

        self.clear();
        let (pw, ph) = pattern.extent();
        let origin_x = (self.grid_width / 2).saturating_sub(pw / 2);
        let origin_y = (self.grid_height / 2).saturating_sub(ph / 2);

        // Parts of the shape that fall off a small grid are clipped
        for &(dx, dy) in pattern.cells() {
            let x = origin_x + dx;
            let y = origin_y + dy;
            if x < self.grid_width && y < self.grid_height {
                self.cells[y * self.grid_width + x] = true;
            }
        }
        Ok(())
    }

    fn reset_counters(&mut self) {
        self.generation = 0;
        self.history.reset();
    }
}
