/// Population count recorded after every completed generation.
///
/// Entry `k` holds the population after step `k + 1` since the last reset.
/// The sequence only grows by [`push`](Self::push) and only shrinks by
/// [`reset`](Self::reset).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationHistory {
    entries: Vec<usize>,
}

impl PopulationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, population: usize) {
        self.entries.push(population);
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.entries
    }

    /// Most recent population, or 0 before the first step
    pub fn latest(&self) -> usize {
        self.entries.last().copied().unwrap_or(0)
    }

    /// Largest population recorded so far
    pub fn peak(&self) -> usize {
        self.entries.iter().copied().max().unwrap_or(0)
    }

    /// Base-10 logarithm of every entry, with log10(0) taken as log10(1) = 0
    pub fn log10_series(&self) -> Vec<f64> {
        self.entries.iter().map(|&p| log10_population(p)).collect()
    }
}

pub fn log10_population(population: usize) -> f64 {
    (population.max(1) as f64).log10()
}
