use crate::error::LifeError;
use crate::simulation::LifeSimulation;
use std::time::{Duration, Instant};

/// Run/pause state of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Paused,
    Running,
}

/// Steps a bound [`LifeSimulation`] on a fixed period.
///
/// Scheduling is cooperative: the event loop calls [`poll`](Self::poll) and
/// at most one generation is computed per call, so steps never overlap. A
/// schedule is represented only by its next deadline, which `stop` and any
/// re-arm overwrite, so a cancelled schedule can never fire again.
pub struct SimulationDriver {
    engine: LifeSimulation,
    state: RunState,
    period: Duration,
    /// Deadline of the next firing; `Some` only while running
    next_due: Option<Instant>,
}

impl SimulationDriver {
    pub fn new(engine: LifeSimulation, period_ms: u64) -> Result<Self, LifeError> {
        Ok(Self {
            engine,
            state: RunState::Paused,
            period: Self::check_period(period_ms)?,
            next_due: None,
        })
    }

    fn check_period(period_ms: u64) -> Result<Duration, LifeError> {
        if period_ms == 0 {
            return Err(LifeError::InvalidPeriod(period_ms));
        }
        Ok(Duration::from_millis(period_ms))
    }

    pub fn engine(&self) -> &LifeSimulation {
        &self.engine
    }

    /// Mutable access for the engine's own operations (toggle, clear, ...)
    pub fn engine_mut(&mut self) -> &mut LifeSimulation {
        &mut self.engine
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn period_ms(&self) -> u64 {
        self.period.as_millis() as u64
    }

    /// Begin stepping every `period_ms`. Re-arms when already running at a different period.
    pub fn start(&mut self, period_ms: u64) -> Result<(), LifeError> {
        let period = Self::check_period(period_ms)?;
        if self.is_running() && period == self.period {
            return Ok(());
        }

        self.period = period;
        self.state = RunState::Running;
        self.arm(Instant::now());
        log::info!("Simulation running every {}ms", period_ms);
        Ok(())
    }

    /// Halt periodic stepping
    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("Simulation paused at generation {}", self.engine.generation());
        }
        self.state = RunState::Paused;
        self.next_due = None;
    }

    /// Change the period. While running the schedule restarts from now without stepping.
    pub fn set_period(&mut self, period_ms: u64) -> Result<(), LifeError> {
        self.period = Self::check_period(period_ms)?;
        if self.is_running() {
            self.arm(Instant::now());
        }
        log::info!("Tick period set to {}ms", period_ms);
        Ok(())
    }

    /// Step the engine exactly once, whatever the run state
    pub fn step_once(&mut self) -> usize {
        self.engine.step()
    }

    /// Fire the schedule if its deadline has passed.
    ///
    /// Returns the new population when a step was taken. Firings missed while
    /// the caller was busy are coalesced into this one step.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        let due = self.next_due?;
        if now < due {
            return None;
        }

        let population = self.engine.step();

        let mut next = due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.next_due = Some(next);
        Some(population)
    }

    /// Time left before the next firing, `None` while paused
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Long enough that no deadline passes while a test runs
    const SLOW_MS: u64 = 60_000;

    fn blinker_driver(period_ms: u64) -> SimulationDriver {
        let mut engine = LifeSimulation::new(9, 9).unwrap();
        for x in 3..6 {
            engine.toggle_cell(x, 4).unwrap();
        }
        SimulationDriver::new(engine, period_ms).unwrap()
    }

    #[test]
    fn test_starts_paused() {
        let mut driver = blinker_driver(500);
        assert_eq!(driver.state(), RunState::Paused);
        assert_eq!(driver.period_ms(), 500);
        assert_eq!(driver.poll(Instant::now() + Duration::from_secs(3600)), None);
        assert_eq!(driver.time_until_next(Instant::now()), None);
        assert_eq!(driver.engine().generation(), 0);
    }

    #[test]
    fn test_rejects_zero_period() {
        assert!(matches!(
            SimulationDriver::new(LifeSimulation::new(2, 2).unwrap(), 0),
            Err(LifeError::InvalidPeriod(0))
        ));

        let mut driver = blinker_driver(500);
        assert!(driver.start(0).is_err());
        assert_eq!(driver.state(), RunState::Paused);

        driver.start(500).unwrap();
        assert!(driver.set_period(0).is_err());
        assert_eq!(driver.period_ms(), 500);
        assert!(driver.is_running());
    }

    #[test]
    fn test_poll_steps_once_when_due() {
        let mut driver = blinker_driver(SLOW_MS);
        driver.start(SLOW_MS).unwrap();

        assert_eq!(driver.poll(Instant::now()), None);
        assert_eq!(driver.engine().generation(), 0);

        let later = Instant::now() + Duration::from_millis(SLOW_MS);
        assert_eq!(driver.poll(later), Some(3));
        assert_eq!(driver.engine().generation(), 1);
        assert_eq!(driver.engine().history().len(), 1);

        // Polling again at the same instant does not fire twice
        assert_eq!(driver.poll(later), None);
        assert_eq!(driver.engine().generation(), 1);
    }

    #[test]
    fn test_missed_firings_are_coalesced() {
        let mut driver = blinker_driver(10);
        driver.start(10).unwrap();

        let much_later = Instant::now() + Duration::from_secs(10);
        assert!(driver.poll(much_later).is_some());
        assert_eq!(driver.engine().generation(), 1);

        assert_eq!(driver.poll(much_later), None);
        assert_eq!(
            driver.time_until_next(much_later),
            Some(Duration::from_millis(10))
        );
    }

    #[test]
    fn test_stop_cancels_schedule() {
        let mut driver = blinker_driver(10);
        driver.start(10).unwrap();
        driver.stop();
        driver.stop();

        assert_eq!(driver.state(), RunState::Paused);
        assert_eq!(driver.poll(Instant::now() + Duration::from_secs(60)), None);
        assert_eq!(driver.engine().generation(), 0);
    }

    #[test]
    fn test_start_same_period_is_noop() {
        let mut driver = blinker_driver(SLOW_MS);
        driver.start(SLOW_MS).unwrap();
        let now = Instant::now();
        let remaining = driver.time_until_next(now);

        driver.start(SLOW_MS).unwrap();
        assert_eq!(driver.time_until_next(now), remaining);
    }

    #[test]
    fn test_start_new_period_rearms() {
        let mut driver = blinker_driver(SLOW_MS);
        driver.start(SLOW_MS).unwrap();
        driver.start(20).unwrap();

        assert_eq!(driver.period_ms(), 20);
        let remaining = driver.time_until_next(Instant::now()).unwrap();
        assert!(remaining <= Duration::from_millis(20));
    }

    #[test]
    fn test_set_period_rearms_without_stepping() {
        let mut driver = blinker_driver(SLOW_MS);
        driver.start(SLOW_MS).unwrap();
        driver.set_period(SLOW_MS * 2).unwrap();

        assert_eq!(driver.engine().generation(), 0);
        assert!(driver.is_running());
        // Old deadline no longer fires
        assert_eq!(
            driver.poll(Instant::now() + Duration::from_millis(SLOW_MS + 1)),
            None
        );
    }

    #[test]
    fn test_set_period_while_paused_only_stores() {
        let mut driver = blinker_driver(500);
        driver.set_period(250).unwrap();
        assert_eq!(driver.period_ms(), 250);
        assert_eq!(driver.state(), RunState::Paused);
        assert_eq!(driver.time_until_next(Instant::now()), None);
    }

    #[test]
    fn test_step_once_in_either_state() {
        let mut driver = blinker_driver(SLOW_MS);
        assert_eq!(driver.step_once(), 3);
        assert_eq!(driver.state(), RunState::Paused);

        driver.start(SLOW_MS).unwrap();
        assert_eq!(driver.step_once(), 3);
        assert_eq!(driver.state(), RunState::Running);
        assert_eq!(driver.engine().generation(), 2);
        assert_eq!(driver.engine().history().as_slice(), &[3, 3]);
    }
}
