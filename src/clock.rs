//! Clock - tick counter emitting a pulse every `interval` ticks

use crate::agent::Agent;
use crate::config::CircuitConfig;
use crate::error::ConfigError;
use crate::observer::{CircuitEvent, CircuitObserver, Observers};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counts ticks modulo `interval` and pulses on each wrap to zero.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ClockState"))]
pub struct Clock {
    /// Ticks per cycle (>= 1, fixed).
    interval: usize,

    /// Position in the current cycle, in `[0, interval)`.
    current_tick: usize,

    /// Cycles completed since construction or the last reset.
    cycles: u64,

    #[cfg_attr(feature = "serde", serde(skip))]
    observers: Observers,
}

impl Clock {
    /// Create a clock at tick 0.
    ///
    /// # Panics
    /// Panics if `interval` is zero. Use [`Clock::from_config`] for a
    /// checked constructor.
    pub fn new(interval: usize) -> Self {
        assert!(interval > 0, "clock interval must be > 0");
        Self {
            interval,
            current_tick: 0,
            cycles: 0,
            observers: Observers::default(),
        }
    }

    /// Create a clock sized by `config.clock_interval`.
    pub fn from_config(config: &CircuitConfig) -> Result<Self, ConfigError> {
        if config.clock_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Self::new(config.clock_interval))
    }

    // =========================================================================
    // TIME ADVANCEMENT
    // =========================================================================

    /// Advance one tick. Returns `true` when the counter wrapped to 0.
    pub fn tick(&mut self) -> bool {
        self.current_tick = (self.current_tick + 1) % self.interval;
        if self.current_tick != 0 {
            return false;
        }

        self.cycles += 1;
        self.observers.notify(CircuitEvent::Pulse {
            interval: self.interval,
            cycles: self.cycles,
        });
        true
    }

    /// Advance `n` ticks. Returns the number of pulses emitted.
    pub fn tick_n(&mut self, n: usize) -> usize {
        (0..n).filter(|_| self.tick()).count()
    }

    pub fn reset(&mut self) {
        self.current_tick = 0;
        self.cycles = 0;
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn current(&self) -> usize {
        self.current_tick
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn subscribe(&mut self, observer: Arc<dyn CircuitObserver>) {
        self.observers.subscribe(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn unsubscribe_all(&mut self) {
        self.observers.clear();
    }

    /// View the clock as an agent: each `process(())` is one tick.
    pub fn as_agent(&mut self) -> ClockAgent<'_> {
        ClockAgent { clock: self }
    }
}

/// Serialized form of a [`Clock`], checked before it becomes one.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct ClockState {
    interval: usize,
    current_tick: usize,
    cycles: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<ClockState> for Clock {
    type Error = ConfigError;

    fn try_from(state: ClockState) -> Result<Self, Self::Error> {
        if state.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if state.current_tick >= state.interval {
            return Err(ConfigError::TickOutOfRange {
                tick: state.current_tick,
                interval: state.interval,
            });
        }
        Ok(Self {
            interval: state.interval,
            current_tick: state.current_tick,
            cycles: state.cycles,
            observers: Observers::default(),
        })
    }
}

/// Agent over a borrowed [`Clock`]. See [`Clock::as_agent`].
#[derive(Debug)]
pub struct ClockAgent<'a> {
    clock: &'a mut Clock,
}

impl<'a> Agent<()> for ClockAgent<'a> {
    type Output = bool;

    fn process(&mut self, _: ()) -> bool {
        self.clock.tick()
    }
}
