// Licensed under the Apache-2.0 license

//! Software-PWM "breathing" status LED.
//!
//! A periodic timer calls [`Heartbeat::tick`]. Every `pwm_period_ticks` ticks
//! the duty level moves by `step`, bouncing between `min_level` and
//! `max_level`. The LED is active-low, so the pin is driven high (off) while
//! the PWM counter is above the level.
//!
//! The LED shares its pin with the reset/programming line. The heartbeat stays
//! idle for `startup_delay` after boot, leaving a window to reprogram the chip
//! before the pin is ever driven as an output.

use embedded_hal::digital::{OutputPin, PinState};
use fugit::{MicrosDurationU32, MillisDurationU32};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeartbeatConfig {
    pub tick_period: MicrosDurationU32,
    pub startup_delay: MillisDurationU32,
    pub pwm_period_ticks: u16,
    pub step: u16,
    pub min_level: u16,
    pub max_level: u16,
}

impl HeartbeatConfig {
    pub const DEFAULT_PWM_PERIOD_TICKS: u16 = 500;
    pub const DEFAULT_STEP: u16 = 3;
    pub const DEFAULT_MIN_LEVEL: u16 = 1;
    pub const DEFAULT_MAX_LEVEL: u16 = 100;

    /// Number of ticks that fit in the startup delay.
    #[must_use]
    pub fn startup_ticks(&self) -> u32 {
        let period = self.tick_period.to_micros().max(1);
        self.startup_delay.to_micros() / period
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            tick_period: MicrosDurationU32::from_ticks(50),
            startup_delay: MillisDurationU32::from_ticks(1000),
            pwm_period_ticks: Self::DEFAULT_PWM_PERIOD_TICKS,
            step: Self::DEFAULT_STEP,
            min_level: Self::DEFAULT_MIN_LEVEL,
            max_level: Self::DEFAULT_MAX_LEVEL,
        }
    }
}

pub struct Heartbeat {
    config: HeartbeatConfig,
    startup_remaining: u32,
    armed: bool,
    counter: u16,
    level: i32,
    rising: bool,
}

impl Heartbeat {
    #[must_use]
    pub fn new(config: HeartbeatConfig) -> Self {
        Self {
            startup_remaining: config.startup_ticks(),
            config,
            armed: false,
            counter: 0,
            level: 0,
            rising: false,
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Advance one tick. `None` while the startup delay is still running.
    pub fn next_state(&mut self) -> Option<PinState> {
        if !self.armed {
            if self.startup_remaining > 0 {
                self.startup_remaining -= 1;
                return None;
            }
            self.armed = true;
        }

        let state = PinState::from(i32::from(self.counter) > self.level);
        self.counter = self.counter.saturating_add(1);
        if self.counter >= self.config.pwm_period_ticks {
            self.counter = 0;
            self.step_level();
        }
        Some(state)
    }

    /// Timer handler: advance and drive `led` once armed.
    ///
    /// # Errors
    /// Returns the pin error if the LED line cannot be driven.
    pub fn tick<P: OutputPin>(&mut self, led: &mut P) -> Result<(), P::Error> {
        match self.next_state() {
            Some(state) => led.set_state(state),
            None => Ok(()),
        }
    }

    fn step_level(&mut self) {
        let step = i32::from(self.config.step);
        let min = i32::from(self.config.min_level);
        let max = i32::from(self.config.max_level);
        if self.rising {
            self.level += step;
            if self.level > max {
                self.level = max;
                self.rising = false;
            }
        } else {
            self.level -= step;
            if self.level < min {
                self.level = min;
                self.rising = true;
            }
        }
    }
}
