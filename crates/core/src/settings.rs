use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("progress step must be > 0")]
    ZeroStep,

    #[error("progress step must be <= 100, got {provided}")]
    StepTooLarge { provided: u8 },

    #[error("tick period must be > 0 ms")]
    ZeroPeriod,
}

//
// ─── TICK SETTINGS ─────────────────────────────────────────────────────────────
//

const DEFAULT_STEP_PERCENT: u8 = 20;
const DEFAULT_PERIOD_MS: u64 = 1_000;

/// Pace of the simulated loading bar in the traditional flow.
///
/// Each tick adds `step_percent` to the progress, one tick every `period_ms`.
/// Missing fields fall back to the defaults when deserialized; call
/// [`TickSettings::validate`] on values that came from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickSettings {
    step_percent: u8,
    period_ms: u64,
}

impl TickSettings {
    /// Creates custom tick settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the step is zero or above 100, or the period is zero.
    pub fn new(step_percent: u8, period_ms: u64) -> Result<Self, SettingsError> {
        let settings = Self {
            step_percent,
            period_ms,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Re-checks the invariants, e.g. after deserializing.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` describing the first violated bound.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.step_percent == 0 {
            return Err(SettingsError::ZeroStep);
        }
        if self.step_percent > 100 {
            return Err(SettingsError::StepTooLarge {
                provided: self.step_percent,
            });
        }
        if self.period_ms == 0 {
            return Err(SettingsError::ZeroPeriod);
        }
        Ok(())
    }

    #[must_use]
    pub fn step_percent(&self) -> u8 {
        self.step_percent
    }

    #[must_use]
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Number of ticks needed to go from 0 to 100.
    #[must_use]
    pub fn ticks_to_complete(&self) -> u32 {
        u32::from(100u8.div_ceil(self.step_percent.max(1)))
    }
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            step_percent: DEFAULT_STEP_PERCENT,
            period_ms: DEFAULT_PERIOD_MS,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
