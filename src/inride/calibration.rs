//! Spindown bookkeeping across successive power notifications.

use serde::{Deserialize, Serialize};

use super::types::{CalibrationResult, InRidePowerData, SensorState};

/// A finished spindown, reported once the sensor is back in `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOutcome {
    /// Spindown time produced by the run (s)
    pub spindown_time: f64,
    pub result: CalibrationResult,
}

/// Tracks one sensor's calibration progress.
///
/// The sensor repeats its last result in every notification; the tracker
/// turns that into a single outcome per spindown.
#[derive(Debug, Clone, Default)]
pub struct SpindownTracker {
    state: Option<SensorState>,
    last_spindown_time: f64,
    last_successful_spindown: f64,
}

impl SpindownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a decoded power notification.
    pub fn observe(&mut self, data: &InRidePowerData) -> Option<CalibrationOutcome> {
        self.state = Some(data.state);

        if data.calibration_result == CalibrationResult::Success {
            self.last_successful_spindown = data.spindown_time;
        }

        if data.state == SensorState::Normal
            && self.last_spindown_time != data.last_spindown_result_time
        {
            self.last_spindown_time = data.last_spindown_result_time;
            tracing::info!(
                "Spindown finished: {:.3} s ({:?})",
                data.last_spindown_result_time,
                data.calibration_result
            );
            return Some(CalibrationOutcome {
                spindown_time: data.last_spindown_result_time,
                result: data.calibration_result,
            });
        }

        None
    }

    /// Last reported state; `Normal` before any notification.
    pub fn state(&self) -> SensorState {
        self.state.unwrap_or(SensorState::Normal)
    }

    /// A calibration can only be started from `Normal`.
    pub fn can_start_calibration(&self) -> bool {
        self.state() == SensorState::Normal
    }

    /// A calibration can only be stopped while one is in progress.
    pub fn can_stop_calibration(&self) -> bool {
        self.state() != SensorState::Normal
    }

    /// Spindown time of the last successful calibration (s), 0 if none.
    pub fn last_successful_spindown(&self) -> f64 {
        self.last_successful_spindown
    }

    /// Spindown time of the last reported outcome (s), 0 if none.
    pub fn last_spindown(&self) -> f64 {
        self.last_spindown_time
    }
}
