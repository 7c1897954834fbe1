//! Scalar PID controller with integrator clamping (component B).
//!
//! Every cascade stage in this crate (attitude, altitude, position,
//! velocity) is built from one of these. Anti-windup is handled purely by
//! clamping the accumulated integral; there is no back-calculation or
//! conditional integration, matching the original firmware.

use crate::geo::clamp;

/// A single-axis PID with a clamped integrator.
///
/// Invariant: after any call to [`Pid::update`], `|integral| <= max_integral`.
#[derive(Debug, Clone, Copy)]
pub struct Pid {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    max_integral: f32,
    prev_error: f32,
    integral: f32,
    last_output: f32,
}

impl Pid {
    pub fn new(kp: f32, ki: f32, kd: f32, max_integral: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            max_integral: max_integral.abs(),
            prev_error: 0.0,
            integral: 0.0,
            last_output: 0.0,
        }
    }

    /// Current integral accumulator, for telemetry/diagnostics.
    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Most recent output, for telemetry/diagnostics.
    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    /// Zero the integrator and derivative memory. Used when an axis
    /// transitions from disarmed to armed, so stale accumulated error
    /// cannot launch the craft on arm (§4.E).
    pub fn reset(&mut self) {
        self.prev_error = 0.0;
        self.integral = 0.0;
        self.last_output = 0.0;
    }

    /// Advance the controller by one tick.
    ///
    /// `dt` must be `> 0`; the caller (the fixed-rate scheduler) guarantees
    /// this. Behavior is undefined for `dt <= 0`.
    pub fn update(&mut self, setpoint: f32, measured: f32, dt: f32) -> f32 {
        let error = setpoint - measured;

        self.integral = clamp(self.integral + error * dt, -self.max_integral, self.max_integral);

        let derivative = (error - self.prev_error) / dt;
        self.prev_error = error;

        let output = self.kp * error + self.ki * self.integral + self.kd * derivative;
        self.last_output = output;
        output
    }
}
