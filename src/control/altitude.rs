//! Altitude cascade: altitude -> climb-rate -> throttle (component F).
//!
//! Active whenever the active flight mode is at least `AltitudeHold`
//! (§4.F); the arbitrator decides whether to call [`AltitudeCascade::update`]
//! on a given tick.

use crate::config::{ControlGains, MAX_CLIMB_RATE_MPS};
use crate::geo::clamp;
use crate::pid::Pid;
use crate::types::{BaroSample, MOTOR_MAX, MOTOR_MIN};

pub struct AltitudeCascade {
    outer: Pid,
    inner: Pid,
}

impl AltitudeCascade {
    pub fn new(gains: &ControlGains) -> Self {
        Self {
            outer: Pid::new(
                gains.altitude.kp,
                gains.altitude.ki,
                gains.altitude.kd,
                gains.altitude.max_integral,
            ),
            inner: Pid::new(
                gains.climb_rate.kp,
                gains.climb_rate.ki,
                gains.climb_rate.kd,
                gains.climb_rate.max_integral,
            ),
        }
    }

    /// Run both stages and return the new throttle command, clamped to
    /// `[MOTOR_MIN, MOTOR_MAX]` around the 1500us hover baseline.
    pub fn update(&mut self, target_altitude_m: f32, baro: BaroSample, dt: f32) -> f32 {
        let target_climb_rate = self.outer.update(target_altitude_m, baro.altitude_m, dt);
        let target_climb_rate = clamp(target_climb_rate, -MAX_CLIMB_RATE_MPS, MAX_CLIMB_RATE_MPS);

        let throttle_adjust = self.inner.update(target_climb_rate, baro.vertical_speed_mps, dt);

        clamp(
            crate::config::HOVER_THROTTLE_US + throttle_adjust,
            MOTOR_MIN as f32,
            MOTOR_MAX as f32,
        )
    }
}
