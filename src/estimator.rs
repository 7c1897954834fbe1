//! Complementary filter attitude estimator (component C).
//!
//! Fuses gyro rate integration (short-term accurate, drifts) with
//! accelerometer-derived tilt (long-term accurate, noisy) for roll and
//! pitch. Yaw is gyro-only — there is no magnetometer in scope, so yaw
//! drift is accepted.

use crate::geo::wrap_360;
use crate::types::{EulerAngles, Vector3};

/// Accelerometer time-constant blend factor. ~20 ms at 400 Hz.
pub const COMPLEMENTARY_ALPHA: f32 = 0.98;

/// Running attitude estimate, updated once per tick from a fresh IMU sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttitudeEstimator {
    angles: EulerAngles,
}

impl AttitudeEstimator {
    pub fn new() -> Self {
        Self {
            angles: EulerAngles::zero(),
        }
    }

    /// Current attitude estimate.
    pub fn attitude(&self) -> EulerAngles {
        self.angles
    }

    /// Fuse one tick of gyro + accelerometer data into the running estimate.
    ///
    /// `accel_g` is specific force in g (not m/s^2); `gyro_dps` is
    /// angular rate in deg/s; `dt` is the fixed tick period in seconds.
    pub fn update(&mut self, accel_g: Vector3, gyro_dps: Vector3, dt: f32) -> EulerAngles {
        let accel_roll = accel_g.y.atan2(accel_g.z).to_degrees();
        let accel_pitch = (-accel_g.x)
            .atan2((accel_g.y * accel_g.y + accel_g.z * accel_g.z).sqrt())
            .to_degrees();

        let gyro_roll = self.angles.roll + gyro_dps.x * dt;
        let gyro_pitch = self.angles.pitch + gyro_dps.y * dt;
        let gyro_yaw = self.angles.yaw + gyro_dps.z * dt;

        self.angles.roll = COMPLEMENTARY_ALPHA * gyro_roll + (1.0 - COMPLEMENTARY_ALPHA) * accel_roll;
        self.angles.pitch = COMPLEMENTARY_ALPHA * gyro_pitch + (1.0 - COMPLEMENTARY_ALPHA) * accel_pitch;
        self.angles.yaw = wrap_360(gyro_yaw);

        self.angles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 400.0;

    #[test]
    fn converges_to_level_from_rest() {
        let mut est = AttitudeEstimator::new();
        // Start off-level so convergence is observable, not trivial.
        est.angles = EulerAngles::new(15.0, -8.0, 0.0);

        let accel = Vector3::new(0.0, 0.0, 1.0); // steady 1g straight down
        let gyro = Vector3::zero();

        let mut last = est.attitude();
        for _ in 0..2_000 {
            last = est.update(accel, gyro, DT);
        }

        assert!(last.roll.abs() < 0.1, "roll={}", last.roll);
        assert!(last.pitch.abs() < 0.1, "pitch={}", last.pitch);
    }

    #[test]
    fn gyro_only_integrates_yaw_with_no_fusion_correction() {
        let mut est = AttitudeEstimator::new();
        let accel = Vector3::new(0.0, 0.0, 1.0);
        let gyro = Vector3::new(0.0, 0.0, 36.0); // 36 deg/s

        for _ in 0..400 {
            est.update(accel, gyro, DT);
        }
        // 400 ticks at 400Hz = 1s, at 36 deg/s -> 36 degrees of yaw.
        assert!((est.attitude().yaw - 36.0).abs() < 0.5, "yaw={}", est.attitude().yaw);
    }

    #[test]
    fn yaw_wraps_into_0_360() {
        let mut est = AttitudeEstimator::new();
        let accel = Vector3::new(0.0, 0.0, 1.0);
        let gyro = Vector3::new(0.0, 0.0, 720.0 / (400.0 * DT)); // big rate

        let mut last = est.attitude();
        for _ in 0..2_000 {
            last = est.update(accel, gyro, DT);
        }
        assert!(last.yaw >= 0.0 && last.yaw < 360.0, "yaw={}", last.yaw);
    }

    #[test]
    fn tilted_steady_state_fuses_toward_accelerometer_reading() {
        let mut est = AttitudeEstimator::new();
        // accel reading consistent with +30 deg roll, level pitch.
        let roll_rad = 30f32.to_radians();
        let accel = Vector3::new(0.0, roll_rad.sin(), roll_rad.cos());
        let gyro = Vector3::zero();

        let mut last = est.attitude();
        for _ in 0..4_000 {
            last = est.update(accel, gyro, DT);
        }
        assert!((last.roll - 30.0).abs() < 0.5, "roll={}", last.roll);
    }
}
