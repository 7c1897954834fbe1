//! Host-in-the-loop IMU: a simulated ICM-20948 driving [`ImuBus`] with
//! realistic gravity, gyro bias drift, and measurement noise.
//!
//! Adapted from the dashboard's `ImuSimulator`: same sinusoidal attitude
//! pattern and bias-drift model, retargeted to the units the control core
//! actually consumes — g's and degrees/second, not m/s^2 and radians/s.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::ImuInitError;
use crate::hal::{ImuBus, ICM20948_WHO_AM_I_VALUE};
use crate::types::Vector3;

/// Simulated IMU bus for development-host testing (§9 design notes).
pub struct ImuBusSim {
    orientation_rad: (f64, f64, f64),
    angular_velocity_dps: Vector3,
    gyro_bias_dps: Vector3,
    accel_noise_std_g: f32,
    gyro_noise_std_dps: f32,
    tick: u64,
    rng: StdRng,
}

impl ImuBusSim {
    pub fn new() -> Self {
        Self {
            orientation_rad: (0.0, 0.0, 0.0),
            angular_velocity_dps: Vector3::zero(),
            gyro_bias_dps: Vector3::new(0.02, 0.02, 0.02),
            accel_noise_std_g: 0.003,
            gyro_noise_std_dps: 0.05,
            tick: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Build a sim IMU that reports a fixed attitude and holds it (zero
    /// angular velocity). Convenient for scenario tests that want the
    /// estimator to converge to a known tilt.
    pub fn holding_attitude(roll_deg: f32, pitch_deg: f32) -> Self {
        let mut sim = Self::new();
        sim.orientation_rad = (roll_deg.to_radians() as f64, pitch_deg.to_radians() as f64, 0.0);
        sim.accel_noise_std_g = 0.0;
        sim.gyro_noise_std_dps = 0.0;
        sim.gyro_bias_dps = Vector3::zero();
        sim
    }

    fn advance_motion(&mut self, dt: f32) {
        let t = self.tick as f64 * dt as f64;
        self.angular_velocity_dps = Vector3::new(
            (6.0 * (0.3 * t).sin()) as f32,
            (5.0 * (0.2 * t).cos()) as f32,
            (3.0 * (0.15 * t).sin()) as f32,
        );
        self.orientation_rad.0 += (self.angular_velocity_dps.x as f64).to_radians() * dt as f64;
        self.orientation_rad.1 += (self.angular_velocity_dps.y as f64).to_radians() * dt as f64;
        self.orientation_rad.2 += (self.angular_velocity_dps.z as f64).to_radians() * dt as f64;
    }

    fn gravity_g(&self) -> Vector3 {
        let (roll, pitch, _yaw) = self.orientation_rad;
        Vector3::new(
            -pitch.sin() as f32,
            (roll.sin() * pitch.cos()) as f32,
            (roll.cos() * pitch.cos()) as f32,
        )
    }

    fn noise(&mut self, std: f32) -> Vector3 {
        if std <= 0.0 {
            return Vector3::zero();
        }
        let normal = Normal::new(0.0, std as f64).unwrap();
        Vector3::new(
            normal.sample(&mut self.rng) as f32,
            normal.sample(&mut self.rng) as f32,
            normal.sample(&mut self.rng) as f32,
        )
    }
}

impl Default for ImuBusSim {
    fn default() -> Self {
        Self::new()
    }
}

impl ImuBus for ImuBusSim {
    fn who_am_i(&mut self) -> u8 {
        ICM20948_WHO_AM_I_VALUE
    }

    fn configure(&mut self) {}

    fn read_accel_gyro(&mut self) -> (Vector3, Vector3) {
        self.tick += 1;
        self.advance_motion(crate::config::DT);

        let accel_noise = self.noise(self.accel_noise_std_g);
        let gravity = self.gravity_g();
        let accel = Vector3::new(
            gravity.x + accel_noise.x,
            gravity.y + accel_noise.y,
            gravity.z + accel_noise.z,
        );

        let gyro_noise = self.noise(self.gyro_noise_std_dps);
        let gyro = Vector3::new(
            self.angular_velocity_dps.x + self.gyro_bias_dps.x + gyro_noise.x,
            self.angular_velocity_dps.y + self.gyro_bias_dps.y + gyro_noise.y,
            self.angular_velocity_dps.z + self.gyro_bias_dps.z + gyro_noise.z,
        );

        (accel, gyro)
    }
}

/// An IMU that always fails identity verification, for exercising the
/// init-abort path (§7).
pub struct FailingImuBus;

impl ImuBus for FailingImuBus {
    fn who_am_i(&mut self) -> u8 {
        0x00
    }

    fn configure(&mut self) {}

    fn read_accel_gyro(&mut self) -> (Vector3, Vector3) {
        (Vector3::new(0.0, 0.0, 1.0), Vector3::zero())
    }
}
