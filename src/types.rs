//! Core data model for the stabilization and navigation control core.
//!
//! These types are shared by every other module in the crate: the estimator
//! produces [`EulerAngles`], the PID cascades consume and produce them, the
//! ingest API publishes [`GPSSample`]/[`BaroSample`]/[`ObstacleSample`]
//! snapshots, and the mixer emits [`MotorOutputs`].

use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// PWM floor for a disarmed or idle motor channel, in microseconds.
pub const MOTOR_MIN: u16 = 1000;
/// PWM ceiling for a fully-commanded motor channel, in microseconds.
pub const MOTOR_MAX: u16 = 2000;

/// Body-frame angular rate (deg/s) or specific force (g), depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Attitude in degrees. Roll and pitch are wrapped to `[-180, 180]`, yaw to `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EulerAngles {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl EulerAngles {
    pub const fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Geodetic position, WGS-84 assumed. `lat`/`lon` are `f64`: `f32` loses
/// around a meter of resolution, which the navigation cascade cannot afford.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
    /// Altitude, meters AMSL.
    pub alt: f32,
}

impl GeoPosition {
    pub const fn new(lat: f64, lon: f64, alt: f32) -> Self {
        Self { lat, lon, alt }
    }
}

/// Raw inertial sample plus the running attitude estimate, timestamped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IMUSample {
    pub accel_g: Vector3,
    pub gyro_dps: Vector3,
    pub attitude: EulerAngles,
    pub timestamp: DateTime<Utc>,
}

impl Default for IMUSample {
    fn default() -> Self {
        Self {
            accel_g: Vector3::new(0.0, 0.0, 1.0),
            gyro_dps: Vector3::zero(),
            attitude: EulerAngles::zero(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// GPS fix snapshot. `fix_valid` is always `sats >= GPS_MIN_SATS_FOR_FIX`;
/// callers must not construct one with the invariant violated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GPSSample {
    pub position: GeoPosition,
    pub ground_speed_mps: f32,
    /// Course over ground, degrees, 0 = North, clockwise-positive.
    pub heading_deg: f32,
    pub sats: u8,
    pub fix_valid: bool,
    pub timestamp: DateTime<Utc>,
}

/// Minimum satellite count for a usable 3D fix (see [`GPSSample::fix_valid`]).
pub const GPS_MIN_SATS_FOR_FIX: u8 = 6;

impl GPSSample {
    /// Build a sample, deriving `fix_valid` from `sats` per the ingest contract.
    pub fn new(
        position: GeoPosition,
        ground_speed_mps: f32,
        heading_deg: f32,
        sats: u8,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            position,
            ground_speed_mps,
            heading_deg,
            sats,
            fix_valid: sats >= GPS_MIN_SATS_FOR_FIX,
            timestamp,
        }
    }
}

impl Default for GPSSample {
    fn default() -> Self {
        Self {
            position: GeoPosition::default(),
            ground_speed_mps: 0.0,
            heading_deg: 0.0,
            sats: 0,
            fix_valid: false,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Barometric altitude and vertical speed, AGL reference, positive up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct BaroSample {
    pub altitude_m: f32,
    pub vertical_speed_mps: f32,
}

/// Rangefinder / proximity sensor snapshot feeding the obstacle override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ObstacleSample {
    pub distance_m: f32,
    /// Bearing relative to the nose, degrees.
    pub bearing_deg: f32,
    pub detected: bool,
}

/// Flight-mode state machine. Ordinal order doubles as the failsafe
/// downgrade order used by the safety monitor (§4.J) and the arbitrator
/// sequencing (§4.H): higher modes imply more autonomy and more
/// preconditions (a valid GPS fix, a reachable home position, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum FlightMode {
    Manual = 0,
    Stabilize = 1,
    AltitudeHold = 2,
    PositionHold = 3,
    Auto = 4,
    ReturnToHome = 5,
}

impl FlightMode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(v: u8) -> Self {
        match v {
            0 => FlightMode::Manual,
            1 => FlightMode::Stabilize,
            2 => FlightMode::AltitudeHold,
            3 => FlightMode::PositionHold,
            4 => FlightMode::Auto,
            _ => FlightMode::ReturnToHome,
        }
    }
}

/// Atomic storage cell for [`FlightMode`] (§5: scalar flags shared across
/// producer threads and the control thread must be at least atomic for
/// load/store).
#[derive(Debug)]
pub struct AtomicFlightMode(AtomicU8);

impl AtomicFlightMode {
    pub const fn new(mode: FlightMode) -> Self {
        Self(AtomicU8::new(mode.as_u8()))
    }

    pub fn load(&self) -> FlightMode {
        FlightMode::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, mode: FlightMode) {
        self.0.store(mode.as_u8(), Ordering::Release);
    }
}

/// Eight PWM channels. Channels 1-4 drive the quad-X mix; 5-8 are reserved
/// and always hold [`MOTOR_MIN`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorOutputs {
    pub channels: [u16; 8],
}

impl MotorOutputs {
    /// All channels at the disarmed floor.
    pub const fn disarmed() -> Self {
        Self {
            channels: [MOTOR_MIN; 8],
        }
    }

    pub fn channel(&self, n: usize) -> u16 {
        self.channels[n - 1]
    }
}

impl Default for MotorOutputs {
    fn default() -> Self {
        Self::disarmed()
    }
}
