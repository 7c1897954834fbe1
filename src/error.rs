//! Error types for the boundaries that actually have one.
//!
//! The control loop itself runs forever and surfaces faults as flight-mode
//! and arm-state transitions (§7), not `Result`s. The only hard failure
//! boundary is device bring-up: if the IMU never identifies itself, the
//! loop must not start.

use thiserror::Error;

/// Failures that can occur while bringing up the IMU bus (§6, §7).
#[derive(Debug, Error)]
pub enum ImuInitError {
    #[error("IMU WHO_AM_I mismatch: expected 0x{expected:02X}, got 0x{got:02X}")]
    IdentityMismatch { expected: u8, got: u8 },

    #[error("IMU bus transaction failed: {0}")]
    BusError(String),
}

/// Failures constructing or starting the control core.
#[derive(Debug, Error)]
pub enum CoreInitError {
    #[error(transparent)]
    Imu(#[from] ImuInitError),
}
