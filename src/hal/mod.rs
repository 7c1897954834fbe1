//! Hardware capability contracts (§6, §9 design notes).
//!
//! The control core never touches a peripheral directly. It is handed
//! small capability records at construction instead: an [`ImuBus`], a
//! [`PwmSink`], and a [`Gpio`]. This is the seam that lets the exact same
//! core run against real silicon in firmware and against
//! [`crate::sim`] on a development host.

use crate::error::ImuInitError;
use crate::types::Vector3;

/// ICM-20948 identity register value (§6). Any other `WHO_AM_I` response
/// means init must abort before the loop starts.
pub const ICM20948_WHO_AM_I_VALUE: u8 = 0xEA;

/// Register-level contract for the accelerometer/gyro IMU.
///
/// Implementations model the ICM-20948 SPI protocol: identity register at
/// `0x00`, a reset/clock-source/range configuration sequence, and a burst
/// read of accelerometer + gyro starting at `0x2D`. Samples must be
/// assembled big-endian (high byte then low byte) per axis from a single
/// burst transaction — not twelve
/// one-register-at-a-time exchanges, which would skew the six axes
/// relative to each other.
pub trait ImuBus: Send {
    /// Read the identity register and return its raw value.
    fn who_am_i(&mut self) -> u8;

    /// Run the power-on/reset/range configuration sequence described in §6:
    /// reset, wait, select clock source, configure gyro +-250dps
    /// (131 LSB/(deg/s)) and accel +-2g (16384 LSB/g).
    fn configure(&mut self);

    /// Burst-read the current accelerometer (g) and gyro (deg/s) values.
    fn read_accel_gyro(&mut self) -> (Vector3, Vector3);

    /// Bring the IMU up and verify its identity, per §7's init-phase
    /// failure policy: a mismatch aborts init and the loop does not start.
    fn init(&mut self) -> Result<(), ImuInitError> {
        let who = self.who_am_i();
        if who != ICM20948_WHO_AM_I_VALUE {
            return Err(ImuInitError::IdentityMismatch {
                expected: ICM20948_WHO_AM_I_VALUE,
                got: who,
            });
        }
        self.configure();
        Ok(())
    }
}

/// Capability to drive the eight motor PWM channels (§6: 400 Hz carrier,
/// 1000-2000us pulse width, channels 1-4 active, 5-8 reserved).
pub trait PwmSink: Send {
    /// Write a pulse width, in microseconds, to one channel (1-8).
    fn set_channel_us(&mut self, channel: u8, pulse_us: u16);
}

/// Arming-status indicator GPIO (§4.J, §6: single digital output mirroring
/// `armed`).
pub trait Gpio: Send {
    fn set_armed_led(&mut self, armed: bool);
}
