//! Minimal capability-trait stand-ins for unit and integration tests.
//!
//! Unlike [`super::imu::ImuBusSim`]/[`super::gps::GpsFeedSim`], these carry
//! no noise model — they report exactly what the test asks for, so a test
//! can assert on the control core's behavior without also accounting for
//! simulated sensor jitter.

use crate::hal::{Gpio, ImuBus, PwmSink};
use crate::types::{MotorOutputs, Vector3, MOTOR_MIN};

/// Reports a fixed attitude every tick, computed once at construction.
pub struct NullImuBus {
    accel_g: Vector3,
    gyro_dps: Vector3,
}

impl NullImuBus {
    pub fn level() -> Self {
        Self {
            accel_g: Vector3::new(0.0, 0.0, 1.0),
            gyro_dps: Vector3::zero(),
        }
    }

    /// Reports a constant attitude consistent with the given roll/pitch,
    /// zero yaw rate, so the complementary filter converges to it over a
    /// few dozen ticks rather than jumping there instantly.
    pub fn tilted(roll_deg: f32, pitch_deg: f32) -> Self {
        let roll = roll_deg.to_radians();
        let pitch = pitch_deg.to_radians();
        Self {
            accel_g: Vector3::new(-pitch.sin(), roll.sin() * pitch.cos(), roll.cos() * pitch.cos()),
            gyro_dps: Vector3::zero(),
        }
    }
}

impl ImuBus for NullImuBus {
    fn who_am_i(&mut self) -> u8 {
        crate::hal::ICM20948_WHO_AM_I_VALUE
    }

    fn configure(&mut self) {}

    fn read_accel_gyro(&mut self) -> (Vector3, Vector3) {
        (self.accel_g, self.gyro_dps)
    }
}

/// Records the last commanded pulse width per channel.
#[derive(Debug, Clone, Copy)]
pub struct NullPwmSink {
    outputs: MotorOutputs,
}

impl Default for NullPwmSink {
    fn default() -> Self {
        Self {
            outputs: MotorOutputs::disarmed(),
        }
    }
}

impl NullPwmSink {
    pub fn channel(&self, channel: u8) -> u16 {
        self.outputs.channel(channel as usize)
    }
}

impl PwmSink for NullPwmSink {
    fn set_channel_us(&mut self, channel: u8, pulse_us: u16) {
        if (1..=8).contains(&channel) {
            self.outputs.channels[(channel - 1) as usize] = pulse_us;
        }
    }
}

/// Records the last commanded arm-LED state. Starts at the disarmed floor
/// to mirror the PWM sink default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGpio {
    armed: bool,
}

impl NullGpio {
    pub fn armed(&self) -> bool {
        self.armed
    }
}

impl Gpio for NullGpio {
    fn set_armed_led(&mut self, armed: bool) {
        self.armed = armed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_pwm_sink_defaults_to_motor_min() {
        let sink = NullPwmSink::default();
        for ch in 1..=8u8 {
            assert_eq!(sink.channel(ch), MOTOR_MIN);
        }
    }

    #[test]
    fn null_pwm_sink_records_writes() {
        let mut sink = NullPwmSink::default();
        sink.set_channel_us(1, 1750);
        assert_eq!(sink.channel(1), 1750);
        assert_eq!(sink.channel(2), MOTOR_MIN);
    }

    #[test]
    fn null_gpio_records_arm_state() {
        let mut gpio = NullGpio::default();
        assert!(!gpio.armed());
        gpio.set_armed_led(true);
        assert!(gpio.armed());
    }
}
