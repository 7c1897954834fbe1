//! Attitude inner loop and quad-X motor mixer (component E).

use crate::config::ControlGains;
use crate::geo::clamp;
use crate::pid::Pid;
use crate::types::{EulerAngles, MotorOutputs, MOTOR_MAX, MOTOR_MIN};

/// Roll/pitch/yaw attitude PIDs plus the quad-X mix into four motor
/// channels. Channels 5-8 are reserved and always hold [`MOTOR_MIN`].
pub struct AttitudeMixer {
    roll: Pid,
    pitch: Pid,
    yaw: Pid,
}

impl AttitudeMixer {
    pub fn new(gains: &ControlGains) -> Self {
        Self {
            roll: Pid::new(gains.roll.kp, gains.roll.ki, gains.roll.kd, gains.roll.max_integral),
            pitch: Pid::new(gains.pitch.kp, gains.pitch.ki, gains.pitch.kd, gains.pitch.max_integral),
            yaw: Pid::new(gains.yaw.kp, gains.yaw.ki, gains.yaw.kd, gains.yaw.max_integral),
        }
    }

    /// Reset all three integrators. Called exactly once, on the
    /// disarmed-to-armed transition, so stale pre-arm drift cannot launch
    /// the craft (§4.E).
    pub fn reset_integrators(&mut self) {
        self.roll.reset();
        self.pitch.reset();
        self.yaw.reset();
    }

    /// Run the inner loop and mix into per-motor commands.
    ///
    /// When `armed` is false, every motor holds [`MOTOR_MIN`] and the PIDs
    /// are not advanced (so `dt` since the last arm is not baked into
    /// stale integrators).
    pub fn mix(
        &mut self,
        armed: bool,
        setpoint: EulerAngles,
        estimate: EulerAngles,
        throttle_us: f32,
        dt: f32,
    ) -> MotorOutputs {
        if !armed {
            return MotorOutputs::disarmed();
        }

        let r = self.roll.update(setpoint.roll, estimate.roll, dt);
        let p = self.pitch.update(setpoint.pitch, estimate.pitch, dt);
        let y = self.yaw.update(setpoint.yaw, estimate.yaw, dt);

        let base = throttle_us;
        let m1 = base - r + p - y; // front-right, CCW
        let m2 = base + r + p + y; // rear-right, CW
        let m3 = base - r - p + y; // front-left, CW
        let m4 = base + r - p - y; // rear-left, CCW

        let clamp_motor = |v: f32| clamp(v, MOTOR_MIN as f32, MOTOR_MAX as f32).round() as u16;

        let mut channels = [MOTOR_MIN; 8];
        channels[0] = clamp_motor(m1);
        channels[1] = clamp_motor(m2);
        channels[2] = clamp_motor(m3);
        channels[3] = clamp_motor(m4);

        MotorOutputs { channels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gains() -> ControlGains {
        ControlGains::default()
    }

    #[test]
    fn disarmed_floors_all_motors() {
        let mut mixer = AttitudeMixer::new(&gains());
        let out = mixer.mix(false, EulerAngles::zero(), EulerAngles::zero(), 1500.0, 1.0 / 400.0);
        assert_eq!(out, MotorOutputs::disarmed());
    }

    #[test]
    fn hover_stable_holds_all_motors_near_throttle() {
        let mut mixer = AttitudeMixer::new(&gains());
        let out = mixer.mix(
            true,
            EulerAngles::zero(),
            EulerAngles::zero(),
            1500.0,
            1.0 / 400.0,
        );
        for c in &out.channels[0..4] {
            assert!((*c as i32 - 1500).abs() <= 1, "channel={c}");
        }
        for c in &out.channels[4..8] {
            assert_eq!(*c, MOTOR_MIN);
        }
    }

    #[test]
    fn roll_disturbance_differentiates_left_right_motors() {
        let mut mixer = AttitudeMixer::new(&gains());
        // Estimated roll = +10 deg, setpoint = 0: error = -10.
        let estimate = EulerAngles::new(10.0, 0.0, 0.0);
        let out = mixer.mix(true, EulerAngles::zero(), estimate, 1500.0, 1.0 / 400.0);

        let m1 = out.channel(1);
        let m2 = out.channel(2);
        let m3 = out.channel(3);
        let m4 = out.channel(4);

        // r = kp*error = 1.5 * -10 = -15 (plus a small integral/derivative term).
        assert!(m1 > 1500, "m1={m1}");
        assert!(m3 > 1500, "m3={m3}");
        assert!(m2 < 1500, "m2={m2}");
        assert!(m4 < 1500, "m4={m4}");

        for c in out.channels {
            assert!(c >= MOTOR_MIN && c <= MOTOR_MAX);
        }
    }

    #[test]
    fn motor_outputs_always_within_pwm_bounds_under_extreme_error() {
        let mut mixer = AttitudeMixer::new(&gains());
        let estimate = EulerAngles::new(-179.0, 179.0, 0.0);
        let setpoint = EulerAngles::new(179.0, -179.0, 359.0);
        let out = mixer.mix(true, setpoint, estimate, 2000.0, 1.0 / 400.0);
        for c in out.channels {
            assert!(c >= MOTOR_MIN && c <= MOTOR_MAX, "c={c}");
        }
    }

    #[test]
    fn reset_integrators_zeroes_all_three_axes() {
        let mut mixer = AttitudeMixer::new(&gains());
        mixer.mix(true, EulerAngles::new(10.0, 10.0, 10.0), EulerAngles::zero(), 1500.0, 0.1);
        mixer.reset_integrators();
        assert_eq!(mixer.roll.integral(), 0.0);
        assert_eq!(mixer.pitch.integral(), 0.0);
        assert_eq!(mixer.yaw.integral(), 0.0);
    }
}
