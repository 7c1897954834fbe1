//! The real-time control loop: attitude estimation, cascaded PID control,
//! flight-mode arbitration, obstacle override, safety monitoring, and the
//! quad-X motor mix — components C, E, F, G, H, I, J wired together in the
//! strict per-tick order §2 specifies.

pub mod altitude;
pub mod arbitrator;
pub mod mixer;
pub mod obstacle;
pub mod position;
pub mod safety;

use std::sync::Arc;

use crate::config::ControlGains;
use crate::estimator::AttitudeEstimator;
use crate::hal::{Gpio, ImuBus, PwmSink};
use crate::ingest::SystemState;
use crate::types::FlightMode;

use altitude::AltitudeCascade;
use mixer::AttitudeMixer;
use position::PositionCascade;

/// Owns every piece of state that lives across ticks: the attitude
/// estimate and every PID's integrator/derivative memory. Per §3's
/// ownership rules, only the control thread ever touches this.
pub struct ControlCore {
    estimator: AttitudeEstimator,
    mixer: AttitudeMixer,
    altitude: AltitudeCascade,
    position: PositionCascade,
    prev_armed: bool,
}

impl ControlCore {
    pub fn new(gains: &ControlGains) -> Self {
        Self {
            estimator: AttitudeEstimator::new(),
            mixer: AttitudeMixer::new(gains),
            altitude: AltitudeCascade::new(gains),
            position: PositionCascade::new(gains),
            prev_armed: false,
        }
    }

    /// Run exactly one tick of the control pipeline.
    ///
    /// Order is load-bearing (§2): read IMU, estimate attitude, evaluate
    /// flight-mode controllers, obstacle override, safety monitor, mix and
    /// emit. Every step after estimation reads/writes [`SystemState`]
    /// snapshots captured once at the top of the tick, per §5's ordering
    /// guarantee — a producer writing mid-tick is observed on the *next*
    /// tick, not this one.
    pub fn tick(
        &mut self,
        state: &Arc<SystemState>,
        imu_bus: &mut dyn ImuBus,
        pwm: &mut dyn PwmSink,
        gpio: &mut dyn Gpio,
        dt: f32,
    ) {
        let (accel_g, gyro_dps) = imu_bus.read_accel_gyro();
        let estimate = self.estimator.update(accel_g, gyro_dps, dt);

        state.publish_attitude_sample(crate::types::IMUSample {
            accel_g,
            gyro_dps,
            attitude: estimate,
            timestamp: chrono::Utc::now(),
        });

        let mut mode = state.mode();
        let cmd = state.command_snapshot();
        let gps = state.gps_snapshot();
        let baro = state.baro_snapshot();
        let obstacle_sample = state.obstacle_snapshot();

        let mut setpoint = cmd.setpoint;
        let mut target_altitude_m = cmd.target_altitude_m;
        let mut target_position = cmd.target_position;
        let mut throttle_us = cmd.throttle_us;

        if mode == FlightMode::ReturnToHome {
            let outcome = arbitrator::rth_step(gps, baro, cmd.home_position);
            if outcome.disarm {
                state.set_armed(false);
            }
            if let Some(alt) = outcome.target_altitude_m {
                target_altitude_m = alt;
            }
            if let Some(home) = outcome.navigate_to {
                target_position = home;
            }
        }

        if arbitrator::altitude_cascade_active(mode) {
            throttle_us = self.altitude.update(target_altitude_m, baro, dt);
        }

        if arbitrator::position_cascade_active(mode, gps.fix_valid) {
            setpoint = self.position.update(gps, target_position, estimate.yaw, setpoint.yaw, dt);
        }

        obstacle::apply(&mut setpoint, obstacle_sample);

        let verdict = safety::evaluate(estimate, mode, gps.fix_valid);
        if verdict.disarm {
            state.set_armed(false);
        }
        if let Some(downgrade) = verdict.downgrade_to {
            state.set_mode(downgrade);
            mode = downgrade;
        }
        let _ = mode; // final mode value retained for clarity/future use

        state.with_command_mut(|c| {
            c.setpoint = setpoint;
            c.target_altitude_m = target_altitude_m;
            c.target_position = target_position;
            c.throttle_us = throttle_us;
        });

        let armed = state.is_armed();
        if armed && !self.prev_armed {
            self.mixer.reset_integrators();
        }
        self.prev_armed = armed;

        let motors = self.mixer.mix(armed, setpoint, estimate, throttle_us, dt);

        for ch in 1..=8u8 {
            pwm.set_channel_us(ch, motors.channel(ch as usize));
        }
        gpio.set_armed_led(armed);
        state.publish_motors(motors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::{NullGpio, NullImuBus, NullPwmSink};
    use crate::types::MOTOR_MIN;

    fn core() -> ControlCore {
        ControlCore::new(&Config::default().gains)
    }

    #[test]
    fn disarmed_floors_motors_end_to_end() {
        let state = SystemState::new();
        let mut c = core();
        let mut imu = NullImuBus::level();
        let mut pwm = NullPwmSink::default();
        let mut gpio = NullGpio::default();

        c.tick(&state, &mut imu, &mut pwm, &mut gpio, 1.0 / 400.0);

        for ch in 1..=4u8 {
            assert_eq!(pwm.channel(ch), MOTOR_MIN);
        }
        assert!(!gpio.armed());
    }

    #[test]
    fn tilt_failsafe_disarms_on_next_tick() {
        let state = SystemState::new();
        let handle = crate::ingest::IngestHandle::new(state.clone());
        handle.arm();
        handle.set_flight_mode(FlightMode::Stabilize);

        let mut c = core();
        let mut imu = NullImuBus::tilted(46.0, 0.0);
        let mut pwm = NullPwmSink::default();
        let mut gpio = NullGpio::default();

        // Several ticks for the complementary filter to settle near the
        // commanded tilt before the safety monitor sees it.
        for _ in 0..400 {
            c.tick(&state, &mut imu, &mut pwm, &mut gpio, 1.0 / 400.0);
        }

        assert!(!state.is_armed());
        for ch in 1..=4u8 {
            assert_eq!(pwm.channel(ch), MOTOR_MIN);
        }
    }

    #[test]
    fn gps_loss_demotes_position_hold_within_one_tick() {
        let state = SystemState::new();
        let handle = crate::ingest::IngestHandle::new(state.clone());
        handle.arm();
        handle.set_flight_mode(FlightMode::PositionHold);
        handle.update_gps(0.0, 0.0, 0.0, 0.0, 0.0, 3); // below min sat count

        let mut c = core();
        let mut imu = NullImuBus::level();
        let mut pwm = NullPwmSink::default();
        let mut gpio = NullGpio::default();

        c.tick(&state, &mut imu, &mut pwm, &mut gpio, 1.0 / 400.0);

        assert_eq!(state.mode(), FlightMode::AltitudeHold);
    }
}
