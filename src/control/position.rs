//! Horizontal position cascade: position -> velocity -> tilt (component G).
//!
//! Active whenever the active flight mode is at least `PositionHold` *and*
//! the GPS fix is valid (§4.G); otherwise the arbitrator skips it entirely
//! and the existing attitude setpoint is left untouched.

use crate::config::{ControlGains, MAX_HORIZONTAL_VELOCITY_MPS, MAX_POSITION_TILT_DEG};
use crate::geo::{bearing_deg, clamp, distance_m};
use crate::pid::Pid;
use crate::types::{EulerAngles, GPSSample, GeoPosition};

pub struct PositionCascade {
    pos_n: Pid,
    pos_e: Pid,
    vel_n: Pid,
    vel_e: Pid,
}

impl PositionCascade {
    pub fn new(gains: &ControlGains) -> Self {
        Self {
            pos_n: Pid::new(
                gains.position_n.kp,
                gains.position_n.ki,
                gains.position_n.kd,
                gains.position_n.max_integral,
            ),
            pos_e: Pid::new(
                gains.position_e.kp,
                gains.position_e.ki,
                gains.position_e.kd,
                gains.position_e.max_integral,
            ),
            vel_n: Pid::new(
                gains.velocity_n.kp,
                gains.velocity_n.ki,
                gains.velocity_n.kd,
                gains.velocity_n.max_integral,
            ),
            vel_e: Pid::new(
                gains.velocity_e.kp,
                gains.velocity_e.ki,
                gains.velocity_e.kd,
                gains.velocity_e.max_integral,
            ),
        }
    }

    /// Run the full cascade and return a new roll/pitch attitude setpoint.
    /// `estimate_yaw_deg` is only used to rotate the NED tilt into the body
    /// frame; the returned yaw is `setpoint_yaw_deg` passed through
    /// unchanged, since this cascade produces pitch/roll only (§4.G) and
    /// must not clobber whatever is holding heading.
    pub fn update(
        &mut self,
        gps: GPSSample,
        target: GeoPosition,
        estimate_yaw_deg: f32,
        setpoint_yaw_deg: f32,
        dt: f32,
    ) -> EulerAngles {
        let from = (gps.position.lat, gps.position.lon);
        let to = (target.lat, target.lon);

        let d = distance_m(from, to) as f32;
        let bearing = bearing_deg(from, to);
        let bearing_rad = bearing.to_radians();

        let err_n = d * bearing_rad.cos();
        let err_e = d * bearing_rad.sin();

        let target_vel_n = clamp(
            self.pos_n.update(0.0, err_n, dt),
            -MAX_HORIZONTAL_VELOCITY_MPS,
            MAX_HORIZONTAL_VELOCITY_MPS,
        );
        let target_vel_e = clamp(
            self.pos_e.update(0.0, err_e, dt),
            -MAX_HORIZONTAL_VELOCITY_MPS,
            MAX_HORIZONTAL_VELOCITY_MPS,
        );

        let heading_rad = gps.heading_deg.to_radians();
        let vel_n = gps.ground_speed_mps * heading_rad.cos();
        let vel_e = gps.ground_speed_mps * heading_rad.sin();

        let a_n = self.vel_n.update(target_vel_n, vel_n, dt);
        let a_e = self.vel_e.update(target_vel_e, vel_e, dt);

        let yaw_rad = estimate_yaw_deg.to_radians();
        let pitch = -(a_n * yaw_rad.cos() + a_e * yaw_rad.sin());
        let roll = -(a_e * yaw_rad.cos() - a_n * yaw_rad.sin());

        EulerAngles::new(
            clamp(roll, -MAX_POSITION_TILT_DEG, MAX_POSITION_TILT_DEG),
            clamp(pitch, -MAX_POSITION_TILT_DEG, MAX_POSITION_TILT_DEG),
            setpoint_yaw_deg,
        )
    }
}
