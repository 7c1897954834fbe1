//! Obstacle avoidance override (component I).
//!
//! Runs after navigation and before attitude mixing, so it supersedes any
//! position-hold lateral command for the tick it fires on (§4.I, §4.H).

use crate::config::{OBSTACLE_ESCAPE_ROLL_DEG, OBSTACLE_TRIGGER_DISTANCE_M};
use crate::types::{EulerAngles, ObstacleSample};

/// Apply the obstacle override in place to `setpoint`, if triggered.
pub fn apply(setpoint: &mut EulerAngles, obstacle: ObstacleSample) {
    if !obstacle.detected || obstacle.distance_m >= OBSTACLE_TRIGGER_DISTANCE_M {
        return;
    }

    if setpoint.pitch < 0.0 {
        setpoint.pitch = 0.0;
    }

    let escape_rad = (obstacle.bearing_deg + 90.0).to_radians();
    setpoint.roll = OBSTACLE_ESCAPE_ROLL_DEG * escape_rad.sin();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_override_when_not_detected() {
        let mut sp = EulerAngles::new(1.0, -8.0, 0.0);
        apply(
            &mut sp,
            ObstacleSample {
                distance_m: 0.5,
                bearing_deg: 0.0,
                detected: false,
            },
        );
        assert_eq!(sp, EulerAngles::new(1.0, -8.0, 0.0));
    }

    #[test]
    fn no_override_when_far_enough_away() {
        let mut sp = EulerAngles::new(1.0, -8.0, 0.0);
        apply(
            &mut sp,
            ObstacleSample {
                distance_m: 2.5,
                bearing_deg: 0.0,
                detected: true,
            },
        );
        assert_eq!(sp, EulerAngles::new(1.0, -8.0, 0.0));
    }

    #[test]
    fn forward_pitch_cancelled_and_lateral_escape_applied() {
        let mut sp = EulerAngles::new(1.0, -8.0, 0.0);
        apply(
            &mut sp,
            ObstacleSample {
                distance_m: 1.5,
                bearing_deg: 0.0,
                detected: true,
            },
        );
        assert_eq!(sp.pitch, 0.0);
        assert!((sp.roll - 10.0).abs() < 1e-3, "roll={}", sp.roll);
    }

    #[test]
    fn non_forward_pitch_left_untouched() {
        let mut sp = EulerAngles::new(1.0, 5.0, 0.0);
        apply(
            &mut sp,
            ObstacleSample {
                distance_m: 1.0,
                bearing_deg: 0.0,
                detected: true,
            },
        );
        assert_eq!(sp.pitch, 5.0);
    }
}
