//! Safety monitor: tilt/NaN/GPS failsafes and the arm gate (component J).
//!
//! Evaluated every tick after all controllers have run, before motor
//! mixing (§4.H, §4.J). Disarm is one-way within a tick; rearm requires an
//! explicit external `arm()` call (§7).

use crate::config::MAX_SAFE_TILT_DEG;
use crate::types::{EulerAngles, FlightMode};

/// Outcome of one safety evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyVerdict {
    pub disarm: bool,
    pub downgrade_to: Option<FlightMode>,
}

impl SafetyVerdict {
    const fn clean() -> Self {
        Self {
            disarm: false,
            downgrade_to: None,
        }
    }
}

/// Evaluate the excessive-tilt, NaN, and GPS-loss failsafes.
///
/// Does not itself touch `SystemState` — the caller applies the verdict,
/// keeping this function a pure, directly testable predicate.
pub fn evaluate(estimate: EulerAngles, mode: FlightMode, gps_fix_valid: bool) -> SafetyVerdict {
    let mut verdict = SafetyVerdict::clean();

    let excessive_tilt = estimate.roll.abs() > MAX_SAFE_TILT_DEG || estimate.pitch.abs() > MAX_SAFE_TILT_DEG;
    let nan_attitude = estimate.roll.is_nan() || estimate.pitch.is_nan();

    if excessive_tilt || nan_attitude {
        verdict.disarm = true;
    }

    if mode >= FlightMode::PositionHold && !gps_fix_valid {
        verdict.downgrade_to = Some(FlightMode::AltitudeHold);
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_attitude_with_fix_is_clean() {
        let v = evaluate(EulerAngles::zero(), FlightMode::PositionHold, true);
        assert!(!v.disarm);
        assert_eq!(v.downgrade_to, None);
    }

    #[test]
    fn excessive_roll_disarms() {
        let v = evaluate(EulerAngles::new(46.0, 0.0, 0.0), FlightMode::Stabilize, true);
        assert!(v.disarm);
    }

    #[test]
    fn excessive_pitch_disarms() {
        let v = evaluate(EulerAngles::new(0.0, -46.0, 0.0), FlightMode::Stabilize, true);
        assert!(v.disarm);
    }

    #[test]
    fn exactly_45_degrees_does_not_disarm() {
        let v = evaluate(EulerAngles::new(45.0, 45.0, 0.0), FlightMode::Stabilize, true);
        assert!(!v.disarm);
    }

    #[test]
    fn nan_attitude_disarms() {
        let v = evaluate(EulerAngles::new(f32::NAN, 0.0, 0.0), FlightMode::Stabilize, true);
        assert!(v.disarm);
    }

    #[test]
    fn position_hold_without_fix_downgrades_to_altitude_hold() {
        let v = evaluate(EulerAngles::zero(), FlightMode::PositionHold, false);
        assert_eq!(v.downgrade_to, Some(FlightMode::AltitudeHold));
        assert!(!v.disarm);
    }

    #[test]
    fn auto_mode_without_fix_also_downgrades() {
        let v = evaluate(EulerAngles::zero(), FlightMode::Auto, false);
        assert_eq!(v.downgrade_to, Some(FlightMode::AltitudeHold));
    }

    #[test]
    fn altitude_hold_without_fix_is_unaffected() {
        let v = evaluate(EulerAngles::zero(), FlightMode::AltitudeHold, false);
        assert_eq!(v.downgrade_to, None);
    }
}
