//! Flight-mode arbitrator and return-to-home logic (component H).
//!
//! This module answers "which controllers run this tick" and drives the
//! RTH state machine; [`crate::control::ControlCore::tick`] is what
//! actually sequences the calls (§4.H).

use crate::config::{
    RTH_ALTITUDE_M, RTH_DESCEND_ALTITUDE_M, RTH_DESCEND_DISTANCE_M, RTH_LAND_ALTITUDE_M,
    RTH_LAND_DISTANCE_M,
};
use crate::geo::distance_m;
use crate::types::{BaroSample, FlightMode, GPSSample, GeoPosition};

/// Whether the altitude cascade (§4.F) should run this tick.
pub fn altitude_cascade_active(mode: FlightMode) -> bool {
    mode >= FlightMode::AltitudeHold
}

/// Whether the position cascade (§4.G) should run this tick.
pub fn position_cascade_active(mode: FlightMode, gps_fix_valid: bool) -> bool {
    mode >= FlightMode::PositionHold && gps_fix_valid
}

/// Side effects requested by one RTH evaluation. Applied by the caller so
/// this function stays a pure, directly testable predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RthOutcome {
    pub disarm: bool,
    pub target_altitude_m: Option<f32>,
    /// `Some(home)` once RTH starts navigating; the caller sets
    /// `target_position = home` and lets the position cascade drive XY.
    pub navigate_to: Option<GeoPosition>,
}

impl RthOutcome {
    const fn no_op() -> Self {
        Self {
            disarm: false,
            target_altitude_m: None,
            navigate_to: None,
        }
    }
}

/// Evaluate one tick of return-to-home (§4.H `rth_step`).
///
/// Only called when the active mode is [`FlightMode::ReturnToHome`]. If
/// the GPS fix is invalid this is a no-op — the safety monitor will
/// downgrade the mode away from RTH on its own pass.
pub fn rth_step(gps: GPSSample, baro: BaroSample, home: GeoPosition) -> RthOutcome {
    if !gps.fix_valid {
        return RthOutcome::no_op();
    }

    let d = distance_m((gps.position.lat, gps.position.lon), (home.lat, home.lon)) as f32;

    if d < RTH_LAND_DISTANCE_M && baro.altitude_m < RTH_LAND_ALTITUDE_M {
        return RthOutcome {
            disarm: true,
            target_altitude_m: None,
            navigate_to: None,
        };
    }

    // Climb and descend-near-home are independent sequential checks, not a
    // chain: descend must run last and override the climb target, or a
    // craft between 1m and 20m within 3m of home would be told to climb
    // back to 20m and never land (matches the original's ordering).
    let mut target_altitude_m = None;
    if baro.altitude_m < RTH_ALTITUDE_M {
        target_altitude_m = Some(RTH_ALTITUDE_M);
    }
    if d < RTH_DESCEND_DISTANCE_M {
        target_altitude_m = Some(RTH_DESCEND_ALTITUDE_M);
    }

    RthOutcome {
        disarm: false,
        target_altitude_m,
        navigate_to: Some(home),
    }
}
