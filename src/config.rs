//! Tunable constants for the control core, gathered in one place instead of
//! scattered through the cascades, so they can be overridden for host
//! simulation and tests without touching control-path code.

/// Fixed control-loop rate.
pub const LOOP_HZ: u32 = 400;
/// Fixed tick period, derived from [`LOOP_HZ`]. Valid only because the
/// scheduler guarantees fixed-rate execution (§9 design notes); a
/// variable-rate port must thread `dt` through instead.
pub const DT: f32 = 1.0 / LOOP_HZ as f32;

/// Hover-baseline throttle, microseconds.
pub const HOVER_THROTTLE_US: f32 = 1500.0;

/// Altitude-hold outer-loop climb-rate clamp, m/s.
pub const MAX_CLIMB_RATE_MPS: f32 = 3.0;

/// Position-hold outer-loop velocity clamp, m/s (per axis).
pub const MAX_HORIZONTAL_VELOCITY_MPS: f32 = 5.0;

/// Position-hold inner-loop tilt setpoint clamp, degrees (per axis).
pub const MAX_POSITION_TILT_DEG: f32 = 25.0;

/// Safety monitor tilt failsafe threshold, degrees.
pub const MAX_SAFE_TILT_DEG: f32 = 45.0;

/// Return-to-home climb target altitude, meters AGL.
pub const RTH_ALTITUDE_M: f32 = 20.0;

/// Return-to-home landing trigger: horizontal distance from home, meters.
pub const RTH_LAND_DISTANCE_M: f32 = 2.0;
/// Return-to-home landing trigger: altitude, meters.
pub const RTH_LAND_ALTITUDE_M: f32 = 1.0;
/// Return-to-home descend-near-home trigger: horizontal distance, meters.
pub const RTH_DESCEND_DISTANCE_M: f32 = 3.0;
/// Return-to-home descend-near-home target altitude, meters.
pub const RTH_DESCEND_ALTITUDE_M: f32 = 0.5;

/// Obstacle override trigger distance, meters.
pub const OBSTACLE_TRIGGER_DISTANCE_M: f32 = 2.0;
/// Obstacle override lateral escape roll magnitude, degrees.
pub const OBSTACLE_ESCAPE_ROLL_DEG: f32 = 10.0;

/// Gains and integrator clamps for one configurable PID stage.
#[derive(Debug, Clone, Copy)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub max_integral: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32, max_integral: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            max_integral,
        }
    }
}

/// All PID gains used by the control core, grouped by cascade stage.
#[derive(Debug, Clone, Copy)]
pub struct ControlGains {
    pub roll: PidGains,
    pub pitch: PidGains,
    pub yaw: PidGains,
    pub altitude: PidGains,
    pub climb_rate: PidGains,
    pub position_n: PidGains,
    pub position_e: PidGains,
    pub velocity_n: PidGains,
    pub velocity_e: PidGains,
}

impl Default for ControlGains {
    fn default() -> Self {
        Self {
            roll: PidGains::new(1.5, 0.02, 0.8, 400.0),
            pitch: PidGains::new(1.5, 0.02, 0.8, 400.0),
            yaw: PidGains::new(2.0, 0.05, 0.5, 400.0),
            altitude: PidGains::new(3.0, 0.5, 1.5, 500.0),
            climb_rate: PidGains::new(2.0, 0.1, 0.5, 300.0),
            position_n: PidGains::new(1.0, 0.1, 0.5, 100.0),
            position_e: PidGains::new(1.0, 0.1, 0.5, 100.0),
            velocity_n: PidGains::new(0.5, 0.05, 0.1, 50.0),
            velocity_e: PidGains::new(0.5, 0.05, 0.1, 50.0),
        }
    }
}

/// Top-level configuration for one run of the control core.
#[derive(Debug, Clone)]
pub struct Config {
    pub gains: ControlGains,
    /// Telemetry WebSocket port (ambient, read-only; never affects control).
    pub telemetry_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gains: ControlGains::default(),
            telemetry_port: 8080,
        }
    }
}
