//! The ingest API: the thread-safe boundary between sensor/command
//! producers and the control loop (component D, §4.D, §5).
//!
//! [`SystemState`] is the single process-wide instance created at init and
//! owned by the control loop. Producers never get direct field access —
//! they're handed an [`IngestHandle`], a cheap `Arc` clone that exposes
//! only the publication methods for their snapshot, per the design notes
//! in §9. Each snapshot is a plain record behind a `Mutex` held only for
//! the duration of a struct copy, so a producer can never observe or
//! cause a torn read (e.g. a new latitude paired with an old longitude),
//! and no producer can block the control thread for more than a few
//! instructions.
//!
//! `armed` and the flight mode are the two scalar flags §5 calls out as
//! multi-writer (the RTH trigger, the safety monitor, and an external
//! `arm()`/`disarm()` call can all touch them), so they live in atomics
//! rather than behind the snapshot mutex.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::types::{
    AtomicFlightMode, BaroSample, EulerAngles, FlightMode, GPSSample, GeoPosition, IMUSample,
    MotorOutputs, ObstacleSample, Vector3,
};

/// Fields of `FlightCommand` the control loop owns outright but that
/// producers (telemetry/mission callers) may also set setpoints for —
/// `throttle_us` and `setpoint` are written only by the control loop
/// itself (§4.E-§4.G); `target_altitude_m`, `target_position`, and
/// `home_position` can be set externally via the ingest API as well as
/// internally by the altitude cascade and RTH logic.
#[derive(Debug, Clone, Copy)]
pub struct FlightCommand {
    pub throttle_us: f32,
    pub setpoint: EulerAngles,
    pub target_altitude_m: f32,
    pub target_position: GeoPosition,
    pub home_position: GeoPosition,
}

impl Default for FlightCommand {
    fn default() -> Self {
        Self {
            throttle_us: crate::config::HOVER_THROTTLE_US,
            setpoint: EulerAngles::zero(),
            target_altitude_m: 0.0,
            target_position: GeoPosition::default(),
            home_position: GeoPosition::default(),
        }
    }
}

/// Process-wide shared state: every sensor snapshot, the flight command,
/// and the latest motor outputs (for telemetry readback).
#[derive(Debug)]
pub struct SystemState {
    gps: Mutex<GPSSample>,
    baro: Mutex<BaroSample>,
    obstacle: Mutex<ObstacleSample>,
    imu_pushed: Mutex<Option<IMUSample>>,
    command: Mutex<FlightCommand>,
    motors: Mutex<MotorOutputs>,
    latest_imu: Mutex<IMUSample>,
    armed: AtomicBool,
    mode: AtomicFlightMode,
}

impl SystemState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gps: Mutex::new(GPSSample::default()),
            baro: Mutex::new(BaroSample::default()),
            obstacle: Mutex::new(ObstacleSample::default()),
            imu_pushed: Mutex::new(None),
            command: Mutex::new(FlightCommand::default()),
            motors: Mutex::new(MotorOutputs::disarmed()),
            latest_imu: Mutex::new(IMUSample::default()),
            armed: AtomicBool::new(false),
            mode: AtomicFlightMode::new(FlightMode::Stabilize),
        })
    }

    // ---- reads used internally by the control loop ----

    pub fn gps_snapshot(&self) -> GPSSample {
        *self.gps.lock().unwrap()
    }

    pub fn baro_snapshot(&self) -> BaroSample {
        *self.baro.lock().unwrap()
    }

    pub fn obstacle_snapshot(&self) -> ObstacleSample {
        *self.obstacle.lock().unwrap()
    }

    pub fn imu_pushed_snapshot(&self) -> Option<IMUSample> {
        *self.imu_pushed.lock().unwrap()
    }

    pub fn command_snapshot(&self) -> FlightCommand {
        *self.command.lock().unwrap()
    }

    pub fn with_command_mut<R>(&self, f: impl FnOnce(&mut FlightCommand) -> R) -> R {
        let mut cmd = self.command.lock().unwrap();
        f(&mut cmd)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    pub fn set_armed(&self, armed: bool) {
        self.armed.store(armed, Ordering::Release);
    }

    pub fn mode(&self) -> FlightMode {
        self.mode.load()
    }

    pub fn set_mode(&self, mode: FlightMode) {
        self.mode.store(mode)
    }

    pub fn publish_motors(&self, motors: MotorOutputs) {
        *self.motors.lock().unwrap() = motors;
    }

    pub fn publish_attitude_sample(&self, sample: IMUSample) {
        *self.latest_imu.lock().unwrap() = sample;
    }

    // ---- producer-facing publication methods (§4.D) ----

    fn update_gps_inner(&self, lat: f64, lon: f64, alt: f32, speed: f32, heading: f32, sats: u8) {
        let position = GeoPosition::new(lat, lon, alt);
        let sample = GPSSample::new(position, speed, heading, sats, Utc::now());
        *self.gps.lock().unwrap() = sample;
    }

    fn update_baro_inner(&self, altitude_m: f32, vertical_speed_mps: f32) {
        *self.baro.lock().unwrap() = BaroSample {
            altitude_m,
            vertical_speed_mps,
        };
    }

    fn update_obstacle_inner(&self, distance_m: f32, bearing_deg: f32, detected: bool) {
        *self.obstacle.lock().unwrap() = ObstacleSample {
            distance_m,
            bearing_deg,
            detected,
        };
    }

    fn update_imu_raw_inner(&self, accel_g: Vector3, gyro_dps: Vector3) {
        let prev_attitude = self
            .imu_pushed
            .lock()
            .unwrap()
            .map(|s| s.attitude)
            .unwrap_or_default();
        *self.imu_pushed.lock().unwrap() = Some(IMUSample {
            accel_g,
            gyro_dps,
            attitude: prev_attitude,
            timestamp: Utc::now(),
        });
    }
}

/// Handle given to sensor drivers, the command channel, and telemetry
/// readers. Cheap to clone (one `Arc` bump); never exposes anything beyond
/// the ingest contract in §4.D.
#[derive(Debug, Clone)]
pub struct IngestHandle {
    state: Arc<SystemState>,
}

impl IngestHandle {
    pub fn new(state: Arc<SystemState>) -> Self {
        Self { state }
    }

    /// Replace the IMU snapshot. Optional in practice: the control thread
    /// usually reads the IMU itself via an [`crate::hal::ImuBus`], but a
    /// driver running on another thread or interrupt context may push
    /// samples here instead.
    pub fn update_imu_raw(&self, accel_g: Vector3, gyro_dps: Vector3) {
        self.state.update_imu_raw_inner(accel_g, gyro_dps);
    }

    /// Replace the GPS snapshot. `fix_valid` is derived from `sats`.
    pub fn update_gps(&self, lat: f64, lon: f64, alt: f32, speed: f32, heading: f32, sats: u8) {
        self.state.update_gps_inner(lat, lon, alt, speed, heading, sats);
    }

    /// Replace the barometer snapshot.
    pub fn update_baro(&self, altitude_m: f32, vertical_speed_mps: f32) {
        self.state.update_baro_inner(altitude_m, vertical_speed_mps);
    }

    /// Replace the obstacle/rangefinder snapshot.
    pub fn update_obstacle(&self, distance_m: f32, bearing_deg: f32, detected: bool) {
        self.state.update_obstacle_inner(distance_m, bearing_deg, detected);
    }

    /// Request a flight-mode change. The safety monitor may downgrade it
    /// on the very next tick if its preconditions aren't met (§4.J).
    pub fn set_flight_mode(&self, mode: FlightMode) {
        self.state.set_mode(mode);
    }

    pub fn set_target_altitude(&self, altitude_m: f32) {
        self.state.with_command_mut(|cmd| cmd.target_altitude_m = altitude_m);
    }

    pub fn set_target_position(&self, lat: f64, lon: f64) {
        self.state.with_command_mut(|cmd| {
            cmd.target_position.lat = lat;
            cmd.target_position.lon = lon;
        });
    }

    pub fn set_home(&self, lat: f64, lon: f64, alt: f32) {
        self.state.with_command_mut(|cmd| {
            cmd.home_position = GeoPosition::new(lat, lon, alt);
        });
    }

    /// Arm the craft. Rejection is implicit: if the safety monitor's
    /// preconditions aren't met, it disarms again on the very next tick.
    pub fn arm(&self) {
        self.state.set_armed(true);
    }

    pub fn disarm(&self) {
        self.state.set_armed(false);
    }

    pub fn trigger_rth(&self) {
        self.state.set_mode(FlightMode::ReturnToHome);
    }

    /// Telemetry snapshot read: the most recent attitude estimate and raw
    /// IMU reading published by the control loop.
    pub fn get_imu(&self) -> IMUSample {
        *self.state.latest_imu.lock().unwrap()
    }

    pub fn get_gps(&self) -> GPSSample {
        self.state.gps_snapshot()
    }

    pub fn get_motors(&self) -> MotorOutputs {
        *self.state.motors.lock().unwrap()
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    pub fn mode(&self) -> FlightMode {
        self.state.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_update_sets_fix_valid_from_sats() {
        let state = SystemState::new();
        let handle = IngestHandle::new(state.clone());

        handle.update_gps(1.0, 2.0, 3.0, 4.0, 5.0, 3);
        assert!(!handle.get_gps().fix_valid);

        handle.update_gps(1.0, 2.0, 3.0, 4.0, 5.0, 9);
        assert!(handle.get_gps().fix_valid);
    }

    #[test]
    fn arm_disarm_round_trips() {
        let state = SystemState::new();
        let handle = IngestHandle::new(state.clone());
        assert!(!state.is_armed());
        handle.arm();
        assert!(state.is_armed());
        handle.disarm();
        assert!(!state.is_armed());
    }

    #[test]
    fn trigger_rth_sets_mode() {
        let state = SystemState::new();
        let handle = IngestHandle::new(state.clone());
        handle.trigger_rth();
        assert_eq!(state.mode(), FlightMode::ReturnToHome);
    }

    #[test]
    fn setters_update_command_snapshot_atomically() {
        let state = SystemState::new();
        let handle = IngestHandle::new(state.clone());
        handle.set_target_altitude(42.0);
        handle.set_home(10.0, 20.0, 30.0);
        handle.set_target_position(11.0, 21.0);

        let cmd = state.command_snapshot();
        assert_eq!(cmd.target_altitude_m, 42.0);
        assert_eq!(cmd.home_position, GeoPosition::new(10.0, 20.0, 30.0));
        assert_eq!(cmd.target_position.lat, 11.0);
        assert_eq!(cmd.target_position.lon, 21.0);
    }

    #[test]
    fn motor_and_imu_publication_are_visible_to_telemetry_readers() {
        let state = SystemState::new();
        let handle = IngestHandle::new(state.clone());

        state.publish_motors(MotorOutputs { channels: [1234; 8] });
        assert_eq!(handle.get_motors().channel(1), 1234);

        let sample = IMUSample {
            accel_g: Vector3::new(0.0, 0.0, 1.0),
            gyro_dps: Vector3::zero(),
            attitude: EulerAngles::new(1.0, 2.0, 3.0),
            timestamp: Utc::now(),
        };
        state.publish_attitude_sample(sample);
        assert_eq!(handle.get_imu().attitude, EulerAngles::new(1.0, 2.0, 3.0));
    }
}
