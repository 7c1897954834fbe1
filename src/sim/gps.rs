//! Host-in-the-loop GPS/barometer/rangefinder feed generator.
//!
//! Adapted from the dashboard's `GpsSimulator`: the same circular-flight
//! pattern and HDOP-driven satellite-count model, pushed through
//! [`crate::ingest::IngestHandle`] instead of returned as a one-shot struct,
//! since the control core pulls sensor snapshots rather than owning a GPS
//! driver directly (§4.D).

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::ingest::IngestHandle;
use crate::types::GPS_MIN_SATS_FOR_FIX;

/// Drives one [`IngestHandle`] with a synthetic circular-flight GPS track,
/// a gently oscillating barometric altitude, and an obstacle feed that is
/// normally clear.
pub struct GpsFeedSim {
    center_lat: f64,
    center_lon: f64,
    radius_deg: f64,
    angular_speed: f64,
    satellites: u8,
    hdop: f64,
    position_noise_std_m: f64,
    tick: u64,
    rng: rand::rngs::ThreadRng,
}

impl GpsFeedSim {
    pub fn new(center_lat: f64, center_lon: f64) -> Self {
        Self {
            center_lat,
            center_lon,
            radius_deg: 0.001,
            angular_speed: 0.05,
            satellites: 12,
            hdop: 1.2,
            position_noise_std_m: 2.5,
            tick: 0,
            rng: rand::thread_rng(),
        }
    }

    /// Push one GPS update into `handle`. Call at roughly 1 Hz — GPS fixes
    /// arrive far slower than the 400 Hz control loop (§6).
    pub fn step(&mut self, handle: &IngestHandle) {
        self.tick += 1;
        let t = self.tick as f64;

        let angle = self.angular_speed * t;
        let lat = self.center_lat + self.radius_deg * angle.cos();
        let lon = self.center_lon + self.radius_deg * angle.sin() / lat.to_radians().cos();

        let noise_scale = self.hdop * self.position_noise_std_m;
        let normal = Normal::new(0.0, noise_scale).unwrap();
        let lat_noise = normal.sample(&mut self.rng) / 111_320.0;
        let lon_noise = normal.sample(&mut self.rng) / (111_320.0 * lat.to_radians().cos());

        let speed_mps = (self.radius_deg * 111_320.0 * self.angular_speed) as f32;
        let heading_deg = ((angle + std::f64::consts::FRAC_PI_2).to_degrees() as f32).rem_euclid(360.0);

        handle.update_gps(
            lat + lat_noise,
            lon + lon_noise,
            0.0,
            speed_mps,
            heading_deg,
            self.satellites,
        );
    }

    /// Simulate a total GPS signal-loss event: satellite count drops below
    /// [`GPS_MIN_SATS_FOR_FIX`], and stays there until [`Self::restore_fix`].
    pub fn lose_fix(&mut self) {
        self.satellites = GPS_MIN_SATS_FOR_FIX.saturating_sub(2);
        self.hdop = 15.0;
    }

    pub fn restore_fix(&mut self) {
        self.satellites = 12;
        self.hdop = 1.2;
    }
}

/// Drives the barometer snapshot toward a target altitude with a simple
/// first-order response — adequate for exercising the altitude cascade in
/// tests without a full aerodynamic model.
pub struct BaroFeedSim {
    altitude_m: f32,
    vertical_speed_mps: f32,
}

impl BaroFeedSim {
    pub fn new(initial_altitude_m: f32) -> Self {
        Self {
            altitude_m: initial_altitude_m,
            vertical_speed_mps: 0.0,
        }
    }

    /// Integrate the commanded throttle into altitude/climb-rate, treating
    /// throttle above hover as net positive thrust. Pushes the result into
    /// `handle`.
    pub fn step(&mut self, handle: &IngestHandle, throttle_us: f32, dt: f32) {
        let thrust_term = (throttle_us - crate::config::HOVER_THROTTLE_US) * 0.01;
        self.vertical_speed_mps += (thrust_term - self.vertical_speed_mps * 0.5) * dt;
        self.altitude_m = (self.altitude_m + self.vertical_speed_mps * dt).max(0.0);
        handle.update_baro(self.altitude_m, self.vertical_speed_mps);
    }

    pub fn altitude_m(&self) -> f32 {
        self.altitude_m
    }
}

/// Obstacle/rangefinder feed that stays clear until a test triggers it.
#[derive(Debug, Default)]
pub struct ObstacleFeedSim {
    distance_m: f32,
    bearing_deg: f32,
    detected: bool,
}

impl ObstacleFeedSim {
    pub fn clear() -> Self {
        Self {
            distance_m: f32::MAX,
            bearing_deg: 0.0,
            detected: false,
        }
    }

    pub fn trigger(&mut self, distance_m: f32, bearing_deg: f32) {
        self.distance_m = distance_m;
        self.bearing_deg = bearing_deg;
        self.detected = true;
    }

    pub fn push(&self, handle: &IngestHandle) {
        handle.update_obstacle(self.distance_m, self.bearing_deg, self.detected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::SystemState;

    #[test]
    fn feed_produces_valid_fix_by_default() {
        let state = SystemState::new();
        let handle = IngestHandle::new(state.clone());
        let mut gps = GpsFeedSim::new(37.0, -122.0);
        gps.step(&handle);
        assert!(handle.get_gps().fix_valid);
    }

    #[test]
    fn lose_fix_drops_below_minimum_satellites() {
        let state = SystemState::new();
        let handle = IngestHandle::new(state.clone());
        let mut gps = GpsFeedSim::new(37.0, -122.0);
        gps.lose_fix();
        gps.step(&handle);
        assert!(!handle.get_gps().fix_valid);
    }

    #[test]
    fn obstacle_feed_reports_clear_until_triggered() {
        let mut obstacle = ObstacleFeedSim::clear();
        assert!(!obstacle.detected);
        obstacle.trigger(1.0, 45.0);
        assert!(obstacle.detected);
        assert_eq!(obstacle.bearing_deg, 45.0);
    }
}
