//! Angle wrapping, clamping, and great-circle geodesy (component A).
//!
//! All trig takes and returns radians internally; degree conversions happen
//! explicitly at the boundary of each public function, mirroring the
//! original firmware's convention.

/// Mean Earth radius used for the spherical-Earth Haversine approximation.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Clamp `x` into `[lo, hi]`. NaN propagates through untouched (`x < lo`
/// and `x > hi` are both false for NaN) — callers must guard against NaN
/// upstream.
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Wrap an angle in degrees into `[-180, 180]`.
pub fn wrap_180(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    a
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_360(angle: f32) -> f32 {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Great-circle distance between two geodetic points, meters, via Haversine
/// over a spherical Earth. Always `>= 0`.
pub fn distance_m(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let (lat1, lon1) = p1;
    let (lat2, lon2) = p2;

    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial-course great-circle bearing from `from` to `to`, degrees in
/// `[0, 360)`, North = 0, clockwise-positive.
pub fn bearing_deg(from: (f64, f64), to: (f64, f64)) -> f32 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let dlon = (lon2 - lon1).to_radians();
    let lat1r = lat1.to_radians();
    let lat2r = lat2.to_radians();

    let y = dlon.sin() * lat2r.cos();
    let x = lat1r.cos() * lat2r.sin() - lat1r.sin() * lat2r.cos() * dlon.cos();

    wrap_360(y.atan2(x).to_degrees() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_values() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn clamp_propagates_nan() {
        assert!(clamp(f32::NAN, 0.0, 10.0).is_nan());
    }

    #[test]
    fn wrap_180_is_idempotent() {
        for a in [-720.0, -181.0, -180.0, 0.0, 179.9, 180.0, 359.0, 721.3] {
            let once = wrap_180(a);
            let twice = wrap_180(once);
            assert!((once - twice).abs() < 1e-3, "a={a} once={once} twice={twice}");
            assert!(once >= -180.0 && once <= 180.0);
        }
    }

    #[test]
    fn wrap_360_stays_in_range() {
        for a in [-725.0, -360.0, -1.0, 0.0, 359.9, 360.0, 725.0] {
            let w = wrap_360(a);
            assert!(w >= 0.0 && w < 360.0, "a={a} w={w}");
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = (37.7749, -122.4194);
        assert!(distance_m(p, p) < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let p1 = (37.7749, -122.4194);
        let p2 = (34.0522, -118.2437);
        let d1 = distance_m(p1, p2);
        let d2 = distance_m(p2, p1);
        assert!((d1 - d2).abs() < 1e-6 * d1.max(1.0));
    }

    #[test]
    fn distance_roughly_matches_known_great_circle() {
        // San Francisco to Los Angeles, ~559 km great-circle.
        let sf = (37.7749, -122.4194);
        let la = (34.0522, -118.2437);
        let d = distance_m(sf, la);
        assert!((d - 559_000.0).abs() < 10_000.0, "d={d}");
    }

    #[test]
    fn bearing_due_north_is_zero() {
        let from = (0.0, 0.0);
        let to = (1.0, 0.0);
        let b = bearing_deg(from, to);
        assert!(b.abs() < 0.5 || (b - 360.0).abs() < 0.5, "b={b}");
    }

    #[test]
    fn bearing_due_east_is_ninety() {
        let from = (0.0, 0.0);
        let to = (0.0, 1.0);
        let b = bearing_deg(from, to);
        assert!((b - 90.0).abs() < 0.5, "b={b}");
    }

    #[test]
    fn bearing_stays_in_range() {
        let from = (10.0, 20.0);
        let to = (-5.0, -40.0);
        let b = bearing_deg(from, to);
        assert!(b >= 0.0 && b < 360.0);
    }
}
