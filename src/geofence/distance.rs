//! Great-circle distance.

use crate::config::EARTH_RADIUS_M;

/// Haversine distance in meters between two points given in degrees.
///
/// Uses a spherical Earth of radius [`EARTH_RADIUS_M`]. Pure and total for
/// finite input; identical arguments always give identical results, which the
/// inclusive radius check relies on.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    // Rounding can push `a` just past 1 near the antipode
    let a = ((d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2))
        .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_at_same_point() {
        assert_eq!(haversine_distance(28.6139, 77.2090, 28.6139, 77.2090), 0.0);
    }

    #[test]
    fn test_north_offset_matches_arc_length() {
        // 0.0061 degrees of latitude along a meridian
        let d = haversine_distance(28.6200, 77.2090, 28.6139, 77.2090);
        let expected = 0.0061_f64.to_radians() * EARTH_RADIUS_M;
        assert!((d - expected).abs() < 1e-6, "got {d}, expected {expected}");
        assert!((d - 678.3).abs() < 1.0);
    }

    #[test]
    fn test_park_to_museum() {
        // India Gate to the National Museum, roughly 2 km apart
        let d = haversine_distance(28.6139, 77.2090, 28.6129, 77.2295);
        assert!(d > 1950.0 && d < 2050.0, "got {d}");
    }

    #[test]
    fn test_antipodes_is_half_circumference() {
        let d = haversine_distance(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((d - half).abs() < 1e-3);
    }

    const SAMPLE_POINTS: [(f64, f64); 9] = [
        (0.0, 0.0),
        (28.6139, 77.2090),
        (-33.8568, 151.2153),
        (51.5007, -0.1246),
        (89.9, 45.0),
        (-90.0, -180.0),
        (12.5, 179.99),
        (-28.6139, -102.791),
        (33.8568, -28.7847),
    ];

    #[test]
    fn test_distance_symmetric_and_bounded() {
        let half = std::f64::consts::PI * EARTH_RADIUS_M;
        for &(lat1, lon1) in &SAMPLE_POINTS {
            for &(lat2, lon2) in &SAMPLE_POINTS {
                let ab = haversine_distance(lat1, lon1, lat2, lon2);
                let ba = haversine_distance(lat2, lon2, lat1, lon1);
                assert!((ab - ba).abs() < 1e-6, "asymmetric for {lat1},{lon1} / {lat2},{lon2}");
                assert!((0.0..=half + 1e-6).contains(&ab));
            }
        }
    }

    #[test]
    fn test_antipodal_pairs_stay_finite() {
        let half = std::f64::consts::PI * EARTH_RADIUS_M;
        for i in 0..1800 {
            let lat = -89.95 + i as f64 * 0.1;
            let lon = -179.95 + (i as f64 * 0.37) % 180.0;
            let d = haversine_distance(lat, lon, -lat, lon + 180.0);
            assert!(d.is_finite(), "NaN for antipodes of {lat},{lon}");
            assert!((d - half).abs() < 1.0, "got {d} for {lat},{lon}");
        }
    }
}
