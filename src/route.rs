use serde::{Deserialize, Serialize};

/// WGS84 degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Polyline between two points as returned by the routing provider, together
/// with its total distance/duration estimates. Immutable for the duration of
/// one leg.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub points: Vec<GeoPoint>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl Route {
    /// The "provider failed / no route" value.
    pub fn empty() -> Self {
        Route {
            points: Vec::new(),
            distance_meters: 0.0,
            duration_seconds: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn haversine_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let h = f64::sin(d_lat / 2.0) * f64::sin(d_lat / 2.0)
        + f64::cos(a.latitude.to_radians())
            * f64::cos(b.latitude.to_radians())
            * f64::sin(d_lng / 2.0)
            * f64::sin(d_lng / 2.0);
    let c = 2.0 * f64::atan2(h.sqrt(), (1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
