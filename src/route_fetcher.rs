use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use serde::Deserialize;

use crate::route::{GeoPoint, Route};

pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

/// External routing provider: resolves two points into a travel path with
/// total distance/duration estimates. Implementations must be re-invoked
/// whenever either endpoint changes; the caller discards superseded results.
pub trait RouteProvider: Send + Sync {
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Pin<Box<dyn Future<Output = Result<Route>> + Send + '_>>;
}

/// Client for an OSRM-compatible HTTP routing API.
pub struct OsrmClient {
    base_url: String,
    http: reqwest::Client,
}

impl OsrmClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OSRM_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        OsrmClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn request(&self, start: GeoPoint, end: GeoPoint) -> Result<Route> {
        // OSRM wants lon,lat pairs.
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, start.longitude, start.latitude, end.longitude, end.latitude
        );
        let response: OsrmResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let route = route_from_response(response);
        if route.is_empty() {
            warn!("osrm returned no route for ({:?} -> {:?})", start, end);
        }
        Ok(route)
    }
}

impl RouteProvider for OsrmClient {
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Pin<Box<dyn Future<Output = Result<Route>> + Send + '_>> {
        Box::pin(self.request(start, end))
    }
}

#[derive(Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

fn route_from_response(response: OsrmResponse) -> Route {
    match response.routes.into_iter().next() {
        None => Route::empty(),
        Some(osrm_route) => Route {
            points: osrm_route
                .geometry
                .coordinates
                .iter()
                .map(|&[longitude, latitude]| GeoPoint {
                    latitude,
                    longitude,
                })
                .collect(),
            distance_meters: osrm_route.distance,
            duration_seconds: osrm_route.duration,
        },
    }
}
