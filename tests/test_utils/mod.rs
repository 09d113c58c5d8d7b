#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use ambutrack_core::route::{GeoPoint, Route};
use ambutrack_core::route_fetcher::RouteProvider;
use anyhow::Result;

pub fn point(latitude: f64, longitude: f64) -> GeoPoint {
    GeoPoint {
        latitude,
        longitude,
    }
}

/// Straight-line route with `n` evenly spaced points.
pub fn line_route(
    start: GeoPoint,
    end: GeoPoint,
    n: usize,
    distance_meters: f64,
    duration_seconds: f64,
) -> Route {
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
        points.push(GeoPoint {
            latitude: start.latitude + t * (end.latitude - start.latitude),
            longitude: start.longitude + t * (end.longitude - start.longitude),
        });
    }
    Route {
        points,
        distance_meters,
        duration_seconds,
    }
}

pub enum ProviderScript {
    Route(Route),
    /// Resolves only after the given delay, models a slow provider.
    Delayed(tokio::time::Duration, Route),
    Error(&'static str),
    /// Never resolves, models a stalled provider.
    Hang,
}

/// Route provider replaying scripted responses in order, one per fetch, and
/// recording the requested endpoints.
pub struct ScriptedProvider {
    responses: Mutex<Vec<ProviderScript>>,
    pub requests: Mutex<Vec<(GeoPoint, GeoPoint)>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderScript>) -> Self {
        ScriptedProvider {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl RouteProvider for ScriptedProvider {
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Pin<Box<dyn Future<Output = Result<Route>> + Send + '_>> {
        self.requests.lock().unwrap().push((start, end));
        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                ProviderScript::Route(Route::empty())
            } else {
                responses.remove(0)
            }
        };
        Box::pin(async move {
            match next {
                ProviderScript::Route(route) => Ok(route),
                ProviderScript::Delayed(delay, route) => {
                    tokio::time::sleep(delay).await;
                    Ok(route)
                }
                ProviderScript::Error(message) => Err(anyhow::anyhow!("{}", message)),
                ProviderScript::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        })
    }
}
