use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::route::{haversine_distance_km, GeoPoint};

pub const DEFAULT_OVERPASS_BASE_URL: &str = "https://overpass-api.de";
pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 50_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    pub location: GeoPoint,
    /// Great-circle distance from the search center.
    pub distance_km: f64,
}

/// Client for an Overpass-compatible POI API.
pub struct OverpassClient {
    base_url: String,
    http: reqwest::Client,
}

impl OverpassClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OVERPASS_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        OverpassClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Hospitals around `center`, nearest first. Provider failures yield an
    /// empty list, never an error.
    pub async fn search_hospitals(&self, center: GeoPoint, radius_meters: u32) -> Vec<Hospital> {
        match self.try_search(center, radius_meters).await {
            Ok(hospitals) => hospitals,
            Err(e) => {
                warn!("hospital search failed: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn try_search(&self, center: GeoPoint, radius_meters: u32) -> Result<Vec<Hospital>> {
        let query = format!(
            "[out:json];node[amenity=hospital](around:{},{},{});out;",
            radius_meters, center.latitude, center.longitude
        );
        let url = format!("{}/api/interpreter", self.base_url);
        let response: OverpassResponse = self
            .http
            .get(&url)
            .query(&[("data", query.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(hospitals_from_response(response, &center))
    }
}

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
struct OverpassElement {
    id: i64,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: OverpassTags,
}

#[derive(Deserialize, Default)]
struct OverpassTags {
    name: Option<String>,
}

fn hospitals_from_response(response: OverpassResponse, center: &GeoPoint) -> Vec<Hospital> {
    let mut hospitals: Vec<Hospital> = response
        .elements
        .into_iter()
        .map(|element| {
            let location = GeoPoint {
                latitude: element.lat,
                longitude: element.lon,
            };
            Hospital {
                id: element.id,
                name: element
                    .tags
                    .name
                    .unwrap_or_else(|| "Unnamed Hospital".to_string()),
                distance_km: haversine_distance_km(center, &location),
                location,
            }
        })
        .collect();
    hospitals.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    hospitals
}
