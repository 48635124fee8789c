// SPDX-License-Identifier: MIT

//! Geocoding client and great-circle distance for the address constraint.
//!
//! The geocoder answers free-text queries with a GeoJSON FeatureCollection;
//! candidates keep the service's ordering and the first one is authoritative.

use crate::error::AppError;
use anyhow::Context;
use geo::Point;
use geojson::GeoJson;
use std::time::Duration;

/// Reference point for the address constraint: Paris (lat, lon).
pub const REFERENCE_POINT: (f64, f64) = (48.8566, 2.3522);

/// Mean Earth radius used by the haversine distance, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the address geocoding service.
#[derive(Clone)]
pub struct GeocoderClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocoderClient {
    /// Create a client for the geocoder at `base_url`.
    ///
    /// The request timeout keeps a stalled geocoder from hanging an edit
    /// submission; a timeout surfaces as an `Err` the caller fails closed on.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed building geocoder HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a free-text address to an ordered list of candidate points.
    ///
    /// An empty list means the address did not resolve; that is not an error
    /// here. Transport and parse failures are errors.
    pub async fn search(&self, address: &str) -> Result<Vec<Point<f64>>, AppError> {
        let url = format!("{}/search/", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", address)])
            .send()
            .await
            .map_err(|e| AppError::Geocoder(format!("Geocoder request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Geocoder(format!(
                "Geocoder returned HTTP {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Geocoder(format!("Geocoder response read failed: {}", e)))?;

        parse_candidates(&body)
            .map_err(|e| AppError::Geocoder(format!("Geocoder response parse failed: {}", e)))
    }
}

/// Parse a GeoJSON FeatureCollection into candidate points (x = lon, y = lat).
///
/// Features without a point geometry are skipped; ordering is preserved.
fn parse_candidates(body: &str) -> Result<Vec<Point<f64>>, geojson::Error> {
    let geojson: GeoJson = body.parse()?;

    let mut candidates = Vec::new();
    if let GeoJson::FeatureCollection(collection) = geojson {
        for feature in collection.features {
            if let Some(geometry) = feature.geometry {
                let point: Result<Point<f64>, _> = geometry.value.try_into();
                if let Ok(point) = point {
                    candidates.push(point);
                }
            }
        }
    }

    Ok(candidates)
}

/// Great-circle distance in kilometers between two (lat, lon) pairs,
/// by the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance in kilometers from a candidate point to the reference point.
pub fn distance_from_reference_km(candidate: &Point<f64>) -> f64 {
    let (ref_lat, ref_lon) = REFERENCE_POINT;
    // GeoJSON order: x = longitude, y = latitude.
    haversine_km(ref_lat, ref_lon, candidate.y(), candidate.x())
}
