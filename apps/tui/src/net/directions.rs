//! Walking-directions providers: token-gated Mapbox and the open OSRM
//! fallback. Both take a coordinate path and answer with a GeoJSON line plus
//! distance/duration, so they share one response decoder.

use reqwest::Client;
use serde::Deserialize;

use super::error::ProviderError;
use crate::geo::LatLng;

const MAPBOX_DIRECTIONS_URL: &str = "https://api.mapbox.com/directions/v5/mapbox/walking";
const OSRM_ROUTE_URL: &str = "https://router.project-osrm.org/route/v1/foot";

/// Which provider produced a planned route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteProvider {
    Mapbox,
    Osrm,
    StraightLine,
}

impl RouteProvider {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mapbox => "Mapbox",
            Self::Osrm => "OSRM",
            Self::StraightLine => "estimate",
        }
    }
}

/// A routed polyline with its reported distance and duration.
#[derive(Debug, Clone)]
pub struct RouteSummary {
    pub points: Vec<LatLng>,
    pub distance_km: f64,
    pub duration_min: i64,
}

pub async fn mapbox_route(
    http: &Client,
    path: &[LatLng],
    token: &str,
) -> Result<RouteSummary, ProviderError> {
    let url = format!(
        "{MAPBOX_DIRECTIONS_URL}/{}?geometries=geojson&overview=full&alternatives=false&access_token={token}",
        coordinate_path(path)
    );
    fetch_route(http, &url).await
}

pub async fn osrm_route(http: &Client, path: &[LatLng]) -> Result<RouteSummary, ProviderError> {
    let url = format!(
        "{OSRM_ROUTE_URL}/{}?overview=full&geometries=geojson",
        coordinate_path(path)
    );
    fetch_route(http, &url).await
}

async fn fetch_route(http: &Client, url: &str) -> Result<RouteSummary, ProviderError> {
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ProviderError::Status(response.status()));
    }
    let body = response.text().await?;
    route_summary_from_body(&body)
}

/// "lng,lat;lng,lat;..." as both providers expect.
fn coordinate_path(path: &[LatLng]) -> String {
    path.iter()
        .map(|p| format!("{},{}", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(";")
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    geometry: Option<RouteGeometry>,
    #[serde(default)]
    distance: f64, // meters
    #[serde(default)]
    duration: f64, // seconds
}

#[derive(Deserialize)]
struct RouteGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>, // lng, lat
}

fn route_summary_from_body(body: &str) -> Result<RouteSummary, ProviderError> {
    let parsed: DirectionsResponse =
        serde_json::from_str(body).map_err(|_| ProviderError::NoRoute)?;
    let route = parsed.routes.into_iter().next().ok_or(ProviderError::NoRoute)?;
    let geometry = route.geometry.ok_or(ProviderError::NoRoute)?;
    if geometry.coordinates.is_empty() {
        return Err(ProviderError::NoRoute);
    }

    let points = geometry
        .coordinates
        .iter()
        .map(|[lng, lat]| LatLng::new(*lat, *lng))
        .collect();

    Ok(RouteSummary {
        points,
        // meters -> km with 2 decimals, seconds -> whole minutes.
        distance_km: (route.distance / 10.0).round() / 100.0,
        #[allow(clippy::cast_possible_truncation)]
        duration_min: (route.duration / 60.0).round() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE_BODY: &str = r#"{
        "routes": [{
            "geometry": {"coordinates": [[-46.6566, -23.5617], [-46.6540, -23.5600]]},
            "distance": 1234.0,
            "duration": 987.0
        }]
    }"#;

    #[test]
    fn decodes_route_with_rounded_units() {
        let summary = route_summary_from_body(ROUTE_BODY).unwrap();
        assert_eq!(summary.points.len(), 2);
        assert_eq!(summary.points[0], LatLng::new(-23.5617, -46.6566));
        assert!((summary.distance_km - 1.23).abs() < 1e-9);
        assert_eq!(summary.duration_min, 16);
    }

    #[test]
    fn missing_route_is_an_error() {
        assert!(matches!(
            route_summary_from_body(r#"{"routes": []}"#),
            Err(ProviderError::NoRoute)
        ));
        assert!(matches!(
            route_summary_from_body(r#"{"routes": [{"distance": 1.0, "duration": 1.0}]}"#),
            Err(ProviderError::NoRoute)
        ));
        assert!(matches!(
            route_summary_from_body("nope"),
            Err(ProviderError::NoRoute)
        ));
    }

    #[test]
    fn coordinate_path_is_lng_lat_semicolon_joined() {
        let path = [LatLng::new(-23.5, -46.6), LatLng::new(-23.4, -46.5)];
        assert_eq!(coordinate_path(&path), "-46.6,-23.5;-46.5,-23.4");
    }
}
