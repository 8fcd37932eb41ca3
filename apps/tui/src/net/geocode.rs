//! Wrappers over the two interchangeable place-search providers: the
//! token-gated Mapbox geocoder and the open Nominatim fallback. Both are
//! queried with bounded result counts and pt-BR/Brazil locale filters, and
//! both decode into the same `PlaceSuggestion` shape.

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::error::ProviderError;
use crate::geo::LatLng;

const MAPBOX_PLACES_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";
const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const CLIENT_AGENT: &str = "rota-acessivel-tui/0.1";
const SUGGESTION_LIMIT: &str = "5";

/// One ranked label+coordinate result from a search provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSuggestion {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Map viewport used to bias/bound open-provider searches.
#[derive(Debug, Clone, Copy)]
pub struct Viewbox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

pub async fn geocode_mapbox(
    http: &Client,
    query: &str,
    token: &str,
    proximity: Option<LatLng>,
) -> Result<Option<LatLng>, ProviderError> {
    let body = fetch_mapbox(http, query, token, proximity, "1").await?;
    Ok(mapbox_first_center(&body))
}

pub async fn search_places_mapbox(
    http: &Client,
    query: &str,
    token: &str,
    proximity: Option<LatLng>,
) -> Result<Vec<PlaceSuggestion>, ProviderError> {
    let body = fetch_mapbox(http, query, token, proximity, SUGGESTION_LIMIT).await?;
    Ok(mapbox_place_suggestions(&body))
}

pub async fn geocode_nominatim(
    http: &Client,
    query: &str,
    viewbox: Option<Viewbox>,
) -> Result<Option<LatLng>, ProviderError> {
    let body = fetch_nominatim(http, query, viewbox, "1").await?;
    Ok(nominatim_first_coordinate(&body))
}

pub async fn search_places_nominatim(
    http: &Client,
    query: &str,
    viewbox: Option<Viewbox>,
) -> Result<Vec<PlaceSuggestion>, ProviderError> {
    let body = fetch_nominatim(http, query, viewbox, SUGGESTION_LIMIT).await?;
    Ok(nominatim_suggestions(&body))
}

async fn fetch_mapbox(
    http: &Client,
    query: &str,
    token: &str,
    proximity: Option<LatLng>,
    limit: &str,
) -> Result<String, ProviderError> {
    let mut url = Url::parse(MAPBOX_PLACES_URL).map_err(|_| ProviderError::InvalidUrl)?;
    url.path_segments_mut()
        .map_err(|()| ProviderError::InvalidUrl)?
        .push(&format!("{query}.json"));
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("limit", limit)
            .append_pair("language", "pt-BR")
            .append_pair("country", "BR")
            .append_pair("types", "address,place,poi")
            .append_pair("access_token", token);
        if let Some(near) = proximity {
            if near.lat.is_finite() && near.lng.is_finite() {
                pairs.append_pair("proximity", &format!("{},{}", near.lng, near.lat));
            }
        }
    }

    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ProviderError::Status(response.status()));
    }
    Ok(response.text().await?)
}

async fn fetch_nominatim(
    http: &Client,
    query: &str,
    viewbox: Option<Viewbox>,
    limit: &str,
) -> Result<String, ProviderError> {
    let mut url = Url::parse(NOMINATIM_SEARCH_URL).map_err(|_| ProviderError::InvalidUrl)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("format", "json")
            .append_pair("limit", limit)
            .append_pair("accept-language", "pt-BR")
            .append_pair("countrycodes", "br")
            .append_pair("addressdetails", "1")
            .append_pair("q", query);
        if let Some(b) = viewbox {
            pairs.append_pair("viewbox", &format!("{},{},{},{}", b.left, b.top, b.right, b.bottom));
            pairs.append_pair("bounded", "1");
        }
    }

    let response = http
        .get(url)
        .header(ACCEPT, "application/json")
        .header(USER_AGENT, CLIENT_AGENT)
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(ProviderError::Status(response.status()));
    }
    Ok(response.text().await?)
}

#[derive(Deserialize)]
struct MapboxResponse {
    #[serde(default)]
    features: Vec<MapboxFeature>,
}

#[derive(Deserialize)]
struct MapboxFeature {
    center: [f64; 2], // lng, lat
    #[serde(default)]
    text: Option<String>,
    // House number; Mapbox emits this as a string or a number depending on
    // the result type.
    #[serde(default)]
    address: Option<serde_json::Value>,
    #[serde(default)]
    context: Vec<MapboxContext>,
}

#[derive(Deserialize)]
struct MapboxContext {
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    short_code: Option<String>,
}

impl MapboxFeature {
    fn context_text(&self, id_prefix: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|c| c.id.starts_with(id_prefix))
            .and_then(|c| c.text.as_deref())
    }
}

fn mapbox_first_center(body: &str) -> Option<LatLng> {
    let parsed: MapboxResponse = serde_json::from_str(body).ok()?;
    let feature = parsed.features.first()?;
    Some(LatLng::new(feature.center[1], feature.center[0]))
}

fn mapbox_place_suggestions(body: &str) -> Vec<PlaceSuggestion> {
    let Ok(parsed) = serde_json::from_str::<MapboxResponse>(body) else {
        return Vec::new();
    };
    parsed
        .features
        .iter()
        .map(|feature| {
            let number = feature
                .address
                .as_ref()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            let street = feature.text.clone().unwrap_or_default();
            let neighborhood = feature
                .context_text("neighborhood")
                .or_else(|| feature.context_text("district"))
                .unwrap_or_default();
            let city = feature
                .context_text("place")
                .or_else(|| feature.context_text("locality"))
                .unwrap_or_default();
            let region = feature.context.iter().find(|c| c.id.starts_with("region"));
            let uf = state_to_uf(
                region.and_then(|r| r.text.as_deref()),
                region.and_then(|r| r.short_code.as_deref()),
            );
            let postcode = feature.context_text("postcode").unwrap_or_default();

            PlaceSuggestion {
                label: compose_label(&street, &number, neighborhood, city, uf.as_deref(), postcode),
                latitude: feature.center[1],
                longitude: feature.center[0],
            }
        })
        .collect()
}

#[derive(Deserialize)]
struct NominatimItem {
    lat: String,
    lon: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Deserialize, Default)]
struct NominatimAddress {
    #[serde(default)]
    road: Option<String>,
    #[serde(default)]
    house_number: Option<String>,
    #[serde(default)]
    neighbourhood: Option<String>,
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    municipality: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
}

impl NominatimAddress {
    fn city(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
            .or(self.municipality.as_deref())
    }

    fn neighborhood(&self) -> Option<&str> {
        self.neighbourhood.as_deref().or(self.suburb.as_deref())
    }
}

fn nominatim_first_coordinate(body: &str) -> Option<LatLng> {
    let parsed: Vec<NominatimItem> = serde_json::from_str(body).ok()?;
    let first = parsed.first()?;
    let lat: f64 = first.lat.parse().ok()?;
    let lng: f64 = first.lon.parse().ok()?;
    if lat.is_finite() && lng.is_finite() {
        Some(LatLng::new(lat, lng))
    } else {
        None
    }
}

fn nominatim_suggestions(body: &str) -> Vec<PlaceSuggestion> {
    let Ok(parsed) = serde_json::from_str::<Vec<NominatimItem>>(body) else {
        return Vec::new();
    };
    parsed
        .iter()
        .filter_map(|item| {
            let address = item.address.as_ref()?;
            // Only street-level results with a resolvable city are useful
            // suggestions.
            let street = address.road.as_deref()?;
            let city = address.city()?;
            let lat: f64 = item.lat.parse().ok()?;
            let lng: f64 = item.lon.parse().ok()?;
            if !lat.is_finite() || !lng.is_finite() {
                return None;
            }
            let uf = state_to_uf(address.state.as_deref(), None);
            Some(PlaceSuggestion {
                label: compose_label(
                    street,
                    address.house_number.as_deref().unwrap_or_default(),
                    address.neighborhood().unwrap_or_default(),
                    city,
                    uf.as_deref(),
                    address.postcode.as_deref().unwrap_or_default(),
                ),
                latitude: lat,
                longitude: lng,
            })
        })
        .collect()
}

/// "street, number - neighborhood - city/UF - postcode", skipping empty
/// parts and collapsing runs of whitespace.
fn compose_label(
    street: &str,
    number: &str,
    neighborhood: &str,
    city: &str,
    uf: Option<&str>,
    postcode: &str,
) -> String {
    let street_part = [street, number]
        .iter()
        .filter(|p| !p.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let city_uf_part = match (city.trim().is_empty(), uf) {
        (false, Some(uf)) => format!("{city}/{uf}"),
        (false, None) => city.to_string(),
        (true, Some(uf)) => uf.to_string(),
        (true, None) => String::new(),
    };

    [street_part, neighborhood.to_string(), city_uf_part, postcode.to_string()]
        .iter()
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| p.chars().any(char::is_alphanumeric))
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Maps a Brazilian state name (or "BR-XX" short code) to its two-letter UF.
fn state_to_uf(state: Option<&str>, short_code: Option<&str>) -> Option<String> {
    if let Some(code) = short_code {
        if let Some(uf) = code.strip_prefix("BR-") {
            return Some(uf.to_uppercase());
        }
    }
    let uf = match state? {
        "Acre" => "AC",
        "Alagoas" => "AL",
        "Amapá" => "AP",
        "Amazonas" => "AM",
        "Bahia" => "BA",
        "Ceará" => "CE",
        "Distrito Federal" => "DF",
        "Espírito Santo" => "ES",
        "Goiás" => "GO",
        "Maranhão" => "MA",
        "Mato Grosso" => "MT",
        "Mato Grosso do Sul" => "MS",
        "Minas Gerais" => "MG",
        "Pará" => "PA",
        "Paraíba" => "PB",
        "Paraná" => "PR",
        "Pernambuco" => "PE",
        "Piauí" => "PI",
        "Rio de Janeiro" => "RJ",
        "Rio Grande do Norte" => "RN",
        "Rio Grande do Sul" => "RS",
        "Rondônia" => "RO",
        "Roraima" => "RR",
        "Santa Catarina" => "SC",
        "São Paulo" => "SP",
        "Sergipe" => "SE",
        "Tocantins" => "TO",
        _ => return None,
    };
    Some(uf.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPBOX_BODY: &str = r#"{
        "features": [{
            "center": [-46.6566, -23.5617],
            "text": "Avenida Paulista",
            "address": "1578",
            "context": [
                {"id": "neighborhood.1", "text": "Bela Vista"},
                {"id": "place.2", "text": "São Paulo"},
                {"id": "region.3", "text": "São Paulo", "short_code": "BR-SP"},
                {"id": "postcode.4", "text": "01310-200"}
            ]
        }]
    }"#;

    const NOMINATIM_BODY: &str = r#"[
        {
            "lat": "-23.5617",
            "lon": "-46.6566",
            "address": {
                "road": "Avenida Paulista",
                "house_number": "1578",
                "suburb": "Bela Vista",
                "city": "São Paulo",
                "state": "São Paulo",
                "postcode": "01310-200"
            }
        },
        {"lat": "-23.55", "lon": "-46.63", "address": {"state": "São Paulo"}}
    ]"#;

    #[test]
    fn decodes_mapbox_suggestion_with_composed_label() {
        let items = mapbox_place_suggestions(MAPBOX_BODY);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].label,
            "Avenida Paulista, 1578 - Bela Vista - São Paulo/SP - 01310-200"
        );
        assert!((items[0].latitude - -23.5617).abs() < 1e-9);
        assert!((items[0].longitude - -46.6566).abs() < 1e-9);
    }

    #[test]
    fn decodes_mapbox_first_center() {
        let center = mapbox_first_center(MAPBOX_BODY);
        assert_eq!(center, Some(LatLng::new(-23.5617, -46.6566)));
        assert_eq!(mapbox_first_center(r#"{"features": []}"#), None);
        assert_eq!(mapbox_first_center("not json"), None);
    }

    #[test]
    fn nominatim_filters_results_without_street_or_city() {
        let items = nominatim_suggestions(NOMINATIM_BODY);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].label,
            "Avenida Paulista, 1578 - Bela Vista - São Paulo/SP - 01310-200"
        );
    }

    #[test]
    fn nominatim_first_coordinate_ignores_address_filter() {
        let first = nominatim_first_coordinate(NOMINATIM_BODY);
        assert_eq!(first, Some(LatLng::new(-23.5617, -46.6566)));
        assert_eq!(nominatim_first_coordinate("[]"), None);
    }

    #[test]
    fn label_skips_empty_parts() {
        assert_eq!(
            compose_label("Rua A", "", "", "Santos", None, ""),
            "Rua A - Santos"
        );
        assert_eq!(compose_label("", "", "", "", None, ""), "");
    }

    #[test]
    fn uf_mapping_prefers_short_code() {
        assert_eq!(
            state_to_uf(Some("Minas Gerais"), Some("BR-SP")),
            Some("SP".to_string())
        );
        assert_eq!(state_to_uf(Some("Minas Gerais"), None), Some("MG".to_string()));
        assert_eq!(state_to_uf(Some("Unknown"), None), None);
        assert_eq!(state_to_uf(None, None), None);
    }
}
