pub mod directions;
pub mod error;
pub mod geocode;

pub use directions::{RouteProvider, RouteSummary};
pub use error::ProviderError;
pub use geocode::{PlaceSuggestion, Viewbox};

use crate::geo::LatLng;

/// Shared handle to the external geocoding/directions providers. Cheap to
/// clone; clones share the underlying reqwest connection pool.
#[derive(Debug, Clone)]
pub struct Providers {
    http: reqwest::Client,
    mapbox_token: Option<String>,
    offline: bool,
}

impl Providers {
    pub fn new(mapbox_token: Option<String>, offline: bool) -> Self {
        Self {
            http: reqwest::Client::new(),
            mapbox_token,
            offline,
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn mapbox_token(&self) -> Option<&str> {
        self.mapbox_token.as_deref()
    }

    pub const fn offline(&self) -> bool {
        self.offline
    }

    /// Resolves free text or a literal "lat,lng" pair to coordinates.
    /// Provider order: literal parse, token-gated geocoder, open fallback.
    /// Any provider failure degrades to `None`.
    pub async fn resolve_coordinate(
        &self,
        text: &str,
        proximity: Option<LatLng>,
        viewbox: Option<Viewbox>,
    ) -> Option<LatLng> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(direct) = crate::geo::parse_lat_lng(text) {
            return Some(direct);
        }
        if self.offline {
            return None;
        }
        if let Some(token) = self.mapbox_token() {
            return geocode::geocode_mapbox(&self.http, text, token, proximity)
                .await
                .ok()
                .flatten();
        }
        geocode::geocode_nominatim(&self.http, text, viewbox)
            .await
            .ok()
            .flatten()
    }

    /// Ranked place suggestions for a partial query, at most 5. Failures
    /// degrade to an empty list.
    pub async fn suggestions(
        &self,
        query: &str,
        proximity: Option<LatLng>,
        viewbox: Option<Viewbox>,
    ) -> Vec<PlaceSuggestion> {
        if self.offline {
            return Vec::new();
        }
        let result = if let Some(token) = self.mapbox_token() {
            geocode::search_places_mapbox(&self.http, query, token, proximity).await
        } else {
            geocode::search_places_nominatim(&self.http, query, viewbox).await
        };
        result.unwrap_or_default()
    }
}
