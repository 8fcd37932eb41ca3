use std::sync::OnceLock;

use regex::Regex;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

fn lat_lng_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$")
            .expect("hardcoded pattern")
    })
}

/// Parses a literal "lat,lng" pair. Only fixed-point decimal notation is
/// accepted; anything else yields `None`.
pub fn parse_lat_lng(query: &str) -> Option<LatLng> {
    let captures = lat_lng_regex().captures(query.trim())?;
    let lat: f64 = captures.get(1)?.as_str().parse().ok()?;
    let lng: f64 = captures.get(2)?.as_str().parse().ok()?;
    if lat.is_finite() && lng.is_finite() {
        Some(LatLng::new(lat, lng))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_pair() {
        assert_eq!(parse_lat_lng("23.5,-46.6"), Some(LatLng::new(23.5, -46.6)));
    }

    #[test]
    fn parses_with_whitespace_and_integers() {
        assert_eq!(
            parse_lat_lng("  -23 , -46.656609 "),
            Some(LatLng::new(-23.0, -46.656609))
        );
    }

    #[test]
    fn rejects_non_coordinates() {
        assert_eq!(parse_lat_lng("abc"), None);
        assert_eq!(parse_lat_lng("23.5"), None);
        assert_eq!(parse_lat_lng("23.5,-46.6,1"), None);
        assert_eq!(parse_lat_lng("1e3,2"), None);
        assert_eq!(parse_lat_lng(""), None);
    }
}
