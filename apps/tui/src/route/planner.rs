//! Walking-route orchestration. Builds the barrier-aware waypoint path, then
//! walks the provider chain: token-gated directions, open fallback, and
//! finally a local straight-line estimate so planning always produces a
//! result.

use crate::geo::{detour_path, haversine_km, Barrier, LatLng};
use crate::net::{directions, Providers, RouteProvider};

/// Assumed pace for the local estimate when no provider answers.
pub const WALKING_SPEED_KMH: f64 = 4.5;

/// The outcome of planning: a drawable polyline plus headline numbers and
/// which provider produced them.
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    pub points: Vec<LatLng>,
    pub distance_km: f64,
    pub duration_min: i64,
    pub provider: RouteProvider,
}

/// Plans a walking route from `from` to `to`, detouring around the nearest
/// qualifying barrier. Provider failures fall through silently to the next
/// link in the chain; the straight-line estimate cannot fail.
pub async fn plan_route(
    providers: &Providers,
    from: LatLng,
    to: LatLng,
    barriers: &[Barrier],
) -> PlannedRoute {
    let waypoints = detour_path(from, to, barriers);

    if !providers.offline() {
        if let Some(token) = providers.mapbox_token() {
            if let Ok(summary) = directions::mapbox_route(providers.http(), &waypoints, token).await
            {
                return from_summary(summary, RouteProvider::Mapbox);
            }
        }
        if let Ok(summary) = directions::osrm_route(providers.http(), &waypoints).await {
            return from_summary(summary, RouteProvider::Osrm);
        }
    }

    straight_line(waypoints)
}

fn from_summary(summary: directions::RouteSummary, provider: RouteProvider) -> PlannedRoute {
    PlannedRoute {
        points: summary.points,
        distance_km: summary.distance_km,
        duration_min: summary.duration_min,
        provider,
    }
}

/// Local estimate over the waypoint path itself: haversine length at walking
/// pace. Used when both remote providers are unavailable.
#[allow(clippy::cast_possible_truncation)]
fn straight_line(points: Vec<LatLng>) -> PlannedRoute {
    let km: f64 = points
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum();
    PlannedRoute {
        points,
        distance_km: (km * 100.0).round() / 100.0,
        duration_min: (km / WALKING_SPEED_KMH * 60.0).round() as i64,
        provider: RouteProvider::StraightLine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::BarrierSeverity;

    #[tokio::test]
    async fn offline_planning_estimates_a_straight_line() {
        let providers = Providers::new(None, true);
        let from = LatLng::new(-23.5617, -46.6566);
        let to = LatLng::new(-23.5503, -46.6339);
        let route = plan_route(&providers, from, to, &[]).await;

        assert_eq!(route.provider, RouteProvider::StraightLine);
        assert_eq!(route.points, vec![from, to]);
        let km = haversine_km(from, to);
        assert!((route.distance_km - (km * 100.0).round() / 100.0).abs() < 1e-9);
        // 4.5 km/h pace.
        assert_eq!(route.duration_min, (km / 4.5 * 60.0).round() as i64);
    }

    #[tokio::test]
    async fn offline_planning_still_detours_around_barriers() {
        let providers = Providers::new(None, true);
        let from = LatLng::new(0.0, 0.0);
        let to = LatLng::new(0.0, 0.01);
        let barrier = Barrier {
            position: LatLng::new(20.0 / 111_000.0, 0.005),
            severity: BarrierSeverity::Severe,
        };
        let route = plan_route(&providers, from, to, &[barrier]).await;

        assert_eq!(route.points.len(), 4);
        // The detour is longer than the direct line.
        assert!(route.distance_km > haversine_km(from, to));
    }

    #[test]
    fn straight_line_of_identical_points_is_zero() {
        let here = LatLng::new(-23.5, -46.6);
        let route = straight_line(vec![here, here]);
        assert!(route.distance_km.abs() < 1e-9);
        assert_eq!(route.duration_min, 0);
    }
}
