//! Detour heuristic: offsets a straight origin→destination path around the
//! single nearest reported barrier.
//!
//! Distances use an equirectangular meters-per-degree approximation (111 km
//! per degree of latitude, scaled by cos(lat) for longitude), not true
//! geodesics. Good enough at street scale, which is the only scale barriers
//! are reported at.

use super::coords::LatLng;

const METERS_PER_DEG: f64 = 111_000.0;
const ENTRY_EXIT_AHEAD_M: f64 = 60.0;
const MIN_DETOUR_FRACTION: f64 = 0.02;
const MAX_DETOUR_FRACTION: f64 = 0.25;
const LEN_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierSeverity {
    Moderate,
    Severe,
}

impl BarrierSeverity {
    /// Threshold distance under which a barrier forces a detour.
    pub const fn avoid_m(self) -> f64 {
        match self {
            Self::Moderate => 50.0,
            Self::Severe => 80.0,
        }
    }

    /// Perpendicular offset applied to the detour points.
    pub const fn offset_m(self) -> f64 {
        match self {
            Self::Moderate => 120.0,
            Self::Severe => 160.0,
        }
    }

    /// Boundary convention is strict less-than: a barrier sitting exactly at
    /// its threshold distance does not trigger a detour.
    pub fn qualifies(self, distance_m: f64) -> bool {
        distance_m < self.avoid_m()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Barrier {
    pub position: LatLng,
    pub severity: BarrierSeverity,
}

/// Great-circle distance in kilometers.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

struct Projection {
    dist_m: f64,
    t: f64,
    foot: LatLng,
}

/// Perpendicular distance from `point` to the segment, plus the clamped
/// parametric position of the foot of the perpendicular. Works in degree
/// space with x = lng, y = lat.
fn project_onto_segment(from: LatLng, to: LatLng, point: LatLng) -> Projection {
    let dx = to.lng - from.lng;
    let dy = to.lat - from.lat;
    let len2 = (dx * dx + dy * dy).max(LEN_EPSILON);

    let t = ((point.lng - from.lng) * dx + (point.lat - from.lat) * dy) / len2;
    let t = t.clamp(0.0, 1.0);
    let foot = LatLng::new(from.lat + t * dy, from.lng + t * dx);

    let d_lat = (point.lat - foot.lat) * METERS_PER_DEG;
    let d_lng = (point.lng - foot.lng) * METERS_PER_DEG * point.lat.to_radians().cos();
    Projection {
        dist_m: d_lat.hypot(d_lng),
        t,
        foot,
    }
}

fn segment_length_m(from: LatLng, to: LatLng) -> f64 {
    let mid_lat = (from.lat + to.lat) / 2.0;
    let d_lat = (to.lat - from.lat) * METERS_PER_DEG;
    let d_lng = (to.lng - from.lng) * METERS_PER_DEG * mid_lat.to_radians().cos();
    d_lat.hypot(d_lng).max(1.0)
}

/// Builds the walking path from `from` to `to`, skirting the single nearest
/// barrier whose perpendicular distance is strictly below its severity
/// threshold. Returns the direct 2-point path when no barrier qualifies,
/// otherwise a 4-point path with two detour points inserted just before and
/// after the barrier's projection. Overlapping barriers are not merged; only
/// the nearest one is considered.
pub fn detour_path(from: LatLng, to: LatLng, barriers: &[Barrier]) -> Vec<LatLng> {
    let direct = vec![from, to];

    let mut best: Option<(&Barrier, Projection)> = None;
    for barrier in barriers {
        let projection = project_onto_segment(from, to, barrier.position);
        if !barrier.severity.qualifies(projection.dist_m) {
            continue;
        }
        let closer = best
            .as_ref()
            .is_none_or(|(_, current)| projection.dist_m < current.dist_m);
        if closer {
            best = Some((barrier, projection));
        }
    }
    let Some((barrier, projection)) = best else {
        return direct;
    };

    let dx = to.lng - from.lng;
    let dy = to.lat - from.lat;
    let len = (dx * dx + dy * dy).sqrt().max(LEN_EPSILON);
    // Unit normal in degree space; the offset lands on the barrier's side so
    // the path clears past it instead of cutting between barrier and segment.
    let nx = -dy / len;
    let ny = dx / len;
    let side_sign = (barrier.position.lng - projection.foot.lng) * nx
        + (barrier.position.lat - projection.foot.lat) * ny;
    let side = if side_sign == 0.0 {
        1.0
    } else {
        side_sign.signum()
    };

    let offset_m = barrier.severity.offset_m();
    let det_lat = side * ny * offset_m / METERS_PER_DEG;
    let det_lng =
        side * nx * offset_m / (METERS_PER_DEG * projection.foot.lat.to_radians().cos());

    let fraction = (ENTRY_EXIT_AHEAD_M / segment_length_m(from, to))
        .clamp(MIN_DETOUR_FRACTION, MAX_DETOUR_FRACTION);
    let t1 = (projection.t - fraction).max(0.0);
    let t2 = (projection.t + fraction).min(1.0);

    let entry = LatLng::new(from.lat + t1 * dy + det_lat, from.lng + t1 * dx + det_lng);
    let exit = LatLng::new(from.lat + t2 * dy + det_lat, from.lng + t2 * dx + det_lng);

    vec![from, entry, exit, to]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equator_segment() -> (LatLng, LatLng) {
        // Roughly 1.1 km due east along the equator.
        (LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.01))
    }

    fn barrier_north_of_midpoint(meters: f64, severity: BarrierSeverity) -> Barrier {
        Barrier {
            position: LatLng::new(meters / 111_000.0, 0.005),
            severity,
        }
    }

    #[test]
    fn empty_barrier_set_returns_direct_path() {
        let (from, to) = equator_segment();
        let path = detour_path(from, to, &[]);
        assert_eq!(path, vec![from, to]);
    }

    #[test]
    fn qualifying_barrier_yields_four_points() {
        let (from, to) = equator_segment();
        let barrier = barrier_north_of_midpoint(30.0, BarrierSeverity::Severe);
        let path = detour_path(from, to, &[barrier]);
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], from);
        assert_eq!(path[3], to);
    }

    #[test]
    fn detour_offsets_toward_the_barrier_side() {
        let (from, to) = equator_segment();
        // Barrier north of the segment: both detour points must sit north of
        // it too (offset 160 m > barrier at 30 m).
        let barrier = barrier_north_of_midpoint(30.0, BarrierSeverity::Severe);
        let path = detour_path(from, to, &[barrier]);
        assert!(path[1].lat > barrier.position.lat);
        assert!(path[2].lat > barrier.position.lat);

        // Mirrored barrier south of the segment detours south.
        let south = Barrier {
            position: LatLng::new(-30.0 / 111_000.0, 0.005),
            severity: BarrierSeverity::Severe,
        };
        let path = detour_path(from, to, &[south]);
        assert!(path[1].lat < south.position.lat);
        assert!(path[2].lat < south.position.lat);
    }

    #[test]
    fn offset_magnitude_tracks_severity() {
        let (from, to) = equator_segment();
        let moderate = barrier_north_of_midpoint(30.0, BarrierSeverity::Moderate);
        let severe = barrier_north_of_midpoint(30.0, BarrierSeverity::Severe);
        let moderate_path = detour_path(from, to, &[moderate]);
        let severe_path = detour_path(from, to, &[severe]);
        assert!(severe_path[1].lat > moderate_path[1].lat);
    }

    #[test]
    fn only_the_nearest_qualifying_barrier_is_used() {
        let (from, to) = equator_segment();
        let near = barrier_north_of_midpoint(20.0, BarrierSeverity::Severe);
        let far = Barrier {
            position: LatLng::new(60.0 / 111_000.0, 0.002),
            severity: BarrierSeverity::Severe,
        };
        let path = detour_path(from, to, &[far, near]);
        assert_eq!(path.len(), 4);
        // Detour centered near the closest barrier's projection (t = 0.5).
        let mid_lng = (path[1].lng + path[2].lng) / 2.0;
        assert!((mid_lng - 0.005).abs() < 1e-4);
    }

    #[test]
    fn barrier_outside_threshold_is_ignored() {
        let (from, to) = equator_segment();
        let moderate_past_50 = barrier_north_of_midpoint(55.0, BarrierSeverity::Moderate);
        assert_eq!(detour_path(from, to, &[moderate_past_50]).len(), 2);
        let severe_past_80 = barrier_north_of_midpoint(81.0, BarrierSeverity::Severe);
        assert_eq!(detour_path(from, to, &[severe_past_80]).len(), 2);
        // But a severe barrier inside 80 m still detours.
        let severe_at_79 = barrier_north_of_midpoint(79.0, BarrierSeverity::Severe);
        assert_eq!(detour_path(from, to, &[severe_at_79]).len(), 4);
    }

    #[test]
    fn threshold_boundary_is_strict_less_than() {
        assert!(!BarrierSeverity::Severe.qualifies(80.0));
        assert!(BarrierSeverity::Severe.qualifies(79.999));
        assert!(!BarrierSeverity::Moderate.qualifies(50.0));
        assert!(BarrierSeverity::Moderate.qualifies(49.999));
    }

    #[test]
    fn degenerate_segment_stays_well_formed() {
        let here = LatLng::new(-23.5617, -46.6566);
        let barrier = Barrier {
            position: here,
            severity: BarrierSeverity::Severe,
        };
        let path = detour_path(here, here, &[barrier]);
        assert!(path.len() == 2 || path.len() == 4);
        for point in &path {
            assert!(point.lat.is_finite());
            assert!(point.lng.is_finite());
        }
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Av. Paulista to Praça da Sé is on the order of 3 km.
        let paulista = LatLng::new(-23.561732, -46.656609);
        let se = LatLng::new(-23.5503, -46.6339);
        let km = haversine_km(paulista, se);
        assert!(km > 2.0 && km < 4.0);
        assert!(haversine_km(paulista, paulista).abs() < 1e-9);
    }
}
