pub mod coords;
pub mod detour;

pub use coords::{parse_lat_lng, LatLng};
pub use detour::{detour_path, haversine_km, Barrier, BarrierSeverity};
