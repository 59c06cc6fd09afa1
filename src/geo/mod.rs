//! Geographic proximity: haversine distance, labels and location-aware ranking.

pub mod distance;
pub mod ranker;

pub use distance::{distance_between, format_distance, haversine_km, EARTH_RADIUS_KM};
pub use ranker::{
    sort_by_match_score, LocationConfig, LocationContext, LocationRanker, REMOTE_LABEL,
};
