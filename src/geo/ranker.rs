//! Location-aware ranking.
//!
//! Attaches a proximity score and label to every scored candidate, then
//! orders by `(match_score desc, location_score desc)`. The sort is stable,
//! so candidates equal on both keys keep their input order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidates::{GeoPoint, Locatable, Scored};
use crate::error::{MatchError, Result};
use crate::matching::QueryContext;

use super::distance::{distance_between, format_distance};

/// Label used for remote-eligible candidates with no textual match.
pub const REMOTE_LABEL: &str = "Remote friendly";

/// Proximity scoring knobs (the `location` config section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Added when the profile city appears in the candidate's location text.
    pub city_bonus: f64,
    /// Added when only the profile country appears.
    pub country_bonus: f64,
    /// Added for remote-eligible candidates without a textual match.
    pub remote_bonus: f64,
    /// Distance at which the coordinate score reaches zero.
    pub distance_horizon_km: f64,
    /// Base bonus for experts that accept meeting requests.
    pub meeting_bonus: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city_bonus: 40.0,
            country_bonus: 20.0,
            remote_bonus: 5.0,
            distance_horizon_km: 200.0,
            meeting_bonus: 5.0,
        }
    }
}

impl LocationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.distance_horizon_km.is_finite() && self.distance_horizon_km > 0.0) {
            return Err(MatchError::Config(format!(
                "location.distance_horizon_km must be positive, got {}",
                self.distance_horizon_km
            )));
        }
        let bonuses = [
            self.city_bonus,
            self.country_bonus,
            self.remote_bonus,
            self.meeting_bonus,
        ];
        if bonuses.iter().any(|b| !b.is_finite() || *b < 0.0) {
            return Err(MatchError::Config(
                "location bonuses must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// The searcher's location, as far as it is known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationContext {
    pub city: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<GeoPoint>,
}

impl LocationContext {
    /// Derive a location context from a query context.
    ///
    /// `"Boston, MA, USA"` yields city `Boston` and country `USA`; a single
    /// part is taken as the city only.
    pub fn from_query(ctx: &QueryContext) -> Self {
        let parts: Vec<&str> = ctx
            .location()
            .map(|loc| {
                loc.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let city = parts.first().map(|p| p.to_string());
        let country = if parts.len() >= 2 {
            parts.last().map(|p| p.to_string())
        } else {
            None
        };

        Self {
            city,
            country,
            coordinates: ctx.coordinates,
        }
    }

    /// Whether any location signal is available.
    pub fn has_signal(&self) -> bool {
        self.city.is_some() || self.country.is_some() || self.coordinates.is_some()
    }
}

/// Stable sort by match score, highest first.
pub fn sort_by_match_score<T>(items: &mut [Scored<T>]) {
    items.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}

fn compare_ranked<T>(a: &Scored<T>, b: &Scored<T>) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then_with(|| b.location_score.total_cmp(&a.location_score))
}

/// Annotates and orders scored candidates by proximity.
#[derive(Debug, Clone, Default)]
pub struct LocationRanker {
    config: LocationConfig,
}

impl LocationRanker {
    pub fn new(config: LocationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocationConfig {
        &self.config
    }

    /// Fill in `location_score`, `location_label` and `distance_km`.
    ///
    /// Any score already present (a caller-computed base bonus) is kept and
    /// added to.
    pub fn annotate<T: Locatable>(&self, item: &mut Scored<T>, ctx: &LocationContext) {
        let distance = distance_between(item.candidate.coordinates(), ctx.coordinates);

        if let Some(km) = distance {
            item.location_score += (self.config.distance_horizon_km - km).max(0.0);
            item.location_label = format_distance(Some(km));
            item.distance_km = Some(km);
            return;
        }

        let text = item.candidate.location_text().to_lowercase();
        let city_hit = ctx
            .city
            .as_deref()
            .filter(|city| text.contains(&city.to_lowercase()));
        let country_hit = ctx
            .country
            .as_deref()
            .filter(|country| text.contains(&country.to_lowercase()));

        if let Some(city) = city_hit {
            item.location_score += self.config.city_bonus;
            item.location_label = format!("Near {}", city);
        } else if let Some(country) = country_hit {
            item.location_score += self.config.country_bonus;
            item.location_label = format!("In {}", country);
        } else if item.candidate.remote_eligible() {
            item.location_score += self.config.remote_bonus;
            item.location_label = REMOTE_LABEL.to_string();
        }
    }

    /// Annotate every item and sort by `(match_score, location_score)`.
    ///
    /// Without any location signal the input is returned untouched.
    pub fn rank<T: Locatable>(
        &self,
        mut items: Vec<Scored<T>>,
        ctx: &LocationContext,
    ) -> Vec<Scored<T>> {
        if !ctx.has_signal() {
            return items;
        }

        for item in items.iter_mut() {
            self.annotate(item, ctx);
        }
        items.sort_by(compare_ranked);

        debug!(
            count = items.len(),
            with_distance = items.iter().filter(|i| i.distance_km.is_some()).count(),
            "Ranked candidates by location"
        );

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::{Discussion, Expert, Trial};

    fn trial(id: &str, score: u8) -> Scored<Trial> {
        Scored::new(
            Trial {
                id: id.into(),
                ..Default::default()
            },
            score,
        )
    }

    fn ids(items: &[Scored<Trial>]) -> Vec<&str> {
        items.iter().map(|i| i.candidate.id.as_str()).collect()
    }

    fn boston() -> LocationContext {
        LocationContext {
            city: Some("Boston".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_context_from_query() {
        let ctx = QueryContext::new("x").with_location("Boston, MA, USA");
        let loc = LocationContext::from_query(&ctx);
        assert_eq!(loc.city.as_deref(), Some("Boston"));
        assert_eq!(loc.country.as_deref(), Some("USA"));

        let single = LocationContext::from_query(&QueryContext::new("x").with_location("Boston"));
        assert_eq!(single.city.as_deref(), Some("Boston"));
        assert!(single.country.is_none());

        assert!(!LocationContext::from_query(&QueryContext::new("x")).has_signal());
    }

    #[test]
    fn test_city_match_label() {
        let mut item = Scored::new(
            Trial {
                city: "Boston".into(),
                country: "USA".into(),
                ..Default::default()
            },
            50,
        );
        LocationRanker::default().annotate(&mut item, &boston());
        assert_eq!(item.location_label, "Near Boston");
        assert_eq!(item.location_score, 40.0);
        assert!(item.distance_km.is_none());
    }

    #[test]
    fn test_country_and_remote_fallbacks() {
        let ranker = LocationRanker::default();
        let ctx = LocationContext {
            city: Some("Lyon".into()),
            country: Some("France".into()),
            coordinates: None,
        };

        let mut in_country = Scored::new(
            Trial {
                location: "Paris, France".into(),
                is_remote: true,
                ..Default::default()
            },
            10,
        );
        ranker.annotate(&mut in_country, &ctx);
        assert_eq!(in_country.location_label, "In France");
        assert_eq!(in_country.location_score, 20.0);

        let mut remote = Scored::new(
            Trial {
                city: "Berlin".into(),
                is_remote: true,
                ..Default::default()
            },
            10,
        );
        ranker.annotate(&mut remote, &ctx);
        assert_eq!(remote.location_label, REMOTE_LABEL);
        assert_eq!(remote.location_score, 5.0);
    }

    #[test]
    fn test_coordinates_take_precedence() {
        let ctx = LocationContext {
            city: Some("Boston".into()),
            country: None,
            coordinates: Some(GeoPoint::new(42.3601, -71.0589)),
        };
        let mut item = Scored::new(
            Expert {
                city: "Boston".into(),
                latitude: Some(42.3601),
                longitude: Some(-71.0589),
                ..Default::default()
            },
            70,
        )
        .with_base_bonus(5.0);
        LocationRanker::default().annotate(&mut item, &ctx);
        assert_eq!(item.distance_km, Some(0.0));
        assert_eq!(item.location_label, "0 m away");
        assert_eq!(item.location_score, 205.0);
    }

    #[test]
    fn test_far_candidates_floor_at_base_bonus() {
        let ctx = LocationContext {
            coordinates: Some(GeoPoint::new(42.3601, -71.0589)),
            ..Default::default()
        };
        let mut item = Scored::new(
            Trial {
                latitude: Some(48.8566),
                longitude: Some(2.3522),
                ..Default::default()
            },
            70,
        );
        LocationRanker::default().annotate(&mut item, &ctx);
        assert_eq!(item.location_score, 0.0);
        assert!(item.location_label.ends_with(" km away"));
    }

    #[test]
    fn test_closer_wins_on_equal_match_score() {
        let origin = GeoPoint::new(0.0, 0.0);
        let ctx = LocationContext {
            coordinates: Some(origin),
            ..Default::default()
        };
        // ~1 degree of longitude at the equator is ~111 km.
        let far = Scored::new(
            Trial {
                id: "y".into(),
                latitude: Some(0.0),
                longitude: Some(50.0 / 111.195),
                ..Default::default()
            },
            50,
        );
        let near = Scored::new(
            Trial {
                id: "x".into(),
                latitude: Some(0.0),
                longitude: Some(5.0 / 111.195),
                ..Default::default()
            },
            50,
        );

        let ranked = LocationRanker::default().rank(vec![far, near], &ctx);
        assert_eq!(ids(&ranked), vec!["x", "y"]);
        assert!((ranked[0].distance_km.unwrap() - 5.0).abs() < 0.01);
        assert_eq!(ranked[0].location_label, "5.0 km away");
    }

    #[test]
    fn test_match_score_dominates_location() {
        let ranked = LocationRanker::default().rank(
            vec![
                Scored::new(
                    Trial {
                        id: "near".into(),
                        city: "Boston".into(),
                        ..Default::default()
                    },
                    40,
                ),
                trial("relevant", 90),
            ],
            &boston(),
        );
        assert_eq!(ids(&ranked), vec!["relevant", "near"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let input = vec![trial("a", 50), trial("b", 60), trial("c", 50), trial("d", 50)];
        let ranked = LocationRanker::default().rank(input, &boston());
        assert_eq!(ids(&ranked), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_no_signal_is_passthrough() {
        let input = vec![trial("low", 10), trial("high", 90)];
        let ranked = LocationRanker::default().rank(input.clone(), &LocationContext::default());
        assert_eq!(ranked, input);
        assert!(ranked.iter().all(|i| i.location_label.is_empty()));
    }

    #[test]
    fn test_discussions_are_neutral() {
        let input = vec![
            Scored::new(Discussion::default(), 20),
            Scored::new(Discussion::default(), 80),
        ];
        let ranked = LocationRanker::default().rank(input, &boston());
        assert_eq!(ranked[0].match_score, 80);
        assert!(ranked.iter().all(|i| i.location_score == 0.0));
    }

    #[test]
    fn test_sort_by_match_score_is_stable() {
        let mut items = vec![trial("a", 5), trial("b", 9), trial("c", 5)];
        sort_by_match_score(&mut items);
        assert_eq!(ids(&items), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_validate_horizon() {
        let config = LocationConfig {
            distance_horizon_km: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MatchError::Config(_))));
        assert!(LocationConfig::default().validate().is_ok());
    }
}
