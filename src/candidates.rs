//! Candidate records consumed by the matching engine.
//!
//! Three populations are ranked side by side: domain experts, clinical trials
//! and community discussions. Each record type exposes its text fields through
//! [`Candidate`] so the scorer can apply a weight table to it, and its location
//! through [`Locatable`] so the ranker can compute proximity.
//!
//! Records use camelCase on the wire to match the REST backend that serves them.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Coordinates
// ============================================================================

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a point from optional parts. Returns `None` unless both parts are
    /// present and finite.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Self::new(lat, lon))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// A record whose text fields can be scored against a keyword set.
pub trait Candidate {
    /// Field selector used by weight tables.
    type Field: Copy + fmt::Debug;

    /// Text of a single field. List fields are joined with spaces.
    fn field_text(&self, field: Self::Field) -> Cow<'_, str>;
}

/// Location facts the ranker can use. Everything defaults to "unknown".
pub trait Locatable {
    fn coordinates(&self) -> Option<GeoPoint> {
        None
    }

    /// Free-text location fields joined with `", "` (may be empty).
    fn location_text(&self) -> String {
        String::new()
    }

    /// Whether the candidate can be engaged without travelling.
    fn remote_eligible(&self) -> bool {
        false
    }
}

fn join_location(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Expert
// ============================================================================

/// Field selector for [`Expert`] weight tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertField {
    Name,
    Institution,
    Specialties,
    ResearchInterests,
}

/// A domain expert (researcher or clinician).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Expert {
    pub id: String,
    pub name: String,
    pub institution: String,
    pub specialties: Vec<String>,
    pub research_interests: String,
    pub location: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Whether the expert currently accepts meeting requests.
    pub accepts_meetings: bool,
}

impl Candidate for Expert {
    type Field = ExpertField;

    fn field_text(&self, field: ExpertField) -> Cow<'_, str> {
        match field {
            ExpertField::Name => Cow::Borrowed(&self.name),
            ExpertField::Institution => Cow::Borrowed(&self.institution),
            ExpertField::Specialties => Cow::Owned(self.specialties.join(" ")),
            ExpertField::ResearchInterests => Cow::Borrowed(&self.research_interests),
        }
    }
}

impl Locatable for Expert {
    fn coordinates(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }

    fn location_text(&self) -> String {
        join_location(&[&self.location, &self.city, &self.country])
    }
}

// ============================================================================
// Trial
// ============================================================================

/// Field selector for [`Trial`] weight tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialField {
    Title,
    Condition,
    Summary,
}

/// A clinical study open for enrolment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Trial {
    pub id: String,
    pub title: String,
    pub condition: String,
    pub summary: String,
    pub sponsor: String,
    pub location: String,
    pub city: String,
    pub country: String,
    pub is_remote: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Candidate for Trial {
    type Field = TrialField;

    fn field_text(&self, field: TrialField) -> Cow<'_, str> {
        match field {
            TrialField::Title => Cow::Borrowed(&self.title),
            TrialField::Condition => Cow::Borrowed(&self.condition),
            TrialField::Summary => Cow::Borrowed(&self.summary),
        }
    }
}

impl Locatable for Trial {
    fn coordinates(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }

    fn location_text(&self) -> String {
        join_location(&[&self.location, &self.city, &self.country])
    }

    fn remote_eligible(&self) -> bool {
        self.is_remote
    }
}

// ============================================================================
// Discussion
// ============================================================================

/// Field selector for [`Discussion`] weight tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionField {
    Title,
    Body,
}

/// A community forum thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Discussion {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Candidate for Discussion {
    type Field = DiscussionField;

    fn field_text(&self, field: DiscussionField) -> Cow<'_, str> {
        match field {
            DiscussionField::Title => Cow::Borrowed(&self.title),
            DiscussionField::Body => Cow::Borrowed(&self.body),
        }
    }
}

// Discussions carry no location; the ranker treats them as neutral.
impl Locatable for Discussion {}

// ============================================================================
// Scored
// ============================================================================

/// A candidate annotated with its relevance and proximity.
///
/// `location_score` is an internal ranking aid and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scored<T> {
    #[serde(flatten)]
    pub candidate: T,
    /// Relevance in `[0, 100]`.
    pub match_score: u8,
    #[serde(skip)]
    pub location_score: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl<T> Scored<T> {
    /// Wrap a candidate with a relevance score and no proximity data.
    pub fn new(candidate: T, match_score: u8) -> Self {
        Self {
            candidate,
            match_score,
            location_score: 0.0,
            location_label: String::new(),
            distance_km: None,
        }
    }

    /// Seed the location score with a caller-computed bonus (e.g. meeting availability).
    pub fn with_base_bonus(mut self, bonus: f64) -> Self {
        self.location_score = bonus.max(0.0);
        self
    }
}
