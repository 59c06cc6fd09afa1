//! Entity scorers driven by configurable weight tables.
//!
//! Each entity type has a table of `(field, weight)` pairs. The base score is
//! `Σ weight × field_score(field)`; context bonuses are added on top and the
//! total is rounded and clamped to `[0, 100]`.
//!
//! Default tables:
//!
//! | Entity     | Fields (weight)                                                   | Bonuses |
//! |------------|-------------------------------------------------------------------|---------|
//! | Expert     | name 55, institution 20, specialties 15, research_interests 15    | condition +15, location +10 |
//! | Trial      | title 60, condition 25, summary 20                                | condition +15, location +10, remote +3 |
//! | Discussion | title 60, body 40                                                 | condition +10 |

use serde::{Deserialize, Serialize};

use crate::candidates::{
    Candidate, Discussion, DiscussionField, Expert, ExpertField, Trial, TrialField,
};
use crate::error::{MatchError, Result};

use super::query::QueryContext;
use super::tokenize::{field_score, tokenize};

/// Highest possible match score.
pub const MAX_SCORE: u8 = 100;

// ============================================================================
// Weight tables
// ============================================================================

/// One row of a weight table: points contributed when the field fully matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWeight<F> {
    pub field: F,
    pub weight: f64,
}

impl<F> FieldWeight<F> {
    pub fn new(field: F, weight: f64) -> Self {
        Self { field, weight }
    }
}

/// Weights and bonuses for experts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpertWeights {
    pub fields: Vec<FieldWeight<ExpertField>>,
    /// Added when a condition token appears in specialties or research interests.
    pub condition_bonus: f64,
    /// Added when a location token appears in the expert's location text.
    pub location_bonus: f64,
}

impl Default for ExpertWeights {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldWeight::new(ExpertField::Name, 55.0),
                FieldWeight::new(ExpertField::Institution, 20.0),
                FieldWeight::new(ExpertField::Specialties, 15.0),
                FieldWeight::new(ExpertField::ResearchInterests, 15.0),
            ],
            condition_bonus: 15.0,
            location_bonus: 10.0,
        }
    }
}

/// Weights and bonuses for trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialWeights {
    pub fields: Vec<FieldWeight<TrialField>>,
    /// Added when the trial condition contains the profile condition.
    pub condition_bonus: f64,
    /// Added when a trial location field contains the profile location.
    pub location_bonus: f64,
    /// Flat bonus for remote-eligible trials.
    pub remote_bonus: f64,
}

impl Default for TrialWeights {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldWeight::new(TrialField::Title, 60.0),
                FieldWeight::new(TrialField::Condition, 25.0),
                FieldWeight::new(TrialField::Summary, 20.0),
            ],
            condition_bonus: 15.0,
            location_bonus: 10.0,
            remote_bonus: 3.0,
        }
    }
}

/// Weights and bonuses for discussions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionWeights {
    pub fields: Vec<FieldWeight<DiscussionField>>,
    /// Added when the title or body contains the profile condition.
    pub condition_bonus: f64,
}

impl Default for DiscussionWeights {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldWeight::new(DiscussionField::Title, 60.0),
                FieldWeight::new(DiscussionField::Body, 40.0),
            ],
            condition_bonus: 10.0,
        }
    }
}

/// All weight tables, as loaded from the `scoring` config section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub expert: ExpertWeights,
    pub trial: TrialWeights,
    pub discussion: DiscussionWeights,
}

impl ScoringConfig {
    /// Reject negative or non-finite weights and bonuses.
    pub fn validate(&self) -> Result<()> {
        let expert = self.expert.fields.iter().map(|w| w.weight);
        let trial = self.trial.fields.iter().map(|w| w.weight);
        let discussion = self.discussion.fields.iter().map(|w| w.weight);
        let bonuses = [
            self.expert.condition_bonus,
            self.expert.location_bonus,
            self.trial.condition_bonus,
            self.trial.location_bonus,
            self.trial.remote_bonus,
            self.discussion.condition_bonus,
        ];

        let invalid = expert
            .chain(trial)
            .chain(discussion)
            .chain(bonuses)
            .find(|v| !v.is_finite() || *v < 0.0);

        match invalid {
            Some(value) => Err(MatchError::Config(format!(
                "scoring weights must be finite and non-negative, got {}",
                value
            ))),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Scorer
// ============================================================================

/// Round and clamp a raw score into `[0, 100]`.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, MAX_SCORE as f64) as u8
}

fn weighted_base<C: Candidate>(
    candidate: &C,
    fields: &[FieldWeight<C::Field>],
    keywords: &[String],
) -> f64 {
    fields
        .iter()
        .map(|row| row.weight * field_score(&candidate.field_text(row.field), keywords))
        .sum()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn any_token_in(text: &str, haystack: &str) -> bool {
    let haystack = haystack.to_lowercase();
    tokenize(text).iter().any(|token| haystack.contains(token.as_str()))
}

/// Scores candidates of every type against a keyword set and query context.
#[derive(Debug, Clone, Default)]
pub struct EntityScorer {
    config: ScoringConfig,
}

impl EntityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score_expert(&self, expert: &Expert, keywords: &[String], ctx: &QueryContext) -> u8 {
        let weights = &self.config.expert;
        let mut score = weighted_base(expert, &weights.fields, keywords);

        if let Some(condition) = ctx.condition() {
            let profile_text = format!(
                "{} {}",
                expert.specialties.join(" "),
                expert.research_interests
            );
            if any_token_in(condition, &profile_text) {
                score += weights.condition_bonus;
            }
        }

        if let Some(location) = ctx.location() {
            let location_text = format!("{} {} {}", expert.location, expert.city, expert.country);
            if any_token_in(location, &location_text) {
                score += weights.location_bonus;
            }
        }

        clamp_score(score)
    }

    pub fn score_trial(&self, trial: &Trial, keywords: &[String], ctx: &QueryContext) -> u8 {
        let weights = &self.config.trial;
        let mut score = weighted_base(trial, &weights.fields, keywords);

        if let Some(condition) = ctx.condition() {
            if contains_ci(&trial.condition, condition) {
                score += weights.condition_bonus;
            }
        }

        if let Some(location) = ctx.location() {
            let fields = [
                trial.location.as_str(),
                trial.city.as_str(),
                trial.country.as_str(),
            ];
            let composite = format!("{}, {}", trial.city, trial.country);
            if fields.iter().any(|f| contains_ci(f, location)) || contains_ci(&composite, location)
            {
                score += weights.location_bonus;
            }
        }

        if trial.is_remote {
            score += weights.remote_bonus;
        }

        clamp_score(score)
    }

    pub fn score_discussion(
        &self,
        discussion: &Discussion,
        keywords: &[String],
        ctx: &QueryContext,
    ) -> u8 {
        let weights = &self.config.discussion;
        let mut score = weighted_base(discussion, &weights.fields, keywords);

        if let Some(condition) = ctx.condition() {
            if contains_ci(&discussion.title, condition) || contains_ci(&discussion.body, condition)
            {
                score += weights.condition_bonus;
            }
        }

        clamp_score(score)
    }
}
