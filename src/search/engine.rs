use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::candidates::{Discussion, Expert, Locatable, Scored, Trial};
use crate::config::Config;
use crate::discussions::DiscussionRepository;
use crate::error::{MatchError, Result};
use crate::geo::{sort_by_match_score, LocationContext, LocationRanker};
use crate::matching::{EntityScorer, QueryContext};
use crate::providers::{CandidateProvider, ProviderQuery};

use super::{FailurePolicy, SearchConfig, SearchResponse, SectionErrors};

/// Stateless search orchestrator over two candidate providers.
///
/// The only state is the sequence counter; candidate lists are fetched fresh
/// on every call and never cached.
pub struct SearchEngine {
    experts: Box<dyn CandidateProvider<Expert>>,
    trials: Box<dyn CandidateProvider<Trial>>,
    scorer: EntityScorer,
    ranker: LocationRanker,
    config: SearchConfig,
    sequence: AtomicU64,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("experts", &self.experts.name())
            .field("trials", &self.trials.name())
            .field("config", &self.config)
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish()
    }
}

impl SearchEngine {
    /// Create an engine with default weights, limits and location bonuses.
    pub fn new(
        experts: Box<dyn CandidateProvider<Expert>>,
        trials: Box<dyn CandidateProvider<Trial>>,
    ) -> Self {
        Self {
            experts,
            trials,
            scorer: EntityScorer::default(),
            ranker: LocationRanker::default(),
            config: SearchConfig::default(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Create an engine configured from a loaded [`Config`].
    pub fn from_config(
        experts: Box<dyn CandidateProvider<Expert>>,
        trials: Box<dyn CandidateProvider<Trial>>,
        config: &Config,
    ) -> Self {
        Self::new(experts, trials)
            .with_search_config(config.search.clone())
            .with_scorer(EntityScorer::new(config.scoring.clone()))
            .with_ranker(LocationRanker::new(config.location.clone()))
    }

    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_scorer(mut self, scorer: EntityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_ranker(mut self, ranker: LocationRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Sequence number of the most recent search that reached the providers.
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    /// Search with discussions taken from a repository snapshot.
    pub async fn search_with_repository(
        &self,
        ctx: &QueryContext,
        repository: &dyn DiscussionRepository,
    ) -> Result<SearchResponse> {
        let discussions = repository.list()?;
        self.search(ctx, &discussions).await
    }

    /// Run one search.
    ///
    /// Fails with [`MatchError::Validation`] before any provider call when the
    /// merged query has no keywords.
    pub async fn search(
        &self,
        ctx: &QueryContext,
        discussions: &[Discussion],
    ) -> Result<SearchResponse> {
        let keywords = ctx.keywords()?;
        let sequence = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;
        let query = ProviderQuery::from_context(ctx, self.config.provider_limit);
        let location = LocationContext::from_query(ctx);

        debug!(sequence, query = %query.search, ?keywords, "Starting search");

        let scored_discussions: Vec<Scored<Discussion>> = discussions
            .iter()
            .map(|d| Scored::new(d.clone(), self.scorer.score_discussion(d, &keywords, ctx)))
            .collect();

        let (experts, trials) = tokio::join!(self.experts.fetch(&query), self.trials.fetch(&query));

        let mut errors = SectionErrors::default();
        let (experts, trials) = match self.config.failure_policy {
            FailurePolicy::AllOrNothing => match (experts, trials) {
                (Ok(experts), Ok(trials)) => (experts, trials),
                (experts, trials) => {
                    let message = self.aggregate_error(experts.err(), trials.err());
                    return Err(MatchError::Provider(message));
                }
            },
            FailurePolicy::Partial => {
                let experts = experts.unwrap_or_else(|err| {
                    errors.experts = Some(self.log_failure(self.experts.name(), &err));
                    Vec::new()
                });
                let trials = trials.unwrap_or_else(|err| {
                    errors.trials = Some(self.log_failure(self.trials.name(), &err));
                    Vec::new()
                });
                (experts, trials)
            }
        };

        let meeting_bonus = self.ranker.config().meeting_bonus;
        let scored_experts: Vec<Scored<Expert>> = experts
            .into_iter()
            .map(|e| {
                let score = self.scorer.score_expert(&e, &keywords, ctx);
                let bonus = if e.accepts_meetings { meeting_bonus } else { 0.0 };
                Scored::new(e, score).with_base_bonus(bonus)
            })
            .collect();

        let scored_trials: Vec<Scored<Trial>> = trials
            .into_iter()
            .map(|t| {
                let score = self.scorer.score_trial(&t, &keywords, ctx);
                Scored::new(t, score)
            })
            .collect();

        let response = SearchResponse {
            sequence,
            query: query.search,
            experts: self.finish(scored_experts, &location),
            trials: self.finish(scored_trials, &location),
            discussions: self.finish(scored_discussions, &location),
            keywords,
            errors,
        };

        info!(
            sequence,
            experts = response.experts.len(),
            trials = response.trials.len(),
            discussions = response.discussions.len(),
            "Search complete"
        );

        Ok(response)
    }

    /// Drop noise, order and truncate one result list.
    fn finish<T: Locatable>(
        &self,
        scored: Vec<Scored<T>>,
        location: &LocationContext,
    ) -> Vec<Scored<T>> {
        let mut kept: Vec<Scored<T>> = scored
            .into_iter()
            .filter(|s| s.match_score >= self.config.min_score)
            .collect();
        sort_by_match_score(&mut kept);

        let mut ranked = self.ranker.rank(kept, location);
        ranked.truncate(self.config.max_results);
        ranked
    }

    fn log_failure(&self, provider: &str, err: &MatchError) -> String {
        warn!(provider, error = %err, "Candidate provider failed");
        err.to_string()
    }

    fn aggregate_error(&self, experts: Option<MatchError>, trials: Option<MatchError>) -> String {
        let mut parts = Vec::new();
        if let Some(err) = experts {
            parts.push(format!(
                "{}: {}",
                self.experts.name(),
                self.log_failure(self.experts.name(), &err)
            ));
        }
        if let Some(err) = trials {
            parts.push(format!(
                "{}: {}",
                self.trials.name(),
                self.log_failure(self.trials.name(), &err)
            ));
        }
        parts.join("; ")
    }
}
