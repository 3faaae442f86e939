use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::phrases::PhraseLookup;

use super::benchmark::BenchmarkAggregator;
use super::checklist::{Checklist, ListingProfile};
use super::keyword::KeywordAnalyzer;
use super::rules::{RecommendationEngine, RuleContext};
use super::scoring::{ComponentScorer, ScoreCombiner};
use super::signals::SignalNormalizer;
use super::{
    AuditConfig, AuditResult, AuditTarget, BenchmarkProvider, ComponentScore,
    ConfigValidationError, RawSignals, ReferenceItem, ScoreBreakdown, SignalProvider,
};

/// The pure scoring and recommendation engine. Holds no state across
/// invocations; safe to share behind an `Arc` and call from any number of
/// request handlers concurrently.
pub struct AuditEngine<P: PhraseLookup> {
    phrases: Arc<P>,
    config: AuditConfig,
    checklist: Checklist,
}

impl<P: PhraseLookup> AuditEngine<P> {
    pub fn new(phrases: Arc<P>) -> Self {
        Self {
            phrases,
            config: AuditConfig::default(),
            checklist: Checklist::listing(),
        }
    }

    pub fn with_config(phrases: Arc<P>, config: AuditConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        Ok(Self {
            phrases,
            config,
            checklist: Checklist::listing(),
        })
    }

    /// Replace the built-in listing checklist for the completeness variant.
    pub fn with_checklist(mut self, checklist: Checklist) -> Self {
        self.checklist = checklist;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run the content audit: normalize the raw signals, analyze keyword
    /// placement, aggregate the benchmark, score, and generate the ranked
    /// recommendation list. Never fails on data-quality grounds — partial
    /// or empty inputs degrade to a well-formed low-score result.
    #[instrument(name = "run_audit", skip_all, fields(locale = %locale, has_keyword = keyword.is_some()))]
    pub fn run_audit(
        &self,
        raw: &RawSignals,
        keyword: Option<&str>,
        references: Option<&[ReferenceItem]>,
        locale: &str,
    ) -> AuditResult {
        let signals = SignalNormalizer::normalize(raw);
        if signals.is_empty() {
            debug!("no auditable signals, returning no-data result");
            return self.no_data_result(locale);
        }

        let keyword = KeywordAnalyzer::analyze(keyword, &signals);
        let benchmark = BenchmarkAggregator::aggregate(references);

        let breakdown = ComponentScorer::content_breakdown(
            &signals,
            keyword.as_ref(),
            benchmark.as_ref(),
            &self.config,
        );
        let total =
            ScoreCombiner::combine(&breakdown, &signals, benchmark.as_ref(), &self.config);

        let ctx = RuleContext {
            signals: &signals,
            keyword: keyword.as_ref(),
            benchmark: benchmark.as_ref(),
            config: &self.config,
        };
        let recommendations =
            RecommendationEngine::content_recommendations(&ctx, self.phrases.as_ref(), locale);

        debug!(
            score = total,
            recommendations = recommendations.len(),
            benchmarked = benchmark.is_some(),
            "audit completed"
        );
        AuditResult::new(total, breakdown, keyword, recommendations, benchmark)
    }

    /// Run the completeness audit over a structured profile.
    #[instrument(name = "run_checklist_audit", skip_all, fields(locale = %locale))]
    pub fn run_checklist_audit(&self, profile: &ListingProfile, locale: &str) -> AuditResult {
        let items = self.checklist.evaluate(&profile.fields);
        let breakdown = ComponentScorer::checklist_breakdown(&items);
        let total = breakdown.weighted_total();
        let recommendations = RecommendationEngine::checklist_recommendations(
            &items,
            profile,
            self.phrases.as_ref(),
            locale,
        );
        debug!(
            score = total,
            recommendations = recommendations.len(),
            "checklist audit completed"
        );
        AuditResult::new(total, breakdown, None, recommendations, None)
    }

    fn no_data_result(&self, locale: &str) -> AuditResult {
        let breakdown = ScoreBreakdown {
            components: vec![
                ComponentScore {
                    name: super::scoring::COMPETITIVENESS.to_string(),
                    value: 0.0,
                    weight: self.config.weights.competitiveness,
                },
                ComponentScore {
                    name: super::scoring::CONTENT_QUALITY.to_string(),
                    value: 0.0,
                    weight: self.config.weights.content_quality,
                },
                ComponentScore {
                    name: super::scoring::TECHNICAL_HEALTH.to_string(),
                    value: 0.0,
                    weight: self.config.weights.technical_health,
                },
            ],
        };
        let recommendations = RecommendationEngine::no_data(self.phrases.as_ref(), locale);
        AuditResult::new(0.0, breakdown, None, recommendations, None)
    }
}

/// Orchestrates the I/O-bound collaborators around the pure engine: the
/// signal and benchmark fetches run concurrently, each under a bounded
/// timeout. A failed or slow benchmark fetch degrades the audit to its
/// unbenchmarked mode; a failed signal fetch is an error, since there is
/// nothing left to score.
pub struct AuditRunner<S, B, P: PhraseLookup> {
    signal_provider: Arc<S>,
    benchmark_provider: Option<Arc<B>>,
    engine: AuditEngine<P>,
}

impl<S, B, P> AuditRunner<S, B, P>
where
    S: SignalProvider,
    B: BenchmarkProvider,
    P: PhraseLookup,
{
    pub fn new(
        signal_provider: Arc<S>,
        benchmark_provider: Option<Arc<B>>,
        engine: AuditEngine<P>,
    ) -> Self {
        Self {
            signal_provider,
            benchmark_provider,
            engine,
        }
    }

    #[instrument(name = "audit_target", skip(self), fields(url = %target.url))]
    pub async fn audit(&self, target: &AuditTarget) -> Result<AuditResult> {
        let budget = Duration::from_secs(self.engine.config().provider_timeout_secs);

        let signal_fut = tokio::time::timeout(budget, self.signal_provider.fetch_signals(target));
        let benchmark_fut = async {
            let Some(provider) = &self.benchmark_provider else {
                return None;
            };
            match tokio::time::timeout(budget, provider.fetch_references(target)).await {
                Ok(Ok(references)) => Some(references),
                Ok(Err(err)) => {
                    warn!(error = %format!("{err:#}"), "benchmark fetch failed, auditing without it");
                    None
                }
                Err(_) => {
                    warn!(budget_secs = budget.as_secs(), "benchmark fetch timed out");
                    None
                }
            }
        };

        let (raw, references) = tokio::join!(signal_fut, benchmark_fut);
        let raw = raw
            .context("signal fetch timed out")?
            .context("signal provider failed")?;

        Ok(self.engine.run_audit(
            &raw,
            target.keyword.as_deref(),
            references.as_deref(),
            &target.locale,
        ))
    }
}
