use anyhow::Result as AnyResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod benchmark;
pub mod checklist;
pub mod engine;
pub mod keyword;
pub mod rules;
pub mod scoring;
pub mod signals;

/// Locale used whenever a requested locale has no phrase pack.
pub const DEFAULT_LOCALE: &str = "en";

/// Ordering tiers for recommendations. Variant order is the sort order:
/// `Critical` sorts before `High`, and so on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// Expected payoff of acting on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// Rough implementation cost of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Easy,
    Moderate,
}

/// Qualitative band for keyword density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityBucket {
    Poor,
    NeedsImprovement,
    Good,
}

/// Raw per-item measurements as delivered by a signal provider. Every field
/// is optional: providers are allowed to return partial or entirely empty
/// payloads, and normalization supplies defaults rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSignals {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Text of each primary (h1-level) heading.
    pub primary_headings: Option<Vec<String>>,
    /// Text of each secondary (h2-level) heading.
    pub secondary_headings: Option<Vec<String>>,
    pub tertiary_heading_count: Option<i64>,
    pub image_count: Option<i64>,
    pub images_missing_alt: Option<i64>,
    pub internal_links: Option<i64>,
    pub external_links: Option<i64>,
    pub broken_links: Option<i64>,
    /// Seconds; non-finite or negative values are discarded.
    pub load_time_secs: Option<f64>,
    pub word_count: Option<i64>,
    pub has_canonical: Option<bool>,
    /// Provider-measured technical quality in 0–100.
    pub technical_score: Option<f64>,
    pub category: Option<String>,
    pub url: Option<String>,
    pub body_text: Option<String>,
}

/// Canonical, normalized measurements for one audited item. Built once per
/// audit by [`signals::SignalNormalizer`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub title: String,
    pub description: String,
    pub primary_headings: Vec<String>,
    pub secondary_headings: Vec<String>,
    pub tertiary_heading_count: usize,
    pub image_count: usize,
    pub images_missing_alt: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub broken_links: usize,
    pub load_time_secs: Option<f64>,
    pub word_count: usize,
    pub has_canonical: bool,
    pub technical_score: f64,
    pub category: String,
    pub url: String,
    pub body_text: String,
}

impl Signals {
    /// Character length of the title (what display limits measure).
    pub fn title_len(&self) -> usize {
        self.title.chars().count()
    }

    pub fn description_len(&self) -> usize {
        self.description.chars().count()
    }

    pub fn primary_heading_count(&self) -> usize {
        self.primary_headings.len()
    }

    pub fn secondary_heading_count(&self) -> usize {
        self.secondary_headings.len()
    }

    /// True when the provider delivered nothing worth auditing: no title,
    /// no description, no headings and no body content. The engine
    /// short-circuits this state to a zero score with a single critical
    /// "no data" recommendation.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.primary_headings.is_empty()
            && self.secondary_headings.is_empty()
            && self.tertiary_heading_count == 0
            && self.word_count == 0
            && self.body_text.is_empty()
    }
}

/// One competing item in a benchmark reference set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceItem {
    /// Content size in words. Negative provider values are clamped to 0
    /// during aggregation.
    pub word_count: i64,
    /// Whether the target phrase appears in this reference's title.
    pub phrase_in_title: bool,
    pub category: String,
}

/// Aggregate statistics over a benchmark reference set. Absent entirely
/// (`Option::None`) when no reference set was supplied — a valid
/// "unbenchmarked" state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkStats {
    pub median_size: f64,
    pub mean_size: f64,
    /// Proportion of references with the phrase in their title, in 0–1.
    pub phrase_in_title_rate: f64,
    /// Most frequent category; ties keep the first-seen label.
    pub dominant_category: Option<String>,
    pub sample_size: usize,
}

/// Placement and frequency metrics for the optional target phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    /// The normalized phrase that was searched for.
    pub phrase: String,
    pub in_title: bool,
    pub in_description: bool,
    pub in_primary_heading: bool,
    pub in_secondary_heading: bool,
    pub in_body: bool,
    pub in_url: bool,
    /// Present within the first 100 words of the body.
    pub in_first_words: bool,
    pub occurrences: usize,
    /// Occurrences ÷ content length × 100.
    pub density: f64,
    pub bucket: DensityBucket,
    pub recommended_min: usize,
    pub recommended_max: usize,
}

/// One named sub-score contributing to the weighted total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub name: String,
    /// Sub-score in 0–100.
    pub value: f64,
    /// Share of the total this component carries.
    pub weight: f64,
}

/// Ordered set of component scores produced once per audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ComponentScore>,
}

impl ScoreBreakdown {
    /// Weighted sum of the components, before benchmark caps.
    pub fn weighted_total(&self) -> f64 {
        self.components
            .iter()
            .map(|component| component.value * component.weight)
            .sum()
    }

    pub fn component(&self, name: &str) -> Option<&ComponentScore> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// A prioritized, rendered improvement suggestion. Generated by the rule
/// engine and never mutated; list ordering is imposed at final assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub issue: String,
    pub action: String,
    pub impact: Impact,
    pub effort: Effort,
}

/// The sole output artifact of an audit invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Total score in 0–100, rounded to 2 decimals.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub keyword: Option<KeywordAnalysis>,
    pub recommendations: Vec<Recommendation>,
    pub benchmark: Option<BenchmarkStats>,
}

impl AuditResult {
    /// Assemble a result, clamping and rounding the total score.
    pub fn new(
        score: f64,
        breakdown: ScoreBreakdown,
        keyword: Option<KeywordAnalysis>,
        recommendations: Vec<Recommendation>,
        benchmark: Option<BenchmarkStats>,
    ) -> Self {
        Self {
            score: round2(score.clamp(0.0, 100.0)),
            breakdown,
            keyword,
            recommendations,
            benchmark,
        }
    }

    /// Count of recommendations at or above the given tier.
    pub fn recommendations_at_least(&self, priority: Priority) -> usize {
        self.recommendations
            .iter()
            .filter(|rec| rec.priority <= priority)
            .count()
    }
}

/// Round to 2 decimal places, the precision the API layer reports.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Relative weights of the content-audit components. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub competitiveness: f64,
    pub content_quality: f64,
    pub technical_health: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            competitiveness: 0.45,
            content_quality: 0.35,
            technical_health: 0.20,
        }
    }
}

impl ComponentWeights {
    pub fn sum(&self) -> f64 {
        self.competitiveness + self.content_quality + self.technical_health
    }
}

/// Tunable constants for the scoring heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub weights: ComponentWeights,
    /// Length ratio below which the total is capped hard.
    pub severe_ratio: f64,
    pub severe_cap: f64,
    /// Length ratio below which the total is capped moderately.
    pub moderate_ratio: f64,
    pub moderate_cap: f64,
    /// Load times above this many seconds count against technical health.
    pub slow_load_secs: f64,
    /// Budget for each provider fetch in [`engine::AuditRunner`].
    pub provider_timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            severe_ratio: 0.5,
            severe_cap: 55.0,
            moderate_ratio: 0.7,
            moderate_cap: 70.0,
            slow_load_secs: 5.0,
            provider_timeout_secs: 60,
        }
    }
}

impl AuditConfig {
    /// Validate invariants before an engine is built from this config.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigValidationError::WeightSum { sum });
        }
        for (name, value) in [
            ("severe_ratio", self.severe_ratio),
            ("moderate_ratio", self.moderate_ratio),
            ("severe_cap", self.severe_cap),
            ("moderate_cap", self.moderate_cap),
            ("slow_load_secs", self.slow_load_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigValidationError::NonPositiveThreshold {
                    name: name.to_string(),
                    value,
                });
            }
        }
        if self.severe_ratio >= self.moderate_ratio {
            return Err(ConfigValidationError::CapOrder {
                severe: self.severe_ratio,
                moderate: self.moderate_ratio,
            });
        }
        Ok(())
    }
}

/// Errors emitted while validating an [`AuditConfig`].
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigValidationError {
    #[error("component weights must sum to 1.0 (got {sum})")]
    WeightSum { sum: f64 },
    #[error("threshold `{name}` must be finite and > 0 (got {value})")]
    NonPositiveThreshold { name: String, value: f64 },
    #[error("severe ratio {severe} must be below moderate ratio {moderate}")]
    CapOrder { severe: f64, moderate: f64 },
}

/// Identifies the item one audit invocation is about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTarget {
    pub url: String,
    pub keyword: Option<String>,
    pub locale: String,
}

impl AuditTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            keyword: None,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

/// Fetches raw measurements for one audited item. I/O-bound; invoked by
/// [`engine::AuditRunner`] under a bounded timeout.
#[async_trait]
pub trait SignalProvider: Send + Sync {
    async fn fetch_signals(&self, target: &AuditTarget) -> AnyResult<RawSignals>;
}

/// Fetches the competitive reference set for the same query context. A
/// failed or empty fetch degrades the audit to its unbenchmarked mode
/// instead of failing it.
#[async_trait]
pub trait BenchmarkProvider: Send + Sync {
    async fn fetch_references(&self, target: &AuditTarget) -> AnyResult<Vec<ReferenceItem>>;
}
