//! Component scoring and score combination for both audit variants.
//!
//! The content-audit variant produces three weighted components
//! (competitiveness, content quality, technical health); the completeness
//! variant produces a single weighted-boolean component. All sub-scores
//! live in 0–100 and the combined total is capped relative to the
//! benchmark before clamping.

use tracing::debug;

use super::checklist::ChecklistItem;
use super::{
    AuditConfig, BenchmarkStats, ComponentScore, KeywordAnalysis, ScoreBreakdown, Signals,
};

pub const COMPETITIVENESS: &str = "competitiveness";
pub const CONTENT_QUALITY: &str = "content_quality";
pub const TECHNICAL_HEALTH: &str = "technical_health";
pub const COMPLETENESS: &str = "completeness";

/// Computes the independent sub-scores for one audit.
pub struct ComponentScorer;

impl ComponentScorer {
    pub fn content_breakdown(
        signals: &Signals,
        keyword: Option<&KeywordAnalysis>,
        benchmark: Option<&BenchmarkStats>,
        config: &AuditConfig,
    ) -> ScoreBreakdown {
        let breakdown = ScoreBreakdown {
            components: vec![
                ComponentScore {
                    name: COMPETITIVENESS.to_string(),
                    value: competitiveness(signals, keyword, benchmark),
                    weight: config.weights.competitiveness,
                },
                ComponentScore {
                    name: CONTENT_QUALITY.to_string(),
                    value: content_quality(signals, keyword),
                    weight: config.weights.content_quality,
                },
                ComponentScore {
                    name: TECHNICAL_HEALTH.to_string(),
                    value: technical_health(signals, config),
                    weight: config.weights.technical_health,
                },
            ],
        };
        debug!(
            competitiveness = breakdown.components[0].value,
            content_quality = breakdown.components[1].value,
            technical_health = breakdown.components[2].value,
            "computed content component scores"
        );
        breakdown
    }

    /// Completeness variant: earned weight over total weight. No benchmark
    /// dependency.
    pub fn checklist_breakdown(items: &[ChecklistItem]) -> ScoreBreakdown {
        let total: u64 = items.iter().map(|item| u64::from(item.field.weight)).sum();
        let earned: u64 = items
            .iter()
            .filter(|item| item.completed)
            .map(|item| u64::from(item.field.weight))
            .sum();
        let value = if total == 0 {
            0.0
        } else {
            earned as f64 / total as f64 * 100.0
        };
        ScoreBreakdown {
            components: vec![ComponentScore {
                name: COMPLETENESS.to_string(),
                value,
                weight: 1.0,
            }],
        }
    }
}

/// Weighted-sums the component scores and applies benchmark-relative caps.
pub struct ScoreCombiner;

impl ScoreCombiner {
    pub fn combine(
        breakdown: &ScoreBreakdown,
        signals: &Signals,
        benchmark: Option<&BenchmarkStats>,
        config: &AuditConfig,
    ) -> f64 {
        let mut total = breakdown.weighted_total();

        // Content dramatically thinner than the competitive field cannot
        // score well no matter how clean it is otherwise.
        if let Some(ratio) = length_ratio(signals, benchmark) {
            if ratio < config.severe_ratio {
                total = total.min(config.severe_cap);
            } else if ratio < config.moderate_ratio {
                total = total.min(config.moderate_cap);
            }
        }
        total.clamp(0.0, 100.0)
    }
}

/// Content length relative to the benchmark median; `None` without a
/// usable benchmark.
pub fn length_ratio(signals: &Signals, benchmark: Option<&BenchmarkStats>) -> Option<f64> {
    let median = benchmark?.median_size;
    if median <= 0.0 {
        return None;
    }
    Some(signals.word_count as f64 / median)
}

fn competitiveness(
    signals: &Signals,
    keyword: Option<&KeywordAnalysis>,
    benchmark: Option<&BenchmarkStats>,
) -> f64 {
    let length = match length_ratio(signals, benchmark) {
        Some(ratio) => length_vs_benchmark(ratio),
        // Unbenchmarked audits fall back to the absolute tiers.
        None => absolute_length_score(signals.word_count),
    };
    let placement = competitive_placement(keyword, benchmark);
    let headings = heading_structure(signals);
    let category = category_alignment(signals, benchmark);

    length * 0.50 + placement * 0.25 + headings * 0.15 + category * 0.10
}

/// Length-vs-median ratio mapped onto 0–100: parity or better is perfect,
/// 0.7–1.0 ramps 60→100, below 0.7 scales 10→60.
fn length_vs_benchmark(ratio: f64) -> f64 {
    if ratio >= 1.0 {
        100.0
    } else if ratio >= 0.7 {
        60.0 + (ratio - 0.7) / 0.3 * 40.0
    } else {
        10.0 + ratio / 0.7 * 50.0
    }
}

/// Title placement scored against what the competitive field does: when at
/// least 70% of references carry the phrase in their title, missing it is
/// punished much harder. Heading and early-body placement add on top.
fn competitive_placement(
    keyword: Option<&KeywordAnalysis>,
    benchmark: Option<&BenchmarkStats>,
) -> f64 {
    let Some(keyword) = keyword else {
        return 50.0;
    };
    let title_expected = benchmark
        .map(|stats| stats.phrase_in_title_rate >= 0.7)
        .unwrap_or(false);
    let mut score: f64 = match (keyword.in_title, title_expected) {
        (true, _) => 100.0,
        (false, true) => 25.0,
        (false, false) => 60.0,
    };
    if keyword.in_primary_heading {
        score += 10.0;
    }
    if keyword.in_first_words {
        score += 10.0;
    }
    score.min(100.0)
}

fn heading_structure(signals: &Signals) -> f64 {
    let secondary = signals.secondary_heading_count();
    let tertiary = signals.tertiary_heading_count;
    if secondary >= 4 && tertiary >= 2 {
        100.0
    } else if secondary >= 2 {
        70.0
    } else if secondary >= 1 || tertiary >= 1 {
        50.0
    } else {
        20.0
    }
}

fn category_alignment(signals: &Signals, benchmark: Option<&BenchmarkStats>) -> f64 {
    let Some(dominant) = benchmark.and_then(|stats| stats.dominant_category.as_deref()) else {
        return 70.0;
    };
    let own = crate::audit::keyword::normalize_text(&signals.category);
    if !own.is_empty() && own == crate::audit::keyword::normalize_text(dominant) {
        100.0
    } else {
        60.0
    }
}

fn content_quality(signals: &Signals, keyword: Option<&KeywordAnalysis>) -> f64 {
    absolute_length_score(signals.word_count) * 0.40
        + heading_richness(signals) * 0.30
        + placement_points(keyword) * 0.30
}

fn absolute_length_score(word_count: usize) -> f64 {
    if word_count >= 2000 {
        95.0
    } else if word_count >= 1500 {
        85.0
    } else if word_count >= 800 {
        70.0
    } else if word_count >= 400 {
        50.0
    } else {
        30.0
    }
}

fn heading_richness(signals: &Signals) -> f64 {
    let secondary = signals.secondary_heading_count();
    if secondary >= 6 {
        95.0
    } else if secondary >= 3 {
        80.0
    } else if secondary >= 1 {
        60.0
    } else {
        30.0
    }
}

/// Additive placement points: title 30, primary heading 25, body 20,
/// description 15, first 100 words 10; capped at 100. Audits without a
/// phrase score the neutral default.
fn placement_points(keyword: Option<&KeywordAnalysis>) -> f64 {
    let Some(keyword) = keyword else {
        return 50.0;
    };
    let mut points: f64 = 0.0;
    if keyword.in_title {
        points += 30.0;
    }
    if keyword.in_primary_heading {
        points += 25.0;
    }
    if keyword.in_description {
        points += 15.0;
    }
    if keyword.in_body {
        points += 20.0;
    }
    if keyword.in_first_words {
        points += 10.0;
    }
    points.min(100.0)
}

fn technical_health(signals: &Signals, config: &AuditConfig) -> f64 {
    let mut score = signals.technical_score;
    if signals.broken_links > 0 {
        score -= 15.0;
    }
    if !signals.has_canonical {
        score -= 10.0;
    }
    if signals
        .load_time_secs
        .is_some_and(|secs| secs > config.slow_load_secs)
    {
        score -= 10.0;
    }
    score.clamp(0.0, 100.0)
}
