//! Rule-based recommendation generation.
//!
//! The content-audit rule set is a fixed, ordered table of predicates over
//! the normalized signals, the keyword analysis and the benchmark stats.
//! Every rule is evaluated on every invocation; firing rules append one
//! recommendation each. The final list is stably sorted by priority tier,
//! so rules of equal priority keep their table order — the ordering is
//! deterministic and reproducible.

use tracing::trace;

use crate::phrases::{PhraseLookup, PhraseVars};

use super::checklist::{ChecklistItem, Criticality, ListingProfile};
use super::scoring::length_ratio;
use super::{
    AuditConfig, BenchmarkStats, Effort, Impact, KeywordAnalysis, Priority, Recommendation,
    Signals,
};

/// Minimum word count below which content counts as near-empty.
const NEAR_EMPTY_WORDS: usize = 100;
/// Minimum word count below which content counts as thin.
const THIN_WORDS: usize = 300;
/// Title display window in characters.
const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
/// Description display window in characters.
const DESCRIPTION_MIN: usize = 120;
const DESCRIPTION_MAX: usize = 160;
/// Ratings below this prompt a reputation recommendation.
const MIN_RATING: f64 = 4.0;
/// Review counts below this prompt a reputation recommendation.
const MIN_REVIEWS: u64 = 10;

/// Everything a content-audit rule predicate may look at.
pub struct RuleContext<'a> {
    pub signals: &'a Signals,
    pub keyword: Option<&'a KeywordAnalysis>,
    pub benchmark: Option<&'a BenchmarkStats>,
    pub config: &'a AuditConfig,
}

type Predicate = fn(&RuleContext) -> bool;
type VarsFn = fn(&RuleContext) -> PhraseVars;

/// One row of the content-audit rule table.
struct RuleDef {
    /// Phrase-pack key prefix; `<key>.issue` and `<key>.action` render the
    /// recommendation text.
    key: &'static str,
    category: &'static str,
    priority: Priority,
    impact: Impact,
    effort: Effort,
    applies: Predicate,
    vars: VarsFn,
}

fn no_vars(_: &RuleContext) -> PhraseVars {
    Vec::new()
}

/// The content-audit rule table, in evaluation order.
const CONTENT_RULES: &[RuleDef] = &[
    RuleDef {
        key: "audit.missing_title",
        category: "structure",
        priority: Priority::Critical,
        impact: Impact::High,
        effort: Effort::Easy,
        applies: |ctx| ctx.signals.title.is_empty(),
        vars: no_vars,
    },
    RuleDef {
        key: "audit.title_too_short",
        category: "structure",
        priority: Priority::High,
        impact: Impact::Medium,
        effort: Effort::Easy,
        applies: |ctx| !ctx.signals.title.is_empty() && ctx.signals.title_len() < TITLE_MIN,
        vars: |ctx| vec![("length", ctx.signals.title_len().to_string())],
    },
    RuleDef {
        key: "audit.title_too_long",
        category: "structure",
        priority: Priority::Medium,
        impact: Impact::Low,
        effort: Effort::Easy,
        applies: |ctx| ctx.signals.title_len() > TITLE_MAX,
        vars: |ctx| vec![("length", ctx.signals.title_len().to_string())],
    },
    RuleDef {
        key: "audit.missing_description",
        category: "structure",
        priority: Priority::Critical,
        impact: Impact::High,
        effort: Effort::Easy,
        applies: |ctx| ctx.signals.description.is_empty(),
        vars: no_vars,
    },
    RuleDef {
        key: "audit.description_too_short",
        category: "structure",
        priority: Priority::High,
        impact: Impact::Medium,
        effort: Effort::Easy,
        applies: |ctx| {
            !ctx.signals.description.is_empty() && ctx.signals.description_len() < DESCRIPTION_MIN
        },
        vars: |ctx| vec![("length", ctx.signals.description_len().to_string())],
    },
    RuleDef {
        key: "audit.description_too_long",
        category: "structure",
        priority: Priority::Medium,
        impact: Impact::Low,
        effort: Effort::Easy,
        applies: |ctx| ctx.signals.description_len() > DESCRIPTION_MAX,
        vars: |ctx| vec![("length", ctx.signals.description_len().to_string())],
    },
    RuleDef {
        key: "audit.missing_primary_heading",
        category: "structure",
        priority: Priority::Critical,
        impact: Impact::High,
        effort: Effort::Easy,
        applies: |ctx| ctx.signals.primary_headings.is_empty(),
        vars: no_vars,
    },
    RuleDef {
        key: "audit.multiple_primary_headings",
        category: "structure",
        priority: Priority::Medium,
        impact: Impact::Low,
        effort: Effort::Easy,
        applies: |ctx| ctx.signals.primary_heading_count() > 1,
        vars: |ctx| vec![("count", ctx.signals.primary_heading_count().to_string())],
    },
    RuleDef {
        key: "audit.broken_links",
        category: "technical",
        priority: Priority::Critical,
        impact: Impact::High,
        effort: Effort::Moderate,
        applies: |ctx| ctx.signals.broken_links > 0,
        vars: |ctx| vec![("count", ctx.signals.broken_links.to_string())],
    },
    RuleDef {
        key: "audit.missing_canonical",
        category: "technical",
        priority: Priority::High,
        impact: Impact::Medium,
        effort: Effort::Easy,
        applies: |ctx| !ctx.signals.has_canonical,
        vars: no_vars,
    },
    RuleDef {
        key: "audit.slow_load",
        category: "technical",
        priority: Priority::High,
        impact: Impact::High,
        effort: Effort::Moderate,
        applies: |ctx| {
            ctx.signals
                .load_time_secs
                .is_some_and(|secs| secs > ctx.config.slow_load_secs)
        },
        vars: |ctx| {
            vec![(
                "secs",
                format!("{:.1}", ctx.signals.load_time_secs.unwrap_or_default()),
            )]
        },
    },
    RuleDef {
        key: "audit.images_missing_alt",
        category: "technical",
        priority: Priority::High,
        impact: Impact::Medium,
        effort: Effort::Easy,
        applies: |ctx| ctx.signals.images_missing_alt > 0,
        vars: |ctx| vec![("count", ctx.signals.images_missing_alt.to_string())],
    },
    RuleDef {
        key: "audit.content_near_empty",
        category: "content",
        priority: Priority::Critical,
        impact: Impact::High,
        effort: Effort::Moderate,
        applies: |ctx| ctx.signals.word_count < NEAR_EMPTY_WORDS,
        vars: |ctx| vec![("words", ctx.signals.word_count.to_string())],
    },
    RuleDef {
        key: "audit.thin_content",
        category: "content",
        priority: Priority::High,
        impact: Impact::High,
        effort: Effort::Moderate,
        applies: |ctx| {
            (NEAR_EMPTY_WORDS..THIN_WORDS).contains(&ctx.signals.word_count)
        },
        vars: |ctx| vec![("words", ctx.signals.word_count.to_string())],
    },
    RuleDef {
        key: "audit.below_benchmark_length",
        category: "content",
        priority: Priority::High,
        impact: Impact::High,
        effort: Effort::Moderate,
        applies: |ctx| {
            length_ratio(ctx.signals, ctx.benchmark).is_some_and(|ratio| ratio < 0.7)
        },
        vars: |ctx| {
            vec![
                ("words", ctx.signals.word_count.to_string()),
                (
                    "median",
                    format!(
                        "{:.0}",
                        ctx.benchmark.map(|b| b.median_size).unwrap_or_default()
                    ),
                ),
            ]
        },
    },
    RuleDef {
        key: "audit.keyword_missing_title",
        category: "keyword",
        priority: Priority::High,
        impact: Impact::High,
        effort: Effort::Easy,
        applies: |ctx| ctx.keyword.is_some_and(|kw| !kw.in_title),
        vars: keyword_vars,
    },
    RuleDef {
        key: "audit.keyword_missing_description",
        category: "keyword",
        priority: Priority::High,
        impact: Impact::Medium,
        effort: Effort::Easy,
        applies: |ctx| ctx.keyword.is_some_and(|kw| !kw.in_description),
        vars: keyword_vars,
    },
    RuleDef {
        key: "audit.keyword_missing_primary_heading",
        category: "keyword",
        priority: Priority::High,
        impact: Impact::Medium,
        effort: Effort::Easy,
        applies: |ctx| ctx.keyword.is_some_and(|kw| !kw.in_primary_heading),
        vars: keyword_vars,
    },
    RuleDef {
        key: "audit.keyword_missing_body",
        category: "keyword",
        priority: Priority::Critical,
        impact: Impact::High,
        effort: Effort::Moderate,
        applies: |ctx| ctx.keyword.is_some_and(|kw| !kw.in_body),
        vars: keyword_vars,
    },
    RuleDef {
        key: "audit.keyword_missing_first_words",
        category: "keyword",
        priority: Priority::High,
        impact: Impact::Medium,
        effort: Effort::Easy,
        applies: |ctx| ctx.keyword.is_some_and(|kw| kw.in_body && !kw.in_first_words),
        vars: keyword_vars,
    },
    RuleDef {
        key: "audit.keyword_missing_url",
        category: "keyword",
        priority: Priority::High,
        impact: Impact::Low,
        effort: Effort::Moderate,
        applies: |ctx| {
            !ctx.signals.url.is_empty() && ctx.keyword.is_some_and(|kw| !kw.in_url)
        },
        vars: keyword_vars,
    },
    RuleDef {
        key: "audit.keyword_density_low",
        category: "keyword",
        priority: Priority::High,
        impact: Impact::Medium,
        effort: Effort::Moderate,
        applies: |ctx| {
            ctx.keyword
                .is_some_and(|kw| kw.in_body && kw.density < 0.5)
        },
        vars: |ctx| {
            let Some(kw) = ctx.keyword else { return Vec::new() };
            vec![
                ("density", format!("{:.2}", kw.density)),
                ("min", kw.recommended_min.to_string()),
                ("max", kw.recommended_max.to_string()),
            ]
        },
    },
    RuleDef {
        key: "audit.keyword_density_high",
        category: "keyword",
        priority: Priority::Medium,
        impact: Impact::Medium,
        effort: Effort::Moderate,
        applies: |ctx| ctx.keyword.is_some_and(|kw| kw.density > 3.0),
        vars: |ctx| {
            let Some(kw) = ctx.keyword else { return Vec::new() };
            vec![
                ("density", format!("{:.2}", kw.density)),
                ("max", kw.recommended_max.to_string()),
            ]
        },
    },
    RuleDef {
        key: "audit.benchmark_overview",
        category: "benchmark",
        priority: Priority::Low,
        impact: Impact::Low,
        effort: Effort::Easy,
        applies: |ctx| ctx.benchmark.is_some(),
        vars: |ctx| {
            let Some(stats) = ctx.benchmark else { return Vec::new() };
            vec![
                ("sample", stats.sample_size.to_string()),
                ("median", format!("{:.0}", stats.median_size)),
            ]
        },
    },
];

fn keyword_vars(ctx: &RuleContext) -> PhraseVars {
    match ctx.keyword {
        Some(kw) => vec![("phrase", kw.phrase.clone())],
        None => Vec::new(),
    }
}

/// Evaluates rule tables and assembles the final, priority-ordered list.
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Run the content-audit rule table. Rules whose phrase keys cannot be
    /// resolved (even through the default-locale fallback) are skipped
    /// rather than rendered broken.
    pub fn content_recommendations(
        ctx: &RuleContext<'_>,
        phrases: &dyn PhraseLookup,
        locale: &str,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        for rule in CONTENT_RULES {
            if !(rule.applies)(ctx) {
                continue;
            }
            trace!(rule = rule.key, "rule fired");
            let vars = (rule.vars)(ctx);
            if let Some((issue, action)) = render(phrases, locale, rule.key, &vars) {
                recommendations.push(Recommendation {
                    priority: rule.priority,
                    category: rule.category.to_string(),
                    issue,
                    action,
                    impact: rule.impact,
                    effort: rule.effort,
                });
            }
        }

        // Terminal informational rule: an audit with a target phrase and no
        // substantive findings should not return an empty-looking list.
        let has_findings = recommendations
            .iter()
            .any(|rec| rec.priority <= Priority::High);
        if !has_findings && ctx.keyword.is_some() {
            if let Some((issue, action)) = render(phrases, locale, "audit.all_good", &[]) {
                recommendations.push(Recommendation {
                    priority: Priority::Low,
                    category: "summary".to_string(),
                    issue,
                    action,
                    impact: Impact::Low,
                    effort: Effort::Easy,
                });
            }
        }

        sort_by_priority(&mut recommendations);
        recommendations
    }

    /// The single critical recommendation for the all-default signal state.
    pub fn no_data(phrases: &dyn PhraseLookup, locale: &str) -> Vec<Recommendation> {
        render(phrases, locale, "audit.no_data", &[])
            .map(|(issue, action)| {
                vec![Recommendation {
                    priority: Priority::Critical,
                    category: "content".to_string(),
                    issue,
                    action,
                    impact: Impact::High,
                    effort: Effort::Moderate,
                }]
            })
            .unwrap_or_default()
    }

    /// Completeness-audit rules: one per incomplete checklist field, with
    /// priority derived from the field's criticality tier, plus the
    /// metric-threshold rules over rating and review count.
    pub fn checklist_recommendations(
        items: &[ChecklistItem],
        profile: &ListingProfile,
        phrases: &dyn PhraseLookup,
        locale: &str,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        for item in items.iter().filter(|item| !item.completed) {
            let vars = vec![("field", item.field.id.clone())];
            if let Some((issue, action)) = render(phrases, locale, &item.field.phrase_key, &vars) {
                recommendations.push(Recommendation {
                    priority: item.field.tier.into(),
                    category: "completeness".to_string(),
                    issue,
                    action,
                    impact: impact_for(item.field.tier),
                    effort: Effort::Easy,
                });
            }
        }

        if let Some(rating) = profile.rating.filter(|r| r.is_finite() && *r < MIN_RATING) {
            let vars = vec![("rating", format!("{rating:.1}"))];
            if let Some((issue, action)) = render(phrases, locale, "checklist.low_rating", &vars) {
                recommendations.push(Recommendation {
                    priority: Priority::High,
                    category: "reputation".to_string(),
                    issue,
                    action,
                    impact: Impact::High,
                    effort: Effort::Moderate,
                });
            }
        }
        if let Some(count) = profile.review_count.filter(|c| *c < MIN_REVIEWS) {
            let vars = vec![("count", count.to_string())];
            if let Some((issue, action)) = render(phrases, locale, "checklist.few_reviews", &vars) {
                recommendations.push(Recommendation {
                    priority: Priority::Medium,
                    category: "reputation".to_string(),
                    issue,
                    action,
                    impact: Impact::Medium,
                    effort: Effort::Moderate,
                });
            }
        }

        sort_by_priority(&mut recommendations);
        recommendations
    }
}

fn impact_for(tier: Criticality) -> Impact {
    match tier {
        Criticality::Critical | Criticality::High => Impact::High,
        Criticality::Medium => Impact::Medium,
        Criticality::Low => Impact::Low,
    }
}

/// Stable sort: equal priorities keep rule-evaluation order.
fn sort_by_priority(recommendations: &mut [Recommendation]) {
    recommendations.sort_by_key(|rec| rec.priority);
}

fn render(
    phrases: &dyn PhraseLookup,
    locale: &str,
    key: &str,
    vars: &[(&'static str, String)],
) -> Option<(String, String)> {
    let issue = phrases.phrase(locale, &format!("{key}.issue"), vars);
    let action = phrases.phrase(locale, &format!("{key}.action"), vars);
    match (issue, action) {
        (Some(issue), Some(action)) => Some((issue, action)),
        _ => {
            trace!(key, "unresolved phrase key, skipping rule");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::signals::SignalNormalizer;
    use crate::audit::{keyword::KeywordAnalyzer, RawSignals};
    use crate::phrases::DefaultPhrases;

    fn healthy_raw() -> RawSignals {
        RawSignals {
            title: Some("Espresso drinks guide for home baristas".into()),
            description: Some(
                "A complete espresso drinks reference covering ratios, machines, \
                 milk texture, tamping pressure and classic recipes for home baristas."
                    .into(),
            ),
            primary_headings: Some(vec!["Espresso drinks".into()]),
            secondary_headings: Some(vec!["A".into(), "B".into(), "C".into(), "D".into()]),
            tertiary_heading_count: Some(3),
            has_canonical: Some(true),
            technical_score: Some(95.0),
            load_time_secs: Some(1.1),
            word_count: Some(2500),
            url: Some("https://example.com/espresso-drinks".into()),
            body_text: Some("espresso drinks ".repeat(40)),
            ..RawSignals::default()
        }
    }

    fn context<'a>(
        signals: &'a crate::audit::Signals,
        keyword: Option<&'a crate::audit::KeywordAnalysis>,
        benchmark: Option<&'a crate::audit::BenchmarkStats>,
        config: &'a AuditConfig,
    ) -> RuleContext<'a> {
        RuleContext {
            signals,
            keyword,
            benchmark,
            config,
        }
    }

    #[test]
    fn healthy_page_with_keyword_gets_only_the_summary_item() {
        let signals = SignalNormalizer::normalize(&healthy_raw());
        let keyword = KeywordAnalyzer::analyze(Some("espresso drinks"), &signals);
        let config = AuditConfig::default();
        let ctx = context(&signals, keyword.as_ref(), None, &config);
        let recs =
            RecommendationEngine::content_recommendations(&ctx, &DefaultPhrases::new(), "en");
        assert_eq!(recs.len(), 1, "unexpected recommendations: {recs:#?}");
        assert_eq!(recs[0].priority, Priority::Low);
        assert_eq!(recs[0].category, "summary");
    }

    #[test]
    fn structural_absences_fire_critical_rules() {
        let signals = SignalNormalizer::normalize(&RawSignals {
            body_text: Some("word ".repeat(500)),
            has_canonical: Some(true),
            ..RawSignals::default()
        });
        let config = AuditConfig::default();
        let ctx = context(&signals, None, None, &config);
        let recs =
            RecommendationEngine::content_recommendations(&ctx, &DefaultPhrases::new(), "en");
        let critical: Vec<_> = recs
            .iter()
            .filter(|rec| rec.priority == Priority::Critical)
            .collect();
        // Missing title, description and primary heading.
        assert_eq!(critical.len(), 3);
        // Sorted output puts all criticals first.
        assert!(recs.windows(2).all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn keyword_rules_fire_per_missing_position() {
        let mut raw = healthy_raw();
        raw.title = Some("A generic long enough page title here".into());
        raw.url = Some("https://example.com/page".into());
        let signals = SignalNormalizer::normalize(&raw);
        let keyword = KeywordAnalyzer::analyze(Some("ristretto"), &signals);
        let config = AuditConfig::default();
        let ctx = context(&signals, keyword.as_ref(), None, &config);
        let recs =
            RecommendationEngine::content_recommendations(&ctx, &DefaultPhrases::new(), "en");
        // Phrase appears nowhere: body absence is the critical one.
        assert!(recs
            .iter()
            .any(|rec| rec.priority == Priority::Critical && rec.category == "keyword"));
        let keyword_rules = recs.iter().filter(|rec| rec.category == "keyword").count();
        // title, description, primary heading, body, url (first-words rule
        // requires the phrase in the body; density-low likewise).
        assert_eq!(keyword_rules, 5);
    }

    #[test]
    fn benchmark_rules_do_not_fire_without_benchmark() {
        let signals = SignalNormalizer::normalize(&healthy_raw());
        let config = AuditConfig::default();
        let ctx = context(&signals, None, None, &config);
        let recs =
            RecommendationEngine::content_recommendations(&ctx, &DefaultPhrases::new(), "en");
        assert!(recs.iter().all(|rec| rec.category != "benchmark"));
    }

    #[test]
    fn benchmark_overview_is_informational() {
        let signals = SignalNormalizer::normalize(&healthy_raw());
        let stats = crate::audit::BenchmarkStats {
            median_size: 1200.0,
            mean_size: 1300.0,
            phrase_in_title_rate: 0.4,
            dominant_category: None,
            sample_size: 8,
        };
        let config = AuditConfig::default();
        let ctx = context(&signals, None, Some(&stats), &config);
        let recs =
            RecommendationEngine::content_recommendations(&ctx, &DefaultPhrases::new(), "en");
        let overview = recs
            .iter()
            .find(|rec| rec.category == "benchmark")
            .expect("overview fires with benchmark present");
        assert_eq!(overview.priority, Priority::Low);
        assert!(overview.issue.contains('8'));
    }

    #[test]
    fn determinism_same_input_same_list() {
        let signals = SignalNormalizer::normalize(&RawSignals {
            title: Some("short".into()),
            body_text: Some("word ".repeat(200)),
            ..RawSignals::default()
        });
        let keyword = KeywordAnalyzer::analyze(Some("espresso"), &signals);
        let config = AuditConfig::default();
        let ctx = context(&signals, keyword.as_ref(), None, &config);
        let phrases = DefaultPhrases::new();
        let first = RecommendationEngine::content_recommendations(&ctx, &phrases, "en");
        let second = RecommendationEngine::content_recommendations(&ctx, &phrases, "en");
        assert_eq!(first, second);
    }

    #[test]
    fn checklist_rules_follow_criticality_tiers() {
        use crate::audit::checklist::Checklist;
        use std::collections::BTreeMap;

        let checklist = Checklist::listing();
        let mut observed = BTreeMap::new();
        observed.insert("name".to_string(), serde_json::json!("Blue Bottle"));
        let items = checklist.evaluate(&observed);
        let profile = ListingProfile {
            fields: observed,
            rating: Some(3.2),
            review_count: Some(4),
        };
        let recs = RecommendationEngine::checklist_recommendations(
            &items,
            &profile,
            &DefaultPhrases::new(),
            "en",
        );
        // 9 incomplete fields + 2 metric rules.
        assert_eq!(recs.len(), 11);
        assert!(recs.windows(2).all(|w| w[0].priority <= w[1].priority));
        // address and phone are the two critical fields left incomplete.
        assert_eq!(recs[0].priority, Priority::Critical);
        assert_eq!(recs[1].priority, Priority::Critical);
        assert!(recs.iter().any(|rec| rec.category == "reputation"
            && rec.priority == Priority::High));
    }

    #[test]
    fn unresolvable_phrase_keys_skip_rules() {
        struct EmptyPhrases;
        impl PhraseLookup for EmptyPhrases {
            fn phrase(&self, _: &str, _: &str, _: &[(&'static str, String)]) -> Option<String> {
                None
            }
        }
        let signals = SignalNormalizer::normalize(&RawSignals::default());
        let config = AuditConfig::default();
        let ctx = context(&signals, None, None, &config);
        let recs = RecommendationEngine::content_recommendations(&ctx, &EmptyPhrases, "en");
        assert!(recs.is_empty());
    }
}
