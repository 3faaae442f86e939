use std::fmt::Write;

use serde::Serialize;

use crate::audit::{AuditResult, ComponentScore, Priority, Recommendation};

/// Format styles supported in default reporter implementations.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Produce a report string from an `AuditResult` using the desired format.
pub fn render_report(result: &AuditResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => render_human(result),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport::from(result))?),
    }
}

fn render_human(result: &AuditResult) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "Audit Score: {:.2}", result.score)?;
    writeln!(out)?;
    writeln!(out, "Components:")?;
    for component in &result.breakdown.components {
        writeln!(
            out,
            "  - {name:>16}: {value:>6.1} (weight {weight:.2})",
            name = component.name,
            value = component.value,
            weight = component.weight,
        )?;
    }

    if let Some(keyword) = &result.keyword {
        writeln!(out)?;
        writeln!(
            out,
            "Keyword \"{phrase}\": {occurrences} occurrence(s), density {density:.2}% ({bucket:?})",
            phrase = keyword.phrase,
            occurrences = keyword.occurrences,
            density = keyword.density,
            bucket = keyword.bucket,
        )?;
    }

    if let Some(benchmark) = &result.benchmark {
        writeln!(
            out,
            "Benchmark: {sample} reference(s), median {median:.0} words",
            sample = benchmark.sample_size,
            median = benchmark.median_size,
        )?;
    }

    writeln!(out)?;
    if result.recommendations.is_empty() {
        writeln!(out, "No recommendations.")?;
    } else {
        writeln!(out, "Recommendations:")?;
        for rec in &result.recommendations {
            writeln!(
                out,
                "  [{priority}] {category}: {issue}",
                priority = priority_label(rec.priority),
                category = rec.category,
                issue = rec.issue,
            )?;
            writeln!(out, "      -> {}", rec.action)?;
        }
    }

    Ok(out)
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "CRITICAL",
        Priority::High => "HIGH",
        Priority::Medium => "MEDIUM",
        Priority::Low => "LOW",
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    score: f64,
    components: &'a [ComponentScore],
    keyword: Option<&'a crate::audit::KeywordAnalysis>,
    recommendations: &'a [Recommendation],
    benchmark: Option<&'a crate::audit::BenchmarkStats>,
}

impl<'a> From<&'a AuditResult> for JsonReport<'a> {
    fn from(result: &'a AuditResult) -> Self {
        Self {
            score: result.score,
            components: &result.breakdown.components,
            keyword: result.keyword.as_ref(),
            recommendations: &result.recommendations,
            benchmark: result.benchmark.as_ref(),
        }
    }
}
