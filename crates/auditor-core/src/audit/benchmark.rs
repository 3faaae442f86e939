use tracing::trace;

use super::{BenchmarkStats, ReferenceItem};
use crate::audit::keyword::normalize_text;

/// Reduces a competitive reference set into summary statistics.
pub struct BenchmarkAggregator;

impl BenchmarkAggregator {
    /// Empty or absent input yields `None` — the "no benchmark available"
    /// state. Callers skip benchmark-relative scoring and rules in that
    /// case; a fabricated default would silently distort scores.
    pub fn aggregate(references: Option<&[ReferenceItem]>) -> Option<BenchmarkStats> {
        let references = references?;
        if references.is_empty() {
            return None;
        }

        let mut sizes: Vec<u64> = references
            .iter()
            .map(|item| item.word_count.max(0) as u64)
            .collect();
        sizes.sort_unstable();

        let median_size = median(&sizes);
        let mean_size = sizes.iter().sum::<u64>() as f64 / sizes.len() as f64;
        let matches = references.iter().filter(|item| item.phrase_in_title).count();
        let phrase_in_title_rate = matches as f64 / references.len() as f64;

        let stats = BenchmarkStats {
            median_size,
            mean_size,
            phrase_in_title_rate,
            dominant_category: dominant_category(references),
            sample_size: references.len(),
        };
        trace!(
            sample = stats.sample_size,
            median = stats.median_size,
            "aggregated benchmark references"
        );
        Some(stats)
    }
}

/// Sorted-list midpoint; even-length lists average the two middle elements.
fn median(sorted: &[u64]) -> f64 {
    let len = sorted.len();
    if len % 2 == 1 {
        sorted[len / 2] as f64
    } else {
        (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
    }
}

/// Most frequent category label; ties keep the first-seen label. Labels
/// are compared after normalization so casing differences collapse.
fn dominant_category(references: &[ReferenceItem]) -> Option<String> {
    let mut counts: Vec<(String, String, usize)> = Vec::new();
    for item in references {
        let normalized = normalize_text(&item.category);
        if normalized.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(key, _, _)| *key == normalized) {
            Some((_, _, count)) => *count += 1,
            None => counts.push((normalized, item.category.trim().to_string(), 1)),
        }
    }
    counts
        .into_iter()
        // max_by_key takes the last maximum; compare with first-seen kept.
        .fold(None::<(String, usize)>, |best, (_, label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label)
}
