use tracing::trace;

use super::{RawSignals, Signals};

/// Converts provider payloads into canonical [`Signals`].
///
/// Normalization never fails: missing fields become explicit defaults
/// (empty string, zero count, `None` timing), negative counts clamp to 0
/// and non-finite numerics are discarded. An entirely absent payload
/// yields an all-default record that downstream stages treat as the
/// "no data" state.
pub struct SignalNormalizer;

impl SignalNormalizer {
    pub fn normalize(raw: &RawSignals) -> Signals {
        let title = clean_text(raw.title.as_deref());
        let description = clean_text(raw.description.as_deref());
        let body_text = raw.body_text.clone().unwrap_or_default();

        let word_count = match raw.word_count {
            Some(count) if count > 0 => count as usize,
            // Providers that skip the count still usually deliver the body.
            _ => body_text.split_whitespace().count(),
        };

        let signals = Signals {
            title,
            description,
            primary_headings: clean_headings(raw.primary_headings.as_deref()),
            secondary_headings: clean_headings(raw.secondary_headings.as_deref()),
            tertiary_heading_count: clamp_count(raw.tertiary_heading_count),
            image_count: clamp_count(raw.image_count),
            images_missing_alt: clamp_count(raw.images_missing_alt),
            internal_links: clamp_count(raw.internal_links),
            external_links: clamp_count(raw.external_links),
            broken_links: clamp_count(raw.broken_links),
            load_time_secs: clamp_timing(raw.load_time_secs),
            word_count,
            has_canonical: raw.has_canonical.unwrap_or(false),
            technical_score: clamp_score(raw.technical_score),
            category: clean_text(raw.category.as_deref()),
            url: clean_text(raw.url.as_deref()),
            body_text,
        };
        trace!(
            words = signals.word_count,
            empty = signals.is_empty(),
            "normalized raw signals"
        );
        signals
    }
}

fn clean_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn clean_headings(values: Option<&[String]>) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .map(|heading| heading.trim().to_string())
        .filter(|heading| !heading.is_empty())
        .collect()
}

fn clamp_count(value: Option<i64>) -> usize {
    value.unwrap_or(0).max(0) as usize
}

fn clamp_timing(value: Option<f64>) -> Option<f64> {
    value.filter(|secs| secs.is_finite() && *secs >= 0.0)
}

fn clamp_score(value: Option<f64>) -> f64 {
    value
        .filter(|score| score.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_payload_yields_all_defaults() {
        let signals = SignalNormalizer::normalize(&RawSignals::default());
        assert_eq!(signals.title, "");
        assert_eq!(signals.description, "");
        assert!(signals.primary_headings.is_empty());
        assert_eq!(signals.word_count, 0);
        assert_eq!(signals.load_time_secs, None);
        assert_eq!(signals.technical_score, 0.0);
        assert!(!signals.has_canonical);
        assert!(signals.is_empty());
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        let raw = RawSignals {
            broken_links: Some(-4),
            image_count: Some(-1),
            word_count: Some(-250),
            ..RawSignals::default()
        };
        let signals = SignalNormalizer::normalize(&raw);
        assert_eq!(signals.broken_links, 0);
        assert_eq!(signals.image_count, 0);
        assert_eq!(signals.word_count, 0);
    }

    #[test]
    fn non_finite_timing_is_discarded() {
        let raw = RawSignals {
            load_time_secs: Some(f64::NAN),
            ..RawSignals::default()
        };
        assert_eq!(SignalNormalizer::normalize(&raw).load_time_secs, None);

        let raw = RawSignals {
            load_time_secs: Some(-2.0),
            ..RawSignals::default()
        };
        assert_eq!(SignalNormalizer::normalize(&raw).load_time_secs, None);

        let raw = RawSignals {
            load_time_secs: Some(1.8),
            ..RawSignals::default()
        };
        assert_eq!(SignalNormalizer::normalize(&raw).load_time_secs, Some(1.8));
    }

    #[test]
    fn word_count_falls_back_to_body_text() {
        let raw = RawSignals {
            body_text: Some("five little words right here".into()),
            ..RawSignals::default()
        };
        assert_eq!(SignalNormalizer::normalize(&raw).word_count, 5);
    }

    #[test]
    fn technical_score_clamps_into_range() {
        let raw = RawSignals {
            technical_score: Some(130.0),
            ..RawSignals::default()
        };
        assert_eq!(SignalNormalizer::normalize(&raw).technical_score, 100.0);

        let raw = RawSignals {
            technical_score: Some(-10.0),
            ..RawSignals::default()
        };
        assert_eq!(SignalNormalizer::normalize(&raw).technical_score, 0.0);
    }

    #[test]
    fn blank_headings_are_dropped() {
        let raw = RawSignals {
            secondary_headings: Some(vec!["  ".into(), "Opening hours".into()]),
            ..RawSignals::default()
        };
        let signals = SignalNormalizer::normalize(&raw);
        assert_eq!(signals.secondary_headings, vec!["Opening hours".to_string()]);
    }
}
