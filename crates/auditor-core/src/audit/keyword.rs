use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::{DensityBucket, KeywordAnalysis, Signals};

/// Window (in words) for the "early placement" check.
const FIRST_WORDS_WINDOW: usize = 100;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Computes where and how often the target phrase appears across the
/// normalized signals.
///
/// Both the phrase and every searched field are normalized (lowercased,
/// diacritics folded, whitespace collapsed) before matching, so casing or
/// accents never produce false negatives.
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    /// Returns `None` when no phrase was supplied — a valid state, not an
    /// error; keyword-dependent scoring then falls back to its defaults.
    pub fn analyze(phrase: Option<&str>, signals: &Signals) -> Option<KeywordAnalysis> {
        let phrase = normalize_text(phrase?);
        if phrase.is_empty() {
            return None;
        }

        let title = normalize_text(&signals.title);
        let description = normalize_text(&signals.description);
        let body = normalize_text(&signals.body_text);
        let url = normalize_text(&signals.url);

        let occurrences = count_occurrences(&phrase, &body).min(signals.word_count);
        let density = occurrences as f64 / signals.word_count.max(1) as f64 * 100.0;

        let first_words: String = body
            .split(' ')
            .take(FIRST_WORDS_WINDOW)
            .collect::<Vec<_>>()
            .join(" ");

        let analysis = KeywordAnalysis {
            in_title: title.contains(&phrase),
            in_description: description.contains(&phrase),
            in_primary_heading: signals
                .primary_headings
                .iter()
                .any(|heading| normalize_text(heading).contains(&phrase)),
            in_secondary_heading: signals
                .secondary_headings
                .iter()
                .any(|heading| normalize_text(heading).contains(&phrase)),
            in_body: occurrences > 0,
            in_url: url_contains(&url, &phrase),
            in_first_words: first_words.contains(&phrase),
            occurrences,
            density,
            bucket: density_bucket(density),
            recommended_min: recommended_min(signals.word_count),
            recommended_max: recommended_max(signals.word_count),
            phrase,
        };
        trace!(
            occurrences = analysis.occurrences,
            density = analysis.density,
            "keyword analysis complete"
        );
        Some(analysis)
    }
}

/// Lowercase, fold diacritics and collapse runs of whitespace.
pub fn normalize_text(text: &str) -> String {
    let lowered: String = text.to_lowercase().chars().map(fold_diacritic).collect();
    WHITESPACE.replace_all(lowered.trim(), " ").into_owned()
}

fn count_occurrences(phrase: &str, body: &str) -> usize {
    if body.is_empty() {
        return 0;
    }
    // Single-pattern automaton; find_iter yields non-overlapping matches.
    match AhoCorasick::new([phrase]) {
        Ok(automaton) => automaton.find_iter(body).count(),
        Err(_) => 0,
    }
}

/// URLs carry the phrase as a slug, so accept it hyphenated or concatenated.
fn url_contains(url: &str, phrase: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    let hyphenated = phrase.replace(' ', "-");
    let concatenated = phrase.replace(' ', "");
    url.contains(&hyphenated) || url.contains(&concatenated)
}

fn density_bucket(density: f64) -> DensityBucket {
    if density < 0.5 {
        DensityBucket::Poor
    } else if density < 1.0 {
        DensityBucket::NeedsImprovement
    } else if density <= 2.0 {
        DensityBucket::Good
    } else if density <= 3.0 {
        DensityBucket::NeedsImprovement
    } else {
        // Past 3% reads as stuffing.
        DensityBucket::Poor
    }
}

fn recommended_min(word_count: usize) -> usize {
    ((word_count as f64 * 0.01).round() as usize).max(1)
}

fn recommended_max(word_count: usize) -> usize {
    ((word_count as f64 * 0.02).round() as usize).max(recommended_min(word_count))
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'ñ' | 'ń' => 'n',
        'ç' | 'ć' | 'č' => 'c',
        'š' | 'ś' => 's',
        'ž' | 'ź' | 'ż' => 'z',
        'ł' => 'l',
        'đ' => 'd',
        'ğ' => 'g',
        'ț' | 'ţ' => 't',
        'ş' => 's',
        _ => ch,
    }
}
