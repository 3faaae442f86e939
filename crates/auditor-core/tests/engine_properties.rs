use std::{collections::BTreeMap, sync::Arc};

use auditor_core::{AuditEngine, DefaultPhrases, RawSignals, ReferenceItem};
use proptest::prelude::*;

fn engine() -> AuditEngine<DefaultPhrases> {
    AuditEngine::new(Arc::new(DefaultPhrases::new()))
}

fn raw_signals_strategy() -> impl Strategy<Value = RawSignals> {
    let text = proptest::option::of("[A-Za-zÀ-ÿ0-9 ]{0,80}");
    let count = proptest::option::of(-50i64..5000);
    let words = proptest::collection::vec("[a-zà-ÿ]{1,10}", 0..300);
    (
        text.clone(),
        text,
        proptest::option::of(proptest::collection::vec("[A-Za-z ]{1,30}", 0..4)),
        count.clone(),
        count.clone(),
        count,
        proptest::option::of(-10.0f64..120.0),
        proptest::option::of(-20.0f64..150.0),
        any::<Option<bool>>(),
        words,
    )
        .prop_map(
            |(
                title,
                description,
                primary_headings,
                broken_links,
                word_count,
                images_missing_alt,
                load_time_secs,
                technical_score,
                has_canonical,
                body_words,
            )| RawSignals {
                title,
                description,
                primary_headings,
                broken_links,
                word_count,
                images_missing_alt,
                load_time_secs,
                technical_score,
                has_canonical,
                body_text: Some(body_words.join(" ")),
                ..RawSignals::default()
            },
        )
}

fn references_strategy() -> impl Strategy<Value = Option<Vec<ReferenceItem>>> {
    proptest::option::of(proptest::collection::vec(
        (-100i64..6000, any::<bool>(), "[a-z ]{0,20}").prop_map(
            |(word_count, phrase_in_title, category)| ReferenceItem {
                word_count,
                phrase_in_title,
                category,
            },
        ),
        0..8,
    ))
}

proptest! {
    #[test]
    fn score_is_always_in_range(
        raw in raw_signals_strategy(),
        refs in references_strategy(),
        keyword in proptest::option::of("[a-z]{1,8}"),
    ) {
        let result = engine().run_audit(&raw, keyword.as_deref(), refs.as_deref(), "en");
        prop_assert!((0.0..=100.0).contains(&result.score));
        for component in &result.breakdown.components {
            prop_assert!((0.0..=100.0).contains(&component.value));
        }
    }

    #[test]
    fn recommendations_are_priority_sorted(
        raw in raw_signals_strategy(),
        refs in references_strategy(),
        keyword in proptest::option::of("[a-z]{1,8}"),
    ) {
        let result = engine().run_audit(&raw, keyword.as_deref(), refs.as_deref(), "en");
        prop_assert!(result
            .recommendations
            .windows(2)
            .all(|pair| pair[0].priority <= pair[1].priority));
    }

    #[test]
    fn audits_are_idempotent(
        raw in raw_signals_strategy(),
        refs in references_strategy(),
        keyword in proptest::option::of("[a-z]{1,8}"),
    ) {
        let eng = engine();
        let first = eng.run_audit(&raw, keyword.as_deref(), refs.as_deref(), "en");
        let second = eng.run_audit(&raw, keyword.as_deref(), refs.as_deref(), "en");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn keyword_invariants_hold(
        raw in raw_signals_strategy(),
        keyword in "[a-zà-ÿ]{1,8}",
    ) {
        let result = engine().run_audit(&raw, Some(&keyword), None, "en");
        if let Some(analysis) = result.keyword {
            prop_assert!(analysis.density >= 0.0);
            // Occurrences are clamped to the content length, so density
            // can never exceed 100%.
            prop_assert!(analysis.density <= 100.0);
            prop_assert!(analysis.recommended_min >= 1);
            prop_assert!(analysis.recommended_max >= analysis.recommended_min);
        }
    }

    #[test]
    fn checklist_score_matches_weight_arithmetic(
        completed in proptest::sample::subsequence(
            vec![
                "name", "address", "phone", "primary_category", "website",
                "hours", "description", "photos", "attributes", "logo",
            ],
            0..=10,
        )
    ) {
        use auditor_core::audit::checklist::{Checklist, ListingProfile};

        let checklist = Checklist::listing();
        let fields: BTreeMap<String, serde_json::Value> = checklist
            .fields()
            .iter()
            .filter(|field| completed.contains(&field.id.as_str()))
            .map(|field| (field.id.clone(), serde_json::json!("value")))
            .collect();
        let earned: u64 = checklist
            .fields()
            .iter()
            .filter(|field| fields.contains_key(&field.id))
            .map(|field| u64::from(field.weight))
            .sum();
        let expected = earned as f64 / checklist.total_weight() as f64 * 100.0;

        let profile = ListingProfile {
            fields,
            rating: None,
            review_count: None,
        };
        let result = engine().run_checklist_audit(&profile, "en");
        prop_assert!((result.score - (expected * 100.0).round() / 100.0).abs() < 1e-9);
    }
}
