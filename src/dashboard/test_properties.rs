//! Property-based tests for dashboard invariants.
//!
//! Arbitrary message sequences must keep the reducer state consistent, keep
//! at most one live chart per canvas, and never let a no-data page show
//! anything but the no-entries message.

use proptest::prelude::*;

use super::controller::{DashboardController, no_entries_message};
use super::model::{DashboardMsg, DashboardState, Tab};
use super::update;
use crate::core::config::Config;
use crate::host::{HeadlessPage, PageLayout};
use crate::logger::MemoryLog;
use crate::report::aggregate::build_dream_view_model;
use crate::report::classify::{ColorRule, DEFAULT_EMOTION_COLOR, EmotionClassifier};
use crate::report::payload::{Period, ReportInput, ReportPayload};
use crate::report::series::CategorySeries;

// ──────────────────── strategies ────────────────────

fn arb_period() -> impl Strategy<Value = Period> {
    (1990i32..2040, 1u32..=12).prop_map(|(year, month)| Period { year, month })
}

fn arb_msg() -> impl Strategy<Value = DashboardMsg> {
    prop_oneof![
        prop_oneof![Just(Tab::Dream), Just(Tab::Emotion)].prop_map(DashboardMsg::SelectTab),
        Just(DashboardMsg::ToggleDropdown),
        Just(DashboardMsg::ClickOutside),
        Just(DashboardMsg::PreviousMonth),
        Just(DashboardMsg::NextMonth),
        Just(DashboardMsg::ConfirmNavigation),
        arb_period().prop_map(DashboardMsg::SelectPeriod),
        (1990i32..2040, 0u32..=14).prop_map(|(year, month)| DashboardMsg::Navigate { year, month }),
        (100.0f64..1200.0).prop_map(|width| DashboardMsg::Resize { width }),
        (1u32..30).prop_map(|attempt| DashboardMsg::CloudRetry { attempt }),
    ]
}

fn arb_dream_entries() -> impl Strategy<Value = Vec<(String, f64)>> {
    prop::collection::vec(
        (
            prop_oneof![
                Just("good".to_string()),
                Just("bad".to_string()),
                Just("normal".to_string()),
                "[a-z]{1,6}",
            ],
            0u32..100,
        ),
        0..8,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, count)| (key, f64::from(count)))
            .collect()
    })
}

fn arb_payload(has_data: bool) -> impl Strategy<Value = ReportPayload> {
    (
        arb_period(),
        arb_dream_entries(),
        prop::collection::vec(("[가-힣]{1,4}", 0u32..20), 0..6),
        prop::collection::vec(("[가-힣]{1,4}", 0u32..50), 0..10),
    )
        .prop_map(move |(period, dream, emotions, keywords)| ReportPayload {
            has_data,
            period,
            dream_labels: dream.iter().map(|(k, _)| k.clone()).collect(),
            dream_data: dream.iter().map(|(_, c)| *c).collect(),
            emotion_labels: emotions.iter().map(|(l, _)| l.clone()).collect(),
            emotion_icons: emotions.iter().map(|_| "🙂".to_string()).collect(),
            emotion_data: emotions.iter().map(|(_, c)| f64::from(*c)).collect(),
            keywords: keywords
                .into_iter()
                .map(|(text, weight)| {
                    crate::report::payload::KeywordEntry::Pair(text, f64::from(weight))
                })
                .collect(),
        })
}

fn controller_for(payload: ReportPayload) -> DashboardController<HeadlessPage> {
    let input = ReportInput::from_payload(payload).expect("generated payloads are well formed");
    DashboardController::new(
        input,
        HeadlessPage::new(&PageLayout::default()),
        &Config::default(),
        MemoryLog::default(),
    )
    .with_cloud_seed(11)
}

// ──────────────────── properties ────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The reducer never changes the displayed period or the data flag, and
    /// only an open dropdown can move the pending period.
    #[test]
    fn reducer_preserves_invariants(
        start in arb_period(),
        has_data in any::<bool>(),
        msgs in prop::collection::vec(arb_msg(), 1..50)
    ) {
        let mut state = DashboardState::new(has_data, start);
        for msg in msgs {
            let was_open = state.dropdown_open;
            let pending_before = state.pending_period;
            let _ = update::update(&mut state, msg.clone());
            prop_assert_eq!(state.period, start);
            prop_assert_eq!(state.has_data, has_data);
            if !was_open && !matches!(msg, DashboardMsg::ToggleDropdown | DashboardMsg::Navigate { .. }) {
                prop_assert_eq!(state.pending_period, pending_before);
            }
            prop_assert!((1..=12).contains(&state.pending_period.month));
        }
    }

    /// Dream view models always list good, bad, normal in that order.
    #[test]
    fn dream_order_is_canonical(entries in arb_dream_entries()) {
        let series: CategorySeries = entries.iter().cloned().collect();
        let vm = build_dream_view_model(&series);
        if vm.is_placeholder() {
            prop_assert!(series.iter().all(|(k, _)| !matches!(k, "good" | "bad" | "normal")));
        } else {
            prop_assert_eq!(vm.labels.clone(), vec!["길몽", "흉몽", "일반몽"]);
            for (idx, key) in ["good", "bad", "normal"].iter().enumerate() {
                let expected = series.count_of(key).unwrap_or(0.0);
                prop_assert!((vm.values[idx] - expected).abs() < f64::EPSILON);
            }
        }
    }

    /// First declared matching rule decides the color.
    #[test]
    fn classification_is_first_match(
        patterns in prop::collection::vec("[ab]{1,3}", 1..6),
        label in "[ab]{0,6}"
    ) {
        let rules: Vec<ColorRule> = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| ColorRule::new(p.clone(), format!("#{i:06}")))
            .collect();
        let classifier = EmotionClassifier::with_rules(rules, DEFAULT_EMOTION_COLOR);
        let expected = patterns
            .iter()
            .position(|p| label.contains(p.as_str()))
            .map_or_else(|| DEFAULT_EMOTION_COLOR.to_string(), |i| format!("#{i:06}"));
        prop_assert_eq!(classifier.color_for(&label), expected.as_str());
    }

    /// No sequence of events leaves two live charts on one canvas.
    #[test]
    fn at_most_one_chart_per_canvas(
        payload in arb_payload(true),
        msgs in prop::collection::vec(arb_msg(), 1..40)
    ) {
        let mut c = controller_for(payload);
        c.start();
        for msg in msgs {
            c.update(msg);
            prop_assert!(c.host().live_charts("typeChart") <= 1);
            prop_assert!(c.host().live_charts("emotionChart") <= 1);
        }
    }

    /// Without data, every tab shows the no-entries message and placeholders.
    #[test]
    fn no_data_always_shows_placeholders(
        payload in arb_payload(false),
        msgs in prop::collection::vec(arb_msg(), 0..30)
    ) {
        let period = payload.period;
        let mut c = controller_for(payload);
        c.start();
        for msg in msgs {
            c.update(msg);
        }
        for tab in Tab::ALL {
            c.select_tab(tab);
            let expected = no_entries_message(period);
            prop_assert_eq!(c.host().text("summaryText"), Some(expected.as_str()));
            let canvas = match tab {
                Tab::Dream => "typeChart",
                Tab::Emotion => "emotionChart",
            };
            let spec = c.host().chart_spec(canvas).expect("placeholder chart");
            prop_assert_eq!(spec.labels.clone(), vec!["no data".to_string()]);
            prop_assert!(!spec.interactive);
        }
        prop_assert!(c.host().cloud_words("wordCloud").is_empty());
    }
}
