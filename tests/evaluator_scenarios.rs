mod common;

use aml_checker::models::{flags, AccountSummary, ReputationReport, TransferRecord};
use aml_checker::utils::unix_now_ms;
use aml_checker::{EngineConfig, SharedEvaluationCache, Source, Status, VerdictRecord, VerdictStore};
use common::{harness, harness_with, Evidence};
use std::time::Duration;

const DAY_MS: i64 = 86_400_000;

/// Evidence that scores 0.4 on its own (warning)
fn risky_evidence() -> Evidence {
    Evidence {
        summary: AccountSummary {
            total_transaction_count: 6000,
            balance: 2_000_000_000.0,
            create_time_ms: None,
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_high_volume_only_is_safe() {
    let h = harness();
    h.gateway.set("TX", Evidence::with_tx_count(6000));

    let verdict = h.evaluator.check("TX", false).await;

    assert_eq!(verdict.score, 0.2);
    assert_eq!(verdict.status, Status::Safe);
    assert_eq!(verdict.flags, vec![flags::HIGH_TX_VOLUME.to_string()]);
    assert_eq!(verdict.source, Source::Auto);
    assert!(verdict.checked_at.is_some());

    let stored = h.store.get("tron", "TX").unwrap().unwrap();
    assert_eq!(stored, verdict);
}

#[tokio::test]
async fn test_locally_blocked_skips_all_io() {
    let h = harness();
    h.evaluator.blocklist().add_address("TY");
    h.gateway.set("TY", Evidence::with_tx_count(6000));

    let verdict = h.evaluator.check("TY", false).await;

    assert_eq!(verdict.status, Status::Blocked);
    assert_eq!(verdict.score, 1.0);
    assert_eq!(verdict.flags, vec![flags::BLOCKED_LOCALLY.to_string()]);
    assert_eq!(h.gateway.total_calls(), 0);
    assert!(h.store.get("tron", "TY").unwrap().is_none());
}

#[tokio::test]
async fn test_combined_signals_reach_warning() {
    let h = harness();
    h.gateway.set(
        "TZ",
        Evidence {
            summary: AccountSummary {
                total_transaction_count: 6000,
                balance: 2_000_000_000.0,
                create_time_ms: Some(unix_now_ms() - 2 * DAY_MS),
            },
            ..Default::default()
        },
    );

    let verdict = h.evaluator.check("TZ", false).await;

    assert_eq!(verdict.score, 0.55);
    assert_eq!(verdict.status, Status::Warning);
    assert_eq!(
        verdict.flags,
        vec![
            flags::HIGH_TX_VOLUME.to_string(),
            flags::LARGE_BALANCE.to_string(),
            flags::TX_BURST_ACTIVITY.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_score_capped_and_blocked() {
    let h = harness();
    let dust: Vec<_> = (0..25).map(|i| TransferRecord::new(format!("D{}", i), 10)).collect();
    h.gateway.set(
        "TFull",
        Evidence {
            summary: AccountSummary {
                total_transaction_count: 6000,
                balance: 2_000_000_000.0,
                create_time_ms: Some(unix_now_ms() - DAY_MS / 4),
            },
            transfers: dust,
            reports: vec![ReputationReport::new("Scam", chrono::Utc::now().to_rfc3339())],
            ..Default::default()
        },
    );

    let verdict = h.evaluator.check("TFull", false).await;

    assert_eq!(verdict.score, 1.0);
    assert_eq!(verdict.status, Status::Blocked);
    assert!(verdict.has_flag(flags::REPUTATION_REPORTED));
    assert!(verdict.has_flag(flags::DUST_ACTIVITY));
    assert!(verdict.has_flag(flags::MANY_UNIQUE_SENDERS));
}

#[tokio::test]
async fn test_fetch_failure_returns_error_and_is_not_cached() {
    let h = harness();
    h.gateway.set(
        "TW",
        Evidence {
            fail: true,
            ..Default::default()
        },
    );

    let verdict = h.evaluator.check("TW", false).await;

    assert_eq!(verdict.status, Status::Error);
    assert_eq!(verdict.score, 1.0);
    assert_eq!(verdict.source, Source::Error);
    assert_eq!(verdict.flags[0], flags::CHECK_ERROR);
    assert_eq!(verdict.flags.len(), 2);
    assert!(h.store.get("tron", "TW").unwrap().is_none());

    // Upstream recovers: the next call evaluates for real
    h.gateway.set("TW", Evidence::with_tx_count(1));
    let retry = h.evaluator.check("TW", false).await;
    assert_eq!(retry.status, Status::Safe);
    assert!(h.store.get("tron", "TW").unwrap().is_some());
}

#[tokio::test]
async fn test_fetch_timeout_becomes_error_verdict() {
    let h = harness_with(EngineConfig {
        fetch_timeout_ms: 20,
        ..EngineConfig::default()
    });
    h.gateway.set(
        "TSlow",
        Evidence {
            delay: Some(Duration::from_millis(500)),
            ..Default::default()
        },
    );

    let verdict = h.evaluator.check("TSlow", false).await;

    assert_eq!(verdict.status, Status::Error);
    assert_eq!(verdict.flags[0], flags::CHECK_ERROR);
    assert!(verdict.flags[1].contains("timed out"), "detail: {}", verdict.flags[1]);
    assert!(h.store.get("tron", "TSlow").unwrap().is_none());
}

#[tokio::test]
async fn test_fresh_cache_hit_is_returned_verbatim() {
    let h = harness();
    h.gateway.set("TX", Evidence::with_tx_count(6000));

    let first = h.evaluator.check("TX", false).await;
    let calls = h.gateway.total_calls();

    h.gateway.set("TX", risky_evidence());
    let second = h.evaluator.check("TX", false).await;

    assert_eq!(second, first);
    assert_eq!(h.gateway.total_calls(), calls);

    let refreshed = h.evaluator.check("TX", true).await;
    assert_eq!(refreshed.status, Status::Warning);
    assert!(h.gateway.total_calls() > calls);
    assert_eq!(h.store.get("tron", "TX").unwrap().unwrap().status, Status::Warning);
}

#[tokio::test]
async fn test_stale_record_is_reevaluated() {
    let h = harness();
    let old = VerdictRecord::auto(Status::Blocked, 0.9, vec!["stale".into()], 1_000);
    h.store.put("tron", "TOld", old).unwrap();
    h.gateway.set("TOld", Evidence::with_tx_count(1));

    let verdict = h.evaluator.check("TOld", false).await;

    assert_eq!(verdict.status, Status::Safe);
    assert_eq!(h.gateway.fetches_for("TOld"), 1);
}

#[tokio::test]
async fn test_malformed_record_is_a_miss() {
    let h = harness();
    h.store.put_raw("tron", "TBad", "{{{").unwrap();
    h.gateway.set("TBad", Evidence::with_tx_count(6000));

    let verdict = h.evaluator.check("TBad", false).await;

    assert_eq!(verdict.score, 0.2);
    assert_eq!(h.gateway.fetches_for("TBad"), 1);
}

#[tokio::test]
async fn test_reevaluation_is_idempotent() {
    let h = harness();
    h.gateway.set("TZ", risky_evidence());

    let first = h.evaluator.check("TZ", true).await;
    let second = h.evaluator.check("TZ", true).await;

    assert!(first.same_assessment(&second));
}

#[tokio::test]
async fn test_manual_block_served_from_store() {
    let h = harness();
    h.gateway.set("TM", Evidence::with_tx_count(1));
    h.evaluator.check("TM", false).await;

    let blocked = h.evaluator.mark_manual_block("TM").unwrap();
    let calls = h.gateway.total_calls();
    let verdict = h.evaluator.check("TM", false).await;

    assert_eq!(verdict, blocked);
    assert_eq!(verdict.source, Source::Manual);
    assert!(verdict.has_flag(flags::MANUAL_BLOCK));
    assert_eq!(h.gateway.total_calls(), calls);
}

#[tokio::test]
async fn test_cycle_terminates_and_visits_each_once() {
    let h = harness();
    h.gateway.set("TA", Evidence::funded_by(&["TB"]));
    h.gateway.set("TB", Evidence::funded_by(&["TA"]));

    let mut cache = SharedEvaluationCache::new();
    let verdict = h.evaluator.evaluate("TA", false, &mut cache, 0).await;

    assert_eq!(verdict.status, Status::Safe);
    assert!(!verdict.has_flag(flags::SENDERS_WITH_RISK));

    assert_eq!(cache.len(), 2);
    assert!(cache.resolved("TA").is_some());
    assert!(cache.resolved("TB").is_some());
    assert_eq!(h.gateway.fetches_for("TA"), 1);
    assert_eq!(h.gateway.fetches_for("TB"), 1);
}

#[tokio::test]
async fn test_risky_senders_raise_flag() {
    let h = harness();
    h.gateway.set("TT", Evidence::funded_by(&["TR1", "TR2", "TClean"]));
    h.gateway.set("TR1", risky_evidence());
    h.gateway.set("TR2", risky_evidence());

    let verdict = h.evaluator.check("TT", false).await;

    assert_eq!(verdict.flags, vec![flags::SENDERS_WITH_RISK.to_string()]);
    assert_eq!(verdict.score, 0.25);
    assert_eq!(verdict.status, Status::Safe);

    // Senders were persisted by their own evaluations
    assert_eq!(h.store.get("tron", "TR1").unwrap().unwrap().status, Status::Warning);
    assert_eq!(h.store.get("tron", "TClean").unwrap().unwrap().status, Status::Safe);
}

#[tokio::test]
async fn test_locally_blocked_senders_count_as_risky() {
    let h = harness();
    h.evaluator.blocklist().add_address("TEvil1");
    h.evaluator.blocklist().add_address("TEvil2");
    h.gateway.set("TT", Evidence::funded_by(&["TEvil1", "TEvil2"]));

    let verdict = h.evaluator.check("TT", false).await;

    assert!(verdict.has_flag(flags::SENDERS_WITH_RISK));
    assert_eq!(h.gateway.fetches_for("TEvil1"), 0);
}

#[tokio::test]
async fn test_stored_sender_verdicts_are_reused() {
    let h = harness();
    h.store
        .put("tron", "TKnown", VerdictRecord::auto(Status::Blocked, 0.8, vec!["x".into()], aml_checker::utils::unix_now()))
        .unwrap();
    h.gateway.set("TT", Evidence::funded_by(&["TKnown", "TR1"]));
    h.gateway.set("TR1", risky_evidence());

    let verdict = h.evaluator.check("TT", false).await;

    assert!(verdict.has_flag(flags::SENDERS_WITH_RISK));
    assert_eq!(h.gateway.fetches_for("TKnown"), 0);
}

#[tokio::test]
async fn test_recursion_depth_is_bounded() {
    let h = harness();
    h.gateway.set("TT", Evidence::funded_by(&["TS1"]));
    h.gateway.set("TS1", Evidence::funded_by(&["TS2"]));
    h.gateway.set("TS2", Evidence::funded_by(&["TS3"]));
    h.gateway.set("TS3", Evidence::funded_by(&["TS4"]));

    let mut cache = SharedEvaluationCache::new();
    h.evaluator.evaluate("TT", false, &mut cache, 0).await;

    assert_eq!(h.gateway.fetches_for("TS1"), 1);
    assert_eq!(h.gateway.fetches_for("TS2"), 1);
    assert_eq!(h.gateway.fetches_for("TS3"), 0);
    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn test_shared_sender_evaluated_once_per_tree() {
    let h = harness();
    h.gateway.set("TT", Evidence::funded_by(&["TA", "TB"]));
    h.gateway.set("TA", Evidence::funded_by(&["TC"]));
    h.gateway.set("TB", Evidence::funded_by(&["TC"]));

    let mut cache = SharedEvaluationCache::new();
    h.evaluator.evaluate("TT", true, &mut cache, 0).await;

    assert_eq!(h.gateway.fetches_for("TC"), 1);
    assert_eq!(cache.len(), 4);
}

#[tokio::test]
async fn test_failing_sender_is_not_counted() {
    let h = harness();
    h.gateway.set("TT", Evidence::funded_by(&["TDown", "TR1"]));
    h.gateway.set(
        "TDown",
        Evidence {
            fail: true,
            ..Default::default()
        },
    );
    h.gateway.set("TR1", risky_evidence());

    let mut cache = SharedEvaluationCache::new();
    let verdict = h.evaluator.evaluate("TT", false, &mut cache, 0).await;

    assert!(!verdict.has_flag(flags::SENDERS_WITH_RISK));
    assert_eq!(cache.resolved("TDown").map(|r| r.status), Some(Status::Error));
    assert!(h.store.get("tron", "TDown").unwrap().is_none());
    assert!(h.store.get("tron", "TT").unwrap().is_some());
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut config = EngineConfig::default();
    config.heuristics.dust_activity.weight = 0.0;

    let gateway = std::sync::Arc::new(common::FakeGateway::new());
    let store = std::sync::Arc::new(aml_checker::SqliteVerdictStore::open_in_memory().unwrap());

    assert!(aml_checker::Evaluator::new(config, store, gateway).is_err());
}

#[tokio::test]
async fn test_reputation_lookup_uses_configured_network() {
    let h = harness_with(EngineConfig::for_network("eth"));
    h.gateway.set("0xabc", Evidence::funded_by(&["0xdef"]));
    assert_eq!(h.evaluator.network(), "eth");

    let verdict = h.evaluator.check("0xabc", false).await;

    assert_eq!(verdict.status, Status::Safe);
    assert_eq!(h.gateway.report_networks(), vec!["eth".to_string(), "eth".to_string()]);
    assert!(h.store.get("eth", "0xabc").unwrap().is_some());
    assert!(h.store.get("tron", "0xabc").unwrap().is_none());
}

#[tokio::test]
async fn test_oversized_report_window_is_rejected() {
    let mut config = EngineConfig::default();
    config.heuristics.reputation_reported.max_age_days = 100_000_000;

    let gateway = std::sync::Arc::new(common::FakeGateway::new());
    let store = std::sync::Arc::new(aml_checker::SqliteVerdictStore::open_in_memory().unwrap());

    let err = aml_checker::Evaluator::new(config, store, gateway).err().unwrap();
    assert!(matches!(err, aml_checker::AmlError::Config(_)));
}
