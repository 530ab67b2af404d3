//! Bank parsing, persistence, caching and background refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tutor_model::{ModelError, QuestionBank};
use tutor_source::{
    BankSource, CacheUpdate, QuestionCache, Refresher, SourceError, load_bank, parse_bank,
    save_bank,
};

fn legacy_level(multiplicand: u32) -> String {
    let records: Vec<String> = (0..10)
        .map(|i| {
            let m = multiplicand + i;
            format!(
                r#"{{"question": "{m} x 12", "number_0": "{m}", "number_1": "12", "operator": "x"}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn service_reply() -> String {
    format!(
        r#"{{"public": {{"multiplication_1": {}, "multiplication_2": {}}}}}"#,
        legacy_level(100),
        legacy_level(200)
    )
}

#[test]
fn parses_the_service_reply() {
    let bank = parse_bank(&service_reply()).unwrap();
    assert_eq!(bank.level_count(), 2);
    assert_eq!(bank.level(0).unwrap()[0].multiplicand, 100);
    assert_eq!(bank.level(1).unwrap()[9].multiplicand, 209);
}

#[test]
fn parses_a_bare_level_map() {
    let text = format!(r#"{{"level_0": {}}}"#, legacy_level(7));
    let bank = parse_bank(&text).unwrap();
    assert_eq!(bank.max_level(), Some(0));
}

#[test]
fn rejects_unusable_documents() {
    assert!(matches!(
        parse_bank("not json"),
        Err(SourceError::JsonParse(_))
    ));
    assert_eq!(
        parse_bank(r#"{"public": {}}"#).unwrap_err(),
        SourceError::InvalidBank(ModelError::EmptyBank)
    );
    let division = r#"{"level_0": [{"number_0": "4", "number_1": "2", "operator": "/"}]}"#;
    assert!(matches!(
        parse_bank(division),
        Err(SourceError::InvalidBank(_))
    ));
}

#[test]
fn saved_banks_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("bank.json");
    let bank = parse_bank(&service_reply()).unwrap();

    save_bank(&path, &bank).unwrap();
    let loaded = load_bank(&path).unwrap();
    assert_eq!(loaded.fingerprint(), bank.fingerprint());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"level_1\""));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_bank(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SourceError::Io(_)));
    assert!(err.is_retryable());
}

#[test]
fn cache_keeps_the_last_good_bank() {
    let bank = parse_bank(&service_reply()).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut cache = QuestionCache::new();
    assert!(cache.is_stale(Duration::from_secs(60), now));

    let update = cache.apply(Ok(bank.clone()), now);
    assert!(matches!(update, CacheUpdate::Replaced { changed: true, levels: 2, .. }));

    let failure = SourceError::Network("timed out".to_string());
    let update = cache.apply(Err(failure.clone()), now);
    assert_eq!(update, CacheUpdate::Kept { error: failure.clone() });
    assert_eq!(cache.bank(), Some(&bank));
    assert_eq!(cache.last_error(), Some(&failure));
    assert_eq!(cache.last_refresh(), Some(now));

    let later = now + chrono::Duration::hours(3);
    let update = cache.apply(Ok(bank.clone()), later);
    assert!(matches!(update, CacheUpdate::Replaced { changed: false, .. }));
    assert_eq!(cache.last_error(), None);
    assert!(!cache.is_stale(Duration::from_secs(10_800), later));
    assert!(cache.is_stale(
        Duration::from_secs(10_800),
        later + chrono::Duration::hours(3)
    ));
}

#[test]
fn seeded_cache_reports_unchanged_refreshes() {
    let bank = parse_bank(&service_reply()).unwrap();
    let mut cache = QuestionCache::with_bank(bank.clone());
    assert_eq!(cache.fingerprint(), Some(bank.fingerprint().as_str()));
    let update = cache.apply(Ok(bank), Utc::now());
    assert!(matches!(update, CacheUpdate::Replaced { changed: false, .. }));
}

struct CountingSource {
    calls: Arc<AtomicUsize>,
}

impl BankSource for CountingSource {
    fn fetch(&self) -> tutor_source::Result<QuestionBank> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            Err(SourceError::Http {
                status: 503,
                message: "Server error".to_string(),
            })
        } else {
            parse_bank(&service_reply())
        }
    }
}

#[test]
fn refresher_fetches_on_start_and_on_demand() {
    let calls = Arc::new(AtomicUsize::new(0));
    let refresher = Refresher::spawn(
        CountingSource {
            calls: Arc::clone(&calls),
        },
        Duration::from_secs(3600),
    );

    let first = refresher
        .next_timeout(Duration::from_secs(5))
        .expect("initial fetch");
    assert!(first.result.is_err());

    refresher.refresh_now();
    let second = refresher
        .next_timeout(Duration::from_secs(5))
        .expect("manual fetch");
    assert_eq!(second.result.unwrap().level_count(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(refresher.try_next().is_none());
}
