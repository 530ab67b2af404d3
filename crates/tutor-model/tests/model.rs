//! Tests for tutor-model types.

use std::collections::BTreeMap;

use tutor_model::{ModelError, ProgressMarker, Question, QuestionBank, QuestionRecord};

fn ten_records(multiplicand: u64) -> Vec<QuestionRecord> {
    (0..10)
        .map(|i| QuestionRecord {
            multiplicand: (multiplicand + i).to_string(),
            multiplier: "12".to_string(),
            question: None,
            operator: None,
        })
        .collect()
}

#[test]
fn record_accepts_legacy_field_names_and_numbers() {
    let json = r#"{"question": "12 x 34", "number_0": "12", "number_1": 34, "operator": "x"}"#;
    let record: QuestionRecord = serde_json::from_str(json).expect("parse record");
    assert_eq!(record.multiplicand, "12");
    assert_eq!(record.multiplier, "34");
    assert_eq!(record.to_question().unwrap(), Question::new(12, 34).unwrap());
}

#[test]
fn record_rejects_other_operators() {
    let record = QuestionRecord {
        multiplicand: "12".to_string(),
        multiplier: "3".to_string(),
        question: None,
        operator: Some("+".to_string()),
    };
    assert_eq!(
        record.to_question(),
        Err(ModelError::UnsupportedOperator("+".to_string()))
    );
}

#[test]
fn bank_from_legacy_keys_is_renumbered_from_zero() {
    let mut records = BTreeMap::new();
    records.insert("multiplication_1".to_string(), ten_records(100));
    records.insert("multiplication_2".to_string(), ten_records(200));
    records.insert("multiplication_10".to_string(), ten_records(300));

    let bank = QuestionBank::from_keyed_records(&records).expect("bank");

    assert_eq!(bank.level_count(), 3);
    assert_eq!(bank.max_level(), Some(2));
    assert_eq!(bank.level(0).unwrap()[0].multiplicand, 100);
    assert_eq!(bank.level(1).unwrap()[0].multiplicand, 200);
    // numeric, not lexicographic, ordering of keys
    assert_eq!(bank.level(2).unwrap()[0].multiplicand, 300);
}

#[test]
fn bank_requires_sets_of_ten() {
    let mut records = BTreeMap::new();
    let mut short = ten_records(10);
    short.pop();
    records.insert("level_0".to_string(), short);

    let err = QuestionBank::from_keyed_records(&records).unwrap_err();
    assert_eq!(
        err,
        ModelError::WrongSetSize {
            key: "level_0".to_string(),
            found: 9,
            expected: 10,
        }
    );
}

#[test]
fn bank_rejects_duplicate_levels_across_spellings() {
    let mut records = BTreeMap::new();
    records.insert("level_1".to_string(), ten_records(10));
    records.insert("multiplication_1".to_string(), ten_records(20));

    let err = QuestionBank::from_keyed_records(&records).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateLevel { level: 1, .. }));
}

#[test]
fn empty_bank_is_an_error() {
    let records = BTreeMap::new();
    assert_eq!(
        QuestionBank::from_keyed_records(&records),
        Err(ModelError::EmptyBank)
    );
}

#[test]
fn fingerprint_tracks_content() {
    let mut records = BTreeMap::new();
    records.insert("level_0".to_string(), ten_records(10));
    let first = QuestionBank::from_keyed_records(&records).unwrap();
    let same = QuestionBank::from_keyed_records(&records).unwrap();

    records.insert("level_0".to_string(), ten_records(11));
    let changed = QuestionBank::from_keyed_records(&records).unwrap();

    assert_eq!(first.fingerprint(), same.fingerprint());
    assert_ne!(first.fingerprint(), changed.fingerprint());
    assert_eq!(first.fingerprint().len(), 64);
}

#[test]
fn progress_markers_serialize_as_snake_case() {
    let markers = [
        ProgressMarker::from_outcome(None),
        ProgressMarker::from_outcome(Some(true)),
        ProgressMarker::from_outcome(Some(false)),
    ];
    insta::assert_json_snapshot!(markers, @r#"
    [
      "unanswered",
      "correct",
      "incorrect"
    ]
    "#);
}
