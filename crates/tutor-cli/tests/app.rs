//! Driving the interactive session without a terminal.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use ratatui::layout::Rect;
use tutor_cli::tui::{Action, App, CellHit, Tone};
use tutor_core::{Key, QuestionProvider, RowId, TutorSession};
use tutor_model::{QUESTIONS_PER_SET, Question, QuestionBank};
use tutor_source::{BankSource, QuestionCache, RefreshEvent, Refresher, SourceError};

/// Deals `7 × 8` at every level.
struct SevenEights;

impl QuestionProvider for SevenEights {
    fn max_level(&self) -> u32 {
        2
    }

    fn question_set(&mut self, _level: u32) -> tutor_core::Result<Vec<Question>> {
        Ok(vec![Question::new(7, 8).unwrap(); QUESTIONS_PER_SET])
    }

    fn label(&self) -> &'static str {
        "fixed"
    }
}

fn app() -> App {
    let session = TutorSession::new(Box::new(SevenEights), 0, None).unwrap();
    App::new(session, QuestionCache::new(), None, None)
}

fn press(app: &mut App, digits: &str) {
    for c in digits.chars() {
        app.handle(Action::Key(Key::from_char(c).unwrap()), Instant::now());
    }
}

#[test]
fn first_try_solve_unlocks_the_next_question() {
    let mut app = app();
    // the product row fills from the ones place
    press(&mut app, "65");
    app.handle(Action::Submit, Instant::now());

    let notice = app.notice().unwrap();
    assert_eq!(notice.tone, Tone::Success);
    assert!(notice.text.starts_with("Correct!"));
    assert!(app.session().can_advance());

    app.handle(Action::Next, Instant::now());
    assert!(app.notice().is_none());
    assert_eq!(app.session().controller().current_index(), 1);
}

#[test]
fn wrong_answer_counts_the_rows_still_wrong() {
    let mut app = app();
    press(&mut app, "11");
    app.handle(Action::Submit, Instant::now());

    let notice = app.notice().unwrap();
    assert_eq!(notice.tone, Tone::Problem);
    assert!(notice.text.starts_with("0 of 1 rows correct"));
    assert!(!app.session().can_advance());
}

#[test]
fn next_is_refused_until_the_question_is_scored() {
    let mut app = app();
    app.handle(Action::Next, Instant::now());

    let notice = app.notice().unwrap();
    assert_eq!(notice.tone, Tone::Info);
    assert!(notice.text.contains("give up"));
    assert_eq!(app.session().controller().current_index(), 0);
}

#[test]
fn giving_up_twice_scores_once() {
    let mut app = app();
    app.handle(Action::GiveUp, Instant::now());
    assert!(app.notice().unwrap().text.starts_with("Marked as incorrect"));
    assert!(app.session().can_advance());

    app.handle(Action::GiveUp, Instant::now());
    assert_eq!(app.notice().unwrap().text, "This question is already scored.");
}

#[test]
fn click_focuses_the_hit_cell() {
    let mut app = app();
    app.set_hits(vec![CellHit {
        area: Rect::new(10, 5, 3, 1),
        row: RowId::Product,
        index: 0,
    }]);

    app.handle(Action::Click { column: 11, row: 5 }, Instant::now());
    assert_eq!(app.session().sequencer().product_row().active_index(), Some(0));

    // clicks outside every cell change nothing
    app.handle(Action::Click { column: 0, row: 0 }, Instant::now());
    assert_eq!(app.session().sequencer().product_row().active_index(), Some(0));
    assert!(app.notice().is_none());
}

#[test]
fn failed_refresh_keeps_the_current_questions() {
    let mut app = app();
    let error = SourceError::Network("connection refused".to_string());
    app.apply_refresh(RefreshEvent {
        result: Err(error.clone()),
        finished_at: Utc::now(),
    });

    let notice = app.notice().unwrap();
    assert_eq!(notice.tone, Tone::Problem);
    assert_eq!(notice.text, error.user_message());
    assert_eq!(app.session().provider_label(), "fixed");
    assert!(app.cache().bank().is_none());
}

#[test]
fn fresh_bank_takes_over_the_provider() {
    let mut app = app();
    let questions = vec![Question::new(12, 34).unwrap(); QUESTIONS_PER_SET];
    let bank = QuestionBank::from_levels(BTreeMap::from([(0, questions)])).unwrap();

    app.apply_refresh(RefreshEvent {
        result: Ok(bank.clone()),
        finished_at: Utc::now(),
    });

    assert_eq!(app.session().provider_label(), "question bank");
    assert_eq!(app.cache().bank(), Some(&bank));
    assert_eq!(app.notice().unwrap().text, "Loaded 1 levels from the question server.");
    // the problem on screen is untouched
    assert_eq!(app.session().sequencer().problem().multiplier(), 8);
}

#[test]
fn refresh_without_a_source_says_so_and_quit_stops() {
    let mut app = app();
    app.handle(Action::Refresh, Instant::now());
    assert_eq!(app.notice().unwrap().text, "Remote questions are not in use.");
    assert!(!app.should_quit());

    app.handle(Action::Quit, Instant::now());
    assert!(app.should_quit());
}

/// A question server that is never reachable.
struct Unreachable;

impl BankSource for Unreachable {
    fn fetch(&self) -> tutor_source::Result<QuestionBank> {
        Err(SourceError::Network("unreachable".to_string()))
    }
}

#[test]
fn remote_data_goes_stale_after_a_missed_refresh() {
    let session = TutorSession::new(Box::new(SevenEights), 0, None).unwrap();
    let refresher = Refresher::spawn(Unreachable, Duration::from_secs(3600));
    assert_eq!(refresher.interval(), Duration::from_secs(3600));
    let mut app = App::new(session, QuestionCache::new(), Some(refresher), None);
    let loaded_at = Utc::now();
    // nothing loaded yet, so nothing to call stale
    assert!(!app.source_is_stale(loaded_at));

    let questions = vec![Question::new(12, 34).unwrap(); QUESTIONS_PER_SET];
    let bank = QuestionBank::from_levels(BTreeMap::from([(0, questions)])).unwrap();
    app.apply_refresh(RefreshEvent {
        result: Ok(bank),
        finished_at: loaded_at,
    });

    assert!(!app.source_is_stale(loaded_at + chrono::Duration::minutes(30)));
    assert!(app.source_is_stale(loaded_at + chrono::Duration::hours(2)));
}

#[test]
fn local_questions_are_never_stale() {
    let app = app();
    assert!(!app.source_is_stale(Utc::now() + chrono::Duration::days(1)));
}
