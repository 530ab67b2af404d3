//! Set scoring, level transitions and the session surface.

use tutor_core::{
    Advance, CoreError, Key, LevelController, LevelTransition, ProblemBounds, QuestionProvider,
    RandomProvider, SessionEvent, TutorSession, next_level, sanitize_cell_input,
};
use tutor_model::{ProgressMarker, QUESTIONS_PER_SET, Question};

/// Every level deals ten copies of `level+2 × 3`, so questions reveal
/// which level dealt them.
struct FixedProvider {
    max_level: u32,
}

impl QuestionProvider for FixedProvider {
    fn max_level(&self) -> u32 {
        self.max_level
    }

    fn question_set(&mut self, level: u32) -> tutor_core::Result<Vec<Question>> {
        Ok(vec![
            Question::new(u64::from(level) + 2, 3).unwrap();
            QUESTIONS_PER_SET
        ])
    }

    fn label(&self) -> &'static str {
        "fixed"
    }
}

fn play_set(controller: &mut LevelController, provider: &mut FixedProvider, correct: usize) -> Advance {
    let mut last = None;
    for index in 0..QUESTIONS_PER_SET {
        controller.record_outcome(index, index < correct).unwrap();
        last = Some(controller.advance(provider).unwrap());
    }
    last.unwrap()
}

#[test]
fn transition_rule_from_level_three() {
    assert_eq!(next_level(3, 10, 9), (4, LevelTransition::Promoted));
    assert_eq!(next_level(3, 7, 9), (2, LevelTransition::HeldBack));
    assert_eq!(next_level(3, 3, 9), (2, LevelTransition::Regressed));
}

#[test]
fn levels_stay_in_bounds() {
    assert_eq!(next_level(0, 0, 9), (0, LevelTransition::Regressed));
    assert_eq!(next_level(0, 9, 9), (0, LevelTransition::HeldBack));
    assert_eq!(next_level(9, 10, 9), (0, LevelTransition::Wrapped));
    // a level above the ceiling is treated as the ceiling
    assert_eq!(next_level(12, 10, 9), (0, LevelTransition::Wrapped));
    assert_eq!(next_level(12, 2, 9), (8, LevelTransition::Regressed));
}

#[test]
fn perfect_set_promotes_and_deals_a_fresh_set() {
    let mut provider = FixedProvider { max_level: 5 };
    let mut controller = LevelController::new(&mut provider, 3, 5).unwrap();

    let Advance::SetCompleted { summary, question } = play_set(&mut controller, &mut provider, 10)
    else {
        panic!("tenth advance completes the set");
    };
    assert_eq!(summary.level, 3);
    assert_eq!(summary.correct_count, 10);
    assert_eq!(summary.next_level, 4);
    assert_eq!(question, Question::new(6, 3).unwrap());

    assert_eq!(controller.level(), 4);
    assert_eq!(controller.current_index(), 0);
    assert_eq!(controller.active_set().correct_count(), 0);
    assert_eq!(controller.progress(), [ProgressMarker::Unanswered; QUESTIONS_PER_SET]);
    assert_eq!(controller.history().len(), 1);
}

#[test]
fn imperfect_sets_drop_a_level() {
    let mut provider = FixedProvider { max_level: 5 };
    let mut controller = LevelController::new(&mut provider, 3, 5).unwrap();
    play_set(&mut controller, &mut provider, 7);
    assert_eq!(controller.level(), 2);
    play_set(&mut controller, &mut provider, 3);
    assert_eq!(controller.level(), 1);

    let summary = controller.history()[1];
    assert_eq!(summary.transition, LevelTransition::Regressed);
    assert_eq!(summary.outcomes.iter().filter(|ok| **ok).count(), 3);
}

#[test]
fn top_level_wraps_to_zero() {
    let mut provider = FixedProvider { max_level: 1 };
    let mut controller = LevelController::new(&mut provider, 7, 1).unwrap();
    assert_eq!(controller.level(), 1);
    play_set(&mut controller, &mut provider, 10);
    assert_eq!(controller.level(), 0);
    assert_eq!(controller.history()[0].transition, LevelTransition::Wrapped);
}

#[test]
fn advance_waits_for_an_outcome() {
    let mut provider = FixedProvider { max_level: 2 };
    let mut controller = LevelController::new(&mut provider, 0, 2).unwrap();
    assert_eq!(controller.advance(&mut provider), Err(CoreError::AdvanceLocked));

    controller.record_outcome(0, true).unwrap();
    assert!(controller.advance_unlocked());
    assert!(matches!(
        controller.advance(&mut provider),
        Ok(Advance::NextQuestion { index: 1, .. })
    ));
    assert_eq!(controller.advance(&mut provider), Err(CoreError::AdvanceLocked));
}

#[test]
fn outcomes_are_recorded_once_for_the_current_question() {
    let mut provider = FixedProvider { max_level: 2 };
    let mut controller = LevelController::new(&mut provider, 0, 2).unwrap();

    assert_eq!(
        controller.record_outcome(3, true),
        Err(CoreError::QuestionMismatch {
            index: 3,
            current: 0,
        })
    );
    assert!(matches!(
        controller.record_outcome(10, true),
        Err(CoreError::QuestionIndexOutOfRange { .. })
    ));
    controller.record_outcome(0, false).unwrap();
    assert_eq!(
        controller.record_outcome(0, true),
        Err(CoreError::OutcomeAlreadyRecorded(0))
    );
    assert_eq!(controller.progress()[0], ProgressMarker::Incorrect);
}

fn type_answer(session: &mut TutorSession, digits: &str) {
    for c in digits.chars() {
        let digit = sanitize_cell_input(&c.to_string()).unwrap();
        session.handle_key(Key::Digit(digit)).unwrap();
    }
}

#[test]
fn session_records_first_try_solves_as_correct() {
    // 2 × 3 at level 0: the product row "6" is the only answer row
    let mut session = TutorSession::new(Box::new(FixedProvider { max_level: 3 }), 0, None).unwrap();
    assert!(!session.can_advance());

    type_answer(&mut session, "6");
    let (report, events) = session.submit().unwrap();
    assert!(report.all_correct);
    assert_eq!(
        events,
        vec![
            SessionEvent::ProblemSolved {
                question_index: 0,
                first_attempt: true,
            },
            SessionEvent::AdvanceUnlocked,
        ]
    );
    assert_eq!(session.progress()[0], ProgressMarker::Correct);

    let events = session.advance().unwrap();
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::QuestionDealt { index: 1, .. }]
    ));
    assert_eq!(session.sequencer().question_index(), 1);
    assert_eq!(session.sequencer().product_row().entered(), " ");
}

#[test]
fn session_scores_a_late_solve_as_incorrect() {
    let mut session = TutorSession::new(Box::new(FixedProvider { max_level: 3 }), 0, None).unwrap();
    type_answer(&mut session, "5");
    let (report, events) = session.submit().unwrap();
    assert!(!report.all_correct);
    assert!(events.is_empty());

    session.handle_key(Key::Backspace).unwrap();
    type_answer(&mut session, "6");
    let (_, events) = session.submit().unwrap();
    assert_eq!(
        events[0],
        SessionEvent::ProblemSolved {
            question_index: 0,
            first_attempt: false,
        }
    );
    assert_eq!(session.progress()[0], ProgressMarker::Incorrect);
}

#[test]
fn giving_up_unlocks_advance_once() {
    let mut session = TutorSession::new(Box::new(FixedProvider { max_level: 3 }), 2, None).unwrap();
    let events = session.give_up().unwrap();
    assert_eq!(events.len(), 2);
    assert!(session.can_advance());
    assert!(session.give_up().unwrap().is_empty());

    // a correct answer after giving up changes nothing
    type_answer(&mut session, "21");
    let (report, events) = session.submit().unwrap();
    assert!(report.all_correct);
    assert!(events.is_empty());
}

#[test]
fn completing_a_set_through_the_session() {
    let mut session = TutorSession::new(Box::new(FixedProvider { max_level: 3 }), 1, Some(2)).unwrap();
    assert_eq!(session.max_level(), 2);
    let mut events = Vec::new();
    for _ in 0..QUESTIONS_PER_SET {
        session.give_up().unwrap();
        events = session.advance().unwrap();
    }
    let Some(SessionEvent::SetCompleted(summary)) = events.first() else {
        panic!("expected a set summary, got {events:?}");
    };
    assert_eq!(summary.correct_count, 0);
    assert_eq!(session.level(), 0);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn replacing_the_provider_applies_to_the_next_set() {
    let mut session = TutorSession::new(Box::new(FixedProvider { max_level: 3 }), 0, None).unwrap();
    let random = RandomProvider::seeded(7, ProblemBounds::default(), 1);
    session.replace_provider(Box::new(random), None);
    assert_eq!(session.max_level(), 1);
    assert_eq!(session.provider_label(), "random");
    // the dealt question is untouched
    assert_eq!(session.sequencer().problem().multiplicand(), 2);
}

/// Deals `2 × 3` first, then questions whose product leaves `u64`.
struct OverflowAfterFirst;

impl QuestionProvider for OverflowAfterFirst {
    fn max_level(&self) -> u32 {
        1
    }

    fn question_set(&mut self, _level: u32) -> tutor_core::Result<Vec<Question>> {
        let mut questions = vec![Question::new(u64::MAX / 2, 99).unwrap(); QUESTIONS_PER_SET];
        questions[0] = Question::new(2, 3).unwrap();
        Ok(questions)
    }

    fn label(&self) -> &'static str {
        "overflowing"
    }
}

#[test]
fn failed_deal_leaves_the_session_on_the_solved_question() {
    let mut session = TutorSession::new(Box::new(OverflowAfterFirst), 0, None).unwrap();
    type_answer(&mut session, "6");
    session.submit().unwrap();
    assert!(session.can_advance());

    assert!(matches!(
        session.advance(),
        Err(CoreError::ProductOverflow { .. })
    ));
    assert_eq!(session.controller().current_index(), 0);
    assert_eq!(session.sequencer().question_index(), 0);
    assert!(session.can_advance());
    assert_eq!(session.progress()[0], ProgressMarker::Correct);

    // the learner can still try again or keep working on the same sheet
    assert!(session.advance().is_err());
    assert_eq!(session.controller().current_index(), 0);
}
