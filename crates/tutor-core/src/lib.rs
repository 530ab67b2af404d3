//! Core state machines of the long multiplication tutor.
//!
//! Data flows leaf-first: a [`LevelController`] deals a question, a
//! [`MultiplicationProblem`] decomposes it, a [`StepSequencer`] owns one
//! [`DigitRow`] per answer row and hands focus between them, and
//! submission results flow back up into the controller. [`TutorSession`]
//! wires the pieces together for a front-end.
//!
//! Nothing here touches a terminal or the network. Presentation layers
//! read `active_index`/`direction` from the rows to place the cursor.

#![deny(unsafe_code)]

pub mod carry;
pub mod error;
pub mod keys;
pub mod level;
pub mod problem;
pub mod provider;
pub mod row;
pub mod sequencer;
pub mod session;

pub use carry::{CarryRow, FLASH_DURATION, FlashTimer, FlashToken};
pub use error::{CoreError, Result};
pub use keys::{Key, sanitize_cell_input};
pub use level::{
    Advance, LevelController, LevelTransition, PASSING_SCORE, QuestionSet, SetSummary, next_level,
};
pub use problem::{
    MAX_PRODUCT_DIGITS, MultiplicationProblem, PartialProduct, ProblemBounds, RowId, RowSpec,
};
pub use provider::{QuestionProvider, RandomProvider};
pub use row::{CellMark, DigitRow, RowSignal};
pub use sequencer::{Completion, Handoff, Step, StepSequencer, SubmitReport};
pub use session::{SessionEvent, TutorSession};
