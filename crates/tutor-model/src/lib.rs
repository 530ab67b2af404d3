//! Data model shared by the long multiplication tutor crates.
//!
//! Everything here is plain data: no input handling, no I/O. The state
//! machines live in `tutor-core`, the remote question source in
//! `tutor-source`.

#![deny(unsafe_code)]

pub mod digit;
pub mod error;
pub mod progress;
pub mod question;

pub use digit::{Alignment, Digit, FillDirection, Side};
pub use error::{ModelError, Result};
pub use progress::ProgressMarker;
pub use question::{QUESTIONS_PER_SET, Question, QuestionBank, QuestionRecord};
