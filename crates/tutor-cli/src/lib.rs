//! Terminal front-end for the long multiplication tutor.

pub mod config;
pub mod logging;
pub mod tui;
pub mod worksheet;
