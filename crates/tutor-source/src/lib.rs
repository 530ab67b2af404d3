//! Question bank acquisition: the remote source, local bank files, and
//! the cache the background refresher feeds.

#![deny(unsafe_code)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod refresher;
pub mod types;

pub use cache::{CacheUpdate, QuestionCache};
pub use client::{BankSource, QuestionClient};
pub use config::SourceSettings;
pub use error::{Result, SourceError};
pub use file::{load_bank, parse_bank, save_bank};
pub use refresher::{RefreshEvent, Refresher};
