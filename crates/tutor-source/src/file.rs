//! Question bank documents on disk.
//!
//! Both the service reply (`{"public": {...}}`) and a bare level map are
//! accepted; saving always writes the reply shape with `level_N` keys.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};
use tutor_model::{QuestionBank, QuestionRecord};

use crate::error::Result;
use crate::types::FetchResponse;

#[derive(Deserialize)]
#[serde(untagged)]
enum BankDocument {
    Wrapped(FetchResponse),
    Bare(BTreeMap<String, Vec<QuestionRecord>>),
}

pub fn parse_bank(text: &str) -> Result<QuestionBank> {
    let records = match serde_json::from_str::<BankDocument>(text)? {
        BankDocument::Wrapped(response) => response.public,
        BankDocument::Bare(records) => records,
    };
    let bank = QuestionBank::from_keyed_records(&records)?;
    debug!(levels = bank.level_count(), "parsed question bank");
    Ok(bank)
}

pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let text = fs::read_to_string(path)?;
    let bank = parse_bank(&text)?;
    info!(path = %path.display(), levels = bank.level_count(), "loaded question bank");
    Ok(bank)
}

pub fn save_bank(path: &Path, bank: &QuestionBank) -> Result<()> {
    let document = FetchResponse {
        public: bank.to_keyed_records(),
    };
    let text = serde_json::to_string_pretty(&document)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    info!(path = %path.display(), "saved question bank");
    Ok(())
}
