//! Questions and the per-level question bank.
//!
//! The remote source delivers records keyed by level (`level_0`, `level_1`,
//! ... or the older `multiplication_1`, `multiplication_2`, ... spelling).
//! Operands arrive as numeric strings, sometimes as bare numbers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ModelError, Result};

/// Number of questions in one set; every bank level carries exactly this many.
pub const QUESTIONS_PER_SET: usize = 10;

const LEVEL_KEY_PREFIXES: [&str; 2] = ["level", "multiplication"];
const MULTIPLICATION_OPERATORS: [&str; 6] = ["x", "×", "*", "·", "multiply", "multiplication"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub multiplicand: u64,
    pub multiplier: u64,
}

impl Question {
    pub fn new(multiplicand: u64, multiplier: u64) -> Result<Self> {
        if multiplicand == 0 {
            return Err(ModelError::InvalidOperand {
                field: "multiplicand",
                value: multiplicand.to_string(),
            });
        }
        if multiplier == 0 {
            return Err(ModelError::InvalidOperand {
                field: "multiplier",
                value: multiplier.to_string(),
            });
        }
        Ok(Self {
            multiplicand,
            multiplier,
        })
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.multiplicand, self.multiplier)
    }
}

/// One question as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(alias = "number_0", deserialize_with = "numeric_text")]
    pub multiplicand: String,
    #[serde(alias = "number_1", deserialize_with = "numeric_text")]
    pub multiplier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl QuestionRecord {
    pub fn to_question(&self) -> Result<Question> {
        if let Some(operator) = &self.operator {
            let normalized = operator.trim().to_lowercase();
            if !MULTIPLICATION_OPERATORS.contains(&normalized.as_str()) {
                return Err(ModelError::UnsupportedOperator(operator.clone()));
            }
        }
        let multiplicand = parse_operand("multiplicand", &self.multiplicand)?;
        let multiplier = parse_operand("multiplier", &self.multiplier)?;
        Question::new(multiplicand, multiplier)
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            multiplicand: question.multiplicand.to_string(),
            multiplier: question.multiplier.to_string(),
            question: None,
            operator: None,
        }
    }
}

fn parse_operand(field: &'static str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|parsed| *parsed > 0)
        .ok_or_else(|| ModelError::InvalidOperand {
            field,
            value: value.to_string(),
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericText {
    Text(String),
    Number(u64),
}

fn numeric_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumericText::deserialize(deserializer)? {
        NumericText::Text(text) => text,
        NumericText::Number(number) => number.to_string(),
    })
}

/// Validated questions grouped by zero-based difficulty level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct QuestionBank {
    levels: BTreeMap<u32, Vec<Question>>,
}

impl QuestionBank {
    /// Builds a bank from already-parsed levels. Levels are renumbered by
    /// rank so the result is always `0..=max_level` without gaps.
    pub fn from_levels(levels: BTreeMap<u32, Vec<Question>>) -> Result<Self> {
        if levels.is_empty() {
            return Err(ModelError::EmptyBank);
        }
        let mut ranked = BTreeMap::new();
        for (rank, (level, questions)) in levels.into_iter().enumerate() {
            check_set_size(&format!("level_{level}"), questions.len())?;
            ranked.insert(rank as u32, questions);
        }
        Ok(Self { levels: ranked })
    }

    /// Builds a bank from wire records keyed `level_N` or `multiplication_N`.
    pub fn from_keyed_records(records: &BTreeMap<String, Vec<QuestionRecord>>) -> Result<Self> {
        let mut numbered: BTreeMap<u32, (&str, &[QuestionRecord])> = BTreeMap::new();
        for (key, set) in records {
            let number = parse_level_key(key)?;
            if numbered
                .insert(number, (key.as_str(), set.as_slice()))
                .is_some()
            {
                return Err(ModelError::DuplicateLevel {
                    level: number,
                    key: key.clone(),
                });
            }
        }
        let mut levels = BTreeMap::new();
        for (number, (key, set)) in numbered {
            check_set_size(key, set.len())?;
            let questions = set
                .iter()
                .map(QuestionRecord::to_question)
                .collect::<Result<Vec<_>>>()?;
            levels.insert(number, questions);
        }
        Self::from_levels(levels)
    }

    #[must_use]
    pub fn level(&self, level: u32) -> Option<&[Question]> {
        self.levels.get(&level).map(Vec::as_slice)
    }

    #[must_use]
    pub fn max_level(&self) -> Option<u32> {
        self.levels.keys().next_back().copied()
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Question])> + '_ {
        self.levels
            .iter()
            .map(|(level, questions)| (*level, questions.as_slice()))
    }

    /// Wire representation using the `level_N` key spelling.
    #[must_use]
    pub fn to_keyed_records(&self) -> BTreeMap<String, Vec<QuestionRecord>> {
        self.levels
            .iter()
            .map(|(level, questions)| {
                (
                    format!("level_{level}"),
                    questions.iter().copied().map(QuestionRecord::from).collect(),
                )
            })
            .collect()
    }

    /// Hex SHA-256 over the bank contents in level order.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (level, questions) in &self.levels {
            hasher.update(format!("level_{level}:"));
            for question in questions {
                hasher.update(format!("{}x{};", question.multiplicand, question.multiplier));
            }
        }
        hex::encode(hasher.finalize())
    }
}

fn check_set_size(key: &str, found: usize) -> Result<()> {
    if found != QUESTIONS_PER_SET {
        return Err(ModelError::WrongSetSize {
            key: key.to_string(),
            found,
            expected: QUESTIONS_PER_SET,
        });
    }
    Ok(())
}

fn parse_level_key(key: &str) -> Result<u32> {
    let invalid = || ModelError::InvalidLevelKey(key.to_string());
    let (prefix, number) = key.trim().rsplit_once('_').ok_or_else(invalid)?;
    if !LEVEL_KEY_PREFIXES
        .iter()
        .any(|known| prefix.eq_ignore_ascii_case(known))
    {
        return Err(invalid());
    }
    number.parse::<u32>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_keys_accept_both_spellings() {
        assert_eq!(parse_level_key("level_3"), Ok(3));
        assert_eq!(parse_level_key("multiplication_12"), Ok(12));
        assert!(parse_level_key("division_1").is_err());
        assert!(parse_level_key("level").is_err());
        assert!(parse_level_key("level_x").is_err());
    }

    #[test]
    fn operands_must_be_positive_integers() {
        assert!(parse_operand("multiplier", "0").is_err());
        assert!(parse_operand("multiplier", "-4").is_err());
        assert!(parse_operand("multiplier", "4.5").is_err());
        assert_eq!(parse_operand("multiplier", " 45 "), Ok(45));
    }
}
