//! Decomposition of `multiplicand × multiplier` into the rows of a
//! long-multiplication worksheet.

use std::fmt;

use serde::{Deserialize, Serialize};
use tutor_model::{Alignment, Question};

use crate::error::{CoreError, Result};

/// Identifies an input row of a worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowId {
    Carry,
    /// Partial product for the multiplier digit at this place value
    /// (0 = ones).
    Partial(u32),
    Product,
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Carry => f.write_str("carry"),
            Self::Partial(position) => write!(f, "partial[10^{position}]"),
            Self::Product => f.write_str("product"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialProduct {
    pub digit_position: u32,
    pub digit: u8,
    /// `multiplicand × digit` followed by `digit_position` zeros.
    pub expected_value: String,
    pub value: u64,
    pub alignment: Alignment,
}

/// One answer row as the sequencer builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpec {
    pub id: RowId,
    pub expected_value: String,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiplicationProblem {
    multiplicand: u64,
    multiplier: u64,
    partial_products: Vec<PartialProduct>,
    final_product: String,
}

impl MultiplicationProblem {
    pub fn new(multiplicand: u64, multiplier: u64) -> Result<Self> {
        if multiplicand == 0 {
            return Err(CoreError::NonPositiveOperand {
                field: "multiplicand",
            });
        }
        if multiplier == 0 {
            return Err(CoreError::NonPositiveOperand {
                field: "multiplier",
            });
        }
        let overflow = || CoreError::ProductOverflow {
            multiplicand,
            multiplier,
        };
        let product = multiplicand.checked_mul(multiplier).ok_or_else(overflow)?;

        let digits: Vec<u8> = multiplier
            .to_string()
            .bytes()
            .map(|b| b - b'0')
            .collect();
        let mut partial_products = Vec::new();
        if digits.len() > 1 {
            let count = digits.len();
            for (i, &digit) in digits.iter().enumerate() {
                let digit_position = (count - 1 - i) as u32;
                // digit × 10^position never exceeds the multiplier, so this
                // stays below the product.
                let value = multiplicand * u64::from(digit) * 10u64.pow(digit_position);
                let mut expected_value = (multiplicand * u64::from(digit)).to_string();
                expected_value.push_str(&"0".repeat(digit_position as usize));
                partial_products.push(PartialProduct {
                    digit_position,
                    digit,
                    expected_value,
                    value,
                    alignment: Alignment::for_multiplier_digit(digit),
                });
            }
        }

        Ok(Self {
            multiplicand,
            multiplier,
            partial_products,
            final_product: product.to_string(),
        })
    }

    pub fn from_question(question: Question) -> Result<Self> {
        Self::new(question.multiplicand, question.multiplier)
    }

    #[must_use]
    pub fn multiplicand(&self) -> u64 {
        self.multiplicand
    }

    #[must_use]
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    /// Most significant multiplier digit first. Empty for a one-digit
    /// multiplier, where the product row is the only answer row.
    #[must_use]
    pub fn partial_products(&self) -> &[PartialProduct] {
        &self.partial_products
    }

    #[must_use]
    pub fn final_product(&self) -> &str {
        &self.final_product
    }

    /// Sum of the partial product values. Equals the product whenever
    /// partial rows exist.
    #[must_use]
    pub fn partial_sum(&self) -> u64 {
        self.partial_products.iter().map(|p| p.value).sum()
    }

    /// Number of carry slots. Zero when the multiplicand is one digit or
    /// the multiplier is, since a one-row worksheet has nothing to carry into.
    #[must_use]
    pub fn carry_slots(&self) -> usize {
        let digits = digit_count(self.multiplicand) as usize;
        if digits > 1 && !self.partial_products.is_empty() {
            digits
        } else {
            0
        }
    }

    #[must_use]
    pub fn needs_carry_row(&self) -> bool {
        self.carry_slots() > 0
    }

    /// Answer rows in worksheet order: partials then the product.
    #[must_use]
    pub fn rows(&self) -> Vec<RowSpec> {
        self.partial_products
            .iter()
            .map(|p| RowSpec {
                id: RowId::Partial(p.digit_position),
                expected_value: p.expected_value.clone(),
                alignment: p.alignment,
            })
            .chain(std::iter::once(RowSpec {
                id: RowId::Product,
                expected_value: self.final_product.clone(),
                alignment: Alignment::End,
            }))
            .collect()
    }
}

/// Operand size limits applied to generated and loaded questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemBounds {
    pub max_multiplicand_digits: u32,
    pub min_multiplier_digits: u32,
    pub max_multiplier_digits: u32,
}

impl Default for ProblemBounds {
    fn default() -> Self {
        Self {
            max_multiplicand_digits: 4,
            min_multiplier_digits: 2,
            max_multiplier_digits: 3,
        }
    }
}

/// Digits two operands may share before their product can leave `u64`.
pub const MAX_PRODUCT_DIGITS: u32 = 19;

impl ProblemBounds {
    /// Largest multiplicand allowed.
    #[must_use]
    pub fn max_multiplicand(&self) -> u64 {
        largest_with_digits(self.max_multiplicand_digits.max(1))
    }

    /// Rejects limits that are empty, inverted, or whose largest product
    /// does not fit in a `u64`.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(CoreError::InvalidBounds(reason));
        if self.max_multiplicand_digits == 0 || self.min_multiplier_digits == 0 {
            return invalid("digit limits must be at least 1".to_string());
        }
        if self.min_multiplier_digits > self.max_multiplier_digits {
            return invalid(format!(
                "min_multiplier_digits {} exceeds max_multiplier_digits {}",
                self.min_multiplier_digits, self.max_multiplier_digits
            ));
        }
        let total = self
            .max_multiplicand_digits
            .saturating_add(self.max_multiplier_digits);
        if total > MAX_PRODUCT_DIGITS {
            return invalid(format!(
                "{} + {} operand digits exceed the {MAX_PRODUCT_DIGITS} a product can hold",
                self.max_multiplicand_digits, self.max_multiplier_digits
            ));
        }
        Ok(())
    }

    pub fn check(&self, question: Question) -> Result<()> {
        let multiplicand_digits = digit_count(question.multiplicand);
        if multiplicand_digits > self.max_multiplicand_digits {
            return Err(CoreError::OutOfBounds {
                field: "multiplicand",
                value: question.multiplicand,
                digits: multiplicand_digits,
                min: 1,
                max: self.max_multiplicand_digits,
            });
        }
        let multiplier_digits = digit_count(question.multiplier);
        if !(self.min_multiplier_digits..=self.max_multiplier_digits).contains(&multiplier_digits)
        {
            return Err(CoreError::OutOfBounds {
                field: "multiplier",
                value: question.multiplier,
                digits: multiplier_digits,
                min: self.min_multiplier_digits,
                max: self.max_multiplier_digits,
            });
        }
        Ok(())
    }
}

/// `10^digits - 1`, saturating at `u64::MAX` for widths past 19 digits.
#[must_use]
pub(crate) fn largest_with_digits(digits: u32) -> u64 {
    10u64.checked_pow(digits).map_or(u64::MAX, |power| power - 1)
}

#[must_use]
pub(crate) fn digit_count(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |log| log + 1)
}
