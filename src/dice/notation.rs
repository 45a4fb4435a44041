//! Dice notation parsing
//!
//! Parses standard polyhedral notation like "2d6+3", "d20", "4d6-1" into a
//! validated [`DiceFormula`]. Validation happens in grammar order: syntax
//! first, then the dice count policy, then the die-size policy, each with
//! its own error kind so callers can tell bad syntax from bad values.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::MAX_REPEAT;

/// Die sizes the engine accepts (the standard polyhedral set)
pub const SUPPORTED_FACES: [u32; 7] = [4, 6, 8, 10, 12, 20, 100];

/// Maximum number of dice in a single formula
pub const MAX_COUNT: u32 = 100;

/// Errors from the dice engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// Input does not match the `[count]d<faces>[+/-modifier]` grammar
    #[error("malformed dice expression: {0:?}")]
    MalformedExpression(String),
    /// Syntax is fine but the dice count is outside policy
    #[error("dice count {0} is outside 1-{MAX_COUNT}")]
    CountOutOfRange(u64),
    /// Syntax is fine but the die size is not a standard polyhedral
    #[error("unsupported die size d{0}; supported: d4, d6, d8, d10, d12, d20, d100")]
    UnsupportedDieSize(u64),
    /// Advantage/disadvantage requested for something other than a single d20
    #[error("advantage/disadvantage applies only to a single d20 roll, not {0}")]
    AdvantageRequiresD20(String),
    /// roll_multiple repetition count outside policy
    #[error("repeat count {0} is outside 1-{MAX_REPEAT}")]
    RepeatOutOfRange(usize),
}

impl DiceError {
    /// Stable machine-readable discriminator, surfaced in API error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            DiceError::MalformedExpression(_) => "malformed_expression",
            DiceError::CountOutOfRange(_) => "count_out_of_range",
            DiceError::UnsupportedDieSize(_) => "unsupported_die_size",
            DiceError::AdvantageRequiresD20(_) => "advantage_requires_d20",
            DiceError::RepeatOutOfRange(_) => "repeat_out_of_range",
        }
    }
}

/// Grammar: optional count, literal 'd', faces, optional signed modifier
static FORMULA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)?d(\d+)([+-]\d+)?$").unwrap());

/// A parsed, validated dice formula
///
/// Fields are private: the only way to obtain one is through a validating
/// constructor, so an out-of-policy count or die size can never exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceFormula {
    count: u32,
    faces: u32,
    modifier: i32,
}

impl DiceFormula {
    /// Create a formula, enforcing the count and die-size policies
    pub fn new(count: u32, faces: u32, modifier: i32) -> Result<Self, DiceError> {
        if count < 1 || count > MAX_COUNT {
            return Err(DiceError::CountOutOfRange(u64::from(count)));
        }
        if !SUPPORTED_FACES.contains(&faces) {
            return Err(DiceError::UnsupportedDieSize(u64::from(faces)));
        }
        Ok(Self {
            count,
            faces,
            modifier,
        })
    }

    /// Number of dice to roll
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Die size
    pub fn faces(&self) -> u32 {
        self.faces
    }

    /// Flat modifier added to the summed rolls
    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// Minimum possible result
    pub fn min(&self) -> i64 {
        i64::from(self.count) + i64::from(self.modifier)
    }

    /// Maximum possible result
    pub fn max(&self) -> i64 {
        i64::from(self.count) * i64::from(self.faces) + i64::from(self.modifier)
    }

    /// Exact arithmetic expectation: `count * (faces + 1) / 2 + modifier`
    pub fn average(&self) -> f64 {
        f64::from(self.count) * (f64::from(self.faces) + 1.0) / 2.0 + f64::from(self.modifier)
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.faces, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.faces, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.faces)
        }
    }
}

impl FromStr for DiceFormula {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse a dice expression like "2d6+3"
///
/// Whitespace is stripped and the input is lowercased before matching, so
/// "  2D6 + 3 " parses the same as "2d6+3". An omitted count defaults to 1.
pub fn parse(expression: &str) -> Result<DiceFormula, DiceError> {
    let normalized: String = expression
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let caps = FORMULA_RE
        .captures(&normalized)
        .ok_or_else(|| DiceError::MalformedExpression(expression.trim().to_string()))?;

    // Capture groups are digit-only, so a parse failure can only be
    // overflow, which is out of range by definition.
    let count = match caps.get(1) {
        Some(m) => m.as_str().parse::<u64>().unwrap_or(u64::MAX),
        None => 1, // "d20" means "1d20"
    };
    if count < 1 || count > u64::from(MAX_COUNT) {
        return Err(DiceError::CountOutOfRange(count));
    }

    let faces = caps[2].parse::<u64>().unwrap_or(u64::MAX);
    if !SUPPORTED_FACES.iter().any(|&f| u64::from(f) == faces) {
        return Err(DiceError::UnsupportedDieSize(faces));
    }

    let modifier = match caps.get(3) {
        Some(m) => m
            .as_str()
            .parse::<i32>()
            .map_err(|_| DiceError::MalformedExpression(expression.trim().to_string()))?,
        None => 0,
    };

    DiceFormula::new(count as u32, faces as u32, modifier)
}
