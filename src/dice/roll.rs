//! Roll evaluation
//!
//! Turns a validated [`DiceFormula`] plus a random source into an immutable
//! [`RollOutcome`]. Evaluation itself is infallible; everything that can go
//! wrong is caught at parse time or at the service boundary.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::notation::DiceFormula;

/// How a d20 roll is resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollMode {
    /// One draw per die, no second chance
    #[default]
    Normal,
    /// Roll two d20, keep the higher
    Advantage,
    /// Roll two d20, keep the lower
    Disadvantage,
}

/// The immutable record of one evaluated formula
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Unique id for this roll
    pub id: Uuid,
    /// Canonical form of the originating formula
    pub expression: String,
    /// Number of dice rolled
    pub count: u32,
    /// Die size
    pub faces: u32,
    /// Flat modifier
    pub modifier: i32,
    /// Kept per-die results, in roll order; length == count
    pub rolls: Vec<u32>,
    /// Sum of the kept dice
    pub subtotal: u32,
    /// subtotal + modifier
    pub total: i64,
    /// Resolution mode used
    pub mode: RollMode,
    /// The companion d20 dropped under advantage/disadvantage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discarded: Option<u32>,
    /// When the roll happened
    pub rolled_at: DateTime<Utc>,
}

/// Evaluate a formula once against the given random source.
///
/// Under [`RollMode::Advantage`] or [`RollMode::Disadvantage`] exactly two
/// independent dice are drawn and the max (resp. min) is kept; the other
/// die is retained in `discarded` for transparency. Those modes are only
/// meaningful for a single d20 - [`super::Roller::roll`] rejects anything
/// else before calling here.
pub fn evaluate(formula: &DiceFormula, mode: RollMode, rng: &mut impl Rng) -> RollOutcome {
    let (rolls, discarded) = match mode {
        RollMode::Normal => {
            let rolls: Vec<u32> = (0..formula.count())
                .map(|_| rng.random_range(1..=formula.faces()))
                .collect();
            (rolls, None)
        }
        RollMode::Advantage => {
            let first = rng.random_range(1..=formula.faces());
            let second = rng.random_range(1..=formula.faces());
            (vec![first.max(second)], Some(first.min(second)))
        }
        RollMode::Disadvantage => {
            let first = rng.random_range(1..=formula.faces());
            let second = rng.random_range(1..=formula.faces());
            (vec![first.min(second)], Some(first.max(second)))
        }
    };

    let subtotal: u32 = rolls.iter().sum();

    RollOutcome {
        id: Uuid::new_v4(),
        expression: formula.to_string(),
        count: formula.count(),
        faces: formula.faces(),
        modifier: formula.modifier(),
        rolls,
        subtotal,
        total: i64::from(subtotal) + i64::from(formula.modifier()),
        mode,
        discarded,
        rolled_at: Utc::now(),
    }
}
