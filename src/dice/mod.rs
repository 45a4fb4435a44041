//! Dice notation engine
//!
//! Parses standard dice notation (e.g. "2d6+3", "d20", "4d6-1"), evaluates
//! it against a random source, and records every outcome in a bounded,
//! shared roll ledger. The [`Roller`] is the request-facing service; the
//! submodules hold the parsing, evaluation, and history pieces.

mod ledger;
mod notation;
mod roll;

pub use ledger::{RollLedger, DEFAULT_HISTORY_CAPACITY};
pub use notation::{parse, DiceError, DiceFormula, MAX_COUNT, SUPPORTED_FACES};
pub use roll::{evaluate, RollMode, RollOutcome};

/// Upper bound on `roll_multiple` repetitions (bounds response size)
pub const MAX_REPEAT: usize = 20;

/// Dice service: parsing, evaluation, and the shared roll ledger
///
/// One instance lives for the whole process and is shared across requests
/// behind an `Arc`; the ledger handles its own locking.
pub struct Roller {
    ledger: RollLedger,
}

impl Roller {
    /// Create a roller whose ledger retains `history_capacity` outcomes
    pub fn new(history_capacity: usize) -> Self {
        Self {
            ledger: RollLedger::new(history_capacity),
        }
    }

    /// Parse and roll an expression once, recording the outcome.
    ///
    /// Advantage/disadvantage is only valid for a single d20; requesting it
    /// for any other formula is a caller error, not a silent no-op.
    pub fn roll(&self, expression: &str, mode: RollMode) -> Result<RollOutcome, DiceError> {
        let formula = parse(expression)?;
        if mode != RollMode::Normal && (formula.count() != 1 || formula.faces() != 20) {
            return Err(DiceError::AdvantageRequiresD20(formula.to_string()));
        }

        let outcome = evaluate(&formula, mode, &mut rand::rng());
        self.ledger.append(outcome.clone());
        Ok(outcome)
    }

    /// Roll the same expression `times` times, each with fresh randomness.
    ///
    /// `times` must be in `[1, MAX_REPEAT]`. Every outcome is recorded.
    pub fn roll_multiple(
        &self,
        expression: &str,
        times: usize,
    ) -> Result<Vec<RollOutcome>, DiceError> {
        if times < 1 || times > MAX_REPEAT {
            return Err(DiceError::RepeatOutOfRange(times));
        }
        let formula = parse(expression)?;

        let mut rng = rand::rng();
        let outcomes: Vec<RollOutcome> = (0..times)
            .map(|_| evaluate(&formula, RollMode::Normal, &mut rng))
            .collect();
        for outcome in &outcomes {
            self.ledger.append(outcome.clone());
        }
        Ok(outcomes)
    }

    /// Expected value of an expression. Deterministic, draws no randomness.
    pub fn average(&self, expression: &str) -> Result<f64, DiceError> {
        Ok(parse(expression)?.average())
    }

    /// The most recent rolls, newest first
    pub fn history(&self, limit: usize) -> Vec<RollOutcome> {
        self.ledger.history(limit)
    }

    /// Forget all recorded rolls
    pub fn clear_history(&self) {
        self.ledger.clear();
    }

    /// Number of rolls currently recorded
    pub fn history_len(&self) -> usize {
        self.ledger.len()
    }
}

impl Default for Roller {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
