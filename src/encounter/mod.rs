//! Encounter generation
//!
//! Computes an XP budget from party parameters and fills it with a
//! randomized greedy selection from the bestiary. The fill is deliberately
//! not an optimal packer: an exact solver would return the same creature
//! set for every identical budget, and encounters are supposed to vary
//! between calls.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bestiary::{Bestiary, Creature};

/// Stop filling once the remaining budget drops to this many XP
pub const XP_FLOOR: u32 = 20;

/// Hard cap on selection iterations; guarantees termination
pub const MAX_ATTEMPTS: usize = 50;

/// Party level bounds
pub const PARTY_LEVEL_RANGE: (u32, u32) = (1, 20);

/// Party size bounds
pub const PARTY_SIZE_RANGE: (u32, u32) = (1, 10);

/// Encounter difficulty tiers (closed enumeration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Trivial,
    Low,
    Moderate,
    Severe,
    Extreme,
}

impl Difficulty {
    /// XP budget contributed per party member
    pub fn xp_per_character(self) -> u32 {
        match self {
            Difficulty::Trivial => 40,
            Difficulty::Low => 60,
            Difficulty::Moderate => 80,
            Difficulty::Severe => 120,
            Difficulty::Extreme => 160,
        }
    }

    /// Every tier, in ascending order
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Trivial,
            Difficulty::Low,
            Difficulty::Moderate,
            Difficulty::Severe,
            Difficulty::Extreme,
        ]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Trivial => "trivial",
            Difficulty::Low => "low",
            Difficulty::Moderate => "moderate",
            Difficulty::Severe => "severe",
            Difficulty::Extreme => "extreme",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Difficulty {
    type Err = EncounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trivial" => Ok(Difficulty::Trivial),
            "low" => Ok(Difficulty::Low),
            "moderate" => Ok(Difficulty::Moderate),
            "severe" => Ok(Difficulty::Severe),
            "extreme" => Ok(Difficulty::Extreme),
            _ => Err(EncounterError::UnknownDifficultyTier(s.trim().to_string())),
        }
    }
}

/// Errors from budget computation and encounter generation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncounterError {
    /// Difficulty value not in the closed enumeration
    #[error("unknown difficulty tier {0:?}; expected one of: trivial, low, moderate, severe, extreme")]
    UnknownDifficultyTier(String),
    /// Party level or size outside its contract bounds
    #[error("{field} {value} is outside {min}-{max}")]
    PartyOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    /// Generation attempted against a catalog with zero creatures
    #[error("the creature catalog is empty")]
    EmptyCatalog,
}

impl EncounterError {
    /// Stable machine-readable discriminator, surfaced in API error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            EncounterError::UnknownDifficultyTier(_) => "unknown_difficulty_tier",
            EncounterError::PartyOutOfRange { .. } => "party_out_of_range",
            EncounterError::EmptyCatalog => "empty_catalog",
        }
    }
}

/// Derived, per-request encounter budget
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EncounterBudget {
    pub party_level: u32,
    pub party_size: u32,
    pub difficulty: Difficulty,
    /// Total XP to spend: per-character tier value times party size
    pub target_xp: u32,
}

/// Compute the XP budget for a party.
///
/// `party_level` must be in `[1, 20]` and `party_size` in `[1, 10]`. The
/// budget is `xp_per_character(difficulty) * party_size`; party level does
/// not change the budget itself, only which creatures are considered
/// suitable during generation.
pub fn compute_budget(
    party_level: u32,
    party_size: u32,
    difficulty: Difficulty,
) -> Result<EncounterBudget, EncounterError> {
    let (min_level, max_level) = PARTY_LEVEL_RANGE;
    if party_level < min_level || party_level > max_level {
        return Err(EncounterError::PartyOutOfRange {
            field: "party_level",
            value: party_level,
            min: min_level,
            max: max_level,
        });
    }

    let (min_size, max_size) = PARTY_SIZE_RANGE;
    if party_size < min_size || party_size > max_size {
        return Err(EncounterError::PartyOutOfRange {
            field: "party_size",
            value: party_size,
            min: min_size,
            max: max_size,
        });
    }

    Ok(EncounterBudget {
        party_level,
        party_size,
        difficulty,
        target_xp: difficulty.xp_per_character() * party_size,
    })
}

/// Aggregate stats over the selected creatures
#[derive(Debug, Clone, Serialize)]
pub struct EncounterStats {
    pub total_hp: u32,
    pub average_ac: f64,
    pub creature_count: usize,
}

/// One generated encounter; never persisted
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedEncounter {
    pub party_level: u32,
    pub party_size: u32,
    pub difficulty: Difficulty,
    pub target_xp: u32,
    /// Summed XP cost of the selection
    pub total_xp: u32,
    /// Selected creatures, in pick order; repeats allowed
    pub creatures: Vec<Creature>,
    pub statistics: EncounterStats,
    /// Advisory string derived from the selection
    pub tactics: String,
}

/// Generate an encounter for the given budget.
///
/// Creatures with challenge rating in `[party_level - 2, party_level + 3]`
/// are considered suitable. The budget is then filled greedily: draw
/// uniformly from the suitable creatures still affordable within the
/// remaining budget, until the budget drops to [`XP_FLOOR`], nothing is
/// affordable, or [`MAX_ATTEMPTS`] picks have been made. The selection may
/// overshoot the target by at most one creature's cost.
///
/// If no creature fits even once, the single catalog creature whose cost
/// is closest to the target is used instead - a non-empty catalog never
/// yields an empty encounter.
pub fn generate(
    budget: &EncounterBudget,
    bestiary: &Bestiary,
    rng: &mut impl Rng,
) -> Result<GeneratedEncounter, EncounterError> {
    if bestiary.is_empty() {
        return Err(EncounterError::EmptyCatalog);
    }

    let min_cr = f64::from(budget.party_level.saturating_sub(2));
    let max_cr = f64::from(budget.party_level + 3);
    let suitable = bestiary.by_cr_range(min_cr, max_cr);

    let mut selection: Vec<Creature> = Vec::new();
    let mut remaining = budget.target_xp;

    for _ in 0..MAX_ATTEMPTS {
        if remaining <= XP_FLOOR {
            break;
        }
        let affordable: Vec<&Creature> = suitable
            .iter()
            .copied()
            .filter(|c| c.xp <= remaining)
            .collect();
        if affordable.is_empty() {
            break;
        }

        let pick = affordable[rng.random_range(0..affordable.len())];
        remaining -= pick.xp;
        selection.push(pick.clone());
    }

    // An unreachable budget degrades to the closest single creature rather
    // than an empty encounter.
    if selection.is_empty() {
        if let Some(closest) = bestiary
            .iter()
            .min_by_key(|c| c.xp.abs_diff(budget.target_xp))
        {
            selection.push(closest.clone());
        }
    }

    let total_xp = selection.iter().map(|c| c.xp).sum();
    let total_hp = selection.iter().map(|c| c.hit_points).sum();
    let average_ac =
        selection.iter().map(|c| f64::from(c.armor_class)).sum::<f64>() / selection.len() as f64;
    let tactics = tactics_hint(&selection);

    Ok(GeneratedEncounter {
        party_level: budget.party_level,
        party_size: budget.party_size,
        difficulty: budget.difficulty,
        target_xp: budget.target_xp,
        total_xp,
        statistics: EncounterStats {
            total_hp,
            average_ac,
            creature_count: selection.len(),
        },
        tactics,
        creatures: selection,
    })
}

/// Tactical advice derived purely from the selection size and composition
pub fn tactics_hint(selection: &[Creature]) -> String {
    let strongest = selection.iter().max_by_key(|c| c.xp);
    match (selection.len(), strongest) {
        (0, _) | (_, None) => "No creatures in encounter".to_string(),
        (1, Some(only)) => format!(
            "Single {} - consider environmental hazards or supporting minions",
            only.name
        ),
        (2..=3, Some(strongest)) => format!(
            "Small group - focus fire on the strongest enemy ({})",
            strongest.name
        ),
        (_, Some(_)) => {
            "Large group - use area control and prioritize high-damage targets".to_string()
        }
    }
}
