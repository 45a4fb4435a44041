//! Creature catalog
//!
//! Read-only bestiary loaded once at startup and shared by every request.
//! Ships with a built-in starter catalog; operators can replace it with a
//! JSON file via the `bestiary_path` config key.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A catalog entry. Never mutated after the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Display name
    pub name: String,
    /// Challenge rating; fractional for weak creatures (e.g. 0.25)
    pub challenge_rating: f64,
    /// Cost in encounter-budget units
    pub xp: u32,
    /// Hit points
    pub hit_points: u32,
    /// Armor class
    pub armor_class: u32,
    /// Free-form type tag, e.g. "Undead", "Dragon"
    pub category: String,
}

/// Immutable creature catalog
pub struct Bestiary {
    creatures: Vec<Creature>,
}

impl Bestiary {
    /// Build a catalog from an explicit creature list
    pub fn new(creatures: Vec<Creature>) -> Self {
        Self { creatures }
    }

    /// Load a catalog from a JSON array of creatures
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading bestiary file {}", path.display()))?;
        let creatures: Vec<Creature> =
            serde_json::from_str(&data).context("bestiary file is not a JSON creature array")?;
        Ok(Self { creatures })
    }

    /// The built-in starter catalog
    pub fn builtin() -> Self {
        fn c(name: &str, cr: f64, xp: u32, hp: u32, ac: u32, category: &str) -> Creature {
            Creature {
                name: name.to_string(),
                challenge_rating: cr,
                xp,
                hit_points: hp,
                armor_class: ac,
                category: category.to_string(),
            }
        }

        Self {
            creatures: vec![
                // CR 0-1
                c("Goblin Warrior", 0.5, 20, 15, 16, "Humanoid"),
                c("Giant Rat", 0.25, 10, 8, 12, "Animal"),
                c("Skeleton Guard", 0.5, 20, 16, 14, "Undead"),
                c("Zombie Shambler", 0.5, 20, 20, 12, "Undead"),
                c("Kobold Scout", 0.25, 10, 12, 15, "Humanoid"),
                // CR 1-2
                c("Orc Warrior", 1.0, 40, 24, 17, "Humanoid"),
                c("Goblin Commando", 1.0, 40, 20, 17, "Humanoid"),
                c("Giant Spider", 1.0, 40, 26, 15, "Vermin"),
                c("Dire Wolf", 2.0, 60, 38, 16, "Animal"),
                c("Bugbear Thug", 2.0, 60, 36, 16, "Humanoid"),
                // CR 3-4
                c("Ogre Brute", 3.0, 80, 54, 17, "Giant"),
                c("Hell Hound", 3.0, 80, 40, 18, "Fiend"),
                c("Werewolf", 3.0, 80, 48, 17, "Humanoid"),
                c("Minotaur", 4.0, 120, 76, 17, "Monstrosity"),
                c("Ettin", 4.0, 120, 85, 16, "Giant"),
                // CR 5-6
                c("Troll", 5.0, 160, 95, 17, "Giant"),
                c("Young Dragon", 5.0, 160, 100, 20, "Dragon"),
                c("Hill Giant", 5.0, 160, 110, 17, "Giant"),
                c("Stone Golem", 6.0, 240, 125, 20, "Construct"),
                c("Wyvern", 6.0, 240, 95, 18, "Dragon"),
                // CR 7-8
                c("Chimera", 7.0, 320, 115, 17, "Monstrosity"),
                c("Frost Giant", 7.0, 320, 138, 18, "Giant"),
                c("Adult Dragon", 8.0, 480, 180, 22, "Dragon"),
                c("Demon Lord", 8.0, 480, 170, 19, "Fiend"),
                // Utility creatures
                c("Animated Armor", 1.0, 40, 30, 18, "Construct"),
                c("Ghoul", 1.0, 40, 22, 15, "Undead"),
                c("Shadow", 2.0, 60, 20, 14, "Undead"),
                c("Specter", 3.0, 80, 28, 13, "Undead"),
                c("Wraith", 4.0, 120, 45, 15, "Undead"),
                c("Vampire Spawn", 5.0, 160, 82, 16, "Undead"),
            ],
        }
    }

    /// Creatures whose challenge rating lies in `[min_cr, max_cr]`
    pub fn by_cr_range(&self, min_cr: f64, max_cr: f64) -> Vec<&Creature> {
        self.creatures
            .iter()
            .filter(|c| c.challenge_rating >= min_cr && c.challenge_rating <= max_cr)
            .collect()
    }

    /// Creatures whose XP cost lies in `[min_xp, max_xp]`
    pub fn by_xp_range(&self, min_xp: u32, max_xp: u32) -> Vec<&Creature> {
        self.creatures
            .iter()
            .filter(|c| c.xp >= min_xp && c.xp <= max_xp)
            .collect()
    }

    /// All creatures with the given category tag (case-insensitive)
    pub fn by_category(&self, category: &str) -> Vec<&Creature> {
        self.creatures
            .iter()
            .filter(|c| c.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Look up a creature by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Creature> {
        self.creatures
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Iterate over every creature
    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    /// Number of creatures in the catalog
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    /// True when the catalog holds no creatures
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}

impl Default for Bestiary {
    fn default() -> Self {
        Self::builtin()
    }
}
