use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Happy8Error, Result};
use crate::models::POOL_SIZE;

/// Mise d'un ticket simple.
pub const UNIT_STAKE: f64 = 2.0;

/// Barème des gains : taille de grille -> (numéros trouvés -> gain).
///
/// Sérialisé en JSON sous la forme `{"10": {"10": 5000000.0, "9": 8000.0}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paytable {
    tiers: BTreeMap<u8, BTreeMap<u8, f64>>,
}

impl Default for Paytable {
    /// Barème officiel du Happy 8 pour une mise de 2, gros lots flottants ramenés à leur plafond.
    fn default() -> Self {
        let table: &[(u8, &[(u8, f64)])] = &[
            (1, &[(1, 4.6)]),
            (2, &[(2, 19.0)]),
            (3, &[(3, 53.0), (2, 3.0)]),
            (4, &[(4, 100.0), (3, 5.0), (2, 3.0)]),
            (5, &[(5, 1_000.0), (4, 21.0), (3, 3.0)]),
            (6, &[(6, 3_000.0), (5, 30.0), (4, 10.0), (3, 3.0)]),
            (7, &[(7, 10_000.0), (6, 288.0), (5, 28.0), (4, 4.0), (0, 2.0)]),
            (8, &[(8, 50_000.0), (7, 800.0), (6, 88.0), (5, 10.0), (4, 3.0), (0, 2.0)]),
            (9, &[(9, 300_000.0), (8, 2_000.0), (7, 200.0), (6, 20.0), (5, 5.0), (4, 3.0), (0, 2.0)]),
            (10, &[(10, 5_000_000.0), (9, 8_000.0), (8, 720.0), (7, 80.0), (6, 5.0), (5, 3.0), (0, 2.0)]),
        ];

        let tiers = table
            .iter()
            .map(|(pick, prizes)| (*pick, prizes.iter().copied().collect()))
            .collect();
        Self { tiers }
    }
}

impl Paytable {
    pub fn empty() -> Self {
        Self { tiers: BTreeMap::new() }
    }

    pub fn insert(&mut self, pick: u8, hits: u8, prize: f64) -> Result<()> {
        check_entry(pick, hits, prize)?;
        self.tiers.entry(pick).or_default().insert(hits, prize);
        Ok(())
    }

    pub fn supports(&self, pick: usize) -> bool {
        u8::try_from(pick).is_ok_and(|p| self.tiers.contains_key(&p))
    }

    /// `None` si la taille de grille est absente du barème ; un nombre de numéros
    /// trouvés non listé pour une taille connue ne gagne rien.
    pub fn prize_for(&self, pick: usize, hits: usize) -> Option<f64> {
        let pick = u8::try_from(pick).ok()?;
        let prizes = self.tiers.get(&pick)?;
        let prize = u8::try_from(hits)
            .ok()
            .and_then(|h| prizes.get(&h).copied())
            .unwrap_or(0.0);
        Some(prize)
    }

    pub fn picks(&self) -> impl Iterator<Item = u8> + '_ {
        self.tiers.keys().copied()
    }

    /// Gains d'une taille de grille, du plus grand nombre de numéros trouvés au plus petit.
    pub fn tiers_for(&self, pick: u8) -> Vec<(u8, f64)> {
        self.tiers
            .get(&pick)
            .map(|prizes| prizes.iter().rev().map(|(&h, &p)| (h, p)).collect())
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        for (&pick, prizes) in &self.tiers {
            for (&hits, &prize) in prizes {
                check_entry(pick, hits, prize)?;
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let table: Paytable = serde_json::from_str(&json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn check_entry(pick: u8, hits: u8, prize: f64) -> Result<()> {
    if pick == 0 || pick as usize > POOL_SIZE {
        return Err(Happy8Error::invalid(format!("taille de grille {pick} hors limites")));
    }
    if hits > pick {
        return Err(Happy8Error::invalid(format!(
            "{hits} numéros trouvés impossible pour une grille de {pick}"
        )));
    }
    if !prize.is_finite() || prize < 0.0 {
        return Err(Happy8Error::invalid(format!(
            "gain {prize} invalide (grille {pick}, {hits} trouvés)"
        )));
    }
    Ok(())
}
