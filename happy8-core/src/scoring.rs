use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::models::{Draw, NumberSet, ScoreResult, ScoredPrediction};
use crate::paytable::Paytable;

/// Nombre de numéros de `numbers` présents parmi les numéros gagnants.
pub fn hit_count(numbers: &[u8], draw: &Draw) -> usize {
    numbers.iter().filter(|&&n| draw.contains(n)).count()
}

#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'a> {
    paytable: &'a Paytable,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(paytable: &'a Paytable) -> Self {
        Self { paytable }
    }

    pub fn paytable(&self) -> &'a Paytable {
        self.paytable
    }

    /// Gain pour une taille de grille absente du barème : 0, jamais une erreur.
    pub fn prize(&self, pick: usize, hits: usize) -> f64 {
        match self.paytable.prize_for(pick, hits) {
            Some(prize) => prize,
            None => {
                debug!("barème sans grille de {pick}, gain ramené à 0");
                0.0
            }
        }
    }

    pub fn score(&self, set: &NumberSet, draw: &Draw) -> ScoreResult {
        let hits = hit_count(set.numbers(), draw);
        ScoreResult {
            hit_count: hits,
            prize: self.prize(set.pick_size(), hits),
        }
    }

    /// Comme `score`, pour des numéros bruts saisis par l'appelant.
    pub fn score_numbers(&self, numbers: &[u8], draw: &Draw) -> Result<ScoreResult> {
        let set = NumberSet::new(numbers, Some(draw.issue().clone()))?;
        Ok(self.score(&set, draw))
    }

    /// Un résultat par paire, dans l'ordre de l'historique.
    pub fn score_history(&self, history: &[(NumberSet, Draw)]) -> Vec<ScoreResult> {
        history
            .par_iter()
            .map(|(set, draw)| self.score(set, draw))
            .collect()
    }

    pub fn backfill(&self, history: &[(NumberSet, Draw)]) -> Vec<ScoredPrediction> {
        history
            .par_iter()
            .map(|(set, draw)| ScoredPrediction {
                issue: draw.issue().clone(),
                set: set.clone(),
                result: self.score(set, draw),
            })
            .collect()
    }
}
