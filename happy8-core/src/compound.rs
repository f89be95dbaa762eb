use crate::error::{Happy8Error, Result};
use crate::models::{Draw, NumberSet};
use crate::paytable::UNIT_STAKE;
use crate::scoring::{ScoringEngine, hit_count};

/// Plus grand jeu simple du Happy 8 (choix 10).
pub const MAX_PLAY: usize = 10;

/// Résultat d'une grille jouée en multiple : chaque combinaison de `play`
/// numéros parmi les `pick` de la grille est un ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundScore {
    pub pick: usize,
    pub play: usize,
    pub tickets: u64,
    pub stake: f64,
    pub hit_count: usize,
    /// (numéros trouvés, nombre de tickets), du meilleur au moins bon, sans les comptes nuls.
    pub breakdown: Vec<(usize, u64)>,
    pub prize: f64,
}

impl CompoundScore {
    pub fn net(&self) -> f64 {
        self.prize - self.stake
    }
}

pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
    }
    u64::try_from(acc).unwrap_or(u64::MAX)
}

impl ScoringEngine<'_> {
    pub fn score_compound(&self, set: &NumberSet, draw: &Draw, play: usize) -> Result<CompoundScore> {
        let pick = set.pick_size();
        if !(1..=MAX_PLAY).contains(&play) {
            return Err(Happy8Error::invalid(format!(
                "jeu choix {play} hors limites (1-{MAX_PLAY})"
            )));
        }
        if play > pick {
            return Err(Happy8Error::invalid(format!(
                "jeu choix {play} impossible avec une grille de {pick} numéros"
            )));
        }

        let hits = hit_count(set.numbers(), draw);
        let misses = pick - hits;

        let mut breakdown = Vec::new();
        let mut prize = 0.0;
        for j in (0..=play.min(hits)).rev() {
            if play - j > misses {
                continue;
            }
            let count = binomial(hits as u64, j as u64) * binomial(misses as u64, (play - j) as u64);
            if count == 0 {
                continue;
            }
            prize += count as f64 * self.prize(play, j);
            breakdown.push((j, count));
        }

        let tickets = binomial(pick as u64, play as u64);
        Ok(CompoundScore {
            pick,
            play,
            tickets,
            stake: tickets as f64 * UNIT_STAKE,
            hit_count: hits,
            breakdown,
            prize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::Paytable;
    use crate::source::fixture_draws;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(12, 9), 220);
        assert_eq!(binomial(10, 10), 1);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(80, 10), 1_646_492_110_120);
    }

    #[test]
    fn test_pick_nine_compound_with_eight_hits() {
        let table = Paytable::default();
        let engine = ScoringEngine::new(&table);
        let draw = &fixture_draws()[0];
        let set = NumberSet::new(&[3, 7, 16, 17, 18, 19, 23, 24, 1, 2, 4, 5], None).unwrap();

        let score = engine.score_compound(&set, draw, 9).unwrap();
        assert_eq!(score.tickets, 220);
        assert_eq!(score.stake, 440.0);
        assert_eq!(score.hit_count, 8);
        assert_eq!(score.breakdown, vec![(8, 4), (7, 48), (6, 112), (5, 56)]);
        // 4×2000 + 48×200 + 112×20 + 56×5
        assert_eq!(score.prize, 20_120.0);
        assert_eq!(score.net(), 19_680.0);
    }

    #[test]
    fn test_breakdown_sums_to_tickets() {
        let table = Paytable::default();
        let engine = ScoringEngine::new(&table);
        let draw = &fixture_draws()[1];
        let set = NumberSet::new(&[2, 4, 15, 19, 1, 3, 5, 6, 7, 8, 9, 10, 11, 12], None).unwrap();
        for play in 1..=10 {
            let score = engine.score_compound(&set, draw, play).unwrap();
            let total: u64 = score.breakdown.iter().map(|(_, c)| c).sum();
            assert_eq!(total, score.tickets, "jeu choix {play}");
        }
    }

    #[test]
    fn test_single_ticket_matches_simple_score() {
        let table = Paytable::default();
        let engine = ScoringEngine::new(&table);
        let draw = &fixture_draws()[0];
        let set = NumberSet::new(&[3, 7, 16, 17, 18, 19, 1, 2, 4, 5], None).unwrap();
        let compound = engine.score_compound(&set, draw, 10).unwrap();
        let simple = engine.score(&set, draw);
        assert_eq!(compound.tickets, 1);
        assert_eq!(compound.prize, simple.prize);
    }

    #[test]
    fn test_invalid_play() {
        let table = Paytable::default();
        let engine = ScoringEngine::new(&table);
        let draw = &fixture_draws()[0];
        let set = NumberSet::new(&[1, 2, 3, 4, 5], None).unwrap();
        assert!(engine.score_compound(&set, draw, 0).is_err());
        assert!(engine.score_compound(&set, draw, 6).is_err());
        assert!(engine.score_compound(&set, draw, 11).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_missing_play_in_paytable_pays_nothing() {
        let table = Paytable::empty();
        let engine = ScoringEngine::new(&table);
        let draw = &fixture_draws()[0];
        let set = NumberSet::new(&[3, 7, 16, 17, 18, 19, 23, 24, 1, 2, 4, 5], None).unwrap();
        let score = engine.score_compound(&set, draw, 9).unwrap();
        assert_eq!(score.prize, 0.0);
        assert_eq!(score.tickets, 220);
    }
}
