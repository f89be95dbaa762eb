use crate::models::ScoredPrediction;

/// Statistiques d'un historique de grilles (fiche d'un pronostiqueur).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistorySummary {
    pub draws: usize,
    pub wins: usize,
    /// En pourcentage.
    pub win_rate: f64,
    pub total_prize: f64,
    pub best_hit: usize,
}

impl HistorySummary {
    pub fn from_history(history: &[ScoredPrediction]) -> Self {
        if history.is_empty() {
            return Self::default();
        }
        let wins = history.iter().filter(|p| p.result.prize > 0.0).count();
        Self {
            draws: history.len(),
            wins,
            win_rate: wins as f64 * 100.0 / history.len() as f64,
            total_prize: history.iter().map(|p| p.result.prize).sum(),
            best_hit: history.iter().map(|p| p.result.hit_count).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, NumberSet, ScoreResult};

    fn row(hit_count: usize, prize: f64) -> ScoredPrediction {
        ScoredPrediction {
            issue: Issue::from_number(1),
            set: NumberSet::new(&[1, 2, 3], None).unwrap(),
            result: ScoreResult { hit_count, prize },
        }
    }

    #[test]
    fn test_empty_history() {
        let summary = HistorySummary::from_history(&[]);
        assert_eq!(summary.draws, 0);
        assert_eq!(summary.win_rate, 0.0);
    }

    #[test]
    fn test_summary() {
        let history = vec![row(8, 720.0), row(3, 0.0), row(6, 5.0), row(4, 0.0)];
        let summary = HistorySummary::from_history(&history);
        assert_eq!(summary.draws, 4);
        assert_eq!(summary.wins, 2);
        assert!((summary.win_rate - 50.0).abs() < 1e-10);
        assert_eq!(summary.total_prize, 725.0);
        assert_eq!(summary.best_hit, 8);
    }
}
