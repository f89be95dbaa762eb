use chrono::{Days, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::generator::NumberSetGenerator;
use crate::models::{Draw, Issue, WINNING_COUNT};

/// Tirages simulés : numéros consécutifs en remontant depuis `latest_issue`,
/// un tirage par jour en remontant depuis `latest_date`.
#[derive(Debug, Clone)]
pub struct MockSource {
    seed: u64,
    latest_issue: Issue,
    latest_date: NaiveDate,
}

impl MockSource {
    pub fn new(seed: u64, latest_issue: Issue, latest_date: NaiveDate) -> Self {
        Self {
            seed,
            latest_issue,
            latest_date,
        }
    }
}

impl super::DrawSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_latest(&self, count: usize) -> Result<Vec<Draw>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let generator = NumberSetGenerator::new(None, WINNING_COUNT, 0)?;
        let mut draws = Vec::with_capacity(count);

        for i in 0..count as u64 {
            let (Some(issue), Some(date)) = (
                self.latest_issue.previous(i),
                self.latest_date.checked_sub_days(Days::new(i)),
            ) else {
                break;
            };
            let numbers = generator.generate(&mut rng)?;
            draws.push(Draw::new(issue, date, numbers.numbers())?);
        }

        Ok(draws)
    }
}
