pub mod csv_file;
pub mod mock;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Draw, Issue, WINNING_COUNT};

pub use self::csv_file::{CsvImport, CsvSource, import_csv};
pub use self::mock::MockSource;

/// Fournisseur de tirages. Les tirages sont rendus du plus récent au plus ancien.
pub trait DrawSource {
    fn name(&self) -> &str;
    fn fetch_latest(&self, count: usize) -> Result<Vec<Draw>>;
}

impl<S: DrawSource + ?Sized> DrawSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_latest(&self, count: usize) -> Result<Vec<Draw>> {
        (**self).fetch_latest(count)
    }
}

const FIXTURES: [(&str, (i32, u32, u32), [u8; WINNING_COUNT]); 10] = [
    ("2025312", (2025, 11, 22), [3, 7, 16, 17, 18, 19, 23, 24, 26, 29, 30, 37, 43, 48, 57, 62, 67, 72, 79, 80]),
    ("2025311", (2025, 11, 21), [2, 4, 15, 19, 23, 24, 29, 34, 37, 43, 44, 55, 56, 60, 62, 66, 70, 73, 77, 79]),
    ("2025310", (2025, 11, 20), [1, 6, 7, 11, 14, 15, 18, 28, 30, 31, 35, 48, 55, 59, 61, 65, 67, 69, 70, 76]),
    ("2025309", (2025, 11, 19), [9, 19, 20, 21, 23, 30, 38, 39, 40, 41, 44, 48, 53, 54, 58, 60, 61, 65, 68, 72]),
    ("2025308", (2025, 11, 18), [5, 7, 8, 11, 16, 17, 21, 25, 29, 36, 37, 39, 41, 42, 46, 53, 59, 62, 75, 77]),
    ("2025307", (2025, 11, 17), [3, 6, 12, 13, 14, 16, 26, 27, 41, 42, 45, 49, 52, 55, 63, 66, 72, 75, 79, 80]),
    ("2025306", (2025, 11, 16), [3, 6, 7, 14, 17, 20, 21, 31, 32, 36, 44, 47, 48, 51, 52, 55, 61, 70, 76, 77]),
    ("2025305", (2025, 11, 15), [1, 8, 9, 10, 15, 18, 21, 27, 32, 40, 41, 43, 46, 47, 50, 54, 56, 60, 67, 74]),
    ("2025304", (2025, 11, 14), [1, 6, 17, 19, 21, 30, 31, 32, 33, 35, 42, 49, 50, 52, 59, 65, 66, 68, 75, 78]),
    ("2025303", (2025, 11, 13), [1, 2, 10, 11, 15, 25, 33, 43, 44, 50, 52, 54, 55, 56, 57, 60, 62, 69, 74, 78]),
];

/// Tirages de secours 2025312 à 2025303, du plus récent au plus ancien.
pub fn fixture_draws() -> Vec<Draw> {
    FIXTURES
        .iter()
        .filter_map(|(issue, (y, m, d), numbers)| {
            let issue = Issue::parse(issue).ok()?;
            let date = NaiveDate::from_ymd_opt(*y, *m, *d)?;
            Draw::new(issue, date, numbers).ok()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

impl DrawSource for FixtureSource {
    fn name(&self) -> &str {
        "fixtures"
    }

    fn fetch_latest(&self, count: usize) -> Result<Vec<Draw>> {
        let mut draws = fixture_draws();
        draws.truncate(count);
        Ok(draws)
    }
}
