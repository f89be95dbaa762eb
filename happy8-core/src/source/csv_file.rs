use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};

use crate::error::{Happy8Error, Result};
use crate::models::{Draw, Issue, WINNING_COUNT};

/// Fichier `numéro;date;n1;...;n20` avec une ligne d'en-tête.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl super::DrawSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_latest(&self, count: usize) -> Result<Vec<Draw>> {
        let import = import_csv(&self.path)
            .map_err(|e| Happy8Error::upstream(format!("{} : {e}", self.path.display())))?;
        if import.draws.is_empty() {
            return Err(Happy8Error::upstream(format!(
                "aucun tirage valide dans {}",
                self.path.display()
            )));
        }
        let mut draws = import.draws;
        draws.truncate(count);
        Ok(draws)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| Happy8Error::invalid(format!("format de date invalide : '{raw}'")))
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| {
        record
            .get(idx)
            .map(str::trim)
            .ok_or_else(|| Happy8Error::invalid(format!("champ manquant à l'index {idx}")))
    };

    let issue = Issue::parse(get(0)?)?;
    let date = parse_date(get(1)?)?;

    let mut numbers = Vec::with_capacity(WINNING_COUNT);
    for idx in 2..2 + WINNING_COUNT {
        let s = get(idx)?;
        let n = s
            .parse::<u8>()
            .map_err(|_| Happy8Error::invalid(format!("impossible de lire '{s}' (index {idx})")))?;
        numbers.push(n);
    }

    Draw::new(issue, date, &numbers)
}

#[derive(Debug, Default)]
pub struct CsvImport {
    /// Du plus récent au plus ancien, un seul tirage par numéro.
    pub draws: Vec<Draw>,
    pub total_records: u32,
    pub duplicates: u32,
    pub errors: u32,
}

pub fn import_csv(path: &Path) -> Result<CsvImport> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)?;

    let mut result = CsvImport::default();
    let mut seen = HashSet::new();

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => {
                    if seen.insert(draw.issue().clone()) {
                        result.draws.push(draw);
                    } else {
                        result.duplicates += 1;
                    }
                }
                Err(e) => {
                    warn!("Erreur parsing ligne {} : {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                warn!("Erreur lecture ligne {} : {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    result.draws.sort_by(|a, b| b.issue().cmp(a.issue()));
    info!(
        "{} : {} tirages lus, {} doublons, {} erreurs",
        path.display(),
        result.draws.len(),
        result.duplicates,
        result.errors
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DrawSource;

    const HEADER: &str = "issue;date;n1;n2;n3;n4;n5;n6;n7;n8;n9;n10;n11;n12;n13;n14;n15;n16;n17;n18;n19;n20";

    fn write_csv(name: &str, rows: &[&str]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("happy8-{name}-{}.csv", std::process::id()));
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    const ROW_311: &str = "2025311;2025-11-21;2;4;15;19;23;24;29;34;37;43;44;55;56;60;62;66;70;73;77;79";
    const ROW_312: &str = "2025312;22/11/2025;80;79;72;67;62;57;48;43;37;30;29;26;24;23;19;18;17;16;7;3";

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-11-22").unwrap(), NaiveDate::from_ymd_opt(2025, 11, 22).unwrap());
        assert_eq!(parse_date("22/11/2025").unwrap(), NaiveDate::from_ymd_opt(2025, 11, 22).unwrap());
        assert!(parse_date("22.11.2025").is_err());
    }

    #[test]
    fn test_import_sorts_and_dedupes() {
        let path = write_csv("import", &[ROW_311, ROW_312, ROW_311]);
        let result = import_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(result.total_records, 3);
        assert_eq!(result.duplicates, 1);
        assert_eq!(result.errors, 0);
        assert_eq!(result.draws[0].issue().as_str(), "2025312");
        assert_eq!(result.draws[0].winning_numbers()[0], 3);
        assert_eq!(result.draws[1].issue().as_str(), "2025311");
    }

    #[test]
    fn test_import_counts_bad_rows() {
        let bad_count = "2025310;2025-11-20;1;2;3";
        let bad_number = "2025309;2025-11-19;1;2;3;4;5;6;7;8;9;10;11;12;13;14;15;16;17;18;19;81";
        let path = write_csv("bad", &[ROW_312, bad_count, bad_number]);
        let result = import_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(result.draws.len(), 1);
        assert_eq!(result.errors, 2);
    }

    #[test]
    fn test_csv_source_missing_file() {
        let source = CsvSource::new("/nonexistent/happy8.csv");
        let err = source.fetch_latest(5).unwrap_err();
        assert!(matches!(err, Happy8Error::UpstreamUnavailable(_)));
    }

    #[test]
    fn test_csv_source_empty_file() {
        let path = write_csv("empty", &[]);
        let err = CsvSource::new(&path).fetch_latest(5).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, Happy8Error::UpstreamUnavailable(_)));
    }

    #[test]
    fn test_csv_source_truncates() {
        let path = write_csv("truncate", &[ROW_311, ROW_312]);
        let draws = CsvSource::new(&path).fetch_latest(1).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].issue().as_str(), "2025312");
    }
}
