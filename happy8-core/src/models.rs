use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{Happy8Error, Result};

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 80;
pub const POOL_SIZE: usize = 80;
pub const WINNING_COUNT: usize = 20;

const MAX_ISSUE_DIGITS: usize = 18;

/// Numéro de tirage (ex: "2025312"), comparé comme un entier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Issue {
    text: String,
    value: u64,
}

impl Issue {
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(Happy8Error::invalid("numéro de tirage vide"));
        }
        if text.len() > MAX_ISSUE_DIGITS || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Happy8Error::invalid(format!("numéro de tirage invalide : '{text}'")));
        }
        let value = text
            .parse::<u64>()
            .map_err(|e| Happy8Error::invalid(format!("numéro de tirage '{text}' : {e}")))?;
        Ok(Self { text: text.to_string(), value })
    }

    pub fn from_number(value: u64) -> Self {
        Self { text: value.to_string(), value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Tirage `n` rangs plus tôt, `None` si on passe sous zéro.
    pub fn previous(&self, n: u64) -> Option<Self> {
        self.value.checked_sub(n).map(Self::from_number)
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Issue {
    type Err = Happy8Error;

    fn from_str(s: &str) -> Result<Self> {
        Issue::parse(s)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Vérifie que les numéros sont distincts et dans [1, 80].
pub fn validate_numbers(numbers: &[u8]) -> Result<()> {
    if numbers.is_empty() {
        return Err(Happy8Error::invalid("aucun numéro fourni"));
    }
    if numbers.len() > POOL_SIZE {
        return Err(Happy8Error::invalid(format!(
            "{} numéros fournis, maximum {}",
            numbers.len(),
            POOL_SIZE
        )));
    }
    let mut seen = [false; POOL_SIZE + 1];
    for &n in numbers {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
            return Err(Happy8Error::invalid(format!(
                "numéro {n} hors limites ({MIN_NUMBER}-{MAX_NUMBER})"
            )));
        }
        if seen[n as usize] {
            return Err(Happy8Error::invalid(format!("numéro en double : {n}")));
        }
        seen[n as usize] = true;
    }
    Ok(())
}

pub fn validate_draw(numbers: &[u8]) -> Result<()> {
    if numbers.len() != WINNING_COUNT {
        return Err(Happy8Error::invalid(format!(
            "un tirage compte {WINNING_COUNT} numéros, reçu {}",
            numbers.len()
        )));
    }
    validate_numbers(numbers)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    issue: Issue,
    date: NaiveDate,
    winning_numbers: [u8; WINNING_COUNT],
}

impl Draw {
    pub fn new(issue: Issue, date: NaiveDate, numbers: &[u8]) -> Result<Self> {
        validate_draw(numbers)?;
        let mut winning_numbers = [0u8; WINNING_COUNT];
        winning_numbers.copy_from_slice(numbers);
        winning_numbers.sort_unstable();
        Ok(Self {
            issue,
            date,
            winning_numbers,
        })
    }

    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Numéros gagnants, triés par ordre croissant.
    pub fn winning_numbers(&self) -> &[u8] {
        &self.winning_numbers
    }

    pub fn contains(&self, number: u8) -> bool {
        self.winning_numbers.binary_search(&number).is_ok()
    }
}

/// Grille de K numéros distincts triés, proposée pour un tirage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberSet {
    numbers: Vec<u8>,
    source_issue: Option<Issue>,
}

impl NumberSet {
    pub fn new(numbers: &[u8], source_issue: Option<Issue>) -> Result<Self> {
        validate_numbers(numbers)?;
        let mut numbers = numbers.to_vec();
        numbers.sort_unstable();
        Ok(Self {
            numbers,
            source_issue,
        })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn pick_size(&self) -> usize {
        self.numbers.len()
    }

    pub fn source_issue(&self) -> Option<&Issue> {
        self.source_issue.as_ref()
    }

    pub fn hits(&self, draw: &Draw) -> usize {
        self.numbers.iter().filter(|&&n| draw.contains(n)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub hit_count: usize,
    pub prize: f64,
}

/// Ligne d'historique : une grille et son résultat contre le tirage `issue`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPrediction {
    pub issue: Issue,
    pub set: NumberSet,
    pub result: ScoreResult,
}
