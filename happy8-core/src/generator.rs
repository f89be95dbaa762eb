use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Happy8Error, Result};
use crate::models::{Draw, Issue, MAX_NUMBER, MIN_NUMBER, NumberSet, POOL_SIZE, WINNING_COUNT};

/// Au-delà de cette taille, le tirage par rejet est remplacé par un élagage du complément.
pub const COMPLEMENT_THRESHOLD: usize = 60;

pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Génère des grilles de `pick` numéros dont `seeded` sont repris du tirage de référence.
///
/// Les numéros imposés sont les `seeded` plus petits numéros gagnants. Le reste est tiré
/// au hasard hors des numéros gagnants de la référence.
#[derive(Debug, Clone)]
pub struct NumberSetGenerator<'a> {
    reference: Option<&'a Draw>,
    pick: usize,
    seeded: usize,
    target_issue: Option<Issue>,
}

impl<'a> NumberSetGenerator<'a> {
    pub fn new(reference: Option<&'a Draw>, pick: usize, seeded: usize) -> Result<Self> {
        if !(1..=POOL_SIZE).contains(&pick) {
            return Err(Happy8Error::invalid(format!(
                "taille de grille {pick} hors limites (1-{POOL_SIZE})"
            )));
        }
        if seeded > pick {
            return Err(Happy8Error::invalid(format!(
                "{seeded} numéros imposés pour une grille de {pick}"
            )));
        }
        if seeded > WINNING_COUNT {
            return Err(Happy8Error::invalid(format!(
                "{seeded} numéros imposés, un tirage n'en compte que {WINNING_COUNT}"
            )));
        }
        if seeded > 0 && reference.is_none() {
            return Err(Happy8Error::invalid(format!(
                "un tirage de référence est requis pour imposer {seeded} numéros"
            )));
        }
        Ok(Self {
            reference,
            pick,
            seeded,
            target_issue: reference.map(|d| d.issue().clone()),
        })
    }

    /// Tirage visé par les grilles (par défaut celui de la référence).
    pub fn for_issue(mut self, issue: Issue) -> Self {
        self.target_issue = Some(issue);
        self
    }

    pub fn pick(&self) -> usize {
        self.pick
    }

    pub fn seeded(&self) -> usize {
        self.seeded
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<NumberSet> {
        let mut taken = [false; POOL_SIZE + 1];
        let mut numbers = Vec::with_capacity(self.pick);

        if let Some(draw) = self.reference {
            for &n in draw.winning_numbers().iter().take(self.seeded) {
                taken[n as usize] = true;
                numbers.push(n);
            }
        }

        let reference = self.reference;
        let excluded = |n: u8| reference.is_some_and(|d| d.contains(n));
        let missing = self.pick - numbers.len();

        if self.pick < COMPLEMENT_THRESHOLD {
            while numbers.len() < self.pick {
                let n = rng.random_range(MIN_NUMBER..=MAX_NUMBER);
                if taken[n as usize] || excluded(n) {
                    continue;
                }
                taken[n as usize] = true;
                numbers.push(n);
            }
        } else {
            let primary: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER)
                .filter(|&n| !taken[n as usize] && !excluded(n))
                .collect();
            if missing <= primary.len() {
                numbers.extend(thin_out(primary, missing, rng));
            } else {
                // Plus assez de numéros perdants : on complète avec les gagnants non imposés
                let secondary: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER)
                    .filter(|&n| !taken[n as usize] && excluded(n))
                    .collect();
                let extra = missing - primary.len();
                debug!("grille de {} : {extra} numéros gagnants supplémentaires", self.pick);
                numbers.extend(primary);
                numbers.extend(thin_out(secondary, extra, rng));
            }
        }

        NumberSet::new(&numbers, self.target_issue.clone())
    }

    pub fn generate_many<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<NumberSet>> {
        (0..count).map(|_| self.generate(&mut *rng)).collect()
    }
}

/// Retire des éléments au hasard jusqu'à n'en garder que `keep`.
fn thin_out<R: Rng + ?Sized>(mut pool: Vec<u8>, keep: usize, rng: &mut R) -> Vec<u8> {
    while pool.len() > keep {
        let idx = rng.random_range(0..pool.len());
        pool.swap_remove(idx);
    }
    pool
}
