use std::time::{Duration, Instant};

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::error::{Happy8Error, Result};
use crate::models::{Draw, Issue};
use crate::source::{DrawSource, fixture_draws};

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub cache_ttl: Duration,
    /// Nombre de tirages demandés à la source à chaque rafraîchissement.
    pub fetch_count: usize,
    /// En cas d'échec de la source, servir les tirages de secours au lieu de l'erreur.
    pub fallback_to_fixtures: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            fetch_count: 30,
            fallback_to_fixtures: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_cached: usize,
    pub last_update: Option<Instant>,
    pub cache_valid: bool,
}

/// Accès aux derniers tirages, avec un cache en mémoire de durée limitée.
pub struct DrawService<S> {
    source: S,
    config: ServiceConfig,
    cache: Vec<Draw>,
    last_update: Option<Instant>,
    clock: Box<dyn Fn() -> Instant>,
}

impl<S: DrawSource> DrawService<S> {
    pub fn new(source: S, config: ServiceConfig) -> Self {
        Self::with_clock(source, config, Instant::now)
    }

    pub fn with_clock(source: S, config: ServiceConfig, clock: impl Fn() -> Instant + 'static) -> Self {
        Self {
            source,
            config,
            cache: Vec::new(),
            last_update: None,
            clock: Box::new(clock),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    fn is_cache_valid(&self) -> bool {
        if self.cache.is_empty() {
            return false;
        }
        let now = (self.clock)();
        self.last_update
            .is_some_and(|t| now.saturating_duration_since(t) < self.config.cache_ttl)
    }

    /// Les `count` derniers tirages, du plus récent au plus ancien.
    pub fn latest_results(&mut self, count: usize) -> Result<Vec<Draw>> {
        if self.is_cache_valid() {
            debug!("Utilisation du cache ({} tirages)", self.cache.len());
            return Ok(self.cache.iter().take(count).cloned().collect());
        }

        let wanted = self.config.fetch_count.max(count);
        match self.source.fetch_latest(wanted) {
            Ok(draws) if !draws.is_empty() => {
                info!("{} tirages récupérés depuis {}", draws.len(), self.source.name());
                self.cache = draws;
                self.last_update = Some((self.clock)());
                Ok(self.cache.iter().take(count).cloned().collect())
            }
            Ok(_) => {
                let err = Happy8Error::upstream(format!("{} n'a renvoyé aucun tirage", self.source.name()));
                self.fallback(count, err)
            }
            Err(e) => self.fallback(count, e),
        }
    }

    fn fallback(&self, count: usize, err: Happy8Error) -> Result<Vec<Draw>> {
        if !self.config.fallback_to_fixtures {
            return Err(err);
        }
        warn!("Échec de la source {} ({err}), utilisation des tirages de secours", self.source.name());
        let mut draws = fixture_draws();
        draws.truncate(count);
        Ok(draws)
    }

    pub fn latest_result(&mut self) -> Result<Draw> {
        self.latest_results(1)?
            .into_iter()
            .next()
            .ok_or_else(|| Happy8Error::upstream("aucun tirage disponible"))
    }

    pub fn result_by_issue(&mut self, issue: &Issue) -> Result<Option<Draw>> {
        let draws = self.latest_results(self.config.fetch_count)?;
        Ok(draws.into_iter().find(|d| d.issue() == issue))
    }

    /// Tirages dont la date est dans [start, end].
    pub fn results_by_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Draw>> {
        let draws = self.latest_results(self.config.fetch_count)?;
        Ok(draws
            .into_iter()
            .filter(|d| d.date() >= start && d.date() <= end)
            .collect())
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.last_update = None;
        debug!("Cache vidé");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_cached: self.cache.len(),
            last_update: self.last_update,
            cache_valid: self.is_cache_valid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::source::FixtureSource;

    struct CountingSource {
        calls: Rc<Cell<usize>>,
    }

    impl DrawSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch_latest(&self, count: usize) -> Result<Vec<Draw>> {
            self.calls.set(self.calls.get() + 1);
            FixtureSource.fetch_latest(count)
        }
    }

    struct FailingSource;

    impl DrawSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch_latest(&self, _count: usize) -> Result<Vec<Draw>> {
            Err(Happy8Error::upstream("HTTP 503"))
        }
    }

    struct EmptySource;

    impl DrawSource for EmptySource {
        fn name(&self) -> &str {
            "empty"
        }

        fn fetch_latest(&self, _count: usize) -> Result<Vec<Draw>> {
            Ok(Vec::new())
        }
    }

    fn counting_service() -> (DrawService<CountingSource>, Rc<Cell<usize>>, Rc<Cell<Instant>>) {
        let calls = Rc::new(Cell::new(0));
        let now = Rc::new(Cell::new(Instant::now()));
        let clock = Rc::clone(&now);
        let service = DrawService::with_clock(
            CountingSource { calls: Rc::clone(&calls) },
            ServiceConfig::default(),
            move || clock.get(),
        );
        (service, calls, now)
    }

    #[test]
    fn test_cache_reused_within_ttl() {
        let (mut service, calls, now) = counting_service();
        assert_eq!(service.latest_results(5).unwrap().len(), 5);
        now.set(now.get() + Duration::from_secs(3599));
        assert_eq!(service.latest_results(2).unwrap().len(), 2);
        assert_eq!(calls.get(), 1);
        assert!(service.stats().cache_valid);
        assert_eq!(service.stats().total_cached, 10);
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let (mut service, calls, now) = counting_service();
        service.latest_results(5).unwrap();
        now.set(now.get() + Duration::from_secs(3600));
        assert!(!service.stats().cache_valid);
        service.latest_results(5).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_clear_cache_forces_fetch() {
        let (mut service, calls, _now) = counting_service();
        service.latest_result().unwrap();
        service.clear_cache();
        assert_eq!(service.stats(), CacheStats { total_cached: 0, last_update: None, cache_valid: false });
        service.latest_result().unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_fallback_to_fixtures() {
        let mut service = DrawService::new(FailingSource, ServiceConfig::default());
        let draw = service.latest_result().unwrap();
        assert_eq!(draw.issue().as_str(), "2025312");
        assert_eq!(service.stats().total_cached, 0);
    }

    #[test]
    fn test_upstream_error_without_fallback() {
        let config = ServiceConfig {
            fallback_to_fixtures: false,
            ..ServiceConfig::default()
        };
        let mut service = DrawService::new(FailingSource, config.clone());
        assert!(matches!(service.latest_result(), Err(Happy8Error::UpstreamUnavailable(_))));

        let mut service = DrawService::new(EmptySource, config);
        assert!(matches!(service.latest_results(3), Err(Happy8Error::UpstreamUnavailable(_))));
    }

    #[test]
    fn test_result_by_issue() {
        let mut service = DrawService::new(FixtureSource, ServiceConfig::default());
        let found = service.result_by_issue(&Issue::parse("2025308").unwrap()).unwrap();
        assert_eq!(found.unwrap().date(), NaiveDate::from_ymd_opt(2025, 11, 18).unwrap());
        assert!(service.result_by_issue(&Issue::parse("1").unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_results_by_date_range() {
        let mut service = DrawService::new(FixtureSource, ServiceConfig::default());
        let draws = service
            .results_by_date_range(
                NaiveDate::from_ymd_opt(2025, 11, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 11, 17).unwrap(),
            )
            .unwrap();
        let issues: Vec<&str> = draws.iter().map(|d| d.issue().as_str()).collect();
        assert_eq!(issues, vec!["2025307", "2025306", "2025305"]);
    }
}
