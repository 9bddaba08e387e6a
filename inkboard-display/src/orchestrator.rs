//! Screen rotation
//!
//! Owns the ordered list of enabled screens and the cursor over them. One
//! caller drives the rotation: render the current screen, wait the refresh
//! interval, advance. Data flows through the cache so a tick that lands
//! inside a screen's TTL costs no external call.

use std::time::Duration;

use inkboard_cache::{CacheStats, CacheStore};
use inkboard_core::{ConfigError, Screen, ScreenData, SourceConfig, SourceKind, TickerResult};
use inkboard_sources::DataSource;
use tracing::{debug, info, warn};

use crate::screen;

struct Slot {
    config: SourceConfig,
    source: Box<dyn DataSource>,
}

/// Rotation over the configured screens, backed by one shared cache.
///
/// Disabled sources are dropped at construction, so the advance step is a
/// plain modulo over what remains and every position maps to a screen that
/// can actually render.
pub struct ScreenOrchestrator {
    slots: Vec<Slot>,
    cache: CacheStore<ScreenData>,
    position: usize,
}

impl ScreenOrchestrator {
    /// Build the rotation from configured sources.
    ///
    /// # Errors
    /// [`ConfigError::EmptyRotation`] when no source is enabled.
    pub fn new(sources: Vec<(SourceConfig, Box<dyn DataSource>)>) -> TickerResult<Self> {
        let mut slots: Vec<Slot> = sources
            .into_iter()
            .filter_map(|(config, source)| {
                if config.enabled {
                    Some(Slot { config, source })
                } else {
                    info!(source = %config.kind, "Source disabled, excluded from rotation");
                    None
                }
            })
            .collect();

        if slots.is_empty() {
            return Err(ConfigError::EmptyRotation.into());
        }

        slots.sort_by_key(|slot| slot.config.ordering_position);
        let order: Vec<&str> = slots.iter().map(|s| s.config.kind.as_str()).collect();
        info!(screens = ?order, "Screen rotation ready");

        Ok(Self {
            slots,
            cache: CacheStore::new(),
            position: 0,
        })
    }

    /// Render the screen at the current position.
    ///
    /// Serves from cache within the screen's TTL, refetches past it, falls
    /// back to the stale entry when the refetch fails, and degrades to a
    /// placeholder screen when the source is down with nothing cached. The
    /// rotation itself never fails.
    pub async fn render_current(&self) -> Screen {
        let slot = &self.slots[self.position];
        let kind = slot.config.kind;

        match self
            .cache
            .get_or_fetch(kind.as_str(), slot.config.ttl, slot.source.as_ref())
            .await
        {
            Ok(read) => {
                let is_stale = !read.is_fresh();
                screen::compose(kind, read.value(), is_stale)
            }
            Err(err) => {
                warn!(source = %kind, error = %err, "Source unavailable, showing placeholder");
                screen::placeholder(kind)
            }
        }
    }

    /// Move the cursor to the next screen, wrapping at the end.
    pub fn advance(&mut self) {
        self.position = (self.position + 1) % self.slots.len();
        debug!(
            position = self.position,
            screen = %self.current_kind(),
            "Advanced rotation"
        );
    }

    /// Drop a source's cache entry so the next render refetches it.
    pub fn refresh(&self, kind: SourceKind) {
        self.cache.invalidate(kind.as_str());
    }

    /// The source the cursor currently points at.
    pub fn current_kind(&self) -> SourceKind {
        self.slots[self.position].config.kind
    }

    /// TTL of the screen at the current position.
    pub fn current_ttl(&self) -> Duration {
        self.slots[self.position].config.ttl
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of screens in the rotation.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of the shared cache's entry counts.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop cache entries past their TTL.
    pub fn cleanup_cache(&self) -> usize {
        self.cache.cleanup_expired()
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &CacheStore<ScreenData> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use inkboard_core::{FetchError, RateBoard, RatePair, TickerError};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedSource {
        kind: SourceKind,
        calls: Arc<AtomicUsize>,
        failing: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        fn new(kind: SourceKind) -> (Self, Arc<AtomicUsize>, Arc<AtomicBool>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let failing = Arc::new(AtomicBool::new(false));
            (
                Self {
                    kind,
                    calls: calls.clone(),
                    failing: failing.clone(),
                },
                calls,
                failing,
            )
        }
    }

    #[async_trait]
    impl DataSource for ScriptedSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch(&self) -> TickerResult<ScreenData> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(FetchError::Unreachable {
                    kind: self.kind,
                    reason: "connection refused".to_string(),
                }
                .into());
            }
            Ok(ScreenData::Rates(RateBoard {
                provider: "scripted".to_string(),
                pairs: vec![RatePair {
                    symbol: format!("{}/{}", self.kind, call),
                    rate: 1.0,
                    change_24h: None,
                }],
            }))
        }
    }

    fn config(kind: SourceKind, enabled: bool, position: u32) -> SourceConfig {
        SourceConfig {
            kind,
            enabled,
            ttl: Duration::from_secs(60),
            ordering_position: position,
        }
    }

    fn slot(
        kind: SourceKind,
        enabled: bool,
        position: u32,
    ) -> (SourceConfig, Box<dyn DataSource>) {
        let (source, _, _) = ScriptedSource::new(kind);
        (config(kind, enabled, position), Box::new(source))
    }

    #[test]
    fn test_rotation_is_cyclic_over_enabled_sources() {
        let mut orchestrator = ScreenOrchestrator::new(vec![
            slot(SourceKind::Weather, true, 0),
            slot(SourceKind::Currency, true, 1),
            slot(SourceKind::Crypto, true, 2),
        ])
        .unwrap();

        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(orchestrator.current_kind());
            orchestrator.advance();
        }
        assert_eq!(
            seen,
            vec![
                SourceKind::Weather,
                SourceKind::Currency,
                SourceKind::Crypto,
                SourceKind::Weather,
                SourceKind::Currency,
                SourceKind::Crypto,
            ]
        );
        assert_eq!(orchestrator.position(), 0);
    }

    #[test]
    fn test_disabled_sources_never_enter_rotation() {
        let mut orchestrator = ScreenOrchestrator::new(vec![
            slot(SourceKind::Weather, true, 0),
            slot(SourceKind::Currency, false, 1),
            slot(SourceKind::Crypto, true, 2),
        ])
        .unwrap();

        assert_eq!(orchestrator.len(), 2);
        for _ in 0..8 {
            assert_ne!(orchestrator.current_kind(), SourceKind::Currency);
            orchestrator.advance();
        }
    }

    #[test]
    fn test_ordering_position_controls_sequence() {
        let orchestrator = ScreenOrchestrator::new(vec![
            slot(SourceKind::Crypto, true, 0),
            slot(SourceKind::Weather, true, 1),
        ])
        .unwrap();
        assert_eq!(orchestrator.current_kind(), SourceKind::Crypto);
    }

    #[test]
    fn test_empty_rotation_is_rejected() {
        let err = ScreenOrchestrator::new(vec![slot(SourceKind::Weather, false, 0)])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            TickerError::Config(ConfigError::EmptyRotation)
        ));

        let err = ScreenOrchestrator::new(Vec::new()).err().unwrap();
        assert!(matches!(
            err,
            TickerError::Config(ConfigError::EmptyRotation)
        ));
    }

    #[tokio::test]
    async fn test_render_within_ttl_reuses_cached_data() {
        let (source, calls, _) = ScriptedSource::new(SourceKind::Crypto);
        let orchestrator = ScreenOrchestrator::new(vec![(
            config(SourceKind::Crypto, true, 0),
            Box::new(source) as Box<dyn DataSource>,
        )])
        .unwrap();

        let first = orchestrator.render_current().await;
        let second = orchestrator.render_current().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.lines, second.lines);
        assert!(!second.is_stale);
    }

    #[tokio::test]
    async fn test_render_falls_back_to_stale_on_outage() {
        let (source, calls, failing) = ScriptedSource::new(SourceKind::Crypto);
        let orchestrator = ScreenOrchestrator::new(vec![(
            config(SourceKind::Crypto, true, 0),
            Box::new(source) as Box<dyn DataSource>,
        )])
        .unwrap();

        let fresh = orchestrator.render_current().await;
        assert!(!fresh.is_stale);

        orchestrator
            .cache()
            .backdate("crypto", Duration::from_secs(300));
        failing.store(true, Ordering::SeqCst);

        let stale = orchestrator.render_current().await;
        assert!(stale.is_stale);
        assert_eq!(stale.lines, fresh.lines);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_render_degrades_to_placeholder_without_cache() {
        let (source, _, failing) = ScriptedSource::new(SourceKind::Weather);
        failing.store(true, Ordering::SeqCst);
        let orchestrator = ScreenOrchestrator::new(vec![(
            config(SourceKind::Weather, true, 0),
            Box::new(source) as Box<dyn DataSource>,
        )])
        .unwrap();

        let screen = orchestrator.render_current().await;
        assert_eq!(screen.lines, vec!["weather: data unavailable".to_string()]);
        assert!(!screen.is_stale);
    }

    #[tokio::test]
    async fn test_refresh_forces_refetch() {
        let (source, calls, _) = ScriptedSource::new(SourceKind::Currency);
        let orchestrator = ScreenOrchestrator::new(vec![(
            config(SourceKind::Currency, true, 0),
            Box::new(source) as Box<dyn DataSource>,
        )])
        .unwrap();

        orchestrator.render_current().await;
        orchestrator.refresh(SourceKind::Currency);
        orchestrator.render_current().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sources_fail_independently() {
        let (weather, _, _) = ScriptedSource::new(SourceKind::Weather);
        let (crypto, _, crypto_failing) = ScriptedSource::new(SourceKind::Crypto);
        crypto_failing.store(true, Ordering::SeqCst);

        let mut orchestrator = ScreenOrchestrator::new(vec![
            (
                config(SourceKind::Weather, true, 0),
                Box::new(weather) as Box<dyn DataSource>,
            ),
            (
                config(SourceKind::Crypto, true, 1),
                Box::new(crypto) as Box<dyn DataSource>,
            ),
        ])
        .unwrap();

        let weather_screen = orchestrator.render_current().await;
        assert_ne!(
            weather_screen.lines,
            vec!["weather: data unavailable".to_string()]
        );

        orchestrator.advance();
        let crypto_screen = orchestrator.render_current().await;
        assert_eq!(
            crypto_screen.lines,
            vec!["crypto: data unavailable".to_string()]
        );
    }
}
