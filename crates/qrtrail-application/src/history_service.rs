//! History use cases: initialization, query and append.

use std::sync::Arc;

use chrono::{Local, TimeZone};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qrtrail_core::Result;
use qrtrail_core::clock::Clock;
use qrtrail_core::config::HistorySettings;
use qrtrail_core::history::{
    HistoryKind, HistoryPage, HistoryQuery, HistoryRecord, HistoryRepository, paginate, seed,
};

/// What `initialize` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was new and now holds this many sample records
    Seeded(usize),
    /// The store was new and seeding is disabled; an empty log was written
    InitializedEmpty,
    /// The store already existed and was left alone
    AlreadyInitialized,
}

/// Query and append operations over a [`HistoryRepository`].
///
/// Calendar dates in queries are resolved in the service's time zone,
/// local time unless replaced with [`HistoryService::with_time_zone`].
pub struct HistoryService<Z: TimeZone = Local> {
    repository: Arc<dyn HistoryRepository>,
    clock: Arc<dyn Clock>,
    settings: HistorySettings,
    zone: Z,
}

impl HistoryService<Local> {
    pub fn new(
        repository: Arc<dyn HistoryRepository>,
        clock: Arc<dyn Clock>,
        settings: HistorySettings,
    ) -> Self {
        Self {
            repository,
            clock,
            settings,
            zone: Local,
        }
    }
}

impl<Z: TimeZone> HistoryService<Z> {
    /// Resolves query dates in `zone` instead.
    pub fn with_time_zone<Z2: TimeZone>(self, zone: Z2) -> HistoryService<Z2> {
        HistoryService {
            repository: self.repository,
            clock: self.clock,
            settings: self.settings,
            zone,
        }
    }

    pub fn settings(&self) -> &HistorySettings {
        &self.settings
    }

    /// Prepares the store once at process start.
    ///
    /// A store that has never been written receives the sample dataset (or
    /// an empty log when seeding is disabled). An existing store, even an
    /// empty one, is not touched, so calling this again is a no-op.
    pub async fn initialize(&self) -> Result<SeedOutcome> {
        let mut rng = StdRng::from_entropy();
        self.initialize_with_rng(&mut rng).await
    }

    pub async fn initialize_with_rng<R: Rng + Send>(&self, rng: &mut R) -> Result<SeedOutcome> {
        if self.repository.load().await?.is_some() {
            tracing::debug!("[HistoryService] Store already initialized");
            return Ok(SeedOutcome::AlreadyInitialized);
        }

        if !self.settings.seed_sample_data {
            self.repository.save(&[]).await?;
            tracing::info!("[HistoryService] Initialized empty history");
            return Ok(SeedOutcome::InitializedEmpty);
        }

        let records = seed::sample_records(
            rng,
            self.settings.seed_count,
            self.settings.seed_window_days,
            self.clock.now(),
        );
        self.repository.save(&records).await?;

        tracing::info!("[HistoryService] Seeded history with {} sample records", records.len());
        Ok(SeedOutcome::Seeded(records.len()))
    }

    /// Returns one page of the filtered log, newest first.
    ///
    /// Rejects a zero page or page size. Has no side effects.
    pub async fn query(&self, query: &HistoryQuery) -> Result<HistoryPage> {
        query.validate()?;

        let records = self.repository.load().await?.unwrap_or_default();
        let bounds = query.bounds_in(&self.zone);
        let page = paginate(records, query.page, query.page_size, &bounds);

        tracing::debug!(
            "[HistoryService] page {}/{} ({} items of {})",
            query.page,
            page.total_pages,
            page.items.len(),
            page.total_items
        );
        Ok(page)
    }

    /// Unfiltered query for `page` with the configured page size.
    pub async fn page(&self, page: usize) -> Result<HistoryPage> {
        self.query(&HistoryQuery::new(page, self.settings.default_page_size))
            .await
    }

    /// Records a generate or scan event, stamped with the current time.
    pub async fn append(&self, content: &str, kind: HistoryKind) -> Result<HistoryRecord> {
        let record = HistoryRecord::new(content, kind, self.clock.now());
        self.repository.prepend(record.clone()).await?;

        tracing::info!("[HistoryService] Recorded {} entry {}", kind, record.id);
        Ok(record)
    }
}
