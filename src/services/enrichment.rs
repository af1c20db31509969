//! Fundamentals merge for scored candidates.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::store;
use crate::config::StoragePaths;
use crate::error::Result;
use crate::sources::FundamentalsProvider;
use crate::types::{DecisionRecord, EnrichedRecord, Fundamentals};

pub struct Enricher {
    provider: Arc<dyn FundamentalsProvider>,
    delay: Duration,
}

impl Enricher {
    pub fn new(provider: Arc<dyn FundamentalsProvider>, delay: Duration) -> Self {
        Self { provider, delay }
    }

    /// Attach fundamentals to every record, in order. Symbols without data keep empty metrics.
    pub async fn enrich(&self, records: Vec<DecisionRecord>) -> Vec<EnrichedRecord> {
        let total = records.len();
        let mut enriched = Vec::with_capacity(total);

        for (i, record) in records.into_iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            debug!("Fetching fundamentals for {} ({}/{})", record.symbol, i + 1, total);

            let fundamentals = match self.provider.fetch_fundamentals(&record.symbol).await {
                Ok(Some(f)) => f,
                Ok(None) => {
                    warn!("No fundamentals for {}", record.symbol);
                    Fundamentals::default()
                }
                Err(e) => {
                    warn!("Fundamentals lookup failed for {}: {}", record.symbol, e);
                    Fundamentals::default()
                }
            };
            enriched.push(EnrichedRecord::new(record, fundamentals));
        }

        enriched
    }

    /// Enrich the saved candidates and write the enriched table. Returns the row count.
    pub async fn run(&self, storage: &StoragePaths) -> Result<usize> {
        let records = store::read_candidates(&storage.candidates())?;
        info!("Enriching {} candidates", records.len());

        let enriched = self.enrich(records).await;
        let found = enriched.iter().filter(|r| !r.fundamentals.is_empty()).count();
        store::write_enriched(&storage.enriched(), &enriched, false)?;

        info!("Fundamentals found for {}/{} symbols", found, enriched.len());
        Ok(enriched.len())
    }
}
