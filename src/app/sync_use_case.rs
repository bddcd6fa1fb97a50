use std::sync::Arc;

use tracing::instrument;

use crate::app::ports::HttpClientPort;
use crate::common::error::Result;
use crate::config::Config;
use crate::domain::SubscriptionRecord;
use crate::pipeline::ingestion::SheetSource;
use crate::pipeline::processing::normalize::FieldNormalizer;
use crate::pipeline::{StatusTally, SyncPipeline};

/// Result of one synchronization pass.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub records: Vec<SubscriptionRecord>,
    pub tally: StatusTally,
    /// Rows received from the sheet, header excluded.
    pub rows_received: usize,
}

/// Fetch the subscription sheet and turn it into records.
pub struct SyncSubscriptionsUseCase {
    source: SheetSource,
    pipeline: SyncPipeline,
}

impl SyncSubscriptionsUseCase {
    pub fn new(source: SheetSource, pipeline: SyncPipeline) -> Self {
        Self { source, pipeline }
    }

    /// Wire the use case from configuration. The endpoint must be set.
    pub fn from_config(config: &Config, http: Arc<dyn HttpClientPort>) -> Result<Self> {
        let script_url = config.source.require_script_url()?;
        let source = SheetSource::new(http, script_url, config.source.sheet.clone());
        let pipeline = SyncPipeline::new(
            config.columns.clone(),
            FieldNormalizer::from_config(&config.normalize),
        );
        Ok(Self::new(source, pipeline))
    }

    /// Fails only when the sheet cannot be fetched.
    #[instrument(skip(self), fields(sheet = %self.source.sheet()))]
    pub async fn run(&self) -> Result<SyncOutcome> {
        let rows = self.source.fetch_rows().await?;
        let records = self.pipeline.synchronize(&rows);
        let tally = StatusTally::from_records(&records);
        Ok(SyncOutcome {
            records,
            tally,
            rows_received: rows.len(),
        })
    }
}
