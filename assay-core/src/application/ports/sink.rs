// assay-core/src/application/ports/sink.rs

use std::sync::{Arc, Mutex};
use tracing::info;

use crate::domain::check::threshold::ThresholdRecord;

/// Receives what a threshold evaluation observed, before the outcome is raised.
pub trait MetadataSink: Send + Sync {
    fn record(&self, record: &ThresholdRecord);
}

/// Default sink: one structured log event per evaluation.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MetadataSink for LogSink {
    fn record(&self, record: &ThresholdRecord) {
        info!(
            check = %record.check,
            result = ?record.result,
            min_threshold = record.min_threshold,
            max_threshold = record.max_threshold,
            within_threshold = record.within_threshold,
            "Threshold check metadata"
        );
    }
}

/// Keeps every record in memory, for hosts that persist them after the run.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<ThresholdRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ThresholdRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl MetadataSink for MemorySink {
    fn record(&self, record: &ThresholdRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}
