//! Platform metrics
//!
//! Append-only samples with caller-supplied timestamps. Unlike the
//! activity log, recency here is the sample's own `timestamp` field,
//! not the insert time, so backfilled samples sort where they belong.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Fields, RecordId, Result, Timestamp};
use tabula_engine::{QueryBounds, RecencyQuery};
use tabula_storage::{Record, RecordStore, TimeField};

use crate::schema::metrics;

/// Default cap on unlimited metric queries
const DEFAULT_LIMIT: usize = 100;

/// One metric sample
#[derive(Debug, Clone)]
pub struct MetricSample {
    /// Metric name, the query key
    pub name: String,
    /// Sample value
    pub value: f64,
    /// Unit of measure
    pub unit: Option<String>,
    /// Opaque JSON tag payload, stored as a string
    pub tags: Option<String>,
    /// When the sample was taken
    pub timestamp: Timestamp,
    /// Aggregation period, e.g. "hourly"
    pub period: Option<String>,
}

impl MetricSample {
    /// Sample with just a name, value and time
    pub fn new(name: impl Into<String>, value: f64, timestamp: Timestamp) -> Self {
        Self {
            name: name.into(),
            value,
            unit: None,
            tags: None,
            timestamp,
            period: None,
        }
    }

    fn into_fields(self) -> Fields {
        let mut fields = Fields::new()
            .with(metrics::NAME, self.name)
            .with(metrics::VALUE, self.value)
            .with(metrics::TIMESTAMP, self.timestamp);
        fields.set_opt(metrics::UNIT, self.unit);
        fields.set_opt(metrics::TAGS, self.tags);
        fields.set_opt(metrics::PERIOD, self.period);
        fields
    }
}

/// Metric facade
#[derive(Debug, Clone)]
pub struct Metrics {
    store: Arc<RecordStore>,
    query: RecencyQuery,
}

impl Metrics {
    /// Facade over an existing store
    pub fn new(store: Arc<RecordStore>) -> Self {
        let query = RecencyQuery::new(
            Arc::clone(&store),
            EntityKind::Metric,
            metrics::BY_NAME,
            TimeField::Field(metrics::TIMESTAMP),
        );
        Self { store, query }
    }

    /// Record a sample
    pub fn log(&self, sample: MetricSample) -> Result<RecordId> {
        self.store.insert(EntityKind::Metric, sample.into_fields())
    }

    /// The newest samples of one metric, newest first
    pub fn by_name(&self, name: &str, limit: Option<usize>) -> Result<Vec<Record>> {
        let bounds = QueryBounds::most_recent(limit.unwrap_or(DEFAULT_LIMIT));
        self.query.by_key(&FieldValue::from(name), bounds)
    }

    /// One metric's samples within `[start, end]` inclusive, oldest first
    pub fn by_time_range(
        &self,
        name: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Record>> {
        self.query
            .by_key(&FieldValue::from(name), QueryBounds::within(start, end))
    }

    /// The newest samples across all metrics, newest first
    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<Record>> {
        self.query
            .recent(QueryBounds::most_recent(limit.unwrap_or(DEFAULT_LIMIT)))
    }
}
