//! In-memory registry of analysis records.
//!
//! Records are kept in a map keyed by id plus an insertion-order index, both
//! behind one `tokio::sync::RwLock`. The lock is held only for the map
//! operation itself, never across an AI call, so analyses of different
//! uploads run fully concurrently.
//!
//! Concurrent patches that touch the same field of the same record are
//! last-writer-wins. The pipeline gives each record a single terminal
//! writer; a second terminal patch is logged as a warning.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, warn};
use uuid::Uuid;

use super::error::StoreError;
use super::models::{AnalysisPatch, AnalysisRecord, NewAnalysisRecord};

#[derive(Default)]
struct Inner {
    records: HashMap<Uuid, AnalysisRecord>,
    /// Ids in insertion order, oldest first
    order: Vec<Uuid>,
}

/// Cloneable handle; clones share the same records.
#[derive(Clone, Default)]
pub struct AnalysisStore {
    inner: Arc<RwLock<Inner>>,
}

/// Records plus the processing count taken under one read lock.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    /// Most recent first
    pub records: Vec<AnalysisRecord>,
    pub processing_count: usize,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record in the processing state and return a copy of it.
    pub async fn add(&self, new: NewAnalysisRecord) -> AnalysisRecord {
        let mut inner = self.inner.write().await;

        let mut id = Uuid::new_v4();
        while inner.records.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let record = new.into_record(id);
        inner.records.insert(id, record.clone());
        inner.order.push(id);
        record
    }

    /// Merge `patch` into the record with `id`.
    pub async fn update(
        &self,
        id: Uuid,
        patch: AnalysisPatch,
    ) -> Result<AnalysisRecord, StoreError> {
        let mut inner = self.inner.write().await;

        let Some(record) = inner.records.get_mut(&id) else {
            error!(analysis_id = %id, "Update targeted an unknown analysis record");
            return Err(StoreError::NotFound(id));
        };

        if patch.is_terminal() && record.is_terminal() {
            warn!(
                analysis_id = %id,
                previous_status = ?record.status(),
                "Record already reached a terminal state, overwriting"
            );
        }

        record.apply(patch);
        Ok(record.clone())
    }

    pub async fn get(&self, id: Uuid) -> Option<AnalysisRecord> {
        self.inner.read().await.records.get(&id).cloned()
    }

    /// All records, most recently added first.
    pub async fn get_all(&self) -> Vec<AnalysisRecord> {
        let inner = self.inner.read().await;
        Self::ordered(&inner)
    }

    pub async fn get_processing_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.records.values().filter(|r| r.processing).count()
    }

    pub async fn size(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Consistent view for readers that need records and counts together.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read().await;
        let records = Self::ordered(&inner);
        let processing_count = records.iter().filter(|r| r.processing).count();
        StoreSnapshot {
            records,
            processing_count,
        }
    }

    fn ordered(inner: &Inner) -> Vec<AnalysisRecord> {
        inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }
}
