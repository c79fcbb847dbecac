//! Dashboard read projection over the analysis store.
//!
//! Counts and statistics are recomputed from one store snapshot on every
//! read.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domains::analysis::models::{AnalysisRecord, AnalysisStatus};
use crate::domains::analysis::AnalysisStore;

pub const DEFAULT_DASHBOARD_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub analyses: Vec<AnalysisRecord>,
    /// Same records as `analyses`, kept for the summary table view
    pub recent_analyses: Vec<AnalysisRecord>,
    pub processing_count: usize,
    pub total_count: usize,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub company_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
    pub last_seven_days: usize,
}

pub async fn load_dashboard(store: &AnalysisStore, limit: usize) -> DashboardView {
    let snapshot = store.snapshot().await;
    let stats = compute_stats(&snapshot.records, Utc::now());
    let total_count = snapshot.records.len();

    let analyses: Vec<AnalysisRecord> = snapshot.records.into_iter().take(limit).collect();

    DashboardView {
        recent_analyses: analyses.clone(),
        analyses,
        processing_count: snapshot.processing_count,
        total_count,
        stats,
    }
}

pub fn compute_stats(records: &[AnalysisRecord], now: DateTime<Utc>) -> DashboardStats {
    let week_ago = now - Duration::days(7);

    let companies: HashSet<&str> = records
        .iter()
        .map(|r| {
            if r.company_symbol.is_empty() {
                r.company_name.as_str()
            } else {
                r.company_symbol.as_str()
            }
        })
        .collect();

    DashboardStats {
        company_count: companies.len(),
        completed_count: records
            .iter()
            .filter(|r| r.status() == AnalysisStatus::Completed)
            .count(),
        failed_count: records
            .iter()
            .filter(|r| r.status() == AnalysisStatus::Failed)
            .count(),
        last_seven_days: records.iter().filter(|r| r.created_at >= week_ago).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::analysis::models::financial_analysis::sample_analysis;
    use crate::domains::analysis::models::metadata::sample_metadata;
    use crate::domains::analysis::models::{
        AnalysisPatch, CompanyType, NewAnalysisRecord, ReportMetadata,
    };

    fn new_record(symbol: &str, created_at: DateTime<Utc>) -> NewAnalysisRecord {
        NewAnalysisRecord {
            created_at: Some(created_at),
            ..NewAnalysisRecord::processing(
                ReportMetadata {
                    company_symbol: symbol.to_string(),
                    ..sample_metadata()
                },
                CompanyType::AiApplication,
            )
        }
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_stats() {
        let store = AnalysisStore::new();
        let now = Utc::now();

        let old = store.add(new_record("NVDA", now - Duration::days(30))).await;
        let done = store.add(new_record("META", now - Duration::days(1))).await;
        store.add(new_record("META", now)).await;

        store
            .update(old.id, AnalysisPatch::failed("timeout"))
            .await
            .unwrap();
        store
            .update(done.id, AnalysisPatch::completed(sample_analysis("ok")))
            .await
            .unwrap();

        let view = load_dashboard(&store, 2).await;
        assert_eq!(view.analyses.len(), 2);
        assert_eq!(view.recent_analyses, view.analyses);
        assert_eq!(view.analyses[0].company_symbol, "META");
        assert_eq!(view.analyses[1].id, done.id);
        assert_eq!(view.total_count, 3);
        assert_eq!(view.processing_count, 1);
        assert_eq!(
            view.stats,
            DashboardStats {
                company_count: 2,
                completed_count: 1,
                failed_count: 1,
                last_seven_days: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_store() {
        let view = load_dashboard(&AnalysisStore::new(), DEFAULT_DASHBOARD_LIMIT).await;
        assert!(view.analyses.is_empty());
        assert_eq!(view.total_count, 0);
        assert_eq!(view.stats, DashboardStats::default());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["processingCount"], 0);
        assert_eq!(json["stats"]["lastSevenDays"], 0);
    }
}
